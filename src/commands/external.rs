//! Dispatch to commands provided by installed packages or the system PATH

use std::ffi::OsString;
use std::path::Path;

use tracing::{debug, info};

use crate::cli::builtin_commands;
use crate::commands::{Session, passthrough};
use crate::error::{AkamaiError, Result};
use crate::operations::{OperationContext, install_dependencies};
use crate::paths::{CliPaths, HOME_ENV};
use crate::resolver::{Registry, Resolution, Resolver, SearchRoots};

/// Run an external command and return its exit code
pub fn run(args: Vec<OsString>) -> Result<i32> {
    let Some((name, rest)) = args.split_first() else {
        return Err(AkamaiError::CommandNotFound {
            command: String::new(),
        });
    };
    let name = name.to_string_lossy().into_owned();

    let session = Session::open()?;
    let ctx = session.context();
    let resolution = resolve(&ctx, &name)?;

    if let (Some(dir), Some(manifest)) = (&resolution.package_dir, &resolution.manifest) {
        if resolution
            .language
            .installer()
            .needs_reinstall(ctx.executor, dir)
        {
            info!(package = %dir.display(), "dependencies missing, reinstalling");
            install_dependencies(&ctx, dir, manifest, false)?;
        }
    }

    if let Some(warning) = &resolution.invocation.warning {
        ctx.terminal.warn(warning);
    }

    let (program, leading) = split_program(&resolution, &name)?;
    let mut argv: Vec<OsString> = leading.to_vec();
    argv.extend(rest.iter().cloned());

    let env = child_env(&session.paths, &resolution, &name);
    passthrough(Path::new(program), &argv, &env)
}

/// Find the executable backing `name`.
///
/// Registered names and aliases are resolved inside their own package; other
/// names fall back to the `akamai-<name>` naming convention across all
/// packages and the system `PATH`.
pub fn resolve(ctx: &OperationContext<'_>, name: &str) -> Result<Resolution> {
    let registry = Registry::load(ctx.paths, builtin_commands());
    let resolver = Resolver::new(ctx.executor, ctx.paths, SearchRoots::discover(ctx.paths));

    match registry.lookup(name)? {
        Some(registered) if !registered.is_builtin() => {
            let dir = registered
                .package_dir
                .as_deref()
                .ok_or_else(|| not_found(name))?;
            debug!(name, command = %registered.command.name, "registered command");
            resolver.resolve_in(dir, &registered.command.name)
        }
        _ => resolver.resolve(name).map_err(|e| match e {
            AkamaiError::ExecutableNotFound { .. } => not_found(name),
            other => other,
        }),
    }
}

fn not_found(name: &str) -> AkamaiError {
    AkamaiError::CommandNotFound {
        command: name.to_string(),
    }
}

fn split_program<'r>(resolution: &'r Resolution, name: &str) -> Result<(&'r OsString, &'r [OsString])> {
    resolution
        .invocation
        .argv
        .split_first()
        .ok_or_else(|| AkamaiError::ExecutableNotFound {
            command: name.to_string(),
        })
}

/// `purge` for both `purge` and `purge/purge`
fn command_part(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}

/// Variables advertising the host CLI to the child process
fn child_env(paths: &CliPaths, resolution: &Resolution, name: &str) -> Vec<(String, OsString)> {
    let mut env = vec![
        ("AKAMAI_CLI".to_string(), OsString::from("1")),
        (
            "AKAMAI_CLI_VERSION".to_string(),
            OsString::from(env!("CARGO_PKG_VERSION")),
        ),
        ("AKAMAI_CLI_COMMAND".to_string(), OsString::from(name)),
        (
            "AKAMAI_CLI_COMMAND_VERSION".to_string(),
            OsString::from(
                resolution
                    .command_version(command_part(name))
                    .unwrap_or_default(),
            ),
        ),
        (HOME_ENV.to_string(), paths.home.clone().into_os_string()),
    ];
    env.extend(resolution.invocation.env.iter().cloned());
    env
}
