use clap::Parser;

/// Arguments for the uninstall command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Remove the package providing a command:\n    akamai uninstall purge")]
pub struct UninstallArgs {
    /// Commands whose packages should be removed
    #[arg(required = true)]
    pub commands: Vec<String>,
}
