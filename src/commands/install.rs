//! Install command implementation

use crate::cli::InstallArgs;
use crate::commands::Session;
use crate::error::Result;
use crate::operations::{InstallOperation, InstallOptions, ListOperation};
use crate::resolver::{RegisteredCommand, Registry};

/// Install each repository in turn, stopping at the first failure
pub fn run(args: InstallArgs) -> Result<()> {
    let session = Session::open()?;
    let ctx = session.context();
    let operation = InstallOperation::new(&ctx, InstallOptions::from(&args));

    for repository in &args.repositories {
        let installed = operation.execute(repository)?;

        let registry = Registry::new(
            installed
                .manifest
                .commands
                .iter()
                .cloned()
                .map(|c| RegisteredCommand::installed(&installed.dir, c))
                .collect(),
        );
        ListOperation::new(&ctx).print_installed(&registry);
    }

    Ok(())
}
