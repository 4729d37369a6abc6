//! Uninstall command implementation

use crate::cli::UninstallArgs;
use crate::commands::Session;
use crate::error::Result;
use crate::operations::UninstallOperation;

pub fn run(args: UninstallArgs) -> Result<()> {
    let session = Session::open()?;
    let ctx = session.context();
    let operation = UninstallOperation::new(&ctx);

    for command in &args.commands {
        operation.execute(command)?;
    }
    Ok(())
}
