//! List command implementation

use crate::cli::builtin_commands;
use crate::commands::Session;
use crate::error::Result;
use crate::operations::ListOperation;
use crate::resolver::Registry;

pub fn run() -> Result<()> {
    let session = Session::open()?;
    let ctx = session.context();

    let registry = Registry::load(&session.paths, builtin_commands());
    ListOperation::new(&ctx).execute(&registry);
    Ok(())
}
