//! Update command implementation

use crate::cli::UpdateArgs;
use crate::commands::Session;
use crate::error::Result;
use crate::operations::{UpdateOperation, UpdateOptions};

pub fn run(args: UpdateArgs) -> Result<()> {
    let session = Session::open()?;
    let ctx = session.context();

    let updated = UpdateOperation::new(&ctx, UpdateOptions::from(&args)).execute(&args.commands)?;
    if updated.is_empty() {
        ctx.terminal
            .writeln("No packages installed. Use \"akamai install\" to add one.");
    }
    Ok(())
}
