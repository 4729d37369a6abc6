//! Search command implementation

use crate::cli::SearchArgs;
use crate::commands::Session;
use crate::error::Result;
use crate::operations::SearchOperation;
use crate::operations::search::package_list_url;

pub fn run(args: SearchArgs) -> Result<()> {
    let session = Session::open()?;
    let ctx = session.context();

    SearchOperation::new(&ctx, package_list_url()).execute(&args.keywords)?;
    Ok(())
}
