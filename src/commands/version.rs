//! Version command implementation

use crate::error::Result;

/// Print the build version
pub fn run() -> Result<()> {
    println!("{}", env!("CARGO_PKG_VERSION"));
    Ok(())
}
