use clap::Parser;

/// Arguments for the update command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Update every installed package:\n    akamai update\n\n\
                  Update the package providing a command:\n    akamai update purge")]
pub struct UpdateArgs {
    /// Commands whose packages should be updated (all packages when omitted)
    pub commands: Vec<String>,

    /// Reinstall dependencies even when the package is already up-to-date
    #[arg(long, short = 'f')]
    pub force: bool,
}
