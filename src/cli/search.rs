use clap::Parser;

/// Arguments for the search command
#[derive(Parser, Debug)]
pub struct SearchArgs {
    /// Keywords matched against package names, titles and commands
    #[arg(required = true)]
    pub keywords: Vec<String>,
}
