use clap::Parser;

/// Arguments for the install command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Install an official package:\n    akamai install purge\n\n\
                  Install from GitHub:\n    akamai install someone/cli-tool\n\n\
                  Install from any git URL:\n    akamai install https://git.example.com/team/cli-tool.git\n\n\
                  Download the prebuilt binary instead of building:\n    akamai install purge --force")]
pub struct InstallArgs {
    /// Package name, owner/repo, or git URL
    #[arg(required = true)]
    pub repositories: Vec<String>,

    /// Skip dependency installation and download the prebuilt binary
    #[arg(long, short = 'f')]
    pub force: bool,
}
