use clap::Parser;
use clap_complete::Shell;

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    akamai completions --shell bash > ~/.bash_completion.d/akamai\n\n\
                  Generate zsh completions:\n    akamai completions --shell zsh > ~/.zfunc/_akamai\n\n\
                  Generate fish completions:\n    akamai completions --shell fish > ~/.config/fish/completions/akamai.fish")]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(long, value_enum)]
    pub shell: Shell,
}
