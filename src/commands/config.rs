//! Config command implementation

use crate::cli::{ConfigArgs, ConfigSubcommand};
use crate::config::{ConfigStore, FileConfig, split_key};
use crate::error::Result;
use crate::paths::CliPaths;
use crate::terminal::{ConsoleTerminal, Terminal};

pub fn run(args: ConfigArgs) -> Result<()> {
    let paths = CliPaths::from_env()?;
    let mut config = FileConfig::load(&paths.config_file)?;
    apply(&mut config, &ConsoleTerminal::new(), args.command)
}

/// Execute one config subcommand against `config`, saving on change
pub fn apply(
    config: &mut dyn ConfigStore,
    terminal: &dyn Terminal,
    command: ConfigSubcommand,
) -> Result<()> {
    match command {
        ConfigSubcommand::Get { key } => {
            let (section, key) = split_key(&key)?;
            terminal.writeln(&config.get(section, key).unwrap_or_default());
            Ok(())
        }
        ConfigSubcommand::Set { key, value } => {
            let (section, key) = split_key(&key)?;
            config.set(section, key, &value);
            config.save()
        }
        ConfigSubcommand::Unset { key } => {
            let (section, key) = split_key(&key)?;
            config.unset(section, key);
            config.save()
        }
        ConfigSubcommand::List { section } => {
            let prefix = section.map(|s| format!("{s}."));
            for (key, value) in config.entries() {
                if prefix.as_ref().is_none_or(|p| key.starts_with(p.as_str())) {
                    terminal.writeln(&format!("{key} = {value}"));
                }
            }
            Ok(())
        }
    }
}
