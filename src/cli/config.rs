use clap::{Parser, Subcommand};

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigSubcommand {
    /// Print the value of a key
    Get {
        /// Key in <section>.<key> form
        key: String,
    },

    /// Set the value of a key
    Set {
        /// Key in <section>.<key> form
        key: String,
        /// New value
        value: String,
    },

    /// Remove a key
    #[command(visible_alias = "rm")]
    Unset {
        /// Key in <section>.<key> form
        key: String,
    },

    /// Print every key and value
    #[command(visible_alias = "ls")]
    List {
        /// Only show keys of this section
        section: Option<String>,
    },
}
