// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "shopkeep",
    about = "A conversational shopping assistant for the terminal",
    version,
    long_about = None,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to config file (layered over the auto-discovered ones)
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// SQLite database file; overrides `store.path`
    #[arg(long, short = 'd', env = "SHOPKEEP_DATABASE")]
    pub database: Option<PathBuf>,

    /// Default model for agents without their own, e.g. "gpt-4o"
    #[arg(long, short = 'M', env = "SHOPKEEP_MODEL")]
    pub model: Option<String>,

    /// File with environment variables such as OPENAI_API_KEY (default: ./.env)
    #[arg(long, value_name = "PATH")]
    pub env_file: Option<PathBuf>,

    /// Increase verbosity (-v = debug, -vv = trace)
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Print the effective configuration and exit
    ShowConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_flags_means_interactive_defaults() {
        let cli = Cli::try_parse_from(["shopkeep"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn short_flags_parse() {
        let cli = Cli::try_parse_from(["shopkeep", "-c", "shop.toml", "-d", "/tmp/shop.db", "-vv"])
            .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("shop.toml")));
        assert_eq!(cli.database, Some(PathBuf::from("/tmp/shop.db")));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn env_file_and_model_parse() {
        let cli =
            Cli::try_parse_from(["shopkeep", "--env-file", "secrets.env", "--model", "gpt-4o"])
                .unwrap();
        assert_eq!(cli.env_file, Some(PathBuf::from("secrets.env")));
        assert_eq!(cli.model.as_deref(), Some("gpt-4o"));
    }

    #[test]
    fn show_config_subcommand() {
        let cli = Cli::try_parse_from(["shopkeep", "show-config"]).unwrap();
        assert_eq!(cli.command, Some(Commands::ShowConfig));
    }
}
