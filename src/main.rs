// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
mod cli;
mod repl;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use cli::{Cli, Commands};
use shopkeep_config::Config;
use shopkeep_core::{AgentRegistry, Conversation, TurnRunner};
use shopkeep_model::ModelProvider;
use shopkeep_store::Store;
use shopkeep_tools::ToolRegistry;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    // Credentials may live in .env; load them before the config reads
    // `api_key_env`.
    shopkeep_config::load_env_file(cli.env_file.as_deref());

    let mut config = shopkeep_config::load(cli.config.as_deref())?;
    if let Some(path) = &cli.database {
        config.store.path = path.clone();
    }
    if let Some(model) = &cli.model {
        config.model.name = model.clone();
    }

    if let Some(Commands::ShowConfig) = cli.command {
        println!("{}", toml::to_string_pretty(&redacted(config))?);
        return Ok(());
    }

    let store = Arc::new(
        Store::from_config(&config.store)
            .with_context(|| format!("opening store at {}", config.store.path.display()))?,
    );

    let mut tools = ToolRegistry::with_operations().context("registering shop tools")?;
    let agents = Arc::new(
        AgentRegistry::from_config(
            &config.agents,
            &config.start_agent,
            &config.model.name,
            &mut tools,
        )
        .context("building agents")?,
    );

    let model: Arc<dyn ModelProvider> = Arc::from(shopkeep_model::from_config(&config.model)?);
    info!(
        provider = model.name(),
        model = model.model_name(),
        start_agent = %config.start_agent,
        "shopkeep ready"
    );

    let runner = TurnRunner::new(model, Arc::new(tools), Arc::clone(&agents), store);
    let mut conversation = Conversation::new(agents.start());

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    repl::run(&mut conversation, &runner, stdin, &mut stdout).await
}

/// Hide secrets before printing the configuration.
fn redacted(mut config: Config) -> Config {
    if config.model.api_key.is_some() {
        config.model.api_key = Some("<redacted>".into());
    }
    config
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_config_hides_explicit_api_key() {
        let mut config = Config::default();
        config.model.api_key = Some("sk-secret".into());

        let out = toml::to_string_pretty(&redacted(config)).unwrap();
        assert!(out.contains("api_key = \"<redacted>\""), "{out}");
        assert!(!out.contains("sk-secret"), "{out}");
        assert!(!out.contains("base_url"), "{out}");
    }

    #[test]
    fn show_config_without_key_stays_unset() {
        let out = toml::to_string_pretty(&redacted(Config::default())).unwrap();
        assert!(!out.contains("<redacted>"), "{out}");
        assert!(out.contains("api_key_env = \"OPENAI_API_KEY\""), "{out}");
    }
}
