// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Serde default helper — returns `true`.
///
/// `#[serde(default)]` on a `bool` always falls back to `false`, so fields
/// that should be on unless switched off need a named function.
fn default_true() -> bool {
    true
}

fn default_start_agent() -> String {
    "triage".into()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Agent the conversation starts with.
    #[serde(default = "default_start_agent")]
    pub start_agent: String,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub store: StoreConfig,
    /// Agent definitions.  Empty means "use the built-in triage/sales/orders
    /// set".
    ///
    /// ```toml
    /// [[agents]]
    /// name = "sales"
    /// instructions = "You sell things."
    /// tools = ["list_items", "create_order"]
    /// transfers = ["triage"]
    /// ```
    #[serde(default)]
    pub agents: Vec<AgentDefinition>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            start_agent: default_start_agent(),
            model: ModelConfig::default(),
            store: StoreConfig::default(),
            agents: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Provider identifier: `"openai"` (any OpenAI-compatible endpoint) or
    /// `"mock"` (offline echo provider).
    pub provider: String,
    /// Default model name; agents without their own `model` use this.
    pub name: String,
    /// Environment variable that holds the API key (read at runtime)
    pub api_key_env: Option<String>,
    /// Explicit API key; prefer api_key_env in config files to avoid secrets
    /// in version-controlled files
    pub api_key: Option<String>,
    /// Base URL override, e.g. a local proxy.  Defaults to the OpenAI API.
    pub base_url: Option<String>,
    /// Maximum tokens to request in a single completion
    pub max_tokens: Option<u32>,
    /// Sampling temperature (0.0–2.0)
    pub temperature: Option<f32>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            provider: "openai".into(),
            name: "gpt-4o-mini".into(),
            api_key_env: Some("OPENAI_API_KEY".into()),
            api_key: None,
            base_url: None,
            max_tokens: Some(1024),
            temperature: Some(0.2),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// SQLite database file.  Created on first start.
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
    /// Insert the default catalogue when the items table is empty.
    #[serde(default = "default_true")]
    pub seed: bool,
}

fn default_store_path() -> PathBuf {
    PathBuf::from("database.db")
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { path: default_store_path(), seed: true }
    }
}

/// One agent persona as written in the config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentDefinition {
    pub name: String,
    /// System prompt sent at the head of every request while this agent is
    /// active.
    pub instructions: String,
    /// Model override; `None` inherits `model.name`.
    #[serde(default)]
    pub model: Option<String>,
    /// Store operations this agent may call.
    #[serde(default)]
    pub tools: Vec<String>,
    /// Agents this one can hand the conversation to.  Each entry becomes a
    /// `transfer_to_<name>` tool.
    #[serde(default)]
    pub transfers: Vec<String>,
}

// ─── Unit tests ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_openai_and_local_database() {
        let cfg = Config::default();
        assert_eq!(cfg.model.provider, "openai");
        assert_eq!(cfg.model.api_key_env.as_deref(), Some("OPENAI_API_KEY"));
        assert_eq!(cfg.store.path, PathBuf::from("database.db"));
        assert!(cfg.store.seed);
        assert_eq!(cfg.start_agent, "triage");
        assert!(cfg.agents.is_empty());
    }

    #[test]
    fn partial_model_table_keeps_other_defaults() {
        let cfg: Config = toml::from_str("[model]\nname = \"gpt-4o\"").unwrap();
        assert_eq!(cfg.model.name, "gpt-4o");
        assert_eq!(cfg.model.provider, "openai");
        assert_eq!(cfg.model.max_tokens, Some(1024));
    }

    #[test]
    fn agent_definitions_parse_with_optional_fields() {
        let cfg: Config = toml::from_str(
            r#"
start_agent = "sales"

[[agents]]
name = "sales"
instructions = "Sell."
tools = ["list_items"]
"#,
        )
        .unwrap();
        assert_eq!(cfg.start_agent, "sales");
        assert_eq!(cfg.agents.len(), 1);
        let a = &cfg.agents[0];
        assert_eq!(a.model, None);
        assert_eq!(a.tools, vec!["list_items"]);
        assert!(a.transfers.is_empty());
    }

    #[test]
    fn store_seed_can_be_disabled() {
        let cfg: Config = toml::from_str("[store]\nseed = false").unwrap();
        assert!(!cfg.store.seed);
        assert_eq!(cfg.store.path, PathBuf::from("database.db"));
    }
}
