mod types;
mod provider;
mod openai;
mod mock;

pub use types::*;
pub use provider::ModelProvider;
pub use openai::OpenAiProvider;
pub use mock::{MockProvider, ScriptedMockProvider};

use anyhow::bail;
use shopkeep_config::ModelConfig;

/// Construct a boxed [`ModelProvider`] from configuration.
///
/// Provider selection:
/// - `"openai"` → [`OpenAiProvider`] (any OpenAI-compatible endpoint)
/// - `"mock"` → [`MockProvider`] (echo-back, no network)
pub fn from_config(cfg: &ModelConfig) -> anyhow::Result<Box<dyn ModelProvider>> {
    match cfg.provider.as_str() {
        "openai" => Ok(Box::new(OpenAiProvider::new(
            cfg.name.clone(),
            resolve_api_key(cfg),
            cfg.base_url.clone(),
            cfg.max_tokens,
            cfg.temperature,
        ))),
        "mock" => Ok(Box::new(MockProvider)),
        other => bail!("unknown model provider: {other}"),
    }
}

fn resolve_api_key(cfg: &ModelConfig) -> Option<String> {
    if let Some(k) = &cfg.api_key {
        return Some(k.clone());
    }
    if let Some(env) = &cfg.api_key_env {
        return std::env::var(env).ok().filter(|k| !k.is_empty());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_provider_is_rejected() {
        let cfg = ModelConfig { provider: "carrier-pigeon".into(), ..ModelConfig::default() };
        let err = from_config(&cfg).err().expect("should fail");
        assert!(err.to_string().contains("carrier-pigeon"));
    }

    #[test]
    fn mock_provider_selected_by_name() {
        let cfg = ModelConfig { provider: "mock".into(), ..ModelConfig::default() };
        let p = from_config(&cfg).unwrap();
        assert_eq!(p.name(), "mock");
    }

    #[test]
    fn explicit_api_key_beats_env() {
        let cfg = ModelConfig {
            api_key: Some("sk-explicit".into()),
            api_key_env: Some("SHOPKEEP_TEST_UNUSED_KEY".into()),
            ..ModelConfig::default()
        };
        assert_eq!(resolve_api_key(&cfg).as_deref(), Some("sk-explicit"));
    }

    #[test]
    fn api_key_read_from_named_env_var() {
        std::env::set_var("SHOPKEEP_TEST_MODEL_KEY", "sk-from-env");
        let cfg = ModelConfig {
            api_key: None,
            api_key_env: Some("SHOPKEEP_TEST_MODEL_KEY".into()),
            ..ModelConfig::default()
        };
        assert_eq!(resolve_api_key(&cfg).as_deref(), Some("sk-from-env"));
    }
}
