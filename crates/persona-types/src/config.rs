//! Platform configuration types.
//!
//! `PlatformConfig` represents the top-level `config.toml` that supplies
//! defaults for newly created personalities. All fields have sensible
//! defaults, so an empty file (or no file) is a valid configuration.

use serde::{Deserialize, Serialize};

use crate::error::PersonalityError;
use crate::model::ModelConfig;

/// Top-level configuration for the Persona platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformConfig {
    /// Token budget applied when a create request does not specify one.
    #[serde(default = "default_token_budget")]
    pub default_token_budget: u32,

    /// Model settings applied when a create request does not specify them.
    #[serde(default)]
    pub default_model: ModelDefaults,
}

fn default_token_budget() -> u32 {
    2048
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            default_token_budget: default_token_budget(),
            default_model: ModelDefaults::default(),
        }
    }
}

/// Default model settings for new personalities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelDefaults {
    #[serde(default = "default_model_id")]
    pub model: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_supports_images")]
    pub supports_images: bool,
    #[serde(default)]
    pub supports_audio: bool,
}

fn default_model_id() -> String {
    ModelConfig::DEFAULT_MODEL.to_string()
}

fn default_endpoint() -> String {
    ModelConfig::DEFAULT_ENDPOINT.to_string()
}

fn default_max_tokens() -> u32 {
    ModelConfig::DEFAULT_MAX_TOKENS
}

fn default_supports_images() -> bool {
    true
}

impl Default for ModelDefaults {
    fn default() -> Self {
        Self {
            model: default_model_id(),
            endpoint: default_endpoint(),
            max_tokens: default_max_tokens(),
            supports_images: default_supports_images(),
            supports_audio: false,
        }
    }
}

impl ModelDefaults {
    /// Build a validated `ModelConfig` from these defaults.
    ///
    /// Configuration is user-edited data, so the same validation as any
    /// other model config applies.
    pub fn to_model_config(&self) -> Result<ModelConfig, PersonalityError> {
        ModelConfig::new(
            &self.model,
            &self.endpoint,
            self.max_tokens,
            self.supports_images,
            self.supports_audio,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = PlatformConfig::default();
        assert_eq!(config.default_token_budget, 2048);
        assert_eq!(config.default_model.model, ModelConfig::DEFAULT_MODEL);
        assert!(config.default_model.supports_images);
        assert!(!config.default_model.supports_audio);
    }

    #[test]
    fn test_deserialize_empty_toml_uses_defaults() {
        let config: PlatformConfig = toml::from_str("").unwrap();
        assert_eq!(config.default_token_budget, 2048);
        assert_eq!(config.default_model.max_tokens, ModelConfig::DEFAULT_MAX_TOKENS);
    }

    #[test]
    fn test_deserialize_with_values() {
        let toml_str = r#"
default_token_budget = 8192

[default_model]
model = "claude-haiku-4-5"
max_tokens = 1024
supports_audio = true
"#;
        let config: PlatformConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.default_token_budget, 8192);
        assert_eq!(config.default_model.model, "claude-haiku-4-5");
        assert_eq!(config.default_model.max_tokens, 1024);
        assert!(config.default_model.supports_audio);
        // Unset fields keep their defaults.
        assert_eq!(config.default_model.endpoint, ModelConfig::DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_to_model_config() {
        let defaults = ModelDefaults::default();
        let model = defaults.to_model_config().unwrap();
        assert_eq!(model.model(), ModelConfig::DEFAULT_MODEL);
        assert_eq!(model.max_tokens(), ModelConfig::DEFAULT_MAX_TOKENS);
    }

    #[test]
    fn test_to_model_config_rejects_invalid() {
        let defaults = ModelDefaults {
            max_tokens: 0,
            ..ModelDefaults::default()
        };
        assert!(defaults.to_model_config().is_err());
    }

    #[test]
    fn test_serde_roundtrip() {
        let config = PlatformConfig {
            default_token_budget: 4096,
            default_model: ModelDefaults::default(),
        };
        let json = serde_json::to_string(&config).unwrap();
        let parsed: PlatformConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.default_token_budget, 4096);
        assert_eq!(parsed.default_model.model, config.default_model.model);
    }
}
