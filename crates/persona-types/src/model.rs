use serde::{Deserialize, Serialize};

use crate::error::PersonalityError;
use crate::value::ValueObject;

/// Model identifier, endpoint, and capability flags for a personality.
///
/// Immutable value object. A personality swaps its whole `ModelConfig` to
/// change models; individual fields are never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelConfig {
    /// LLM model identifier.
    model: String,
    /// Endpoint path or URL the completion requests go to.
    endpoint: String,
    /// Maximum tokens per response.
    max_tokens: u32,
    /// Whether the model accepts image input.
    supports_images: bool,
    /// Whether the model accepts audio input.
    supports_audio: bool,
}

impl ModelConfig {
    /// Default LLM model.
    pub const DEFAULT_MODEL: &'static str = "claude-sonnet-4-20250514";
    /// Default completion endpoint.
    pub const DEFAULT_ENDPOINT: &'static str = "/v1/messages";
    /// Default max tokens per response.
    pub const DEFAULT_MAX_TOKENS: u32 = 4096;

    /// Build a validated model config.
    ///
    /// Fails when the model identifier is blank or `max_tokens` is zero.
    pub fn new(
        model: &str,
        endpoint: &str,
        max_tokens: u32,
        supports_images: bool,
        supports_audio: bool,
    ) -> Result<Self, PersonalityError> {
        let config = Self {
            model: model.trim().to_string(),
            endpoint: endpoint.to_string(),
            max_tokens,
            supports_images,
            supports_audio,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    pub fn supports_images(&self) -> bool {
        self.supports_images
    }

    pub fn supports_audio(&self) -> bool {
        self.supports_audio
    }

    /// Copy with a different model identifier; the receiver is unchanged.
    pub fn with_model(&self, model: &str) -> Result<Self, PersonalityError> {
        Self::new(
            model,
            &self.endpoint,
            self.max_tokens,
            self.supports_images,
            self.supports_audio,
        )
    }

    /// Copy with a different endpoint; the receiver is unchanged.
    pub fn with_endpoint(&self, endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            ..self.clone()
        }
    }

    /// Copy with a different max-tokens limit; the receiver is unchanged.
    pub fn with_max_tokens(&self, max_tokens: u32) -> Result<Self, PersonalityError> {
        Self::new(
            &self.model,
            &self.endpoint,
            max_tokens,
            self.supports_images,
            self.supports_audio,
        )
    }

    /// Copy with a different image-capability flag; the receiver is unchanged.
    pub fn with_supports_images(&self, supports_images: bool) -> Self {
        Self {
            supports_images,
            ..self.clone()
        }
    }

    /// Copy with a different audio-capability flag; the receiver is unchanged.
    pub fn with_supports_audio(&self, supports_audio: bool) -> Self {
        Self {
            supports_audio,
            ..self.clone()
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model: Self::DEFAULT_MODEL.to_string(),
            endpoint: Self::DEFAULT_ENDPOINT.to_string(),
            max_tokens: Self::DEFAULT_MAX_TOKENS,
            supports_images: true,
            supports_audio: false,
        }
    }
}

impl ValueObject for ModelConfig {
    fn validate(&self) -> Result<(), PersonalityError> {
        if self.model.trim().is_empty() {
            return Err(PersonalityError::InvalidModel(
                "model identifier cannot be empty".to_string(),
            ));
        }
        if self.max_tokens == 0 {
            return Err(PersonalityError::InvalidModel(
                "max_tokens must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ModelConfig::default();
        assert_eq!(config.model(), "claude-sonnet-4-20250514");
        assert_eq!(config.endpoint(), "/v1/messages");
        assert_eq!(config.max_tokens(), 4096);
        assert!(config.supports_images());
        assert!(!config.supports_audio());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_blank_model() {
        let err = ModelConfig::new("  ", "/v1/messages", 1024, false, false).unwrap_err();
        assert!(matches!(err, PersonalityError::InvalidModel(_)));
    }

    #[test]
    fn test_rejects_zero_max_tokens() {
        let err = ModelConfig::new("claude-sonnet-4-20250514", "/v1/messages", 0, false, false)
            .unwrap_err();
        assert!(matches!(err, PersonalityError::InvalidModel(_)));
    }

    #[test]
    fn test_with_flags_do_not_mutate_receiver() {
        let a = ModelConfig::default();
        let b = a.with_supports_audio(true);
        assert!(!a.supports_audio());
        assert!(b.supports_audio());
        assert_eq!(a.model(), b.model());
    }

    #[test]
    fn test_with_max_tokens_rejects_zero() {
        assert!(ModelConfig::default().with_max_tokens(0).is_err());
    }

    #[test]
    fn test_structural_equality() {
        let a = ModelConfig::default();
        let b = ModelConfig::default();
        assert_eq!(a, b);
        assert_ne!(a, b.with_endpoint("/v2/messages"));
    }

    #[test]
    fn test_serde_roundtrip() {
        let config = ModelConfig::default().with_supports_audio(true);
        let json = serde_json::to_string(&config).unwrap();
        let parsed: ModelConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
