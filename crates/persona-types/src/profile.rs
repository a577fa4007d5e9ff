use serde::{Deserialize, Serialize};

use crate::error::PersonalityError;
use crate::value::ValueObject;

/// Prompt and budget bundle describing how a personality presents itself.
///
/// Immutable value object: updates go through the `with_*` methods, which
/// return a new instance, or by replacing the whole profile on the
/// aggregate. Never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PersonalityProfile {
    /// Display name shown in chat output.
    display_name: String,
    /// System prompt injected at the start of every conversation.
    system_prompt: String,
    /// Optional path or reference to an external prompt document.
    prompt_path: Option<String>,
    /// Maximum tokens this personality may spend per response.
    token_budget: u32,
}

impl PersonalityProfile {
    /// Build a validated profile.
    ///
    /// Fails when the display name is blank or the token budget is zero.
    pub fn new(
        display_name: &str,
        system_prompt: &str,
        prompt_path: Option<String>,
        token_budget: u32,
    ) -> Result<Self, PersonalityError> {
        let profile = Self {
            display_name: display_name.trim().to_string(),
            system_prompt: system_prompt.to_string(),
            prompt_path,
            token_budget,
        };
        profile.validate()?;
        Ok(profile)
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub fn prompt_path(&self) -> Option<&str> {
        self.prompt_path.as_deref()
    }

    pub fn token_budget(&self) -> u32 {
        self.token_budget
    }

    /// Copy with a different display name; the receiver is unchanged.
    pub fn with_display_name(&self, display_name: &str) -> Result<Self, PersonalityError> {
        Self::new(
            display_name,
            &self.system_prompt,
            self.prompt_path.clone(),
            self.token_budget,
        )
    }

    /// Copy with a different system prompt; the receiver is unchanged.
    pub fn with_system_prompt(&self, system_prompt: &str) -> Self {
        Self {
            system_prompt: system_prompt.to_string(),
            ..self.clone()
        }
    }

    /// Copy with a different prompt path; the receiver is unchanged.
    pub fn with_prompt_path(&self, prompt_path: Option<String>) -> Self {
        Self {
            prompt_path,
            ..self.clone()
        }
    }

    /// Copy with a different token budget; the receiver is unchanged.
    pub fn with_token_budget(&self, token_budget: u32) -> Result<Self, PersonalityError> {
        Self::new(
            &self.display_name,
            &self.system_prompt,
            self.prompt_path.clone(),
            token_budget,
        )
    }
}

impl ValueObject for PersonalityProfile {
    fn validate(&self) -> Result<(), PersonalityError> {
        if self.display_name.trim().is_empty() {
            return Err(PersonalityError::InvalidDisplayName(
                "display name cannot be empty".to_string(),
            ));
        }
        if self.token_budget == 0 {
            return Err(PersonalityError::InvalidTokenBudget);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> PersonalityProfile {
        PersonalityProfile::new("Cold", "You are Cold.", None, 2048).unwrap()
    }

    #[test]
    fn test_valid_construction() {
        let p = profile();
        assert_eq!(p.display_name(), "Cold");
        assert_eq!(p.token_budget(), 2048);
        assert!(p.prompt_path().is_none());
    }

    #[test]
    fn test_rejects_zero_token_budget() {
        let err = PersonalityProfile::new("Cold", "prompt", None, 0).unwrap_err();
        assert!(matches!(err, PersonalityError::InvalidTokenBudget));
    }

    #[test]
    fn test_rejects_blank_display_name() {
        let err = PersonalityProfile::new("   ", "prompt", None, 100).unwrap_err();
        assert!(matches!(err, PersonalityError::InvalidDisplayName(_)));
    }

    #[test]
    fn test_with_token_budget_does_not_mutate_receiver() {
        let a = profile();
        let b = a.with_token_budget(512).unwrap();
        assert_eq!(a.token_budget(), 2048);
        assert_eq!(b.token_budget(), 512);
        assert_eq!(b.display_name(), a.display_name());
    }

    #[test]
    fn test_with_token_budget_rejects_zero() {
        assert!(profile().with_token_budget(0).is_err());
    }

    #[test]
    fn test_with_system_prompt() {
        let a = profile();
        let b = a.with_system_prompt("You are very cold.");
        assert_eq!(a.system_prompt(), "You are Cold.");
        assert_eq!(b.system_prompt(), "You are very cold.");
    }

    #[test]
    fn test_structural_equality() {
        let a = profile();
        let b = PersonalityProfile::new("Cold", "You are Cold.", None, 2048).unwrap();
        assert_eq!(a, b);
        let c = b.with_prompt_path(Some("prompts/cold.md".to_string()));
        assert_ne!(a, c);
    }

    #[test]
    fn test_serde_roundtrip() {
        let p = profile().with_prompt_path(Some("prompts/cold.md".to_string()));
        let json = serde_json::to_string(&p).unwrap();
        let parsed: PersonalityProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, p);
    }
}
