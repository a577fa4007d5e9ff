use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

use crate::error::PersonalityError;
use crate::value::ValueObject;

/// A short, user-chosen name resolving to exactly one personality at a time.
///
/// The inner string is trimmed and lower-cased at construction, so equality
/// and hashing are case-insensitive by construction and the value is usable
/// directly as a map key. `"Cold"`, `" cold "`, and `"COLD"` all normalize
/// to the same alias.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Alias(String);

impl Alias {
    /// Normalize and validate raw alias text.
    ///
    /// Returns `InvalidAlias` when the input is empty or whitespace-only
    /// after trimming.
    pub fn new(raw: &str) -> Result<Self, PersonalityError> {
        let normalized = raw.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(PersonalityError::InvalidAlias(raw.to_string()));
        }
        Ok(Self(normalized))
    }

    /// The normalized alias text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ValueObject for Alias {
    fn validate(&self) -> Result<(), PersonalityError> {
        if self.0.trim().is_empty() || self.0 != self.0.to_lowercase() {
            return Err(PersonalityError::InvalidAlias(self.0.clone()));
        }
        Ok(())
    }
}

impl fmt::Display for Alias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Alias {
    type Err = PersonalityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    fn hash_of(alias: &Alias) -> u64 {
        let mut hasher = DefaultHasher::new();
        alias.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_normalizes_case_and_whitespace() {
        let alias = Alias::new("  CoLd ").unwrap();
        assert_eq!(alias.as_str(), "cold");
    }

    #[test]
    fn test_case_insensitive_equality() {
        let a = Alias::new("Cold").unwrap();
        let b = Alias::new("cold").unwrap();
        let c = Alias::new("COLD").unwrap();
        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn test_rejects_blank_input() {
        assert!(Alias::new("").is_err());
        assert!(Alias::new("   ").is_err());
        assert!(Alias::new("\t\n").is_err());
    }

    #[test]
    fn test_validate_passes_for_constructed_value() {
        let alias = Alias::new("icy").unwrap();
        assert!(alias.validate().is_ok());
    }

    #[test]
    fn test_display_parse_roundtrip() {
        let alias: Alias = "Frost".parse().unwrap();
        assert_eq!(alias.to_string(), "frost");
    }

    #[test]
    fn test_serde_roundtrip() {
        let alias = Alias::new("cold").unwrap();
        let json = serde_json::to_string(&alias).unwrap();
        assert_eq!(json, "\"cold\"");
        let parsed: Alias = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, alias);
    }
}
