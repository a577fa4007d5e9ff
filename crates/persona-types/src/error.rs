use thiserror::Error;

/// Errors from constructing or mutating personality domain values.
///
/// This is the validation tier: a malformed profile or model at construction
/// time is a programming or data-integrity defect and propagates to the
/// caller. Expected bad input on the lookup path (blank or unknown aliases)
/// is represented as `Option`/`bool` returns instead, never as an error.
#[derive(Debug, Error)]
pub enum PersonalityError {
    #[error("personality not found")]
    NotFound,

    #[error("personality id cannot be empty")]
    MissingId,

    #[error("invalid personality id: '{0}'")]
    InvalidId(String),

    #[error("owner id cannot be empty")]
    MissingOwner,

    #[error("invalid alias: '{0}'")]
    InvalidAlias(String),

    #[error("invalid display name: {0}")]
    InvalidDisplayName(String),

    #[error("token budget must be positive")]
    InvalidTokenBudget,

    #[error("invalid model config: {0}")]
    InvalidModel(String),

    #[error("storage error: {0}")]
    Storage(String),
}

/// Errors from repository operations (used by trait definitions in persona-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_personality_error_display() {
        let err = PersonalityError::InvalidAlias("   ".to_string());
        assert_eq!(err.to_string(), "invalid alias: '   '");
    }

    #[test]
    fn test_token_budget_error_display() {
        let err = PersonalityError::InvalidTokenBudget;
        assert_eq!(err.to_string(), "token budget must be positive");
    }

    #[test]
    fn test_repository_error_display() {
        let err = RepositoryError::Query("syntax error".to_string());
        assert_eq!(err.to_string(), "query error: syntax error");
    }
}
