use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::alias::Alias;
use crate::error::PersonalityError;
use crate::model::ModelConfig;
use crate::profile::PersonalityProfile;
use crate::value::{Entity, ValueObject};

/// Unique identifier for a personality, wrapping a URL-safe slug.
///
/// The id is the aggregate's identity: assigned once at creation and never
/// reassigned. Unlike the value objects in this crate it carries identity
/// semantics -- two aggregates are the same logical entity iff their ids
/// are equal, whatever their attribute state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PersonalityId(String);

impl PersonalityId {
    /// Validate a raw slug.
    ///
    /// Accepts lowercase ASCII alphanumerics and hyphens; rejects empty
    /// input and anything else.
    pub fn new(raw: &str) -> Result<Self, PersonalityError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(PersonalityError::MissingId);
        }
        let valid = raw
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
        if !valid {
            return Err(PersonalityError::InvalidId(raw.to_string()));
        }
        Ok(Self(raw.to_string()))
    }

    /// Derive an id from a freeform display name ("Cold Kerach" -> "cold-kerach").
    pub fn from_display_name(name: &str) -> Result<Self, PersonalityError> {
        let slug = slugify(name);
        if slug.is_empty() {
            return Err(PersonalityError::InvalidId(name.to_string()));
        }
        Ok(Self(slug))
    }

    /// The slug text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PersonalityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PersonalityId {
    type Err = PersonalityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Owner identifier (chat-platform user id).
///
/// Immutable value object wrapping the opaque id string of the user who
/// registered the personality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(String);

impl UserId {
    /// Validate a raw owner id. Rejects blank input.
    pub fn new(raw: &str) -> Result<Self, PersonalityError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(PersonalityError::MissingOwner);
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ValueObject for UserId {
    fn validate(&self) -> Result<(), PersonalityError> {
        if self.0.trim().is_empty() {
            return Err(PersonalityError::MissingOwner);
        }
        Ok(())
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Generate a URL-safe slug from a display name.
///
/// Lowercases, replaces runs of non-alphanumeric characters with a single
/// hyphen, and trims hyphens from both ends.
///
/// # Examples
///
/// ```
/// use persona_types::personality::slugify;
///
/// assert_eq!(slugify("Cold Kerach"), "cold-kerach");
/// assert_eq!(slugify("My  Cool  Persona!"), "my-cool-persona");
/// assert_eq!(slugify("---hello---world---"), "hello-world");
/// ```
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let trimmed_len = slug.trim_end_matches('-').len();
    slug.truncate(trimmed_len);
    slug
}

/// A personality registered on the platform.
///
/// The aggregate owns its identity, owner, profile, model config, and alias
/// set. It is the only place alias membership for the entity is mutated;
/// cross-aggregate alias uniqueness belongs to the registry. Profile and
/// model config are value objects replaced wholesale, never partially
/// mutated in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Personality {
    id: PersonalityId,
    owner: UserId,
    profile: PersonalityProfile,
    model: ModelConfig,
    aliases: BTreeSet<Alias>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Personality {
    /// Factory: validates identity, owner, and both value objects.
    ///
    /// Returns a new aggregate with an empty alias set. Aliases are added
    /// post-creation via [`add_alias`](Self::add_alias).
    pub fn create(
        id: &str,
        owner: &str,
        profile: PersonalityProfile,
        model: ModelConfig,
    ) -> Result<Self, PersonalityError> {
        let id = PersonalityId::new(id)?;
        let owner = UserId::new(owner)?;
        profile.validate()?;
        model.validate()?;

        let now = Utc::now();
        Ok(Self {
            id,
            owner,
            profile,
            model,
            aliases: BTreeSet::new(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Rehydrate a stored aggregate.
    ///
    /// Callers pass typed parts that were validated when first created;
    /// invariants are not re-checked here.
    pub fn restore(
        id: PersonalityId,
        owner: UserId,
        profile: PersonalityProfile,
        model: ModelConfig,
        aliases: BTreeSet<Alias>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            owner,
            profile,
            model,
            aliases,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> &PersonalityId {
        &self.id
    }

    pub fn owner(&self) -> &UserId {
        &self.owner
    }

    pub fn profile(&self) -> &PersonalityProfile {
        &self.profile
    }

    pub fn model(&self) -> &ModelConfig {
        &self.model
    }

    /// Current alias set, normalized and duplicate-free.
    pub fn aliases(&self) -> &BTreeSet<Alias> {
        &self.aliases
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Add a normalized alias to this personality's set.
    ///
    /// Idempotent: re-adding an alias already in the set returns `false`
    /// and leaves the aggregate untouched. Whether the alias is free across
    /// aggregates is checked by the registry, not here.
    pub fn add_alias(&mut self, alias: Alias) -> bool {
        let added = self.aliases.insert(alias);
        if added {
            self.touch();
        }
        added
    }

    /// Remove an alias if present. Returns `false` (no-op, not an error)
    /// when the alias was not in the set.
    pub fn remove_alias(&mut self, alias: &Alias) -> bool {
        let removed = self.aliases.remove(alias);
        if removed {
            self.touch();
        }
        removed
    }

    /// Swap the whole profile. The previous value is discarded.
    pub fn replace_profile(&mut self, profile: PersonalityProfile) {
        self.profile = profile;
        self.touch();
    }

    /// Swap the whole model config. The previous value is discarded.
    pub fn replace_model(&mut self, model: ModelConfig) {
        self.model = model;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Entity for Personality {
    type Id = PersonalityId;

    fn id(&self) -> &PersonalityId {
        &self.id
    }
}

impl PartialEq for Personality {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Personality {}

impl std::hash::Hash for Personality {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Request to create a new personality. Only `name` and `owner` are
/// required -- everything else gets platform defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePersonalityRequest {
    pub name: String,
    pub owner: String,
    pub system_prompt: Option<String>,
    pub prompt_path: Option<String>,
    pub token_budget: Option<u32>,
    pub model: Option<ModelConfig>,
    pub aliases: Option<Vec<String>>,
}
