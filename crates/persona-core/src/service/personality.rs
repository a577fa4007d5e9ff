//! Personality lifecycle service.
//!
//! Orchestrates creation, alias management, resolution, and deletion,
//! keeping the in-memory registry and the repository in lockstep. The
//! registry sits behind a single `RwLock` covering both of its maps, so an
//! alias entry is never observable without its target aggregate. Storage
//! writes happen before the registry commits, so a failed save leaves the
//! in-memory state untouched.

use tokio::sync::RwLock;
use tracing::{debug, info};

use persona_types::alias::Alias;
use persona_types::config::PlatformConfig;
use persona_types::error::{PersonalityError, RepositoryError};
use persona_types::model::ModelConfig;
use persona_types::personality::{CreatePersonalityRequest, Personality, PersonalityId};
use persona_types::profile::PersonalityProfile;
use persona_types::value::ValueObject;

use crate::registry::PersonalityRegistry;
use crate::repository::personality::{PersonalityFilter, PersonalityRepository};

/// System prompt for a personality that does not bring its own.
fn default_system_prompt(name: &str) -> String {
    format!(
        "You are {name}, one of several personalities on this server. \
         Stay in character and answer in the voice described by your profile."
    )
}

fn storage_err(e: RepositoryError) -> PersonalityError {
    PersonalityError::Storage(e.to_string())
}

/// Derive an id that is free in the registry, suffixing -2, -3, ... when
/// the base slug is taken.
fn ensure_unique_id(
    registry: &PersonalityRegistry,
    base: &PersonalityId,
) -> Result<PersonalityId, PersonalityError> {
    if !registry.contains(base) {
        return Ok(base.clone());
    }
    for counter in 2..=100u32 {
        let candidate = PersonalityId::new(&format!("{base}-{counter}"))?;
        if !registry.contains(&candidate) {
            return Ok(candidate);
        }
    }
    // Safety valve: prevent unbounded probing
    Err(PersonalityError::InvalidId(format!(
        "could not derive a unique id from '{base}'"
    )))
}

/// Service orchestrating the full personality lifecycle.
///
/// Generic over the repository trait -- persona-core never depends on
/// persona-infra.
pub struct PersonalityService<R: PersonalityRepository> {
    repo: R,
    config: PlatformConfig,
    registry: RwLock<PersonalityRegistry>,
}

impl<R: PersonalityRepository> PersonalityService<R> {
    /// Create a service with an empty registry.
    ///
    /// Call [`load`](Self::load) before trusting lookups.
    pub fn new(repo: R, config: PlatformConfig) -> Self {
        Self {
            repo,
            config,
            registry: RwLock::new(PersonalityRegistry::new()),
        }
    }

    /// Rebuild the registry from storage.
    ///
    /// Initialization order: repository load, then registry populate, then
    /// ready for lookups. Returns the number of personalities loaded.
    pub async fn load(&self) -> Result<usize, PersonalityError> {
        let stored = self.repo.list(None).await.map_err(storage_err)?;

        let mut registry = self.registry.write().await;
        for personality in stored {
            let id = personality.id().clone();
            let aliases: Vec<Alias> = personality.aliases().iter().cloned().collect();
            registry.register(personality);
            for alias in aliases {
                registry.set_alias(alias.as_str(), &id);
            }
        }
        let count = registry.len();
        info!(count, "personality registry loaded");
        Ok(count)
    }

    /// Create a new personality from a request.
    ///
    /// Derives a unique slug id from the name, fills profile and model
    /// settings from platform defaults where the request omits them, and
    /// indexes any requested aliases. Alias text that fails normalization
    /// is skipped rather than failing the creation.
    pub async fn create_personality(
        &self,
        request: CreatePersonalityRequest,
    ) -> Result<Personality, PersonalityError> {
        let name = request.name.trim().to_string();
        if name.is_empty() {
            return Err(PersonalityError::InvalidDisplayName(
                "name cannot be empty".to_string(),
            ));
        }
        let base = PersonalityId::from_display_name(&name)?;

        let system_prompt = request
            .system_prompt
            .unwrap_or_else(|| default_system_prompt(&name));
        let profile = PersonalityProfile::new(
            &name,
            &system_prompt,
            request.prompt_path,
            request
                .token_budget
                .unwrap_or(self.config.default_token_budget),
        )?;
        let model = match request.model {
            Some(model) => {
                model.validate()?;
                model
            }
            None => self.config.default_model.to_model_config()?,
        };

        let mut registry = self.registry.write().await;
        let id = ensure_unique_id(&registry, &base)?;
        let mut personality = Personality::create(id.as_str(), &request.owner, profile, model)?;

        for raw in request.aliases.unwrap_or_default() {
            match Alias::new(&raw) {
                Ok(alias) => {
                    personality.add_alias(alias);
                }
                Err(_) => debug!(alias = %raw, "skipping alias that failed normalization"),
            }
        }

        self.repo.save(&personality).await.map_err(storage_err)?;

        registry.register(personality.clone());
        for alias in personality.aliases() {
            registry.set_alias(alias.as_str(), personality.id());
        }
        info!(id = %personality.id(), "personality created");
        Ok(personality)
    }

    /// Point an alias at a registered personality.
    ///
    /// Returns `Ok(false)` for alias text that fails normalization or an
    /// unknown id; neither is an error on this path. On success the alias
    /// set of a displaced previous owner is updated too, and every touched
    /// aggregate is persisted.
    pub async fn set_alias(
        &self,
        id: &PersonalityId,
        alias: &str,
    ) -> Result<bool, PersonalityError> {
        let Ok(normalized) = Alias::new(alias) else {
            return Ok(false);
        };

        let mut registry = self.registry.write().await;
        let Some(current) = registry.get_by_id(id) else {
            return Ok(false);
        };

        let mut updated = current.clone();
        updated.add_alias(normalized.clone());

        // A displaced previous owner loses the alias from its own set too.
        let displaced = registry
            .alias_target(normalized.as_str())
            .filter(|prev| *prev != id)
            .and_then(|prev| registry.get_by_id(prev))
            .cloned()
            .map(|mut prev| {
                prev.remove_alias(&normalized);
                prev
            });

        self.repo.save(&updated).await.map_err(storage_err)?;
        if let Some(ref prev) = displaced {
            self.repo.save(prev).await.map_err(storage_err)?;
        }

        registry.register(updated);
        if let Some(prev) = displaced {
            registry.register(prev);
        }
        registry.set_alias(normalized.as_str(), id);
        debug!(alias = %normalized, id = %id, "alias set");
        Ok(true)
    }

    /// Remove an alias from a personality.
    ///
    /// Returns `Ok(false)` when the alias text fails normalization or was
    /// not on this personality. Removing an alias never destroys the
    /// aggregate.
    pub async fn remove_alias(
        &self,
        id: &PersonalityId,
        alias: &str,
    ) -> Result<bool, PersonalityError> {
        let Ok(normalized) = Alias::new(alias) else {
            return Ok(false);
        };

        let mut registry = self.registry.write().await;
        let Some(current) = registry.get_by_id(id) else {
            return Ok(false);
        };
        if !current.aliases().contains(&normalized) {
            return Ok(false);
        }

        let mut updated = current.clone();
        updated.remove_alias(&normalized);

        self.repo.save(&updated).await.map_err(storage_err)?;

        registry.register(updated);
        // Drop the index entry only while it still points at this id.
        if registry.alias_target(normalized.as_str()) == Some(id) {
            registry.clear_alias(normalized.as_str());
        }
        debug!(alias = %normalized, id = %id, "alias removed");
        Ok(true)
    }

    /// Resolve an optional mention to a personality, cloning it out.
    ///
    /// The hot path of the mention parser: never errors, never touches
    /// storage.
    pub async fn resolve(&self, mention: Option<&str>) -> Option<Personality> {
        self.registry.read().await.resolve(mention).cloned()
    }

    /// Get a personality by id from the registry.
    pub async fn get(&self, id: &PersonalityId) -> Option<Personality> {
        self.registry.read().await.get_by_id(id).cloned()
    }

    /// All registered personalities, unordered.
    pub async fn list(&self) -> Vec<Personality> {
        self.registry.read().await.iter().cloned().collect()
    }

    /// Storage-backed lookup by display name.
    pub async fn find_by_name(
        &self,
        name: &str,
    ) -> Result<Option<Personality>, PersonalityError> {
        self.repo.find_by_name(name).await.map_err(storage_err)
    }

    /// List from storage with filtering, sorting, and pagination.
    pub async fn list_stored(
        &self,
        filter: Option<PersonalityFilter>,
    ) -> Result<Vec<Personality>, PersonalityError> {
        self.repo.list(filter).await.map_err(storage_err)
    }

    /// Replace a personality's profile wholesale.
    pub async fn update_profile(
        &self,
        id: &PersonalityId,
        profile: PersonalityProfile,
    ) -> Result<Personality, PersonalityError> {
        profile.validate()?;

        let mut registry = self.registry.write().await;
        let Some(current) = registry.get_by_id(id) else {
            return Err(PersonalityError::NotFound);
        };
        let mut updated = current.clone();
        updated.replace_profile(profile);

        self.repo.save(&updated).await.map_err(storage_err)?;
        registry.register(updated.clone());
        Ok(updated)
    }

    /// Replace a personality's model config wholesale.
    pub async fn update_model(
        &self,
        id: &PersonalityId,
        model: ModelConfig,
    ) -> Result<Personality, PersonalityError> {
        model.validate()?;

        let mut registry = self.registry.write().await;
        let Some(current) = registry.get_by_id(id) else {
            return Err(PersonalityError::NotFound);
        };
        let mut updated = current.clone();
        updated.replace_model(model);

        self.repo.save(&updated).await.map_err(storage_err)?;
        registry.register(updated.clone());
        Ok(updated)
    }

    /// Delete a personality: storage first, then registry unregister, which
    /// also drops every alias pointing at it.
    pub async fn delete_personality(&self, id: &PersonalityId) -> Result<(), PersonalityError> {
        let mut registry = self.registry.write().await;
        if !registry.contains(id) {
            return Err(PersonalityError::NotFound);
        }

        self.repo.delete(id).await.map_err(|e| match e {
            RepositoryError::NotFound => PersonalityError::NotFound,
            other => storage_err(other),
        })?;

        registry.unregister(id);
        info!(id = %id, "personality deleted");
        Ok(())
    }
}
