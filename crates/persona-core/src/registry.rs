//! In-memory personality index with alias resolution.
//!
//! The registry is the process-wide authority mapping canonical personality
//! ids and user-chosen aliases to aggregates. It owns two maps -- id to
//! aggregate, normalized alias to id -- and is rebuilt from the repository
//! at startup, then mutated in lockstep with aggregate changes for the rest
//! of the process lifetime.
//!
//! Lookups and mutations on expected bad input (blank or unknown aliases)
//! return `None`/`false` rather than erroring: upstream mention parsers
//! routinely pass absent or malformed segments, and the resolution path
//! must never abort unrelated message processing.

use std::collections::HashMap;

use persona_types::alias::Alias;
use persona_types::personality::{Personality, PersonalityId};

/// Process-wide index of registered personalities.
///
/// Plain single-threaded structure: mutations take `&mut self` and no
/// internal locking is done. Shared use must wrap the whole registry in a
/// single lock so the id map and alias map always change atomically with
/// respect to readers -- an alias entry must never be observable without
/// its target aggregate (see `PersonalityService`).
#[derive(Debug, Default)]
pub struct PersonalityRegistry {
    personalities: HashMap<PersonalityId, Personality>,
    aliases: HashMap<Alias, PersonalityId>,
}

impl PersonalityRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an aggregate under its id.
    ///
    /// Upsert semantics: an existing aggregate under the same id is
    /// displaced and returned. The alias map is not touched -- aliases
    /// already pointing at the id now resolve to the new aggregate.
    pub fn register(&mut self, personality: Personality) -> Option<Personality> {
        self.personalities
            .insert(personality.id().clone(), personality)
    }

    /// Point `alias` at the personality registered under `id`.
    ///
    /// Returns `false` -- never errors -- when the alias is blank after
    /// normalization or when `id` is not registered. On success any prior
    /// owner of the alias is displaced (last-writer-wins) and `true` is
    /// returned.
    pub fn set_alias(&mut self, alias: &str, id: &PersonalityId) -> bool {
        let Ok(alias) = Alias::new(alias) else {
            return false;
        };
        if !self.personalities.contains_key(id) {
            return false;
        }
        self.aliases.insert(alias, id.clone());
        true
    }

    /// Drop an alias entry from the index.
    ///
    /// Returns `false` when the alias is blank or was not mapped. Does not
    /// touch any aggregate's own alias set.
    pub fn clear_alias(&mut self, alias: &str) -> bool {
        let Ok(alias) = Alias::new(alias) else {
            return false;
        };
        self.aliases.remove(&alias).is_some()
    }

    /// Resolve an alias to its aggregate.
    ///
    /// Blank and unmapped aliases resolve to `None`. An alias whose target
    /// id is no longer registered also resolves to `None`: explicit
    /// unregistration cleans its aliases eagerly, so a dangling entry only
    /// appears through out-of-band inconsistency, and tolerating it here
    /// keeps the resolution path total.
    pub fn get_by_alias(&self, alias: &str) -> Option<&Personality> {
        let alias = Alias::new(alias).ok()?;
        let id = self.aliases.get(&alias)?;
        let personality = self.personalities.get(id);
        if personality.is_none() {
            tracing::warn!(alias = %alias, id = %id, "alias points at unregistered personality");
        }
        personality
    }

    /// Null-safe mention resolution: absent input short-circuits to `None`.
    pub fn resolve(&self, alias: Option<&str>) -> Option<&Personality> {
        alias.and_then(|a| self.get_by_alias(a))
    }

    /// Direct lookup by canonical id.
    pub fn get_by_id(&self, id: &PersonalityId) -> Option<&Personality> {
        self.personalities.get(id)
    }

    /// Whether `id` is currently registered.
    pub fn contains(&self, id: &PersonalityId) -> bool {
        self.personalities.contains_key(id)
    }

    /// Which id an alias currently points at, without dereferencing it.
    pub fn alias_target(&self, alias: &str) -> Option<&PersonalityId> {
        let alias = Alias::new(alias).ok()?;
        self.aliases.get(&alias)
    }

    /// Remove an aggregate and every alias currently pointing at it.
    ///
    /// No dangling aliases survive explicit removal. Returns the removed
    /// aggregate, or `None` if `id` was not registered.
    pub fn unregister(&mut self, id: &PersonalityId) -> Option<Personality> {
        let removed = self.personalities.remove(id)?;
        self.aliases.retain(|_, target| target != id);
        Some(removed)
    }

    /// Number of registered personalities.
    pub fn len(&self) -> usize {
        self.personalities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.personalities.is_empty()
    }

    /// Number of live alias entries.
    pub fn alias_count(&self) -> usize {
        self.aliases.len()
    }

    /// Iterate over registered aggregates in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &Personality> {
        self.personalities.values()
    }
}
