//! Personality repository trait definition.

use persona_types::error::RepositoryError;
use persona_types::personality::{Personality, PersonalityId};

use super::SortOrder;

/// Filter criteria for listing personalities.
#[derive(Debug, Clone, Default)]
pub struct PersonalityFilter {
    /// Restrict to personalities owned by this user.
    pub owner: Option<String>,
    /// Field to sort by (e.g., "created_at", "display_name").
    pub sort_by: Option<String>,
    /// Sort direction.
    pub sort_order: Option<SortOrder>,
    /// Maximum number of results.
    pub limit: Option<i64>,
    /// Number of results to skip (offset pagination).
    pub offset: Option<i64>,
}

/// Repository trait for personality persistence.
///
/// Implementations live in persona-infra (e.g., SqlitePersonalityRepository).
/// Uses native async fn in traits (Rust 2024 edition, no async_trait macro).
/// Operations fail with `RepositoryError` on IO failure and are never
/// retried here; the caller decides on retry or user-facing failure.
pub trait PersonalityRepository: Send + Sync {
    /// Insert or update a personality (upsert by id).
    fn save(
        &self,
        personality: &Personality,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Get a personality by its unique id.
    fn get_by_id(
        &self,
        id: &PersonalityId,
    ) -> impl std::future::Future<Output = Result<Option<Personality>, RepositoryError>> + Send;

    /// Look up a personality by its display name.
    fn find_by_name(
        &self,
        name: &str,
    ) -> impl std::future::Future<Output = Result<Option<Personality>, RepositoryError>> + Send;

    /// List personalities with optional filtering, sorting, and pagination.
    fn list(
        &self,
        filter: Option<PersonalityFilter>,
    ) -> impl std::future::Future<Output = Result<Vec<Personality>, RepositoryError>> + Send;

    /// Permanently delete a personality by id.
    fn delete(
        &self,
        id: &PersonalityId,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
