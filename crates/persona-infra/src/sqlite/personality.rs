//! SQLite personality repository implementation.
//!
//! Implements `PersonalityRepository` from `persona-core` using sqlx with
//! split read/write pools. Value objects are flattened into columns; the
//! alias set is stored as a JSON array of normalized strings; timestamps
//! are RFC3339 text.

use chrono::{DateTime, Utc};
use sqlx::Row;

use persona_core::repository::SortOrder;
use persona_core::repository::personality::{PersonalityFilter, PersonalityRepository};
use persona_types::alias::Alias;
use persona_types::error::RepositoryError;
use persona_types::model::ModelConfig;
use persona_types::personality::{Personality, PersonalityId, UserId};
use persona_types::profile::PersonalityProfile;

use std::collections::BTreeSet;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `PersonalityRepository`.
pub struct SqlitePersonalityRepository {
    pool: DatabasePool,
}

impl SqlitePersonalityRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping SQLite rows to the domain aggregate.
struct PersonalityRow {
    id: String,
    owner_id: String,
    display_name: String,
    system_prompt: String,
    prompt_path: Option<String>,
    token_budget: i64,
    model: String,
    endpoint: String,
    max_tokens: i64,
    supports_images: bool,
    supports_audio: bool,
    aliases: String,
    created_at: String,
    updated_at: String,
}

impl PersonalityRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            owner_id: row.try_get("owner_id")?,
            display_name: row.try_get("display_name")?,
            system_prompt: row.try_get("system_prompt")?,
            prompt_path: row.try_get("prompt_path")?,
            token_budget: row.try_get("token_budget")?,
            model: row.try_get("model")?,
            endpoint: row.try_get("endpoint")?,
            max_tokens: row.try_get("max_tokens")?,
            supports_images: row.try_get("supports_images")?,
            supports_audio: row.try_get("supports_audio")?,
            aliases: row.try_get("aliases")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_personality(self) -> Result<Personality, RepositoryError> {
        let id = PersonalityId::new(&self.id)
            .map_err(|e| RepositoryError::Query(format!("invalid stored personality id: {e}")))?;
        let owner = UserId::new(&self.owner_id)
            .map_err(|e| RepositoryError::Query(format!("invalid stored owner id: {e}")))?;

        let token_budget = u32::try_from(self.token_budget)
            .map_err(|_| RepositoryError::Query("token_budget out of range".to_string()))?;
        let profile = PersonalityProfile::new(
            &self.display_name,
            &self.system_prompt,
            self.prompt_path,
            token_budget,
        )
        .map_err(|e| RepositoryError::Query(format!("invalid stored profile: {e}")))?;

        let max_tokens = u32::try_from(self.max_tokens)
            .map_err(|_| RepositoryError::Query("max_tokens out of range".to_string()))?;
        let model = ModelConfig::new(
            &self.model,
            &self.endpoint,
            max_tokens,
            self.supports_images,
            self.supports_audio,
        )
        .map_err(|e| RepositoryError::Query(format!("invalid stored model config: {e}")))?;

        let alias_strings: Vec<String> = serde_json::from_str(&self.aliases)
            .map_err(|e| RepositoryError::Query(format!("invalid aliases JSON: {e}")))?;
        let mut aliases = BTreeSet::new();
        for raw in &alias_strings {
            let alias = Alias::new(raw)
                .map_err(|e| RepositoryError::Query(format!("invalid stored alias: {e}")))?;
            aliases.insert(alias);
        }

        let created_at = parse_datetime(&self.created_at)?;
        let updated_at = parse_datetime(&self.updated_at)?;

        Ok(Personality::restore(
            id, owner, profile, model, aliases, created_at, updated_at,
        ))
    }
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

impl PersonalityRepository for SqlitePersonalityRepository {
    async fn save(&self, personality: &Personality) -> Result<(), RepositoryError> {
        let aliases_json = serde_json::to_string(personality.aliases())
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        sqlx::query(
            "INSERT INTO personalities (id, owner_id, display_name, system_prompt, prompt_path, token_budget, model, endpoint, max_tokens, supports_images, supports_audio, aliases, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                 owner_id = excluded.owner_id,
                 display_name = excluded.display_name,
                 system_prompt = excluded.system_prompt,
                 prompt_path = excluded.prompt_path,
                 token_budget = excluded.token_budget,
                 model = excluded.model,
                 endpoint = excluded.endpoint,
                 max_tokens = excluded.max_tokens,
                 supports_images = excluded.supports_images,
                 supports_audio = excluded.supports_audio,
                 aliases = excluded.aliases,
                 updated_at = excluded.updated_at",
        )
        .bind(personality.id().as_str())
        .bind(personality.owner().as_str())
        .bind(personality.profile().display_name())
        .bind(personality.profile().system_prompt())
        .bind(personality.profile().prompt_path())
        .bind(i64::from(personality.profile().token_budget()))
        .bind(personality.model().model())
        .bind(personality.model().endpoint())
        .bind(i64::from(personality.model().max_tokens()))
        .bind(personality.model().supports_images())
        .bind(personality.model().supports_audio())
        .bind(&aliases_json)
        .bind(format_datetime(&personality.created_at()))
        .bind(format_datetime(&personality.updated_at()))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }

    async fn get_by_id(&self, id: &PersonalityId) -> Result<Option<Personality>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM personalities WHERE id = ?")
            .bind(id.as_str())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let personality_row = PersonalityRow::from_row(&row)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(personality_row.into_personality()?))
            }
            None => Ok(None),
        }
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Personality>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM personalities WHERE display_name = ? LIMIT 1")
            .bind(name)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let personality_row = PersonalityRow::from_row(&row)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(personality_row.into_personality()?))
            }
            None => Ok(None),
        }
    }

    async fn list(
        &self,
        filter: Option<PersonalityFilter>,
    ) -> Result<Vec<Personality>, RepositoryError> {
        let filter = filter.unwrap_or_default();

        let mut sql = String::from("SELECT * FROM personalities");
        if filter.owner.is_some() {
            sql.push_str(" WHERE owner_id = ?");
        }

        // Whitelist sort fields to keep user input out of the SQL text.
        let sort_field = filter.sort_by.as_deref().unwrap_or("created_at");
        let safe_sort = match sort_field {
            "id" | "display_name" | "owner_id" | "created_at" | "updated_at" => sort_field,
            _ => "created_at",
        };
        let order = match filter.sort_order.unwrap_or_default() {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        };
        sql.push_str(&format!(" ORDER BY {safe_sort} {order}"));

        if let Some(limit) = filter.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }
        if let Some(offset) = filter.offset {
            sql.push_str(&format!(" OFFSET {offset}"));
        }

        let mut query = sqlx::query(&sql);
        if let Some(ref owner) = filter.owner {
            query = query.bind(owner.clone());
        }

        let rows = query
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut personalities = Vec::with_capacity(rows.len());
        for row in &rows {
            let personality_row =
                PersonalityRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            personalities.push(personality_row.into_personality()?);
        }

        Ok(personalities)
    }

    async fn delete(&self, id: &PersonalityId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM personalities WHERE id = ?")
            .bind(id.as_str())
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
