//! Infrastructure traits, used for DI on higher levels

use crate::core::fields::FieldValue;
use crate::infrastructure::entities;
use async_trait::async_trait;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_telegram_id(
        &self,
        telegram_id: i64,
    ) -> Result<Option<entities::User>, sqlx::Error>;

    /// Creates the user on first contact, or updates the stored language.
    async fn upsert_language(
        &self,
        telegram_id: i64,
        language: &str,
    ) -> Result<entities::User, sqlx::Error>;
}

#[async_trait]
pub trait DreamRepository: Send + Sync {
    async fn create(&self, dream: entities::NewDream) -> Result<entities::Dream, sqlx::Error>;

    /// Returns the dream only when both the id and the owner match.
    async fn find_owned(
        &self,
        dream_id: i64,
        owner_id: i64,
    ) -> Result<Option<entities::Dream>, sqlx::Error>;

    async fn count(&self, owner_id: i64) -> Result<u32, sqlx::Error>;

    /// One page of the owner's dreams, newest dream date first, ties broken
    /// by id descending. `page` is zero-based.
    async fn list_page(
        &self,
        owner_id: i64,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<entities::Dream>, sqlx::Error>;

    async fn list_all(&self, owner_id: i64) -> Result<Vec<entities::Dream>, sqlx::Error>;

    /// Case-insensitive substring match over title, description, tags, and
    /// notes; same ordering as listing; at most `limit` rows.
    async fn search(
        &self,
        owner_id: i64,
        query: &str,
        limit: u32,
    ) -> Result<Vec<entities::Dream>, sqlx::Error>;

    /// Writes a single validated field. Returns `false` when no owned row
    /// matched (foreign id, or deleted concurrently).
    async fn update_field(
        &self,
        dream_id: i64,
        owner_id: i64,
        value: &FieldValue,
    ) -> Result<bool, sqlx::Error>;

    /// Returns `false` when the row was already gone.
    async fn delete(&self, dream_id: i64, owner_id: i64) -> Result<bool, sqlx::Error>;
}
