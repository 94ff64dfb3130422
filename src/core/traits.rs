//! DI "Interfaces"

use crate::core::fields::{DreamDraft, FieldValue};
use crate::infrastructure::entities;
use async_trait::async_trait;
use chrono::NaiveDate;

/// One page of a user's diary.
#[derive(Debug)]
pub struct DreamPage {
    pub dreams: Vec<entities::Dream>,
    /// Zero-based, clamped to the last page.
    pub page: u32,
    pub total_pages: u32,
    pub total: u32,
}

#[derive(Debug)]
pub struct SearchResults {
    pub dreams: Vec<entities::Dream>,
    /// More matches exist beyond the result cap.
    pub truncated: bool,
}

#[async_trait]
pub trait DreamService: Send + Sync {
    /// Looks the sender up by their chat identity.
    ///
    /// Returns `None` for senders that never picked a language; handlers
    /// turn that into a "register first" notice.
    async fn identify(&self, telegram_id: i64) -> anyhow::Result<Option<entities::User>>;

    /// Registers the sender on first contact, or changes their language.
    async fn set_language(
        &self,
        telegram_id: i64,
        language: &str,
    ) -> anyhow::Result<entities::User>;

    /// Persists a completed new-dream draft under the owner's id.
    async fn create_dream(
        &self,
        owner_id: i64,
        draft: DreamDraft,
        dream_date: NaiveDate,
    ) -> anyhow::Result<entities::Dream>;

    /// Returns the dream only if it exists and belongs to the owner.
    async fn find_dream(
        &self,
        dream_id: i64,
        owner_id: i64,
    ) -> anyhow::Result<Option<entities::Dream>>;

    async fn dream_page(&self, owner_id: i64, page: u32) -> anyhow::Result<DreamPage>;

    /// Case-insensitive substring search, capped with a truncation flag.
    async fn search_dreams(&self, owner_id: i64, query: &str) -> anyhow::Result<SearchResults>;

    /// All of the owner's dreams, newest first, for the export document.
    async fn all_dreams(&self, owner_id: i64) -> anyhow::Result<Vec<entities::Dream>>;

    /// Writes one validated field. `false` means the dream is gone or
    /// belongs to somebody else.
    async fn edit_dream(
        &self,
        dream_id: i64,
        owner_id: i64,
        value: &FieldValue,
    ) -> anyhow::Result<bool>;

    /// `false` means the dream was already gone.
    async fn delete_dream(&self, dream_id: i64, owner_id: i64) -> anyhow::Result<bool>;
}
