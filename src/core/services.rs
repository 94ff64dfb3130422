//! Implementations for the services the app needs.
//!

use crate::config::BotConfig;
use crate::core::fields::{DreamDraft, FieldValue};
use crate::core::traits::{DreamPage, DreamService, SearchResults};
use crate::infrastructure::entities::{Dream, NewDream, User};
use crate::infrastructure::traits::{DreamRepository, UserRepository};
use async_trait::async_trait;
use chrono::NaiveDate;
use di::{Ref, injectable};

/// Search replies never show more than this many dreams.
pub const SEARCH_RESULT_CAP: usize = 20;

#[injectable(DreamService)]
pub struct MyDreamService {
    users: Ref<dyn UserRepository>,
    dreams: Ref<dyn DreamRepository>,
    config: Ref<BotConfig>,
}

#[async_trait]
impl DreamService for MyDreamService {
    async fn identify(&self, telegram_id: i64) -> anyhow::Result<Option<User>> {
        Ok(self.users.find_by_telegram_id(telegram_id).await?)
    }

    async fn set_language(&self, telegram_id: i64, language: &str) -> anyhow::Result<User> {
        Ok(self.users.upsert_language(telegram_id, language).await?)
    }

    async fn create_dream(
        &self,
        owner_id: i64,
        draft: DreamDraft,
        dream_date: NaiveDate,
    ) -> anyhow::Result<Dream> {
        let dream = self
            .dreams
            .create(NewDream {
                user_id: owner_id,
                title: draft.title,
                description: draft.description,
                tags: draft.tags,
                notes: draft.notes,
                dream_date,
            })
            .await?;
        Ok(dream)
    }

    async fn find_dream(&self, dream_id: i64, owner_id: i64) -> anyhow::Result<Option<Dream>> {
        Ok(self.dreams.find_owned(dream_id, owner_id).await?)
    }

    async fn dream_page(&self, owner_id: i64, page: u32) -> anyhow::Result<DreamPage> {
        let total = self.dreams.count(owner_id).await?;
        if total == 0 {
            return Ok(DreamPage {
                dreams: Vec::new(),
                page: 0,
                total_pages: 0,
                total: 0,
            });
        }

        let page_size = self.config.dreams_per_page.max(1);
        let total_pages = total.div_ceil(page_size);
        // A stale pagination keyboard can still ask for a page past the end.
        let page = page.min(total_pages - 1);
        let dreams = self.dreams.list_page(owner_id, page, page_size).await?;

        Ok(DreamPage {
            dreams,
            page,
            total_pages,
            total,
        })
    }

    async fn search_dreams(&self, owner_id: i64, query: &str) -> anyhow::Result<SearchResults> {
        // One extra row tells truncation apart from an exactly-full page.
        let mut dreams = self
            .dreams
            .search(owner_id, query, (SEARCH_RESULT_CAP + 1) as u32)
            .await?;
        let truncated = dreams.len() > SEARCH_RESULT_CAP;
        dreams.truncate(SEARCH_RESULT_CAP);
        Ok(SearchResults { dreams, truncated })
    }

    async fn all_dreams(&self, owner_id: i64) -> anyhow::Result<Vec<Dream>> {
        Ok(self.dreams.list_all(owner_id).await?)
    }

    async fn edit_dream(
        &self,
        dream_id: i64,
        owner_id: i64,
        value: &FieldValue,
    ) -> anyhow::Result<bool> {
        Ok(self.dreams.update_field(dream_id, owner_id, value).await?)
    }

    async fn delete_dream(&self, dream_id: i64, owner_id: i64) -> anyhow::Result<bool> {
        Ok(self.dreams.delete(dream_id, owner_id).await?)
    }
}
