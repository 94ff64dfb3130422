//! DB Repository abstractions

use crate::core::fields::FieldValue;
use crate::infrastructure::database::DatabaseConnection;
use crate::infrastructure::entities::{Dream, NewDream, User};
use crate::infrastructure::traits::{DreamRepository, UserRepository};
use async_trait::async_trait;
use chrono::Utc;
use di::{Ref, injectable};

#[injectable(UserRepository)]
pub struct DbUserRepository {
    connection: Ref<DatabaseConnection>,
}

#[async_trait]
impl UserRepository for DbUserRepository {
    async fn find_by_telegram_id(&self, telegram_id: i64) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as("SELECT * FROM users WHERE telegram_id = ?")
            .bind(telegram_id)
            .fetch_optional(&**self.connection)
            .await
    }

    async fn upsert_language(
        &self,
        telegram_id: i64,
        language: &str,
    ) -> Result<User, sqlx::Error> {
        sqlx::query_as(
            "INSERT INTO users (telegram_id, language, created_at) VALUES (?, ?, ?)
             ON CONFLICT (telegram_id) DO UPDATE SET language = excluded.language
             RETURNING *",
        )
        .bind(telegram_id)
        .bind(language)
        .bind(Utc::now())
        .fetch_one(&**self.connection)
        .await
    }
}

#[injectable(DreamRepository)]
pub struct DbDreamRepository {
    connection: Ref<DatabaseConnection>,
}

#[async_trait]
impl DreamRepository for DbDreamRepository {
    async fn create(&self, dream: NewDream) -> Result<Dream, sqlx::Error> {
        sqlx::query_as(
            "INSERT INTO dreams (user_id, title, description, tags, notes, dream_date, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(dream.user_id)
        .bind(&dream.title)
        .bind(&dream.description)
        .bind(&dream.tags)
        .bind(&dream.notes)
        .bind(dream.dream_date)
        .bind(Utc::now())
        .fetch_one(&**self.connection)
        .await
    }

    async fn find_owned(&self, dream_id: i64, owner_id: i64) -> Result<Option<Dream>, sqlx::Error> {
        sqlx::query_as("SELECT * FROM dreams WHERE id = ? AND user_id = ?")
            .bind(dream_id)
            .bind(owner_id)
            .fetch_optional(&**self.connection)
            .await
    }

    async fn count(&self, owner_id: i64) -> Result<u32, sqlx::Error> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM dreams WHERE user_id = ?")
            .bind(owner_id)
            .fetch_one(&**self.connection)
            .await?;
        Ok(total as u32)
    }

    async fn list_page(
        &self,
        owner_id: i64,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<Dream>, sqlx::Error> {
        sqlx::query_as(
            "SELECT * FROM dreams WHERE user_id = ?
             ORDER BY dream_date DESC, id DESC
             LIMIT ? OFFSET ?",
        )
        .bind(owner_id)
        .bind(page_size as i64)
        .bind((page as i64) * (page_size as i64))
        .fetch_all(&**self.connection)
        .await
    }

    async fn list_all(&self, owner_id: i64) -> Result<Vec<Dream>, sqlx::Error> {
        sqlx::query_as(
            "SELECT * FROM dreams WHERE user_id = ? ORDER BY dream_date DESC, id DESC",
        )
        .bind(owner_id)
        .fetch_all(&**self.connection)
        .await
    }

    async fn search(
        &self,
        owner_id: i64,
        query: &str,
        limit: u32,
    ) -> Result<Vec<Dream>, sqlx::Error> {
        let needle = query.trim().to_lowercase();
        sqlx::query_as(
            "SELECT * FROM dreams
             WHERE user_id = ?1
               AND (instr(lower(title), ?2) > 0
                    OR instr(lower(description), ?2) > 0
                    OR instr(lower(tags), ?2) > 0
                    OR instr(lower(notes), ?2) > 0)
             ORDER BY dream_date DESC, id DESC
             LIMIT ?3",
        )
        .bind(owner_id)
        .bind(needle)
        .bind(limit as i64)
        .fetch_all(&**self.connection)
        .await
    }

    async fn update_field(
        &self,
        dream_id: i64,
        owner_id: i64,
        value: &FieldValue,
    ) -> Result<bool, sqlx::Error> {
        let query = match value {
            FieldValue::Title(title) => {
                sqlx::query("UPDATE dreams SET title = ? WHERE id = ? AND user_id = ?")
                    .bind(title.as_str())
            }
            FieldValue::Description(description) => {
                sqlx::query("UPDATE dreams SET description = ? WHERE id = ? AND user_id = ?")
                    .bind(description.as_str())
            }
            FieldValue::Tags(tags) => {
                sqlx::query("UPDATE dreams SET tags = ? WHERE id = ? AND user_id = ?")
                    .bind(tags.as_str())
            }
            FieldValue::Notes(notes) => {
                sqlx::query("UPDATE dreams SET notes = ? WHERE id = ? AND user_id = ?")
                    .bind(notes.as_str())
            }
            FieldValue::DreamDate(date) => {
                sqlx::query("UPDATE dreams SET dream_date = ? WHERE id = ? AND user_id = ?")
                    .bind(*date)
            }
        };

        let result = query
            .bind(dream_id)
            .bind(owner_id)
            .execute(&**self.connection)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, dream_id: i64, owner_id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM dreams WHERE id = ? AND user_id = ?")
            .bind(dream_id)
            .bind(owner_id)
            .execute(&**self.connection)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
