//! Database entities

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub telegram_id: i64,
    pub language: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct Dream {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: String,
    pub tags: String,
    pub notes: String,
    pub dream_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Field set for inserting a dream; id and creation timestamp come from the store.
#[derive(Debug, Clone)]
pub struct NewDream {
    pub user_id: i64,
    pub title: String,
    pub description: String,
    pub tags: String,
    pub notes: String,
    pub dream_date: NaiveDate,
}
