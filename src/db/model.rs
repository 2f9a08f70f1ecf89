use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::CatalogItem;

/// Identity whose favorites are read or written. There is no login, so
/// the server uses the configured guest owner.
pub type OwnerId = i64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteRecord {
    pub owner_id: OwnerId,
    pub item_id: i64,
    pub title: String,
    pub poster_path: Option<String>,
    pub score: f64,
    pub summary: String,
    pub added_at: DateTime<Utc>,
}

impl FavoriteRecord {
    pub fn from_item(owner_id: OwnerId, item: &CatalogItem) -> Self {
        Self {
            owner_id,
            item_id: item.id,
            title: item.title.clone(),
            poster_path: item.poster_path.clone(),
            score: item.score,
            summary: item.summary.clone(),
            added_at: Utc::now(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("Invalid record: {0}")]
    Invalid(String),
}

pub type DbResult<T> = Result<T, DbError>;
