use async_trait::async_trait;

use super::model::*;

/// Per-owner favorites storage. Implementations serialize their own writes.
#[async_trait]
pub trait FavoritesRepo: Send + Sync {
    /// Store a favorite. A second put for the same `(owner, item_id)` is a no-op.
    async fn put(&self, owner: OwnerId, record: &FavoriteRecord) -> DbResult<()>;
    async fn remove(&self, owner: OwnerId, item_id: i64) -> DbResult<()>;
    /// All favorites of `owner`, oldest first.
    async fn list(&self, owner: OwnerId) -> DbResult<Vec<FavoriteRecord>>;
    async fn exists(&self, owner: OwnerId, item_id: i64) -> DbResult<bool>;
}
