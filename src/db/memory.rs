use async_trait::async_trait;
use tokio::sync::RwLock;

use super::model::*;
use super::repo::*;

/// Favorites kept in process memory, used when no database is configured.
/// Records are kept in insertion order.
#[derive(Default)]
pub struct MemoryRepository {
    records: RwLock<Vec<FavoriteRecord>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FavoritesRepo for MemoryRepository {
    async fn put(&self, owner: OwnerId, record: &FavoriteRecord) -> DbResult<()> {
        if record.owner_id != owner {
            return Err(DbError::Invalid(format!(
                "record for owner {} stored under owner {}",
                record.owner_id, owner
            )));
        }

        let mut records = self.records.write().await;
        if !records
            .iter()
            .any(|r| r.owner_id == owner && r.item_id == record.item_id)
        {
            records.push(record.clone());
        }
        Ok(())
    }

    async fn remove(&self, owner: OwnerId, item_id: i64) -> DbResult<()> {
        let mut records = self.records.write().await;
        records.retain(|r| !(r.owner_id == owner && r.item_id == item_id));
        Ok(())
    }

    async fn list(&self, owner: OwnerId) -> DbResult<Vec<FavoriteRecord>> {
        let records = self.records.read().await;
        let mut list: Vec<FavoriteRecord> = records
            .iter()
            .filter(|r| r.owner_id == owner)
            .cloned()
            .collect();
        // Stable sort, so equal timestamps stay in insertion order.
        list.sort_by_key(|r| r.added_at);
        Ok(list)
    }

    async fn exists(&self, owner: OwnerId, item_id: i64) -> DbResult<bool> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .any(|r| r.owner_id == owner && r.item_id == item_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn record(owner: OwnerId, item_id: i64) -> FavoriteRecord {
        FavoriteRecord {
            owner_id: owner,
            item_id,
            title: format!("Movie {}", item_id),
            poster_path: None,
            score: 6.0,
            summary: String::new(),
            added_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_put_is_idempotent() {
        let repo = MemoryRepository::new();
        repo.put(1, &record(1, 7)).await.unwrap();
        repo.put(1, &record(1, 7)).await.unwrap();
        assert_eq!(repo.list(1).await.unwrap().len(), 1);
        assert!(repo.exists(1, 7).await.unwrap());
    }

    #[tokio::test]
    async fn test_remove_then_exists() {
        let repo = MemoryRepository::new();
        repo.put(1, &record(1, 7)).await.unwrap();
        repo.remove(1, 7).await.unwrap();
        assert!(!repo.exists(1, 7).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_sorted_and_isolated() {
        let repo = MemoryRepository::new();
        let mut newer = record(1, 1);
        newer.added_at = Utc::now();
        let mut older = record(1, 2);
        older.added_at = newer.added_at - Duration::minutes(5);

        repo.put(1, &newer).await.unwrap();
        repo.put(1, &older).await.unwrap();
        repo.put(2, &record(2, 3)).await.unwrap();

        let ids: Vec<i64> = repo.list(1).await.unwrap().iter().map(|r| r.item_id).collect();
        assert_eq!(ids, vec![2, 1]);
        assert!(!repo.exists(2, 1).await.unwrap());
        assert!(!repo.exists(1, 3).await.unwrap());
    }
}
