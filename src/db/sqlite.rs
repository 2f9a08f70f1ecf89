use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::{info, warn};

use super::model::*;
use super::repo::*;

type FavoriteRow = (i64, i64, String, Option<String>, f64, String, String);

pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    pub async fn new(db_path: &str) -> DbResult<Self> {
        let options = SqliteConnectOptions::from_str(db_path)?.create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        let repo = Self { pool };

        repo.init_schema().await?;

        info!("Database initialized at {}", db_path);

        Ok(repo)
    }

    async fn init_schema(&self) -> DbResult<()> {
        let schema = include_str!("schema.sql");
        sqlx::raw_sql(schema).execute(&self.pool).await?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn row_to_record(row: FavoriteRow) -> FavoriteRecord {
    let added_at = DateTime::parse_from_rfc3339(&row.6)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|e| {
            warn!("Bad addedat {:?} for item {}: {}", row.6, row.1, e);
            DateTime::<Utc>::default()
        });

    FavoriteRecord {
        owner_id: row.0,
        item_id: row.1,
        title: row.2,
        poster_path: row.3,
        score: row.4,
        summary: row.5,
        added_at,
    }
}

#[async_trait]
impl FavoritesRepo for SqliteRepository {
    async fn put(&self, owner: OwnerId, record: &FavoriteRecord) -> DbResult<()> {
        if record.owner_id != owner {
            return Err(DbError::Invalid(format!(
                "record for owner {} stored under owner {}",
                record.owner_id, owner
            )));
        }

        // Fixed-width timestamps keep ORDER BY addedat chronological.
        sqlx::query(
            "INSERT OR IGNORE INTO favorites
            (ownerid, itemid, title, posterpath, score, summary, addedat)
            VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(owner)
        .bind(record.item_id)
        .bind(&record.title)
        .bind(&record.poster_path)
        .bind(record.score)
        .bind(&record.summary)
        .bind(record.added_at.to_rfc3339_opts(SecondsFormat::Micros, true))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn remove(&self, owner: OwnerId, item_id: i64) -> DbResult<()> {
        sqlx::query("DELETE FROM favorites WHERE ownerid = ? AND itemid = ?")
            .bind(owner)
            .bind(item_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list(&self, owner: OwnerId) -> DbResult<Vec<FavoriteRecord>> {
        let rows = sqlx::query_as::<_, FavoriteRow>(
            "SELECT ownerid, itemid, title, posterpath, score, summary, addedat
             FROM favorites WHERE ownerid = ?
             ORDER BY addedat, rowid",
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(row_to_record).collect())
    }

    async fn exists(&self, owner: OwnerId, item_id: i64) -> DbResult<bool> {
        let row = sqlx::query_as::<_, (i64,)>(
            "SELECT 1 FROM favorites WHERE ownerid = ? AND itemid = ? LIMIT 1",
        )
        .bind(owner)
        .bind(item_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.is_some())
    }
}
