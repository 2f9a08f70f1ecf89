pub mod tmdb;
pub mod types;

use async_trait::async_trait;

pub use tmdb::TmdbClient;
pub use types::*;

/// The external movie database the feed pages through.
#[async_trait]
pub trait Catalog: Send + Sync {
    async fn fetch_page(&self, list: MovieList, page: u32) -> CatalogResult<Page>;
    async fn search(&self, query: &str, page: u32) -> CatalogResult<Page>;
    async fn movie_details(&self, id: i64) -> CatalogResult<MovieDetail>;
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("TMDB API key is not configured")]
    MissingCredential,
    #[error("TMDB API error: {status} {reason}")]
    Upstream { status: u16, reason: String },
    #[error("Movie not found: {0}")]
    NotFound(i64),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl CatalogError {
    /// Whether asking again later can succeed. A missing credential never will.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, CatalogError::MissingCredential | CatalogError::NotFound(_))
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;
