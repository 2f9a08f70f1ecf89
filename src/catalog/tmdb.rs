use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::types::*;
use super::{Catalog, CatalogError, CatalogResult};
use crate::config::TmdbConfig;

pub struct TmdbClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl TmdbClient {
    pub fn new(config: &TmdbConfig) -> CatalogResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let api_key = config.api_key.clone().filter(|k| !k.is_empty());
        if api_key.is_none() {
            warn!("No TMDB API key configured, catalog requests will fail");
        }

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    async fn request<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> CatalogResult<T> {
        let api_key = self.api_key.as_deref().ok_or(CatalogError::MissingCredential)?;

        let url = format!("{}{}", self.base_url, endpoint);
        debug!(url = %url, "TMDB request");

        let response = self
            .http
            .get(&url)
            .query(&[("api_key", api_key)])
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Upstream {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl Catalog for TmdbClient {
    async fn fetch_page(&self, list: MovieList, page: u32) -> CatalogResult<Page> {
        let endpoint = format!("/movie/{}", list.as_str());
        let resp: TmdbResponse = self
            .request(&endpoint, &[("page", page.max(1).to_string())])
            .await?;
        Ok(resp.into())
    }

    async fn search(&self, query: &str, page: u32) -> CatalogResult<Page> {
        let resp: TmdbResponse = self
            .request(
                "/search/movie",
                &[("query", query.to_string()), ("page", page.max(1).to_string())],
            )
            .await?;
        Ok(resp.into())
    }

    async fn movie_details(&self, id: i64) -> CatalogResult<MovieDetail> {
        let detail: TmdbMovieDetail = self
            .request(&format!("/movie/{}", id), &[])
            .await
            .map_err(|e| match e {
                CatalogError::Upstream { status: 404, .. } => CatalogError::NotFound(id),
                e => e,
            })?;
        Ok(detail.into())
    }
}
