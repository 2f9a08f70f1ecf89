use serde::{Deserialize, Serialize};

use crate::catalog::{poster_url, CatalogItem, MovieDetail, MovieList, Page};
use crate::db::FavoriteRecord;
use crate::feed::{Decision, DragVisual, FeedState};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieDto {
    pub id: i64,
    pub title: String,
    pub poster_url: Option<String>,
    pub rating: f64,
    pub overview: String,
    pub release_date: Option<String>,
}

impl MovieDto {
    pub fn from_item(item: &CatalogItem, image_base: &str) -> Self {
        Self {
            id: item.id,
            title: item.title.clone(),
            poster_url: poster_url(image_base, item.poster_path.as_deref()),
            rating: item.score,
            overview: item.summary.clone(),
            release_date: item.release_date.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoviePageDto {
    pub movies: Vec<MovieDto>,
    pub total_pages: u32,
    pub current_page: u32,
}

impl MoviePageDto {
    pub fn from_page(page: &Page, image_base: &str) -> Self {
        Self {
            movies: page
                .items
                .iter()
                .map(|m| MovieDto::from_item(m, image_base))
                .collect(),
            total_pages: page.total_pages,
            current_page: page.page_number,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieDetailDto {
    #[serde(flatten)]
    pub movie: MovieDto,
    pub runtime: Option<u32>,
    pub genres: Vec<String>,
    pub production_companies: Vec<String>,
}

impl MovieDetailDto {
    pub fn from_detail(detail: &MovieDetail, image_base: &str) -> Self {
        Self {
            movie: MovieDto::from_item(&detail.item, image_base),
            runtime: detail.runtime,
            genres: detail.genres.clone(),
            production_companies: detail.production_companies.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteDto {
    pub movie_id: i64,
    pub movie_title: String,
    pub poster_url: Option<String>,
    pub rating: f64,
    pub overview: String,
    pub added_at: String,
}

impl FavoriteDto {
    pub fn from_record(record: &FavoriteRecord, image_base: &str) -> Self {
        Self {
            movie_id: record.item_id,
            movie_title: record.title.clone(),
            poster_url: poster_url(image_base, record.poster_path.as_deref()),
            rating: record.score,
            overview: record.summary.clone(),
            added_at: record.added_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddFavoriteRequest {
    pub movie_id: i64,
    pub movie_title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    pub rating: f64,
    #[serde(default)]
    pub overview: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoritedResponse {
    pub favorited: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchQuery {
    pub query: String,
    pub page: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionRequest {
    pub decision: Decision,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DragPhase {
    Start,
    Move,
    End,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DragRequest {
    pub phase: DragPhase,
    #[serde(default)]
    pub x: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedView {
    pub session: String,
    pub list: MovieList,
    pub state: FeedState,
    pub movie: Option<MovieDto>,
    pub page: u32,
    pub total_pages: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragResponse {
    pub visual: DragVisual,
    pub decision: Option<Decision>,
    pub feed: FeedView,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub retryable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<String>,
}
