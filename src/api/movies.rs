use axum::{
    extract::{Path, Query, State},
    Json,
};

use super::error::{ApiError, ApiResult};
use super::types::*;
use crate::catalog::MovieList;
use crate::server::AppState;

fn page_param(page: Option<u32>) -> ApiResult<u32> {
    match page {
        None => Ok(1),
        Some(0) => Err(ApiError::BadRequest("page must be a positive integer".to_string())),
        Some(p) => Ok(p),
    }
}

pub async fn get_movie_list(
    State(state): State<AppState>,
    Path(list): Path<String>,
    Query(params): Query<PageQuery>,
) -> ApiResult<Json<MoviePageDto>> {
    let list = MovieList::from_str(&list)
        .ok_or_else(|| ApiError::NotFound(format!("movie list {}", list)))?;
    let page = page_param(params.page)?;

    let result = state.catalog.fetch_page(list, page).await?;

    Ok(Json(MoviePageDto::from_page(&result, state.image_base())))
}

pub async fn search_movies(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> ApiResult<Json<MoviePageDto>> {
    let query = params.query.trim();
    if query.is_empty() {
        return Err(ApiError::BadRequest("query must not be empty".to_string()));
    }
    let page = page_param(params.page)?;

    let result = state.catalog.search(query, page).await?;

    Ok(Json(MoviePageDto::from_page(&result, state.image_base())))
}

pub async fn get_movie(
    State(state): State<AppState>,
    Path(movie_id): Path<i64>,
) -> ApiResult<Json<MovieDetailDto>> {
    if movie_id <= 0 {
        return Err(ApiError::BadRequest("movie id must be positive".to_string()));
    }

    let detail = state.catalog.movie_details(movie_id).await?;

    Ok(Json(MovieDetailDto::from_detail(&detail, state.image_base())))
}
