use axum::{
    extract::{Path, State},
    Json,
};
use tracing::info;

use super::error::{ApiError, ApiResult};
use super::types::*;
use crate::catalog::poster_path_from_url;
use crate::db::FavoriteRecord;
use crate::server::AppState;

pub async fn list_favorites(State(state): State<AppState>) -> ApiResult<Json<Vec<FavoriteDto>>> {
    let records = state.favorites.list(state.owner()).await?;

    let favorites = records
        .iter()
        .map(|r| FavoriteDto::from_record(r, state.image_base()))
        .collect();

    Ok(Json(favorites))
}

pub async fn add_favorite(
    State(state): State<AppState>,
    Json(req): Json<AddFavoriteRequest>,
) -> ApiResult<Json<SuccessResponse>> {
    if req.movie_id <= 0 {
        return Err(ApiError::BadRequest("movieId must be positive".to_string()));
    }

    let owner = state.owner();
    // Clients may hand back the poster URL they were given instead of the path.
    let poster_path = req
        .poster_path
        .filter(|p| !p.is_empty())
        .map(|p| poster_path_from_url(state.image_base(), &p));

    let record = FavoriteRecord {
        owner_id: owner,
        item_id: req.movie_id,
        title: req.movie_title,
        poster_path,
        score: req.rating,
        summary: req.overview,
        added_at: chrono::Utc::now(),
    };
    state.favorites.put(owner, &record).await?;
    info!(owner, movie = record.item_id, "favorite added");

    Ok(Json(SuccessResponse { success: true }))
}

pub async fn remove_favorite(
    State(state): State<AppState>,
    Path(movie_id): Path<i64>,
) -> ApiResult<Json<SuccessResponse>> {
    if movie_id <= 0 {
        return Err(ApiError::BadRequest("movieId must be positive".to_string()));
    }

    let owner = state.owner();
    state.favorites.remove(owner, movie_id).await?;
    info!(owner, movie = movie_id, "favorite removed");

    Ok(Json(SuccessResponse { success: true }))
}

pub async fn is_favorited(
    State(state): State<AppState>,
    Path(movie_id): Path<i64>,
) -> ApiResult<Json<FavoritedResponse>> {
    if movie_id <= 0 {
        return Err(ApiError::BadRequest("movieId must be positive".to_string()));
    }

    let favorited = state.favorites.exists(state.owner(), movie_id).await?;
    Ok(Json(FavoritedResponse { favorited }))
}
