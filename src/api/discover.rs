use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
    Json,
};
use tokio::sync::OwnedMutexGuard;
use uuid::Uuid;

use super::error::{ApiError, ApiResult};
use super::session::DiscoverSession;
use super::types::*;
use crate::feed::{FeedCursor, GestureClassifier};
use crate::server::AppState;

fn feed_view(id: &Uuid, session: &DiscoverSession, image_base: &str) -> FeedView {
    let cursor = &session.cursor;
    FeedView {
        session: id.to_string(),
        list: cursor.list(),
        state: cursor.state(),
        movie: cursor.current().map(|m| MovieDto::from_item(m, image_base)),
        page: cursor.page(),
        total_pages: cursor.total_pages(),
    }
}

async fn lookup(state: &AppState, id: &str) -> ApiResult<(Uuid, OwnedMutexGuard<DiscoverSession>)> {
    let missing = || ApiError::NotFound(format!("session {}", id));
    let uuid = Uuid::parse_str(id).map_err(|_| missing())?;
    let session = state.sessions.acquire(&uuid).await.ok_or_else(missing)?;
    Ok((uuid, session))
}

/// Start a new pass through the feed and load its first movie. The session
/// is stored before the load, so a failed start can be retried through
/// `advance` with the session id from the error body.
pub async fn create_session(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<FeedView>), Response> {
    let discover = &state.config.discover;
    let cursor = FeedCursor::new(
        state.catalog.clone(),
        state.favorites.clone(),
        state.owner(),
        state.config.tmdb.feed,
    );
    let gesture = GestureClassifier::new(discover.swipe_threshold, discover.hint_deadzone);

    let (id, handle) = state.sessions.insert(DiscoverSession::new(cursor, gesture)).await;
    let mut session = handle.lock().await;

    if let Err(e) = session.cursor.advance().await {
        return Err(ApiError::from(e).into_session_response(&id));
    }

    Ok((StatusCode::CREATED, Json(feed_view(&id, &session, state.image_base()))))
}

pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<FeedView>> {
    let (uuid, session) = lookup(&state, &id).await?;
    Ok(Json(feed_view(&uuid, &session, state.image_base())))
}

pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<SuccessResponse>> {
    let uuid = Uuid::parse_str(&id).map_err(|_| ApiError::NotFound(format!("session {}", id)))?;
    if !state.sessions.remove(&uuid).await {
        return Err(ApiError::NotFound(format!("session {}", id)));
    }
    Ok(Json(SuccessResponse { success: true }))
}

pub async fn post_decision(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<DecisionRequest>,
) -> ApiResult<Json<FeedView>> {
    let (uuid, mut session) = lookup(&state, &id).await?;

    session.cursor.record_decision(req.decision).await?;

    Ok(Json(feed_view(&uuid, &session, state.image_base())))
}

/// Move on without deciding. After a failed page fetch this is the retry.
pub async fn post_advance(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<FeedView>> {
    let (uuid, mut session) = lookup(&state, &id).await?;

    session.cursor.advance().await?;

    Ok(Json(feed_view(&uuid, &session, state.image_base())))
}

pub async fn post_restart(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<FeedView>> {
    let (uuid, mut session) = lookup(&state, &id).await?;

    session.cursor.restart();
    session.cursor.advance().await?;

    Ok(Json(feed_view(&uuid, &session, state.image_base())))
}

/// Feed pointer events to the session's gesture classifier. A drag that
/// ends past the threshold is applied to the feed as a decision.
pub async fn post_drag(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<DragRequest>,
) -> ApiResult<Json<DragResponse>> {
    let (uuid, mut guard) = lookup(&state, &id).await?;
    let session = &mut *guard;

    let mut decision = None;
    match req.phase {
        DragPhase::Start => {
            let x = req.x.ok_or_else(|| ApiError::BadRequest("x is required".to_string()))?;
            // Nothing to drag while there is no card.
            if session.cursor.current().is_some() {
                session.gesture.on_drag_start(x);
            }
        }
        DragPhase::Move => {
            let x = req.x.ok_or_else(|| ApiError::BadRequest("x is required".to_string()))?;
            session.gesture.on_drag_move(x);
        }
        DragPhase::End => {
            decision = session.gesture.on_drag_end();
            if let Some(d) = decision {
                session.cursor.record_decision(d).await?;
            }
        }
    }

    Ok(Json(DragResponse {
        visual: session.gesture.visual(),
        decision,
        feed: feed_view(&uuid, session, state.image_base()),
    }))
}
