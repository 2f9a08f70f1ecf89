use axum::{
    extract::Request,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::Layer;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::api::{self, SessionStore};
use crate::catalog::Catalog;
use crate::config::Config;
use crate::db::{FavoritesRepo, OwnerId};
use crate::middleware::{NormalizePath, NormalizePathLayer};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub catalog: Arc<dyn Catalog>,
    pub favorites: Arc<dyn FavoritesRepo>,
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    pub fn new(
        config: Config,
        catalog: Arc<dyn Catalog>,
        favorites: Arc<dyn FavoritesRepo>,
    ) -> Self {
        let ttl = std::time::Duration::from_secs(config.discover.session_ttl_secs);
        Self {
            config: Arc::new(config),
            catalog,
            favorites,
            sessions: Arc::new(SessionStore::new(ttl)),
        }
    }

    /// Every request acts as the guest owner.
    pub fn owner(&self) -> OwnerId {
        self.config.discover.guest_owner_id
    }

    pub fn image_base(&self) -> &str {
        &self.config.tmdb.image_base
    }
}

pub fn build_router(state: AppState) -> Router {
    let movie_routes = Router::new()
        .route("/api/movies/:list", get(api::get_movie_list))
        .route("/api/movie/:id", get(api::get_movie))
        .route("/api/search", get(api::search_movies));

    let favorite_routes = Router::new()
        .route(
            "/api/favorites",
            get(api::list_favorites).post(api::add_favorite),
        )
        .route(
            "/api/favorites/:movie_id",
            get(api::is_favorited).delete(api::remove_favorite),
        );

    let discover_routes = Router::new()
        .route("/api/discover", post(api::create_session))
        .route(
            "/api/discover/:id",
            get(api::get_session).delete(api::delete_session),
        )
        .route("/api/discover/:id/decision", post(api::post_decision))
        .route("/api/discover/:id/advance", post(api::post_advance))
        .route("/api/discover/:id/restart", post(api::post_restart))
        .route("/api/discover/:id/drag", post(api::post_drag));

    let mut router = Router::new()
        .route("/robots.txt", get(robots_txt_handler))
        .merge(movie_routes)
        .merge(favorite_routes)
        .merge(discover_routes)
        .fallback(fallback_handler);

    if let Some(ref appdir) = state.config.appdir {
        router = router.fallback_service(ServeDir::new(appdir));
    }

    router
        .layer(axum::middleware::from_fn(crate::middleware::log_request))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// The router with path normalization in front of it. This is what the
/// listeners serve.
pub fn build_app(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer.layer(build_router(state))
}

async fn robots_txt_handler() -> &'static str {
    "User-agent: *\nDisallow: /\n"
}

async fn fallback_handler(req: Request<axum::body::Body>) -> impl IntoResponse {
    if req.method() == axum::http::Method::OPTIONS {
        return StatusCode::OK.into_response();
    }
    StatusCode::NOT_FOUND.into_response()
}
