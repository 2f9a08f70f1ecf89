pub mod api;
pub mod catalog;
pub mod config;
pub mod db;
pub mod feed;
pub mod middleware;
pub mod server;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{extract::Request, ServiceExt};
use tracing::{info, warn};

use crate::catalog::Catalog;
use crate::db::FavoritesRepo;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Database error: {0}")]
    Database(#[from] db::DbError),
    #[error("Catalog error: {0}")]
    Catalog(#[from] catalog::CatalogError),
    #[error("Server error: {0}")]
    Server(String),
}

pub async fn run(config_path: &str, debug_logs: bool) -> Result<(), ServerError> {
    let mut config = config::Config::from_file(config_path)?;
    config.debug_logs = debug_logs;

    info!("Using config file: {}", config_path);
    info!("Discovery feed: {}", config.tmdb.feed.as_str());
    if debug_logs {
        info!("Debug logging enabled");
    }

    let favorites: Arc<dyn FavoritesRepo> = match config.get_database_path() {
        Some(db_path) => {
            info!("Opening database at {}", db_path);
            Arc::new(db::SqliteRepository::new(&db_path).await?)
        }
        None => {
            warn!("No database configured, favorites are kept in memory only");
            Arc::new(db::MemoryRepository::new())
        }
    };

    let catalog: Arc<dyn Catalog> = Arc::new(catalog::TmdbClient::new(&config.tmdb)?);

    let address = config.listen.address.as_deref().unwrap_or("[::]");
    let port = &config.listen.port;
    let addr: SocketAddr = format!("{}:{}", address, port)
        .parse()
        .map_err(|e| ServerError::Server(format!("Invalid address: {}", e)))?;

    let tls = match (&config.listen.tlscert, &config.listen.tlskey) {
        (Some(cert), Some(key)) => Some((cert.clone(), key.clone())),
        _ => None,
    };

    let state = server::AppState::new(config, catalog, favorites);
    state.sessions.clone().start_reaper();

    let app = ServiceExt::<Request>::into_make_service(server::build_app(state));

    if let Some((cert_path, key_path)) = tls {
        info!("Loading TLS certificate from {}", cert_path);
        info!("Loading TLS key from {}", key_path);

        let tls_config = axum_server::tls_rustls::RustlsConfig::from_pem_file(&cert_path, &key_path)
            .await
            .map_err(|e| ServerError::Server(format!("Failed to load TLS config: {}", e)))?;

        info!("Serving HTTPS on {}", addr);

        axum_server::bind_rustls(addr, tls_config)
            .serve(app)
            .await
            .map_err(|e| ServerError::Server(format!("Server error: {}", e)))?;
    } else {
        info!("Serving HTTP on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Server(format!("Failed to bind: {}", e)))?;

        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Server(format!("Server error: {}", e)))?;
    }

    Ok(())
}
