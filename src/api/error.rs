use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;
use uuid::Uuid;

use super::types::ErrorBody;
use crate::catalog::CatalogError;
use crate::db::DbError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Database(#[from] DbError),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Not found: {0}")]
    NotFound(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Catalog(CatalogError::MissingCredential) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Catalog(CatalogError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Catalog(_) => StatusCode::BAD_GATEWAY,
            ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    fn retryable(&self) -> bool {
        match self {
            ApiError::Catalog(e) => e.is_retryable(),
            ApiError::Database(_) => true,
            ApiError::BadRequest(_) | ApiError::NotFound(_) => false,
        }
    }
}

impl ApiError {
    fn respond(self, session: Option<String>) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("{}", self);
        }
        let body = ErrorBody {
            error: self.to_string(),
            retryable: self.retryable(),
            session,
        };
        (status, Json(body)).into_response()
    }

    /// Error response that also carries the id of the session it hit.
    pub fn into_session_response(self, session: &Uuid) -> Response {
        self.respond(Some(session.to_string()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.respond(None)
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let upstream = ApiError::from(CatalogError::Upstream {
            status: 503,
            reason: "Service Unavailable".to_string(),
        });
        assert_eq!(upstream.status(), StatusCode::BAD_GATEWAY);
        assert!(upstream.retryable());

        let missing = ApiError::from(CatalogError::MissingCredential);
        assert_eq!(missing.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!missing.retryable());

        assert_eq!(
            ApiError::BadRequest("page".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(CatalogError::NotFound(1)).status(),
            StatusCode::NOT_FOUND
        );
    }
}
