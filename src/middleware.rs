use std::task::{Context, Poll};

use axum::{
    extract::Request,
    http::{self, uri::Uri},
    middleware::Next,
    response::Response,
};
use tower::{Layer, Service};
use tracing::info;

/// Collapse repeated slashes and drop a trailing slash, so `/api//favorites/`
/// routes like `/api/favorites`. Must wrap the router from the outside,
/// since routing has already happened by the time a route layer runs.
/// Generic over the request body, so it sits in front of both the plain
/// and the TLS listener.
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizePathLayer;

impl<S> Layer<S> for NormalizePathLayer {
    type Service = NormalizePath<S>;

    fn layer(&self, inner: S) -> Self::Service {
        NormalizePath { inner }
    }
}

#[derive(Debug, Clone)]
pub struct NormalizePath<S> {
    inner: S,
}

impl<S, B> Service<http::Request<B>> for NormalizePath<S>
where
    S: Service<http::Request<B>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: http::Request<B>) -> Self::Future {
        normalize_uri(req.uri_mut());
        self.inner.call(req)
    }
}

fn normalize_uri(uri: &mut Uri) {
    let path = uri.path();
    let normalized = normalize(path);
    if normalized == path {
        return;
    }

    let new_path_and_query = match uri.query() {
        Some(query) => format!("{}?{}", normalized, query),
        None => normalized,
    };

    let mut parts = uri.clone().into_parts();
    if let Ok(new_uri) = new_path_and_query.parse::<Uri>() {
        parts.path_and_query = new_uri.into_parts().path_and_query;
        if let Ok(new_uri) = Uri::from_parts(parts) {
            *uri = new_uri;
        }
    }
}

fn normalize(path: &str) -> String {
    let mut normalized = path.to_string();

    while normalized.contains("//") {
        normalized = normalized.replace("//", "/");
    }

    if normalized.len() > 1 && normalized.ends_with('/') {
        normalized.pop();
    }

    normalized
}

pub async fn log_request(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();

    let response = next.run(req).await;

    let status = response.status().as_u16();
    let content_length = response
        .headers()
        .get(axum::http::header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(0);

    info!(
        method = %method,
        url = %uri,
        status = status,
        length = content_length,
        "HTTP request"
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("/api//favorites"), "/api/favorites");
        assert_eq!(normalize("/api/favorites/"), "/api/favorites");
        assert_eq!(normalize("///api///discover//"), "/api/discover");
        assert_eq!(normalize("/"), "/");
        assert_eq!(normalize("/robots.txt"), "/robots.txt");
    }

    #[test]
    fn test_normalize_uri_keeps_query() {
        let mut uri: Uri = "http://localhost:8080//api/search/?query=alien&page=2"
            .parse()
            .unwrap();
        normalize_uri(&mut uri);
        assert_eq!(uri.path(), "/api/search");
        assert_eq!(uri.query(), Some("query=alien&page=2"));
        assert_eq!(uri.host(), Some("localhost"));
    }
}
