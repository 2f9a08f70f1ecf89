use std::collections::HashMap;
use std::net::SocketAddr;

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;

use cinematch::catalog::{Catalog, CatalogError, MovieList, TmdbClient};
use cinematch::config::TmdbConfig;

const API_KEY: &str = "test-key";

fn authorized(params: &HashMap<String, String>) -> bool {
    params.get("api_key").map(String::as_str) == Some(API_KEY)
}

async fn movie_route(
    Path(name): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if !authorized(&params) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    if let Ok(id) = name.parse::<i64>() {
        if id != 550 {
            return StatusCode::NOT_FOUND.into_response();
        }
        return Json(json!({
            "id": 550,
            "title": "Fight Club",
            "poster_path": "/pB8BM7pdSp6B6Ih7QZ4DrQ3PmJK.jpg",
            "vote_average": 8.4,
            "overview": "A ticking-time-bomb insomniac...",
            "release_date": "1999-10-15",
            "runtime": 139,
            "genres": [{"id": 18, "name": "Drama"}],
            "production_companies": [{"id": 508, "name": "Regency Enterprises"}]
        }))
        .into_response();
    }

    match name.as_str() {
        "popular" => {
            let page: u32 = params.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
            Json(json!({
                "page": page,
                "total_pages": 3,
                "total_results": 2,
                "results": [
                    {
                        "id": page as i64 * 10,
                        "title": format!("Popular {}", page),
                        "poster_path": "/a.jpg",
                        "vote_average": 7.1,
                        "overview": "first",
                        "release_date": "2024-05-01"
                    },
                    {
                        "id": page as i64 * 10 + 1,
                        "title": "No poster",
                        "poster_path": null,
                        "vote_average": 0,
                        "overview": "",
                        "release_date": ""
                    }
                ]
            }))
            .into_response()
        }
        "upcoming" => StatusCode::SERVICE_UNAVAILABLE.into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn search_route(Query(params): Query<HashMap<String, String>>) -> Response {
    if !authorized(&params) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let query = params.get("query").cloned().unwrap_or_default();
    Json(json!({
        "page": 1,
        "total_pages": 1,
        "results": [{"id": 1, "title": query, "vote_average": 5.0, "overview": ""}]
    }))
    .into_response()
}

async fn start_stub() -> SocketAddr {
    let app = Router::new()
        .route("/3/movie/:name", get(movie_route))
        .route("/3/search/movie", get(search_route));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn client(addr: SocketAddr, api_key: Option<&str>) -> TmdbClient {
    let config = TmdbConfig {
        api_key: api_key.map(str::to_string),
        base_url: format!("http://{}/3/", addr),
        timeout_secs: 5,
        ..TmdbConfig::default()
    };
    TmdbClient::new(&config).unwrap()
}

#[tokio::test]
async fn fetches_a_page_of_the_list() {
    let addr = start_stub().await;
    let tmdb = client(addr, Some(API_KEY));

    let page = tmdb.fetch_page(MovieList::Popular, 2).await.unwrap();
    assert_eq!(page.page_number, 2);
    assert_eq!(page.total_pages, 3);
    assert!(page.has_more());
    assert_eq!(page.items.len(), 2);

    let first = &page.items[0];
    assert_eq!(first.id, 20);
    assert_eq!(first.title, "Popular 2");
    assert_eq!(first.poster_path.as_deref(), Some("/a.jpg"));
    assert_eq!(first.score, 7.1);
    assert_eq!(first.release_date.as_deref(), Some("2024-05-01"));

    let second = &page.items[1];
    assert_eq!(second.poster_path, None);
    assert_eq!(second.release_date, None);
}

#[tokio::test]
async fn searches_with_the_query() {
    let addr = start_stub().await;
    let tmdb = client(addr, Some(API_KEY));

    let page = tmdb.search("the matrix", 1).await.unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].title, "the matrix");
}

#[tokio::test]
async fn loads_movie_details() {
    let addr = start_stub().await;
    let tmdb = client(addr, Some(API_KEY));

    let detail = tmdb.movie_details(550).await.unwrap();
    assert_eq!(detail.item.title, "Fight Club");
    assert_eq!(detail.runtime, Some(139));
    assert_eq!(detail.genres, vec!["Drama".to_string()]);
    assert_eq!(detail.production_companies, vec!["Regency Enterprises".to_string()]);

    let err = tmdb.movie_details(1).await.unwrap_err();
    assert!(matches!(err, CatalogError::NotFound(1)));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn non_success_status_is_an_upstream_error() {
    let addr = start_stub().await;

    let err = client(addr, Some(API_KEY))
        .fetch_page(MovieList::Upcoming, 1)
        .await
        .unwrap_err();
    match &err {
        CatalogError::Upstream { status, reason } => {
            assert_eq!(*status, 503);
            assert_eq!(reason, "Service Unavailable");
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(err.is_retryable());

    let err = client(addr, Some("wrong-key"))
        .fetch_page(MovieList::Popular, 1)
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::Upstream { status: 401, .. }));
}

#[tokio::test]
async fn missing_key_fails_without_a_request() {
    let addr = start_stub().await;
    let tmdb = client(addr, None);

    let err = tmdb.fetch_page(MovieList::Popular, 1).await.unwrap_err();
    assert!(matches!(err, CatalogError::MissingCredential));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn unreachable_server_is_retryable() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(addr, Some(API_KEY))
        .fetch_page(MovieList::Popular, 1)
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::Http(_)));
    assert!(err.is_retryable());
}
