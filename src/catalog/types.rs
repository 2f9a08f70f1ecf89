use serde::{Deserialize, Serialize};

/// One movie as the feed sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: i64,
    pub title: String,
    pub poster_path: Option<String>,
    pub score: f64,
    pub summary: String,
    pub release_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub items: Vec<CatalogItem>,
    pub page_number: u32,
    pub total_pages: u32,
}

impl Page {
    pub fn has_more(&self) -> bool {
        self.page_number < self.total_pages
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetail {
    #[serde(flatten)]
    pub item: CatalogItem,
    pub runtime: Option<u32>,
    pub genres: Vec<String>,
    pub production_companies: Vec<String>,
}

/// The upstream lists the catalog can page through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovieList {
    #[default]
    Popular,
    Upcoming,
    TopRated,
}

impl MovieList {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovieList::Popular => "popular",
            MovieList::Upcoming => "upcoming",
            MovieList::TopRated => "top_rated",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "popular" => Some(MovieList::Popular),
            "upcoming" => Some(MovieList::Upcoming),
            "top_rated" | "toprated" | "top-rated" => Some(MovieList::TopRated),
            _ => None,
        }
    }
}

// TMDB v3 wire format.

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TmdbMovie {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub release_date: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TmdbResponse {
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default)]
    pub results: Vec<TmdbMovie>,
    #[serde(default)]
    pub total_pages: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TmdbNamed {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TmdbMovieDetail {
    #[serde(flatten)]
    pub movie: TmdbMovie,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub genres: Vec<TmdbNamed>,
    #[serde(default)]
    pub production_companies: Vec<TmdbNamed>,
}

fn first_page() -> u32 {
    1
}

impl From<TmdbMovie> for CatalogItem {
    fn from(m: TmdbMovie) -> Self {
        CatalogItem {
            id: m.id,
            title: m.title,
            // TMDB sends "" as well as null for a missing poster.
            poster_path: m.poster_path.filter(|p| !p.is_empty()),
            score: m.vote_average,
            summary: m.overview,
            release_date: m.release_date.filter(|d| !d.is_empty()),
        }
    }
}

impl From<TmdbResponse> for Page {
    fn from(r: TmdbResponse) -> Self {
        let page_number = r.page.max(1);
        Page {
            items: r.results.into_iter().map(CatalogItem::from).collect(),
            page_number,
            total_pages: r.total_pages.max(1),
        }
    }
}

impl From<TmdbMovieDetail> for MovieDetail {
    fn from(d: TmdbMovieDetail) -> Self {
        MovieDetail {
            item: d.movie.into(),
            runtime: d.runtime,
            genres: d.genres.into_iter().map(|g| g.name).collect(),
            production_companies: d.production_companies.into_iter().map(|c| c.name).collect(),
        }
    }
}

/// Full poster URL for a TMDB poster path, if there is one.
pub fn poster_url(image_base: &str, poster_path: Option<&str>) -> Option<String> {
    let path = poster_path?;
    if path.is_empty() {
        return None;
    }
    Some(format!("{}{}", image_base.trim_end_matches('/'), path))
}

/// Inverse of [`poster_url`]: accepts either a bare path or a full URL under `image_base`.
pub fn poster_path_from_url(image_base: &str, url: &str) -> String {
    url.strip_prefix(image_base.trim_end_matches('/'))
        .unwrap_or(url)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_tmdb_page() {
        let json = r#"{
            "page": 1,
            "results": [
                {"id": 550, "title": "Fight Club", "poster_path": "/pB8BM7pdSp6B6Ih7QZ4DrQ3PmJK.jpg",
                 "vote_average": 8.4, "overview": "An insomniac office worker...",
                 "release_date": "1999-10-15", "genre_ids": [18], "popularity": 61.4},
                {"id": 13, "title": "Forrest Gump", "poster_path": null,
                 "vote_average": 8.5, "overview": "", "release_date": ""}
            ],
            "total_pages": 500,
            "total_results": 10000
        }"#;
        let resp: TmdbResponse = serde_json::from_str(json).unwrap();
        let page = Page::from(resp);
        assert_eq!(page.page_number, 1);
        assert_eq!(page.total_pages, 500);
        assert!(page.has_more());
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].id, 550);
        assert_eq!(page.items[0].score, 8.4);
        assert_eq!(page.items[1].poster_path, None);
        assert_eq!(page.items[1].release_date, None);
    }

    #[test]
    fn test_zero_total_pages_normalized() {
        let resp: TmdbResponse =
            serde_json::from_str(r#"{"page": 1, "results": [], "total_pages": 0}"#).unwrap();
        let page = Page::from(resp);
        assert_eq!(page.total_pages, 1);
        assert!(!page.has_more());
    }

    #[test]
    fn test_decode_detail() {
        let json = r#"{
            "id": 550, "title": "Fight Club", "poster_path": "/p.jpg", "vote_average": 8.4,
            "overview": "x", "runtime": 139,
            "genres": [{"id": 18, "name": "Drama"}],
            "production_companies": [{"id": 508, "name": "Regency Enterprises"}]
        }"#;
        let detail = MovieDetail::from(serde_json::from_str::<TmdbMovieDetail>(json).unwrap());
        assert_eq!(detail.item.title, "Fight Club");
        assert_eq!(detail.runtime, Some(139));
        assert_eq!(detail.genres, vec!["Drama"]);
        assert_eq!(detail.production_companies, vec!["Regency Enterprises"]);
    }

    #[test]
    fn test_poster_url() {
        let base = "https://image.tmdb.org/t/p/w500";
        assert_eq!(
            poster_url(base, Some("/abc.jpg")).as_deref(),
            Some("https://image.tmdb.org/t/p/w500/abc.jpg")
        );
        assert_eq!(poster_url(base, None), None);
        assert_eq!(poster_url(base, Some("")), None);
        assert_eq!(
            poster_path_from_url(base, "https://image.tmdb.org/t/p/w500/abc.jpg"),
            "/abc.jpg"
        );
        assert_eq!(poster_path_from_url(base, "/abc.jpg"), "/abc.jpg");
    }

    #[test]
    fn test_movie_list_names() {
        assert_eq!(MovieList::from_str("Top_Rated"), Some(MovieList::TopRated));
        assert_eq!(MovieList::from_str("upcoming"), Some(MovieList::Upcoming));
        assert_eq!(MovieList::from_str("trending"), None);
        assert_eq!(MovieList::TopRated.as_str(), "top_rated");
    }
}
