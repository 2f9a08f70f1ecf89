use serde::{Deserialize, Serialize};

use crate::catalog::MovieList;

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub listen: ListenConfig,
    #[serde(default)]
    pub appdir: Option<String>,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub tmdb: TmdbConfig,
    #[serde(default)]
    pub discover: DiscoverConfig,
    #[serde(skip)]
    pub debug_logs: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ListenConfig {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default = "default_port")]
    pub port: String,
    #[serde(default)]
    pub tlscert: Option<String>,
    #[serde(default)]
    pub tlskey: Option<String>,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            address: None,
            port: default_port(),
            tlscert: None,
            tlskey: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub sqlite: Option<SqliteConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SqliteConfig {
    pub filename: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TmdbConfig {
    #[serde(alias = "apikey")]
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(alias = "baseurl")]
    #[serde(default = "default_tmdb_base_url")]
    pub base_url: String,
    #[serde(alias = "imagebase")]
    #[serde(default = "default_image_base")]
    pub image_base: String,
    /// Which upstream list the discovery feed pages through.
    #[serde(default)]
    pub feed: MovieList,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_tmdb_base_url(),
            image_base: default_image_base(),
            feed: MovieList::default(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DiscoverConfig {
    #[serde(alias = "guestownerid")]
    #[serde(default = "default_guest_owner_id")]
    pub guest_owner_id: i64,
    #[serde(default = "default_swipe_threshold")]
    pub swipe_threshold: f64,
    #[serde(default = "default_hint_deadzone")]
    pub hint_deadzone: f64,
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,
}

impl Default for DiscoverConfig {
    fn default() -> Self {
        Self {
            guest_owner_id: default_guest_owner_id(),
            swipe_threshold: default_swipe_threshold(),
            hint_deadzone: default_hint_deadzone(),
            session_ttl_secs: default_session_ttl_secs(),
        }
    }
}

fn default_port() -> String {
    "8080".to_string()
}

fn default_tmdb_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_image_base() -> String {
    "https://image.tmdb.org/t/p/w500".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_guest_owner_id() -> i64 {
    1
}

fn default_swipe_threshold() -> f64 {
    crate::feed::SWIPE_THRESHOLD
}

fn default_hint_deadzone() -> f64 {
    crate::feed::HINT_DEADZONE
}

fn default_session_ttl_secs() -> u64 {
    3600
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(path.to_string(), e))?;

        let mut config = Self::from_yaml(&content)
            .map_err(|e| ConfigError::ParseError(path.to_string(), e))?;
        config.apply_env(std::env::var("TMDB_API_KEY").ok());

        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        // An empty document deserializes to unit, not to an empty map.
        if content.trim().is_empty() {
            return Ok(Config::default());
        }
        serde_yaml::from_str(content)
    }

    /// The environment wins over the file for the TMDB credential.
    pub fn apply_env(&mut self, tmdb_api_key: Option<String>) {
        if let Some(key) = tmdb_api_key.filter(|k| !k.trim().is_empty()) {
            self.tmdb.api_key = Some(key);
        }
    }

    pub fn get_database_path(&self) -> Option<String> {
        self.database.sqlite.as_ref().map(|s| s.filename.clone())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    ReadError(String, std::io::Error),
    #[error("Failed to parse config file {0}: {1}")]
    ParseError(String, serde_yaml::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_file() {
        let config = Config::from_yaml("").unwrap();
        assert_eq!(config.listen.port, "8080");
        assert_eq!(config.tmdb.base_url, "https://api.themoviedb.org/3");
        assert_eq!(config.tmdb.feed, MovieList::Popular);
        assert_eq!(config.discover.guest_owner_id, 1);
        assert_eq!(config.discover.swipe_threshold, 100.0);
        assert!(config.get_database_path().is_none());
    }

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
listen:
  address: 127.0.0.1
  port: "9000"
appdir: ./dist
database:
  sqlite:
    filename: /var/lib/cinematch/favorites.db
tmdb:
  apikey: abc123
  feed: top_rated
  timeout_secs: 5
discover:
  guest_owner_id: 42
  swipe_threshold: 120
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.listen.address.as_deref(), Some("127.0.0.1"));
        assert_eq!(config.listen.port, "9000");
        assert_eq!(config.tmdb.api_key.as_deref(), Some("abc123"));
        assert_eq!(config.tmdb.feed, MovieList::TopRated);
        assert_eq!(config.tmdb.timeout_secs, 5);
        assert_eq!(config.discover.guest_owner_id, 42);
        assert_eq!(config.discover.swipe_threshold, 120.0);
        assert_eq!(config.discover.hint_deadzone, 50.0);
        assert_eq!(
            config.get_database_path().as_deref(),
            Some("/var/lib/cinematch/favorites.db")
        );
    }

    #[test]
    fn test_env_overrides_api_key() {
        let mut config = Config::from_yaml("tmdb:\n  api_key: from-file\n").unwrap();
        config.apply_env(Some("from-env".to_string()));
        assert_eq!(config.tmdb.api_key.as_deref(), Some("from-env"));

        config.apply_env(Some("  ".to_string()));
        assert_eq!(config.tmdb.api_key.as_deref(), Some("from-env"));

        config.apply_env(None);
        assert_eq!(config.tmdb.api_key.as_deref(), Some("from-env"));
    }

    #[test]
    fn test_missing_file() {
        let err = Config::from_file("/nonexistent/cinematch.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::ReadError(_, _)));
    }
}
