use std::{path::PathBuf, time::Duration};

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};

use crate::{app::cache, cli::validation::validate_url, records::SearchMode, storage};

pub const BACKEND_URL_ENV: &str = "MAGSEARCH_BACKEND_URL";
pub const BASE_PATH_ENV: &str = "MAGSEARCH_BASE_PATH";

const CONFIG_FILE: &str = "config.yaml";
const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";
/// Default lifetime of a cached result set in seconds
const DEFAULT_CACHE_TTL_SECS: u64 = 300;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Base url of the search backend. Overridden by `MAGSEARCH_BACKEND_URL`.
    #[serde(default = "default_backend_url")]
    pub backend_url: String,

    /// Mode preselected when a session starts
    #[serde(default)]
    pub default_mode: SearchMode,

    /// How long a result set is served from cache. `null` keeps it until the
    /// next successful load.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: Option<u64>,

    /// Result sets kept before the least recently used one is evicted
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,

    /// Request timeout. `null` waits on the backend indefinitely.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    #[serde(skip_serializing, skip_deserializing)]
    base_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: default_backend_url(),
            default_mode: SearchMode::default(),
            cache_ttl_secs: default_cache_ttl_secs(),
            cache_capacity: default_cache_capacity(),
            request_timeout_secs: None,
            base_path: PathBuf::new(),
        }
    }
}

fn default_backend_url() -> String {
    DEFAULT_BACKEND_URL.to_string()
}

fn default_cache_ttl_secs() -> Option<u64> {
    Some(DEFAULT_CACHE_TTL_SECS)
}

fn default_cache_capacity() -> usize {
    cache::DEFAULT_CAPACITY
}

/// Picks the backend url: command line, then environment, then config file.
pub fn resolve_backend_url(
    cli_override: Option<&str>,
    env_value: Option<String>,
    configured: &str,
) -> String {
    let url = cli_override
        .map(str::to_string)
        .or(env_value.filter(|v| !v.trim().is_empty()))
        .unwrap_or_else(|| configured.to_string());

    let url = url.trim();
    url.strip_suffix('/').unwrap_or(url).to_string()
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        validate_url(&self.backend_url).context("backend_url is invalid")?;

        if self.request_timeout_secs == Some(0) {
            bail!("request_timeout_secs must be greater than 0");
        }

        if self.cache_capacity == 0 {
            bail!("cache_capacity must be greater than 0");
        }

        Ok(())
    }

    pub fn load_with(base_path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let base_path = base_path.into();
        let store = storage::BackendLocal::new(&base_path)
            .with_context(|| format!("failed to create {}", base_path.display()))?;

        // create new if does not exist
        if !store.exists(CONFIG_FILE) {
            store.write(CONFIG_FILE, serde_yml::to_string(&Self::default())?.as_bytes())?;
        }

        let config_str = store
            .read_string(CONFIG_FILE)
            .context("failed to read config file")?;
        let mut config: Self = serde_yml::from_str(&config_str).context("config is malformed")?;

        config.base_path = base_path;

        config.validate()?;

        // resave in case new fields were filled with defaults
        if config_str != serde_yml::to_string(&config)? {
            config.save()?;
        }

        Ok(config)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let store = storage::BackendLocal::new(&self.base_path)?;

        let config_str = serde_yml::to_string(&self)?;
        store.write(CONFIG_FILE, config_str.as_bytes())?;
        Ok(())
    }

    pub fn cache_ttl(&self) -> Option<Duration> {
        self.cache_ttl_secs.map(Duration::from_secs)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_creates_default_config() {
        let tmp = tempfile::tempdir().unwrap();
        let config = Config::load_with(tmp.path()).unwrap();

        assert_eq!(config.backend_url, "http://localhost:8000");
        assert_eq!(config.default_mode, SearchMode::Hybrid);
        assert_eq!(config.cache_ttl(), Some(Duration::from_secs(300)));
        assert_eq!(config.request_timeout(), None);
        assert_eq!(config.cache_capacity, 1000);
        assert!(tmp.path().join("config.yaml").exists());
    }

    #[test]
    fn test_load_fills_missing_fields() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(
            tmp.path().join("config.yaml"),
            "backend_url: https://search.example.com\ndefault_mode: vector\ncache_ttl_secs: null\n",
        )
        .unwrap();

        let config = Config::load_with(tmp.path()).unwrap();
        assert_eq!(config.backend_url, "https://search.example.com");
        assert_eq!(config.default_mode, SearchMode::Vector);
        assert_eq!(config.cache_ttl(), None);

        let saved = std::fs::read_to_string(tmp.path().join("config.yaml")).unwrap();
        assert!(saved.contains("request_timeout_secs"));
        assert!(saved.contains("cache_capacity: 1000"));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("config.yaml"), "backend_url: ftp://nope\n").unwrap();
        assert!(Config::load_with(tmp.path()).is_err());

        std::fs::write(tmp.path().join("config.yaml"), "request_timeout_secs: 0\n").unwrap();
        assert!(Config::load_with(tmp.path()).is_err());

        std::fs::write(tmp.path().join("config.yaml"), "cache_capacity: 0\n").unwrap();
        assert!(Config::load_with(tmp.path()).is_err());

        std::fs::write(tmp.path().join("config.yaml"), "default_mode: bm25\n").unwrap();
        assert!(Config::load_with(tmp.path()).is_err());
    }

    #[test]
    fn test_backend_url_precedence() {
        let configured = "http://config:8000";
        assert_eq!(
            resolve_backend_url(Some("http://cli:1/"), Some("http://env:2".into()), configured),
            "http://cli:1"
        );
        assert_eq!(
            resolve_backend_url(None, Some("http://env:2/".into()), configured),
            "http://env:2"
        );
        assert_eq!(
            resolve_backend_url(None, Some("  ".into()), configured),
            "http://config:8000"
        );
        assert_eq!(resolve_backend_url(None, None, configured), "http://config:8000");
    }
}
