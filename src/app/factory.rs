use crate::{
    app::{
        cache::ResultStore, notify::Notifier, remote::AppRemote, service::SearchService,
    },
    config::{self, Config},
};
use anyhow::{Context, Result};
use homedir::my_home;
use std::path::PathBuf;
use std::sync::Arc;

/// Application factory for wiring config, backend and service together
pub struct AppFactory;

impl AppFactory {
    /// Load the config from `MAGSEARCH_BASE_PATH` or the default location
    pub fn load_config() -> Result<Config> {
        let base_path = Self::get_base_path()?;
        Config::load_with(base_path)
    }

    /// Create the search service talking to the configured backend.
    ///
    /// `backend_override` comes from the command line and wins over both
    /// `MAGSEARCH_BACKEND_URL` and the config file.
    pub fn create_service(
        config: &Config,
        backend_override: Option<&str>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<SearchService> {
        let backend_url = config::resolve_backend_url(
            backend_override,
            std::env::var(config::BACKEND_URL_ENV).ok(),
            &config.backend_url,
        );

        // validate whatever won, not only the file value
        let mut resolved = config.clone();
        resolved.backend_url = backend_url;
        resolved.validate()?;

        let remote = AppRemote::new(&resolved.backend_url, resolved.request_timeout())
            .context("failed to build http client")?;
        log::info!("Using remote backend: {}", remote.remote_addr());

        Ok(SearchService::new(
            Box::new(remote),
            ResultStore::with_capacity(resolved.cache_ttl(), resolved.cache_capacity),
            notifier,
        ))
    }

    /// Get the base path for the application
    fn get_base_path() -> Result<PathBuf> {
        if let Ok(base_path) = std::env::var(config::BASE_PATH_ENV) {
            return Ok(PathBuf::from(base_path));
        }

        let home = my_home()
            .map_err(|e| anyhow::anyhow!("Could not determine home directory: {e}"))?
            .context("Home directory path is empty")?;
        Ok(home.join(".config").join("magsearch"))
    }
}
