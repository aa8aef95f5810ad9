use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::{
    app::{
        backend::SearchBackend,
        cache::ResultStore,
        errors::AppError,
        notify::{Notification, Notifier},
    },
    records::{QueryKey, Record},
};

const UNKNOWN_ERROR: &str = "Unknown error occurred.";

/// Data-access layer: wraps the backend with the result store and reports
/// every outcome through the notifier.
pub struct SearchService {
    backend: Box<dyn SearchBackend>,
    cache: Mutex<ResultStore>,
    notifier: Arc<dyn Notifier>,
}

impl SearchService {
    pub fn new(
        backend: Box<dyn SearchBackend>,
        cache: ResultStore,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            backend,
            cache: Mutex::new(cache),
            notifier,
        }
    }

    fn cache(&self) -> MutexGuard<'_, ResultStore> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs the backend ingestion job. On success every cached result set is
    /// dropped so the next search goes back to the backend.
    pub fn trigger_load(&self) -> anyhow::Result<(), AppError> {
        match self.backend.load() {
            Ok(()) => {
                let dropped = self.cache().invalidate_all();
                log::info!("load finished, invalidated {dropped} cached result sets");

                self.notifier.notify(Notification::success(
                    "Data loaded successfully!",
                    "Mockaroo data loaded and indexed.",
                ));
                Ok(())
            }
            Err(err) => {
                let mut message = err.to_string();
                if message.is_empty() {
                    message = UNKNOWN_ERROR.to_string();
                }

                self.notifier
                    .notify(Notification::error("Failed to load data!", message));
                Err(err)
            }
        }
    }

    pub fn search(&self, key: &QueryKey) -> anyhow::Result<Vec<Record>, AppError> {
        if key.is_empty() {
            log::debug!("empty search term, not contacting backend");
            return Ok(vec![]);
        }

        // the lock is not held across the request
        let epoch = {
            let mut cache = self.cache();
            if let Some(records) = cache.lookup(key) {
                log::debug!("serving {key} from cache");
                return Ok(records);
            }
            cache.epoch()
        };

        match self.backend.search(key) {
            Ok(records) => {
                let mut cache = self.cache();
                if cache.insert(key.clone(), records.clone(), epoch) {
                    log::debug!("cached {key}, {} keys cached", cache.len());
                }
                drop(cache);

                self.notifier.notify(Notification::success(
                    "Search successful!",
                    "Search results fetched successfully.",
                ));
                Ok(records)
            }
            Err(err) => {
                self.notifier
                    .notify(Notification::error("Search failed!", err.to_string()));
                Err(err)
            }
        }
    }
}
