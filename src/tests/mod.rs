use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use crate::{
    app::{
        backend::SearchBackend, cache::ResultStore, errors::AppError, notify::QueuedNotifier,
        service::SearchService,
    },
    records::{QueryKey, Record},
};


pub fn record(id: u64, title: &str, author: Option<&str>) -> Record {
    Record {
        id,
        title: title.to_string(),
        author: author.map(str::to_string),
        publication_date: Some("2024-03-01".to_string()),
        category: Some("item 1".to_string()),
        content: format!("content of {title}"),
    }
}

type SearchFn = dyn Fn(&QueryKey) -> Result<Vec<Record>, AppError> + Send + Sync;

/// In-memory backend that counts calls and answers through a closure.
pub struct FakeBackend {
    pub search_calls: Arc<AtomicUsize>,
    pub load_calls: Arc<AtomicUsize>,
    pub seen: Arc<Mutex<Vec<QueryKey>>>,
    load_error: Option<String>,
    load_panics: bool,
    on_search: Box<SearchFn>,
}

impl FakeBackend {
    pub fn new(
        on_search: impl Fn(&QueryKey) -> Result<Vec<Record>, AppError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            search_calls: Arc::new(AtomicUsize::new(0)),
            load_calls: Arc::new(AtomicUsize::new(0)),
            seen: Arc::new(Mutex::new(vec![])),
            load_error: None,
            load_panics: false,
            on_search: Box::new(on_search),
        }
    }

    pub fn failing_load(mut self, body: &str) -> Self {
        self.load_error = Some(body.to_string());
        self
    }

    pub fn panicking_load(mut self) -> Self {
        self.load_panics = true;
        self
    }
}

impl SearchBackend for FakeBackend {
    fn load(&self) -> anyhow::Result<(), AppError> {
        self.load_calls.fetch_add(1, Ordering::SeqCst);
        if self.load_panics {
            panic!("ingestion exploded");
        }
        match &self.load_error {
            Some(body) => Err(AppError::load_failed(body.clone())),
            None => Ok(()),
        }
    }

    fn search(&self, key: &QueryKey) -> anyhow::Result<Vec<Record>, AppError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(key.clone());
        (self.on_search)(key)
    }
}

pub struct Harness {
    pub service: Arc<SearchService>,
    pub notifications: Arc<QueuedNotifier>,
    pub search_calls: Arc<AtomicUsize>,
    pub load_calls: Arc<AtomicUsize>,
    pub seen: Arc<Mutex<Vec<QueryKey>>>,
}

impl Harness {
    pub fn searches(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn loads(&self) -> usize {
        self.load_calls.load(Ordering::SeqCst)
    }
}

/// Wraps a fake backend into a service with a non-expiring cache.
pub fn create_service(backend: FakeBackend) -> Harness {
    let notifications = Arc::new(QueuedNotifier::new());
    let search_calls = backend.search_calls.clone();
    let load_calls = backend.load_calls.clone();
    let seen = backend.seen.clone();

    let service = SearchService::new(
        Box::new(backend),
        ResultStore::new(None),
        notifications.clone(),
    );

    Harness {
        service: Arc::new(service),
        notifications,
        search_calls,
        load_calls,
        seen,
    }
}
