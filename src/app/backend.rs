use crate::records::{QueryKey, Record};

use super::errors::AppError;

/// The two operations the remote search service exposes.
pub trait SearchBackend: Send + Sync {
    /// Ask the backend to run its ingestion job.
    fn load(&self) -> anyhow::Result<(), AppError>;

    /// Query the backend. Callers never pass an empty term.
    fn search(&self, key: &QueryKey) -> anyhow::Result<Vec<Record>, AppError>;
}
