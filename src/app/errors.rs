pub const DEFAULT_LOAD_ERROR: &str = "Failed to load data.";

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// `/load` answered with a non-2xx status. Carries the response body,
    /// or [`DEFAULT_LOAD_ERROR`] when the body was empty.
    #[error("{0}")]
    LoadFailed(String),

    #[error("Failed to search data.")]
    SearchFailed,

    #[error("malformed search response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("request failed: {0}")]
    Reqwest(#[from] reqwest::Error),
}

impl AppError {
    pub fn load_failed(body: impl Into<String>) -> Self {
        let body = body.into();
        if body.trim().is_empty() {
            AppError::LoadFailed(DEFAULT_LOAD_ERROR.to_string())
        } else {
            AppError::LoadFailed(body)
        }
    }
}
