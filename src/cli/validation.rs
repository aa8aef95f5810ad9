use crate::cli::errors::{CliError, CliResult};
use url::Url;

const MAX_TERM_LEN: usize = 1000;

/// Validates the backend base url
pub fn validate_url(url: &str) -> CliResult<()> {
    if url.trim().is_empty() {
        return Err(CliError::validation("url", "URL cannot be empty"));
    }

    match Url::parse(url) {
        Ok(parsed_url) => {
            if !matches!(parsed_url.scheme(), "http" | "https") {
                return Err(CliError::validation("url", "URL must start with http:// or https://"));
            }
            if parsed_url.host_str().is_none() {
                return Err(CliError::validation("url", "URL must have a host"));
            }
            Ok(())
        }
        Err(_) => Err(CliError::validation("url", "Invalid URL format")),
    }
}

/// Validates a search term. Empty terms are allowed and never reach the backend.
pub fn validate_search_term(term: &str) -> CliResult<()> {
    if term.chars().count() > MAX_TERM_LEN {
        return Err(CliError::validation(
            "term",
            format!("Search term cannot exceed {MAX_TERM_LEN} characters"),
        ));
    }

    if term.chars().any(|c| c.is_control() && c != '\t') {
        return Err(CliError::validation("term", "Search term cannot contain control characters"));
    }

    Ok(())
}
