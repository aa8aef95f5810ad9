use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

pub const UNKNOWN_AUTHOR: &str = "Unknown Author";

/// A single searchable document as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub publication_date: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub content: String,
}

impl Record {
    /// Author name for display, falling back to "Unknown Author" when the
    /// backend sent nothing or an empty string.
    pub fn display_author(&self) -> &str {
        match self.author.as_deref() {
            Some(author) if !author.is_empty() => author,
            _ => UNKNOWN_AUTHOR,
        }
    }
}

/// Body of `GET /search`. The documented shape is `{ "results": [...] }`,
/// the backend router also answers with a bare array.
#[derive(Deserialize, Debug, Clone)]
#[serde(untagged)]
pub enum SearchResponse {
    Wrapped { results: Vec<Record> },
    Bare(Vec<Record>),
}

impl SearchResponse {
    pub fn into_records(self) -> Vec<Record> {
        match self {
            SearchResponse::Wrapped { results } => results,
            SearchResponse::Bare(results) => results,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    Fulltext,
    Vector,
    #[default]
    Hybrid,
}

impl SearchMode {
    pub const ALL: [SearchMode; 3] = [SearchMode::Fulltext, SearchMode::Vector, SearchMode::Hybrid];

    /// Value sent as `search_type`.
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchMode::Fulltext => "fulltext",
            SearchMode::Vector => "vector",
            SearchMode::Hybrid => "hybrid",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SearchMode::Fulltext => "Full-Text Search",
            SearchMode::Vector => "Vector Search",
            SearchMode::Hybrid => "Hybrid Search (RRF)",
        }
    }

    pub fn index(&self) -> usize {
        Self::ALL
            .iter()
            .position(|mode| mode == self)
            .unwrap_or_default()
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fulltext" => Ok(SearchMode::Fulltext),
            "vector" => Ok(SearchMode::Vector),
            "hybrid" => Ok(SearchMode::Hybrid),
            other => Err(format!(
                "unknown search mode {other:?}, expected fulltext, vector or hybrid"
            )),
        }
    }
}

/// The (term, mode) pair a search is keyed by.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueryKey {
    pub term: String,
    pub mode: SearchMode,
}

impl QueryKey {
    pub fn new(term: impl Into<String>, mode: SearchMode) -> Self {
        Self {
            term: term.into(),
            mode,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.term.is_empty()
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} ({})", self.term, self.mode)
    }
}
