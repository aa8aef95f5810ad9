use serde::{Deserialize, Serialize};

use crate::records::{QueryKey, Record, SearchMode};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Nothing submitted, or an empty term was submitted
    #[default]
    Idle,
    Loading,
    Loaded,
}

/// Identifies one submitted search. Completions are applied only while their
/// ticket is still the current one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchTicket {
    pub key: QueryKey,
    pub generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Applied,
    Stale,
}

/// Everything the search page shows, with one method per user action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    pub input: String,
    pub mode: SearchMode,
    pub submitted: Option<QueryKey>,
    pub generation: u64,
    pub phase: Phase,
    pub results: Vec<Record>,
}

impl ViewState {
    pub fn new(mode: SearchMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    pub fn edit_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn select_mode(&mut self, mode: SearchMode) {
        self.mode = mode;
    }

    /// Commits the pending input and mode. Returns the ticket to fetch, or
    /// `None` when the term is empty and there is nothing to ask the backend.
    pub fn submit(&mut self) -> Option<SearchTicket> {
        let key = QueryKey::new(self.input.clone(), self.mode);
        self.submitted = Some(key.clone());
        self.generation += 1;

        if key.is_empty() {
            self.results.clear();
            self.phase = Phase::Idle;
            return None;
        }

        self.phase = Phase::Loading;
        Some(SearchTicket {
            key,
            generation: self.generation,
        })
    }

    /// Applies a finished request. A failure keeps whatever was displayed.
    pub fn resolve<E>(&mut self, ticket: &SearchTicket, outcome: Result<Vec<Record>, E>) -> Resolution {
        if !self.is_current(ticket) {
            return Resolution::Stale;
        }

        if let Ok(records) = outcome {
            self.results = records;
        }
        self.phase = Phase::Loaded;
        Resolution::Applied
    }

    pub fn is_current(&self, ticket: &SearchTicket) -> bool {
        ticket.generation == self.generation && self.submitted.as_ref() == Some(&ticket.key)
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }
}
