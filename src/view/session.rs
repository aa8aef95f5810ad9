use std::{
    fmt,
    sync::{
        mpsc::{self, RecvTimeoutError},
        Arc,
    },
    thread::JoinHandle,
    time::Duration,
};

use indicatif::{ProgressBar, ProgressStyle};
use inquire::{validator::Validation, Select, Text};

use crate::{
    app::{
        notify::{Notification, Notifier, QueuedNotifier},
        service::SearchService,
    },
    cli::{
        errors::{CliError, CliResult},
        validation::validate_search_term,
    },
    records::{Record, SearchMode},
    view::{
        render,
        state::{Resolution, SearchTicket, ViewState},
    },
};

const TICK: Duration = Duration::from_millis(80);
const LOAD_WORKER_DIED: &str = "load worker stopped unexpectedly";

struct SearchCompletion {
    ticket: SearchTicket,
    outcome: Result<Vec<Record>, String>,
}

struct InFlight {
    ticket: SearchTicket,
    handle: JoinHandle<()>,
}

#[derive(Debug, Clone, Copy)]
enum MenuAction {
    Search,
    LoadData,
    Quit,
}

impl fmt::Display for MenuAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MenuAction::Search => "Search",
            MenuAction::LoadData => "Load Data",
            MenuAction::Quit => "Quit",
        })
    }
}

#[derive(Debug, Clone, Copy)]
struct ModeChoice(SearchMode);

impl fmt::Display for ModeChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.label())
    }
}

/// Drives the view state from the UI thread.
///
/// Requests run on worker threads and report back over a channel. Only the
/// UI thread touches `state`, and a completion is applied only while its
/// ticket is still the submitted one.
pub struct Session {
    service: Arc<SearchService>,
    notifications: Arc<QueuedNotifier>,
    state: ViewState,
    tx: mpsc::Sender<SearchCompletion>,
    rx: mpsc::Receiver<SearchCompletion>,
    in_flight: Vec<InFlight>,
    loads: Vec<JoinHandle<()>>,
    last_failure: Option<String>,
    spinner: bool,
}

impl Session {
    pub fn new(
        service: Arc<SearchService>,
        notifications: Arc<QueuedNotifier>,
        mode: SearchMode,
    ) -> Self {
        let (tx, rx) = mpsc::channel();

        Self {
            service,
            notifications,
            state: ViewState::new(mode),
            tx,
            rx,
            in_flight: vec![],
            loads: vec![],
            last_failure: None,
            spinner: true,
        }
    }

    pub fn without_spinner(mut self) -> Self {
        self.spinner = false;
        self
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Error message of the last applied search, if it failed.
    pub fn last_failure(&self) -> Option<&str> {
        self.last_failure.as_deref()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Edits the input and mode, then presses Search.
    pub fn submit_search(&mut self, term: &str, mode: SearchMode) -> Option<SearchTicket> {
        self.state.edit_input(term);
        self.state.select_mode(mode);

        let ticket = self.state.submit()?;
        self.dispatch(ticket.clone());
        Some(ticket)
    }

    fn dispatch(&mut self, ticket: SearchTicket) {
        let service = self.service.clone();
        let tx = self.tx.clone();
        let worker_ticket = ticket.clone();

        let handle = std::thread::spawn(move || {
            let _span = tracing::info_span!(
                "search",
                key = %worker_ticket.key,
                generation = worker_ticket.generation
            )
            .entered();

            let outcome = service
                .search(&worker_ticket.key)
                .map_err(|err| err.to_string());

            let completion = SearchCompletion {
                ticket: worker_ticket,
                outcome,
            };
            if tx.send(completion).is_err() {
                log::debug!("session closed before search finished");
            }
        });

        self.in_flight.push(InFlight { ticket, handle });
    }

    fn apply(&mut self, completion: SearchCompletion) {
        let SearchCompletion { ticket, outcome } = completion;

        if let Some(idx) = self
            .in_flight
            .iter()
            .position(|f| f.ticket.generation == ticket.generation)
        {
            let worker = self.in_flight.swap_remove(idx);
            if worker.handle.join().is_err() {
                log::error!("search worker for {} panicked", ticket.key);
            }
        }

        let failure = outcome.as_ref().err().cloned();
        match self.state.resolve(&ticket, outcome) {
            Resolution::Applied => self.last_failure = failure,
            Resolution::Stale => {
                log::debug!(
                    "dropping stale results for {} (generation {})",
                    ticket.key,
                    ticket.generation
                );
            }
        }
    }

    /// Applies whatever completions are already waiting, without blocking.
    /// Returns how many were processed.
    pub fn pump(&mut self) -> usize {
        let mut processed = 0;
        while let Ok(completion) = self.rx.try_recv() {
            self.apply(completion);
            processed += 1;
        }

        self.reap_dead_workers();
        self.reap_loads();
        processed
    }

    /// A worker that finished without sending anything has died. Its ticket
    /// resolves as a failure so the view doesn't spin forever.
    fn reap_dead_workers(&mut self) {
        let (dead, alive): (Vec<_>, Vec<_>) = std::mem::take(&mut self.in_flight)
            .into_iter()
            .partition(|f| f.handle.is_finished());
        self.in_flight = alive;

        for worker in dead {
            // its completion may have landed after the last drain
            if let Ok(completion) = self.rx.try_recv() {
                self.in_flight.push(worker);
                self.apply(completion);
                continue;
            }

            if worker.handle.join().is_err() {
                log::error!("search worker for {} panicked", worker.ticket.key);
            }
            let message = "search worker stopped unexpectedly".to_string();
            if self.state.resolve(&worker.ticket, Err(message.clone())) == Resolution::Applied {
                self.last_failure = Some(message);
            }
        }
    }

    /// Blocks until the submitted search has resolved.
    pub fn wait_for_results(&mut self) {
        if !self.state.is_loading() {
            return;
        }

        let spinner = self.spinner.then(|| {
            let pb = ProgressBar::new_spinner().with_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.green} [{elapsed_precise}] {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner())
                    .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "),
            );
            if let Some(key) = &self.state.submitted {
                pb.set_message(format!("Searching {key}..."));
            }
            pb.enable_steady_tick(TICK);
            pb
        });

        while self.state.is_loading() {
            match self.rx.recv_timeout(TICK) {
                Ok(completion) => self.apply(completion),
                Err(RecvTimeoutError::Timeout) => self.pump_dead(),
                // we hold a sender, so this can't happen
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        if let Some(pb) = spinner {
            pb.finish_and_clear();
        }
    }

    fn pump_dead(&mut self) {
        if self.in_flight.iter().any(|f| f.handle.is_finished()) {
            self.pump();
        }
    }

    /// Fires a load in the background. It never touches the view state.
    pub fn trigger_load(&mut self) {
        self.reap_loads();

        let service = self.service.clone();
        self.loads.push(std::thread::spawn(move || {
            if let Err(err) = service.trigger_load() {
                log::warn!("load failed: {err}");
            }
        }));
    }

    pub fn loads_in_flight(&self) -> usize {
        self.loads.len()
    }

    fn reap_loads(&mut self) {
        let (done, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.loads)
            .into_iter()
            .partition(|handle| handle.is_finished());
        self.loads = pending;

        for handle in done {
            self.join_load(handle);
        }
    }

    /// A panicking load never reached the service's notifier, so report it here.
    fn join_load(&self, handle: JoinHandle<()>) {
        if handle.join().is_err() {
            log::error!("load worker panicked");
            self.notifications
                .notify(Notification::error("Failed to load data!", LOAD_WORKER_DIED));
        }
    }

    pub fn flush_notifications(&self) {
        for notification in self.notifications.drain() {
            eprintln!("{notification}");
        }
    }

    pub fn print_results(&self) {
        if self.state.is_loading() {
            return;
        }

        let results = &self.state.results;
        if !results.is_empty() {
            println!("{}", render::render_results(results));
        }
        println!("{} results", results.len());
    }

    fn prompt_and_search(&mut self) -> CliResult<()> {
        let term = Text::new("Search:")
            .with_placeholder("Search...")
            .with_initial_value(&self.state.input)
            .with_validator(|input: &str| {
                Ok::<_, inquire::error::CustomUserError>(match validate_search_term(input) {
                    Ok(()) => Validation::Valid,
                    Err(err) => Validation::Invalid(err.to_string().into()),
                })
            })
            .prompt()?;

        let choices = SearchMode::ALL.map(ModeChoice).to_vec();
        let ModeChoice(mode) = Select::new("Search type:", choices)
            .with_starting_cursor(self.state.mode.index())
            .prompt()?;

        self.submit_search(&term, mode);
        self.wait_for_results();
        self.flush_notifications();
        self.print_results();
        Ok(())
    }

    pub fn run_interactive(&mut self) -> CliResult<()> {
        let actions = vec![MenuAction::Search, MenuAction::LoadData, MenuAction::Quit];

        loop {
            self.pump();
            self.flush_notifications();

            let action = match Select::new("Action:", actions.clone()).prompt() {
                Ok(action) => action,
                Err(err) => match CliError::from(err) {
                    CliError::UserCancelled => break,
                    err => return Err(err),
                },
            };

            match action {
                MenuAction::Search => match self.prompt_and_search() {
                    Ok(()) | Err(CliError::UserCancelled) => {}
                    Err(err) => return Err(err),
                },
                MenuAction::LoadData => {
                    self.trigger_load();
                    eprintln!("Loading data in the background...");
                }
                MenuAction::Quit => break,
            }
        }

        Ok(())
    }

    /// Waits for background loads so their outcome is reported.
    pub fn finish(mut self) {
        self.reap_loads();
        if self.loads_in_flight() > 0 {
            log::warn!("waiting for {} load requests to finish", self.loads_in_flight());
        }

        for handle in std::mem::take(&mut self.loads) {
            self.join_load(handle);
        }

        self.pump();
        if self.in_flight() > 0 {
            log::debug!("{} superseded searches still in flight", self.in_flight());
        }
        self.flush_notifications();
    }
}
