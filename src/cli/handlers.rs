use std::sync::Arc;

use crate::{
    app::{notify::QueuedNotifier, AppFactory},
    cli::{
        errors::{CliError, CliResult},
        validation::validate_search_term,
    },
    config::Config,
    records::SearchMode,
    view::Session,
};

fn create_session(config: &Config, backend: Option<&str>) -> CliResult<Session> {
    let notifications = Arc::new(QueuedNotifier::new());
    let service = AppFactory::create_service(config, backend, notifications.clone())?;

    Ok(Session::new(
        Arc::new(service),
        notifications,
        config.default_mode,
    ))
}

pub fn handle_search(
    term: String,
    mode: Option<SearchMode>,
    json: bool,
    config: &Config,
    backend: Option<&str>,
) -> CliResult<()> {
    validate_search_term(&term)?;

    let mut session = create_session(config, backend)?;
    if json {
        session = session.without_spinner();
    }
    let mode = mode.unwrap_or(config.default_mode);

    session.submit_search(&term, mode);
    session.wait_for_results();

    if json {
        let records = serde_json::to_string_pretty(&session.state().results)?;
        println!("{records}");
    } else {
        session.print_results();
    }
    session.flush_notifications();

    match session.last_failure() {
        Some(message) => Err(CliError::Search {
            message: message.to_string(),
        }),
        None => Ok(()),
    }
}

pub fn handle_load(config: &Config, backend: Option<&str>) -> CliResult<()> {
    let notifications = Arc::new(QueuedNotifier::new());
    let service = AppFactory::create_service(config, backend, notifications.clone())?;

    let result = service.trigger_load();
    for notification in notifications.drain() {
        eprintln!("{notification}");
    }

    Ok(result?)
}

pub fn handle_interactive(config: &Config, backend: Option<&str>) -> CliResult<()> {
    let mut session = create_session(config, backend)?;

    let result = session.run_interactive();
    session.finish();
    result
}
