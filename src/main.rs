use clap::Parser;
use tracing_subscriber::EnvFilter;

mod app;
mod cli;
mod config;
mod records;
mod storage;
#[cfg(test)]
mod tests;
mod view;

use app::AppFactory;

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let args = cli::Args::parse();
    setup_logging();

    #[cfg(feature = "markdown-docs")]
    if let cli::Command::MarkdownDocs {} = args.command {
        clap_markdown::print_help_markdown::<cli::Args>();
        return Ok(());
    }

    let config = AppFactory::load_config()?;
    let backend = args.backend.as_deref();

    match args.command {
        #[cfg(feature = "markdown-docs")]
        cli::Command::MarkdownDocs {} => Ok(()),

        cli::Command::Search { term, mode, json } => {
            Ok(cli::handle_search(term, mode, json, &config, backend)?)
        }

        cli::Command::Load {} => Ok(cli::handle_load(&config, backend)?),

        cli::Command::Interactive {} => Ok(cli::handle_interactive(&config, backend)?),
    }
}
