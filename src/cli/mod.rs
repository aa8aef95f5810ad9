use clap::{Parser, Subcommand};

use crate::records::SearchMode;

pub mod errors;
mod handlers;
pub mod validation;

pub use handlers::*;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Backend base url. Overrides MAGSEARCH_BACKEND_URL and the config file.
    #[clap(short, long, global = true)]
    pub backend: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate cli docs in markdown format
    #[cfg(feature = "markdown-docs")]
    #[clap(hide = true)]
    MarkdownDocs {},

    /// Search the backend and print the matching records
    Search {
        /// Free text. An empty term prints nothing and sends no request.
        #[clap(allow_hyphen_values = true)]
        term: String,

        /// Search type. Defaults to the configured mode.
        #[clap(short, long, value_enum)]
        mode: Option<SearchMode>,

        /// Print records as json instead of cards
        #[clap(long, default_value = "false")]
        json: bool,
    },
    /// Ask the backend to load and index its data
    Load {},
    /// Start an interactive search session
    Interactive {},
}
