//! CLI command definitions and dispatch.
//!
//! Each group of subcommands is implemented in its own submodule:
//! - `parse`: Reading-list enrichment into a Markdown table
//! - `lookup`: Raw Goodreads endpoint queries, printed as JSON
//! - `setup`: Config file inspection and creation

mod lookup;
mod parse;
mod setup;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tokio::runtime::Runtime;

use crate::catalog::{GoodreadsClient, ListOptions, ResponseFormat};
use crate::config::{self, Config, Overrides};

pub use lookup::cmd_lookup;
pub use parse::cmd_parse;
pub use setup::{cmd_check_config, cmd_init_config};

/// Book Minder CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub api: ApiArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Settings shared by every command that talks to Goodreads
#[derive(Args, Debug, Clone, Default)]
pub struct ApiArgs {
    /// Goodreads API key (or set GOODREADS_API_KEY env var)
    #[arg(short, long, env = "GOODREADS_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,
    /// Response format for endpoints that offer a choice
    #[arg(long, value_enum, global = true)]
    pub format: Option<ResponseFormat>,
    /// Minimum milliseconds between two requests
    #[arg(long, global = true)]
    pub interval_ms: Option<u64>,
}

impl ApiArgs {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            api_key: self.api_key.clone(),
            format: self.format,
            request_interval_ms: self.interval_ms,
        }
    }
}

/// Sorting and paging for shelf listings
#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Sort order: title, author, rating, year_pub, date_read, date_added, avg_rating, ...
    #[arg(long, default_value = "title")]
    pub sort: String,
    /// Results per page (1-200)
    #[arg(long, default_value_t = 100)]
    pub limit: u32,
    /// Page number
    #[arg(long, default_value_t = 1)]
    pub page: u32,
}

impl From<&ListArgs> for ListOptions {
    fn from(args: &ListArgs) -> Self {
        Self {
            sort: args.sort.clone(),
            limit: args.limit,
            page: args.page,
        }
    }
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Enrich a reading-list CSV (title, author, isbn) and print a Markdown table
    Parse {
        /// Path to the CSV file
        filename: PathBuf,
    },
    /// Show an author
    Author {
        /// Goodreads author ID
        id: u64,
    },
    /// List books by an author
    AuthorBooks {
        /// Goodreads author ID
        id: u64,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Show a book by Goodreads ID
    Book {
        /// Goodreads book ID
        id: String,
    },
    /// Show a book by ISBN
    Isbn {
        isbn: String,
    },
    /// Find a book by title
    Title {
        title: String,
        /// Author name, for a more accurate match
        #[arg(long)]
        author: Option<String>,
    },
    /// Show a user by ID or username
    User {
        /// Numeric user ID or username
        user: String,
    },
    /// Show a review and a page of its comments
    Review {
        /// Goodreads review ID
        id: u64,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// List the books on one of a user's shelves
    Shelf {
        /// Goodreads user ID
        user_id: u64,
        /// Shelf name (read, currently-reading, to-read, ...)
        shelf: String,
        #[command(flatten)]
        list: ListArgs,
    },
    /// List all books on all of a user's shelves
    Books {
        /// Goodreads user ID
        user_id: u64,
        #[command(flatten)]
        list: ListArgs,
    },
    /// List the books a user read most recently
    LatestReads {
        /// Goodreads user ID
        user_id: u64,
        #[arg(long, default_value_t = 100)]
        limit: u32,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Show where settings come from and whether an API key is available
    CheckConfig,
    /// Write a default config file
    InitConfig {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

/// Run the specified CLI command.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    let config = config::load();
    let overrides = cli.api.overrides();

    match &cli.command {
        Commands::CheckConfig => cmd_check_config(&config, &overrides),
        Commands::InitConfig { force } => cmd_init_config(*force),
        Commands::Parse { filename } => {
            let rt = Runtime::new()?;
            let client = build_client(&config, &overrides)?;
            cmd_parse(&rt, client, filename)
        }
        command => {
            let rt = Runtime::new()?;
            let client = build_client(&config, &overrides)?;
            cmd_lookup(&rt, &client, command)
        }
    }
}

// ============================================================================
// Shared helper functions
// ============================================================================

/// Build the API client; a missing key or HTTP backend stops the run here
pub(crate) fn build_client(config: &Config, overrides: &Overrides) -> anyhow::Result<GoodreadsClient> {
    let client_config = config.client_config(overrides);
    GoodreadsClient::new(client_config).context(
        "Cannot talk to Goodreads. Use --api-key YOUR_KEY, set GOODREADS_API_KEY, \
         or add goodreads_api_key to the config file",
    )
}
