//! Book Minder - enriches reading lists with Goodreads metadata.
//!
//! Reads a CSV of titles and authors, looks every book up on Goodreads and
//! prints a Markdown table with links, covers, publication years and ratings.
//! Individual Goodreads endpoints can also be queried directly.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod table;
#[cfg(test)]
pub mod test_utils;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Initialize logging; stdout is reserved for command output
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("book_minder=info".parse()?))
        .init();

    cli::run_command(&args)
}
