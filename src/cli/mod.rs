//! Command-line interface for book-minder.
//!
//! This module provides CLI commands for enriching reading lists and
//! querying individual Goodreads endpoints.

mod commands;

pub use commands::{Cli, Commands, run_command};
