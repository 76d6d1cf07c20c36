//! Raw Goodreads endpoint queries.
//!
//! Each command calls one endpoint and prints the normalized response as
//! pretty JSON, whatever format it arrived in.

use tokio::runtime::Runtime;

use crate::catalog::{ApiResponse, CatalogError, GoodreadsClient, ListOptions, UserRef};

use super::Commands;

/// Run a single-endpoint command
pub fn cmd_lookup(rt: &Runtime, client: &GoodreadsClient, command: &Commands) -> anyhow::Result<()> {
    let result = match command {
        Commands::Author { id } => rt.block_on(client.get_author(*id)),
        Commands::AuthorBooks { id, page } => rt.block_on(client.get_books_by_author(*id, *page)),
        Commands::Book { id } => rt.block_on(client.get_book(id)),
        Commands::Isbn { isbn } => rt.block_on(client.get_book_by_isbn(isbn)),
        Commands::Title { title, author } => {
            rt.block_on(client.get_book_by_title(title, author.as_deref()))
        }
        Commands::User { user } => rt.block_on(client.get_user(&UserRef::from(user.as_str()))),
        Commands::Review { id, page } => rt.block_on(client.get_review(*id, *page)),
        Commands::Shelf {
            user_id,
            shelf,
            list,
        } => rt.block_on(client.get_shelf(*user_id, shelf, &ListOptions::from(list))),
        Commands::Books { user_id, list } => {
            rt.block_on(client.get_all_books(*user_id, &ListOptions::from(list)))
        }
        Commands::LatestReads {
            user_id,
            limit,
            page,
        } => rt.block_on(client.get_latest_reads(*user_id, *limit, *page)),
        Commands::Parse { .. } | Commands::CheckConfig | Commands::InitConfig { .. } => {
            anyhow::bail!("not a lookup command")
        }
    };

    print_response(result)
}

/// Print a response as pretty JSON, or hand back the error
fn print_response(result: Result<ApiResponse, CatalogError>) -> anyhow::Result<()> {
    let response = result?;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
