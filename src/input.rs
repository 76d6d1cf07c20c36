//! Reading-list input.
//!
//! Reads a CSV file with a header row. Columns are matched by name: `title`
//! and `author` are required, `isbn` is optional. Any other columns are ignored.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::catalog::BookQuery;
use crate::error::{Error, Result, ResultExt};

/// One raw CSV row before validation
#[derive(Debug, Deserialize)]
struct Row {
    #[serde(default)]
    title: String,
    #[serde(default)]
    author: String,
    #[serde(default)]
    isbn: Option<String>,
}

/// Read a reading-list CSV file, in file order
pub fn read_file(path: &Path) -> Result<Vec<BookQuery>> {
    if !path.exists() {
        return Err(Error::not_found(path));
    }
    let file = std::fs::File::open(path).with_context(format!("opening {}", path.display()))?;
    read_from(file).with_context(format!("reading {}", path.display()))
}

/// Read reading-list rows from any reader
pub fn read_from<R: Read>(reader: R) -> Result<Vec<BookQuery>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut books = Vec::new();
    for (idx, result) in csv_reader.deserialize::<Row>().enumerate() {
        let row = result.with_context(format!("row {}", idx + 1))?;

        if row.title.is_empty() || row.author.is_empty() {
            tracing::warn!("Skipping row {}: title and author are required", idx + 1);
            continue;
        }

        let query = BookQuery::new(row.title, row.author);
        books.push(match row.isbn.filter(|isbn| !isbn.is_empty()) {
            Some(isbn) => query.with_isbn(isbn),
            None => query,
        });
    }

    tracing::debug!("Read {} books", books.len());
    Ok(books)
}
