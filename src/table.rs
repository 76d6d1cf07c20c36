//! Markdown table rendering for enriched books.
//!
//! Produces a GitHub-flavored table: header row, alignment row, then one row
//! per book in input order. Cells are padded so the raw text lines up too.

use crate::catalog::EnrichedBook;

/// Column alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

/// Which value of an enriched book a column shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKey {
    Image,
    Author,
    Title,
    Isbn,
    NumPages,
    PublicationYear,
    AverageRating,
}

impl ColumnKey {
    /// Cell value for a book; pass-through books only have their input fields
    pub fn value(self, book: &EnrichedBook) -> String {
        let details = book.details();
        let detail = |f: fn(&crate::catalog::BookDetails) -> String| details.map(f).unwrap_or_default();

        match self {
            Self::Image => detail(|d| d.display_image.clone()),
            Self::Author => book.query.author.clone(),
            Self::Title => book.display_title().to_string(),
            Self::Isbn => book.isbn().to_string(),
            Self::NumPages => detail(|d| d.num_pages.clone().unwrap_or_default()),
            Self::PublicationYear => detail(|d| d.publication_year.clone()),
            Self::AverageRating => detail(|d| d.average_rating.clone()),
        }
    }
}

/// One table column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub key: ColumnKey,
    pub header: String,
    pub alignment: Alignment,
}

impl Column {
    pub fn new(key: ColumnKey, header: impl Into<String>, alignment: Alignment) -> Self {
        Self {
            key,
            header: header.into(),
            alignment,
        }
    }
}

/// Columns used by the `parse` command
pub fn default_columns() -> Vec<Column> {
    vec![
        Column::new(ColumnKey::Image, "#", Alignment::Left),
        Column::new(ColumnKey::Author, "Author", Alignment::Left),
        Column::new(ColumnKey::Title, "Title", Alignment::Left),
        Column::new(ColumnKey::Isbn, "ISBN", Alignment::Left),
        Column::new(ColumnKey::PublicationYear, "Published", Alignment::Left),
        Column::new(ColumnKey::AverageRating, "Rating", Alignment::Left),
    ]
}

/// Render the table, one string per line
pub fn render(columns: &[Column], books: &[EnrichedBook]) -> Vec<String> {
    let rows: Vec<Vec<String>> = books
        .iter()
        .map(|book| columns.iter().map(|c| escape(&c.key.value(book))).collect())
        .collect();

    // Alignment markers need at least three characters
    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            rows.iter()
                .map(|row| row[i].chars().count())
                .chain([column.header.chars().count(), 3])
                .max()
                .unwrap_or(3)
        })
        .collect();

    let mut lines = Vec::with_capacity(rows.len() + 2);

    let headers: Vec<String> = columns.iter().map(|c| escape(&c.header)).collect();
    lines.push(format_row(columns, &widths, &headers));

    let separators: Vec<String> = columns
        .iter()
        .zip(&widths)
        .map(|(column, &width)| separator(column.alignment, width))
        .collect();
    lines.push(format!("| {} |", separators.join(" | ")));

    for row in &rows {
        lines.push(format_row(columns, &widths, row));
    }
    lines
}

fn format_row(columns: &[Column], widths: &[usize], cells: &[String]) -> String {
    let padded: Vec<String> = columns
        .iter()
        .zip(widths)
        .zip(cells)
        .map(|((column, &width), cell)| pad(cell, width, column.alignment))
        .collect();
    format!("| {} |", padded.join(" | "))
}

fn pad(cell: &str, width: usize, alignment: Alignment) -> String {
    let fill = width.saturating_sub(cell.chars().count());
    match alignment {
        Alignment::Left => format!("{}{}", cell, " ".repeat(fill)),
        Alignment::Right => format!("{}{}", " ".repeat(fill), cell),
        Alignment::Center => {
            let left = fill / 2;
            format!("{}{}{}", " ".repeat(left), cell, " ".repeat(fill - left))
        }
    }
}

fn separator(alignment: Alignment, width: usize) -> String {
    match alignment {
        Alignment::Left => format!(":{}", "-".repeat(width - 1)),
        Alignment::Right => format!("{}:", "-".repeat(width - 1)),
        Alignment::Center => format!(":{}:", "-".repeat(width - 2)),
    }
}

/// Keep cell text from breaking the table
fn escape(text: &str) -> String {
    text.replace('|', "\\|").replace(['\r', '\n'], " ")
}
