//! Internal domain models for book lookup and enrichment.
//!
//! These types are OUR types - they don't change when the Goodreads payloads change.
//! Everything read from a response gets converted into these types by the pipeline.

use serde::Deserialize;

/// A partial book record supplied by the user (one reading-list row)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BookQuery {
    pub title: String,
    pub author: String,
    /// ISBN-10 or ISBN-13, when the reading list has one
    #[serde(default)]
    pub isbn: Option<String>,
}

impl BookQuery {
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            isbn: None,
        }
    }

    pub fn with_isbn(mut self, isbn: impl Into<String>) -> Self {
        self.isbn = Some(isbn.into());
        self
    }

    /// The ISBN, if present and not blank
    pub fn isbn(&self) -> Option<&str> {
        self.isbn
            .as_deref()
            .map(str::trim)
            .filter(|isbn| !isbn.is_empty())
    }
}

/// Fields derived from a successful by-id lookup
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BookDetails {
    /// Goodreads book ID
    pub id: String,
    /// Input ISBN when supplied, otherwise the one Goodreads knows (may be empty)
    pub isbn: String,
    pub num_pages: Option<String>,
    /// Thumbnail URL, or a constructed cover URL when Goodreads has no photo
    pub image_url: String,
    pub average_rating: String,
    /// Year of first publication (from the work, not this edition)
    pub publication_year: String,
    /// Goodreads page for the book
    pub url: String,
    /// Markdown link to `url`, or the plain title
    pub display_title: String,
    /// Markdown image reference, or empty when there is no image
    pub display_image: String,
}

/// What happened when a record was looked up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    /// Both lookup stages found the book
    Enriched(BookDetails),
    /// A lookup stage returned no book identifier
    NotFound,
    /// A lookup stage failed with an error
    Failed(String),
}

/// One output row: the original query plus the lookup outcome.
///
/// A record is either fully enriched or passed through untouched; there is
/// no partially derived state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedBook {
    pub query: BookQuery,
    pub outcome: LookupOutcome,
}

impl EnrichedBook {
    pub fn enriched(query: BookQuery, details: BookDetails) -> Self {
        Self {
            query,
            outcome: LookupOutcome::Enriched(details),
        }
    }

    pub fn pass_through(query: BookQuery, outcome: LookupOutcome) -> Self {
        debug_assert!(!matches!(outcome, LookupOutcome::Enriched(_)));
        Self { query, outcome }
    }

    pub fn details(&self) -> Option<&BookDetails> {
        match &self.outcome {
            LookupOutcome::Enriched(details) => Some(details),
            _ => None,
        }
    }

    pub fn is_enriched(&self) -> bool {
        self.details().is_some()
    }

    /// Title as it should be displayed (linked when enriched with a URL)
    pub fn display_title(&self) -> &str {
        self.details()
            .map(|d| d.display_title.as_str())
            .unwrap_or(&self.query.title)
    }

    /// ISBN for display: the derived one, or whatever the input carried
    pub fn isbn(&self) -> &str {
        match self.details() {
            Some(details) => &details.isbn,
            None => self.query.isbn().unwrap_or_default(),
        }
    }
}

/// Errors that can occur while talking to the catalog API
#[derive(Debug, Clone, thiserror::Error)]
pub enum CatalogError {
    /// Connection failure or non-success HTTP status
    #[error("Transport error on {endpoint}: {message}")]
    Transport { endpoint: String, message: String },

    /// The body does not parse as the declared format
    #[error("Failed to parse {format} response from {endpoint}: {message}")]
    Protocol {
        endpoint: String,
        format: String,
        message: String,
    },

    /// The body parsed but held nothing
    #[error("Server returned an empty response for {endpoint}")]
    Server { endpoint: String },

    /// Missing API key or HTTP client; fatal to the whole run
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl CatalogError {
    /// Whether this error should stop the whole run rather than one call
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}
