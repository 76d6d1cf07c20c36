//! Enrichment pipeline - turns reading-list rows into enriched book rows
//!
//! For each record:
//! 1. Look the book up by ISBN, or by title and author when there is no ISBN
//! 2. Refetch it by Goodreads ID (the lookup endpoints return a thinner record)
//! 3. Derive the display fields from the full record
//!
//! If either lookup yields no book ID, or fails outright, the record passes
//! through unchanged. One bad record never stops the batch; only a
//! configuration error (see [`CatalogError::is_fatal`]) ends the run.

use super::domain::{BookDetails, BookQuery, CatalogError, EnrichedBook, LookupOutcome};
use super::response::{ApiResponse, scalar_at};
use super::traits::BookCatalog;

/// Substring Goodreads puts in placeholder thumbnail URLs
pub const NO_PHOTO_MARKER: &str = "nophoto";

/// Cover image URL used when Goodreads only has a placeholder
pub fn cover_url(isbn: &str) -> String {
    format!("https://covers.openlibrary.org/b/isbn/{}-M.jpg", isbn)
}

/// The book ID in a lookup response, if it has a usable one
pub fn book_id(response: &ApiResponse) -> Option<&str> {
    response
        .path(&["book", "id"])
        .and_then(ApiResponse::as_str)
        .map(str::trim)
        .filter(|id| !id.is_empty())
}

/// Stable sort by author; records by the same author keep their input order
pub fn sort_by_author(queries: &mut [BookQuery]) {
    queries.sort_by(|a, b| a.author.cmp(&b.author));
}

/// Derive every output field from a full `book/show` response
pub fn derive_details(query: &BookQuery, response: &ApiResponse) -> BookDetails {
    let field = |keys: &[&str]| -> String {
        let mut path = vec!["book"];
        path.extend_from_slice(keys);
        scalar_at(response, &path).trim().to_string()
    };

    let isbn = match query.isbn() {
        Some(isbn) => isbn.to_string(),
        None => field(&["isbn"]),
    };
    let num_pages = Some(field(&["num_pages"])).filter(|pages| !pages.is_empty());
    // Copied as sent
    let url = scalar_at(response, &["book", "url"]).to_string();

    let thumbnail = field(&["small_image_url"]);
    let image_url = if thumbnail.contains(NO_PHOTO_MARKER) && !isbn.is_empty() {
        cover_url(&isbn)
    } else {
        thumbnail
    };

    let display_title = if url.is_empty() {
        query.title.clone()
    } else {
        format!("[{}]({})", query.title, url)
    };
    let display_image = if image_url.is_empty() {
        String::new()
    } else {
        format!("![{}]({})", display_title, image_url)
    };

    BookDetails {
        id: book_id(response).unwrap_or_default().to_string(),
        isbn,
        num_pages,
        image_url,
        average_rating: scalar_at(response, &["book", "average_rating"]).to_string(),
        publication_year: field(&["work", "original_publication_year"]),
        url,
        display_title,
        display_image,
    }
}

/// Per-record lookup, refetch and derive
pub struct EnrichmentPipeline<C> {
    catalog: C,
}

impl<C: BookCatalog> EnrichmentPipeline<C> {
    pub fn new(catalog: C) -> Self {
        Self { catalog }
    }

    #[cfg(test)]
    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Enrich one record. Lookup problems yield a pass-through row; only fatal
    /// errors are returned.
    pub async fn enrich(&self, query: BookQuery) -> Result<EnrichedBook, CatalogError> {
        tracing::info!("Querying Goodreads for {} - {}", query.title, query.author);

        let book = match self.lookup(&query).await {
            Ok(Some(response)) => {
                let details = derive_details(&query, &response);
                EnrichedBook::enriched(query, details)
            }
            Ok(None) => {
                tracing::info!("No Goodreads match for {} - {}", query.title, query.author);
                EnrichedBook::pass_through(query, LookupOutcome::NotFound)
            }
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                tracing::warn!("Lookup failed for {} - {}: {}", query.title, query.author, e);
                EnrichedBook::pass_through(query, LookupOutcome::Failed(e.to_string()))
            }
        };
        Ok(book)
    }

    /// Sort records by author, then enrich them one at a time in that order
    pub async fn enrich_all(
        &self,
        mut queries: Vec<BookQuery>,
    ) -> Result<Vec<EnrichedBook>, CatalogError> {
        sort_by_author(&mut queries);

        let total = queries.len();
        let mut results = Vec::with_capacity(total);
        for (i, query) in queries.into_iter().enumerate() {
            results.push(self.enrich(query).await?);

            if (i + 1) % 10 == 0 {
                tracing::info!("Enriched {}/{} books", i + 1, total);
            }
        }

        let enriched = results.iter().filter(|b| b.is_enriched()).count();
        tracing::info!("Enriched {} of {} books", enriched, total);
        Ok(results)
    }

    /// Primary lookup then refetch by ID. `Ok(None)` when either stage has no ID.
    async fn lookup(&self, query: &BookQuery) -> Result<Option<ApiResponse>, CatalogError> {
        let primary = match query.isbn() {
            Some(isbn) => self.catalog.book_by_isbn(isbn).await?,
            None => {
                self.catalog
                    .book_by_title(&query.title, &query.author)
                    .await?
            }
        };

        let Some(id) = book_id(&primary) else {
            return Ok(None);
        };

        let full = self.catalog.book_by_id(id).await?;
        if book_id(&full).is_none() {
            return Ok(None);
        }
        Ok(Some(full))
    }
}
