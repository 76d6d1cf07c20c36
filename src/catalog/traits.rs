//! Trait definitions for the book catalog.
//!
//! The enrichment pipeline only needs three lookups. Putting them behind a
//! trait lets tests drive the pipeline with a mock instead of the HTTP client.
//!
//! # Example
//!
//! ```ignore
//! use book_minder::catalog::pipeline::book_id;
//! use book_minder::catalog::traits::BookCatalog;
//!
//! async fn first_id<C: BookCatalog>(catalog: &C) -> Option<String> {
//!     let response = catalog.book_by_isbn("9780441013593").await.ok()?;
//!     book_id(&response).map(str::to_string)
//! }
//! ```

use async_trait::async_trait;

use super::client::GoodreadsClient;
use super::domain::CatalogError;
use super::rate_limit::RateLimit;
use super::response::ApiResponse;
use super::transport::Transport;

/// Book lookups used by the enrichment pipeline.
///
/// Implement this trait to create mock implementations for testing.
#[async_trait]
pub trait BookCatalog: Send + Sync {
    /// Look up a book by ISBN
    async fn book_by_isbn(&self, isbn: &str) -> Result<ApiResponse, CatalogError>;

    /// Look up a book by title and author
    async fn book_by_title(&self, title: &str, author: &str)
    -> Result<ApiResponse, CatalogError>;

    /// Fetch the full record of a book by its Goodreads ID
    async fn book_by_id(&self, id: &str) -> Result<ApiResponse, CatalogError>;
}

#[async_trait]
impl<T: Transport, R: RateLimit> BookCatalog for GoodreadsClient<T, R> {
    async fn book_by_isbn(&self, isbn: &str) -> Result<ApiResponse, CatalogError> {
        self.get_book_by_isbn(isbn).await
    }

    async fn book_by_title(
        &self,
        title: &str,
        author: &str,
    ) -> Result<ApiResponse, CatalogError> {
        let author = Some(author).filter(|a| !a.trim().is_empty());
        self.get_book_by_title(title, author).await
    }

    async fn book_by_id(&self, id: &str) -> Result<ApiResponse, CatalogError> {
        self.get_book(id).await
    }
}
