//! Book catalog module - fetches Goodreads metadata and enriches reading-list rows.
//!
//! # Architecture
//!
//! This module keeps a clean separation between:
//! - **Domain models** (`domain.rs`) - our types: queries, enriched rows, errors
//! - **Responses** (`response.rs`, `normalize.rs`) - XML and JSON bodies flattened
//!   into one generic [`ApiResponse`] value
//! - **Transport** (`transport.rs`, `rate_limit.rs`) - one HTTP call per limiter turn
//! - **Client** (`client.rs`) - one method per Goodreads endpoint
//! - **Pipeline** (`pipeline.rs`) - per-record lookup, refetch and field derivation
//!
//! The pipeline talks to the client through the [`BookCatalog`] trait, so it can
//! be tested against a mock without any HTTP.
//!
//! # Usage
//!
//! ```ignore
//! use catalog::{ClientConfig, EnrichmentPipeline, GoodreadsClient};
//!
//! let client = GoodreadsClient::new(ClientConfig::new("your-api-key"))?;
//! let pipeline = EnrichmentPipeline::new(client);
//!
//! let books = pipeline.enrich_all(queries).await?;
//! ```

pub mod client;
pub mod domain;
pub mod normalize;
pub mod pipeline;
pub mod rate_limit;
pub mod response;
pub mod traits;
pub mod transport;

pub use client::{ClientConfig, GoodreadsClient, ListOptions, UserRef};
pub use domain::{BookDetails, BookQuery, CatalogError, EnrichedBook, LookupOutcome};
pub use pipeline::EnrichmentPipeline;
pub use response::ApiResponse;
pub use traits::BookCatalog;
pub use transport::ResponseFormat;
