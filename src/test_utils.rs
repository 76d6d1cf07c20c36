//! Test utilities and fixtures for book-minder tests.
//!
//! This module provides canned Goodreads payloads, response builders and a
//! fake transport to reduce boilerplate in tests.
//!
//! # Example
//!
//! ```ignore
//! use crate::test_utils::{FakeTransport, BOOK_SHOW_XML};
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let transport = FakeTransport::new().respond_with(BOOK_SHOW_XML);
//!     // ... build a client around transport.clone(), then inspect transport.requests()
//! }
//! ```

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;

use crate::catalog::response::ApiResponse;
use crate::catalog::transport::{ApiRequest, Transport};
use crate::catalog::CatalogError;

/// `book/show` for Dune, as Goodreads sends it in XML
pub const BOOK_SHOW_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<GoodreadsResponse>
  <Request>
    <authentication>true</authentication>
      <key><![CDATA[test-key]]></key>
    <method><![CDATA[book_show]]></method>
  </Request>
  <book>
    <id>234225</id>
    <title><![CDATA[Dune]]></title>
    <isbn><![CDATA[0441013597]]></isbn>
    <isbn13><![CDATA[9780441013593]]></isbn13>
    <asin><![CDATA[]]></asin>
    <image_url>https://i.gr-assets.com/images/S/compressed.photo.goodreads.com/books/1555447414i/44767458._SX98_.jpg</image_url>
    <small_image_url>https://i.gr-assets.com/images/S/compressed.photo.goodreads.com/books/1555447414i/44767458._SY75_.jpg</small_image_url>
    <publication_year>2005</publication_year>
    <publisher>Ace Books</publisher>
    <num_pages><![CDATA[604]]></num_pages>
    <average_rating>4.27</average_rating>
    <url><![CDATA[https://www.goodreads.com/book/show/234225.Dune]]></url>
    <work>
      <id type="integer">3634639</id>
      <original_publication_year type="integer">1965</original_publication_year>
      <original_publication_month type="integer">8</original_publication_month>
      <original_title>Dune</original_title>
    </work>
    <authors>
      <author>
        <id>58</id>
        <name>Frank Herbert</name>
        <role></role>
      </author>
    </authors>
  </book>
</GoodreadsResponse>
"#;

/// The same book as [`BOOK_SHOW_XML`], encoded as JSON
pub const BOOK_SHOW_JSON: &str = r#"{
  "book": {
    "id": 234225,
    "title": "Dune",
    "isbn": "0441013597",
    "isbn13": "9780441013593",
    "image_url": "https://i.gr-assets.com/images/S/compressed.photo.goodreads.com/books/1555447414i/44767458._SX98_.jpg",
    "small_image_url": "https://i.gr-assets.com/images/S/compressed.photo.goodreads.com/books/1555447414i/44767458._SY75_.jpg",
    "publication_year": 2005,
    "publisher": "Ace Books",
    "num_pages": 604,
    "average_rating": 4.27,
    "url": "https://www.goodreads.com/book/show/234225.Dune",
    "work": {
      "id": 3634639,
      "original_publication_year": 1965,
      "original_publication_month": 8,
      "original_title": "Dune"
    },
    "authors": [{ "id": 58, "name": "Frank Herbert" }]
  }
}"#;

/// Thin `book/isbn` answer in JSON
pub const ISBN_LOOKUP_JSON: &str = r#"{"book": {"id": "234225", "title": "Dune"}}"#;

/// A book Goodreads knows little about: empty ISBN, page count and year
pub const NO_ISBN_BOOK_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<GoodreadsResponse>
  <book>
    <id>99</id>
    <title>Obscure</title>
    <isbn></isbn>
    <num_pages/>
    <small_image_url>https://s.gr-assets.com/assets/nophoto/book/50x75.png</small_image_url>
    <average_rating>0.0</average_rating>
    <url>https://www.goodreads.com/book/show/99</url>
    <work>
      <original_publication_year type="integer"></original_publication_year>
    </work>
  </book>
</GoodreadsResponse>
"#;

/// A lookup answer holding only a book ID
pub fn lookup_response(id: &str) -> ApiResponse {
    ApiResponse::from(json!({ "book": { "id": id } }))
}

/// A full book answer with the given thumbnail and URL
pub fn book_response(id: &str, small_image_url: &str, url: &str) -> ApiResponse {
    ApiResponse::from(json!({
        "book": {
            "id": id,
            "isbn": [],
            "num_pages": "120",
            "small_image_url": small_image_url,
            "average_rating": "3.50",
            "url": url,
            "work": { "original_publication_year": "2001" },
        }
    }))
}

#[derive(Default)]
struct FakeState {
    responses: VecDeque<Result<String, String>>,
    requests: Vec<ApiRequest>,
    fetched_at: Vec<tokio::time::Instant>,
}

/// Transport that replays canned bodies in order and records every request.
///
/// Clones share state, so keep one clone to inspect after handing the other
/// to a client.
#[derive(Clone, Default)]
pub struct FakeTransport {
    state: Arc<Mutex<FakeState>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful body
    pub fn respond_with(self, body: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .responses
            .push_back(Ok(body.to_string()));
        self
    }

    /// Queue a transport failure
    pub fn fail_with(self, message: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .responses
            .push_back(Err(message.to_string()));
        self
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn last_request(&self) -> Option<ApiRequest> {
        self.state.lock().unwrap().requests.last().cloned()
    }

    /// When each request reached the transport, in order
    pub fn fetched_at(&self) -> Vec<tokio::time::Instant> {
        self.state.lock().unwrap().fetched_at.clone()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn fetch(&self, request: &ApiRequest) -> Result<String, CatalogError> {
        let mut state = self.state.lock().unwrap();
        state.requests.push(request.clone());
        state.fetched_at.push(tokio::time::Instant::now());
        match state.responses.pop_front() {
            Some(Ok(body)) => Ok(body),
            Some(Err(message)) => Err(CatalogError::Transport {
                endpoint: request.endpoint.clone(),
                message,
            }),
            None => Err(CatalogError::Transport {
                endpoint: request.endpoint.clone(),
                message: "no canned response left".to_string(),
            }),
        }
    }
}
