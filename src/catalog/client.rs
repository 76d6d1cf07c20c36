//! Goodreads API client
//!
//! Builds endpoint paths and query parameters, sends them through a
//! [`Transport`] while holding a [`RateLimit`] turn, then normalizes bodies.
//!
//! ## API quirks
//!
//! - Every request carries the API key as `key` in the query string.
//! - The format is selected twice: a `format` parameter and the Accept header.
//! - `review/list` (shelves, all books) only speaks XML and needs `v=2`. Those
//!   requests force XML no matter what the client's default format is.
//! - There is no retry. A failed call returns its error and the caller decides.

use std::fmt;
use std::time::Duration;

use super::domain::CatalogError;
use super::normalize;
use super::rate_limit::{DEFAULT_INTERVAL, IntervalLimiter, RateLimit};
use super::response::ApiResponse;
use super::transport::{ApiRequest, DEFAULT_BASE_URL, HttpTransport, ResponseFormat, Transport};

/// Upper bound Goodreads accepts for `per_page`
pub const MAX_PER_PAGE: u32 = 200;

/// Immutable client settings, fixed before the first call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_key: String,
    pub base_url: String,
    /// Format for endpoints that support a choice
    pub format: ResponseFormat,
    /// Minimum gap between two requests
    pub request_interval: Duration,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            format: ResponseFormat::Xml,
            request_interval: DEFAULT_INTERVAL,
        }
    }
}

/// A Goodreads user, by numeric ID or by username
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserRef {
    Id(u64),
    Username(String),
}

impl From<&str> for UserRef {
    /// Numeric input is an ID, anything else a username
    fn from(value: &str) -> Self {
        match value.trim().parse::<u64>() {
            Ok(id) => Self::Id(id),
            Err(_) => Self::Username(value.trim().to_string()),
        }
    }
}

impl fmt::Display for UserRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{}", id),
            Self::Username(name) => f.write_str(name),
        }
    }
}

/// Sorting and paging for `review/list`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListOptions {
    /// title, author, rating, year_pub, date_pub, date_read, date_added, avg_rating, ...
    pub sort: String,
    /// Results per page, 1-200
    pub limit: u32,
    /// Page number, 1-N
    pub page: u32,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            sort: "title".to_string(),
            limit: 100,
            page: 1,
        }
    }
}

/// Goodreads API client
pub struct GoodreadsClient<T = HttpTransport, R = IntervalLimiter> {
    config: ClientConfig,
    transport: T,
    limiter: R,
}

impl GoodreadsClient {
    /// Create a client with the real HTTP transport and interval pacing.
    ///
    /// Fails with [`CatalogError::Configuration`] when the API key is missing
    /// or no HTTP client can be built.
    pub fn new(config: ClientConfig) -> Result<Self, CatalogError> {
        let transport = HttpTransport::new(config.base_url.clone())?;
        let limiter = IntervalLimiter::new(config.request_interval);
        Self::with_parts(config, transport, limiter)
    }
}

impl<T: Transport, R: RateLimit> GoodreadsClient<T, R> {
    /// Create a client from explicit parts (custom transport or pacing)
    pub fn with_parts(config: ClientConfig, transport: T, limiter: R) -> Result<Self, CatalogError> {
        if config.api_key.trim().is_empty() {
            return Err(CatalogError::Configuration(
                "Goodreads API key is required".to_string(),
            ));
        }
        Ok(Self {
            config,
            transport,
            limiter,
        })
    }

    /// Get details for a given author
    pub async fn get_author(&self, author_id: u64) -> Result<ApiResponse, CatalogError> {
        self.request("author/show", &[("id", author_id.to_string())])
            .await
    }

    /// Get books by a given author, one page at a time
    pub async fn get_books_by_author(
        &self,
        author_id: u64,
        page: u32,
    ) -> Result<ApiResponse, CatalogError> {
        self.request(
            "author/list",
            &[("id", author_id.to_string()), ("page", page.max(1).to_string())],
        )
        .await
    }

    /// Get details for a given book
    pub async fn get_book(&self, book_id: &str) -> Result<ApiResponse, CatalogError> {
        self.request("book/show", &[("id", book_id.to_string())])
            .await
    }

    /// Get details for a given book by ISBN
    pub async fn get_book_by_isbn(&self, isbn: &str) -> Result<ApiResponse, CatalogError> {
        let endpoint = format!("book/isbn/{}", urlencoding::encode(isbn.trim()));
        self.request(&endpoint, &[]).await
    }

    /// Get details for a given book by title; the author improves accuracy
    pub async fn get_book_by_title(
        &self,
        title: &str,
        author: Option<&str>,
    ) -> Result<ApiResponse, CatalogError> {
        self.request(
            "book/title",
            &[
                ("title", title.to_string()),
                ("author", author.unwrap_or_default().to_string()),
            ],
        )
        .await
    }

    /// Get details for a given user
    pub async fn get_user(&self, user: &UserRef) -> Result<ApiResponse, CatalogError> {
        let param = match user {
            UserRef::Id(id) => ("id", id.to_string()),
            UserRef::Username(name) => ("username", name.clone()),
        };
        self.request("user/show", &[param]).await
    }

    /// Get a review, with one page of its comments
    pub async fn get_review(&self, review_id: u64, page: u32) -> Result<ApiResponse, CatalogError> {
        self.request(
            "review/show",
            &[("id", review_id.to_string()), ("page", page.max(1).to_string())],
        )
        .await
    }

    /// Get a shelf (read, currently-reading, to-read, ...) for a given user
    pub async fn get_shelf(
        &self,
        user_id: u64,
        shelf: &str,
        options: &ListOptions,
    ) -> Result<ApiResponse, CatalogError> {
        self.request_review_list(user_id, Some(shelf), options).await
    }

    /// Get all books on all shelves for a given user
    pub async fn get_all_books(
        &self,
        user_id: u64,
        options: &ListOptions,
    ) -> Result<ApiResponse, CatalogError> {
        self.request_review_list(user_id, None, options).await
    }

    /// Get the latest books read by a given user
    pub async fn get_latest_reads(
        &self,
        user_id: u64,
        limit: u32,
        page: u32,
    ) -> Result<ApiResponse, CatalogError> {
        let options = ListOptions {
            sort: "date_read".to_string(),
            limit,
            page,
        };
        self.get_shelf(user_id, "read", &options).await
    }

    async fn request_review_list(
        &self,
        user_id: u64,
        shelf: Option<&str>,
        options: &ListOptions,
    ) -> Result<ApiResponse, CatalogError> {
        let mut params = vec![("v", "2".to_string()), ("id", user_id.to_string())];
        if let Some(shelf) = shelf {
            params.push(("shelf", shelf.to_string()));
        }
        params.extend([
            ("sort", options.sort.clone()),
            ("page", options.page.max(1).to_string()),
            ("per_page", options.limit.clamp(1, MAX_PER_PAGE).to_string()),
        ]);

        // review/list has no JSON variant upstream
        self.request_as("review/list", &params, ResponseFormat::Xml)
            .await
    }

    async fn request(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<ApiResponse, CatalogError> {
        self.request_as(endpoint, params, self.config.format).await
    }

    /// Build the request, send it, pause, then normalize the body
    async fn request_as(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
        format: ResponseFormat,
    ) -> Result<ApiResponse, CatalogError> {
        let request = self.build_request(endpoint, params, format);
        tracing::debug!(endpoint, %format, "Sending Goodreads request");

        let turn = self.limiter.acquire().await;
        let body = self.transport.fetch(&request).await;
        // Pace every call, including failed ones
        turn.finish().await;
        let body = body?;

        let response =
            normalize::normalize(&body, format).map_err(|e| CatalogError::Protocol {
                endpoint: endpoint.to_string(),
                format: format.to_string(),
                message: e.to_string(),
            })?;

        if response.is_empty() {
            return Err(CatalogError::Server {
                endpoint: endpoint.to_string(),
            });
        }
        Ok(response)
    }

    fn build_request(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
        format: ResponseFormat,
    ) -> ApiRequest {
        let mut all_params = Vec::with_capacity(params.len() + 2);
        all_params.push(("key".to_string(), self.config.api_key.clone()));
        all_params.push(("format".to_string(), format.as_param().to_string()));
        all_params.extend(params.iter().map(|(k, v)| (k.to_string(), v.clone())));

        ApiRequest {
            endpoint: endpoint.to_string(),
            params: all_params,
            format,
        }
    }
}
