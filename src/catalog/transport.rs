//! HTTP transport for the Goodreads API
//!
//! One [`Transport::fetch`] call is one outbound GET request. Every parameter,
//! including the API key, travels in the query string. The Accept header is
//! chosen from the requested [`ResponseFormat`].
//!
//! Only a failed send or read, or an error status with nothing in the body,
//! is a transport error. An error status with a body hands the body back so
//! normalization can read it: a lookup that matched nothing comes back as a
//! 404 whose body has no book in it.
//!
//! Pacing between calls is not done here - see [`super::rate_limit`].

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::domain::CatalogError;

/// Root URL of the API (no trailing slash)
pub const DEFAULT_BASE_URL: &str = "https://www.goodreads.com";

/// Body format requested from the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    #[default]
    Xml,
    Json,
}

impl ResponseFormat {
    /// Value of the `format` query parameter
    pub fn as_param(self) -> &'static str {
        match self {
            Self::Xml => "xml",
            Self::Json => "json",
        }
    }

    /// Value of the Accept header
    pub fn accept_header(self) -> &'static str {
        match self {
            Self::Xml => "application/xml",
            Self::Json => "application/json",
        }
    }
}

impl fmt::Display for ResponseFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_param())
    }
}

/// A fully built API request: path relative to the base URL plus query parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub endpoint: String,
    pub params: Vec<(String, String)>,
    pub format: ResponseFormat,
}

impl ApiRequest {
    /// Value of the first parameter named `name`
    #[cfg(test)]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Performs exactly one outbound call per invocation and returns the raw body.
///
/// Implement this trait to substitute canned responses in tests.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn fetch(&self, request: &ApiRequest) -> Result<String, CatalogError>;
}

/// Production transport over reqwest
pub struct HttpTransport {
    http_client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Create a transport against `base_url`.
    ///
    /// Failing to build the HTTP client (e.g. no TLS backend) is a
    /// configuration error: nothing can be fetched at all.
    pub fn new(base_url: impl Into<String>) -> Result<Self, CatalogError> {
        let http_client = reqwest::Client::builder()
            .gzip(true)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(|e| CatalogError::Configuration(format!("HTTP client unavailable: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Full URL of an endpoint, without the query string
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(&self, request: &ApiRequest) -> Result<String, CatalogError> {
        let url = self.endpoint_url(&request.endpoint);
        let transport_error = |message: String| CatalogError::Transport {
            endpoint: request.endpoint.clone(),
            message,
        };

        let response = self
            .http_client
            .get(&url)
            .header(reqwest::header::ACCEPT, request.format.accept_header())
            .query(&request.params)
            .send()
            .await
            .map_err(|e| transport_error(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| transport_error(e.to_string()))?;

        if !status.is_success() {
            if body.trim().is_empty() {
                return Err(transport_error(format!(
                    "HTTP {}: {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("Unknown")
                )));
            }
            // Goodreads explains misses (404) and key problems in the body
            tracing::debug!(
                endpoint = %request.endpoint,
                status = status.as_u16(),
                "Non-success status, passing body on"
            );
        }

        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    #[test]
    fn test_transport_creation() {
        let transport = HttpTransport::new(DEFAULT_BASE_URL).unwrap();
        assert_eq!(
            transport.endpoint_url("book/show"),
            "https://www.goodreads.com/book/show"
        );
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let transport = HttpTransport::new("http://localhost:8080/").unwrap();
        assert_eq!(
            transport.endpoint_url("book/title"),
            "http://localhost:8080/book/title"
        );
    }

    #[test]
    fn test_format_headers() {
        assert_eq!(ResponseFormat::default(), ResponseFormat::Xml);
        assert_eq!(ResponseFormat::Xml.accept_header(), "application/xml");
        assert_eq!(ResponseFormat::Json.accept_header(), "application/json");
        assert_eq!(ResponseFormat::Json.to_string(), "json");
    }

    #[test]
    fn test_request_param_lookup() {
        let request = ApiRequest {
            endpoint: "book/show".to_string(),
            params: vec![
                ("key".to_string(), "abc".to_string()),
                ("id".to_string(), "42".to_string()),
            ],
            format: ResponseFormat::Xml,
        };
        assert_eq!(request.param("id"), Some("42"));
        assert_eq!(request.param("page"), None);
    }

    #[tokio::test]
    async fn test_connection_failure_is_transport_error() {
        // Port 9 (discard) on localhost is not expected to serve HTTP
        let transport = HttpTransport::new("http://127.0.0.1:9").unwrap();
        let request = ApiRequest {
            endpoint: "book/show".to_string(),
            params: vec![],
            format: ResponseFormat::Xml,
        };
        let result = transport.fetch(&request).await;
        assert!(matches!(result, Err(CatalogError::Transport { .. })));
    }

    fn request(endpoint: &str, format: ResponseFormat) -> ApiRequest {
        ApiRequest {
            endpoint: endpoint.to_string(),
            params: vec![
                ("key".to_string(), "test-key".to_string()),
                ("format".to_string(), format.as_param().to_string()),
                ("id".to_string(), "234225".to_string()),
            ],
            format,
        }
    }

    #[tokio::test]
    async fn test_json_request_on_the_wire() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/book/show")
            .match_header("accept", "application/json")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("key".into(), "test-key".into()),
                Matcher::UrlEncoded("format".into(), "json".into()),
                Matcher::UrlEncoded("id".into(), "234225".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"book":{"id":"234225"}}"#)
            .create_async()
            .await;

        let transport = HttpTransport::new(server.url()).unwrap();
        let body = transport
            .fetch(&request("book/show", ResponseFormat::Json))
            .await
            .unwrap();

        assert_eq!(body, r#"{"book":{"id":"234225"}}"#);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_xml_request_on_the_wire() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/book/show")
            .match_header("accept", "application/xml")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("key".into(), "test-key".into()),
                Matcher::UrlEncoded("format".into(), "xml".into()),
            ]))
            .with_status(200)
            .with_body("<GoodreadsResponse><book><id>234225</id></book></GoodreadsResponse>")
            .create_async()
            .await;

        let transport = HttpTransport::new(server.url()).unwrap();
        let body = transport
            .fetch(&request("book/show", ResponseFormat::Xml))
            .await
            .unwrap();

        assert!(body.contains("<id>234225</id>"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_not_found_body_is_handed_back() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/book/title")
            .match_query(Matcher::Any)
            .with_status(404)
            .with_body("<error>book not found</error>")
            .create_async()
            .await;

        let transport = HttpTransport::new(server.url()).unwrap();
        let body = transport
            .fetch(&request("book/title", ResponseFormat::Xml))
            .await
            .unwrap();

        assert_eq!(body, "<error>book not found</error>");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_error_status_without_body_is_transport_error() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/book/show")
            .match_query(Matcher::Any)
            .with_status(503)
            .create_async()
            .await;

        let transport = HttpTransport::new(server.url()).unwrap();
        let result = transport
            .fetch(&request("book/show", ResponseFormat::Xml))
            .await;

        let Err(CatalogError::Transport { endpoint, message }) = result else {
            panic!("expected a transport error, got {:?}", result);
        };
        assert_eq!(endpoint, "book/show");
        assert!(message.starts_with("HTTP 503"));
        mock.assert_async().await;
    }
}
