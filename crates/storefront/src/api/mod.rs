//! Client for the commerce REST API.
//!
//! # Architecture
//!
//! - Plain JSON over HTTP with `reqwest`; one method per endpoint, grouped by
//!   resource in submodules (`auth`, `catalog`, `cart`, `wishlist`,
//!   `addresses`, `orders`)
//! - The API is the source of truth - no local persistence, every call goes
//!   to the network except catalog reads
//! - Catalog responses (products, categories, brands) are cached with `moka`
//!   for [`ApiConfig::catalog_cache_ttl`](crate::config::ApiConfig)
//! - Authenticated endpoints take the customer's [`ApiToken`], sent in the
//!   custom `token` request header
//!
//! # Example
//!
//! ```rust,ignore
//! use freshcart_storefront::api::{ApiClient, ProductQuery};
//!
//! let client = ApiClient::new(&config.api)?;
//!
//! let page = client.products(&ProductQuery::default().with_limit(8)).await?;
//! let auth = client.signin(&email, &password).await?;
//! client.add_to_cart(&auth.token, &page.data[0].id).await?;
//! ```

mod addresses;
mod auth;
mod cache;
mod cart;
mod catalog;
mod orders;
pub mod types;
mod wishlist;

pub use catalog::ProductQuery;
pub use types::*;

use std::sync::Arc;

use moka::future::Cache;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::config::ApiConfig;
use crate::models::ApiToken;

use cache::{CacheKey, CacheValue};

/// Header the API reads the customer token from.
pub const TOKEN_HEADER: &str = "token";

/// Longest slice of a response body copied into logs and error messages.
const BODY_SNIPPET_CHARS: usize = 500;

/// Errors that can occur when calling the commerce API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (connect, timeout, TLS...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A success response did not match the expected shape.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// 401/403: missing, expired or rejected token, or bad credentials.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// 404 from the API.
    #[error("Not found: {0}")]
    NotFound(String),

    /// 429 from the API.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Any other non-success status, with the server's message.
    #[error("Request rejected ({status}): {message}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the error body.
        message: String,
    },

    /// A success response was missing something the caller needs.
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl ApiError {
    /// The server's own explanation, when it is fit to show to a customer.
    ///
    /// Transport and parse failures return `None`; callers substitute a
    /// generic message for the action that failed.
    #[must_use]
    pub fn user_message(&self) -> Option<&str> {
        match self {
            Self::Unauthorized(message)
            | Self::NotFound(message)
            | Self::Rejected { message, .. } => Some(message.as_str()),
            Self::Http(_) | Self::Parse(_) | Self::RateLimited(_) | Self::UnexpectedResponse(_) => {
                None
            }
        }
    }
}

/// Extract a human-readable message from an API error body.
///
/// The API answers errors in a few shapes:
///
/// ```text
/// { "statusMsg": "fail", "message": "Incorrect email or password" }
/// { "message": "fail", "errors": { "msg": "Invalid email", "param": "email" } }
/// { "status": "error", "message": "no Cart exist for this user: ..." }
/// ```
///
/// `message` wins unless it is the literal `"fail"`, then `errors.msg`, then
/// `statusMsg`, then a generic line naming the status code.
#[must_use]
pub fn error_message(status: StatusCode, body: &str) -> String {
    let generic = || format!("Request failed with status {}", status.as_u16());

    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return generic();
    };

    let non_empty = |v: Option<&serde_json::Value>| {
        v.and_then(serde_json::Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    non_empty(value.get("message"))
        .filter(|m| m != "fail")
        .or_else(|| non_empty(value.get("errors").and_then(|e| e.get("msg"))))
        .or_else(|| non_empty(value.get("statusMsg")))
        .unwrap_or_else(generic)
}

// =============================================================================
// ApiClient
// =============================================================================

/// Client for the commerce REST API.
///
/// Cheap to clone; all clones share one connection pool and one catalog cache.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: String,
    cache: Cache<CacheKey, CacheValue>,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built
    /// (e.g. the TLS backend fails to initialise).
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("freshcart-storefront/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(config.catalog_cache_ttl)
            .build();

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.base_url.trim_end_matches('/').to_string(),
                cache,
            }),
        })
    }

    /// Base URL this client talks to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Build a request for `path` (which must start with `/`), attaching the
    /// customer token when given.
    fn request(&self, method: Method, path: &str, token: Option<&ApiToken>) -> RequestBuilder {
        let builder = self
            .inner
            .client
            .request(method, format!("{}{path}", self.inner.base_url));
        match token {
            Some(token) => builder.header(TOKEN_HEADER, token.expose()),
            None => builder,
        }
    }

    /// Send a request and decode a success body as `T`.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.trim().parse::<u64>().ok())
                .unwrap_or(1);
            tracing::warn!(retry_after, "Commerce API rate limited the storefront");
            return Err(ApiError::RateLimited(retry_after));
        }

        let body = response.text().await?;

        if !status.is_success() {
            let message = error_message(status, &body);
            tracing::debug!(
                status = %status,
                message = %message,
                "Commerce API returned non-success status"
            );
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    ApiError::Unauthorized(message)
                }
                StatusCode::NOT_FOUND => ApiError::NotFound(message),
                _ => ApiError::Rejected {
                    status: status.as_u16(),
                    message,
                },
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(BODY_SNIPPET_CHARS).collect::<String>(),
                "Failed to parse commerce API response"
            );
            ApiError::Parse(e)
        })
    }

    /// Connectivity check behind the readiness endpoint. Never cached.
    ///
    /// # Errors
    ///
    /// Returns an error if the API is unreachable or answers with a failure.
    pub async fn ping(&self) -> Result<(), ApiError> {
        let request = self
            .request(Method::GET, "/api/v1/categories", None)
            .query(&[("limit", "1")]);
        self.send::<serde_json::Value>(request).await.map(|_| ())
    }
}

/// Percent-encode a value for use as a single URL path segment.
fn segment(value: &str) -> std::borrow::Cow<'_, str> {
    urlencoding::encode(value)
}
