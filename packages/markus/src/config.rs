//! Configuration constants and validation functions for the client.

use std::time::Duration;

use url::Url;

use crate::error::{MarkusError, Result};

/// Base URL of the Forum Cinemas Latvia instance of the Markus API.
pub const DEFAULT_BASE_URL: &str = "http://forumcinemas.lv/xml";

/// Environment variable consulted by the CLI for the base URL.
pub const BASE_URL_ENV: &str = "MARKUS_BASE_URL";

/// HTTP timeout in seconds.
///
/// Event listings with galleries enabled can be several megabytes.
pub const HTTP_TIMEOUT_SECS: u64 = 30;

/// Maximum number of attempts for connection-level failures.
pub const MAX_RETRIES: u32 = 3;

/// Base delay for exponential backoff (milliseconds).
pub const RETRY_BASE_DELAY_MS: u64 = 500;

/// User agent string identifying this client.
pub const USER_AGENT: &str = concat!("markus-client/", env!("CARGO_PKG_VERSION"));

/// Settings used to construct a [`crate::MarkusClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL every operation path is appended to.
    pub base_url: String,

    /// Request timeout.
    pub timeout: Duration,

    /// User agent sent with every request.
    pub user_agent: String,

    /// Attempts made for connection and timeout failures.
    pub max_retries: u32,
}

impl ClientConfig {
    /// Create a configuration for the given base URL with default settings.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the number of attempts for connection failures (at least one).
    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(HTTP_TIMEOUT_SECS),
            user_agent: USER_AGENT.to_string(),
            max_retries: MAX_RETRIES,
        }
    }
}

/// Validate a base URL.
///
/// # Returns
/// * `Ok(Url)` for an absolute `http` or `https` URL
/// * `Err(MarkusError::InvalidBaseUrl)` otherwise
///
/// # Examples
/// ```
/// use markus_client::config::validate_base_url;
///
/// assert!(validate_base_url("http://forumcinemas.lv/xml").is_ok());
/// assert!(validate_base_url("ftp://forumcinemas.lv/xml").is_err());
/// assert!(validate_base_url("forumcinemas.lv").is_err());
/// ```
pub fn validate_base_url(base_url: &str) -> Result<Url> {
    let url = Url::parse(base_url).map_err(|_| MarkusError::InvalidBaseUrl(base_url.to_string()))?;
    match url.scheme() {
        "http" | "https" if url.has_host() => Ok(url),
        _ => Err(MarkusError::InvalidBaseUrl(base_url.to_string())),
    }
}

/// Build the full URL of an operation, query parameters included.
///
/// The operation path is appended to the base URL with exactly one slash
/// between them. Query parameters are appended in the given order.
///
/// # Examples
/// ```
/// use markus_client::config::endpoint_url;
///
/// let url = endpoint_url(
///     "http://forumcinemas.lv/xml/",
///     "Schedule/",
///     &[("dt".to_string(), "05.04.2014".to_string())],
/// )
/// .unwrap();
/// assert_eq!(url.as_str(), "http://forumcinemas.lv/xml/Schedule/?dt=05.04.2014");
/// ```
pub fn endpoint_url(base_url: &str, path: &str, query: &[(String, String)]) -> Result<Url> {
    let joined = format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    let mut url = validate_base_url(&joined)?;

    if !query.is_empty() {
        url.query_pairs_mut()
            .extend_pairs(query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    }

    Ok(url)
}
