//! HTTP transport for the Markus API.
//!
//! The client talks to the network only through the [`Transport`] trait, so
//! tests and embedders can substitute their own implementation.

use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;
use url::Url;

use crate::binder::QueryParams;
use crate::config::{endpoint_url, ClientConfig, RETRY_BASE_DELAY_MS};
use crate::error::{MarkusError, Result};
use crate::registry::OperationDescriptor;

/// Raw HTTP response as seen by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,

    /// Response body decoded as text.
    pub body: String,
}

impl HttpResponse {
    /// Create a response.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is 2xx.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Executes GET requests.
///
/// Implementations return any HTTP response, successful or not; status
/// handling is done by [`execute`]. Errors are reserved for requests that
/// produced no response at all.
pub trait Transport: Send + Sync {
    /// Issue a GET request for `url`.
    fn get(&self, url: &Url) -> Result<HttpResponse>;
}

/// Default transport backed by a blocking `reqwest` client.
///
/// Connection and timeout failures are retried with exponential backoff.
/// Responses are never retried, whatever their status.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    max_retries: u32,
}

impl ReqwestTransport {
    /// Create a transport from client settings.
    ///
    /// # Errors
    /// Returns `Http` if the underlying client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;
        Ok(Self {
            client,
            max_retries: config.max_retries.max(1),
        })
    }
}

impl Transport for ReqwestTransport {
    fn get(&self, url: &Url) -> Result<HttpResponse> {
        let mut last_error: Option<String> = None;

        for attempt in 0..self.max_retries {
            if attempt > 0 {
                // Exponential backoff: 500ms, 1000ms, 2000ms
                let delay = RETRY_BASE_DELAY_MS * (1 << (attempt - 1));
                tracing::debug!(attempt, delay_ms = delay, "Retrying after delay");
                thread::sleep(Duration::from_millis(delay));
            }

            match self.client.get(url.as_str()).send() {
                Ok(response) => {
                    let status = response.status().as_u16();
                    let body = response.text()?;
                    return Ok(HttpResponse { status, body });
                }
                Err(e) if e.is_connect() || e.is_timeout() => {
                    tracing::warn!(
                        error = %e,
                        attempt = attempt + 1,
                        max_retries = self.max_retries,
                        "Connection error, will retry"
                    );
                    last_error = Some(e.to_string());
                }
                Err(e) => {
                    return Err(MarkusError::Transport {
                        url: url.to_string(),
                        message: e.to_string(),
                    });
                }
            }
        }

        Err(MarkusError::Transport {
            url: url.to_string(),
            message: format!(
                "gave up after {} attempts: {}",
                self.max_retries,
                last_error.unwrap_or_else(|| "unknown error".to_string())
            ),
        })
    }
}

/// Issue the request for an operation and return the response body.
///
/// # Errors
/// `InvalidBaseUrl` for an unusable base URL, `Transport` when no response
/// arrived and `Status` for a non-2xx response.
pub fn execute(
    transport: &dyn Transport,
    base_url: &str,
    descriptor: &OperationDescriptor,
    params: &QueryParams,
) -> Result<String> {
    let url = endpoint_url(base_url, &descriptor.path, params)?;

    tracing::debug!(
        operation = %descriptor.operation,
        method = %descriptor.method,
        url = %url,
        "Sending request"
    );

    let response = transport.get(&url)?;

    if !response.is_success() {
        return Err(MarkusError::Status {
            url: url.to_string(),
            status: response.status,
        });
    }

    tracing::debug!(
        operation = %descriptor.operation,
        bytes = response.body.len(),
        "Received response"
    );

    Ok(response.body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::create_markus_registry;
    use std::sync::Mutex;

    struct Canned {
        response: HttpResponse,
        seen: Mutex<Vec<String>>,
    }

    impl Transport for Canned {
        fn get(&self, url: &Url) -> Result<HttpResponse> {
            self.seen.lock().unwrap().push(url.to_string());
            Ok(self.response.clone())
        }
    }

    fn canned(status: u16, body: &str) -> Canned {
        Canned {
            response: HttpResponse::new(status, body),
            seen: Mutex::new(Vec::new()),
        }
    }

    #[test]
    fn test_create_transport() {
        assert!(ReqwestTransport::new(&ClientConfig::default()).is_ok());
    }

    #[test]
    fn test_execute_builds_url() {
        let registry = create_markus_registry();
        let descriptor = registry.describe("shows").unwrap();
        let transport = canned(200, "<Schedule/>");
        let params = vec![("nrOfDays".to_string(), "1".to_string())];

        let body = execute(&transport, "http://example.com/xml", descriptor, &params).unwrap();

        assert_eq!(body, "<Schedule/>");
        assert_eq!(
            transport.seen.lock().unwrap().as_slice(),
            ["http://example.com/xml/Schedule/?nrOfDays=1"]
        );
    }

    #[test]
    fn test_execute_non_success_status() {
        let registry = create_markus_registry();
        let descriptor = registry.describe("areas").unwrap();
        let transport = canned(503, "unavailable");

        let err = execute(&transport, "http://example.com/xml", descriptor, &Vec::new()).unwrap_err();
        assert!(matches!(err, MarkusError::Status { status: 503, .. }));
        assert!(err.is_transport());
    }

    #[test]
    fn test_execute_invalid_base_url() {
        let registry = create_markus_registry();
        let descriptor = registry.describe("areas").unwrap();
        let transport = canned(200, "");

        let err = execute(&transport, "not a url", descriptor, &Vec::new()).unwrap_err();
        assert!(matches!(err, MarkusError::InvalidBaseUrl(_)));
        assert!(transport.seen.lock().unwrap().is_empty());
    }
}
