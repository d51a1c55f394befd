//! Client facade over the operation registry.

use std::sync::{Arc, LazyLock};

use serde_json::Value;

use crate::binder::{bind, Args};
use crate::config::{validate_base_url, ClientConfig};
use crate::error::Result;
use crate::http::{execute, ReqwestTransport, Transport};
use crate::normalize::normalize_xml;
use crate::registry::{create_markus_registry, Operation, OperationRegistry};

/// Shared registry; it is immutable once built.
static REGISTRY: LazyLock<Arc<OperationRegistry>> =
    LazyLock::new(|| Arc::new(create_markus_registry()));

/// Client for one Markus API instance.
///
/// Calls share no mutable state, so a client can be cloned freely and used
/// from several threads at once.
///
/// # Examples
/// ```no_run
/// use markus_client::{Args, MarkusClient};
///
/// let client = MarkusClient::new("http://forumcinemas.lv/xml")?;
/// let areas = client.areas(&Args::new())?;
/// println!("{areas}");
/// # Ok::<(), markus_client::MarkusError>(())
/// ```
#[derive(Clone)]
pub struct MarkusClient {
    base_url: String,
    registry: Arc<OperationRegistry>,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for MarkusClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarkusClient")
            .field("base_url", &self.base_url)
            .field("operations", &self.registry.len())
            .finish_non_exhaustive()
    }
}

impl MarkusClient {
    /// Create a client with default settings.
    ///
    /// # Errors
    /// `InvalidBaseUrl` if the URL is not an absolute http(s) URL, `Http`
    /// if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::from_config(&ClientConfig::new(base_url))
    }

    /// Create a client from explicit settings.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(config)?;
        Self::with_transport(config.base_url.clone(), transport)
    }

    /// Create a client using a custom transport.
    pub fn with_transport(
        base_url: impl Into<String>,
        transport: impl Transport + 'static,
    ) -> Result<Self> {
        let base_url = base_url.into();
        validate_base_url(&base_url)?;
        Ok(Self {
            base_url,
            registry: Arc::clone(&*REGISTRY),
            transport: Arc::new(transport),
        })
    }

    /// Base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Operation registry used by this client.
    #[must_use]
    pub fn registry(&self) -> &OperationRegistry {
        &self.registry
    }

    /// Invoke an operation by name.
    ///
    /// Binds `args` to query parameters, issues the request and normalizes
    /// the response. Argument keys the operation does not know are ignored.
    ///
    /// # Errors
    /// `UnknownOperation` before any request is made for an unregistered
    /// name; `InvalidArgument` for arguments that cannot be coerced;
    /// transport, status and response errors from the call itself.
    pub fn call(&self, name: &str, args: &Args) -> Result<Value> {
        let descriptor = self.registry.describe(name)?;
        let params = bind(descriptor, args)?;
        let body = execute(self.transport.as_ref(), &self.base_url, descriptor, &params)?;
        normalize_xml(descriptor, &body)
    }

    fn invoke(&self, operation: Operation, args: &Args) -> Result<Value> {
        self.call(operation.as_str(), args)
    }

    /// List theatre areas.
    pub fn areas(&self, args: &Args) -> Result<Value> {
        self.invoke(Operation::Areas, args)
    }

    /// List languages.
    pub fn languages(&self, args: &Args) -> Result<Value> {
        self.invoke(Operation::Languages, args)
    }

    /// List news article categories.
    pub fn article_categories(&self, args: &Args) -> Result<Value> {
        self.invoke(Operation::ArticleCategories, args)
    }

    /// List news articles.
    ///
    /// Accepts `area`, `event` and `category`.
    pub fn articles(&self, args: &Args) -> Result<Value> {
        self.invoke(Operation::Articles, args)
    }

    /// List events.
    ///
    /// Accepts `area`, `event` and `coming_soon`. Videos, links, gallery
    /// and pictures are off unless `include_videos`, `include_links`,
    /// `include_gallery` or `include_pictures` is set.
    pub fn events(&self, args: &Args) -> Result<Value> {
        self.invoke(Operation::Events, args)
    }

    /// List shows.
    ///
    /// Accepts `date` (ISO `YYYY-MM-DD`), `days_from_date` (default 1),
    /// `area` and `event`.
    pub fn shows(&self, args: &Args) -> Result<Value> {
        self.invoke(Operation::Shows, args)
    }

    /// List dates with shows. Accepts `area`.
    pub fn schedule(&self, args: &Args) -> Result<Value> {
        self.invoke(Operation::Schedule, args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MarkusError;
    use crate::http::HttpResponse;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use url::Url;

    #[derive(Default)]
    struct Counting {
        calls: AtomicUsize,
    }

    impl Transport for Arc<Counting> {
        fn get(&self, _url: &Url) -> Result<HttpResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(HttpResponse::new(
                200,
                "<TheatreAreas><TheatreArea><ID>1</ID><Name>One</Name></TheatreArea></TheatreAreas>",
            ))
        }
    }

    #[test]
    fn test_unknown_operation_makes_no_request() {
        let counting = Arc::new(Counting::default());
        let client = MarkusClient::with_transport("http://example.com/xml", Arc::clone(&counting))
            .unwrap();

        let err = client.call("films", &Args::new()).unwrap_err();

        assert!(matches!(err, MarkusError::UnknownOperation(ref name) if name == "films"));
        assert_eq!(counting.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_areas_single_item_is_array() {
        let counting = Arc::new(Counting::default());
        let client = MarkusClient::with_transport("http://example.com/xml", Arc::clone(&counting))
            .unwrap();

        let result = client.areas(&Args::new()).unwrap();

        assert_eq!(result["items"].as_array().map(Vec::len), Some(1));
        assert_eq!(result["items"][0]["id"], 1);
        assert_eq!(counting.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let err = MarkusClient::with_transport("forumcinemas", Arc::new(Counting::default()))
            .unwrap_err();
        assert!(matches!(err, MarkusError::InvalidBaseUrl(_)));
    }

    #[test]
    fn test_client_registry_is_shared() {
        let a = MarkusClient::new("http://example.com/xml").unwrap();
        let b = a.clone();
        assert_eq!(a.registry().len(), 7);
        assert!(std::ptr::eq(a.registry(), b.registry()));
    }
}
