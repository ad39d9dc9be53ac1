//! Remote search.
//!
//! A [`SearchSource`] turns a query into a list of options. [`SearchClient`]
//! wraps a source for one field and enforces last-request-wins: starting a
//! request aborts the previous one, and results carry a generation that the
//! client checks before they may touch any state.
//!
//! Three sources are provided:
//!
//! - [`HttpSearchSource`]: a JSON endpoint reached with reqwest
//! - [`StaticSearchSource`]: an in-memory list, optionally with latency
//! - [`FnSearchSource`]: any async closure, handy as a test double

use std::fmt;
use std::future::Future;
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use reqwest::Url;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tea_core::{Cmd, Message};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::{ConfigError, SearchError};
use crate::option::{DropdownOption, OptionId};

/// Result of a search.
pub type SearchResult = Result<Vec<DropdownOption>, SearchError>;

/// Something that can answer a query with options.
pub trait SearchSource: Send + Sync + 'static {
    /// Runs one search. The future must be cancel-safe: dropping it aborts
    /// the request.
    fn search(&self, query: &str) -> BoxFuture<'static, SearchResult>;
}

/// A source backed by an async closure.
pub struct FnSearchSource<F> {
    f: F,
}

/// Wraps an async closure as a [`SearchSource`].
///
/// # Example
///
/// ```rust
/// use combobox::{DropdownOption, search::from_fn};
///
/// let source = from_fn(|query: String| async move {
///     Ok::<_, combobox::SearchError>(vec![DropdownOption::new(query.clone(), query)])
/// });
/// # let _ = source;
/// ```
pub fn from_fn<F, Fut>(f: F) -> FnSearchSource<F>
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = SearchResult> + Send + 'static,
{
    FnSearchSource { f }
}

impl<F, Fut> SearchSource for FnSearchSource<F>
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = SearchResult> + Send + 'static,
{
    fn search(&self, query: &str) -> BoxFuture<'static, SearchResult> {
        (self.f)(query.to_string()).boxed()
    }
}

/// Case-insensitive substring search over a fixed list.
#[derive(Debug, Clone)]
pub struct StaticSearchSource {
    options: Arc<[DropdownOption]>,
    latency: Duration,
    limit: Option<usize>,
}

impl StaticSearchSource {
    /// Creates a source over `options`.
    pub fn new(options: Vec<DropdownOption>) -> Self {
        Self {
            options: options.into(),
            latency: Duration::ZERO,
            limit: None,
        }
    }

    /// Delays every answer, to mimic a slow network.
    #[must_use]
    pub const fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Caps the number of results.
    #[must_use]
    pub const fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

impl SearchSource for StaticSearchSource {
    fn search(&self, query: &str) -> BoxFuture<'static, SearchResult> {
        let needle = query.to_lowercase();
        let limit = self.limit.unwrap_or(usize::MAX);
        let found: Vec<DropdownOption> = self
            .options
            .iter()
            .filter(|opt| opt.label().to_lowercase().contains(&needle))
            .take(limit)
            .cloned()
            .collect();
        let latency = self.latency;
        async move {
            if !latency.is_zero() {
                tokio::time::sleep(latency).await;
            }
            Ok(found)
        }
        .boxed()
    }
}

/// HTTP method used for remote searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// Query goes into the `q` URL parameter.
    #[default]
    #[serde(alias = "get")]
    Get,
    /// Query goes into a JSON body.
    #[serde(alias = "post")]
    Post,
}

impl FromStr for HttpMethod {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            _ => Err(ConfigError::UnknownMethod(s.to_string())),
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => f.write_str("GET"),
            Self::Post => f.write_str("POST"),
        }
    }
}

/// Maps a JSON response of the form `{"<object_key>": [ {...}, ... ]}` into
/// options.
///
/// Each element's `value_key` becomes the option value and `label_key` its
/// label. A missing label falls back to the element's `name`, then to
/// `"Unknown"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponseMapping {
    pub object_key: String,
    pub value_key: String,
    pub label_key: String,
    /// Keep at most this many results.
    pub limit: Option<usize>,
}

impl Default for ResponseMapping {
    fn default() -> Self {
        Self {
            object_key: "products".to_string(),
            value_key: "id".to_string(),
            label_key: "title".to_string(),
            limit: None,
        }
    }
}

impl ResponseMapping {
    /// Applies the mapping to a decoded response body.
    pub fn apply(&self, body: &Value) -> SearchResult {
        let items = match body.get(&self.object_key) {
            Some(Value::Array(items)) => items,
            other => {
                return Err(SearchError::Shape {
                    key: self.object_key.clone(),
                    found: json_type_name(other),
                });
            }
        };

        let limit = self.limit.unwrap_or(usize::MAX);
        Ok(items
            .iter()
            .take(limit)
            .map(|item| {
                let value = item.get(&self.value_key).map(scalar_text).unwrap_or_default();
                let label = item
                    .get(&self.label_key)
                    .and_then(truthy_text)
                    .or_else(|| item.get("name").and_then(truthy_text))
                    .unwrap_or_else(|| "Unknown".to_string());
                let mut option = DropdownOption::new(value, label);
                match item.get("id") {
                    Some(Value::Number(n)) => {
                        if let Some(n) = n.as_i64() {
                            option = option.with_id(OptionId::Number(n));
                        }
                    }
                    Some(Value::String(s)) => option = option.with_id(s.as_str()),
                    _ => {}
                }
                option
            })
            .collect())
    }
}

fn json_type_name(value: Option<&Value>) -> &'static str {
    match value {
        None => "undefined",
        Some(Value::Null) => "null",
        Some(Value::Bool(_)) => "boolean",
        Some(Value::Number(_)) => "number",
        Some(Value::String(_)) => "string",
        Some(Value::Array(_)) => "array",
        Some(Value::Object(_)) => "object",
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

fn truthy_text(value: &Value) -> Option<String> {
    let text = scalar_text(value);
    if text.is_empty() || text == "false" || text == "0" {
        None
    } else {
        Some(text)
    }
}

type BodyTransform = Arc<dyn Fn(&str) -> Value + Send + Sync>;
type ResponseTransform = Arc<dyn Fn(&Value) -> SearchResult + Send + Sync>;

/// A JSON search endpoint.
///
/// GET requests append `q=<query>` to the URL; POST requests send the body
/// produced by the body transform (by default `{"query": "<query>"}`).
/// `Content-Type: application/json` is always sent unless overridden.
///
/// # Example
///
/// ```rust
/// use combobox::search::{HttpMethod, HttpSearchSource, ResponseMapping};
///
/// let source = HttpSearchSource::new("https://dummyjson.com/products/search")
///     .unwrap()
///     .method(HttpMethod::Get)
///     .response_mapping(ResponseMapping { limit: Some(10), ..Default::default() });
/// assert_eq!(
///     source.request_url("phone").as_str(),
///     "https://dummyjson.com/products/search?q=phone"
/// );
/// ```
#[derive(Clone)]
pub struct HttpSearchSource {
    client: reqwest::Client,
    url: Url,
    method: HttpMethod,
    headers: HeaderMap,
    body: BodyTransform,
    response: ResponseTransform,
}

impl HttpSearchSource {
    /// Creates a GET source for `url` with the default response mapping.
    pub fn new(url: &str) -> Result<Self, ConfigError> {
        let parsed = Url::parse(url).map_err(|err| ConfigError::InvalidUrl {
            url: url.to_string(),
            reason: err.to_string(),
        })?;
        let mapping = ResponseMapping::default();
        Ok(Self {
            client: reqwest::Client::new(),
            url: parsed,
            method: HttpMethod::Get,
            headers: HeaderMap::new(),
            body: Arc::new(|query: &str| serde_json::json!({ "query": query })),
            response: Arc::new(move |body: &Value| mapping.apply(body)),
        })
    }

    /// Sets the HTTP method.
    #[must_use]
    pub const fn method(mut self, method: HttpMethod) -> Self {
        self.method = method;
        self
    }

    /// Adds a request header.
    pub fn header(mut self, name: &str, value: &str) -> Result<Self, ConfigError> {
        let invalid = || ConfigError::InvalidHeader {
            name: name.to_string(),
        };
        let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid())?;
        let header_value = HeaderValue::from_str(value).map_err(|_| invalid())?;
        self.headers.insert(header_name, header_value);
        Ok(self)
    }

    /// Replaces the POST body builder.
    #[must_use]
    pub fn body_transform<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> Value + Send + Sync + 'static,
    {
        self.body = Arc::new(f);
        self
    }

    /// Uses an array-at-key mapping for responses.
    #[must_use]
    pub fn response_mapping(mut self, mapping: ResponseMapping) -> Self {
        self.response = Arc::new(move |body: &Value| mapping.apply(body));
        self
    }

    /// Uses a custom function to turn responses into options.
    #[must_use]
    pub fn response_transform<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value) -> SearchResult + Send + Sync + 'static,
    {
        self.response = Arc::new(f);
        self
    }

    /// Uses a preconfigured reqwest client (timeouts, proxies).
    #[must_use]
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// The URL a request for `query` is sent to.
    pub fn request_url(&self, query: &str) -> Url {
        let mut url = self.url.clone();
        if self.method == HttpMethod::Get {
            url.query_pairs_mut().append_pair("q", query);
        }
        url
    }
}

impl fmt::Debug for HttpSearchSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpSearchSource")
            .field("url", &self.url.as_str())
            .field("method", &self.method)
            .field("headers", &self.headers.len())
            .finish_non_exhaustive()
    }
}

impl SearchSource for HttpSearchSource {
    fn search(&self, query: &str) -> BoxFuture<'static, SearchResult> {
        let url = self.request_url(query);
        let request = match self.method {
            HttpMethod::Get => self.client.get(url),
            HttpMethod::Post => self.client.post(url).body((self.body)(query).to_string()),
        }
        .header(CONTENT_TYPE, "application/json")
        .headers(self.headers.clone());
        let response_transform = Arc::clone(&self.response);

        async move {
            let response = request.send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(SearchError::Status {
                    status: status.as_u16(),
                    reason: status.canonical_reason().unwrap_or_default().to_string(),
                });
            }
            let bytes = response.bytes().await?;
            let body: Value =
                serde_json::from_slice(&bytes).map_err(|err| SearchError::Decode(err.to_string()))?;
            response_transform(&body)
        }
        .boxed()
    }
}

static NEXT_CLIENT_ID: AtomicU64 = AtomicU64::new(1);

/// Message carrying the outcome of a search started by a [`SearchClient`].
#[derive(Debug, Clone)]
pub struct SearchResultMsg {
    client: u64,
    generation: u64,
    /// The (trimmed) query the request was made for.
    pub query: String,
    /// Options found, or why the search failed.
    pub result: SearchResult,
}

impl SearchResultMsg {
    /// Id of the client that started the request.
    pub const fn client_id(&self) -> u64 {
        self.client
    }
}

/// Runs searches for one field, one at a time.
pub struct SearchClient {
    id: u64,
    generation: u64,
    source: Arc<dyn SearchSource>,
    in_flight: Option<CancellationToken>,
}

impl SearchClient {
    /// Creates a client for `source`.
    pub fn new(source: impl SearchSource) -> Self {
        Self::from_arc(Arc::new(source))
    }

    /// Creates a client for a shared source.
    pub fn from_arc(source: Arc<dyn SearchSource>) -> Self {
        Self {
            id: NEXT_CLIENT_ID.fetch_add(1, Ordering::Relaxed),
            generation: 0,
            source,
            in_flight: None,
        }
    }

    pub const fn id(&self) -> u64 {
        self.id
    }

    /// Starts a search for `query`, aborting any request still in flight.
    ///
    /// The returned command yields a [`SearchResultMsg`], or nothing if the
    /// request is aborted before it completes.
    pub fn start(&mut self, query: impl Into<String>) -> Cmd {
        self.abort();
        let token = CancellationToken::new();
        self.in_flight = Some(token.clone());

        let query = query.into();
        let source = Arc::clone(&self.source);
        let client = self.id;
        let generation = self.generation;
        debug!(client, generation, query = %query, "search started");

        Cmd::new_optional(move || async move {
            let search = source.search(&query);
            tokio::select! {
                biased;
                () = token.cancelled() => {
                    debug!(client, generation, query = %query, "search cancelled");
                    None
                }
                result = search => {
                    if let Err(err) = &result {
                        warn!(client, generation, query = %query, error = %err, "search failed");
                    }
                    Some(Message::new(SearchResultMsg { client, generation, query, result }))
                }
            }
        })
    }

    /// Returns true when `msg` answers the latest request of this client.
    ///
    /// Accepting a message marks the request as finished.
    pub fn accept(&mut self, msg: &SearchResultMsg) -> bool {
        if msg.client != self.id || msg.generation != self.generation || self.in_flight.is_none() {
            return false;
        }
        self.in_flight = None;
        true
    }

    /// Aborts the request in flight, if any. Its result will be rejected.
    pub fn abort(&mut self) {
        if let Some(token) = self.in_flight.take() {
            debug!(client = self.id, generation = self.generation, "aborting in-flight search");
            token.cancel();
        }
        self.generation = self.generation.wrapping_add(1);
    }

    /// Returns true while a request is outstanding.
    pub const fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }
}

impl fmt::Debug for SearchClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchClient")
            .field("id", &self.id)
            .field("generation", &self.generation)
            .field("in_flight", &self.in_flight.is_some())
            .finish_non_exhaustive()
    }
}

impl Drop for SearchClient {
    fn drop(&mut self) {
        if let Some(token) = self.in_flight.take() {
            token.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mapping_defaults() {
        let body = json!({
            "products": [
                {"id": 1, "title": "iPhone 9"},
                {"id": 2, "name": "Named only"},
                {"id": 3},
            ]
        });
        let out = ResponseMapping::default().apply(&body).unwrap();
        assert_eq!(out.len(), 3);
        assert_eq!(out[0].value(), "1");
        assert_eq!(out[0].label(), "iPhone 9");
        assert_eq!(out[0].id(), Some(&OptionId::Number(1)));
        assert_eq!(out[1].label(), "Named only");
        assert_eq!(out[2].label(), "Unknown");
    }

    #[test]
    fn test_mapping_limit_and_custom_keys() {
        let body = json!({"users": [
            {"login": "ann", "display": "Ann"},
            {"login": "bob", "display": "Bob"},
        ]});
        let mapping = ResponseMapping {
            object_key: "users".into(),
            value_key: "login".into(),
            label_key: "display".into(),
            limit: Some(1),
        };
        let out = mapping.apply(&body).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].value(), "ann");
    }

    #[test]
    fn test_mapping_shape_errors() {
        let mapping = ResponseMapping::default();
        let err = mapping.apply(&json!({"items": []})).unwrap_err();
        assert_eq!(
            err,
            SearchError::Shape {
                key: "products".into(),
                found: "undefined"
            }
        );
        let err = mapping.apply(&json!({"products": {"a": 1}})).unwrap_err();
        assert!(err.to_string().ends_with("but got object"));
        let err = mapping.apply(&json!([1, 2])).unwrap_err();
        assert!(err.to_string().ends_with("but got undefined"));
    }

    #[test]
    fn test_request_url_get() {
        let source = HttpSearchSource::new("http://localhost/search?lang=en").unwrap();
        assert_eq!(
            source.request_url("red shoes").as_str(),
            "http://localhost/search?lang=en&q=red+shoes"
        );
        let post = source.method(HttpMethod::Post);
        assert_eq!(post.request_url("x").as_str(), "http://localhost/search?lang=en");
    }

    #[test]
    fn test_invalid_configuration() {
        assert!(matches!(
            HttpSearchSource::new("not a url"),
            Err(ConfigError::InvalidUrl { .. })
        ));
        let source = HttpSearchSource::new("http://localhost/").unwrap();
        assert!(matches!(
            source.header("bad header", "x"),
            Err(ConfigError::InvalidHeader { .. })
        ));
        assert!(matches!(
            "PATCH".parse::<HttpMethod>(),
            Err(ConfigError::UnknownMethod(_))
        ));
        assert_eq!("post".parse::<HttpMethod>().unwrap(), HttpMethod::Post);
    }

    #[tokio::test]
    async fn test_static_source_filters_case_insensitively() {
        let source = StaticSearchSource::new(vec![
            DropdownOption::new("1", "Apple"),
            DropdownOption::new("2", "Pineapple"),
            DropdownOption::new("3", "Pear"),
        ])
        .with_limit(5);
        let out = source.search("APP").await.unwrap();
        let labels: Vec<_> = out.iter().map(DropdownOption::label).collect();
        assert_eq!(labels, vec!["Apple", "Pineapple"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_client_aborts_previous_request() {
        let mut client = SearchClient::new(
            StaticSearchSource::new(vec![DropdownOption::new("1", "abc")])
                .with_latency(Duration::from_millis(100)),
        );
        let first = client.start("ab").into_future();
        let second = client.start("abc").into_future();

        assert!(first.await.is_none());
        let msg = second.await.unwrap().downcast::<SearchResultMsg>().unwrap();
        assert_eq!(msg.query, "abc");
        assert!(client.accept(&msg));
        assert!(!client.is_in_flight());
        // A second delivery of the same answer is stale.
        assert!(!client.accept(&msg));
    }

    #[tokio::test]
    async fn test_client_surfaces_errors_as_values() {
        let mut client = SearchClient::new(from_fn(|_q: String| async {
            Err::<Vec<DropdownOption>, _>(SearchError::Transport("connection refused".into()))
        }));
        let msg = client
            .start("x")
            .execute()
            .await
            .unwrap()
            .downcast::<SearchResultMsg>()
            .unwrap();
        assert!(client.accept(&msg));
        assert!(msg.result.is_err());
    }
}
