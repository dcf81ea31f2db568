//! HTTP transport
//!
//! [`Connection`] issues single GET requests against the configured API root:
//! - attaches the `Client-ID` and versioned `Accept` headers
//! - waits on the rate limiter, if one is configured
//! - classifies the response into JSON / format / client / server error
//!
//! There are no retries. Pagination and accumulation are layered on top via the
//! [`PageSource`] implementation.

use super::rate_limit::RateLimiter;
use crate::accumulate::{AccumulateOptions, Accumulator, Identity};
use crate::config::ClientConfig;
use crate::error::{Error, ResponseError, Result};
use crate::pagination::{PageRequest, PageSource, Pagination, Paginator};
use crate::types::{JsonValue, QueryParams};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};
use reqwest::{Client, StatusCode};
use std::sync::Arc;
use tracing::debug;
use url::Url;

/// Header carrying the application's client id
pub const CLIENT_ID_HEADER: &str = "Client-ID";

/// Connection to the REST API
///
/// Cheap to clone; clones share the HTTP connection pool and rate limiter.
#[derive(Clone)]
pub struct Connection {
    client: Client,
    config: Arc<ClientConfig>,
    base_url: Url,
    rate_limiter: Option<RateLimiter>,
}

impl Connection {
    /// Create a connection from a config
    pub fn new(config: ClientConfig) -> Result<Self> {
        if config.client_id.is_empty() {
            return Err(Error::invalid_argument("client_id"));
        }
        if config.base_url.is_empty() {
            return Err(Error::invalid_argument("base_url"));
        }

        let mut base_url = Url::parse(&config.base_url)?;
        // Url::join replaces the last segment unless the base ends in '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(&config.user_agent)
            .default_headers(default_headers(&config)?)
            .build()?;

        let rate_limiter = config.rate_limit.as_ref().map(RateLimiter::new);

        Ok(Self {
            client,
            config: Arc::new(config),
            base_url,
            rate_limiter,
        })
    }

    /// Connection configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Resolved API root
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Check if rate limiting is enabled
    pub fn has_rate_limiter(&self) -> bool {
        self.rate_limiter.is_some()
    }

    /// Make a GET request and parse the JSON body
    pub async fn get(&self, path: &str) -> Result<JsonValue> {
        self.get_with_query(path, &QueryParams::new()).await
    }

    /// Make a GET request with query parameters and parse the JSON body
    pub async fn get_with_query(&self, path: &str, query: &QueryParams) -> Result<JsonValue> {
        if path.is_empty() {
            return Err(Error::invalid_argument("path"));
        }

        let url = self.request_url(path, query)?;

        let _permit = match &self.rate_limiter {
            Some(limiter) => Some(limiter.acquire().await),
            None => None,
        };

        debug!("GET {url}");
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        let final_url = response.url().to_string();
        let body = response.text().await?;
        debug!("{} {final_url} ({} bytes)", status.as_u16(), body.len());

        classify(&final_url, status, body)
    }

    /// Build the absolute URL for a path.
    ///
    /// Relative paths resolve against the API root; absolute URLs (such as
    /// pagination links) are used as-is. `query` entries replace same-named
    /// parameters already present in the path.
    pub fn request_url(&self, path: &str, query: &QueryParams) -> Result<Url> {
        let mut url = self.base_url.join(path.trim_start_matches('/'))?;
        merge_query(&mut url, query);
        Ok(url)
    }

    /// Walk pages starting at `request`, calling `on_page` for each one
    pub async fn paginate<F>(&self, request: PageRequest, on_page: F) -> Result<Pagination>
    where
        F: FnMut(&JsonValue) -> Result<bool> + Send,
    {
        Paginator::new(self).run(request, on_page).await
    }

    /// Walk pages until the envelope runs out of next links
    pub async fn paginate_each<F>(&self, request: PageRequest, on_page: F) -> Result<Pagination>
    where
        F: FnMut(&JsonValue) -> Result<()> + Send,
    {
        Paginator::new(self).run_each(request, on_page).await
    }

    /// Collect a deduplicated, limited list of items across pages
    pub async fn accumulate<T>(&self, options: AccumulateOptions<T>) -> Result<Vec<T>>
    where
        T: Identity + Send,
    {
        Accumulator::new(self).collect(options).await
    }

    /// Stream deduplicated, limited items across pages into `on_item`
    pub async fn accumulate_each<T, F>(&self, options: AccumulateOptions<T>, on_item: F) -> Result<()>
    where
        T: Identity + Send,
        F: FnMut(T) -> Result<()> + Send,
    {
        Accumulator::new(self).for_each(options, on_item).await
    }
}

#[async_trait]
impl PageSource for Connection {
    async fn fetch(&self, path: &str, query: &QueryParams) -> Result<JsonValue> {
        self.get_with_query(path, query).await
    }

    fn max_page_size(&self) -> u32 {
        self.config.max_page_size
    }

    fn max_pages(&self) -> Option<u32> {
        self.config.max_pages
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("base_url", &self.base_url.as_str())
            .field("client_id", &self.config.client_id)
            .field("api_version", &self.config.api_version)
            .field("has_rate_limiter", &self.rate_limiter.is_some())
            .finish_non_exhaustive()
    }
}

/// Headers attached to every request
fn default_headers(config: &ClientConfig) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();

    for (key, value) in &config.headers {
        headers.insert(header_name(key)?, header_value(key, value)?);
    }

    headers.insert(
        HeaderName::from_static("client-id"),
        header_value(CLIENT_ID_HEADER, &config.client_id)?,
    );
    headers.insert(
        ACCEPT,
        HeaderValue::from_static(config.api_version.media_type()),
    );

    Ok(headers)
}

fn header_name(key: &str) -> Result<HeaderName> {
    HeaderName::from_bytes(key.as_bytes())
        .map_err(|e| Error::config(format!("invalid header name '{key}': {e}")))
}

fn header_value(key: &str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| Error::config(format!("invalid value for header '{key}': {e}")))
}

/// Set `query` on `url`, replacing any same-named parameters
pub(crate) fn merge_query(url: &mut Url, query: &QueryParams) {
    if query.is_empty() {
        return;
    }

    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| !query.contains_key(key.as_ref()))
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let mut pairs = url.query_pairs_mut();
    pairs.clear();
    for (key, value) in &kept {
        pairs.append_pair(key, value);
    }
    for (key, value) in query {
        pairs.append_pair(key, value);
    }
}

/// Turn a response into JSON or the matching response error
pub(crate) fn classify(url: &str, status: StatusCode, body: String) -> Result<JsonValue> {
    let reason = status.canonical_reason().unwrap_or("Unknown status");

    if status.is_client_error() {
        return Err(Error::Client(ResponseError::new(
            reason,
            url,
            status.as_u16(),
            body,
        )));
    }

    if status.is_server_error() {
        return Err(Error::Server(ResponseError::new(
            reason,
            url,
            status.as_u16(),
            body,
        )));
    }

    serde_json::from_str(&body).map_err(|e| {
        Error::Format(ResponseError::new(
            e.to_string(),
            url,
            status.as_u16(),
            body,
        ))
    })
}
