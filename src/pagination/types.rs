//! Pagination types and traits
//!
//! Defines the page source abstraction, the request descriptor, and helpers for
//! reading the pagination envelope:
//!
//! ```json
//! { "<items>": [...], "_links": { "next": "<url>?offset=N" }, "_total": 150 }
//! ```

use crate::error::Result;
use crate::types::{JsonValue, QueryParams};
use async_trait::async_trait;
use url::Url;

/// Query parameter carrying the page size
pub const LIMIT_PARAM: &str = "limit";

/// Query parameter carrying the offset
pub const OFFSET_PARAM: &str = "offset";

/// Something that can fetch one JSON page
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch `path` (relative to the API root, or absolute) with `query`
    async fn fetch(&self, path: &str, query: &QueryParams) -> Result<JsonValue>;

    /// Server-side cap on items per page
    fn max_page_size(&self) -> u32 {
        crate::config::DEFAULT_MAX_PAGE_SIZE
    }

    /// Maximum pages fetched by one paginate call
    fn max_pages(&self) -> Option<u32> {
        None
    }
}

/// Describes the first page of a paginated request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Path relative to the API root; may carry its own query string
    pub path: String,
    /// Extra parameters sent with every page
    pub params: QueryParams,
    /// Page size
    pub limit: u32,
    /// Offset of the first page
    pub offset: u64,
}

impl PageRequest {
    /// Create a request for `path` with the given page size, starting at 0
    pub fn new(path: impl Into<String>, limit: u32) -> Self {
        Self {
            path: path.into(),
            params: QueryParams::new(),
            limit,
            offset: 0,
        }
    }

    /// Set the starting offset
    #[must_use]
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }

    /// Add a parameter sent with every page
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Set all extra parameters
    #[must_use]
    pub fn params(mut self, params: QueryParams) -> Self {
        self.params = params;
        self
    }

    /// Path of the first page with `limit`/`offset` injected.
    ///
    /// Pagination keys win over same-named keys already in the path's query.
    pub fn first_page_path(&self) -> String {
        let (base, query) = match self.path.split_once('?') {
            Some((base, query)) => (base, query),
            None => (self.path.as_str(), ""),
        };

        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            if key != LIMIT_PARAM && key != OFFSET_PARAM {
                serializer.append_pair(&key, &value);
            }
        }
        serializer.append_pair(LIMIT_PARAM, &self.limit.to_string());
        serializer.append_pair(OFFSET_PARAM, &self.offset.to_string());

        format!("{base}?{}", serializer.finish())
    }

    /// Parameters sent with every page, minus the pagination keys
    pub fn page_params(&self) -> QueryParams {
        self.params
            .iter()
            .filter(|(key, _)| key.as_str() != LIMIT_PARAM && key.as_str() != OFFSET_PARAM)
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}

/// Why pagination ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The page callback asked to stop
    Declined,
    /// The page body carried an embedded `error` with status 503
    ServiceUnavailable,
    /// The envelope has no usable `_links.next`
    NoNextLink,
    /// The next offset is beyond `_total`
    PastTotal,
    /// The configured page cap was reached
    PageCap,
}

/// Result of the next page computation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextPage {
    /// Fetch this URL next
    Continue {
        /// Absolute URL of the next page
        url: String,
    },
    /// No more pages
    Done(StopReason),
}

impl NextPage {
    /// Check if this is a done result
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done(_))
    }

    /// Check if this is a continue result
    pub fn is_continue(&self) -> bool {
        matches!(self, Self::Continue { .. })
    }
}

/// Summary of a finished pagination run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Number of pages fetched
    pub pages: u32,
    /// Why the run ended
    pub stop: StopReason,
}

// ============================================================================
// Envelope helpers
// ============================================================================

/// Whether a page body carries the embedded "service unavailable" signal
pub fn is_service_unavailable(page: &JsonValue) -> bool {
    let has_error = match page.get("error") {
        None | Some(JsonValue::Null) => false,
        Some(JsonValue::Bool(flag)) => *flag,
        Some(_) => true,
    };
    has_error && page.get("status").and_then(JsonValue::as_u64) == Some(503)
}

/// `_links.next` of a page
pub fn next_link(page: &JsonValue) -> Option<&str> {
    page.get("_links")?
        .get("next")?
        .as_str()
        .filter(|link| !link.is_empty())
}

/// `_total` of a page
pub fn total(page: &JsonValue) -> Option<u64> {
    page.get("_total")?.as_u64()
}

/// `offset` query parameter of a link
pub fn link_offset(link: &str) -> Option<u64> {
    let url = Url::parse(link)
        .or_else(|_| Url::parse("http://relative.invalid/")?.join(link))
        .ok()?;
    url.query_pairs()
        .find(|(key, _)| key == OFFSET_PARAM)
        .and_then(|(_, value)| value.parse().ok())
}

/// Decide where to go after a page the callback accepted
pub fn next_page(page: &JsonValue) -> NextPage {
    let Some(link) = next_link(page) else {
        return NextPage::Done(StopReason::NoNextLink);
    };

    if let (Some(offset), Some(total)) = (link_offset(link), total(page)) {
        if offset > total {
            return NextPage::Done(StopReason::PastTotal);
        }
    }

    NextPage::Continue {
        url: link.to_string(),
    }
}
