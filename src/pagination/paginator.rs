//! Page-walking loop
//!
//! Follows `_links.next` until the callback declines, the envelope signals the
//! end, or the page cap is hit. One request is in flight at a time.

use super::types::{
    is_service_unavailable, next_page, NextPage, PageRequest, PageSource, Pagination, StopReason,
};
use crate::error::Result;
use crate::types::JsonValue;
use tracing::{debug, warn};

/// Drives a [`PageSource`] through a paginated resource
pub struct Paginator<'a, S: PageSource + ?Sized> {
    source: &'a S,
    max_pages: Option<u32>,
}

impl<'a, S: PageSource + ?Sized> Paginator<'a, S> {
    /// Create a paginator using the source's page cap
    pub fn new(source: &'a S) -> Self {
        Self {
            source,
            max_pages: source.max_pages(),
        }
    }

    /// Override the page cap
    #[must_use]
    pub fn with_max_pages(mut self, max_pages: Option<u32>) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Walk pages, stopping as soon as `on_page` returns `false`.
    ///
    /// Errors from `on_page` abort the walk and are returned unchanged.
    pub async fn run<F>(&self, request: PageRequest, mut on_page: F) -> Result<Pagination>
    where
        F: FnMut(&JsonValue) -> Result<bool> + Send,
    {
        self.drive(request, &mut on_page).await
    }

    /// Walk pages, letting only the envelope decide when to stop
    pub async fn run_each<F>(&self, request: PageRequest, mut on_page: F) -> Result<Pagination>
    where
        F: FnMut(&JsonValue) -> Result<()> + Send,
    {
        self.drive(request, &mut |page: &JsonValue| on_page(page).map(|()| true))
            .await
    }

    async fn drive<F>(&self, request: PageRequest, on_page: &mut F) -> Result<Pagination>
    where
        F: FnMut(&JsonValue) -> Result<bool> + Send,
    {
        let params = request.page_params();
        let mut url = request.first_page_path();
        let mut pages = 0u32;

        loop {
            let page = self.source.fetch(&url, &params).await?;
            pages += 1;
            debug!("Fetched page {pages}: {url}");

            let stop = if is_service_unavailable(&page) {
                // Not retried: the walk ends with whatever was collected so far
                warn!("Page {pages} reported 503 in its body, stopping at {url}");
                Some(StopReason::ServiceUnavailable)
            } else if !on_page(&page)? {
                Some(StopReason::Declined)
            } else {
                match next_page(&page) {
                    NextPage::Done(reason) => Some(reason),
                    NextPage::Continue { .. } if self.page_cap_reached(pages) => {
                        warn!("Page cap of {pages} reached, stopping at {url}");
                        Some(StopReason::PageCap)
                    }
                    NextPage::Continue { url: next } => {
                        url = next;
                        None
                    }
                }
            };

            if let Some(stop) = stop {
                debug!("Pagination finished after {pages} page(s): {stop:?}");
                return Ok(Pagination { pages, stop });
            }
        }
    }

    fn page_cap_reached(&self, pages: u32) -> bool {
        self.max_pages.is_some_and(|max| pages >= max)
    }
}
