//! Accumulation over the paginator
//!
//! Each page's items array is mapped through the factory, deduplicated by
//! identity key, and handed to a sink until the limit is reached or the pages
//! run out.

use super::types::{AccumulateOptions, AccumulationState, Identity};
use crate::error::{Error, Result};
use crate::pagination::{PageRequest, PageSource, Paginator};
use crate::types::JsonValue;
use tracing::debug;

/// Collects domain objects across pages
pub struct Accumulator<'a, S: PageSource + ?Sized> {
    source: &'a S,
}

impl<'a, S: PageSource + ?Sized> Accumulator<'a, S> {
    /// Create an accumulator reading from `source`
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    /// Materialized mode: return the distinct items in page order
    pub async fn collect<T>(&self, options: AccumulateOptions<T>) -> Result<Vec<T>>
    where
        T: Identity + Send,
    {
        let mut items = Vec::new();
        self.drive(&options, &mut |item| {
            items.push(item);
            Ok(())
        })
        .await?;
        Ok(items)
    }

    /// Streaming mode: hand each distinct item to `on_item`.
    ///
    /// An error from `on_item` stops the walk and is returned unchanged.
    pub async fn for_each<T, F>(&self, options: AccumulateOptions<T>, mut on_item: F) -> Result<()>
    where
        T: Identity + Send,
        F: FnMut(T) -> Result<()> + Send,
    {
        self.drive(&options, &mut on_item).await
    }

    async fn drive<T, F>(&self, options: &AccumulateOptions<T>, sink: &mut F) -> Result<()>
    where
        T: Identity + Send,
        F: FnMut(T) -> Result<()> + Send,
    {
        if options.limit == Some(0) {
            return Ok(());
        }

        let page_size = options.page_size(self.source.max_page_size());
        let request = PageRequest::new(options.path.as_str(), page_size)
            .offset(options.offset)
            .params(options.params.clone());

        let mut state = AccumulationState::new();

        let pagination = Paginator::new(self.source)
            .run(request, |page| {
                let items = page_items(page, &options.items_key)?;

                for raw in items {
                    let raw = match &options.sub_key {
                        Some(key) => raw
                            .get(key)
                            .ok_or_else(|| Error::missing_items(key, self_link(page)))?,
                        None => raw,
                    };

                    let item = options.create(raw)?;
                    if state.admit(item.identity()) {
                        sink(item)?;
                        if state.is_full(options.limit) {
                            return Ok(false);
                        }
                    }
                }

                Ok(!items.is_empty() && items.len() >= page_size as usize)
            })
            .await?;

        debug!(
            "Accumulated {} item(s) from '{}' over {} page(s), {:?}",
            state.count(),
            options.path,
            pagination.pages,
            pagination.stop
        );
        Ok(())
    }
}

/// Items array of a page
fn page_items<'p>(page: &'p JsonValue, key: &str) -> Result<&'p Vec<JsonValue>> {
    page.get(key)
        .and_then(JsonValue::as_array)
        .ok_or_else(|| Error::missing_items(key, self_link(page)))
}

/// `_links.self` of a page, for error context
fn self_link(page: &JsonValue) -> String {
    page.pointer("/_links/self")
        .and_then(JsonValue::as_str)
        .unwrap_or_default()
        .to_string()
}
