//! Accumulation types
//!
//! [`Identity`] ties a domain object to the real-world entity it describes,
//! [`AccumulateOptions`] describes one accumulation, and [`AccumulationState`]
//! holds the per-call dedup bookkeeping.

use crate::error::{Error, Result};
use crate::types::{JsonValue, QueryParams};
use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

/// A domain object with a stable identity key
///
/// Two objects with the same key describe the same entity.
pub trait Identity {
    /// Key type
    type Key: Eq + Hash + Clone + fmt::Debug + Send + Sync;

    /// Identity key of this object
    fn identity(&self) -> Self::Key;
}

/// Implement `PartialEq`, `Eq` and `Hash` through [`Identity`]
#[macro_export]
macro_rules! id_equality {
    ($ty:ty) => {
        impl ::std::cmp::PartialEq for $ty {
            fn eq(&self, other: &Self) -> bool {
                $crate::Identity::identity(self) == $crate::Identity::identity(other)
            }
        }

        impl ::std::cmp::Eq for $ty {}

        impl ::std::hash::Hash for $ty {
            fn hash<H: ::std::hash::Hasher>(&self, state: &mut H) {
                ::std::hash::Hash::hash(&$crate::Identity::identity(self), state);
            }
        }
    };
}

/// Builds one domain object from one JSON item
pub type Factory<T> = Arc<dyn Fn(&JsonValue) -> Result<T> + Send + Sync>;

/// What to accumulate and how much of it
pub struct AccumulateOptions<T> {
    /// Resource path relative to the API root
    pub path: String,
    /// Extra parameters sent with every page
    pub params: QueryParams,
    /// Key of the items array in each page
    pub items_key: String,
    /// Key of the object to unwrap inside each item
    pub sub_key: Option<String>,
    /// Maximum number of distinct items (`None` = everything)
    pub limit: Option<usize>,
    /// Offset of the first page
    pub offset: u64,
    factory: Factory<T>,
}

impl<T> AccumulateOptions<T> {
    /// Create a new options builder
    pub fn builder() -> AccumulateOptionsBuilder<T> {
        AccumulateOptionsBuilder::default()
    }

    /// Build a domain object from a JSON item
    pub fn create(&self, json: &JsonValue) -> Result<T> {
        (self.factory)(json)
    }

    /// Items requested per page given the server's cap
    pub fn page_size(&self, max_page_size: u32) -> u32 {
        self.limit
            .map_or(max_page_size, |limit| {
                u32::try_from(limit).unwrap_or(u32::MAX)
            })
            .min(max_page_size)
    }
}

impl<T> Clone for AccumulateOptions<T> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            params: self.params.clone(),
            items_key: self.items_key.clone(),
            sub_key: self.sub_key.clone(),
            limit: self.limit,
            offset: self.offset,
            factory: Arc::clone(&self.factory),
        }
    }
}

impl<T> fmt::Debug for AccumulateOptions<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccumulateOptions")
            .field("path", &self.path)
            .field("params", &self.params)
            .field("items_key", &self.items_key)
            .field("sub_key", &self.sub_key)
            .field("limit", &self.limit)
            .field("offset", &self.offset)
            .finish_non_exhaustive()
    }
}

/// Builder for [`AccumulateOptions`]
pub struct AccumulateOptionsBuilder<T> {
    path: Option<String>,
    params: QueryParams,
    items_key: Option<String>,
    sub_key: Option<String>,
    limit: Option<usize>,
    offset: u64,
    factory: Option<Factory<T>>,
}

impl<T> Default for AccumulateOptionsBuilder<T> {
    fn default() -> Self {
        Self {
            path: None,
            params: QueryParams::new(),
            items_key: None,
            sub_key: None,
            limit: None,
            offset: 0,
            factory: None,
        }
    }
}

impl<T> AccumulateOptionsBuilder<T> {
    /// Set the resource path
    #[must_use]
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Add a parameter sent with every page
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Set the items array key
    #[must_use]
    pub fn items_key(mut self, key: impl Into<String>) -> Self {
        self.items_key = Some(key.into());
        self
    }

    /// Unwrap this key inside every item before building it
    #[must_use]
    pub fn sub_key(mut self, key: impl Into<String>) -> Self {
        self.sub_key = Some(key.into());
        self
    }

    /// Stop after this many distinct items
    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Optional form of [`limit`](Self::limit)
    #[must_use]
    pub fn max_items(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    /// Start at this offset
    #[must_use]
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }

    /// Set the item factory
    #[must_use]
    pub fn factory<F>(mut self, factory: F) -> Self
    where
        F: Fn(&JsonValue) -> Result<T> + Send + Sync + 'static,
    {
        self.factory = Some(Arc::new(factory));
        self
    }

    /// Validate and build the options
    pub fn build(self) -> Result<AccumulateOptions<T>> {
        let items_key = self
            .items_key
            .filter(|key| !key.is_empty())
            .ok_or_else(|| Error::invalid_argument("items_key"))?;
        let path = self
            .path
            .filter(|path| !path.is_empty())
            .ok_or_else(|| Error::invalid_argument("path"))?;
        let factory = self
            .factory
            .ok_or_else(|| Error::invalid_argument("factory"))?;

        Ok(AccumulateOptions {
            path,
            params: self.params,
            items_key,
            sub_key: self.sub_key,
            limit: self.limit,
            offset: self.offset,
            factory,
        })
    }
}

/// Per-call dedup bookkeeping
#[derive(Debug)]
pub struct AccumulationState<K> {
    seen: HashSet<K>,
}

impl<K: Eq + Hash> AccumulationState<K> {
    /// Create an empty state
    pub fn new() -> Self {
        Self {
            seen: HashSet::new(),
        }
    }

    /// Record `key`; returns `false` if it was already seen
    pub fn admit(&mut self, key: K) -> bool {
        self.seen.insert(key)
    }

    /// Number of distinct items admitted
    pub fn count(&self) -> usize {
        self.seen.len()
    }

    /// Whether `limit` distinct items have been admitted
    pub fn is_full(&self, limit: Option<usize>) -> bool {
        limit.is_some_and(|limit| self.count() >= limit)
    }
}

impl<K: Eq + Hash> Default for AccumulationState<K> {
    fn default() -> Self {
        Self::new()
    }
}
