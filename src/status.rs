//! HTTP status substitution
//!
//! Turns expected failure statuses into ordinary values at the call site:
//!
//! ```rust,ignore
//! let channel = StatusMap::new()
//!     .on(404, None)
//!     .map(async { Ok(Some(fetch_channel().await?)) })
//!     .await?;
//! ```
//!
//! Only client and server errors are substituted. Format errors, transport
//! errors and unmapped statuses pass through unchanged.

use crate::error::{Error, Result};
use std::collections::HashMap;
use std::future::Future;

/// Status code to substitute value table
#[derive(Debug, Clone)]
pub struct StatusMap<T> {
    substitutions: HashMap<u16, T>,
}

impl<T: Clone> StatusMap<T> {
    /// Create an empty map
    pub fn new() -> Self {
        Self {
            substitutions: HashMap::new(),
        }
    }

    /// Substitute `value` when a request fails with `status`
    #[must_use]
    pub fn on(mut self, status: u16, value: T) -> Self {
        self.substitutions.insert(status, value);
        self
    }

    /// Apply the substitutions to a finished result
    pub fn apply(&self, result: Result<T>) -> Result<T> {
        match result {
            Err(Error::Client(response) | Error::Server(response))
                if self.substitutions.contains_key(&response.status) =>
            {
                Ok(self.substitutions[&response.status].clone())
            }
            other => other,
        }
    }

    /// Await `future` and apply the substitutions to its result
    pub async fn map<F>(&self, future: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        self.apply(future.await)
    }
}

impl<T: Clone> Default for StatusMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> FromIterator<(u16, T)> for StatusMap<T> {
    fn from_iter<I: IntoIterator<Item = (u16, T)>>(iter: I) -> Self {
        Self {
            substitutions: iter.into_iter().collect(),
        }
    }
}

/// Shorthand for a single-entry [`StatusMap`]
pub async fn map_status<T, F>(status: u16, value: T, future: F) -> Result<T>
where
    T: Clone,
    F: Future<Output = Result<T>>,
{
    StatusMap::new().on(status, value).map(future).await
}
