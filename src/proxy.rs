//! Lazy references
//!
//! A [`LazyRef`] holds the fields of an object that arrived for free (for
//! example a channel's name embedded in a video) and knows how to fetch the
//! full object. The fetch happens on the first call to [`LazyRef::resolve`]
//! and its result is cached; later calls never touch the network.

use crate::error::{Error, Result};
use futures::future::BoxFuture;
use futures::FutureExt;
use std::fmt;
use std::future::Future;
use tracing::debug;

type Resolver<T> = Box<dyn Fn() -> BoxFuture<'static, Result<T>> + Send + Sync>;

enum State<T> {
    Unresolved(Resolver<T>),
    Resolved(T),
}

/// Cheaply-known fields `K` plus a deferred fetch of the full object `T`
pub struct LazyRef<K, T> {
    known: K,
    state: State<T>,
}

impl<K, T> LazyRef<K, T> {
    /// Create an unresolved reference
    pub fn new<F, Fut>(known: K, resolver: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        Self {
            known,
            state: State::Unresolved(Box::new(move || resolver().boxed())),
        }
    }

    /// Create a reference whose full object is already at hand
    pub fn resolved(known: K, full: T) -> Self {
        Self {
            known,
            state: State::Resolved(full),
        }
    }

    /// Fields known without a fetch
    pub fn known(&self) -> &K {
        &self.known
    }

    /// Whether the full object has been fetched. Never fetches.
    pub fn is_resolved(&self) -> bool {
        matches!(self.state, State::Resolved(_))
    }

    /// The full object, if already fetched
    pub fn resolved_ref(&self) -> Option<&T> {
        match &self.state {
            State::Resolved(full) => Some(full),
            State::Unresolved(_) => None,
        }
    }

    /// Fetch the full object on first use, then return the cached one.
    ///
    /// A failed fetch leaves the reference unresolved, so a later call tries
    /// again.
    pub async fn resolve(&mut self) -> Result<&T> {
        if let State::Unresolved(resolver) = &self.state {
            let full = resolver().await?;
            debug!("Lazy reference resolved");
            self.state = State::Resolved(full);
        }

        match &self.state {
            State::Resolved(full) => Ok(full),
            State::Unresolved(_) => Err(Error::Other("lazy reference failed to resolve".to_string())),
        }
    }

    /// Read a field of the full object, fetching it if needed
    pub async fn get<R>(&mut self, field: impl FnOnce(&T) -> R) -> Result<R> {
        self.resolve().await.map(field)
    }

    /// Consume the reference, returning the full object
    pub async fn into_resolved(mut self) -> Result<T> {
        self.resolve().await?;
        match self.state {
            State::Resolved(full) => Ok(full),
            State::Unresolved(_) => Err(Error::Other("lazy reference failed to resolve".to_string())),
        }
    }
}

impl<K: fmt::Debug, T: fmt::Debug> fmt::Debug for LazyRef<K, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("LazyRef");
        s.field("known", &self.known);
        match &self.state {
            State::Resolved(full) => s.field("resolved", full),
            State::Unresolved(_) => s.field("resolved", &Option::<()>::None),
        };
        s.finish()
    }
}
