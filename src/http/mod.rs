//! HTTP transport module
//!
//! Provides the [`Connection`] used by every resource call.
//!
//! # Features
//!
//! - **Versioned headers**: `Client-ID` and `Accept` media type on every request
//! - **Error classification**: 4xx, 5xx and malformed bodies become typed errors
//! - **Rate Limiting**: minimum interval or token bucket (governor)
//! - **Pagination**: `paginate` / `accumulate` entry points

mod client;
mod rate_limit;

pub use client::{Connection, CLIENT_ID_HEADER};
pub use rate_limit::{RateLimiter, RateLimiterConfig, RatePermit};
