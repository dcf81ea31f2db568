//! Pagination module
//!
//! Walks offset-based pages linked through `_links.next`.
//!
//! # Overview
//!
//! The first request carries `limit`/`offset` injected into the path; every
//! later request follows the server's `next` link. A run ends when the page
//! callback declines, the body carries an embedded 503, there is no next link,
//! the next offset passes `_total`, or the page cap is reached.

mod paginator;
mod types;

pub use paginator::Paginator;
pub use types::{
    is_service_unavailable, link_offset, next_link, next_page, total, NextPage, PageRequest,
    PageSource, Pagination, StopReason, LIMIT_PARAM, OFFSET_PARAM,
};
