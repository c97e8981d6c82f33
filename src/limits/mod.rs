//! Resource ceilings for document ingestion
//!
//! Every document this crate reads is pulled through a [`BoundedReader`] so
//! that oversized or malicious input is rejected while it streams in, never
//! after it has been buffered.

mod reader;

pub use reader::BoundedReader;

use std::io;
use thiserror::Error;

/// Maximum number of bytes read from a robots.txt document (500 KiB)
pub const ROBOTS_TXT_MAX_BYTES: u64 = 500 * 1024;

/// Maximum number of bytes read from a single sitemap document (50 MiB)
pub const SITEMAP_MAX_BYTES: u64 = 52_428_800;

/// Maximum number of URLs in a single text sitemap
pub const SITEMAP_MAX_URLS: usize = 50_000;

/// Raised by a [`BoundedReader`] once its ceiling has been passed
///
/// It travels inside a [`std::io::Error`] so that any reader adapter can
/// carry it; use [`limit_exceeded`] to recover it on the other side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("input exceeded the limit of {limit} bytes")]
pub struct LimitExceeded {
    pub limit: u64,
}

impl From<LimitExceeded> for io::Error {
    fn from(err: LimitExceeded) -> Self {
        io::Error::new(io::ErrorKind::Other, err)
    }
}

/// Returns the configured ceiling if `err` was raised by a [`BoundedReader`]
pub fn limit_exceeded(err: &io::Error) -> Option<u64> {
    err.get_ref()
        .and_then(|inner| inner.downcast_ref::<LimitExceeded>())
        .map(|exceeded| exceeded.limit)
}
