//! URL handling module for Sumi-Robots
//!
//! This module provides robots.txt path patterns and their matching engine,
//! the percent-encoding normalisation shared by patterns and request paths,
//! and small helpers for origins and `Host:` directive values.

mod domain;
mod matcher;
mod normalize;

// Re-export main functions
pub use domain::{default_sitemap_url, origin_of, parse_host_directive, request_path};
pub use matcher::{UrlPath, UrlPathPattern};
pub use normalize::normalize_path;
