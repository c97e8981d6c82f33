//! Sumi-Robots: robots.txt policies and sitemap resolution for polite crawlers
//!
//! This crate parses a site's robots.txt into an immutable [`RobotsTxt`] policy
//! that answers allow/disallow queries per crawler identity, reports crawl
//! delays and the preferred host, and lazily resolves the sitemaps it links
//! (including nested sitemap indexes) into a stream of [`UrlSetItem`]s.

pub mod client;
pub mod config;
pub mod limits;
pub mod robots;
pub mod sitemap;
pub mod url;

use thiserror::Error;

/// Main error type for Sumi-Robots operations
#[derive(Debug, Error)]
pub enum RobotsError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Client error: {0}")]
    Client(#[from] ClientError),

    #[error("Robots.txt error: {0}")]
    RobotsTxt(#[from] RobotsTxtError),

    #[error("Sitemap error: {0}")]
    Sitemap(#[from] SitemapError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL and identity errors raised for caller-supplied values
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,

    #[error("Invalid product token: '{0}'")]
    InvalidProductToken(String),
}

/// Errors raised while reading a robots.txt document
///
/// Individual malformed lines never produce an error; only the ingestion
/// ceiling and I/O failures of the underlying stream do.
#[derive(Debug, Error)]
pub enum RobotsTxtError {
    #[error("robots.txt exceeded the parsing limit of {limit} bytes")]
    ResourceLimitExceeded { limit: u64 },

    #[error("IO error while reading robots.txt: {0}")]
    Io(std::io::Error),
}

impl From<std::io::Error> for RobotsTxtError {
    fn from(err: std::io::Error) -> Self {
        match limits::limit_exceeded(&err) {
            Some(limit) => Self::ResourceLimitExceeded { limit },
            None => Self::Io(err),
        }
    }
}

/// Errors raised while parsing a sitemap document
#[derive(Debug, Error)]
pub enum SitemapError {
    #[error("sitemap exceeded the parsing limit of {limit} bytes")]
    ResourceLimitExceeded { limit: u64 },

    #[error("sitemap exceeded the limit of {limit} URLs")]
    LineLimitExceeded { limit: usize },

    #[error("Unable to find root sitemap element")]
    MissingRoot,

    #[error("Sitemap entry has no <loc> element")]
    MissingLocation,

    #[error("Invalid sitemap location '{value}': {source}")]
    InvalidLocation {
        value: String,
        source: ::url::ParseError,
    },

    #[error("Invalid sitemap date '{value}'")]
    InvalidDate { value: String },

    #[error("Invalid sitemap change frequency '{value}'")]
    InvalidChangeFrequency { value: String },

    #[error("Invalid sitemap priority '{value}': {source}")]
    InvalidPriority {
        value: String,
        source: rust_decimal::Error,
    },

    #[error("Unable to parse sitemap XML: {0}")]
    Xml(String),

    #[error("IO error while reading sitemap: {0}")]
    Io(std::io::Error),
}

impl From<std::io::Error> for SitemapError {
    fn from(err: std::io::Error) -> Self {
        match limits::limit_exceeded(&err) {
            Some(limit) => Self::ResourceLimitExceeded { limit },
            None => Self::Io(err),
        }
    }
}

/// Transport errors surfaced by a [`client::RobotClient`]
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Unexpected status {status} for {url}")]
    UnexpectedStatus { url: String, status: u16 },

    #[error("Robots.txt error: {0}")]
    RobotsTxt(#[from] RobotsTxtError),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] UrlError),
}

/// Result type alias for Sumi-Robots operations
pub type Result<T> = std::result::Result<T, RobotsError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

/// Result type alias for sitemap parsing
pub type SitemapResult<T> = std::result::Result<T, SitemapError>;

// Re-export commonly used types
pub use client::{load_robots_txt, RobotClient, RobotWebClient};
pub use config::Config;
pub use robots::{read_robots_txt, ProductToken, RobotsTxt, RuleChecker, RuleType, UrlRule};
pub use sitemap::{ChangeFrequency, SitemapOptions, UrlSetItem};
pub use crate::url::{UrlPath, UrlPathPattern};
