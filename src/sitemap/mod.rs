//! Sitemap parsing and resolution module
//!
//! Parses sitemaps.org XML documents (`<urlset>` and `<sitemapindex>`) and
//! plain-text sitemaps, and resolves a site's sitemaps, following indexes
//! recursively, into a lazy stream of [`UrlSetItem`]s.

mod resolver;
mod text;
mod xml;

pub use resolver::resolve_sitemaps;
pub use text::read_text_sitemap;
pub use xml::read_xml_sitemap;

use crate::SitemapError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use url::Url;

/// How frequently a page is likely to change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeFrequency {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl ChangeFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeFrequency::Always => "always",
            ChangeFrequency::Hourly => "hourly",
            ChangeFrequency::Daily => "daily",
            ChangeFrequency::Weekly => "weekly",
            ChangeFrequency::Monthly => "monthly",
            ChangeFrequency::Yearly => "yearly",
            ChangeFrequency::Never => "never",
        }
    }
}

impl FromStr for ChangeFrequency {
    type Err = SitemapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "always" => Ok(ChangeFrequency::Always),
            "hourly" => Ok(ChangeFrequency::Hourly),
            "daily" => Ok(ChangeFrequency::Daily),
            "weekly" => Ok(ChangeFrequency::Weekly),
            "monthly" => Ok(ChangeFrequency::Monthly),
            "yearly" => Ok(ChangeFrequency::Yearly),
            "never" => Ok(ChangeFrequency::Never),
            _ => Err(SitemapError::InvalidChangeFrequency {
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for ChangeFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A page listed in a sitemap
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UrlSetItem {
    pub location: Url,
    pub last_modified: Option<DateTime<Utc>>,
    pub change_frequency: Option<ChangeFrequency>,
    pub priority: Option<Decimal>,
}

impl UrlSetItem {
    /// Creates an item with only a location
    pub fn new(location: Url) -> Self {
        Self {
            location,
            last_modified: None,
            change_frequency: None,
            priority: None,
        }
    }
}

/// A child sitemap listed in a sitemap index
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SitemapIndexRef {
    pub location: Url,
    pub last_modified: Option<DateTime<Utc>>,
}

/// The parsed content of one XML sitemap document, in document order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sitemap {
    UrlSet(Vec<UrlSetItem>),
    Index(Vec<SitemapIndexRef>),
}

/// Sitemap document format, chosen from the response content type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SitemapFormat {
    Xml,
    Text,
}

impl SitemapFormat {
    /// `text/plain` selects the text parser; anything else (or nothing) is XML
    pub fn from_content_type(content_type: Option<&str>) -> Self {
        let media_type = content_type
            .and_then(|value| value.split(';').next())
            .map(|value| value.trim().to_ascii_lowercase());

        match media_type.as_deref() {
            Some("text/plain") => SitemapFormat::Text,
            _ => SitemapFormat::Xml,
        }
    }
}

/// Parses a `<lastmod>` value
///
/// Accepts W3C datetime forms: a full RFC 3339 date-time, a date-time
/// without seconds (`2024-01-15T10:30+02:00`, `2024-01-15T10:30Z`), a
/// date-time without offset (taken as UTC), and a bare date (midnight UTC).
pub fn parse_last_modified(value: &str) -> Result<DateTime<Utc>, SitemapError> {
    if let Ok(date_time) = DateTime::parse_from_rfc3339(value) {
        return Ok(date_time.with_timezone(&Utc));
    }
    if let Ok(date_time) = DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M%:z") {
        return Ok(date_time.with_timezone(&Utc));
    }

    let naive = value
        .strip_suffix('Z')
        .and_then(|rest| NaiveDateTime::parse_from_str(rest, "%Y-%m-%dT%H:%M").ok())
        .or_else(|| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S").ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        });

    naive
        .map(|date_time| Utc.from_utc_datetime(&date_time))
        .ok_or_else(|| SitemapError::InvalidDate {
            value: value.to_string(),
        })
}

/// Returns false only when the entry is dated strictly before `modified_since`
pub fn passes_filter(
    last_modified: Option<DateTime<Utc>>,
    modified_since: Option<DateTime<Utc>>,
) -> bool {
    match (last_modified, modified_since) {
        (Some(last_modified), Some(since)) => last_modified >= since,
        _ => true,
    }
}

/// Predicate deciding whether a sitemap location is fetched
pub type LocationFilter = Arc<dyn Fn(&Url) -> bool + Send + Sync>;

/// Options for resolving a site's sitemaps
#[derive(Clone)]
pub struct SitemapOptions {
    /// Drop entries last modified strictly before this instant
    pub modified_since: Option<DateTime<Utc>>,
    /// Maximum sitemap index nesting that is followed
    pub max_depth: usize,
    /// Maximum number of sitemap documents fetched in one load
    pub max_sitemaps: usize,
    /// Sitemap locations rejected by this predicate are never fetched
    pub location_filter: Option<LocationFilter>,
    /// Stops resolution, including an in-flight fetch, once cancelled
    pub cancellation: CancellationToken,
}

impl SitemapOptions {
    pub const DEFAULT_MAX_DEPTH: usize = 8;
    pub const DEFAULT_MAX_SITEMAPS: usize = 1000;

    pub fn modified_since(mut self, since: DateTime<Utc>) -> Self {
        self.modified_since = Some(since);
        self
    }

    pub fn location_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&Url) -> bool + Send + Sync + 'static,
    {
        self.location_filter = Some(Arc::new(filter));
        self
    }

    pub fn cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }
}

impl Default for SitemapOptions {
    fn default() -> Self {
        Self {
            modified_since: None,
            max_depth: Self::DEFAULT_MAX_DEPTH,
            max_sitemaps: Self::DEFAULT_MAX_SITEMAPS,
            location_filter: None,
            cancellation: CancellationToken::new(),
        }
    }
}

impl fmt::Debug for SitemapOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SitemapOptions")
            .field("modified_since", &self.modified_since)
            .field("max_depth", &self.max_depth)
            .field("max_sitemaps", &self.max_sitemaps)
            .field("location_filter", &self.location_filter.is_some())
            .field("cancelled", &self.cancellation.is_cancelled())
            .finish()
    }
}
