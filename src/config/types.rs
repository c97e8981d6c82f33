use crate::sitemap::SitemapOptions;
use serde::Deserialize;

/// Main configuration structure for Sumi-Robots
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub client: ClientConfig,
    #[serde(default)]
    pub sitemap: SitemapConfig,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler, also the identity robots.txt groups are matched against
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

/// HTTP transport configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Total request timeout (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connection timeout (seconds)
    #[serde(rename = "connect-timeout-secs", default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

/// Sitemap resolution bounds
#[derive(Debug, Clone, Deserialize)]
pub struct SitemapConfig {
    /// Maximum sitemap index nesting that is followed
    #[serde(rename = "max-depth", default = "default_max_depth")]
    pub max_depth: usize,

    /// Maximum number of sitemap documents fetched per load
    #[serde(rename = "max-sitemaps", default = "default_max_sitemaps")]
    pub max_sitemaps: usize,
}

impl SitemapConfig {
    /// Resolution options carrying these bounds
    pub fn to_options(&self) -> SitemapOptions {
        SitemapOptions {
            max_depth: self.max_depth,
            max_sitemaps: self.max_sitemaps,
            ..SitemapOptions::default()
        }
    }
}

impl Default for SitemapConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            max_sitemaps: default_max_sitemaps(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_max_depth() -> usize {
    SitemapOptions::DEFAULT_MAX_DEPTH
}

fn default_max_sitemaps() -> usize {
    SitemapOptions::DEFAULT_MAX_SITEMAPS
}
