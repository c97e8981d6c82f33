//! HTTP transport implementation
//!
//! This module implements [`RobotClient`] on top of `reqwest`:
//! - Building an HTTP client with a polite, identifying user agent
//! - Classifying robots.txt responses by status category
//! - Streaming response bodies without buffering them

use super::{Body, RobotClient, RobotsResponse, SitemapDocument};
use crate::config::{ClientConfig, Config, UserAgentConfig};
use crate::robots::RobotsTxt;
use crate::{ClientError, UrlError};
use async_trait::async_trait;
use futures::TryStreamExt;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Response};
use std::io;
use std::time::Duration;
use tokio_util::io::StreamReader;
use tracing::{debug, trace};
use url::Url;

const ROBOTS_TXT_ACCEPT: &str = "text/plain,*/*";
const SITEMAP_ACCEPT: &str = "application/xml,text/plain,text/xml,*/*";

/// Fetches robots.txt and sitemaps over HTTP(S)
#[derive(Debug, Clone)]
pub struct RobotWebClient {
    client: Client,
}

impl RobotWebClient {
    /// Builds a client from the `[user-agent]` and `[client]` configuration
    ///
    /// # Example
    ///
    /// ```no_run
    /// use std::path::Path;
    /// use sumi_robots::config::load_config;
    /// use sumi_robots::RobotWebClient;
    ///
    /// let config = load_config(Path::new("config.toml")).unwrap();
    /// let client = RobotWebClient::new(&config).unwrap();
    /// ```
    pub fn new(config: &Config) -> Result<Self, ClientError> {
        let client = build_http_client(&config.user_agent, &config.client)
            .map_err(ClientError::Build)?;
        Ok(Self { client })
    }

    /// Wraps an already configured `reqwest` client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Loads the robots.txt policy for the site `url` belongs to
    pub async fn load_robots_txt(&self, url: &Url) -> Result<RobotsTxt, ClientError> {
        super::load_robots_txt(self, url).await
    }

    async fn get(&self, url: &Url, accept: &str) -> Result<Response, ClientError> {
        trace!("GET {}", url);
        self.client
            .get(url.clone())
            .header(ACCEPT, accept)
            .send()
            .await
            .map_err(|source| ClientError::Http {
                url: url.to_string(),
                source,
            })
    }
}

#[async_trait]
impl RobotClient for RobotWebClient {
    async fn fetch_robots_txt(&self, origin: &Url) -> Result<RobotsResponse, ClientError> {
        let url = origin
            .join("/robots.txt")
            .map_err(|e| ClientError::InvalidUrl(UrlError::Parse(e.to_string())))?;
        let response = self.get(&url, ROBOTS_TXT_ACCEPT).await?;
        let status = response.status();
        debug!("robots.txt at {} answered {}", url, status);

        if status.is_success() || status.is_redirection() {
            Ok(RobotsResponse::Success(body_reader(response)))
        } else if status.is_client_error() {
            Ok(RobotsResponse::Unavailable)
        } else if status.is_server_error() {
            Ok(RobotsResponse::Unreachable)
        } else {
            Err(ClientError::UnexpectedStatus {
                url: url.to_string(),
                status: status.as_u16(),
            })
        }
    }

    async fn fetch_sitemap(&self, location: &Url) -> Result<Option<SitemapDocument>, ClientError> {
        let response = self.get(location, SITEMAP_ACCEPT).await?;
        let status = response.status();
        if !status.is_success() {
            debug!("Sitemap {} answered {}", location, status);
            return Ok(None);
        }

        let content_type = media_type(&response);
        Ok(Some(SitemapDocument {
            content_type,
            body: body_reader(response),
        }))
    }
}

/// Builds an HTTP client with proper configuration
///
/// The user agent follows `CrawlerName/Version (+ContactURL; ContactEmail)`.
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    client: &ClientConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent_string(user_agent))
        .timeout(Duration::from_secs(client.timeout_secs))
        .connect_timeout(Duration::from_secs(client.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Formats the user agent header value
pub fn user_agent_string(config: &UserAgentConfig) -> String {
    format!(
        "{}/{} (+{}; {})",
        config.crawler_name, config.crawler_version, config.contact_url, config.contact_email
    )
}

/// Response media type, lower-cased, without parameters
fn media_type(response: &Response) -> Option<String> {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(|value| value.trim().to_ascii_lowercase())
        .filter(|value| !value.is_empty())
}

/// Adapts the response's chunk stream into a reader
fn body_reader(response: Response) -> Body {
    let chunks = response
        .bytes_stream()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e));
    Box::new(StreamReader::new(Box::pin(chunks)))
}
