//! Transport boundary for robots.txt and sitemap retrieval
//!
//! The parsing core never talks to the network itself. It asks a
//! [`RobotClient`] for documents and translates the response categories
//! into policies: a missing robots.txt allows everything, an unreachable
//! one denies everything.

mod http;

pub use http::RobotWebClient;

use crate::robots::{read_robots_txt, RobotsTxt};
use crate::url::origin_of;
use crate::ClientError;
use async_trait::async_trait;
use tokio::io::AsyncRead;
use tracing::info;
use url::Url;

/// A streaming response body
pub type Body = Box<dyn AsyncRead + Send + Unpin>;

/// Outcome of requesting a site's robots.txt
pub enum RobotsResponse {
    /// 2xx or 3xx: the document body
    Success(Body),
    /// 4xx: the site has no robots.txt
    Unavailable,
    /// 5xx: the site could not serve its robots.txt
    Unreachable,
}

/// A fetched sitemap document
pub struct SitemapDocument {
    /// Media type of the response, lower-cased and without parameters
    pub content_type: Option<String>,
    pub body: Body,
}

/// Fetches robots.txt and sitemap documents
#[async_trait]
pub trait RobotClient: Send + Sync {
    /// Requests `<origin>/robots.txt`
    ///
    /// Statuses outside 2xx-5xx are reported as
    /// [`ClientError::UnexpectedStatus`].
    async fn fetch_robots_txt(&self, origin: &Url) -> Result<RobotsResponse, ClientError>;

    /// Requests a sitemap document; `Ok(None)` when the server does not serve it
    async fn fetch_sitemap(&self, location: &Url) -> Result<Option<SitemapDocument>, ClientError>;
}

/// Loads the robots.txt policy for the site `url` belongs to
///
/// # Arguments
///
/// * `client` - Transport used to fetch the document
/// * `url` - Any HTTP(S) URL on the site
///
/// # Returns
///
/// * `Ok(RobotsTxt)` - The parsed policy, or an allow-all (4xx) / deny-all (5xx) policy
/// * `Err(ClientError)` - The URL is not HTTP(S), the transport failed, or the document exceeded the ceiling
pub async fn load_robots_txt<C>(client: &C, url: &Url) -> Result<RobotsTxt, ClientError>
where
    C: RobotClient + ?Sized,
{
    let origin = origin_of(url)?;

    match client.fetch_robots_txt(&origin).await? {
        RobotsResponse::Success(body) => Ok(read_robots_txt(body, origin).await?),
        RobotsResponse::Unavailable => {
            info!("No robots.txt for {}, allowing all paths", origin);
            Ok(RobotsTxt::allow_all(origin))
        }
        RobotsResponse::Unreachable => {
            info!("robots.txt for {} is unreachable, disallowing all paths", origin);
            Ok(RobotsTxt::deny_all(origin))
        }
    }
}
