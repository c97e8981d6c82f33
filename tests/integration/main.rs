//! Integration tests for robots.txt and sitemap loading
//!
//! These tests use wiremock to create mock HTTP servers and exercise the
//! HTTP transport, the robots.txt parser and the sitemap resolver end-to-end.

mod robots_tests;
mod sitemap_tests;

use sumi_robots::config::{ClientConfig, Config, SitemapConfig, UserAgentConfig};
use sumi_robots::RobotWebClient;
use wiremock::MockServer;

pub const USER_AGENT: &str = "TestBot/1.0.0 (+https://example.com/contact; test@example.com)";

/// Creates a test configuration for the `TestBot` crawler
pub fn create_test_config() -> Config {
    Config {
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
            contact_email: "test@example.com".to_string(),
        },
        client: ClientConfig::default(),
        sitemap: SitemapConfig::default(),
    }
}

pub fn create_test_client() -> RobotWebClient {
    RobotWebClient::new(&create_test_config()).expect("Failed to build client")
}

/// Parses a path on the mock server into an absolute URL
pub fn server_url(server: &MockServer, path: &str) -> url::Url {
    url::Url::parse(&format!("{}{}", server.uri(), path)).expect("Failed to parse mock URL")
}
