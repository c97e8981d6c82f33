//! Robots.txt handling module
//!
//! This module parses robots.txt documents into [`RobotsTxt`] policies and
//! evaluates their allow/disallow rules for a crawler identity.

mod parser;
mod policy;
mod rules;
mod token;

pub use parser::read_robots_txt;
pub use policy::RobotsTxt;
pub use rules::{RuleChecker, RuleType, UrlRule};
pub use token::ProductToken;

use url::Url;

/// Checks if a URL is allowed by robots.txt
///
/// # Arguments
///
/// * `robots` - The parsed robots.txt policy
/// * `url` - The absolute URL to check; only its path and query are matched
/// * `user_agent` - The crawler identity
///
/// # Returns
///
/// * `true` - If the URL is allowed
/// * `false` - If the URL is disallowed
pub fn is_allowed(robots: &RobotsTxt, url: &Url, user_agent: &ProductToken) -> bool {
    robots.is_allowed(user_agent, &crate::url::request_path(url))
}
