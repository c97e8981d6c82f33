use super::rules::{RuleChecker, UrlRule};
use super::token::ProductToken;
use crate::client::RobotClient;
use crate::sitemap::{resolve_sitemaps, SitemapOptions, UrlSetItem};
use crate::url::default_sitemap_url;
use crate::SitemapError;
use futures::Stream;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use url::Url;

/// A parsed robots.txt policy for one site
///
/// Built once per document and immutable afterwards. Identities that were
/// declared in a `User-agent:` line are tracked even when their group has no
/// rules, so "declared with zero rules" and "never mentioned" stay distinct.
#[derive(Debug, Clone)]
pub struct RobotsTxt {
    base_address: Url,
    rules: HashMap<ProductToken, Arc<HashSet<UrlRule>>>,
    crawl_delays: HashMap<ProductToken, u32>,
    host: Option<String>,
    sitemaps: Vec<Url>,
}

impl RobotsTxt {
    pub(crate) fn from_parts(
        base_address: Url,
        rules: HashMap<ProductToken, HashSet<UrlRule>>,
        crawl_delays: HashMap<ProductToken, u32>,
        host: Option<String>,
        sitemaps: Vec<Url>,
    ) -> Self {
        Self {
            base_address,
            rules: rules
                .into_iter()
                .map(|(agent, rules)| (agent, Arc::new(rules)))
                .collect(),
            crawl_delays,
            host,
            sitemaps,
        }
    }

    /// Policy used when the site has no robots.txt (4xx): everything is allowed
    pub fn allow_all(base_address: Url) -> Self {
        Self::from_parts(base_address, HashMap::new(), HashMap::new(), None, Vec::new())
    }

    /// Policy used when robots.txt is unreachable (5xx): a wildcard `Disallow: /`
    pub fn deny_all(base_address: Url) -> Self {
        let mut rules = HashMap::new();
        rules.insert(
            ProductToken::wildcard(),
            HashSet::from([UrlRule::disallow("/")]),
        );
        Self::from_parts(base_address, rules, HashMap::new(), None, Vec::new())
    }

    /// The origin this policy was loaded for
    pub fn base_address(&self) -> &Url {
        &self.base_address
    }

    /// Every identity named in the document, with or without rules
    pub fn user_agents(&self) -> HashSet<&ProductToken> {
        self.rules.keys().chain(self.crawl_delays.keys()).collect()
    }

    fn knows(&self, user_agent: &ProductToken) -> bool {
        self.rules.contains_key(user_agent) || self.crawl_delays.contains_key(user_agent)
    }

    /// Returns the rule checker that applies to `user_agent`
    ///
    /// The identity's own group is used if it was declared, otherwise the
    /// wildcard group. `None` means no group applies; [`RobotsTxt::is_allowed`]
    /// treats that as "allow everything".
    pub fn rules_for(&self, user_agent: &ProductToken) -> Option<RuleChecker> {
        self.rules
            .get(user_agent)
            .or_else(|| self.rules.get(&ProductToken::wildcard()))
            .map(|rules| RuleChecker::new(Arc::clone(rules)))
    }

    /// Checks if `user_agent` may access `path`
    ///
    /// # Arguments
    ///
    /// * `user_agent` - The crawler identity
    /// * `path` - The request path, including any query (see [`crate::url::request_path`])
    pub fn is_allowed(&self, user_agent: &ProductToken, path: &str) -> bool {
        self.rules_for(user_agent)
            .unwrap_or_default()
            .is_allowed(path)
    }

    /// Returns the crawl delay in seconds that applies to `user_agent`
    ///
    /// An identity that appears anywhere in the document never inherits the
    /// wildcard delay; only identities the document never mentions do.
    pub fn crawl_delay(&self, user_agent: &ProductToken) -> Option<u32> {
        if let Some(delay) = self.crawl_delays.get(user_agent) {
            return Some(*delay);
        }
        if self.knows(user_agent) {
            return None;
        }
        self.crawl_delays.get(&ProductToken::wildcard()).copied()
    }

    /// The host declared by a `Host:` directive, if any
    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    /// The declared host, or the host of the origin the document came from
    pub fn host_or_default(&self) -> &str {
        self.host
            .as_deref()
            .or_else(|| self.base_address.host_str())
            .unwrap_or_default()
    }

    /// Sitemap locations declared with `Sitemap:` directives, in document order
    pub fn declared_sitemaps(&self) -> &[Url] {
        &self.sitemaps
    }

    /// Sitemap locations to resolve: the declared ones, or `<origin>/sitemap.xml`
    pub fn sitemap_urls(&self) -> Vec<Url> {
        if !self.sitemaps.is_empty() {
            return self.sitemaps.clone();
        }
        default_sitemap_url(&self.base_address).into_iter().collect()
    }

    /// Lazily resolves every URL listed by the site's sitemaps
    ///
    /// Sitemap indexes are followed recursively. The returned stream fetches
    /// documents only as it is polled; dropping it (or cancelling
    /// `options.cancellation`) stops all further requests.
    pub fn load_sitemap<'a, C>(
        &self,
        client: &'a C,
        options: SitemapOptions,
    ) -> impl Stream<Item = Result<UrlSetItem, SitemapError>> + 'a
    where
        C: RobotClient + ?Sized,
    {
        resolve_sitemaps(client, self.sitemap_urls(), options)
    }
}
