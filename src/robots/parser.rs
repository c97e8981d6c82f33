//! Robots.txt directive parser
//!
//! Reads a robots.txt document line by line through a [`BoundedReader`] and
//! builds the per-identity tables behind a [`RobotsTxt`] policy. Lines that
//! cannot be interpreted are skipped; only the ingestion ceiling and I/O
//! failures of the stream produce an error.

use super::policy::RobotsTxt;
use super::rules::{RuleType, UrlRule};
use super::token::ProductToken;
use crate::limits::{BoundedReader, ROBOTS_TXT_MAX_BYTES};
use crate::url::parse_host_directive;
use crate::RobotsTxtError;
use std::collections::{HashMap, HashSet};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tracing::debug;
use url::Url;

const USER_AGENT_DIRECTIVE: &str = "User-agent:";
const CRAWL_DELAY_DIRECTIVE: &str = "Crawl-delay:";
const HOST_DIRECTIVE: &str = "Host:";
const SITEMAP_DIRECTIVE: &str = "Sitemap:";
const ALLOW_DIRECTIVE: &str = "Allow:";
const DISALLOW_DIRECTIVE: &str = "Disallow:";

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Parses a robots.txt document into a [`RobotsTxt`] policy
///
/// # Arguments
///
/// * `reader` - The document body; at most 500 KiB are read from it
/// * `base_address` - The origin the document was served from
///
/// # Returns
///
/// * `Ok(RobotsTxt)` - The parsed policy (an empty document allows everything)
/// * `Err(RobotsTxtError::ResourceLimitExceeded)` - The document is larger than the ceiling
/// * `Err(RobotsTxtError::Io)` - The stream failed
pub async fn read_robots_txt<R>(reader: R, base_address: Url) -> Result<RobotsTxt, RobotsTxtError>
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(BoundedReader::new(reader, ROBOTS_TXT_MAX_BYTES));
    let mut accumulator = DirectiveAccumulator::default();
    let mut buf = Vec::new();
    let mut first_line = true;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }

        let text = String::from_utf8_lossy(&buf);
        let mut line = text.trim_end_matches(['\r', '\n']);
        if first_line {
            line = line.strip_prefix(BYTE_ORDER_MARK).unwrap_or(line);
            first_line = false;
        }
        accumulator.process_line(line);
    }

    let robots = accumulator.finish(base_address);
    debug!(
        "Parsed robots.txt for {}: {} user agents, {} sitemaps, host: {:?}",
        robots.base_address(),
        robots.user_agents().len(),
        robots.declared_sitemaps().len(),
        robots.host()
    );
    Ok(robots)
}

/// Mutable state of a single parse
#[derive(Debug, Default)]
struct DirectiveAccumulator {
    current_agents: HashSet<ProductToken>,
    previous_line_was_user_agent: bool,
    rules: HashMap<ProductToken, HashSet<UrlRule>>,
    crawl_delays: HashMap<ProductToken, u32>,
    host: Option<String>,
    sitemaps: Vec<Url>,
}

impl DirectiveAccumulator {
    fn process_line(&mut self, line: &str) {
        let line = line.trim_start();

        // Comments sit between User-agent lines without splitting the group
        if line.starts_with('#') {
            return;
        }

        if let Some(value) = directive_value(line, USER_AGENT_DIRECTIVE) {
            if value.is_empty() {
                self.previous_line_was_user_agent = false;
                return;
            }
            if !self.previous_line_was_user_agent {
                self.current_agents.clear();
            }
            let agent = ProductToken::from_directive(value);
            self.rules.entry(agent.clone()).or_default();
            self.current_agents.insert(agent);
            self.previous_line_was_user_agent = true;
            return;
        }

        if self.current_agents.is_empty() {
            self.process_global_directive(line);
        } else {
            self.process_group_directive(line);
        }
        self.previous_line_was_user_agent = false;
    }

    /// Directives that are only honoured outside of a group
    fn process_global_directive(&mut self, line: &str) {
        if let Some(value) = directive_value(line, SITEMAP_DIRECTIVE) {
            if let Ok(location) = Url::parse(value) {
                if !self.sitemaps.contains(&location) {
                    self.sitemaps.push(location);
                }
            }
        } else if self.host.is_none() {
            if let Some(value) = host_directive_value(line) {
                self.host = parse_host_directive(value);
            }
        }
    }

    fn process_group_directive(&mut self, line: &str) {
        if let Some(value) = directive_value(line, DISALLOW_DIRECTIVE) {
            self.add_rule(UrlRule::new(RuleType::Disallow, value));
        } else if let Some(value) = directive_value(line, ALLOW_DIRECTIVE) {
            self.add_rule(UrlRule::new(RuleType::Allow, value));
        } else if let Some(value) = directive_value(line, CRAWL_DELAY_DIRECTIVE) {
            if let Ok(delay) = value.parse::<u32>() {
                for agent in &self.current_agents {
                    self.crawl_delays.insert(agent.clone(), delay);
                }
            }
        }
    }

    fn add_rule(&mut self, rule: UrlRule) {
        for agent in &self.current_agents {
            self.rules.entry(agent.clone()).or_default().insert(rule.clone());
        }
    }

    fn finish(self, base_address: Url) -> RobotsTxt {
        RobotsTxt::from_parts(
            base_address,
            self.rules,
            self.crawl_delays,
            self.host,
            self.sitemaps,
        )
    }
}

/// Returns the value of `directive` on `line`, up to the first space or tab
fn directive_value<'a>(line: &'a str, directive: &str) -> Option<&'a str> {
    line.strip_prefix(directive).map(first_word)
}

fn host_directive_value(line: &str) -> Option<&str> {
    let prefix = line.get(..HOST_DIRECTIVE.len())?;
    if prefix.eq_ignore_ascii_case(HOST_DIRECTIVE) {
        Some(first_word(&line[HOST_DIRECTIVE.len()..]))
    } else {
        None
    }
}

fn first_word(value: &str) -> &str {
    let value = value.trim_start_matches([' ', '\t']);
    let end = value.find([' ', '\t']).unwrap_or(value.len());
    &value[..end]
}
