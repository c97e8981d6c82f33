//! Sumi-Robots main entry point
//!
//! This is the command-line interface for checking a site's robots.txt
//! policy and listing the URLs its sitemaps publish.

use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::Parser;
use futures::{pin_mut, StreamExt};
use std::path::PathBuf;
use sumi_robots::config::{load_config, Config};
use sumi_robots::robots::is_allowed;
use sumi_robots::sitemap::parse_last_modified;
use sumi_robots::url::request_path;
use sumi_robots::{ProductToken, RobotWebClient, RobotsTxt};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;
use url::Url;

/// Sumi-Robots: robots.txt and sitemap inspector
///
/// Fetches a site's robots.txt, reports the host and crawl delay that apply
/// to the configured crawler, checks paths against its rules, and
/// optionally lists every URL published by the site's sitemaps.
#[derive(Parser, Debug)]
#[command(name = "sumi-robots")]
#[command(version)]
#[command(about = "Inspect robots.txt policies and sitemaps", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Any URL on the site to inspect
    #[arg(value_name = "URL")]
    url: Url,

    /// Path to check against the rules (defaults to the URL's own path)
    #[arg(long = "path", value_name = "PATH")]
    paths: Vec<String>,

    /// List the URLs published by the site's sitemaps
    #[arg(long)]
    sitemap: bool,

    /// Only list sitemap entries modified at or after this date (YYYY-MM-DD or W3C datetime)
    #[arg(long, value_name = "DATE", value_parser = parse_modified_since, requires = "sitemap")]
    modified_since: Option<DateTime<Utc>>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = load_config(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;

    let agent = ProductToken::parse(&config.user_agent.crawler_name)?;
    let client = RobotWebClient::new(&config)?;

    let robots = client
        .load_robots_txt(&cli.url)
        .await
        .with_context(|| format!("Failed to load robots.txt for {}", cli.url))?;

    print_policy(&robots, &agent, &cli);

    if cli.sitemap {
        handle_sitemap(&client, &robots, &config, cli.modified_since).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sumi_robots=info,warn"),
            1 => EnvFilter::new("sumi_robots=debug,info"),
            2 => EnvFilter::new("sumi_robots=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_modified_since(value: &str) -> Result<DateTime<Utc>, String> {
    parse_last_modified(value).map_err(|e| e.to_string())
}

/// Prints host, crawl delay and a verdict per path
fn print_policy(robots: &RobotsTxt, agent: &ProductToken, cli: &Cli) {
    println!("=== robots.txt for {} ===\n", robots.base_address());
    println!("User agent: {}", agent);

    match robots.host() {
        Some(host) => println!("Host: {}", host),
        None => println!("Host: {} (not declared)", robots.host_or_default()),
    }

    match robots.crawl_delay(agent) {
        Some(delay) => println!("Crawl delay: {}s", delay),
        None => println!("Crawl delay: none"),
    }

    println!("\nSitemaps:");
    for location in robots.sitemap_urls() {
        println!("  - {}", location);
    }

    println!("\nRules:");
    if cli.paths.is_empty() {
        print_verdict(is_allowed(robots, &cli.url, agent), &request_path(&cli.url));
    }
    for path in &cli.paths {
        print_verdict(robots.is_allowed(agent, path), path);
    }
}

fn print_verdict(allowed: bool, path: &str) {
    let verdict = if allowed { "allowed" } else { "disallowed" };
    println!("  {} {}", verdict, path);
}

/// Handles the --sitemap mode: streams every sitemap URL to stdout
async fn handle_sitemap(
    client: &RobotWebClient,
    robots: &RobotsTxt,
    config: &Config,
    modified_since: Option<DateTime<Utc>>,
) -> anyhow::Result<()> {
    let cancellation = CancellationToken::new();
    let mut options = config.sitemap.to_options().cancellation(cancellation.clone());
    if let Some(since) = modified_since {
        options = options.modified_since(since);
    }

    // Stop fetching on Ctrl-C but still print what was resolved so far
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, stopping sitemap resolution");
            cancellation.cancel();
        }
    });

    println!("\nSitemap URLs:");
    let items = robots.load_sitemap(client, options);
    pin_mut!(items);

    let mut count = 0usize;
    while let Some(item) = items.next().await {
        let item = item.context("Failed to parse sitemap")?;
        println!("{}", item.location);
        count += 1;
    }

    tracing::info!("Resolved {} sitemap URLs", count);
    Ok(())
}
