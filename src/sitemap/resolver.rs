use super::{read_text_sitemap, read_xml_sitemap, Sitemap, SitemapFormat, SitemapOptions, UrlSetItem};
use crate::client::RobotClient;
use crate::SitemapError;
use async_stream::try_stream;
use futures::{pin_mut, Stream, StreamExt};
use std::collections::HashSet;
use tracing::{debug, trace, warn};
use url::Url;

/// Resolves sitemaps into a lazy stream of page entries
///
/// `roots` are processed in order; sitemap indexes are expanded depth-first,
/// their children resolved before the next root. Each location is fetched at
/// most once per call and entries are yielded once, so index cycles and
/// duplicate listings terminate.
///
/// # Failure handling
///
/// * A location the client cannot fetch contributes nothing and is logged
/// * A document that fails to parse ends the stream with that error
/// * Indexes nested deeper than `options.max_depth` are not followed
/// * At most `options.max_sitemaps` documents are fetched
///
/// Nothing is fetched until the stream is polled. Dropping the stream or
/// cancelling `options.cancellation` abandons any in-flight request, including
/// a document body that is still being read.
pub fn resolve_sitemaps<'a, C>(
    client: &'a C,
    roots: Vec<Url>,
    options: SitemapOptions,
) -> impl Stream<Item = Result<UrlSetItem, SitemapError>> + 'a
where
    C: RobotClient + ?Sized,
{
    let SitemapOptions {
        modified_since,
        max_depth,
        max_sitemaps,
        location_filter,
        cancellation,
    } = options;

    try_stream! {
        let mut pending: Vec<(Url, usize)> = roots.into_iter().rev().map(|root| (root, 0)).collect();
        let mut visited: HashSet<Url> = HashSet::new();
        let mut seen: HashSet<UrlSetItem> = HashSet::new();
        let mut fetched = 0usize;

        while let Some((location, depth)) = pending.pop() {
            if cancellation.is_cancelled() {
                debug!("Sitemap resolution cancelled");
                break;
            }
            if !visited.insert(location.clone()) {
                warn!("Sitemap {} already visited, skipping", location);
                continue;
            }
            if let Some(filter) = &location_filter {
                if !filter(&location) {
                    debug!("Sitemap {} rejected by location filter", location);
                    continue;
                }
            }
            if fetched >= max_sitemaps {
                warn!("Reached limit of {} sitemaps, stopping resolution", max_sitemaps);
                break;
            }
            fetched += 1;

            trace!("Fetching sitemap {} (depth {})", location, depth);
            let outcome = tokio::select! {
                _ = cancellation.cancelled() => None,
                result = client.fetch_sitemap(&location) => Some(result),
            };
            let Some(result) = outcome else {
                debug!("Sitemap resolution cancelled while fetching {}", location);
                break;
            };

            let document = match result {
                Ok(Some(document)) => document,
                Ok(None) => {
                    warn!("Sitemap {} is unavailable, skipping", location);
                    continue;
                }
                Err(e) => {
                    warn!("Failed to fetch sitemap {}: {}", location, e);
                    continue;
                }
            };

            match SitemapFormat::from_content_type(document.content_type.as_deref()) {
                SitemapFormat::Text => {
                    let items = read_text_sitemap(document.body);
                    pin_mut!(items);
                    loop {
                        let next = tokio::select! {
                            _ = cancellation.cancelled() => None,
                            next = items.next() => Some(next),
                        };
                        let Some(next) = next else {
                            debug!("Sitemap resolution cancelled while reading {}", location);
                            break;
                        };
                        let Some(item) = next else {
                            break;
                        };
                        let item = item?;
                        if seen.insert(item.clone()) {
                            yield item;
                        }
                    }
                }
                SitemapFormat::Xml => {
                    let parsed = tokio::select! {
                        _ = cancellation.cancelled() => None,
                        parsed = read_xml_sitemap(document.body, modified_since) => Some(parsed),
                    };
                    let Some(parsed) = parsed else {
                        debug!("Sitemap resolution cancelled while reading {}", location);
                        break;
                    };
                    match parsed? {
                        Sitemap::UrlSet(items) => {
                            debug!("Sitemap {} lists {} URLs", location, items.len());
                            for item in items {
                                if seen.insert(item.clone()) {
                                    yield item;
                                }
                            }
                        }
                        Sitemap::Index(children) => {
                            debug!("Sitemap index {} lists {} sitemaps", location, children.len());
                            if depth >= max_depth {
                                warn!(
                                    "Sitemap index {} exceeds maximum depth of {}, not following",
                                    location, max_depth
                                );
                                continue;
                            }
                            for child in children.into_iter().rev() {
                                pending.push((child.location, depth + 1));
                            }
                        }
                    }
                }
            }
        }
    }
}
