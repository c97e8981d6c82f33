//! sitemaps.org XML parser
//!
//! Streams the document through quick-xml's namespace-aware reader. Only
//! elements in the sitemaps.org namespace are recognised; anything else
//! (extensions such as image or news sitemaps) is skipped.

use super::{parse_last_modified, passes_filter, Sitemap, SitemapIndexRef, UrlSetItem};
use crate::limits::{limit_exceeded, BoundedReader, SITEMAP_MAX_BYTES};
use crate::SitemapError;
use chrono::{DateTime, Utc};
use quick_xml::events::Event;
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::NsReader;
use rust_decimal::Decimal;
use std::str::FromStr;
use tokio::io::{AsyncRead, BufReader};
use url::Url;

const SITEMAP_NAMESPACE: &[u8] = b"http://www.sitemaps.org/schemas/sitemap/0.9";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RootKind {
    UrlSet,
    Index,
}

impl RootKind {
    fn from_name(name: &[u8]) -> Option<Self> {
        match name {
            b"urlset" => Some(RootKind::UrlSet),
            b"sitemapindex" => Some(RootKind::Index),
            _ => None,
        }
    }

    fn entry_name(self) -> &'static [u8] {
        match self {
            RootKind::UrlSet => b"url",
            RootKind::Index => b"sitemap",
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Field {
    Location,
    LastModified,
    ChangeFrequency,
    Priority,
}

impl Field {
    fn from_name(name: &[u8]) -> Option<Self> {
        match name {
            b"loc" => Some(Field::Location),
            b"lastmod" => Some(Field::LastModified),
            b"changefreq" => Some(Field::ChangeFrequency),
            b"priority" => Some(Field::Priority),
            _ => None,
        }
    }
}

/// Raw text of one `<url>` or `<sitemap>` entry
#[derive(Debug, Default)]
struct RawEntry {
    location: Option<String>,
    last_modified: Option<String>,
    change_frequency: Option<String>,
    priority: Option<String>,
}

impl RawEntry {
    fn set(&mut self, field: Field, value: String) {
        let slot = match field {
            Field::Location => &mut self.location,
            Field::LastModified => &mut self.last_modified,
            Field::ChangeFrequency => &mut self.change_frequency,
            Field::Priority => &mut self.priority,
        };
        *slot = Some(value);
    }

    fn last_modified(&self) -> Result<Option<DateTime<Utc>>, SitemapError> {
        self.last_modified
            .as_deref()
            .map(parse_last_modified)
            .transpose()
    }

    fn location(&self) -> Result<Url, SitemapError> {
        let value = self.location.as_deref().ok_or(SitemapError::MissingLocation)?;
        Url::parse(value).map_err(|source| SitemapError::InvalidLocation {
            value: value.to_string(),
            source,
        })
    }

    fn into_url_set_item(
        self,
        modified_since: Option<DateTime<Utc>>,
    ) -> Result<Option<UrlSetItem>, SitemapError> {
        let last_modified = self.last_modified()?;
        if !passes_filter(last_modified, modified_since) {
            return Ok(None);
        }

        let location = self.location()?;
        let change_frequency = self
            .change_frequency
            .as_deref()
            .map(str::parse)
            .transpose()?;
        let priority = self
            .priority
            .as_deref()
            .map(|value| {
                Decimal::from_str(value).map_err(|source| SitemapError::InvalidPriority {
                    value: value.to_string(),
                    source,
                })
            })
            .transpose()?;

        Ok(Some(UrlSetItem {
            location,
            last_modified,
            change_frequency,
            priority,
        }))
    }

    fn into_index_ref(
        self,
        modified_since: Option<DateTime<Utc>>,
    ) -> Result<Option<SitemapIndexRef>, SitemapError> {
        let last_modified = self.last_modified()?;
        if !passes_filter(last_modified, modified_since) {
            return Ok(None);
        }

        Ok(Some(SitemapIndexRef {
            location: self.location()?,
            last_modified,
        }))
    }
}

/// Parses a sitemaps.org XML document
///
/// # Arguments
///
/// * `reader` - The document body; at most 50 MiB are read from it
/// * `modified_since` - Drop entries dated strictly before this instant
///
/// # Returns
///
/// * `Ok(Sitemap::UrlSet)` - A `<urlset>` document's page entries
/// * `Ok(Sitemap::Index)` - A `<sitemapindex>` document's child sitemaps
/// * `Err(SitemapError)` - Unrecognised root, a malformed field, malformed XML, or the ceiling was passed
pub async fn read_xml_sitemap<R>(
    reader: R,
    modified_since: Option<DateTime<Utc>>,
) -> Result<Sitemap, SitemapError>
where
    R: AsyncRead + Unpin,
{
    let mut reader = NsReader::from_reader(BufReader::new(BoundedReader::new(
        reader,
        SITEMAP_MAX_BYTES,
    )));
    reader.config_mut().trim_text(true);

    let mut root: Option<RootKind> = None;
    let mut depth = 0usize;
    let mut entry: Option<RawEntry> = None;
    let mut field: Option<Field> = None;
    let mut text = String::new();
    let mut items = Vec::new();
    let mut children = Vec::new();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        let (namespace, event) = reader
            .read_resolved_event_into_async(&mut buf)
            .await
            .map_err(xml_error)?;
        let in_sitemap_namespace =
            matches!(namespace, ResolveResult::Bound(Namespace(ns)) if ns == SITEMAP_NAMESPACE);

        match event {
            Event::Start(ref element) | Event::Empty(ref element) => {
                let is_empty = matches!(event, Event::Empty(_));
                let name = element.local_name();

                match (depth, root) {
                    (0, _) => {
                        root = RootKind::from_name(name.as_ref())
                            .filter(|_| in_sitemap_namespace);
                        if root.is_none() {
                            return Err(SitemapError::MissingRoot);
                        }
                    }
                    (1, Some(kind)) if in_sitemap_namespace && name.as_ref() == kind.entry_name() => {
                        entry = Some(RawEntry::default());
                    }
                    (2, _) if entry.is_some() && in_sitemap_namespace => {
                        field = Field::from_name(name.as_ref());
                        text.clear();
                    }
                    _ => {}
                }

                if is_empty {
                    close_element(
                        depth + 1,
                        root,
                        &mut entry,
                        &mut field,
                        &mut text,
                        modified_since,
                        &mut items,
                        &mut children,
                    )?;
                } else {
                    depth += 1;
                }
            }
            Event::Text(ref content) if field.is_some() => {
                text.push_str(&content.unescape().map_err(xml_error)?);
            }
            Event::CData(content) if field.is_some() => {
                text.push_str(&String::from_utf8_lossy(&content.into_inner()));
            }
            Event::End(_) => {
                close_element(
                    depth,
                    root,
                    &mut entry,
                    &mut field,
                    &mut text,
                    modified_since,
                    &mut items,
                    &mut children,
                )?;
                depth = depth.saturating_sub(1);
            }
            Event::Eof if depth != 0 => {
                return Err(SitemapError::Xml("unexpected end of document".to_string()));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    match root {
        Some(RootKind::UrlSet) => Ok(Sitemap::UrlSet(items)),
        Some(RootKind::Index) => Ok(Sitemap::Index(children)),
        None => Err(SitemapError::MissingRoot),
    }
}

/// Handles the end of an element opened at `depth` (root is depth 1)
#[allow(clippy::too_many_arguments)]
fn close_element(
    depth: usize,
    root: Option<RootKind>,
    entry: &mut Option<RawEntry>,
    field: &mut Option<Field>,
    text: &mut String,
    modified_since: Option<DateTime<Utc>>,
    items: &mut Vec<UrlSetItem>,
    children: &mut Vec<SitemapIndexRef>,
) -> Result<(), SitemapError> {
    match depth {
        3 => {
            if let (Some(current), Some(raw)) = (field.take(), entry.as_mut()) {
                raw.set(current, text.trim().to_string());
            }
            text.clear();
        }
        2 => {
            if let Some(raw) = entry.take() {
                match root {
                    Some(RootKind::UrlSet) => items.extend(raw.into_url_set_item(modified_since)?),
                    Some(RootKind::Index) => children.extend(raw.into_index_ref(modified_since)?),
                    None => {}
                }
            }
        }
        _ => {}
    }
    Ok(())
}

fn xml_error(err: quick_xml::Error) -> SitemapError {
    match err {
        quick_xml::Error::Io(io) => match limit_exceeded(&io) {
            Some(limit) => SitemapError::ResourceLimitExceeded { limit },
            None => SitemapError::Io(std::io::Error::new(io.kind(), io.to_string())),
        },
        other => SitemapError::Xml(other.to_string()),
    }
}
