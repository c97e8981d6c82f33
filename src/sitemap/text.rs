use super::UrlSetItem;
use crate::limits::{BoundedReader, SITEMAP_MAX_BYTES, SITEMAP_MAX_URLS};
use crate::SitemapError;
use async_stream::try_stream;
use futures::Stream;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use url::Url;

/// Parses a plain-text sitemap: one absolute URL per line
///
/// Blank lines are skipped. Text entries carry no modification date, so a
/// `modified_since` filter never drops them. The stream fails on the first
/// line that is not an absolute URL, on invalid UTF-8, once more than 50,000
/// URLs are read, or once the 50 MiB ceiling is passed.
pub fn read_text_sitemap<R>(reader: R) -> impl Stream<Item = Result<UrlSetItem, SitemapError>>
where
    R: AsyncRead + Unpin,
{
    try_stream! {
        let mut lines = BufReader::new(BoundedReader::new(reader, SITEMAP_MAX_BYTES)).lines();
        let mut count = 0usize;
        let mut first_line = true;

        while let Some(line) = lines.next_line().await.map_err(SitemapError::from)? {
            let mut value = line.trim();
            if first_line {
                value = value.trim_start_matches('\u{feff}');
                first_line = false;
            }
            if value.is_empty() {
                continue;
            }

            count += 1;
            if count > SITEMAP_MAX_URLS {
                Err::<(), _>(SitemapError::LineLimitExceeded { limit: SITEMAP_MAX_URLS })?;
            }

            let location = Url::parse(value).map_err(|source| SitemapError::InvalidLocation {
                value: value.to_string(),
                source,
            })?;
            yield UrlSetItem::new(location);
        }
    }
}
