use crate::UrlError;
use url::{Host, Url};

/// Extracts the origin (`scheme://host[:port]/`) of an HTTP(S) URL
///
/// # Arguments
///
/// * `url` - Any URL on the site
///
/// # Returns
///
/// * `Ok(Url)` - The site's base address with an empty path
/// * `Err(UrlError)` - The URL is not HTTP(S) or has no host
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sumi_robots::url::origin_of;
///
/// let url = Url::parse("https://Example.com:8443/a/b?c=d#e").unwrap();
/// assert_eq!(origin_of(&url).unwrap().as_str(), "https://example.com:8443/");
/// ```
pub fn origin_of(url: &Url) -> Result<Url, UrlError> {
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }
    if url.host_str().is_none() {
        return Err(UrlError::MissingHost);
    }

    let mut origin = url.clone();
    origin.set_path("/");
    origin.set_query(None);
    origin.set_fragment(None);
    // Credentials never belong to the origin; setting them cannot fail on a URL with a host
    let _ = origin.set_username("");
    let _ = origin.set_password(None);
    Ok(origin)
}

/// The conventional sitemap location for a site: `<origin>/sitemap.xml`
pub fn default_sitemap_url(base_address: &Url) -> Option<Url> {
    base_address.join("/sitemap.xml").ok()
}

/// Returns the path and query of a URL, the form robots.txt rules match against
///
/// ```
/// use url::Url;
/// use sumi_robots::url::request_path;
///
/// let url = Url::parse("https://example.com/search?q=rust#top").unwrap();
/// assert_eq!(request_path(&url), "/search?q=rust");
/// ```
pub fn request_path(url: &Url) -> String {
    match url.query() {
        Some(query) => format!("{}?{}", url.path(), query),
        None => url.path().to_string(),
    }
}

/// Interprets the value of a `Host:` directive
///
/// Accepts a bare host name or IP address, or a fully-qualified URL whose
/// host portion is taken. Anything else (paths, ports, stray characters)
/// yields `None`.
pub fn parse_host_directive(value: &str) -> Option<String> {
    if value.contains("://") {
        let url = Url::parse(value).ok()?;
        return url.host_str().map(str::to_string);
    }

    match Host::parse(value).ok()? {
        Host::Domain(_) if is_dns_name(value) => Some(value.to_string()),
        Host::Domain(_) => None,
        Host::Ipv4(_) | Host::Ipv6(_) => Some(value.to_string()),
    }
}

fn is_dns_name(value: &str) -> bool {
    let name = value.strip_suffix('.').unwrap_or(value);
    !name.is_empty()
        && name.len() <= 253
        && name.split('.').all(|label| {
            !label.is_empty()
                && label.len() <= 63
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label
                    .chars()
                    .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
        })
}
