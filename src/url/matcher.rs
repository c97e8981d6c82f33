use crate::url::normalize::normalize_path;
use std::fmt;

/// A robots.txt path pattern
///
/// Patterns support two special characters:
/// 1. `*` matches any sequence of characters, including none
/// 2. A trailing `$` anchors the pattern to the end of the path
///
/// Without an anchor the pattern matches any path it is a prefix of, so a
/// rule for `/admin` also covers `/admin/users`. Percent-escapes are
/// normalised at construction (see [`normalize_path`]).
///
/// # Examples
///
/// ```
/// use sumi_robots::url::{UrlPath, UrlPathPattern};
///
/// let pattern = UrlPathPattern::new("/private/*.html$");
/// assert!(pattern.is_match(&UrlPath::new("/private/docs/index.html")));
/// assert!(!pattern.is_match(&UrlPath::new("/private/docs/index.html?q=1")));
///
/// let prefix = UrlPathPattern::new("/admin");
/// assert!(prefix.is_match(&UrlPath::new("/admin/users")));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UrlPathPattern {
    raw: String,
    segments: Vec<String>,
    match_sub_paths: bool,
    length: usize,
}

impl UrlPathPattern {
    /// Builds a pattern from its robots.txt text
    pub fn new(value: &str) -> Self {
        let (body, match_sub_paths) = match value.strip_suffix('$') {
            Some(body) => (body, false),
            None => (value, true),
        };

        Self {
            raw: value.to_string(),
            segments: body.split('*').map(normalize_path).collect(),
            match_sub_paths,
            length: value.chars().count(),
        }
    }

    /// Length used for precedence: the longer pattern is the more specific rule
    pub fn len(&self) -> usize {
        self.length
    }

    /// Returns true for the empty pattern, which never matches anything
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// The pattern as written in the document
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Checks whether `path` matches the pattern
    ///
    /// The path must start with the first literal segment. Each following
    /// segment is searched for from where the previous one ended, so any
    /// content may sit between them. An anchored pattern additionally needs
    /// that search to stop exactly at the end of the path: `/*.php$` matches
    /// `/index.php` but not `/a.php.php`, where `.php` is first found mid-path.
    pub fn is_match(&self, path: &UrlPath) -> bool {
        if self.is_empty() {
            return false;
        }

        let value = path.as_str();
        let Some((first, rest)) = self.segments.split_first() else {
            return false;
        };
        if !value.starts_with(first.as_str()) {
            return false;
        }

        let mut cursor = first.len();
        for segment in rest {
            match value[cursor..].find(segment.as_str()) {
                Some(offset) => cursor += offset + segment.len(),
                None => return false,
            }
        }

        // `*$` leaves the tail unconstrained
        let open_tail = rest.last().is_some_and(|last| last.is_empty());
        self.match_sub_paths || open_tail || cursor == value.len()
    }
}

impl fmt::Display for UrlPathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// A request path, normalised the same way as [`UrlPathPattern`]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UrlPath(String);

impl UrlPath {
    /// Normalises a request path (path plus optional query)
    pub fn new(path: &str) -> Self {
        Self(normalize_path(path))
    }

    /// The normalised path
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length of the normalised path in bytes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true for an empty path
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
