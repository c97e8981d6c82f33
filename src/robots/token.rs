use crate::UrlError;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// A crawler identity (the product token of a `User-agent:` line)
///
/// Crawlers must find their group with case-insensitive matching, so two
/// tokens are equal whenever their lower-cased forms are. The original
/// spelling is kept for display.
#[derive(Debug, Clone)]
pub struct ProductToken {
    value: String,
    normalized: String,
}

impl ProductToken {
    /// Token of the wildcard group, which applies to any crawler not named elsewhere
    pub const WILDCARD: &'static str = "*";

    /// Parses a crawler identity supplied by the caller
    ///
    /// Valid tokens are exactly `*`, or a non-empty run of ASCII letters,
    /// digits, `_` and `-`.
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_robots::ProductToken;
    ///
    /// let token = ProductToken::parse("SumiBot").unwrap();
    /// assert_eq!(token, ProductToken::parse("sumibot").unwrap());
    /// assert!(ProductToken::parse("Sumi Bot/1.0").is_err());
    /// ```
    pub fn parse(value: &str) -> Result<Self, UrlError> {
        let valid = value == Self::WILDCARD
            || (!value.is_empty()
                && value
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-'));

        if !valid {
            return Err(UrlError::InvalidProductToken(value.to_string()));
        }
        Ok(Self::from_directive(value))
    }

    /// The wildcard identity `*`
    pub fn wildcard() -> Self {
        Self::from_directive(Self::WILDCARD)
    }

    /// Builds a token from a robots.txt `User-agent:` value without validation
    pub(crate) fn from_directive(value: &str) -> Self {
        Self {
            value: value.to_string(),
            normalized: value.to_lowercase(),
        }
    }

    /// Returns true for the wildcard identity
    pub fn is_wildcard(&self) -> bool {
        self.normalized == Self::WILDCARD
    }

    /// The token as originally written
    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl PartialEq for ProductToken {
    fn eq(&self, other: &Self) -> bool {
        self.normalized == other.normalized
    }
}

impl Eq for ProductToken {}

impl Hash for ProductToken {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.normalized.hash(state);
    }
}

impl FromStr for ProductToken {
    type Err = UrlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ProductToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}
