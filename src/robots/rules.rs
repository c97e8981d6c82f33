use crate::url::{UrlPath, UrlPathPattern};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;

/// Robots.txt rule type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleType {
    Allow,
    Disallow,
}

/// A robots.txt rule for a URL path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UrlRule {
    pub rule_type: RuleType,
    pub pattern: UrlPathPattern,
}

impl UrlRule {
    /// Creates a rule from its type and pattern text
    pub fn new(rule_type: RuleType, pattern: &str) -> Self {
        Self {
            rule_type,
            pattern: UrlPathPattern::new(pattern),
        }
    }

    /// Creates an `Allow:` rule
    pub fn allow(pattern: &str) -> Self {
        Self::new(RuleType::Allow, pattern)
    }

    /// Creates a `Disallow:` rule
    pub fn disallow(pattern: &str) -> Self {
        Self::new(RuleType::Disallow, pattern)
    }

    /// Precedence between two matching rules: longer pattern first, then Allow over Disallow
    fn precedence(&self, other: &Self) -> Ordering {
        self.pattern
            .len()
            .cmp(&other.pattern.len())
            .then_with(|| match (self.rule_type, other.rule_type) {
                (RuleType::Allow, RuleType::Disallow) => Ordering::Greater,
                (RuleType::Disallow, RuleType::Allow) => Ordering::Less,
                _ => Ordering::Equal,
            })
    }
}

/// Checks paths against the rule set of one crawler identity
///
/// The rule set is shared with the [`crate::RobotsTxt`] it came from, so
/// checkers are cheap to hand out.
#[derive(Debug, Clone, Default)]
pub struct RuleChecker {
    rules: Arc<HashSet<UrlRule>>,
}

impl RuleChecker {
    /// Creates a rule checker over a set of rules
    pub fn new(rules: Arc<HashSet<UrlRule>>) -> Self {
        Self { rules }
    }

    /// A checker with no rules, which allows every path
    pub fn allow_all() -> Self {
        Self::default()
    }

    /// The rules this checker evaluates
    pub fn rules(&self) -> &HashSet<UrlRule> {
        &self.rules
    }

    /// Checks if the crawler may access `path`
    ///
    /// # Precedence
    ///
    /// 1. `/robots.txt` and an empty rule set are always allowed
    /// 2. Of the rules whose pattern matches, the longest pattern wins
    /// 3. On equal length, `Allow` wins over `Disallow`
    /// 4. No matching rule means the path is allowed
    ///
    /// The result does not depend on the order rules were declared in.
    pub fn is_allowed(&self, path: &str) -> bool {
        if self.rules.is_empty() || path == "/robots.txt" {
            return true;
        }

        let path = UrlPath::new(path);
        self.rules
            .iter()
            .filter(|rule| rule.pattern.is_match(&path))
            .max_by(|a, b| a.precedence(b))
            .map_or(true, |rule| rule.rule_type == RuleType::Allow)
    }
}
