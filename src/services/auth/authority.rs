//! Path → access rule mapping.
//!
//! `match_path` picks the rule for a path without looking at who is asking;
//! `MatchResult::asserts` then evaluates that rule for a principal (or for
//! nobody). The pipeline relies on being able to evaluate the same rule twice.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::principal::Principal;

/// Access rule bound to a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// Anyone, with or without a principal.
    Public,
    /// Any authenticated principal.
    Authenticated,
    /// Principal holding this authority.
    Authority(String),
    /// Principal holding at least one of these authorities.
    AnyAuthority(Vec<String>),
    /// Nobody.
    Deny,
}

impl Rule {
    pub fn asserts<P: Principal>(&self, principal: Option<&P>) -> bool {
        match (self, principal) {
            (Rule::Public, _) => true,
            (Rule::Deny, _) => false,
            (_, None) => false,
            (Rule::Authenticated, Some(_)) => true,
            (Rule::Authority(authority), Some(p)) => p.has_authority(authority),
            (Rule::AnyAuthority(authorities), Some(p)) => {
                authorities.iter().any(|a| p.has_authority(a))
            }
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuleParseError {
    #[error("unknown rule: {0}")]
    UnknownRule(String),
    #[error("rule `{0}` needs at least one authority")]
    MissingAuthority(String),
    #[error("invalid path pattern: {0}")]
    InvalidPattern(String),
    #[error("expected `pattern=rule`, got: {0}")]
    MalformedEntry(String),
}

impl FromStr for Rule {
    type Err = RuleParseError;

    /// `public`, `authenticated`, `deny`, `role:X`, `any-role:X|Y`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s {
            "public" => return Ok(Rule::Public),
            "authenticated" => return Ok(Rule::Authenticated),
            "deny" => return Ok(Rule::Deny),
            _ => {}
        }

        if let Some(authority) = s.strip_prefix("role:") {
            let authority = authority.trim();
            if authority.is_empty() {
                return Err(RuleParseError::MissingAuthority(s.to_string()));
            }
            return Ok(Rule::Authority(authority.to_string()));
        }

        if let Some(list) = s.strip_prefix("any-role:") {
            let authorities: Vec<String> = list
                .split('|')
                .map(str::trim)
                .filter(|a| !a.is_empty())
                .map(str::to_string)
                .collect();
            if authorities.is_empty() {
                return Err(RuleParseError::MissingAuthority(s.to_string()));
            }
            return Ok(Rule::AnyAuthority(authorities));
        }

        Err(RuleParseError::UnknownRule(s.to_string()))
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Public => f.write_str("public"),
            Rule::Authenticated => f.write_str("authenticated"),
            Rule::Authority(a) => write!(f, "role:{a}"),
            Rule::AnyAuthority(list) => write!(f, "any-role:{}", list.join("|")),
            Rule::Deny => f.write_str("deny"),
        }
    }
}

/// Rule selected for one request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    rule: Rule,
}

impl MatchResult {
    pub fn new(rule: Rule) -> Self {
        Self { rule }
    }

    pub fn rule(&self) -> &Rule {
        &self.rule
    }

    pub fn asserts<P: Principal>(&self, principal: Option<&P>) -> bool {
        self.rule.asserts(principal)
    }
}

/// Maps a request path to its rule.
///
/// Implementations must be deterministic: the same path yields the same rule
/// for the lifetime of the matcher.
pub trait AuthorityMatcher: Send + Sync {
    fn match_path(&self, path: &str) -> MatchResult;
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PathPattern {
    Exact(String),
    /// `/base/**`; stores `/base` (empty for `/**`).
    Prefix(String),
}

impl PathPattern {
    fn parse(raw: &str) -> Result<Self, RuleParseError> {
        let raw = raw.trim();
        if !raw.starts_with('/') {
            return Err(RuleParseError::InvalidPattern(raw.to_string()));
        }
        if let Some(base) = raw.strip_suffix("/**") {
            if base.contains('*') {
                return Err(RuleParseError::InvalidPattern(raw.to_string()));
            }
            return Ok(PathPattern::Prefix(base.to_string()));
        }
        if raw.contains('*') {
            return Err(RuleParseError::InvalidPattern(raw.to_string()));
        }
        Ok(PathPattern::Exact(raw.to_string()))
    }

    fn matches(&self, path: &str) -> bool {
        match self {
            PathPattern::Exact(p) => p == path,
            PathPattern::Prefix(base) => match path.strip_prefix(base.as_str()) {
                Some(rest) => rest.is_empty() || rest.starts_with('/'),
                None => false,
            },
        }
    }

    /// Higher is more specific. Exact beats a prefix of the same length.
    fn specificity(&self) -> (usize, u8) {
        match self {
            PathPattern::Exact(p) => (p.len(), 1),
            PathPattern::Prefix(base) => (base.len(), 0),
        }
    }
}

/// Ordered `pattern=rule` table with a fallback rule.
///
/// The most specific matching pattern wins; ties keep declaration order.
#[derive(Debug, Clone)]
pub struct PathRules {
    entries: Vec<(PathPattern, Rule)>,
    default_rule: Rule,
}

impl PathRules {
    pub fn new(default_rule: Rule) -> Self {
        Self {
            entries: Vec::new(),
            default_rule,
        }
    }

    pub fn rule(mut self, pattern: &str, rule: Rule) -> Result<Self, RuleParseError> {
        self.entries.push((PathPattern::parse(pattern)?, rule));
        Ok(self)
    }

    /// Parse `"/health=public,/admin/**=role:admin"`.
    pub fn parse(raw: &str, default_rule: Rule) -> Result<Self, RuleParseError> {
        let mut rules = Self::new(default_rule);
        for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (pattern, rule) = entry
                .split_once('=')
                .ok_or_else(|| RuleParseError::MalformedEntry(entry.to_string()))?;
            rules = rules.rule(pattern, rule.parse()?)?;
        }
        Ok(rules)
    }

    pub fn rule_for(&self, path: &str) -> &Rule {
        let mut best: Option<&(PathPattern, Rule)> = None;
        for entry in self.entries.iter().filter(|(p, _)| p.matches(path)) {
            match best {
                Some((current, _)) if current.specificity() >= entry.0.specificity() => {}
                _ => best = Some(entry),
            }
        }
        best.map(|(_, rule)| rule).unwrap_or(&self.default_rule)
    }
}

impl AuthorityMatcher for PathRules {
    fn match_path(&self, path: &str) -> MatchResult {
        MatchResult::new(self.rule_for(path).clone())
    }
}
