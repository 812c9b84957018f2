//! Path patterns and the path-limit trie.
//!
//! A [`PathLimit`] marks locations where the differ stops expanding additions
//! into per-leaf entries and instead reports the whole subtree in one
//! payload (and where changed subtrees are reported as one `Change`).
//!
//! Patterns are written as dotted strings. Inside a path limit, `*` matches
//! exactly one segment of any value, at any position: `spec.*.env`.

use crate::errors::{NestDiffError, Result};
use crate::path::{Path, PathSegment};
use std::collections::BTreeMap;

/// One segment of a [`PathPattern`].
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PatternSegment {
    /// Matches a segment whose rendering equals the literal (`"0"` matches index 0)
    Literal(String),
    /// `*`
    Star,
    /// `+`
    Plus,
}

impl PatternSegment {
    pub fn matches(&self, segment: &PathSegment) -> bool {
        match self {
            PatternSegment::Literal(lit) => match segment {
                PathSegment::Key(k) => k == lit,
                PathSegment::Index(i) => lit.parse::<usize>().ok() == Some(*i),
            },
            PatternSegment::Star | PatternSegment::Plus => true,
        }
    }
}

/// Parsed dotted pattern such as `metadata.labels` or `spec.*`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PathPattern(Vec<PatternSegment>);

impl PathPattern {
    /// Parse a dotted pattern. `*` and `+` segments become wildcards.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPathPattern` if a segment is empty (`a..b`).
    pub fn parse(pattern: &str) -> Result<Self> {
        if pattern.is_empty() {
            return Ok(PathPattern(Vec::new()));
        }
        pattern
            .split('.')
            .map(|part| match part {
                "" => Err(NestDiffError::InvalidPathPattern {
                    pattern: pattern.to_string(),
                    reason: "empty segment".to_string(),
                }),
                "*" => Ok(PatternSegment::Star),
                "+" => Ok(PatternSegment::Plus),
                lit => Ok(PatternSegment::Literal(lit.to_string())),
            })
            .collect::<Result<Vec<_>>>()
            .map(PathPattern)
    }

    /// Pattern matching exactly `path`, no wildcards.
    pub fn literal(path: &Path) -> Self {
        PathPattern(
            path.segments()
                .iter()
                .map(|s| PatternSegment::Literal(s.to_string()))
                .collect(),
        )
    }

    pub fn segments(&self) -> &[PatternSegment] {
        &self.0
    }

    pub(crate) fn has_plus(&self) -> bool {
        self.0.contains(&PatternSegment::Plus)
    }
}

impl std::fmt::Display for PathPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<&str> = self
            .0
            .iter()
            .map(|s| match s {
                PatternSegment::Literal(l) => l.as_str(),
                PatternSegment::Star => "*",
                PatternSegment::Plus => "+",
            })
            .collect();
        write!(f, "{}", parts.join("."))
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
struct LimitNode {
    literals: BTreeMap<String, LimitNode>,
    star: Option<Box<LimitNode>>,
    terminal: bool,
}

/// Trie of path prefixes at which diff expansion stops.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PathLimit {
    root: LimitNode,
}

impl PathLimit {
    /// An empty limit. Its presence still changes how additions are reported.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from parsed patterns.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPathPattern` for `+` segments, which only make sense
    /// in resolution-action registration.
    pub fn from_patterns<I>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = PathPattern>,
    {
        let mut limit = PathLimit::new();
        for pattern in patterns {
            limit.insert(pattern)?;
        }
        Ok(limit)
    }

    /// Build from dotted strings such as `["spec.template", "data.*"]`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPathPattern` for malformed patterns.
    pub fn from_dotted<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let parsed = patterns
            .into_iter()
            .map(|p| PathPattern::parse(p.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Self::from_patterns(parsed)
    }

    /// Build from concrete paths (no wildcards).
    pub fn from_paths<I>(paths: I) -> Self
    where
        I: IntoIterator<Item = Path>,
    {
        let mut limit = PathLimit::new();
        for path in paths {
            limit.insert_unchecked(PathPattern::literal(&path));
        }
        limit
    }

    /// Add one pattern to the trie.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPathPattern` for `+` segments.
    pub fn insert(&mut self, pattern: PathPattern) -> Result<()> {
        if pattern.has_plus() {
            return Err(NestDiffError::InvalidPathPattern {
                pattern: pattern.to_string(),
                reason: "`+` is not supported in path limits".to_string(),
            });
        }
        self.insert_unchecked(pattern);
        Ok(())
    }

    fn insert_unchecked(&mut self, pattern: PathPattern) {
        let mut node = &mut self.root;
        for segment in pattern.0 {
            node = match segment {
                PatternSegment::Literal(lit) => node.literals.entry(lit).or_default(),
                PatternSegment::Star | PatternSegment::Plus => {
                    node.star.get_or_insert_with(Box::default).as_mut()
                }
            };
        }
        node.terminal = true;
    }

    /// True when `path` ends exactly on a registered limit.
    ///
    /// Literal children are tried before the `*` child; the search backtracks
    /// if the literal branch does not end on a limit.
    pub fn path_is_limit(&self, path: &Path) -> bool {
        matches_from(&self.root, path.segments())
    }

    pub fn is_empty(&self) -> bool {
        self.root == LimitNode::default()
    }
}

fn matches_from(node: &LimitNode, rest: &[PathSegment]) -> bool {
    let Some((head, tail)) = rest.split_first() else {
        return node.terminal;
    };
    if let Some(child) = node.literals.get(&head.to_string()) {
        if matches_from(child, tail) {
            return true;
        }
    }
    match &node.star {
        Some(star) => matches_from(star, tail),
        None => false,
    }
}
