//! Differ options.

use crate::path::{Path, PathSegment};
use crate::path_limit::PathLimit;
use crate::tolerance::EPSILON;
use std::collections::BTreeSet;

/// Options controlling a single diff.
#[derive(Debug, Clone, PartialEq)]
pub struct DiffOptions {
    /// Full paths of map keys to skip
    pub ignore: BTreeSet<Path>,
    /// When present, additions of containers are reported as an empty
    /// container followed by the nested additions, except at limit paths
    pub path_limit: Option<PathLimit>,
    /// One entry per added/removed item instead of one batched entry
    pub expand: bool,
    /// Relative numeric tolerance
    pub tolerance: f64,
    /// Absolute numeric tolerance
    pub absolute_tolerance: Option<f64>,
    /// Render paths as dotted strings where possible; also decides how
    /// [`DiffOptions::ignore_dotted`] parses its argument
    pub dot_notation: bool,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            ignore: BTreeSet::new(),
            path_limit: None,
            expand: false,
            tolerance: EPSILON,
            absolute_tolerance: None,
            dot_notation: true,
        }
    }
}

impl DiffOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_expand(mut self, expand: bool) -> Self {
        self.expand = expand;
        self
    }

    pub fn with_path_limit(mut self, limit: PathLimit) -> Self {
        self.path_limit = Some(limit);
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_absolute_tolerance(mut self, absolute_tolerance: f64) -> Self {
        self.absolute_tolerance = Some(absolute_tolerance);
        self
    }

    pub fn with_dot_notation(mut self, dot_notation: bool) -> Self {
        self.dot_notation = dot_notation;
        self
    }

    pub fn ignore_path(mut self, path: Path) -> Self {
        self.ignore.insert(path);
        self
    }

    /// Ignore a key given as a string: split on dots when `dot_notation` is
    /// set, otherwise taken as one literal top-level key.
    pub fn ignore_dotted(self, key: &str) -> Self {
        let path = if self.dot_notation {
            Path::parse_dotted(key)
        } else {
            Path::new(vec![PathSegment::key(key)])
        };
        self.ignore_path(path)
    }

    pub(crate) fn is_ignored(&self, parent: &Path, key: &str) -> bool {
        !self.ignore.is_empty() && self.ignore.contains(&parent.child(key))
    }

    pub(crate) fn is_limit(&self, path: &Path) -> bool {
        self.path_limit
            .as_ref()
            .is_some_and(|limit| limit.path_is_limit(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = DiffOptions::default();
        assert!(!opts.expand);
        assert!(opts.dot_notation);
        assert_eq!(opts.tolerance, EPSILON);
        assert!(opts.path_limit.is_none());
    }

    #[test]
    fn test_ignore_dotted_follows_notation() {
        let dotted = DiffOptions::new().ignore_dotted("a.b");
        assert!(dotted.is_ignored(&path!["a"], "b"));

        let literal = DiffOptions::new()
            .with_dot_notation(false)
            .ignore_dotted("a.b");
        assert!(literal.is_ignored(&Path::root(), "a.b"));
        assert!(!literal.is_ignored(&path!["a"], "b"));
    }
}
