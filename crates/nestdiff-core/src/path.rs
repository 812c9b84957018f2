//! Paths into value trees and lookups along them.
//!
//! A [`Path`] is a list of [`PathSegment`]s. It renders as a dotted string
//! (`spec.template.image`) only when every segment is a key without a dot;
//! otherwise it stays an explicit segment list.

use crate::errors::{NestDiffError, Result};
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One step in a path. Indices order before keys.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    Index(usize),
    Key(String),
}

impl PathSegment {
    pub fn key(key: impl Into<String>) -> Self {
        PathSegment::Key(key.into())
    }

    pub fn is_index(&self) -> bool {
        matches!(self, PathSegment::Index(_))
    }

    /// Index view of the segment. Keys holding a decimal integer are coerced.
    pub fn as_index(&self) -> Option<usize> {
        match self {
            PathSegment::Index(i) => Some(*i),
            PathSegment::Key(k) => k.parse().ok(),
        }
    }

    fn is_dottable(&self) -> bool {
        matches!(self, PathSegment::Key(k) if !k.contains('.'))
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Index(i) => write!(f, "{}", i),
            PathSegment::Key(k) => write!(f, "{}", k),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        PathSegment::Key(key.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        PathSegment::Key(key)
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        PathSegment::Index(index)
    }
}

/// Location of a node inside a value tree. The empty path is the root.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path(Vec<PathSegment>);

/// Rendered form of a path: dotted when possible, segment list otherwise.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Node {
    Dotted(String),
    Segments(Vec<PathSegment>),
}

impl Path {
    pub fn root() -> Self {
        Path(Vec::new())
    }

    pub fn new(segments: Vec<PathSegment>) -> Self {
        Path(segments)
    }

    /// Split a dotted string into key segments. `""` is the root.
    pub fn parse_dotted(dotted: &str) -> Self {
        if dotted.is_empty() {
            return Path::root();
        }
        Path(dotted.split('.').map(PathSegment::from).collect())
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn last(&self) -> Option<&PathSegment> {
        self.0.last()
    }

    /// New path one segment deeper.
    pub fn child(&self, segment: impl Into<PathSegment>) -> Self {
        let mut segments = Vec::with_capacity(self.0.len() + 1);
        segments.extend_from_slice(&self.0);
        segments.push(segment.into());
        Path(segments)
    }

    pub fn push(&mut self, segment: impl Into<PathSegment>) {
        self.0.push(segment.into());
    }

    /// Prefix of the first `len` segments.
    pub fn prefix(&self, len: usize) -> Self {
        Path(self.0[..len.min(self.0.len())].to_vec())
    }

    /// `self` is a prefix of `other` (equal paths count).
    pub fn is_prefix_of(&self, other: &Path) -> bool {
        other.0.starts_with(&self.0)
    }

    pub fn is_strict_prefix_of(&self, other: &Path) -> bool {
        self.0.len() < other.0.len() && self.is_prefix_of(other)
    }

    /// Non-empty prefixes from the full path down to the first segment.
    pub fn prefixes_longest_first(&self) -> impl Iterator<Item = Path> + '_ {
        (1..=self.0.len()).rev().map(move |len| self.prefix(len))
    }

    pub fn to_dotted(&self) -> Option<String> {
        if self.0.iter().all(PathSegment::is_dottable) {
            let keys: Vec<String> = self.0.iter().map(ToString::to_string).collect();
            Some(keys.join("."))
        } else {
            None
        }
    }

    pub fn node(&self, dot_notation: bool) -> Node {
        match self.to_dotted() {
            Some(dotted) if dot_notation => Node::Dotted(dotted),
            _ => Node::Segments(self.0.clone()),
        }
    }

    /// RFC 6901 JSON pointer (`""` for the root).
    pub fn to_json_pointer(&self) -> String {
        let mut pointer = String::new();
        for segment in &self.0 {
            pointer.push('/');
            pointer.push_str(&segment.to_string().replace('~', "~0").replace('/', "~1"));
        }
        pointer
    }

    pub fn first_index_position(&self) -> Option<usize> {
        self.0.iter().position(PathSegment::is_index)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_dotted() {
            Some(dotted) => write!(f, "{}", dotted),
            None => {
                let parts: Vec<String> = self
                    .0
                    .iter()
                    .map(|s| match s {
                        PathSegment::Index(i) => i.to_string(),
                        PathSegment::Key(k) => format!("{:?}", k),
                    })
                    .collect();
                write!(f, "[{}]", parts.join(", "))
            }
        }
    }
}

impl From<Vec<PathSegment>> for Path {
    fn from(segments: Vec<PathSegment>) -> Self {
        Path(segments)
    }
}

impl FromIterator<PathSegment> for Path {
    fn from_iter<I: IntoIterator<Item = PathSegment>>(iter: I) -> Self {
        Path(iter.into_iter().collect())
    }
}

/// Build a [`Path`] from mixed keys and indices: `path!["spec", "ports", 0]`.
#[macro_export]
macro_rules! path {
    () => { $crate::path::Path::root() };
    ($($seg:expr),+ $(,)?) => {
        $crate::path::Path::new(vec![$($crate::path::PathSegment::from($seg)),+])
    };
}

fn step<'v>(value: &'v Value, at: &Path, segment: &PathSegment) -> Result<&'v Value> {
    match value {
        Value::Map(map) => match segment {
            PathSegment::Key(k) => map.get(k).ok_or_else(|| NestDiffError::PathNotFound {
                path: at.to_string(),
                segment: k.clone(),
            }),
            PathSegment::Index(_) => Err(mismatch(at, segment, value)),
        },
        Value::Sequence(items) => {
            let index = segment
                .as_index()
                .ok_or_else(|| mismatch(at, segment, value))?;
            items.get(index).ok_or_else(|| NestDiffError::IndexOutOfBounds {
                path: at.to_string(),
                index,
                len: items.len(),
            })
        }
        Value::Set(_) | Value::Scalar(_) => Err(not_a_container(at, value)),
    }
}

fn step_mut<'v>(value: &'v mut Value, at: &Path, segment: &PathSegment) -> Result<&'v mut Value> {
    match value {
        Value::Map(map) => match segment {
            PathSegment::Key(k) => map.get_mut(k).ok_or_else(|| NestDiffError::PathNotFound {
                path: at.to_string(),
                segment: k.clone(),
            }),
            PathSegment::Index(_) => Err(NestDiffError::SegmentMismatch {
                path: at.to_string(),
                segment: segment.to_string(),
                kind: "map".to_string(),
            }),
        },
        Value::Sequence(items) => {
            let len = items.len();
            let index = segment.as_index().ok_or_else(|| NestDiffError::SegmentMismatch {
                path: at.to_string(),
                segment: segment.to_string(),
                kind: "sequence".to_string(),
            })?;
            items.get_mut(index).ok_or_else(|| NestDiffError::IndexOutOfBounds {
                path: at.to_string(),
                index,
                len,
            })
        }
        other => Err(not_a_container(at, other)),
    }
}

pub(crate) fn mismatch(at: &Path, segment: &PathSegment, value: &Value) -> NestDiffError {
    NestDiffError::SegmentMismatch {
        path: at.to_string(),
        segment: segment.to_string(),
        kind: value.kind_name().to_string(),
    }
}

pub(crate) fn not_a_container(at: &Path, value: &Value) -> NestDiffError {
    NestDiffError::NotAContainer {
        path: at.to_string(),
        kind: value.kind_name().to_string(),
    }
}

/// Follow `path` from `value`.
///
/// # Errors
///
/// Fails on a missing key, an out-of-range index, a segment that cannot
/// address the container it meets, or a scalar/set along the way.
pub fn lookup<'v>(value: &'v Value, path: &Path) -> Result<&'v Value> {
    let mut current = value;
    let mut at = Path::root();
    for segment in path.segments() {
        current = step(current, &at, segment)?;
        at.push(segment.clone());
    }
    Ok(current)
}

/// Mutable counterpart of [`lookup`].
///
/// # Errors
///
/// Same failure modes as [`lookup`].
pub fn lookup_mut<'v>(value: &'v mut Value, path: &Path) -> Result<&'v mut Value> {
    let mut current = value;
    let mut at = Path::root();
    for segment in path.segments() {
        current = step_mut(current, &at, segment)?;
        at.push(segment.clone());
    }
    Ok(current)
}

/// Look up `path`, or its parent when `parent` is set.
///
/// # Errors
///
/// Same failure modes as [`lookup`].
pub fn dot_lookup<'v>(value: &'v Value, path: &Path, parent: bool) -> Result<&'v Value> {
    if parent && !path.is_empty() {
        lookup(value, &path.prefix(path.len() - 1))
    } else {
        lookup(value, path)
    }
}
