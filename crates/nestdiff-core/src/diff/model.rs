//! Patch entry model.

use crate::hashing::{CanonicalHasher, Digest};
use crate::path::{Node, Path, PathSegment};
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Operation of a [`PatchEntry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatchOp {
    Add,
    Remove,
    Change,
}

impl PatchOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatchOp::Add => "add",
            PatchOp::Remove => "remove",
            PatchOp::Change => "change",
        }
    }
}

impl fmt::Display for PatchOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One structural difference.
///
/// For `Add`, `path` addresses the container in the "to" value and `items`
/// are the `(key, value)` pairs inserted into it. For `Remove`, `path`
/// addresses the container in the "from" value. For sets the only item key is
/// index `0` and its value is the set of added/removed elements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PatchEntry {
    Add {
        path: Path,
        items: Vec<(PathSegment, Value)>,
    },
    Remove {
        path: Path,
        items: Vec<(PathSegment, Value)>,
    },
    Change {
        path: Path,
        old: Value,
        new: Value,
    },
}

impl PatchEntry {
    pub fn add(path: Path, items: Vec<(PathSegment, Value)>) -> Self {
        PatchEntry::Add { path, items }
    }

    pub fn remove(path: Path, items: Vec<(PathSegment, Value)>) -> Self {
        PatchEntry::Remove { path, items }
    }

    pub fn change(path: Path, old: Value, new: Value) -> Self {
        PatchEntry::Change { path, old, new }
    }

    pub fn op(&self) -> PatchOp {
        match self {
            PatchEntry::Add { .. } => PatchOp::Add,
            PatchEntry::Remove { .. } => PatchOp::Remove,
            PatchEntry::Change { .. } => PatchOp::Change,
        }
    }

    /// Container path (Add/Remove) or changed node path (Change).
    pub fn path(&self) -> &Path {
        match self {
            PatchEntry::Add { path, .. }
            | PatchEntry::Remove { path, .. }
            | PatchEntry::Change { path, .. } => path,
        }
    }

    /// Items of an Add/Remove; empty for Change.
    pub fn items(&self) -> &[(PathSegment, Value)] {
        match self {
            PatchEntry::Add { items, .. } | PatchEntry::Remove { items, .. } => items,
            PatchEntry::Change { .. } => &[],
        }
    }

    /// Location this entry touches, as used by conflict detection.
    ///
    /// For Add/Remove it is the container path extended by the first item key
    /// (expanded entries carry exactly one item); for Change it is the path.
    pub fn conflict_path(&self) -> Path {
        match self.items().first() {
            Some((key, _)) if self.op() != PatchOp::Change => self.path().child(key.clone()),
            _ => self.path().clone(),
        }
    }

    pub fn is_remove(&self) -> bool {
        self.op() == PatchOp::Remove
    }

    /// The inverse entry: Add and Remove trade places with their items
    /// reversed, Change swaps old and new.
    /// Sequence removals list indices descending, so their inverse inserts
    /// ascend.
    pub fn swapped(&self) -> PatchEntry {
        match self {
            PatchEntry::Add { path, items } => PatchEntry::Remove {
                path: path.clone(),
                items: items.iter().rev().cloned().collect(),
            },
            PatchEntry::Remove { path, items } => PatchEntry::Add {
                path: path.clone(),
                items: items.iter().rev().cloned().collect(),
            },
            PatchEntry::Change { path, old, new } => PatchEntry::Change {
                path: path.clone(),
                old: new.clone(),
                new: old.clone(),
            },
        }
    }

    /// Rendered path, dotted when requested and possible.
    pub fn node(&self, dot_notation: bool) -> Node {
        self.path().node(dot_notation)
    }

    /// Canonical digest of the whole entry. Item order is significant.
    pub fn canonical_hash(&self) -> Digest {
        let mut h = CanonicalHasher::new();
        h.bytes(self.op().as_str().as_bytes()).path(self.path());
        match self {
            PatchEntry::Add { items, .. } | PatchEntry::Remove { items, .. } => {
                h.count(items.len());
                for (key, value) in items {
                    h.segment(key).value(value);
                }
            }
            PatchEntry::Change { old, new, .. } => {
                h.value(old).value(new);
            }
        }
        h.finish()
    }
}

impl fmt::Display for PatchEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = self.path();
        match self {
            PatchEntry::Add { items, .. } | PatchEntry::Remove { items, .. } => {
                let keys: Vec<String> = items.iter().map(|(k, _)| k.to_string()).collect();
                write!(f, "{} '{}' [{}]", self.op(), path, keys.join(", "))
            }
            PatchEntry::Change { old, new, .. } => write!(
                f,
                "change '{}' ({} -> {})",
                path,
                serde_json::Value::from(old),
                serde_json::Value::from(new)
            ),
        }
    }
}
