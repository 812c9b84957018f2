//! Patch application, inversion and revert.
//!
//! Entries must be applied in the order the differ produced them. Any entry
//! that does not fit the destination (missing key, out-of-range index,
//! wrong container kind) aborts the whole call with an error; nothing is
//! guessed or skipped.
//!
//! ## Contract
//!
//! ```text
//! apply(diff(A, B, expand = true), A) == B
//! revert(diff(A, B), B) == A
//! ```

use crate::diff::model::PatchEntry;
use crate::errors::{NestDiffError, Result};
use crate::path::{lookup_mut, not_a_container, Path, PathSegment};
use crate::value::Value;
use std::borrow::Borrow;

/// Apply `entries` to a copy of `destination` and return the copy.
///
/// # Errors
///
/// Returns the first path-resolution error; `destination` is untouched.
pub fn apply<I>(entries: I, destination: &Value) -> Result<Value>
where
    I: IntoIterator,
    I::Item: Borrow<PatchEntry>,
{
    let mut patched = destination.clone();
    apply_in_place(entries, &mut patched)?;
    Ok(patched)
}

/// Apply `entries` directly to `destination`.
///
/// # Errors
///
/// Returns the first path-resolution error. Entries before the failing one
/// have already been applied.
pub fn apply_in_place<I>(entries: I, destination: &mut Value) -> Result<()>
where
    I: IntoIterator,
    I::Item: Borrow<PatchEntry>,
{
    for entry in entries {
        match entry.borrow() {
            PatchEntry::Add { path, items } => {
                for (key, value) in items {
                    let target = lookup_mut(destination, path)?;
                    add_item(target, path, key, value)?;
                }
            }
            PatchEntry::Change { path, new, .. } => change(destination, path, new)?,
            PatchEntry::Remove { path, items } => {
                for (key, value) in items {
                    let target = lookup_mut(destination, path)?;
                    remove_item(target, path, key, value)?;
                }
            }
        }
    }
    Ok(())
}

/// Invert a patch sequence.
///
/// `Add` becomes `Remove` (items reversed), `Remove` becomes `Add`, and
/// `Change(old, new)` becomes `Change(new, old)`. Entry order is kept.
pub fn swap<I>(entries: I) -> impl Iterator<Item = PatchEntry>
where
    I: IntoIterator,
    I::Item: Borrow<PatchEntry>,
{
    entries.into_iter().map(|entry| entry.borrow().swapped())
}

/// Undo `entries` on a copy of `destination`.
///
/// # Errors
///
/// Same failure modes as [`apply`].
pub fn revert<I>(entries: I, destination: &Value) -> Result<Value>
where
    I: IntoIterator,
    I::Item: Borrow<PatchEntry>,
{
    apply(swap(entries), destination)
}

/// Undo `entries` directly on `destination`.
///
/// # Errors
///
/// Same failure modes as [`apply_in_place`].
pub fn revert_in_place<I>(entries: I, destination: &mut Value) -> Result<()>
where
    I: IntoIterator,
    I::Item: Borrow<PatchEntry>,
{
    apply_in_place(swap(entries), destination)
}

fn add_item(target: &mut Value, path: &Path, key: &PathSegment, value: &Value) -> Result<()> {
    match target {
        Value::Sequence(items) => {
            let index = key
                .as_index()
                .ok_or_else(|| NestDiffError::SegmentMismatch {
                    path: path.to_string(),
                    segment: key.to_string(),
                    kind: "sequence".to_string(),
                })?;
            // Inserting past the end appends.
            let index = index.min(items.len());
            items.insert(index, value.clone());
        }
        Value::Set(set) => match value {
            Value::Set(added) => set.extend(added.iter().cloned()),
            _ => {
                return Err(NestDiffError::InvalidSetPayload {
                    path: path.to_string(),
                })
            }
        },
        Value::Map(map) => match key {
            PathSegment::Key(k) => {
                map.insert(k.clone(), value.clone());
            }
            PathSegment::Index(_) => {
                return Err(NestDiffError::SegmentMismatch {
                    path: path.to_string(),
                    segment: key.to_string(),
                    kind: "map".to_string(),
                })
            }
        },
        Value::Scalar(_) => return Err(not_a_container(path, target)),
    }
    Ok(())
}

fn remove_item(target: &mut Value, path: &Path, key: &PathSegment, value: &Value) -> Result<()> {
    match target {
        Value::Set(set) => match value {
            Value::Set(removed) => set.retain(|s| !removed.contains(s)),
            _ => {
                return Err(NestDiffError::InvalidSetPayload {
                    path: path.to_string(),
                })
            }
        },
        Value::Sequence(items) => {
            let len = items.len();
            let index = key
                .as_index()
                .ok_or_else(|| NestDiffError::SegmentMismatch {
                    path: path.to_string(),
                    segment: key.to_string(),
                    kind: "sequence".to_string(),
                })?;
            if index >= len {
                return Err(NestDiffError::IndexOutOfBounds {
                    path: path.to_string(),
                    index,
                    len,
                });
            }
            items.remove(index);
        }
        Value::Map(map) => {
            let removed = match key {
                PathSegment::Key(k) => map.shift_remove(k.as_str()),
                PathSegment::Index(_) => None,
            };
            if removed.is_none() {
                return Err(NestDiffError::PathNotFound {
                    path: path.to_string(),
                    segment: key.to_string(),
                });
            }
        }
        Value::Scalar(_) => return Err(not_a_container(path, target)),
    }
    Ok(())
}

/// Assign `new` at `path`; the root path replaces the destination itself.
fn change(destination: &mut Value, path: &Path, new: &Value) -> Result<()> {
    let Some(last) = path.last() else {
        *destination = new.clone();
        return Ok(());
    };
    let parent_path = path.prefix(path.len() - 1);
    let parent = lookup_mut(destination, &parent_path)?;
    match parent {
        Value::Sequence(items) => {
            let len = items.len();
            let index = match last.as_index() {
                Some(i) => i,
                None => {
                    return Err(NestDiffError::SegmentMismatch {
                        path: parent_path.to_string(),
                        segment: last.to_string(),
                        kind: "sequence".to_string(),
                    })
                }
            };
            let slot = items
                .get_mut(index)
                .ok_or_else(|| NestDiffError::IndexOutOfBounds {
                    path: parent_path.to_string(),
                    index,
                    len,
                })?;
            *slot = new.clone();
        }
        Value::Map(map) => match last {
            PathSegment::Key(k) => {
                map.insert(k.clone(), new.clone());
            }
            PathSegment::Index(_) => {
                return Err(NestDiffError::SegmentMismatch {
                    path: parent_path.to_string(),
                    segment: last.to_string(),
                    kind: "map".to_string(),
                })
            }
        },
        other => return Err(not_a_container(&parent_path, other)),
    }
    Ok(())
}
