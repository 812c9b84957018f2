//! Combine two resolved patch sequences into one.

use crate::diff::model::PatchEntry;
use crate::errors::Result;
use crate::hashing::Digest;
use crate::merge::conflict::{Conflict, Side};
use std::collections::HashMap;

/// Conflict indices keyed by the canonical hash of one side's patch.
fn index_side(conflicts: &[Conflict], side: Side) -> HashMap<Digest, Vec<usize>> {
    let mut index: HashMap<Digest, Vec<usize>> = HashMap::new();
    for (i, conflict) in conflicts.iter().enumerate() {
        index
            .entry(conflict.patch(side).canonical_hash())
            .or_default()
            .push(i);
    }
    index
}

/// Merge `first` and `second` into a single sequence ordered by conflict
/// path.
///
/// The concatenation `first ++ second` is stably sorted, so entries with
/// equal paths keep first-before-second order. A patch is dropped when any
/// conflict it takes part in (on its own side) selected the other side.
///
/// # Errors
///
/// Returns `ResolutionNotSet` if a conflict involving an emitted patch has
/// no side selected.
pub fn unify(
    first: &[PatchEntry],
    second: &[PatchEntry],
    conflicts: &[Conflict],
) -> Result<Vec<PatchEntry>> {
    let first_index = index_side(conflicts, Side::First);
    let second_index = index_side(conflicts, Side::Second);

    let mut tagged: Vec<(Side, &PatchEntry)> = first
        .iter()
        .map(|p| (Side::First, p))
        .chain(second.iter().map(|p| (Side::Second, p)))
        .collect();
    tagged.sort_by_cached_key(|(_, patch)| patch.conflict_path());

    let mut unified = Vec::with_capacity(tagged.len());
    for (side, patch) in tagged {
        let index = match side {
            Side::First => &first_index,
            Side::Second => &second_index,
        };
        let mut keep = true;
        if let Some(linked) = index.get(&patch.canonical_hash()) {
            for &i in linked {
                let conflict = &conflicts[i];
                conflict.take_patch()?;
                if conflict.take != Some(side) {
                    keep = false;
                }
            }
        }
        if keep {
            unified.push(patch.clone());
        }
    }

    tracing::debug!(
        first_count = first.len(),
        second_count = second.len(),
        unified_count = unified.len(),
        "patch sequences unified"
    );
    Ok(unified)
}
