//! Conflicts between two patch sequences against the same ancestor.

use crate::diff::model::PatchEntry;
use crate::errors::{NestDiffError, Result};
use crate::path::Path;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which branch of a merge a resolution keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    First,
    Second,
}

impl Side {
    pub fn other(self) -> Side {
        match self {
            Side::First => Side::Second,
            Side::Second => Side::First,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Side::First => "first",
            Side::Second => "second",
        })
    }
}

/// Two patches that cannot both be applied, and the side chosen to win.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conflict {
    pub first_patch: PatchEntry,
    pub second_patch: PatchEntry,
    pub take: Option<Side>,
}

impl Conflict {
    pub fn new(first_patch: PatchEntry, second_patch: PatchEntry) -> Self {
        Self {
            first_patch,
            second_patch,
            take: None,
        }
    }

    pub fn patch(&self, side: Side) -> &PatchEntry {
        match side {
            Side::First => &self.first_patch,
            Side::Second => &self.second_patch,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.take.is_some()
    }

    /// The patch kept by the resolution.
    ///
    /// # Errors
    ///
    /// Returns `ResolutionNotSet` while no side has been chosen.
    pub fn take_patch(&self) -> Result<&PatchEntry> {
        self.take
            .map(|side| self.patch(side))
            .ok_or_else(|| NestDiffError::ResolutionNotSet {
                path: self.conflict_path().to_string(),
            })
    }

    /// The shorter of the two conflict paths; the first patch's on ties.
    pub fn conflict_path(&self) -> Path {
        let first = self.first_patch.conflict_path();
        let second = self.second_patch.conflict_path();
        if second.len() < first.len() {
            second
        } else {
            first
        }
    }
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}': {} vs {}", self.conflict_path(), self.first_patch, self.second_patch)?;
        if let Some(side) = self.take {
            write!(f, " (take {})", side)?;
        }
        Ok(())
    }
}

/// A pair conflicts when both touch the same location, or when one removes a
/// container the other reaches into.
fn is_conflict(first: &PatchEntry, second: &PatchEntry) -> bool {
    let first_path = first.conflict_path();
    let second_path = second.conflict_path();

    if first_path == second_path {
        return true;
    }
    if first_path.is_strict_prefix_of(&second_path) {
        return first.is_remove();
    }
    if second_path.is_strict_prefix_of(&first_path) {
        return second.is_remove();
    }
    false
}

/// Every conflicting pair of `first × second`, first-major.
pub fn find_conflicts(first: &[PatchEntry], second: &[PatchEntry]) -> Vec<Conflict> {
    let mut conflicts = Vec::new();
    for a in first {
        for b in second {
            if is_conflict(a, b) {
                conflicts.push(Conflict::new(a.clone(), b.clone()));
            }
        }
    }
    tracing::debug!(
        first_count = first.len(),
        second_count = second.len(),
        conflict_count = conflicts.len(),
        "conflict detection finished"
    );
    conflicts
}
