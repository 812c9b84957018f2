//! Conflict resolution through registered actions, with a manual fallback.

use crate::diff::model::PatchEntry;
use crate::errors::{NestDiffError, Result};
use crate::merge::conflict::{Conflict, Side};
use crate::merge::registry::{ActionOutcome, ActionRegistry, ResolutionContext};
use crate::value::Value;

/// Picks a side for each conflict.
///
/// Equal patches resolve to the first side on their own. Otherwise the
/// conflict path's prefixes are tried from longest to shortest (never the
/// root) against the registry until an action handles it or gives up.
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    actions: ActionRegistry,
    extra: Option<Value>,
    /// Indices into the conflict slice of the last `resolve_conflicts` call
    unresolved: Vec<usize>,
}

impl Resolver {
    pub fn new(actions: ActionRegistry, extra: Option<Value>) -> Self {
        Self {
            actions,
            extra,
            unresolved: Vec::new(),
        }
    }

    pub fn with_extra(mut self, extra: Value) -> Self {
        self.extra = Some(extra);
        self
    }

    pub fn actions(&self) -> &ActionRegistry {
        &self.actions
    }

    pub fn extra(&self) -> Option<&Value> {
        self.extra.as_ref()
    }

    /// Positions of the conflicts still waiting for a manual pick.
    pub fn unresolved(&self) -> &[usize] {
        &self.unresolved
    }

    /// Set `take` on every conflict an action can decide.
    ///
    /// # Errors
    ///
    /// Returns `UnresolvedConflicts` carrying copies of the undecided
    /// conflicts, in their original order. Decided conflicts keep their
    /// selection either way.
    pub fn resolve_conflicts(
        &mut self,
        first_patches: &[PatchEntry],
        second_patches: &[PatchEntry],
        conflicts: &mut [Conflict],
    ) -> Result<()> {
        self.unresolved.clear();

        for (index, conflict) in conflicts.iter_mut().enumerate() {
            if conflict.first_patch == conflict.second_patch {
                conflict.take = Some(Side::First);
                continue;
            }
            match self.consult(first_patches, second_patches, conflict) {
                Some(side) => conflict.take = Some(side),
                None => self.unresolved.push(index),
            }
        }

        tracing::debug!(
            conflict_count = conflicts.len(),
            unresolved_count = self.unresolved.len(),
            "conflict resolution pass finished"
        );

        if self.unresolved.is_empty() {
            Ok(())
        } else {
            Err(NestDiffError::UnresolvedConflicts {
                conflicts: self
                    .unresolved
                    .iter()
                    .map(|&i| conflicts[i].clone())
                    .collect(),
            })
        }
    }

    fn consult(
        &self,
        first_patches: &[PatchEntry],
        second_patches: &[PatchEntry],
        conflict: &Conflict,
    ) -> Option<Side> {
        let path = conflict.conflict_path();
        for prefix in path.prefixes_longest_first() {
            let Some(action) = self.actions.lookup(&prefix) else {
                continue;
            };
            let ctx = ResolutionContext {
                path: &prefix,
                first: &conflict.first_patch,
                second: &conflict.second_patch,
                first_patches,
                second_patches,
                extra: self.extra.as_ref(),
            };
            match action.resolve(&ctx) {
                ActionOutcome::Handled(side) => return Some(side),
                ActionOutcome::NotApplicable => {}
                ActionOutcome::Fatal => {
                    tracing::debug!(path = %prefix, "resolution action gave up");
                    return None;
                }
            }
        }
        None
    }

    /// Apply one pick per unresolved conflict, in original order.
    ///
    /// # Errors
    ///
    /// Returns `PickCountMismatch` without touching any conflict when
    /// `picks` does not match the number of unresolved conflicts.
    pub fn manual_resolve_conflicts(
        &mut self,
        conflicts: &mut [Conflict],
        picks: &[Side],
    ) -> Result<()> {
        if picks.len() != self.unresolved.len() {
            return Err(NestDiffError::PickCountMismatch {
                expected: self.unresolved.len(),
                got: picks.len(),
            });
        }
        for (&index, &side) in self.unresolved.iter().zip(picks) {
            let conflict = conflicts
                .get_mut(index)
                .ok_or_else(|| NestDiffError::Internal {
                    message: format!("unresolved conflict index {} out of range", index),
                })?;
            conflict.take = Some(side);
        }
        self.unresolved.clear();
        Ok(())
    }
}
