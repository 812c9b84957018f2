//! Three-way merge orchestration.
//!
//! ```text
//! Init -> PatchesExtracted -> ConflictsFound -> Resolved -> Unified
//!                                    |
//!                                    +-> AwaitingManualResolution -> Resolved -> Unified
//! ```
//!
//! [`Merger::run`] stops in `AwaitingManualResolution` and returns
//! `UnresolvedConflicts` when registered actions cannot decide every
//! conflict. [`Merger::continue_run`] takes one [`Side`] per unresolved
//! conflict and finishes the merge.

use crate::config::MergeConfig;
use crate::core_types::RunContext;
use crate::diff::{diff, DiffOptions, PatchEntry};
use crate::errors::{NestDiffError, Result};
use crate::merge::conflict::{find_conflicts, Conflict, Side};
use crate::merge::registry::ActionRegistry;
use crate::merge::resolver::Resolver;
use crate::merge::unifier::unify;
use crate::value::Value;
use crate::{log_op_end, log_op_error, log_op_start};
use std::fmt;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeState {
    Init,
    PatchesExtracted,
    ConflictsFound,
    Resolved,
    AwaitingManualResolution,
    Unified,
}

impl fmt::Display for MergeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Merges two branches that diverged from a common ancestor.
#[derive(Debug)]
pub struct Merger {
    ancestor: Value,
    first: Value,
    second: Value,
    options: DiffOptions,
    resolver: Resolver,
    run: RunContext,
    state: MergeState,
    first_patches: Vec<PatchEntry>,
    second_patches: Vec<PatchEntry>,
    conflicts: Vec<Conflict>,
    unified_patches: Vec<PatchEntry>,
}

impl Merger {
    /// # Errors
    ///
    /// Returns `InvalidPathPattern` if a configured path limit is malformed.
    pub fn new(
        ancestor: Value,
        first: Value,
        second: Value,
        actions: ActionRegistry,
        config: &MergeConfig,
    ) -> Result<Self> {
        Ok(Self {
            ancestor,
            first,
            second,
            options: config.to_diff_options()?,
            resolver: Resolver::new(actions, None),
            run: RunContext::new(),
            state: MergeState::Init,
            first_patches: Vec::new(),
            second_patches: Vec::new(),
            conflicts: Vec::new(),
            unified_patches: Vec::new(),
        })
    }

    /// Context value handed to every resolution action.
    pub fn with_extra(mut self, extra: Value) -> Self {
        self.resolver = self.resolver.with_extra(extra);
        self
    }

    /// Replace the generated run context, e.g. to carry a caller's id.
    pub fn with_run_context(mut self, run: RunContext) -> Self {
        self.run = run;
        self
    }

    pub fn state(&self) -> MergeState {
        self.state
    }

    pub fn run_context(&self) -> &RunContext {
        &self.run
    }

    pub fn options(&self) -> &DiffOptions {
        &self.options
    }

    pub fn ancestor(&self) -> &Value {
        &self.ancestor
    }

    pub fn first(&self) -> &Value {
        &self.first
    }

    pub fn second(&self) -> &Value {
        &self.second
    }

    pub fn first_patches(&self) -> &[PatchEntry] {
        &self.first_patches
    }

    pub fn second_patches(&self) -> &[PatchEntry] {
        &self.second_patches
    }

    pub fn conflicts(&self) -> &[Conflict] {
        &self.conflicts
    }

    /// Conflicts waiting for [`Merger::continue_run`], in original order.
    pub fn unresolved_conflicts(&self) -> Vec<&Conflict> {
        self.resolver
            .unresolved()
            .iter()
            .filter_map(|&i| self.conflicts.get(i))
            .collect()
    }

    pub fn unified_patches(&self) -> &[PatchEntry] {
        &self.unified_patches
    }

    /// Diff both branches, find and resolve conflicts, then unify.
    ///
    /// # Errors
    ///
    /// - `InvalidMergeState` unless called from `Init`
    /// - `UnresolvedConflicts` when manual picks are needed; the merger is
    ///   then in `AwaitingManualResolution`
    /// - `ResolutionNotSet` if unification meets an undecided conflict
    pub fn run(&mut self) -> Result<()> {
        self.expect_state("run", MergeState::Init)?;
        let start = Instant::now();
        log_op_start!("merge_run", run_id = self.run.run_id.as_str());

        self.extract_patches();
        self.find_conflicts();
        let result = self.resolve_conflicts().and_then(|()| self.unify());
        self.finish("merge_run", start, result)
    }

    /// Complete a merge paused for manual resolution.
    ///
    /// # Errors
    ///
    /// - `InvalidMergeState` unless called from `AwaitingManualResolution`
    /// - `PickCountMismatch` when `picks` does not have one entry per
    ///   unresolved conflict; nothing changes and the merger stays paused
    pub fn continue_run(&mut self, picks: &[Side]) -> Result<()> {
        self.expect_state("continue_run", MergeState::AwaitingManualResolution)?;
        let start = Instant::now();
        log_op_start!(
            "merge_continue",
            run_id = self.run.run_id.as_str(),
            pick_count = picks.len()
        );

        let result = self
            .resolver
            .manual_resolve_conflicts(&mut self.conflicts, picks)
            .and_then(|()| {
                self.state = MergeState::Resolved;
                self.unify()
            });
        self.finish("merge_continue", start, result)
    }

    fn expect_state(&self, op: &str, expected: MergeState) -> Result<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(NestDiffError::InvalidMergeState {
                op: op.to_string(),
                state: self.state.to_string(),
            })
        }
    }

    fn extract_patches(&mut self) {
        self.first_patches = diff(&self.ancestor, &self.first, &self.options).collect();
        self.second_patches = diff(&self.ancestor, &self.second, &self.options).collect();
        self.state = MergeState::PatchesExtracted;
    }

    fn find_conflicts(&mut self) {
        self.conflicts = find_conflicts(&self.first_patches, &self.second_patches);
        self.state = MergeState::ConflictsFound;
    }

    fn resolve_conflicts(&mut self) -> Result<()> {
        match self
            .resolver
            .resolve_conflicts(&self.first_patches, &self.second_patches, &mut self.conflicts)
        {
            Ok(()) => {
                self.state = MergeState::Resolved;
                Ok(())
            }
            Err(err) => {
                if err.is_unresolved_conflicts() {
                    self.state = MergeState::AwaitingManualResolution;
                }
                Err(err)
            }
        }
    }

    fn unify(&mut self) -> Result<()> {
        self.unified_patches = unify(&self.first_patches, &self.second_patches, &self.conflicts)?;
        self.state = MergeState::Unified;
        Ok(())
    }

    fn finish(&self, op: &str, start: Instant, result: Result<()>) -> Result<()> {
        let duration_ms = start.elapsed().as_millis() as u64;
        match &result {
            Ok(()) => log_op_end!(
                op,
                duration_ms = duration_ms,
                run_id = self.run.run_id.as_str(),
                conflict_count = self.conflicts.len(),
                patch_count = self.unified_patches.len()
            ),
            Err(err) => log_op_error!(
                op,
                err.clone(),
                duration_ms = duration_ms,
                run_id = self.run.run_id.as_str(),
                conflict_count = self.conflicts.len(),
                unresolved_count = self.resolver.unresolved().len()
            ),
        }
        result
    }
}
