//! Resolution actions and the wildcard registry that finds them.
//!
//! Actions are registered under dotted patterns. A pattern ending in `*`
//! covers its prefix and anything below it; a pattern ending in `+` covers
//! strictly deeper paths only. Interior `*` segments match exactly one
//! segment.
//!
//! Lookup order for a path: exact registration, then the longest matching
//! `*` pattern, then the longest matching `+` pattern.

use crate::diff::model::PatchEntry;
use crate::errors::{NestDiffError, Result};
use crate::merge::conflict::Side;
use crate::path::{Path, PathSegment};
use crate::path_limit::{PathPattern, PatternSegment};
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

/// Result of consulting one action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Keep this side; resolution stops
    Handled(Side),
    /// The action has no opinion; try the next shorter prefix
    NotApplicable,
    /// Stop consulting actions and leave the conflict unresolved
    Fatal,
}

/// What an action sees when asked about a conflict.
#[derive(Debug, Clone, Copy)]
pub struct ResolutionContext<'a> {
    /// The prefix the action was found under
    pub path: &'a Path,
    pub first: &'a PatchEntry,
    pub second: &'a PatchEntry,
    /// Full patch sequences the conflict was found between
    pub first_patches: &'a [PatchEntry],
    pub second_patches: &'a [PatchEntry],
    /// Caller-supplied context from `Merger::with_extra`
    pub extra: Option<&'a Value>,
}

/// Decides which side of a conflict to keep.
pub trait ResolutionAction: Send + Sync {
    fn resolve(&self, ctx: &ResolutionContext<'_>) -> ActionOutcome;
}

impl<F> ResolutionAction for F
where
    F: Fn(&ResolutionContext<'_>) -> ActionOutcome + Send + Sync,
{
    fn resolve(&self, ctx: &ResolutionContext<'_>) -> ActionOutcome {
        self(ctx)
    }
}

/// Always keeps the first branch.
#[derive(Debug, Clone, Copy, Default)]
pub struct PreferFirst;

impl ResolutionAction for PreferFirst {
    fn resolve(&self, _ctx: &ResolutionContext<'_>) -> ActionOutcome {
        ActionOutcome::Handled(Side::First)
    }
}

/// Always keeps the second branch.
#[derive(Debug, Clone, Copy, Default)]
pub struct PreferSecond;

impl ResolutionAction for PreferSecond {
    fn resolve(&self, _ctx: &ResolutionContext<'_>) -> ActionOutcome {
        ActionOutcome::Handled(Side::Second)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tail {
    Exact,
    AnyDepth,
    Deeper,
}

#[derive(Clone)]
struct Registration {
    /// Pattern with any trailing `*`/`+` stripped
    prefix: Vec<PatternSegment>,
    tail: Tail,
    action: Arc<dyn ResolutionAction>,
}

impl Registration {
    fn head_matches(&self, segments: &[PathSegment]) -> bool {
        self.prefix
            .iter()
            .zip(segments)
            .all(|(pattern, segment)| pattern.matches(segment))
    }

    fn matches(&self, path: &Path) -> bool {
        let segments = path.segments();
        let fits = match self.tail {
            Tail::Exact => segments.len() == self.prefix.len(),
            Tail::AnyDepth => segments.len() >= self.prefix.len(),
            Tail::Deeper => segments.len() > self.prefix.len(),
        };
        fits && self.head_matches(segments)
    }
}

/// Resolution actions keyed by path pattern.
#[derive(Clone, Default)]
pub struct ActionRegistry {
    registrations: Vec<Registration>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `action` under a dotted pattern such as `spec.replicas`,
    /// `metadata.labels.*` or `data.+`. A later registration for the same
    /// pattern replaces the earlier one.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPathPattern` for malformed patterns and for `+`
    /// anywhere but the last segment.
    pub fn register<A>(&mut self, pattern: &str, action: A) -> Result<()>
    where
        A: ResolutionAction + 'static,
    {
        let parsed = PathPattern::parse(pattern)?;
        let mut prefix = parsed.segments().to_vec();
        let tail = match prefix.last() {
            Some(PatternSegment::Star) => Tail::AnyDepth,
            Some(PatternSegment::Plus) => Tail::Deeper,
            _ => Tail::Exact,
        };
        if tail != Tail::Exact {
            prefix.pop();
        }
        if prefix.contains(&PatternSegment::Plus) {
            return Err(NestDiffError::InvalidPathPattern {
                pattern: pattern.to_string(),
                reason: "`+` is only allowed as the last segment".to_string(),
            });
        }

        self.registrations
            .retain(|r| !(r.prefix == prefix && r.tail == tail));
        self.registrations.push(Registration {
            prefix,
            tail,
            action: Arc::new(action),
        });
        Ok(())
    }

    /// Builder form of [`ActionRegistry::register`].
    ///
    /// # Errors
    ///
    /// Same as [`ActionRegistry::register`].
    pub fn with<A>(mut self, pattern: &str, action: A) -> Result<Self>
    where
        A: ResolutionAction + 'static,
    {
        self.register(pattern, action)?;
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// The action responsible for `path`, if any.
    pub fn lookup(&self, path: &Path) -> Option<&dyn ResolutionAction> {
        [Tail::Exact, Tail::AnyDepth, Tail::Deeper]
            .into_iter()
            .find_map(|tail| {
                self.registrations
                    .iter()
                    .filter(|r| r.tail == tail && r.matches(path))
                    .max_by_key(|r| r.prefix.len())
            })
            .map(|r| r.action.as_ref())
    }
}

impl fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionRegistry")
            .field("registrations", &self.registrations.len())
            .finish()
    }
}
