//! Structural diff computation engine.
//!
//! [`diff`] returns a lazy [`Diff`] iterator. Traversal is driven by an
//! explicit work stack rather than recursion, so input depth is bounded by
//! heap, not by the call stack. Visiting a node pushes its follow-up work
//! (entries to emit, children to visit) in reverse, which reproduces the
//! depth-first order of a recursive walk:
//!
//! 1. common keys/indices, each fully explored before the next
//! 2. additions
//! 3. deletions
//!
//! Every payload value is an owned deep copy.

use crate::diff::model::PatchEntry;
use crate::diff::options::DiffOptions;
use crate::path::{Path, PathSegment};
use crate::tolerance::are_different;
use crate::value::{ContainerKind, Scalar, Value};
use indexmap::IndexMap;
use std::collections::BTreeSet;

static EMPTY_SET: BTreeSet<Scalar> = BTreeSet::new();

/// Left-hand side of a pending comparison.
///
/// Additions below a path limit are diffed against an empty container of the
/// same kind; that container is described rather than allocated.
#[derive(Clone, Copy)]
enum Origin<'a> {
    Value(&'a Value),
    Empty(ContainerKind),
}

enum Work<'a> {
    Visit {
        first: Origin<'a>,
        second: &'a Value,
        path: Path,
    },
    Emit(PatchEntry),
}

/// Lazy, single-pass sequence of [`PatchEntry`] between two values.
pub struct Diff<'a> {
    options: &'a DiffOptions,
    stack: Vec<Work<'a>>,
}

/// Compare `first` to `second`.
///
/// # Example
///
/// ```
/// use nestdiff_core::diff::{diff, DiffOptions, PatchEntry};
/// use nestdiff_core::value::Value;
/// use nestdiff_core::path;
/// use serde_json::json;
///
/// let a = Value::from(json!({"a": "b"}));
/// let b = Value::from(json!({"a": "c"}));
/// let opts = DiffOptions::default();
/// let entries: Vec<PatchEntry> = diff(&a, &b, &opts).collect();
/// assert_eq!(
///     entries,
///     vec![PatchEntry::change(path!["a"], Value::from("b"), Value::from("c"))]
/// );
/// ```
pub fn diff<'a>(first: &'a Value, second: &'a Value, options: &'a DiffOptions) -> Diff<'a> {
    Diff {
        options,
        stack: vec![Work::Visit {
            first: Origin::Value(first),
            second,
            path: Path::root(),
        }],
    }
}

impl<'a> Diff<'a> {
    pub fn options(&self) -> &DiffOptions {
        self.options
    }

    fn visit(&mut self, first: Origin<'a>, second: &'a Value, path: Path) {
        let mut work = Vec::new();
        let options = self.options;

        match (first, second) {
            (Origin::Value(Value::Map(a)), Value::Map(b)) => {
                visit_map(options, Some(a), b, &path, &mut work)
            }
            (Origin::Empty(ContainerKind::Map), Value::Map(b)) => {
                visit_map(options, None, b, &path, &mut work)
            }
            (Origin::Value(Value::Sequence(a)), Value::Sequence(b)) => {
                visit_sequence(options, a, b, &path, &mut work)
            }
            (Origin::Empty(ContainerKind::Sequence), Value::Sequence(b)) => {
                visit_sequence(options, &[], b, &path, &mut work)
            }
            (Origin::Value(Value::Set(a)), Value::Set(b)) => visit_set(a, b, &path, &mut work),
            (Origin::Empty(ContainerKind::Set), Value::Set(b)) => {
                visit_set(&EMPTY_SET, b, &path, &mut work)
            }
            (Origin::Value(a), b) => {
                if are_different(a, b, options.tolerance, options.absolute_tolerance) {
                    work.push(Work::Emit(PatchEntry::change(path, a.clone(), b.clone())));
                }
            }
            (Origin::Empty(kind), b) => {
                let a = kind.empty();
                if are_different(&a, b, options.tolerance, options.absolute_tolerance) {
                    work.push(Work::Emit(PatchEntry::change(path, a, b.clone())));
                }
            }
        }

        self.stack.extend(work.into_iter().rev());
    }
}

impl Iterator for Diff<'_> {
    type Item = PatchEntry;

    fn next(&mut self) -> Option<PatchEntry> {
        while let Some(work) = self.stack.pop() {
            match work {
                Work::Emit(entry) => return Some(entry),
                Work::Visit {
                    first,
                    second,
                    path,
                } => self.visit(first, second, path),
            }
        }
        None
    }
}

/// Intersection child: a single `Change` at a limit, otherwise a visit.
fn common_child<'a>(
    options: &DiffOptions,
    a: &'a Value,
    b: &'a Value,
    path: Path,
    work: &mut Vec<Work<'a>>,
) {
    if options.is_limit(&path) {
        work.push(Work::Emit(PatchEntry::change(path, a.clone(), b.clone())));
    } else {
        work.push(Work::Visit {
            first: Origin::Value(a),
            second: b,
            path,
        });
    }
}

fn visit_map<'a>(
    options: &DiffOptions,
    a: Option<&'a IndexMap<String, Value>>,
    b: &'a IndexMap<String, Value>,
    path: &Path,
    work: &mut Vec<Work<'a>>,
) {
    if let Some(a) = a {
        for (key, a_val) in a {
            if let Some(b_val) = b.get(key) {
                if !options.is_ignored(path, key) {
                    common_child(options, a_val, b_val, path.child(key.as_str()), work);
                }
            }
        }
    }

    let added: Vec<(PathSegment, &'a Value)> = b
        .iter()
        .filter(|(key, _)| !a.is_some_and(|a| a.contains_key(key.as_str())))
        .filter(|(key, _)| !options.is_ignored(path, key))
        .map(|(key, value)| (PathSegment::key(key.as_str()), value))
        .collect();
    push_additions(options, path, added, work);

    if let Some(a) = a {
        let deleted: Vec<(PathSegment, &'a Value)> = a
            .iter()
            .filter(|(key, _)| !b.contains_key(key.as_str()))
            .filter(|(key, _)| !options.is_ignored(path, key))
            .map(|(key, value)| (PathSegment::key(key.as_str()), value))
            .collect();
        push_removals(options, path, deleted, work);
    }
}

fn visit_sequence<'a>(
    options: &DiffOptions,
    a: &'a [Value],
    b: &'a [Value],
    path: &Path,
    work: &mut Vec<Work<'a>>,
) {
    let common = a.len().min(b.len());

    for (index, (a_val, b_val)) in a.iter().zip(b.iter()).enumerate() {
        common_child(options, a_val, b_val, path.child(index), work);
    }

    let added: Vec<(PathSegment, &'a Value)> = (common..b.len())
        .map(|index| (PathSegment::Index(index), &b[index]))
        .collect();
    push_additions(options, path, added, work);

    // Descending, so each removal is still valid against the original sequence
    let deleted: Vec<(PathSegment, &'a Value)> = (common..a.len())
        .rev()
        .map(|index| (PathSegment::Index(index), &a[index]))
        .collect();
    push_removals(options, path, deleted, work);
}

fn visit_set<'a>(a: &BTreeSet<Scalar>, b: &BTreeSet<Scalar>, path: &Path, work: &mut Vec<Work<'a>>) {
    let addition: BTreeSet<Scalar> = b.difference(a).cloned().collect();
    if !addition.is_empty() {
        work.push(Work::Emit(PatchEntry::add(
            path.clone(),
            vec![(PathSegment::Index(0), Value::Set(addition))],
        )));
    }

    let deletion: BTreeSet<Scalar> = a.difference(b).cloned().collect();
    if !deletion.is_empty() {
        work.push(Work::Emit(PatchEntry::remove(
            path.clone(),
            vec![(PathSegment::Index(0), Value::Set(deletion))],
        )));
    }
}

fn push_additions<'a>(
    options: &DiffOptions,
    path: &Path,
    added: Vec<(PathSegment, &'a Value)>,
    work: &mut Vec<Work<'a>>,
) {
    if added.is_empty() {
        return;
    }

    if options.path_limit.is_none() {
        let items = added.into_iter().map(|(k, v)| (k, v.clone())).collect();
        push_items(options.expand, path, items, PatchEntry::add, work);
        return;
    }

    let mut collected = Vec::with_capacity(added.len());
    let mut nested = Vec::new();
    for (key, value) in added {
        let child = path.child(key.clone());
        match value.container_kind() {
            Some(kind) if !options.is_limit(&child) => {
                collected.push((key, kind.empty()));
                nested.push(Work::Visit {
                    first: Origin::Empty(kind),
                    second: value,
                    path: child,
                });
            }
            _ => collected.push((key, value.clone())),
        }
    }
    push_items(options.expand, path, collected, PatchEntry::add, work);
    work.extend(nested);
}

fn push_removals<'a>(
    options: &DiffOptions,
    path: &Path,
    deleted: Vec<(PathSegment, &'a Value)>,
    work: &mut Vec<Work<'a>>,
) {
    if deleted.is_empty() {
        return;
    }
    let items = deleted.into_iter().map(|(k, v)| (k, v.clone())).collect();
    push_items(options.expand, path, items, PatchEntry::remove, work);
}

fn push_items(
    expand: bool,
    path: &Path,
    items: Vec<(PathSegment, Value)>,
    build: fn(Path, Vec<(PathSegment, Value)>) -> PatchEntry,
    work: &mut Vec<Work<'_>>,
) {
    if expand {
        for item in items {
            work.push(Work::Emit(build(path.clone(), vec![item])));
        }
    } else {
        work.push(Work::Emit(build(path.clone(), items)));
    }
}
