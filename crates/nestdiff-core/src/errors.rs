use crate::merge::conflict::Conflict;
use nestdiff_core_types::RunId;
use thiserror::Error;

/// Result type alias using NestDiffError
pub type Result<T> = std::result::Result<T, NestDiffError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that callers can match on
/// without depending on message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Path resolution
    PathNotFound,
    IndexOutOfBounds,
    NotAContainer,
    SegmentMismatch,
    InvalidSetPayload,

    // Merge / resolution
    UnresolvedConflicts,
    PickCountMismatch,
    ResolutionNotSet,
    InvalidMergeState,

    // Configuration
    InvalidPathPattern,
    Config,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::PathNotFound => "ERR_PATH_NOT_FOUND",
            ExErrorKind::IndexOutOfBounds => "ERR_INDEX_OUT_OF_BOUNDS",
            ExErrorKind::NotAContainer => "ERR_NOT_A_CONTAINER",
            ExErrorKind::SegmentMismatch => "ERR_SEGMENT_MISMATCH",
            ExErrorKind::InvalidSetPayload => "ERR_INVALID_SET_PAYLOAD",
            ExErrorKind::UnresolvedConflicts => "ERR_UNRESOLVED_CONFLICTS",
            ExErrorKind::PickCountMismatch => "ERR_PICK_COUNT_MISMATCH",
            ExErrorKind::ResolutionNotSet => "ERR_RESOLUTION_NOT_SET",
            ExErrorKind::InvalidMergeState => "ERR_INVALID_MERGE_STATE",
            ExErrorKind::InvalidPathPattern => "ERR_INVALID_PATH_PATTERN",
            ExErrorKind::Config => "ERR_CONFIG",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification kind for programmatic handling plus optional
/// context (operation, path, run) for debugging.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    path: Option<String>,
    run_id: Option<RunId>,
    conflict_count: Option<usize>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            path: None,
            run_id: None,
            conflict_count: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add path context
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Add run ID context
    pub fn with_run_id(mut self, run_id: RunId) -> Self {
        self.run_id = Some(run_id);
        self
    }

    /// Add the number of conflicts involved
    pub fn with_conflict_count(mut self, count: usize) -> Self {
        self.conflict_count = Some(count);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn run_id(&self) -> Option<&RunId> {
        self.run_id.as_ref()
    }

    pub fn conflict_count(&self) -> Option<usize> {
        self.conflict_count
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path)?;
        }
        if let Some(count) = self.conflict_count {
            write!(f, " (conflicts: {})", count)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Error taxonomy for diff, patch and merge operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NestDiffError {
    // ===== Path Resolution =====
    /// A map key referenced by a patch does not exist
    #[error("Path not found: key '{segment}' missing under '{path}'")]
    PathNotFound { path: String, segment: String },

    /// A sequence index referenced by a patch is out of range
    #[error("Index {index} out of bounds (len {len}) under '{path}'")]
    IndexOutOfBounds {
        path: String,
        index: usize,
        len: usize,
    },

    /// A path walks through a value that has no children
    #[error("Value at '{path}' is a {kind}, not a container")]
    NotAContainer { path: String, kind: String },

    /// A segment kind does not fit the container (e.g. a non-numeric key into a sequence)
    #[error("Segment '{segment}' cannot address a {kind} at '{path}'")]
    SegmentMismatch {
        path: String,
        segment: String,
        kind: String,
    },

    /// A set was patched with something other than a set payload
    #[error("Set at '{path}' can only be patched with a set payload")]
    InvalidSetPayload { path: String },

    // ===== Merge / Resolution =====
    /// Conflicts remain after all registered actions were consulted
    #[error("{} conflict(s) could not be resolved automatically", conflicts.len())]
    UnresolvedConflicts { conflicts: Vec<Conflict> },

    /// Manual picks do not line up with the unresolved conflicts
    #[error("Expected {expected} pick(s) for unresolved conflicts, got {got}")]
    PickCountMismatch { expected: usize, got: usize },

    /// A conflict was consumed before a side was chosen
    #[error("Conflict at '{path}' has no resolution selected")]
    ResolutionNotSet { path: String },

    /// An orchestration step was invoked from the wrong state
    #[error("Cannot {op} while merge is in state {state}")]
    InvalidMergeState { op: String, state: String },

    // ===== Configuration =====
    /// A dotted path pattern could not be parsed
    #[error("Invalid path pattern '{pattern}': {reason}")]
    InvalidPathPattern { pattern: String, reason: String },

    /// Configuration could not be decoded
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ===== Generic Errors =====
    /// Generic internal error
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl NestDiffError {
    /// True for the one error that is an expected, recoverable merge outcome
    pub fn is_unresolved_conflicts(&self) -> bool {
        matches!(self, NestDiffError::UnresolvedConflicts { .. })
    }
}

/// Conversion from NestDiffError to ExError
impl From<NestDiffError> for ExError {
    fn from(err: NestDiffError) -> Self {
        match err {
            NestDiffError::PathNotFound { path, segment } => {
                ExError::new(ExErrorKind::PathNotFound)
                    .with_path(path)
                    .with_message(format!("key '{}' not found", segment))
            }

            NestDiffError::IndexOutOfBounds { path, index, len } => {
                ExError::new(ExErrorKind::IndexOutOfBounds)
                    .with_path(path)
                    .with_message(format!("index {} out of bounds (len {})", index, len))
            }

            NestDiffError::NotAContainer { path, kind } => {
                ExError::new(ExErrorKind::NotAContainer)
                    .with_path(path)
                    .with_message(format!("{} has no children", kind))
            }

            NestDiffError::SegmentMismatch {
                path,
                segment,
                kind,
            } => ExError::new(ExErrorKind::SegmentMismatch)
                .with_path(path)
                .with_message(format!("segment '{}' cannot address a {}", segment, kind)),

            NestDiffError::InvalidSetPayload { path } => {
                ExError::new(ExErrorKind::InvalidSetPayload)
                    .with_path(path)
                    .with_message("set patched with a non-set payload")
            }

            NestDiffError::UnresolvedConflicts { conflicts } => {
                ExError::new(ExErrorKind::UnresolvedConflicts)
                    .with_op("resolve_conflicts")
                    .with_conflict_count(conflicts.len())
                    .with_message("conflicts require manual resolution")
            }

            NestDiffError::PickCountMismatch { expected, got } => {
                ExError::new(ExErrorKind::PickCountMismatch)
                    .with_op("manual_resolve_conflicts")
                    .with_conflict_count(expected)
                    .with_message(format!("expected {} pick(s), got {}", expected, got))
            }

            NestDiffError::ResolutionNotSet { path } => {
                ExError::new(ExErrorKind::ResolutionNotSet)
                    .with_op("unify")
                    .with_path(path)
                    .with_message("conflict has no side selected")
            }

            NestDiffError::InvalidMergeState { op, state } => {
                ExError::new(ExErrorKind::InvalidMergeState)
                    .with_op(op)
                    .with_message(format!("merge is in state {}", state))
            }

            NestDiffError::InvalidPathPattern { pattern, reason } => {
                ExError::new(ExErrorKind::InvalidPathPattern)
                    .with_path(pattern)
                    .with_message(reason)
            }

            NestDiffError::Config { message } => {
                ExError::new(ExErrorKind::Config).with_message(message)
            }

            NestDiffError::Internal { message } => {
                ExError::new(ExErrorKind::Internal).with_message(message)
            }
        }
    }
}

impl From<toml::de::Error> for NestDiffError {
    fn from(err: toml::de::Error) -> Self {
        NestDiffError::Config {
            message: err.to_string(),
        }
    }
}
