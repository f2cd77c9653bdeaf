//! Error types for path checks.
//!
//! "No path found" is not an error: it is `Ok(false)` from
//! [`crate::BindingIter::next`]. Everything here is either a plan-construction
//! defect, invalid usage, or a failure bubbled up unchanged from storage.

use thiserror::Error;

use crate::binding::VarId;

/// Failure raised by an [`crate::EdgeIndex`] implementation.
#[derive(Error, Debug)]
pub enum StorageError {
    /// I/O fault while reading an index page
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Index page failed validation
    #[error("corrupt index page {page}: {detail}")]
    Corrupt { page: u64, detail: String },
}

/// Path check errors
#[derive(Error, Debug)]
pub enum PathError {
    /// An endpoint variable had no value at initialize time. The planner only
    /// emits a check when both endpoints are known, so this is an internal defect.
    #[error("internal error: endpoint variable {0} is unassigned in check mode")]
    UnboundEndpoint(VarId),

    /// Variable index outside the binding row
    #[error("variable {var} is outside the binding row (width {width})")]
    VariableOutOfRange { var: VarId, width: usize },

    /// `next` or `reset` before `initialize`
    #[error("operator not initialized - call initialize() before next()")]
    NotInitialized,

    /// `next` after an error ended the cycle
    #[error("operator failed earlier in this cycle - call initialize() or reset() first")]
    CycleFailed,

    /// Automaton failed validation at build time
    #[error("invalid automaton: {0}")]
    InvalidAutomaton(String),

    /// Label dictionary is full
    #[error("label dictionary exceeded maximum of {max} labels")]
    LabelOverflow { max: usize },

    /// Configured safety bound exceeded
    #[error("resource limit exceeded: {0}")]
    ResourceLimit(String),

    /// Option value out of range
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Options document could not be parsed
    #[error("options parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failure from the underlying index, passed through unchanged
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Result type for path check operations
pub type Result<T> = std::result::Result<T, PathError>;
