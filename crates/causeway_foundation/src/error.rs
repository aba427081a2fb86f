//! Error types for Causeway.
//!
//! Uses `thiserror` for ergonomic error definition. Missing data is never an
//! error in Causeway: lookups return `Option`. Errors are reserved for
//! malformed recorder call sequences and for boundary codec failures.

use thiserror::Error;

use crate::refs::RefKind;

/// The main error type for Causeway operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional free-form context about where the error occurred.
    pub context: Option<String>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Creates an unknown ref error.
    #[must_use]
    pub fn unknown_ref(kind: RefKind, id: u32) -> Self {
        Self::new(ErrorKind::UnknownRef { kind, id })
    }

    /// Creates an unbalanced task error.
    #[must_use]
    pub fn unbalanced_task() -> Self {
        Self::new(ErrorKind::UnbalancedTask)
    }

    /// Creates an unbalanced trace context error.
    #[must_use]
    pub fn unbalanced_trace() -> Self {
        Self::new(ErrorKind::UnbalancedTrace)
    }

    /// Creates an error for a ref kind whose id space is used up.
    #[must_use]
    pub fn ids_exhausted(kind: RefKind) -> Self {
        Self::new(ErrorKind::IdsExhausted(kind))
    }

    /// Creates a malformed request error.
    #[must_use]
    pub fn malformed_request(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedRequest(message.into()))
    }

    /// Creates a codec error.
    #[must_use]
    pub fn codec(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Codec(message.into()))
    }

    /// Returns true if this error is a violation of the recorder's call
    /// contract (as opposed to a boundary failure).
    #[must_use]
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::UnknownRef { .. } | ErrorKind::UnbalancedTask | ErrorKind::UnbalancedTrace
        )
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// A ref that this recorder never minted was passed to a recording call.
    #[error("unknown {kind} ref: {id}")]
    UnknownRef {
        /// The kind of ref.
        kind: RefKind,
        /// The raw id.
        id: u32,
    },

    /// `end_task` was called with no task started.
    #[error("end_task called without a matching start_task")]
    UnbalancedTask,

    /// `leave_event` was called with no event entered.
    #[error("leave_event called without a matching enter_event")]
    UnbalancedTrace,

    /// Every id of a ref kind has been handed out.
    #[error("no {0} ids left")]
    IdsExhausted(RefKind),

    /// A request on the query boundary could not be understood.
    #[error("malformed request: {0}")]
    MalformedRequest(String),

    /// Encoding or decoding a boundary payload failed.
    #[error("codec error: {0}")]
    Codec(String),
}

/// Result type alias for Causeway operations.
pub type Result<T> = std::result::Result<T, Error>;
