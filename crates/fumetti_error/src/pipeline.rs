//! Pipeline error types.

use crate::RenderErrorKind;

/// Specific error conditions for pipeline operations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum PipelineErrorKind {
    /// Story or audience input rejected before any external call
    #[display("Invalid input: {}", _0)]
    InputValidation(String),
    /// Panel rendering attempted without a constructed consistency profile
    #[display("Consistency profile missing: rendering requires identity constraints")]
    MissingConsistencyProfile,
    /// A panel inside a batch failed, aborting the job
    #[display("Batch aborted at panel {}: {}", position, cause)]
    BatchAborted {
        /// Zero-based position of the failing panel
        position: usize,
        /// Upstream failure that sank the batch
        cause: RenderErrorKind,
    },
    /// Job wall-clock budget exceeded at a batch boundary
    #[display("Deadline exceeded after {} completed panels", completed)]
    DeadlineExceeded {
        /// Number of panels fully rendered before the deadline hit
        completed: usize,
    },
    /// Result list length did not match the beat list length
    #[display("Panel count mismatch: expected {}, got {}", expected, actual)]
    PanelCountMismatch {
        /// Number of beats handed to the assembler
        expected: usize,
        /// Number of panel results received
        actual: usize,
    },
    /// Beat generation collaborator failed outright
    #[display("Beat source failed: {}", _0)]
    BeatSource(String),
    /// Reference description collaborator failed
    #[display("Reference analysis failed: {}", _0)]
    Reference(String),
    /// Object store failed to persist a rendered asset
    #[display("Asset persistence failed: {}", _0)]
    Storage(String),
}

/// Pipeline error with source location tracking.
///
/// # Examples
///
/// ```
/// use fumetti_error::{PipelineError, PipelineErrorKind};
///
/// let err = PipelineError::new(PipelineErrorKind::InputValidation(
///     "story is empty".into(),
/// ));
/// assert!(format!("{}", err).contains("Invalid input"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Pipeline Error: {} at line {} in {}", kind, line, file)]
pub struct PipelineError {
    /// The specific error condition
    pub kind: PipelineErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl PipelineError {
    /// Create a new PipelineError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: PipelineErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
