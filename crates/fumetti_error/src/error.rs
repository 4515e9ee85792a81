//! Top-level error wrapper types.

use crate::{ConfigError, PipelineError, RenderError, ScoringError};

/// The foundation error enum. Each Fumetti crate converts its domain error
/// into a variant here so callers can hold one type at the job boundary.
///
/// # Examples
///
/// ```
/// use fumetti_error::{FumettiError, RenderError, RenderErrorKind};
///
/// let render_err = RenderError::new(RenderErrorKind::Auth);
/// let err: FumettiError = render_err.into();
/// assert!(format!("{}", err).contains("Render Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum FumettiErrorKind {
    /// External render service error
    #[from(RenderError)]
    Render(RenderError),
    /// Pipeline orchestration error
    #[from(PipelineError)]
    Pipeline(PipelineError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Quality scoring error
    #[from(ScoringError)]
    Scoring(ScoringError),
}

/// Fumetti error with kind discrimination.
///
/// # Examples
///
/// ```
/// use fumetti_error::{FumettiResult, ConfigError};
///
/// fn might_fail() -> FumettiResult<()> {
///     Err(ConfigError::new("missing field"))?
/// }
///
/// match might_fail() {
///     Ok(_) => println!("Success"),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Fumetti Error: {}", _0)]
pub struct FumettiError(Box<FumettiErrorKind>);

impl FumettiError {
    /// Create a new error from a kind.
    pub fn new(kind: FumettiErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &FumettiErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to FumettiErrorKind
impl<T> From<T> for FumettiError
where
    T: Into<FumettiErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Fumetti operations.
///
/// # Examples
///
/// ```
/// use fumetti_error::{FumettiResult, PipelineError, PipelineErrorKind};
///
/// fn validate(story: &str) -> FumettiResult<()> {
///     if story.trim().is_empty() {
///         Err(PipelineError::new(PipelineErrorKind::InputValidation(
///             "story is empty".into(),
///         )))?
///     }
///     Ok(())
/// }
/// ```
pub type FumettiResult<T> = std::result::Result<T, FumettiError>;
