//! Error types for the Fumetti comic generation pipeline.
//!
//! This crate provides the foundation error types used throughout the Fumetti
//! workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern for clean error
//! handling:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use fumetti_error::{FumettiResult, ConfigError};
//!
//! fn load_settings() -> FumettiResult<String> {
//!     Err(ConfigError::new("missing batch_width"))?
//! }
//!
//! match load_settings() {
//!     Ok(data) => println!("Got: {}", data),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod pipeline;
mod render;
mod scoring;

pub use config::ConfigError;
pub use error::{FumettiError, FumettiErrorKind, FumettiResult};
pub use pipeline::{PipelineError, PipelineErrorKind};
pub use render::{RenderError, RenderErrorKind, RetryableError};
pub use scoring::{ScoringError, ScoringErrorKind};
