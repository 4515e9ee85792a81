//! Core data types for the Fumetti comic generation pipeline.
//!
//! This crate provides the foundation data types shared across the Fumetti
//! workspace: the consistency profile that pins a recurring character and
//! setting across panels, the beat sequence that maps story moments to
//! panels, and the rendered output contract (panels, pages, quality report).

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod asset;
mod audience;
mod beat;
mod comic;
mod panel;
mod profile;
mod quality;
mod telemetry;

pub use asset::{AssetHandle, RenderedAsset, SizeHint};
pub use audience::AudienceTier;
pub use beat::{Beat, BeatBuilder, BeatParse, NarrativeFunction, RawBeat, VisualPriority};
pub use comic::{Comic, GenerationMetadata};
pub use panel::{Page, Panel, PanelResult};
pub use profile::{ConsistencyProfile, EnvironmentProfile, IdentityDescriptor};
pub use quality::{Grade, QualityReport, SubScores};
pub use telemetry::init_telemetry;
