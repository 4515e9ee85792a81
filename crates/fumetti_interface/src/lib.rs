//! Collaborator traits for the Fumetti comic generation pipeline.
//!
//! The orchestrator talks to five external collaborators, each modeled here
//! as an async trait at its interface boundary only: the text-beat
//! generator, the vision/identity extractor, the generative render service,
//! the object store, and the learning/feedback sink. Transport details live
//! entirely behind these traits.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;

pub use traits::{
    AssetStore, BeatSource, FeedbackContext, FeedbackSink, PanelRenderer, ReferenceDescriber,
};
