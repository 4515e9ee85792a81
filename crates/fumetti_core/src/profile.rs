//! Consistency constraints a job enforces across every panel.

use crate::AssetHandle;
use fumetti_error::{PipelineError, PipelineErrorKind};
use serde::{Deserialize, Serialize};

/// Cap on environment key features carried into prompts.
const MAX_KEY_FEATURES: usize = 6;
/// Cap on palette entries carried into prompts.
const MAX_PALETTE: usize = 5;

/// Structured description of the recurring character's appearance.
///
/// Built once per job, either from the vision collaborator's analysis of a
/// reference image or from caller-supplied text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct IdentityDescriptor {
    /// Physical features (hair, build, clothing)
    #[serde(default)]
    pub features: Vec<String>,
    /// Character color palette
    #[serde(default)]
    pub palette: Vec<String>,
    /// Distinctive marks that must appear in every panel
    #[serde(default)]
    pub distinctive_marks: Vec<String>,
    /// Free-text one-line summary
    #[serde(default)]
    pub summary: String,
}

impl IdentityDescriptor {
    /// True when the descriptor carries no usable identity content.
    pub fn is_trivial(&self) -> bool {
        self.summary.trim().is_empty()
            && self.features.iter().all(|f| f.trim().is_empty())
            && self.palette.iter().all(|p| p.trim().is_empty())
            && self.distinctive_marks.iter().all(|m| m.trim().is_empty())
    }

    /// Minimal placeholder used when only a reference asset exists.
    pub fn placeholder() -> Self {
        Self {
            summary: "match the supplied reference image exactly".to_string(),
            ..Default::default()
        }
    }
}

/// Recurring setting constraints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct EnvironmentProfile {
    /// Location name
    #[serde(default)]
    pub location: String,
    /// Key visual features of the setting, ordered by salience
    #[serde(default)]
    pub key_features: Vec<String>,
    /// Lighting mood
    #[serde(default)]
    pub lighting: String,
    /// Time of day
    #[serde(default)]
    pub time_of_day: String,
    /// Dominant color palette, ordered
    #[serde(default)]
    pub palette: Vec<String>,
    /// Objects that recur across panels
    #[serde(default)]
    pub recurring_objects: Vec<String>,
}

/// Per-job identity constraints, immutable once constructed.
///
/// Construction enforces the core invariant: when no reference asset is
/// supplied, the identity descriptor must be non-trivial. A job holding a
/// profile with neither has nothing to keep consistent and must not render.
///
/// # Examples
///
/// ```
/// use fumetti_core::{ConsistencyProfile, EnvironmentProfile, IdentityDescriptor};
///
/// let identity = IdentityDescriptor {
///     summary: "a red-cloaked fox with one torn ear".into(),
///     ..Default::default()
/// };
/// let profile =
///     ConsistencyProfile::new(identity, EnvironmentProfile::default(), None).unwrap();
/// assert!(profile.reference_asset().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
pub struct ConsistencyProfile {
    /// Previously rendered reference image, if one exists
    reference_asset: Option<AssetHandle>,
    /// Character appearance constraints
    identity: IdentityDescriptor,
    /// Setting constraints
    environment: EnvironmentProfile,
}

impl ConsistencyProfile {
    /// Construct a profile, validating the identity invariant and clamping
    /// over-long constraint lists.
    ///
    /// # Errors
    ///
    /// Returns `MissingConsistencyProfile` when the descriptor is trivial
    /// and no reference asset is supplied.
    pub fn new(
        identity: IdentityDescriptor,
        mut environment: EnvironmentProfile,
        reference_asset: Option<AssetHandle>,
    ) -> Result<Self, PipelineError> {
        let identity = if identity.is_trivial() {
            if reference_asset.is_none() {
                return Err(PipelineError::new(
                    PipelineErrorKind::MissingConsistencyProfile,
                ));
            }
            IdentityDescriptor::placeholder()
        } else {
            identity
        };

        environment.key_features.truncate(MAX_KEY_FEATURES);
        environment.palette.truncate(MAX_PALETTE);

        Ok(Self {
            reference_asset,
            identity,
            environment,
        })
    }

    /// True when a reference asset anchors the character identity.
    pub fn has_reference(&self) -> bool {
        self.reference_asset.is_some()
    }
}
