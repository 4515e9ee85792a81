//! Tests for consistency profile invariants.

use fumetti_core::{AssetHandle, ConsistencyProfile, EnvironmentProfile, IdentityDescriptor};
use fumetti_error::PipelineErrorKind;

#[test]
fn trivial_identity_without_reference_is_rejected() {
    let err = ConsistencyProfile::new(
        IdentityDescriptor::default(),
        EnvironmentProfile::default(),
        None,
    )
    .expect_err("nothing to keep consistent");
    assert!(matches!(
        err.kind,
        PipelineErrorKind::MissingConsistencyProfile
    ));
}

#[test]
fn whitespace_only_identity_counts_as_trivial() {
    let identity = IdentityDescriptor {
        features: vec!["   ".into()],
        summary: " ".into(),
        ..Default::default()
    };
    assert!(identity.is_trivial());

    let err = ConsistencyProfile::new(identity, EnvironmentProfile::default(), None)
        .expect_err("whitespace is not an identity");
    assert!(matches!(
        err.kind,
        PipelineErrorKind::MissingConsistencyProfile
    ));
}

#[test]
fn reference_alone_yields_a_placeholder_descriptor() {
    let profile = ConsistencyProfile::new(
        IdentityDescriptor::default(),
        EnvironmentProfile::default(),
        Some(AssetHandle::new("ref-1")),
    )
    .expect("reference anchors the identity");

    assert!(profile.has_reference());
    assert!(!profile.identity().is_trivial());
}

#[test]
fn descriptor_alone_is_sufficient() {
    let identity = IdentityDescriptor {
        summary: "a small fox in a red cloak".into(),
        ..Default::default()
    };
    let profile =
        ConsistencyProfile::new(identity, EnvironmentProfile::default(), None).expect("valid");
    assert!(!profile.has_reference());
}

#[test]
fn oversized_environment_lists_are_clamped() {
    let identity = IdentityDescriptor {
        summary: "a small fox".into(),
        ..Default::default()
    };
    let environment = EnvironmentProfile {
        key_features: (0..12).map(|i| format!("feature {i}")).collect(),
        palette: (0..9).map(|i| format!("color {i}")).collect(),
        ..Default::default()
    };
    let profile = ConsistencyProfile::new(identity, environment, None).expect("valid");

    assert!(profile.environment().key_features.len() <= 6);
    assert!(profile.environment().palette.len() <= 5);
    // Order is preserved through the clamp.
    assert_eq!(profile.environment().key_features[0], "feature 0");
}
