//! Tests for prompt compilation: bounds, priorities, determinism.

mod common;

use common::pipeline_config;
use fumetti_core::{
    AssetHandle, Beat, ConsistencyProfile, EnvironmentProfile, IdentityDescriptor,
    NarrativeFunction, VisualPriority,
};
use fumetti_pipeline::PromptCompiler;

fn profile() -> ConsistencyProfile {
    let identity = IdentityDescriptor {
        features: vec!["red cloak".into(), "torn left ear".into()],
        palette: vec!["rust orange".into(), "cream".into()],
        distinctive_marks: vec!["white tail tip".into()],
        summary: "a small fox in a red cloak".into(),
    };
    let environment = EnvironmentProfile {
        location: "the old forest".into(),
        key_features: vec!["crooked pines".into(), "a stone arch".into()],
        lighting: "soft golden".into(),
        time_of_day: "dusk".into(),
        palette: vec!["amber".into(), "deep green".into()],
        recurring_objects: vec!["a brass lantern".into()],
    };
    ConsistencyProfile::new(identity, environment, Some(AssetHandle::new("ref-1"))).unwrap()
}

fn beat() -> Beat {
    Beat {
        summary: "The fox finds a door in the forest".into(),
        emotion: "curious".into(),
        character_action: "reaches for the handle".into(),
        environment: "a mossy clearing".into(),
        visual_priority: VisualPriority::Character,
        narrative_function: NarrativeFunction::Develop,
        dialogue: Some("Who left this here?".into()),
        has_speech_bubble: true,
        previous_beat_summary: Some("The fox follows a strange sound".into()),
    }
}

fn oversized_beat() -> Beat {
    Beat {
        summary: "An extremely long summary. ".repeat(60),
        emotion: "overwhelmed".into(),
        character_action: "does a great many things at once, ".repeat(30),
        environment: "a setting described at exhausting length, ".repeat(30),
        ..beat()
    }
}

#[test]
fn identical_inputs_compile_to_identical_payloads() {
    let config = pipeline_config("");
    let compiler = PromptCompiler::new(&config);
    let profile = profile();
    let beat = beat();

    let first = compiler.compile(&beat, &profile, 3, 10, Some("prior panel"));
    for _ in 0..5 {
        let again = compiler.compile(&beat, &profile, 3, 10, Some("prior panel"));
        assert_eq!(first, again);
    }
}

#[test]
fn payload_never_exceeds_the_ceiling() {
    let config = pipeline_config("max_payload_len = 500\nidentity_floor = 100");
    let compiler = PromptCompiler::new(&config);
    let profile = profile();
    let beat = oversized_beat();

    for position in 0..10 {
        let payload = compiler.compile(&beat, &profile, position, 10, None);
        assert!(
            payload.chars().count() <= 500,
            "position {position}: {} chars",
            payload.chars().count()
        );
    }
}

#[test]
fn identity_survives_compression_first() {
    let config = pipeline_config("max_payload_len = 500\nidentity_floor = 100");
    let compiler = PromptCompiler::new(&config);
    let payload = compiler.compile(&oversized_beat(), &profile(), 4, 10, None);

    assert!(payload.starts_with("Recurring character"));
    assert!(payload.contains("red cloak") || payload.contains("a small fox"));
}

#[test]
fn compression_drops_dialogue_before_style() {
    // Wide enough that dropping the dialogue section alone brings the
    // payload under the ceiling.
    let config = pipeline_config("max_payload_len = 800\nidentity_floor = 100");
    let compiler = PromptCompiler::new(&config);
    let mut beat = beat();
    beat.dialogue = Some("a monologue ".repeat(30));

    let full = compiler.compile(&beat, &profile(), 4, 10, None);
    assert!(full.chars().count() <= 800);
    assert!(!full.contains("Speech bubble"));
    assert!(full.contains("Style:"));
}

#[test]
fn untruncated_payload_carries_every_section() {
    let config = pipeline_config("max_payload_len = 4000\nidentity_floor = 100");
    let compiler = PromptCompiler::new(&config);
    let payload = compiler.compile(&beat(), &profile(), 3, 10, Some("the prior panel"));

    assert!(payload.contains("Recurring character"));
    assert!(payload.contains("Panel 4 of 10"));
    assert!(payload.contains("Setting:"));
    assert!(payload.contains("Style:"));
    assert!(payload.contains("Speech bubble"));
    assert!(payload.contains("Continues directly from"));
    assert!(payload.contains("ref-1"));
}

#[test]
fn identity_is_never_cut_below_the_floor() {
    let config = pipeline_config("max_payload_len = 300\nidentity_floor = 250");
    let compiler = PromptCompiler::new(&config);

    let identity = IdentityDescriptor {
        features: (0..20).map(|i| format!("feature number {i}")).collect(),
        palette: vec!["rust orange".into()],
        distinctive_marks: vec!["white tail tip".into()],
        summary: "a small fox in a red cloak with many distinguishing details".into(),
    };
    let profile =
        ConsistencyProfile::new(identity, EnvironmentProfile::default(), None).unwrap();

    let payload = compiler.compile(&oversized_beat(), &profile, 4, 10, None);
    let len = payload.chars().count();
    assert!(len <= 300, "payload is {len} chars");
    assert!(len >= 250, "identity was cut below the floor: {len} chars");
    assert!(payload.starts_with("Recurring character"));
}

#[test]
fn climax_panels_are_framed_as_the_peak() {
    let config = pipeline_config("");
    let compiler = PromptCompiler::new(&config);
    let mut beat = beat();
    beat.narrative_function = NarrativeFunction::Climax;

    let payload = compiler.compile(&beat, &profile(), 7, 10, None);
    assert!(payload.contains("the dramatic peak"));
}
