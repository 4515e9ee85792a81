//! Tests for grade thresholds and narrative position mapping.

use fumetti_core::{Grade, NarrativeFunction};

#[test]
fn grade_thresholds_match_the_documented_bands() {
    assert_eq!(Grade::from_score(100.0), Grade::APlus);
    assert_eq!(Grade::from_score(95.0), Grade::APlus);
    assert_eq!(Grade::from_score(94.9), Grade::A);
    assert_eq!(Grade::from_score(90.0), Grade::A);
    assert_eq!(Grade::from_score(89.9), Grade::AMinus);
    assert_eq!(Grade::from_score(85.0), Grade::AMinus);
    assert_eq!(Grade::from_score(80.0), Grade::BPlus);
    assert_eq!(Grade::from_score(75.0), Grade::B);
    assert_eq!(Grade::from_score(70.0), Grade::BMinus);
    assert_eq!(Grade::from_score(69.9), Grade::CPlus);
    assert_eq!(Grade::from_score(0.0), Grade::CPlus);
}

#[test]
fn grades_render_as_letters() {
    assert_eq!(Grade::APlus.to_string(), "A+");
    assert_eq!(Grade::BMinus.to_string(), "B-");
    assert_eq!(Grade::CPlus.to_string(), "C+");
}

#[test]
fn position_split_covers_the_whole_arc() {
    let total = 20;
    let functions: Vec<NarrativeFunction> = (0..total)
        .map(|i| NarrativeFunction::for_position(i, total))
        .collect();

    assert_eq!(functions[0], NarrativeFunction::Establish);
    assert_eq!(functions[total - 1], NarrativeFunction::Resolve);
    assert!(functions.contains(&NarrativeFunction::Develop));
    assert!(functions.contains(&NarrativeFunction::Climax));

    // The split is monotone: establish, develop, climax, resolve.
    let mut last_rank = 0;
    for function in functions {
        let rank = match function {
            NarrativeFunction::Establish => 0,
            NarrativeFunction::Develop => 1,
            NarrativeFunction::Climax => 2,
            NarrativeFunction::Resolve => 3,
        };
        assert!(rank >= last_rank, "arc went backwards");
        last_rank = rank;
    }
}

#[test]
fn single_panel_stories_establish() {
    assert_eq!(
        NarrativeFunction::for_position(0, 1),
        NarrativeFunction::Establish
    );
}
