//! Core domain: tests for level progression derivation and pause sources.

use super::{GameplayPaused, LevelProgress, StagePhase};

#[test]
fn test_stage_derivation() {
    for (level, stage) in [(1, 1), (3, 1), (8, 1), (9, 2), (16, 2), (17, 3)] {
        let progress = LevelProgress { level };
        assert_eq!(progress.stage(), stage, "level {}", level);
    }
}

#[test]
fn test_stage_phase_derivation() {
    let cases = [
        (1, StagePhase::Early),
        (2, StagePhase::Early),
        (3, StagePhase::Early),
        (4, StagePhase::Mid),
        (6, StagePhase::Mid),
        (7, StagePhase::Late),
        (8, StagePhase::Late),
        // Derivation repeats per stage
        (9, StagePhase::Early),
        (12, StagePhase::Mid),
        (16, StagePhase::Late),
    ];
    for (level, phase) in cases {
        let progress = LevelProgress { level };
        assert_eq!(progress.stage_phase(), phase, "level {}", level);
    }
}

#[test]
fn test_pause_sources_combine() {
    let mut paused = GameplayPaused::default();
    assert!(!paused.is_paused());

    paused.pause("victory-overlay");
    paused.pause("pause-key");
    assert!(paused.is_paused());

    paused.unpause("victory-overlay");
    assert!(paused.is_paused(), "one source still active");

    paused.unpause("pause-key");
    assert!(!paused.is_paused());
}
