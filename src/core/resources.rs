//! Core domain: shared resources for run seeding, progression, and pause.

use bevy::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Resource tracking if gameplay should be paused.
/// Gameplay is paused if any source is active.
#[derive(Resource, Debug, Default)]
pub struct GameplayPaused {
    pub sources: HashSet<String>,
}

impl GameplayPaused {
    pub fn is_paused(&self) -> bool {
        !self.sources.is_empty()
    }

    pub fn pause(&mut self, source: impl Into<String>) {
        self.sources.insert(source.into());
    }

    pub fn unpause(&mut self, source: impl Into<String>) {
        self.sources.remove(&source.into());
    }
}

/// Run condition: returns true only when gameplay is not paused
pub fn gameplay_active(paused: Res<GameplayPaused>) -> bool {
    !paused.is_paused()
}

/// Seed for the run's reproducible RNG streams (spawn placement, draws).
#[derive(Resource, Debug)]
pub struct RunSeed {
    pub seed: u64,
}

impl Default for RunSeed {
    fn default() -> Self {
        Self {
            seed: rand::rng().random(),
        }
    }
}

/// Coarse grouping of levels within a stage, used to index difficulty
/// tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StagePhase {
    Early,
    Mid,
    Late,
}

/// Tracks the current level across the run. Advances only when a level
/// completes; stage and stage phase are derived, never stored.
#[derive(Resource, Debug)]
pub struct LevelProgress {
    pub level: u32,
}

impl Default for LevelProgress {
    fn default() -> Self {
        Self { level: 1 }
    }
}

pub const LEVELS_PER_STAGE: u32 = 8;

impl LevelProgress {
    /// 1-based stage index: levels 1-8 are stage 1, 9-16 stage 2, and so on.
    pub fn stage(&self) -> u32 {
        self.level.div_ceil(LEVELS_PER_STAGE).max(1)
    }

    /// Phase within the stage. The last levels of a stage (7, 8) read as
    /// late; 1-3 early, 4-6 mid.
    pub fn stage_phase(&self) -> StagePhase {
        match self.level % LEVELS_PER_STAGE {
            1..=3 => StagePhase::Early,
            4..=6 => StagePhase::Mid,
            _ => StagePhase::Late,
        }
    }
}
