//! Wave domain: scheduler bookkeeping for the active wave.

use bevy::prelude::*;

use super::budget::TypeBudget;
use crate::timing::TimerHandle;

/// Waves per level. The last wave is the boss wave.
pub const TOTAL_WAVES: u32 = 5;

/// Extra enemies shown on the boss wave counter. Display only; the
/// scheduler's own counters never include it.
pub const BOSS_DISPLAY_BONUS: u32 = 5;

/// Counters and handles for the wave currently running (or cooling
/// down). Invariant: killed <= spawned <= planned_total at all times.
#[derive(Resource, Debug, Default)]
pub struct WaveState {
    pub wave_number: u32,
    pub active: bool,
    pub cooling_down: bool,
    pub planned_total: u32,
    pub spawned: u32,
    pub killed: u32,
    pub budget: TypeBudget,
    pub display_bonus: u32,
    pub spawn_tick: Option<TimerHandle>,
    pub stall_timeout: Option<TimerHandle>,
}

impl WaveState {
    pub fn is_boss_wave(&self) -> bool {
        self.wave_number == TOTAL_WAVES
    }

    pub fn remaining_to_spawn(&self) -> u32 {
        self.planned_total.saturating_sub(self.spawned)
    }

    /// Completion is only considered organic when enough of what was
    /// spawned actually died; otherwise the wave is assumed stuck and
    /// gets force-completed.
    pub fn ratio_guard_met(&self) -> bool {
        let required = (self.spawned as f32 * 0.5).ceil() as u32;
        self.killed >= required.max(1)
    }

    /// Planned counter as shown to the player. The bonus pads the
    /// display only; completion logic never reads it.
    pub fn displayed_planned(&self) -> u32 {
        self.planned_total + self.display_bonus
    }

    /// Spawned counter as shown to the player, padded the same way.
    pub fn displayed_spawned(&self) -> u32 {
        self.spawned + self.display_bonus
    }

    pub fn reset_counters(&mut self) {
        self.active = false;
        self.cooling_down = false;
        self.planned_total = 0;
        self.spawned = 0;
        self.killed = 0;
        self.budget = TypeBudget::default();
        self.display_bonus = 0;
        self.spawn_tick = None;
        self.stall_timeout = None;
    }
}

/// Size of the opening burst for a wave: enough enemies that the wave is
/// immediately visible, never more than what is planned.
pub fn visibility_burst(planned: u32) -> u32 {
    let quarter = (planned as f32 * 0.25).ceil() as u32;
    quarter.max(3).min(planned)
}
