//! Wave domain: level and wave orchestration.
//!
//! A level runs a fixed number of waves; the last is the boss wave.
//! Waves spawn from a scaled per-type budget on a steady tick, complete
//! when everything planned is out and dead, and get forced closed when
//! the counters or a stall timeout say they cannot finish on their own.

mod budget;
mod events;
mod placement;
mod rewards;
mod state;
mod systems;
mod table;

#[cfg(test)]
mod tests;

pub use budget::{BUDGET_SCALE, TypeBudget, pick_archetype, scale_budget};
pub use events::{StartLevel, WaveCompleted, WaveCountersChanged};
pub use placement::{DEFAULT_ATTEMPTS, SpawnQuery, find_spawn_position};
pub use state::{TOTAL_WAVES, WaveState};
pub use table::{WaveRow, WaveTable, WaveTableError, load_wave_table};

use bevy::prelude::*;

use crate::core::{GameState, gameplay_active};
use self::systems::{SpawnRng, WaveActionFired, WaveTimers};

pub struct WavesPlugin;

impl Plugin for WavesPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WaveState>()
            .init_resource::<WaveTimers>()
            .init_resource::<SpawnRng>()
            .add_message::<StartLevel>()
            .add_message::<WaveCompleted>()
            .add_message::<WaveCountersChanged>()
            .add_message::<WaveActionFired>()
            .add_systems(Startup, table::setup_wave_table)
            .add_systems(OnEnter(GameState::Playing), systems::begin_run)
            .add_systems(OnEnter(GameState::GameOver), systems::cleanup_run)
            .add_systems(
                Update,
                (
                    systems::dispatch_wave_timers,
                    systems::handle_enemy_killed,
                    systems::handle_spawn_minion,
                    systems::run_wave_scheduler,
                    rewards::grant_wave_rewards,
                    rewards::collect_pickups,
                )
                    .chain()
                    .run_if(in_state(GameState::Playing))
                    .run_if(gameplay_active),
            );
    }
}
