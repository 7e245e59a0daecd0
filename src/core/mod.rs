//! Core domain: run state, level progression, and pause handling.

mod events;
mod resources;
mod systems;

#[cfg(test)]
mod tests;

pub use events::GameOverSignal;
pub use resources::{GameplayPaused, LevelProgress, RunSeed, StagePhase, gameplay_active};

use bevy::prelude::*;

use crate::core::systems::{finish_boot, handle_game_over, setup_camera, toggle_pause_key};

#[derive(States, Debug, Hash, Eq, PartialEq, Clone, Default)]
pub enum GameState {
    #[default]
    Boot,
    Playing,
    GameOver,
}

pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<GameState>()
            .init_resource::<RunSeed>()
            .init_resource::<LevelProgress>()
            .init_resource::<GameplayPaused>()
            .add_message::<GameOverSignal>()
            .add_systems(Startup, setup_camera)
            .add_systems(Update, finish_boot.run_if(in_state(GameState::Boot)))
            .add_systems(
                Update,
                (toggle_pause_key, handle_game_over).run_if(in_state(GameState::Playing)),
            );
    }
}
