//! UI domain: HUD and end-of-run overlay.

mod hud;

use bevy::prelude::*;

use crate::core::GameState;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GameState::Playing), hud::setup_hud)
            .add_systems(
                Update,
                (
                    hud::update_wave_counter,
                    hud::update_level_label,
                    hud::update_health_label,
                )
                    .run_if(in_state(GameState::Playing)),
            )
            .add_systems(OnEnter(GameState::GameOver), hud::show_game_over);
    }
}
