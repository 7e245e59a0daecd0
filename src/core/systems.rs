//! Core domain: boot, camera, pause toggling, and game-over flow.

use bevy::ecs::message::MessageReader;
use bevy::prelude::*;

use crate::core::events::GameOverSignal;
use crate::core::resources::GameplayPaused;
use crate::core::GameState;

pub(crate) fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}

pub(crate) fn finish_boot(mut next_state: ResMut<NextState<GameState>>) {
    next_state.set(GameState::Playing);
}

const PAUSE_KEY_SOURCE: &str = "pause-key";

pub(crate) fn toggle_pause_key(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut paused: ResMut<GameplayPaused>,
) {
    if !keyboard.just_pressed(KeyCode::KeyP) {
        return;
    }

    if paused.sources.contains(PAUSE_KEY_SOURCE) {
        paused.unpause(PAUSE_KEY_SOURCE);
        info!("Gameplay resumed");
    } else {
        paused.pause(PAUSE_KEY_SOURCE);
        info!("Gameplay paused");
    }
}

pub(crate) fn handle_game_over(
    mut signals: MessageReader<GameOverSignal>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    for _signal in signals.read() {
        info!("Game over signal received, stopping the run");
        next_state.set(GameState::GameOver);
    }
}
