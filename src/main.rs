mod arena;
mod core;
mod enemies;
mod movement;
mod timing;
mod ui;
mod waves;

use bevy::prelude::*;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Stormline".to_string(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins((
            core::CorePlugin,
            arena::ArenaPlugin,
            movement::MovementPlugin,
            enemies::EnemiesPlugin,
            waves::WavesPlugin,
            ui::UiPlugin,
        ))
        .run();
}
