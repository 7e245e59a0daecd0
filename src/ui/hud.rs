//! HUD text for level, wave counters, and player health.

use bevy::ecs::message::MessageReader;
use bevy::prelude::*;

use crate::core::LevelProgress;
use crate::enemies::Health;
use crate::movement::Player;
use crate::waves::WaveCountersChanged;

#[derive(Component)]
pub(crate) struct WaveCounterText;

#[derive(Component)]
pub(crate) struct LevelText;

#[derive(Component)]
pub(crate) struct HealthText;

pub(crate) fn setup_hud(mut commands: Commands) {
    commands.spawn((
        LevelText,
        Text::new("Level 1"),
        TextFont {
            font_size: 22.0,
            ..default()
        },
        TextColor(Color::WHITE),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(12.0),
            left: Val::Px(16.0),
            ..default()
        },
    ));

    commands.spawn((
        WaveCounterText,
        Text::new("Wave -"),
        TextFont {
            font_size: 22.0,
            ..default()
        },
        TextColor(Color::srgb(0.9, 0.85, 0.5)),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(12.0),
            right: Val::Px(16.0),
            ..default()
        },
    ));

    commands.spawn((
        HealthText,
        Text::new("HP 100/100"),
        TextFont {
            font_size: 22.0,
            ..default()
        },
        TextColor(Color::srgb(0.5, 0.9, 0.5)),
        Node {
            position_type: PositionType::Absolute,
            bottom: Val::Px(12.0),
            left: Val::Px(16.0),
            ..default()
        },
    ));
}

pub(crate) fn update_wave_counter(
    mut counters: MessageReader<WaveCountersChanged>,
    mut query: Query<&mut Text, With<WaveCounterText>>,
) {
    let Some(snapshot) = counters.read().last() else {
        return;
    };
    let Ok(mut text) = query.single_mut() else {
        return;
    };
    **text = format!(
        "Wave {}/{}  {}/{} down  ({} inbound)",
        snapshot.wave, snapshot.total_waves, snapshot.killed, snapshot.planned, snapshot.remaining
    );
}

pub(crate) fn update_level_label(
    progress: Res<LevelProgress>,
    mut query: Query<&mut Text, With<LevelText>>,
) {
    if !progress.is_changed() {
        return;
    }
    let Ok(mut text) = query.single_mut() else {
        return;
    };
    **text = format!("Level {}", progress.level);
}

pub(crate) fn update_health_label(
    player_query: Query<&Health, (With<Player>, Changed<Health>)>,
    mut query: Query<&mut Text, With<HealthText>>,
) {
    let Ok(health) = player_query.single() else {
        return;
    };
    let Ok(mut text) = query.single_mut() else {
        return;
    };
    **text = format!("HP {}/{}", health.current, health.max);
}

pub(crate) fn show_game_over(mut commands: Commands) {
    commands.spawn((
        Text::new("Run over"),
        TextFont {
            font_size: 48.0,
            ..default()
        },
        TextColor(Color::srgb(0.95, 0.3, 0.3)),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Percent(42.0),
            left: Val::Percent(42.0),
            ..default()
        },
    ));
}
