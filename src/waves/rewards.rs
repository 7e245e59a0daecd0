//! Wave domain: completion rewards dropped between waves.

use bevy::ecs::message::MessageReader;
use bevy::prelude::*;
use rand::Rng;

use super::events::WaveCompleted;
use super::placement::{SpawnQuery, find_spawn_position};
use super::systems::SpawnRng;
use crate::arena::Playfield;
use crate::enemies::{Ally, AttackStats, Health, Locomotion};
use crate::movement::Player;

/// A health pack on the ground.
#[derive(Component, Debug)]
pub struct Pickup {
    pub heal: u32,
}

pub const PICKUP_HEAL: u32 = 20;
pub const PICKUP_RADIUS: f32 = 30.0;
const ALLY_HEALTH: u32 = 60;
const ALLY_SPEED: f32 = 150.0;
const ALLY_DAMAGE: u32 = 6;

/// Drops a reward near the player after each wave. Even-numbered waves
/// also field a helper unit.
pub(crate) fn grant_wave_rewards(
    mut completions: MessageReader<WaveCompleted>,
    mut commands: Commands,
    mut rng: ResMut<SpawnRng>,
    playfield: Res<Playfield>,
    player_query: Query<&Transform, With<Player>>,
) {
    for completion in completions.read() {
        let Ok(player_transform) = player_query.single() else {
            continue;
        };
        let player_pos = player_transform.translation.truncate();

        let query = SpawnQuery::new(
            playfield.clamp(player_pos - Vec2::splat(150.0)),
            playfield.clamp(player_pos + Vec2::splat(150.0)),
        )
        .exclude(player_pos, 40.0);
        let position = find_spawn_position(&mut rng.0, &query)
            .unwrap_or(player_pos + Vec2::new(60.0, 0.0));

        commands.spawn((
            Pickup { heal: PICKUP_HEAL },
            Sprite {
                color: Color::srgb(0.9, 0.9, 0.3),
                custom_size: Some(Vec2::splat(14.0)),
                ..default()
            },
            Transform::from_xyz(position.x, position.y, 0.5),
        ));

        if completion.wave % 2 == 0 {
            let jitter = Vec2::new(rng.0.random_range(-80.0..=80.0), 40.0);
            let ally_pos = playfield.clamp(player_pos + jitter);
            commands.spawn((
                Ally::default(),
                Health::new(ALLY_HEALTH),
                Locomotion::new(ALLY_SPEED),
                AttackStats { damage: ALLY_DAMAGE },
                Sprite {
                    color: Color::srgb(0.3, 0.7, 0.9),
                    custom_size: Some(Vec2::splat(20.0)),
                    ..default()
                },
                Transform::from_xyz(ally_pos.x, ally_pos.y, 1.0),
            ));
        }
    }
}

/// Walks the player over pickups to consume them.
pub(crate) fn collect_pickups(
    mut commands: Commands,
    pickup_query: Query<(Entity, &Pickup, &Transform), Without<Player>>,
    mut player_query: Query<(&Transform, &mut Health), With<Player>>,
) {
    let Ok((player_transform, mut health)) = player_query.single_mut() else {
        return;
    };
    let player_pos = player_transform.translation.truncate();

    for (entity, pickup, transform) in &pickup_query {
        if transform.translation.truncate().distance(player_pos) < PICKUP_RADIUS {
            health.heal(pickup.heal);
            commands.entity(entity).despawn();
        }
    }
}
