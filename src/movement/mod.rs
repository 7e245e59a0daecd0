//! Movement domain: the player avatar and keyboard-driven locomotion.

use bevy::prelude::*;

use crate::arena::{Playfield, TerrainGrid};
use crate::core::{GameState, gameplay_active};
use crate::enemies::{Enemy, Health, ShotPayload, spawn_projectile};

#[derive(Component)]
pub struct Player;

/// Raw movement intent for the frame, normalized when diagonal.
#[derive(Resource, Debug, Default)]
pub struct MovementInput {
    pub axis: Vec2,
}

#[derive(Resource, Debug)]
pub struct PlayerTuning {
    pub move_speed: f32,
    pub max_health: u32,
    pub attack_damage: u32,
    pub attack_range: f32,
    pub projectile_speed: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            move_speed: 260.0,
            max_health: 100,
            attack_damage: 12,
            attack_range: 380.0,
            projectile_speed: 480.0,
        }
    }
}

/// Auto-fire interval for the player's shots.
const ATTACK_INTERVAL: f32 = 0.5;

#[derive(Resource)]
struct AttackTimer {
    timer: Timer,
    shots: u32,
}

impl Default for AttackTimer {
    fn default() -> Self {
        Self {
            timer: Timer::from_seconds(ATTACK_INTERVAL, TimerMode::Repeating),
            shots: 0,
        }
    }
}

fn spawn_player(mut commands: Commands, tuning: Res<PlayerTuning>) {
    commands.spawn((
        Player,
        Health::new(tuning.max_health),
        Sprite {
            color: Color::srgb(0.3, 0.8, 0.4),
            custom_size: Some(Vec2::splat(28.0)),
            ..default()
        },
        Transform::from_xyz(0.0, 0.0, 1.0),
    ));
}

fn read_move_input(keyboard: Res<ButtonInput<KeyCode>>, mut input: ResMut<MovementInput>) {
    let mut axis = Vec2::ZERO;
    if keyboard.pressed(KeyCode::KeyW) || keyboard.pressed(KeyCode::ArrowUp) {
        axis.y += 1.0;
    }
    if keyboard.pressed(KeyCode::KeyS) || keyboard.pressed(KeyCode::ArrowDown) {
        axis.y -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyA) || keyboard.pressed(KeyCode::ArrowLeft) {
        axis.x -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyD) || keyboard.pressed(KeyCode::ArrowRight) {
        axis.x += 1.0;
    }
    input.axis = axis.normalize_or_zero();
}

fn apply_player_movement(
    time: Res<Time>,
    input: Res<MovementInput>,
    tuning: Res<PlayerTuning>,
    playfield: Res<Playfield>,
    terrain: Res<TerrainGrid>,
    mut query: Query<&mut Transform, With<Player>>,
) {
    let Ok(mut transform) = query.single_mut() else {
        return;
    };

    let position = transform.translation.truncate();
    let speed = tuning.move_speed * terrain.slow_factor_at(position);
    let next = playfield.clamp(position + input.axis * speed * time.delta_secs());
    transform.translation.x = next.x;
    transform.translation.y = next.y;
}

/// Fires at the nearest enemy in range on a steady beat.
fn auto_attack(
    time: Res<Time>,
    mut timer: ResMut<AttackTimer>,
    tuning: Res<PlayerTuning>,
    mut commands: Commands,
    player_query: Query<&Transform, (With<Player>, Without<Enemy>)>,
    enemy_query: Query<&Transform, With<Enemy>>,
) {
    timer.timer.tick(time.delta());
    if !timer.timer.is_finished() {
        return;
    }
    let Ok(player_transform) = player_query.single() else {
        return;
    };
    let player_pos = player_transform.translation.truncate();

    let nearest = enemy_query
        .iter()
        .map(|transform| transform.translation.truncate())
        .filter(|position| position.distance(player_pos) <= tuning.attack_range)
        .min_by(|a, b| {
            a.distance_squared(player_pos)
                .total_cmp(&b.distance_squared(player_pos))
        });

    if let Some(target) = nearest {
        timer.shots += 1;
        // Every sixth shot carries poison, every fourth carries frost.
        let payload = if timer.shots % 6 == 0 {
            Some(ShotPayload::Poison {
                damage_per_tick: 3,
                duration: 3.0,
            })
        } else if timer.shots % 4 == 0 {
            Some(ShotPayload::Frost { duration: 2.5 })
        } else {
            None
        };
        let heading = (target - player_pos).normalize_or_zero();
        spawn_projectile(
            &mut commands,
            player_pos,
            heading * tuning.projectile_speed,
            tuning.attack_damage,
            false,
            payload,
        );
    }
}

pub struct MovementPlugin;

impl Plugin for MovementPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MovementInput>()
            .init_resource::<PlayerTuning>()
            .init_resource::<AttackTimer>()
            .add_systems(OnEnter(GameState::Playing), spawn_player)
            .add_systems(
                Update,
                (read_move_input, apply_player_movement, auto_attack)
                    .chain()
                    .run_if(in_state(GameState::Playing))
                    .run_if(gameplay_active),
            );
    }
}
