//! Enemy domain: per-archetype movement and ability triggers.
//!
//! Every archetype seeks the player by default; statuses and band logic
//! override that. Ability systems only fire when the matching cooldown
//! is ready and the enemy is not frozen.

use bevy::ecs::message::{MessageReader, MessageWriter};
use bevy::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::components::{
    Ability, AbilityCooldowns, ActiveStatuses, Ally, Archetype, AttackStats, Enemy, Health,
    Invulnerable, Locomotion, Projectile, ShotPayload, StatusEffect, StatusKind,
};
use super::events::{DamageEvent, DieRequest};
use super::params::{
    ALLY_ATTACK_RANGE, ALLY_PROJECTILE_SPEED, BOMB_FUSE, BOMB_KNOCKBACK, BOMB_PROXIMITY,
    BOMB_RADIUS, DASH_SPEED, DASH_WINDOW, MAGE_ARRIVE_AT, MAGE_DISABLED_WINDOW, MAGE_SEEK_FACTOR,
    MAGE_SPELL_RANGE, MAGE_SPELL_SPEED, MAGE_TELEPORT_MAX, MAGE_TELEPORT_MIN,
    PROJECTILE_HIT_RADIUS, PROJECTILE_LIFETIME, SHOOTER_BAND_INNER, SHOOTER_BAND_OUTER,
    SHOOTER_PROJECTILE_SPEED, STRIKE_RANGE,
};
use super::statuses::{EffectAction, EffectFired, EffectTimers, apply_frost, apply_poison};
use crate::arena::{Playfield, TerrainGrid};
use crate::core::RunSeed;
use crate::movement::Player;

/// Seeded RNG stream for behavior rolls, kept separate from the spawn
/// placement stream so the two stay reproducible independently.
#[derive(Resource)]
pub(crate) struct BehaviorRng(pub ChaCha8Rng);

impl FromWorld for BehaviorRng {
    fn from_world(world: &mut World) -> Self {
        let seed = world.resource::<RunSeed>().seed;
        Self(ChaCha8Rng::seed_from_u64(seed.wrapping_add(1)))
    }
}

/// Uniform point in the annulus around `center`.
pub(crate) fn annulus_point<R: Rng + ?Sized>(
    rng: &mut R,
    center: Vec2,
    min_radius: f32,
    max_radius: f32,
) -> Vec2 {
    let angle = rng.random_range(0.0..std::f32::consts::TAU);
    let radius = rng.random_range(min_radius..=max_radius);
    center + Vec2::from_angle(angle) * radius
}

pub(crate) fn tick_ability_cooldowns(
    time: Res<Time>,
    mut query: Query<(&mut AbilityCooldowns, &ActiveStatuses)>,
) {
    for (mut cooldowns, statuses) in &mut query {
        // Frozen enemies make no progress toward their next ability.
        if statuses.has(StatusKind::Frozen) {
            continue;
        }
        cooldowns.tick_all(time.delta_secs());
    }
}

pub(crate) fn tick_invulnerability(
    time: Res<Time>,
    mut commands: Commands,
    mut query: Query<(Entity, &mut Invulnerable)>,
) {
    for (entity, mut invulnerable) in &mut query {
        invulnerable.timer.tick(time.delta());
        if invulnerable.timer.is_finished() {
            commands.entity(entity).remove::<Invulnerable>();
        }
    }
}

/// Moves every enemy according to archetype and active statuses.
pub(crate) fn drive_enemy_movement(
    time: Res<Time>,
    playfield: Res<Playfield>,
    terrain: Res<TerrainGrid>,
    player_query: Query<&Transform, (With<Player>, Without<Enemy>)>,
    mut enemy_query: Query<
        (&Archetype, &Locomotion, &ActiveStatuses, &mut Transform),
        With<Enemy>,
    >,
) {
    let Ok(player_transform) = player_query.single() else {
        return;
    };
    let player_pos = player_transform.translation.truncate();

    for (archetype, locomotion, statuses, mut transform) in &mut enemy_query {
        let position = transform.translation.truncate();

        // Teleporting mages and armed bombers stand still.
        if statuses.has(StatusKind::Teleporting) || statuses.has(StatusKind::Bombing) {
            continue;
        }

        let direction = if let Some(dash) = statuses.get(StatusKind::Dashing) {
            // Dash heading is locked at trigger time.
            dash.heading
        } else {
            let to_player = (player_pos - position).normalize_or_zero();
            match archetype {
                Archetype::Shooter => {
                    let distance = position.distance(player_pos);
                    if distance < SHOOTER_BAND_INNER {
                        -to_player
                    } else if distance > SHOOTER_BAND_OUTER {
                        to_player
                    } else {
                        Vec2::ZERO
                    }
                }
                // Mages drift toward the player between casts.
                Archetype::Mage => to_player * MAGE_SEEK_FACTOR,
                _ => to_player,
            }
        };

        let speed = locomotion.current_speed * terrain.slow_factor_at(position);
        let next = playfield.clamp(position + direction * speed * time.delta_secs());
        transform.translation.x = next.x;
        transform.translation.y = next.y;
    }
}

/// Whether a dash can fire. The dash has no range precondition; only the
/// cooldown and blocking statuses gate it.
pub(crate) fn dash_ready(cooldowns: &AbilityCooldowns, statuses: &ActiveStatuses) -> bool {
    cooldowns.is_ready(Ability::Dash)
        && !statuses.has(StatusKind::Dashing)
        && !statuses.has(StatusKind::Frozen)
}

/// Dasher burst: lock a heading toward the player and sprint for the
/// dash window. Speed is restored when the status clears.
pub(crate) fn trigger_dasher_dashes(
    player_query: Query<&Transform, (With<Player>, Without<Enemy>)>,
    mut dasher_query: Query<
        (
            Entity,
            &Archetype,
            &Transform,
            &mut Locomotion,
            &mut ActiveStatuses,
            &AbilityCooldowns,
        ),
        With<Enemy>,
    >,
    mut timers: ResMut<EffectTimers>,
) {
    let Ok(player_transform) = player_query.single() else {
        return;
    };
    let player_pos = player_transform.translation.truncate();

    for (entity, archetype, transform, mut locomotion, mut statuses, cooldowns) in
        &mut dasher_query
    {
        if *archetype != Archetype::Dasher || !dash_ready(cooldowns, &statuses) {
            continue;
        }
        let position = transform.translation.truncate();

        let heading = (player_pos - position).normalize_or_zero();
        let handle = timers.deck.schedule_for(
            entity,
            "dash-expiry",
            DASH_WINDOW,
            TimerMode::Once,
            EffectAction::ClearStatus(entity, StatusKind::Dashing),
        );
        statuses.begin(
            StatusKind::Dashing,
            StatusEffect {
                magnitude: 0.0,
                snapshot: locomotion.current_speed,
                heading,
                timer: handle,
            },
        );
        locomotion.current_speed = DASH_SPEED;
        // The cooldown restarts when the dash window closes, not here.
    }
}

/// Bomber arming: freeze in place and light the fuse when close enough.
pub(crate) fn trigger_bomber_fuses(
    player_query: Query<&Transform, (With<Player>, Without<Enemy>)>,
    mut bomber_query: Query<(Entity, &Archetype, &Transform, &mut ActiveStatuses), With<Enemy>>,
    mut timers: ResMut<EffectTimers>,
) {
    let Ok(player_transform) = player_query.single() else {
        return;
    };
    let player_pos = player_transform.translation.truncate();

    for (entity, archetype, transform, mut statuses) in &mut bomber_query {
        if *archetype != Archetype::Bomber || statuses.has(StatusKind::Bombing) {
            continue;
        }
        if transform.translation.truncate().distance(player_pos) > BOMB_PROXIMITY {
            continue;
        }

        let handle = timers.deck.schedule_for(
            entity,
            "bomb-fuse",
            BOMB_FUSE,
            TimerMode::Once,
            EffectAction::BombDetonate(entity),
        );
        statuses.begin(
            StatusKind::Bombing,
            StatusEffect {
                magnitude: 0.0,
                snapshot: 0.0,
                heading: Vec2::ZERO,
                timer: handle,
            },
        );
    }
}

/// Fuse resolution: damage and push back everything friendly in the
/// blast, then destroy the bomber through the normal death path.
pub(crate) fn detonate_bombs(
    mut fired: MessageReader<EffectFired>,
    playfield: Res<Playfield>,
    bomber_query: Query<(&Transform, &AttackStats), With<Enemy>>,
    mut target_query: Query<(Entity, &mut Transform), (With<Health>, Without<Enemy>)>,
    mut damage: MessageWriter<DamageEvent>,
    mut deaths: MessageWriter<DieRequest>,
) {
    for message in fired.read() {
        let EffectFired(EffectAction::BombDetonate(bomber)) = message else {
            continue;
        };
        let Ok((bomber_transform, attack)) = bomber_query.get(*bomber) else {
            continue;
        };
        let center = bomber_transform.translation.truncate();

        for (target, mut transform) in &mut target_query {
            let position = transform.translation.truncate();
            let offset = position - center;
            if offset.length() > BOMB_RADIUS {
                continue;
            }
            damage.write(DamageEvent {
                target,
                amount: attack.damage,
            });
            let pushed = playfield.clamp(position + offset.normalize_or_zero() * BOMB_KNOCKBACK);
            transform.translation.x = pushed.x;
            transform.translation.y = pushed.y;
        }

        deaths.write(DieRequest { entity: *bomber });
    }
}

/// Armed bombers pulse toward white as a telegraph.
pub(crate) fn flash_bombing(
    time: Res<Time>,
    mut query: Query<(&Archetype, &ActiveStatuses, &mut Sprite), With<Enemy>>,
) {
    for (archetype, statuses, mut sprite) in &mut query {
        if *archetype != Archetype::Bomber {
            continue;
        }
        if statuses.has(StatusKind::Bombing) {
            let pulse = (time.elapsed_secs() * 12.0).sin() * 0.5 + 0.5;
            sprite.color = Color::srgb(0.6 + 0.4 * pulse, 0.6 + 0.4 * pulse, 0.2 + 0.8 * pulse);
        } else {
            sprite.color = Archetype::Bomber.params().color;
        }
    }
}

/// Shooters fire straight at the player whenever in band and off
/// cooldown.
pub(crate) fn fire_shooter_projectiles(
    mut commands: Commands,
    player_query: Query<&Transform, (With<Player>, Without<Enemy>)>,
    mut shooter_query: Query<
        (
            &Archetype,
            &Transform,
            &AttackStats,
            &ActiveStatuses,
            &mut AbilityCooldowns,
        ),
        With<Enemy>,
    >,
) {
    let Ok(player_transform) = player_query.single() else {
        return;
    };
    let player_pos = player_transform.translation.truncate();

    for (archetype, transform, attack, statuses, mut cooldowns) in &mut shooter_query {
        if *archetype != Archetype::Shooter
            || statuses.has(StatusKind::Frozen)
            || !cooldowns.is_ready(Ability::Shoot)
        {
            continue;
        }
        let position = transform.translation.truncate();
        if position.distance(player_pos) > SHOOTER_BAND_OUTER {
            continue;
        }

        let heading = (player_pos - position).normalize_or_zero();
        spawn_projectile(
            &mut commands,
            position,
            heading * SHOOTER_PROJECTILE_SPEED,
            attack.damage,
            true,
            None,
        );
        cooldowns.reset(Ability::Shoot);
    }
}

/// What a mage does this tick. A ready teleport always wins; a spell
/// needs its cooldown and the player in casting range.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum MageAction {
    Teleport,
    Spell,
    Hold,
}

pub(crate) fn choose_mage_action(cooldowns: &AbilityCooldowns, distance: f32) -> MageAction {
    if cooldowns.is_ready(Ability::Teleport) {
        return MageAction::Teleport;
    }
    if cooldowns.is_ready(Ability::Spell) && distance <= MAGE_SPELL_RANGE {
        return MageAction::Spell;
    }
    MageAction::Hold
}

/// Mage casting and repositioning. Spells are slow projectiles; the
/// teleport disables the mage briefly and lands it at a random point in
/// an annulus around the player.
pub(crate) fn drive_mage_abilities(
    mut commands: Commands,
    player_query: Query<&Transform, (With<Player>, Without<Enemy>)>,
    mut mage_query: Query<
        (
            Entity,
            &Archetype,
            &Transform,
            &AttackStats,
            &mut ActiveStatuses,
            &mut AbilityCooldowns,
        ),
        With<Enemy>,
    >,
    mut timers: ResMut<EffectTimers>,
) {
    let Ok(player_transform) = player_query.single() else {
        return;
    };
    let player_pos = player_transform.translation.truncate();

    for (entity, archetype, transform, attack, mut statuses, mut cooldowns) in &mut mage_query {
        if *archetype != Archetype::Mage
            || statuses.has(StatusKind::Frozen)
            || statuses.has(StatusKind::Teleporting)
        {
            continue;
        }
        let position = transform.translation.truncate();

        match choose_mage_action(&cooldowns, position.distance(player_pos)) {
            MageAction::Teleport => {
                statuses.begin(
                    StatusKind::Teleporting,
                    StatusEffect {
                        magnitude: 0.0,
                        snapshot: 0.0,
                        heading: Vec2::ZERO,
                        timer: timers.deck.schedule_for(
                            entity,
                            "teleport-disabled",
                            MAGE_DISABLED_WINDOW,
                            TimerMode::Once,
                            EffectAction::ClearStatus(entity, StatusKind::Teleporting),
                        ),
                    },
                );
                timers.deck.schedule_for(
                    entity,
                    "teleport-arrive",
                    MAGE_ARRIVE_AT,
                    TimerMode::Once,
                    EffectAction::TeleportArrive(entity),
                );
                cooldowns.reset(Ability::Teleport);
            }
            MageAction::Spell => {
                let heading = (player_pos - position).normalize_or_zero();
                spawn_projectile(
                    &mut commands,
                    position,
                    heading * MAGE_SPELL_SPEED,
                    attack.damage,
                    true,
                    None,
                );
                cooldowns.reset(Ability::Spell);
            }
            MageAction::Hold => {}
        }
    }
}

/// Lands teleporting mages midway through their disabled window.
pub(crate) fn arrive_teleports(
    mut fired: MessageReader<EffectFired>,
    mut rng: ResMut<BehaviorRng>,
    playfield: Res<Playfield>,
    player_query: Query<&Transform, (With<Player>, Without<Enemy>)>,
    mut mage_query: Query<&mut Transform, With<Enemy>>,
) {
    let Ok(player_transform) = player_query.single() else {
        return;
    };
    let player_pos = player_transform.translation.truncate();

    for message in fired.read() {
        let EffectFired(EffectAction::TeleportArrive(entity)) = message else {
            continue;
        };
        let Ok(mut transform) = mage_query.get_mut(*entity) else {
            continue;
        };
        let landing = playfield.clamp(annulus_point(
            &mut rng.0,
            player_pos,
            MAGE_TELEPORT_MIN,
            MAGE_TELEPORT_MAX,
        ));
        transform.translation.x = landing.x;
        transform.translation.y = landing.y;
    }
}

/// Moves projectiles, expires them, and resolves hits. Hostile shots
/// hit the player; friendly shots hit the first enemy in radius and
/// deliver their status payload.
pub(crate) fn update_projectiles(
    time: Res<Time>,
    mut commands: Commands,
    mut timers: ResMut<EffectTimers>,
    mut projectile_query: Query<(Entity, &mut Projectile, &mut Transform), Without<Health>>,
    player_query: Query<(Entity, &Transform), (With<Player>, Without<Projectile>)>,
    mut enemy_query: Query<
        (Entity, &Transform, &mut ActiveStatuses, &mut Locomotion),
        (With<Enemy>, Without<Projectile>),
    >,
    mut damage: MessageWriter<DamageEvent>,
) {
    for (entity, mut projectile, mut transform) in &mut projectile_query {
        projectile.remaining.tick(time.delta());
        if projectile.remaining.is_finished() {
            commands.entity(entity).despawn();
            continue;
        }

        transform.translation.x += projectile.velocity.x * time.delta_secs();
        transform.translation.y += projectile.velocity.y * time.delta_secs();
        let position = transform.translation.truncate();

        if projectile.hostile {
            if let Ok((player, player_transform)) = player_query.single()
                && position.distance(player_transform.translation.truncate())
                    < PROJECTILE_HIT_RADIUS
            {
                damage.write(DamageEvent {
                    target: player,
                    amount: projectile.damage,
                });
                commands.entity(entity).despawn();
            }
        } else {
            for (target, enemy_transform, mut statuses, mut locomotion) in &mut enemy_query {
                if position.distance(enemy_transform.translation.truncate())
                    >= PROJECTILE_HIT_RADIUS
                {
                    continue;
                }
                damage.write(DamageEvent {
                    target,
                    amount: projectile.damage,
                });
                match projectile.payload {
                    Some(ShotPayload::Frost { duration }) => {
                        apply_frost(target, &mut statuses, &mut locomotion, duration, &mut timers);
                    }
                    Some(ShotPayload::Poison {
                        damage_per_tick,
                        duration,
                    }) => {
                        apply_poison(target, &mut statuses, damage_per_tick, duration, &mut timers);
                    }
                    None => {}
                }
                commands.entity(entity).despawn();
                break;
            }
        }
    }
}

/// Contact melee: close-range enemies strike the player on a per-enemy
/// cooldown instead of every frame they overlap.
pub(crate) fn strike_on_contact(
    player_query: Query<(Entity, &Transform), (With<Player>, Without<Enemy>)>,
    mut enemy_query: Query<
        (&Transform, &AttackStats, &ActiveStatuses, &mut AbilityCooldowns),
        With<Enemy>,
    >,
    mut damage: MessageWriter<DamageEvent>,
) {
    let Ok((player, player_transform)) = player_query.single() else {
        return;
    };
    let player_pos = player_transform.translation.truncate();

    for (transform, attack, statuses, mut cooldowns) in &mut enemy_query {
        if statuses.has(StatusKind::Frozen) || !cooldowns.is_ready(Ability::Strike) {
            continue;
        }
        if transform.translation.truncate().distance(player_pos) > STRIKE_RANGE {
            continue;
        }
        damage.write(DamageEvent {
            target: player,
            amount: attack.damage,
        });
        cooldowns.reset(Ability::Strike);
    }
}

/// Helper units close on the nearest hostile and shoot on their own
/// timer.
pub(crate) fn drive_allies(
    time: Res<Time>,
    mut commands: Commands,
    mut ally_query: Query<
        (&mut Ally, &Locomotion, &AttackStats, &mut Transform),
        Without<Enemy>,
    >,
    enemy_query: Query<&Transform, With<Enemy>>,
    playfield: Res<Playfield>,
) {
    for (mut ally, locomotion, attack, mut transform) in &mut ally_query {
        let position = transform.translation.truncate();
        let nearest = enemy_query
            .iter()
            .map(|enemy| enemy.translation.truncate())
            .min_by(|a, b| {
                a.distance_squared(position)
                    .total_cmp(&b.distance_squared(position))
            });
        let Some(target) = nearest else {
            continue;
        };

        let distance = position.distance(target);
        if distance > ALLY_ATTACK_RANGE {
            let heading = (target - position).normalize_or_zero();
            let next = playfield
                .clamp(position + heading * locomotion.current_speed * time.delta_secs());
            transform.translation.x = next.x;
            transform.translation.y = next.y;
        }

        ally.attack.tick(time.delta());
        if ally.attack.is_finished() && distance <= ALLY_ATTACK_RANGE {
            let heading = (target - position).normalize_or_zero();
            spawn_projectile(
                &mut commands,
                position,
                heading * ALLY_PROJECTILE_SPEED,
                attack.damage,
                false,
                None,
            );
        }
    }
}

pub fn spawn_projectile(
    commands: &mut Commands,
    position: Vec2,
    velocity: Vec2,
    damage: u32,
    hostile: bool,
    payload: Option<ShotPayload>,
) {
    let color = if hostile {
        Color::srgb(0.95, 0.5, 0.3)
    } else {
        match payload {
            Some(ShotPayload::Frost { .. }) => Color::srgb(0.6, 0.85, 1.0),
            Some(ShotPayload::Poison { .. }) => Color::srgb(0.5, 0.95, 0.4),
            None => Color::srgb(0.5, 0.9, 0.95),
        }
    };
    commands.spawn((
        Projectile {
            velocity,
            damage,
            remaining: Timer::from_seconds(PROJECTILE_LIFETIME, TimerMode::Once),
            hostile,
            payload,
        },
        Sprite {
            color,
            custom_size: Some(Vec2::splat(8.0)),
            ..default()
        },
        Transform::from_xyz(position.x, position.y, 2.0),
    ));
}
