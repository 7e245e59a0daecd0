//! Enemy domain: boss phase escalation and per-kind specials.

use bevy::ecs::message::{MessageReader, MessageWriter};
use bevy::prelude::*;

use super::behavior::spawn_projectile;
use super::components::{
    Ability, AbilityCooldowns, ActiveStatuses, Archetype, AttackStats, Boss, BossKind, Enemy,
    Locomotion, StatusEffect, StatusKind,
};
use super::events::{BossPhaseChangeEvent, SpawnMinion};
use super::params::{
    BOSS_CHARGE_SPEED, BOSS_CHARGE_WINDOW, BOSS_PHASE_COOLDOWN_FACTOR, BOSS_PHASE_DAMAGE_FACTOR,
    BOSS_PHASE_SPEED_FACTOR, BOSS_VOLLEY_COUNT, SHOOTER_PROJECTILE_SPEED,
};
use super::statuses::{EffectAction, EffectTimers};
use crate::movement::Player;

/// Phase a boss should be in at a given health fraction. Thresholds are
/// crossed downward only; the caller never de-escalates.
pub fn expected_phase(health_percent: f32) -> u8 {
    if health_percent <= 0.25 {
        3
    } else if health_percent <= 0.5 {
        2
    } else {
        1
    }
}

/// Climbs the boss to the phase its current health demands, scaling
/// cooldown maxima, damage, and speeds once per step. Returns the phases
/// entered, in order; a boss already at its expected phase returns none.
pub(crate) fn escalate_boss(
    boss: &mut Boss,
    health_percent: f32,
    mut cooldowns: Option<&mut AbilityCooldowns>,
    mut attack: Option<&mut AttackStats>,
    mut locomotion: Option<&mut Locomotion>,
) -> Vec<u8> {
    let mut entered = Vec::new();
    let expected = expected_phase(health_percent);
    while boss.phase < expected {
        boss.phase += 1;
        if let Some(cooldowns) = cooldowns.as_deref_mut() {
            cooldowns.scale_maxima(BOSS_PHASE_COOLDOWN_FACTOR);
        }
        if let Some(attack) = attack.as_deref_mut() {
            attack.damage = (attack.damage as f32 * BOSS_PHASE_DAMAGE_FACTOR).round() as u32;
        }
        if let Some(locomotion) = locomotion.as_deref_mut() {
            locomotion.base_speed *= BOSS_PHASE_SPEED_FACTOR;
            locomotion.current_speed *= BOSS_PHASE_SPEED_FACTOR;
        }
        entered.push(boss.phase);
    }
    entered
}

/// Drives the boss's signature ability when its cooldown is ready.
pub(crate) fn drive_boss_specials(
    mut commands: Commands,
    player_query: Query<&Transform, (With<Player>, Without<Enemy>)>,
    mut boss_query: Query<
        (
            Entity,
            &Boss,
            &Transform,
            &AttackStats,
            &mut Locomotion,
            &mut ActiveStatuses,
            &mut AbilityCooldowns,
        ),
        With<Enemy>,
    >,
    mut timers: ResMut<EffectTimers>,
    mut minions: MessageWriter<SpawnMinion>,
) {
    let Ok(player_transform) = player_query.single() else {
        return;
    };
    let player_pos = player_transform.translation.truncate();

    for (entity, boss, transform, attack, mut locomotion, mut statuses, mut cooldowns) in
        &mut boss_query
    {
        if statuses.has(StatusKind::Frozen) {
            continue;
        }
        let position = transform.translation.truncate();

        match boss.kind {
            BossKind::Summoner => {
                if cooldowns.is_ready(Ability::Summon) {
                    // Reinforcement count climbs with the phase; frequency
                    // climbs through the phase cooldown scaling.
                    let count = boss.phase as u32 + 1;
                    for index in 0..count {
                        let angle = index as f32 / count as f32 * std::f32::consts::TAU;
                        minions.write(SpawnMinion {
                            position: position + Vec2::from_angle(angle) * 60.0,
                            archetype: Archetype::Melee,
                        });
                    }
                    cooldowns.reset(Ability::Summon);
                }
            }
            BossKind::Volley => {
                if cooldowns.is_ready(Ability::Volley) {
                    for index in 0..BOSS_VOLLEY_COUNT {
                        let angle =
                            index as f32 / BOSS_VOLLEY_COUNT as f32 * std::f32::consts::TAU;
                        spawn_projectile(
                            &mut commands,
                            position,
                            Vec2::from_angle(angle) * SHOOTER_PROJECTILE_SPEED,
                            attack.damage,
                            true,
                            None,
                        );
                    }
                    cooldowns.reset(Ability::Volley);
                }
            }
            BossKind::Charger => {
                if cooldowns.is_ready(Ability::Charge) && !statuses.has(StatusKind::Dashing) {
                    let heading = (player_pos - position).normalize_or_zero();
                    let handle = timers.deck.schedule_for(
                        entity,
                        "charge-expiry",
                        BOSS_CHARGE_WINDOW,
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
                    locomotion.current_speed = BOSS_CHARGE_SPEED;
                    cooldowns.reset(Ability::Charge);
                }
            }
        }
    }
}

/// Logs phase changes. Damage resolution performs the actual scaling so
/// escalation lands in the same frame as the hit that caused it.
pub(crate) fn announce_boss_phases(mut changes: MessageReader<BossPhaseChangeEvent>) {
    for change in changes.read() {
        info!("Boss {:?} escalated to phase {}", change.entity, change.phase);
    }
}
