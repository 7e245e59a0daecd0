//! Enemy domain: damage resolution, kill claiming, and death cleanup.
//!
//! All damage funnels through `apply_damage` so the lethal hit and the
//! kill credit happen in one place. Despawning is deferred to
//! `process_deaths`; in between, a claimed enemy no longer counts as
//! live.

use bevy::ecs::message::{MessageReader, MessageWriter};
use bevy::prelude::*;

use super::boss::escalate_boss;
use super::components::{
    AbilityCooldowns, Ally, Archetype, AttackStats, Boss, Enemy, Health, Invulnerable, KillClaim,
    Locomotion,
};
use super::events::{BossPhaseChangeEvent, DamageEvent, DieRequest, EnemyKilledEvent};
use super::params::BOSS_PHASE_INVULN_SECONDS;
use super::statuses::EffectTimers;
use crate::core::GameOverSignal;
use crate::movement::Player;

type DamageTarget = (
    &'static mut Health,
    Option<&'static Invulnerable>,
    Option<&'static mut KillClaim>,
    Option<&'static mut Boss>,
    Option<&'static mut AbilityCooldowns>,
    Option<&'static mut Locomotion>,
    Option<&'static mut AttackStats>,
    Option<&'static Archetype>,
);

pub(crate) fn apply_damage(
    mut commands: Commands,
    mut damage_events: MessageReader<DamageEvent>,
    mut targets: Query<DamageTarget>,
    mut killed: MessageWriter<EnemyKilledEvent>,
    mut phase_changes: MessageWriter<BossPhaseChangeEvent>,
) {
    for event in damage_events.read() {
        let Ok((
            mut health,
            invulnerable,
            claim,
            boss,
            mut cooldowns,
            mut locomotion,
            mut attack,
            archetype,
        )) = targets.get_mut(event.target)
        else {
            continue;
        };
        if invulnerable.is_some() {
            continue;
        }

        health.take_damage(event.amount);

        if health.is_dead() {
            // Exactly one claim per enemy, even with several lethal hits
            // queued in the same frame.
            if let (Some(mut claim), Some(archetype)) = (claim, archetype)
                && claim.try_claim()
            {
                killed.write(EnemyKilledEvent {
                    entity: event.target,
                    archetype: *archetype,
                });
            }
            continue;
        }

        // Survived hit on a boss may cross a phase threshold.
        if let Some(mut boss) = boss {
            let entered = escalate_boss(
                &mut boss,
                health.percent(),
                cooldowns.as_deref_mut(),
                attack.as_deref_mut(),
                locomotion.as_deref_mut(),
            );
            for phase in entered {
                commands
                    .entity(event.target)
                    .insert(Invulnerable::for_seconds(BOSS_PHASE_INVULN_SECONDS));
                phase_changes.write(BossPhaseChangeEvent {
                    entity: event.target,
                    phase,
                });
            }
        }
    }
}

/// Destruction requests bypass health but still go through the claim so
/// the kill is credited exactly once.
pub(crate) fn handle_die_requests(
    mut requests: MessageReader<DieRequest>,
    mut targets: Query<(&mut Health, &mut KillClaim, &Archetype), With<Enemy>>,
    mut killed: MessageWriter<EnemyKilledEvent>,
) {
    for request in requests.read() {
        let Ok((mut health, mut claim, archetype)) = targets.get_mut(request.entity) else {
            continue;
        };
        health.current = 0;
        if claim.try_claim() {
            killed.write(EnemyKilledEvent {
                entity: request.entity,
                archetype: *archetype,
            });
        }
    }
}

/// Despawns claimed enemies and cancels their pending effect timers.
pub(crate) fn process_deaths(
    mut commands: Commands,
    mut timers: ResMut<EffectTimers>,
    query: Query<(Entity, &KillClaim), With<Enemy>>,
) {
    for (entity, claim) in &query {
        if !claim.is_claimed() {
            continue;
        }
        timers.deck.cancel_owned_by(entity);
        commands.entity(entity).despawn();
    }
}

pub(crate) fn detect_player_defeat(
    query: Query<&Health, (With<Player>, Changed<Health>)>,
    mut game_over: MessageWriter<GameOverSignal>,
) {
    for health in &query {
        if health.is_dead() {
            warn!("Player defeated");
            game_over.write(GameOverSignal);
        }
    }
}

/// Despawns friendly units that ran out of health. Allies have no kill
/// claim; they just leave the field.
pub(crate) fn process_ally_deaths(
    mut commands: Commands,
    query: Query<(Entity, &Health), (With<Ally>, Without<Enemy>)>,
) {
    for (entity, health) in &query {
        if health.is_dead() {
            commands.entity(entity).despawn();
        }
    }
}
