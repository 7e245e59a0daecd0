//! Enemy domain: timed status effects and their expiry actions.
//!
//! Statuses are applied by behaviors and cleared by the effect timer
//! deck. All expiry consequences flow through `EffectAction` so a wave
//! teardown can cancel every pending action for an entity in one call.

use bevy::ecs::message::{Message, MessageReader, MessageWriter};
use bevy::prelude::*;

use super::components::{
    Ability, AbilityCooldowns, ActiveStatuses, Locomotion, StatusEffect, StatusKind,
};
use super::events::DamageEvent;
use super::params::{FROST_SLOW_FACTOR, POISON_TICK_INTERVAL};
use crate::timing::TimerDeck;

/// Deferred consequence of an effect timer expiring.
#[derive(Debug, Clone, Copy)]
pub enum EffectAction {
    ClearStatus(Entity, StatusKind),
    PoisonTick(Entity),
    TeleportArrive(Entity),
    BombDetonate(Entity),
}

/// Timer deck for status effects, keyed by owner entity so death can
/// cancel everything an enemy still had pending.
#[derive(Resource, Default)]
pub struct EffectTimers {
    pub deck: TimerDeck<EffectAction>,
}

/// An effect timer fired this frame.
#[derive(Debug)]
pub struct EffectFired(pub EffectAction);

impl Message for EffectFired {}

pub(crate) fn tick_effect_timers(
    time: Res<Time>,
    mut timers: ResMut<EffectTimers>,
    mut fired: MessageWriter<EffectFired>,
) {
    for action in timers.deck.tick(time.delta()) {
        fired.write(EffectFired(action));
    }
}

/// Applies frost to an enemy. The slow is applied and undone
/// multiplicatively so it composes with a dash whichever of the two
/// clears first. A second frost while one is active is a no-op.
pub fn apply_frost(
    entity: Entity,
    statuses: &mut ActiveStatuses,
    locomotion: &mut Locomotion,
    duration: f32,
    timers: &mut EffectTimers,
) {
    if statuses.has(StatusKind::Frozen) {
        return;
    }
    let handle = timers.deck.schedule_for(
        entity,
        "frost-expiry",
        duration,
        TimerMode::Once,
        EffectAction::ClearStatus(entity, StatusKind::Frozen),
    );
    statuses.begin(
        StatusKind::Frozen,
        StatusEffect {
            magnitude: FROST_SLOW_FACTOR,
            snapshot: 0.0,
            heading: Vec2::ZERO,
            timer: handle,
        },
    );
    locomotion.current_speed *= FROST_SLOW_FACTOR;
}

/// Applies poison. Damage accrues on a repeating tick; reapplying while
/// poisoned does not stack or refresh.
pub fn apply_poison(
    entity: Entity,
    statuses: &mut ActiveStatuses,
    damage_per_tick: u32,
    duration: f32,
    timers: &mut EffectTimers,
) {
    if statuses.has(StatusKind::Poisoned) {
        return;
    }
    let tick_handle = timers.deck.schedule_for(
        entity,
        "poison-tick",
        POISON_TICK_INTERVAL,
        TimerMode::Repeating,
        EffectAction::PoisonTick(entity),
    );
    timers.deck.schedule_for(
        entity,
        "poison-expiry",
        duration,
        TimerMode::Once,
        EffectAction::ClearStatus(entity, StatusKind::Poisoned),
    );
    statuses.begin(
        StatusKind::Poisoned,
        StatusEffect {
            magnitude: damage_per_tick as f32,
            snapshot: 0.0,
            heading: Vec2::ZERO,
            timer: tick_handle,
        },
    );
}

/// Removes a status and undoes its speed changes. A dash restore checks
/// for a still-active frost so the slow survives the dash window, and a
/// frost undoes its factor in place so an ongoing dash keeps its speed.
/// Returns the removed effect, or None when the status was not active.
pub(crate) fn settle_status_end(
    kind: StatusKind,
    statuses: &mut ActiveStatuses,
    mut locomotion: Option<&mut Locomotion>,
    mut cooldowns: Option<&mut AbilityCooldowns>,
) -> Option<StatusEffect> {
    let effect = statuses.end(kind)?;
    match kind {
        StatusKind::Frozen => {
            if let Some(locomotion) = locomotion.as_deref_mut() {
                locomotion.current_speed /= effect.magnitude;
            }
        }
        StatusKind::Dashing => {
            if let Some(locomotion) = locomotion.as_deref_mut() {
                locomotion.current_speed = effect.snapshot;
                if let Some(frost) = statuses.get(StatusKind::Frozen) {
                    locomotion.current_speed *= frost.magnitude;
                }
            }
            // The dash is spent the moment the window closes.
            if let Some(cooldowns) = cooldowns.as_deref_mut() {
                cooldowns.reset(Ability::Dash);
            }
        }
        // Poison, teleport, and bomb cleanup carry no speed change.
        _ => {}
    }
    Some(effect)
}

/// Resolves `ClearStatus` actions fired by the effect timer deck.
pub(crate) fn clear_statuses(
    mut fired: MessageReader<EffectFired>,
    mut timers: ResMut<EffectTimers>,
    mut query: Query<(
        &mut ActiveStatuses,
        Option<&mut Locomotion>,
        Option<&mut AbilityCooldowns>,
    )>,
) {
    for message in fired.read() {
        let EffectFired(EffectAction::ClearStatus(entity, kind)) = message else {
            continue;
        };
        let Ok((mut statuses, mut locomotion, mut cooldowns)) = query.get_mut(*entity) else {
            continue;
        };
        let Some(effect) = settle_status_end(
            *kind,
            &mut statuses,
            locomotion.as_deref_mut(),
            cooldowns.as_deref_mut(),
        ) else {
            continue;
        };
        timers.deck.cancel(effect.timer);
    }
}

/// Resolves poison ticks into damage requests.
pub(crate) fn apply_poison_ticks(
    mut fired: MessageReader<EffectFired>,
    query: Query<&ActiveStatuses>,
    mut damage: MessageWriter<DamageEvent>,
) {
    for message in fired.read() {
        let EffectFired(EffectAction::PoisonTick(entity)) = message else {
            continue;
        };
        let Ok(statuses) = query.get(*entity) else {
            continue;
        };
        let Some(effect) = statuses.get(StatusKind::Poisoned) else {
            continue;
        };
        damage.write(DamageEvent {
            target: *entity,
            amount: effect.magnitude as u32,
        });
    }
}
