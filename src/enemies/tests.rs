//! Enemy domain: tests for health, kill claims, statuses, and phases.

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

use super::behavior::{MageAction, annulus_point, choose_mage_action, dash_ready};
use super::boss::{escalate_boss, expected_phase};
use super::components::{
    Ability, AbilityCooldowns, ActiveStatuses, AttackStats, Boss, Cooldown, Health, KillClaim,
    Locomotion, StatusEffect, StatusKind,
};
use super::params::{FROST_SLOW_FACTOR, MAGE_SPELL_RANGE};
use super::spawn::boss_kind_for_stage;
use super::statuses::{EffectAction, EffectTimers, apply_frost, apply_poison, settle_status_end};
use super::{BossKind, stage_damage, stage_health};

fn entity(index: u64) -> Entity {
    Entity::from_bits(index)
}

// ---- health and kill credit ----

#[test]
fn test_health_saturates_at_zero() {
    let mut health = Health::new(10);
    health.take_damage(25);
    assert_eq!(health.current, 0);
    assert!(health.is_dead());
}

#[test]
fn test_heal_caps_at_max() {
    let mut health = Health::new(50);
    health.take_damage(20);
    health.heal(100);
    assert_eq!(health.current, 50);
}

#[test]
fn test_kill_claim_succeeds_exactly_once() {
    let mut claim = KillClaim::default();
    assert!(claim.try_claim());
    assert!(!claim.try_claim());
    assert!(!claim.try_claim());
    assert!(claim.is_claimed());
}

// ---- statuses ----

#[test]
fn test_frost_slow_applies_and_clears_once() {
    let mut timers = EffectTimers::default();
    let mut statuses = ActiveStatuses::default();
    let mut locomotion = Locomotion::new(120.0);

    apply_frost(entity(1), &mut statuses, &mut locomotion, 2.0, &mut timers);
    assert_eq!(locomotion.current_speed, 120.0 * FROST_SLOW_FACTOR);

    // Reapplying while frozen does not stack the slow.
    apply_frost(entity(1), &mut statuses, &mut locomotion, 2.0, &mut timers);
    assert_eq!(locomotion.current_speed, 120.0 * FROST_SLOW_FACTOR);

    settle_status_end(StatusKind::Frozen, &mut statuses, Some(&mut locomotion), None);
    assert_eq!(locomotion.current_speed, 120.0);
}

fn begin_dash(
    statuses: &mut ActiveStatuses,
    locomotion: &mut Locomotion,
    timers: &mut EffectTimers,
) {
    let handle = timers.deck.schedule_for(
        entity(5),
        "dash-expiry",
        0.5,
        TimerMode::Once,
        EffectAction::ClearStatus(entity(5), StatusKind::Dashing),
    );
    statuses.begin(
        StatusKind::Dashing,
        StatusEffect {
            magnitude: 0.0,
            snapshot: locomotion.current_speed,
            heading: Vec2::X,
            timer: handle,
        },
    );
    locomotion.current_speed = 520.0;
}

#[test]
fn test_frost_survives_a_dash_that_clears_first() {
    let mut timers = EffectTimers::default();
    let mut statuses = ActiveStatuses::default();
    let mut locomotion = Locomotion::new(120.0);
    let mut cooldowns = AbilityCooldowns::with([(Ability::Dash, 5.0)]);

    begin_dash(&mut statuses, &mut locomotion, &mut timers);
    apply_frost(entity(5), &mut statuses, &mut locomotion, 2.5, &mut timers);
    assert_eq!(locomotion.current_speed, 260.0);

    // The dash window closes first; the slow outlives it.
    settle_status_end(
        StatusKind::Dashing,
        &mut statuses,
        Some(&mut locomotion),
        Some(&mut cooldowns),
    );
    assert_eq!(locomotion.current_speed, 60.0);

    // Frost expiry lands back on the pre-dash speed.
    settle_status_end(StatusKind::Frozen, &mut statuses, Some(&mut locomotion), None);
    assert_eq!(locomotion.current_speed, 120.0);
}

#[test]
fn test_dash_keeps_its_speed_when_frost_clears_first() {
    let mut timers = EffectTimers::default();
    let mut statuses = ActiveStatuses::default();
    let mut locomotion = Locomotion::new(120.0);
    let mut cooldowns = AbilityCooldowns::with([(Ability::Dash, 5.0)]);

    begin_dash(&mut statuses, &mut locomotion, &mut timers);
    apply_frost(entity(5), &mut statuses, &mut locomotion, 0.2, &mut timers);

    settle_status_end(StatusKind::Frozen, &mut statuses, Some(&mut locomotion), None);
    assert_eq!(locomotion.current_speed, 520.0, "ongoing dash keeps dash speed");

    settle_status_end(
        StatusKind::Dashing,
        &mut statuses,
        Some(&mut locomotion),
        Some(&mut cooldowns),
    );
    assert_eq!(locomotion.current_speed, 120.0);
}

#[test]
fn test_poison_reapply_is_noop() {
    let mut timers = EffectTimers::default();
    let mut statuses = ActiveStatuses::default();

    apply_poison(entity(2), &mut statuses, 3, 5.0, &mut timers);
    let before = timers.deck.len();
    apply_poison(entity(2), &mut statuses, 9, 5.0, &mut timers);
    assert_eq!(timers.deck.len(), before);
    assert_eq!(statuses.get(StatusKind::Poisoned).unwrap().magnitude, 3.0);
}

#[test]
fn test_poison_ticks_then_expires() {
    let mut timers = EffectTimers::default();
    let mut statuses = ActiveStatuses::default();
    apply_poison(entity(3), &mut statuses, 4, 2.5, &mut timers);

    let mut ticks = 0;
    let mut expiries = 0;
    for _ in 0..3 {
        for action in timers.deck.tick(Duration::from_secs(1)) {
            match action {
                EffectAction::PoisonTick(_) => ticks += 1,
                EffectAction::ClearStatus(_, StatusKind::Poisoned) => expiries += 1,
                other => panic!("unexpected action {:?}", other),
            }
        }
    }
    assert_eq!(ticks, 3, "repeating tick fires every second");
    assert_eq!(expiries, 1);
}

#[test]
fn test_death_cancels_owned_effect_timers() {
    let mut timers = EffectTimers::default();
    let mut statuses = ActiveStatuses::default();
    apply_poison(entity(4), &mut statuses, 2, 10.0, &mut timers);
    assert!(timers.deck.len() > 0);

    timers.deck.cancel_owned_by(entity(4));
    assert!(timers.deck.is_empty());
}

// ---- cooldowns ----

#[test]
fn test_cooldown_ticks_to_ready_and_resets() {
    let mut cooldown = Cooldown::ready_in(2.0);
    assert!(!cooldown.is_ready());
    cooldown.tick(2.5);
    assert!(cooldown.is_ready());
    cooldown.reset();
    assert_eq!(cooldown.remaining, 2.0);
}

#[test]
fn test_scale_max_clamps_remaining() {
    let mut cooldown = Cooldown::ready_in(10.0);
    cooldown.scale_max(0.5);
    assert_eq!(cooldown.max, 5.0);
    assert_eq!(cooldown.remaining, 5.0);
}

#[test]
fn test_ability_cooldowns_scale_all_maxima() {
    let mut cooldowns =
        AbilityCooldowns::with([(Ability::Summon, 8.0), (Ability::Volley, 4.0)]);
    cooldowns.scale_maxima(0.7);
    assert_eq!(cooldowns.cooldowns[&Ability::Summon].max, 8.0 * 0.7);
    assert_eq!(cooldowns.cooldowns[&Ability::Volley].max, 4.0 * 0.7);
}

// ---- ability triggers ----

#[test]
fn test_mage_teleport_outranks_spell() {
    let mut cooldowns = AbilityCooldowns::with([(Ability::Spell, 2.5), (Ability::Teleport, 6.0)]);
    cooldowns.tick_all(10.0);
    assert_eq!(choose_mage_action(&cooldowns, 100.0), MageAction::Teleport);
    assert_eq!(choose_mage_action(&cooldowns, 1000.0), MageAction::Teleport);
}

#[test]
fn test_mage_spell_needs_range() {
    let mut cooldowns = AbilityCooldowns::with([(Ability::Spell, 2.5), (Ability::Teleport, 6.0)]);
    // Spell ready, teleport still counting down.
    cooldowns.tick_all(3.0);
    assert_eq!(
        choose_mage_action(&cooldowns, MAGE_SPELL_RANGE + 1.0),
        MageAction::Hold
    );
    assert_eq!(
        choose_mage_action(&cooldowns, MAGE_SPELL_RANGE - 1.0),
        MageAction::Spell
    );
}

#[test]
fn test_dash_fires_on_cooldown_alone() {
    let mut cooldowns = AbilityCooldowns::with([(Ability::Dash, 5.0)]);
    let statuses = ActiveStatuses::default();
    assert!(!dash_ready(&cooldowns, &statuses));
    cooldowns.tick_all(5.0);
    assert!(dash_ready(&cooldowns, &statuses));
}

#[test]
fn test_annulus_point_is_seeded_and_bounded() {
    let mut first = ChaCha8Rng::seed_from_u64(11);
    let mut second = ChaCha8Rng::seed_from_u64(11);
    for _ in 0..10 {
        let a = annulus_point(&mut first, Vec2::ZERO, 200.0, 360.0);
        let b = annulus_point(&mut second, Vec2::ZERO, 200.0, 360.0);
        assert_eq!(a, b);
        assert!(a.length() >= 199.9 && a.length() <= 360.1);
    }
}

// ---- boss phases ----

#[test]
fn test_expected_phase_thresholds() {
    assert_eq!(expected_phase(1.0), 1);
    assert_eq!(expected_phase(0.51), 1);
    assert_eq!(expected_phase(0.5), 2);
    assert_eq!(expected_phase(0.26), 2);
    assert_eq!(expected_phase(0.25), 3);
    assert_eq!(expected_phase(0.01), 3);
}

#[test]
fn test_boss_escalation_scales_each_phase_exactly_once() {
    let mut boss = Boss::new(BossKind::Volley);
    let mut cooldowns = AbilityCooldowns::with([(Ability::Volley, 4.0)]);
    let mut attack = AttackStats { damage: 18 };
    let mut locomotion = Locomotion::new(70.0);

    let entered = escalate_boss(
        &mut boss,
        0.2,
        Some(&mut cooldowns),
        Some(&mut attack),
        Some(&mut locomotion),
    );
    assert_eq!(entered, vec![2, 3]);
    let max = cooldowns.cooldowns[&Ability::Volley].max;
    assert!((max - 4.0 * 0.7 * 0.7).abs() < 1e-4);
    assert_eq!(attack.damage, 41, "18 -> 27 -> 41");
    assert!((locomotion.current_speed - 70.0 * 1.2 * 1.2).abs() < 1e-3);

    // A later hit at the same health never re-scales.
    let again = escalate_boss(
        &mut boss,
        0.2,
        Some(&mut cooldowns),
        Some(&mut attack),
        Some(&mut locomotion),
    );
    assert!(again.is_empty());
    assert_eq!(attack.damage, 41);
}

#[test]
fn test_boss_kind_rotates_by_stage() {
    assert_eq!(boss_kind_for_stage(1), BossKind::Summoner);
    assert_eq!(boss_kind_for_stage(2), BossKind::Volley);
    assert_eq!(boss_kind_for_stage(3), BossKind::Charger);
    assert_eq!(boss_kind_for_stage(4), BossKind::Summoner);
}

// ---- stage scaling ----

#[test]
fn test_stage_scaling_grows_monotonically() {
    assert_eq!(stage_health(40, 1), 40);
    assert!(stage_health(40, 2) > stage_health(40, 1));
    assert!(stage_damage(8, 3) > stage_damage(8, 2));
}
