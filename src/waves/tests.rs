//! Wave domain: tests for budgets, placement, state guards, and the
//! composition table.

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::budget::{TypeBudget, pick_archetype, scale_budget};
use super::placement::{SpawnQuery, find_spawn_position};
use super::state::{BOSS_DISPLAY_BONUS, WaveState, visibility_burst};
use super::systems::{CompletionKind, completion_due, normalize_for_completion};
use super::table::{WaveTable, WaveTableError, load_wave_table};
use crate::core::StagePhase;
use crate::enemies::Archetype;

// ---- budgets ----

#[test]
fn test_scale_budget_rounds_counts() {
    // 10 melee at the global 0.7 scale comes out as 7.
    let budget = scale_budget(&[(Archetype::Melee, 10)]);
    assert_eq!(budget.count_of(Archetype::Melee), 7);
    assert_eq!(budget.total(), 7);
}

#[test]
fn test_scale_budget_keeps_small_types_alive() {
    // A count of 1 would round to 1 anyway; a count that rounds to zero
    // is repaired to 1 so the type still appears in the wave.
    let budget = scale_budget(&[(Archetype::Mage, 1), (Archetype::Bomber, 0)]);
    assert_eq!(budget.count_of(Archetype::Mage), 1);
    // Zero before scaling stays absent entirely.
    assert_eq!(budget.count_of(Archetype::Bomber), 0);
}

#[test]
fn test_decrement_consumes_and_stops_at_zero() {
    let mut budget = TypeBudget::new(vec![(Archetype::Dasher, 2)]);
    assert!(budget.decrement(Archetype::Dasher));
    assert!(budget.decrement(Archetype::Dasher));
    assert!(!budget.decrement(Archetype::Dasher));
    assert!(budget.is_exhausted());
}

#[test]
fn test_pick_archetype_honors_remaining_counts() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let budget = TypeBudget::new(vec![(Archetype::Melee, 0), (Archetype::Shooter, 5)]);
    for _ in 0..20 {
        assert_eq!(pick_archetype(&mut rng, &budget), Archetype::Shooter);
    }
}

#[test]
fn test_pick_archetype_falls_back_on_empty_budget() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let budget = TypeBudget::default();
    assert_eq!(pick_archetype(&mut rng, &budget), Archetype::Melee);
}

// ---- placement ----

#[test]
fn test_find_spawn_position_respects_exclusions() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let query = SpawnQuery::new(Vec2::new(-100.0, -100.0), Vec2::new(100.0, 100.0))
        .exclude(Vec2::ZERO, 50.0);
    for _ in 0..50 {
        let position = find_spawn_position(&mut rng, &query)
            .unwrap_or_else(|| panic!("placement should succeed in an open field"));
        assert!(position.x >= -100.0 && position.x <= 100.0);
        assert!(position.y >= -100.0 && position.y <= 100.0);
        assert!(position.distance(Vec2::ZERO) >= 50.0);
    }
}

#[test]
fn test_find_spawn_position_gives_up_when_saturated() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    // The exclusion covers the whole rectangle, so every candidate is
    // rejected and the sampler must return None rather than spin.
    let query = SpawnQuery::new(Vec2::new(-10.0, -10.0), Vec2::new(10.0, 10.0))
        .exclude(Vec2::ZERO, 1000.0);
    assert_eq!(find_spawn_position(&mut rng, &query), None);
}

#[test]
fn test_placement_is_deterministic_under_a_seed() {
    let query = SpawnQuery::new(Vec2::new(-300.0, -300.0), Vec2::new(300.0, 300.0));
    let mut first = ChaCha8Rng::seed_from_u64(99);
    let mut second = ChaCha8Rng::seed_from_u64(99);
    for _ in 0..10 {
        assert_eq!(
            find_spawn_position(&mut first, &query),
            find_spawn_position(&mut second, &query)
        );
    }
}

// ---- wave state ----

#[test]
fn test_visibility_burst_bounds() {
    assert_eq!(visibility_burst(20), 5);
    assert_eq!(visibility_burst(7), 3, "floor of three");
    assert_eq!(visibility_burst(2), 2, "never more than planned");
    assert_eq!(visibility_burst(0), 0);
}

#[test]
fn test_ratio_guard_requires_half_the_spawns_dead() {
    let mut state = WaveState::default();
    state.spawned = 10;
    state.killed = 5;
    assert!(state.ratio_guard_met());

    state.killed = 4;
    assert!(!state.ratio_guard_met());
}

#[test]
fn test_ratio_guard_requires_at_least_one_kill() {
    let mut state = WaveState::default();
    state.spawned = 1;
    state.killed = 0;
    assert!(!state.ratio_guard_met());
    state.killed = 1;
    assert!(state.ratio_guard_met());
}

#[test]
fn test_boss_display_bonus_never_touches_real_counters() {
    let mut state = WaveState::default();
    state.wave_number = 5;
    state.planned_total = 1;
    state.spawned = 1;
    state.display_bonus = BOSS_DISPLAY_BONUS;
    assert_eq!(state.displayed_planned(), 1 + BOSS_DISPLAY_BONUS);
    assert_eq!(state.displayed_spawned(), 1 + BOSS_DISPLAY_BONUS);
    assert_eq!(state.planned_total, 1);
    assert_eq!(state.spawned, 1);
    assert_eq!(state.remaining_to_spawn(), 0);
}

#[test]
fn test_counter_ordering_invariant() {
    let mut state = WaveState::default();
    state.planned_total = 7;
    state.spawned = 4;
    state.killed = 2;
    assert!(state.killed <= state.spawned);
    assert!(state.spawned <= state.planned_total);
    assert_eq!(state.remaining_to_spawn(), 3);
}

// ---- completion transitions ----

#[test]
fn test_completion_waits_for_live_enemies() {
    let mut state = WaveState::default();
    state.active = true;
    state.planned_total = 4;
    state.spawned = 4;
    state.killed = 4;
    assert_eq!(completion_due(&state, 2), None);
    assert_eq!(completion_due(&state, 0), Some(CompletionKind::Organic));
}

#[test]
fn test_completion_is_forced_when_counters_disagree() {
    // Everything is down but only a quarter of the spawns were credited;
    // the wave must be recovered, never silently completed.
    let mut state = WaveState::default();
    state.active = true;
    state.planned_total = 4;
    state.spawned = 4;
    state.killed = 1;
    assert_eq!(completion_due(&state, 0), Some(CompletionKind::Forced));
}

#[test]
fn test_completion_ignores_idle_and_still_spawning_waves() {
    let mut state = WaveState::default();
    state.active = true;
    state.planned_total = 4;
    state.spawned = 2;
    state.killed = 2;
    assert_eq!(completion_due(&state, 0), None, "spawns outstanding");

    state.spawned = 4;
    state.killed = 4;
    state.active = false;
    assert_eq!(completion_due(&state, 0), None, "no wave running");
}

#[test]
fn test_forced_completion_normalizes_counters() {
    let mut state = WaveState::default();
    state.active = true;
    state.planned_total = 7;
    state.spawned = 5;
    state.killed = 1;
    state.display_bonus = BOSS_DISPLAY_BONUS;

    normalize_for_completion(&mut state, true);
    assert_eq!(state.spawned, 7);
    assert_eq!(state.killed, 7);
    assert!(!state.active);
    assert!(state.cooling_down);
    assert_eq!(state.display_bonus, 0);
}

// ---- composition table ----

#[test]
fn test_compiled_table_covers_every_slot() {
    let table = WaveTable::compiled_default();
    for phase in [StagePhase::Early, StagePhase::Mid, StagePhase::Late] {
        for wave in 1..=5 {
            assert!(
                table.lookup(phase, wave).is_some(),
                "missing {:?} wave {}",
                phase,
                wave
            );
        }
    }
}

#[test]
fn test_first_wave_is_all_melee() {
    let table = WaveTable::compiled_default();
    let row = table.lookup(StagePhase::Early, 1).unwrap();
    assert_eq!(row.melee, 10);
    assert_eq!(row.dasher + row.bomber + row.shooter + row.mage, 0);
}

#[test]
fn test_boss_wave_row_spawns_no_trash() {
    let table = WaveTable::compiled_default();
    let counts = table.raw_counts(StagePhase::Late, 5, 3);
    assert_eq!(counts.iter().map(|(_, count)| count).sum::<u32>(), 0);
}

#[test]
fn test_raw_counts_grow_with_stage() {
    let table = WaveTable::compiled_default();
    let stage_one: u32 = table
        .raw_counts(StagePhase::Early, 2, 1)
        .iter()
        .map(|(_, count)| count)
        .sum();
    let stage_three: u32 = table
        .raw_counts(StagePhase::Early, 2, 3)
        .iter()
        .map(|(_, count)| count)
        .sum();
    assert!(stage_three > stage_one);
}

#[test]
fn test_scenario_first_wave_budget() {
    // Level 1: stage 1, early phase. Wave 1 plans 10 melee, scaled to 7.
    let table = WaveTable::compiled_default();
    let raw = table.raw_counts(StagePhase::Early, 1, 1);
    let budget = scale_budget(&raw);
    assert_eq!(budget.total(), 7);
    assert_eq!(budget.count_of(Archetype::Melee), 7);
}

#[test]
fn test_load_missing_table_reports_io_error() {
    let result = load_wave_table("does/not/exist/waves.ron");
    assert!(matches!(result, Err(WaveTableError::Io(_))));
}

#[test]
fn test_load_rejects_malformed_table() {
    let path = std::env::temp_dir().join("stormline-broken-waves.ron");
    std::fs::write(&path, "(rows: [nonsense").unwrap();
    let result = load_wave_table(&path);
    assert!(matches!(result, Err(WaveTableError::Parse(_))));
    std::fs::remove_file(&path).ok();
}

#[test]
fn test_load_roundtrips_a_written_table() {
    let table = WaveTable::compiled_default();
    let text = ron::ser::to_string(&table).unwrap();
    let path = std::env::temp_dir().join("stormline-roundtrip-waves.ron");
    std::fs::write(&path, text).unwrap();

    let loaded = load_wave_table(&path).unwrap();
    assert_eq!(loaded.rows.len(), table.rows.len());
    let row = loaded.lookup(StagePhase::Mid, 4).unwrap();
    assert_eq!(row.mage, 2);
    std::fs::remove_file(&path).ok();
}
