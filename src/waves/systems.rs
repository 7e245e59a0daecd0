//! Wave domain: the scheduler driving spawn ticks, completion checks,
//! and level progression.
//!
//! All delayed scheduler work goes through one timer deck so pausing
//! the deck pauses the whole wave flow, and a level teardown can drop
//! every pending action at once.

use bevy::ecs::message::{Message, MessageReader, MessageWriter};
use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::budget::{pick_archetype, scale_budget};
use super::events::{StartLevel, WaveCompleted, WaveCountersChanged};
use super::placement::{SpawnQuery, find_spawn_position};
use super::rewards::Pickup;
use super::state::{BOSS_DISPLAY_BONUS, TOTAL_WAVES, WaveState, visibility_burst};
use super::table::WaveTable;
use crate::arena::Playfield;
use crate::core::{LevelProgress, RunSeed};
use crate::enemies::{
    Ally, Archetype, Boss, EffectTimers, Enemy, EnemyKilledEvent, KillClaim, Projectile,
    SpawnMinion, spawn_enemy,
};
use crate::movement::Player;
use crate::timing::TimerDeck;

/// Interval between scheduled spawns once the opening burst is down.
pub const SPAWN_INTERVAL: f32 = 0.8;
/// Hard ceiling on simultaneously live non-boss enemies.
pub const LIVE_CAP: usize = 15;
/// A wave that has not completed after this long is assumed stuck.
pub const STALL_TIMEOUT: f32 = 120.0;
/// Breather between waves of the same level.
pub const WAVE_COOLDOWN: f32 = 4.0;
/// Longer breather after a level completes.
pub const LEVEL_RESUME_DELAY: f32 = 6.0;

/// Exclusion radii for spawn placement.
const PLAYER_EXCLUSION: f32 = 220.0;
const ENTITY_EXCLUSION: f32 = 48.0;

/// Deferred scheduler work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaveAction {
    SpawnTick,
    StallTimeout,
    CooldownOver,
    LevelResume,
}

/// Timer deck for the scheduler.
#[derive(Resource, Default)]
pub struct WaveTimers {
    pub deck: TimerDeck<WaveAction>,
}

/// A scheduler timer fired this frame.
#[derive(Debug)]
pub struct WaveActionFired(pub WaveAction);

impl Message for WaveActionFired {}

/// Seeded RNG stream for spawn draws and placement.
#[derive(Resource)]
pub struct SpawnRng(pub ChaCha8Rng);

impl FromWorld for SpawnRng {
    fn from_world(world: &mut World) -> Self {
        let seed = world.resource::<RunSeed>().seed;
        info!("Spawn RNG seeded with {}", seed);
        Self(ChaCha8Rng::seed_from_u64(seed))
    }
}

pub(crate) fn begin_run(
    progress: Res<LevelProgress>,
    mut starts: MessageWriter<StartLevel>,
) {
    starts.write(StartLevel {
        level: progress.level,
    });
}

pub(crate) fn dispatch_wave_timers(
    time: Res<Time>,
    mut timers: ResMut<WaveTimers>,
    mut fired: MessageWriter<WaveActionFired>,
) {
    for action in timers.deck.tick(time.delta()) {
        fired.write(WaveActionFired(action));
    }
}

/// Books kills into the wave counters. Kills can never outrun spawns.
pub(crate) fn handle_enemy_killed(
    mut kills: MessageReader<EnemyKilledEvent>,
    mut state: ResMut<WaveState>,
    mut counters: MessageWriter<WaveCountersChanged>,
) {
    let mut changed = false;
    for kill in kills.read() {
        if !state.active {
            continue;
        }
        if state.killed < state.spawned {
            state.killed += 1;
            changed = true;
        }
        debug!("Kill booked: {:?} ({:?})", kill.entity, kill.archetype);
    }
    if changed {
        emit_counters(&state, &mut counters);
    }
}

/// Boss reinforcements join the running wave: they count as both
/// planned and spawned so completion still requires killing them.
pub(crate) fn handle_spawn_minion(
    mut requests: MessageReader<SpawnMinion>,
    mut commands: Commands,
    mut state: ResMut<WaveState>,
    progress: Res<LevelProgress>,
    playfield: Res<Playfield>,
    mut counters: MessageWriter<WaveCountersChanged>,
) {
    let mut changed = false;
    for request in requests.read() {
        if !state.active {
            continue;
        }
        let position = playfield.clamp(request.position);
        spawn_enemy(&mut commands, request.archetype, position, progress.stage());
        state.planned_total += 1;
        state.spawned += 1;
        changed = true;
    }
    if changed {
        emit_counters(&state, &mut counters);
    }
}

type SchedulerEnemyQuery<'w, 's> = Query<
    'w,
    's,
    (Entity, &'static Transform, &'static KillClaim, Has<Boss>),
    With<Enemy>,
>;

/// The scheduler proper: starts waves, spawns on ticks, checks
/// completion, and forces stuck waves closed.
pub(crate) fn run_wave_scheduler(
    mut commands: Commands,
    mut state: ResMut<WaveState>,
    mut wave_timers: ResMut<WaveTimers>,
    mut effect_timers: ResMut<EffectTimers>,
    mut rng: ResMut<SpawnRng>,
    mut progress: ResMut<LevelProgress>,
    table: Res<WaveTable>,
    playfield: Res<Playfield>,
    mut starts: MessageReader<StartLevel>,
    mut fired: MessageReader<WaveActionFired>,
    player_query: Query<&Transform, (With<Player>, Without<Enemy>)>,
    enemy_query: SchedulerEnemyQuery,
    obstacle_query: Query<&Transform, (Or<(With<Ally>, With<Pickup>)>, Without<Enemy>)>,
    mut completions: MessageWriter<WaveCompleted>,
    mut counters: MessageWriter<WaveCountersChanged>,
) {
    let Ok(player_transform) = player_query.single() else {
        return;
    };
    let player_pos = player_transform.translation.truncate();

    let mut exclusions: Vec<(Vec2, f32)> = vec![(player_pos, PLAYER_EXCLUSION)];
    let mut live_non_boss = 0usize;
    let mut live_total = 0usize;
    for (_, transform, claim, is_boss) in &enemy_query {
        exclusions.push((transform.translation.truncate(), ENTITY_EXCLUSION));
        if claim.is_claimed() {
            continue;
        }
        live_total += 1;
        if !is_boss {
            live_non_boss += 1;
        }
    }
    for transform in &obstacle_query {
        exclusions.push((transform.translation.truncate(), ENTITY_EXCLUSION));
    }

    for start in starts.read() {
        info!("Starting level {}", start.level);
        progress.level = start.level;
        state.reset_counters();
        state.wave_number = 0;
        wave_timers.deck.clear();
        live_total += begin_wave(
            &mut commands,
            &mut state,
            &mut wave_timers,
            &mut rng,
            &table,
            &progress,
            &playfield,
            &mut exclusions,
            live_non_boss,
            &mut counters,
        );
    }

    for action in fired.read() {
        match action.0 {
            WaveAction::SpawnTick => {
                if state.active
                    && state.remaining_to_spawn() > 0
                    && try_spawn_one(
                        &mut commands,
                        &mut state,
                        &mut rng,
                        &progress,
                        &playfield,
                        &mut exclusions,
                        &mut live_non_boss,
                        &mut counters,
                    )
                {
                    live_total += 1;
                }
                if state.active && state.remaining_to_spawn() == 0
                    && let Some(handle) = state.spawn_tick.take()
                {
                    wave_timers.deck.cancel(handle);
                }
            }
            WaveAction::StallTimeout => {
                if state.active {
                    warn!(
                        "Wave {} stalled after {}s, forcing completion",
                        state.wave_number, STALL_TIMEOUT
                    );
                    force_complete_wave(
                        &mut commands,
                        &mut state,
                        &mut wave_timers,
                        &mut effect_timers,
                        &mut progress,
                        &enemy_query,
                        &mut completions,
                        &mut counters,
                    );
                    live_total = 0;
                }
            }
            WaveAction::CooldownOver | WaveAction::LevelResume => {
                state.cooling_down = false;
                live_total += begin_wave(
                    &mut commands,
                    &mut state,
                    &mut wave_timers,
                    &mut rng,
                    &table,
                    &progress,
                    &playfield,
                    &mut exclusions,
                    live_non_boss,
                    &mut counters,
                );
            }
        }
    }

    match completion_due(&state, live_total) {
        Some(CompletionKind::Organic) => {
            complete_wave(
                &mut state,
                &mut wave_timers,
                &mut progress,
                false,
                &mut completions,
                &mut counters,
            );
        }
        Some(CompletionKind::Forced) => {
            // Counters disagree with the field; the wave cannot be
            // trusted to close on its own.
            warn!(
                "Wave {} counters off (spawned {}, killed {}), forcing completion",
                state.wave_number, state.spawned, state.killed
            );
            force_complete_wave(
                &mut commands,
                &mut state,
                &mut wave_timers,
                &mut effect_timers,
                &mut progress,
                &enemy_query,
                &mut completions,
                &mut counters,
            );
        }
        None => {}
    }
}

/// How a wave should close, if it should close at all this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CompletionKind {
    Organic,
    Forced,
}

/// Completion is never due while anything planned is unspawned or any
/// enemy is still standing. With the field empty, the kill-ratio guard
/// decides between organic completion and forced recovery.
pub(crate) fn completion_due(state: &WaveState, live_total: usize) -> Option<CompletionKind> {
    if !state.active || state.remaining_to_spawn() > 0 || live_total > 0 {
        return None;
    }
    if state.ratio_guard_met() {
        Some(CompletionKind::Organic)
    } else {
        Some(CompletionKind::Forced)
    }
}

/// Settles the counters for a closing wave. A forced close books every
/// planned spawn as down, so killed == spawned == planned afterwards.
pub(crate) fn normalize_for_completion(state: &mut WaveState, forced: bool) {
    if forced {
        state.spawned = state.planned_total;
    }
    state.killed = state.spawned;
    state.active = false;
    state.cooling_down = true;
    state.display_bonus = 0;
}

/// Starts the next wave of the current level. Returns how many enemies
/// were put down this frame so the caller's live count stays honest.
#[allow(clippy::too_many_arguments)]
fn begin_wave(
    commands: &mut Commands,
    state: &mut WaveState,
    wave_timers: &mut WaveTimers,
    rng: &mut SpawnRng,
    table: &WaveTable,
    progress: &LevelProgress,
    playfield: &Playfield,
    exclusions: &mut Vec<(Vec2, f32)>,
    live_non_boss: usize,
    counters: &mut MessageWriter<WaveCountersChanged>,
) -> usize {
    if state.active || state.cooling_down {
        return 0;
    }

    let wave = state.wave_number + 1;
    state.reset_counters();
    state.wave_number = wave;
    state.active = true;

    let stage = progress.stage();
    let phase = progress.stage_phase();
    let mut put_down = 0usize;

    if state.is_boss_wave() {
        state.planned_total = 1;
        state.display_bonus = BOSS_DISPLAY_BONUS;
        let query = SpawnQuery::new(playfield.spawn_min(), playfield.spawn_max())
            .exclude(exclusions[0].0, exclusions[0].1);
        let position = find_spawn_position(&mut rng.0, &query).unwrap_or(Vec2::ZERO);
        spawn_enemy(commands, Archetype::Boss, position, stage);
        state.spawned = 1;
        put_down += 1;
        info!("Boss wave started (level {}, stage {})", progress.level, stage);
    } else {
        let raw = table.raw_counts(phase, wave, stage);
        state.budget = scale_budget(&raw);
        state.planned_total = state.budget.total();
        info!(
            "Wave {}/{} started: {} enemies planned ({:?} phase)",
            wave, TOTAL_WAVES, state.planned_total, phase
        );

        let burst = visibility_burst(state.planned_total);
        let mut live = live_non_boss;
        for _ in 0..burst {
            if !try_spawn_one_inner(
                commands, state, rng, progress, playfield, exclusions, &mut live,
            ) {
                break;
            }
            put_down += 1;
        }

        if state.remaining_to_spawn() > 0 {
            state.spawn_tick = Some(wave_timers.deck.schedule(
                "wave-spawn-tick",
                SPAWN_INTERVAL,
                TimerMode::Repeating,
                WaveAction::SpawnTick,
            ));
        }
    }

    state.stall_timeout = Some(wave_timers.deck.schedule(
        "wave-stall-timeout",
        STALL_TIMEOUT,
        TimerMode::Once,
        WaveAction::StallTimeout,
    ));
    emit_counters(state, counters);
    put_down
}

/// One scheduled spawn, respecting the live cap and placement rules.
#[allow(clippy::too_many_arguments)]
fn try_spawn_one(
    commands: &mut Commands,
    state: &mut WaveState,
    rng: &mut SpawnRng,
    progress: &LevelProgress,
    playfield: &Playfield,
    exclusions: &mut Vec<(Vec2, f32)>,
    live_non_boss: &mut usize,
    counters: &mut MessageWriter<WaveCountersChanged>,
) -> bool {
    let spawned = try_spawn_one_inner(
        commands,
        state,
        rng,
        progress,
        playfield,
        exclusions,
        live_non_boss,
    );
    if spawned {
        emit_counters(state, counters);
    }
    spawned
}

fn try_spawn_one_inner(
    commands: &mut Commands,
    state: &mut WaveState,
    rng: &mut SpawnRng,
    progress: &LevelProgress,
    playfield: &Playfield,
    exclusions: &mut Vec<(Vec2, f32)>,
    live_non_boss: &mut usize,
) -> bool {
    if state.remaining_to_spawn() == 0 {
        return false;
    }
    // Budget stays booked; the spawn retries on a later tick.
    if *live_non_boss >= LIVE_CAP {
        return false;
    }

    let archetype = pick_archetype(&mut rng.0, &state.budget);
    let mut query = SpawnQuery::new(playfield.spawn_min(), playfield.spawn_max());
    query.exclusions = exclusions.clone();

    let Some(position) = find_spawn_position(&mut rng.0, &query) else {
        warn!("No free spawn position found, skipping this tick");
        return false;
    };

    spawn_enemy(commands, archetype, position, progress.stage());
    state.budget.decrement(archetype);
    state.spawned += 1;
    *live_non_boss += 1;
    exclusions.push((position, ENTITY_EXCLUSION));
    true
}

/// Tears the wave down by force: every enemy is removed and the
/// counters are normalized as if all spawns had been killed.
#[allow(clippy::too_many_arguments)]
fn force_complete_wave(
    commands: &mut Commands,
    state: &mut WaveState,
    wave_timers: &mut WaveTimers,
    effect_timers: &mut EffectTimers,
    progress: &mut LevelProgress,
    enemy_query: &SchedulerEnemyQuery,
    completions: &mut MessageWriter<WaveCompleted>,
    counters: &mut MessageWriter<WaveCountersChanged>,
) {
    for (entity, _, _, _) in enemy_query {
        effect_timers.deck.cancel_owned_by(entity);
        commands.entity(entity).despawn();
    }
    complete_wave(state, wave_timers, progress, true, completions, counters);
}

/// Closes the wave and schedules what comes next.
fn complete_wave(
    state: &mut WaveState,
    wave_timers: &mut WaveTimers,
    progress: &mut LevelProgress,
    forced: bool,
    completions: &mut MessageWriter<WaveCompleted>,
    counters: &mut MessageWriter<WaveCountersChanged>,
) {
    if let Some(handle) = state.spawn_tick.take() {
        wave_timers.deck.cancel(handle);
    }
    if let Some(handle) = state.stall_timeout.take() {
        wave_timers.deck.cancel(handle);
    }

    normalize_for_completion(state, forced);

    let level_complete = state.wave_number >= TOTAL_WAVES;
    completions.write(WaveCompleted {
        wave: state.wave_number,
        forced,
        level_complete,
    });

    if level_complete {
        info!("Level {} complete", progress.level);
        progress.level += 1;
        state.wave_number = 0;
        wave_timers.deck.schedule(
            "level-resume",
            LEVEL_RESUME_DELAY,
            TimerMode::Once,
            WaveAction::LevelResume,
        );
    } else {
        info!(
            "Wave {} complete{}",
            state.wave_number,
            if forced { " (forced)" } else { "" }
        );
        wave_timers.deck.schedule(
            "wave-cooldown",
            WAVE_COOLDOWN,
            TimerMode::Once,
            WaveAction::CooldownOver,
        );
    }

    emit_counters(state, counters);
}

fn emit_counters(state: &WaveState, counters: &mut MessageWriter<WaveCountersChanged>) {
    counters.write(WaveCountersChanged {
        wave: state.wave_number,
        total_waves: TOTAL_WAVES,
        remaining: state.remaining_to_spawn(),
        planned: state.displayed_planned(),
        spawned: state.displayed_spawned(),
        killed: state.killed,
    });
}

/// Clears the field and both timer decks when the run ends.
pub(crate) fn cleanup_run(
    mut commands: Commands,
    mut state: ResMut<WaveState>,
    mut wave_timers: ResMut<WaveTimers>,
    mut effect_timers: ResMut<EffectTimers>,
    despawn_query: Query<
        Entity,
        Or<(With<Enemy>, With<Ally>, With<Pickup>, With<Projectile>)>,
    >,
) {
    for entity in &despawn_query {
        commands.entity(entity).despawn();
    }
    wave_timers.deck.clear();
    effect_timers.deck.clear();
    state.reset_counters();
    state.wave_number = 0;
    info!("Run cleaned up");
}
