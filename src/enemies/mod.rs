//! Enemy domain: archetypes, behaviors, statuses, and combat resolution.

mod behavior;
mod boss;
mod components;
mod damage;
mod events;
mod params;
mod spawn;
mod statuses;

#[cfg(test)]
mod tests;

pub use behavior::spawn_projectile;
pub use components::{
    AbilityCooldowns, ActiveStatuses, Ally, Archetype, AttackStats, Boss, BossKind, Enemy, Health,
    Invulnerable, KillClaim, Locomotion, Projectile, ShotPayload, StatusKind,
};
pub use events::{BossPhaseChangeEvent, DamageEvent, DieRequest, EnemyKilledEvent, SpawnMinion};
pub use params::{stage_damage, stage_health};
pub use spawn::{boss_kind_for_stage, spawn_enemy};
pub use statuses::{EffectFired, EffectTimers, apply_frost, apply_poison};

use bevy::prelude::*;

use crate::core::{GameState, gameplay_active};

pub struct EnemiesPlugin;

impl Plugin for EnemiesPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<EffectTimers>()
            .init_resource::<behavior::BehaviorRng>()
            .add_message::<DamageEvent>()
            .add_message::<DieRequest>()
            .add_message::<EnemyKilledEvent>()
            .add_message::<BossPhaseChangeEvent>()
            .add_message::<SpawnMinion>()
            .add_message::<EffectFired>()
            .add_systems(
                Update,
                (
                    statuses::tick_effect_timers,
                    statuses::clear_statuses,
                    statuses::apply_poison_ticks,
                    behavior::arrive_teleports,
                    behavior::detonate_bombs,
                )
                    .chain()
                    .run_if(in_state(GameState::Playing))
                    .run_if(gameplay_active),
            )
            .add_systems(
                Update,
                (
                    behavior::tick_ability_cooldowns,
                    behavior::tick_invulnerability,
                    behavior::drive_enemy_movement,
                    behavior::trigger_dasher_dashes,
                    behavior::trigger_bomber_fuses,
                    behavior::strike_on_contact,
                    behavior::fire_shooter_projectiles,
                    behavior::drive_mage_abilities,
                    boss::drive_boss_specials,
                    behavior::drive_allies,
                    behavior::update_projectiles,
                    behavior::flash_bombing,
                )
                    .chain()
                    .run_if(in_state(GameState::Playing))
                    .run_if(gameplay_active),
            )
            .add_systems(
                Update,
                (
                    damage::apply_damage,
                    damage::handle_die_requests,
                    damage::process_deaths,
                    damage::process_ally_deaths,
                    damage::detect_player_defeat,
                    boss::announce_boss_phases,
                )
                    .chain()
                    .run_if(in_state(GameState::Playing))
                    .run_if(gameplay_active),
            );
    }
}
