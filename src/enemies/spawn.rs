//! Enemy domain: entity assembly for hostiles and bosses.

use bevy::prelude::*;

use super::components::{
    AbilityCooldowns, ActiveStatuses, Archetype, AttackStats, Boss, BossKind, Enemy, Health,
    KillClaim, Locomotion,
};
use super::params::{stage_damage, stage_health};

/// Spawns one enemy of the given archetype at a position, scaled to the
/// stage. Returns the new entity.
pub fn spawn_enemy(
    commands: &mut Commands,
    archetype: Archetype,
    position: Vec2,
    stage: u32,
) -> Entity {
    let params = archetype.params();
    let mut entity = commands.spawn((
        Enemy,
        archetype,
        Health::new(stage_health(params.max_health, stage)),
        Locomotion::new(params.speed),
        AttackStats {
            damage: stage_damage(params.damage, stage),
        },
        KillClaim::default(),
        ActiveStatuses::default(),
        AbilityCooldowns::with(archetype.ability_cooldowns()),
        Sprite {
            color: params.color,
            custom_size: Some(Vec2::splat(params.size)),
            ..default()
        },
        Transform::from_xyz(position.x, position.y, 1.0),
    ));

    if archetype == Archetype::Boss {
        entity.insert(Boss::new(boss_kind_for_stage(stage)));
    }

    entity.id()
}

/// Boss variant rotates with the stage so consecutive stages feel
/// different.
pub fn boss_kind_for_stage(stage: u32) -> BossKind {
    match stage % 3 {
        1 => BossKind::Summoner,
        2 => BossKind::Volley,
        _ => BossKind::Charger,
    }
}
