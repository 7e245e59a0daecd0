//! Enemy domain: per-archetype stat tables and ability tuning.

use bevy::prelude::*;

use super::components::{Ability, Archetype};

/// Base stats for an archetype before stage scaling.
#[derive(Debug, Clone, Copy)]
pub struct ArchetypeParams {
    pub max_health: u32,
    pub speed: f32,
    pub damage: u32,
    pub size: f32,
    pub color: Color,
}

impl Archetype {
    pub fn params(&self) -> ArchetypeParams {
        match self {
            Archetype::Melee => ArchetypeParams {
                max_health: 40,
                speed: 110.0,
                damage: 8,
                size: 24.0,
                color: Color::srgb(0.85, 0.3, 0.3),
            },
            Archetype::Dasher => ArchetypeParams {
                max_health: 30,
                speed: 140.0,
                damage: 10,
                size: 20.0,
                color: Color::srgb(0.95, 0.6, 0.2),
            },
            Archetype::Bomber => ArchetypeParams {
                max_health: 25,
                speed: 120.0,
                damage: 20,
                size: 22.0,
                color: Color::srgb(0.6, 0.6, 0.2),
            },
            Archetype::Shooter => ArchetypeParams {
                max_health: 30,
                speed: 95.0,
                damage: 7,
                size: 22.0,
                color: Color::srgb(0.4, 0.5, 0.9),
            },
            Archetype::Mage => ArchetypeParams {
                max_health: 35,
                speed: 85.0,
                damage: 9,
                size: 24.0,
                color: Color::srgb(0.7, 0.3, 0.8),
            },
            Archetype::Boss => ArchetypeParams {
                max_health: 1200,
                speed: 70.0,
                damage: 18,
                size: 56.0,
                color: Color::srgb(0.9, 0.15, 0.5),
            },
        }
    }

    /// Cooldown maxima for the archetype's abilities, in seconds.
    pub fn ability_cooldowns(&self) -> Vec<(Ability, f32)> {
        match self {
            Archetype::Melee => vec![(Ability::Strike, STRIKE_COOLDOWN)],
            Archetype::Dasher => {
                vec![(Ability::Strike, STRIKE_COOLDOWN), (Ability::Dash, DASH_COOLDOWN)]
            }
            Archetype::Bomber => Vec::new(),
            Archetype::Shooter => vec![(Ability::Shoot, 1.6)],
            Archetype::Mage => vec![(Ability::Spell, 2.5), (Ability::Teleport, 6.0)],
            Archetype::Boss => vec![
                (Ability::Strike, STRIKE_COOLDOWN),
                (Ability::Summon, 8.0),
                (Ability::Volley, 4.0),
                (Ability::Charge, 7.0),
            ],
        }
    }
}

/// Health and damage grow with the stage; speed stays flat so later
/// levels get tougher without getting twitchier.
pub fn stage_health(base: u32, stage: u32) -> u32 {
    let factor = 1.0 + 0.35 * (stage.saturating_sub(1)) as f32;
    (base as f32 * factor).round() as u32
}

pub fn stage_damage(base: u32, stage: u32) -> u32 {
    let factor = 1.0 + 0.25 * (stage.saturating_sub(1)) as f32;
    (base as f32 * factor).round() as u32
}

// Contact strikes.
pub const STRIKE_COOLDOWN: f32 = 0.8;
pub const STRIKE_RANGE: f32 = 30.0;

// Ally tuning.
pub const ALLY_ATTACK_RANGE: f32 = 300.0;
pub const ALLY_PROJECTILE_SPEED: f32 = 360.0;

// Dasher tuning.
pub const DASH_COOLDOWN: f32 = 5.0;
pub const DASH_WINDOW: f32 = 0.5;
pub const DASH_SPEED: f32 = 520.0;

// Bomber tuning.
pub const BOMB_PROXIMITY: f32 = 90.0;
pub const BOMB_FUSE: f32 = 1.5;
pub const BOMB_RADIUS: f32 = 120.0;
pub const BOMB_KNOCKBACK: f32 = 160.0;

// Shooter tuning. The shooter holds a band around the player, backing
// off inside the inner radius and closing outside the outer one.
pub const SHOOTER_BAND_INNER: f32 = 260.0;
pub const SHOOTER_BAND_OUTER: f32 = 420.0;
pub const SHOOTER_PROJECTILE_SPEED: f32 = 300.0;
pub const PROJECTILE_LIFETIME: f32 = 4.0;
pub const PROJECTILE_HIT_RADIUS: f32 = 24.0;

// Mage tuning.
pub const MAGE_SEEK_FACTOR: f32 = 0.6;
pub const MAGE_SPELL_RANGE: f32 = 480.0;
pub const MAGE_TELEPORT_MIN: f32 = 200.0;
pub const MAGE_TELEPORT_MAX: f32 = 360.0;
pub const MAGE_DISABLED_WINDOW: f32 = 0.6;
pub const MAGE_ARRIVE_AT: f32 = 0.3;
pub const MAGE_SPELL_SPEED: f32 = 220.0;

// Status tuning.
pub const POISON_TICK_INTERVAL: f32 = 1.0;
pub const FROST_SLOW_FACTOR: f32 = 0.5;

// Boss phase scaling, applied once per phase step.
pub const BOSS_PHASE_COOLDOWN_FACTOR: f32 = 0.7;
pub const BOSS_PHASE_DAMAGE_FACTOR: f32 = 1.5;
pub const BOSS_PHASE_SPEED_FACTOR: f32 = 1.2;
pub const BOSS_PHASE_INVULN_SECONDS: f32 = 2.0;
pub const BOSS_CHARGE_SPEED: f32 = 420.0;
pub const BOSS_CHARGE_WINDOW: f32 = 0.7;
pub const BOSS_VOLLEY_COUNT: u32 = 8;
