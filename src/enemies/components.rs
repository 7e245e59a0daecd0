//! Enemy domain: components shared by every hostile and its abilities.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::timing::TimerHandle;

/// Marker for every hostile entity, boss included.
#[derive(Component)]
pub struct Enemy;

/// Friendly helper unit spawned as a wave reward. Fires on its own
/// timer at nearby hostiles.
#[derive(Component)]
pub struct Ally {
    pub attack: Timer,
}

impl Default for Ally {
    fn default() -> Self {
        Self {
            attack: Timer::from_seconds(1.2, TimerMode::Repeating),
        }
    }
}

/// Behavioral archetype. Determines stats, abilities, and movement style.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Archetype {
    Melee,
    Dasher,
    Bomber,
    Shooter,
    Mage,
    Boss,
}

impl Archetype {
    /// Non-boss archetypes in budget order.
    pub const ROSTER: [Archetype; 5] = [
        Archetype::Melee,
        Archetype::Dasher,
        Archetype::Bomber,
        Archetype::Shooter,
        Archetype::Mage,
    ];
}

/// Health component for entities that can take damage
#[derive(Component, Debug, Clone)]
pub struct Health {
    pub current: u32,
    pub max: u32,
}

impl Health {
    pub fn new(max: u32) -> Self {
        Self { current: max, max }
    }

    pub fn take_damage(&mut self, amount: u32) {
        self.current = self.current.saturating_sub(amount);
    }

    pub fn heal(&mut self, amount: u32) {
        self.current = (self.current + amount).min(self.max);
    }

    pub fn is_dead(&self) -> bool {
        self.current == 0
    }

    pub fn percent(&self) -> f32 {
        if self.max == 0 {
            return 0.0;
        }
        self.current as f32 / self.max as f32
    }
}

/// Movement speeds. `base_speed` is the reference value restored after a
/// slow or dash ends; `current_speed` is what the mover uses each frame.
#[derive(Component, Debug, Clone)]
pub struct Locomotion {
    pub base_speed: f32,
    pub current_speed: f32,
}

impl Locomotion {
    pub fn new(speed: f32) -> Self {
        Self {
            base_speed: speed,
            current_speed: speed,
        }
    }
}

/// Contact or projectile damage dealt by the entity.
#[derive(Component, Debug, Clone)]
pub struct AttackStats {
    pub damage: u32,
}

/// Temporary damage immunity.
#[derive(Component, Debug)]
pub struct Invulnerable {
    pub timer: Timer,
}

impl Invulnerable {
    pub fn for_seconds(seconds: f32) -> Self {
        Self {
            timer: Timer::from_seconds(seconds, TimerMode::Once),
        }
    }
}

/// Exactly one kill credit per enemy. Damage resolution claims it on the
/// lethal hit; later hits on the same entity find it already claimed.
#[derive(Component, Debug, Default)]
pub struct KillClaim {
    claimed: bool,
}

impl KillClaim {
    /// Returns true only on the first call.
    pub fn try_claim(&mut self) -> bool {
        if self.claimed {
            return false;
        }
        self.claimed = true;
        true
    }

    pub fn is_claimed(&self) -> bool {
        self.claimed
    }
}

/// Abilities an enemy can hold a cooldown for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ability {
    Strike,
    Dash,
    Shoot,
    Spell,
    Teleport,
    Summon,
    Volley,
    Charge,
}

/// A single ability cooldown. `remaining` counts down to ready; `max` is
/// the reset value and the target of phase scaling.
#[derive(Debug, Clone)]
pub struct Cooldown {
    pub remaining: f32,
    pub max: f32,
}

impl Cooldown {
    pub fn ready_in(max: f32) -> Self {
        Self { remaining: max, max }
    }

    pub fn is_ready(&self) -> bool {
        self.remaining <= 0.0
    }

    pub fn tick(&mut self, delta: f32) {
        self.remaining = (self.remaining - delta).max(0.0);
    }

    pub fn reset(&mut self) {
        self.remaining = self.max;
    }

    pub fn scale_max(&mut self, factor: f32) {
        self.max *= factor;
        self.remaining = self.remaining.min(self.max);
    }
}

/// Per-entity ability cooldowns.
#[derive(Component, Debug, Default)]
pub struct AbilityCooldowns {
    pub cooldowns: HashMap<Ability, Cooldown>,
}

impl AbilityCooldowns {
    pub fn with(entries: impl IntoIterator<Item = (Ability, f32)>) -> Self {
        Self {
            cooldowns: entries
                .into_iter()
                .map(|(ability, max)| (ability, Cooldown::ready_in(max)))
                .collect(),
        }
    }

    pub fn is_ready(&self, ability: Ability) -> bool {
        self.cooldowns
            .get(&ability)
            .is_some_and(|cooldown| cooldown.is_ready())
    }

    pub fn reset(&mut self, ability: Ability) {
        if let Some(cooldown) = self.cooldowns.get_mut(&ability) {
            cooldown.reset();
        }
    }

    pub fn tick_all(&mut self, delta: f32) {
        for cooldown in self.cooldowns.values_mut() {
            cooldown.tick(delta);
        }
    }

    pub fn scale_maxima(&mut self, factor: f32) {
        for cooldown in self.cooldowns.values_mut() {
            cooldown.scale_max(factor);
        }
    }
}

/// Kinds of timed status an enemy or the player can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusKind {
    Frozen,
    Poisoned,
    Dashing,
    Teleporting,
    Bombing,
}

/// Payload of an active status. Fields are interpreted per kind: frost
/// keeps its slow factor in `magnitude`, dash keeps its heading and the
/// pre-dash speed in `snapshot`, poison keeps damage per tick in
/// `magnitude`.
#[derive(Debug, Clone)]
pub struct StatusEffect {
    pub magnitude: f32,
    pub snapshot: f32,
    pub heading: Vec2,
    pub timer: TimerHandle,
}

/// Statuses currently applied to an entity. A status already present is
/// never re-inserted, so the first application's snapshot survives until
/// the status clears.
#[derive(Component, Debug, Default)]
pub struct ActiveStatuses {
    statuses: HashMap<StatusKind, StatusEffect>,
}

impl ActiveStatuses {
    /// Inserts the status unless one of the same kind is already active.
    /// Returns true when the status was newly applied.
    pub fn begin(&mut self, kind: StatusKind, effect: StatusEffect) -> bool {
        if self.statuses.contains_key(&kind) {
            return false;
        }
        self.statuses.insert(kind, effect);
        true
    }

    pub fn end(&mut self, kind: StatusKind) -> Option<StatusEffect> {
        self.statuses.remove(&kind)
    }

    pub fn has(&self, kind: StatusKind) -> bool {
        self.statuses.contains_key(&kind)
    }

    pub fn get(&self, kind: StatusKind) -> Option<&StatusEffect> {
        self.statuses.get(&kind)
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }
}

/// Boss variants, chosen per stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BossKind {
    Summoner,
    Volley,
    Charger,
}

/// Boss phase tracking. Phase only ever climbs; each step permanently
/// scales the boss's cooldowns, damage, and speed.
#[derive(Component, Debug)]
pub struct Boss {
    pub kind: BossKind,
    pub phase: u8,
}

impl Boss {
    pub fn new(kind: BossKind) -> Self {
        Self { kind, phase: 1 }
    }
}

/// Status rider on a shot, applied to whatever the shot hits.
#[derive(Debug, Clone, Copy)]
pub enum ShotPayload {
    Frost { duration: f32 },
    Poison { damage_per_tick: u32, duration: f32 },
}

/// A projectile in flight. Despawned when `remaining` expires or on hit.
#[derive(Component, Debug)]
pub struct Projectile {
    pub velocity: Vec2,
    pub damage: u32,
    pub remaining: Timer,
    pub hostile: bool,
    pub payload: Option<ShotPayload>,
}
