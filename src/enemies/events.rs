//! Enemy domain: combat and lifecycle messages.

use bevy::ecs::message::Message;
use bevy::prelude::*;

use super::components::Archetype;

/// A request to deal damage to a target entity.
#[derive(Debug)]
pub struct DamageEvent {
    pub target: Entity,
    pub amount: u32,
}

impl Message for DamageEvent {}

/// A request to destroy an entity outright, crediting the kill. Issued
/// by bombers detonating on themselves.
#[derive(Debug)]
pub struct DieRequest {
    pub entity: Entity,
}

impl Message for DieRequest {}

/// Emitted exactly once per enemy, on the hit or destruction that claims
/// its kill credit.
#[derive(Debug)]
pub struct EnemyKilledEvent {
    pub entity: Entity,
    pub archetype: Archetype,
}

impl Message for EnemyKilledEvent {}

/// Boss crossed a health threshold and escalated.
#[derive(Debug)]
pub struct BossPhaseChangeEvent {
    pub entity: Entity,
    pub phase: u8,
}

impl Message for BossPhaseChangeEvent {}

/// Request to spawn a reinforcement at a position, issued by the
/// summoner boss. The wave scheduler books it into the current wave.
#[derive(Debug)]
pub struct SpawnMinion {
    pub position: Vec2,
    pub archetype: Archetype,
}

impl Message for SpawnMinion {}
