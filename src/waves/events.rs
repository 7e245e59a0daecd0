//! Wave domain: scheduler messages.

use bevy::ecs::message::Message;

/// Kicks off a level: resets wave bookkeeping and starts wave 1.
#[derive(Debug)]
pub struct StartLevel {
    pub level: u32,
}

impl Message for StartLevel {}

/// The current wave finished, organically or by force.
#[derive(Debug)]
pub struct WaveCompleted {
    pub wave: u32,
    pub forced: bool,
    pub level_complete: bool,
}

impl Message for WaveCompleted {}

/// Counter snapshot for the HUD, emitted whenever the numbers move.
#[derive(Debug)]
pub struct WaveCountersChanged {
    pub wave: u32,
    pub total_waves: u32,
    pub remaining: u32,
    pub planned: u32,
    pub spawned: u32,
    pub killed: u32,
}

impl Message for WaveCountersChanged {}
