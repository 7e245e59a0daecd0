//! Core domain: run flow messages.

use bevy::ecs::message::Message;

/// External signal that the run is over. The wave scheduler stops issuing
/// spawns and the app transitions to its terminal state.
#[derive(Debug)]
pub struct GameOverSignal;

impl Message for GameOverSignal {}
