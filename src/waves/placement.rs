//! Wave domain: rejection-sampled spawn placement.

use bevy::prelude::*;
use rand::Rng;

/// How many candidate positions to try before giving up on a spawn.
pub const DEFAULT_ATTEMPTS: u32 = 50;

/// A placement request: a rectangle to sample inside and a set of
/// circular exclusion zones the result must avoid.
#[derive(Debug, Clone)]
pub struct SpawnQuery {
    pub min: Vec2,
    pub max: Vec2,
    pub exclusions: Vec<(Vec2, f32)>,
    pub attempts: u32,
}

impl SpawnQuery {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self {
            min,
            max,
            exclusions: Vec::new(),
            attempts: DEFAULT_ATTEMPTS,
        }
    }

    pub fn exclude(mut self, center: Vec2, radius: f32) -> Self {
        self.exclusions.push((center, radius));
        self
    }
}

/// Samples uniform positions inside the query rectangle until one clears
/// every exclusion zone. Returns None after exactly `attempts` rejected
/// candidates; the caller decides whether to skip or retry later.
pub fn find_spawn_position<R: Rng + ?Sized>(rng: &mut R, query: &SpawnQuery) -> Option<Vec2> {
    for _ in 0..query.attempts {
        let candidate = Vec2::new(
            rng.random_range(query.min.x..=query.max.x),
            rng.random_range(query.min.y..=query.max.y),
        );
        let blocked = query
            .exclusions
            .iter()
            .any(|(center, radius)| candidate.distance(*center) < *radius);
        if !blocked {
            return Some(candidate);
        }
    }
    None
}
