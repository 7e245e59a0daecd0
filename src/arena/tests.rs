//! Arena domain: tests for playfield bounds and terrain lookup.

use super::{Playfield, TerrainGrid, TerrainPatch};
use bevy::prelude::*;

#[test]
fn test_spawn_bounds_respect_margin() {
    let playfield = Playfield::default();
    assert_eq!(playfield.spawn_min(), Vec2::new(-752.0, -552.0));
    assert_eq!(playfield.spawn_max(), Vec2::new(752.0, 552.0));
}

#[test]
fn test_clamp_keeps_position_inside() {
    let playfield = Playfield::default();
    let clamped = playfield.clamp(Vec2::new(1200.0, -900.0));
    assert_eq!(clamped, Vec2::new(800.0, -600.0));
    assert!(playfield.contains(clamped));
}

#[test]
fn test_slow_factor_inside_and_outside_patch() {
    let terrain = TerrainGrid {
        patches: vec![TerrainPatch {
            center: Vec2::ZERO,
            radius: 100.0,
            slow_factor: 0.6,
        }],
    };
    assert_eq!(terrain.slow_factor_at(Vec2::new(50.0, 0.0)), 0.6);
    assert_eq!(terrain.slow_factor_at(Vec2::new(150.0, 0.0)), 1.0);
}
