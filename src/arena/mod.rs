//! Arena domain: playfield bounds and terrain patches that slow movement.

#[cfg(test)]
mod tests;

use bevy::prelude::*;

/// Rectangular playfield centered at the origin. Spawn placement stays
/// inside the border margin; movement is clamped to the full extent.
#[derive(Resource, Debug, Clone)]
pub struct Playfield {
    pub half_extent: Vec2,
    pub border_margin: f32,
}

impl Default for Playfield {
    fn default() -> Self {
        Self {
            half_extent: Vec2::new(800.0, 600.0),
            border_margin: 48.0,
        }
    }
}

impl Playfield {
    /// Inner rectangle valid for spawn placement.
    pub fn spawn_min(&self) -> Vec2 {
        -self.half_extent + Vec2::splat(self.border_margin)
    }

    pub fn spawn_max(&self) -> Vec2 {
        self.half_extent - Vec2::splat(self.border_margin)
    }

    pub fn clamp(&self, position: Vec2) -> Vec2 {
        position.clamp(-self.half_extent, self.half_extent)
    }

    pub fn contains(&self, position: Vec2) -> bool {
        position.x.abs() <= self.half_extent.x && position.y.abs() <= self.half_extent.y
    }
}

/// A circular patch of terrain that scales movement speed while inside it.
#[derive(Debug, Clone)]
pub struct TerrainPatch {
    pub center: Vec2,
    pub radius: f32,
    pub slow_factor: f32,
}

/// Terrain overlay for the playfield. Patches never overlap in the default
/// layout, so the first hit wins.
#[derive(Resource, Debug, Clone)]
pub struct TerrainGrid {
    pub patches: Vec<TerrainPatch>,
}

impl Default for TerrainGrid {
    fn default() -> Self {
        Self {
            patches: vec![
                TerrainPatch {
                    center: Vec2::new(-320.0, 180.0),
                    radius: 110.0,
                    slow_factor: 0.6,
                },
                TerrainPatch {
                    center: Vec2::new(280.0, -240.0),
                    radius: 130.0,
                    slow_factor: 0.6,
                },
            ],
        }
    }
}

impl TerrainGrid {
    /// Speed multiplier at a position, 1.0 on clear ground.
    pub fn slow_factor_at(&self, position: Vec2) -> f32 {
        for patch in &self.patches {
            if position.distance(patch.center) <= patch.radius {
                return patch.slow_factor;
            }
        }
        1.0
    }
}

#[derive(Component)]
struct ArenaBackdrop;

fn setup_arena(mut commands: Commands, playfield: Res<Playfield>, terrain: Res<TerrainGrid>) {
    commands.spawn((
        ArenaBackdrop,
        Sprite {
            color: Color::srgb(0.10, 0.11, 0.13),
            custom_size: Some(playfield.half_extent * 2.0),
            ..default()
        },
        Transform::from_xyz(0.0, 0.0, -10.0),
    ));

    for patch in &terrain.patches {
        commands.spawn((
            ArenaBackdrop,
            Sprite {
                color: Color::srgb(0.22, 0.18, 0.12),
                custom_size: Some(Vec2::splat(patch.radius * 2.0)),
                ..default()
            },
            Transform::from_xyz(patch.center.x, patch.center.y, -9.0),
        ));
    }
}

pub struct ArenaPlugin;

impl Plugin for ArenaPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Playfield>()
            .init_resource::<TerrainGrid>()
            .add_systems(Startup, setup_arena);
    }
}
