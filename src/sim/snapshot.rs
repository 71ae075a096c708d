//! Read-only render snapshot
//!
//! Everything the render sink needs for one frame, copied out of the world.
//! Entities whose sprite is still pending are left out.

use glam::Vec2;
use serde::Serialize;

use super::state::{GamePhase, World};
use crate::consts::{INVADER_PROJECTILE_COLOR, PROJECTILE_COLOR};

/// The player's ship as drawn
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ShipView {
    pub pos: Vec2,
    pub size: Vec2,
    pub rotation: f32,
    pub opacity: f32,
}

/// A filled circle
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CircleView {
    pub center: Vec2,
    pub radius: f32,
    pub color: u32,
    pub opacity: f32,
}

/// A filled rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RectView {
    pub pos: Vec2,
    pub size: Vec2,
    pub color: u32,
}

/// A sprite drawn at its resolved size
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpriteView {
    pub pos: Vec2,
    pub size: Vec2,
}

/// One frame of render state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub score: u64,
    pub phase: GamePhase,
    pub paused: bool,
    pub player: Option<ShipView>,
    pub projectiles: Vec<CircleView>,
    pub invader_projectiles: Vec<RectView>,
    pub invaders: Vec<SpriteView>,
    pub particles: Vec<CircleView>,
}

impl Snapshot {
    pub fn capture(world: &World) -> Self {
        let player = world.player.sprite.size().map(|size| ShipView {
            pos: world.player.pos,
            size,
            rotation: world.player.rotation,
            opacity: world.player.opacity,
        });

        let projectiles = world
            .projectiles
            .iter()
            .map(|p| CircleView {
                center: p.pos,
                radius: p.radius,
                color: PROJECTILE_COLOR,
                opacity: 1.0,
            })
            .collect();

        let invader_projectiles = world
            .invader_projectiles
            .iter()
            .map(|p| RectView {
                pos: p.pos,
                size: p.size,
                color: INVADER_PROJECTILE_COLOR,
            })
            .collect();

        let invaders = world
            .waves
            .iter()
            .flat_map(|w| w.invaders.iter())
            .filter_map(|i| i.sprite.size().map(|size| SpriteView { pos: i.pos, size }))
            .collect();

        let particles = world
            .particles
            .iter()
            .map(|p| CircleView {
                center: p.pos,
                radius: p.radius,
                color: p.color,
                opacity: p.opacity,
            })
            .collect();

        Self {
            score: world.score,
            phase: world.phase,
            paused: world.paused,
            player,
            projectiles,
            invader_projectiles,
            invaders,
            particles,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::{TickInput, tick};

    #[test]
    fn test_pending_entities_hidden() {
        let mut world = World::new(4);
        tick(&mut world, &TickInput::default());
        let snap = Snapshot::capture(&world);
        assert!(snap.player.is_none());
        assert!(snap.invaders.is_empty());
        assert_eq!(snap.particles.len(), 75);
    }

    #[test]
    fn test_ready_entities_visible() {
        let mut world = World::ready(Settings::default(), 4).unwrap();
        tick(&mut world, &TickInput::default());
        let snap = Snapshot::capture(&world);
        let ship = snap.player.unwrap();
        assert_eq!(ship.size, Vec2::new(50.0, 50.0));
        assert_eq!(ship.opacity, 1.0);
        assert_eq!(snap.invaders.len(), world.invader_count());
        assert_eq!(snap.phase, GamePhase::Active);
    }

    #[test]
    fn test_shots_carry_colors() {
        let mut world = World::ready(Settings::default(), 4).unwrap();
        let a = world.next_entity_id();
        let b = world.next_entity_id();
        world.projectiles.push(crate::sim::Projectile::new(
            a,
            Vec2::new(100.0, 100.0),
            Vec2::ZERO,
            4.0,
        ));
        world.invader_projectiles.push(crate::sim::InvaderProjectile::new(
            b,
            Vec2::new(200.0, 100.0),
            Vec2::ZERO,
            Vec2::new(6.0, 12.0),
        ));
        let snap = Snapshot::capture(&world);
        assert_eq!(snap.projectiles[0].color, 0x00FF00);
        assert_eq!(
            snap.invader_projectiles[0],
            RectView {
                pos: Vec2::new(200.0, 100.0),
                size: Vec2::new(6.0, 12.0),
                color: 0xFF0000,
            }
        );
    }

    #[test]
    fn test_snapshot_serializes() {
        let world = World::ready(Settings::default(), 4).unwrap();
        let json = serde_json::to_string(&Snapshot::capture(&world)).unwrap();
        assert!(json.contains("\"score\":0"));
        assert!(json.contains("\"Active\""));
    }
}
