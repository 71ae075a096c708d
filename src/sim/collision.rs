//! Axis-aligned bounding-box collision
//!
//! The only collision primitive in the game. Projectiles are circles, but they
//! are tested by their enclosing box; the approximation is good enough at
//! these sizes. No swept tests: a fast enough projectile can tunnel.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle (`min` is the top-left corner in screen space)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Box from top-left corner and size
    #[inline]
    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self {
            min: pos,
            max: pos + size,
        }
    }

    /// Box enclosing a circle
    #[inline]
    pub fn from_circle(center: Vec2, radius: f32) -> Self {
        Self {
            min: center - Vec2::splat(radius),
            max: center + Vec2::splat(radius),
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Overlap test; touching edges count as a hit
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
    }
}
