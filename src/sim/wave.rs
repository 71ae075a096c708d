//! Invader waves
//!
//! A wave is a rectangular grid of invaders that sweeps sideways, drops one
//! cell each time it bounces off an edge, and shoots from a random survivor.
//! Invaders are stored column-major, so the first and last survivors always
//! sit in the leftmost and rightmost surviving columns.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{EntityIds, Invader, InvaderProjectile, Sprite};
use crate::settings::Settings;

/// A grid of invaders sharing one trajectory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wave {
    pub id: u32,
    /// Top-left reference
    pub pos: Vec2,
    /// x: sweep speed, y: drop for this tick only (0 unless a bounce fired)
    pub vel: Vec2,
    /// Horizontal span from first to last survivor
    pub width: f32,
    pub columns: u32,
    pub rows: u32,
    /// Column-major; order decides the recomputed bounds
    pub invaders: Vec<Invader>,
}

impl Wave {
    /// Build a wave with randomized column/row counts at the origin
    pub fn spawn(
        rng: &mut impl Rng,
        settings: &Settings,
        sprite: Sprite,
        ids: &mut EntityIds,
    ) -> Self {
        let columns = rng.random_range(settings.wave_columns.min..=settings.wave_columns.max);
        let rows = rng.random_range(settings.wave_rows.min..=settings.wave_rows.max);
        Self::with_grid(columns, rows, settings, sprite, ids)
    }

    /// Build a wave with a fixed grid size
    pub fn with_grid(
        columns: u32,
        rows: u32,
        settings: &Settings,
        sprite: Sprite,
        ids: &mut EntityIds,
    ) -> Self {
        let cell = settings.invader_size;
        let mut invaders = Vec::with_capacity((columns * rows) as usize);
        for x in 0..columns {
            for y in 0..rows {
                let pos = Vec2::new(x as f32 * cell.x, y as f32 * cell.y);
                invaders.push(Invader::new(ids.next_id(), pos, sprite));
            }
        }

        Self {
            id: ids.next_id(),
            pos: Vec2::ZERO,
            vel: Vec2::new(settings.wave_speed, 0.0),
            width: columns as f32 * cell.x,
            columns,
            rows,
            invaders,
        }
    }

    /// Build a wave from explicit invaders (bounds derived from them)
    pub fn from_invaders(id: u32, invaders: Vec<Invader>, speed: f32) -> Self {
        let mut wave = Self {
            id,
            pos: Vec2::ZERO,
            vel: Vec2::new(speed, 0.0),
            width: 0.0,
            columns: 0,
            rows: 0,
            invaders,
        };
        wave.recompute_bounds();
        wave
    }

    /// All invaders have their sprite (they resolve together)
    pub fn is_ready(&self) -> bool {
        self.invaders.iter().all(|i| i.sprite.is_ready())
    }

    pub fn is_empty(&self) -> bool {
        self.invaders.is_empty()
    }

    /// Every survivor is at or past the bottom edge
    pub fn is_below(&self, playfield_height: f32) -> bool {
        !self.invaders.is_empty() && self.invaders.iter().all(|i| i.pos.y >= playfield_height)
    }

    pub(crate) fn resolve_sprite(&mut self, sprite: Sprite) {
        for invader in &mut self.invaders {
            invader.sprite = sprite;
        }
    }

    /// Advance one tick. The bounce is decided on the projected extent, so the
    /// wave and its invaders always move by the same velocity.
    pub fn sweep(&mut self, playfield_width: f32, drop: f32) {
        if !self.is_ready() {
            return;
        }

        self.vel.y = 0.0;
        let projected = self.pos.x + self.vel.x;
        if projected < 0.0 || projected + self.width > playfield_width {
            self.vel.x = -self.vel.x;
            self.vel.y = drop;
        }

        self.pos += self.vel;
        for invader in &mut self.invaders {
            invader.advance_with(self.vel);
        }
    }

    /// Fire from one uniformly chosen survivor, straight down from its
    /// bottom-center
    pub fn shoot(
        &self,
        rng: &mut impl Rng,
        settings: &Settings,
        ids: &mut EntityIds,
    ) -> Option<InvaderProjectile> {
        if self.invaders.is_empty() {
            return None;
        }
        let shooter = &self.invaders[rng.random_range(0..self.invaders.len())];
        let size = shooter.sprite.size()?;
        Some(InvaderProjectile::new(
            ids.next_id(),
            Vec2::new(shooter.pos.x + size.x / 2.0, shooter.pos.y + size.y),
            Vec2::new(0.0, settings.invader_projectile_speed),
            settings.invader_projectile_size,
        ))
    }

    /// Re-derive x and width from the first and last survivors
    pub fn recompute_bounds(&mut self) {
        if let (Some(first), Some(last)) = (self.invaders.first(), self.invaders.last()) {
            self.width = last.pos.x + last.width() - first.pos.x;
            self.pos.x = first.pos.x;
        }
    }

    /// Drop invaders marked destroyed and fix the bounds if anything went
    pub(crate) fn compact(&mut self) -> usize {
        let before = self.invaders.len();
        self.invaders.retain(|i| !i.destroyed);
        let removed = before - self.invaders.len();
        if removed > 0 {
            self.recompute_bounds();
        }
        removed
    }
}
