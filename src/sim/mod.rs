//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Discrete ticks only (velocities are per tick)
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod particles;
pub mod snapshot;
pub mod state;
pub mod tick;
pub mod wave;

pub use collision::Aabb;
pub use snapshot::{CircleView, RectView, ShipView, Snapshot, SpriteView};
pub use state::{
    Advance, GameEvent, GamePhase, Invader, InvaderProjectile, Particle, ParticleKind, Player,
    Projectile, Sprite, World,
};
pub use tick::{TickInput, tick};
pub use wave::Wave;
