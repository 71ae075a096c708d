//! Space Invaders - A wave-based arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, waves, collisions, game state)
//! - `session`: Host adapter (fixed timestep, input latching, presenter hooks)
//! - `settings`: Data-driven game tuning with validation
//! - `error`: Configuration errors

pub mod error;
pub mod session;
pub mod settings;
pub mod sim;

pub use error::ConfigError;
pub use session::{Presenter, Session};
pub use settings::Settings;

/// 2D position/velocity value type used by every entity
pub type Vector2 = glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation rate; all velocities are expressed per tick
    pub const TICKS_PER_SECOND: u32 = 60;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f32 = 1.0 / TICKS_PER_SECOND as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Playfield dimensions (screen space, y grows downward)
    pub const PLAYFIELD_WIDTH: f32 = 1024.0;
    pub const PLAYFIELD_HEIGHT: f32 = 576.0;

    /// Player defaults
    pub const PLAYER_WIDTH: f32 = 50.0;
    pub const PLAYER_HEIGHT: f32 = 50.0;
    pub const PLAYER_SPEED: f32 = 10.0;
    pub const PLAYER_TILT: f32 = 0.15; // radians
    pub const PLAYER_BOTTOM_MARGIN: f32 = 40.0;

    /// Player projectile (circle)
    pub const PROJECTILE_RADIUS: f32 = 4.0;
    pub const PROJECTILE_SPEED: f32 = 10.0;

    /// Invader projectile (rectangle)
    pub const INVADER_PROJECTILE_WIDTH: f32 = 6.0;
    pub const INVADER_PROJECTILE_HEIGHT: f32 = 12.0;
    pub const INVADER_PROJECTILE_SPEED: f32 = 5.0;

    /// Invader cell and wave sweep
    pub const INVADER_WIDTH: f32 = 30.0;
    pub const INVADER_HEIGHT: f32 = 30.0;
    pub const WAVE_SPEED: f32 = 3.0;
    pub const WAVE_MIN_COLUMNS: u32 = 5;
    pub const WAVE_MAX_COLUMNS: u32 = 14;
    pub const WAVE_MIN_ROWS: u32 = 2;
    pub const WAVE_MAX_ROWS: u32 = 6;
    /// Ticks between invader shots (per wave)
    pub const INVADER_FIRE_PERIOD: u32 = 100;
    /// Ticks between wave arrivals, drawn uniformly per arrival
    pub const SPAWN_INTERVAL_MIN: u32 = 500;
    pub const SPAWN_INTERVAL_MAX: u32 = 999;

    /// Particles
    pub const STAR_COUNT: usize = 75;
    pub const STAR_MAX_RADIUS: f32 = 2.0;
    pub const STAR_FALL_SPEED: f32 = 1.0;
    pub const BURST_COUNT: usize = 15;
    pub const BURST_SPEED_SPREAD: f32 = 2.0;
    pub const BURST_MAX_RADIUS: f32 = 3.0;
    pub const PARTICLE_START_OPACITY: f32 = 0.5;
    pub const PARTICLE_FADE_RATE: f32 = 0.01;

    /// Delay between the fatal hit and game over (1.5 s)
    pub const GAME_OVER_DELAY_TICKS: u32 = 90;

    /// Colors (0xRRGGBB)
    pub const STAR_COLOR: u32 = 0xFFFFFF;
    pub const PLAYER_DEBRIS_COLOR: u32 = 0xFFFFFF;
    pub const INVADER_DEBRIS_COLOR: u32 = 0xBAA0DE;
    pub const PROJECTILE_COLOR: u32 = 0x00FF00;
    pub const INVADER_PROJECTILE_COLOR: u32 = 0xFF0000;
}
