//! Game settings and tuning
//!
//! Every gameplay constant is overridable from a JSON file. Missing keys fall
//! back to the defaults in [`crate::consts`], so a minimal file can override
//! just the values you care about. Settings are validated once, when loaded,
//! so the simulation never has to guard a random roll.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Inclusive integer range used for random rolls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntRange {
    pub min: u32,
    pub max: u32,
}

impl IntRange {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// A range is usable when it can never roll zero and is not inverted
    fn check(&self, name: &'static str) -> Result<(), ConfigError> {
        if self.min == 0 || self.min > self.max {
            return Err(ConfigError::InvalidRange {
                name,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

/// Game settings/tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Playfield ===
    /// Width/height of the playfield in pixels
    pub playfield: Vec2,
    /// Maximum fixed ticks run per host frame
    pub max_substeps: u32,

    // === Player ===
    /// Sprite size once resolved
    pub player_size: Vec2,
    pub player_speed: f32,
    /// Tilt (radians) while moving
    pub player_tilt: f32,
    /// Gap between the ship and the bottom edge
    pub player_bottom_margin: f32,

    // === Projectiles ===
    pub projectile_radius: f32,
    pub projectile_speed: f32,
    pub invader_projectile_size: Vec2,
    pub invader_projectile_speed: f32,

    // === Waves ===
    /// Invader sprite size, also the grid cell size
    pub invader_size: Vec2,
    /// Horizontal sweep speed of a new wave
    pub wave_speed: f32,
    pub wave_columns: IntRange,
    pub wave_rows: IntRange,
    /// Ticks between shots from each wave
    pub invader_fire_period: u32,
    /// Ticks between wave arrivals
    pub spawn_interval: IntRange,

    // === Particles ===
    pub star_count: usize,
    pub star_max_radius: f32,
    pub star_fall_speed: f32,
    pub burst_count: usize,
    pub burst_speed_spread: f32,
    pub burst_max_radius: f32,
    pub particle_start_opacity: f32,
    /// Opacity lost per tick by fading particles
    pub particle_fade_rate: f32,

    // === Phases ===
    /// Ticks between the fatal hit and game over
    pub game_over_delay_ticks: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            playfield: Vec2::new(PLAYFIELD_WIDTH, PLAYFIELD_HEIGHT),
            max_substeps: MAX_SUBSTEPS,

            player_size: Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            player_speed: PLAYER_SPEED,
            player_tilt: PLAYER_TILT,
            player_bottom_margin: PLAYER_BOTTOM_MARGIN,

            projectile_radius: PROJECTILE_RADIUS,
            projectile_speed: PROJECTILE_SPEED,
            invader_projectile_size: Vec2::new(
                INVADER_PROJECTILE_WIDTH,
                INVADER_PROJECTILE_HEIGHT,
            ),
            invader_projectile_speed: INVADER_PROJECTILE_SPEED,

            invader_size: Vec2::new(INVADER_WIDTH, INVADER_HEIGHT),
            wave_speed: WAVE_SPEED,
            wave_columns: IntRange::new(WAVE_MIN_COLUMNS, WAVE_MAX_COLUMNS),
            wave_rows: IntRange::new(WAVE_MIN_ROWS, WAVE_MAX_ROWS),
            invader_fire_period: INVADER_FIRE_PERIOD,
            spawn_interval: IntRange::new(SPAWN_INTERVAL_MIN, SPAWN_INTERVAL_MAX),

            star_count: STAR_COUNT,
            star_max_radius: STAR_MAX_RADIUS,
            star_fall_speed: STAR_FALL_SPEED,
            burst_count: BURST_COUNT,
            burst_speed_spread: BURST_SPEED_SPREAD,
            burst_max_radius: BURST_MAX_RADIUS,
            particle_start_opacity: PARTICLE_START_OPACITY,
            particle_fade_rate: PARTICLE_FADE_RATE,

            game_over_delay_ticks: GAME_OVER_DELAY_TICKS,
        }
    }
}

impl Settings {
    /// Vertical drop applied to a wave each time it bounces off an edge
    pub fn wave_drop(&self) -> f32 {
        self.invader_size.y
    }

    /// Reject any configuration that could produce a degenerate roll or size
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.wave_columns.check("wave_columns")?;
        self.wave_rows.check("wave_rows")?;
        self.spawn_interval.check("spawn_interval")?;
        if self.invader_fire_period == 0 {
            return Err(ConfigError::NonPositive {
                name: "invader_fire_period",
                value: 0.0,
            });
        }

        let positive = [
            ("playfield.x", self.playfield.x),
            ("playfield.y", self.playfield.y),
            ("player_size.x", self.player_size.x),
            ("player_size.y", self.player_size.y),
            ("player_speed", self.player_speed),
            ("projectile_radius", self.projectile_radius),
            ("projectile_speed", self.projectile_speed),
            ("invader_projectile_size.x", self.invader_projectile_size.x),
            ("invader_projectile_size.y", self.invader_projectile_size.y),
            ("invader_projectile_speed", self.invader_projectile_speed),
            ("invader_size.x", self.invader_size.x),
            ("invader_size.y", self.invader_size.y),
            ("wave_speed", self.wave_speed),
            ("star_max_radius", self.star_max_radius),
            ("burst_max_radius", self.burst_max_radius),
            ("particle_start_opacity", self.particle_start_opacity),
            ("particle_fade_rate", self.particle_fade_rate),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::NonPositive { name, value });
            }
        }

        // Zero is fine for these; negatives or NaN are not
        let non_negative = [
            ("player_tilt", self.player_tilt),
            ("player_bottom_margin", self.player_bottom_margin),
            ("star_fall_speed", self.star_fall_speed),
            ("burst_speed_spread", self.burst_speed_spread),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::NonPositive { name, value });
            }
        }

        Ok(())
    }

    /// Parse and validate settings from JSON text
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load and validate settings from a JSON file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }

    /// Load settings, falling back to defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load_from(path.as_ref()) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Using default settings ({})", e);
                Self::default()
            }
        }
    }

    /// Write settings as pretty JSON
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        log::info!("Settings saved to {}", path.as_ref().display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn test_zero_spawn_interval_rejected() {
        let settings = Settings {
            spawn_interval: IntRange::new(0, 10),
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::InvalidRange {
                name: "spawn_interval",
                ..
            })
        ));
    }

    #[test]
    fn test_inverted_range_rejected() {
        let settings = Settings {
            wave_rows: IntRange::new(6, 2),
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_negative_speed_rejected() {
        let settings = Settings {
            player_speed: -3.0,
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::NonPositive {
                name: "player_speed",
                ..
            })
        ));
    }

    #[test]
    fn test_nan_rejected() {
        let settings = Settings {
            particle_fade_rate: f32::NAN,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let settings = Settings::from_json(r#"{ "player_speed": 12.0 }"#).unwrap();
        assert_eq!(settings.player_speed, 12.0);
        assert_eq!(settings.wave_speed, WAVE_SPEED);
        assert_eq!(settings.spawn_interval, IntRange::new(500, 999));
    }

    #[test]
    fn test_json_with_bad_range_rejected() {
        let json = r#"{ "spawn_interval": { "min": 0, "max": 0 } }"#;
        assert!(Settings::from_json(json).is_err());
    }

    #[test]
    fn test_json_roundtrip() {
        let settings = Settings {
            star_count: 10,
            ..Default::default()
        };
        let json = serde_json::to_string(&settings).unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_save_and_load_file() {
        let path = std::env::temp_dir().join(format!(
            "space_invaders_settings_{}.json",
            std::process::id()
        ));
        let settings = Settings {
            wave_speed: 4.5,
            ..Default::default()
        };
        settings.save_to(&path).unwrap();
        let loaded = Settings::load_from(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_missing_file_falls_back() {
        let settings = Settings::load_or_default("/definitely/not/here.json");
        assert_eq!(settings, Settings::default());
    }
}
