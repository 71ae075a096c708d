//! Configuration errors
//!
//! The simulation tick itself is infallible; everything that can go wrong is
//! caught when settings are loaded or validated.

use std::fmt;

/// Errors raised while loading or validating [`crate::Settings`]
#[derive(Debug)]
pub enum ConfigError {
    /// Settings file could not be read or written
    Io(std::io::Error),
    /// Settings file is not valid JSON for [`crate::Settings`]
    Parse(serde_json::Error),
    /// An integer range that could roll zero, or whose bounds are inverted
    InvalidRange {
        name: &'static str,
        min: u32,
        max: u32,
    },
    /// A size, speed or rate that must be finite and strictly positive
    NonPositive { name: &'static str, value: f32 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "settings i/o failed: {}", e),
            ConfigError::Parse(e) => write!(f, "settings parse failed: {}", e),
            ConfigError::InvalidRange { name, min, max } => write!(
                f,
                "invalid range for '{}': {}..={} (need 1 <= min <= max)",
                name, min, max
            ),
            ConfigError::NonPositive { name, value } => {
                write!(f, "'{}' must be positive and finite, got {}", name, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_offending_field() {
        let err = ConfigError::InvalidRange {
            name: "spawn_interval",
            min: 0,
            max: 10,
        };
        assert!(err.to_string().contains("spawn_interval"));

        let err = ConfigError::NonPositive {
            name: "player_speed",
            value: -1.0,
        };
        assert!(err.to_string().contains("player_speed"));
    }

    #[test]
    fn test_parse_error_has_source() {
        let parse = serde_json::from_str::<u32>("nope").unwrap_err();
        let err = ConfigError::from(parse);
        assert!(std::error::Error::source(&err).is_some());
    }
}
