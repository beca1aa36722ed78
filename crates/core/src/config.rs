//! Board configuration.
//!
//! Defaults come from the constants in `blockfall-types`. With the `serde`
//! feature the struct can be read from a config file; missing fields fall back
//! to the defaults.

use blockfall_types::{
    BOARD_HEIGHT, BOARD_WIDTH, FALL_STEP_MS, INITIAL_FALL_MS, MAX_BOARD_DIM, MIN_FALL_MS,
};

use crate::error::{EngineError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BoardConfig {
    pub width: u16,
    pub height: u16,
    /// Canonical spawn origin (top-left of the piece's local grid)
    pub spawn_x: i32,
    pub spawn_y: i32,
    /// Gravity period at the start of a game
    pub initial_fall_ms: u32,
    /// Shrink applied to the gravity period on every lock
    pub fall_step_ms: u32,
    /// Gravity period floor
    pub min_fall_ms: u32,
}

impl BoardConfig {
    /// Default config for a `width × height` board, spawn column derived from the width
    pub fn sized(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            spawn_x: default_spawn_x(width),
            ..Self::default()
        }
    }

    pub fn with_spawn(mut self, x: i32, y: i32) -> Self {
        self.spawn_x = x;
        self.spawn_y = y;
        self
    }

    pub fn with_fall_timing(mut self, initial_ms: u32, step_ms: u32, min_ms: u32) -> Self {
        self.initial_fall_ms = initial_ms;
        self.fall_step_ms = step_ms;
        self.min_fall_ms = min_ms;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(EngineError::InvalidConfig(format!(
                "board must be at least 1x1, got {}x{}",
                self.width, self.height
            )));
        }
        if self.width > MAX_BOARD_DIM || self.height > MAX_BOARD_DIM {
            return Err(EngineError::InvalidConfig(format!(
                "board may be at most {}x{}, got {}x{}",
                MAX_BOARD_DIM, MAX_BOARD_DIM, self.width, self.height
            )));
        }
        if self.min_fall_ms == 0 {
            return Err(EngineError::InvalidConfig(
                "min_fall_ms must be positive".to_string(),
            ));
        }
        if self.min_fall_ms > self.initial_fall_ms {
            return Err(EngineError::InvalidConfig(format!(
                "min_fall_ms ({}) exceeds initial_fall_ms ({})",
                self.min_fall_ms, self.initial_fall_ms
            )));
        }
        Ok(())
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            width: BOARD_WIDTH,
            height: BOARD_HEIGHT,
            spawn_x: default_spawn_x(BOARD_WIDTH),
            spawn_y: 0,
            initial_fall_ms: INITIAL_FALL_MS,
            fall_step_ms: FALL_STEP_MS,
            min_fall_ms: MIN_FALL_MS,
        }
    }
}

/// Column just left of center
fn default_spawn_x(width: u16) -> i32 {
    (width as i32 / 2 - 1).max(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = BoardConfig::default();
        assert_eq!(config.width, 10);
        assert_eq!(config.height, 20);
        assert_eq!(config.spawn_x, 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn sized_derives_spawn_column() {
        let config = BoardConfig::sized(6, 10);
        assert_eq!((config.spawn_x, config.spawn_y), (2, 0));
        assert_eq!(config.initial_fall_ms, INITIAL_FALL_MS);
    }

    #[test]
    fn validate_rejects_bad_values() {
        assert!(BoardConfig::sized(0, 10).validate().is_err());
        assert!(BoardConfig::sized(10, 0).validate().is_err());
        assert!(BoardConfig::sized(MAX_BOARD_DIM, MAX_BOARD_DIM).validate().is_ok());
        assert!(matches!(
            BoardConfig::sized(40_000, 4).validate(),
            Err(EngineError::InvalidConfig(_))
        ));
        assert!(BoardConfig::sized(10, MAX_BOARD_DIM + 1).validate().is_err());
        assert!(BoardConfig::default()
            .with_fall_timing(300, 100, 0)
            .validate()
            .is_err());
        assert!(matches!(
            BoardConfig::default().with_fall_timing(100, 10, 200).validate(),
            Err(EngineError::InvalidConfig(_))
        ));
    }
}
