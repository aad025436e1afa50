//! Board size, tick cadence and the difficulty ramp for piece gravity.

use crate::piece::MAX_SHAPE_DIM;
use std::time::Duration;
use thiserror::Error;

/// Board width in grains.
pub const COLS: usize = 60;
/// Board height in grains.
pub const ROWS: usize = 100;
/// Largest board side: the terminal front-end addresses cells with `u16`.
pub const MAX_BOARD_SIDE: usize = u16::MAX as usize;
/// Simulation ticks per second.
pub const TICK_RATE_HZ: f64 = 60.0;

/// Difficulty ramp: the drop interval shrinks by `step_ms` for every
/// `points_per_step` points and never goes below `floor_ms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GravityCurve {
    pub base_ms: u64,
    pub step_ms: u64,
    pub points_per_step: u64,
    pub floor_ms: u64,
}

impl Default for GravityCurve {
    fn default() -> Self {
        Self {
            base_ms: 400,
            step_ms: 30,
            points_per_step: 2000,
            floor_ms: 30,
        }
    }
}

impl GravityCurve {
    /// `max(floor, base - floor(score / points_per_step) * step)`.
    pub fn threshold(&self, score: u64) -> Duration {
        let steps = score / self.points_per_step.max(1);
        let ms = self
            .base_ms
            .saturating_sub(steps.saturating_mul(self.step_ms))
            .max(self.floor_ms);
        Duration::from_millis(ms)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("board is {cols}x{rows} grains; pieces need at least {min}x{min}")]
    BoardTooSmall { cols: usize, rows: usize, min: usize },
    #[error("board is {cols}x{rows} grains; at most {max} per side")]
    BoardTooLarge { cols: usize, rows: usize, max: usize },
    #[error("tick interval must be non-zero")]
    ZeroTickInterval,
    #[error("gravity floor must be non-zero")]
    ZeroGravityFloor,
}

/// Runtime configuration for one game session.
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    pub cols: usize,
    pub rows: usize,
    pub tick_interval: Duration,
    pub gravity: GravityCurve,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            cols: COLS,
            rows: ROWS,
            tick_interval: Duration::from_secs_f64(1.0 / TICK_RATE_HZ),
            gravity: GravityCurve::default(),
        }
    }
}

impl GameConfig {
    /// Tick interval for a rate in Hz; non-positive rates map to a zero interval
    /// so that `validate` rejects them.
    pub fn interval_for_rate(rate_hz: f64) -> Duration {
        if rate_hz > 0.0 && rate_hz.is_finite() {
            Duration::from_secs_f64(1.0 / rate_hz)
        } else {
            Duration::ZERO
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cols < MAX_SHAPE_DIM || self.rows < MAX_SHAPE_DIM {
            return Err(ConfigError::BoardTooSmall {
                cols: self.cols,
                rows: self.rows,
                min: MAX_SHAPE_DIM,
            });
        }
        if self.cols > MAX_BOARD_SIDE || self.rows > MAX_BOARD_SIDE {
            return Err(ConfigError::BoardTooLarge {
                cols: self.cols,
                rows: self.rows,
                max: MAX_BOARD_SIDE,
            });
        }
        if self.tick_interval.is_zero() {
            return Err(ConfigError::ZeroTickInterval);
        }
        if self.gravity.floor_ms == 0 {
            return Err(ConfigError::ZeroGravityFloor);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_steps_every_2000_points() {
        let g = GravityCurve::default();
        assert_eq!(g.threshold(0), Duration::from_millis(400));
        assert_eq!(g.threshold(1999), Duration::from_millis(400));
        assert_eq!(g.threshold(2000), Duration::from_millis(370));
        assert_eq!(g.threshold(4500), Duration::from_millis(340));
    }

    #[test]
    fn test_threshold_saturates_at_floor() {
        let g = GravityCurve::default();
        // 400 - 13 * 30 = 10 -> floored
        assert_eq!(g.threshold(26_000), Duration::from_millis(30));
        assert_eq!(g.threshold(u64::MAX), Duration::from_millis(30));
    }

    #[test]
    fn test_threshold_is_monotonic() {
        let g = GravityCurve::default();
        let mut prev = g.threshold(0);
        for score in (0..40_000).step_by(250) {
            let t = g.threshold(score);
            assert!(t <= prev);
            prev = t;
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        let c = GameConfig::default();
        assert_eq!((c.cols, c.rows), (60, 100));
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_small_board() {
        let c = GameConfig {
            cols: 10,
            ..GameConfig::default()
        };
        assert!(matches!(
            c.validate(),
            Err(ConfigError::BoardTooSmall { cols: 10, .. })
        ));
    }

    #[test]
    fn test_validate_rejects_oversized_board() {
        let c = GameConfig {
            rows: MAX_BOARD_SIDE + 1,
            ..GameConfig::default()
        };
        assert_eq!(
            c.validate(),
            Err(ConfigError::BoardTooLarge {
                cols: 60,
                rows: 65_536,
                max: 65_535
            })
        );
        let c = GameConfig {
            cols: usize::MAX,
            ..GameConfig::default()
        };
        assert!(matches!(c.validate(), Err(ConfigError::BoardTooLarge { .. })));
        let c = GameConfig {
            cols: MAX_BOARD_SIDE,
            ..GameConfig::default()
        };
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_rate() {
        let c = GameConfig {
            tick_interval: GameConfig::interval_for_rate(0.0),
            ..GameConfig::default()
        };
        assert_eq!(c.validate(), Err(ConfigError::ZeroTickInterval));
    }
}
