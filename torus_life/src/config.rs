// config.rs - Construction-time settings for a simulation

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::rules::RuleThresholds;

/// Errors raised when validating a [`SimulationConfig`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("grid dimensions must be non-zero (got {cols}x{rows})")]
    EmptyGrid { cols: usize, rows: usize },
    #[error("cell_size must be non-zero")]
    ZeroCellSize,
    #[error("a {cols}x{rows} grid of {cell_size}px cells does not fit a u32 pixel space")]
    CanvasTooLarge { cols: usize, rows: usize, cell_size: u32 },
    #[error("fps must be non-zero")]
    ZeroFps,
    #[error("threshold `{name}` is {value}, but a cell has at most 8 neighbours")]
    ThresholdOutOfRange { name: &'static str, value: u8 },
}

/// Static configuration for one simulation instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Grid width in cells.
    pub cols: usize,
    /// Grid height in cells.
    pub rows: usize,
    /// Edge length of one cell in pixels.
    pub cell_size: u32,
    /// Target generations per second.
    pub fps: u32,
    pub thresholds: RuleThresholds,
    /// Wipe the grid automatically after an `Extinct` outcome.
    pub reset_on_extinction: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            cols: 50,
            rows: 50,
            cell_size: 15,
            fps: 5,
            thresholds: RuleThresholds::default(),
            reset_on_extinction: true,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_dimensions(self.cols, self.rows, self.cell_size)?;
        if self.fps == 0 {
            return Err(ConfigError::ZeroFps);
        }
        let RuleThresholds {
            overpopulation,
            underpopulation,
            newborn,
        } = self.thresholds;
        for (name, value) in [
            ("overpopulation", overpopulation),
            ("underpopulation", underpopulation),
            ("newborn", newborn),
        ] {
            if value > 8 {
                return Err(ConfigError::ThresholdOutOfRange { name, value });
            }
        }
        Ok(())
    }

    /// Delay between two generations, `1000 / fps` milliseconds.
    pub fn step_interval(&self) -> Duration {
        Duration::from_millis(1000 / u64::from(self.fps.max(1)))
    }

    /// Canvas size in pixels, saturating for configs that fail `validate`.
    pub fn pixel_size(&self) -> (u32, u32) {
        (
            pixel_extent(self.cols, self.cell_size).unwrap_or(u32::MAX),
            pixel_extent(self.rows, self.cell_size).unwrap_or(u32::MAX),
        )
    }
}

/// `cells * cell_size`, if it fits the pixel space.
pub(crate) fn pixel_extent(cells: usize, cell_size: u32) -> Option<u32> {
    u32::try_from(cells).ok()?.checked_mul(cell_size)
}

/// Shape checks shared by [`SimulationConfig::validate`] and `Grid::try_new`.
pub(crate) fn check_dimensions(cols: usize, rows: usize, cell_size: u32) -> Result<(), ConfigError> {
    if cols == 0 || rows == 0 {
        return Err(ConfigError::EmptyGrid { cols, rows });
    }
    if cell_size == 0 {
        return Err(ConfigError::ZeroCellSize);
    }
    // every cell index and its pixel corner must be representable, and the
    // coordinates are normalised through isize
    let fits = cols.checked_mul(rows).is_some()
        && isize::try_from(cols).is_ok()
        && isize::try_from(rows).is_ok()
        && pixel_extent(cols, cell_size).is_some()
        && pixel_extent(rows, cell_size).is_some();
    if !fits {
        return Err(ConfigError::CanvasTooLarge { cols, rows, cell_size });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = SimulationConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.step_interval(), Duration::from_millis(200));
        assert_eq!(config.pixel_size(), (750, 750));
    }

    #[test]
    fn rejects_degenerate_values() {
        let config = SimulationConfig {
            rows: 0,
            ..SimulationConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::EmptyGrid { cols: 50, rows: 0 })
        );

        let config = SimulationConfig {
            cell_size: 0,
            ..SimulationConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroCellSize));

        let config = SimulationConfig {
            fps: 0,
            ..SimulationConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroFps));
    }

    #[test]
    fn rejects_canvas_outside_pixel_space() {
        let config = SimulationConfig {
            cols: 100_000,
            rows: 1,
            cell_size: 50_000,
            ..SimulationConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::CanvasTooLarge {
                cols: 100_000,
                rows: 1,
                cell_size: 50_000
            })
        );
        assert_eq!(config.pixel_size(), (u32::MAX, 50_000));

        let config = SimulationConfig {
            cols: 1,
            rows: usize::MAX,
            cell_size: 1,
            ..SimulationConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::CanvasTooLarge { .. })
        ));
    }

    #[test]
    fn largest_pixel_space_is_accepted() {
        // 65_535 * 65_537 == u32::MAX
        let config = SimulationConfig {
            cols: 65_535,
            rows: 1,
            cell_size: 65_537,
            ..SimulationConfig::default()
        };
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.pixel_size(), (u32::MAX, 65_537));
    }

    #[test]
    fn rejects_thresholds_above_eight() {
        let config = SimulationConfig {
            thresholds: RuleThresholds {
                newborn: 9,
                ..RuleThresholds::default()
            },
            ..SimulationConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::ThresholdOutOfRange {
                name: "newborn",
                value: 9
            })
        );
    }
}
