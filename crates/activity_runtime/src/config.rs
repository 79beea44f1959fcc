//! Tunable constants for the activity manager, loadable from TOML.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Element id the manager measures as its drawing container unless overridden.
pub const DEFAULT_CONTAINER_ELEMENT_ID: &str = "activity-main";

#[derive(Debug, Error)]
/// Errors raised while loading an [`ActivityManagerConfig`].
pub enum ConfigError {
    /// The TOML document could not be parsed into the config schema.
    #[error("invalid activity manager config: {0}")]
    Parse(#[from] toml::de::Error),
    /// The overview grid has no cells.
    #[error("overview grid needs at least one column and one row (got {columns}x{rows})")]
    EmptyOverviewGrid {
        /// Configured column count.
        columns: u32,
        /// Configured row count.
        rows: u32,
    },
    /// Minimum window dimensions must be positive and finite.
    #[error("minimum window size must be positive (got {width}x{height})")]
    InvalidMinimumSize {
        /// Configured minimum width.
        width: f64,
        /// Configured minimum height.
        height: f64,
    },
    /// A timing interval was configured as zero.
    #[error("`{0}` must be greater than zero")]
    ZeroInterval(&'static str),
    /// The container element id is blank.
    #[error("`container_element_id` must not be empty")]
    EmptyContainerId,
}

/// Fixed grid used by overview mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverviewGrid {
    pub columns: u32,
    pub rows: u32,
    pub gap: f64,
}

impl Default for OverviewGrid {
    fn default() -> Self {
        Self {
            columns: 3,
            rows: 5,
            gap: 20.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivityManagerConfig {
    /// Launches below this viewport width are forced to full placement.
    pub narrow_viewport_breakpoint: f64,
    pub base_z_index: i32,
    pub container_element_id: String,
    pub container_refresh_throttle_ms: u64,
    pub layout_broadcast_delay_ms: u64,
    pub resize_notify_throttle_ms: u64,
    pub min_window_width: f64,
    pub min_window_height: f64,
    pub overview: OverviewGrid,
}

impl Default for ActivityManagerConfig {
    fn default() -> Self {
        Self {
            narrow_viewport_breakpoint: 1280.0,
            base_z_index: 4,
            container_element_id: DEFAULT_CONTAINER_ELEMENT_ID.to_string(),
            container_refresh_throttle_ms: 50,
            layout_broadcast_delay_ms: 200,
            resize_notify_throttle_ms: 100,
            min_window_width: 400.0,
            min_window_height: 200.0,
            overview: OverviewGrid::default(),
        }
    }
}

impl ActivityManagerConfig {
    /// Parses a TOML document; missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the document is malformed or a value is out of range.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks ranges that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.overview.columns == 0 || self.overview.rows == 0 {
            return Err(ConfigError::EmptyOverviewGrid {
                columns: self.overview.columns,
                rows: self.overview.rows,
            });
        }
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(self.min_window_width) || !positive(self.min_window_height) {
            return Err(ConfigError::InvalidMinimumSize {
                width: self.min_window_width,
                height: self.min_window_height,
            });
        }
        for (name, value) in [
            (
                "container_refresh_throttle_ms",
                self.container_refresh_throttle_ms,
            ),
            ("layout_broadcast_delay_ms", self.layout_broadcast_delay_ms),
            ("resize_notify_throttle_ms", self.resize_notify_throttle_ms),
        ] {
            if value == 0 {
                return Err(ConfigError::ZeroInterval(name));
            }
        }
        if self.container_element_id.trim().is_empty() {
            return Err(ConfigError::EmptyContainerId);
        }
        Ok(())
    }

    pub fn container_refresh_throttle(&self) -> Duration {
        Duration::from_millis(self.container_refresh_throttle_ms)
    }

    pub fn layout_broadcast_delay(&self) -> Duration {
        Duration::from_millis(self.layout_broadcast_delay_ms)
    }

    pub fn resize_notify_throttle(&self) -> Duration {
        Duration::from_millis(self.resize_notify_throttle_ms)
    }
}
