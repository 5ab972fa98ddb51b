use crate::error::Result;
use serde_derive::{Deserialize, Serialize};
use std::path::Path;

/// Tunables for a reconstruction run.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct TrajectoryConfig {
    /// Gravity used for the vertical parabola (m/s^2)
    pub gravity: f64,
    /// Frame-to-frame y2d delta below which the ball is considered launched (px)
    pub launch_threshold: f64,
    /// Frame-to-frame y2d delta above which the ball is considered descending (px)
    pub landing_threshold: f64,
    /// Floor for the window duration, in seconds
    pub min_duration: f64,
    /// Frame rate used when none (or a bogus one) is supplied
    pub default_fps: f64,
    /// Decimal places printed by the derivation report
    pub precision: usize,
    /// Ball mass in kg, for the energy columns
    pub mass: f64,
}

impl Default for TrajectoryConfig {
    fn default() -> Self {
        Self {
            gravity: 9.81,
            launch_threshold: -0.5,
            landing_threshold: 0.5,
            min_duration: 1e-9,
            default_fps: 30.0,
            precision: 6,
            mass: 0.27,
        }
    }
}

impl TrajectoryConfig {
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;

        Self::from_json_str(&data)
    }

    /// Falls back to `default_fps` when the given rate is missing, non-finite or not positive.
    pub fn resolve_fps(&self, fps: Option<f64>) -> f64 {
        match fps {
            Some(fps) if fps.is_finite() && fps > 0.0 => fps,
            _ => self.default_fps,
        }
    }
}
