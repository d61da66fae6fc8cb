//! Pipeline configuration.
//!
//! Every tunable the geometry pipeline needs lives in [`PipelineConfig`],
//! which is passed explicitly to the functions that use it. A config can be
//! loaded from a YAML file; fields left out keep their defaults.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SegsetError;

/// Settings threaded through normalization, simplification and validation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Douglas-Peucker tolerance in normalized units.
    pub simplification_tolerance: f64,
    /// Minimum number of points for a valid polygon.
    pub min_points: usize,
    /// Maximum number of points for a valid polygon.
    pub max_points: usize,
    /// Fraction of `max_points` at which a warning is raised.
    pub near_limit_ratio: f64,
    /// Areas at or below this value are considered degenerate.
    pub min_area: f64,
    /// Simplify polygons while building annotation records.
    pub auto_simplify: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            simplification_tolerance: 0.002,
            min_points: 3,
            max_points: 1000,
            near_limit_ratio: 0.9,
            min_area: 1e-9,
            auto_simplify: false,
        }
    }
}

impl PipelineConfig {
    /// Loads a config from a YAML file and checks its values.
    pub fn from_yaml_file(path: &Path) -> Result<Self, SegsetError> {
        let data = fs::read_to_string(path).map_err(SegsetError::Io)?;
        let config = Self::from_yaml_str(&data).map_err(|source| SegsetError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every setting is usable by the pipeline.
    ///
    /// # Errors
    /// Returns [`SegsetError::InvalidConfig`] naming the first bad setting.
    pub fn validate(&self) -> Result<(), SegsetError> {
        if self.min_points < 3 {
            return Err(invalid(format!("min_points must be >= 3, got {}", self.min_points)));
        }
        if self.max_points < self.min_points {
            return Err(invalid(format!(
                "max_points ({}) must be >= min_points ({})",
                self.max_points, self.min_points
            )));
        }
        if !(self.near_limit_ratio.is_finite()
            && self.near_limit_ratio > 0.0
            && self.near_limit_ratio <= 1.0)
        {
            return Err(invalid(format!(
                "near_limit_ratio must be in (0, 1], got {}",
                self.near_limit_ratio
            )));
        }
        if !(self.min_area.is_finite() && self.min_area >= 0.0) {
            return Err(invalid(format!(
                "min_area must be finite and >= 0, got {}",
                self.min_area
            )));
        }
        if !(self.simplification_tolerance.is_finite() && self.simplification_tolerance >= 0.0) {
            return Err(invalid(format!(
                "simplification_tolerance must be finite and >= 0, got {}",
                self.simplification_tolerance
            )));
        }
        Ok(())
    }

    /// Parses a config from a YAML string.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Point count from which the "near point-count limit" warning applies.
    pub fn near_limit_threshold(&self) -> usize {
        (self.max_points as f64 * self.near_limit_ratio).ceil() as usize
    }
}

fn invalid(message: String) -> SegsetError {
    SegsetError::InvalidConfig { message }
}
