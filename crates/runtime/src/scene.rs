//! # Scene Files
//!
//! A scene describes the domain, the tree depth and how the agent population
//! is generated. Every field has a default, so `{}` is a valid scene.
//!
//! ```json
//! { "dims": 3, "level": 4, "domain_min": [0.0], "domain_max": [64.0], "agents": 500 }
//! ```
//!
//! A single-element domain corner is broadcast to every axis.

use std::path::Path;

use anyhow::{bail, ensure, Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SceneConfig {
    /// 2 for a quadtree, 3 for an octree.
    pub dims: usize,
    pub level: u32,
    pub domain_min: Vec<f32>,
    pub domain_max: Vec<f32>,
    pub agents: usize,
    pub steps: u32,
    pub dt: f32,
    pub seed: u64,
    pub min_half_extent: f32,
    pub max_half_extent: f32,
    pub max_speed: f32,
    /// Log statistics every this many steps.
    pub report_every: u32,
    /// Log the finest-grid divider lines at startup.
    pub grid: bool,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            dims: 2,
            level: 4,
            domain_min: vec![0.0],
            domain_max: vec![100.0],
            agents: 256,
            steps: 200,
            dt: 0.016,
            seed: 1,
            min_half_extent: 0.5,
            max_half_extent: 2.0,
            max_speed: 20.0,
            report_every: 50,
            grid: false,
        }
    }
}

impl SceneConfig {
    /// Parses and validates a JSON scene.
    ///
    /// # Errors
    /// Malformed JSON, unknown fields, or values rejected by [`Self::validate`].
    pub fn from_json(json: &str) -> Result<Self> {
        let scene: Self = serde_json::from_str(json)?;
        scene.validate()?;
        Ok(scene)
    }

    /// Reads a scene file from disk.
    ///
    /// # Errors
    /// I/O failures and everything [`Self::from_json`] rejects.
    pub fn from_path(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading scene {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("parsing scene {}", path.display()))
    }

    /// Checks the settings that the tree itself does not validate.
    ///
    /// # Errors
    /// Describes the first offending field.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.dims == 2 || self.dims == 3,
            "dims must be 2 or 3, got {}",
            self.dims
        );
        for (name, corner) in [("domain_min", &self.domain_min), ("domain_max", &self.domain_max)] {
            ensure!(
                corner.len() == 1 || corner.len() == self.dims,
                "{name} needs 1 or {} values, got {}",
                self.dims,
                corner.len()
            );
        }
        ensure!(self.dt.is_finite() && self.dt > 0.0, "dt must be positive");
        ensure!(
            self.min_half_extent > 0.0 && self.min_half_extent <= self.max_half_extent,
            "half extents must satisfy 0 < min <= max"
        );
        ensure!(self.max_speed >= 0.0, "max_speed must not be negative");
        ensure!(self.report_every > 0, "report_every must be at least 1");
        Ok(())
    }

    /// Domain corners as fixed-size arrays.
    ///
    /// # Errors
    /// When a corner has neither 1 nor `D` values.
    pub fn domain<const D: usize>(&self) -> Result<([f32; D], [f32; D])> {
        Ok((corner(&self.domain_min)?, corner(&self.domain_max)?))
    }
}

fn corner<const D: usize>(values: &[f32]) -> Result<[f32; D]> {
    match values {
        [v] => Ok([*v; D]),
        _ => match <[f32; D]>::try_from(values) {
            Ok(array) => Ok(array),
            Err(_) => bail!("expected 1 or {D} coordinates, got {}", values.len()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_is_the_default_scene() {
        assert_eq!(SceneConfig::from_json("{}").unwrap(), SceneConfig::default());
    }

    #[test]
    fn test_corner_broadcast_and_exact() {
        let scene = SceneConfig {
            dims: 3,
            domain_min: vec![-1.0],
            domain_max: vec![1.0, 2.0, 3.0],
            ..SceneConfig::default()
        };
        let (min, max) = scene.domain::<3>().unwrap();
        assert_eq!(min, [-1.0; 3]);
        assert_eq!(max, [1.0, 2.0, 3.0]);
        assert!(scene.domain::<2>().is_err());
    }
}
