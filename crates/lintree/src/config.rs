//! # Domain Configuration
//!
//! Static geometry of a linear tree: how deep it subdivides, which region of
//! space it covers, and the closed-form sizes derived from those two facts.

use crate::error::TreeError;
use crate::types::Aabb;

/// Subdivision ceiling. A tree may be built with `level <= MAX_LEVEL + 1`.
pub const MAX_LEVEL: u32 = 6;

/// Domain geometry shared by the encoder, the tree and the debug grid.
#[derive(Debug, Clone, PartialEq)]
pub struct SpaceConfig<const D: usize> {
    level: u32,
    origin: [f32; D],
    extent: [f32; D],
    unit: [f32; D],
    cell_count: usize,
}

impl<const D: usize> SpaceConfig<D> {
    /// Children per cell: 4 for a quadtree, 8 for an octree.
    pub const BRANCHING: usize = 1 << D;

    /// Validates and derives the geometry for a domain `[min, max]`
    /// subdivided `level` times.
    ///
    /// # Errors
    /// - [`TreeError::UnsupportedDimension`] unless `D` is 1, 2 or 3.
    /// - [`TreeError::LevelTooDeep`] if `level > MAX_LEVEL + 1`.
    /// - [`TreeError::InvalidDomain`] for non-finite or empty extents.
    #[allow(clippy::cast_precision_loss)]
    pub fn new(level: u32, min: [f32; D], max: [f32; D]) -> Result<Self, TreeError> {
        if !(1..=3).contains(&D) {
            return Err(TreeError::UnsupportedDimension(D));
        }
        if level > MAX_LEVEL + 1 {
            return Err(TreeError::LevelTooDeep {
                level,
                max: MAX_LEVEL + 1,
            });
        }
        if min.iter().chain(max.iter()).any(|v| !v.is_finite()) {
            return Err(TreeError::InvalidDomain("non-finite corner"));
        }

        let divisions = (1u32 << level) as f32;
        let mut extent = [0.0; D];
        let mut unit = [0.0; D];
        for axis in 0..D {
            extent[axis] = max[axis] - min[axis];
            if extent[axis] <= 0.0 {
                return Err(TreeError::InvalidDomain("extent must be positive on every axis"));
            }
            unit[axis] = extent[axis] / divisions;
        }

        Ok(Self {
            level,
            origin: min,
            extent,
            unit,
            cell_count: (Self::cells_at_level(level + 1) - 1) / (Self::BRANCHING - 1),
        })
    }

    /// Finest subdivision level `L`; the root is level 0.
    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    #[must_use]
    pub const fn origin(&self) -> [f32; D] {
        self.origin
    }

    #[must_use]
    pub const fn extent(&self) -> [f32; D] {
        self.extent
    }

    /// Size of a finest-level cell along each axis.
    #[must_use]
    pub const fn unit(&self) -> [f32; D] {
        self.unit
    }

    /// Length of the flat cell array, `(B^(L+1) - 1) / (B - 1)`.
    #[must_use]
    pub const fn cell_count(&self) -> usize {
        self.cell_count
    }

    /// Finest-level cells per axis, `2^L`.
    #[must_use]
    pub const fn divisions(&self) -> u32 {
        1 << self.level
    }

    /// Number of cells on `level`, `B^level`.
    #[must_use]
    pub const fn cells_at_level(level: u32) -> usize {
        1 << (D * level as usize)
    }

    /// The whole domain as a box.
    #[must_use]
    pub fn domain(&self) -> Aabb<D> {
        let mut max = self.origin;
        for (hi, e) in max.iter_mut().zip(self.extent) {
            *hi += e;
        }
        Aabb::from_corners(self.origin, max)
    }

    /// Maps a point to finest-level grid coordinates.
    ///
    /// A coordinate on the far edge of the domain lands in the last cell.
    ///
    /// # Errors
    /// [`TreeError::OutOfDomain`] if the point lies outside the domain.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn quantize(&self, point: [f32; D]) -> Result<[u32; D], TreeError> {
        let last = self.divisions() - 1;
        let mut grid = [0u32; D];
        for axis in 0..D {
            let offset = point[axis] - self.origin[axis];
            if !(0.0..=self.extent[axis]).contains(&offset) {
                return Err(TreeError::OutOfDomain);
            }
            grid[axis] = ((offset / self.unit[axis]).floor() as u32).min(last);
        }
        Ok(grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_counts() {
        let quad = SpaceConfig::new(3, [0.0; 2], [100.0; 2]).unwrap();
        assert_eq!(quad.cell_count(), 1 + 4 + 16 + 64);
        assert_eq!(quad.unit(), [12.5, 12.5]);

        let oct = SpaceConfig::new(2, [0.0; 3], [8.0; 3]).unwrap();
        assert_eq!(oct.cell_count(), 1 + 8 + 64);
        assert_eq!(SpaceConfig::<3>::cells_at_level(2), 64);

        let root_only = SpaceConfig::new(0, [0.0; 2], [1.0; 2]).unwrap();
        assert_eq!(root_only.cell_count(), 1);
    }

    #[test]
    fn test_level_ceiling() {
        assert!(SpaceConfig::new(MAX_LEVEL + 1, [0.0; 2], [1.0; 2]).is_ok());
        assert_eq!(
            SpaceConfig::new(MAX_LEVEL + 2, [0.0; 2], [1.0; 2]),
            Err(TreeError::LevelTooDeep {
                level: MAX_LEVEL + 2,
                max: MAX_LEVEL + 1
            })
        );
    }

    #[test]
    fn test_rejects_degenerate_domain() {
        assert!(SpaceConfig::new(2, [0.0, 0.0], [10.0, 0.0]).is_err());
        assert!(SpaceConfig::new(2, [0.0, f32::INFINITY], [10.0, 10.0]).is_err());
        assert_eq!(
            SpaceConfig::<4>::new(1, [0.0; 4], [1.0; 4]),
            Err(TreeError::UnsupportedDimension(4))
        );
    }

    #[test]
    fn test_quantize_with_offset_origin() {
        let cfg = SpaceConfig::new(2, [-10.0, 20.0], [10.0, 40.0]).unwrap();
        assert_eq!(cfg.quantize([-10.0, 20.0]).unwrap(), [0, 0]);
        assert_eq!(cfg.quantize([0.0, 29.0]).unwrap(), [2, 1]);
        assert_eq!(cfg.quantize([10.0, 40.0]).unwrap(), [3, 3]);
        assert_eq!(cfg.quantize([10.5, 30.0]), Err(TreeError::OutOfDomain));
    }
}
