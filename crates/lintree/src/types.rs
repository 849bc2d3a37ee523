//! # Geometry Types
//!
//! Axis-aligned boxes over `D` axes. Overlap is inclusive on faces so that
//! touching boxes count as candidates.

use crate::error::TreeError;

/// Axis-aligned bounding box with `min <= max` on every axis.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb<const D: usize> {
    min: [f32; D],
    max: [f32; D],
}

impl<const D: usize> Aabb<D> {
    /// Builds a box from its corners.
    ///
    /// # Errors
    /// Returns [`TreeError::InvalidBounds`] when a coordinate is not finite or
    /// `min` exceeds `max` on some axis.
    pub fn new(min: [f32; D], max: [f32; D]) -> Result<Self, TreeError> {
        if min.iter().chain(max.iter()).any(|v| !v.is_finite()) {
            return Err(TreeError::InvalidBounds("non-finite coordinate"));
        }
        if min.iter().zip(max.iter()).any(|(lo, hi)| lo > hi) {
            return Err(TreeError::InvalidBounds("min corner exceeds max corner"));
        }
        Ok(Self { min, max })
    }

    /// Skips validation; callers guarantee `min <= max`.
    pub(crate) const fn from_corners(min: [f32; D], max: [f32; D]) -> Self {
        Self { min, max }
    }

    /// Builds a box centred at `center` with the given half extents.
    ///
    /// # Errors
    /// Same as [`Aabb::new`]; negative half extents invert the box.
    pub fn from_center_half_extents(
        center: [f32; D],
        half_extents: [f32; D],
    ) -> Result<Self, TreeError> {
        let mut min = center;
        let mut max = center;
        for ((lo, hi), h) in min.iter_mut().zip(max.iter_mut()).zip(half_extents) {
            *lo -= h;
            *hi += h;
        }
        Self::new(min, max)
    }

    #[must_use]
    pub const fn min(&self) -> [f32; D] {
        self.min
    }

    #[must_use]
    pub const fn max(&self) -> [f32; D] {
        self.max
    }

    /// Returns `true` if the boxes overlap, touching faces included.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        (0..D).all(|axis| self.min[axis] <= other.max[axis] && self.max[axis] >= other.min[axis])
    }

    /// Returns `true` if `other` lies entirely inside this box.
    #[must_use]
    pub fn contains(&self, other: &Self) -> bool {
        (0..D).all(|axis| self.min[axis] <= other.min[axis] && self.max[axis] >= other.max[axis])
    }
}
