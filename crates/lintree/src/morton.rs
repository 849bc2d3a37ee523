//! # Morton Addressing
//!
//! Pure functions mapping boxes to cells of the flat array.
//!
//! Cells on level `k` occupy the index range starting at
//! `(B^k - 1) / (B - 1)`; within a level a cell is identified by the Morton
//! (Z-order) code of its grid coordinates. A box belongs to the deepest cell
//! that contains both of its quantized corners, found by XOR-ing the corner
//! codes and looking for the most significant differing `D`-bit group.

use crate::config::SpaceConfig;
use crate::error::TreeError;
use crate::types::Aabb;

/// Where a box lives in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellLocation {
    /// Morton code local to `level`.
    pub morton: u64,
    /// Owning level; 0 is the root.
    pub level: u32,
    /// Flat index into the cell array.
    pub index: usize,
}

/// Spreads the bits of `value` so that bit `i` lands on bit `i * D`.
#[must_use]
pub fn spread_bits<const D: usize>(value: u32) -> u64 {
    let mut code = 0u64;
    let mut rest = value;
    let mut bit = 0usize;
    while rest != 0 {
        code |= u64::from(rest & 1) << (bit * D);
        rest >>= 1;
        bit += 1;
    }
    code
}

/// Inverse of [`spread_bits`]: gathers every `D`-th bit of `code`.
#[must_use]
pub fn compact_bits<const D: usize>(code: u64) -> u32 {
    let mut value = 0u32;
    let mut rest = code;
    let mut bit = 0u32;
    while rest != 0 {
        value |= u32::from((rest & 1) == 1) << bit;
        rest >>= D;
        bit += 1;
    }
    value
}

/// Interleaves per-axis grid coordinates into one Morton code, axis `a`
/// occupying bit positions `a, a + D, a + 2D, ...`.
#[must_use]
pub fn encode_point<const D: usize>(grid: [u32; D]) -> u64 {
    grid.iter()
        .enumerate()
        .fold(0, |code, (axis, &c)| code | (spread_bits::<D>(c) << axis))
}

/// Splits a Morton code back into per-axis grid coordinates.
#[must_use]
pub fn decode_point<const D: usize>(code: u64) -> [u32; D] {
    let mut grid = [0u32; D];
    for (axis, c) in grid.iter_mut().enumerate() {
        *c = compact_bits::<D>(code >> axis);
    }
    grid
}

/// First flat index of `level`, `(B^level - 1) / (B - 1)`.
#[must_use]
pub const fn level_offset<const D: usize>(level: u32) -> usize {
    ((1usize << (D * level as usize)) - 1) / ((1usize << D) - 1)
}

/// Converts a level-local Morton code to a flat index.
#[allow(clippy::cast_possible_truncation)]
#[must_use]
pub const fn to_linear_index<const D: usize>(morton: u64, level: u32) -> usize {
    morton as usize + level_offset::<D>(level)
}

/// Parent of `index`, `(index - 1) >> D`; `None` for the root.
#[must_use]
pub const fn parent_index<const D: usize>(index: usize) -> Option<usize> {
    if index == 0 {
        None
    } else {
        Some((index - 1) >> D)
    }
}

/// Child `slot` (`0..B`) of `index`, `index * B + 1 + slot`.
#[must_use]
pub const fn child_index<const D: usize>(index: usize, slot: usize) -> usize {
    (index << D) + 1 + slot
}

/// Recovers `(level, morton)` from a flat index.
#[must_use]
pub fn decode_index<const D: usize>(index: usize) -> (u32, u64) {
    let mut level = 0u32;
    while level_offset::<D>(level + 1) <= index {
        level += 1;
    }
    (level, (index - level_offset::<D>(level)) as u64)
}

/// Returns `true` if `ancestor` lies on the root path of `index`, or is it.
#[must_use]
pub fn is_ancestor_or_self<const D: usize>(ancestor: usize, index: usize) -> bool {
    let mut current = Some(index);
    while let Some(i) = current {
        if i == ancestor {
            return true;
        }
        if i < ancestor {
            return false;
        }
        current = parent_index::<D>(i);
    }
    false
}

/// Finds the cell that owns `bounds`.
///
/// A box touching a divider with its max corner quantizes into the next cell
/// over, so it resolves to the coarser ancestor rather than either neighbour.
///
/// # Errors
/// - [`TreeError::OutOfDomain`] if either corner is outside the domain.
/// - [`TreeError::CellOutOfRange`] if the index does not fit the array.
pub fn locate<const D: usize>(
    config: &SpaceConfig<D>,
    bounds: &Aabb<D>,
) -> Result<CellLocation, TreeError> {
    let low = encode_point::<D>(config.quantize(bounds.min())?);
    let high = encode_point::<D>(config.quantize(bounds.max())?);

    let group_mask = (1u64 << D) - 1;
    let mut diff = low ^ high;
    let mut groups = 0u32;
    let mut shift_groups = 0u32;
    while diff != 0 {
        groups += 1;
        if diff & group_mask != 0 {
            shift_groups = groups;
        }
        diff >>= D;
    }

    let out_of_range = TreeError::CellOutOfRange {
        index: usize::MAX,
        cells: config.cell_count(),
    };
    let level = config.level().checked_sub(shift_groups).ok_or(out_of_range)?;
    let morton = high >> (D * shift_groups as usize);
    let index = to_linear_index::<D>(morton, level);
    if index >= config.cell_count() {
        return Err(TreeError::CellOutOfRange {
            index,
            cells: config.cell_count(),
        });
    }

    Ok(CellLocation {
        morton,
        level,
        index,
    })
}

/// Region of space covered by cell `index`, or `None` past the array end.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn cell_bounds<const D: usize>(config: &SpaceConfig<D>, index: usize) -> Option<Aabb<D>> {
    if index >= config.cell_count() {
        return None;
    }
    let (level, morton) = decode_index::<D>(index);
    let grid = decode_point::<D>(morton);
    let per_axis = (1u32 << level) as f32;

    let origin = config.origin();
    let extent = config.extent();
    let mut min = [0.0; D];
    let mut max = [0.0; D];
    for axis in 0..D {
        let size = extent[axis] / per_axis;
        min[axis] = origin[axis] + size * grid[axis] as f32;
        max[axis] = min[axis] + size;
    }
    Some(Aabb::from_corners(min, max))
}
