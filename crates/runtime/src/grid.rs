//! Divider lines of the finest grid, for debug output.

use lintree::SpaceConfig;

/// One grid line spanning the whole domain along a single axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLine<const D: usize> {
    pub from: [f32; D],
    pub to: [f32; D],
    /// Lies on a central divider of the root cell.
    pub central: bool,
}

/// Every finest-level divider line: for each axis, one line through each
/// grid vertex of the remaining axes. `D * (N + 1)^(D - 1)` lines in total
/// for `N` divisions per axis.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn grid_lines<const D: usize>(config: &SpaceConfig<D>) -> Vec<GridLine<D>> {
    let divisions = config.divisions();
    let half = divisions / 2;
    let (origin, extent, unit) = (config.origin(), config.extent(), config.unit());
    let others = D.saturating_sub(1);
    let per_axis = (divisions as usize + 1).pow(u32::try_from(others).unwrap_or(0));

    let mut lines = Vec::with_capacity(D * per_axis);
    for run in 0..D {
        for combo in 0..per_axis {
            let mut from = origin;
            let mut rest = combo;
            let mut central = false;
            for axis in (0..D).filter(|&a| a != run) {
                let step = rest % (divisions as usize + 1);
                rest /= divisions as usize + 1;
                central |= step == half as usize;
                from[axis] = origin[axis] + unit[axis] * step as f32;
            }
            let mut to = from;
            to[run] = origin[run] + extent[run];
            lines.push(GridLine { from, to, central });
        }
    }
    lines
}
