//! Occupancy statistics for a [`LinearTree`]

use crate::morton;
use crate::tree::LinearTree;

/// Snapshot of how the tree is populated.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeStats {
    pub allocated_cells: usize,
    pub occupied_cells: usize,
    pub registered_nodes: usize,
    pub live_nodes: usize,
    /// Registered nodes per level, index 0 being the root.
    pub nodes_per_level: Vec<usize>,
    pub deepest_occupied_level: Option<u32>,
    pub average_nodes_per_occupied_cell: f32,
}

impl<T, const D: usize> LinearTree<T, D> {
    /// Computes statistics by scanning cells and nodes.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn stats(&self) -> TreeStats {
        let allocated_cells = self.allocated_cells();
        let occupied_cells = self
            .cells
            .iter()
            .filter(|c| c.is_some_and(|cell| !cell.is_empty()))
            .count();

        let mut nodes_per_level = vec![0; self.config.level() as usize + 1];
        let mut registered_nodes = 0;
        for (_, node) in self.nodes.iter() {
            if let Some(cell) = node.cell {
                let (level, _) = morton::decode_index::<D>(cell);
                nodes_per_level[level as usize] += 1;
                registered_nodes += 1;
            }
        }

        let deepest_occupied_level = nodes_per_level
            .iter()
            .rposition(|&n| n > 0)
            .and_then(|l| u32::try_from(l).ok());

        let average_nodes_per_occupied_cell = if occupied_cells > 0 {
            registered_nodes as f32 / occupied_cells as f32
        } else {
            0.0
        };

        TreeStats {
            allocated_cells,
            occupied_cells,
            registered_nodes,
            live_nodes: self.len(),
            nodes_per_level,
            deepest_occupied_level,
            average_nodes_per_occupied_cell,
        }
    }
}
