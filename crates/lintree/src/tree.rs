//! # Linear Tree
//!
//! The manager owning the flat cell array and the node arena. Registration
//! locates the owning cell with [`crate::morton::locate`], materializes that
//! cell and its missing ancestors, and links the node into the cell's list.
//!
//! Cells are allocated lazily and never freed: once a region has been needed
//! it stays allocated until the tree is rebuilt with [`LinearTree::reinitialize`].

use crate::cell::{Cell, CellIter, NodeArena, NodeId};
use crate::config::SpaceConfig;
use crate::error::TreeError;
use crate::morton;
use crate::types::Aabb;

/// Array-backed quadtree (`D = 2`) or octree (`D = 3`) over payloads `T`.
#[derive(Debug, Clone)]
pub struct LinearTree<T, const D: usize> {
    pub(crate) config: SpaceConfig<D>,
    pub(crate) cells: Vec<Option<Cell>>,
    pub(crate) nodes: NodeArena<T>,
}

pub type Quadtree<T> = LinearTree<T, 2>;
pub type Octree<T> = LinearTree<T, 3>;

impl<T, const D: usize> LinearTree<T, D> {
    /// Builds an empty tree over `[min, max]` subdivided `level` times.
    ///
    /// # Errors
    /// Any error from [`SpaceConfig::new`].
    pub fn new(level: u32, min: [f32; D], max: [f32; D]) -> Result<Self, TreeError> {
        SpaceConfig::new(level, min, max).map(Self::with_config)
    }

    /// Builds an empty tree from validated geometry. All cells start absent.
    #[must_use]
    pub fn with_config(config: SpaceConfig<D>) -> Self {
        let cells = vec![None; config.cell_count()];
        Self {
            config,
            cells,
            nodes: NodeArena::default(),
        }
    }

    /// Rebuilds the tree for new geometry, dropping every node and cell.
    ///
    /// Outstanding [`NodeId`]s become meaningless.
    ///
    /// # Errors
    /// On invalid geometry the tree is left untouched.
    pub fn reinitialize(&mut self, level: u32, min: [f32; D], max: [f32; D]) -> Result<(), TreeError> {
        let config = SpaceConfig::new(level, min, max)?;
        tracing::debug!(level, cells = config.cell_count(), "linear tree reinitialized");
        *self = Self::with_config(config);
        Ok(())
    }

    #[must_use]
    pub const fn config(&self) -> &SpaceConfig<D> {
        &self.config
    }

    /// Creates an unregistered node for `payload`.
    pub fn insert(&mut self, payload: T) -> NodeId {
        self.nodes.insert(payload)
    }

    /// Registers `node` in the cell owning `bounds` and returns that cell.
    ///
    /// A node still linked into another cell is moved. The cell and all of
    /// its missing ancestors are allocated on the way.
    ///
    /// # Errors
    /// - [`TreeError::StaleNode`] for a released handle.
    /// - [`TreeError::OutOfDomain`] / [`TreeError::CellOutOfRange`] when the
    ///   box cannot be placed.
    /// - [`TreeError::AlreadyInCell`] when the node already sits in the
    ///   owning cell.
    ///
    /// The tree is unchanged on every error.
    pub fn register(&mut self, node: NodeId, bounds: &Aabb<D>) -> Result<usize, TreeError> {
        let slot = self.nodes.resolve(node)?;
        let location = morton::locate(&self.config, bounds).map_err(|err| {
            tracing::debug!(?bounds, %err, "registration rejected");
            err
        })?;
        let index = location.index;

        match self.nodes.node(slot).and_then(|n| n.cell) {
            Some(current) if current == index => {
                return Err(TreeError::AlreadyInCell { cell: index });
            }
            Some(_) => {
                self.nodes.detach(slot, &mut self.cells)?;
            }
            None => {}
        }

        self.materialize(index);
        let cell = self
            .cells
            .get_mut(index)
            .and_then(Option::as_mut)
            .ok_or(TreeError::CellOutOfRange {
                index,
                cells: self.config.cell_count(),
            })?;
        cell.push(index, slot, &mut self.nodes)?;
        Ok(index)
    }

    /// Allocates `index` and walks up allocating missing ancestors, stopping
    /// at the first one that already exists.
    fn materialize(&mut self, index: usize) {
        let mut current = Some(index);
        while let Some(i) = current {
            let Some(slot) = self.cells.get_mut(i) else {
                break;
            };
            if slot.is_some() {
                break;
            }
            *slot = Some(Cell::default());
            tracing::trace!(cell = i, "cell allocated");
            current = morton::parent_index::<D>(i);
        }
    }

    /// Detaches `node` from its cell. The node stays alive and may be
    /// registered again.
    ///
    /// # Errors
    /// [`TreeError::NotRegistered`] if the node is not in any cell, in which
    /// case nothing changes.
    pub fn remove(&mut self, node: NodeId) -> Result<(), TreeError> {
        let slot = self.nodes.resolve(node)?;
        self.nodes.detach(slot, &mut self.cells).map(|_| ())
    }

    /// Detaches `node` if needed, frees its slot and returns the payload.
    ///
    /// # Errors
    /// [`TreeError::StaleNode`] if the handle was already released.
    pub fn release(&mut self, node: NodeId) -> Result<T, TreeError> {
        let slot = self.nodes.resolve(node)?;
        match self.nodes.detach(slot, &mut self.cells) {
            Ok(_) | Err(TreeError::NotRegistered) => {}
            Err(err) => return Err(err),
        }
        self.nodes.release(slot).ok_or(TreeError::StaleNode)
    }

    #[must_use]
    pub fn payload(&self, node: NodeId) -> Option<&T> {
        let slot = self.nodes.resolve(node).ok()?;
        self.nodes.node(slot).map(|n| &n.payload)
    }

    /// Cell currently holding `node`, if it is registered.
    #[must_use]
    pub fn cell_of(&self, node: NodeId) -> Option<usize> {
        let slot = self.nodes.resolve(node).ok()?;
        self.nodes.node(slot).and_then(|n| n.cell)
    }

    #[must_use]
    pub fn is_allocated(&self, index: usize) -> bool {
        matches!(self.cells.get(index), Some(Some(_)))
    }

    /// Number of cells allocated so far.
    #[must_use]
    pub fn allocated_cells(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Nodes registered directly in cell `index`, most recent first.
    /// Empty for absent cells.
    #[must_use]
    pub fn cell_entries(&self, index: usize) -> CellIter<'_, T> {
        let head = self.cells.get(index).copied().flatten().and_then(|c| c.head());
        self.nodes.list(head)
    }

    /// Live nodes, registered or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 0
    }
}
