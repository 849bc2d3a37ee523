//! Broad-phase collision detection over the linear tree
//!
//! Two objects are candidates when their cells are the same or one cell is an
//! ancestor of the other. The walk starts at the root and keeps the nodes of
//! every cell strictly above the current one on an ancestor stack, so each
//! cross-level pair is produced exactly once, at the deeper of the two cells.

use std::slice::ChunksExact;

use crate::cell::NodeId;
use crate::config::SpaceConfig;
use crate::morton;
use crate::tree::LinearTree;

/// Reads a flat pair buffer two entries at a time.
pub struct CollisionPairs<'a, T> {
    chunks: ChunksExact<'a, T>,
}

impl<'a, T> CollisionPairs<'a, T> {
    /// Wraps the buffer filled by [`LinearTree::collision_pairs_into`].
    #[must_use]
    pub fn new(flat: &'a [T]) -> Self {
        Self {
            chunks: flat.chunks_exact(2),
        }
    }
}

impl<'a, T> Iterator for CollisionPairs<'a, T> {
    type Item = (&'a T, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        match self.chunks.next()? {
            [a, b] => Some((a, b)),
            _ => None,
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.chunks.size_hint()
    }
}

impl<T, const D: usize> LinearTree<T, D> {
    /// Fills `out` with candidate payload pairs, two entries per pair, and
    /// returns the pair count. `out` is cleared first.
    pub fn collision_pairs_into(&self, out: &mut Vec<T>) -> usize
    where
        T: Clone,
    {
        out.clear();
        self.for_each_candidate(|a, b| {
            if let (Some(x), Some(y)) = (self.nodes.node(a), self.nodes.node(b)) {
                out.push(x.payload.clone());
                out.push(y.payload.clone());
            }
        });
        out.len() / 2
    }

    /// Candidate payload pairs as tuples.
    #[must_use]
    pub fn collision_pairs(&self) -> Vec<(T, T)>
    where
        T: Clone,
    {
        let mut flat = Vec::new();
        self.collision_pairs_into(&mut flat);
        CollisionPairs::new(&flat)
            .map(|(a, b)| (a.clone(), b.clone()))
            .collect()
    }

    /// Candidate pairs as node handles, in traversal order.
    #[must_use]
    pub fn candidate_nodes(&self) -> Vec<(NodeId, NodeId)> {
        let mut pairs = Vec::new();
        self.for_each_candidate(|a, b| {
            if let (Some(x), Some(y)) = (self.nodes.id_of(a), self.nodes.id_of(b)) {
                pairs.push((x, y));
            }
        });
        pairs
    }

    fn for_each_candidate<F: FnMut(usize, usize)>(&self, mut emit: F) {
        if !self.is_allocated(0) {
            return;
        }
        let mut ancestors = Vec::new();
        self.walk(0, &mut ancestors, &mut emit);
        debug_assert!(ancestors.is_empty());
    }

    /// Emits pairs for cell `index` and recurses into its allocated children.
    ///
    /// On entry `ancestors` holds the nodes of every cell strictly between the
    /// root and `index`; it holds the same on return.
    fn walk<F: FnMut(usize, usize)>(&self, index: usize, ancestors: &mut Vec<usize>, emit: &mut F) {
        let Some(head) = self.cells.get(index).copied().flatten().map(|c| c.head()) else {
            return;
        };

        let mut local = self.nodes.list(head);
        while let Some((node, _)) = local.next() {
            for (other, _) in local.clone() {
                emit(node.slot(), other.slot());
            }
            for &ancestor in ancestors.iter() {
                emit(node.slot(), ancestor);
            }
        }

        let mut pushed = 0;
        let mut descended = false;
        for slot in 0..SpaceConfig::<D>::BRANCHING {
            let child = morton::child_index::<D>(index, slot);
            if !self.is_allocated(child) {
                continue;
            }
            if !descended {
                let before = ancestors.len();
                ancestors.extend(self.nodes.list(head).map(|(id, _)| id.slot()));
                pushed = ancestors.len() - before;
                descended = true;
            }
            self.walk(child, ancestors, emit);
        }

        if descended {
            ancestors.truncate(ancestors.len() - pushed);
        }
    }
}
