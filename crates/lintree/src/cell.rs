//! # Cells and Nodes
//!
//! Each allocated cell heads an intrusive doubly linked list threaded through
//! the node arena. Links are arena slots rather than references, so a node is
//! spliced out in O(1) without searching its cell.
//!
//! A node belongs to at most one cell at a time. The head of a list has no
//! previous link, and every linked node points back at the cell holding it.

use slab::Slab;

use crate::error::TreeError;

/// Handle to a node in a [`crate::LinearTree`].
///
/// Handles carry the generation of their slot; once a node is released the
/// handle goes stale even if the slot is reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    slot: usize,
    generation: u32,
}

impl NodeId {
    #[must_use]
    pub const fn slot(self) -> usize {
        self.slot
    }

    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

/// A bucket of the flat array. Holds only the head of its list.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    head: Option<usize>,
}

impl Cell {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    pub(crate) const fn head(&self) -> Option<usize> {
        self.head
    }

    /// Links `slot` in as the new head of this cell's list.
    pub(crate) fn push<T>(
        &mut self,
        index: usize,
        slot: usize,
        nodes: &mut NodeArena<T>,
    ) -> Result<(), TreeError> {
        let head = self.head;
        let node = nodes.node_mut(slot).ok_or(TreeError::StaleNode)?;
        if let Some(cell) = node.cell {
            return Err(TreeError::AlreadyInCell { cell });
        }

        node.prev = None;
        node.next = head;
        node.cell = Some(index);
        if let Some(old_head) = head.and_then(|h| nodes.node_mut(h)) {
            old_head.prev = Some(slot);
        }
        self.head = Some(slot);
        Ok(())
    }

    /// Notification that `slot` is leaving; `successor` is its next link.
    pub(crate) fn on_remove(&mut self, slot: usize, successor: Option<usize>) {
        if self.head == Some(slot) {
            self.head = successor;
        }
    }
}

/// A registered object: payload plus its links inside the owning cell.
#[derive(Debug, Clone)]
pub(crate) struct Node<T> {
    pub(crate) payload: T,
    pub(crate) cell: Option<usize>,
    pub(crate) prev: Option<usize>,
    pub(crate) next: Option<usize>,
}

/// Node storage. Slots come from a [`Slab`]; `generations` outlives each
/// occupant so a reused slot can be told apart from its previous tenant.
#[derive(Debug, Clone)]
pub(crate) struct NodeArena<T> {
    nodes: Slab<Node<T>>,
    generations: Vec<u32>,
}

impl<T> Default for NodeArena<T> {
    fn default() -> Self {
        Self {
            nodes: Slab::new(),
            generations: Vec::new(),
        }
    }
}

impl<T> NodeArena<T> {
    pub(crate) fn insert(&mut self, payload: T) -> NodeId {
        let slot = self.nodes.insert(Node {
            payload,
            cell: None,
            prev: None,
            next: None,
        });
        let generation = match self.generations.get(slot) {
            Some(&generation) => generation,
            None => {
                self.generations.push(0);
                0
            }
        };
        NodeId { slot, generation }
    }

    /// Checks that `id` still names a live node and returns its slot.
    pub(crate) fn resolve(&self, id: NodeId) -> Result<usize, TreeError> {
        let current = self.generations.get(id.slot).copied();
        if current == Some(id.generation) && self.nodes.contains(id.slot) {
            Ok(id.slot)
        } else {
            Err(TreeError::StaleNode)
        }
    }

    pub(crate) fn node(&self, slot: usize) -> Option<&Node<T>> {
        self.nodes.get(slot)
    }

    pub(crate) fn node_mut(&mut self, slot: usize) -> Option<&mut Node<T>> {
        self.nodes.get_mut(slot)
    }

    pub(crate) fn id_of(&self, slot: usize) -> Option<NodeId> {
        self.generations.get(slot).map(|&generation| NodeId { slot, generation })
    }

    /// Splices `slot` out of its cell and clears its links.
    ///
    /// Returns the index of the cell it left.
    pub(crate) fn detach(
        &mut self,
        slot: usize,
        cells: &mut [Option<Cell>],
    ) -> Result<usize, TreeError> {
        let (cell_index, prev, next) = match self.node(slot) {
            Some(Node {
                cell: Some(cell),
                prev,
                next,
                ..
            }) => (*cell, *prev, *next),
            Some(_) => return Err(TreeError::NotRegistered),
            None => return Err(TreeError::StaleNode),
        };

        if let Some(cell) = cells.get_mut(cell_index).and_then(Option::as_mut) {
            cell.on_remove(slot, next);
        }
        if let Some(p) = prev.and_then(|p| self.node_mut(p)) {
            p.next = next;
        }
        if let Some(n) = next.and_then(|n| self.node_mut(n)) {
            n.prev = prev;
        }
        if let Some(node) = self.node_mut(slot) {
            node.prev = None;
            node.next = None;
            node.cell = None;
        }
        Ok(cell_index)
    }

    /// Frees a detached slot and hands back its payload.
    pub(crate) fn release(&mut self, slot: usize) -> Option<T> {
        let node = self.nodes.try_remove(slot)?;
        if let Some(generation) = self.generations.get_mut(slot) {
            *generation = generation.wrapping_add(1);
        }
        Some(node.payload)
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (usize, &Node<T>)> + '_ {
        self.nodes.iter()
    }

    /// Walks a cell's list from its head.
    pub(crate) fn list(&self, head: Option<usize>) -> CellIter<'_, T> {
        CellIter {
            nodes: self,
            cursor: head,
        }
    }
}

/// Iterator over the nodes of one cell, most recently pushed first.
pub struct CellIter<'a, T> {
    nodes: &'a NodeArena<T>,
    cursor: Option<usize>,
}

impl<T> Clone for CellIter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes,
            cursor: self.cursor,
        }
    }
}

impl<'a, T> Iterator for CellIter<'a, T> {
    type Item = (NodeId, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let slot = self.cursor?;
        let node = self.nodes.node(slot)?;
        self.cursor = node.next;
        Some((self.nodes.id_of(slot)?, &node.payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linked(arena: &NodeArena<&'static str>, cell: &Cell) -> Vec<&'static str> {
        arena.list(cell.head()).map(|(_, p)| *p).collect()
    }

    #[test]
    fn test_push_links_new_head_and_sets_back_reference() {
        let mut arena = NodeArena::default();
        let mut cells = vec![Some(Cell::default())];
        let a = arena.insert("a");
        let b = arena.insert("b");

        let cell = cells[0].as_mut().unwrap();
        cell.push(0, a.slot(), &mut arena).unwrap();
        assert_eq!(arena.node(a.slot()).unwrap().cell, Some(0));
        cell.push(0, b.slot(), &mut arena).unwrap();
        assert_eq!(arena.node(b.slot()).unwrap().cell, Some(0));
        assert_eq!(linked(&arena, cell), vec!["b", "a"]);
        assert_eq!(arena.node(b.slot()).unwrap().prev, None);
        assert_eq!(arena.node(a.slot()).unwrap().prev, Some(b.slot()));
    }

    #[test]
    fn test_duplicate_push_is_rejected() {
        let mut arena = NodeArena::default();
        let mut cell = Cell::default();
        let a = arena.insert("a");
        cell.push(3, a.slot(), &mut arena).unwrap();
        assert_eq!(
            cell.push(3, a.slot(), &mut arena),
            Err(TreeError::AlreadyInCell { cell: 3 })
        );
        assert_eq!(linked(&arena, &cell), vec!["a"]);
    }

    #[test]
    fn test_detach_head_middle_and_tail() {
        let mut arena = NodeArena::default();
        let mut cells = vec![Some(Cell::default())];
        let ids: Vec<_> = ["a", "b", "c", "d"].into_iter().map(|p| arena.insert(p)).collect();
        for id in &ids {
            cells[0].as_mut().unwrap().push(0, id.slot(), &mut arena).unwrap();
        }
        // List is d, c, b, a.
        arena.detach(ids[2].slot(), &mut cells).unwrap();
        assert_eq!(linked(&arena, cells[0].as_ref().unwrap()), vec!["d", "b", "a"]);
        arena.detach(ids[3].slot(), &mut cells).unwrap();
        assert_eq!(linked(&arena, cells[0].as_ref().unwrap()), vec!["b", "a"]);
        arena.detach(ids[0].slot(), &mut cells).unwrap();
        assert_eq!(linked(&arena, cells[0].as_ref().unwrap()), vec!["b"]);
        assert_eq!(arena.node(ids[1].slot()).unwrap().prev, None);
        assert_eq!(arena.node(ids[1].slot()).unwrap().next, None);

        assert_eq!(
            arena.detach(ids[0].slot(), &mut cells),
            Err(TreeError::NotRegistered)
        );
    }

    #[test]
    fn test_released_slots_are_reused_with_new_generation() {
        let mut arena = NodeArena::default();
        let a = arena.insert(1);
        assert_eq!(arena.release(a.slot()), Some(1));
        assert_eq!(arena.len(), 0);
        let b = arena.insert(2);
        assert_eq!(b.slot(), a.slot());
        assert_ne!(b.generation(), a.generation());
        assert_eq!(arena.resolve(a), Err(TreeError::StaleNode));
        assert_eq!(arena.resolve(b), Ok(b.slot()));
    }
}
