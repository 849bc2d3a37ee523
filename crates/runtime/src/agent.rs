//! Moving boxes that own a node in the tree.

use lintree::{Aabb, NodeId, TreeError};

/// Anything that can report an axis-aligned bounding box.
pub trait Bounded<const D: usize> {
    /// # Errors
    /// When the current state does not describe a valid box.
    fn bounds(&self) -> Result<Aabb<D>, TreeError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Agent<const D: usize> {
    pub position: [f32; D],
    pub velocity: [f32; D],
    pub half_extents: [f32; D],
    pub node: NodeId,
}

impl<const D: usize> Agent<D> {
    /// Integrates one step and reflects off the walls of `domain`, keeping
    /// the whole box inside it.
    pub fn advance(&mut self, dt: f32, domain: &Aabb<D>) {
        let (dmin, dmax) = (domain.min(), domain.max());
        for axis in 0..D {
            let half = self.half_extents[axis];
            let lo = dmin[axis] + half;
            let hi = (dmax[axis] - half).max(lo);
            let p = &mut self.position[axis];
            let v = &mut self.velocity[axis];
            *p += *v * dt;
            if *p < lo {
                *p = lo;
                *v = v.abs();
            } else if *p > hi {
                *p = hi;
                *v = -v.abs();
            }
        }
    }
}

impl<const D: usize> Bounded<D> for Agent<D> {
    fn bounds(&self) -> Result<Aabb<D>, TreeError> {
        Aabb::from_center_half_extents(self.position, self.half_extents)
    }
}
