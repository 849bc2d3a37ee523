#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! # Linear Tree Broad Phase
//!
//! An array-backed quadtree/octree used to find candidate collision pairs
//! without testing every object against every other.
//!
//! ## Key Components
//!
//! -   **Addressing:** [`morton`] maps a box to the single cell that fully
//!     contains it. Cells live in one flat array; the children of cell `i` are
//!     `i * B + 1 ..= i * B + B` and its parent is `(i - 1) / B`.
//! -   **Storage:** [`cell`] keeps, per cell, an intrusive doubly linked list
//!     threaded through an arena of nodes addressed by [`NodeId`].
//! -   **Manager:** [`LinearTree`] allocates cells on demand, registers and
//!     removes nodes, and walks the hierarchy to emit candidate pairs
//!     ([`collision`]).
//!
//! ## Usage
//!
//! ```rust
//! use lintree::{Aabb, Quadtree};
//!
//! let mut tree = Quadtree::new(3, [0.0, 0.0], [100.0, 100.0])?;
//! let a = tree.insert("a");
//! let b = tree.insert("b");
//! tree.register(a, &Aabb::new([10.0, 10.0], [20.0, 20.0])?)?;
//! tree.register(b, &Aabb::new([10.0, 10.0], [20.0, 20.0])?)?;
//!
//! let pairs = tree.collision_pairs();
//! assert_eq!(pairs.len(), 1);
//! # Ok::<(), lintree::TreeError>(())
//! ```
//!
//! The tree is single-threaded. Mutation needs `&mut`, so all registrations
//! of a step are finished before the pair query borrows the tree.

pub mod cell;
pub mod collision;
pub mod config;
pub mod error;
pub mod morton;
pub mod stats;
pub mod tree;
pub mod types;

pub use cell::{CellIter, NodeId};
pub use collision::CollisionPairs;
pub use config::{SpaceConfig, MAX_LEVEL};
pub use error::TreeError;
pub use morton::CellLocation;
pub use stats::TreeStats;
pub use tree::{LinearTree, Octree, Quadtree};
pub use types::Aabb;
