//! Collision candidate enumeration over a [`crate::LinearTree`].

pub mod broad_phase;

pub use broad_phase::CollisionPairs;
