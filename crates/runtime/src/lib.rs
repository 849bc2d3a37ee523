#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! # Linear Tree Runtime
//!
//! A headless host for the [`lintree`] broad phase: agents drift and bounce
//! inside the domain, are re-registered every step, and the candidate pairs
//! the tree reports are checked against the real box overlaps.
//!
//! Configuration comes from a JSON [`scene`] file with [`cli`] overrides.

pub mod agent;
pub mod app;
pub mod cli;
pub mod grid;
pub mod scene;
pub mod world;

pub use agent::{Agent, Bounded};
pub use app::{run, RunSummary};
pub use cli::Cli;
pub use grid::{grid_lines, GridLine};
pub use scene::SceneConfig;
pub use world::{SpawnParams, StepReport, World};
