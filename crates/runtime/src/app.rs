//! # Runtime Application Logic
//!
//! Builds a [`World`] from a [`SceneConfig`], spawns the agent population and
//! steps it, logging tree statistics every `report_every` steps.

use anyhow::{bail, Context, Result};
use lintree::SpaceConfig;
use serde::Serialize;

use crate::grid::grid_lines;
use crate::scene::SceneConfig;
use crate::world::{SpawnParams, StepReport, World};

/// Totals over a whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub dims: usize,
    pub steps: u32,
    pub agents: usize,
    pub moves: usize,
    pub rejected: usize,
    pub candidates: usize,
    pub contacts: usize,
    pub allocated_cells: usize,
}

/// Runs the scene headless.
///
/// # Errors
/// Invalid scene geometry. Agents that cannot be placed are skipped.
pub fn run(scene: &SceneConfig) -> Result<RunSummary> {
    scene.validate()?;
    match scene.dims {
        2 => run_dims::<2>(scene),
        3 => run_dims::<3>(scene),
        other => bail!("unsupported dimension count {other}"),
    }
}

fn run_dims<const D: usize>(scene: &SceneConfig) -> Result<RunSummary> {
    let (min, max) = scene.domain::<D>()?;
    let config = SpaceConfig::new(scene.level, min, max).context("building tree geometry")?;
    tracing::info!(
        dims = D,
        level = scene.level,
        cells = config.cell_count(),
        "Initializing linear tree..."
    );

    if scene.grid {
        let lines = grid_lines(&config);
        tracing::info!(lines = lines.len(), "Finest grid dividers:");
        for line in lines.iter().filter(|l| l.central) {
            tracing::info!(from = ?line.from, to = ?line.to, "central divider");
        }
    }

    let mut world = World::new(config, scene.seed);
    let params = SpawnParams {
        min_half_extent: scene.min_half_extent,
        max_half_extent: scene.max_half_extent,
        max_speed: scene.max_speed,
    };
    for _ in 0..scene.agents {
        if let Err(err) = world.spawn_random(&params) {
            tracing::warn!(%err, "agent could not be placed");
        }
    }
    tracing::info!(agents = world.len(), "Spawned agents");

    let mut summary = RunSummary {
        dims: D,
        steps: scene.steps,
        agents: world.len(),
        ..RunSummary::default()
    };
    for i in 0..scene.steps {
        let StepReport {
            moved,
            rejected,
            candidates,
            contacts,
        } = world.step(scene.dt);
        summary.moves += moved;
        summary.rejected += rejected;
        summary.candidates += candidates;
        summary.contacts += contacts;

        if (i + 1) % scene.report_every == 0 {
            let stats = world.stats();
            tracing::info!(
                step = i + 1,
                candidates,
                contacts,
                occupied = stats.occupied_cells,
                allocated = stats.allocated_cells,
                deepest = ?stats.deepest_occupied_level,
                per_level = ?stats.nodes_per_level,
                "Step complete"
            );
        }
    }

    summary.allocated_cells = world.stats().allocated_cells;
    tracing::info!(
        "Simulation loop finished after {} steps with {} contacts.",
        summary.steps,
        summary.contacts
    );
    Ok(summary)
}
