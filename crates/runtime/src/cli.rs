//! Command line arguments layered over a scene file.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::scene::SceneConfig;

#[derive(Debug, Default, Parser)]
#[command(
    name = "lintree_runtime",
    about = "Moves boxes through a linear quadtree/octree and reports broad-phase pairs"
)]
pub struct Cli {
    /// JSON scene file; defaults are used for anything it omits.
    #[arg(long)]
    pub scene: Option<PathBuf>,
    #[arg(long)]
    pub steps: Option<u32>,
    /// 2 for a quadtree, 3 for an octree.
    #[arg(long)]
    pub dims: Option<usize>,
    #[arg(long)]
    pub level: Option<u32>,
    #[arg(long)]
    pub agents: Option<usize>,
    #[arg(long)]
    pub seed: Option<u64>,
    /// Log the finest-grid divider lines at startup.
    #[arg(long)]
    pub grid: bool,
}

impl Cli {
    /// Loads the scene file, if any, and applies the overrides.
    ///
    /// # Errors
    /// Scene loading failures, or an invalid combination after overriding.
    pub fn scene(&self) -> Result<SceneConfig> {
        let mut scene = match &self.scene {
            Some(path) => SceneConfig::from_path(path)?,
            None => SceneConfig::default(),
        };
        self.apply(&mut scene);
        scene.validate()?;
        Ok(scene)
    }

    /// Command line values win over the scene.
    pub fn apply(&self, scene: &mut SceneConfig) {
        if let Some(steps) = self.steps {
            scene.steps = steps;
        }
        if let Some(dims) = self.dims {
            scene.dims = dims;
        }
        if let Some(level) = self.level {
            scene.level = level;
        }
        if let Some(agents) = self.agents {
            scene.agents = agents;
        }
        if let Some(seed) = self.seed {
            scene.seed = seed;
        }
        scene.grid |= self.grid;
    }
}
