//! # World
//!
//! Owns the agents and the tree they are registered in. Each step moves every
//! agent, re-registers it, then asks the tree for candidate pairs and counts
//! the candidates whose boxes really overlap.

use std::collections::BTreeMap;

use lintree::{Aabb, LinearTree, SpaceConfig, TreeError, TreeStats};

use crate::agent::{Agent, Bounded};

/// Parameters for randomly generated agents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnParams {
    pub min_half_extent: f32,
    pub max_half_extent: f32,
    pub max_speed: f32,
}

/// Outcome of one [`World::step`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepReport {
    /// Agents whose owning cell changed.
    pub moved: usize,
    /// Agents that could not be placed this step.
    pub rejected: usize,
    pub candidates: usize,
    pub contacts: usize,
}

pub struct World<const D: usize> {
    tree: LinearTree<usize, D>,
    agents: BTreeMap<usize, Agent<D>>,
    domain: Aabb<D>,
    next_id: usize,
    rng: fastrand::Rng,
    pairs: Vec<usize>,
}

impl<const D: usize> World<D> {
    #[must_use]
    pub fn new(config: SpaceConfig<D>, seed: u64) -> Self {
        Self {
            domain: config.domain(),
            tree: LinearTree::with_config(config),
            agents: BTreeMap::new(),
            next_id: 0,
            rng: fastrand::Rng::with_seed(seed),
            pairs: Vec::new(),
        }
    }

    #[must_use]
    pub const fn tree(&self) -> &LinearTree<usize, D> {
        &self.tree
    }

    #[must_use]
    pub fn agent(&self, id: usize) -> Option<&Agent<D>> {
        self.agents.get(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Adds an agent at `position` and registers it.
    ///
    /// # Errors
    /// When the box is invalid or leaves the domain; the agent is not kept.
    pub fn spawn(
        &mut self,
        position: [f32; D],
        velocity: [f32; D],
        half_extents: [f32; D],
    ) -> Result<usize, TreeError> {
        let id = self.next_id;
        let agent = Agent {
            position,
            velocity,
            half_extents,
            node: self.tree.insert(id),
        };
        let placed = agent
            .bounds()
            .and_then(|bounds| self.tree.register(agent.node, &bounds));
        if let Err(err) = placed {
            if let Err(release_err) = self.tree.release(agent.node) {
                tracing::debug!(agent = id, %release_err, "unplaced node already gone");
            }
            return Err(err);
        }
        self.next_id += 1;
        self.agents.insert(id, agent);
        Ok(id)
    }

    /// Adds an agent with random size, position and velocity.
    ///
    /// # Errors
    /// See [`Self::spawn`].
    pub fn spawn_random(&mut self, params: &SpawnParams) -> Result<usize, TreeError> {
        let (dmin, dmax) = (self.domain.min(), self.domain.max());
        let mut position = [0.0; D];
        let mut velocity = [0.0; D];
        let mut half_extents = [0.0; D];
        for axis in 0..D {
            let span = dmax[axis] - dmin[axis];
            let half = (params.min_half_extent
                + self.rng.f32() * (params.max_half_extent - params.min_half_extent))
                .min(0.5 * span);
            half_extents[axis] = half;
            position[axis] = dmin[axis] + half + self.rng.f32() * (span - 2.0 * half);
            velocity[axis] = (self.rng.f32() * 2.0 - 1.0) * params.max_speed;
        }
        self.spawn(position, velocity, half_extents)
    }

    /// Removes an agent and frees its node.
    pub fn despawn(&mut self, id: usize) -> Option<Agent<D>> {
        let agent = self.agents.remove(&id)?;
        if let Err(err) = self.tree.release(agent.node) {
            tracing::warn!(agent = id, %err, "despawned agent had a stale node");
        }
        Some(agent)
    }

    /// Moves every agent by `dt`, refreshes the tree and counts contacts.
    pub fn step(&mut self, dt: f32) -> StepReport {
        let mut report = StepReport::default();
        for (&id, agent) in &mut self.agents {
            agent.advance(dt, &self.domain);
            let placed = agent
                .bounds()
                .and_then(|bounds| self.tree.register(agent.node, &bounds));
            match placed {
                Ok(_) => report.moved += 1,
                Err(TreeError::AlreadyInCell { .. }) => {}
                Err(err) => {
                    tracing::warn!(agent = id, %err, "agent left the tree");
                    match self.tree.remove(agent.node) {
                        Ok(()) | Err(TreeError::NotRegistered) => {}
                        Err(remove_err) => {
                            tracing::debug!(agent = id, %remove_err, "could not detach agent");
                        }
                    }
                    report.rejected += 1;
                }
            }
        }

        report.candidates = self.tree.collision_pairs_into(&mut self.pairs);
        report.contacts = self.count_contacts();
        report
    }

    /// Candidate pairs whose boxes overlap, as agent ids.
    #[must_use]
    pub fn contacts(&self) -> Vec<(usize, usize)> {
        let mut flat = Vec::new();
        self.tree.collision_pairs_into(&mut flat);
        lintree::CollisionPairs::new(&flat)
            .filter(|(a, b)| self.overlapping(**a, **b))
            .map(|(a, b)| (*a, *b))
            .collect()
    }

    #[must_use]
    pub fn stats(&self) -> TreeStats {
        self.tree.stats()
    }

    fn count_contacts(&self) -> usize {
        lintree::CollisionPairs::new(&self.pairs)
            .filter(|(a, b)| self.overlapping(**a, **b))
            .count()
    }

    fn overlapping(&self, a: usize, b: usize) -> bool {
        match (self.agents.get(&a), self.agents.get(&b)) {
            (Some(x), Some(y)) => match (x.bounds(), y.bounds()) {
                (Ok(p), Ok(q)) => p.overlaps(&q),
                _ => false,
            },
            _ => false,
        }
    }
}
