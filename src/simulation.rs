//! Tick driver: one graph, one walker, alternating `update` and `step`.
//!
//! This is what a renderer loop does minus the drawing: take the write lock,
//! evolve the graph, release it, then let the walker take its read lock.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::config::UpdateParams;
use crate::graph::{DynamicGraph, SharedGraph, UpdateReport};
use crate::presets::Scenario;
use crate::walker::{BiasedWalker, Transition};
use crate::Result;

/// What one [`Simulation::tick`] did.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TickReport {
    pub update: UpdateReport,
    pub transition: Transition,
}

/// Running totals over every tick so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SimulationStats {
    pub ticks: u64,
    pub nodes_added: usize,
    pub nodes_removed: usize,
    pub edges_added: usize,
    pub edges_removed: usize,
    pub walker_moves: u64,
    pub teleports: u64,
    pub recoveries: u64,
}

impl SimulationStats {
    fn record(&mut self, tick: &TickReport) {
        self.ticks += 1;
        self.nodes_added += usize::from(tick.update.node_added.is_some());
        self.nodes_removed += usize::from(tick.update.node_removed.is_some());
        self.edges_added += tick.update.edges_added;
        self.edges_removed += tick.update.edges_removed;
        self.walker_moves += u64::from(tick.transition.moved());
        match tick.transition {
            Transition::Teleported { .. } => self.teleports += 1,
            Transition::Recovered { .. } => self.recoveries += 1,
            _ => {}
        }
    }
}

impl std::fmt::Display for SimulationStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SimulationStats {{ ticks: {}, nodes: +{}/-{}, edges: +{}/-{}, moves: {}, teleports: {}, recoveries: {} }}",
            self.ticks,
            self.nodes_added,
            self.nodes_removed,
            self.edges_added,
            self.edges_removed,
            self.walker_moves,
            self.teleports,
            self.recoveries,
        )
    }
}

pub struct Simulation {
    graph: SharedGraph,
    walker: BiasedWalker,
    params: UpdateParams,
    stats: SimulationStats,
}

impl Simulation {
    /// Build the graph and walker a scenario describes.
    pub fn new(scenario: Scenario) -> Result<Self> {
        scenario.params.validate()?;
        let graph = DynamicGraph::new(scenario.graph)?.into_shared();
        let walker = BiasedWalker::new(Arc::clone(&graph), scenario.walker)?;
        debug!(scenario = %scenario.name, "simulation ready");
        Ok(Self { graph, walker, params: scenario.params, stats: SimulationStats::default() })
    }

    /// Drive an existing graph/walker pair.
    pub fn from_parts(graph: SharedGraph, walker: BiasedWalker, params: UpdateParams) -> Result<Self> {
        params.validate()?;
        Ok(Self { graph, walker, params, stats: SimulationStats::default() })
    }

    pub fn graph(&self) -> &SharedGraph {
        &self.graph
    }

    pub fn walker(&self) -> &BiasedWalker {
        &self.walker
    }

    pub fn walker_mut(&mut self) -> &mut BiasedWalker {
        &mut self.walker
    }

    pub fn params(&self) -> &UpdateParams {
        &self.params
    }

    pub fn stats(&self) -> SimulationStats {
        self.stats
    }

    pub fn tick(&mut self) -> TickReport {
        let update = self.graph.write().update(&self.params);
        let transition = self.walker.step();
        let report = TickReport { update, transition };
        self.stats.record(&report);
        report
    }

    /// Run `ticks` ticks and return the totals so far.
    pub fn run(&mut self, ticks: usize) -> SimulationStats {
        for _ in 0..ticks {
            self.tick();
        }
        debug!(stats = %self.stats, "simulation run finished");
        self.stats
    }
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("graph", &*self.graph.read())
            .field("walker", &self.walker)
            .field("stats", &self.stats)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presets;

    #[test]
    fn test_run_counts_ticks() {
        let mut sim = Simulation::new(presets::basic().with_seed(3)).unwrap();
        let stats = sim.run(25);
        assert_eq!(stats.ticks, 25);
        assert_eq!(sim.graph().read().time_step(), 25);
        assert!(stats.nodes_added > 0);
    }

    #[test]
    fn test_tick_reports_walker_position() {
        let mut sim = Simulation::new(presets::stochastic().with_seed(5)).unwrap();
        let report = sim.tick();
        let position = report.transition.position();
        assert!(position.is_some());
        assert_eq!(sim.walker().current(), position);
    }

    #[test]
    fn test_stats_display() {
        let stats = SimulationStats { ticks: 2, edges_added: 3, ..Default::default() };
        assert_eq!(
            stats.to_string(),
            "SimulationStats { ticks: 2, nodes: +0/-0, edges: +3/-0, moves: 0, teleports: 0, recoveries: 0 }"
        );
    }
}
