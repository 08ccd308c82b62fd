//! Named scenarios: a graph config, a walker config and per-step
//! probabilities tuned to produce a recognizable kind of network.
//!
//! | Name | Strategy | Walker bias | Teleport |
//! |------|----------|-------------|----------|
//! | `stochastic` | random | weight | component |
//! | `social` | aging | activity, adaptive | uniform, 2 hops |
//! | `internet` | preferential | degree, adaptive | distant |
//! | `basic` | random | weight | uniform |

use serde::{Deserialize, Serialize};

use crate::config::{GraphConfig, UpdateParams, WalkerConfig};
use crate::walker::{BiasType, TeleportStrategy};
use crate::{Error, Result};

pub const NAMES: [&str; 4] = ["stochastic", "social", "internet", "basic"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub graph: GraphConfig,
    pub walker: WalkerConfig,
    pub params: UpdateParams,
    /// Suggested run length in ticks.
    pub steps: usize,
}

impl Scenario {
    /// Seed both the graph and the walker RNG.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.graph.seed = Some(seed);
        self.walker.seed = Some(seed.wrapping_add(1));
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.graph.validate()?;
        self.walker.validate()?;
        self.params.validate()
    }
}

/// Look a scenario up by name (case-insensitive).
pub fn by_name(name: &str) -> Result<Scenario> {
    match name.trim().to_ascii_lowercase().as_str() {
        "stochastic" => Ok(stochastic()),
        "social" => Ok(social()),
        "internet" => Ok(internet()),
        "basic" => Ok(basic()),
        _ => Err(Error::UnknownPreset(name.to_string())),
    }
}

/// Sparse random network with fast-fading edges; the walker stays in its component.
pub fn stochastic() -> Scenario {
    Scenario {
        name: "stochastic".into(),
        graph: GraphConfig {
            strategy: "random".into(),
            initial_nodes: 30,
            max_degree: 8,
            min_degree: 1,
            target_components: 1,
            min_component_size: 1,
            edge_aging_factor: 0.92,
            node_aging_factor: 0.99,
            ..GraphConfig::default()
        },
        walker: WalkerConfig {
            bias_type: BiasType::Weight,
            teleport_probability: 0.1,
            stay_probability: 0.1,
            exploration_factor: 1.0,
            adaptive_bias: false,
            decay_factor: 0.9,
            max_teleport_distance: 1,
            min_weight: 0.1,
            teleport_strategy: TeleportStrategy::Component,
            ..WalkerConfig::default()
        },
        params: UpdateParams {
            node_add_prob: 0.02,
            node_remove_prob: 0.005,
            edge_add_prob: 0.4,
            edge_remove_prob: 0.2,
            triadic_prob: 0.3,
        },
        steps: 800,
    }
}

/// Four communities of short-lived relationships and heavy triadic closure.
pub fn social() -> Scenario {
    Scenario {
        name: "social".into(),
        graph: GraphConfig {
            strategy: "aging".into(),
            initial_nodes: 40,
            max_degree: 15,
            min_degree: 1,
            target_components: 4,
            min_component_size: 2,
            edge_aging_factor: 0.85,
            node_aging_factor: 0.95,
            decay_factor: 0.9,
            ..GraphConfig::default()
        },
        walker: WalkerConfig {
            bias_type: BiasType::Activity,
            teleport_probability: 0.2,
            stay_probability: 0.05,
            exploration_factor: 0.8,
            adaptive_bias: true,
            decay_factor: 0.85,
            max_teleport_distance: 2,
            min_weight: 0.05,
            teleport_strategy: TeleportStrategy::Uniform,
            ..WalkerConfig::default()
        },
        params: UpdateParams {
            node_add_prob: 0.04,
            node_remove_prob: 0.003,
            edge_add_prob: 0.3,
            edge_remove_prob: 0.15,
            triadic_prob: 0.6,
        },
        steps: 800,
    }
}

/// Scale-free islands crawled by a hub-seeking walker that jumps between them.
pub fn internet() -> Scenario {
    Scenario {
        name: "internet".into(),
        graph: GraphConfig {
            strategy: "preferential".into(),
            initial_nodes: 30,
            max_degree: 10,
            min_degree: 1,
            target_components: 3,
            min_component_size: 2,
            edge_aging_factor: 0.95,
            node_aging_factor: 0.98,
            preferential_exponent: 1.1,
            ..GraphConfig::default()
        },
        walker: WalkerConfig {
            bias_type: BiasType::Degree,
            teleport_probability: 0.1,
            stay_probability: 0.05,
            exploration_factor: 1.1,
            adaptive_bias: true,
            decay_factor: 0.9,
            max_teleport_distance: 2,
            min_weight: 0.02,
            teleport_strategy: TeleportStrategy::Distant,
            ..WalkerConfig::default()
        },
        params: UpdateParams {
            node_add_prob: 0.02,
            node_remove_prob: 0.003,
            edge_add_prob: 0.2,
            edge_remove_prob: 0.08,
            triadic_prob: 0.4,
        },
        steps: 800,
    }
}

/// Small, fast-growing default graph.
pub fn basic() -> Scenario {
    Scenario {
        name: "basic".into(),
        graph: GraphConfig { initial_nodes: 5, ..GraphConfig::default() },
        walker: WalkerConfig {
            bias_type: BiasType::Weight,
            teleport_probability: 0.1,
            exploration_factor: 1.5,
            ..WalkerConfig::default()
        },
        params: UpdateParams {
            node_add_prob: 0.3,
            node_remove_prob: 0.05,
            edge_add_prob: 0.4,
            edge_remove_prob: 0.1,
            ..UpdateParams::default()
        },
        steps: 100,
    }
}
