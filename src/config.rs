//! Configuration records for the graph engine, the per-step update and the walker.
//!
//! Every record deserializes from JSON with per-field defaults, so a config
//! file only needs to name the keys it changes:
//!
//! ```rust
//! use dynamic_walker::GraphConfig;
//!
//! let cfg = GraphConfig::from_json(r#"{ "strategy": "aging", "max_degree": 8 }"#).unwrap();
//! assert_eq!(cfg.max_degree, 8);
//! assert_eq!(cfg.min_degree, 2);
//! ```

use serde::{Deserialize, Serialize};

use crate::model::NodeId;
use crate::walker::{BiasType, StartHeuristic, TeleportStrategy};
use crate::{Error, Result};

// ============================================================================
// GraphConfig
// ============================================================================

/// Construction-time configuration for a [`DynamicGraph`](crate::DynamicGraph).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Attachment strategy name: `random`, `preferential` or `aging`.
    pub strategy: String,
    pub initial_nodes: usize,
    pub max_degree: usize,
    pub min_degree: usize,
    pub target_components: usize,
    pub min_component_size: usize,
    pub node_aging_factor: f64,
    pub edge_aging_factor: f64,
    pub min_edge_weight: f64,
    /// Lower clamp for node activity after aging.
    pub activity_floor: f64,
    pub preferential_exponent: f64,
    /// Age decay used by the aging strategy.
    pub decay_factor: f64,
    /// RNG seed. `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            strategy: "random".into(),
            initial_nodes: 5,
            max_degree: 15,
            min_degree: 2,
            target_components: 1,
            min_component_size: 2,
            node_aging_factor: 0.99,
            edge_aging_factor: 0.97,
            min_edge_weight: 0.1,
            activity_floor: 0.1,
            preferential_exponent: 1.0,
            decay_factor: 0.95,
            seed: None,
        }
    }
}

impl GraphConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn with_strategy(mut self, name: impl Into<String>) -> Self {
        self.strategy = name.into();
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_initial_nodes(mut self, n: usize) -> Self {
        self.initial_nodes = n;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_degree == 0 {
            return Err(Error::InvalidConfig("max_degree must be at least 1".into()));
        }
        if self.min_degree > self.max_degree {
            return Err(Error::InvalidConfig(format!(
                "min_degree ({}) exceeds max_degree ({})",
                self.min_degree, self.max_degree
            )));
        }
        if self.target_components == 0 {
            return Err(Error::InvalidConfig("target_components must be at least 1".into()));
        }
        if self.min_component_size == 0 {
            return Err(Error::InvalidConfig("min_component_size must be at least 1".into()));
        }
        check_factor("node_aging_factor", self.node_aging_factor)?;
        check_factor("edge_aging_factor", self.edge_aging_factor)?;
        check_factor("decay_factor", self.decay_factor)?;
        check_non_negative("min_edge_weight", self.min_edge_weight)?;
        check_non_negative("activity_floor", self.activity_floor)?;
        check_non_negative("preferential_exponent", self.preferential_exponent)?;
        Ok(())
    }
}

// ============================================================================
// UpdateParams
// ============================================================================

/// Per-step probabilities passed to [`DynamicGraph::update`](crate::DynamicGraph::update).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateParams {
    pub node_add_prob: f64,
    pub node_remove_prob: f64,
    /// Accepted for compatibility; edge growth is strategy-driven.
    pub edge_add_prob: f64,
    pub edge_remove_prob: f64,
    pub triadic_prob: f64,
}

impl Default for UpdateParams {
    fn default() -> Self {
        Self {
            node_add_prob: 0.02,
            node_remove_prob: 0.005,
            edge_add_prob: 0.0,
            edge_remove_prob: 0.1,
            triadic_prob: 0.3,
        }
    }
}

impl UpdateParams {
    /// All probabilities zero: aging and repair only.
    pub fn quiescent() -> Self {
        Self {
            node_add_prob: 0.0,
            node_remove_prob: 0.0,
            edge_add_prob: 0.0,
            edge_remove_prob: 0.0,
            triadic_prob: 0.0,
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let params: Self = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<()> {
        check_probability("node_add_prob", self.node_add_prob)?;
        check_probability("node_remove_prob", self.node_remove_prob)?;
        check_probability("edge_add_prob", self.edge_add_prob)?;
        check_probability("edge_remove_prob", self.edge_remove_prob)?;
        check_probability("triadic_prob", self.triadic_prob)?;
        Ok(())
    }
}

// ============================================================================
// WalkerConfig
// ============================================================================

/// Construction-time configuration for a [`BiasedWalker`](crate::BiasedWalker).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkerConfig {
    pub bias_type: BiasType,
    /// Capacity of the recent-path window.
    pub max_history: usize,
    pub start_node: Option<NodeId>,
    pub start_heuristic: StartHeuristic,
    pub stay_probability: f64,
    pub teleport_probability: f64,
    /// Exponent applied to neighbor weights. `>1` sharpens, `<1` flattens.
    pub exploration_factor: f64,
    /// Per-visit decay applied when `adaptive_bias` is on.
    pub decay_factor: f64,
    pub adaptive_bias: bool,
    pub min_weight: f64,
    /// Hop cutoff for distance-limited teleports. `0` means unlimited.
    pub max_teleport_distance: usize,
    pub teleport_strategy: TeleportStrategy,
    pub seed: Option<u64>,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            bias_type: BiasType::Weight,
            max_history: 100,
            start_node: None,
            start_heuristic: StartHeuristic::Random,
            stay_probability: 0.0,
            teleport_probability: 0.0,
            exploration_factor: 1.0,
            decay_factor: 0.99,
            adaptive_bias: false,
            min_weight: 0.1,
            max_teleport_distance: 0,
            teleport_strategy: TeleportStrategy::Uniform,
            seed: None,
        }
    }
}

impl WalkerConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_history == 0 {
            return Err(Error::InvalidConfig("max_history must be at least 1".into()));
        }
        check_probability("stay_probability", self.stay_probability)?;
        check_probability("teleport_probability", self.teleport_probability)?;
        check_factor("decay_factor", self.decay_factor)?;
        if !(self.exploration_factor > 0.0 && self.exploration_factor.is_finite()) {
            return Err(Error::InvalidConfig(format!(
                "exploration_factor must be positive, got {}",
                self.exploration_factor
            )));
        }
        if !(self.min_weight > 0.0 && self.min_weight.is_finite()) {
            return Err(Error::InvalidConfig(format!(
                "min_weight must be positive, got {}",
                self.min_weight
            )));
        }
        Ok(())
    }
}

// ============================================================================
// Validation helpers
// ============================================================================

fn check_probability(name: &str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(Error::InvalidConfig(format!("{name} must lie in [0, 1], got {value}")))
    }
}

fn check_factor(name: &str, value: f64) -> Result<()> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(Error::InvalidConfig(format!("{name} must lie in (0, 1], got {value}")))
    }
}

fn check_non_negative(name: &str, value: f64) -> Result<()> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(Error::InvalidConfig(format!("{name} must be a non-negative number, got {value}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        GraphConfig::default().validate().unwrap();
        UpdateParams::default().validate().unwrap();
        WalkerConfig::default().validate().unwrap();
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let params = UpdateParams::from_json(r#"{ "node_add_prob": 0.5 }"#).unwrap();
        assert_eq!(params.node_add_prob, 0.5);
        assert_eq!(params.triadic_prob, 0.3);
    }

    #[test]
    fn test_walker_json_enums() {
        let cfg = WalkerConfig::from_json(
            r#"{ "bias_type": "activity", "teleport_strategy": "distant", "start_heuristic": "max_degree" }"#,
        )
        .unwrap();
        assert_eq!(cfg.bias_type, BiasType::Activity);
        assert_eq!(cfg.teleport_strategy, TeleportStrategy::Distant);
        assert_eq!(cfg.start_heuristic, StartHeuristic::MaxDegree);
    }

    #[test]
    fn test_unknown_bias_in_json_is_rejected() {
        let err = WalkerConfig::from_json(r#"{ "bias_type": "gravity" }"#).unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_min_degree_above_max_rejected() {
        let cfg = GraphConfig { min_degree: 5, max_degree: 3, ..Default::default() };
        assert!(matches!(cfg.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_probability_out_of_range_rejected() {
        let params = UpdateParams { triadic_prob: 1.5, ..Default::default() };
        assert!(params.validate().is_err());
    }
}
