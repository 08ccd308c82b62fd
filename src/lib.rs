//! # dynamic-walker: Evolving Graphs and Biased Random Walks
//!
//! An in-memory undirected graph whose topology mutates over discrete time
//! steps, and a stochastic walker that traverses it while it changes.
//!
//! ## Design Principles
//!
//! 1. **Engine owns structure**: `DynamicGraph` alone mutates nodes, edges and
//!    the derived indices (component cache, activity heap)
//! 2. **Walker only reads**: `BiasedWalker` holds a [`SharedGraph`] and
//!    re-validates its position every step
//! 3. **Fail fast on config, never on data**: unknown names and bad values
//!    are errors at construction; empty graphs and isolated nodes have
//!    defined fallbacks
//! 4. **Seedable**: every random choice goes through a per-instance `SmallRng`
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use dynamic_walker::{BiasedWalker, DynamicGraph, GraphConfig, UpdateParams, WalkerConfig};
//!
//! # fn example() -> dynamic_walker::Result<()> {
//! let graph = DynamicGraph::new(GraphConfig::default().with_strategy("preferential").with_seed(7))?
//!     .into_shared();
//! let mut walker = BiasedWalker::new(Arc::clone(&graph), WalkerConfig::default().with_seed(7))?;
//!
//! let params = UpdateParams::default();
//! for _ in 0..100 {
//!     graph.write().update(&params);
//!     walker.step();
//! }
//!
//! let total: f64 = walker.get_visit_distribution().values().sum();
//! assert!((total - 1.0).abs() < 1e-9);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## Attachment Strategies
//!
//! | Strategy | Newborn links to | Triadic closure seeds on |
//! |----------|------------------|--------------------------|
//! | `random` | uniform sample | a uniform edge |
//! | `preferential` | high-degree nodes | bridging edges |
//! | `aging` | young, active nodes | the freshest active edge |

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod config;
pub mod graph;
pub mod strategy;
pub mod walker;
pub mod sampling;
pub mod export;
pub mod presets;
pub mod simulation;

// ============================================================================
// Re-exports: Model (the DTOs)
// ============================================================================

pub use model::{Edge, GraphSnapshot, NodeData, NodeId, NodeSnapshot, WalkerSnapshot};

// ============================================================================
// Re-exports: Engine
// ============================================================================

pub use config::{GraphConfig, UpdateParams, WalkerConfig};
pub use graph::{ComponentRepair, DegreeRepair, DynamicGraph, Partition, SharedGraph, UpdateReport};
pub use strategy::{AttachmentStrategy, StrategyKind};

// ============================================================================
// Re-exports: Walker
// ============================================================================

pub use walker::{BiasType, BiasedWalker, CustomBias, StartHeuristic, TeleportStrategy, Transition};

// ============================================================================
// Re-exports: Drivers
// ============================================================================

pub use presets::Scenario;
pub use simulation::{Simulation, SimulationStats, TickReport};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unknown attachment strategy: {0}")]
    UnknownStrategy(String),

    #[error("Unknown bias type: {0}")]
    UnknownBiasType(String),

    #[error("Unknown teleport strategy: {0}")]
    UnknownTeleportStrategy(String),

    #[error("Unknown start heuristic: {0}")]
    UnknownStartHeuristic(String),

    #[error("Unknown preset: {0}")]
    UnknownPreset(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
