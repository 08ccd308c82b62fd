//! # Graph Model
//!
//! Plain DTOs shared by the engine, the walker and any external renderer.
//!
//! Design rule: this module is pure data. No RNG, no caches, no locking.

pub mod node;
pub mod edge;
pub mod snapshot;

pub use node::{NodeData, NodeId};
pub use edge::Edge;
pub use snapshot::{GraphSnapshot, NodeSnapshot, WalkerSnapshot};
