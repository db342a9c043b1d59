//! Generic Markov chain library.
//!
//! This crate provides a frequency-weighted Markov chain over any
//! consumer-defined state type, including:
//! - Deduplicated, insertion-ordered state storage
//! - Per-state transition tables counting observed successors
//! - Seeded, reproducible random walks over the learned chain
//!
//! The state type is opaque to the chain: everything the chain needs to know
//! about it goes through a single [`StateCapabilities`] implementation.

/// Chain model: capabilities, nodes, registry, chain and random walks.
pub mod model;

/// Error type shared by every chain operation.
pub mod error;

pub use error::{ChainError, Result};
pub use model::capabilities::StateCapabilities;
pub use model::chain::{Chain, ChainStats};
pub use model::registry::StateRegistry;
pub use model::state::{NodeId, StateNode, Transition};
pub use model::walk_input::{StartState, WalkInput};
pub use model::walker::Walker;
