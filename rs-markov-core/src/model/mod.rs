//! Top-level module for the Markov chain model.
//!
//! This module provides:
//! - The consumer-supplied capability trait (`StateCapabilities`)
//! - Individual states and their transition tables (`StateNode`)
//! - The deduplicated state store (`StateRegistry`)
//! - The training and query entry point (`Chain`)
//! - Walk configuration (`WalkInput`) and the random walk engine (`Walker`)

/// Operations a consumer supplies for its own state type.
pub mod capabilities;

/// A single state and its outgoing, frequency-weighted transitions.
///
/// Supports transition counting and weighted random sampling.
pub mod state;

/// Insertion-ordered, deduplicated collection of states.
pub mod registry;

/// Owner of the registry and sole entry point for training and querying.
pub mod chain;

/// Walk configuration: length bound and start strategy.
pub mod walk_input;

/// Random walk engine driving sequence generation from a seeded generator.
pub mod walker;
