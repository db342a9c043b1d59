use std::fmt;

use log::{debug, warn};
use serde::Serialize;

use super::capabilities::StateCapabilities;
use super::registry::StateRegistry;
use super::state::{NodeId, StateNode};
use crate::error::{ChainError, Result};

/// Summary counters over a trained chain.
#[derive(Serialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChainStats {
	/// Number of distinct states.
	pub states: usize,
	/// Number of distinct transitions, summed over all states.
	pub transitions: usize,
	/// Number of observed transitions, counting repeats.
	pub observations: usize,
	/// Number of states that end a sequence.
	pub terminal_states: usize,
}

/// A Markov chain over the state type of a `StateCapabilities` implementation.
///
/// The chain owns a `StateRegistry` holding its own copy of every distinct
/// state and borrows the capability set for its whole lifetime.
///
/// # Responsibilities
/// - Deduplicate trained values through the registry
/// - Count transitions between consecutive values of a training session
/// - Answer lookups and expose nodes to the random walk engine
/// - Release every stored value exactly once on teardown
///
/// # Sessions
/// Consecutive calls to `train` form a session; each value is linked from the
/// value trained just before it. A session ends after a terminal value, when
/// `end_session` is called, or when `train` is called with
/// `session_start = true`. No transition ever crosses a session boundary.
pub struct Chain<'c, C: StateCapabilities> {
	capabilities: &'c C,
	registry: StateRegistry<C::State>,
	/// Last node trained in the current session.
	previous: Option<NodeId>,
	torn_down: bool,
}

impl<'c, C: StateCapabilities> Chain<'c, C> {
	/// Creates an empty chain bound to `capabilities`.
	pub fn new(capabilities: &'c C) -> Self {
		Self {
			capabilities,
			registry: StateRegistry::new(),
			previous: None,
			torn_down: false,
		}
	}

	pub fn capabilities(&self) -> &'c C {
		self.capabilities
	}

	pub fn registry(&self) -> &StateRegistry<C::State> {
		&self.registry
	}

	/// Number of distinct states.
	pub fn len(&self) -> usize {
		self.registry.len()
	}

	pub fn is_empty(&self) -> bool {
		self.registry.is_empty()
	}

	pub fn is_torn_down(&self) -> bool {
		self.torn_down
	}

	pub fn node(&self, id: NodeId) -> Option<&StateNode<C::State>> {
		self.registry.get(id)
	}

	pub fn value(&self, id: NodeId) -> Option<&C::State> {
		self.registry.get(id).map(StateNode::value)
	}

	/// First registered state, if any.
	pub fn first(&self) -> Option<NodeId> {
		self.registry.iter().next().map(|(id, _)| id)
	}

	/// Returns `true` if `id` exists and holds a terminal state.
	pub fn is_terminal(&self, id: NodeId) -> bool {
		self.value(id)
			.is_some_and(|value| self.capabilities.is_terminal(value))
	}

	/// Returns `true` if at least one non-terminal state exists, i.e. a random
	/// walk has somewhere to start.
	pub fn has_start_state(&self) -> bool {
		self.registry
			.iter()
			.any(|(_, node)| !self.capabilities.is_terminal(node.value()))
	}

	/// Finds the node holding `value`. A miss is a normal result.
	pub fn find(&self, value: &C::State) -> Option<NodeId> {
		self.registry.find_by_value(self.capabilities, value)
	}

	/// Finds the node holding `value`.
	///
	/// # Errors
	/// Returns `NotFound` if the state was never registered.
	pub fn lookup(&self, value: &C::State) -> Result<NodeId> {
		self.find(value).ok_or_else(|| {
			let rendered = self.render_value(value).unwrap_or_else(|e| {
				warn!("failed to render missing state: {e}");
				"<unrenderable state>".to_owned()
			});
			ChainError::NotFound(rendered)
		})
	}

	/// Registers `value` if unseen and returns its node.
	///
	/// # Errors
	/// - `AllocationFailure` if the value cannot be copied or stored
	/// - `InvalidArgument` if the chain has been torn down
	pub fn register(&mut self, value: &C::State) -> Result<NodeId> {
		self.ensure_alive()?;
		self.registry.add_or_get(self.capabilities, value)
	}

	/// Records one observed transition `from -> to`.
	///
	/// # Errors
	/// - `InvalidArgument` if either node does not belong to this chain
	/// - `AllocationFailure` if a new transition cannot be stored
	pub fn link(&mut self, from: NodeId, to: NodeId) -> Result<()> {
		self.ensure_alive()?;
		if self.registry.get(to).is_none() {
			return Err(ChainError::InvalidArgument(format!("unknown target node {}", to.index())));
		}
		match self.registry.get_mut(from) {
			Some(node) => node.add_transition(to),
			None => Err(ChainError::InvalidArgument(format!("unknown source node {}", from.index()))),
		}
	}

	/// Trains the chain with the next observed value.
	///
	/// Registers `value` and, unless `session_start` is set or the session was
	/// just reset, counts a transition from the previously trained value.
	///
	/// The previous node reserves room for the new transition before `value`
	/// is registered, so a failed training step never leaves a new node behind.
	///
	/// # Errors
	/// Propagates `register` and `link` failures. On failure the session keeps
	/// its previous value.
	pub fn train(&mut self, value: &C::State, session_start: bool) -> Result<NodeId> {
		self.ensure_alive()?;
		let previous = if session_start { None } else { self.previous };
		if let Some(node) = previous.and_then(|id| self.registry.get_mut(id)) {
			node.reserve_transition()?;
		}

		let current = self.register(value)?;
		if let Some(previous) = previous {
			self.link(previous, current)?;
		}

		if self.capabilities.is_terminal(value) {
			debug!("terminal state #{} ends the session", current.index());
			self.previous = None;
		} else {
			self.previous = Some(current);
		}

		Ok(current)
	}

	/// Forces the next trained value to start a new session.
	pub fn end_session(&mut self) {
		self.previous = None;
	}

	/// Computes summary counters.
	pub fn stats(&self) -> ChainStats {
		self.registry.iter().fold(ChainStats::default(), |mut stats, (_, node)| {
			stats.states += 1;
			stats.transitions += node.distinct_transitions();
			stats.observations += node.total_weight();
			if self.capabilities.is_terminal(node.value()) {
				stats.terminal_states += 1;
			}
			stats
		})
	}

	/// Renders a single value through the capability set.
	///
	/// # Errors
	/// Returns the consumer's `render` error.
	pub fn render_value(&self, value: &C::State) -> std::result::Result<String, fmt::Error> {
		let mut out = String::new();
		self.capabilities.render(value, &mut out)?;
		Ok(out)
	}

	/// Renders each value of `sequence` in order into `out`.
	pub fn render_sequence(&self, sequence: &[&C::State], out: &mut dyn fmt::Write) -> fmt::Result {
		for value in sequence {
			self.capabilities.render(value, out)?;
		}
		Ok(())
	}

	/// Releases every stored value through the capability set and empties the
	/// chain. Calling it again is a no-op.
	pub fn destroy(&mut self) {
		if self.torn_down {
			return;
		}

		let capabilities = self.capabilities;
		let mut released = 0usize;
		for value in self.registry.drain_values() {
			capabilities.release(value);
			released += 1;
		}
		self.previous = None;
		self.torn_down = true;
		debug!("chain torn down, {released} states released");
	}

	fn ensure_alive(&self) -> Result<()> {
		if self.torn_down {
			return Err(ChainError::InvalidArgument("chain has been torn down".to_owned()));
		}
		Ok(())
	}
}

impl<C: StateCapabilities> Drop for Chain<'_, C> {
	fn drop(&mut self) {
		self.destroy();
	}
}
