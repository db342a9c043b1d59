use std::cmp::Ordering;

use log::{trace, warn};

use super::capabilities::StateCapabilities;
use super::state::{NodeId, StateNode};
use crate::error::{ChainError, Result};

/// Insertion-ordered, deduplicated store of `StateNode`s.
///
/// The registry is the "database" of a chain: every distinct state seen during
/// training lives here exactly once, in the order it was first observed.
///
/// # Invariants
/// - No two nodes compare equal under the capability set's `compare`
/// - `last` always refers to the most recently appended node
/// - A `NodeId` handed out by this registry stays valid until the registry is
///   drained
#[derive(Clone, Debug)]
pub struct StateRegistry<S> {
	nodes: Vec<StateNode<S>>,
	last: Option<NodeId>,
}

impl<S> Default for StateRegistry<S> {
	fn default() -> Self {
		Self { nodes: Vec::new(), last: None }
	}
}

impl<S> StateRegistry<S> {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// The most recently appended node.
	pub fn last(&self) -> Option<NodeId> {
		self.last
	}

	pub fn get(&self, id: NodeId) -> Option<&StateNode<S>> {
		self.nodes.get(id.index())
	}

	pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut StateNode<S>> {
		self.nodes.get_mut(id.index())
	}

	/// Iterates over all nodes in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = (NodeId, &StateNode<S>)> {
		self.nodes
			.iter()
			.enumerate()
			.map(|(index, node)| (NodeId::new(index), node))
	}

	/// Finds the node holding a value equal to `value`.
	///
	/// Linear scan using the capability set's `compare`.
	pub fn find_by_value<C>(&self, capabilities: &C, value: &S) -> Option<NodeId>
	where
		C: StateCapabilities<State = S> + ?Sized,
	{
		self.nodes
			.iter()
			.position(|node| capabilities.compare(node.value(), value) == Ordering::Equal)
			.map(NodeId::new)
	}

	/// Returns the node equal to `value`, registering a copy of it if needed.
	///
	/// A new node starts with an empty transition table and is appended after
	/// every existing node.
	///
	/// # Errors
	/// Returns `AllocationFailure` if the value cannot be copied or the node
	/// cannot be stored. The registry is left untouched on failure.
	pub fn add_or_get<C>(&mut self, capabilities: &C, value: &S) -> Result<NodeId>
	where
		C: StateCapabilities<State = S> + ?Sized,
	{
		if let Some(id) = self.find_by_value(capabilities, value) {
			return Ok(id);
		}

		// Reserve first so a successful copy is never left without a slot
		self.nodes.try_reserve(1)?;
		let copy = match capabilities.copy(value) {
			Some(copy) => copy,
			None => {
				warn!("failed to copy state #{}", self.nodes.len());
				return Err(ChainError::AllocationFailure("failed to copy state value".to_owned()));
			}
		};

		let id = NodeId::new(self.nodes.len());
		self.nodes.push(StateNode::new(copy));
		self.last = Some(id);
		trace!("registered state #{}", id.index());
		Ok(id)
	}

	/// Removes every node, yielding their values in insertion order.
	pub(crate) fn drain_values(&mut self) -> impl Iterator<Item = S> + '_ {
		self.last = None;
		self.nodes.drain(..).map(StateNode::into_value)
	}
}
