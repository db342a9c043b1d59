use log::trace;
use rand::Rng;

use serde::Serialize;

use crate::error::Result;

/// Stable reference to a node inside one `StateRegistry`.
///
/// Nodes are never removed individually, so an id stays valid for the
/// lifetime of the registry that issued it.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
	pub(crate) fn new(index: usize) -> Self {
		Self(index)
	}

	/// Position of the node in registry insertion order.
	pub fn index(&self) -> usize {
		self.0
	}
}

/// A weighted directed edge toward another node of the same registry.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
	/// Target node (non-owning).
	target: NodeId,
	/// How many times this transition was observed. Always >= 1.
	occurrences: usize,
}

impl Transition {
	pub fn target(&self) -> NodeId {
		self.target
	}

	pub fn occurrences(&self) -> usize {
		self.occurrences
	}
}

/// Represents one state of a Markov chain.
///
/// A `StateNode` owns its copy of the state value and stores every observed
/// transition from this state to a successor.
///
/// Conceptually, this is a node in a Markov chain where outgoing edges
/// are weighted by their number of observations.
///
/// ## Responsibilities:
/// - Accumulate transition occurrences during training
/// - Pick the next node using weighted random sampling
///
/// ## Invariants
/// - Each transition occurrence count is strictly positive
/// - At most one transition per target node
/// - `distinct_transitions == transitions.len()`
#[derive(Clone, Debug)]
pub struct StateNode<S> {
	/// Owned copy of the state value.
	value: S,
	/// Outgoing transitions in first-observed order.
	transitions: Vec<Transition>,
	distinct_transitions: usize,
}

impl<S> StateNode<S> {
	/// Creates a node with no outgoing transitions.
	pub(crate) fn new(value: S) -> Self {
		Self {
			value,
			transitions: Vec::new(),
			distinct_transitions: 0,
		}
	}

	pub fn value(&self) -> &S {
		&self.value
	}

	/// Outgoing transitions, in the order they were first observed.
	pub fn transitions(&self) -> &[Transition] {
		&self.transitions
	}

	/// Number of distinct successors of this node.
	pub fn distinct_transitions(&self) -> usize {
		self.distinct_transitions
	}

	/// Occurrence count of the transition toward `target`, if any.
	pub fn occurrences_to(&self, target: NodeId) -> Option<usize> {
		self.transitions
			.iter()
			.find(|t| t.target == target)
			.map(|t| t.occurrences)
	}

	/// Records an occurrence of a transition toward `target`.
	///
	/// - If the transition already exists, its occurrence count is increased.
	/// - Otherwise, a new transition is appended with an initial count of 1.
	///
	/// Targets are matched by node identity. The registry keeps a single node
	/// per distinct value, so identity equality implies value equality.
	///
	/// # Errors
	/// Returns `AllocationFailure` if room for a new transition cannot be
	/// reserved. The node is unchanged in that case.
	pub(crate) fn add_transition(&mut self, target: NodeId) -> Result<()> {
		if let Some(transition) = self.transitions.iter_mut().find(|t| t.target == target) {
			transition.occurrences += 1;
			return Ok(());
		}

		self.transitions.try_reserve(1)?;
		self.transitions.push(Transition { target, occurrences: 1 });
		self.distinct_transitions += 1;
		trace!("new transition toward node {}", target.index());
		Ok(())
	}

	/// Makes room for one more transition without recording any.
	///
	/// # Errors
	/// Returns `AllocationFailure` if the room cannot be reserved.
	pub(crate) fn reserve_transition(&mut self) -> Result<()> {
		self.transitions.try_reserve(1)?;
		Ok(())
	}

	/// Sum of occurrence counts over all outgoing transitions.
	///
	/// Recomputed on every call, it is only needed while sampling.
	pub fn total_weight(&self) -> usize {
		self.transitions.iter().map(|t| t.occurrences).sum()
	}

	/// Picks the next node using weighted random sampling.
	///
	/// The probability of selecting a transition is proportional to its
	/// occurrence count. Transitions are walked in insertion order with a
	/// running sum, and the first one whose cumulative weight exceeds the
	/// drawn value wins.
	///
	/// Returns `None` if the node has no transitions.
	pub fn sample<R: Rng>(&self, rng: &mut R) -> Option<NodeId> {
		let total = self.total_weight();
		if total == 0 {
			return None;
		}

		let r = rng.random_range(0..total);
		let mut cumulative = 0;
		for transition in &self.transitions {
			cumulative += transition.occurrences;
			if cumulative > r {
				return Some(transition.target);
			}
		}

		// Unreachable: cumulative ends at total > r.
		None
	}

	pub(crate) fn into_value(self) -> S {
		self.value
	}
}
