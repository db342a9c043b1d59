use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::capabilities::StateCapabilities;
use super::chain::Chain;
use super::state::NodeId;
use super::walk_input::{StartState, WalkInput};
use crate::error::{ChainError, Result};

/// Random walk engine over a trained `Chain`.
///
/// The walker owns the single pseudorandom generator used for every draw, so
/// a walker seeded once and driven through the same calls on the same chain
/// always produces the same sequences.
///
/// # Responsibilities
/// - Pick a random non-terminal start state
/// - Sample successors with probability proportional to transition counts
/// - Generate bounded sequences that stop at terminal states
#[derive(Debug, Clone)]
pub struct Walker<R> {
	rng: R,
}

impl Walker<StdRng> {
	/// Creates a walker backed by a `StdRng` seeded with `seed`.
	pub fn seeded(seed: u64) -> Self {
		Self::new(StdRng::seed_from_u64(seed))
	}
}

impl<R: Rng> Walker<R> {
	pub fn new(rng: R) -> Self {
		Self { rng }
	}

	/// Picks a uniformly random non-terminal state.
	///
	/// Draws an index in `[0, len)` and redraws while the drawn state is
	/// terminal.
	///
	/// # Errors
	/// Returns `InvalidArgument` if the chain is empty or holds only terminal
	/// states, instead of retrying forever.
	pub fn pick_start_node<C: StateCapabilities>(&mut self, chain: &Chain<'_, C>) -> Result<NodeId> {
		if chain.is_empty() {
			return Err(ChainError::InvalidArgument("cannot pick a start state in an empty chain".to_owned()));
		}
		if !chain.has_start_state() {
			return Err(ChainError::InvalidArgument("every state of the chain is terminal".to_owned()));
		}

		loop {
			let id = NodeId::new(self.rng.random_range(0..chain.len()));
			if !chain.is_terminal(id) {
				return Ok(id);
			}
		}
	}

	/// Samples the successor of `node`, weighted by transition counts.
	///
	/// Returns `None` if the node has no outgoing transitions or does not
	/// belong to `chain`.
	pub fn pick_next<C: StateCapabilities>(&mut self, chain: &Chain<'_, C>, node: NodeId) -> Option<NodeId> {
		chain.node(node)?.sample(&mut self.rng)
	}

	/// Generates a sequence starting at `start`.
	///
	/// The start value is always emitted first. The walk then follows sampled
	/// transitions and stops when:
	/// - the current state has no successor
	/// - a terminal state was emitted
	/// - `max_length` states were emitted
	///
	/// The result therefore holds between 1 and `max_length` values.
	///
	/// # Errors
	/// Returns `InvalidArgument` if `max_length < 2` or `start` does not belong
	/// to `chain`.
	pub fn generate_sequence<'a, C: StateCapabilities>(
		&mut self,
		chain: &'a Chain<'_, C>,
		start: NodeId,
		max_length: usize,
	) -> Result<Vec<&'a C::State>> {
		let min_length = WalkInput::<C::State>::MIN_LENGTH;
		if max_length < min_length {
			return Err(ChainError::InvalidArgument(format!(
				"max length must be >= {min_length}, got {max_length}"
			)));
		}
		let first = chain
			.value(start)
			.ok_or_else(|| ChainError::InvalidArgument(format!("unknown start node {}", start.index())))?;

		let mut sequence = vec![first];
		let mut current = start;
		while sequence.len() < max_length {
			let Some(next) = self.pick_next(chain, current) else {
				break;
			};
			// Sampled ids always come from the same registry
			let Some(value) = chain.value(next) else {
				break;
			};
			sequence.push(value);
			if chain.capabilities().is_terminal(value) {
				break;
			}
			current = next;
		}

		debug!("generated a walk of {} states", sequence.len());
		Ok(sequence)
	}

	/// Generates one sequence according to `input`.
	///
	/// # Errors
	/// - `InvalidArgument` if no start state can be chosen
	/// - `NotFound` if a custom start state was never registered
	pub fn walk<'a, C: StateCapabilities>(
		&mut self,
		chain: &'a Chain<'_, C>,
		input: &WalkInput<'_, C::State>,
	) -> Result<Vec<&'a C::State>> {
		let start = match input.start {
			StartState::Random => self.pick_start_node(chain)?,
			StartState::First => chain
				.first()
				.ok_or_else(|| ChainError::InvalidArgument("cannot start a walk in an empty chain".to_owned()))?,
			StartState::Custom(value) => chain.lookup(value)?,
		};
		self.generate_sequence(chain, start, input.max_length())
	}
}
