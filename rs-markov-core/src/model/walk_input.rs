use crate::error::{ChainError, Result};

/// Strategy used to select the starting state of a random walk.
///
/// # Variants
/// - `Random`: draw a uniformly random non-terminal state.
/// - `First`: start at the first registered state.
/// - `Custom(&S)`: start at the state equal to the given value.
#[derive(Debug, PartialEq)]
pub enum StartState<'a, S> {
	Random,
	First,
	Custom(&'a S),
}

// Manual impls: `S` itself does not need to be `Clone`/`Copy`.
impl<S> Clone for StartState<'_, S> {
	fn clone(&self) -> Self {
		*self
	}
}

impl<S> Copy for StartState<'_, S> {}

/// Input parameters for generating one random walk.
///
/// # Invariants
/// - `max_length` is always >= 2
#[derive(Debug)]
pub struct WalkInput<'a, S> {
	/// Maximum number of states in a generated sequence.
	max_length: usize,

	/// How the first state is chosen.
	pub start: StartState<'a, S>,
}

impl<'a, S> WalkInput<'a, S> {
	/// Smallest accepted sequence length.
	pub const MIN_LENGTH: usize = 2;

	/// Creates a walk input starting at a random state.
	///
	/// # Errors
	/// Returns `InvalidArgument` if `max_length < 2`.
	pub fn new(max_length: usize) -> Result<Self> {
		let mut input = Self { max_length: Self::MIN_LENGTH, start: StartState::Random };
		input.set_max_length(max_length)?;
		Ok(input)
	}

	/// Returns the current length bound.
	pub fn max_length(&self) -> usize {
		self.max_length
	}

	/// Sets the length bound.
	///
	/// # Errors
	/// Returns `InvalidArgument` if `max_length < 2`.
	pub fn set_max_length(&mut self, max_length: usize) -> Result<()> {
		if max_length < Self::MIN_LENGTH {
			return Err(ChainError::InvalidArgument(format!(
				"max length must be >= {}, got {max_length}",
				Self::MIN_LENGTH
			)));
		}
		self.max_length = max_length;
		Ok(())
	}

	/// Builder-style start strategy.
	pub fn with_start(mut self, start: StartState<'a, S>) -> Self {
		self.start = start;
		self
	}
}
