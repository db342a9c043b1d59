use std::cmp::Ordering;
use std::fmt;

/// Operations a consumer supplies so a `Chain` can work over its state type.
///
/// The chain never inspects a state directly. Every copy, comparison,
/// rendering and terminal check goes through this trait, which lets the same
/// chain learn words, board cells, or anything else with a notion of equality.
///
/// ## Contract
/// - `copy` returns a deep, independent copy, or `None` if it could not be made
///   (reported by the chain as an allocation failure)
/// - `compare` returning `Ordering::Equal` means "same state"; the chain only
///   uses it for equality
/// - `release` is called exactly once for every value the chain stored
/// - `render` must not depend on or mutate chain state
/// - `is_terminal` marks states that end a sequence
pub trait StateCapabilities {
	/// The consumer-defined state type.
	type State;

	/// Deep copy of `value`, owned by the caller.
	fn copy(&self, value: &Self::State) -> Option<Self::State>;

	/// Compares two states. `Ordering::Equal` means they are the same state.
	fn compare(&self, a: &Self::State, b: &Self::State) -> Ordering;

	/// Releases everything owned by `value`.
	///
	/// The default simply drops it.
	fn release(&self, value: Self::State) {
		drop(value);
	}

	/// Writes the textual representation of `value`.
	fn render(&self, value: &Self::State, out: &mut dyn fmt::Write) -> fmt::Result;

	/// Returns `true` if `value` ends a sequence.
	fn is_terminal(&self, value: &Self::State) -> bool;
}
