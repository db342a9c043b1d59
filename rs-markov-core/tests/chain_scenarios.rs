//! End-to-end tests over the public chain API.
//!
//! Tests cover:
//! - Word corpus training and deterministic generation
//! - Deduplication and failure isolation in the registry
//! - Weighted sampling distribution
//! - Teardown
//! - Property-based tests for bounded generation

use std::cell::{Cell, RefCell};
use std::cmp::Ordering;
use std::fmt;

use rs_markov_core::{Chain, ChainError, StartState, StateCapabilities, WalkInput, Walker};

/// Whitespace-separated words; a word ending with '.' closes a sentence.
#[derive(Default)]
struct Words {
	poisoned: Option<String>,
	released: Cell<usize>,
	rendered: RefCell<Vec<String>>,
}

impl StateCapabilities for Words {
	type State = String;

	fn copy(&self, value: &String) -> Option<String> {
		if self.poisoned.as_ref() == Some(value) {
			return None;
		}
		Some(value.clone())
	}

	fn compare(&self, a: &String, b: &String) -> Ordering {
		a.cmp(b)
	}

	fn release(&self, _value: String) {
		self.released.set(self.released.get() + 1);
	}

	fn render(&self, value: &String, out: &mut dyn fmt::Write) -> fmt::Result {
		self.rendered.borrow_mut().push(value.clone());
		write!(out, " {value}")
	}

	fn is_terminal(&self, value: &String) -> bool {
		value.ends_with('.')
	}
}

fn train_corpus(chain: &mut Chain<'_, Words>, corpus: &str) {
	for word in corpus.split_whitespace() {
		chain.train(&word.to_owned(), false).unwrap();
	}
}

fn word(s: &str) -> String {
	s.to_owned()
}

#[cfg(test)]
mod corpus {
	use super::*;

	#[test]
	fn test_three_word_sentence() {
		let words = Words::default();
		let mut chain = Chain::new(&words);
		train_corpus(&mut chain, "a b c.");

		assert_eq!(chain.len(), 3);
		let a = chain.lookup(&word("a")).unwrap();
		let b = chain.lookup(&word("b")).unwrap();
		let c = chain.lookup(&word("c.")).unwrap();

		assert_eq!(chain.node(a).unwrap().occurrences_to(b), Some(1));
		assert_eq!(chain.node(b).unwrap().occurrences_to(c), Some(1));
		assert!(chain.is_terminal(c));
		assert!(chain.node(c).unwrap().transitions().is_empty());

		let mut walker = Walker::seeded(2024);
		let sequence = walker.generate_sequence(&chain, a, 5).unwrap();
		assert_eq!(sequence, vec!["a", "b", "c."]);
	}

	#[test]
	fn test_sentences_are_not_linked() {
		let words = Words::default();
		let mut chain = Chain::new(&words);
		train_corpus(&mut chain, "the cat sat. the dog ran. a cat ran.");

		let sat = chain.lookup(&word("sat.")).unwrap();
		let ran = chain.lookup(&word("ran.")).unwrap();
		assert!(chain.node(sat).unwrap().transitions().is_empty());
		assert!(chain.node(ran).unwrap().transitions().is_empty());

		let the = chain.lookup(&word("the")).unwrap();
		assert_eq!(chain.node(the).unwrap().distinct_transitions(), 2);
		assert_eq!(chain.stats().terminal_states, 2);
	}

	#[test]
	fn test_random_walks_end_on_terminal_or_bound() {
		let words = Words::default();
		let mut chain = Chain::new(&words);
		train_corpus(&mut chain, "we go on and on and on. we stop. on we go.");

		let mut walker = Walker::seeded(99);
		let input = WalkInput::new(6).unwrap();
		for _ in 0..100 {
			let sequence = walker.walk(&chain, &input).unwrap();
			assert!(!sequence.is_empty() && sequence.len() <= 6);
			assert!(!words.is_terminal(sequence[0]));
			let last = sequence[sequence.len() - 1];
			let ends_cleanly = words.is_terminal(last) || sequence.len() == 6;
			let stuck = chain.node(chain.lookup(last).unwrap()).unwrap().transitions().is_empty();
			assert!(ends_cleanly || stuck);
		}
	}

	#[test]
	fn test_render_goes_through_capabilities() {
		let words = Words::default();
		let mut chain = Chain::new(&words);
		train_corpus(&mut chain, "hi there.");

		let start = word("hi");
		let mut walker = Walker::seeded(1);
		let input = WalkInput::new(5).unwrap().with_start(StartState::Custom(&start));
		let sequence = walker.walk(&chain, &input).unwrap();

		let mut line = String::from("Tweet 1:");
		chain.render_sequence(&sequence, &mut line).unwrap();
		assert_eq!(line, "Tweet 1: hi there.");
		assert_eq!(*words.rendered.borrow(), vec!["hi", "there."]);
	}
}

#[cfg(test)]
mod registry {
	use super::*;

	#[test]
	fn test_equal_values_share_a_node() {
		let words = Words::default();
		let mut chain = Chain::new(&words);

		let first = chain.register(&word("same")).unwrap();
		assert_eq!(chain.len(), 1);
		let second = chain.register(&word("same")).unwrap();
		assert_eq!(chain.len(), 1);
		assert_eq!(first, second);
	}

	#[test]
	fn test_copy_failure_is_isolated() {
		let words = Words { poisoned: Some(word("boom")), ..Words::default() };
		let mut chain = Chain::new(&words);
		train_corpus(&mut chain, "one two");
		let before = chain.stats();

		let result = chain.train(&word("boom"), false);
		assert!(matches!(result, Err(ChainError::AllocationFailure(_))));
		assert_eq!(chain.stats(), before);
		assert_eq!(chain.find(&word("boom")), None);

		let values: Vec<&String> = chain.registry().iter().map(|(_, node)| node.value()).collect();
		assert_eq!(values, vec!["one", "two"]);

		// Session survives the failure: "two" still links to the next word
		chain.train(&word("three."), false).unwrap();
		let two = chain.lookup(&word("two")).unwrap();
		let three = chain.lookup(&word("three.")).unwrap();
		assert_eq!(chain.node(two).unwrap().occurrences_to(three), Some(1));
	}
}

#[cfg(test)]
mod sampling {
	use super::*;

	#[test]
	fn test_three_to_one_weights() {
		let words = Words::default();
		let mut chain = Chain::new(&words);
		let from = chain.register(&word("from")).unwrap();
		let a = chain.register(&word("a")).unwrap();
		let b = chain.register(&word("b")).unwrap();
		for _ in 0..3 {
			chain.link(from, a).unwrap();
		}
		chain.link(from, b).unwrap();

		let mut walker = Walker::seeded(8);
		let mut counts = [0usize; 2];
		for _ in 0..40_000 {
			match walker.pick_next(&chain, from) {
				Some(id) if id == a => counts[0] += 1,
				Some(id) if id == b => counts[1] += 1,
				other => panic!("unexpected successor {other:?}"),
			}
		}

		let ratio = counts[0] as f64 / counts[1] as f64;
		assert!((2.8..3.2).contains(&ratio), "ratio was {ratio}");
	}

	#[test]
	fn test_no_successor_is_none() {
		let words = Words::default();
		let mut chain = Chain::new(&words);
		let lonely = chain.register(&word("lonely")).unwrap();

		let mut walker = Walker::seeded(8);
		assert_eq!(walker.pick_next(&chain, lonely), None);
		assert_eq!(walker.generate_sequence(&chain, lonely, 4).unwrap(), vec!["lonely"]);
	}
}

#[cfg(test)]
mod teardown {
	use super::*;

	#[test]
	fn test_destroy_twice_is_noop() {
		let words = Words::default();
		{
			let mut chain = Chain::new(&words);
			train_corpus(&mut chain, "a b c. d e.");
			assert_eq!(chain.len(), 5);

			chain.destroy();
			assert_eq!(words.released.get(), 5);
			chain.destroy();
			assert_eq!(words.released.get(), 5);
			assert!(chain.is_empty());
		}
		// Dropping the torn-down chain releases nothing more
		assert_eq!(words.released.get(), 5);
	}

	#[test]
	fn test_walks_fail_after_destroy() {
		let words = Words::default();
		let mut chain = Chain::new(&words);
		train_corpus(&mut chain, "a b.");
		chain.destroy();

		let mut walker = Walker::seeded(0);
		assert!(matches!(walker.pick_start_node(&chain), Err(ChainError::InvalidArgument(_))));
	}
}

#[cfg(test)]
mod property_tests {
	use super::*;
	use proptest::prelude::*;

	fn corpus_strategy() -> impl Strategy<Value = Vec<String>> {
		proptest::collection::vec(
			prop_oneof![
				4 => "[a-e]".prop_map(String::from),
				1 => "[a-e]\\.".prop_map(String::from),
			],
			1..60,
		)
	}

	proptest! {
		#[test]
		fn prop_generation_is_bounded(
			corpus in corpus_strategy(),
			max_length in 2usize..30,
			seed in any::<u64>(),
		) {
			let words = Words::default();
			let mut chain = Chain::new(&words);
			for token in &corpus {
				chain.train(token, false).unwrap();
			}
			prop_assume!(chain.has_start_state());

			let mut walker = Walker::seeded(seed);
			let input = WalkInput::new(max_length).unwrap();
			for _ in 0..10 {
				let sequence = walker.walk(&chain, &input).unwrap();
				prop_assert!(!sequence.is_empty());
				prop_assert!(sequence.len() <= max_length);
			}
		}

		#[test]
		fn prop_registry_holds_distinct_values(corpus in corpus_strategy()) {
			let words = Words::default();
			let mut chain = Chain::new(&words);
			for token in &corpus {
				let before = chain.len();
				let known = chain.find(token).is_some();
				chain.train(token, false).unwrap();
				prop_assert_eq!(chain.len(), if known { before } else { before + 1 });
			}

			let mut distinct = corpus.clone();
			distinct.sort();
			distinct.dedup();
			prop_assert_eq!(chain.len(), distinct.len());

			for (_, node) in chain.registry().iter() {
				prop_assert_eq!(node.distinct_transitions(), node.transitions().len());
				prop_assert!(node.transitions().iter().all(|t| t.occurrences() >= 1));
			}
		}

		#[test]
		fn prop_observations_match_linked_pairs(corpus in corpus_strategy()) {
			let words = Words::default();
			let mut chain = Chain::new(&words);
			for token in &corpus {
				chain.train(token, false).unwrap();
			}

			let expected = corpus
				.windows(2)
				.filter(|pair| !words.is_terminal(&pair[0]))
				.count();
			prop_assert_eq!(chain.stats().observations, expected);
		}
	}
}
