use std::cmp::Ordering;
use std::fmt;
use std::io::{self, BufRead};

use log::debug;
use rs_markov_core::{Chain, ChainError, StateCapabilities};
use thiserror::Error;

/// Characters separating two words of the corpus.
pub const DELIMITERS: &[char] = &[' ', '\n', '\t', '\r'];

/// Errors raised while loading a corpus.
#[derive(Debug, Error)]
pub enum TweetsError {
	#[error("IO error: {0}")]
	Io(#[from] io::Error),

	#[error(transparent)]
	Chain(#[from] ChainError),

	#[error("Corpus too small: {0}")]
	CorpusTooSmall(String),
}

/// Word capabilities: a word ending with '.' ends a tweet.
#[derive(Debug, Default, Clone, Copy)]
pub struct WordCapabilities;

impl StateCapabilities for WordCapabilities {
	type State = String;

	fn copy(&self, value: &String) -> Option<String> {
		Some(value.clone())
	}

	fn compare(&self, a: &String, b: &String) -> Ordering {
		a.cmp(b)
	}

	fn render(&self, value: &String, out: &mut dyn fmt::Write) -> fmt::Result {
		write!(out, " {value}")
	}

	fn is_terminal(&self, value: &String) -> bool {
		value.ends_with('.')
	}
}

/// Trains `chain` with the words of `reader`, in file order.
///
/// Reading stops after `words_to_read` words when a budget is given.
/// Returns the number of words trained.
pub fn train_corpus<R: BufRead>(
	chain: &mut Chain<'_, WordCapabilities>,
	reader: R,
	words_to_read: Option<usize>,
) -> Result<usize, TweetsError> {
	let mut words_read = 0;

	for line in reader.lines() {
		let line = line?;
		for token in line.split(DELIMITERS).filter(|token| !token.is_empty()) {
			if words_to_read.is_some_and(|budget| words_read >= budget) {
				debug!("word budget reached after {words_read} words");
				return Ok(words_read);
			}
			chain.train(&token.to_owned(), false)?;
			words_read += 1;
		}
	}

	Ok(words_read)
}

/// Checks that the trained chain can produce a tweet of at least two words.
///
/// # Errors
/// Returns `CorpusTooSmall` if fewer than two distinct words were learned, or
/// if no non-terminal word is ever followed by another word.
pub fn validate_corpus(chain: &Chain<'_, WordCapabilities>) -> Result<(), TweetsError> {
	if chain.len() < 2 {
		return Err(TweetsError::CorpusTooSmall(format!("{} distinct word(s), need 2", chain.len())));
	}

	let capabilities = chain.capabilities();
	let can_continue = chain
		.registry()
		.iter()
		.any(|(_, node)| !capabilities.is_terminal(node.value()) && !node.transitions().is_empty());
	if !can_continue {
		return Err(TweetsError::CorpusTooSmall("no sentence has two words".to_owned()));
	}

	Ok(())
}
