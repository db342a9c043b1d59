//! Tweet generator
//!
//! Learns word transitions from a text corpus and prints random "tweets".

mod words;

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use clap::Parser;
use log::info;
use rs_markov_core::{Chain, WalkInput, Walker};
use serde::Serialize;

use words::WordCapabilities;

/// Maximum number of words in a tweet.
const MAX_TWEET_LENGTH: usize = 20;

/// Tweet generator - Markov chain over a word corpus
#[derive(Parser, Debug)]
#[command(name = "tweets")]
#[command(about = "Generate random tweets from a text corpus")]
struct Args {
	/// Random seed for deterministic runs
	seed: u64,

	/// Number of tweets to generate
	tweets: usize,

	/// Path to the text corpus
	corpus: PathBuf,

	/// Number of words to read from the corpus (all by default)
	words_to_read: Option<usize>,

	/// Maximum number of words per tweet
	#[arg(long, default_value_t = MAX_TWEET_LENGTH)]
	max_length: usize,

	/// Print one JSON object per tweet
	#[arg(long)]
	json: bool,
}

/// JSON output structure
#[derive(Serialize)]
struct TweetOutput<'a> {
	tweet: usize,
	words: &'a [&'a String],
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
	env_logger::init();
	let args = Args::parse();

	let file = File::open(&args.corpus)
		.map_err(|e| format!("Error: incorrect file path {}: {e}", args.corpus.display()))?;

	// "Train" the chain on the corpus
	let capabilities = WordCapabilities;
	let mut chain = Chain::new(&capabilities);
	let words_read = words::train_corpus(&mut chain, BufReader::new(file), args.words_to_read)?;
	words::validate_corpus(&chain)?;

	let stats = chain.stats();
	info!(
		"trained {words_read} words: {} distinct, {} transitions",
		stats.states, stats.transitions
	);

	let input = WalkInput::new(args.max_length)?;
	let mut walker = Walker::seeded(args.seed);
	for i in 1..=args.tweets {
		let tweet = walker.walk(&chain, &input)?;
		if args.json {
			println!("{}", serde_json::to_string(&TweetOutput { tweet: i, words: &tweet })?);
		} else {
			let mut line = format!("Tweet {i}:");
			chain.render_sequence(&tweet, &mut line)?;
			println!("{line}");
		}
	}

	chain.destroy();
	Ok(())
}
