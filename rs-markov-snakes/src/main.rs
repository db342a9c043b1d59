//! Snakes and ladders random walks
//!
//! Wires the game board into a Markov chain and prints random games.

mod board;

use clap::Parser;
use log::info;
use rs_markov_core::{Chain, StartState, WalkInput, Walker};
use serde::Serialize;

use board::CellCapabilities;

/// Maximum number of cells visited in one walk.
const MAX_GENERATION_LENGTH: usize = 60;

/// Snakes and ladders - random walks over the game board
#[derive(Parser, Debug)]
#[command(name = "snakes")]
#[command(about = "Generate random snakes and ladders games")]
struct Args {
	/// Random seed for deterministic runs
	seed: u64,

	/// Number of walks to generate
	walks: usize,

	/// Maximum number of cells per walk
	#[arg(long, default_value_t = MAX_GENERATION_LENGTH)]
	max_length: usize,

	/// Start each walk on a random cell instead of cell 1
	#[arg(long)]
	random_start: bool,

	/// Print one JSON object per walk
	#[arg(long)]
	json: bool,
}

/// JSON output structure
#[derive(Serialize)]
struct WalkOutput {
	walk: usize,
	cells: Vec<u32>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
	env_logger::init();
	let args = Args::parse();

	let cells = board::build_board();
	let capabilities = CellCapabilities;
	let mut chain = Chain::new(&capabilities);
	board::fill_chain(&mut chain, &cells)?;
	info!("board ready: {} cells", chain.len());

	let start = if args.random_start { StartState::Random } else { StartState::First };
	let input = WalkInput::new(args.max_length)?.with_start(start);
	let mut walker = Walker::seeded(args.seed);

	for i in 1..=args.walks {
		let walk = walker.walk(&chain, &input)?;
		if args.json {
			let output = WalkOutput { walk: i, cells: walk.iter().map(|cell| cell.number).collect() };
			println!("{}", serde_json::to_string(&output)?);
		} else {
			let mut line = format!("Random Walk {i}:");
			chain.render_sequence(&walk, &mut line)?;
			println!("{line}");
		}
	}

	chain.destroy();
	Ok(())
}
