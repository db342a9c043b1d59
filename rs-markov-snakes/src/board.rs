use std::cmp::Ordering;
use std::fmt;

use log::debug;
use rs_markov_core::{Chain, ChainError, Result, StateCapabilities};
use serde::Serialize;

/// Number of cells on the board; the last one ends the game.
pub const BOARD_SIZE: u32 = 100;

/// Highest dice roll.
pub const DICE_MAX: u32 = 6;

/// Ladders and snakes as `(from, to)` cell pairs.
///
/// A pair is a ladder when `from < to` and a snake otherwise.
pub const SHORTCUTS: [(u32, u32); 20] = [
	(13, 4),
	(85, 17),
	(95, 67),
	(97, 58),
	(66, 89),
	(87, 31),
	(57, 83),
	(91, 25),
	(28, 50),
	(35, 11),
	(8, 30),
	(41, 62),
	(81, 43),
	(69, 32),
	(20, 39),
	(33, 70),
	(79, 99),
	(23, 76),
	(15, 47),
	(61, 14),
];

/// A cell of the game board.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
	/// Cell number, 1 to `BOARD_SIZE`.
	pub number: u32,
	/// Destination of the ladder starting here, if any.
	pub ladder_to: Option<u32>,
	/// Destination of the snake starting here, if any.
	pub snake_to: Option<u32>,
}

impl Cell {
	/// Destination of the ladder or snake starting on this cell.
	pub fn shortcut(&self) -> Option<u32> {
		self.ladder_to.or(self.snake_to)
	}
}

/// Builds the board with its ladders and snakes.
pub fn build_board() -> Vec<Cell> {
	let mut cells: Vec<Cell> = (1..=BOARD_SIZE)
		.map(|number| Cell { number, ladder_to: None, snake_to: None })
		.collect();

	for (from, to) in SHORTCUTS {
		let cell = &mut cells[(from - 1) as usize];
		if from < to {
			cell.ladder_to = Some(to);
		} else {
			cell.snake_to = Some(to);
		}
	}

	cells
}

/// Board capabilities: cells are identified by number and the last cell is
/// terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct CellCapabilities;

impl StateCapabilities for CellCapabilities {
	type State = Cell;

	fn copy(&self, value: &Cell) -> Option<Cell> {
		Some(*value)
	}

	fn compare(&self, a: &Cell, b: &Cell) -> Ordering {
		a.number.cmp(&b.number)
	}

	fn render(&self, value: &Cell, out: &mut dyn fmt::Write) -> fmt::Result {
		write!(out, " [{}] ", value.number)?;
		if value.ladder_to.is_some() {
			out.write_str("-ladder to->")
		} else if value.snake_to.is_some() {
			out.write_str("-snake to->")
		} else if value.number != BOARD_SIZE {
			out.write_str("->")
		} else {
			Ok(())
		}
	}

	fn is_terminal(&self, value: &Cell) -> bool {
		value.number == BOARD_SIZE
	}
}

/// Registers every cell and wires its moves.
///
/// A cell with a ladder or snake has that single move. Any other cell moves
/// to each of the next `DICE_MAX` cells with equal weight, stopping at the
/// last cell.
///
/// # Errors
/// Returns `InvalidArgument` if a shortcut points outside the board, and
/// propagates chain failures.
pub fn fill_chain(chain: &mut Chain<'_, CellCapabilities>, cells: &[Cell]) -> Result<()> {
	for cell in cells {
		chain.register(cell)?;
	}

	let cell_at = |number: u32| {
		cells
			.get((number as usize).wrapping_sub(1))
			.ok_or_else(|| ChainError::InvalidArgument(format!("cell {number} is off the board")))
	};

	for cell in cells {
		let from = chain.lookup(cell)?;
		match cell.shortcut() {
			Some(to) => {
				let target = chain.lookup(cell_at(to)?)?;
				chain.link(from, target)?;
			}
			None => {
				for roll in 1..=DICE_MAX {
					let number = cell.number + roll;
					if number > BOARD_SIZE {
						break;
					}
					let target = chain.lookup(cell_at(number)?)?;
					chain.link(from, target)?;
				}
			}
		}
	}

	debug!("board wired: {:?}", chain.stats());
	Ok(())
}
