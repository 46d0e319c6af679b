//! A heuristic CPU player for the board game 'Connect K'
//!
//! Two or more players take turns dropping tokens into a gravity-driven grid
//! until one of them gets K in a row. The hard CPU never searches the game
//! tree: it wins or blocks when it can, avoids moves that hand an opponent an
//! immediate win, and otherwise ranks columns by how many open runs they
//! build and deny, longest runs first.
//!
//! # Basic Usage
//!
//! ```
//! use connectk_ai::{board::Board, player::Player, selector::select_column};
//!
//!# use std::error::Error;
//!# fn main() -> Result<(), Box<dyn Error>> {
//! // player 1 has three in a row along the bottom
//! let board = Board::from_rows(&[
//!     ".......",
//!     "222....",
//!     "111....",
//! ])?;
//! let column = select_column(&board, Player::new(0), &[Player::new(1)], 4)?;
//!
//! assert_eq!(column, 3);
//!# Ok(())
//!# }
//! ```

use static_assertions::*;
pub use anyhow;

pub mod error;

pub mod player;

pub mod board;

pub mod scanner;

pub mod safety;

pub mod selector;

pub mod cpu;

pub mod config;

pub mod record;

pub mod arena;

pub mod render;


pub use board::{Board, Cell, GameState};
pub use config::GameConfig;
pub use cpu::Difficulty;
pub use error::{BoardError, EngineError};
pub use player::Player;
pub use selector::{select_column, Selector};

/// The height of the default game board in tiles
pub const DEFAULT_ROWS: usize = 6;

/// The width of the default game board in tiles
pub const DEFAULT_COLUMNS: usize = 7;

/// Tokens in a row needed to win the default game
pub const DEFAULT_K: usize = 4;

/// Players in the default game
pub const DEFAULT_PLAYERS: usize = 2;

/// Players are drawn as the digits 1 to 9
pub const MAX_PLAYERS: usize = 9;

// the default game must be winnable by every player
const_assert!(DEFAULT_K <= DEFAULT_COLUMNS || DEFAULT_K <= DEFAULT_ROWS);
const_assert!(DEFAULT_PLAYERS >= 2 && DEFAULT_PLAYERS <= MAX_PLAYERS);
const_assert!(DEFAULT_ROWS * DEFAULT_COLUMNS / DEFAULT_PLAYERS >= DEFAULT_K);
// player ids are stored in a u8 and written as one byte in game records
const_assert!(MAX_PLAYERS <= u8::MAX as usize);
