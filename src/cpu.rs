//! CPU players of every difficulty
//!
//! Easy and medium draw on a caller supplied random number generator, hard
//! is the deterministic [`Selector`](crate::selector::Selector) and never
//! touches one.

use std::fmt;
use std::str::FromStr;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::board::Board;
use crate::error::{BoardError, EngineError, UnknownDifficulty};
use crate::player::Player;
use crate::safety::winning_columns;
use crate::selector::select_column;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Chooses a column for `player` in a game of `num_players`
    pub fn choose<R: Rng + ?Sized>(
        self,
        board: &Board,
        player: Player,
        num_players: usize,
        k: usize,
        rng: &mut R,
    ) -> Result<usize, EngineError> {
        let opponents = player.opponents(num_players);
        match self {
            Difficulty::Easy => easy_move(board, rng),
            Difficulty::Medium => medium_move(board, player, &opponents, k, rng),
            Difficulty::Hard => select_column(board, player, &opponents, k),
        }
    }
}

impl FromStr for Difficulty {
    type Err = UnknownDifficulty;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(UnknownDifficulty(name.to_string())),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        })
    }
}

/// Any legal column, uniformly at random
pub fn easy_move<R: Rng + ?Sized>(board: &Board, rng: &mut R) -> Result<usize, EngineError> {
    board
        .legal_columns()
        .choose(rng)
        .copied()
        .ok_or(EngineError::NoLegalMove)
}

/// The first column that wins for `player`, otherwise the first column that
/// stops an opponent from winning, checking opponents in turn order
pub fn win_or_block_column(
    board: &Board,
    player: Player,
    opponents: &[Player],
    k: usize,
) -> Result<Option<usize>, BoardError> {
    if let Some(&column) = winning_columns(board, player, k)?.first() {
        return Ok(Some(column));
    }
    for &opponent in opponents {
        if let Some(&column) = winning_columns(board, opponent, k)?.first() {
            return Ok(Some(column));
        }
    }
    Ok(None)
}

/// Wins or blocks when it can, otherwise plays at random
pub fn medium_move<R: Rng + ?Sized>(
    board: &Board,
    player: Player,
    opponents: &[Player],
    k: usize,
    rng: &mut R,
) -> Result<usize, EngineError> {
    match win_or_block_column(board, player, opponents, k)? {
        Some(column) => Ok(column),
        None => easy_move(board, rng),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn p(index: usize) -> Player {
        Player::new(index)
    }

    #[test]
    fn easy_only_plays_legal_columns() {
        let board = Board::from_rows(&["1.2", "2.1"]).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            assert_eq!(easy_move(&board, &mut rng).unwrap(), 1);
        }
        let full = Board::from_rows(&["1"]).unwrap();
        assert_eq!(easy_move(&full, &mut rng), Err(EngineError::NoLegalMove));
    }

    #[test]
    fn medium_wins_before_blocking() {
        let board = Board::from_rows(&[
            ".......", //
            "......1",
            "11.1..1",
            "22.2..1",
        ])
        .unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        // player 1 threatens column 6, player 2 takes its own win in column 2
        assert_eq!(medium_move(&board, p(1), &[p(0)], 4, &mut rng).unwrap(), 2);
        assert_eq!(medium_move(&board, p(0), &[p(1)], 4, &mut rng).unwrap(), 6);
    }

    #[test]
    fn medium_blocks_the_next_opponent_first() {
        let board = Board::from_rows(&[
            "......", //
            "3.....",
            "3.....",
            "3.222.",
        ])
        .unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        // player 1 faces threats from players 2 (columns 1 and 5) and 3 (column 0)
        assert_eq!(
            medium_move(&board, p(0), &[p(1), p(2)], 4, &mut rng).unwrap(),
            1
        );
        assert_eq!(
            medium_move(&board, p(0), &[p(2), p(1)], 4, &mut rng).unwrap(),
            0
        );
    }

    #[test]
    fn difficulty_parses_case_insensitively() {
        assert_eq!("Hard".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert_eq!(" easy ".parse::<Difficulty>(), Ok(Difficulty::Easy));
        assert_eq!(
            "expert".parse::<Difficulty>(),
            Err(UnknownDifficulty("expert".to_string()))
        );
        assert_eq!(Difficulty::Medium.to_string(), "medium");
    }

    #[test]
    fn hard_ignores_the_rng() {
        let board = Board::new(6, 7);
        let mut first = StdRng::seed_from_u64(1);
        let mut second = StdRng::seed_from_u64(99);
        assert_eq!(
            Difficulty::Hard.choose(&board, p(0), 2, 4, &mut first),
            Difficulty::Hard.choose(&board, p(0), 2, 4, &mut second)
        );
    }
}
