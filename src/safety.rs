//! One-ply lookahead: does a move hand an opponent an immediate win?

use crate::board::Board;
use crate::error::BoardError;
use crate::player::Player;

/// Columns in which `player` would complete `k` in a row right now
pub fn winning_columns(board: &Board, player: Player, k: usize) -> Result<Vec<usize>, BoardError> {
    let mut columns = Vec::new();
    for column in board.legal_columns() {
        if board.drop_token(column, player)?.is_win(player, k) {
            columns.push(column);
        }
    }
    Ok(columns)
}

/// Can `player` win with their very next token?
pub fn can_win_now(board: &Board, player: Player, k: usize) -> Result<bool, BoardError> {
    for column in board.legal_columns() {
        if board.drop_token(column, player)?.is_win(player, k) {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Simulates `player` dropping into `column`, then every reply of every
/// opponent; the move is safe only if none of those replies wins
pub fn is_move_safe(
    board: &Board,
    column: usize,
    player: Player,
    opponents: &[Player],
    k: usize,
) -> Result<bool, BoardError> {
    let after = board.drop_token(column, player)?;
    for &opponent in opponents {
        if can_win_now(&after, opponent, k)? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Keeps the safe columns of `candidates`, falling back to all of them when
/// every one is unsafe
pub fn safe_or_all(
    board: &Board,
    candidates: &[usize],
    player: Player,
    opponents: &[Player],
    k: usize,
) -> Result<Vec<usize>, BoardError> {
    let mut safe = Vec::with_capacity(candidates.len());
    for &column in candidates {
        if is_move_safe(board, column, player, opponents, k)? {
            safe.push(column);
        }
    }
    if safe.is_empty() {
        tracing::debug!(?candidates, "no safe move, keeping every candidate");
        Ok(candidates.to_vec())
    } else {
        Ok(safe)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(index: usize) -> Player {
        Player::new(index)
    }

    #[test]
    fn playing_under_a_threat_is_unsafe() {
        // player 2 wins on the second row of column 3 once it is reachable
        let board = Board::from_rows(&[
            "......", //
            "222...",
            "111.2.",
        ])
        .unwrap();
        // filling column 3 opens the cell above it for player 2
        assert!(!is_move_safe(&board, 3, p(0), &[p(1)], 4).unwrap());
        assert!(is_move_safe(&board, 5, p(0), &[p(1)], 4).unwrap());
    }

    #[test]
    fn winning_columns_lists_every_win() {
        let board = Board::from_rows(&["...", "...", "1..", "1..", "12."]).unwrap();
        assert_eq!(winning_columns(&board, p(0), 4).unwrap(), vec![0]);
        assert!(can_win_now(&board, p(0), 4).unwrap());
        assert!(!can_win_now(&board, p(1), 4).unwrap());
    }

    #[test]
    fn all_unsafe_falls_back_to_candidates() {
        // two separate threats, nothing can stop both
        let board = Board::from_rows(&[
            ".....", //
            "2.2..",
            "2.2..",
            "21211",
        ])
        .unwrap();
        let candidates = board.legal_columns();
        let kept = safe_or_all(&board, &candidates, p(0), &[p(1)], 4).unwrap();
        assert_eq!(kept, candidates);
    }
}
