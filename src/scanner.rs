//! Counting of open runs, the positional signal the hard CPU scores moves by
//!
//! A run is a maximal line of one player's tokens in one of the four
//! directions. It is open when the empty cells directly beyond its two ends
//! are enough to stretch it to `k`. Cells are checked by plain adjacency, a
//! floating empty cell still counts as room to grow.

use crate::board::{Board, Cell, DIRECTIONS};
use crate::player::Player;

/// Calls `visit` with the length of every open run of `player`
fn for_each_open_run<F: FnMut(usize)>(board: &Board, player: Player, k: usize, mut visit: F) {
    let token = Cell::Token(player);
    let (columns, rows) = (board.columns() as isize, board.rows() as isize);

    for &(dx, dy) in DIRECTIONS.iter() {
        for start_row in 0..rows {
            for start_column in 0..columns {
                // only start from cells that begin a line in this direction
                if board.cell_at(start_column - dx, start_row - dy).is_some() {
                    continue;
                }

                let line: Vec<Cell> = (0..)
                    .map(|step| board.cell_at(start_column + dx * step, start_row + dy * step))
                    .take_while(Option::is_some)
                    .flatten()
                    .collect();

                let mut i = 0;
                while i < line.len() {
                    if line[i] != token {
                        i += 1;
                        continue;
                    }
                    let start = i;
                    while i < line.len() && line[i] == token {
                        i += 1;
                    }
                    let length = i - start;

                    let room_before = line[..start]
                        .iter()
                        .rev()
                        .take_while(|cell| cell.is_empty())
                        .count();
                    let room_after = line[i..].iter().take_while(|cell| cell.is_empty()).count();

                    if room_before + room_after >= k.saturating_sub(length) {
                        visit(length);
                    }
                }
            }
        }
    }
}

/// Number of open runs of exactly `run_length` tokens held by `player`
///
/// ```
/// use connectk_ai::board::Board;
/// use connectk_ai::player::Player;
/// use connectk_ai::scanner::count_open_runs;
///
/// // the two 1s are hemmed in by the 2, the 2 itself has room on the right
/// let board = Board::from_rows(&["112...."]).unwrap();
/// assert_eq!(count_open_runs(&board, Player::new(0), 2, 4), 0);
/// assert_eq!(count_open_runs(&board, Player::new(1), 1, 4), 1);
/// ```
pub fn count_open_runs(board: &Board, player: Player, run_length: usize, k: usize) -> usize {
    let mut count = 0;
    for_each_open_run(board, player, k, |length| {
        if length == run_length {
            count += 1;
        }
    });
    count
}

/// Open run counts for every length in a single pass
///
/// The returned vector has `k + 1` entries indexed by run length; entry 0 is
/// always zero and runs of `k` or more are tallied under `k`.
pub fn open_run_profile(board: &Board, player: Player, k: usize) -> Vec<usize> {
    let mut profile = vec![0; k + 1];
    for_each_open_run(board, player, k, |length| {
        profile[length.min(k)] += 1;
    });
    profile
}
