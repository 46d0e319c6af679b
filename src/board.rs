use std::fmt;

use crate::error::BoardError;
use crate::player::Player;

/// Step vectors `(column, row)` of the four line directions:
/// horizontal, vertical, rising diagonal and falling diagonal
pub const DIRECTIONS: [(isize, isize); 4] = [(1, 0), (0, 1), (1, 1), (1, -1)];

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Cell {
    Empty,
    Token(Player),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn player(&self) -> Option<Player> {
        match self {
            Cell::Token(player) => Some(*player),
            Cell::Empty => None,
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum GameState {
    Playing,
    Won(Player),
    Draw,
}

/// A gravity-driven Connect-K grid
///
/// Cells are stored left-to-right, bottom-to-top, so row 0 is the bottom row.
/// The only mutating operation is [`Board::play`]; engine code explores
/// hypothetical moves with [`Board::drop_token`], which works on a clone.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Board {
    cells: Vec<Cell>,
    heights: Vec<usize>,
    rows: usize,
    columns: usize,
}

impl Board {
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            cells: vec![Cell::Empty; rows * columns],
            heights: vec![0; columns],
            rows,
            columns,
        }
    }

    /// Parses a layout given top row first, `.` for an empty cell and
    /// `1`-`9` for a player's token
    ///
    /// ```
    /// use connectk_ai::board::{Board, Cell};
    /// use connectk_ai::player::Player;
    ///
    /// let board = Board::from_rows(&[
    ///     "...",
    ///     ".2.",
    ///     "12.",
    /// ]).unwrap();
    /// assert_eq!(board.get(1, 1), Cell::Token(Player::new(1)));
    /// assert_eq!(board.height(2), 0);
    /// ```
    pub fn from_rows<S: AsRef<str>>(layout: &[S]) -> Result<Self, BoardError> {
        let rows = layout.len();
        let columns = layout
            .first()
            .map(|row| row.as_ref().chars().count())
            .ok_or(BoardError::EmptyLayout)?;
        if columns == 0 {
            return Err(BoardError::EmptyLayout);
        }

        let mut board = Self::new(rows, columns);
        // walk bottom-up so gravity can be checked as we go
        for (row, line) in layout.iter().rev().enumerate() {
            let line = line.as_ref();
            let found = line.chars().count();
            if found != columns {
                return Err(BoardError::RaggedLayout {
                    expected: columns,
                    found,
                });
            }
            for (column, symbol) in line.chars().enumerate() {
                let cell = match symbol {
                    '.' | '0' => Cell::Empty,
                    '1'..='9' => {
                        Cell::Token(Player::new(symbol.to_digit(10).unwrap_or(1) as usize - 1))
                    }
                    other => return Err(BoardError::InvalidCell(other)),
                };
                if let Cell::Token(_) = cell {
                    if board.heights[column] != row {
                        return Err(BoardError::FloatingToken { column, row });
                    }
                    board.cells[column + columns * row] = cell;
                    board.heights[column] += 1;
                }
            }
        }
        Ok(board)
    }

    /// Replays a sequence of 0-indexed columns, rotating through the players
    /// starting with the first
    pub fn from_moves(
        rows: usize,
        columns: usize,
        moves: &[usize],
        num_players: usize,
    ) -> Result<Self, BoardError> {
        let mut board = Self::new(rows, columns);
        let mut player = Player::FIRST;
        for &column in moves {
            board.play(column, player)?;
            player = player.next(num_players);
        }
        Ok(board)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Number of tokens in `column`, which is also the row the next token lands in
    pub fn height(&self, column: usize) -> usize {
        self.heights[column]
    }

    pub fn get(&self, column: usize, row: usize) -> Cell {
        self.cells[column + self.columns * row]
    }

    /// Signed lookup, `None` when the coordinates fall outside the grid
    pub fn cell_at(&self, column: isize, row: isize) -> Option<Cell> {
        if column < 0 || row < 0 || column as usize >= self.columns || row as usize >= self.rows {
            None
        } else {
            Some(self.get(column as usize, row as usize))
        }
    }

    pub fn num_moves(&self) -> usize {
        self.heights.iter().sum()
    }

    pub fn playable(&self, column: usize) -> bool {
        column < self.columns && self.heights[column] < self.rows
    }

    /// Columns that can still take a token, in ascending order
    pub fn legal_columns(&self) -> Vec<usize> {
        (0..self.columns).filter(|&column| self.playable(column)).collect()
    }

    pub fn is_full(&self) -> bool {
        self.heights.iter().all(|&height| height >= self.rows)
    }

    fn check_column(&self, column: usize) -> Result<(), BoardError> {
        if column >= self.columns {
            return Err(BoardError::ColumnOutOfRange {
                column,
                columns: self.columns,
            });
        }
        if self.heights[column] >= self.rows {
            return Err(BoardError::ColumnFull { column });
        }
        Ok(())
    }

    /// Drops `player`'s token into `column`, returning the row it landed in
    pub fn play(&mut self, column: usize, player: Player) -> Result<usize, BoardError> {
        self.check_column(column)?;
        let row = self.heights[column];
        self.cells[column + self.columns * row] = Cell::Token(player);
        self.heights[column] += 1;
        Ok(row)
    }

    /// Returns a copy of the board with `player`'s token dropped into `column`,
    /// leaving `self` untouched
    pub fn drop_token(&self, column: usize, player: Player) -> Result<Board, BoardError> {
        self.check_column(column)?;
        let mut next = self.clone();
        next.play(column, player)?;
        Ok(next)
    }

    /// Does the line of `k` cells starting at (`column`, `row`) and stepping
    /// by `direction` belong entirely to `player`?
    fn line_owned_by(
        &self,
        player: Player,
        column: usize,
        row: usize,
        (dx, dy): (isize, isize),
        k: usize,
    ) -> bool {
        (0..k as isize).all(|step| {
            self.cell_at(column as isize + dx * step, row as isize + dy * step)
                == Some(Cell::Token(player))
        })
    }

    /// True if `player` has `k` consecutive tokens in any direction
    pub fn is_win(&self, player: Player, k: usize) -> bool {
        for row in 0..self.rows {
            for column in 0..self.columns {
                if self.get(column, row) != Cell::Token(player) {
                    continue;
                }
                if DIRECTIONS
                    .iter()
                    .any(|&direction| self.line_owned_by(player, column, row, direction, k))
                {
                    return true;
                }
            }
        }
        false
    }

    /// The first player found holding `k` in a row, scanning bottom-up
    pub fn winner(&self, k: usize) -> Option<Player> {
        for row in 0..self.rows {
            for column in 0..self.columns {
                if let Cell::Token(player) = self.get(column, row) {
                    if DIRECTIONS
                        .iter()
                        .any(|&direction| self.line_owned_by(player, column, row, direction, k))
                    {
                        return Some(player);
                    }
                }
            }
        }
        None
    }

    pub fn state(&self, k: usize) -> GameState {
        match self.winner(k) {
            Some(player) => GameState::Won(player),
            None if self.is_full() => GameState::Draw,
            None => GameState::Playing,
        }
    }
}

impl fmt::Display for Board {
    /// Writes the layout accepted by [`Board::from_rows`], top row first
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..self.rows).rev() {
            let line: String = (0..self.columns)
                .map(|column| match self.get(column, row) {
                    Cell::Empty => '.',
                    Cell::Token(player) => player.glyph(),
                })
                .collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(index: usize) -> Player {
        Player::new(index)
    }

    #[test]
    fn drop_lands_on_lowest_empty_row() {
        let mut board = Board::new(3, 2);
        assert_eq!(board.play(1, p(0)), Ok(0));
        assert_eq!(board.play(1, p(1)), Ok(1));
        assert_eq!(board.get(1, 0), Cell::Token(p(0)));
        assert_eq!(board.get(1, 1), Cell::Token(p(1)));
        assert_eq!(board.height(1), 2);
        assert_eq!(board.height(0), 0);
    }

    #[test]
    fn drop_token_does_not_touch_original() {
        let board = Board::new(2, 2);
        let next = board.drop_token(0, p(0)).unwrap();
        assert_eq!(board.num_moves(), 0);
        assert_eq!(next.num_moves(), 1);
    }

    #[test]
    fn full_column_is_rejected() {
        let board = Board::from_rows(&["1.", "2."]).unwrap();
        assert_eq!(
            board.drop_token(0, p(0)),
            Err(BoardError::ColumnFull { column: 0 })
        );
        assert_eq!(board.legal_columns(), vec![1]);
        assert_eq!(
            board.drop_token(5, p(0)),
            Err(BoardError::ColumnOutOfRange {
                column: 5,
                columns: 2
            })
        );
    }

    #[test]
    fn full_board_has_no_legal_columns() {
        let board = Board::from_rows(&["12", "21"]).unwrap();
        assert!(board.is_full());
        assert!(board.legal_columns().is_empty());
        // both diagonals are complete, the bottom-up scan meets player 2 first
        assert_eq!(board.state(2), GameState::Won(p(1)));
        assert!(board.is_win(p(0), 2));

        let board = Board::from_rows(&["1212"]).unwrap();
        assert!(board.legal_columns().is_empty());
        assert_eq!(board.state(2), GameState::Draw);
    }

    #[test]
    fn floating_tokens_are_rejected() {
        assert_eq!(
            Board::from_rows(&["1.", ".."]),
            Err(BoardError::FloatingToken { column: 0, row: 1 })
        );
        assert_eq!(
            Board::from_rows(&["1.", "..."]),
            Err(BoardError::RaggedLayout {
                expected: 2,
                found: 3
            })
        );
        assert_eq!(Board::from_rows(&["x"]), Err(BoardError::InvalidCell('x')));
    }

    #[test]
    fn wins_in_every_direction() {
        let horizontal = Board::from_rows(&["1110", "2222"]).unwrap();
        assert!(horizontal.is_win(p(1), 4));
        assert!(!horizontal.is_win(p(0), 4));

        let vertical = Board::from_rows(&["1.", "1.", "1.", "12"]).unwrap();
        assert!(vertical.is_win(p(0), 4));
        assert!(!vertical.is_win(p(0), 5));

        let rising = Board::from_rows(&["...1", "..12", ".121", "1212"]).unwrap();
        assert!(rising.is_win(p(0), 4));

        let falling = Board::from_rows(&["1...", "21..", "121.", "2121"]).unwrap();
        assert!(falling.is_win(p(0), 4));
        assert_eq!(falling.state(4), GameState::Won(p(0)));
    }

    #[test]
    fn broken_line_is_not_a_win() {
        let board = Board::from_rows(&["1112111."]).unwrap();
        assert!(!board.is_win(p(0), 4));
        assert_eq!(board.state(4), GameState::Playing);
    }

    #[test]
    fn display_round_trips_layout() {
        let layout = ["....", ".2..", "121."];
        let board = Board::from_rows(&layout).unwrap();
        assert_eq!(board.to_string(), "....\n.2..\n121.\n");
    }

    #[test]
    fn from_moves_rotates_players() {
        let board = Board::from_moves(4, 3, &[0, 0, 1], 2).unwrap();
        assert_eq!(board.get(0, 0), Cell::Token(p(0)));
        assert_eq!(board.get(0, 1), Cell::Token(p(1)));
        assert_eq!(board.get(1, 0), Cell::Token(p(0)));
    }
}
