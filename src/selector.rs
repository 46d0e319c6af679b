//! The hard CPU: a deterministic single-ply heuristic move selector

use rayon::prelude::*;

use crate::board::Board;
use crate::error::{BoardError, EngineError};
use crate::player::Player;
use crate::safety::{safe_or_all, winning_columns};
use crate::scanner::open_run_profile;

/// Opponent runs shorter than this are never worth denying; the engine
/// does not try to stop 2-in-a-rows
pub const MIN_DENIED_RUN: usize = 3;

/// The rule of the cascade that produced the candidate set
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Reason {
    /// the acting player completes `k` in a row
    Win,
    /// an opponent would complete `k` in a row in this column
    Block,
    /// chosen by run counting and the center tie-break
    Heuristic,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Decision {
    pub column: usize,
    pub reason: Reason,
}

/// Run counts for one candidate column, indexed by run length
struct ColumnProfile {
    column: usize,
    // the acting player's open runs after playing the column
    own: Vec<usize>,
    // opponent open runs that would exist had they taken the column instead
    denied: Vec<usize>,
}

/// Picks a column for `player` by walking a fixed priority cascade:
///
/// 1. win immediately
/// 2. block every immediate opponent win
/// 3. avoid moves that let an opponent win on the next turn, unless all do
/// 4. for each run length from `k - 1` down to 1, keep the columns with the
///    most own open runs, then the ones denying the most opponent runs
/// 5. prefer the column closest to the center, then the lower index
///
/// ```
/// use connectk_ai::{board::Board, player::Player, selector::Selector};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let board = Board::new(6, 7);
/// let opponents = [Player::new(0)];
/// let selector = Selector::new(&board, Player::new(1), &opponents, 4);
/// assert_eq!(selector.select()?, 3);
/// # Ok(())
/// # }
/// ```
pub struct Selector<'a> {
    board: &'a Board,
    player: Player,
    opponents: &'a [Player],
    k: usize,
}

impl<'a> Selector<'a> {
    pub fn new(board: &'a Board, player: Player, opponents: &'a [Player], k: usize) -> Self {
        Self {
            board,
            player,
            opponents,
            k,
        }
    }

    /// Returns the chosen column
    pub fn select(&self) -> Result<usize, EngineError> {
        self.decide().map(|decision| decision.column)
    }

    /// Returns the chosen column together with the rule that settled it
    pub fn decide(&self) -> Result<Decision, EngineError> {
        let legal = self.board.legal_columns();
        if legal.is_empty() {
            return Err(EngineError::NoLegalMove);
        }

        let wins = winning_columns(self.board, self.player, self.k)?;
        let (candidates, reason) = if !wins.is_empty() {
            // the game ends on a win, there is no reply to be safe from
            (wins, Reason::Win)
        } else {
            let blocks = self.blocking_columns()?;
            let (candidates, reason) = if blocks.is_empty() {
                (legal, Reason::Heuristic)
            } else {
                (blocks, Reason::Block)
            };
            (
                safe_or_all(self.board, &candidates, self.player, self.opponents, self.k)?,
                reason,
            )
        };

        let column = self.narrow(candidates)?;
        tracing::debug!(player = %self.player, column, ?reason, "hard cpu selected column");
        Ok(Decision { column, reason })
    }

    /// Every column in which some opponent would complete `k` in a row
    fn blocking_columns(&self) -> Result<Vec<usize>, BoardError> {
        let mut columns = Vec::new();
        for &opponent in self.opponents {
            columns.extend(winning_columns(self.board, opponent, self.k)?);
        }
        columns.sort_unstable();
        columns.dedup();
        Ok(columns)
    }

    fn profile(&self, column: usize) -> Result<ColumnProfile, BoardError> {
        let own = open_run_profile(
            &self.board.drop_token(column, self.player)?,
            self.player,
            self.k,
        );

        let mut denied = vec![0; self.k + 1];
        for &opponent in self.opponents {
            let taken = self.board.drop_token(column, opponent)?;
            for (total, count) in denied
                .iter_mut()
                .zip(open_run_profile(&taken, opponent, self.k))
            {
                *total += count;
            }
        }

        Ok(ColumnProfile {
            column,
            own,
            denied,
        })
    }

    /// Narrows the candidates by run counts, longest runs first, and
    /// settles what is left by distance from the center
    fn narrow(&self, candidates: Vec<usize>) -> Result<usize, EngineError> {
        // each column is scored on its own clone of the board
        let mut profiles = candidates
            .par_iter()
            .map(|&column| self.profile(column))
            .collect::<Result<Vec<_>, _>>()?;

        for length in (1..self.k).rev() {
            keep_max(&mut profiles, |profile| profile.own[length]);
            if length >= MIN_DENIED_RUN {
                keep_max(&mut profiles, |profile| profile.denied[length]);
            }
            if profiles.len() == 1 {
                break;
            }
        }

        let center = self.board.columns() / 2;
        profiles
            .iter()
            .map(|profile| profile.column)
            .min_by_key(|&column| (distance(column, center), column))
            .ok_or(EngineError::NoLegalMove)
    }
}

fn distance(a: usize, b: usize) -> usize {
    if a > b {
        a - b
    } else {
        b - a
    }
}

/// Retains only the profiles achieving the maximum score
fn keep_max<F: Fn(&ColumnProfile) -> usize>(profiles: &mut Vec<ColumnProfile>, score: F) {
    if let Some(best) = profiles.iter().map(&score).max() {
        profiles.retain(|profile| score(profile) == best);
    }
}

/// Chooses a column for `player` on `board`, see [`Selector`]
pub fn select_column(
    board: &Board,
    player: Player,
    opponents: &[Player],
    k: usize,
) -> Result<usize, EngineError> {
    Selector::new(board, player, opponents, k).select()
}
