//! Player identifiers and turn rotation

use std::fmt;

use crate::error::BoardError;

/// An opaque player identifier, indexed from 0
///
/// Players are displayed 1-based, so `Player::new(0)` prints as `1`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Player(u8);

impl Player {
    /// The player who moves first
    pub const FIRST: Player = Player(0);

    pub const fn new(index: usize) -> Self {
        debug_assert!(index < crate::MAX_PLAYERS);
        Self(index as u8)
    }

    /// Creates a player, checking that it exists in a game of `num_players`
    pub fn checked(index: usize, num_players: usize) -> Result<Self, BoardError> {
        if index < num_players && index < crate::MAX_PLAYERS {
            Ok(Self(index as u8))
        } else {
            Err(BoardError::UnknownPlayer {
                player: index + 1,
                num_players,
            })
        }
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// The player whose turn follows this one
    pub fn next(self, num_players: usize) -> Player {
        Player(((self.index() + 1) % num_players) as u8)
    }

    /// Every other player in turn order, starting with the one who moves next
    pub fn opponents(self, num_players: usize) -> Vec<Player> {
        (1..num_players)
            .map(|offset| Player(((self.index() + offset) % num_players) as u8))
            .collect()
    }

    /// Single character used in board layouts and on screen
    pub fn glyph(self) -> char {
        std::char::from_digit(self.index() as u32 + 1, 10).unwrap_or('?')
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index() + 1)
    }
}

/// Iterates over every player of a game in turn order
pub fn all_players(num_players: usize) -> impl Iterator<Item = Player> {
    (0..num_players).map(Player::new)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_wraps_around() {
        assert_eq!(Player::new(0).next(2), Player::new(1));
        assert_eq!(Player::new(1).next(2), Player::new(0));
        assert_eq!(Player::new(2).next(3), Player::new(0));
    }

    #[test]
    fn opponents_in_turn_order() {
        assert_eq!(
            Player::new(1).opponents(4),
            vec![Player::new(2), Player::new(3), Player::new(0)]
        );
        assert_eq!(Player::new(0).opponents(2), vec![Player::new(1)]);
    }

    #[test]
    fn display_is_one_based() {
        assert_eq!(Player::new(0).to_string(), "1");
        assert_eq!(Player::new(2).glyph(), '3');
    }

    #[test]
    fn checked_rejects_missing_player() {
        assert!(Player::checked(1, 2).is_ok());
        assert_eq!(
            Player::checked(2, 2),
            Err(BoardError::UnknownPlayer {
                player: 3,
                num_players: 2
            })
        );
    }
}
