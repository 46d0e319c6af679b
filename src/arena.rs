//! Headless turn loop for CPU-only games

use rand::Rng;

use std::collections::BTreeMap;

use crate::board::{Board, GameState};
use crate::config::GameConfig;
use crate::cpu::Difficulty;
use crate::error::EngineError;
use crate::player::Player;
use crate::record::GameRecord;

/// How a finished game ended, with every move that led there
#[derive(Debug, Clone)]
pub struct GameOutcome {
    pub record: GameRecord,
    pub state: GameState,
}

impl GameOutcome {
    pub fn winner(&self) -> Option<Player> {
        match self.state {
            GameState::Won(player) => Some(player),
            _ => None,
        }
    }
}

/// Plays a full game, player `i` controlled by `controllers[i]`
///
/// Controllers are reused in order if there are fewer of them than players.
/// `observe` is called after every move with the new board, the player who
/// moved and the column played.
pub fn play_game<R, F>(
    config: &GameConfig,
    controllers: &[Difficulty],
    rng: &mut R,
    mut observe: F,
) -> Result<GameOutcome, EngineError>
where
    R: Rng + ?Sized,
    F: FnMut(&Board, Player, usize),
{
    if controllers.is_empty() {
        return Err(EngineError::NoControllers);
    }

    let mut board = Board::new(config.rows, config.columns);
    let mut record = GameRecord::new(*config);
    let mut player = Player::FIRST;

    loop {
        let difficulty = controllers[player.index() % controllers.len()];
        let column = difficulty.choose(&board, player, config.players, config.k, rng)?;
        board.play(column, player)?;
        record.moves.push(column);
        observe(&board, player, column);

        match board.state(config.k) {
            GameState::Playing => player = player.next(config.players),
            state => {
                tracing::debug!(moves = record.moves.len(), ?state, "game finished");
                return Ok(GameOutcome { record, state });
            }
        }
    }
}

/// Seat of the medium CPU in [`play_hard_vs_medium`]
pub const MEDIUM_PLAYER: Player = Player::FIRST;

/// Seat of the hard CPU in [`play_hard_vs_medium`]
pub const HARD_PLAYER: Player = Player::new(1);

/// Player 1 on medium against player 2 on hard
pub fn play_hard_vs_medium<R: Rng + ?Sized>(
    config: &GameConfig,
    rng: &mut R,
) -> Result<GameOutcome, EngineError> {
    play_game(
        config,
        &[Difficulty::Medium, Difficulty::Hard],
        rng,
        |_, _, _| {},
    )
}

/// Wins per player and draws over a series of games
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tally {
    pub wins: Vec<usize>,
    pub draws: usize,
}

impl Tally {
    pub fn new(num_players: usize) -> Self {
        Self {
            wins: vec![0; num_players],
            draws: 0,
        }
    }

    pub fn add(&mut self, state: GameState) {
        match state {
            GameState::Won(player) => {
                if self.wins.len() <= player.index() {
                    self.wins.resize(player.index() + 1, 0);
                }
                self.wins[player.index()] += 1;
            }
            GameState::Draw => self.draws += 1,
            GameState::Playing => {}
        }
    }

    /// Combines two tallies; the order of merging does not matter
    pub fn merge(mut self, other: Tally) -> Tally {
        if self.wins.len() < other.wins.len() {
            self.wins.resize(other.wins.len(), 0);
        }
        for (total, wins) in self.wins.iter_mut().zip(other.wins) {
            *total += wins;
        }
        self.draws += other.draws;
        self
    }

    pub fn games(&self) -> usize {
        self.wins.iter().sum::<usize>() + self.draws
    }

    pub fn wins_of(&self, player: Player) -> usize {
        self.wins.get(player.index()).copied().unwrap_or(0)
    }
}

/// How often each win count came up over several batches of games
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WinDistribution {
    /// win count -> number of batches that ended with it
    pub frequency: BTreeMap<usize, usize>,
    pub batches: usize,
    pub mean: f64,
}

impl WinDistribution {
    pub fn from_batches(wins_per_batch: &[usize]) -> Self {
        let mut frequency = BTreeMap::new();
        for &wins in wins_per_batch {
            *frequency.entry(wins).or_insert(0) += 1;
        }
        let batches = wins_per_batch.len();
        let mean = if batches == 0 {
            0.0
        } else {
            wins_per_batch.iter().sum::<usize>() as f64 / batches as f64
        };
        Self {
            frequency,
            batches,
            mean,
        }
    }

    /// One line per win count, with a bar of `#` scaled so the most frequent
    /// count spans `width` characters
    pub fn histogram(&self, width: usize) -> Vec<String> {
        let tallest = self.frequency.values().copied().max().unwrap_or(0).max(1);
        let label_width = self
            .frequency
            .keys()
            .last()
            .map_or(1, |wins| wins.to_string().len());
        self.frequency
            .iter()
            .map(|(wins, &count)| {
                let bar = (count * width + tallest - 1) / tallest;
                format!(
                    "{:>label$} | {} {}",
                    wins,
                    "#".repeat(bar),
                    count,
                    label = label_width
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn game_ends_with_consistent_record() {
        let config = GameConfig::default();
        let mut rng = StdRng::seed_from_u64(42);
        let mut observed = 0;
        let outcome = play_game(
            &config,
            &[Difficulty::Easy, Difficulty::Hard],
            &mut rng,
            |_, _, _| observed += 1,
        )
        .unwrap();

        assert_ne!(outcome.state, GameState::Playing);
        assert_eq!(observed, outcome.record.moves.len());
        let board = outcome.record.replay().unwrap();
        assert_eq!(board.state(config.k), outcome.state);
        if let Some(winner) = outcome.winner() {
            // the winner is the one who moved last
            let last = outcome.record.moves.len() - 1;
            assert_eq!(outcome.record.player_of_move(last), winner);
        }
    }

    #[test]
    fn win_distribution_counts_batches() {
        let distribution = WinDistribution::from_batches(&[97, 95, 97, 100]);
        assert_eq!(distribution.batches, 4);
        assert!((distribution.mean - 97.25).abs() < 1e-9);
        assert_eq!(distribution.frequency.get(&97), Some(&2));
        assert_eq!(
            distribution.histogram(4),
            vec![" 95 | ## 1", " 97 | #### 2", "100 | ## 1"]
        );
        assert_eq!(WinDistribution::from_batches(&[]).mean, 0.0);
    }

    #[test]
    fn game_without_controllers_is_an_error() {
        let config = GameConfig::default();
        let mut rng = StdRng::seed_from_u64(0);
        let result = play_game(&config, &[], &mut rng, |_, _, _| {});
        assert!(matches!(result, Err(EngineError::NoControllers)));
    }

    #[test]
    fn same_seed_replays_the_same_game() {
        let config = GameConfig::default();
        let first = play_hard_vs_medium(&config, &mut StdRng::seed_from_u64(5)).unwrap();
        let second = play_hard_vs_medium(&config, &mut StdRng::seed_from_u64(5)).unwrap();
        assert_eq!(first.record, second.record);
    }

    #[test]
    fn tallies_merge_in_any_order() {
        let mut a = Tally::new(2);
        a.add(GameState::Won(Player::new(1)));
        a.add(GameState::Draw);
        let mut b = Tally::new(3);
        b.add(GameState::Won(Player::new(2)));
        b.add(GameState::Won(Player::new(1)));

        let ab = a.clone().merge(b.clone());
        let ba = b.merge(a);
        assert_eq!(ab, ba);
        assert_eq!(ab.games(), 4);
        assert_eq!(ab.wins_of(Player::new(1)), 2);
        assert_eq!(ab.wins_of(Player::new(2)), 1);
    }
}
