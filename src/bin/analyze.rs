use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use tracing_subscriber::EnvFilter;

use std::io::{stdin, stdout, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use connectk_ai::arena::{
    play_hard_vs_medium, GameOutcome, Tally, WinDistribution, HARD_PLAYER, MEDIUM_PLAYER,
};
use connectk_ai::record::GameRecord;
use connectk_ai::render::{clear_screen, draw};
use connectk_ai::GameConfig;

/// Pits the hard CPU against the medium CPU
#[derive(Parser, Debug)]
#[command(name = "analyze", version, about)]
struct Args {
    /// TOML file with rows, columns, k and players
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Win rate of the hard CPU over many games
    #[command(alias = "h")]
    TestHardCpu {
        #[arg(default_value_t = 100)]
        games: u64,

        /// Only print the final tally
        #[arg(short, long)]
        quiet: bool,

        /// Game `i` is played with seed `seed + i`
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
    /// Distribution of hard CPU wins over repeated batches of games
    #[command(alias = "p")]
    Plot {
        /// Games per batch
        #[arg(default_value_t = 100)]
        games: u64,

        /// Number of batches
        #[arg(short = 'n', long, default_value_t = 100)]
        count: u64,

        /// Batch `i` plays seeds `seed + i * games` onwards
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
    /// Time batches of hard vs medium games
    #[command(alias = "b")]
    Bench {
        #[arg(long, default_value_t = 100)]
        games: u64,

        #[arg(long, default_value_t = 10)]
        repeat: usize,
    },
    /// Step through a single hard vs medium game
    #[command(alias = "w")]
    WatchHardGame {
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Save every game the hard CPU lost as a record
    #[command(alias = "s")]
    SaveHardCpuLosses {
        #[arg(default_value = "losses")]
        out_dir: PathBuf,

        #[arg(long, default_value_t = 100)]
        games: u64,

        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
    /// Step through a saved game record
    #[command(alias = "l")]
    WatchGame { file: PathBuf },
}

fn game_config(path: Option<&Path>) -> Result<GameConfig> {
    Ok(match path {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => GameConfig::default(),
    })
}

fn progress_bar(len: u64, label: &str) -> ProgressBar {
    let progress = ProgressBar::new(len);
    progress.set_style(
        ProgressStyle::default_bar()
            .template(&format!(
                "{}: {{bar:40.cyan/blue}} {{pos}}/{{len}} ~{{eta}} remaining",
                label
            ))
            .progress_chars("█▓▒░  "),
    );
    progress
}

/// Plays games `seed..seed + games` in parallel
fn play_many(config: &GameConfig, games: u64, seed: u64, progress: &ProgressBar) -> Result<Vec<GameOutcome>> {
    let outcomes = (seed..seed + games)
        .into_par_iter()
        .map(|game_seed| {
            let outcome = play_hard_vs_medium(config, &mut StdRng::seed_from_u64(game_seed));
            progress.inc(1);
            outcome
        })
        .collect::<Result<Vec<_>, _>>()?;
    progress.finish();
    Ok(outcomes)
}

fn test_hard_cpu(config: &GameConfig, games: u64, quiet: bool, seed: u64) -> Result<()> {
    let progress = if quiet {
        ProgressBar::hidden()
    } else {
        progress_bar(games, "Playing")
    };
    let tally = play_many(config, games, seed, &progress)?
        .into_par_iter()
        .map(|outcome| {
            let mut tally = Tally::new(config.players);
            tally.add(outcome.state);
            tally
        })
        .reduce(|| Tally::new(config.players), Tally::merge);

    let wins = tally.wins_of(HARD_PLAYER);
    let losses = tally.games() - wins - tally.draws;
    println!(
        "Hard CPU: {} wins, {} losses, {} draws out of {} games ({:.1}% win rate)",
        wins,
        losses,
        tally.draws,
        tally.games(),
        100.0 * wins as f64 / tally.games().max(1) as f64
    );
    tracing::info!(wins, losses, draws = tally.draws, "hard cpu test finished");
    Ok(())
}

fn plot(config: &GameConfig, games: u64, count: u64, seed: u64) -> Result<()> {
    let progress = progress_bar(count, "Batches");
    let wins = (0..count)
        .into_par_iter()
        .map(|batch| -> Result<usize> {
            let first = seed + batch * games;
            let mut wins = 0;
            for game_seed in first..first + games {
                let outcome = play_hard_vs_medium(config, &mut StdRng::seed_from_u64(game_seed))?;
                if outcome.winner() == Some(HARD_PLAYER) {
                    wins += 1;
                }
            }
            progress.inc(1);
            Ok(wins)
        })
        .collect::<Result<Vec<_>>>()?;
    progress.finish();

    let distribution = WinDistribution::from_batches(&wins);
    println!("{:?}", wins);
    println!("Average: {:.2} wins out of {} games", distribution.mean, games);
    println!("Number of wins | frequency");
    for line in distribution.histogram(40) {
        println!("{}", line);
    }
    Ok(())
}

fn bench(config: &GameConfig, games: u64, repeat: usize) -> Result<()> {
    let mut timings = Vec::with_capacity(repeat);
    for run in 0..repeat {
        let start = Instant::now();
        play_many(config, games, run as u64 * games, &ProgressBar::hidden())?;
        let elapsed = start.elapsed().as_secs_f64();
        tracing::info!(run, elapsed, "bench run finished");
        timings.push(elapsed);
    }
    if timings.is_empty() {
        return Ok(());
    }

    let mean = timings.iter().sum::<f64>() / timings.len() as f64;
    let variance = timings.iter().map(|t| (t - mean).powi(2)).sum::<f64>() / timings.len() as f64;
    let min = timings.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = timings.iter().cloned().fold(0.0, f64::max);
    println!(
        "{} games x {} runs: {:.3}s ± {:.3}s per run, range {:.3}s … {:.3}s",
        games,
        repeat,
        mean,
        variance.sqrt(),
        min,
        max
    );
    Ok(())
}

/// Draws each position of the game in turn, waiting for enter in between
fn watch(record: &GameRecord) -> Result<()> {
    let stdin = stdin();
    let positions = record.positions()?;
    for (index, board) in positions.iter().enumerate() {
        clear_screen()?;
        draw(board, record.config.k)?;
        if index > 0 {
            println!(
                "Player {} played column {}",
                record.player_of_move(index - 1),
                record.moves[index - 1] + 1
            );
        }
        if index + 1 < positions.len() {
            print!("Press enter for the next move ");
            stdout().flush()?;
            let mut buffer = String::new();
            stdin.read_line(&mut buffer)?;
        }
    }
    match positions.last().and_then(|board| board.winner(record.config.k)) {
        Some(winner) => println!("Player {} wins!", winner),
        None => println!("No winner after {} moves", record.moves.len()),
    }
    Ok(())
}

fn watch_hard_game(config: &GameConfig, seed: Option<u64>) -> Result<()> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    println!("Player {} is medium, player {} is hard", MEDIUM_PLAYER, HARD_PLAYER);
    let outcome = play_hard_vs_medium(config, &mut rng)?;
    watch(&outcome.record)
}

fn save_hard_cpu_losses(config: &GameConfig, out_dir: &Path, games: u64, seed: u64) -> Result<()> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;

    let outcomes = play_many(config, games, seed, &progress_bar(games, "Playing"))?;
    let mut saved = 0;
    for (offset, outcome) in outcomes.iter().enumerate() {
        match outcome.winner() {
            Some(winner) if winner != HARD_PLAYER => {
                let path = out_dir.join(format!("{}.cnkg", seed + offset as u64));
                outcome
                    .record
                    .save(&path)
                    .with_context(|| format!("failed to save {}", path.display()))?;
                saved += 1;
            }
            _ => {}
        }
    }
    println!("Saved {} lost games to {}", saved, out_dir.display());
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    let config = game_config(args.config.as_deref())?;

    match args.command {
        Command::TestHardCpu { games, quiet, seed } => test_hard_cpu(&config, games, quiet, seed),
        Command::Plot { games, count, seed } => plot(&config, games, count, seed),
        Command::Bench { games, repeat } => bench(&config, games, repeat),
        Command::WatchHardGame { seed } => watch_hard_game(&config, seed),
        Command::SaveHardCpuLosses {
            out_dir,
            games,
            seed,
        } => save_hard_cpu_losses(&config, &out_dir, games, seed),
        Command::WatchGame { file } => {
            let record = GameRecord::load(&file)
                .with_context(|| format!("failed to load {}", file.display()))?;
            watch(&record)
        }
    }
}
