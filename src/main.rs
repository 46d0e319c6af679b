use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

use std::io::{stdin, stdout, Stdin, Write};
use std::path::PathBuf;

use connectk_ai::player::all_players;
use connectk_ai::render::{clear_screen, draw, rules};
use connectk_ai::*;

/// Play Connect K in the terminal against people or CPUs
#[derive(Parser, Debug)]
#[command(name = "connectk", version, about)]
struct Args {
    /// TOML file with rows, columns, k and players
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    rows: Option<usize>,

    #[arg(long)]
    columns: Option<usize>,

    /// Tokens in a row needed to win
    #[arg(short)]
    k: Option<usize>,

    #[arg(long)]
    players: Option<usize>,

    /// Seed for the easy and medium CPUs
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Copy, Clone, Debug)]
enum Controller {
    Human,
    Cpu(Difficulty),
}

fn game_config(args: &Args) -> Result<GameConfig> {
    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => GameConfig::default(),
    };
    config.rows = args.rows.unwrap_or(config.rows);
    config.columns = args.columns.unwrap_or(config.columns);
    config.k = args.k.unwrap_or(config.k);
    config.players = args.players.unwrap_or(config.players);
    config.validate()?;
    Ok(config)
}

fn prompt(stdin: &Stdin, message: &str) -> Result<String> {
    print!("{}", message);
    stdout().flush()?;
    let mut buffer = String::new();
    if stdin.read_line(&mut buffer)? == 0 {
        anyhow::bail!("stdin closed");
    }
    Ok(buffer.trim().to_string())
}

fn choose_controller(stdin: &Stdin, player: Player) -> Result<Controller> {
    loop {
        let answer = prompt(
            stdin,
            &format!("Who controls player {}? human/easy/medium/hard: ", player),
        )?;
        if answer.eq_ignore_ascii_case("human") || answer.eq_ignore_ascii_case("h") {
            return Ok(Controller::Human);
        }
        match answer.parse::<Difficulty>() {
            Ok(difficulty) => return Ok(Controller::Cpu(difficulty)),
            Err(err) => println!("{}", err),
        }
    }
}

/// Asks until the human enters a column that still has room
fn human_move(stdin: &Stdin, board: &Board, player: Player) -> Result<usize> {
    loop {
        let input = prompt(stdin, &format!("Player {} move input > ", player))?;
        let column = match input.parse::<usize>() {
            Ok(column) if (1..=board.columns()).contains(&column) => column - 1,
            _ => {
                println!("Invalid column: {}, expected 1 to {}", input, board.columns());
                continue;
            }
        };
        if board.playable(column) {
            return Ok(column);
        }
        println!("Column {} is full", column + 1);
    }
}

fn play(stdin: &Stdin, config: &GameConfig, rng: &mut StdRng) -> Result<()> {
    let controllers = all_players(config.players)
        .map(|player| choose_controller(stdin, player))
        .collect::<Result<Vec<_>>>()?;
    let all_cpu = controllers
        .iter()
        .all(|controller| matches!(controller, Controller::Cpu(_)));

    let mut board = Board::new(config.rows, config.columns);
    let mut player = Player::FIRST;
    let mut recent: Vec<String> = Vec::new();

    // game loop
    loop {
        clear_screen()?;
        draw(&board, config.k)?;
        for line in recent.iter() {
            println!("{}", line);
        }

        match board.state(config.k) {
            GameState::Playing => {
                let column = match controllers[player.index()] {
                    Controller::Human => human_move(stdin, &board, player)?,
                    Controller::Cpu(difficulty) => {
                        println!("Player {} ({}) is thinking...", player, difficulty);
                        stdout().flush()?;
                        // slow down play if nobody is at the keyboard
                        if all_cpu {
                            std::thread::sleep(std::time::Duration::from_millis(800));
                        }
                        difficulty.choose(&board, player, config.players, config.k, rng)?
                    }
                };

                board.play(column, player)?;
                recent.push(format!("Player {} played column {}", player, column + 1));
                if recent.len() > config.players {
                    recent.remove(0);
                }
                player = player.next(config.players);
            }

            // end states
            GameState::Won(winner) => {
                println!("Player {} wins!", winner);
                return Ok(());
            }
            GameState::Draw => {
                println!("Draw!");
                return Ok(());
            }
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    let config = game_config(&args)?;
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let stdin = stdin();

    // main menu
    loop {
        clear_screen()?;
        println!("=============== Main Menu ===============");
        println!(
            "Welcome to Connect {}: {} players on a {}x{} board",
            config.k, config.players, config.columns, config.rows
        );
        println!("1. View rules");
        println!("2. Play a game");
        println!("3. Exit");
        println!("=========================================");

        loop {
            match prompt(&stdin, "> ")?.as_str() {
                "1" => {
                    for line in rules(config.k, config.players) {
                        println!("{}", line);
                    }
                    break;
                }
                "2" => {
                    play(&stdin, &config, &mut rng)?;
                    break;
                }
                "3" => return Ok(()),
                _ => println!("Invalid selection"),
            }
        }
        prompt(&stdin, "Press enter to return to the menu ")?;
    }
}
