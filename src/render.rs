use anyhow::Result;
use crossterm::{
    style::{style, Attribute, Color, PrintStyledContent},
    QueueableCommand,
};

use std::io::{stdout, Write};

use crate::board::{Board, Cell};
use crate::player::Player;

const PLAYER_COLORS: [Color; 9] = [
    Color::Red,
    Color::Yellow,
    Color::Green,
    Color::Magenta,
    Color::Cyan,
    Color::White,
    Color::DarkRed,
    Color::DarkYellow,
    Color::DarkGreen,
];

pub fn player_color(player: Player) -> Color {
    PLAYER_COLORS[player.index() % PLAYER_COLORS.len()]
}

/// Banner line of `width` characters with `Connect K` centred in it
fn banner(k: usize, width: usize) -> String {
    banner_with(&format!(" Connect {} ", k), width)
}

fn banner_with(title: &str, width: usize) -> String {
    let left = width.saturating_sub(title.len()) / 2;
    let right = width.saturating_sub(title.len() + left);
    format!("{}{}{}", "=".repeat(left), title, "=".repeat(right))
}

/// The rules screen for a game of `players` players needing `k` in a row
pub fn rules(k: usize, players: usize) -> Vec<String> {
    let width = 41;
    vec![
        banner_with(" Rules ", width),
        format!("Connect {} is a {} player game.", k, players),
        "Players take turns dropping a token into".to_string(),
        "a column, where it falls to the lowest".to_string(),
        "free cell.".to_string(),
        format!("The first player to get {} tokens in a", k),
        "row horizontally, vertically or".to_string(),
        "diagonally wins. If the grid fills up".to_string(),
        "with no winner, the game is a draw.".to_string(),
        "=".repeat(width),
    ]
}

/// Draws the board to stdout, top row first, with 1-based column numbers
pub fn draw(board: &Board, k: usize) -> Result<()> {
    let mut stdout = stdout();
    let cell_width = board.columns().to_string().len();
    let width = board.columns() * (cell_width + 1) + 1;

    stdout.queue(PrintStyledContent(style(banner(k, width) + "\n")))?;
    let numbers: String = (1..=board.columns())
        .map(|column| format!(" {:>width$}", column, width = cell_width))
        .collect();
    stdout.queue(PrintStyledContent(style(numbers + "\n")))?;

    for row in (0..board.rows()).rev() {
        stdout.queue(PrintStyledContent(style(" ").on(Color::DarkBlue)))?;
        for column in 0..board.columns() {
            let token = match board.get(column, row) {
                Cell::Token(player) => style(format!("{:>width$}", player.glyph(), width = cell_width))
                    .attribute(Attribute::Bold)
                    .on(Color::DarkBlue)
                    .with(player_color(player)),
                Cell::Empty => style(format!("{:>width$}", "O", width = cell_width))
                    .on(Color::DarkBlue)
                    .with(Color::Blue),
            };
            stdout
                .queue(PrintStyledContent(token))?
                .queue(PrintStyledContent(style(" ").on(Color::DarkBlue)))?;
        }
        stdout.queue(PrintStyledContent(style("\n")))?;
    }
    stdout.queue(PrintStyledContent(style("=".repeat(width) + "\n")))?;
    stdout.flush()?;
    Ok(())
}

/// Clears the terminal and moves the cursor to the top left
pub fn clear_screen() -> Result<()> {
    let mut stdout = stdout();
    stdout
        .queue(crossterm::terminal::Clear(crossterm::terminal::ClearType::All))?
        .queue(crossterm::cursor::MoveTo(0, 0))?;
    stdout.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banner_is_centred() {
        assert_eq!(banner(4, 15), "== Connect 4 ==");
        assert_eq!(banner(4, 16), "== Connect 4 ===");
        assert_eq!(banner(12, 4), " Connect 12 ");
    }

    #[test]
    fn rules_mention_k_and_player_count() {
        let lines = rules(5, 3);
        assert_eq!(lines[0], "================= Rules =================");
        assert_eq!(lines[1], "Connect 5 is a 3 player game.");
        assert!(lines.iter().any(|line| line.contains("5 tokens in a")));
        assert!(lines.iter().all(|line| line.len() <= 41));
    }

    #[test]
    fn players_get_distinct_colors() {
        assert_ne!(player_color(Player::new(0)), player_color(Player::new(1)));
    }
}
