//! Weiqi: play Go against a simple computer opponent.
//!
//! ## Usage
//!
//! - `weiqi play` - Start the text console
//! - `weiqi selfplay` - Let the engine play itself and print the final score

use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use weiqi::board::Color;
use weiqi::config::{AiConfig, Level};
use weiqi::console::{format_score, AiSide, Console};
use weiqi::constants::{
    max_game_moves, DEFAULT_CANDIDATES, DEFAULT_KOMI, DEFAULT_PLAYOUTS, DEFAULT_SIZE,
};
use weiqi::game::Game;
use weiqi::session::Session;

/// Weiqi: a Go board with random, heuristic and Monte Carlo opponents
#[derive(Parser)]
#[command(name = "weiqi")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play from the terminal
    Play {
        #[command(flatten)]
        game: GameArgs,
        /// Colors played by the engine
        #[arg(long, value_enum, default_value_t = AiSide::White)]
        ai: AiSide,
    },
    /// Let the engine play both sides and print the result
    Selfplay {
        #[command(flatten)]
        game: GameArgs,
        /// Stop after this many moves (default: three times the board area)
        #[arg(long)]
        max_moves: Option<usize>,
    },
}

#[derive(Args, Clone)]
struct GameArgs {
    /// Board size (9, 13 or 19; other values snap to the nearest)
    #[arg(long, default_value_t = DEFAULT_SIZE)]
    size: usize,
    /// Color that moves first
    #[arg(long, value_enum, default_value_t = FirstColor::Black)]
    first: FirstColor,
    /// Engine strength
    #[arg(long, value_enum, default_value_t = Level::Heuristic)]
    level: Level,
    /// Playouts per candidate move (Monte Carlo)
    #[arg(long, default_value_t = DEFAULT_PLAYOUTS)]
    playouts: usize,
    /// Candidate moves searched (Monte Carlo)
    #[arg(long, default_value_t = DEFAULT_CANDIDATES)]
    candidates: usize,
    #[arg(long, default_value_t = DEFAULT_KOMI)]
    komi: f32,
    /// Seed for reproducible engine play
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Clone, Copy, ValueEnum)]
enum FirstColor {
    Black,
    White,
}

impl From<FirstColor> for Color {
    fn from(c: FirstColor) -> Self {
        match c {
            FirstColor::Black => Color::Black,
            FirstColor::White => Color::White,
        }
    }
}

impl GameArgs {
    fn session(&self) -> Result<Session> {
        if !self.komi.is_finite() {
            bail!("komi must be a finite number");
        }
        let game = Game::new(self.size, self.first.into());
        Ok(Session::new(game, self.komi, self.seed))
    }

    fn ai_config(&self) -> AiConfig {
        AiConfig::new(self.level, self.playouts, self.candidates)
    }
}

fn main() -> Result<()> {
    // Logs go to stderr so the console's stdout stays clean.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Play { game, ai }) => {
            let mut console = Console::new(game.session()?, game.ai_config(), ai);
            console.run()?;
        }
        Some(Commands::Selfplay { game, max_moves }) => run_selfplay(&game, max_moves)?,
        None => {
            let mut console = Console::new(Session::default(), AiConfig::default(), AiSide::White);
            console.run()?;
        }
    }
    Ok(())
}

fn run_selfplay(args: &GameArgs, max_moves: Option<usize>) -> Result<()> {
    let mut session = args.session()?;
    let config = args.ai_config();
    let size = session.game().size();
    let limit = max_moves.unwrap_or_else(|| max_game_moves(size));

    println!(
        "Self-play on {size}x{size}, level {}, komi {}\n",
        config.level.number(),
        session.komi()
    );

    let mut moves = 0;
    while !session.game().is_end_of_play() && moves < limit {
        session.request_ai_move(&config)?;
        let played = session.wait_ai()?;
        moves += 1;
        println!("{:>3}. {} {}", moves, played.color, played.mv.name(size));
    }
    if !session.game().is_end_of_play() {
        info!(moves, "move limit reached");
        println!("\nStopped after {moves} moves");
    }

    println!("\n{}", session.state().board);
    session.enter_scoring()?;
    println!("{}", format_score(&session.compute_score()?));
    Ok(())
}
