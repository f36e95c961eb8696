//! Line-oriented text console.
//!
//! Reads one command per line and answers with `= text` on success or
//! `? text` on failure. When the engine controls the side to move it replies
//! immediately after the human's move, so a single `play` prints both moves.
//!
//! ## Commands
//!
//! - `new [size] [color]` - Start a fresh game
//! - `play <vertex>` - Play a stone (or `pass`) for the side to move
//! - `pass` - Pass for the side to move
//! - `undo` - Take back the last move, including the engine's reply
//! - `resign` - The side to move resigns
//! - `genmove` - Let the engine play for the side to move
//! - `showboard` - Print the board
//! - `komi <value>` - Set komi
//! - `level <1-3>` - Set the engine strength
//! - `score` - Freeze the board and print the area score
//! - `dead <vertex>` - Toggle a group as dead while scoring
//! - `done` - Leave scoring and resume play
//! - `help` - List the commands
//! - `quit` - Exit

use std::io::{self, BufRead, Write};

use tracing::info;

use crate::board::{parse_point, Color};
use crate::config::{AiConfig, Level};
use crate::constants::max_game_moves;
use crate::rules::Move;
use crate::scoring::{ScoreOutcome, ScoreReport, Toggle};
use crate::session::{EngineMove, Session, SessionError};

const COMMANDS: &[&str] = &[
    "new",
    "play",
    "pass",
    "undo",
    "resign",
    "genmove",
    "showboard",
    "komi",
    "level",
    "score",
    "dead",
    "done",
    "help",
    "quit",
];

/// Which colors the engine plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum AiSide {
    None,
    Black,
    White,
    Both,
}

impl AiSide {
    pub fn controls(self, color: Color) -> bool {
        match self {
            AiSide::None => false,
            AiSide::Black => color == Color::Black,
            AiSide::White => color == Color::White,
            AiSide::Both => true,
        }
    }
}

pub struct Console {
    session: Session,
    ai: AiConfig,
    ai_side: AiSide,
}

impl Console {
    pub fn new(session: Session, ai: AiConfig, ai_side: AiSide) -> Self {
        Self {
            session,
            ai: ai.clamped(),
            ai_side,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn ai_config(&self) -> &AiConfig {
        &self.ai
    }

    /// Run the command loop on stdin and stdout.
    pub fn run(&mut self) -> io::Result<()> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        self.run_with(stdin.lock(), stdout.lock())
    }

    /// Run the command loop until `quit` or end of input.
    pub fn run_with<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> io::Result<()> {
        // The engine may own the first move.
        let opening = match self.engine_turns() {
            Ok(moves) => self.describe_engine_moves(&moves),
            Err(e) => format!("engine error: {e}"),
        };
        if !opening.is_empty() {
            writeln!(output, "{opening}")?;
        }
        writeln!(output, "{}", self.session.state().board)?;
        output.flush()?;

        for line in input.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let parts: Vec<&str> = line.split_whitespace().collect();
            let command = parts[0].to_lowercase();
            let args = &parts[1..];

            let (success, message) = self.execute(&command, args);
            let prefix = if success { '=' } else { '?' };
            writeln!(output, "{prefix} {message}")?;
            output.flush()?;

            if command == "quit" {
                break;
            }
        }
        Ok(())
    }

    /// Execute one command and return (success, response).
    pub fn execute(&mut self, command: &str, args: &[&str]) -> (bool, String) {
        match command {
            "help" => (true, COMMANDS.join(" ")),

            "quit" => (true, String::new()),

            "new" => {
                let size = match args.first().map(|s| s.parse::<usize>()) {
                    None => self.session.game().size(),
                    Some(Ok(size)) => size,
                    Some(Err(_)) => return (false, "invalid size".to_string()),
                };
                let first = match args.get(1).map(|s| parse_color(s)) {
                    None => Color::Black,
                    Some(Some(color)) => color,
                    Some(None) => return (false, "invalid color".to_string()),
                };
                if let Err(e) = self.session.new_game(size, first) {
                    return (false, e.to_string());
                }
                self.after_human_move(String::new())
            }

            "play" => {
                let Some(vertex) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                if vertex.eq_ignore_ascii_case("pass") {
                    return self.execute("pass", &[]);
                }
                if self.engine_to_move() {
                    return (false, "engine to move".to_string());
                }
                let size = self.session.game().size();
                let Some(p) = parse_point(vertex, size) else {
                    return (false, format!("invalid vertex: {vertex}"));
                };
                match self.session.attempt_move(p) {
                    Ok(outcome) => {
                        let mut text = format!("{} {}", outcome.color, Move::Place(p).name(size));
                        if outcome.captured > 0 {
                            text.push_str(&format!(" captures {}", outcome.captured));
                        }
                        self.after_human_move(text)
                    }
                    Err(e) => (false, e.to_string()),
                }
            }

            "pass" => {
                if self.engine_to_move() {
                    return (false, "engine to move".to_string());
                }
                let color = self.session.state().to_play;
                match self.session.pass() {
                    Ok(_) => self.after_human_move(format!("{color} passes")),
                    Err(e) => (false, e.to_string()),
                }
            }

            "undo" => self.undo(),

            "resign" => {
                let color = self.session.state().to_play;
                match self.session.resign(color) {
                    Ok(r) => (true, format!("{} resigns, {} wins", r.loser, r.winner)),
                    Err(e) => (false, e.to_string()),
                }
            }

            "genmove" => match self.engine_move() {
                Ok(m) => (true, self.describe_engine_moves(&[m])),
                Err(e) => (false, e.to_string()),
            },

            "showboard" => (true, self.show_board()),

            "komi" => {
                let Some(value) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                match value.parse::<f32>() {
                    Ok(komi) if komi.is_finite() => {
                        self.session.set_komi(komi);
                        (true, format!("komi {komi}"))
                    }
                    _ => (false, "invalid komi".to_string()),
                }
            }

            "level" => {
                let Some(value) = args.first() else {
                    return (false, format!("level {}", self.ai.level.number()));
                };
                match value.parse::<i64>() {
                    Ok(n) => {
                        self.ai.level = Level::from_number(n);
                        info!(level = self.ai.level.number(), "engine level changed");
                        (true, format!("level {}", self.ai.level.number()))
                    }
                    Err(_) => (false, "invalid level".to_string()),
                }
            }

            "score" => {
                if self.session.scoring().is_none() {
                    if let Err(e) = self.session.enter_scoring() {
                        return (false, e.to_string());
                    }
                }
                self.score_text()
            }

            "dead" => {
                let Some(vertex) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                let size = self.session.game().size();
                let Some(p) = parse_point(vertex, size) else {
                    return (false, format!("invalid vertex: {vertex}"));
                };
                match self.session.toggle_dead_group(p) {
                    Ok(Toggle::Ignored) => (false, format!("no stone at {vertex}")),
                    Ok(_) => self.score_text(),
                    Err(e) => (false, e.to_string()),
                }
            }

            "done" => match self.session.exit_scoring() {
                Ok(()) => (true, "scoring closed".to_string()),
                Err(e) => (false, e.to_string()),
            },

            _ => (false, format!("unknown command: {command}")),
        }
    }

    /// Let the engine answer, then report the human move and the replies.
    fn after_human_move(&mut self, mut text: String) -> (bool, String) {
        match self.engine_turns() {
            Ok(moves) => {
                let replies = self.describe_engine_moves(&moves);
                if !replies.is_empty() {
                    if !text.is_empty() {
                        text.push('\n');
                    }
                    text.push_str(&replies);
                }
                if self.session.game().is_end_of_play() {
                    text.push_str("\nboth players passed; use `score`");
                }
                (true, format!("{text}\n{}", self.session.state().board))
            }
            Err(e) => (false, format!("{text}\nengine error: {e}")),
        }
    }

    /// Play engine moves while the engine owns the side to move.
    fn engine_turns(&mut self) -> Result<Vec<EngineMove>, SessionError> {
        let limit = max_game_moves(self.session.game().size());
        let mut moves = Vec::new();
        loop {
            let game = self.session.game();
            if !self.ai_side.controls(game.to_play())
                || game.is_end_of_play()
                || game.history().len() > limit
                || self.session.scoring().is_some()
            {
                break;
            }
            moves.push(self.engine_move()?);
        }
        Ok(moves)
    }

    fn engine_move(&mut self) -> Result<EngineMove, SessionError> {
        self.session.request_ai_move(&self.ai)?;
        self.session.wait_ai()
    }

    /// Undo the last move, and the engine's move before it, so the human is
    /// to move again.
    fn undo(&mut self) -> (bool, String) {
        match self.session.undo() {
            Ok(Some(_)) => {}
            Ok(None) => return (false, "nothing to undo".to_string()),
            Err(e) => return (false, e.to_string()),
        }
        if self.ai_side == AiSide::Both || !self.engine_to_move() {
            return (true, self.show_board());
        }
        if let Err(e) = self.session.undo() {
            return (false, e.to_string());
        }

        // Undoing the engine's opening leaves it to move again.
        let replies = match self.engine_turns() {
            Ok(moves) => self.describe_engine_moves(&moves),
            Err(e) => return (false, format!("engine error: {e}")),
        };
        if replies.is_empty() {
            (true, self.show_board())
        } else {
            (true, format!("{replies}\n{}", self.show_board()))
        }
    }

    fn engine_to_move(&self) -> bool {
        self.ai_side.controls(self.session.state().to_play)
    }

    fn describe_engine_moves(&self, moves: &[EngineMove]) -> String {
        let size = self.session.game().size();
        moves
            .iter()
            .map(|m| {
                let mut line = format!("{} plays {}", m.color, m.mv.name(size));
                if m.captured > 0 {
                    line.push_str(&format!(" captures {}", m.captured));
                }
                line
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn show_board(&self) -> String {
        let state = self.session.state();
        format!(
            "{} to play, captures black {} white {}\n{}",
            state.to_play, state.captures.black, state.captures.white, state.board
        )
    }

    fn score_text(&self) -> (bool, String) {
        let report = match self.session.compute_score() {
            Ok(r) => r,
            Err(e) => return (false, e.to_string()),
        };
        let dead = self.session.scoring().map_or(0, |s| s.dead_stones().len());
        (true, format!("{}\ndead stones: {dead}", format_score(&report)))
    }
}

fn parse_color(s: &str) -> Option<Color> {
    match s.to_lowercase().as_str() {
        "b" | "black" => Some(Color::Black),
        "w" | "white" => Some(Color::White),
        _ => None,
    }
}

/// Two score lines plus the result, e.g. `W+7.5`.
pub fn format_score(report: &ScoreReport) -> String {
    let result = match report.outcome() {
        ScoreOutcome::Win {
            winner: Color::Black,
            margin,
        } => format!("B+{margin}"),
        ScoreOutcome::Win {
            winner: Color::White,
            margin,
        } => format!("W+{margin}"),
        ScoreOutcome::Draw => "draw".to_string(),
    };
    let b = report.side(Color::Black);
    let w = report.side(Color::White);
    format!(
        "black {} (stones {}, territory {})\nwhite {} (stones {}, territory {}, komi {})\nresult {result}",
        b.total, b.stones, b.territory, w.total, w.stones, w.territory, w.komi
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Game;

    fn console(ai_side: AiSide) -> Console {
        let session = Session::new(Game::new(9, Color::Black), 7.5, Some(3));
        Console::new(session, AiConfig::new(Level::Heuristic, 10, 5), ai_side)
    }

    #[test]
    fn test_help_lists_commands() {
        let mut c = console(AiSide::None);
        let (success, response) = c.execute("help", &[]);
        assert!(success);
        assert!(response.contains("genmove"));
        assert!(response.contains("dead"));
    }

    #[test]
    fn test_unknown_command() {
        let mut c = console(AiSide::None);
        let (success, response) = c.execute("boardsize", &["9"]);
        assert!(!success);
        assert!(response.contains("unknown command"));
    }

    #[test]
    fn test_play_and_engine_reply() {
        let mut c = console(AiSide::White);
        let (success, response) = c.execute("play", &["C3"]);
        assert!(success, "{response}");
        assert!(response.contains("black C3"));
        assert!(response.contains("white plays"));
        assert_eq!(c.session().state().to_play, Color::Black);
        assert_eq!(c.session().game().history().len(), 3);
    }

    #[test]
    fn test_illegal_play_reports_reason() {
        let mut c = console(AiSide::None);
        assert!(c.execute("play", &["E5"]).0);
        let (success, response) = c.execute("play", &["e5"]);
        assert!(!success);
        assert_eq!(response, "illegal move: point is not empty");

        let (success, _) = c.execute("play", &["Z9"]);
        assert!(!success);
        let (success, _) = c.execute("play", &[]);
        assert!(!success);
    }

    #[test]
    fn test_undo_takes_back_engine_reply() {
        let mut c = console(AiSide::White);
        assert!(c.execute("play", &["C3"]).0);
        let (success, _) = c.execute("undo", &[]);
        assert!(success);
        assert_eq!(c.session().game().history().len(), 1);
        assert_eq!(c.session().state().to_play, Color::Black);

        let (success, response) = c.execute("undo", &[]);
        assert!(!success);
        assert_eq!(response, "nothing to undo");
    }

    #[test]
    fn test_undoing_engine_opening_replays_it() {
        let mut c = console(AiSide::White);
        assert!(c.execute("new", &["9", "white"]).0);
        assert_eq!(c.session().game().history().len(), 2);

        let (success, response) = c.execute("undo", &[]);
        assert!(success, "{response}");
        assert!(response.contains("white plays E5"));
        assert_eq!(c.session().game().history().len(), 2);
        assert_eq!(c.session().state().to_play, Color::Black);

        assert!(c.execute("play", &["C3"]).0);
        assert_eq!(c.session().state().board.get((2, 6)), Some(Color::Black));
    }

    #[test]
    fn test_human_cannot_move_for_engine() {
        let mut game = Game::new(9, Color::Black);
        game.pass();
        game.pass();
        let session = Session::new(game, 7.5, Some(3));
        let mut c = Console::new(session, AiConfig::new(Level::Heuristic, 10, 5), AiSide::Black);

        let refused = (false, "engine to move".to_string());
        assert_eq!(c.execute("play", &["C3"]), refused);
        assert_eq!(c.execute("play", &["pass"]), refused);
        assert_eq!(c.execute("pass", &[]), refused);
        assert_eq!(c.session().game().history().len(), 3);
        assert_eq!(c.session().state().board.get((2, 6)), None);

        // The engine can still be asked to move.
        assert!(c.execute("genmove", &[]).0);
        assert_eq!(c.session().state().to_play, Color::White);
    }

    #[test]
    fn test_new_game_with_engine_first() {
        let mut c = console(AiSide::Black);
        let (success, response) = c.execute("new", &["13", "black"]);
        assert!(success, "{response}");
        assert_eq!(c.session().game().size(), 13);
        // The heuristic opens on the center point.
        assert!(response.contains("black plays G7"));
        assert_eq!(c.session().state().to_play, Color::White);

        assert!(!c.execute("new", &["nine"]).0);
        assert!(!c.execute("new", &["9", "red"]).0);
    }

    #[test]
    fn test_genmove_plays_for_side_to_move() {
        let mut c = console(AiSide::None);
        let (success, response) = c.execute("genmove", &[]);
        assert!(success);
        assert_eq!(response, "black plays E5");
        assert_eq!(c.session().state().to_play, Color::White);
    }

    #[test]
    fn test_level_and_komi() {
        let mut c = console(AiSide::None);
        assert_eq!(c.execute("level", &["1"]), (true, "level 1".to_string()));
        assert_eq!(c.ai_config().level, Level::Random);
        // Out of range clamps.
        assert_eq!(c.execute("level", &["9"]), (true, "level 3".to_string()));
        assert!(!c.execute("level", &["hard"]).0);

        assert!(c.execute("komi", &["6.5"]).0);
        assert_eq!(c.session().komi(), 6.5);
        assert!(!c.execute("komi", &["lots"]).0);
    }

    #[test]
    fn test_two_passes_then_score() {
        let mut c = console(AiSide::None);
        assert!(c.execute("play", &["E5"]).0);
        assert!(c.execute("pass", &[]).0);
        let (success, response) = c.execute("play", &["pass"]);
        assert!(success);
        assert!(response.contains("both players passed"));

        let (success, response) = c.execute("score", &[]);
        assert!(success);
        assert!(response.contains("black 81"));
        assert!(response.contains("result B+73.5"));

        // Play is paused until scoring is closed.
        assert!(!c.execute("play", &["A1"]).0);
        let (success, response) = c.execute("dead", &["E5"]);
        assert!(success);
        assert!(response.contains("result W+7.5"));
        assert!(response.contains("dead stones: 1"));
        assert!(!c.execute("dead", &["A1"]).0);

        assert!(c.execute("done", &[]).0);
        assert!(!c.execute("done", &[]).0);
        assert!(c.execute("play", &["A1"]).0);
    }

    #[test]
    fn test_resign() {
        let mut c = console(AiSide::None);
        let (success, response) = c.execute("resign", &[]);
        assert!(success);
        assert_eq!(response, "black resigns, white wins");
    }

    #[test]
    fn test_run_with_reads_until_quit() {
        let mut c = console(AiSide::None);
        let input = "# comment\n\nplay D4\nfoo\nquit\nplay E5\n".as_bytes();
        let mut output = Vec::new();
        c.run_with(input, &mut output).unwrap();

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("= black D4"));
        assert!(text.contains("? unknown command: foo"));
        // Nothing after quit is executed.
        assert_eq!(c.session().game().history().len(), 2);
    }

    #[test]
    fn test_engine_plays_itself_to_the_end() {
        let session = Session::new(Game::new(9, Color::Black), 7.5, Some(8));
        let mut c = Console::new(session, AiConfig::new(Level::Random, 10, 5), AiSide::Both);
        let mut output = Vec::new();
        c.run_with("quit\n".as_bytes(), &mut output).unwrap();
        let game = c.session().game();
        assert!(game.is_end_of_play() || game.history().len() > max_game_moves(9));
    }
}
