//! Game state and move history.
//!
//! A [`Game`] keeps the live [`GameState`] plus one full snapshot per applied
//! move, starting with the empty board. Undo restores snapshots wholesale and
//! simple ko looks back exactly two plies.

use tracing::info;

use crate::board::{point_name, Board, Color, Point};
use crate::config::normalize_board_size;
use crate::rules::{self, Captures, IllegalMove, Move};

/// Everything needed to resume play from a position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    pub board: Board,
    pub to_play: Color,
    pub captures: Captures,
    pub last_move: Option<Move>,
    pub consecutive_passes: u32,
}

impl GameState {
    fn new(size: usize, first: Color) -> Self {
        Self {
            board: Board::new(size),
            to_play: first,
            captures: Captures::default(),
            last_move: None,
            consecutive_passes: 0,
        }
    }
}

/// Result of an accepted placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOutcome {
    pub color: Color,
    pub point: Point,
    pub captured: usize,
}

/// A resignation. Purely informational: the board is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resignation {
    pub loser: Color,
    pub winner: Color,
}

/// Frozen copy of a position handed to the move-selection strategies.
#[derive(Debug, Clone)]
pub struct SearchRoot {
    pub board: Board,
    pub captures: Captures,
    pub to_play: Color,
    /// Position the next placement may not recreate.
    pub ko: Option<Board>,
    pub last_move: Option<Move>,
}

impl SearchRoot {
    /// Root for an arbitrary board with no history behind it.
    pub fn from_board(board: Board, to_play: Color) -> Self {
        Self {
            board,
            captures: Captures::default(),
            to_play,
            ko: None,
            last_move: None,
        }
    }

    pub fn legal_placements(&self) -> Vec<Point> {
        rules::legal_placements(&self.board, self.to_play, self.ko.as_ref())
    }
}

pub struct Game {
    state: GameState,
    history: Vec<GameState>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new(crate::constants::DEFAULT_SIZE, Color::Black)
    }
}

impl Game {
    /// Start a game on an empty board. Unsupported sizes are clamped to the
    /// nearest of 9, 13 and 19.
    pub fn new(size: usize, first: Color) -> Self {
        let size = normalize_board_size(size);
        let state = GameState::new(size, first);
        info!(size, first = %first, "new game");
        Self {
            history: vec![state.clone()],
            state,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn board(&self) -> &Board {
        &self.state.board
    }

    pub fn size(&self) -> usize {
        self.state.board.size()
    }

    pub fn to_play(&self) -> Color {
        self.state.to_play
    }

    pub fn history(&self) -> &[GameState] {
        &self.history
    }

    /// Both players passed in a row; scoring may begin.
    pub fn is_end_of_play(&self) -> bool {
        self.state.consecutive_passes >= 2
    }

    /// The board two plies back, which the next placement may not recreate.
    pub fn ko_reference(&self) -> Option<&Board> {
        let len = self.history.len();
        if len >= 2 {
            Some(&self.history[len - 2].board)
        } else {
            None
        }
    }

    pub fn check_move(&self, p: Point) -> Result<(), IllegalMove> {
        rules::check_move(&self.state.board, p, self.state.to_play, self.ko_reference())
            .map(|_| ())
    }

    pub fn is_legal(&self, p: Point) -> bool {
        self.check_move(p).is_ok()
    }

    /// Legal placements for the side to move in row-major order, then pass.
    pub fn legal_moves(&self) -> Vec<Move> {
        let mut moves: Vec<Move> =
            rules::legal_placements(&self.state.board, self.state.to_play, self.ko_reference())
                .into_iter()
                .map(Move::Place)
                .collect();
        moves.push(Move::Pass);
        moves
    }

    /// Place a stone for the side to move.
    ///
    /// Illegal moves leave the game untouched and report the reason.
    pub fn attempt_move(&mut self, p: Point) -> Result<MoveOutcome, IllegalMove> {
        let color = self.state.to_play;
        let size = self.size();
        if let Err(reason) = self.check_move(p) {
            info!(color = %color, point = %point_name(p, size), %reason, "illegal move");
            return Err(reason);
        }

        let captured = rules::apply(&mut self.state.board, &mut self.state.captures, p, color);
        self.state.last_move = Some(Move::Place(p));
        self.state.consecutive_passes = 0;
        self.state.to_play = color.opponent();
        self.history.push(self.state.clone());

        info!(color = %color, point = %point_name(p, size), captured, "move");
        Ok(MoveOutcome {
            color,
            point: p,
            captured,
        })
    }

    pub fn pass(&mut self) -> &GameState {
        let color = self.state.to_play;
        self.state.last_move = Some(Move::Pass);
        self.state.consecutive_passes += 1;
        self.state.to_play = color.opponent();
        self.history.push(self.state.clone());

        info!(color = %color, passes = self.state.consecutive_passes, "pass");
        if self.is_end_of_play() {
            info!("both players passed; scoring may begin");
        }
        &self.state
    }

    /// Apply a placement or pass for the side to move.
    pub fn play(&mut self, mv: Move) -> Result<Option<MoveOutcome>, IllegalMove> {
        match mv {
            Move::Place(p) => self.attempt_move(p).map(Some),
            Move::Pass => {
                self.pass();
                Ok(None)
            }
        }
    }

    /// Return to the position before the last move.
    ///
    /// Returns `None` (and changes nothing) at the start of the game.
    pub fn undo(&mut self) -> Option<&GameState> {
        if self.history.len() <= 1 {
            return None;
        }
        self.history.pop();
        let previous = self.history.last()?;
        self.state = previous.clone();
        info!(moves = self.history.len() - 1, "undo");
        Some(&self.state)
    }

    pub fn resign(&self, color: Color) -> Resignation {
        info!(color = %color, "resigned");
        Resignation {
            loser: color,
            winner: color.opponent(),
        }
    }

    /// Frozen copy of the current position for move selection.
    pub fn search_root(&self) -> SearchRoot {
        SearchRoot {
            board: self.state.board.clone(),
            captures: self.state.captures,
            to_play: self.state.to_play,
            ko: self.ko_reference().cloned(),
            last_move: self.state.last_move,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_game() {
        let game = Game::new(13, Color::White);
        assert_eq!(game.size(), 13);
        assert_eq!(game.to_play(), Color::White);
        assert_eq!(game.history().len(), 1);
        assert!(game.ko_reference().is_none());
        assert_eq!(game.legal_moves().len(), 13 * 13 + 1);
    }

    #[test]
    fn test_unsupported_size_is_clamped() {
        assert_eq!(Game::new(7, Color::Black).size(), 9);
        assert_eq!(Game::new(21, Color::Black).size(), 19);
    }

    #[test]
    fn test_turn_alternates_and_passes_count() {
        let mut game = Game::default();
        game.attempt_move((2, 2)).unwrap();
        assert_eq!(game.to_play(), Color::White);
        game.pass();
        assert_eq!(game.to_play(), Color::Black);
        assert_eq!(game.state().consecutive_passes, 1);
        assert!(!game.is_end_of_play());
        game.pass();
        assert!(game.is_end_of_play());
        game.attempt_move((3, 3)).unwrap();
        assert_eq!(game.state().consecutive_passes, 0);
        assert_eq!(game.history().len(), 5);
    }

    #[test]
    fn test_rejected_move_changes_nothing() {
        let mut game = Game::default();
        game.attempt_move((4, 4)).unwrap();
        let before = game.state().clone();
        assert_eq!(game.attempt_move((4, 4)), Err(IllegalMove::Occupied));
        assert_eq!(game.attempt_move((40, 4)), Err(IllegalMove::OutOfRange));
        assert_eq!(game.state(), &before);
        assert_eq!(game.history().len(), 2);
    }

    #[test]
    fn test_undo_at_start_is_noop() {
        let mut game = Game::default();
        assert!(game.undo().is_none());
        assert_eq!(game.history().len(), 1);
    }

    #[test]
    fn test_resign_does_not_touch_board() {
        let mut game = Game::default();
        game.attempt_move((0, 0)).unwrap();
        let before = game.state().clone();
        let r = game.resign(Color::White);
        assert_eq!(r.winner, Color::Black);
        assert_eq!(game.state(), &before);
    }

    #[test]
    fn test_search_root_is_a_copy() {
        let mut game = Game::default();
        game.attempt_move((1, 1)).unwrap();
        let root = game.search_root();
        game.attempt_move((2, 2)).unwrap();
        assert_eq!(root.board.get((2, 2)), None);
        assert_eq!(root.to_play, Color::White);
        assert_eq!(root.ko.as_ref(), Some(&Board::new(9)));
    }
}
