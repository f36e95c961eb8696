//! Monte Carlo playouts (random game simulation).
//!
//! A playout applies a seed move, then lets both sides play random legal
//! moves until two consecutive passes or a size-dependent step cap. The
//! result is a proxy score: stones on the board plus captures, with no
//! territory counting.

use crate::board::{Board, Color, Point};
use crate::constants::{playout_step_cap, PLAYOUT_SCAN_CAP};
use crate::rules::{self, Captures, Move};

/// Reusable buffers for a sequence of playouts from the same root.
pub struct Playout {
    board: Board,
    /// Position before the most recent simulated move; the ko reference.
    previous: Board,
    empties: Vec<Point>,
    moves: usize,
}

impl Playout {
    pub fn new(size: usize) -> Self {
        Self {
            board: Board::new(size),
            previous: Board::new(size),
            empties: Vec::with_capacity(size * size),
            moves: 0,
        }
    }

    /// Placements simulated after the seed move in the last run.
    pub fn moves(&self) -> usize {
        self.moves
    }

    /// Simulate one game from `root` after `color` plays `first`.
    ///
    /// Returns `color`'s margin: (own stones + own captures) minus the
    /// opponent's.
    pub fn run(
        &mut self,
        root: &Board,
        captures: Captures,
        color: Color,
        first: Move,
        rng: &mut fastrand::Rng,
    ) -> i64 {
        self.board.clone_from(root);
        let mut caps = captures;
        let mut passes = 0;
        self.moves = 0;

        match first {
            Move::Place(p) => {
                rules::apply(&mut self.board, &mut caps, p, color);
            }
            Move::Pass => passes = 1,
        }
        self.previous.clone_from(&self.board);

        let mut player = color.opponent();
        for _ in 0..playout_step_cap(root.size()) {
            match self.random_legal_move(player, rng) {
                Some(p) => {
                    passes = 0;
                    self.previous.clone_from(&self.board);
                    rules::apply(&mut self.board, &mut caps, p, player);
                    self.moves += 1;
                }
                None => {
                    passes += 1;
                    if passes >= 2 {
                        break;
                    }
                    self.previous.clone_from(&self.board);
                }
            }
            player = player.opponent();
        }

        let score = |c: Color| self.board.count_stones(c) as i64 + caps.get(c) as i64;
        score(color) - score(color.opponent())
    }

    /// Shuffle the empty points and return the first legal one among at most
    /// [`PLAYOUT_SCAN_CAP`] candidates.
    fn random_legal_move(&mut self, color: Color, rng: &mut fastrand::Rng) -> Option<Point> {
        self.board.empty_points_into(&mut self.empties);
        rng.shuffle(&mut self.empties);
        self.empties
            .iter()
            .take(PLAYOUT_SCAN_CAP)
            .copied()
            .find(|&p| rules::is_legal(&self.board, p, color, Some(&self.previous)))
    }
}

/// Run a single playout with fresh buffers.
pub fn playout(
    root: &Board,
    captures: Captures,
    color: Color,
    first: Move,
    rng: &mut fastrand::Rng,
) -> i64 {
    Playout::new(root.size()).run(root, captures, color, first, rng)
}
