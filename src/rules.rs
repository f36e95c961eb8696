//! Move legality and execution.
//!
//! Legality is always decided on a hypothetical copy of the board: the stone
//! is placed, opponent groups left without liberties are removed, and only
//! then are suicide and ko judged. Checking never mutates the board passed in.

use thiserror::Error;

use crate::board::{point_name, Board, Color, Point};
use crate::group;

/// A move: a stone placement or a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    Place(Point),
    Pass,
}

impl Move {
    pub fn is_pass(self) -> bool {
        matches!(self, Move::Pass)
    }

    /// Human-facing name: a point such as `D4`, or `pass`.
    pub fn name(self, size: usize) -> String {
        match self {
            Move::Place(p) => point_name(p, size),
            Move::Pass => "pass".to_string(),
        }
    }
}

/// Why a placement was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IllegalMove {
    #[error("point is off the board")]
    OutOfRange,
    #[error("point is not empty")]
    Occupied,
    #[error("suicide")]
    Suicide,
    #[error("retakes ko")]
    Ko,
}

/// Stones captured by each color.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Captures {
    pub black: u32,
    pub white: u32,
}

impl Captures {
    pub fn get(&self, color: Color) -> u32 {
        match color {
            Color::Black => self.black,
            Color::White => self.white,
        }
    }

    pub fn add(&mut self, color: Color, stones: u32) {
        match color {
            Color::Black => self.black += stones,
            Color::White => self.white += stones,
        }
    }
}

/// The board that would result from a legal placement.
#[derive(Debug, Clone)]
pub struct Placement {
    pub board: Board,
    pub captured: usize,
}

/// Place `color` at `p` and remove adjacent opponent groups left without
/// liberties. Returns the number of stones removed.
///
/// The caller guarantees `p` is an empty point on the board.
fn place_and_capture(board: &mut Board, p: Point, color: Color) -> usize {
    board.set(p, Some(color));
    let opp = color.opponent();
    let mut captured = 0;
    for n in board.neighbors(p) {
        if board.get(n) != Some(opp) {
            continue;
        }
        // A group bordering the stone twice is already gone on the second visit.
        if let Some(g) = group::analyze(board, n) {
            if g.liberty_count() == 0 {
                captured += g.size();
                group::remove(board, &g);
            }
        }
    }
    captured
}

/// Evaluate a placement against `board`.
///
/// `ko` is the position the move may not recreate (the board two plies back in
/// live play). On success the resulting board and capture count are returned.
pub fn check_move(
    board: &Board,
    p: Point,
    color: Color,
    ko: Option<&Board>,
) -> Result<Placement, IllegalMove> {
    if !board.contains(p) {
        return Err(IllegalMove::OutOfRange);
    }
    if board.get(p).is_some() {
        return Err(IllegalMove::Occupied);
    }

    let mut next = board.clone();
    let captured = place_and_capture(&mut next, p, color);

    if captured == 0 {
        let own = group::analyze(&next, p).map_or(0, |g| g.liberty_count());
        if own == 0 {
            return Err(IllegalMove::Suicide);
        }
    }

    if ko.is_some_and(|k| *k == next) {
        return Err(IllegalMove::Ko);
    }

    Ok(Placement {
        board: next,
        captured,
    })
}

pub fn is_legal(board: &Board, p: Point, color: Color, ko: Option<&Board>) -> bool {
    check_move(board, p, color, ko).is_ok()
}

/// Commit a placement to `board`, crediting captures to `color`.
///
/// Legality is not re-checked; call [`check_move`] first. History and turn
/// order are the caller's responsibility.
pub fn apply(board: &mut Board, captures: &mut Captures, p: Point, color: Color) -> usize {
    let captured = place_and_capture(board, p, color);
    captures.add(color, captured as u32);
    captured
}

/// All legal placements for `color`, in row-major order.
pub fn legal_placements(board: &Board, color: Color, ko: Option<&Board>) -> Vec<Point> {
    board
        .points()
        .filter(|&p| board.get(p).is_none() && is_legal(board, p, color, ko))
        .collect()
}
