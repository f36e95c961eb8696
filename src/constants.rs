//! Constants for board sizes, playout limits, and AI parameters.
//!
//! Everything tunable at runtime lives in [`crate::config`]; this module only
//! holds the defaults and the hard bounds those values are clamped to.

// =============================================================================
// Board Geometry
// =============================================================================

/// Board sizes a game can be played on.
pub const SUPPORTED_SIZES: [usize; 3] = [9, 13, 19];

/// Board size used when none is given.
pub const DEFAULT_SIZE: usize = 9;

/// Komi added to White's area score.
pub const DEFAULT_KOMI: f32 = 7.5;

// =============================================================================
// Monte Carlo Parameters
// =============================================================================

/// Default number of playouts per candidate move.
pub const DEFAULT_PLAYOUTS: usize = 250;

/// Bounds for playouts per candidate.
pub const MIN_PLAYOUTS: usize = 10;
pub const MAX_PLAYOUTS: usize = 2000;

/// Default number of heuristic-ranked candidates searched by Monte Carlo.
pub const DEFAULT_CANDIDATES: usize = 25;

/// Bounds for the candidate limit.
pub const MIN_CANDIDATES: usize = 5;
pub const MAX_CANDIDATES: usize = 80;

/// Maximum number of shuffled empty points tested per playout turn before
/// the simulated player passes.
pub const PLAYOUT_SCAN_CAP: usize = 120;

/// Number of simulated turns after the seed move, by board size.
pub fn playout_step_cap(size: usize) -> usize {
    if size <= 9 {
        60
    } else if size <= 13 {
        110
    } else {
        160
    }
}

// =============================================================================
// Heuristic Weights
// =============================================================================

/// Score per captured stone.
pub const CAPTURE_WEIGHT: f64 = 100.0;

/// Score per liberty of the placed stone's group after the move.
pub const LIBERTY_WEIGHT: f64 = 6.0;

/// Score per orthogonally adjacent friendly stone.
pub const OWN_ADJACENT_WEIGHT: f64 = 2.0;

/// Score per orthogonally adjacent opponent stone.
pub const OPPONENT_ADJACENT_WEIGHT: f64 = 1.0;

/// Penalty per unit of Manhattan distance from the board center.
pub const CENTER_DISTANCE_WEIGHT: f64 = 0.6;

// =============================================================================
// Pass Heuristic
// =============================================================================

/// Base score of passing.
pub const PASS_BASE: f64 = -5.0;

/// Empty-point ratio below which the board counts as late game.
pub const LATE_GAME_RATIO: f64 = 0.45;

/// Pass bonus per unit the empty ratio falls below [`LATE_GAME_RATIO`].
pub const PASS_LATE_SLOPE: f64 = 20.0;

/// Pass bonus when six or fewer placements are legal.
pub const PASS_FEW_MOVES_BONUS: f64 = 6.0;

/// Pass bonus when seven to twelve placements are legal.
pub const PASS_SOME_MOVES_BONUS: f64 = 3.0;

/// Pass bonus when the opponent has just passed.
pub const PASS_OPPONENT_PASSED_BONUS: f64 = 4.0;

/// In the late game, pass unless some placement scores at least this much.
pub const PASS_THRESHOLD: f64 = 1.0;

/// Moves after which an engine-only game is stopped (three times the board
/// area allows for captures and replays).
pub fn max_game_moves(size: usize) -> usize {
    size * size * 3
}
