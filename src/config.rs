//! Runtime configuration for games and computer opponents.
//!
//! Out-of-range values are clamped to the nearest valid bound rather than
//! rejected; every clamp is reported with a `warn!`.

use tracing::warn;

use crate::constants::*;

/// Computer opponent strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Level {
    /// Uniformly random legal placements.
    Random,
    /// Greedy one-ply heuristic.
    Heuristic,
    /// Flat Monte Carlo over the best heuristic candidates.
    MonteCarlo,
}

impl Level {
    /// Map a numeric level (1–3) onto a strategy, clamping out-of-range input.
    pub fn from_number(n: i64) -> Self {
        let clamped = n.clamp(1, 3);
        if clamped != n {
            warn!(requested = n, used = clamped, "AI level out of range");
        }
        match clamped {
            1 => Level::Random,
            2 => Level::Heuristic,
            _ => Level::MonteCarlo,
        }
    }

    pub fn number(self) -> u8 {
        match self {
            Level::Random => 1,
            Level::Heuristic => 2,
            Level::MonteCarlo => 3,
        }
    }
}

/// Weights and thresholds of the heuristic move scorer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeuristicParams {
    pub capture_weight: f64,
    pub liberty_weight: f64,
    pub own_adjacent_weight: f64,
    pub opponent_adjacent_weight: f64,
    pub center_distance_weight: f64,
    pub pass_base: f64,
    /// Empty-point ratio below which the game counts as late.
    pub late_game_ratio: f64,
    pub pass_late_slope: f64,
    pub pass_few_moves_bonus: f64,
    pub pass_some_moves_bonus: f64,
    pub pass_opponent_passed_bonus: f64,
    /// Late-game pass unless the best placement reaches this score.
    pub pass_threshold: f64,
}

impl Default for HeuristicParams {
    fn default() -> Self {
        Self {
            capture_weight: CAPTURE_WEIGHT,
            liberty_weight: LIBERTY_WEIGHT,
            own_adjacent_weight: OWN_ADJACENT_WEIGHT,
            opponent_adjacent_weight: OPPONENT_ADJACENT_WEIGHT,
            center_distance_weight: CENTER_DISTANCE_WEIGHT,
            pass_base: PASS_BASE,
            late_game_ratio: LATE_GAME_RATIO,
            pass_late_slope: PASS_LATE_SLOPE,
            pass_few_moves_bonus: PASS_FEW_MOVES_BONUS,
            pass_some_moves_bonus: PASS_SOME_MOVES_BONUS,
            pass_opponent_passed_bonus: PASS_OPPONENT_PASSED_BONUS,
            pass_threshold: PASS_THRESHOLD,
        }
    }
}

/// Settings for one AI move request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AiConfig {
    pub level: Level,
    /// Playouts per Monte Carlo candidate.
    pub playouts: usize,
    /// Number of heuristic-ranked candidates Monte Carlo evaluates.
    pub candidate_limit: usize,
    pub heuristic: HeuristicParams,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            level: Level::Heuristic,
            playouts: DEFAULT_PLAYOUTS,
            candidate_limit: DEFAULT_CANDIDATES,
            heuristic: HeuristicParams::default(),
        }
    }
}

impl AiConfig {
    pub fn new(level: Level, playouts: usize, candidate_limit: usize) -> Self {
        Self {
            level,
            playouts: clamp_playouts(playouts),
            candidate_limit: clamp_candidates(candidate_limit),
            heuristic: HeuristicParams::default(),
        }
    }

    /// Copy of this config with counts forced into their valid ranges.
    pub fn clamped(self) -> Self {
        Self {
            playouts: clamp_playouts(self.playouts),
            candidate_limit: clamp_candidates(self.candidate_limit),
            ..self
        }
    }
}

fn clamp_reported(name: &'static str, value: usize, lo: usize, hi: usize) -> usize {
    let clamped = value.clamp(lo, hi);
    if clamped != value {
        warn!(setting = name, requested = value, used = clamped, "value clamped");
    }
    clamped
}

pub fn clamp_playouts(n: usize) -> usize {
    clamp_reported("playouts", n, MIN_PLAYOUTS, MAX_PLAYOUTS)
}

pub fn clamp_candidates(n: usize) -> usize {
    clamp_reported("candidates", n, MIN_CANDIDATES, MAX_CANDIDATES)
}

/// Nearest supported board size; ties go to the smaller size.
pub fn normalize_board_size(size: usize) -> usize {
    let nearest = SUPPORTED_SIZES
        .iter()
        .copied()
        .min_by_key(|&s| s.abs_diff(size))
        .unwrap_or(DEFAULT_SIZE);
    if nearest != size {
        warn!(requested = size, used = nearest, "unsupported board size");
    }
    nearest
}
