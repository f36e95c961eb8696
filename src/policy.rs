//! Move-selection strategies for the computer opponent.
//!
//! Every strategy works on a [`SearchRoot`], an owned copy of the position,
//! so choosing a move can never disturb the live game.

use tracing::debug;

use crate::config::{AiConfig, HeuristicParams, Level};
use crate::game::SearchRoot;
use crate::heuristic;
use crate::montecarlo::MonteCarloStrategy;
use crate::rules::Move;

pub trait Strategy: Send + Sync {
    fn choose_move(&self, root: &SearchRoot, rng: &mut fastrand::Rng) -> Move;

    fn name(&self) -> &'static str;
}

/// Level 1: any legal placement, uniformly; pass only when none exists.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomStrategy;

impl Strategy for RandomStrategy {
    fn choose_move(&self, root: &SearchRoot, rng: &mut fastrand::Rng) -> Move {
        let moves = root.legal_placements();
        debug!(legal = moves.len(), "random move");
        if moves.is_empty() {
            return Move::Pass;
        }
        Move::Place(moves[rng.usize(..moves.len())])
    }

    fn name(&self) -> &'static str {
        "random"
    }
}

/// Level 2: the best move under the one-ply heuristic.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicStrategy {
    pub params: HeuristicParams,
}

impl Strategy for HeuristicStrategy {
    fn choose_move(&self, root: &SearchRoot, _rng: &mut fastrand::Rng) -> Move {
        heuristic::select(root, &self.params)
    }

    fn name(&self) -> &'static str {
        "heuristic"
    }
}

/// Build the strategy for a configured level. Counts are clamped first.
pub fn strategy_for(config: &AiConfig) -> Box<dyn Strategy> {
    let config = config.clamped();
    match config.level {
        Level::Random => Box::new(RandomStrategy),
        Level::Heuristic => Box::new(HeuristicStrategy {
            params: config.heuristic,
        }),
        Level::MonteCarlo => Box::new(MonteCarloStrategy {
            params: config.heuristic,
            playouts: config.playouts,
            candidate_limit: config.candidate_limit,
        }),
    }
}
