//! Flat Monte Carlo move selection.
//!
//! The best heuristic candidates (plus pass, always) are each evaluated by an
//! independent batch of random playouts. There is no tree: the candidate with
//! the most winning playouts is played.
//!
//! Candidates are evaluated in parallel. Each gets its own RNG, seeded in
//! candidate order from the caller's RNG, so a seeded search is reproducible
//! regardless of thread scheduling.

use rayon::prelude::*;
use tracing::debug;

use crate::config::HeuristicParams;
use crate::game::SearchRoot;
use crate::heuristic::{self, ScoredMove};
use crate::playout::Playout;
use crate::policy::Strategy;
use crate::rules::Move;

/// Level 3 strategy.
#[derive(Debug, Clone, Copy)]
pub struct MonteCarloStrategy {
    pub params: HeuristicParams,
    /// Playouts per candidate.
    pub playouts: usize,
    /// Candidates taken from the top of the heuristic ranking.
    pub candidate_limit: usize,
}

/// Playout statistics for one candidate move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandidateResult {
    pub mv: Move,
    pub heuristic: f64,
    /// Playouts that ended with a positive margin for the side to move.
    pub wins: usize,
    /// Simulated placements summed over all playouts.
    pub moves: usize,
}

impl MonteCarloStrategy {
    /// Top-ranked heuristic moves, with pass appended if it missed the cut.
    pub fn candidates(&self, root: &SearchRoot) -> Vec<ScoredMove> {
        let ranked = heuristic::rank_moves(root, &self.params);
        let mut candidates: Vec<ScoredMove> =
            ranked.iter().take(self.candidate_limit).copied().collect();
        if !candidates.iter().any(|c| c.mv.is_pass()) {
            if let Some(pass) = ranked.iter().find(|c| c.mv.is_pass()) {
                candidates.push(*pass);
            }
        }
        candidates
    }

    /// Run the playouts for every candidate, in candidate order.
    pub fn evaluate(&self, root: &SearchRoot, rng: &mut fastrand::Rng) -> Vec<CandidateResult> {
        let seeded: Vec<(ScoredMove, u64)> = self
            .candidates(root)
            .into_iter()
            .map(|c| (c, rng.u64(..)))
            .collect();

        seeded
            .into_par_iter()
            .map(|(candidate, seed)| {
                let mut rng = fastrand::Rng::with_seed(seed);
                let mut runner = Playout::new(root.board.size());
                let (mut wins, mut moves) = (0, 0);
                for _ in 0..self.playouts {
                    let margin = runner.run(
                        &root.board,
                        root.captures,
                        root.to_play,
                        candidate.mv,
                        &mut rng,
                    );
                    if margin > 0 {
                        wins += 1;
                    }
                    moves += runner.moves();
                }
                CandidateResult {
                    mv: candidate.mv,
                    heuristic: candidate.score,
                    wins,
                    moves,
                }
            })
            .collect()
    }
}

impl Strategy for MonteCarloStrategy {
    fn choose_move(&self, root: &SearchRoot, rng: &mut fastrand::Rng) -> Move {
        let results = self.evaluate(root, rng);
        let size = root.board.size();

        let mut best: Option<CandidateResult> = None;
        for r in &results {
            let mean_moves = r.moves as f64 / self.playouts.max(1) as f64;
            debug!(
                candidate = %r.mv.name(size),
                heuristic = r.heuristic,
                wins = r.wins,
                playouts = self.playouts,
                mean_moves,
                "candidate evaluated"
            );
            if best.is_none_or(|b| r.wins > b.wins) {
                best = Some(*r);
            }
        }
        best.map_or(Move::Pass, |b| b.mv)
    }

    fn name(&self) -> &'static str {
        "monte-carlo"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Board, Color};
    use crate::constants::{playout_step_cap, MIN_CANDIDATES};

    fn strategy(playouts: usize, candidate_limit: usize) -> MonteCarloStrategy {
        MonteCarloStrategy {
            params: HeuristicParams::default(),
            playouts,
            candidate_limit,
        }
    }

    #[test]
    fn test_pass_always_a_candidate() {
        let root = SearchRoot::from_board(Board::new(9), Color::Black);
        let candidates = strategy(10, MIN_CANDIDATES).candidates(&root);
        assert_eq!(candidates.len(), MIN_CANDIDATES + 1);
        assert_eq!(candidates.last().map(|c| c.mv), Some(Move::Pass));
        assert_eq!(candidates[0].mv, Move::Place((4, 4)));
    }

    #[test]
    fn test_pass_not_duplicated_when_ranked() {
        // White has no legal placement; pass is the only candidate.
        let board = Board::from_rows(&["X.X", "XXX", "X.O"]).unwrap();
        let root = SearchRoot::from_board(board, Color::White);
        let candidates = strategy(10, 40).candidates(&root);
        assert_eq!(candidates.iter().filter(|c| c.mv.is_pass()).count(), 1);
        assert_eq!(candidates.len(), root.legal_placements().len() + 1);
    }

    #[test]
    fn test_evaluation_is_reproducible() {
        let root = SearchRoot::from_board(Board::new(9), Color::Black);
        let s = strategy(10, 5);
        let a = s.evaluate(&root, &mut fastrand::Rng::with_seed(17));
        let b = s.evaluate(&root, &mut fastrand::Rng::with_seed(17));
        assert_eq!(a, b);
        assert!(a.iter().all(|r| r.wins <= 10));
        assert!(a.iter().all(|r| r.moves > 0 && r.moves <= 10 * playout_step_cap(9)));
    }

    #[test]
    fn test_takes_a_winning_capture() {
        // Capturing the white group leaves black with an overwhelming lead in
        // every playout continuation; passing leaves white ahead on stones.
        let board = Board::from_rows(&[
            "OOOOX",
            "OOOOX",
            "OOOOX",
            "OOOOX",
            "OOOO.",
        ])
        .unwrap();
        let root = SearchRoot::from_board(board, Color::Black);
        let mv = strategy(20, 5).choose_move(&root, &mut fastrand::Rng::with_seed(2));
        assert_eq!(mv, Move::Place((4, 4)));
    }
}
