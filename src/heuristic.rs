//! One-ply heuristic move scoring.
//!
//! Placements are scored by a weighted sum of captures, the liberties of the
//! placed group, contact with nearby stones and distance from the center.
//! Passing has its own score that grows as the board fills up and the number
//! of legal placements shrinks.

use crate::board::{Board, Point};
use crate::config::HeuristicParams;
use crate::game::SearchRoot;
use crate::group;
use crate::rules::{self, Move};

/// A legal move with its heuristic score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredMove {
    pub mv: Move,
    pub score: f64,
}

/// Fraction of the board that is still empty.
pub fn empty_ratio(board: &Board) -> f64 {
    board.count_empty() as f64 / board.area() as f64
}

/// Score a placement, or `None` if it is illegal.
pub fn score_placement(root: &SearchRoot, p: Point, params: &HeuristicParams) -> Option<f64> {
    let color = root.to_play;
    let placement = rules::check_move(&root.board, p, color, root.ko.as_ref()).ok()?;
    let liberties = group::analyze(&placement.board, p).map_or(0, |g| g.liberty_count());

    let opp = color.opponent();
    let (mut own, mut other) = (0usize, 0usize);
    for n in root.board.neighbors(p) {
        match root.board.get(n) {
            Some(c) if c == color => own += 1,
            Some(c) if c == opp => other += 1,
            _ => {}
        }
    }

    let center = (root.board.size() as f64 - 1.0) / 2.0;
    let dist = (p.0 as f64 - center).abs() + (p.1 as f64 - center).abs();

    Some(
        placement.captured as f64 * params.capture_weight
            + liberties as f64 * params.liberty_weight
            + own as f64 * params.own_adjacent_weight
            + other as f64 * params.opponent_adjacent_weight
            - dist * params.center_distance_weight,
    )
}

/// Score passing, given how many placements are legal.
pub fn score_pass(root: &SearchRoot, legal_placements: usize, params: &HeuristicParams) -> f64 {
    let mut score = params.pass_base;
    let ratio = empty_ratio(&root.board);
    if ratio < params.late_game_ratio {
        score += (params.late_game_ratio - ratio) * params.pass_late_slope;
    }
    if legal_placements <= 6 {
        score += params.pass_few_moves_bonus;
    } else if legal_placements <= 12 {
        score += params.pass_some_moves_bonus;
    }
    if root.last_move == Some(Move::Pass) {
        score += params.pass_opponent_passed_bonus;
    }
    score
}

/// Score every legal move: placements in row-major order, then pass.
pub fn score_moves(root: &SearchRoot, params: &HeuristicParams) -> Vec<ScoredMove> {
    let mut scored: Vec<ScoredMove> = root
        .board
        .points()
        .filter(|&p| root.board.get(p).is_none())
        .filter_map(|p| {
            score_placement(root, p, params).map(|score| ScoredMove {
                mv: Move::Place(p),
                score,
            })
        })
        .collect();
    let pass = score_pass(root, scored.len(), params);
    scored.push(ScoredMove {
        mv: Move::Pass,
        score: pass,
    });
    scored
}

/// Scored moves sorted best first. The sort is stable, so equal scores keep
/// enumeration order.
pub fn rank_moves(root: &SearchRoot, params: &HeuristicParams) -> Vec<ScoredMove> {
    let mut scored = score_moves(root, params);
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored
}

/// Pick the heuristic move.
///
/// Late in the game the engine passes when no placement reaches the pass
/// threshold; otherwise the best-scoring move wins, the first one on ties.
pub fn select(root: &SearchRoot, params: &HeuristicParams) -> Move {
    let scored = score_moves(root, params);

    let best_placement = scored
        .iter()
        .filter(|s| !s.mv.is_pass())
        .map(|s| s.score)
        .fold(None, |best: Option<f64>, s| Some(best.map_or(s, |b| b.max(s))));
    let Some(best_placement) = best_placement else {
        return Move::Pass;
    };

    if empty_ratio(&root.board) < params.late_game_ratio && best_placement < params.pass_threshold
    {
        return Move::Pass;
    }

    let mut best = scored[0];
    for s in &scored[1..] {
        if s.score > best.score {
            best = *s;
        }
    }
    best.mv
}
