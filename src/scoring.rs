//! Area (Chinese-style) scoring.
//!
//! A side's score is its stones on the board plus the empty regions bordered
//! only by its stones; White also receives komi. Dead stones are marked by
//! hand on a frozen copy of the board and removed before counting.

use std::collections::BTreeSet;

use tracing::info;

use crate::board::{Board, Color, Point};
use crate::group;

/// A maximal 4-connected empty region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub points: Vec<Point>,
    /// The only color bordering the region, or `None` when neutral.
    pub owner: Option<Color>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SideScore {
    pub stones: usize,
    pub territory: usize,
    pub komi: f32,
    pub total: f32,
}

impl SideScore {
    fn new(stones: usize, territory: usize, komi: f32) -> Self {
        Self {
            stones,
            territory,
            komi,
            total: (stones + territory) as f32 + komi,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScoreOutcome {
    Win { winner: Color, margin: f32 },
    Draw,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreReport {
    pub black: SideScore,
    pub white: SideScore,
}

impl ScoreReport {
    pub fn side(&self, color: Color) -> &SideScore {
        match color {
            Color::Black => &self.black,
            Color::White => &self.white,
        }
    }

    pub fn outcome(&self) -> ScoreOutcome {
        let diff = self.black.total - self.white.total;
        if diff > 0.0 {
            ScoreOutcome::Win {
                winner: Color::Black,
                margin: diff,
            }
        } else if diff < 0.0 {
            ScoreOutcome::Win {
                winner: Color::White,
                margin: -diff,
            }
        } else {
            ScoreOutcome::Draw
        }
    }
}

/// Flood-fill every empty region and decide who owns it.
pub fn classify_regions(board: &Board) -> Vec<Region> {
    let mut seen = vec![false; board.area()];
    let mut regions = Vec::new();

    for start in board.points() {
        if board.get(start).is_some() || seen[board.index(start)] {
            continue;
        }
        seen[board.index(start)] = true;
        let mut stack = vec![start];
        let mut points = Vec::new();
        let (mut black, mut white) = (false, false);

        while let Some(p) = stack.pop() {
            points.push(p);
            for n in board.neighbors(p) {
                match board.get(n) {
                    Some(Color::Black) => black = true,
                    Some(Color::White) => white = true,
                    None => {
                        let ni = board.index(n);
                        if !seen[ni] {
                            seen[ni] = true;
                            stack.push(n);
                        }
                    }
                }
            }
        }

        let owner = match (black, white) {
            (true, false) => Some(Color::Black),
            (false, true) => Some(Color::White),
            _ => None,
        };
        regions.push(Region { points, owner });
    }
    regions
}

/// Area score of a finished board. `komi` is added to White only.
pub fn classify_area_score(board: &Board, komi: f32) -> ScoreReport {
    let (mut black_territory, mut white_territory) = (0, 0);
    for region in classify_regions(board) {
        match region.owner {
            Some(Color::Black) => black_territory += region.points.len(),
            Some(Color::White) => white_territory += region.points.len(),
            None => {}
        }
    }
    ScoreReport {
        black: SideScore::new(board.count_stones(Color::Black), black_territory, 0.0),
        white: SideScore::new(board.count_stones(Color::White), white_territory, komi),
    }
}

/// Effect of a dead-stone toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Marked,
    Unmarked,
    /// The point is empty or off the board.
    Ignored,
}

/// Dead-stone marking over a frozen copy of the final board.
#[derive(Debug, Clone)]
pub struct ScoringSession {
    board: Board,
    dead: BTreeSet<Point>,
}

impl ScoringSession {
    pub fn new(board: &Board) -> Self {
        info!(size = board.size(), "scoring started");
        Self {
            board: board.clone(),
            dead: BTreeSet::new(),
        }
    }

    /// The board as it was when scoring began.
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn dead_stones(&self) -> &BTreeSet<Point> {
        &self.dead
    }

    pub fn is_dead(&self, p: Point) -> bool {
        self.dead.contains(&p)
    }

    /// Flip the dead mark on a single stone.
    pub fn toggle_dead(&mut self, p: Point) -> Toggle {
        if self.board.get(p).is_none() {
            return Toggle::Ignored;
        }
        if self.dead.remove(&p) {
            Toggle::Unmarked
        } else {
            self.dead.insert(p);
            Toggle::Marked
        }
    }

    /// Mark or unmark the whole group containing `p`.
    ///
    /// The group is marked dead unless every stone in it already is, in which
    /// case it is unmarked.
    pub fn toggle_dead_group(&mut self, p: Point) -> Toggle {
        let Some(g) = group::analyze(&self.board, p) else {
            return Toggle::Ignored;
        };
        if g.stones.iter().all(|s| self.dead.contains(s)) {
            for s in &g.stones {
                self.dead.remove(s);
            }
            Toggle::Unmarked
        } else {
            self.dead.extend(g.stones.iter().copied());
            Toggle::Marked
        }
    }

    /// The frozen board with every dead stone removed.
    pub fn effective_board(&self) -> Board {
        let mut board = self.board.clone();
        for &p in &self.dead {
            board.set(p, None);
        }
        board
    }

    pub fn compute_score(&self, komi: f32) -> ScoreReport {
        let report = classify_area_score(&self.effective_board(), komi);
        info!(
            dead = self.dead.len(),
            black = report.black.total,
            white = report.white.total,
            "score computed"
        );
        report
    }
}
