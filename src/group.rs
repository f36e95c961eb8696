//! Group and liberty analysis.
//!
//! Groups are never cached: every legality check, capture and scoring pass
//! recomputes them from the board with an iterative flood fill.

use std::collections::HashSet;

use crate::board::{Board, Color, Point};

/// A maximal 4-connected set of same-colored stones and its liberties.
#[derive(Debug, Clone)]
pub struct Group {
    pub color: Color,
    pub stones: Vec<Point>,
    /// Cell ids of the distinct empty points adjacent to the group.
    pub liberties: HashSet<usize>,
}

impl Group {
    pub fn liberty_count(&self) -> usize {
        self.liberties.len()
    }

    pub fn size(&self) -> usize {
        self.stones.len()
    }
}

/// Collect the group containing the stone at `start`.
///
/// Returns `None` when `start` is empty or off the board.
pub fn analyze(board: &Board, start: Point) -> Option<Group> {
    let color = board.get(start)?;
    let mut stack = vec![start];
    let mut visited = vec![false; board.area()];
    let mut stones = Vec::new();
    let mut liberties = HashSet::new();

    visited[board.index(start)] = true;
    while let Some(pt) = stack.pop() {
        stones.push(pt);
        for n in board.neighbors(pt) {
            let ni = board.index(n);
            match board.get(n) {
                None => {
                    liberties.insert(ni);
                }
                Some(c) if c == color && !visited[ni] => {
                    visited[ni] = true;
                    stack.push(n);
                }
                _ => {}
            }
        }
    }

    Some(Group {
        color,
        stones,
        liberties,
    })
}

/// Remove every stone of a group from the board.
pub fn remove(board: &mut Board, group: &Group) {
    for &p in &group.stones {
        board.set(p, None);
    }
}
