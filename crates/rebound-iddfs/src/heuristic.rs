// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Admissible distance heuristic.
//!
//! `MinimumMoves` stores, per cell, the fewest slides a robot needs to reach
//! the goal if other robots could appear as blockers anywhere. A robot stops
//! on cell `c` after sliding towards it along an unwalled line, so the cells
//! one slide away from `c` are exactly the cells on the straight unwalled
//! lines through `c`. A reverse breadth-first search from the goal over
//! these lines yields a lower bound on the true move count.

use rebound_model::{board::Board, direction::Direction, index::CellIndex};
use std::collections::VecDeque;

/// Distance of cells that can never reach the goal.
pub const UNREACHABLE: u8 = u8::MAX;

/// Per-cell lower bound on the moves needed to reach a goal cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MinimumMoves {
    goal: usize,
    distances: Vec<u8>,
}

impl MinimumMoves {
    /// Runs the reverse breadth-first search from `goal`.
    pub fn new(board: &Board, goal: CellIndex) -> Self {
        debug_assert!(
            goal.get() < board.num_cells(),
            "called `MinimumMoves::new` with goal {} outside a board of {} cells",
            goal.get(),
            board.num_cells()
        );

        let mut distances = vec![UNREACHABLE; board.num_cells()];
        let mut queue = VecDeque::with_capacity(board.num_cells());
        distances[goal.get()] = 0;
        queue.push_back(goal);

        while let Some(cell) = queue.pop_front() {
            let next = distances[cell.get()].saturating_add(1).min(UNREACHABLE - 1);
            for direction in Direction::ALL {
                let mut cur = cell;
                while !board.has_wall(cur, direction) {
                    cur = board.step(cur, direction);
                    if distances[cur.get()] == UNREACHABLE {
                        distances[cur.get()] = next;
                        queue.push_back(cur);
                    }
                }
            }
        }

        Self {
            goal: goal.get(),
            distances,
        }
    }

    #[inline]
    pub fn goal(&self) -> usize {
        self.goal
    }

    /// Returns the bound for `cell`, or `usize::MAX` if it is unreachable.
    #[inline(always)]
    pub fn get(&self, cell: usize) -> usize {
        match self.distances[cell] {
            UNREACHABLE => usize::MAX,
            d => d as usize,
        }
    }

    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.distances
    }
}
