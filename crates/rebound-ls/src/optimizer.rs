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

//! Breadth-first search over run orderings.
//!
//! An ordering is a permutation of the solution's move indices. Its runs are
//! the maximal blocks of consecutive moves by the same robot, so runs that
//! become adjacent after a swap merge on their own. Two adjacent runs may be
//! swapped iff replaying the later one first, then the earlier one, from the
//! placement before them reproduces every move's `from` and `to`. The moves
//! themselves never change, so the move count and final placement are
//! preserved by construction.

use crate::{
    result::{RunOptimizerOutcome, RunOptimizerTerminationReason},
    stats::RunOptimizerStatistics,
};
use rebound_model::{
    board::Board,
    index::CellIndex,
    puzzle::MAX_ROBOTS,
    solution::{Move, Solution},
};
use rustc_hash::FxHashSet;
use smallvec::SmallVec;
use std::collections::VecDeque;

/// Default number of orderings expanded before giving up.
pub const DEFAULT_BUDGET: u64 = 20_000;

type Ordering = SmallVec<[u8; 32]>;
type Positions = SmallVec<[CellIndex; MAX_ROBOTS]>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunOptimizer {
    budget: u64,
}

impl Default for RunOptimizer {
    fn default() -> Self {
        Self::new()
    }
}

impl RunOptimizer {
    #[inline]
    pub fn new() -> Self {
        Self {
            budget: DEFAULT_BUDGET,
        }
    }

    /// Sets the number of orderings expanded before giving up.
    ///
    /// # Panics
    ///
    /// Panics if `budget` is zero.
    #[inline]
    pub fn with_budget(budget: u64) -> Self {
        assert!(budget > 0, "called `RunOptimizer::with_budget` with a zero budget");
        Self { budget }
    }

    #[inline]
    pub fn budget(&self) -> u64 {
        self.budget
    }

    /// Reorders `solution` to use as few runs as possible.
    ///
    /// One-move solutions are returned unchanged. The returned solution
    /// replays on `board` whenever `solution` does.
    pub fn optimize(&self, board: &Board, solution: &Solution) -> RunOptimizerOutcome {
        let start_time = std::time::Instant::now();
        let mut stats = RunOptimizerStatistics::default();
        let initial_runs = solution.num_runs();

        if solution.is_one_move() {
            stats.set_runs(initial_runs, initial_runs);
            stats.set_total_time(start_time.elapsed());
            return RunOptimizerOutcome::new(
                RunOptimizerTerminationReason::Skipped,
                solution.clone(),
                stats,
            );
        }

        debug_assert!(
            solution.len() <= u8::MAX as usize + 1,
            "called `RunOptimizer::optimize` with {} moves",
            solution.len()
        );

        let moves = solution.moves();
        let target = solution.num_robots_moved();
        let initial: Ordering = (0..moves.len()).map(|i| i as u8).collect();
        let mut best = initial.clone();
        let mut best_runs = initial_runs;

        let mut queue = VecDeque::new();
        let mut seen = FxHashSet::default();
        seen.insert(initial.clone());
        queue.push_back(initial);

        let mut reason = RunOptimizerTerminationReason::Exhausted;
        if best_runs <= target {
            reason = RunOptimizerTerminationReason::MinimumReached;
            queue.clear();
        }

        'search: while let Some(order) = queue.pop_front() {
            if stats.iterations >= self.budget {
                reason = RunOptimizerTerminationReason::BudgetExhausted;
                break;
            }
            stats.on_iteration();

            let runs = run_bounds(moves, &order);
            let mut positions: Positions = SmallVec::from_slice(solution.initial_positions());
            for pair in runs.windows(2) {
                let (earlier, later) = (pair[0], pair[1]);
                stats.on_swap_attempted();
                if let Some(swapped) = try_swap(board, moves, &order, earlier, later, &positions) {
                    if seen.insert(swapped.clone()) {
                        stats.on_swap_accepted();
                        let count = count_runs(moves, &swapped);
                        if count < best_runs {
                            best_runs = count;
                            best = swapped.clone();
                        }
                        if count <= target {
                            reason = RunOptimizerTerminationReason::MinimumReached;
                            break 'search;
                        }
                        queue.push_back(swapped);
                    }
                }
                for &i in &order[earlier.0..earlier.1] {
                    let m = moves[i as usize];
                    positions[m.robot().get()] = m.to();
                }
            }
        }

        let reordered = Solution::new(
            solution.initial_positions(),
            best.iter().map(|&i| moves[i as usize]).collect(),
            *solution.labels(),
        );
        stats.set_runs(initial_runs, best_runs);
        stats.set_total_time(start_time.elapsed());
        RunOptimizerOutcome::new(reason, reordered, stats)
    }
}

/// Half-open `order` index ranges of each run.
fn run_bounds(moves: &[Move], order: &[u8]) -> SmallVec<[(usize, usize); 16]> {
    let mut bounds = SmallVec::new();
    let mut start = 0;
    for i in 1..=order.len() {
        let boundary = i == order.len()
            || moves[order[i] as usize].robot() != moves[order[i - 1] as usize].robot();
        if boundary {
            bounds.push((start, i));
            start = i;
        }
    }
    bounds
}

#[inline]
fn count_runs(moves: &[Move], order: &[u8]) -> usize {
    order
        .iter()
        .enumerate()
        .filter(|&(i, &m)| i == 0 || moves[order[i - 1] as usize].robot() != moves[m as usize].robot())
        .count()
}

/// Swaps the adjacent runs `earlier` and `later` of `order` if the result
/// replays identically from `positions`, the placement before `earlier`.
fn try_swap(
    board: &Board,
    moves: &[Move],
    order: &[u8],
    earlier: (usize, usize),
    later: (usize, usize),
    positions: &[CellIndex],
) -> Option<Ordering> {
    debug_assert_eq!(earlier.1, later.0);

    let mut scratch: Positions = SmallVec::from_slice(positions);
    let swapped_runs = order[later.0..later.1]
        .iter()
        .chain(&order[earlier.0..earlier.1]);
    for &i in swapped_runs {
        let m = moves[i as usize];
        let robot = m.robot();
        if scratch[robot.get()] != m.from() || board.slide(&scratch, robot, m.direction()) != m.to() {
            return None;
        }
        scratch[robot.get()] = m.to();
    }

    let mut swapped = Ordering::with_capacity(order.len());
    swapped.extend_from_slice(&order[..earlier.0]);
    swapped.extend_from_slice(&order[later.0..later.1]);
    swapped.extend_from_slice(&order[earlier.0..earlier.1]);
    swapped.extend_from_slice(&order[later.1..]);
    Some(swapped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rebound_model::{board::BoardBuilder, direction::Direction, index::RobotIndex};

    fn c(i: usize) -> CellIndex {
        CellIndex::new(i)
    }

    fn mv(robot: usize, d: Direction, from: usize, to: usize) -> Move {
        Move::new(RobotIndex::new(robot), d, c(from), c(to))
    }

    fn solution(initial: &[usize], moves: Vec<Move>) -> Solution {
        let initial: Vec<CellIndex> = initial.iter().map(|&i| c(i)).collect();
        Solution::new(&initial, moves, ['r', 'g', 'b', 'y', 's'])
    }

    fn assert_preserved(board: &Board, before: &Solution, after: &Solution) {
        assert!(after.replay(board));
        assert_eq!(after.len(), before.len());
        assert_eq!(after.final_positions(), before.final_positions());
        assert!(after.num_runs() <= before.num_runs());
    }

    /// Two robots in row 0 where the left one bumps into the right one, and
    /// an independent robot in row 1.
    fn dependent_board() -> (Board, Solution) {
        let board = BoardBuilder::new(4, 2).build();
        let s = solution(
            &[0, 2, 4],
            vec![
                mv(0, Direction::East, 0, 1),
                mv(1, Direction::East, 2, 3),
                mv(0, Direction::East, 1, 2),
                mv(2, Direction::East, 4, 7),
            ],
        );
        (board, s)
    }

    #[test]
    fn test_merges_independent_runs() {
        let board = BoardBuilder::new(4, 4).build();
        let s = solution(
            &[0, 15],
            vec![
                mv(0, Direction::East, 0, 3),
                mv(1, Direction::West, 15, 12),
                mv(0, Direction::South, 3, 15),
            ],
        );
        assert!(s.replay(&board));
        assert_eq!(s.num_runs(), 3);

        let outcome = RunOptimizer::new().optimize(&board, &s);
        assert_eq!(
            outcome.termination_reason(),
            RunOptimizerTerminationReason::MinimumReached
        );
        let after = outcome.solution();
        assert_preserved(&board, &s, after);
        assert_eq!(after.num_runs(), 2);
        assert_eq!(after.moves()[0].robot(), RobotIndex::new(1));
        assert_eq!(outcome.statistics().final_runs, 2);
    }

    #[test]
    fn test_blocked_swap_is_rejected() {
        let board = BoardBuilder::new(4, 4).build();
        // The green robot at 15 stops red in column 3; moving it first would
        // let red slide further.
        let s = solution(
            &[0, 15],
            vec![
                mv(0, Direction::East, 0, 3),
                mv(0, Direction::South, 3, 11),
                mv(1, Direction::West, 15, 12),
                mv(0, Direction::South, 11, 15),
            ],
        );
        assert!(s.replay(&board));

        let outcome = RunOptimizer::new().optimize(&board, &s);
        assert_preserved(&board, &s, outcome.solution());
        assert_eq!(outcome.solution().num_runs(), 3);
        assert_eq!(
            outcome.termination_reason(),
            RunOptimizerTerminationReason::Exhausted
        );
    }

    #[test]
    fn test_exhausts_dependent_orderings() {
        let (board, s) = dependent_board();
        assert!(s.replay(&board));

        let outcome = RunOptimizer::new().optimize(&board, &s);
        assert_eq!(
            outcome.termination_reason(),
            RunOptimizerTerminationReason::Exhausted
        );
        assert_preserved(&board, &s, outcome.solution());
        assert_eq!(outcome.solution().num_runs(), 4);
        assert_eq!(outcome.statistics().iterations, 4);
    }

    #[test]
    fn test_budget_exhausted() {
        let (board, s) = dependent_board();
        let outcome = RunOptimizer::with_budget(1).optimize(&board, &s);
        assert_eq!(
            outcome.termination_reason(),
            RunOptimizerTerminationReason::BudgetExhausted
        );
        assert_eq!(outcome.statistics().iterations, 1);
        assert_preserved(&board, &s, outcome.solution());
    }

    #[test]
    fn test_one_move_solution_is_skipped() {
        let board = BoardBuilder::new(4, 4).build();
        let s = solution(
            &[0, 15],
            vec![
                mv(0, Direction::East, 0, 3),
                mv(1, Direction::West, 15, 12),
                mv(0, Direction::South, 3, 15),
            ],
        )
        .with_one_move(true);

        let outcome = RunOptimizer::new().optimize(&board, &s);
        assert_eq!(
            outcome.termination_reason(),
            RunOptimizerTerminationReason::Skipped
        );
        assert_eq!(outcome.solution(), &s);
    }

    #[test]
    fn test_already_minimal() {
        let board = BoardBuilder::new(4, 4).build();
        let s = solution(&[0], vec![mv(0, Direction::East, 0, 3), mv(0, Direction::South, 3, 15)]);
        let outcome = RunOptimizer::new().optimize(&board, &s);
        assert_eq!(
            outcome.termination_reason(),
            RunOptimizerTerminationReason::MinimumReached
        );
        assert_eq!(outcome.statistics().iterations, 0);
        assert_eq!(outcome.solution(), &s);
    }

    #[test]
    fn test_run_bounds() {
        let (_, s) = dependent_board();
        let order: Ordering = SmallVec::from_slice(&[0, 2, 1, 3]);
        assert_eq!(run_bounds(s.moves(), &order).as_slice(), &[(0, 2), (2, 3), (3, 4)]);
        assert_eq!(count_runs(s.moves(), &order), 3);
    }

    #[test]
    #[should_panic(expected = "called `RunOptimizer::with_budget` with a zero budget")]
    fn test_zero_budget_panics() {
        let _ = RunOptimizer::with_budget(0);
    }
}
