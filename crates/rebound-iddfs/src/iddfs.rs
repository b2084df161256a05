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

//! Iterative-deepening depth-first search.
//!
//! The solver runs one bounded depth-first search per depth limit, starting
//! at two moves, and stops at the first limit that yields a solution. All
//! shallower limits were searched exhaustively, so that limit is the minimum
//! move count, and every solution recorded at it is reported.
//!
//! Pruning
//! - `MinimumMoves` bounds the moves a finishing robot still needs. A node
//!   whose best finisher is farther away than the remaining budget is cut,
//!   and a robot is only moved if the move can still matter within budget.
//! - A `VisitedMap` stores, per canonical state, the largest remaining budget
//!   it was expanded with. A state is expanded again only with a strictly
//!   larger budget. The map lives for the whole solve, so states expanded at
//!   a shallower limit are revisited exactly when the deeper limit gives
//!   them more room. In one-move mode the map is disabled, since distinct
//!   minimal orderings may share intermediate states.
//! - Sliding a robot the way it just moved is a no-op and is skipped, and
//!   without rebounds a robot never reverses its own previous direction.
//!   The robot's last direction is part of the state key in that case.
//!
//! Slides use an `ObstacleMask`, so collision tests do not scan robots.

use crate::{heuristic::MinimumMoves, obstacles::ObstacleMask, stack::MoveStack};
use rebound_model::{
    board::Board,
    direction::{Direction, AXIS_BOTH},
    index::CellIndex,
    puzzle::{Puzzle, MAX_ROBOTS},
    solution::Solution,
};
use rebound_search::{
    monitor::search_monitor::{PruneReason, SearchCommand, SearchMonitor},
    options::SearchOptions,
    result::SolverOutcome,
    setup::{Prepared, SearchSetup, SlotMove},
    stats::SearchStatistics,
};
use rebound_store::{
    key::{last_direction_code, KeyLayout},
    visited::VisitedMap,
};
use rustc_hash::FxHashSet;
use smallvec::SmallVec;

/// Iterative-deepening solver. Reusable across solves.
#[derive(Clone, Debug, Default)]
pub struct IddfsSolver {
    stack: MoveStack,
}

impl IddfsSolver {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a solver with storage for `max_depth` moves.
    #[inline]
    pub fn preallocated(max_depth: usize) -> Self {
        Self {
            stack: MoveStack::preallocated(max_depth),
        }
    }

    /// Finds every minimal solution of `puzzle` on `board`.
    ///
    /// The puzzle must be valid for the board (see `Puzzle::validate`).
    ///
    /// # Panics
    ///
    /// Panics if the state key is wider than `MAX_KEY_BITS`.
    pub fn solve<S>(
        &mut self,
        board: &Board,
        puzzle: &Puzzle,
        options: SearchOptions,
        monitor: &mut S,
    ) -> SolverOutcome
    where
        S: SearchMonitor + ?Sized,
    {
        let start_time = std::time::Instant::now();
        let mut stats = SearchStatistics::default();
        monitor.on_enter_search(board, puzzle, &stats);

        let setup = match SearchSetup::prepare(board, puzzle) {
            Prepared::Search(setup) => setup,
            Prepared::Trivial(solution) => {
                stats.on_solution_found();
                monitor.on_solution_found(&solution, &stats);
                stats.set_total_time(start_time.elapsed());
                monitor.on_exit_search(&stats);
                return SolverOutcome::optimal(vec![solution], stats);
            }
        };

        let session =
            IddfsSearchSession::new(&mut self.stack, board, &setup, options, monitor, stats);
        session.run(start_time)
    }
}

/// Raised through the recursion when a monitor stops the search.
#[derive(Debug)]
struct Interrupted(String);

/// Per-solve state of the iterative-deepening search.
struct IddfsSearchSession<'a, S: ?Sized> {
    stack: &'a mut MoveStack,
    board: &'a Board,
    setup: &'a SearchSetup,
    options: SearchOptions,
    monitor: &'a mut S,
    heuristic: MinimumMoves,
    obstacles: ObstacleMask,
    layout: KeyLayout,
    visited: VisitedMap,
    limit: usize,
    seen: FxHashSet<SmallVec<[SlotMove; 16]>>,
    solutions: Vec<Solution>,
    stats: SearchStatistics,
}

impl<'a, S> IddfsSearchSession<'a, S>
where
    S: SearchMonitor + ?Sized,
{
    fn new(
        stack: &'a mut MoveStack,
        board: &'a Board,
        setup: &'a SearchSetup,
        options: SearchOptions,
        monitor: &'a mut S,
        stats: SearchStatistics,
    ) -> Self {
        // One-move mode never consults the map, so axes stay out of the key.
        let layout = setup.state_layout(options.rebounds_allowed(), false);

        Self {
            stack,
            board,
            setup,
            options,
            monitor,
            heuristic: MinimumMoves::new(board, CellIndex::new(setup.goal())),
            obstacles: ObstacleMask::new(board),
            layout,
            visited: VisitedMap::for_layout(&layout),
            limit: 0,
            seen: FxHashSet::default(),
            solutions: Vec::new(),
            stats,
        }
    }

    fn run(mut self, start_time: std::time::Instant) -> SolverOutcome {
        self.stack.reset(self.setup.start());
        self.stack.ensure_capacity(self.options.depth_limit());
        for &cell in self.setup.start() {
            self.obstacles.place(cell);
        }

        let mut aborted = None;
        for limit in 2..=self.options.depth_limit() {
            self.limit = limit;
            self.stats.on_iteration();
            self.monitor.on_iteration(limit, &self.stats);

            if let Err(Interrupted(reason)) = self.expand(0) {
                aborted = Some(reason);
                break;
            }
            if !self.solutions.is_empty() {
                break;
            }
        }

        self.stats.set_memory_bytes(
            self.visited.allocated_memory_bytes()
                + self.stack.allocated_memory_bytes()
                + self.obstacles.allocated_memory_bytes(),
        );
        self.stats.set_total_time(start_time.elapsed());
        self.monitor.on_exit_search(&self.stats);

        match aborted {
            Some(reason) => SolverOutcome::aborted(reason, self.stats),
            None if self.solutions.is_empty() => SolverOutcome::infeasible(self.stats),
            None => SolverOutcome::optimal(self.solutions, self.stats),
        }
    }

    /// Smallest heuristic distance over the finishing slots.
    #[inline]
    fn finisher_distance(&self, positions: &[usize]) -> usize {
        self.setup
            .finisher_slots()
            .map(|slot| self.heuristic.get(positions[slot]))
            .min()
            .unwrap_or(usize::MAX)
    }

    #[inline]
    fn is_done(&self) -> bool {
        self.options.is_first_solution_only() && !self.solutions.is_empty()
    }

    fn expand(&mut self, depth: usize) -> Result<(), Interrupted> {
        self.stats.on_node_explored();
        self.stats.on_depth_update(depth as u64);
        self.monitor.on_step(depth, &self.stats);
        if let SearchCommand::Terminate(reason) = self.monitor.search_command(&self.stats) {
            return Err(Interrupted(reason));
        }

        let moves_left = self.limit - depth;
        let frame = *self.stack.frame();
        let positions = &frame.positions[..self.setup.num_robots()];
        let best = self.finisher_distance(positions);
        if best > moves_left {
            self.stats.on_pruning_heuristic();
            self.monitor.on_prune(PruneReason::Heuristic, &self.stats);
            return Ok(());
        }

        let previous = self.stack.last_move().copied();
        for slot in 0..self.setup.num_robots() {
            let finisher = self.setup.is_finisher(slot);
            if moves_left == 1 && !finisher {
                continue;
            }
            // A helper move spends one move without bringing a finisher closer.
            let own_reach = finisher && self.heuristic.get(positions[slot]) <= moves_left;
            if !own_reach && best >= moves_left {
                continue;
            }

            for direction in Direction::ALL {
                if previous.is_some_and(|p| p.slot == slot && p.direction == direction) {
                    continue;
                }
                if !self.options.rebounds_allowed()
                    && frame.last[slot] == Some(direction.opposite())
                {
                    continue;
                }

                let from = positions[slot];
                let to = self.obstacles.slide(from, direction);
                if to == from {
                    continue;
                }

                if moves_left == 1 {
                    if to == self.setup.goal()
                        && (!self.setup.is_one_move()
                            || frame.axes[slot] | direction.axis_flag() == AXIS_BOTH)
                    {
                        self.record(SlotMove {
                            slot,
                            direction,
                            from,
                            to,
                        });
                        if self.is_done() {
                            return Ok(());
                        }
                    }
                    continue;
                }

                self.obstacles.relocate(from, to);
                self.stack.push(slot, direction, to);
                let result = if self.admit(moves_left - 1) {
                    self.expand(depth + 1)
                } else {
                    Ok(())
                };
                self.stack.pop();
                self.obstacles.relocate(to, from);
                result?;

                if self.is_done() {
                    return Ok(());
                }
            }
        }
        Ok(())
    }

    /// Records the top frame in the visited map with `budget` moves left.
    /// Returns `false` if it was already expanded with at least that budget.
    fn admit(&mut self, budget: usize) -> bool {
        if self.setup.is_one_move() {
            return true;
        }

        let frame = self.stack.frame();
        let n = self.setup.num_robots();
        let key = if self.options.rebounds_allowed() {
            self.layout.pack(&frame.positions[..n])
        } else {
            let mut values = [0usize; MAX_ROBOTS];
            for slot in 0..n {
                values[slot] = self
                    .layout
                    .annotate(frame.positions[slot], last_direction_code(frame.last[slot]));
            }
            self.layout.pack(&values[..n])
        };

        if self.visited.put_if_greater(key, budget as u8) {
            self.stats.on_state_stored();
            true
        } else {
            self.stats.on_pruning_duplicate();
            self.monitor.on_prune(PruneReason::Duplicate, &self.stats);
            false
        }
    }

    fn record(&mut self, last: SlotMove) {
        let mut moves: SmallVec<[SlotMove; 16]> = SmallVec::from_slice(self.stack.moves());
        moves.push(last);
        if !self.seen.insert(moves.clone()) {
            return;
        }

        let solution = self.setup.to_solution(&moves);
        debug_assert!(
            solution.replay(self.board),
            "IDDFS produced a solution that does not replay: {}",
            solution
        );
        self.stats.on_solution_found();
        self.monitor.on_solution_found(&solution, &self.stats);
        self.solutions.push(solution);
    }
}
