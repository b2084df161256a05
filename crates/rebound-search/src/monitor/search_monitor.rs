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

//! Search monitoring interface
//!
//! Declares the `SearchMonitor` trait, `SearchCommand` and `PruneReason`.
//! Callbacks track the lifecycle of one solve, and a monitor can stop the
//! search through `search_command` (default: Continue).
//!
//! Lifecycle
//! - enter → iteration → step → {prune | solution} → … → exit
//! - `SearchStatistics` is provided to every callback.
//!
//! Design notes
//! - Methods take `&mut self`; monitors are single-threaded.
//! - `search_command` is polled once per BFS state and once per IDDFS
//!   recursion entry, so keep it cheap.

use crate::stats::SearchStatistics;
use rebound_model::{board::Board, puzzle::Puzzle, solution::Solution};

/// What the search should do next.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub enum SearchCommand {
    #[default]
    Continue,
    Terminate(String),
}

impl std::fmt::Display for SearchCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchCommand::Continue => write!(f, "Continue"),
            SearchCommand::Terminate(reason) => write!(f, "Terminate: {}", reason),
        }
    }
}

/// Reasons for abandoning a branch.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PruneReason {
    /// The distance heuristic proves the goal is out of reach.
    Heuristic,
    /// The state was already explored with at least the same budget.
    Duplicate,
}

impl std::fmt::Display for PruneReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PruneReason::Heuristic => write!(f, "Heuristic"),
            PruneReason::Duplicate => write!(f, "Duplicate"),
        }
    }
}

/// Trait for monitoring and controlling a search.
pub trait SearchMonitor {
    /// Returns the name of the monitor.
    fn name(&self) -> &str;
    /// Called when the search starts.
    fn on_enter_search(&mut self, board: &Board, puzzle: &Puzzle, statistics: &SearchStatistics);
    /// Called when the search ends, whatever the outcome.
    fn on_exit_search(&mut self, statistics: &SearchStatistics);
    /// Called to determine whether the search may continue.
    fn search_command(&mut self, _statistics: &SearchStatistics) -> SearchCommand {
        SearchCommand::Continue
    }
    /// Called when a new depth limit (IDDFS) or layer (BFS) begins.
    fn on_iteration(&mut self, depth: usize, statistics: &SearchStatistics);
    /// Called for every explored state.
    fn on_step(&mut self, depth: usize, statistics: &SearchStatistics);
    /// Called when a branch is abandoned.
    fn on_prune(&mut self, reason: PruneReason, statistics: &SearchStatistics);
    /// Called when a solution is recorded.
    fn on_solution_found(&mut self, solution: &Solution, statistics: &SearchStatistics);
}

impl<M> SearchMonitor for &mut M
where
    M: SearchMonitor + ?Sized,
{
    #[inline(always)]
    fn name(&self) -> &str {
        (**self).name()
    }

    #[inline(always)]
    fn on_enter_search(&mut self, board: &Board, puzzle: &Puzzle, statistics: &SearchStatistics) {
        (**self).on_enter_search(board, puzzle, statistics)
    }

    #[inline(always)]
    fn on_exit_search(&mut self, statistics: &SearchStatistics) {
        (**self).on_exit_search(statistics)
    }

    #[inline(always)]
    fn search_command(&mut self, statistics: &SearchStatistics) -> SearchCommand {
        (**self).search_command(statistics)
    }

    #[inline(always)]
    fn on_iteration(&mut self, depth: usize, statistics: &SearchStatistics) {
        (**self).on_iteration(depth, statistics)
    }

    #[inline(always)]
    fn on_step(&mut self, depth: usize, statistics: &SearchStatistics) {
        (**self).on_step(depth, statistics)
    }

    #[inline(always)]
    fn on_prune(&mut self, reason: PruneReason, statistics: &SearchStatistics) {
        (**self).on_prune(reason, statistics)
    }

    #[inline(always)]
    fn on_solution_found(&mut self, solution: &Solution, statistics: &SearchStatistics) {
        (**self).on_solution_found(solution, statistics)
    }
}

impl std::fmt::Debug for dyn SearchMonitor + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SearchMonitor({})", self.name())
    }
}

impl std::fmt::Display for dyn SearchMonitor + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SearchMonitor({})", self.name())
    }
}
