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

use crate::{
    monitor::search_monitor::{PruneReason, SearchCommand, SearchMonitor},
    stats::SearchStatistics,
};
use rebound_model::{board::Board, puzzle::Puzzle, solution::Solution};

/// A monitor that ignores every event and always returns `Continue`.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct NoOperationMonitor;

impl NoOperationMonitor {
    /// Creates a new `NoOperationMonitor`.
    #[inline(always)]
    pub fn new() -> Self {
        Self
    }
}

impl SearchMonitor for NoOperationMonitor {
    #[inline(always)]
    fn name(&self) -> &str {
        "NoOperationMonitor"
    }

    #[inline(always)]
    fn on_enter_search(&mut self, _board: &Board, _puzzle: &Puzzle, _stats: &SearchStatistics) {}

    #[inline(always)]
    fn on_exit_search(&mut self, _stats: &SearchStatistics) {}

    #[inline(always)]
    fn search_command(&mut self, _stats: &SearchStatistics) -> SearchCommand {
        SearchCommand::Continue
    }

    #[inline(always)]
    fn on_iteration(&mut self, _depth: usize, _stats: &SearchStatistics) {}

    #[inline(always)]
    fn on_step(&mut self, _depth: usize, _stats: &SearchStatistics) {}

    #[inline(always)]
    fn on_prune(&mut self, _reason: PruneReason, _stats: &SearchStatistics) {}

    #[inline(always)]
    fn on_solution_found(&mut self, _solution: &Solution, _stats: &SearchStatistics) {}
}
