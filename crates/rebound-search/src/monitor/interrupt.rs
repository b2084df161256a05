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
use std::sync::atomic::{AtomicBool, Ordering};

/// A search monitor that checks an atomic boolean flag to determine
/// whether the search should be interrupted.
///
/// Raise the flag from another thread to cancel a running solve; the search
/// reports `TerminationReason::Aborted` instead of "no solution".
#[derive(Debug, Clone)]
pub struct InterruptMonitor<'a> {
    stop_flag: &'a AtomicBool,
}

impl<'a> InterruptMonitor<'a> {
    /// Creates a new `InterruptMonitor` watching `stop_flag`.
    #[inline(always)]
    pub fn new(stop_flag: &'a AtomicBool) -> Self {
        Self { stop_flag }
    }
}

impl<'a> SearchMonitor for InterruptMonitor<'a> {
    fn name(&self) -> &str {
        "InterruptMonitor"
    }

    fn on_enter_search(&mut self, _board: &Board, _puzzle: &Puzzle, _stats: &SearchStatistics) {}
    fn on_exit_search(&mut self, _stats: &SearchStatistics) {}
    fn on_iteration(&mut self, _depth: usize, _stats: &SearchStatistics) {}
    fn on_step(&mut self, _depth: usize, _stats: &SearchStatistics) {}
    fn on_prune(&mut self, _reason: PruneReason, _stats: &SearchStatistics) {}
    fn on_solution_found(&mut self, _solution: &Solution, _stats: &SearchStatistics) {}

    fn search_command(&mut self, _stats: &SearchStatistics) -> SearchCommand {
        if self.stop_flag.load(Ordering::Relaxed) {
            SearchCommand::Terminate("Interrupt signal received".to_string())
        } else {
            SearchCommand::Continue
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interrupt_monitor_continues_when_flag_is_clear() {
        let flag = AtomicBool::new(false);
        let mut monitor = InterruptMonitor::new(&flag);

        match monitor.search_command(&SearchStatistics::default()) {
            SearchCommand::Continue => {}
            other => panic!("expected Continue, got {:?}", other),
        }
    }

    #[test]
    fn test_interrupt_monitor_terminates_when_flag_is_set() {
        let flag = AtomicBool::new(false);
        let mut monitor = InterruptMonitor::new(&flag);

        flag.store(true, Ordering::Relaxed);

        match monitor.search_command(&SearchStatistics::default()) {
            SearchCommand::Terminate(reason) => {
                assert_eq!(reason, "Interrupt signal received");
            }
            other => panic!("expected Terminate, got {:?}", other),
        }
    }
}
