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
use rebound_core::num::saturating::SaturatingAddVal;
use rebound_model::{board::Board, puzzle::Puzzle, solution::Solution};
use std::time::{Duration, Instant};

/// A monitor that terminates the search after a specified duration.
///
/// Checks the clock only every `check_interval` polls to minimize overhead.
#[derive(Debug, Clone)]
pub struct TimeLimitMonitor {
    time_limit: Duration,
    start_time: Option<Instant>,
    check_interval: u64,
    polls_since_last_check: u64,
}

impl TimeLimitMonitor {
    /// Creates a new `TimeLimitMonitor` with the given duration and check interval.
    /// A higher interval reduces overhead but may overshoot the limit slightly.
    pub fn new(duration: Duration, check_interval: u64) -> Self {
        Self {
            time_limit: duration,
            start_time: None,
            check_interval: check_interval.max(1),
            polls_since_last_check: 0,
        }
    }

    /// Creates a new `TimeLimitMonitor` that checks the clock every 10,000 polls.
    pub fn with_default_check_interval(duration: Duration) -> Self {
        Self::new(duration, 10_000)
    }
}

impl SearchMonitor for TimeLimitMonitor {
    fn name(&self) -> &str {
        "TimeLimitMonitor"
    }

    fn on_enter_search(&mut self, _board: &Board, _puzzle: &Puzzle, _stats: &SearchStatistics) {
        self.start_time = Some(Instant::now());
        self.polls_since_last_check = 0;
    }

    fn search_command(&mut self, _stats: &SearchStatistics) -> SearchCommand {
        self.polls_since_last_check = self.polls_since_last_check.saturating_add_val(1);

        if self.polls_since_last_check >= self.check_interval {
            self.polls_since_last_check = 0;

            if let Some(start) = self.start_time {
                if start.elapsed() > self.time_limit {
                    return SearchCommand::Terminate(format!(
                        "Time limit of {:.3} seconds exceeded",
                        self.time_limit.as_secs_f64()
                    ));
                }
            }
        }

        SearchCommand::Continue
    }

    fn on_iteration(&mut self, _depth: usize, _stats: &SearchStatistics) {}
    fn on_step(&mut self, _depth: usize, _stats: &SearchStatistics) {}
    fn on_prune(&mut self, _reason: PruneReason, _stats: &SearchStatistics) {}
    fn on_solution_found(&mut self, _solution: &Solution, _stats: &SearchStatistics) {}

    fn on_exit_search(&mut self, _stats: &SearchStatistics) {
        self.start_time = None;
    }
}
