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

//! Progress reporting through the `log` facade.
//!
//! `LogMonitor` writes a header when the search starts, one line per depth
//! limit or layer, periodic progress lines throttled by a node mask and a
//! wall-clock interval, and a closing summary. Solutions are logged at
//! `debug` level. Nothing is printed unless the application installs a
//! logger.

use crate::{
    monitor::search_monitor::{PruneReason, SearchMonitor},
    stats::SearchStatistics,
};
use rebound_model::{board::Board, puzzle::Puzzle, solution::Solution};
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct LogMonitor {
    start_time: Instant,
    last_log_time: Instant,
    log_interval: Duration,
    clock_check_mask: u64,
    best_summary: Option<String>,
}

impl LogMonitor {
    /// Creates a monitor that logs at most once per `log_interval`, reading
    /// the clock only when `nodes_explored & clock_check_mask == 0`.
    pub fn new(log_interval: Duration, clock_check_mask: u64) -> Self {
        Self {
            start_time: Instant::now(),
            last_log_time: Instant::now(),
            log_interval,
            clock_check_mask,
            best_summary: None,
        }
    }

    #[inline(always)]
    fn log_header(&self) {
        log::info!(
            "{:<9} | {:<6} | {:<14} | {:<12} | {:<12} | {:<12} | {:<10}",
            "Elapsed",
            "Depth",
            "Nodes",
            "Stored",
            "Pruned (H)",
            "Pruned (D)",
            "Memory"
        );
    }

    #[inline(always)]
    fn log_line(&mut self, depth: usize, stats: &SearchStatistics) {
        let now = Instant::now();
        let elapsed = format!("{:.1}s", now.duration_since(self.start_time).as_secs_f32());
        let memory = format!("{:.1}MiB", stats.memory_bytes as f64 / (1024.0 * 1024.0));

        log::info!(
            "{:<9} | {:<6} | {:<14} | {:<12} | {:<12} | {:<12} | {:<10}",
            elapsed,
            depth,
            stats.nodes_explored,
            stats.states_stored,
            stats.prunings_heuristic,
            stats.prunings_duplicate,
            memory
        );

        self.last_log_time = now;
    }
}

impl Default for LogMonitor {
    fn default() -> Self {
        Self::new(Duration::from_secs(1), 4095)
    }
}

impl std::fmt::Display for LogMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "LogMonitor(log_interval: {}s, clock_check_mask: {})",
            self.log_interval.as_secs(),
            self.clock_check_mask
        )
    }
}

impl SearchMonitor for LogMonitor {
    fn name(&self) -> &str {
        "LogMonitor"
    }

    fn on_enter_search(&mut self, board: &Board, puzzle: &Puzzle, _stats: &SearchStatistics) {
        self.start_time = Instant::now();
        self.last_log_time = self.start_time;
        self.best_summary = None;

        let goal = match puzzle.goal() {
            Some(g) if g.is_wildcard() => format!("cell {} (any robot)", g.cell().get()),
            Some(g) => format!("cell {} ({:?})", g.cell().get(), g.robot()),
            None => "none".to_string(),
        };
        log::info!(
            "Searching {}x{} board with {} robots, goal {}",
            board.width(),
            board.height(),
            puzzle.num_robots(),
            goal
        );
        self.log_header();
    }

    fn on_iteration(&mut self, depth: usize, stats: &SearchStatistics) {
        self.log_line(depth, stats);
    }

    fn on_step(&mut self, depth: usize, stats: &SearchStatistics) {
        if (stats.nodes_explored & self.clock_check_mask) == 0
            && self.last_log_time.elapsed() >= self.log_interval
        {
            self.log_line(depth, stats);
        }
    }

    fn on_prune(&mut self, _reason: PruneReason, _stats: &SearchStatistics) {}

    fn on_solution_found(&mut self, solution: &Solution, _stats: &SearchStatistics) {
        log::debug!("Solution found: {}", solution.summary());
        if self.best_summary.is_none() {
            self.best_summary = Some(solution.summary());
        }
    }

    fn on_exit_search(&mut self, stats: &SearchStatistics) {
        log::info!(
            "Search finished after {:.3}s: {} nodes, {} states stored, {} solutions, first {}",
            self.start_time.elapsed().as_secs_f64(),
            stats.nodes_explored,
            stats.states_stored,
            stats.solutions_found,
            self.best_summary.as_deref().unwrap_or("-")
        );
    }
}
