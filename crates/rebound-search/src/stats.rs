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

use rebound_core::num::saturating::SaturatingAddVal;
use std::time::Duration;

/// Statistics collected while a strategy searches.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchStatistics {
    /// Total states expanded (IDDFS recursion entries, BFS dequeues).
    pub nodes_explored: u64,
    /// Total keys recorded in the visited store.
    pub states_stored: u64,
    /// Branches abandoned because the heuristic ruled the goal out.
    pub prunings_heuristic: u64,
    /// Branches abandoned because the state was already explored.
    pub prunings_duplicate: u64,
    /// Depth limits (IDDFS) or layers (BFS) started.
    pub iterations: u64,
    /// The deepest move count reached.
    pub max_depth: u64,
    /// Total solutions recorded.
    pub solutions_found: u64,
    /// Bytes held by the visited store at the end of the search.
    pub memory_bytes: u64,
    /// Total time spent in the strategy.
    pub time_total: Duration,
}

impl SearchStatistics {
    #[inline]
    pub fn on_node_explored(&mut self) {
        self.nodes_explored = self.nodes_explored.saturating_add_val(1);
    }

    #[inline]
    pub fn on_state_stored(&mut self) {
        self.states_stored = self.states_stored.saturating_add_val(1);
    }

    #[inline]
    pub fn on_pruning_heuristic(&mut self) {
        self.prunings_heuristic = self.prunings_heuristic.saturating_add_val(1);
    }

    #[inline]
    pub fn on_pruning_duplicate(&mut self) {
        self.prunings_duplicate = self.prunings_duplicate.saturating_add_val(1);
    }

    #[inline]
    pub fn on_iteration(&mut self) {
        self.iterations = self.iterations.saturating_add_val(1);
    }

    #[inline]
    pub fn on_depth_update(&mut self, depth: u64) {
        self.max_depth = self.max_depth.max(depth);
    }

    #[inline]
    pub fn on_solution_found(&mut self) {
        self.solutions_found = self.solutions_found.saturating_add_val(1);
    }

    #[inline]
    pub fn set_memory_bytes(&mut self, bytes: usize) {
        self.memory_bytes = bytes as u64;
    }

    #[inline]
    pub fn set_total_time(&mut self, duration: Duration) {
        self.time_total = duration;
    }
}

impl std::fmt::Display for SearchStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Rebound Search Statistics:")?;
        writeln!(f, "  Nodes explored:       {}", self.nodes_explored)?;
        writeln!(f, "  States stored:        {}", self.states_stored)?;
        writeln!(f, "  Prunings (heuristic): {}", self.prunings_heuristic)?;
        writeln!(f, "  Prunings (duplicate): {}", self.prunings_duplicate)?;
        writeln!(f, "  Iterations:           {}", self.iterations)?;
        writeln!(f, "  Max depth reached:    {}", self.max_depth)?;
        writeln!(f, "  Solutions found:      {}", self.solutions_found)?;
        writeln!(f, "  Memory used:          {} bytes", self.memory_bytes)?;
        writeln!(f, "  Total time:           {:.2?}", self.time_total)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_increment() {
        let mut stats = SearchStatistics::default();
        stats.on_node_explored();
        stats.on_node_explored();
        stats.on_state_stored();
        stats.on_pruning_heuristic();
        stats.on_pruning_duplicate();
        stats.on_iteration();
        stats.on_solution_found();
        stats.on_depth_update(4);
        stats.on_depth_update(2);
        stats.set_memory_bytes(1024);

        assert_eq!(stats.nodes_explored, 2);
        assert_eq!(stats.states_stored, 1);
        assert_eq!(stats.prunings_heuristic, 1);
        assert_eq!(stats.prunings_duplicate, 1);
        assert_eq!(stats.iterations, 1);
        assert_eq!(stats.solutions_found, 1);
        assert_eq!(stats.max_depth, 4);
        assert_eq!(stats.memory_bytes, 1024);
    }

    #[test]
    fn test_counters_saturate() {
        let mut stats = SearchStatistics {
            nodes_explored: u64::MAX,
            ..Default::default()
        };
        stats.on_node_explored();
        assert_eq!(stats.nodes_explored, u64::MAX);
    }

    #[test]
    fn test_display_lists_counters() {
        let text = format!("{}", SearchStatistics::default());
        assert!(text.starts_with("Rebound Search Statistics:"));
        assert!(text.contains("States stored:        0"));
    }
}
