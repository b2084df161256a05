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

//! Statistics reporting for run optimization.
//!
//! Counts orderings expanded, adjacent-run swaps attempted and accepted, and
//! the run counts before and after. Updates use saturating arithmetic.

use rebound_core::num::saturating::SaturatingAddVal;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct RunOptimizerStatistics {
    /// Number of orderings expanded.
    pub iterations: u64,

    /// Number of adjacent-run swaps attempted.
    pub swaps_attempted: u64,

    /// Number of swaps that produced a new valid ordering.
    pub swaps_accepted: u64,

    /// Runs in the input solution.
    pub initial_runs: u64,

    /// Runs in the returned solution.
    pub final_runs: u64,

    /// Total time taken by the optimizer.
    pub time_total: Duration,
}

impl RunOptimizerStatistics {
    #[inline]
    pub fn on_iteration(&mut self) {
        self.iterations = self.iterations.saturating_add_val(1);
    }

    #[inline]
    pub fn on_swap_attempted(&mut self) {
        self.swaps_attempted = self.swaps_attempted.saturating_add_val(1);
    }

    #[inline]
    pub fn on_swap_accepted(&mut self) {
        self.swaps_accepted = self.swaps_accepted.saturating_add_val(1);
    }

    #[inline]
    pub fn set_runs(&mut self, initial: usize, final_runs: usize) {
        self.initial_runs = initial as u64;
        self.final_runs = final_runs as u64;
    }

    /// Sets the total time taken by the optimizer.
    #[inline]
    pub fn set_total_time(&mut self, duration: Duration) {
        self.time_total = duration;
    }

    #[inline]
    pub fn rejected_swaps(&self) -> u64 {
        self.swaps_attempted.saturating_sub(self.swaps_accepted)
    }
}

impl std::fmt::Display for RunOptimizerStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Rebound Run Optimizer Statistics:")?;
        writeln!(f, "   Iterations:        {}", self.iterations)?;
        writeln!(f, "   Swaps Attempted:   {}", self.swaps_attempted)?;
        writeln!(f, "   Swaps Accepted:    {}", self.swaps_accepted)?;
        writeln!(f, "   Swaps Rejected:    {}", self.rejected_swaps())?;
        writeln!(f, "   Runs:              {} -> {}", self.initial_runs, self.final_runs)?;
        writeln!(f, "   Total Time:        {:?}", self.time_total)?;
        Ok(())
    }
}
