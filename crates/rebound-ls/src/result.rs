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

//! Run optimizer outcome and termination reporting.
//!
//! A `RunOptimizerOutcome` carries the reordered solution, the statistics of
//! the run, and why the optimizer stopped. The returned solution is always
//! valid, whatever the reason: it is the best ordering seen so far.

use crate::stats::RunOptimizerStatistics;
use rebound_model::solution::Solution;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunOptimizerTerminationReason {
    /// One run per robot moved; nothing can be improved.
    MinimumReached,

    /// Every reachable ordering was visited.
    Exhausted,

    /// The expansion budget ran out before the space was exhausted.
    BudgetExhausted,

    /// The solution was left alone because its move order is meaningful.
    Skipped,
}

impl std::fmt::Display for RunOptimizerTerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunOptimizerTerminationReason::MinimumReached => write!(f, "Minimum Reached"),
            RunOptimizerTerminationReason::Exhausted => write!(f, "Search Space Exhausted"),
            RunOptimizerTerminationReason::BudgetExhausted => write!(f, "Budget Exhausted"),
            RunOptimizerTerminationReason::Skipped => write!(f, "Skipped"),
        }
    }
}

/// Result of the run optimizer after termination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptimizerOutcome {
    termination_reason: RunOptimizerTerminationReason,
    solution: Solution,
    statistics: RunOptimizerStatistics,
}

impl RunOptimizerOutcome {
    #[inline]
    pub fn new(
        termination_reason: RunOptimizerTerminationReason,
        solution: Solution,
        statistics: RunOptimizerStatistics,
    ) -> Self {
        Self {
            termination_reason,
            solution,
            statistics,
        }
    }

    /// Returns the termination reason.
    #[inline]
    pub fn termination_reason(&self) -> RunOptimizerTerminationReason {
        self.termination_reason
    }

    /// Returns the reordered solution.
    #[inline]
    pub fn solution(&self) -> &Solution {
        &self.solution
    }

    /// Returns the statistics.
    #[inline]
    pub fn statistics(&self) -> &RunOptimizerStatistics {
        &self.statistics
    }

    /// Consumes the outcome, returning the reordered solution.
    #[inline]
    pub fn into_solution(self) -> Solution {
        self.solution
    }
}

impl std::fmt::Display for RunOptimizerOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Termination: {}", self.termination_reason)?;
        writeln!(f, "{}", self.solution.summary())?;
        write!(f, "{}", self.statistics)
    }
}
