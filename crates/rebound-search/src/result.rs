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

use crate::stats::SearchStatistics;
use rebound_model::solution::Solution;

/// What a search produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolverResult {
    /// We have proven that no solution exists within the depth limit.
    Infeasible,
    /// Solutions of proven minimal move count.
    Optimal(Vec<Solution>),
    /// The search stopped before proving anything.
    Unknown,
}

impl std::fmt::Display for SolverResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolverResult::Infeasible => write!(f, "Infeasible"),
            SolverResult::Optimal(solutions) => match solutions.first() {
                Some(best) => write!(
                    f,
                    "Optimal(moves={}, solutions={})",
                    best.len(),
                    solutions.len()
                ),
                None => write!(f, "Optimal(solutions=0)"),
            },
            SolverResult::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Why a search stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminationReason {
    /// The search found solutions and proved their move count minimal.
    OptimalityProven,
    /// The search exhausted its depth limit without a solution.
    InfeasibilityProven,
    /// A monitor stopped the search. The string carries its reason.
    Aborted(String),
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminationReason::OptimalityProven => write!(f, "Optimality Proven"),
            TerminationReason::InfeasibilityProven => write!(f, "Infeasibility Proven"),
            TerminationReason::Aborted(reason) => write!(f, "Aborted: {}", reason),
        }
    }
}

/// Result, termination reason and statistics of one search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverOutcome {
    result: SolverResult,
    termination_reason: TerminationReason,
    statistics: SearchStatistics,
}

impl SolverOutcome {
    /// Solutions of proven minimal length.
    ///
    /// # Panics
    ///
    /// Panics if `solutions` is empty.
    #[inline]
    pub fn optimal(solutions: Vec<Solution>, statistics: SearchStatistics) -> Self {
        assert!(
            !solutions.is_empty(),
            "called `SolverOutcome::optimal` without any solution"
        );
        Self {
            result: SolverResult::Optimal(solutions),
            termination_reason: TerminationReason::OptimalityProven,
            statistics,
        }
    }

    #[inline]
    pub fn infeasible(statistics: SearchStatistics) -> Self {
        Self {
            result: SolverResult::Infeasible,
            termination_reason: TerminationReason::InfeasibilityProven,
            statistics,
        }
    }

    /// A cancelled search. Partial solutions are never reported.
    #[inline]
    pub fn aborted<R>(reason: R, statistics: SearchStatistics) -> Self
    where
        R: Into<String>,
    {
        Self {
            result: SolverResult::Unknown,
            termination_reason: TerminationReason::Aborted(reason.into()),
            statistics,
        }
    }

    #[inline]
    pub fn result(&self) -> &SolverResult {
        &self.result
    }

    #[inline]
    pub fn termination_reason(&self) -> &TerminationReason {
        &self.termination_reason
    }

    #[inline]
    pub fn statistics(&self) -> &SearchStatistics {
        &self.statistics
    }

    #[inline]
    pub fn statistics_mut(&mut self) -> &mut SearchStatistics {
        &mut self.statistics
    }

    /// Returns the solutions, or an empty slice if there are none.
    #[inline]
    pub fn solutions(&self) -> &[Solution] {
        match &self.result {
            SolverResult::Optimal(solutions) => solutions,
            _ => &[],
        }
    }

    /// Returns the first solution.
    #[inline]
    pub fn best(&self) -> Option<&Solution> {
        self.solutions().first()
    }

    /// Replaces the solution list of an optimal outcome.
    ///
    /// # Panics
    ///
    /// Panics if the outcome is not optimal or `f` returns no solutions.
    pub fn map_solutions<F>(self, f: F) -> Self
    where
        F: FnOnce(Vec<Solution>) -> Vec<Solution>,
    {
        match self.result {
            SolverResult::Optimal(solutions) => {
                let mapped = f(solutions);
                Self::optimal(mapped, self.statistics)
            }
            _ => panic!("called `SolverOutcome::map_solutions` on a non-optimal outcome"),
        }
    }

    #[inline]
    pub fn is_optimal(&self) -> bool {
        matches!(self.result, SolverResult::Optimal(_))
    }

    #[inline]
    pub fn is_infeasible(&self) -> bool {
        matches!(self.result, SolverResult::Infeasible)
    }

    #[inline]
    pub fn is_aborted(&self) -> bool {
        matches!(self.termination_reason, TerminationReason::Aborted(_))
    }
}

impl std::fmt::Display for SolverOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Result: {}", self.result)?;
        writeln!(f, "Termination: {}", self.termination_reason)?;
        for solution in self.solutions() {
            writeln!(f, "  {}", solution.summary())?;
        }
        write!(f, "{}", self.statistics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rebound_model::{board::DEFAULT_LABELS, index::CellIndex};

    fn trivial() -> Solution {
        Solution::new(&[CellIndex::new(3)], Vec::new(), DEFAULT_LABELS)
    }

    #[test]
    fn test_optimal_outcome() {
        let outcome = SolverOutcome::optimal(vec![trivial()], SearchStatistics::default());
        assert!(outcome.is_optimal());
        assert!(!outcome.is_aborted());
        assert_eq!(outcome.solutions().len(), 1);
        assert_eq!(outcome.best().map(|s| s.len()), Some(0));
        assert_eq!(outcome.termination_reason(), &TerminationReason::OptimalityProven);
    }

    #[test]
    fn test_aborted_is_not_infeasible() {
        let outcome = SolverOutcome::aborted("Interrupt signal received", SearchStatistics::default());
        assert!(outcome.is_aborted());
        assert!(!outcome.is_infeasible());
        assert_eq!(outcome.result(), &SolverResult::Unknown);
        assert!(outcome.solutions().is_empty());
        assert_eq!(
            format!("{}", outcome.termination_reason()),
            "Aborted: Interrupt signal received"
        );
    }

    #[test]
    fn test_infeasible_outcome() {
        let outcome = SolverOutcome::infeasible(SearchStatistics::default());
        assert!(outcome.is_infeasible());
        assert!(outcome.best().is_none());
    }

    #[test]
    fn test_map_solutions() {
        let outcome = SolverOutcome::optimal(vec![trivial(), trivial()], SearchStatistics::default());
        let mapped = outcome.map_solutions(|mut s| {
            s.truncate(1);
            s
        });
        assert_eq!(mapped.solutions().len(), 1);
    }

    #[test]
    #[should_panic(expected = "called `SolverOutcome::optimal` without any solution")]
    fn test_optimal_requires_solutions() {
        let _ = SolverOutcome::optimal(Vec::new(), SearchStatistics::default());
    }

    #[test]
    #[should_panic(expected = "called `SolverOutcome::map_solutions` on a non-optimal outcome")]
    fn test_map_solutions_on_infeasible_panics() {
        let _ = SolverOutcome::infeasible(SearchStatistics::default()).map_solutions(|s| s);
    }
}
