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

//! Ordering of candidate solutions.
//!
//! Solutions of the minimal move count are ordered by the number of distinct
//! robots moved (fewest first under `Minimum`, most first under `Maximum`),
//! then by the mask of robots moved, then by the packed final placement, so
//! the result is deterministic whatever order the strategy produced them in.

use rebound_model::solution::Solution;
use rebound_search::options::SolutionMode;
use std::cmp::Ordering;

/// Compares two solutions under `mode`.
pub fn compare_solutions(
    a: &Solution,
    b: &Solution,
    mode: SolutionMode,
    bits_per_cell: u32,
) -> Ordering {
    a.len()
        .cmp(&b.len())
        .then_with(|| {
            let robots = a.num_robots_moved().cmp(&b.num_robots_moved());
            match mode {
                SolutionMode::Maximum => robots.reverse(),
                _ => robots,
            }
        })
        .then_with(|| a.robots_moved().cmp(&b.robots_moved()))
        .then_with(|| {
            a.packed_final_positions(bits_per_cell)
                .cmp(&b.packed_final_positions(bits_per_cell))
        })
}

/// Orders `solutions` for presentation and removes exact duplicates.
///
/// `Any` keeps only the first solution, in the order found.
pub fn rank_solutions(
    mut solutions: Vec<Solution>,
    mode: SolutionMode,
    bits_per_cell: u32,
) -> Vec<Solution> {
    if mode == SolutionMode::Any {
        solutions.truncate(1);
        return solutions;
    }

    solutions.sort_by(|a, b| compare_solutions(a, b, mode, bits_per_cell));

    let mut ranked: Vec<Solution> = Vec::with_capacity(solutions.len());
    for solution in solutions {
        let duplicate = ranked
            .iter()
            .rev()
            .take_while(|kept| compare_solutions(kept, &solution, mode, bits_per_cell).is_eq())
            .any(|kept| *kept == solution);
        if !duplicate {
            ranked.push(solution);
        }
    }
    ranked
}
