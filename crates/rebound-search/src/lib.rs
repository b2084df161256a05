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

//! # Rebound Search
//!
//! Shared plumbing for the search strategies (`rebound_iddfs`,
//! `rebound_bfs`) and the solver front-end.
//!
//! ## Modules
//!
//! - `monitor`: The `SearchMonitor` trait and ready-made monitors
//!   (composite fan-out, interrupt flag, time limit, logging, no-op).
//! - `options`: `SearchOptions` and `SolutionMode`, the immutable
//!   configuration handed to a strategy.
//! - `result`: `SolverOutcome`, `SolverResult` and `TerminationReason`.
//! - `setup`: `SearchSetup`, which normalizes a puzzle into the goal-last
//!   slot order every strategy works in and short-circuits trivial puzzles.
//! - `stats`: `SearchStatistics`, the counters every strategy maintains.

pub mod monitor;
pub mod options;
pub mod result;
pub mod setup;
pub mod stats;
