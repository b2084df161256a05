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

//! # Solver front-end
//!
//! `Solver` is what callers use to solve a puzzle. It validates the puzzle,
//! assembles the monitor stack (interrupt flag, time limit, progress logging
//! and any user monitors), runs the configured strategy, ranks the solutions
//! and finally reorders each one to switch robots as rarely as possible.
//!
//! ## Usage
//!
//! ```rust
//! use rebound_model::{
//!     board::BoardBuilder,
//!     index::{CellIndex, RobotIndex},
//!     puzzle::{Goal, Puzzle},
//! };
//! use rebound_search::options::SolutionMode;
//! use rebound_solver::solver::{SolverBuilder, Strategy};
//!
//! let board = BoardBuilder::new(4, 4).build();
//! let puzzle = Puzzle::new(
//!     [CellIndex::new(0)],
//!     Some(Goal::for_robot(CellIndex::new(15), RobotIndex::new(0))),
//! );
//!
//! let mut solver = SolverBuilder::new()
//!     .with_strategy(Strategy::Bfs)
//!     .with_mode(SolutionMode::Minimum)
//!     .build();
//!
//! let outcome = solver.solve(&board, &puzzle).unwrap();
//! assert_eq!(outcome.best().map(|s| s.len()), Some(2));
//! ```

use crate::ranking::rank_solutions;
use rebound_bfs::bfs::BfsSolver;
use rebound_iddfs::iddfs::IddfsSolver;
use rebound_ls::{
    optimizer::{RunOptimizer, DEFAULT_BUDGET},
    result::RunOptimizerTerminationReason,
};
use rebound_model::{
    board::Board,
    puzzle::{Puzzle, PuzzleError},
};
use rebound_search::{
    monitor::{
        composite::CompositeSearchMonitor, interrupt::InterruptMonitor, log::LogMonitor,
        search_monitor::SearchMonitor, time_limit::TimeLimitMonitor,
    },
    options::{SearchOptions, SolutionMode, DEFAULT_MAX_DEPTH},
    result::SolverOutcome,
    setup::{Prepared, SearchSetup},
};
use rebound_store::key::MAX_KEY_BITS;
use std::{sync::atomic::AtomicBool, time::Duration};

/// Search strategy used by a `Solver`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Strategy {
    /// Iterative deepening with a distance heuristic.
    #[default]
    Iddfs,
    /// Exhaustive breadth-first search.
    Bfs,
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::Iddfs => write!(f, "IDDFS"),
            Strategy::Bfs => write!(f, "BFS"),
        }
    }
}

pub struct Solver<'a> {
    strategy: Strategy,
    mode: SolutionMode,
    options: SearchOptions,
    run_optimizer: Option<RunOptimizer>,
    time_limit: Option<Duration>,
    interrupt: Option<&'a AtomicBool>,
    log_progress: bool,
    monitors: CompositeSearchMonitor<'a>,
    iddfs: IddfsSolver,
}

impl<'a> Solver<'a> {
    #[inline]
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    #[inline]
    pub fn mode(&self) -> SolutionMode {
        self.mode
    }

    #[inline]
    pub fn options(&self) -> SearchOptions {
        self.options
    }

    #[inline]
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit
    }

    #[inline]
    pub fn has_time_limit(&self) -> bool {
        self.time_limit.is_some()
    }

    #[inline]
    pub fn optimizes_runs(&self) -> bool {
        self.run_optimizer.is_some()
    }

    /// Adds a monitor that observes every later solve.
    #[inline]
    pub fn add_monitor<M>(&mut self, monitor: M)
    where
        M: SearchMonitor + 'a,
    {
        self.monitors.add_monitor(monitor);
    }

    /// Solves `puzzle` on `board`.
    ///
    /// Returns an error if the puzzle does not fit the board, or if the
    /// board is too large to key its search states. A cancelled search is
    /// not an error: it yields an aborted outcome without solutions.
    pub fn solve(&mut self, board: &Board, puzzle: &Puzzle) -> Result<SolverOutcome, PuzzleError> {
        puzzle.validate(board)?;

        let options = self
            .options
            .first_solution_only(self.mode == SolutionMode::Any);

        if let Prepared::Search(setup) = SearchSetup::prepare(board, puzzle) {
            let bits = setup.state_key_bits(options.rebounds_allowed(), setup.is_one_move());
            if bits > MAX_KEY_BITS {
                return Err(PuzzleError::StateTooWide {
                    bits,
                    limit: MAX_KEY_BITS,
                });
            }
        }

        let mut monitor = CompositeSearchMonitor::with_capacity(4);
        if let Some(flag) = self.interrupt {
            monitor.add_monitor(InterruptMonitor::new(flag));
        }
        if let Some(limit) = self.time_limit {
            monitor.add_monitor(TimeLimitMonitor::with_default_check_interval(limit));
        }
        if self.log_progress {
            monitor.add_monitor(LogMonitor::default());
        }
        monitor.add_monitor(&mut self.monitors);

        log::debug!(
            "Solving with {} (mode: {}, rebounds: {}, max depth: {})",
            self.strategy,
            self.mode,
            options.rebounds_allowed(),
            options.depth_limit()
        );

        let outcome = match self.strategy {
            Strategy::Iddfs => self.iddfs.solve(board, puzzle, options, &mut monitor),
            Strategy::Bfs => BfsSolver::new().solve(board, puzzle, options, &mut monitor),
        };
        drop(monitor);

        if !outcome.is_optimal() {
            return Ok(outcome);
        }

        let mode = self.mode;
        let bits_per_cell = board.bits_per_cell();
        let run_optimizer = self.run_optimizer;
        Ok(outcome.map_solutions(|solutions| {
            let solutions = match run_optimizer {
                Some(optimizer) => solutions
                    .iter()
                    .map(|solution| {
                        let reordered = optimizer.optimize(board, solution);
                        if reordered.termination_reason()
                            == RunOptimizerTerminationReason::BudgetExhausted
                        {
                            log::debug!(
                                "Run optimization of {} stopped after {} orderings",
                                solution.summary(),
                                reordered.statistics().iterations
                            );
                        }
                        reordered.into_solution()
                    })
                    .collect(),
                None => solutions,
            };
            rank_solutions(solutions, mode, bits_per_cell)
        }))
    }
}

impl std::fmt::Debug for Solver<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Solver")
            .field("strategy", &self.strategy)
            .field("mode", &self.mode)
            .field("options", &self.options)
            .field("run_optimizer", &self.run_optimizer)
            .field("time_limit", &self.time_limit)
            .field("monitors", &self.monitors.len())
            .finish()
    }
}

pub struct SolverBuilder<'a> {
    strategy: Strategy,
    mode: SolutionMode,
    allow_rebounds: bool,
    max_depth: usize,
    optimize_runs: bool,
    run_budget: u64,
    time_limit: Option<Duration>,
    interrupt: Option<&'a AtomicBool>,
    log_progress: bool,
    monitors: CompositeSearchMonitor<'a>,
}

impl Default for SolverBuilder<'_> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> SolverBuilder<'a> {
    #[inline]
    pub fn new() -> Self {
        Self {
            strategy: Strategy::default(),
            mode: SolutionMode::default(),
            allow_rebounds: true,
            max_depth: DEFAULT_MAX_DEPTH,
            optimize_runs: true,
            run_budget: DEFAULT_BUDGET,
            time_limit: None,
            interrupt: None,
            log_progress: false,
            monitors: CompositeSearchMonitor::new(),
        }
    }

    #[inline]
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    #[inline]
    pub fn with_mode(mut self, mode: SolutionMode) -> Self {
        self.mode = mode;
        self
    }

    #[inline]
    pub fn with_rebounds(mut self, allow: bool) -> Self {
        self.allow_rebounds = allow;
        self
    }

    /// Sets the hard maximum on the number of moves.
    ///
    /// # Panics
    ///
    /// `build` panics unless `depth` is in `1..=255`.
    #[inline]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    #[inline]
    pub fn with_run_optimization(mut self, enabled: bool) -> Self {
        self.optimize_runs = enabled;
        self
    }

    #[inline]
    pub fn with_run_budget(mut self, budget: u64) -> Self {
        self.run_budget = budget;
        self
    }

    #[inline]
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Stops any solve as soon as `flag` is set.
    #[inline]
    pub fn with_interrupt(mut self, flag: &'a AtomicBool) -> Self {
        self.interrupt = Some(flag);
        self
    }

    /// Reports progress through the `log` facade.
    #[inline]
    pub fn with_progress_logging(mut self, enabled: bool) -> Self {
        self.log_progress = enabled;
        self
    }

    #[inline]
    pub fn add_monitor<M>(mut self, monitor: M) -> Self
    where
        M: SearchMonitor + 'a,
    {
        self.monitors.add_monitor(monitor);
        self
    }

    pub fn build(self) -> Solver<'a> {
        let options = SearchOptions::new()
            .allow_rebounds(self.allow_rebounds)
            .max_depth(self.max_depth);

        Solver {
            strategy: self.strategy,
            mode: self.mode,
            options,
            run_optimizer: self
                .optimize_runs
                .then(|| RunOptimizer::with_budget(self.run_budget)),
            time_limit: self.time_limit,
            interrupt: self.interrupt,
            log_progress: self.log_progress,
            monitors: self.monitors,
            iddfs: IddfsSolver::preallocated(self.max_depth),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;
    use rebound_model::{
        board::BoardBuilder,
        direction::Direction,
        index::{CellIndex, RobotIndex},
        puzzle::Goal,
        solution::Solution,
    };
    use rebound_search::{
        monitor::search_monitor::{PruneReason, SearchCommand},
        result::SolverResult,
        stats::SearchStatistics,
    };
    use rustc_hash::FxHashSet;
    use std::{cell::RefCell, ops::RangeInclusive, rc::Rc};

    const STRATEGIES: [Strategy; 2] = [Strategy::Iddfs, Strategy::Bfs];

    fn corner_puzzle() -> (Board, Puzzle) {
        let board = BoardBuilder::new(4, 4).build();
        let puzzle = Puzzle::new(
            [CellIndex::new(0)],
            Some(Goal::for_robot(CellIndex::new(15), RobotIndex::new(0))),
        );
        (board, puzzle)
    }

    fn rebound_puzzle() -> (Board, Puzzle) {
        let mut builder = BoardBuilder::new(4, 2);
        let cell = builder.cell(1, 0);
        builder.add_wall(cell, Direction::South);
        let board = builder.build();
        let puzzle = Puzzle::new(
            [CellIndex::new(0), CellIndex::new(4)],
            Some(Goal::for_robot(CellIndex::new(1), RobotIndex::new(0))),
        );
        (board, puzzle)
    }

    /// A 6x6 board with a handful of random walls, 1 to 3 robots and a goal
    /// for one of them.
    fn random_puzzle<R: Rng>(rng: &mut R) -> (Board, Puzzle) {
        random_puzzle_with(rng, 1..=3, false)
    }

    /// A 6x6 board with a handful of random walls and `robots` robots. The
    /// goal is either a wildcard or for a random robot.
    fn random_puzzle_with<R: Rng>(
        rng: &mut R,
        robots: RangeInclusive<usize>,
        wildcard: bool,
    ) -> (Board, Puzzle) {
        let mut builder = BoardBuilder::new(6, 6);
        for _ in 0..rng.gen_range(0..10) {
            let cell = CellIndex::new(rng.gen_range(0..36));
            let direction = Direction::ALL[rng.gen_range(0..4)];
            builder.add_wall(cell, direction);
        }
        let board = builder.build();

        let mut cells: Vec<usize> = (0..36).collect();
        cells.shuffle(rng);
        let num_robots = rng.gen_range(robots);
        let placement = cells[..num_robots].iter().map(|&c| CellIndex::new(c));
        let target = CellIndex::new(cells[num_robots]);
        let goal = if wildcard {
            Goal::wildcard(target)
        } else {
            Goal::for_robot(target, RobotIndex::new(rng.gen_range(0..num_robots)))
        };
        (board, Puzzle::new(placement, Some(goal)))
    }

    /// Solves `boards` random puzzles with both strategies and checks that
    /// they agree on the minimum move count. BFS stops at `bfs_depth`;
    /// puzzles it cannot solve within that are skipped.
    fn assert_strategies_agree(
        seed: u64,
        boards: usize,
        robots: RangeInclusive<usize>,
        wildcard: bool,
        rebounds: bool,
        bfs_depth: usize,
    ) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut solved = 0;
        for _ in 0..boards {
            let (board, puzzle) = random_puzzle_with(&mut rng, robots.clone(), wildcard);
            let bfs = SolverBuilder::new()
                .with_strategy(Strategy::Bfs)
                .with_rebounds(rebounds)
                .with_max_depth(bfs_depth)
                .build()
                .solve(&board, &puzzle)
                .unwrap();
            let Some(expected) = bfs.best().map(Solution::len) else {
                continue;
            };
            solved += 1;

            // Bounded so that an unexpected miss fails fast instead of
            // deepening to the default maximum.
            let iddfs = SolverBuilder::new()
                .with_strategy(Strategy::Iddfs)
                .with_rebounds(rebounds)
                .with_max_depth(expected.max(1) + 1)
                .build()
                .solve(&board, &puzzle)
                .unwrap();
            assert_eq!(
                iddfs.best().map(Solution::len),
                Some(expected),
                "rebounds: {}\n{}",
                rebounds,
                board
            );

            for s in bfs.solutions().iter().chain(iddfs.solutions()) {
                assert!(s.replay(&board), "{}", s);
                assert_eq!(s.len(), expected);
                if !rebounds {
                    assert!(!s.has_rebound(), "{}", s);
                }
            }
        }
        assert!(solved > 0);
    }

    #[test]
    fn test_scenario_goal_already_reached() {
        let board = BoardBuilder::new(4, 4).build();
        let puzzle = Puzzle::new(
            [CellIndex::new(6), CellIndex::new(9)],
            Some(Goal::for_robot(CellIndex::new(9), RobotIndex::new(1))),
        );
        for strategy in STRATEGIES {
            let mut solver = SolverBuilder::new().with_strategy(strategy).build();
            let outcome = solver.solve(&board, &puzzle).unwrap();
            assert_eq!(outcome.solutions().len(), 1);
            assert!(outcome.solutions()[0].is_empty());
        }
    }

    #[test]
    fn test_no_goal_yields_empty_solution() {
        let board = BoardBuilder::new(4, 4).build();
        let puzzle = Puzzle::new([CellIndex::new(6)], None);
        let outcome = SolverBuilder::new().build().solve(&board, &puzzle).unwrap();
        assert_eq!(outcome.best().map(|s| s.len()), Some(0));
    }

    #[test]
    fn test_scenario_two_slides() {
        let (board, puzzle) = corner_puzzle();
        for strategy in STRATEGIES {
            let mut solver = SolverBuilder::new().with_strategy(strategy).build();
            let outcome = solver.solve(&board, &puzzle).unwrap();
            assert!(outcome.is_optimal());
            assert_eq!(outcome.solutions().len(), 2, "{}", strategy);
            assert!(outcome.solutions().iter().all(|s| s.len() == 2));
        }
    }

    #[test]
    fn test_scenario_rebound() {
        let (board, puzzle) = rebound_puzzle();
        for strategy in STRATEGIES {
            let mut solver = SolverBuilder::new().with_strategy(strategy).build();
            let outcome = solver.solve(&board, &puzzle).unwrap();
            let best = outcome.best().expect("rebound puzzle is solvable");
            assert_eq!(best.len(), 3);
            assert!(best.has_rebound());

            let mut strict = SolverBuilder::new()
                .with_strategy(strategy)
                .with_rebounds(false)
                .with_max_depth(12)
                .build();
            match strict.solve(&board, &puzzle).unwrap().result() {
                SolverResult::Optimal(solutions) => {
                    assert!(solutions.iter().all(|s| s.len() > 3 && !s.has_rebound()));
                }
                SolverResult::Infeasible => {}
                SolverResult::Unknown => panic!("{} was not interrupted", strategy),
            }
        }
    }

    #[test]
    fn test_scenario_wildcard_finishers() {
        let board = BoardBuilder::new(5, 5).build();
        let robots: Vec<CellIndex> = [(0, 0), (1, 1), (2, 2), (3, 3), (0, 2)]
            .iter()
            .map(|&(x, y)| board.cell(x, y))
            .collect();
        let puzzle = Puzzle::new(robots, Some(Goal::wildcard(board.cell(4, 4))));

        for strategy in STRATEGIES {
            let mut solver = SolverBuilder::new().with_strategy(strategy).build();
            let outcome = solver.solve(&board, &puzzle).unwrap();
            let finishers: FxHashSet<RobotIndex> = outcome
                .solutions()
                .iter()
                .filter_map(|s| s.moves().last().map(|m| m.robot()))
                .collect();
            assert!(finishers.len() >= 2, "{}: {:?}", strategy, finishers);

            let mut any = SolverBuilder::new()
                .with_strategy(strategy)
                .with_mode(SolutionMode::Any)
                .build();
            assert_eq!(any.solve(&board, &puzzle).unwrap().solutions().len(), 1);
        }
    }

    #[test]
    fn test_maximum_mode_orders_by_robot_count() {
        let board = BoardBuilder::new(5, 5).build();
        let robots: Vec<CellIndex> = [(0, 0), (1, 1), (2, 2), (3, 3), (0, 2)]
            .iter()
            .map(|&(x, y)| board.cell(x, y))
            .collect();
        let puzzle = Puzzle::new(robots, Some(Goal::wildcard(board.cell(4, 4))));

        let mut solver = SolverBuilder::new().with_mode(SolutionMode::Maximum).build();
        let outcome = solver.solve(&board, &puzzle).unwrap();
        let counts: Vec<usize> = outcome
            .solutions()
            .iter()
            .map(Solution::num_robots_moved)
            .collect();
        assert!(counts.windows(2).all(|w| w[0] >= w[1]), "{:?}", counts);
    }

    #[test]
    fn test_invalid_puzzle_is_rejected() {
        let board = BoardBuilder::new(4, 4).build();
        let puzzle = Puzzle::new([CellIndex::new(3), CellIndex::new(3)], None);
        let err = SolverBuilder::new().build().solve(&board, &puzzle).unwrap_err();
        assert!(matches!(err, PuzzleError::RobotsOverlap { .. }));
    }

    #[test]
    fn test_five_robots_on_a_standard_board_without_rebounds() {
        let board = BoardBuilder::new(16, 16).build();
        let robots: Vec<CellIndex> = [(0, 15), (3, 3), (7, 2), (9, 9), (12, 4)]
            .iter()
            .map(|&(x, y)| board.cell(x, y))
            .collect();
        let puzzle = Puzzle::new(robots, Some(Goal::for_robot(board.cell(15, 15), RobotIndex::new(0))));

        for strategy in STRATEGIES {
            let mut solver = SolverBuilder::new()
                .with_strategy(strategy)
                .with_rebounds(false)
                .build();
            let outcome = solver.solve(&board, &puzzle).unwrap();
            let best = outcome.best().expect("puzzle is solvable");
            assert_eq!(best.len(), 3, "{}", strategy);
            assert!(best.is_one_move());
            assert!(!best.has_rebound());
            assert!(best.replay(&board));
        }
    }

    #[test]
    fn test_oversized_state_is_rejected() {
        // 3000x3000 cells need 24 bits; with directions, 5 robots need 135.
        let board = BoardBuilder::new(3000, 3000).build();
        let robots: Vec<CellIndex> = (0..5).map(|i| board.cell(i, i)).collect();
        let puzzle = Puzzle::new(robots, Some(Goal::for_robot(board.cell(2999, 1), RobotIndex::new(0))));

        for strategy in STRATEGIES {
            let mut solver = SolverBuilder::new()
                .with_strategy(strategy)
                .with_rebounds(false)
                .build();
            assert_eq!(
                solver.solve(&board, &puzzle).unwrap_err(),
                PuzzleError::StateTooWide { bits: 135, limit: 128 }
            );
        }
    }

    #[test]
    fn test_interrupt_aborts_every_strategy() {
        let (board, puzzle) = rebound_puzzle();
        let flag = AtomicBool::new(true);
        for strategy in STRATEGIES {
            let mut solver = SolverBuilder::new()
                .with_strategy(strategy)
                .with_interrupt(&flag)
                .build();
            let outcome = solver.solve(&board, &puzzle).unwrap();
            assert!(outcome.is_aborted());
            assert!(matches!(outcome.result(), SolverResult::Unknown));
        }
    }

    #[test]
    fn test_user_monitors_observe_every_solve() {
        struct Counter(Rc<RefCell<(usize, usize)>>);

        impl SearchMonitor for Counter {
            fn name(&self) -> &str {
                "Counter"
            }
            fn on_enter_search(&mut self, _: &Board, _: &Puzzle, _: &SearchStatistics) {
                self.0.borrow_mut().0 += 1;
            }
            fn on_exit_search(&mut self, _: &SearchStatistics) {}
            fn search_command(&mut self, _: &SearchStatistics) -> SearchCommand {
                SearchCommand::Continue
            }
            fn on_iteration(&mut self, _: usize, _: &SearchStatistics) {}
            fn on_step(&mut self, _: usize, _: &SearchStatistics) {}
            fn on_prune(&mut self, _: PruneReason, _: &SearchStatistics) {}
            fn on_solution_found(&mut self, _: &Solution, _: &SearchStatistics) {
                self.0.borrow_mut().1 += 1;
            }
        }

        let counts = Rc::new(RefCell::new((0, 0)));
        let (board, puzzle) = corner_puzzle();
        let mut solver = SolverBuilder::new()
            .add_monitor(Counter(Rc::clone(&counts)))
            .with_progress_logging(true)
            .with_time_limit(Duration::from_secs(60))
            .build();
        solver.solve(&board, &puzzle).unwrap();
        solver.solve(&board, &puzzle).unwrap();
        assert_eq!(*counts.borrow(), (2, 4));
    }

    #[test]
    fn test_strategies_agree_on_random_boards() {
        assert_strategies_agree(0x5eed, 40, 1..=3, false, true, DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn test_strategies_agree_on_wildcard_goals() {
        assert_strategies_agree(0xc0de, 30, 1..=3, true, true, DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn test_strategies_agree_without_rebounds() {
        assert_strategies_agree(0xb0b, 30, 1..=3, false, false, 8);
        assert_strategies_agree(0xb0c, 30, 1..=3, true, false, 8);
    }

    #[test]
    fn test_strategies_agree_with_many_robots() {
        assert_strategies_agree(0xfeed, 12, 4..=5, false, true, 5);
        assert_strategies_agree(0xfeee, 12, 4..=5, true, true, 5);
        assert_strategies_agree(0xfeef, 12, 4..=5, false, false, 5);
        assert_strategies_agree(0xfef0, 12, 4..=5, true, false, 5);
    }

    #[test]
    fn test_run_optimization_is_safe() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..30 {
            let (board, puzzle) = random_puzzle(&mut rng);
            let plain = SolverBuilder::new()
                .with_strategy(Strategy::Bfs)
                .with_run_optimization(false)
                .build()
                .solve(&board, &puzzle)
                .unwrap();
            let optimizer = RunOptimizer::new();
            for s in plain.solutions() {
                let reordered = optimizer.optimize(&board, s).into_solution();
                assert!(reordered.replay(&board));
                assert_eq!(reordered.len(), s.len());
                assert_eq!(reordered.final_positions(), s.final_positions());
                assert!(reordered.num_runs() <= s.num_runs());
            }
        }
    }
}
