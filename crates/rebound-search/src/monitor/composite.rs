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

//! Monitoring combinator
//!
//! Provides `CompositeSearchMonitor`, a fan-out monitor that forwards every
//! event to its children. This lets callers mix logging, limits and user
//! hooks without the strategies knowing about any of them.
//!
//! Behavior
//! - Events are dispatched to child monitors in insertion order.
//! - `search_command` short-circuits on the first non-`Continue` response;
//!   put stricter stop conditions first.
//! - Other callbacks always fan out to all children.

use crate::{
    monitor::search_monitor::{PruneReason, SearchCommand, SearchMonitor},
    stats::SearchStatistics,
};
use rebound_model::{board::Board, puzzle::Puzzle, solution::Solution};

/// A monitor that aggregates multiple monitors and forwards events to all of them.
#[derive(Default)]
pub struct CompositeSearchMonitor<'a> {
    monitors: Vec<Box<dyn SearchMonitor + 'a>>,
}

impl<'a> CompositeSearchMonitor<'a> {
    /// Creates a new empty `CompositeSearchMonitor`.
    #[inline(always)]
    pub fn new() -> Self {
        Self {
            monitors: Vec::new(),
        }
    }

    /// Creates a new `CompositeSearchMonitor` with room for `capacity` monitors.
    #[inline(always)]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            monitors: Vec::with_capacity(capacity),
        }
    }

    /// Adds a monitor.
    #[inline(always)]
    pub fn add_monitor<M>(&mut self, monitor: M)
    where
        M: SearchMonitor + 'a,
    {
        self.monitors.push(Box::new(monitor));
    }

    /// Adds a boxed monitor.
    #[inline(always)]
    pub fn add_monitor_boxed(&mut self, monitor: Box<dyn SearchMonitor + 'a>) {
        self.monitors.push(monitor);
    }

    /// Returns the contained monitors.
    #[inline(always)]
    pub fn monitors(&self) -> &[Box<dyn SearchMonitor + 'a>] {
        &self.monitors
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }
}

impl<'a> FromIterator<Box<dyn SearchMonitor + 'a>> for CompositeSearchMonitor<'a> {
    #[inline(always)]
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = Box<dyn SearchMonitor + 'a>>,
    {
        Self {
            monitors: iter.into_iter().collect(),
        }
    }
}

impl<'a> SearchMonitor for CompositeSearchMonitor<'a> {
    #[inline(always)]
    fn name(&self) -> &str {
        "CompositeSearchMonitor"
    }

    #[inline(always)]
    fn on_enter_search(&mut self, board: &Board, puzzle: &Puzzle, statistics: &SearchStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_enter_search(board, puzzle, statistics);
        }
    }

    #[inline(always)]
    fn on_exit_search(&mut self, statistics: &SearchStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_exit_search(statistics);
        }
    }

    #[inline(always)]
    fn search_command(&mut self, statistics: &SearchStatistics) -> SearchCommand {
        for monitor in &mut self.monitors {
            let cmd = monitor.search_command(statistics);
            if !matches!(cmd, SearchCommand::Continue) {
                return cmd;
            }
        }
        SearchCommand::Continue
    }

    #[inline(always)]
    fn on_iteration(&mut self, depth: usize, statistics: &SearchStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_iteration(depth, statistics);
        }
    }

    #[inline(always)]
    fn on_step(&mut self, depth: usize, statistics: &SearchStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_step(depth, statistics);
        }
    }

    #[inline(always)]
    fn on_prune(&mut self, reason: PruneReason, statistics: &SearchStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_prune(reason, statistics);
        }
    }

    #[inline(always)]
    fn on_solution_found(&mut self, solution: &Solution, statistics: &SearchStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_solution_found(solution, statistics);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rebound_model::{board::BoardBuilder, index::CellIndex};
    use std::{cell::RefCell, rc::Rc};

    struct Recorder {
        tag: &'static str,
        log: Rc<RefCell<Vec<String>>>,
        command: SearchCommand,
    }

    impl SearchMonitor for Recorder {
        fn name(&self) -> &str {
            self.tag
        }
        fn on_enter_search(&mut self, _: &Board, _: &Puzzle, _: &SearchStatistics) {
            self.log.borrow_mut().push(format!("{}:enter", self.tag));
        }
        fn on_exit_search(&mut self, _: &SearchStatistics) {
            self.log.borrow_mut().push(format!("{}:exit", self.tag));
        }
        fn search_command(&mut self, _: &SearchStatistics) -> SearchCommand {
            self.log.borrow_mut().push(format!("{}:command", self.tag));
            self.command.clone()
        }
        fn on_iteration(&mut self, depth: usize, _: &SearchStatistics) {
            self.log.borrow_mut().push(format!("{}:iteration{}", self.tag, depth));
        }
        fn on_step(&mut self, _: usize, _: &SearchStatistics) {}
        fn on_prune(&mut self, reason: PruneReason, _: &SearchStatistics) {
            self.log.borrow_mut().push(format!("{}:{}", self.tag, reason));
        }
        fn on_solution_found(&mut self, _: &Solution, _: &SearchStatistics) {}
    }

    fn recorder(
        tag: &'static str,
        log: &Rc<RefCell<Vec<String>>>,
        command: SearchCommand,
    ) -> Recorder {
        Recorder {
            tag,
            log: Rc::clone(log),
            command,
        }
    }

    #[test]
    fn test_events_fan_out_in_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut composite = CompositeSearchMonitor::new();
        composite.add_monitor(recorder("a", &log, SearchCommand::Continue));
        composite.add_monitor(recorder("b", &log, SearchCommand::Continue));
        assert_eq!(composite.len(), 2);

        let board = BoardBuilder::new(3, 3).build();
        let puzzle = Puzzle::new([CellIndex::new(0)], None);
        let stats = SearchStatistics::default();

        composite.on_enter_search(&board, &puzzle, &stats);
        composite.on_iteration(2, &stats);
        composite.on_prune(PruneReason::Duplicate, &stats);
        composite.on_exit_search(&stats);

        assert_eq!(
            *log.borrow(),
            vec![
                "a:enter",
                "b:enter",
                "a:iteration2",
                "b:iteration2",
                "a:Duplicate",
                "b:Duplicate",
                "a:exit",
                "b:exit"
            ]
        );
    }

    #[test]
    fn test_search_command_short_circuits() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut composite: CompositeSearchMonitor = vec![
            Box::new(recorder("stop", &log, SearchCommand::Terminate("halt".into())))
                as Box<dyn SearchMonitor>,
            Box::new(recorder("never", &log, SearchCommand::Continue)),
        ]
        .into_iter()
        .collect();

        let cmd = composite.search_command(&SearchStatistics::default());
        assert_eq!(cmd, SearchCommand::Terminate("halt".into()));
        assert_eq!(*log.borrow(), vec!["stop:command"]);
    }

    #[test]
    fn test_empty_composite_continues() {
        let mut composite = CompositeSearchMonitor::default();
        assert!(composite.is_empty());
        assert_eq!(
            composite.search_command(&SearchStatistics::default()),
            SearchCommand::Continue
        );
    }
}
