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

//! Layer-synchronous breadth-first search.
//!
//! Layer `d` holds every canonical state first reached after `d` moves.
//! Layer `d + 1` is built in two passes over layer `d`: the first moves the
//! finishing robots (the goal robot, or every robot under a wildcard goal)
//! and records states where one lands on the goal; once such a final state
//! exists only further finals are kept. The second pass moves the remaining
//! robots and runs only while no final state was found. The first layer
//! with a final state is the minimum move count.
//!
//! Every layer is kept so that paths can be rebuilt afterwards. A final
//! state is walked back to the root through recorded predecessors that
//! reach it in one slide, and each chain is replayed forward from the real
//! start placement to recover concrete moves, since recorded states may be
//! permutations of interchangeable robots. At most `chain_limit` chains are
//! followed per final state.
//!
//! Keys carry annotations when the search depends on more than positions:
//! every robot's last move direction when rebounds are forbidden, and in
//! one-move mode the axes the finishing robots moved along.

use rebound_model::{
    board::Board,
    direction::{Direction, AXIS_BOTH},
    index::CellIndex,
    puzzle::{Puzzle, MAX_ROBOTS},
    solution::Solution,
};
use rebound_search::{
    monitor::search_monitor::{PruneReason, SearchCommand, SearchMonitor},
    options::SearchOptions,
    result::SolverOutcome,
    setup::{Prepared, SearchSetup, SlotMove},
    stats::SearchStatistics,
};
use rebound_store::{
    key::{last_direction_code, KeyLayout, AXES_BITS, LAST_DIRECTION_BITS},
    visited::VisitedSet,
};
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

/// A recorded state: slot cells packed at `bits_per_cell`, plus 3 bits of
/// last direction and 2 bits of axis flags per slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct Node {
    cells: u128,
    last: u16,
    axes: u16,
}

impl Node {
    fn root(start: &[usize], bits_per_cell: u32) -> Self {
        let cells = start
            .iter()
            .rev()
            .fold(0u128, |acc, &c| (acc << bits_per_cell) | c as u128);
        Self {
            cells,
            last: 0,
            axes: 0,
        }
    }

    #[inline(always)]
    fn cell(&self, slot: usize, bits_per_cell: u32) -> usize {
        let mask = (1u128 << bits_per_cell) - 1;
        ((self.cells >> (slot as u32 * bits_per_cell)) & mask) as usize
    }

    #[inline(always)]
    fn positions(&self, n: usize, bits_per_cell: u32) -> [usize; MAX_ROBOTS] {
        let mut out = [0usize; MAX_ROBOTS];
        for (slot, cell) in out.iter_mut().enumerate().take(n) {
            *cell = self.cell(slot, bits_per_cell);
        }
        out
    }

    #[inline(always)]
    fn last_code(&self, slot: usize) -> usize {
        ((self.last >> (slot as u32 * LAST_DIRECTION_BITS)) & 0b111) as usize
    }

    #[inline(always)]
    fn last(&self, slot: usize) -> Option<Direction> {
        match self.last_code(slot) {
            0 => None,
            code => Some(Direction::from_index(code - 1)),
        }
    }

    #[inline(always)]
    fn axes(&self, slot: usize) -> u8 {
        ((self.axes >> (slot as u32 * AXES_BITS)) & 0b11) as u8
    }

    /// The state after `slot` slid in `direction` to `to`.
    #[inline(always)]
    fn with_move(&self, slot: usize, direction: Direction, to: usize, bits_per_cell: u32) -> Self {
        let shift = slot as u32 * bits_per_cell;
        let mask = ((1u128 << bits_per_cell) - 1) << shift;
        let last_shift = slot as u32 * LAST_DIRECTION_BITS;
        let axes_shift = slot as u32 * AXES_BITS;
        let code = last_direction_code(Some(direction)) as u16;
        Self {
            cells: (self.cells & !mask) | ((to as u128) << shift),
            last: (self.last & !(0b111 << last_shift)) | (code << last_shift),
            axes: self.axes | ((direction.axis_flag() as u16) << axes_shift),
        }
    }
}

/// Predecessor chains followed per final state by default.
pub const DEFAULT_CHAIN_LIMIT: usize = 16;

/// Breadth-first solver.
#[derive(Clone, Copy, Debug)]
pub struct BfsSolver {
    chain_limit: usize,
}

impl Default for BfsSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl BfsSolver {
    #[inline]
    pub fn new() -> Self {
        Self {
            chain_limit: DEFAULT_CHAIN_LIMIT,
        }
    }

    /// Follows at most `chain_limit` predecessor chains per final state.
    ///
    /// # Panics
    ///
    /// Panics if `chain_limit` is zero.
    pub fn with_chain_limit(mut self, chain_limit: usize) -> Self {
        assert!(
            chain_limit > 0,
            "called `BfsSolver::with_chain_limit` with a zero limit"
        );
        self.chain_limit = chain_limit;
        self
    }

    #[inline]
    pub fn chain_limit(&self) -> usize {
        self.chain_limit
    }

    /// Finds minimal solutions of `puzzle` on `board`: one or more per
    /// final state, up to the chain limit.
    ///
    /// The puzzle must be valid for the board (see `Puzzle::validate`).
    ///
    /// # Panics
    ///
    /// Panics if the state key is wider than `MAX_KEY_BITS`; see
    /// `SearchSetup::state_key_bits`.
    pub fn solve<S>(
        &mut self,
        board: &Board,
        puzzle: &Puzzle,
        options: SearchOptions,
        monitor: &mut S,
    ) -> SolverOutcome
    where
        S: SearchMonitor + ?Sized,
    {
        let start_time = std::time::Instant::now();
        let mut stats = SearchStatistics::default();
        monitor.on_enter_search(board, puzzle, &stats);

        let setup = match SearchSetup::prepare(board, puzzle) {
            Prepared::Search(setup) => setup,
            Prepared::Trivial(solution) => {
                stats.on_solution_found();
                monitor.on_solution_found(&solution, &stats);
                stats.set_total_time(start_time.elapsed());
                monitor.on_exit_search(&stats);
                return SolverOutcome::optimal(vec![solution], stats);
            }
        };

        BfsSearchSession::new(board, &setup, options, self.chain_limit, monitor, stats)
            .run(start_time)
    }
}

/// Raised when a monitor stops the search.
#[derive(Debug)]
struct Interrupted(String);

struct BfsSearchSession<'a, S: ?Sized> {
    board: &'a Board,
    setup: &'a SearchSetup,
    options: SearchOptions,
    monitor: &'a mut S,
    bits_per_cell: u32,
    chain_limit: usize,
    chains_left: usize,
    layout: KeyLayout,
    visited: VisitedSet,
    layers: Vec<Vec<Node>>,
    predecessors: FxHashMap<(usize, usize), SmallVec<[usize; 4]>>,
    seen: FxHashSet<SmallVec<[SlotMove; 16]>>,
    solutions: Vec<Solution>,
    stats: SearchStatistics,
}

impl<'a, S> BfsSearchSession<'a, S>
where
    S: SearchMonitor + ?Sized,
{
    fn new(
        board: &'a Board,
        setup: &'a SearchSetup,
        options: SearchOptions,
        chain_limit: usize,
        monitor: &'a mut S,
        stats: SearchStatistics,
    ) -> Self {
        let layout = setup.state_layout(options.rebounds_allowed(), setup.is_one_move());

        Self {
            board,
            setup,
            options,
            monitor,
            bits_per_cell: setup.bits_per_cell(),
            chain_limit,
            chains_left: 0,
            layout,
            visited: VisitedSet::for_layout(&layout),
            layers: Vec::new(),
            predecessors: FxHashMap::default(),
            seen: FxHashSet::default(),
            solutions: Vec::new(),
            stats,
        }
    }

    fn run(mut self, start_time: std::time::Instant) -> SolverOutcome {
        let root = Node::root(self.setup.start(), self.bits_per_cell);
        self.visited.add(self.key(&root));
        self.stats.on_state_stored();
        self.layers.push(vec![root]);

        let mut aborted = None;
        for depth in 1..=self.options.depth_limit() {
            self.stats.on_iteration();
            self.stats.on_depth_update(depth as u64);
            self.monitor.on_iteration(depth, &self.stats);

            let finals = match self.expand_layer(depth) {
                Ok(finals) => finals,
                Err(Interrupted(reason)) => {
                    aborted = Some(reason);
                    break;
                }
            };
            if !finals.is_empty() {
                if let Err(Interrupted(reason)) = self.reconstruct(depth, &finals) {
                    aborted = Some(reason);
                }
                break;
            }
            if self.layers[depth].is_empty() {
                break;
            }
        }

        let layer_bytes: usize = self
            .layers
            .iter()
            .map(|l| l.capacity() * std::mem::size_of::<Node>())
            .sum();
        self.stats
            .set_memory_bytes(self.visited.allocated_memory_bytes() + layer_bytes);
        self.stats.set_total_time(start_time.elapsed());
        self.monitor.on_exit_search(&self.stats);

        match aborted {
            Some(reason) => SolverOutcome::aborted(reason, self.stats),
            None if self.solutions.is_empty() => SolverOutcome::infeasible(self.stats),
            None => SolverOutcome::optimal(self.solutions, self.stats),
        }
    }

    /// Canonical key of `node`, annotated as the search requires.
    fn key(&self, node: &Node) -> u128 {
        let n = self.setup.num_robots();
        let slot_axes = self.setup.is_one_move() && self.setup.is_wildcard();
        let mut values = [0usize; MAX_ROBOTS];
        for (slot, value) in values.iter_mut().enumerate().take(n) {
            let mut annotation = 0;
            if slot_axes {
                annotation = node.axes(slot) as usize;
            }
            if !self.options.rebounds_allowed() {
                annotation = (annotation << LAST_DIRECTION_BITS) | node.last_code(slot);
            }
            *value = self
                .layout
                .annotate(node.cell(slot, self.bits_per_cell), annotation);
        }
        let key = self.layout.pack(&values[..n]);
        if self.setup.is_one_move() && !self.setup.is_wildcard() {
            self.layout.tag_goal(key, node.axes(n - 1) as usize)
        } else {
            key
        }
    }

    /// Slides `slot` of `positions` in `direction`.
    fn slide(&self, positions: &[usize], slot: usize, direction: Direction) -> usize {
        let mut cell = CellIndex::new(positions[slot]);
        while !self.board.has_wall(cell, direction) {
            let next = self.board.step(cell, direction);
            if positions.contains(&next.get()) {
                break;
            }
            cell = next;
        }
        cell.get()
    }

    /// Returns `true` if `direction` is legal for `slot` of `node`.
    #[inline]
    fn allowed(&self, node: &Node, slot: usize, direction: Direction) -> bool {
        self.options.rebounds_allowed() || node.last(slot) != Some(direction.opposite())
    }

    /// Returns `true` if `slot` standing on `to` after moving in `direction`
    /// completes the puzzle.
    #[inline]
    fn is_final(&self, node: &Node, slot: usize, direction: Direction, to: usize) -> bool {
        self.setup.is_finisher(slot)
            && to == self.setup.goal()
            && (!self.setup.is_one_move() || node.axes(slot) | direction.axis_flag() == AXIS_BOTH)
    }

    fn poll(&mut self) -> Result<(), Interrupted> {
        match self.monitor.search_command(&self.stats) {
            SearchCommand::Continue => Ok(()),
            SearchCommand::Terminate(reason) => Err(Interrupted(reason)),
        }
    }

    /// Builds layer `depth` from layer `depth - 1`. Returns the indices of
    /// final states in the new layer.
    fn expand_layer(&mut self, depth: usize) -> Result<Vec<usize>, Interrupted> {
        let n = self.setup.num_robots();
        let bits = self.bits_per_cell;
        let mut next = Vec::new();
        let mut finals = Vec::new();

        for finishing_pass in [true, false] {
            if !finishing_pass && !finals.is_empty() {
                break;
            }
            for i in 0..self.layers[depth - 1].len() {
                let node = self.layers[depth - 1][i];
                if finishing_pass {
                    self.stats.on_node_explored();
                    self.monitor.on_step(depth - 1, &self.stats);
                }
                self.poll()?;
                let positions = node.positions(n, bits);

                for slot in 0..n {
                    if self.setup.is_finisher(slot) != finishing_pass {
                        continue;
                    }
                    for direction in Direction::ALL {
                        if !self.allowed(&node, slot, direction) {
                            continue;
                        }
                        let from = positions[slot];
                        let to = self.slide(&positions[..n], slot, direction);
                        if to == from {
                            continue;
                        }

                        let is_final = self.is_final(&node, slot, direction, to);
                        if !finals.is_empty() && !is_final {
                            continue;
                        }
                        let child = node.with_move(slot, direction, to, bits);
                        if !self.visited.add(self.key(&child)) {
                            self.stats.on_pruning_duplicate();
                            self.monitor.on_prune(PruneReason::Duplicate, &self.stats);
                            continue;
                        }
                        self.stats.on_state_stored();
                        if is_final {
                            finals.push(next.len());
                        }
                        next.push(child);
                    }
                }
            }
        }

        self.layers.push(next);
        Ok(finals)
    }

    /// Indices in layer `depth - 1` of every state that reaches
    /// `layers[depth][index]` in one slide.
    fn predecessors_of(&mut self, depth: usize, index: usize) -> SmallVec<[usize; 4]> {
        if let Some(found) = self.predecessors.get(&(depth, index)) {
            return found.clone();
        }

        let n = self.setup.num_robots();
        let bits = self.bits_per_cell;
        let target = self.key(&self.layers[depth][index]);
        let mut found = SmallVec::new();
        for (i, node) in self.layers[depth - 1].iter().enumerate() {
            let positions = node.positions(n, bits);
            let reaches = (0..n).any(|slot| {
                Direction::ALL.iter().any(|&direction| {
                    if !self.allowed(node, slot, direction) {
                        return false;
                    }
                    let to = self.slide(&positions[..n], slot, direction);
                    to != positions[slot]
                        && self.key(&node.with_move(slot, direction, to, bits)) == target
                })
            });
            if reaches {
                found.push(i);
            }
        }
        self.predecessors.insert((depth, index), found.clone());
        found
    }

    /// Rebuilds up to `chain_limit` paths to each final state of layer
    /// `depth`.
    fn reconstruct(&mut self, depth: usize, finals: &[usize]) -> Result<(), Interrupted> {
        let mut chain = vec![0usize; depth + 1];
        for &index in finals {
            chain[depth] = index;
            self.chains_left = self.chain_limit;
            self.walk_back(depth, &mut chain)?;
            if self.is_done() {
                break;
            }
        }
        Ok(())
    }

    fn walk_back(&mut self, depth: usize, chain: &mut [usize]) -> Result<(), Interrupted> {
        if depth == 0 {
            self.chains_left -= 1;
            self.replay_chain(chain);
            return Ok(());
        }
        self.poll()?;
        for previous in self.predecessors_of(depth, chain[depth]) {
            chain[depth - 1] = previous;
            self.walk_back(depth - 1, chain)?;
            if self.chains_left == 0 || self.is_done() {
                break;
            }
        }
        Ok(())
    }

    /// Replays a chain of recorded states from the real start placement.
    fn replay_chain(&mut self, chain: &[usize]) {
        let n = self.setup.num_robots();
        let bits = self.bits_per_cell;
        let mut current = self.layers[0][0];
        let mut moves: SmallVec<[SlotMove; 16]> = SmallVec::new();

        for (depth, &index) in chain.iter().enumerate().skip(1) {
            let target = self.key(&self.layers[depth][index]);
            let positions = current.positions(n, bits);
            let step = (0..n)
                .flat_map(|slot| Direction::ALL.into_iter().map(move |d| (slot, d)))
                .find_map(|(slot, direction)| {
                    if !self.allowed(&current, slot, direction) {
                        return None;
                    }
                    let to = self.slide(&positions[..n], slot, direction);
                    let child = current.with_move(slot, direction, to, bits);
                    (to != positions[slot] && self.key(&child) == target).then_some((
                        SlotMove {
                            slot,
                            direction,
                            from: positions[slot],
                            to,
                        },
                        child,
                    ))
                });
            debug_assert!(
                step.is_some(),
                "called `BfsSearchSession::replay_chain` with a chain that does not replay"
            );
            let Some((m, child)) = step else {
                return;
            };
            moves.push(m);
            current = child;
        }

        let Some(last) = moves.last() else {
            return;
        };
        if current.cell(last.slot, bits) != self.setup.goal() || !self.seen.insert(moves.clone()) {
            return;
        }

        let solution = self.setup.to_solution(&moves);
        debug_assert!(
            solution.replay(self.board),
            "BFS produced a solution that does not replay: {}",
            solution
        );
        self.stats.on_solution_found();
        self.monitor.on_solution_found(&solution, &self.stats);
        self.solutions.push(solution);
    }

    #[inline]
    fn is_done(&self) -> bool {
        self.options.is_first_solution_only() && !self.solutions.is_empty()
    }
}
