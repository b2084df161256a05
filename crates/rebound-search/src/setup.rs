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

//! # Search Setup
//!
//! Every strategy searches the same normalized problem: robots live in
//! *slots*, and for a specific goal the goal robot occupies the last slot
//! while the other robots keep their relative order. Under a wildcard goal
//! the slots are the robots in their original order and every slot may
//! finish.
//!
//! `SearchSetup::prepare` performs that normalization once per solve. It
//! short-circuits the trivial cases (no goal, goal already reached) into a
//! zero-move `Solution`, detects "solution in one move" mode, and maps slot
//! move lists back into robot moves.

use rebound_model::{
    board::Board,
    direction::Direction,
    index::{CellIndex, RobotIndex},
    puzzle::{GoalRobot, Puzzle, MAX_ROBOTS},
    solution::{Move, Solution},
};
use rebound_store::key::{KeyLayout, SortPolicy, AXES_BITS, LAST_DIRECTION_BITS};

/// A move expressed in slot coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SlotMove {
    pub slot: usize,
    pub direction: Direction,
    pub from: usize,
    pub to: usize,
}

/// The result of normalizing a puzzle.
#[derive(Clone, Debug)]
pub enum Prepared {
    /// Nothing to search: the zero-move solution.
    Trivial(Solution),
    /// The puzzle needs a search.
    Search(SearchSetup),
}

/// A puzzle normalized into goal-last slot order.
#[derive(Clone, Debug)]
pub struct SearchSetup {
    num_robots: usize,
    slot_robot: [usize; MAX_ROBOTS],
    start: [usize; MAX_ROBOTS],
    initial: [CellIndex; MAX_ROBOTS],
    goal: usize,
    wildcard: bool,
    bits_per_cell: u32,
    num_cells: usize,
    one_move: bool,
    labels: [char; MAX_ROBOTS],
}

impl SearchSetup {
    /// Normalizes `puzzle` on `board`.
    ///
    /// # Panics
    ///
    /// Panics if the puzzle has no robots or more than `MAX_ROBOTS`. Call
    /// `Puzzle::validate` first to get a recoverable error instead.
    pub fn prepare(board: &Board, puzzle: &Puzzle) -> Prepared {
        let n = puzzle.num_robots();
        assert!(
            (1..=MAX_ROBOTS).contains(&n),
            "called `SearchSetup::prepare` with {} robots, expected 1 to {}",
            n,
            MAX_ROBOTS
        );

        let goal = match puzzle.goal() {
            Some(goal) if !goal.is_reached(puzzle.robots()) => *goal,
            _ => {
                return Prepared::Trivial(Solution::new(
                    puzzle.robots(),
                    Vec::new(),
                    *board.labels(),
                ))
            }
        };

        let mut slot_robot = [0usize; MAX_ROBOTS];
        let wildcard = match goal.robot() {
            GoalRobot::Any => {
                for (slot, robot) in slot_robot.iter_mut().enumerate().take(n) {
                    *robot = slot;
                }
                true
            }
            GoalRobot::Robot(goal_robot) => {
                let goal_robot = goal_robot.get();
                let others = (0..n).filter(|&r| r != goal_robot);
                for (slot, robot) in others.enumerate() {
                    slot_robot[slot] = robot;
                }
                slot_robot[n - 1] = goal_robot;
                false
            }
        };

        let mut initial = [CellIndex::new(0); MAX_ROBOTS];
        initial[..n].copy_from_slice(puzzle.robots());
        let mut start = [0usize; MAX_ROBOTS];
        for slot in 0..n {
            start[slot] = initial[slot_robot[slot]].get();
        }

        let mut setup = Self {
            num_robots: n,
            slot_robot,
            start,
            initial,
            goal: goal.cell().get(),
            wildcard,
            bits_per_cell: board.bits_per_cell(),
            num_cells: board.num_cells(),
            one_move: false,
            labels: *board.labels(),
        };
        setup.one_move = setup.finisher_slots().any(|slot| {
            let robot = RobotIndex::new(setup.slot_robot[slot]);
            Direction::ALL
                .iter()
                .any(|&d| board.slide(puzzle.robots(), robot, d).get() == setup.goal)
        });
        Prepared::Search(setup)
    }

    #[inline]
    pub fn num_robots(&self) -> usize {
        self.num_robots
    }

    /// Starting cell of every slot.
    #[inline]
    pub fn start(&self) -> &[usize] {
        &self.start[..self.num_robots]
    }

    #[inline]
    pub fn goal(&self) -> usize {
        self.goal
    }

    #[inline]
    pub fn is_wildcard(&self) -> bool {
        self.wildcard
    }

    #[inline]
    pub fn bits_per_cell(&self) -> u32 {
        self.bits_per_cell
    }

    #[inline]
    pub fn num_cells(&self) -> usize {
        self.num_cells
    }

    /// Returns `true` if a finishing robot starts one slide from the goal.
    ///
    /// In this mode the one-slide answer does not count: a solution must
    /// leave its finishing robot having moved along both axes.
    #[inline]
    pub fn is_one_move(&self) -> bool {
        self.one_move
    }

    /// Returns `true` if `slot` may finish the puzzle.
    #[inline]
    pub fn is_finisher(&self, slot: usize) -> bool {
        self.wildcard || slot + 1 == self.num_robots
    }

    /// Slots that may finish the puzzle.
    #[inline]
    pub fn finisher_slots(&self) -> std::ops::Range<usize> {
        if self.wildcard {
            0..self.num_robots
        } else {
            self.num_robots - 1..self.num_robots
        }
    }

    /// The sorting policy matching the goal kind.
    #[inline]
    pub fn key_layout(&self) -> SortPolicy {
        if self.wildcard {
            SortPolicy::All
        } else {
            SortPolicy::AllButLast
        }
    }

    /// Per-slot annotation bits and goal tag bits of a state key.
    ///
    /// Axis flags only matter on finishing slots: under a specific goal they
    /// become the goal tag, under a wildcard goal every slot carries them.
    fn annotation_widths(&self, rebounds_allowed: bool, track_axes: bool) -> (u32, u32) {
        let mut per_slot = 0;
        let mut goal_tag = 0;
        if track_axes {
            if self.wildcard {
                per_slot += AXES_BITS;
            } else {
                goal_tag = AXES_BITS;
            }
        }
        if !rebounds_allowed {
            per_slot += LAST_DIRECTION_BITS;
        }
        (per_slot, goal_tag)
    }

    /// Width of the state key a search with these settings builds.
    pub fn state_key_bits(&self, rebounds_allowed: bool, track_axes: bool) -> u32 {
        let (per_slot, goal_tag) = self.annotation_widths(rebounds_allowed, track_axes);
        self.num_robots as u32 * (self.bits_per_cell + per_slot) + goal_tag
    }

    /// The key layout of a search with these settings.
    ///
    /// Without rebounds every slot carries its last direction below its cell
    /// (`LAST_DIRECTION_BITS`). With `track_axes`, axis flags are added on
    /// top of that for wildcard slots, or as the goal tag otherwise.
    ///
    /// # Panics
    ///
    /// Panics if `state_key_bits` exceeds `MAX_KEY_BITS`.
    pub fn state_layout(&self, rebounds_allowed: bool, track_axes: bool) -> KeyLayout {
        let (per_slot, goal_tag) = self.annotation_widths(rebounds_allowed, track_axes);
        KeyLayout::new(self.num_robots, self.bits_per_cell, self.key_layout())
            .with_annotation_bits(per_slot)
            .with_goal_tag_bits(goal_tag)
    }

    /// The robot living in `slot`.
    #[inline]
    pub fn original_robot(&self, slot: usize) -> RobotIndex {
        RobotIndex::new(self.slot_robot[slot])
    }

    /// Converts a slot move list into a `Solution` over the original robots.
    pub fn to_solution(&self, moves: &[SlotMove]) -> Solution {
        let moves = moves
            .iter()
            .map(|m| {
                Move::new(
                    self.original_robot(m.slot),
                    m.direction,
                    CellIndex::new(m.from),
                    CellIndex::new(m.to),
                )
            })
            .collect();
        Solution::new(&self.initial[..self.num_robots], moves, self.labels)
            .with_one_move(self.one_move)
    }
}
