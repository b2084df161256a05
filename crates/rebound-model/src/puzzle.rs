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

//! Puzzle configuration: where the robots stand and which cell must be reached.

use crate::{
    board::Board,
    index::{CellIndex, RobotIndex},
};
use smallvec::SmallVec;

/// The largest number of robots a puzzle may place.
pub const MAX_ROBOTS: usize = 5;

/// Which robot has to reach the goal.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum GoalRobot {
    /// Only this robot counts.
    Robot(RobotIndex),
    /// Any robot counts.
    Any,
}

/// A goal cell together with the robot(s) allowed to finish on it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Goal {
    cell: CellIndex,
    robot: GoalRobot,
}

impl Goal {
    #[inline]
    pub fn new(cell: CellIndex, robot: GoalRobot) -> Self {
        Self { cell, robot }
    }

    /// A goal that only `robot` may satisfy.
    #[inline]
    pub fn for_robot(cell: CellIndex, robot: RobotIndex) -> Self {
        Self::new(cell, GoalRobot::Robot(robot))
    }

    /// A goal that any robot may satisfy.
    #[inline]
    pub fn wildcard(cell: CellIndex) -> Self {
        Self::new(cell, GoalRobot::Any)
    }

    #[inline]
    pub fn cell(&self) -> CellIndex {
        self.cell
    }

    #[inline]
    pub fn robot(&self) -> GoalRobot {
        self.robot
    }

    #[inline]
    pub fn is_wildcard(&self) -> bool {
        matches!(self.robot, GoalRobot::Any)
    }

    /// Returns `true` if `positions` satisfies this goal.
    pub fn is_reached(&self, positions: &[CellIndex]) -> bool {
        match self.robot {
            GoalRobot::Robot(r) => positions.get(r.get()) == Some(&self.cell),
            GoalRobot::Any => positions.contains(&self.cell),
        }
    }
}

/// The reasons a puzzle cannot be solved on a given board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PuzzleError {
    /// The robot count is outside `1..=MAX_ROBOTS`.
    InvalidRobotCount(usize),
    /// A robot stands outside the board.
    RobotOutOfBounds { robot: RobotIndex, cell: CellIndex },
    /// Two robots share a cell.
    RobotsOverlap { first: RobotIndex, second: RobotIndex },
    /// The goal cell is outside the board.
    GoalOutOfBounds(CellIndex),
    /// The goal names a robot the puzzle does not have.
    UnknownGoalRobot(RobotIndex),
    /// The board is too large to key the search state of this many robots.
    StateTooWide { bits: u32, limit: u32 },
}

impl std::fmt::Display for PuzzleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRobotCount(n) => {
                write!(f, "Puzzle has {} robots, expected 1 to {}", n, MAX_ROBOTS)
            }
            Self::RobotOutOfBounds { robot, cell } => {
                write!(f, "Robot {} stands outside the board at {}", robot.get(), cell.get())
            }
            Self::RobotsOverlap { first, second } => write!(
                f,
                "Robots {} and {} occupy the same cell",
                first.get(),
                second.get()
            ),
            Self::GoalOutOfBounds(cell) => {
                write!(f, "Goal cell {} lies outside the board", cell.get())
            }
            Self::UnknownGoalRobot(robot) => {
                write!(f, "Goal names robot {} which does not exist", robot.get())
            }
            Self::StateTooWide { bits, limit } => write!(
                f,
                "Search state needs {} bits, more than the supported {}",
                bits, limit
            ),
        }
    }
}

impl std::error::Error for PuzzleError {}

/// Robot placement plus an optional goal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Puzzle {
    robots: SmallVec<[CellIndex; MAX_ROBOTS]>,
    goal: Option<Goal>,
}

impl Puzzle {
    /// Creates a puzzle. Use `validate` before solving.
    pub fn new<I>(robots: I, goal: Option<Goal>) -> Self
    where
        I: IntoIterator<Item = CellIndex>,
    {
        Self {
            robots: robots.into_iter().collect(),
            goal,
        }
    }

    /// Returns the robot positions.
    #[inline]
    pub fn robots(&self) -> &[CellIndex] {
        &self.robots
    }

    #[inline]
    pub fn num_robots(&self) -> usize {
        self.robots.len()
    }

    /// Returns the position of one robot.
    #[inline]
    pub fn robot_position(&self, robot: RobotIndex) -> CellIndex {
        self.robots[robot.get()]
    }

    #[inline]
    pub fn goal(&self) -> Option<&Goal> {
        self.goal.as_ref()
    }

    /// Replaces the goal.
    #[inline]
    pub fn set_goal(&mut self, goal: Option<Goal>) {
        self.goal = goal;
    }

    /// Returns `true` if the goal is already satisfied, or there is none.
    pub fn is_solved(&self) -> bool {
        self.goal.map_or(true, |g| g.is_reached(&self.robots))
    }

    /// Checks this puzzle against `board`.
    pub fn validate(&self, board: &Board) -> Result<(), PuzzleError> {
        let n = self.robots.len();
        if n == 0 || n > MAX_ROBOTS {
            return Err(PuzzleError::InvalidRobotCount(n));
        }

        for (i, &cell) in self.robots.iter().enumerate() {
            if cell.get() >= board.num_cells() {
                return Err(PuzzleError::RobotOutOfBounds {
                    robot: RobotIndex::new(i),
                    cell,
                });
            }
            if let Some(j) = self.robots[..i].iter().position(|&c| c == cell) {
                return Err(PuzzleError::RobotsOverlap {
                    first: RobotIndex::new(j),
                    second: RobotIndex::new(i),
                });
            }
        }

        if let Some(goal) = &self.goal {
            if goal.cell().get() >= board.num_cells() {
                return Err(PuzzleError::GoalOutOfBounds(goal.cell()));
            }
            if let GoalRobot::Robot(r) = goal.robot() {
                if r.get() >= n {
                    return Err(PuzzleError::UnknownGoalRobot(r));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BoardBuilder;

    fn c(i: usize) -> CellIndex {
        CellIndex::new(i)
    }

    fn r(i: usize) -> RobotIndex {
        RobotIndex::new(i)
    }

    #[test]
    fn test_valid_puzzle() {
        let board = BoardBuilder::new(4, 4).build();
        let puzzle = Puzzle::new([c(0), c(5)], Some(Goal::for_robot(c(15), r(1))));
        assert_eq!(puzzle.validate(&board), Ok(()));
        assert_eq!(puzzle.num_robots(), 2);
        assert!(!puzzle.is_solved());
    }

    #[test]
    fn test_robot_count_limits() {
        let board = BoardBuilder::new(4, 4).build();
        let empty = Puzzle::new(Vec::<CellIndex>::new(), None);
        assert_eq!(empty.validate(&board), Err(PuzzleError::InvalidRobotCount(0)));

        let crowded = Puzzle::new((0..6).map(c), None);
        assert_eq!(crowded.validate(&board), Err(PuzzleError::InvalidRobotCount(6)));
    }

    #[test]
    fn test_overlap_and_bounds() {
        let board = BoardBuilder::new(4, 4).build();
        let overlap = Puzzle::new([c(3), c(7), c(3)], None);
        assert_eq!(
            overlap.validate(&board),
            Err(PuzzleError::RobotsOverlap {
                first: r(0),
                second: r(2)
            })
        );

        let outside = Puzzle::new([c(16)], None);
        assert_eq!(
            outside.validate(&board),
            Err(PuzzleError::RobotOutOfBounds {
                robot: r(0),
                cell: c(16)
            })
        );

        let bad_goal = Puzzle::new([c(1)], Some(Goal::wildcard(c(99))));
        assert_eq!(bad_goal.validate(&board), Err(PuzzleError::GoalOutOfBounds(c(99))));

        let bad_robot = Puzzle::new([c(1)], Some(Goal::for_robot(c(2), r(1))));
        assert_eq!(bad_robot.validate(&board), Err(PuzzleError::UnknownGoalRobot(r(1))));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            PuzzleError::RobotsOverlap { first: r(0), second: r(2) }.to_string(),
            "Robots 0 and 2 occupy the same cell"
        );
        assert_eq!(
            PuzzleError::StateTooWide { bits: 135, limit: 128 }.to_string(),
            "Search state needs 135 bits, more than the supported 128"
        );
    }

    #[test]
    fn test_goal_reached() {
        let positions = [c(1), c(2), c(3)];
        assert!(Goal::for_robot(c(2), r(1)).is_reached(&positions));
        assert!(!Goal::for_robot(c(2), r(0)).is_reached(&positions));
        assert!(Goal::wildcard(c(3)).is_reached(&positions));
        assert!(!Goal::wildcard(c(4)).is_reached(&positions));
        assert!(Puzzle::new(positions, None).is_solved());
    }
}
