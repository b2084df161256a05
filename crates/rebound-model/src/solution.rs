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

use crate::{
    board::Board,
    direction::Direction,
    index::{CellIndex, RobotIndex},
    puzzle::MAX_ROBOTS,
};
use smallvec::SmallVec;

/// One slide of one robot.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Move {
    robot: RobotIndex,
    direction: Direction,
    from: CellIndex,
    to: CellIndex,
}

impl Move {
    #[inline]
    pub fn new(robot: RobotIndex, direction: Direction, from: CellIndex, to: CellIndex) -> Self {
        Self {
            robot,
            direction,
            from,
            to,
        }
    }

    #[inline]
    pub fn robot(&self) -> RobotIndex {
        self.robot
    }

    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[inline]
    pub fn from(&self) -> CellIndex {
        self.from
    }

    #[inline]
    pub fn to(&self) -> CellIndex {
        self.to
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "robot {} {} {} -> {}",
            self.robot.get(),
            self.direction,
            self.from.get(),
            self.to.get()
        )
    }
}

/// A finished sequence of moves leading from the initial robot placement to
/// a goal-satisfying one.
///
/// Solutions are immutable. Everything used for ranking (move count, robots
/// used, final placement) is derived from the move list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Solution {
    moves: Vec<Move>,
    initial_positions: SmallVec<[CellIndex; MAX_ROBOTS]>,
    final_positions: SmallVec<[CellIndex; MAX_ROBOTS]>,
    labels: [char; MAX_ROBOTS],
    one_move: bool,
}

impl Solution {
    /// Builds a solution from its initial placement and move list.
    ///
    /// # Panics
    ///
    /// Panics if more than `MAX_ROBOTS` robots are given, if a move names an
    /// unknown robot, or if a move does not start where its robot stands.
    pub fn new(initial_positions: &[CellIndex], moves: Vec<Move>, labels: [char; MAX_ROBOTS]) -> Self {
        assert!(
            initial_positions.len() <= MAX_ROBOTS,
            "called `Solution::new` with {} robots, the maximum is {}",
            initial_positions.len(),
            MAX_ROBOTS
        );

        let mut positions: SmallVec<[CellIndex; MAX_ROBOTS]> =
            SmallVec::from_slice(initial_positions);
        for (i, m) in moves.iter().enumerate() {
            let r = m.robot().get();
            assert!(
                r < positions.len(),
                "called `Solution::new` with move {} naming robot {} of {}",
                i,
                r,
                positions.len()
            );
            assert_eq!(
                positions[r],
                m.from(),
                "called `Solution::new` with move {} starting away from its robot",
                i
            );
            positions[r] = m.to();
        }

        Self {
            moves,
            initial_positions: SmallVec::from_slice(initial_positions),
            final_positions: positions,
            labels,
            one_move: false,
        }
    }

    /// Marks this solution as found in "solution in one move" mode, whose
    /// move order is meaningful and must not be rearranged.
    #[inline]
    pub fn with_one_move(mut self, one_move: bool) -> Self {
        self.one_move = one_move;
        self
    }

    #[inline]
    pub fn is_one_move(&self) -> bool {
        self.one_move
    }

    /// Returns the number of moves.
    #[inline]
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    #[inline]
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    #[inline]
    pub fn initial_positions(&self) -> &[CellIndex] {
        &self.initial_positions
    }

    #[inline]
    pub fn final_positions(&self) -> &[CellIndex] {
        &self.final_positions
    }

    #[inline]
    pub fn labels(&self) -> &[char; MAX_ROBOTS] {
        &self.labels
    }

    #[inline]
    pub fn num_robots(&self) -> usize {
        self.initial_positions.len()
    }

    /// Returns a bitmask with bit `i` set when robot `i` moves at least once.
    pub fn robots_moved(&self) -> u8 {
        self.moves
            .iter()
            .fold(0u8, |mask, m| mask | (1 << m.robot().get()))
    }

    /// Returns the number of distinct robots that move.
    #[inline]
    pub fn num_robots_moved(&self) -> usize {
        self.robots_moved().count_ones() as usize
    }

    /// Packs the final positions into one integer, robot 0 in the low bits.
    ///
    /// # Panics
    ///
    /// Panics if the packed value does not fit into 64 bits.
    pub fn packed_final_positions(&self, bits_per_cell: u32) -> u64 {
        let total = bits_per_cell as usize * self.final_positions.len();
        assert!(
            total <= 64,
            "called `Solution::packed_final_positions` needing {} bits",
            total
        );
        self.final_positions
            .iter()
            .rev()
            .fold(0u64, |acc, c| (acc << bits_per_cell) | c.get() as u64)
    }

    /// Returns `true` if move `index` sends its robot back opposite to that
    /// robot's own previous move. Moves of other robots may lie in between.
    pub fn is_rebound(&self, index: usize) -> bool {
        let Some(cur) = self.moves.get(index) else {
            return false;
        };
        self.moves[..index]
            .iter()
            .rev()
            .find(|m| m.robot() == cur.robot())
            .is_some_and(|prev| prev.direction().opposite() == cur.direction())
    }

    /// Returns `true` if any move is a rebound.
    pub fn has_rebound(&self) -> bool {
        (1..self.moves.len()).any(|i| self.is_rebound(i))
    }

    /// Returns the number of maximal blocks of consecutive same-robot moves.
    pub fn num_runs(&self) -> usize {
        self.moves
            .iter()
            .enumerate()
            .filter(|(i, m)| *i == 0 || self.moves[i - 1].robot() != m.robot())
            .count()
    }

    /// Returns the short textual summary `NN/C/xxxxx`: the zero padded move
    /// count, the number of robots moved, then per robot its label if it
    /// moved or `#` if it did not.
    pub fn summary(&self) -> String {
        let mask = self.robots_moved();
        let mut s = format!("{:02}/{}/", self.len(), self.num_robots_moved());
        for i in 0..self.num_robots() {
            s.push(if mask & (1 << i) != 0 {
                self.labels[i]
            } else {
                '#'
            });
        }
        s
    }

    /// Returns a cursor positioned before the first move.
    #[inline]
    pub fn cursor(&self) -> MoveCursor<'_> {
        MoveCursor {
            solution: self,
            position: 0,
        }
    }

    /// Re-slides every move on `board` from the initial placement.
    ///
    /// Returns `true` iff every move starts where its robot stands, actually
    /// moves, and ends exactly where `board` stops it.
    pub fn replay(&self, board: &Board) -> bool {
        let mut positions: SmallVec<[CellIndex; MAX_ROBOTS]> =
            self.initial_positions.clone();
        for m in &self.moves {
            let r = m.robot().get();
            if r >= positions.len() || positions[r] != m.from() {
                return false;
            }
            let to = board.slide(&positions, m.robot(), m.direction());
            if to == m.from() || to != m.to() {
                return false;
            }
            positions[r] = to;
        }
        positions == self.final_positions
    }
}

impl std::fmt::Display for Solution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Solution {}", self.summary())?;
        for (i, m) in self.moves.iter().enumerate() {
            let marker = if self.is_rebound(i) { " (rebound)" } else { "" };
            writeln!(
                f,
                "   {:>2}. {} {} {:>4} -> {:<4}{}",
                i + 1,
                self.labels[m.robot().get()],
                m.direction(),
                m.from().get(),
                m.to().get(),
                marker
            )?;
        }
        Ok(())
    }
}

/// Steps back and forth through the moves of a solution.
///
/// The cursor sits between moves: `next` applies the following move,
/// `prev` takes back the last applied one, and `current` is the last
/// applied move.
#[derive(Clone, Debug)]
pub struct MoveCursor<'a> {
    solution: &'a Solution,
    position: usize,
}

impl<'a> MoveCursor<'a> {
    /// Returns the number of moves applied so far.
    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Returns the last applied move.
    #[inline]
    pub fn current(&self) -> Option<&'a Move> {
        self.position
            .checked_sub(1)
            .and_then(|i| self.solution.moves.get(i))
    }

    /// Takes back the last applied move and returns it.
    pub fn prev(&mut self) -> Option<&'a Move> {
        let m = self.current()?;
        self.position -= 1;
        Some(m)
    }

    /// Moves back to the start.
    #[inline]
    pub fn reset(&mut self) {
        self.position = 0;
    }

    /// Returns the robot positions after the applied moves.
    pub fn positions(&self) -> SmallVec<[CellIndex; MAX_ROBOTS]> {
        let mut positions = self.solution.initial_positions.clone();
        for m in &self.solution.moves[..self.position] {
            positions[m.robot().get()] = m.to();
        }
        positions
    }
}

impl<'a> Iterator for MoveCursor<'a> {
    type Item = &'a Move;

    fn next(&mut self) -> Option<Self::Item> {
        let m = self.solution.moves.get(self.position)?;
        self.position += 1;
        Some(m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{BoardBuilder, DEFAULT_LABELS};

    fn c(i: usize) -> CellIndex {
        CellIndex::new(i)
    }

    fn r(i: usize) -> RobotIndex {
        RobotIndex::new(i)
    }

    fn mv(robot: usize, d: Direction, from: usize, to: usize) -> Move {
        Move::new(r(robot), d, c(from), c(to))
    }

    // On an open 4x4 board: robot 0 at 0, robot 1 at 15, robot 2 at 5.
    fn sample() -> Solution {
        Solution::new(
            &[c(0), c(15), c(5)],
            vec![mv(0, Direction::East, 0, 3), mv(1, Direction::North, 15, 7)],
            DEFAULT_LABELS,
        )
    }

    #[test]
    fn test_metrics() {
        let sol = sample();
        assert_eq!(sol.len(), 2);
        assert_eq!(sol.robots_moved(), 0b011);
        assert_eq!(sol.num_robots_moved(), 2);
        assert_eq!(sol.final_positions(), &[c(3), c(7), c(5)]);
        assert_eq!(sol.num_runs(), 2);
        assert_eq!(sol.summary(), "02/2/rg#");
    }

    #[test]
    fn test_packed_final_positions() {
        let sol = sample();
        // 4 bits per cell: robot 2 = 5, robot 1 = 7, robot 0 = 3.
        assert_eq!(sol.packed_final_positions(4), 0x573);
    }

    #[test]
    fn test_replay_on_open_board() {
        let board = BoardBuilder::new(4, 4).build();
        let sol = sample();
        assert!(sol.replay(&board));

        let wrong = Solution::new(
            &[c(0), c(15), c(5)],
            vec![mv(0, Direction::East, 0, 2)],
            DEFAULT_LABELS,
        );
        assert!(!wrong.replay(&board));
    }

    #[test]
    fn test_rebound_detection() {
        let sol = Solution::new(
            &[c(0)],
            vec![
                mv(0, Direction::East, 0, 3),
                mv(0, Direction::West, 3, 0),
                mv(0, Direction::South, 0, 12),
            ],
            DEFAULT_LABELS,
        );
        assert!(!sol.is_rebound(0));
        assert!(sol.is_rebound(1));
        assert!(!sol.is_rebound(2));
        assert!(!sol.is_rebound(3));
        assert!(sol.has_rebound());
        assert_eq!(sol.num_runs(), 1);
    }

    #[test]
    fn test_rebound_across_other_robots() {
        // Robot 0 goes east, robot 1 steps in, robot 0 comes back west.
        let sol = Solution::new(
            &[c(4), c(1)],
            vec![
                mv(0, Direction::East, 4, 7),
                mv(1, Direction::South, 1, 13),
                mv(0, Direction::West, 7, 4),
            ],
            DEFAULT_LABELS,
        );
        assert!(!sol.is_rebound(1));
        assert!(sol.is_rebound(2));
        assert_eq!(sol.num_runs(), 3);
    }

    #[test]
    fn test_empty_solution() {
        let sol = Solution::new(&[c(4), c(9)], Vec::new(), DEFAULT_LABELS);
        assert!(sol.is_empty());
        assert_eq!(sol.summary(), "00/0/##");
        assert_eq!(sol.num_runs(), 0);
        assert!(sol.replay(&BoardBuilder::new(4, 4).build()));
    }

    #[test]
    fn test_cursor_navigation() {
        let sol = sample();
        let mut cursor = sol.cursor();
        assert!(cursor.current().is_none());
        assert!(cursor.prev().is_none());

        assert_eq!(cursor.next().map(|m| m.robot()), Some(r(0)));
        assert_eq!(cursor.positions().as_slice(), &[c(3), c(15), c(5)]);
        assert_eq!(cursor.next().map(|m| m.robot()), Some(r(1)));
        assert!(cursor.next().is_none());
        assert_eq!(cursor.position(), 2);

        assert_eq!(cursor.prev().map(|m| m.robot()), Some(r(1)));
        assert_eq!(cursor.current().map(|m| m.robot()), Some(r(0)));
        cursor.reset();
        assert_eq!(cursor.position(), 0);
        assert_eq!(sol.cursor().count(), 2);
    }

    #[test]
    fn test_display_lists_moves() {
        let text = format!("{}", sample());
        assert!(text.starts_with("Solution 02/2/rg#\n"));
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    #[should_panic(expected = "called `Solution::new` with move 0 starting away from its robot")]
    fn test_new_rejects_detached_move() {
        let _ = Solution::new(&[c(0)], vec![mv(0, Direction::East, 1, 3)], DEFAULT_LABELS);
    }
}
