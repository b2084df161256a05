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

use rebound_model::{board::Board, direction::Direction};

/// Obstacle bit for a cell that holds a robot.
pub const ROBOT: u8 = 1 << 4;

/// One byte per cell: the four wall bits of the board plus `ROBOT`.
///
/// The engine places and removes robot bits as it moves robots, so a slide
/// only ever looks at the cell it is in and the next one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObstacleMask {
    cells: Vec<u8>,
    offsets: [isize; 4],
}

impl ObstacleMask {
    /// Creates a mask with the walls of `board` and no robots.
    pub fn new(board: &Board) -> Self {
        let mut offsets = [0isize; 4];
        for direction in Direction::ALL {
            offsets[direction.index()] = board.offset(direction);
        }
        Self {
            cells: board.walls().to_vec(),
            offsets,
        }
    }

    #[inline(always)]
    pub fn place(&mut self, cell: usize) {
        debug_assert!(
            self.cells[cell] & ROBOT == 0,
            "called `ObstacleMask::place` on occupied cell {}",
            cell
        );
        self.cells[cell] |= ROBOT;
    }

    #[inline(always)]
    pub fn remove(&mut self, cell: usize) {
        debug_assert!(
            self.cells[cell] & ROBOT != 0,
            "called `ObstacleMask::remove` on empty cell {}",
            cell
        );
        self.cells[cell] &= !ROBOT;
    }

    #[inline(always)]
    pub fn is_occupied(&self, cell: usize) -> bool {
        self.cells[cell] & ROBOT != 0
    }

    /// Moves the robot bit from `from` to `to`.
    #[inline(always)]
    pub fn relocate(&mut self, from: usize, to: usize) {
        self.remove(from);
        self.place(to);
    }

    /// Slides from `from` in `direction` until a wall or a robot stops it.
    ///
    /// The outer walls keep the slide on the board.
    #[inline(always)]
    pub fn slide(&self, from: usize, direction: Direction) -> usize {
        let wall = direction.wall_bit();
        let offset = self.offsets[direction.index()];
        let mut cell = from;
        while self.cells[cell] & wall == 0 {
            let next = cell.wrapping_add_signed(offset);
            if self.cells[next] & ROBOT != 0 {
                break;
            }
            cell = next;
        }
        cell
    }

    #[inline]
    pub fn allocated_memory_bytes(&self) -> usize {
        self.cells.capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rebound_model::{
        board::BoardBuilder,
        index::RobotIndex,
    };

    #[test]
    fn test_slide_matches_board_slide() {
        let mut builder = BoardBuilder::new(5, 5);
        let c = builder.cell(2, 1);
        builder.add_wall(c, Direction::South);
        let board = builder.build();

        let robots = [board.cell(2, 4), board.cell(0, 1), board.cell(4, 1)];
        let mut mask = ObstacleMask::new(&board);
        for r in &robots {
            mask.place(r.get());
        }

        for (i, r) in robots.iter().enumerate() {
            for direction in Direction::ALL {
                let expected = board.slide(&robots, RobotIndex::new(i), direction);
                assert_eq!(
                    mask.slide(r.get(), direction),
                    expected.get(),
                    "robot {} towards {}",
                    i,
                    direction
                );
            }
        }
    }

    #[test]
    fn test_place_and_remove() {
        let board = BoardBuilder::new(3, 3).build();
        let mut mask = ObstacleMask::new(&board);
        mask.place(4);
        assert!(mask.is_occupied(4));
        assert_eq!(mask.slide(1, Direction::South), 1);
        mask.relocate(4, 8);
        assert!(!mask.is_occupied(4));
        assert_eq!(mask.slide(1, Direction::South), 7);
        assert_eq!(mask.slide(6, Direction::East), 7);
    }
}
