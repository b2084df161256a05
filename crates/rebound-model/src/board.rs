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

//! Board geometry.
//!
//! A `Board` is a `width × height` grid stored row-major (`cell = y * width + x`)
//! with one wall mask per cell. Boards are immutable once built and are shared
//! read-only by every solve that runs on them.

use crate::{
    direction::Direction,
    index::{CellIndex, RobotIndex},
    puzzle::MAX_ROBOTS,
};
use rebound_core::bits::bits_needed;

/// Default robot labels, one per robot slot.
pub const DEFAULT_LABELS: [char; MAX_ROBOTS] = ['r', 'g', 'b', 'y', 's'];

/// An immutable walled grid.
#[derive(Clone, PartialEq, Eq)]
pub struct Board {
    width: usize,
    height: usize,
    walls: Vec<u8>,
    labels: [char; MAX_ROBOTS],
}

impl Board {
    /// Returns the number of columns.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the number of rows.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the number of cells.
    #[inline]
    pub fn num_cells(&self) -> usize {
        self.walls.len()
    }

    /// Returns the number of bits needed to store one cell index.
    #[inline]
    pub fn bits_per_cell(&self) -> u32 {
        bits_needed(self.num_cells())
    }

    /// Returns the per-cell wall masks.
    #[inline]
    pub fn walls(&self) -> &[u8] {
        &self.walls
    }

    /// Returns the wall mask of a cell.
    ///
    /// # Panics
    ///
    /// Panics if `cell` is out of bounds.
    #[inline]
    pub fn wall_mask(&self, cell: CellIndex) -> u8 {
        debug_assert!(
            cell.get() < self.num_cells(),
            "called `Board::wall_mask` with cell index out of bounds: the len is {} but the index is {}",
            self.num_cells(),
            cell.get()
        );
        self.walls[cell.get()]
    }

    /// Returns `true` if `cell` has a wall on its `direction` side.
    #[inline]
    pub fn has_wall(&self, cell: CellIndex, direction: Direction) -> bool {
        self.wall_mask(cell) & direction.wall_bit() != 0
    }

    /// Returns the index offset of one step in `direction`.
    #[inline]
    pub fn offset(&self, direction: Direction) -> isize {
        match direction {
            Direction::North => -(self.width as isize),
            Direction::East => 1,
            Direction::South => self.width as isize,
            Direction::West => -1,
        }
    }

    /// Returns the cell one step from `cell` in `direction`.
    ///
    /// The caller must ensure there is no wall in the way; the outer walls
    /// make the step stay on the board in that case.
    #[inline]
    pub fn step(&self, cell: CellIndex, direction: Direction) -> CellIndex {
        debug_assert!(
            !self.has_wall(cell, direction),
            "called `Board::step` through a wall at {} towards {}",
            cell,
            direction
        );
        CellIndex::new(cell.get().wrapping_add_signed(self.offset(direction)))
    }

    /// Returns the neighbour of `cell` in `direction`, or `None` behind a wall.
    #[inline]
    pub fn neighbor(&self, cell: CellIndex, direction: Direction) -> Option<CellIndex> {
        if self.has_wall(cell, direction) {
            None
        } else {
            Some(self.step(cell, direction))
        }
    }

    /// Returns the cell at column `x`, row `y`.
    #[inline]
    pub fn cell(&self, x: usize, y: usize) -> CellIndex {
        debug_assert!(
            x < self.width && y < self.height,
            "called `Board::cell` with coordinates ({}, {}) outside a {}x{} board",
            x,
            y,
            self.width,
            self.height
        );
        CellIndex::new(y * self.width + x)
    }

    /// Returns the `(x, y)` coordinates of a cell.
    #[inline]
    pub fn coordinates(&self, cell: CellIndex) -> (usize, usize) {
        (cell.get() % self.width, cell.get() / self.width)
    }

    /// Returns the robot labels.
    #[inline]
    pub fn labels(&self) -> &[char; MAX_ROBOTS] {
        &self.labels
    }

    /// Returns the label of one robot.
    #[inline]
    pub fn label(&self, robot: RobotIndex) -> char {
        self.labels[robot.get()]
    }

    /// Slides `robot` in `direction` until a wall or another robot stops it.
    ///
    /// This is the reference slide used for replay and validation; it scans
    /// `positions` linearly for blockers.
    pub fn slide(
        &self,
        positions: &[CellIndex],
        robot: RobotIndex,
        direction: Direction,
    ) -> CellIndex {
        let mut cell = positions[robot.get()];
        while !self.has_wall(cell, direction) {
            let next = self.step(cell, direction);
            if positions.contains(&next) {
                break;
            }
            cell = next;
        }
        cell
    }
}

impl std::fmt::Debug for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Board")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("labels", &self.labels)
            .finish()
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for y in 0..self.height {
            let mut top = String::with_capacity(self.width * 2 + 1);
            let mut row = String::with_capacity(self.width * 2 + 1);
            for x in 0..self.width {
                let cell = self.cell(x, y);
                top.push('+');
                top.push(if self.has_wall(cell, Direction::North) { '-' } else { ' ' });
                row.push(if self.has_wall(cell, Direction::West) { '|' } else { ' ' });
                row.push('.');
            }
            top.push('+');
            let last = self.cell(self.width - 1, y);
            row.push(if self.has_wall(last, Direction::East) { '|' } else { ' ' });
            writeln!(f, "{}", top)?;
            writeln!(f, "{}", row)?;
        }
        let mut bottom = String::with_capacity(self.width * 2 + 1);
        for _ in 0..self.width {
            bottom.push_str("+-");
        }
        bottom.push('+');
        writeln!(f, "{}", bottom)
    }
}

/// A mutable builder for `Board`.
#[derive(Clone, Debug)]
pub struct BoardBuilder {
    width: usize,
    height: usize,
    walls: Vec<u8>,
    labels: [char; MAX_ROBOTS],
}

impl BoardBuilder {
    /// Creates an open `width × height` board surrounded by outer walls.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn new(width: usize, height: usize) -> Self {
        assert!(
            width > 0 && height > 0,
            "called `BoardBuilder::new` with an empty board: {}x{}",
            width,
            height
        );

        let mut walls = vec![0u8; width * height];
        for x in 0..width {
            walls[x] |= Direction::North.wall_bit();
            walls[(height - 1) * width + x] |= Direction::South.wall_bit();
        }
        for y in 0..height {
            walls[y * width] |= Direction::West.wall_bit();
            walls[y * width + width - 1] |= Direction::East.wall_bit();
        }

        Self {
            width,
            height,
            walls,
            labels: DEFAULT_LABELS,
        }
    }

    /// Returns the number of cells.
    #[inline]
    pub fn num_cells(&self) -> usize {
        self.walls.len()
    }

    /// Returns the cell at column `x`, row `y`.
    #[inline]
    pub fn cell(&self, x: usize, y: usize) -> CellIndex {
        CellIndex::new(y * self.width + x)
    }

    /// Adds a wall on the `direction` side of `cell`, and on the facing side
    /// of its neighbour when there is one.
    ///
    /// # Panics
    ///
    /// Panics if `cell` is out of bounds.
    pub fn add_wall(&mut self, cell: CellIndex, direction: Direction) -> &mut Self {
        let index = cell.get();
        assert!(
            index < self.num_cells(),
            "called `BoardBuilder::add_wall` with cell index out of bounds: the len is {} but the index is {}",
            self.num_cells(),
            index
        );

        self.walls[index] |= direction.wall_bit();

        let (x, y) = (index % self.width, index / self.width);
        let neighbor = match direction {
            Direction::North if y > 0 => Some(index - self.width),
            Direction::South if y + 1 < self.height => Some(index + self.width),
            Direction::West if x > 0 => Some(index - 1),
            Direction::East if x + 1 < self.width => Some(index + 1),
            _ => None,
        };
        if let Some(n) = neighbor {
            self.walls[n] |= direction.opposite().wall_bit();
        }
        self
    }

    /// Adds several walls at once.
    pub fn add_walls<I>(&mut self, walls: I) -> &mut Self
    where
        I: IntoIterator<Item = (CellIndex, Direction)>,
    {
        for (cell, direction) in walls {
            self.add_wall(cell, direction);
        }
        self
    }

    /// Replaces the robot labels.
    pub fn with_labels(&mut self, labels: [char; MAX_ROBOTS]) -> &mut Self {
        self.labels = labels;
        self
    }

    /// Finalizes the board.
    pub fn build(self) -> Board {
        Board {
            width: self.width,
            height: self.height,
            walls: self.walls,
            labels: self.labels,
        }
    }
}
