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

use rebound_model::{direction::Direction, puzzle::MAX_ROBOTS};
use rebound_search::setup::SlotMove;

/// Robot state at one search depth.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Frame {
    /// Cell of every slot.
    pub positions: [usize; MAX_ROBOTS],
    /// Axis flags each slot has moved along so far.
    pub axes: [u8; MAX_ROBOTS],
    /// The direction each slot moved in last.
    pub last: [Option<Direction>; MAX_ROBOTS],
}

/// A depth-indexed arena of frames and the moves between them.
///
/// `frames[d]` is the state after `d` moves and `moves[d]` leads from
/// `frames[d]` to `frames[d + 1]`. Capacity is kept across resets so a
/// whole solve runs without allocating per node.
#[derive(Clone, Debug, Default)]
pub struct MoveStack {
    frames: Vec<Frame>,
    moves: Vec<SlotMove>,
    num_robots: usize,
}

impl MoveStack {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a stack with room for `max_depth` moves.
    #[inline]
    pub fn preallocated(max_depth: usize) -> Self {
        Self {
            frames: Vec::with_capacity(max_depth + 1),
            moves: Vec::with_capacity(max_depth),
            num_robots: 0,
        }
    }

    /// Ensures room for `max_depth` moves.
    #[inline]
    pub fn ensure_capacity(&mut self, max_depth: usize) {
        if self.frames.capacity() < max_depth + 1 {
            self.frames.reserve(max_depth + 1 - self.frames.len());
        }
        if self.moves.capacity() < max_depth {
            self.moves.reserve(max_depth - self.moves.len());
        }
    }

    /// Clears the stack and pushes the root frame.
    ///
    /// # Panics
    ///
    /// Panics if `start` holds more than `MAX_ROBOTS` cells.
    pub fn reset(&mut self, start: &[usize]) {
        assert!(
            start.len() <= MAX_ROBOTS,
            "called `MoveStack::reset` with {} robots, the maximum is {}",
            start.len(),
            MAX_ROBOTS
        );
        self.frames.clear();
        self.moves.clear();
        self.num_robots = start.len();

        let mut root = Frame::default();
        root.positions[..start.len()].copy_from_slice(start);
        self.frames.push(root);
    }

    /// Number of moves on the stack.
    #[inline]
    pub fn depth(&self) -> usize {
        self.moves.len()
    }

    #[inline]
    pub fn num_robots(&self) -> usize {
        self.num_robots
    }

    /// Returns the top frame.
    ///
    /// # Panics
    ///
    /// Panics if the stack was never reset.
    #[inline]
    pub fn frame(&self) -> &Frame {
        self.frames
            .last()
            .expect("called `MoveStack::frame` before `MoveStack::reset`")
    }

    /// Returns the cells of the top frame.
    #[inline]
    pub fn positions(&self) -> &[usize] {
        &self.frame().positions[..self.num_robots]
    }

    /// Returns the last move, if any.
    #[inline]
    pub fn last_move(&self) -> Option<&SlotMove> {
        self.moves.last()
    }

    /// Moves on the stack, root first.
    #[inline]
    pub fn moves(&self) -> &[SlotMove] {
        &self.moves
    }

    /// Slides `slot` in `direction` to `to` and pushes the resulting frame.
    #[inline]
    pub fn push(&mut self, slot: usize, direction: Direction, to: usize) -> SlotMove {
        debug_assert!(
            slot < self.num_robots,
            "called `MoveStack::push` with slot {} of {}",
            slot,
            self.num_robots
        );
        let mut next = *self.frame();
        let from = next.positions[slot];
        next.positions[slot] = to;
        next.axes[slot] |= direction.axis_flag();
        next.last[slot] = Some(direction);
        self.frames.push(next);

        let m = SlotMove {
            slot,
            direction,
            from,
            to,
        };
        self.moves.push(m);
        m
    }

    /// Pops the top frame and returns the move that led to it.
    #[inline]
    pub fn pop(&mut self) -> Option<SlotMove> {
        let m = self.moves.pop()?;
        self.frames.pop();
        Some(m)
    }

    /// Returns the total allocated memory in bytes.
    #[inline]
    pub fn allocated_memory_bytes(&self) -> usize {
        self.frames.capacity() * std::mem::size_of::<Frame>()
            + self.moves.capacity() * std::mem::size_of::<SlotMove>()
    }
}

impl std::fmt::Display for MoveStack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MoveStack(depth: {}, robots: {})",
            self.depth(),
            self.num_robots
        )
    }
}
