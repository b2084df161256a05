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

//! # Rebound Model
//!
//! **The domain model for the Rebound sliding-robot solver.**
//!
//! This crate defines the read-only geometry the search engines run on and
//! the values they hand back. It is the interchange layer between a puzzle
//! description (user input) and the solving engines (`rebound_iddfs`,
//! `rebound_bfs`).
//!
//! ## Architecture
//!
//! * **`index`**: Strongly typed wrappers (`CellIndex`, `RobotIndex`).
//! * **`direction`**: The four cardinal slide directions and their wall bits.
//! * **`board`**: The immutable `Board` (walls, offsets, labels) and its
//!   mutable `BoardBuilder`.
//! * **`puzzle`**: Robot placement plus an optional `Goal`, validated
//!   against a board.
//! * **`solution`**: `Move`, `Solution` and the `MoveCursor` used to step
//!   through a solution.
//! * **`loading`**: A whitespace-token text loader producing a board and a
//!   puzzle.
//!
//! ## Design Philosophy
//!
//! 1.  **Outer walls are guaranteed**: every boundary cell carries a wall on
//!     its outward side, so sliding never needs a bounds check.
//! 2.  **Walls are symmetric**: a wall is always recorded on both cells it
//!     separates.
//! 3.  **Fail-Fast**: builders assert on programming errors, while user
//!     input goes through `Puzzle::validate` and the loader's error type.

pub mod board;
pub mod direction;
pub mod index;
pub mod loading;
pub mod puzzle;
pub mod solution;
