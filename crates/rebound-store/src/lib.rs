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

//! # Rebound Store
//!
//! **Canonical state keys and compact visited-state storage.**
//!
//! Every search strategy needs to recognize robot placements it has already
//! seen, and state counts run into the millions. This crate packs a
//! placement into one integer and stores those integers in structures whose
//! cost per state is a few bytes at most.
//!
//! ## Modules
//!
//! * **`key`**: `KeyLayout`, the canonical key codec. Interchangeable robots
//!   are sorted before packing so that permutations collapse onto one key.
//! * **`trie`**: `TrieSet` and `TrieMap`, 16-ary prefix trees with branch
//!   compression, allocated in geometrically growing blocks.
//! * **`bitset`**: `SparseBitSet`, a three-level bitset for dense key spaces.
//! * **`visited`**: `VisitedSet` and `VisitedMap`, which pick the cheapest
//!   backing store for a given key width.

pub mod bitset;
pub mod key;
pub mod trie;
pub mod visited;
