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

//! # Rebound Core
//!
//! Foundational utilities shared by every crate of the Rebound sliding-robot
//! solver. The primitives here are deliberately small and allocation free so
//! they can sit in the innermost loops of the search engines.
//!
//! ## Modules
//!
//! - `bits`: Bit-width arithmetic used when packing robot positions into
//!   integer keys (`bits_needed`, `low_mask`).
//! - `num`: By-value saturating arithmetic (`SaturatingAddVal`) used by all
//!   statistics counters.
//! - `utils`: Phantom-tagged, strongly typed indices (`TypedIndex<T>`) that
//!   keep cell indices and robot indices from being mixed up.

pub mod bits;
pub mod num;
pub mod utils;
