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

//! Bit-width helpers for packed state encodings.
//!
//! The search engines pack one cell index per robot into a single integer.
//! These helpers compute how many bits a value range needs and build masks
//! for extracting packed fields again.

/// Returns the number of bits required to represent every value in `0..count`.
///
/// This is `ceil(log2(count))`, clamped to at least one bit so that a
/// degenerate single-value range still occupies a field.
///
/// # Examples
///
/// ```rust
/// # use rebound_core::bits::bits_needed;
/// assert_eq!(bits_needed(1), 1);
/// assert_eq!(bits_needed(2), 1);
/// assert_eq!(bits_needed(256), 8);
/// assert_eq!(bits_needed(257), 9);
/// ```
#[inline]
pub const fn bits_needed(count: usize) -> u32 {
    if count <= 2 {
        return 1;
    }
    usize::BITS - (count - 1).leading_zeros()
}

/// Returns a mask with the lowest `bits` bits set.
///
/// # Panics
///
/// In debug builds, panics if `bits` exceeds 64.
#[inline]
pub const fn low_mask(bits: u32) -> u64 {
    debug_assert!(bits <= 64, "called `low_mask` with more than 64 bits");
    if bits >= 64 {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}
