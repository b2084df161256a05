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

//! # Sparse Bitset
//!
//! A three-level bitset for keys drawn from a dense, moderately sized space.
//! The key is split into `top | mid | leaf` bit ranges. The top level is a
//! plain array, mid-level arrays and `FixedBitSet` leaves are allocated on
//! first touch, so untouched regions of the key space cost one pointer.

use fixedbitset::FixedBitSet;

const LEAF_BITS: u32 = 12;
const MID_BITS: u32 = 6;
const LEAF_LEN: usize = 1 << LEAF_BITS;
const MID_LEN: usize = 1 << MID_BITS;

/// The widest key space a `SparseBitSet` accepts.
pub const MAX_SPARSE_BITS: u32 = 32;

type MidLevel = Box<[Option<Box<FixedBitSet>>]>;

/// A lazily allocated bitset over `0..2^bits`.
///
/// # Examples
///
/// ```rust
/// # use rebound_store::bitset::SparseBitSet;
/// let mut bits = SparseBitSet::new(24);
/// assert!(bits.add(123_456));
/// assert!(!bits.add(123_456));
/// assert!(bits.contains(123_456));
/// assert!(!bits.contains(123_457));
/// ```
#[derive(Clone, Debug)]
pub struct SparseBitSet {
    bits: u32,
    top: Vec<Option<MidLevel>>,
    len: usize,
    mids: usize,
    leaves: usize,
}

impl SparseBitSet {
    /// Creates an empty bitset for values below `2^bits`.
    ///
    /// # Panics
    ///
    /// Panics if `bits` exceeds `MAX_SPARSE_BITS`.
    pub fn new(bits: u32) -> Self {
        assert!(
            bits <= MAX_SPARSE_BITS,
            "called `SparseBitSet::new` with {} bits, the maximum is {}",
            bits,
            MAX_SPARSE_BITS
        );
        let top_bits = bits.saturating_sub(LEAF_BITS + MID_BITS);
        let mut top = Vec::new();
        top.resize_with(1usize << top_bits, || None);
        Self {
            bits,
            top,
            len: 0,
            mids: 0,
            leaves: 0,
        }
    }

    #[inline(always)]
    fn split(&self, value: u64) -> (usize, usize, usize) {
        debug_assert!(
            value >> self.bits == 0,
            "called `SparseBitSet` with value {} outside 0..2^{}",
            value,
            self.bits
        );
        let value = value as usize;
        (
            value >> (LEAF_BITS + MID_BITS),
            (value >> LEAF_BITS) & (MID_LEN - 1),
            value & (LEAF_LEN - 1),
        )
    }

    /// Sets the bit for `value`. Returns `true` iff it was clear.
    pub fn add(&mut self, value: u64) -> bool {
        let (t, m, l) = self.split(value);

        let mid = self.top[t].get_or_insert_with(|| {
            self.mids += 1;
            let mut level = Vec::with_capacity(MID_LEN);
            level.resize_with(MID_LEN, || None);
            level.into_boxed_slice()
        });
        let leaf = mid[m].get_or_insert_with(|| {
            self.leaves += 1;
            Box::new(FixedBitSet::with_capacity(LEAF_LEN))
        });

        let was_set = leaf.put(l);
        if !was_set {
            self.len += 1;
        }
        !was_set
    }

    /// Returns `true` if the bit for `value` is set.
    pub fn contains(&self, value: u64) -> bool {
        let (t, m, l) = self.split(value);
        self.top[t]
            .as_ref()
            .and_then(|mid| mid[m].as_ref())
            .is_some_and(|leaf| leaf.contains(l))
    }

    /// Returns the number of set bits.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn allocated_memory_bytes(&self) -> usize {
        let pointer = std::mem::size_of::<Option<Box<FixedBitSet>>>();
        std::mem::size_of::<Self>()
            + self.top.capacity() * std::mem::size_of::<Option<MidLevel>>()
            + self.mids * MID_LEN * pointer
            + self.leaves * (LEAF_LEN / 8 + std::mem::size_of::<FixedBitSet>())
    }
}
