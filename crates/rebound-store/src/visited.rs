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

//! # Visited Stores
//!
//! Search engines record visited keys through `VisitedSet` (membership) and
//! `VisitedMap` (key to small value, keep-if-greater). Both pick their
//! backing structure once, from the total key width of a `KeyLayout`:
//!
//! | Key bits | `VisitedSet`           | `VisitedMap`       |
//! |----------|------------------------|--------------------|
//! | ≤ 24     | `SparseBitSet`         | `TrieMap<u32>`     |
//! | ≤ 32     | `TrieSet<u32>`         | `TrieMap<u32>`     |
//! | ≤ 64     | `TrieSet<u64>`         | `TrieMap<u64>`     |
//! | ≤ 128    | `FxHashSet<u128>`      | `FxHashMap<u128, u8>` |
//!
//! Keys are passed as `u128` (see `KeyLayout::pack`) and narrowed internally.

use crate::{
    bitset::SparseBitSet,
    key::{KeyLayout, KeyWidth},
    trie::{TrieMap, TrieSet},
};
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::hash_map::Entry;

/// Approximate bytes per hashed entry: the entry plus one control byte.
#[inline]
fn hashed_bytes<T>(capacity: usize) -> usize {
    capacity * (std::mem::size_of::<T>() + 1)
}

/// Widest key space backed by the dense bitset.
pub const DENSE_MAX_BITS: u32 = 24;

/// A set of visited state keys.
#[derive(Clone, Debug)]
pub enum VisitedSet {
    Dense(SparseBitSet),
    Narrow(TrieSet<u32>),
    Wide(TrieSet<u64>),
    Huge(FxHashSet<u128>),
}

impl VisitedSet {
    /// Chooses the cheapest store for keys of `layout`.
    pub fn for_layout(layout: &KeyLayout) -> Self {
        let bits = layout.total_bits();
        if bits <= DENSE_MAX_BITS {
            Self::Dense(SparseBitSet::new(bits))
        } else {
            match layout.key_width() {
                KeyWidth::Narrow => Self::Narrow(TrieSet::new(bits)),
                KeyWidth::Wide => Self::Wide(TrieSet::new(bits)),
                KeyWidth::Huge => Self::Huge(FxHashSet::default()),
            }
        }
    }

    /// Records `key`. Returns `true` iff it was not yet visited.
    #[inline]
    pub fn add(&mut self, key: u128) -> bool {
        match self {
            Self::Dense(s) => s.add(key as u64),
            Self::Narrow(s) => s.add(key as u32),
            Self::Wide(s) => s.add(key as u64),
            Self::Huge(s) => s.insert(key),
        }
    }

    #[inline]
    pub fn contains(&self, key: u128) -> bool {
        match self {
            Self::Dense(s) => s.contains(key as u64),
            Self::Narrow(s) => s.contains(key as u32),
            Self::Wide(s) => s.contains(key as u64),
            Self::Huge(s) => s.contains(&key),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        match self {
            Self::Dense(s) => s.len(),
            Self::Narrow(s) => s.len(),
            Self::Wide(s) => s.len(),
            Self::Huge(s) => s.len(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn allocated_memory_bytes(&self) -> usize {
        match self {
            Self::Dense(s) => s.allocated_memory_bytes(),
            Self::Narrow(s) => s.allocated_memory_bytes(),
            Self::Wide(s) => s.allocated_memory_bytes(),
            Self::Huge(s) => hashed_bytes::<u128>(s.capacity()),
        }
    }

    /// Short name of the backing store, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Dense(_) => "SparseBitSet",
            Self::Narrow(_) => "TrieSet<u32>",
            Self::Wide(_) => "TrieSet<u64>",
            Self::Huge(_) => "FxHashSet<u128>",
        }
    }
}

/// A map from visited state keys to a small value that only grows.
#[derive(Clone, Debug)]
pub enum VisitedMap {
    Narrow(TrieMap<u32>),
    Wide(TrieMap<u64>),
    Huge(FxHashMap<u128, u8>),
}

impl VisitedMap {
    /// Chooses the cheapest store for keys of `layout`.
    pub fn for_layout(layout: &KeyLayout) -> Self {
        let bits = layout.total_bits();
        match layout.key_width() {
            KeyWidth::Narrow => Self::Narrow(TrieMap::new(bits)),
            KeyWidth::Wide => Self::Wide(TrieMap::new(bits)),
            KeyWidth::Huge => Self::Huge(FxHashMap::default()),
        }
    }

    /// Stores `value` unless the key already holds a value `>= value`.
    /// Returns `true` iff the map changed.
    #[inline]
    pub fn put_if_greater(&mut self, key: u128, value: u8) -> bool {
        match self {
            Self::Narrow(m) => m.put_if_greater(key as u32, value),
            Self::Wide(m) => m.put_if_greater(key as u64, value),
            Self::Huge(m) => match m.entry(key) {
                Entry::Occupied(mut entry) => {
                    if *entry.get() >= value {
                        return false;
                    }
                    entry.insert(value);
                    true
                }
                Entry::Vacant(entry) => {
                    entry.insert(value);
                    true
                }
            },
        }
    }

    #[inline]
    pub fn get(&self, key: u128) -> Option<u8> {
        match self {
            Self::Narrow(m) => m.get(key as u32),
            Self::Wide(m) => m.get(key as u64),
            Self::Huge(m) => m.get(&key).copied(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        match self {
            Self::Narrow(m) => m.len(),
            Self::Wide(m) => m.len(),
            Self::Huge(m) => m.len(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn allocated_memory_bytes(&self) -> usize {
        match self {
            Self::Narrow(m) => m.allocated_memory_bytes(),
            Self::Wide(m) => m.allocated_memory_bytes(),
            Self::Huge(m) => hashed_bytes::<(u128, u8)>(m.capacity()),
        }
    }

    /// Short name of the backing store, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Narrow(_) => "TrieMap<u32>",
            Self::Wide(_) => "TrieMap<u64>",
            Self::Huge(_) => "FxHashMap<u128, u8>",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::SortPolicy;

    #[test]
    fn test_set_selection_by_width() {
        let dense = KeyLayout::new(3, 8, SortPolicy::All);
        assert!(matches!(VisitedSet::for_layout(&dense), VisitedSet::Dense(_)));

        let narrow = KeyLayout::new(4, 8, SortPolicy::All);
        assert!(matches!(VisitedSet::for_layout(&narrow), VisitedSet::Narrow(_)));

        let wide = KeyLayout::new(5, 8, SortPolicy::All);
        assert!(matches!(VisitedSet::for_layout(&wide), VisitedSet::Wide(_)));

        let huge = KeyLayout::new(5, 10, SortPolicy::All).with_annotation_bits(3);
        assert!(matches!(VisitedSet::for_layout(&huge), VisitedSet::Huge(_)));
    }

    #[test]
    fn test_map_selection_by_width() {
        let narrow = KeyLayout::new(4, 8, SortPolicy::AllButLast);
        assert_eq!(VisitedMap::for_layout(&narrow).kind(), "TrieMap<u32>");
        let wide = KeyLayout::new(4, 8, SortPolicy::AllButLast).with_annotation_bits(1);
        assert_eq!(VisitedMap::for_layout(&wide).kind(), "TrieMap<u64>");
        let huge = KeyLayout::new(5, 10, SortPolicy::AllButLast).with_annotation_bits(3);
        assert_eq!(VisitedMap::for_layout(&huge).kind(), "FxHashMap<u128, u8>");
    }

    #[test]
    fn test_set_behaves_the_same_for_every_backing() {
        for layout in [
            KeyLayout::new(2, 8, SortPolicy::All),
            KeyLayout::new(4, 8, SortPolicy::All),
            KeyLayout::new(5, 8, SortPolicy::All),
            KeyLayout::new(5, 14, SortPolicy::All),
        ] {
            let n = layout.robot_count();
            let mut set = VisitedSet::for_layout(&layout);
            let placement = &[1, 2, 3, 4, 5][..n];
            let reversed: Vec<usize> = placement.iter().rev().copied().collect();
            let a = layout.pack(placement);
            let b = layout.pack(&reversed);
            let c = layout.pack(&[9, 8, 7, 6, 250][..n]);
            assert!(set.add(a), "{}", set.kind());
            assert!(!set.add(a));
            assert!(!set.add(b));
            assert!(set.add(c));
            assert!(set.contains(c));
            assert!(set.allocated_memory_bytes() > 0);
        }
    }

    #[test]
    fn test_map_keeps_largest_value() {
        for layout in [
            KeyLayout::new(5, 10, SortPolicy::AllButLast),
            KeyLayout::new(5, 10, SortPolicy::AllButLast).with_annotation_bits(3),
        ] {
            let mut map = VisitedMap::for_layout(&layout);
            let key = layout.pack(&[1, 2, 3, 4, 1000]);
            assert!(map.put_if_greater(key, 3), "{}", map.kind());
            assert!(!map.put_if_greater(key, 2));
            assert!(!map.put_if_greater(key, 3));
            assert!(map.put_if_greater(key, 7));
            assert_eq!(map.get(key), Some(7));
            assert_eq!(map.get(key + 1), None);
            assert_eq!(map.len(), 1);
        }
    }
}
