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

//! # Compact Tries
//!
//! `TrieSet` and `TrieMap` store integer keys in a 16-ary prefix tree that
//! consumes four key bits per level, least significant nibble first.
//!
//! ## Slot encoding
//!
//! Every node is an array of 16 slots of the key type `K`:
//!
//! - `0`: empty.
//! - high bit clear, inner level: index of the child node.
//! - high bit clear, last level: stored value plus one.
//! - high bit set: a compressed branch. The remaining key suffix and the
//!   value are stored inline as `HIGH | suffix << value_bits | value`.
//!
//! A key that lands in an empty slot is stored as a compressed branch when
//! its suffix and value fit next to the tag bit. Only when a second key with
//! a different suffix arrives at that slot is a real child node allocated
//! and the old entry pushed one level down. Sparse key sets therefore cost
//! roughly one node per distinct prefix instead of one node per level.
//!
//! Nodes live in blocks whose sizes double, so node indices are stable and
//! blocks are never moved or freed while the trie lives.

use crate::key::StateKey;

const NODE_BITS: u32 = 4;
const ARITY: usize = 1 << NODE_BITS;
const NIBBLE_MASK: u64 = (ARITY as u64) - 1;
const FIRST_BLOCK_NODES: usize = 256;

/// Fixed-size node storage with geometrically growing blocks.
#[derive(Clone, Debug)]
struct NodeArena<K> {
    blocks: Vec<Vec<K>>,
    len: usize,
    capacity: usize,
}

impl<K: StateKey> NodeArena<K> {
    fn new() -> Self {
        Self {
            blocks: Vec::new(),
            len: 0,
            capacity: 0,
        }
    }

    /// Allocates a zeroed node and returns its index.
    fn alloc(&mut self) -> usize {
        if self.len == self.capacity {
            let nodes = FIRST_BLOCK_NODES << self.blocks.len();
            self.blocks.push(vec![K::zero(); nodes * ARITY]);
            self.capacity += nodes;
        }
        let id = self.len;
        self.len += 1;
        id
    }

    /// Maps a node index to its block and the offset of its first slot.
    #[inline(always)]
    fn locate(node: usize) -> (usize, usize) {
        let q = node / FIRST_BLOCK_NODES + 1;
        let block = (usize::BITS - 1 - q.leading_zeros()) as usize;
        let first = FIRST_BLOCK_NODES * ((1 << block) - 1);
        (block, (node - first) * ARITY)
    }

    #[inline(always)]
    fn get(&self, node: usize, nibble: usize) -> K {
        let (block, base) = Self::locate(node);
        self.blocks[block][base + nibble]
    }

    #[inline(always)]
    fn set(&mut self, node: usize, nibble: usize, slot: K) {
        let (block, base) = Self::locate(node);
        self.blocks[block][base + nibble] = slot;
    }

    #[inline]
    fn len(&self) -> usize {
        self.len
    }

    fn allocated_memory_bytes(&self) -> usize {
        self.capacity * ARITY * std::mem::size_of::<K>()
            + self.blocks.capacity() * std::mem::size_of::<Vec<K>>()
    }
}

/// The shared trie core. `value_bits` is zero for sets.
#[derive(Clone, Debug)]
struct Trie<K> {
    key_bits: u32,
    value_bits: u32,
    levels: u32,
    nodes: NodeArena<K>,
    len: usize,
}

impl<K: StateKey> Trie<K> {
    fn new(key_bits: u32, value_bits: u32, type_name: &str) -> Self {
        assert!(
            key_bits > 0 && key_bits <= K::BITS,
            "called `{}::new` with {} key bits for a {}-bit key type",
            type_name,
            key_bits,
            K::BITS
        );
        let mut nodes = NodeArena::new();
        let root = nodes.alloc();
        debug_assert_eq!(root, 0);
        Self {
            key_bits,
            value_bits,
            levels: key_bits.div_ceil(NODE_BITS),
            nodes,
            len: 0,
        }
    }

    #[inline(always)]
    fn high() -> K {
        K::one() << (K::BITS as usize - 1)
    }

    /// Whether a suffix of `suffix_bits` bits plus a value fit inline.
    #[inline(always)]
    fn can_compress(&self, suffix_bits: u32) -> bool {
        suffix_bits + self.value_bits < K::BITS
    }

    /// Bits of the key that remain below `level` once its nibble is consumed.
    #[inline(always)]
    fn suffix_bits(&self, level: u32) -> u32 {
        self.key_bits.saturating_sub((level + 1) * NODE_BITS)
    }

    #[inline(always)]
    fn compressed(&self, suffix: u64, value: u8) -> K {
        Self::high() | K::from_raw((suffix << self.value_bits) | value as u64)
    }

    #[inline(always)]
    fn decompress(&self, slot: K) -> (u64, u8) {
        let payload = (slot & !Self::high()).raw();
        let value_mask = (1u64 << self.value_bits) - 1;
        (payload >> self.value_bits, (payload & value_mask) as u8)
    }

    #[inline(always)]
    fn leaf(value: u8) -> K {
        K::from_raw(value as u64 + 1)
    }

    /// Inserts `key` with `value`, or replaces the stored value when
    /// `replace(old)` holds. Returns `true` if anything was written.
    fn upsert<F>(&mut self, key: K, value: u8, replace: F) -> bool
    where
        F: Fn(u8) -> bool,
    {
        debug_assert!(
            self.key_bits == K::BITS || key.raw() >> self.key_bits == 0,
            "key {:?} is wider than {} bits",
            key,
            self.key_bits
        );

        let mut rest = key.raw();
        let mut node = 0usize;
        let mut level = 0u32;
        loop {
            let nibble = (rest & NIBBLE_MASK) as usize;
            rest >>= NODE_BITS;
            let last = level + 1 == self.levels;
            let slot = self.nodes.get(node, nibble);

            if slot.is_zero() {
                let entry = if last {
                    Self::leaf(value)
                } else if self.can_compress(self.suffix_bits(level)) {
                    self.compressed(rest, value)
                } else {
                    let child = self.nodes.alloc();
                    self.nodes.set(node, nibble, K::from_raw(child as u64));
                    node = child;
                    level += 1;
                    continue;
                };
                self.nodes.set(node, nibble, entry);
                self.len += 1;
                return true;
            }

            if last {
                let old = (slot.raw() - 1) as u8;
                if replace(old) {
                    self.nodes.set(node, nibble, Self::leaf(value));
                    return true;
                }
                return false;
            }

            if slot & Self::high() != K::zero() {
                let (suffix, old) = self.decompress(slot);
                if suffix == rest {
                    if replace(old) {
                        self.nodes.set(node, nibble, self.compressed(rest, value));
                        return true;
                    }
                    return false;
                }

                // Split: move the resident entry into a fresh child node.
                let child = self.nodes.alloc();
                let child_level = level + 1;
                let moved = if child_level + 1 == self.levels {
                    Self::leaf(old)
                } else {
                    self.compressed(suffix >> NODE_BITS, old)
                };
                self.nodes
                    .set(child, (suffix & NIBBLE_MASK) as usize, moved);
                self.nodes.set(node, nibble, K::from_raw(child as u64));
                node = child;
                level = child_level;
                continue;
            }

            node = slot.raw() as usize;
            level += 1;
        }
    }

    /// Returns the value stored for `key`.
    fn get(&self, key: K) -> Option<u8> {
        let mut rest = key.raw();
        let mut node = 0usize;
        let mut level = 0u32;
        loop {
            let nibble = (rest & NIBBLE_MASK) as usize;
            rest >>= NODE_BITS;
            let slot = self.nodes.get(node, nibble);
            if slot.is_zero() {
                return None;
            }
            if level + 1 == self.levels {
                return Some((slot.raw() - 1) as u8);
            }
            if slot & Self::high() != K::zero() {
                let (suffix, value) = self.decompress(slot);
                return (suffix == rest).then_some(value);
            }
            node = slot.raw() as usize;
            level += 1;
        }
    }

    #[inline]
    fn allocated_memory_bytes(&self) -> usize {
        std::mem::size_of::<Self>() + self.nodes.allocated_memory_bytes()
    }
}

/// A set of integer keys.
///
/// # Examples
///
/// ```rust
/// # use rebound_store::trie::TrieSet;
/// let mut set = TrieSet::<u32>::new(20);
/// assert!(set.add(0xABCDE));
/// assert!(!set.add(0xABCDE));
/// assert!(set.contains(0xABCDE));
/// assert_eq!(set.len(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct TrieSet<K> {
    trie: Trie<K>,
}

impl<K: StateKey> TrieSet<K> {
    /// Creates an empty set for keys of at most `key_bits` bits.
    ///
    /// # Panics
    ///
    /// Panics if `key_bits` is zero or wider than `K`.
    pub fn new(key_bits: u32) -> Self {
        Self {
            trie: Trie::new(key_bits, 0, "TrieSet"),
        }
    }

    /// Adds `key`. Returns `true` iff it was not present.
    #[inline]
    pub fn add(&mut self, key: K) -> bool {
        self.trie.upsert(key, 0, |_| false)
    }

    #[inline]
    pub fn contains(&self, key: K) -> bool {
        self.trie.get(key).is_some()
    }

    /// Returns the number of distinct keys.
    #[inline]
    pub fn len(&self) -> usize {
        self.trie.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.trie.len == 0
    }

    /// Returns the number of allocated nodes.
    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.trie.nodes.len()
    }

    #[inline]
    pub fn allocated_memory_bytes(&self) -> usize {
        self.trie.allocated_memory_bytes()
    }
}

/// A map from integer keys to `u8` values that only ever grows values.
///
/// # Examples
///
/// ```rust
/// # use rebound_store::trie::TrieMap;
/// let mut map = TrieMap::<u64>::new(40);
/// assert!(map.put_if_greater(7, 5));
/// assert!(!map.put_if_greater(7, 4));
/// assert_eq!(map.get(7), Some(5));
/// assert!(map.put_if_greater(7, 6));
/// ```
#[derive(Clone, Debug)]
pub struct TrieMap<K> {
    trie: Trie<K>,
}

impl<K: StateKey> TrieMap<K> {
    /// Creates an empty map for keys of at most `key_bits` bits.
    ///
    /// # Panics
    ///
    /// Panics if `key_bits` is zero or wider than `K`.
    pub fn new(key_bits: u32) -> Self {
        Self {
            trie: Trie::new(key_bits, u8::BITS, "TrieMap"),
        }
    }

    /// Stores `value` for `key` if the key is absent or holds a strictly
    /// smaller value. Returns `true` iff the map changed.
    #[inline]
    pub fn put_if_greater(&mut self, key: K, value: u8) -> bool {
        self.trie.upsert(key, value, |old| value > old)
    }

    #[inline]
    pub fn get(&self, key: K) -> Option<u8> {
        self.trie.get(key)
    }

    /// Returns the number of distinct keys.
    #[inline]
    pub fn len(&self) -> usize {
        self.trie.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.trie.len == 0
    }

    /// Returns the number of allocated nodes.
    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.trie.nodes.len()
    }

    #[inline]
    pub fn allocated_memory_bytes(&self) -> usize {
        self.trie.allocated_memory_bytes()
    }
}
