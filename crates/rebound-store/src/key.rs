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

//! # Canonical State Keys
//!
//! A robot placement is an ordered list of cell indices, one per robot slot.
//! The search engines keep the goal robot in the last slot ("goal-last"). Robots
//! that play the same role are interchangeable, so a placement and any
//! permutation of its interchangeable slots describe the same search state.
//!
//! `KeyLayout` turns a placement into an integer key:
//!
//! 1. Optionally annotate every slot: the annotation (last move direction,
//!    axes moved along) sits below the cell index, so it stays attached to
//!    its robot when slots are sorted.
//! 2. Sort the interchangeable slots ascending (`SortPolicy`). Cells are
//!    distinct, so annotated values sort exactly like their cells.
//! 3. Shift in each slot at `slot_bits` width, beginning with the last slot.
//!    The first sorted slot ends up in the low bits, the goal slot highest.
//! 4. Optionally tag the goal slot: state that only the goal robot carries
//!    sits above every slot (`with_goal_tag_bits`, `tag_goal`).
//!
//! Distinct canonical placements never collide because every slot has its
//! own bit range. Keys are packed into a `u128` (`pack`) and narrowed by
//! `encode` when the layout fits a smaller `StateKey`; a layout wider than
//! `MAX_KEY_BITS` is rejected.

use num_traits::{PrimInt, Unsigned};
use rebound_core::bits::low_mask;
use rebound_model::{direction::Direction, puzzle::MAX_ROBOTS};
use std::{fmt::Debug, hash::Hash};

/// Annotation bits recording a robot's last move direction (0 = none).
pub const LAST_DIRECTION_BITS: u32 = 3;

/// Annotation bits recording which axes a robot has moved along.
pub const AXES_BITS: u32 = 2;

/// Widest key a layout may describe.
pub const MAX_KEY_BITS: u32 = u128::BITS;

/// Encodes a robot's last move direction as an annotation.
#[inline]
pub fn last_direction_code(direction: Option<Direction>) -> usize {
    match direction {
        Some(d) => d.index() + 1,
        None => 0,
    }
}

/// An unsigned integer that can hold a packed state key.
pub trait StateKey: PrimInt + Unsigned + Hash + Debug + Default + 'static {
    /// Width of the type in bits.
    const BITS: u32;

    /// Truncating conversion from `u64`.
    fn from_raw(value: u64) -> Self;

    /// Widening conversion to `u64`.
    fn raw(self) -> u64;
}

impl StateKey for u32 {
    const BITS: u32 = u32::BITS;

    #[inline(always)]
    fn from_raw(value: u64) -> Self {
        value as u32
    }

    #[inline(always)]
    fn raw(self) -> u64 {
        self as u64
    }
}

impl StateKey for u64 {
    const BITS: u32 = u64::BITS;

    #[inline(always)]
    fn from_raw(value: u64) -> Self {
        value
    }

    #[inline(always)]
    fn raw(self) -> u64 {
        self
    }
}

/// Which slots are interchangeable and therefore sorted before packing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SortPolicy {
    /// Every slot but the last; the goal robot keeps its identity.
    AllButLast,
    /// Every slot; used when any robot may reach the goal.
    All,
    /// No slot; every robot keeps its identity.
    None,
}

/// The integer width a layout needs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyWidth {
    /// The key fits into `u32`.
    Narrow,
    /// The key needs `u64`.
    Wide,
    /// The key needs `u128`.
    Huge,
}

/// Describes how placements are packed into keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct KeyLayout {
    robot_count: usize,
    bits_per_cell: u32,
    sort: SortPolicy,
    annotation_bits: u32,
    goal_tag_bits: u32,
}

impl KeyLayout {
    /// Creates a layout without annotations.
    ///
    /// # Panics
    ///
    /// Panics if `robot_count` is outside `1..=MAX_ROBOTS`, if
    /// `bits_per_cell` is zero, or if the key would exceed `MAX_KEY_BITS`.
    pub fn new(robot_count: usize, bits_per_cell: u32, sort: SortPolicy) -> Self {
        assert!(
            (1..=MAX_ROBOTS).contains(&robot_count),
            "called `KeyLayout::new` with {} robots, expected 1 to {}",
            robot_count,
            MAX_ROBOTS
        );
        assert!(
            bits_per_cell > 0,
            "called `KeyLayout::new` with zero bits per cell"
        );
        let layout = Self {
            robot_count,
            bits_per_cell,
            sort,
            annotation_bits: 0,
            goal_tag_bits: 0,
        };
        layout.assert_fits("new");
        layout
    }

    /// Reserves `annotation_bits` bits below every slot's cell index.
    ///
    /// # Panics
    ///
    /// Panics if the key would exceed `MAX_KEY_BITS`.
    pub fn with_annotation_bits(mut self, annotation_bits: u32) -> Self {
        self.annotation_bits = annotation_bits;
        self.assert_fits("with_annotation_bits");
        self
    }

    /// Reserves `goal_tag_bits` bits above the goal slot for state that only
    /// the goal robot carries.
    ///
    /// # Panics
    ///
    /// Panics if every slot is sorted, since there is no goal slot to tag, or
    /// if the key would exceed `MAX_KEY_BITS`.
    pub fn with_goal_tag_bits(mut self, goal_tag_bits: u32) -> Self {
        assert!(
            goal_tag_bits == 0 || self.sort != SortPolicy::All,
            "called `KeyLayout::with_goal_tag_bits` on a layout without a fixed goal slot"
        );
        self.goal_tag_bits = goal_tag_bits;
        self.assert_fits("with_goal_tag_bits");
        self
    }

    fn assert_fits(&self, method: &str) {
        assert!(
            self.total_bits() <= MAX_KEY_BITS,
            "called `KeyLayout::{}` with a {}-bit key: {} robots at {} bits plus {} annotation bits exceed {}",
            method,
            self.total_bits(),
            self.robot_count,
            self.bits_per_cell,
            self.annotation_bits,
            MAX_KEY_BITS
        );
    }

    #[inline]
    pub fn robot_count(&self) -> usize {
        self.robot_count
    }

    #[inline]
    pub fn bits_per_cell(&self) -> u32 {
        self.bits_per_cell
    }

    #[inline]
    pub fn sort_policy(&self) -> SortPolicy {
        self.sort
    }

    #[inline]
    pub fn annotation_bits(&self) -> u32 {
        self.annotation_bits
    }

    #[inline]
    pub fn goal_tag_bits(&self) -> u32 {
        self.goal_tag_bits
    }

    /// Bits occupied by one slot.
    #[inline]
    pub fn slot_bits(&self) -> u32 {
        self.bits_per_cell + self.annotation_bits
    }

    /// Bits occupied by the packed slots, without the goal tag.
    #[inline]
    fn slots_bits(&self) -> u32 {
        self.robot_count as u32 * self.slot_bits()
    }

    /// Bits occupied by the whole key.
    #[inline]
    pub fn total_bits(&self) -> u32 {
        self.slots_bits() + self.goal_tag_bits
    }

    /// Returns the narrowest integer width that holds every key.
    #[inline]
    pub fn key_width(&self) -> KeyWidth {
        match self.total_bits() {
            bits if bits <= u32::BITS => KeyWidth::Narrow,
            bits if bits <= u64::BITS => KeyWidth::Wide,
            _ => KeyWidth::Huge,
        }
    }

    /// Number of leading slots that are sorted.
    #[inline]
    fn sorted_len(&self) -> usize {
        match self.sort {
            SortPolicy::AllButLast => self.robot_count - 1,
            SortPolicy::All => self.robot_count,
            SortPolicy::None => 0,
        }
    }

    /// Combines a cell with its annotation into one slot value.
    #[inline]
    pub fn annotate(&self, cell: usize, annotation: usize) -> usize {
        debug_assert!(
            (annotation as u64) <= low_mask(self.annotation_bits),
            "called `KeyLayout::annotate` with annotation {} wider than {} bits",
            annotation,
            self.annotation_bits
        );
        (cell << self.annotation_bits) | annotation
    }

    /// Returns the cell of a slot value.
    #[inline]
    pub fn cell_of(&self, value: usize) -> usize {
        value >> self.annotation_bits
    }

    /// Returns the annotation of a slot value.
    #[inline]
    pub fn annotation_of(&self, value: usize) -> usize {
        value & low_mask(self.annotation_bits) as usize
    }

    /// Writes the canonical (sorted) form of `values` into `out`.
    #[inline]
    pub fn canonicalize(&self, values: &[usize], out: &mut [usize; MAX_ROBOTS]) {
        debug_assert_eq!(
            values.len(),
            self.robot_count,
            "called `KeyLayout::canonicalize` with a placement of the wrong length"
        );
        out[..self.robot_count].copy_from_slice(values);
        out[..self.sorted_len()].sort_unstable();
    }

    /// Packs slot values (plain cells, or `annotate`d cells) into a key of
    /// any width the layout allows.
    #[inline]
    pub fn pack(&self, values: &[usize]) -> u128 {
        let mut canonical = [0usize; MAX_ROBOTS];
        self.canonicalize(values, &mut canonical);

        let slot_bits = self.slot_bits();
        let mut key = 0u128;
        for &value in canonical[..self.robot_count].iter().rev() {
            debug_assert!(
                (value as u64) <= low_mask(slot_bits),
                "called `KeyLayout::pack` with slot value {} wider than {} bits",
                value,
                slot_bits
            );
            key = (key << slot_bits) | value as u128;
        }
        key
    }

    /// Places `tag` into the goal tag bits of a packed key.
    #[inline]
    pub fn tag_goal(&self, key: u128, tag: usize) -> u128 {
        debug_assert!(
            (tag as u64) <= low_mask(self.goal_tag_bits),
            "called `KeyLayout::tag_goal` with tag {} wider than {} bits",
            tag,
            self.goal_tag_bits
        );
        key | (tag as u128) << self.slots_bits()
    }

    /// Packs slot values into a key of type `K`.
    #[inline]
    pub fn encode<K: StateKey>(&self, values: &[usize]) -> K {
        debug_assert!(
            self.total_bits() <= K::BITS,
            "called `KeyLayout::encode` with a {}-bit key type for a {}-bit layout",
            K::BITS,
            self.total_bits()
        );
        K::from_raw(self.pack(values) as u64)
    }

    /// Unpacks a key into its canonical slot values.
    pub fn decode<K: StateKey>(&self, key: K, out: &mut [usize; MAX_ROBOTS]) {
        let mut raw = key.raw();
        let slot_bits = self.slot_bits();
        let mask = low_mask(slot_bits);
        for slot in out.iter_mut().take(self.robot_count) {
            *slot = (raw & mask) as usize;
            raw >>= slot_bits;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
    use rustc_hash::FxHashMap;

    fn random_placement(rng: &mut StdRng, robots: usize, cells: usize) -> Vec<usize> {
        let mut all: Vec<usize> = (0..cells).collect();
        all.shuffle(rng);
        all.truncate(robots);
        all
    }

    fn canonical_of(layout: &KeyLayout, positions: &[usize]) -> Vec<usize> {
        let mut out = [0usize; MAX_ROBOTS];
        layout.canonicalize(positions, &mut out);
        out[..layout.robot_count()].to_vec()
    }

    #[test]
    fn test_packing_order() {
        let layout = KeyLayout::new(3, 4, SortPolicy::AllButLast);
        // Slots 0 and 1 sort to (2, 9), goal slot 5 stays highest.
        let key: u32 = layout.encode(&[9, 2, 5]);
        assert_eq!(key, 0x592);

        let wild = KeyLayout::new(3, 4, SortPolicy::All);
        let key: u32 = wild.encode(&[9, 2, 5]);
        assert_eq!(key, 0x952);

        let fixed = KeyLayout::new(3, 4, SortPolicy::None);
        let key: u32 = fixed.encode(&[9, 2, 5]);
        assert_eq!(key, 0x529);
    }

    #[test]
    fn test_annotations_travel_with_their_slot() {
        let layout = KeyLayout::new(3, 4, SortPolicy::AllButLast).with_annotation_bits(LAST_DIRECTION_BITS);
        // Cell 9 moved east (code 2), cell 2 never moved, goal slot 5 moved north.
        let a = [layout.annotate(9, 2), layout.annotate(2, 0), layout.annotate(5, 1)];
        let b = [a[1], a[0], a[2]];
        let ka: u32 = layout.encode(&a);
        let kb: u32 = layout.encode(&b);
        assert_eq!(ka, kb);
        assert_eq!(layout.slot_bits(), 7);
        assert_eq!(ka, (((5 << 3 | 1) << 14) | ((9 << 3 | 2) << 7) | (2 << 3)) as u32);

        let mut out = [0usize; MAX_ROBOTS];
        layout.decode(ka, &mut out);
        assert_eq!(layout.cell_of(out[0]), 2);
        assert_eq!(layout.annotation_of(out[1]), 2);
        assert_eq!(layout.cell_of(out[2]), 5);
    }

    #[test]
    fn test_different_annotations_do_not_merge_states() {
        let mut rng = StdRng::seed_from_u64(7);
        let layout = KeyLayout::new(3, 6, SortPolicy::AllButLast).with_annotation_bits(LAST_DIRECTION_BITS);
        let placement = random_placement(&mut rng, 3, 64);
        let first = rng.gen_range(0..5);
        let second = (first + rng.gen_range(1..5)) % 5;
        let mut a: Vec<usize> = placement.iter().map(|&c| layout.annotate(c, 0)).collect();
        let mut b = a.clone();
        a[0] = layout.annotate(placement[0], first);
        b[0] = layout.annotate(placement[0], second);
        assert_ne!(layout.encode::<u64>(&a), layout.encode::<u64>(&b));
    }

    #[test]
    fn test_last_direction_code() {
        assert_eq!(last_direction_code(None), 0);
        assert_eq!(last_direction_code(Some(Direction::North)), 1);
        assert_eq!(last_direction_code(Some(Direction::West)), 4);
        assert!(4 <= low_mask(LAST_DIRECTION_BITS));
    }

    #[test]
    fn test_key_width_selection() {
        assert_eq!(KeyLayout::new(4, 8, SortPolicy::All).key_width(), KeyWidth::Narrow);
        assert_eq!(KeyLayout::new(5, 8, SortPolicy::All).key_width(), KeyWidth::Wide);
        assert_eq!(
            KeyLayout::new(4, 7, SortPolicy::All).with_annotation_bits(1).key_width(),
            KeyWidth::Narrow
        );
        assert_eq!(
            KeyLayout::new(4, 8, SortPolicy::All).with_annotation_bits(1).key_width(),
            KeyWidth::Wide
        );
    }

    #[test]
    fn test_narrow_and_wide_agree() {
        let layout = KeyLayout::new(4, 8, SortPolicy::AllButLast);
        let positions = [200, 13, 77, 254];
        let narrow: u32 = layout.encode(&positions);
        let wide: u64 = layout.encode(&positions);
        assert_eq!(narrow as u64, wide);
    }

    #[test]
    fn test_permutations_share_a_key() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for robots in 1..=MAX_ROBOTS {
            for sort in [SortPolicy::AllButLast, SortPolicy::All] {
                let layout = KeyLayout::new(robots, 8, sort);
                let sortable = layout.sorted_len();
                for _ in 0..200 {
                    let placement = random_placement(&mut rng, robots, 256);
                    let mut permuted = placement.clone();
                    permuted[..sortable].shuffle(&mut rng);
                    assert_eq!(
                        layout.encode::<u64>(&placement),
                        layout.encode::<u64>(&permuted),
                        "{:?} vs {:?}",
                        placement,
                        permuted
                    );
                }
            }
        }
    }

    #[test]
    fn test_distinct_states_never_collide() {
        let mut rng = StdRng::seed_from_u64(42);
        for robots in 1..=MAX_ROBOTS {
            for sort in [SortPolicy::AllButLast, SortPolicy::All, SortPolicy::None] {
                let layout = KeyLayout::new(robots, 6, sort);
                let mut seen: FxHashMap<u64, Vec<usize>> = FxHashMap::default();
                for _ in 0..2_000 {
                    let placement = random_placement(&mut rng, robots, 64);
                    let canonical = canonical_of(&layout, &placement);
                    let key: u64 = layout.encode(&placement);
                    let previous = seen.entry(key).or_insert_with(|| canonical.clone());
                    assert_eq!(*previous, canonical, "collision on key {:#x}", key);
                }
            }
        }
    }

    #[test]
    fn test_goal_slot_is_not_interchangeable() {
        let layout = KeyLayout::new(3, 5, SortPolicy::AllButLast);
        let a: u32 = layout.encode(&[1, 2, 3]);
        let b: u32 = layout.encode(&[1, 3, 2]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_keys_past_64_bits_stay_distinct() {
        // 5 slots of 13 bits: the goal cell's top bit lands on bit 64.
        let layout = KeyLayout::new(5, 10, SortPolicy::AllButLast).with_annotation_bits(LAST_DIRECTION_BITS);
        assert_eq!(layout.total_bits(), 65);
        assert_eq!(layout.key_width(), KeyWidth::Huge);

        let high: Vec<usize> = [4, 3, 2, 1, 1023].iter().map(|&c| layout.annotate(c, 0)).collect();
        let low: Vec<usize> = [4, 3, 2, 1, 511].iter().map(|&c| layout.annotate(c, 0)).collect();
        let (a, b) = (layout.pack(&high), layout.pack(&low));
        assert_ne!(a, b);
        assert_eq!(a as u64, b as u64);
        assert_eq!(a >> 64, 1);
    }

    #[test]
    fn test_goal_tag_sits_above_the_slots() {
        let layout = KeyLayout::new(5, 8, SortPolicy::AllButLast)
            .with_annotation_bits(LAST_DIRECTION_BITS)
            .with_goal_tag_bits(AXES_BITS);
        assert_eq!(layout.total_bits(), 57);
        assert_eq!(layout.key_width(), KeyWidth::Wide);

        let placement = [10, 20, 30, 40, 255];
        let key = layout.pack(&placement);
        assert_eq!(key >> 55, 0);
        let tagged = layout.tag_goal(key, 0b11);
        assert_eq!(tagged >> 55, 0b11);
        assert_eq!(tagged & ((1u128 << 55) - 1), key);
        assert_ne!(layout.tag_goal(key, 0b01), layout.tag_goal(key, 0b10));
    }

    #[test]
    fn test_pack_matches_encode() {
        let layout = KeyLayout::new(4, 8, SortPolicy::All).with_annotation_bits(1);
        let values = [7, 300, 12, 511];
        let wide: u64 = layout.encode(&values);
        assert_eq!(layout.pack(&values), wide as u128);
    }

    #[test]
    #[should_panic(expected = "called `KeyLayout::with_annotation_bits` with a 130-bit key")]
    fn test_oversized_layout_panics() {
        let _ = KeyLayout::new(5, 22, SortPolicy::All).with_annotation_bits(4);
    }

    #[test]
    #[should_panic(expected = "called `KeyLayout::with_goal_tag_bits` on a layout without a fixed goal slot")]
    fn test_goal_tag_needs_a_goal_slot() {
        let _ = KeyLayout::new(3, 4, SortPolicy::All).with_goal_tag_bits(AXES_BITS);
    }

    #[test]
    #[should_panic(expected = "called `KeyLayout::new` with 6 robots")]
    fn test_too_many_robots_panics() {
        let _ = KeyLayout::new(6, 4, SortPolicy::All);
    }
}
