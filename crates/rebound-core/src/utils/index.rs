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

//! # Strongly Typed Indices
//!
//! Phantom-typed wrappers around `usize` that keep the solver's index spaces
//! apart. A board cell and a robot slot are both small integers, and swapping
//! them by accident produces searches that silently explore nonsense states.
//! `TypedIndex<T>` carries a tag type `T: TypedIndexTag` and compiles down to
//! a transparent `usize`.
//!
//! ## Usage
//!
//! ```rust
//! use rebound_core::utils::index::{TypedIndex, TypedIndexTag};
//!
//! #[derive(Clone)]
//! struct CellTag;
//! impl TypedIndexTag for CellTag { const NAME: &'static str = "CellIndex"; }
//!
//! type CellIndex = TypedIndex<CellTag>;
//! let c = CellIndex::new(17);
//! assert_eq!(c.get(), 17);
//! assert_eq!(format!("{}", c), "CellIndex(17)");
//! ```

/// Names a family of typed indices for `Debug` and `Display` output.
pub trait TypedIndexTag: Clone {
    const NAME: &'static str;
}

/// An index into one specific index space, identified by the tag `T`.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypedIndex<T> {
    index: usize,
    _marker: std::marker::PhantomData<T>,
}

impl<T> TypedIndex<T> {
    /// Creates a new typed index.
    #[inline(always)]
    pub const fn new(index: usize) -> Self {
        Self {
            index,
            _marker: std::marker::PhantomData,
        }
    }

    /// Returns the underlying `usize`.
    #[inline(always)]
    pub const fn get(&self) -> usize {
        self.index
    }

    /// Returns `true` if this is the first index of its space.
    #[inline(always)]
    pub const fn is_zero(&self) -> bool {
        self.index == 0
    }

    /// Applies a signed step, returning `None` if the result would be negative.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use rebound_core::utils::index::{TypedIndex, TypedIndexTag};
    /// # #[derive(Clone)]
    /// # struct CellTag;
    /// # impl TypedIndexTag for CellTag { const NAME: &'static str = "CellIndex"; }
    /// let c = TypedIndex::<CellTag>::new(4);
    /// assert_eq!(c.offset(-4).map(|c| c.get()), Some(0));
    /// assert!(c.offset(-5).is_none());
    /// ```
    #[inline(always)]
    pub const fn offset(&self, delta: isize) -> Option<Self> {
        match self.index.checked_add_signed(delta) {
            Some(index) => Some(Self::new(index)),
            None => None,
        }
    }
}

impl<T> std::fmt::Debug for TypedIndex<T>
where
    T: TypedIndexTag,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", T::NAME, self.index)
    }
}

impl<T> std::fmt::Display for TypedIndex<T>
where
    T: TypedIndexTag,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", T::NAME, self.index)
    }
}

impl<T> From<usize> for TypedIndex<T> {
    fn from(index: usize) -> Self {
        Self::new(index)
    }
}

impl<T> From<TypedIndex<T>> for usize {
    fn from(typed_index: TypedIndex<T>) -> Self {
        typed_index.index
    }
}

macro_rules! impl_index_op {
    ($trait_name:ident, $method:ident, $assign_trait:ident, $assign_method:ident, $op:tt) => {
        impl<T> std::ops::$trait_name<usize> for TypedIndex<T> {
            type Output = Self;

            fn $method(self, rhs: usize) -> Self::Output {
                Self::new(self.index $op rhs)
            }
        }
        impl<T> std::ops::$assign_trait<usize> for TypedIndex<T> {
            fn $assign_method(&mut self, rhs: usize) {
                self.index = self.index $op rhs;
            }
        }
    };
}

impl_index_op!(Add, add, AddAssign, add_assign, +);
impl_index_op!(Sub, sub, SubAssign, sub_assign, -);

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
    struct SlotTag;

    impl TypedIndexTag for SlotTag {
        const NAME: &'static str = "Slot";
    }

    type Slot = TypedIndex<SlotTag>;

    #[test]
    fn test_new_and_get() {
        assert_eq!(Slot::new(3).get(), 3);
        assert!(Slot::new(0).is_zero());
        assert!(!Slot::new(1).is_zero());
    }

    #[test]
    fn test_conversions() {
        let slot: Slot = 4.into();
        let raw: usize = slot.into();
        assert_eq!(raw, 4);
    }

    #[test]
    fn test_display_uses_tag_name() {
        assert_eq!(format!("{}", Slot::new(2)), "Slot(2)");
        assert_eq!(format!("{:?}", Slot::new(2)), "Slot(2)");
    }

    #[test]
    fn test_offset() {
        let slot = Slot::new(10);
        assert_eq!(slot.offset(5), Some(Slot::new(15)));
        assert_eq!(slot.offset(-10), Some(Slot::new(0)));
        assert_eq!(slot.offset(-11), None);
    }

    #[test]
    fn test_add_sub_ops() {
        let mut slot = Slot::new(10);
        assert_eq!((slot + 2).get(), 12);
        assert_eq!((slot - 2).get(), 8);
        slot += 1;
        slot -= 3;
        assert_eq!(slot.get(), 8);
    }
}
