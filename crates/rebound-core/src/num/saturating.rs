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

use core::ops::Add;

macro_rules! saturating_add_impl {
    ($($t:ty),*) => {
        $(
            impl SaturatingAddVal for $t {
                #[inline(always)]
                fn saturating_add_val(self, v: Self) -> Self {
                    <$t>::saturating_add(self, v)
                }
            }
        )*
    };
}

/// Saturating addition by value.
///
/// Clamps at the numeric bounds of the type instead of overflowing.
///
/// # Examples
///
/// ```rust
/// # use rebound_core::num::saturating::SaturatingAddVal;
/// let nodes: u64 = u64::MAX - 1;
/// assert_eq!(nodes.saturating_add_val(5), u64::MAX);
///
/// let depth: u8 = 250;
/// assert_eq!(depth.saturating_add_val(10), 255);
/// ```
pub trait SaturatingAddVal: Sized + Add<Self, Output = Self> {
    /// Performs saturating addition by value.
    fn saturating_add_val(self, v: Self) -> Self;
}

saturating_add_impl!(u8, u16, u32, u64, usize);

#[cfg(test)]
mod tests {
    use super::SaturatingAddVal;

    #[test]
    fn test_saturating_add_clamps() {
        assert_eq!(u8::MAX.saturating_add_val(1), u8::MAX);
        assert_eq!(u16::MAX.saturating_add_val(7), u16::MAX);
        assert_eq!(u32::MAX.saturating_add_val(1), u32::MAX);
        assert_eq!(u64::MAX.saturating_add_val(1), u64::MAX);
        assert_eq!(usize::MAX.saturating_add_val(1), usize::MAX);
    }

    #[test]
    fn test_saturating_add_regular() {
        assert_eq!(3u64.saturating_add_val(4), 7);
        assert_eq!(0usize.saturating_add_val(0), 0);
    }
}
