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

//! Cardinal slide directions.
//!
//! Each direction owns one bit of a cell's wall mask (`N=1, E=2, S=4, W=8`)
//! and one of the two movement axes.

/// One of the four directions a robot can slide in.
#[repr(u8)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Direction {
    North = 0,
    East = 1,
    South = 2,
    West = 3,
}

/// Axis flag for horizontal movement (`East`/`West`).
pub const AXIS_HORIZONTAL: u8 = 0b01;

/// Axis flag for vertical movement (`North`/`South`).
pub const AXIS_VERTICAL: u8 = 0b10;

/// Both axis flags.
pub const AXIS_BOTH: u8 = AXIS_HORIZONTAL | AXIS_VERTICAL;

impl Direction {
    /// All directions in wall-bit order.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Returns the direction's position in `Direction::ALL`.
    #[inline(always)]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns the direction for an index in `0..4`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= 4`.
    #[inline]
    pub const fn from_index(index: usize) -> Self {
        assert!(
            index < 4,
            "called `Direction::from_index` with an index outside 0..4"
        );
        Self::ALL[index]
    }

    /// Returns this direction's bit in a cell wall mask.
    #[inline(always)]
    pub const fn wall_bit(self) -> u8 {
        1 << (self as u8)
    }

    /// Returns the reverse direction.
    #[inline(always)]
    pub const fn opposite(self) -> Self {
        Self::ALL[(self as usize + 2) & 3]
    }

    /// Returns `true` for `East` and `West`.
    #[inline(always)]
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Direction::East | Direction::West)
    }

    /// Returns `AXIS_HORIZONTAL` or `AXIS_VERTICAL`.
    #[inline(always)]
    pub const fn axis_flag(self) -> u8 {
        if self.is_horizontal() {
            AXIS_HORIZONTAL
        } else {
            AXIS_VERTICAL
        }
    }

    /// Returns the single-letter name used by the text format.
    #[inline]
    pub const fn as_char(self) -> char {
        match self {
            Direction::North => 'N',
            Direction::East => 'E',
            Direction::South => 'S',
            Direction::West => 'W',
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// The error returned when a token does not name a direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDirectionError {
    pub token: String,
}

impl std::fmt::Display for ParseDirectionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "'{}' is not a direction (expected N, E, S or W)", self.token)
    }
}

impl std::error::Error for ParseDirectionError {}

impl std::str::FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "N" | "n" => Ok(Direction::North),
            "E" | "e" => Ok(Direction::East),
            "S" | "s" => Ok(Direction::South),
            "W" | "w" => Ok(Direction::West),
            _ => Err(ParseDirectionError {
                token: s.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposites() {
        assert_eq!(Direction::North.opposite(), Direction::South);
        assert_eq!(Direction::East.opposite(), Direction::West);
        assert_eq!(Direction::South.opposite(), Direction::North);
        assert_eq!(Direction::West.opposite(), Direction::East);
    }

    #[test]
    fn test_wall_bits_are_distinct() {
        let mask = Direction::ALL.iter().fold(0u8, |m, d| m | d.wall_bit());
        assert_eq!(mask, 0b1111);
        assert_eq!(Direction::South.wall_bit(), 4);
    }

    #[test]
    fn test_axes() {
        assert_eq!(Direction::North.axis_flag(), AXIS_VERTICAL);
        assert_eq!(Direction::West.axis_flag(), AXIS_HORIZONTAL);
        assert!(Direction::East.is_horizontal());
        assert!(!Direction::South.is_horizontal());
    }

    #[test]
    fn test_index_round_trip() {
        for d in Direction::ALL {
            assert_eq!(Direction::from_index(d.index()), d);
        }
    }

    #[test]
    #[should_panic(expected = "called `Direction::from_index` with an index outside 0..4")]
    fn test_from_index_out_of_range() {
        let _ = Direction::from_index(4);
    }

    #[test]
    fn test_parse() {
        assert_eq!("N".parse::<Direction>(), Ok(Direction::North));
        assert_eq!("w".parse::<Direction>(), Ok(Direction::West));
        assert!("X".parse::<Direction>().is_err());
    }
}
