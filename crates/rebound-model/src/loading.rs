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

//! Puzzle instance loader.
//!
//! This module turns whitespace-delimited text streams into a `Board` and a
//! `Puzzle`. The format lists the board size, the robots, the goal and then
//! the interior walls:
//!
//! ```raw
//! W H                 # board width and height
//! R                   # number of robots (1 to 5)
//! c_0 ... c_{R-1}     # robot cells
//! g t                 # goal cell and goal robot index, or '*' for any robot
//! K                   # number of interior walls
//! c d                 # K times: wall on side d (N, E, S or W) of cell c
//! ```
//!
//! The goal line may instead be the single token `none`. Lines may contain
//! comments introduced by `#`. Outer walls are implicit.
//!
//! The parser accepts any `BufRead`, file path, raw reader, or string slice.

use crate::{
    board::{Board, BoardBuilder},
    direction::Direction,
    index::{CellIndex, RobotIndex},
    puzzle::{Goal, GoalRobot, Puzzle, PuzzleError, MAX_ROBOTS},
};
use std::{
    fmt::Display,
    fs::File,
    io::{BufRead, BufReader, Read},
    path::Path,
    str::FromStr,
};

/// The error type for the puzzle loading process.
#[derive(Debug)]
pub enum PuzzleLoaderError {
    /// An I/O error occurred while reading the input stream.
    Io(std::io::Error),
    /// The input stream ended unexpectedly (e.g., missing tokens).
    UnexpectedEof,
    /// A token could not be parsed into the expected type.
    Parse(ParseTokenError),
    /// The board dimensions are invalid (must be > 0).
    InvalidDimensions,
    /// The robot count is outside `1..=5`.
    InvalidRobotCount(usize),
    /// A wall was placed on a cell outside the board.
    WallOutOfBounds(CellIndex),
    /// The loaded puzzle does not fit the loaded board.
    Puzzle(PuzzleError),
}

/// Details about a failed token parsing attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTokenError {
    /// The string token that failed to parse.
    pub token: String,
    /// The name of the type we tried to parse into.
    pub type_name: &'static str,
}

impl std::fmt::Display for ParseTokenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Could not parse token '{}' as type {}",
            self.token, self.type_name
        )
    }
}

impl std::error::Error for ParseTokenError {}

impl Display for PuzzleLoaderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::UnexpectedEof => write!(f, "Unexpected end of file while parsing puzzle"),
            Self::Parse(e) => write!(f, "Parse error: {}", e),
            Self::InvalidDimensions => {
                write!(f, "Board dimensions (W and H) must be positive integers")
            }
            Self::InvalidRobotCount(n) => {
                write!(f, "Robot count {} is outside 1..={}", n, MAX_ROBOTS)
            }
            Self::WallOutOfBounds(cell) => {
                write!(f, "Wall at cell {} lies outside the board", cell.get())
            }
            Self::Puzzle(e) => write!(f, "Invalid puzzle: {}", e),
        }
    }
}

impl std::error::Error for PuzzleLoaderError {}

impl From<std::io::Error> for PuzzleLoaderError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<ParseTokenError> for PuzzleLoaderError {
    fn from(e: ParseTokenError) -> Self {
        Self::Parse(e)
    }
}

impl From<PuzzleError> for PuzzleLoaderError {
    fn from(e: PuzzleError) -> Self {
        Self::Puzzle(e)
    }
}

/// A configurable loader for puzzle instances.
///
/// # Configuration
/// * `labels`: Robot labels assigned to the loaded board.
/// * `validate`: If true (default), the puzzle is checked against the board
///   and violations are returned as `PuzzleLoaderError::Puzzle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PuzzleLoader {
    labels: Option<[char; MAX_ROBOTS]>,
    validate: bool,
}

impl Default for PuzzleLoader {
    fn default() -> Self {
        Self {
            labels: None,
            validate: true,
        }
    }
}

impl PuzzleLoader {
    /// Creates a new `PuzzleLoader` with default settings.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the robot labels of loaded boards.
    #[inline]
    pub fn labels(mut self, labels: [char; MAX_ROBOTS]) -> Self {
        self.labels = Some(labels);
        self
    }

    /// Configures whether loaded puzzles are validated against their board.
    #[inline]
    pub fn validate(mut self, yes: bool) -> Self {
        self.validate = yes;
        self
    }

    /// Loads a board and puzzle from a type implementing `BufRead`.
    pub fn from_bufread<R: BufRead>(&self, rdr: R) -> Result<(Board, Puzzle), PuzzleLoaderError> {
        let mut sc = Scanner::new(rdr);

        let width: usize = sc.next()?;
        let height: usize = sc.next()?;
        if width == 0 || height == 0 {
            return Err(PuzzleLoaderError::InvalidDimensions);
        }
        let num_cells = width
            .checked_mul(height)
            .ok_or(PuzzleLoaderError::InvalidDimensions)?;

        let num_robots: usize = sc.next()?;
        if num_robots == 0 || num_robots > MAX_ROBOTS {
            return Err(PuzzleLoaderError::InvalidRobotCount(num_robots));
        }
        let mut robots = Vec::with_capacity(num_robots);
        for _ in 0..num_robots {
            robots.push(CellIndex::new(sc.next()?));
        }

        let goal = {
            let first: String = sc.next()?;
            if first == "none" {
                None
            } else {
                let cell = CellIndex::new(parse_token::<usize>(&first)?);
                let who: String = sc.next()?;
                let robot = if who == "*" {
                    GoalRobot::Any
                } else {
                    GoalRobot::Robot(RobotIndex::new(parse_token::<usize>(&who)?))
                };
                Some(Goal::new(cell, robot))
            }
        };

        let mut builder = BoardBuilder::new(width, height);
        if let Some(labels) = self.labels {
            builder.with_labels(labels);
        }

        let num_walls: usize = sc.next()?;
        for _ in 0..num_walls {
            let cell = CellIndex::new(sc.next()?);
            let direction: Direction = sc.next()?;
            if cell.get() >= num_cells {
                return Err(PuzzleLoaderError::WallOutOfBounds(cell));
            }
            builder.add_wall(cell, direction);
        }

        let board = builder.build();
        let puzzle = Puzzle::new(robots, goal);
        if self.validate {
            puzzle.validate(&board)?;
        }

        Ok((board, puzzle))
    }

    /// Loads a board and puzzle from a file path.
    #[inline]
    pub fn from_path<P: AsRef<Path>>(&self, path: P) -> Result<(Board, Puzzle), PuzzleLoaderError> {
        let file = File::open(path)?;
        self.from_bufread(BufReader::new(file))
    }

    /// Loads a board and puzzle from a generic reader.
    #[inline]
    pub fn from_reader<R: Read>(&self, r: R) -> Result<(Board, Puzzle), PuzzleLoaderError> {
        self.from_bufread(BufReader::new(r))
    }

    /// Loads a board and puzzle from a string slice.
    #[inline]
    pub fn from_str(&self, s: &str) -> Result<(Board, Puzzle), PuzzleLoaderError> {
        self.from_reader(s.as_bytes())
    }
}

fn parse_token<T: FromStr>(token: &str) -> Result<T, ParseTokenError> {
    token.parse::<T>().map_err(|_| ParseTokenError {
        token: token.to_owned(),
        type_name: std::any::type_name::<T>(),
    })
}

/// A helper to read whitespace-delimited tokens from a generic reader.
struct Scanner<R> {
    rdr: R,
    buf: String,
    pos: usize,
}

impl<R: BufRead> Scanner<R> {
    #[inline]
    fn new(rdr: R) -> Self {
        Self {
            rdr,
            buf: String::new(),
            pos: 0,
        }
    }

    /// Refills the line buffer. Returns `Ok(false)` on EOF.
    #[inline]
    fn fill_line(&mut self) -> Result<bool, PuzzleLoaderError> {
        self.buf.clear();
        self.pos = 0;
        let n = self.rdr.read_line(&mut self.buf)?;
        Ok(n > 0)
    }

    /// Reads the next token and parses it into `T`, skipping whitespace and
    /// `#` comments.
    fn next<T>(&mut self) -> Result<T, PuzzleLoaderError>
    where
        T: FromStr,
    {
        loop {
            if self.pos >= self.buf.len() && !self.fill_line()? {
                return Err(PuzzleLoaderError::UnexpectedEof);
            }

            let rest = &self.buf[self.pos..];
            let content = match rest.find('#') {
                Some(i) => &rest[..i],
                None => rest,
            };

            let start = match content.find(|c: char| !c.is_whitespace()) {
                Some(i) => i,
                None => {
                    self.pos = self.buf.len();
                    continue;
                }
            };
            let token_len = content[start..]
                .find(char::is_whitespace)
                .unwrap_or(content.len() - start);

            let token_start = self.pos + start;
            let token_end = token_start + token_len;
            self.pos = token_end;

            return Ok(parse_token(&self.buf[token_start..token_end])?);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL_PUZZLE: &str = r#"
        4 4        # board
        2          # robots
        0 15
        12 1       # robot 1 must reach cell 12
        2
        5 E        # wall between 5 and 6
        9 N
    "#;

    #[test]
    fn test_loads_board_and_puzzle() {
        let (board, puzzle) = PuzzleLoader::new().from_str(SMALL_PUZZLE).expect("Failed to load");

        assert_eq!(board.width(), 4);
        assert_eq!(board.height(), 4);
        assert!(board.has_wall(CellIndex::new(5), Direction::East));
        assert!(board.has_wall(CellIndex::new(6), Direction::West));
        assert!(board.has_wall(CellIndex::new(5), Direction::South));

        assert_eq!(puzzle.robots(), &[CellIndex::new(0), CellIndex::new(15)]);
        let goal = puzzle.goal().expect("goal");
        assert_eq!(goal.cell(), CellIndex::new(12));
        assert_eq!(goal.robot(), GoalRobot::Robot(RobotIndex::new(1)));
    }

    #[test]
    fn test_wildcard_and_missing_goal() {
        let (_, wildcard) = PuzzleLoader::new().from_str("3 3 1 4 8 * 0").expect("load");
        assert!(wildcard.goal().map_or(false, |g| g.is_wildcard()));

        let (_, open) = PuzzleLoader::new().from_str("3 3 1 4 none 0").expect("load");
        assert!(open.goal().is_none());
    }

    #[test]
    fn test_labels_are_applied() {
        let loader = PuzzleLoader::new().labels(['A', 'B', 'C', 'D', 'E']);
        let (board, _) = loader.from_str("2 2 1 0 none 0").expect("load");
        assert_eq!(board.label(RobotIndex::new(0)), 'A');
    }

    #[test]
    fn test_parse_error_structure() {
        match PuzzleLoader::new().from_str("4 4 1 garbage") {
            Err(PuzzleLoaderError::Parse(e)) => {
                assert_eq!(e.token, "garbage");
                assert!(e.type_name.contains("usize"));
            }
            other => panic!("Expected Parse error, got {:?}", other),
        }

        match PuzzleLoader::new().from_str("4 4 1 0 none 1 3 Q") {
            Err(PuzzleLoaderError::Parse(e)) => assert_eq!(e.token, "Q"),
            other => panic!("Expected Parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_structural_errors() {
        assert!(matches!(
            PuzzleLoader::new().from_str("0 4 1 0 none 0"),
            Err(PuzzleLoaderError::InvalidDimensions)
        ));
        assert!(matches!(
            PuzzleLoader::new().from_str("4 4 6"),
            Err(PuzzleLoaderError::InvalidRobotCount(6))
        ));
        assert!(matches!(
            PuzzleLoader::new().from_str("4 4 1 0 none 1 16 N"),
            Err(PuzzleLoaderError::WallOutOfBounds(_))
        ));
        assert!(matches!(
            PuzzleLoader::new().from_str("4 4 2 3"),
            Err(PuzzleLoaderError::UnexpectedEof)
        ));
    }

    #[test]
    fn test_validation_can_be_disabled() {
        let overlapping = "4 4 2 3 3 none 0";
        assert!(matches!(
            PuzzleLoader::new().from_str(overlapping),
            Err(PuzzleLoaderError::Puzzle(PuzzleError::RobotsOverlap { .. }))
        ));
        assert!(PuzzleLoader::new().validate(false).from_str(overlapping).is_ok());
    }
}
