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

/// Default hard maximum on the number of moves searched.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// How candidate solutions of the minimal move count are selected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum SolutionMode {
    /// Stop at the first solution found.
    Any,
    /// Prefer solutions that move as few distinct robots as possible.
    #[default]
    Minimum,
    /// Prefer solutions that move as many distinct robots as possible.
    Maximum,
}

impl std::fmt::Display for SolutionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolutionMode::Any => write!(f, "Any"),
            SolutionMode::Minimum => write!(f, "Minimum"),
            SolutionMode::Maximum => write!(f, "Maximum"),
        }
    }
}

/// Immutable configuration handed to a search strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SearchOptions {
    allow_rebounds: bool,
    max_depth: usize,
    first_solution_only: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            allow_rebounds: true,
            max_depth: DEFAULT_MAX_DEPTH,
            first_solution_only: false,
        }
    }
}

impl SearchOptions {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a robot may immediately slide back the way it came.
    #[inline]
    pub fn allow_rebounds(mut self, yes: bool) -> Self {
        self.allow_rebounds = yes;
        self
    }

    /// Sets the hard maximum move count.
    ///
    /// # Panics
    ///
    /// Panics if `depth` is zero or above 255.
    #[inline]
    pub fn max_depth(mut self, depth: usize) -> Self {
        assert!(
            (1..=u8::MAX as usize).contains(&depth),
            "called `SearchOptions::max_depth` with {}, expected 1 to 255",
            depth
        );
        self.max_depth = depth;
        self
    }

    /// Whether the strategy may stop at the first solution.
    #[inline]
    pub fn first_solution_only(mut self, yes: bool) -> Self {
        self.first_solution_only = yes;
        self
    }

    #[inline]
    pub fn rebounds_allowed(&self) -> bool {
        self.allow_rebounds
    }

    #[inline]
    pub fn depth_limit(&self) -> usize {
        self.max_depth
    }

    #[inline]
    pub fn is_first_solution_only(&self) -> bool {
        self.first_solution_only
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = SearchOptions::default();
        assert!(options.rebounds_allowed());
        assert_eq!(options.depth_limit(), DEFAULT_MAX_DEPTH);
        assert!(!options.is_first_solution_only());
        assert_eq!(SolutionMode::default(), SolutionMode::Minimum);
    }

    #[test]
    fn test_setters() {
        let options = SearchOptions::new()
            .allow_rebounds(false)
            .max_depth(12)
            .first_solution_only(true);
        assert!(!options.rebounds_allowed());
        assert_eq!(options.depth_limit(), 12);
        assert!(options.is_first_solution_only());
    }

    #[test]
    #[should_panic(expected = "called `SearchOptions::max_depth` with 0")]
    fn test_zero_depth_panics() {
        let _ = SearchOptions::new().max_depth(0);
    }
}
