use std::fmt;

use crate::index::SentinelIndex;

/// A branch tag paired with a native index inside that branch.
///
/// Positions are ordered branch-major: every position in branch `i`
/// precedes every position in branch `j` when `i < j`, and positions in the
/// same branch follow the branch's own index order.
///
/// # Examples
///
/// ```rust
/// use chainweave::ChainPosition;
///
/// assert!(ChainPosition::new(0, 99) < ChainPosition::new(1, 0));
/// assert!(ChainPosition::new(1, 2) < ChainPosition::new(1, 3));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChainPosition<I> {
    branch: usize,
    index: I,
}

impl<I> ChainPosition<I> {
    /// Creates a position naming `index` inside branch `branch`.
    #[inline]
    pub const fn new(branch: usize, index: I) -> Self {
        Self { branch, index }
    }

    /// Returns the branch tag.
    #[inline]
    pub const fn branch(&self) -> usize {
        self.branch
    }

    /// Returns the native index inside the branch.
    #[inline]
    pub const fn index(&self) -> &I {
        &self.index
    }

    /// Consumes the position and returns the native index.
    #[inline]
    pub fn into_index(self) -> I {
        self.index
    }
}

impl<I: fmt::Display> fmt::Display for ChainPosition<I> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}@{}", self.branch, self.index)
    }
}

/// The public index of a [`Chain`](super::Chain): a chain position or the
/// end sentinel.
pub type ChainIndex<I> = SentinelIndex<ChainPosition<I>>;
