//! The public index type: a position or the end sentinel.
//!
//! [`SentinelIndex`] wraps a structure-specific position type and adds a
//! unique [`SentinelIndex::End`] value that compares greater than every
//! position. Chains use it with [`ChainPosition`](crate::ChainPosition);
//! interpose sequences use it with their own position algebras.

use std::fmt;

/// A position inside a collection, or the end sentinel.
///
/// The ordering is derived from the variant order, so every
/// [`Position`](Self::Position) compares less than [`End`](Self::End) and
/// positions compare by their own ordering.
///
/// # Examples
///
/// ```rust
/// use chainweave::SentinelIndex;
///
/// let first: SentinelIndex<u32> = SentinelIndex::Position(7);
/// let end: SentinelIndex<u32> = SentinelIndex::End;
/// assert!(first < end);
/// assert_eq!(first.position(), Some(&7));
/// assert!(end.is_end());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SentinelIndex<P> {
    /// An element position.
    Position(P),
    /// One past the last element.
    End,
}

impl<P> SentinelIndex<P> {
    /// Returns `true` if this is the end sentinel.
    #[inline]
    pub const fn is_end(&self) -> bool {
        matches!(self, Self::End)
    }

    /// Returns the wrapped position, or `None` for the end sentinel.
    #[inline]
    pub const fn position(&self) -> Option<&P> {
        match self {
            Self::Position(position) => Some(position),
            Self::End => None,
        }
    }

    /// Consumes the index and returns the wrapped position, if any.
    #[inline]
    pub fn into_position(self) -> Option<P> {
        match self {
            Self::Position(position) => Some(position),
            Self::End => None,
        }
    }

    /// Maps the wrapped position, leaving the end sentinel untouched.
    #[inline]
    pub fn map<Q, F>(self, function: F) -> SentinelIndex<Q>
    where
        F: FnOnce(P) -> Q,
    {
        match self {
            Self::Position(position) => SentinelIndex::Position(function(position)),
            Self::End => SentinelIndex::End,
        }
    }

    /// Returns the wrapped position.
    ///
    /// # Panics
    ///
    /// Panics with a message naming `operation` if this is the end sentinel.
    #[inline]
    #[track_caller]
    pub(crate) fn expect_position(&self, operation: &str) -> &P {
        match self {
            Self::Position(position) => position,
            Self::End => panic!("cannot {operation} the end index"),
        }
    }
}

impl<P> From<P> for SentinelIndex<P> {
    #[inline]
    fn from(position: P) -> Self {
        Self::Position(position)
    }
}

impl<P: fmt::Display> fmt::Display for SentinelIndex<P> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Position(position) => write!(formatter, "{position}"),
            Self::End => write!(formatter, "end"),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
