//! Linearization: the bijection between positions and flattened offsets.
//!
//! Every structure in this crate locates elements with a structural
//! position (a branch tag plus a native index, an element or a gap, ...).
//! [`Linearization`] maps those positions onto `0..count` and back, and the
//! helpers in this module derive offset and distance arithmetic for
//! [`SentinelIndex`] values from that mapping, so chains and interpose
//! sequences share one implementation of `index_offset_by`,
//! `index_offset_by_limited` and `distance`.
//!
//! # Examples
//!
//! ```rust
//! use chainweave::prelude::*;
//!
//! let chain = chain![vec![10, 20], vec![30]];
//! let position = chain.position_for_linear(2);
//! assert_eq!(position.branch(), 1);
//! assert_eq!(chain[SentinelIndex::Position(position.clone())], 30);
//! assert_eq!(chain.linear_position(&position), 2);
//! ```

use crate::index::SentinelIndex;

/// A bijection between structural positions and 0-based flattened offsets.
///
/// For every `offset < linear_count()`,
/// `linear_position(&position_for_linear(offset)) == offset`, and for every
/// valid position `p`, `position_for_linear(linear_position(&p)) == p`.
pub trait Linearization {
    /// The structural position type being linearized.
    type Position;

    /// Returns the number of positions, i.e. the size of the offset domain.
    fn linear_count(&self) -> usize;

    /// Returns the flattened offset of `position`.
    fn linear_position(&self, position: &Self::Position) -> usize;

    /// Returns the position at the flattened `offset`.
    ///
    /// # Panics
    ///
    /// Panics if `offset >= self.linear_count()`.
    fn position_for_linear(&self, offset: usize) -> Self::Position;
}

/// Converts an offset to a signed distance.
#[allow(clippy::cast_possible_wrap)]
#[inline]
pub(crate) const fn to_signed(value: usize) -> isize {
    value as isize
}

/// Moves `offset` by `distance`, staying within `0..=count`.
///
/// # Panics
///
/// Panics if the target leaves `0..=count`.
#[track_caller]
pub(crate) fn offset_linear(offset: usize, distance: isize, count: usize) -> usize {
    match offset.checked_add_signed(distance) {
        Some(target) if target <= count => target,
        _ => panic!(
            "offset {distance} from linear position {offset} leaves the valid range 0..={count}"
        ),
    }
}

/// Moves `offset` by `distance` unless the move would cross `limit`.
///
/// Reaching `limit` exactly is allowed. A limit lying behind `offset` in
/// the direction of travel has no effect.
///
/// # Panics
///
/// Panics if the move does not cross `limit` but still leaves `0..=count`.
#[track_caller]
pub(crate) fn offset_linear_limited(
    offset: usize,
    distance: isize,
    limit: usize,
    count: usize,
) -> Option<usize> {
    let start = to_signed(offset);
    let limit = to_signed(limit);
    let target = start.saturating_add(distance);
    let crosses_limit = if distance >= 0 {
        limit >= start && target > limit
    } else {
        limit <= start && target < limit
    };
    if crosses_limit {
        None
    } else {
        Some(offset_linear(offset, distance, count))
    }
}

/// Returns the flattened offset of `index`; the end sentinel maps to the count.
pub(crate) fn linear_index<L: Linearization>(
    linearization: &L,
    index: &SentinelIndex<L::Position>,
) -> usize {
    match index {
        SentinelIndex::Position(position) => linearization.linear_position(position),
        SentinelIndex::End => linearization.linear_count(),
    }
}

/// Returns the index at the flattened `offset`, which may equal the count.
pub(crate) fn index_for_linear<L: Linearization>(
    linearization: &L,
    offset: usize,
) -> SentinelIndex<L::Position> {
    if offset == linearization.linear_count() {
        SentinelIndex::End
    } else {
        SentinelIndex::Position(linearization.position_for_linear(offset))
    }
}

#[track_caller]
pub(crate) fn offset_index<L: Linearization>(
    linearization: &L,
    index: &SentinelIndex<L::Position>,
    distance: isize,
) -> SentinelIndex<L::Position> {
    let target = offset_linear(
        linear_index(linearization, index),
        distance,
        linearization.linear_count(),
    );
    index_for_linear(linearization, target)
}

#[track_caller]
pub(crate) fn offset_index_limited<L: Linearization>(
    linearization: &L,
    index: &SentinelIndex<L::Position>,
    distance: isize,
    limit: &SentinelIndex<L::Position>,
) -> Option<SentinelIndex<L::Position>> {
    offset_linear_limited(
        linear_index(linearization, index),
        distance,
        linear_index(linearization, limit),
        linearization.linear_count(),
    )
    .map(|target| index_for_linear(linearization, target))
}

pub(crate) fn index_distance<L: Linearization>(
    linearization: &L,
    from: &SentinelIndex<L::Position>,
    to: &SentinelIndex<L::Position>,
) -> isize {
    to_signed(linear_index(linearization, to)) - to_signed(linear_index(linearization, from))
}

// =============================================================================
// Tests
// =============================================================================
