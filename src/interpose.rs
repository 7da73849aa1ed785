//! Interpose and endcap-interpose sequences.
//!
//! [`InterposeSequence`] walks a base collection and places a synthetic
//! interposition between every pair of adjacent elements:
//!
//! ```text
//! base:       a       b       c
//! sequence:   a  (a,b)  b  (b,c)  c
//! ```
//!
//! [`EndcapInterposeSequence`] additionally brackets the sequence with an
//! intro before the first element and an outro after the last one. Both
//! reuse the position and linearization scheme of [`Chain`](crate::Chain):
//! the element at base offset `d` sits at linear offset `2d` (plus one when
//! bracketed) and the interposition after it at `2d + 1`.
//!
//! # Examples
//!
//! ```rust
//! use chainweave::prelude::*;
//!
//! let words = vec!["red", "green", "blue"];
//! let sequence = words.interposed();
//! let rendered: String = sequence
//!     .iter()
//!     .map(|item| match item {
//!         Interposed::Element(word) => (*word).to_string(),
//!         Interposed::Interposition { .. } => ", ".to_string(),
//!     })
//!     .collect();
//! assert_eq!(rendered, "red, green, blue");
//!
//! let bracketed = vec![1].endcap_interposed();
//! assert_eq!(bracketed.len(), 3);
//! ```

use std::cmp::Ordering;
use std::iter::FusedIterator;

use crate::collection::{BidirectionalCollection, Collection};
use crate::index::SentinelIndex;
use crate::linear::{self, Linearization, to_signed};

// =============================================================================
// Positions
// =============================================================================

/// A position inside an [`InterposeSequence`].
///
/// `Element(i)` precedes `Interposition(i, j)`, which precedes `Element(j)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InterposePosition<I> {
    /// The base element at the given base index.
    Element(I),
    /// The gap between the base elements at the two given base indices.
    Interposition(I, I),
}

impl<I: Ord> InterposePosition<I> {
    fn sort_key(&self) -> (&I, u8, Option<&I>) {
        match self {
            Self::Element(index) => (index, 0, None),
            Self::Interposition(previous, next) => (previous, 1, Some(next)),
        }
    }
}

impl<I: Ord> Ord for InterposePosition<I> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl<I: Ord> PartialOrd for InterposePosition<I> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// The index of an [`InterposeSequence`].
pub type InterposeIndex<I> = SentinelIndex<InterposePosition<I>>;

/// A position inside an [`EndcapInterposeSequence`].
///
/// The variant order gives the sequence order: the intro, then every inner
/// position, then the outro.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EndcapPosition<I: Ord> {
    /// The synthetic element before the first base element.
    Intro,
    /// An element or interposition of the wrapped interpose sequence.
    Inner(InterposePosition<I>),
    /// The synthetic element after the last base element.
    Outro,
}

/// The index of an [`EndcapInterposeSequence`].
pub type EndcapIndex<I> = SentinelIndex<EndcapPosition<I>>;

// =============================================================================
// Element Views
// =============================================================================

/// An item of an [`InterposeSequence`].
#[derive(Debug, PartialEq, Eq, Hash)]
pub enum Interposed<'a, E> {
    /// A base element.
    Element(&'a E),
    /// The gap between two adjacent base elements.
    Interposition {
        /// The base element before the gap.
        previous: &'a E,
        /// The base element after the gap.
        next: &'a E,
    },
}

impl<'a, E> Interposed<'a, E> {
    /// Returns the base element, or `None` for an interposition.
    #[inline]
    pub const fn element(self) -> Option<&'a E> {
        match self {
            Self::Element(element) => Some(element),
            Self::Interposition { .. } => None,
        }
    }

    /// Returns `true` for an interposition.
    #[inline]
    pub const fn is_interposition(&self) -> bool {
        matches!(self, Self::Interposition { .. })
    }
}

impl<E> Clone for Interposed<'_, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for Interposed<'_, E> {}

/// An item of an [`EndcapInterposeSequence`].
#[derive(Debug, PartialEq, Eq, Hash)]
pub enum Endcapped<'a, E> {
    /// The synthetic element before the first base element.
    Intro,
    /// A base element.
    Element(&'a E),
    /// The gap between two adjacent base elements.
    Interposition {
        /// The base element before the gap.
        previous: &'a E,
        /// The base element after the gap.
        next: &'a E,
    },
    /// The synthetic element after the last base element.
    Outro,
}

impl<'a, E> Endcapped<'a, E> {
    /// Returns the base element, or `None` for any synthetic element.
    #[inline]
    pub const fn element(self) -> Option<&'a E> {
        match self {
            Self::Element(element) => Some(element),
            _ => None,
        }
    }
}

impl<E> Clone for Endcapped<'_, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for Endcapped<'_, E> {}

impl<'a, E> From<Interposed<'a, E>> for Endcapped<'a, E> {
    fn from(item: Interposed<'a, E>) -> Self {
        match item {
            Interposed::Element(element) => Self::Element(element),
            Interposed::Interposition { previous, next } => Self::Interposition { previous, next },
        }
    }
}

// =============================================================================
// InterposeSequence
// =============================================================================

/// A base collection with an interposition between adjacent elements.
///
/// A base of `n` elements yields `max(0, 2n - 1)` items.
///
/// # Examples
///
/// ```rust
/// use chainweave::prelude::*;
///
/// let sequence = InterposeSequence::new(vec!['a', 'b', 'c']);
/// assert_eq!(sequence.len(), 5);
///
/// let gap = SentinelIndex::Position(sequence.position_for_linear(1));
/// assert_eq!(
///     sequence.element(&gap),
///     Interposed::Interposition { previous: &'a', next: &'b' }
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InterposeSequence<B> {
    base: B,
}

impl<B: Collection> InterposeSequence<B> {
    /// Wraps `base`.
    #[inline]
    pub const fn new(base: B) -> Self {
        Self { base }
    }

    /// Returns the base collection.
    #[inline]
    pub const fn base(&self) -> &B {
        &self.base
    }

    /// Consumes the sequence and returns the base collection.
    #[inline]
    pub fn into_base(self) -> B {
        self.base
    }

    /// Returns the number of items, elements and interpositions together.
    pub fn len(&self) -> usize {
        (2 * self.base.count()).saturating_sub(1)
    }

    /// Returns `true` if the base is empty.
    pub fn is_empty(&self) -> bool {
        self.base.is_empty()
    }

    /// Returns the index of the first item, or the end index if empty.
    pub fn start_index(&self) -> InterposeIndex<B::Index> {
        if self.base.is_empty() {
            SentinelIndex::End
        } else {
            SentinelIndex::Position(InterposePosition::Element(self.base.start_index()))
        }
    }

    /// Returns the end index.
    #[inline]
    pub const fn end_index(&self) -> InterposeIndex<B::Index> {
        SentinelIndex::End
    }

    /// Returns the index after `index`, alternating between elements and
    /// interpositions.
    ///
    /// # Panics
    ///
    /// Panics if `index` is the end index.
    #[track_caller]
    pub fn index_after(&self, index: &InterposeIndex<B::Index>) -> InterposeIndex<B::Index> {
        self.position_after(index.expect_position("advance past"))
    }

    fn position_after(&self, position: &InterposePosition<B::Index>) -> InterposeIndex<B::Index> {
        match position {
            InterposePosition::Element(index) => {
                let next = self.base.index_after(index);
                if next == self.base.end_index() {
                    SentinelIndex::End
                } else {
                    SentinelIndex::Position(InterposePosition::Interposition(index.clone(), next))
                }
            }
            InterposePosition::Interposition(_, next) => {
                SentinelIndex::Position(InterposePosition::Element(next.clone()))
            }
        }
    }

    /// Returns the item at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is the end index.
    #[track_caller]
    pub fn element(&self, index: &InterposeIndex<B::Index>) -> Interposed<'_, B::Element> {
        self.element_at(index.expect_position("read through"))
    }

    /// Returns the item at `index`, or `None` for the end index.
    pub fn get(&self, index: &InterposeIndex<B::Index>) -> Option<Interposed<'_, B::Element>> {
        index.position().map(|position| self.element_at(position))
    }

    fn element_at(&self, position: &InterposePosition<B::Index>) -> Interposed<'_, B::Element> {
        match position {
            InterposePosition::Element(index) => Interposed::Element(self.base.element(index)),
            InterposePosition::Interposition(previous, next) => Interposed::Interposition {
                previous: self.base.element(previous),
                next: self.base.element(next),
            },
        }
    }

    /// Returns the index `distance` items away from `index`.
    ///
    /// # Panics
    ///
    /// Panics if the result would leave `start_index()..=end_index()`.
    #[track_caller]
    pub fn index_offset_by(
        &self,
        index: &InterposeIndex<B::Index>,
        distance: isize,
    ) -> InterposeIndex<B::Index> {
        linear::offset_index(self, index, distance)
    }

    /// Returns the index `distance` items away from `index`, or `None` if
    /// the move would pass `limit`.
    #[track_caller]
    pub fn index_offset_by_limited(
        &self,
        index: &InterposeIndex<B::Index>,
        distance: isize,
        limit: &InterposeIndex<B::Index>,
    ) -> Option<InterposeIndex<B::Index>> {
        linear::offset_index_limited(self, index, distance, limit)
    }

    /// Returns the signed number of items from `from` to `to`.
    pub fn distance(
        &self,
        from: &InterposeIndex<B::Index>,
        to: &InterposeIndex<B::Index>,
    ) -> isize {
        linear::index_distance(self, from, to)
    }

    /// Returns an iterator over the items.
    pub fn iter(&self) -> InterposeIter<'_, B> {
        InterposeIter {
            sequence: self,
            front: self.start_index(),
            back: SentinelIndex::End,
            remaining: self.len(),
        }
    }

    fn base_offset(&self, index: &B::Index) -> usize {
        self.base
            .distance(&self.base.start_index(), index)
            .unsigned_abs()
    }
}

impl<B: BidirectionalCollection> InterposeSequence<B> {
    /// Returns the index before `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is the start index.
    #[track_caller]
    pub fn index_before(&self, index: &InterposeIndex<B::Index>) -> InterposeIndex<B::Index> {
        match index {
            SentinelIndex::End => {
                assert!(
                    !self.base.is_empty(),
                    "cannot retreat before the start index of an empty sequence"
                );
                let last = self.base.index_before(&self.base.end_index());
                SentinelIndex::Position(InterposePosition::Element(last))
            }
            SentinelIndex::Position(InterposePosition::Element(index)) => {
                assert!(
                    *index != self.base.start_index(),
                    "cannot retreat before the start index"
                );
                let previous = self.base.index_before(index);
                SentinelIndex::Position(InterposePosition::Interposition(previous, index.clone()))
            }
            SentinelIndex::Position(InterposePosition::Interposition(previous, _)) => {
                SentinelIndex::Position(InterposePosition::Element(previous.clone()))
            }
        }
    }
}

impl<B: Collection> Linearization for InterposeSequence<B> {
    type Position = InterposePosition<B::Index>;

    fn linear_count(&self) -> usize {
        self.len()
    }

    fn linear_position(&self, position: &Self::Position) -> usize {
        match position {
            InterposePosition::Element(index) => 2 * self.base_offset(index),
            InterposePosition::Interposition(previous, _) => 2 * self.base_offset(previous) + 1,
        }
    }

    #[track_caller]
    fn position_for_linear(&self, offset: usize) -> Self::Position {
        let count = self.len();
        assert!(
            offset < count,
            "linear offset {offset} is out of range for a sequence of {count} items"
        );
        let index = self
            .base
            .index_offset_by(&self.base.start_index(), to_signed(offset / 2));
        if offset.is_multiple_of(2) {
            InterposePosition::Element(index)
        } else {
            let next = self.base.index_after(&index);
            InterposePosition::Interposition(index, next)
        }
    }
}

impl<'a, B: Collection> IntoIterator for &'a InterposeSequence<B> {
    type Item = Interposed<'a, B::Element>;
    type IntoIter = InterposeIter<'a, B>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An iterator over the items of an [`InterposeSequence`].
pub struct InterposeIter<'a, B: Collection> {
    sequence: &'a InterposeSequence<B>,
    front: InterposeIndex<B::Index>,
    back: InterposeIndex<B::Index>,
    remaining: usize,
}

impl<'a, B: Collection> Iterator for InterposeIter<'a, B> {
    type Item = Interposed<'a, B::Element>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let item = self.sequence.element(&self.front);
        self.remaining -= 1;
        if self.remaining > 0 {
            self.front = self.sequence.index_after(&self.front);
        }
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<B: BidirectionalCollection> DoubleEndedIterator for InterposeIter<'_, B> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.back = self.sequence.index_before(&self.back);
        self.remaining -= 1;
        Some(self.sequence.element(&self.back))
    }
}

impl<B: Collection> ExactSizeIterator for InterposeIter<'_, B> {}

impl<B: Collection> FusedIterator for InterposeIter<'_, B> {}

// =============================================================================
// EndcapInterposeSequence
// =============================================================================

/// An [`InterposeSequence`] bracketed by an intro and an outro.
///
/// A base of `n` elements yields `max(0, 2n - 1) + 2` items; an empty base
/// yields just the intro and the outro.
///
/// # Examples
///
/// ```rust
/// use chainweave::prelude::*;
///
/// let sequence = EndcapInterposeSequence::new(vec!['x']);
/// let items: Vec<_> = sequence.iter().collect();
/// assert_eq!(items, vec![Endcapped::Intro, Endcapped::Element(&'x'), Endcapped::Outro]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EndcapInterposeSequence<B> {
    inner: InterposeSequence<B>,
}

impl<B: Collection> EndcapInterposeSequence<B> {
    /// Wraps `base`.
    #[inline]
    pub const fn new(base: B) -> Self {
        Self {
            inner: InterposeSequence::new(base),
        }
    }

    /// Returns the base collection.
    #[inline]
    pub const fn base(&self) -> &B {
        self.inner.base()
    }

    /// Returns the interpose sequence between the endcaps.
    #[inline]
    pub const fn interpose(&self) -> &InterposeSequence<B> {
        &self.inner
    }

    /// Consumes the sequence and returns the base collection.
    #[inline]
    pub fn into_base(self) -> B {
        self.inner.into_base()
    }

    /// Returns the number of items, endcaps included.
    pub fn len(&self) -> usize {
        self.inner.len() + 2
    }

    /// Always `false`: the intro and outro are present even for an empty base.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Returns the index of the intro.
    #[inline]
    pub const fn start_index(&self) -> EndcapIndex<B::Index> {
        SentinelIndex::Position(EndcapPosition::Intro)
    }

    /// Returns the end index.
    #[inline]
    pub const fn end_index(&self) -> EndcapIndex<B::Index> {
        SentinelIndex::End
    }

    /// Returns the index after `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is the end index.
    #[track_caller]
    pub fn index_after(&self, index: &EndcapIndex<B::Index>) -> EndcapIndex<B::Index> {
        match index.expect_position("advance past") {
            EndcapPosition::Intro => Self::enter_inner(self.inner.start_index()),
            EndcapPosition::Inner(position) => {
                Self::enter_inner(self.inner.position_after(position))
            }
            EndcapPosition::Outro => SentinelIndex::End,
        }
    }

    /// Maps an inner index, sending the inner end to the outro.
    fn enter_inner(index: InterposeIndex<B::Index>) -> EndcapIndex<B::Index> {
        SentinelIndex::Position(
            index
                .into_position()
                .map_or(EndcapPosition::Outro, EndcapPosition::Inner),
        )
    }

    /// Returns the item at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is the end index.
    #[track_caller]
    pub fn element(&self, index: &EndcapIndex<B::Index>) -> Endcapped<'_, B::Element> {
        self.element_at(index.expect_position("read through"))
    }

    /// Returns the item at `index`, or `None` for the end index.
    pub fn get(&self, index: &EndcapIndex<B::Index>) -> Option<Endcapped<'_, B::Element>> {
        index.position().map(|position| self.element_at(position))
    }

    fn element_at(&self, position: &EndcapPosition<B::Index>) -> Endcapped<'_, B::Element> {
        match position {
            EndcapPosition::Intro => Endcapped::Intro,
            EndcapPosition::Inner(position) => self.inner.element_at(position).into(),
            EndcapPosition::Outro => Endcapped::Outro,
        }
    }

    /// Returns the index `distance` items away from `index`.
    ///
    /// # Panics
    ///
    /// Panics if the result would leave `start_index()..=end_index()`.
    #[track_caller]
    pub fn index_offset_by(
        &self,
        index: &EndcapIndex<B::Index>,
        distance: isize,
    ) -> EndcapIndex<B::Index> {
        linear::offset_index(self, index, distance)
    }

    /// Returns the index `distance` items away from `index`, or `None` if
    /// the move would pass `limit`.
    #[track_caller]
    pub fn index_offset_by_limited(
        &self,
        index: &EndcapIndex<B::Index>,
        distance: isize,
        limit: &EndcapIndex<B::Index>,
    ) -> Option<EndcapIndex<B::Index>> {
        linear::offset_index_limited(self, index, distance, limit)
    }

    /// Returns the signed number of items from `from` to `to`.
    pub fn distance(&self, from: &EndcapIndex<B::Index>, to: &EndcapIndex<B::Index>) -> isize {
        linear::index_distance(self, from, to)
    }

    /// Returns an iterator over the items, endcaps included.
    pub fn iter(&self) -> EndcapInterposeIter<'_, B> {
        EndcapInterposeIter {
            sequence: self,
            front: self.start_index(),
            back: SentinelIndex::End,
            remaining: self.len(),
        }
    }
}

impl<B: BidirectionalCollection> EndcapInterposeSequence<B> {
    /// Returns the index before `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is the intro.
    #[track_caller]
    pub fn index_before(&self, index: &EndcapIndex<B::Index>) -> EndcapIndex<B::Index> {
        match index {
            SentinelIndex::End => SentinelIndex::Position(EndcapPosition::Outro),
            SentinelIndex::Position(EndcapPosition::Outro) => {
                if self.inner.is_empty() {
                    SentinelIndex::Position(EndcapPosition::Intro)
                } else {
                    self.inner
                        .index_before(&SentinelIndex::End)
                        .map(EndcapPosition::Inner)
                }
            }
            SentinelIndex::Position(EndcapPosition::Inner(position)) => match position {
                InterposePosition::Element(index) if *index == self.base().start_index() => {
                    SentinelIndex::Position(EndcapPosition::Intro)
                }
                _ => self
                    .inner
                    .index_before(&SentinelIndex::Position(position.clone()))
                    .map(EndcapPosition::Inner),
            },
            SentinelIndex::Position(EndcapPosition::Intro) => {
                panic!("cannot retreat before the start index")
            }
        }
    }
}

impl<B: Collection> Linearization for EndcapInterposeSequence<B> {
    type Position = EndcapPosition<B::Index>;

    fn linear_count(&self) -> usize {
        self.len()
    }

    fn linear_position(&self, position: &Self::Position) -> usize {
        match position {
            EndcapPosition::Intro => 0,
            EndcapPosition::Inner(position) => 1 + self.inner.linear_position(position),
            EndcapPosition::Outro => self.inner.len() + 1,
        }
    }

    #[track_caller]
    fn position_for_linear(&self, offset: usize) -> Self::Position {
        let count = self.len();
        assert!(
            offset < count,
            "linear offset {offset} is out of range for a sequence of {count} items"
        );
        if offset == 0 {
            EndcapPosition::Intro
        } else if offset == count - 1 {
            EndcapPosition::Outro
        } else {
            EndcapPosition::Inner(self.inner.position_for_linear(offset - 1))
        }
    }
}

impl<'a, B: Collection> IntoIterator for &'a EndcapInterposeSequence<B> {
    type Item = Endcapped<'a, B::Element>;
    type IntoIter = EndcapInterposeIter<'a, B>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An iterator over the items of an [`EndcapInterposeSequence`].
pub struct EndcapInterposeIter<'a, B: Collection> {
    sequence: &'a EndcapInterposeSequence<B>,
    front: EndcapIndex<B::Index>,
    back: EndcapIndex<B::Index>,
    remaining: usize,
}

impl<'a, B: Collection> Iterator for EndcapInterposeIter<'a, B> {
    type Item = Endcapped<'a, B::Element>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let item = self.sequence.element(&self.front);
        self.remaining -= 1;
        if self.remaining > 0 {
            self.front = self.sequence.index_after(&self.front);
        }
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<B: BidirectionalCollection> DoubleEndedIterator for EndcapInterposeIter<'_, B> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.back = self.sequence.index_before(&self.back);
        self.remaining -= 1;
        Some(self.sequence.element(&self.back))
    }
}

impl<B: Collection> ExactSizeIterator for EndcapInterposeIter<'_, B> {}

impl<B: Collection> FusedIterator for EndcapInterposeIter<'_, B> {}

// =============================================================================
// Tests
// =============================================================================
