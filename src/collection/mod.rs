//! The branch capability contract.
//!
//! A branch is any ordered collection with a comparable index type. The
//! contract comes in three tiers:
//!
//! - [`Collection`]: forward traversal with `index_after`
//! - [`BidirectionalCollection`]: adds `index_before`
//! - [`RandomAccessCollection`]: promises O(1) `index_offset_by` and `distance`
//!
//! A [`Chain`](crate::Chain) offers exactly the tier of its branch type, so
//! a chain of random-access branches is itself random access.
//!
//! # Examples
//!
//! ```rust
//! use chainweave::prelude::*;
//!
//! let values = vec![3, 1, 2];
//! assert_eq!(Collection::count(&values), 3);
//! assert_eq!(values.index_after(&0), 1);
//! assert_eq!(values.min_element(), Some(&1));
//! assert_eq!(values.elements().copied().collect::<Vec<_>>(), vec![3, 1, 2]);
//! ```

mod boxed;
mod slice;

pub use boxed::{BoxedBranch, BranchShare};

use std::iter::FusedIterator;

use crate::interpose::{EndcapInterposeSequence, InterposeSequence};

/// An ordered collection whose elements are addressed by comparable indices.
///
/// Indices run from [`start_index`](Self::start_index) up to, but not
/// including, [`end_index`](Self::end_index). The only required operations
/// are forward stepping and element access; everything else has a default
/// that walks with [`index_after`](Self::index_after). Random-access
/// implementations override the counting and offset operations.
pub trait Collection {
    /// The element type shared by every index.
    type Element;

    /// The index type. Indices of one collection are totally ordered.
    type Index: Ord + Clone;

    /// Returns the index of the first element, or `end_index()` if empty.
    fn start_index(&self) -> Self::Index;

    /// Returns the index one past the last element.
    fn end_index(&self) -> Self::Index;

    /// Returns the index immediately after `index`.
    ///
    /// # Panics
    ///
    /// Implementations panic if `index` is the end index.
    fn index_after(&self, index: &Self::Index) -> Self::Index;

    /// Returns the element at `index`.
    ///
    /// # Panics
    ///
    /// Implementations panic if `index` is the end index or invalid.
    fn element(&self, index: &Self::Index) -> &Self::Element;

    /// Returns `true` if the collection has no elements.
    fn is_empty(&self) -> bool {
        self.start_index() == self.end_index()
    }

    /// Returns the number of elements.
    fn count(&self) -> usize {
        self.distance(&self.start_index(), &self.end_index())
            .unsigned_abs()
    }

    /// Returns the index `distance` steps away from `index`.
    ///
    /// The default walks forward and only supports non-negative distances.
    ///
    /// # Panics
    ///
    /// Panics if the result would leave `start_index()..=end_index()`, or if
    /// `distance` is negative and the implementation does not support it.
    #[track_caller]
    fn index_offset_by(&self, index: &Self::Index, distance: isize) -> Self::Index {
        assert!(
            distance >= 0,
            "a forward-only collection cannot offset an index by {distance}"
        );
        let end = self.end_index();
        let mut current = index.clone();
        for _ in 0..distance.unsigned_abs() {
            assert!(current != end, "offset {distance} moves past the end index");
            current = self.index_after(&current);
        }
        current
    }

    /// Returns the index `distance` steps away from `index`, or `None` if
    /// the move would pass `limit`.
    ///
    /// Reaching `limit` exactly succeeds. A limit lying behind `index` in
    /// the direction of travel has no effect.
    ///
    /// # Panics
    ///
    /// Panics under the same conditions as
    /// [`index_offset_by`](Self::index_offset_by) when `limit` does not
    /// stop the move.
    #[track_caller]
    fn index_offset_by_limited(
        &self,
        index: &Self::Index,
        distance: isize,
        limit: &Self::Index,
    ) -> Option<Self::Index> {
        assert!(
            distance >= 0,
            "a forward-only collection cannot offset an index by {distance}"
        );
        let end = self.end_index();
        let mut current = index.clone();
        for _ in 0..distance.unsigned_abs() {
            if current == *limit {
                return None;
            }
            assert!(current != end, "offset {distance} moves past the end index");
            current = self.index_after(&current);
        }
        Some(current)
    }

    /// Returns the number of steps from `from` to `to`.
    ///
    /// The default walks forward, so `from` must not follow `to`.
    ///
    /// # Panics
    ///
    /// The default panics if `to` is not reachable from `from`.
    #[track_caller]
    fn distance(&self, from: &Self::Index, to: &Self::Index) -> isize {
        let end = self.end_index();
        let mut current = from.clone();
        let mut steps: isize = 0;
        while current != *to {
            assert!(
                current != end,
                "a forward-only collection cannot measure a backward distance"
            );
            current = self.index_after(&current);
            steps += 1;
        }
        steps
    }

    /// Returns an iterator over the elements in index order.
    fn elements(&self) -> Elements<'_, Self> {
        Elements::new(self)
    }

    /// Returns the first element, or `None` if empty.
    fn first(&self) -> Option<&Self::Element> {
        let start = self.start_index();
        if start == self.end_index() {
            None
        } else {
            Some(self.element(&start))
        }
    }

    /// Returns `true` if any element equals `element`.
    fn contains(&self, element: &Self::Element) -> bool
    where
        Self::Element: PartialEq,
    {
        self.elements().any(|candidate| candidate == element)
    }

    /// Returns the smallest element, or `None` if empty.
    fn min_element(&self) -> Option<&Self::Element>
    where
        Self::Element: Ord,
    {
        self.elements().min()
    }

    /// Returns the largest element, or `None` if empty.
    fn max_element(&self) -> Option<&Self::Element>
    where
        Self::Element: Ord,
    {
        self.elements().max()
    }

    /// Wraps the collection so that an interposition follows every element
    /// except the last.
    fn interposed(self) -> InterposeSequence<Self>
    where
        Self: Sized,
    {
        InterposeSequence::new(self)
    }

    /// Wraps the collection like [`interposed`](Self::interposed) and
    /// brackets the result with an intro and an outro.
    fn endcap_interposed(self) -> EndcapInterposeSequence<Self>
    where
        Self: Sized,
    {
        EndcapInterposeSequence::new(self)
    }
}

/// A collection that can also step backward.
pub trait BidirectionalCollection: Collection {
    /// Returns the index immediately before `index`.
    ///
    /// # Panics
    ///
    /// Implementations panic if `index` is the start index.
    fn index_before(&self, index: &Self::Index) -> Self::Index;

    /// Returns the last element, or `None` if empty.
    fn last(&self) -> Option<&Self::Element> {
        let end = self.end_index();
        if self.start_index() == end {
            None
        } else {
            Some(self.element(&self.index_before(&end)))
        }
    }
}

/// A bidirectional collection whose `index_offset_by`, `index_offset_by_limited`
/// and `distance` run in constant time and accept negative distances.
pub trait RandomAccessCollection: BidirectionalCollection {}

// =============================================================================
// Iterator Implementation
// =============================================================================

/// An iterator over references to the elements of any [`Collection`].
///
/// Created by [`Collection::elements`]. It is double-ended when the
/// collection is bidirectional.
pub struct Elements<'a, C: Collection + ?Sized> {
    collection: &'a C,
    front: C::Index,
    back: C::Index,
}

impl<'a, C: Collection + ?Sized> Elements<'a, C> {
    fn new(collection: &'a C) -> Self {
        Self {
            collection,
            front: collection.start_index(),
            back: collection.end_index(),
        }
    }
}

impl<C: Collection + ?Sized> Clone for Elements<'_, C> {
    fn clone(&self) -> Self {
        Self {
            collection: self.collection,
            front: self.front.clone(),
            back: self.back.clone(),
        }
    }
}

impl<'a, C: Collection + ?Sized> Iterator for Elements<'a, C> {
    type Item = &'a C::Element;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        let element = self.collection.element(&self.front);
        self.front = self.collection.index_after(&self.front);
        Some(element)
    }
}

impl<C: BidirectionalCollection + ?Sized> DoubleEndedIterator for Elements<'_, C> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        self.back = self.collection.index_before(&self.back);
        Some(self.collection.element(&self.back))
    }
}

impl<C: Collection + ?Sized> FusedIterator for Elements<'_, C> {}

// =============================================================================
// Borrowed Collections
// =============================================================================

impl<C: Collection + ?Sized> Collection for &C {
    type Element = C::Element;
    type Index = C::Index;

    #[inline]
    fn start_index(&self) -> Self::Index {
        (**self).start_index()
    }

    #[inline]
    fn end_index(&self) -> Self::Index {
        (**self).end_index()
    }

    #[inline]
    fn index_after(&self, index: &Self::Index) -> Self::Index {
        (**self).index_after(index)
    }

    #[inline]
    fn element(&self, index: &Self::Index) -> &Self::Element {
        (**self).element(index)
    }

    #[inline]
    fn is_empty(&self) -> bool {
        (**self).is_empty()
    }

    #[inline]
    fn count(&self) -> usize {
        (**self).count()
    }

    #[inline]
    fn index_offset_by(&self, index: &Self::Index, distance: isize) -> Self::Index {
        (**self).index_offset_by(index, distance)
    }

    #[inline]
    fn index_offset_by_limited(
        &self,
        index: &Self::Index,
        distance: isize,
        limit: &Self::Index,
    ) -> Option<Self::Index> {
        (**self).index_offset_by_limited(index, distance, limit)
    }

    #[inline]
    fn distance(&self, from: &Self::Index, to: &Self::Index) -> isize {
        (**self).distance(from, to)
    }

    fn contains(&self, element: &Self::Element) -> bool
    where
        Self::Element: PartialEq,
    {
        (**self).contains(element)
    }

    fn min_element(&self) -> Option<&Self::Element>
    where
        Self::Element: Ord,
    {
        (**self).min_element()
    }

    fn max_element(&self) -> Option<&Self::Element>
    where
        Self::Element: Ord,
    {
        (**self).max_element()
    }
}

impl<C: BidirectionalCollection + ?Sized> BidirectionalCollection for &C {
    #[inline]
    fn index_before(&self, index: &Self::Index) -> Self::Index {
        (**self).index_before(index)
    }
}

impl<C: RandomAccessCollection + ?Sized> RandomAccessCollection for &C {}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    /// A forward-only collection relying on every default method.
    struct Countdown {
        values: Vec<u32>,
    }

    impl Collection for Countdown {
        type Element = u32;
        type Index = usize;

        fn start_index(&self) -> usize {
            0
        }

        fn end_index(&self) -> usize {
            self.values.len()
        }

        fn index_after(&self, index: &usize) -> usize {
            assert!(*index < self.values.len(), "cannot advance past the end index");
            index + 1
        }

        fn element(&self, index: &usize) -> &u32 {
            &self.values[*index]
        }
    }

    fn countdown() -> Countdown {
        Countdown {
            values: vec![5, 4, 3, 2, 1],
        }
    }

    #[rstest]
    fn test_default_count_walks() {
        assert_eq!(countdown().count(), 5);
        assert!(!countdown().is_empty());
        assert!(Countdown { values: vec![] }.is_empty());
    }

    #[rstest]
    fn test_default_offset_walks_forward() {
        let collection = countdown();
        assert_eq!(collection.index_offset_by(&1, 3), 4);
        assert_eq!(collection.index_offset_by(&0, 5), 5);
    }

    #[rstest]
    #[should_panic(expected = "moves past the end index")]
    fn test_default_offset_past_end_panics() {
        countdown().index_offset_by(&3, 3);
    }

    #[rstest]
    #[should_panic(expected = "forward-only collection cannot offset")]
    fn test_default_offset_backward_panics() {
        countdown().index_offset_by(&3, -1);
    }

    #[rstest]
    #[case(0, 2, 3, Some(2))]
    #[case(0, 3, 3, Some(3))]
    #[case(0, 4, 3, None)]
    #[case(4, 1, 3, Some(5))]
    fn test_default_offset_limited(
        #[case] index: usize,
        #[case] distance: isize,
        #[case] limit: usize,
        #[case] expected: Option<usize>,
    ) {
        assert_eq!(
            countdown().index_offset_by_limited(&index, distance, &limit),
            expected
        );
    }

    #[rstest]
    fn test_default_distance() {
        assert_eq!(countdown().distance(&1, &4), 3);
        assert_eq!(countdown().distance(&2, &2), 0);
    }

    #[rstest]
    #[should_panic(expected = "cannot measure a backward distance")]
    fn test_default_distance_backward_panics() {
        countdown().distance(&4, &1);
    }

    #[rstest]
    fn test_default_queries() {
        let collection = countdown();
        assert_eq!(collection.first(), Some(&5));
        assert!(collection.contains(&3));
        assert!(!collection.contains(&9));
        assert_eq!(collection.min_element(), Some(&1));
        assert_eq!(collection.max_element(), Some(&5));
    }

    #[rstest]
    fn test_elements_double_ended() {
        let values = vec![1, 2, 3, 4];
        let mut elements = values.elements();
        assert_eq!(elements.next(), Some(&1));
        assert_eq!(elements.next_back(), Some(&4));
        assert_eq!(elements.next_back(), Some(&3));
        assert_eq!(elements.next(), Some(&2));
        assert_eq!(elements.next(), None);
        assert_eq!(elements.next_back(), None);
    }

    #[rstest]
    fn test_borrowed_collection_delegates() {
        let values = vec![7, 8, 9];
        let borrowed = &values;
        assert_eq!(Collection::count(&borrowed), 3);
        assert_eq!(borrowed.index_before(&3), 2);
        assert_eq!(BidirectionalCollection::last(&borrowed), Some(&9));
    }
}
