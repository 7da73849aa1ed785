//! Type-erased random-access branches.
//!
//! A [`Chain`](crate::Chain) stores a homogeneous list of branches. To chain
//! differently typed collections that share an element type, wrap each one
//! in a [`BoxedBranch`]. The native index is erased to the element's offset,
//! so only random-access collections can be boxed; that keeps every erased
//! access O(1).
//!
//! # Examples
//!
//! ```rust
//! use chainweave::prelude::*;
//! use std::collections::VecDeque;
//!
//! let deque: VecDeque<i32> = [3, 4].into_iter().collect();
//! let chain = chain![
//!     BoxedBranch::new(vec![1, 2]),
//!     BoxedBranch::new(deque),
//!     BoxedBranch::new([5]),
//! ];
//! assert_eq!(chain.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};

use super::{BidirectionalCollection, Collection, RandomAccessCollection};
use crate::ReferenceCounter;
use crate::linear::{offset_linear, offset_linear_limited, to_signed};

/// Thread-safety required of a boxed collection.
///
/// With the `arc` feature this is `Send + Sync`, so chains of boxed branches
/// stay `Send + Sync`. Without it every type qualifies.
#[cfg(feature = "arc")]
pub trait BranchShare: Send + Sync {}

#[cfg(feature = "arc")]
impl<C: Send + Sync + ?Sized> BranchShare for C {}

/// Thread-safety required of a boxed collection.
///
/// With the `arc` feature this is `Send + Sync`, so chains of boxed branches
/// stay `Send + Sync`. Without it every type qualifies.
#[cfg(not(feature = "arc"))]
pub trait BranchShare {}

#[cfg(not(feature = "arc"))]
impl<C: ?Sized> BranchShare for C {}

/// Object-safe view of a random-access collection addressed by offset.
trait ErasedBranch<T>: BranchShare {
    fn erased_count(&self) -> usize;

    fn erased_element(&self, offset: usize) -> &T;
}

impl<C: RandomAccessCollection + BranchShare + ?Sized> ErasedBranch<C::Element> for C {
    fn erased_count(&self) -> usize {
        self.count()
    }

    fn erased_element(&self, offset: usize) -> &C::Element {
        let index = self.index_offset_by(&self.start_index(), to_signed(offset));
        self.element(&index)
    }
}

/// A shared, type-erased random-access branch.
///
/// Cloning is O(1): clones share the wrapped collection. Indices are
/// `usize` offsets from the start of the wrapped collection.
pub struct BoxedBranch<'a, T> {
    inner: ReferenceCounter<dyn ErasedBranch<T> + 'a>,
}

impl<'a, T> BoxedBranch<'a, T> {
    /// Erases the type of a random-access collection.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chainweave::prelude::*;
    ///
    /// let branch = BoxedBranch::new(vec!['a', 'b']);
    /// assert_eq!(branch.len(), 2);
    /// ```
    pub fn new<C>(collection: C) -> Self
    where
        C: RandomAccessCollection<Element = T> + BranchShare + 'a,
    {
        Self {
            inner: ReferenceCounter::new(collection),
        }
    }

    /// Returns the number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.inner.erased_count()
    }

    /// Returns `true` if the branch has no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the element at `offset`, or `None` if out of range.
    pub fn get(&self, offset: usize) -> Option<&T> {
        (offset < self.len()).then(|| self.inner.erased_element(offset))
    }
}

impl<T> Clone for BoxedBranch<'_, T> {
    fn clone(&self) -> Self {
        Self {
            inner: ReferenceCounter::clone(&self.inner),
        }
    }
}

impl<T> Collection for BoxedBranch<'_, T> {
    type Element = T;
    type Index = usize;

    #[inline]
    fn start_index(&self) -> usize {
        0
    }

    #[inline]
    fn end_index(&self) -> usize {
        self.len()
    }

    #[track_caller]
    fn index_after(&self, index: &usize) -> usize {
        assert!(*index < self.len(), "cannot advance past the end index");
        index + 1
    }

    #[track_caller]
    fn element(&self, index: &usize) -> &T {
        let count = self.len();
        assert!(
            *index < count,
            "index {index} is out of range for a branch of {count} elements"
        );
        self.inner.erased_element(*index)
    }

    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    fn count(&self) -> usize {
        self.len()
    }

    fn index_offset_by(&self, index: &usize, distance: isize) -> usize {
        offset_linear(*index, distance, self.len())
    }

    fn index_offset_by_limited(&self, index: &usize, distance: isize, limit: &usize) -> Option<usize> {
        offset_linear_limited(*index, distance, *limit, self.len())
    }

    fn distance(&self, from: &usize, to: &usize) -> isize {
        to_signed(*to) - to_signed(*from)
    }
}

impl<T> BidirectionalCollection for BoxedBranch<'_, T> {
    #[track_caller]
    fn index_before(&self, index: &usize) -> usize {
        assert!(*index > 0, "cannot retreat before the start index");
        index - 1
    }
}

impl<T> RandomAccessCollection for BoxedBranch<'_, T> {}

impl<T: PartialEq> PartialEq for BoxedBranch<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        ReferenceCounter::ptr_eq(&self.inner, &other.inner)
            || (self.len() == other.len() && self.elements().eq(other.elements()))
    }
}

impl<T: Eq> Eq for BoxedBranch<'_, T> {}

impl<T: Hash> Hash for BoxedBranch<'_, T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for element in self.elements() {
            element.hash(state);
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for BoxedBranch<'_, T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_list().entries(self.elements()).finish()
    }
}

#[cfg(not(feature = "arc"))]
static_assertions::assert_not_impl_any!(BoxedBranch<'static, i32>: Send, Sync);

#[cfg(feature = "arc")]
static_assertions::assert_impl_all!(BoxedBranch<'static, i32>: Send, Sync);

// =============================================================================
// Tests
// =============================================================================
