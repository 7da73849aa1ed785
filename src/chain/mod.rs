//! Chained collections.
//!
//! This module provides [`Chain`], which presents any number of branches
//! sharing one element type as a single ordered collection.
//!
//! # Overview
//!
//! - Traversal visits branch 0's elements, then branch 1's, and so on;
//!   empty branches contribute nothing.
//! - [`Chain`] offers the capability tier of its branch type: random access
//!   for `Vec`, slices and [`BoxedBranch`](crate::BoxedBranch), bidirectional
//!   or forward-only for weaker branches.
//! - `count`, `is_empty`, the first and final positions and the cumulative
//!   offset range of every branch are memoized on first read.
//! - Copies share storage. Replacing a branch clones the storage first when
//!   it is shared (copy-on-write), so other copies never observe the change.
//!
//! # Examples
//!
//! ```rust
//! use chainweave::prelude::*;
//!
//! let chain = chain![vec![1, 2], vec![], vec![3]];
//! assert_eq!(chain.len(), 3);
//!
//! // Stepping from the last element of branch 0 skips the empty branch 1
//! let second = chain.index_offset_by(&chain.start_index(), 1);
//! let third = chain.index_after(&second);
//! assert_eq!(chain[third.clone()], 3);
//! assert_eq!(chain.index_after(&third), chain.end_index());
//!
//! // Persistent update
//! let replaced = chain.with_branch(0, vec![7]);
//! assert_eq!(replaced.iter().copied().collect::<Vec<_>>(), vec![7, 3]);
//! assert_eq!(chain.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
//! ```

mod position;
mod storage;

pub use position::{ChainIndex, ChainPosition};

use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::{FromIterator, FusedIterator};

use crate::ReferenceCounter;
use crate::collection::{BidirectionalCollection, Collection, RandomAccessCollection};
use crate::error::ChainError;
use crate::index::SentinelIndex;
use crate::linear::{self, Linearization};
use storage::ChainStorage;

/// Builds a [`Chain`] from a list of branches.
///
/// # Examples
///
/// ```rust
/// use chainweave::prelude::*;
///
/// let chain = chain![vec!['a'], vec!['b', 'c']];
/// assert_eq!(chain.branch_count(), 2);
///
/// let empty: Chain<Vec<char>> = chain![];
/// assert!(empty.is_empty());
/// ```
#[macro_export]
macro_rules! chain {
    () => {
        $crate::Chain::new(::std::vec::Vec::new())
    };
    ($($branch:expr),+ $(,)?) => {
        $crate::Chain::new(::std::vec![$($branch),+])
    };
}

/// A collection presenting a list of branches as one ordered collection.
///
/// `Chain` is a cheap handle to shared storage; cloning is O(1). Mutating
/// operations clone the storage first if another handle shares it.
///
/// # Time Complexity
///
/// | Operation            | Complexity                                   |
/// |----------------------|----------------------------------------------|
/// | `new`                | O(1)                                         |
/// | `len` / `is_empty`   | O(1) amortized, O(N) on first read           |
/// | `start_index`        | O(1) amortized                               |
/// | `index_after`        | O(1) within a branch, O(N) crossing branches |
/// | `index_offset_by`    | O(N) branch lookup (O(log N) above 8) + branch offset |
/// | `with_branch`        | O(N) storage clone when shared               |
///
/// `N` is the number of branches.
///
/// # Examples
///
/// ```rust
/// use chainweave::prelude::*;
///
/// let chain = Chain::new(vec![vec![3, 1], vec![4, 1, 5]]);
/// assert_eq!(chain.len(), 5);
/// assert_eq!(chain.min(), Some(&1));
/// assert_eq!(chain.max(), Some(&5));
/// assert!(chain.contains(&4));
/// ```
pub struct Chain<B: Collection> {
    storage: ReferenceCounter<ChainStorage<B>>,
}

impl<B: Collection> Chain<B> {
    /// Creates a chain over `branches`. Nothing is computed until read.
    #[inline]
    #[must_use]
    pub fn new(branches: Vec<B>) -> Self {
        Self {
            storage: ReferenceCounter::new(ChainStorage::new(branches)),
        }
    }

    /// Returns the number of branches.
    #[inline]
    pub fn branch_count(&self) -> usize {
        self.storage.branches().len()
    }

    /// Returns the branch at `position`, or `None` if out of range.
    #[inline]
    pub fn branch(&self, position: usize) -> Option<&B> {
        self.storage.branches().get(position)
    }

    /// Returns every branch in chain order.
    #[inline]
    pub fn branches(&self) -> &[B] {
        self.storage.branches()
    }

    /// Returns the number of elements across all branches.
    #[inline]
    pub fn len(&self) -> usize {
        self.storage.count()
    }

    /// Returns `true` if every branch is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Returns `true` if both chains share one storage instance.
    #[inline]
    pub fn shares_storage_with(&self, other: &Self) -> bool {
        ReferenceCounter::ptr_eq(&self.storage, &other.storage)
    }

    /// Returns the element at `index`, or `None` for the end index or a
    /// position at or past the end of its branch.
    pub fn get(&self, index: &ChainIndex<B::Index>) -> Option<&B::Element> {
        self.try_get(index).ok()
    }

    /// Returns the element at `index`.
    ///
    /// # Errors
    ///
    /// - [`ChainError::EndIndex`] if `index` is the end index
    /// - [`ChainError::BranchOutOfRange`] if the position names no branch
    /// - [`ChainError::BranchEnd`] if the position is at or past its branch's
    ///   end index
    pub fn try_get(&self, index: &ChainIndex<B::Index>) -> Result<&B::Element, ChainError> {
        let position = index.position().ok_or(ChainError::EndIndex)?;
        let branch = self
            .branch(position.branch())
            .ok_or(ChainError::BranchOutOfRange {
                position: position.branch(),
                branch_count: self.branch_count(),
            })?;
        if *position.index() >= branch.end_index() {
            return Err(ChainError::BranchEnd {
                branch: position.branch(),
            });
        }
        Ok(branch.element(position.index()))
    }

    /// Returns the first element, or `None` if the chain is empty.
    pub fn first(&self) -> Option<&B::Element> {
        self.storage
            .first_position()
            .map(|position| self.branches()[position.branch()].element(position.index()))
    }

    /// Returns the last element, or `None` if the chain is empty.
    pub fn last(&self) -> Option<&B::Element> {
        self.storage
            .final_position()
            .map(|position| self.branches()[position.branch()].element(position.index()))
    }

    /// Returns the position at the linear `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::OffsetOutOfRange`] if `offset >= self.len()`.
    pub fn try_position_for_linear(
        &self,
        offset: usize,
    ) -> Result<ChainPosition<B::Index>, ChainError> {
        let count = self.len();
        if offset < count {
            Ok(self.storage.position_for_linear(offset))
        } else {
            Err(ChainError::OffsetOutOfRange { offset, count })
        }
    }

    /// Returns `true` if any branch contains `element`.
    ///
    /// Branches are searched in order and the search stops at the first hit.
    pub fn contains(&self, element: &B::Element) -> bool
    where
        B::Element: PartialEq,
    {
        self.branches().iter().any(|branch| branch.contains(element))
    }

    /// Returns `true` if `predicate` holds for any element.
    pub fn contains_where<P>(&self, predicate: P) -> bool
    where
        P: FnMut(&B::Element) -> bool,
    {
        self.iter().any(predicate)
    }

    /// Returns `true` if `predicate` holds for any element, stopping at the
    /// first error.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by `predicate`, unchanged.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chainweave::prelude::*;
    ///
    /// let chain = chain![vec![1, 2], vec![3]];
    /// let result: Result<bool, String> = chain.try_contains_where(|element| {
    ///     if *element == 2 { Err(format!("rejected {element}")) } else { Ok(false) }
    /// });
    /// assert_eq!(result, Err("rejected 2".to_string()));
    /// ```
    pub fn try_contains_where<P, E>(&self, mut predicate: P) -> Result<bool, E>
    where
        P: FnMut(&B::Element) -> Result<bool, E>,
    {
        for element in self {
            if predicate(element)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Folds the elements in chain order with a fallible accumulator.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by `function`, unchanged.
    pub fn try_fold_elements<A, E, F>(&self, initial: A, mut function: F) -> Result<A, E>
    where
        F: FnMut(A, &B::Element) -> Result<A, E>,
    {
        self.iter()
            .try_fold(initial, |accumulator, element| function(accumulator, element))
    }

    /// Returns the smallest element, or `None` if every branch is empty.
    ///
    /// Each non-empty branch reports its own minimum.
    pub fn min(&self) -> Option<&B::Element>
    where
        B::Element: Ord,
    {
        self.branches()
            .iter()
            .filter(|branch| !branch.is_empty())
            .filter_map(Collection::min_element)
            .min()
    }

    /// Returns the largest element, or `None` if every branch is empty.
    ///
    /// Each non-empty branch reports its own maximum.
    pub fn max(&self) -> Option<&B::Element>
    where
        B::Element: Ord,
    {
        self.branches()
            .iter()
            .filter(|branch| !branch.is_empty())
            .filter_map(Collection::max_element)
            .max()
    }

    /// Returns an iterator over the elements in chain order.
    #[inline]
    pub fn iter(&self) -> ChainIter<'_, B> {
        ChainIter::new(self)
    }

    #[track_caller]
    fn position_branch(&self, position: &ChainPosition<B::Index>) -> &B {
        let branch_count = self.branch_count();
        match self.branches().get(position.branch()) {
            Some(branch) => branch,
            None => panic!(
                "branch position {} is out of range for a chain of {branch_count} branches",
                position.branch()
            ),
        }
    }
}

// =============================================================================
// Copy-on-Write Updates
// =============================================================================

impl<B: Collection + Clone> Chain<B> {
    /// Returns a chain equal to `self` except that branch `position` is
    /// replaced by `branch`. `self` is unchanged.
    ///
    /// # Panics
    ///
    /// Panics if `position >= self.branch_count()`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chainweave::prelude::*;
    ///
    /// let chain = chain![vec![1], vec![2]];
    /// let updated = chain.with_branch(1, vec![5, 6]);
    /// assert_eq!(updated.len(), 3);
    /// assert_eq!(chain.len(), 2);
    /// ```
    #[must_use]
    #[track_caller]
    pub fn with_branch(&self, position: usize, branch: B) -> Self {
        let mut updated = self.clone();
        updated.set_branch(position, branch);
        updated
    }

    /// Checked variant of [`with_branch`](Self::with_branch).
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::BranchOutOfRange`] if `position` names no branch.
    pub fn try_with_branch(&self, position: usize, branch: B) -> Result<Self, ChainError> {
        self.check_branch_position(position)?;
        Ok(self.with_branch(position, branch))
    }

    /// Replaces branch `position` in place and returns the previous branch.
    ///
    /// The storage is cloned first if another chain shares it.
    ///
    /// # Panics
    ///
    /// Panics if `position >= self.branch_count()`.
    #[track_caller]
    pub fn set_branch(&mut self, position: usize, branch: B) -> B {
        self.assert_branch_position(position);
        log::debug!("replacing chain branch {position}");
        self.storage_mut().replace_branch(position, branch)
    }

    /// Checked variant of [`set_branch`](Self::set_branch).
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::BranchOutOfRange`] if `position` names no branch.
    pub fn try_set_branch(&mut self, position: usize, branch: B) -> Result<B, ChainError> {
        self.check_branch_position(position)?;
        Ok(self.set_branch(position, branch))
    }

    /// Mutates branch `position` in place through `function`.
    ///
    /// The storage is cloned first if another chain shares it.
    ///
    /// # Panics
    ///
    /// Panics if `position >= self.branch_count()`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chainweave::prelude::*;
    ///
    /// let mut chain = chain![vec![1], vec![2]];
    /// chain.update_branch(0, |branch| branch.push(9));
    /// assert_eq!(chain.iter().copied().collect::<Vec<_>>(), vec![1, 9, 2]);
    /// ```
    #[track_caller]
    pub fn update_branch<R, F>(&mut self, position: usize, function: F) -> R
    where
        F: FnOnce(&mut B) -> R,
    {
        self.assert_branch_position(position);
        self.storage_mut().update_branch(position, function)
    }

    /// Appends a branch after the last one.
    pub fn push_branch(&mut self, branch: B) {
        self.storage_mut().push_branch(branch);
    }

    /// Consumes the chain and returns its branches, cloning them only if
    /// the storage is shared.
    pub fn into_branches(self) -> Vec<B> {
        ReferenceCounter::try_unwrap(self.storage).map_or_else(
            |shared| shared.branches().to_vec(),
            ChainStorage::into_branches,
        )
    }

    fn storage_mut(&mut self) -> &mut ChainStorage<B> {
        if ReferenceCounter::get_mut(&mut self.storage).is_none() {
            log::trace!(
                "cloning shared chain storage of {} branches before mutation",
                self.branch_count()
            );
        }
        ReferenceCounter::make_mut(&mut self.storage)
    }
}

impl<B: Collection> Chain<B> {
    fn check_branch_position(&self, position: usize) -> Result<(), ChainError> {
        let branch_count = self.branch_count();
        if position < branch_count {
            Ok(())
        } else {
            Err(ChainError::BranchOutOfRange {
                position,
                branch_count,
            })
        }
    }

    #[track_caller]
    fn assert_branch_position(&self, position: usize) {
        if let Err(error) = self.check_branch_position(position) {
            panic!("{error}");
        }
    }
}

// =============================================================================
// Collection Implementation
// =============================================================================

impl<B: Collection> Collection for Chain<B> {
    type Element = B::Element;
    type Index = ChainIndex<B::Index>;

    fn start_index(&self) -> Self::Index {
        self.storage
            .first_position()
            .cloned()
            .map_or(SentinelIndex::End, SentinelIndex::Position)
    }

    #[inline]
    fn end_index(&self) -> Self::Index {
        SentinelIndex::End
    }

    #[track_caller]
    fn index_after(&self, index: &Self::Index) -> Self::Index {
        let position = index.expect_position("advance past");
        let branch = self.position_branch(position);
        let next = branch.index_after(position.index());
        if next != branch.end_index() {
            return SentinelIndex::Position(ChainPosition::new(position.branch(), next));
        }
        self.storage
            .first_position_from(position.branch() + 1)
            .map_or(SentinelIndex::End, SentinelIndex::Position)
    }

    #[track_caller]
    fn element(&self, index: &Self::Index) -> &Self::Element {
        let position = index.expect_position("read through");
        let branch = self.position_branch(position);
        assert!(
            *position.index() < branch.end_index(),
            "position lies at or past the end of branch {}",
            position.branch()
        );
        branch.element(position.index())
    }

    #[inline]
    fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    #[inline]
    fn count(&self) -> usize {
        self.storage.count()
    }

    #[track_caller]
    fn index_offset_by(&self, index: &Self::Index, distance: isize) -> Self::Index {
        linear::offset_index(self, index, distance)
    }

    #[track_caller]
    fn index_offset_by_limited(
        &self,
        index: &Self::Index,
        distance: isize,
        limit: &Self::Index,
    ) -> Option<Self::Index> {
        linear::offset_index_limited(self, index, distance, limit)
    }

    fn distance(&self, from: &Self::Index, to: &Self::Index) -> isize {
        linear::index_distance(self, from, to)
    }

    fn contains(&self, element: &Self::Element) -> bool
    where
        Self::Element: PartialEq,
    {
        Self::contains(self, element)
    }

    fn min_element(&self) -> Option<&Self::Element>
    where
        Self::Element: Ord,
    {
        self.min()
    }

    fn max_element(&self) -> Option<&Self::Element>
    where
        Self::Element: Ord,
    {
        self.max()
    }
}

impl<B: BidirectionalCollection> BidirectionalCollection for Chain<B> {
    #[track_caller]
    fn index_before(&self, index: &Self::Index) -> Self::Index {
        let SentinelIndex::Position(position) = index else {
            let Some(final_position) = self.storage.final_position() else {
                panic!("cannot retreat before the start index of an empty chain");
            };
            return SentinelIndex::Position(final_position.clone());
        };
        let branch = self.position_branch(position);
        if *position.index() != branch.start_index() {
            return SentinelIndex::Position(ChainPosition::new(
                position.branch(),
                branch.index_before(position.index()),
            ));
        }
        let previous = self.branches()[..position.branch()]
            .iter()
            .enumerate()
            .rev()
            .find(|(_, candidate)| !candidate.is_empty());
        let Some((tag, previous)) = previous else {
            panic!("cannot retreat before the start index");
        };
        SentinelIndex::Position(ChainPosition::new(
            tag,
            previous.index_before(&previous.end_index()),
        ))
    }
}

impl<B: RandomAccessCollection> RandomAccessCollection for Chain<B> {}

impl<B: Collection> Linearization for Chain<B> {
    type Position = ChainPosition<B::Index>;

    #[inline]
    fn linear_count(&self) -> usize {
        self.storage.count()
    }

    fn linear_position(&self, position: &Self::Position) -> usize {
        self.storage.linear_position(position)
    }

    #[track_caller]
    fn position_for_linear(&self, offset: usize) -> Self::Position {
        self.storage.position_for_linear(offset)
    }
}

impl<B: Collection> std::ops::Index<ChainIndex<B::Index>> for Chain<B> {
    type Output = B::Element;

    #[track_caller]
    fn index(&self, index: ChainIndex<B::Index>) -> &Self::Output {
        self.element(&index)
    }
}

// =============================================================================
// Iterator Implementation
// =============================================================================

/// An iterator over references to the elements of a [`Chain`].
///
/// Double-ended when the branches are bidirectional.
pub struct ChainIter<'a, B: Collection> {
    chain: &'a Chain<B>,
    front: ChainIndex<B::Index>,
    back: ChainIndex<B::Index>,
    remaining: usize,
}

impl<'a, B: Collection> ChainIter<'a, B> {
    fn new(chain: &'a Chain<B>) -> Self {
        Self {
            chain,
            front: chain.start_index(),
            back: SentinelIndex::End,
            remaining: chain.len(),
        }
    }
}

impl<B: Collection> Clone for ChainIter<'_, B> {
    fn clone(&self) -> Self {
        Self {
            chain: self.chain,
            front: self.front.clone(),
            back: self.back.clone(),
            remaining: self.remaining,
        }
    }
}

impl<'a, B: Collection> Iterator for ChainIter<'a, B> {
    type Item = &'a B::Element;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let element = self.chain.element(&self.front);
        self.remaining -= 1;
        if self.remaining > 0 {
            self.front = self.chain.index_after(&self.front);
        }
        Some(element)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<B: BidirectionalCollection> DoubleEndedIterator for ChainIter<'_, B> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.back = self.chain.index_before(&self.back);
        self.remaining -= 1;
        Some(self.chain.element(&self.back))
    }
}

impl<B: Collection> ExactSizeIterator for ChainIter<'_, B> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<B: Collection> FusedIterator for ChainIter<'_, B> {}

impl<'a, B: Collection> IntoIterator for &'a Chain<B> {
    type Item = &'a B::Element;
    type IntoIter = ChainIter<'a, B>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<B: Collection> Clone for Chain<B> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            storage: ReferenceCounter::clone(&self.storage),
        }
    }
}

impl<B: Collection> Default for Chain<B> {
    #[inline]
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<B: Collection> From<Vec<B>> for Chain<B> {
    #[inline]
    fn from(branches: Vec<B>) -> Self {
        Self::new(branches)
    }
}

impl<B: Collection> FromIterator<B> for Chain<B> {
    fn from_iter<I: IntoIterator<Item = B>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Chains compare structurally, branch by branch, so `[[1], [2]]` and
/// `[[1, 2], []]` are different chains even though they yield the same
/// elements.
impl<B: Collection + PartialEq> PartialEq for Chain<B> {
    fn eq(&self, other: &Self) -> bool {
        self.shares_storage_with(other) || self.branches() == other.branches()
    }
}

impl<B: Collection + Eq> Eq for Chain<B> {}

impl<B: Collection + Hash> Hash for Chain<B> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.branches().hash(state);
    }
}

impl<B: Collection + fmt::Debug> fmt::Debug for Chain<B> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Chain")
            .field("branches", &self.branches())
            .finish()
    }
}

impl<B> fmt::Display for Chain<B>
where
    B: Collection,
    B::Element: fmt::Display,
{
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "[")?;
        let mut first = true;
        for element in self {
            if first {
                first = false;
            } else {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{element}")?;
        }
        write!(formatter, "]")
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<B> serde::Serialize for Chain<B>
where
    B: Collection + serde::Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.branches())
    }
}

#[cfg(feature = "serde")]
impl<'de, B> serde::Deserialize<'de> for Chain<B>
where
    B: Collection + serde::Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Vec::<B>::deserialize(deserializer).map(Self::new)
    }
}

#[cfg(not(feature = "arc"))]
static_assertions::assert_not_impl_any!(Chain<Vec<i32>>: Send, Sync);

#[cfg(feature = "arc")]
static_assertions::assert_impl_all!(Chain<Vec<i32>>: Send, Sync);

// =============================================================================
// Tests
// =============================================================================
