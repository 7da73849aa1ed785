//! Backing storage of a chain: the branches plus memoized derived state.
//!
//! Every derived field is a pure function of the branches. Each one is
//! computed on first read and cached in its own cell; any change to any
//! branch clears all of them, because a single count change shifts every
//! later range.

use std::mem;
use std::ops::Range;

use smallvec::SmallVec;

use super::ChainPosition;
use crate::CacheCell;
use crate::collection::Collection;
use crate::linear::to_signed;

/// Chains with more branches than this locate offsets by binary search.
const LINEAR_SCAN_LIMIT: usize = 8;

/// Half-open cumulative offset range of every branch.
pub(crate) type BranchRanges = SmallVec<[Range<usize>; LINEAR_SCAN_LIMIT]>;

pub(crate) struct ChainStorage<B: Collection> {
    branches: Vec<B>,
    is_empty: CacheCell<bool>,
    count: CacheCell<usize>,
    first_position: CacheCell<Option<ChainPosition<B::Index>>>,
    final_position: CacheCell<Option<ChainPosition<B::Index>>>,
    ranges: CacheCell<BranchRanges>,
}

impl<B: Collection> ChainStorage<B> {
    pub(crate) fn new(branches: Vec<B>) -> Self {
        Self {
            branches,
            is_empty: CacheCell::new(),
            count: CacheCell::new(),
            first_position: CacheCell::new(),
            final_position: CacheCell::new(),
            ranges: CacheCell::new(),
        }
    }

    #[inline]
    pub(crate) fn branches(&self) -> &[B] {
        &self.branches
    }

    pub(crate) fn into_branches(self) -> Vec<B> {
        self.branches
    }

    // =========================================================================
    // Memoized Fields
    // =========================================================================

    pub(crate) fn is_empty(&self) -> bool {
        *self
            .is_empty
            .get_or_init(|| self.branches.iter().all(Collection::is_empty))
    }

    pub(crate) fn count(&self) -> usize {
        *self.count.get_or_init(|| {
            let count: usize = self.branches.iter().map(Collection::count).sum();
            log::trace!(
                "computed chain count {count} over {} branches",
                self.branches.len()
            );
            count
        })
    }

    pub(crate) fn first_position(&self) -> Option<&ChainPosition<B::Index>> {
        self.first_position
            .get_or_init(|| self.first_position_from(0))
            .as_ref()
    }

    pub(crate) fn final_position(&self) -> Option<&ChainPosition<B::Index>> {
        self.final_position
            .get_or_init(|| self.final_position_before(self.branches.len()))
            .as_ref()
    }

    pub(crate) fn ranges(&self) -> &[Range<usize>] {
        self.ranges
            .get_or_init(|| Self::compute_ranges(&self.branches))
    }

    fn compute_ranges(branches: &[B]) -> BranchRanges {
        let mut ranges = BranchRanges::with_capacity(branches.len());
        let mut lower = 0;
        for branch in branches {
            let upper = lower + branch.count();
            ranges.push(lower..upper);
            lower = upper;
        }
        log::trace!("computed {} branch ranges spanning 0..{lower}", ranges.len());
        ranges
    }

    // =========================================================================
    // Boundary Scans
    // =========================================================================

    /// Returns the start of the first non-empty branch at or after `branch`.
    pub(crate) fn first_position_from(&self, branch: usize) -> Option<ChainPosition<B::Index>> {
        self.branches
            .iter()
            .enumerate()
            .skip(branch)
            .find(|(_, candidate)| !candidate.is_empty())
            .map(|(tag, candidate)| ChainPosition::new(tag, candidate.start_index()))
    }

    /// Returns the last element position of the last non-empty branch
    /// strictly before `branch`.
    pub(crate) fn final_position_before(&self, branch: usize) -> Option<ChainPosition<B::Index>> {
        self.branches[..branch]
            .iter()
            .enumerate()
            .rev()
            .find(|(_, candidate)| !candidate.is_empty())
            .map(|(tag, candidate)| ChainPosition::new(tag, last_index(candidate)))
    }

    // =========================================================================
    // Linearization
    // =========================================================================

    pub(crate) fn linear_position(&self, position: &ChainPosition<B::Index>) -> usize {
        let branch = &self.branches[position.branch()];
        let within = branch.distance(&branch.start_index(), position.index());
        self.ranges()[position.branch()].start + within.unsigned_abs()
    }

    #[track_caller]
    pub(crate) fn position_for_linear(&self, offset: usize) -> ChainPosition<B::Index> {
        let count = self.count();
        assert!(
            offset < count,
            "linear offset {offset} is out of range for a chain of {count} elements"
        );
        let ranges = self.ranges();
        let tag = branch_containing(ranges, offset);
        let branch = &self.branches[tag];
        let index =
            branch.index_offset_by(&branch.start_index(), to_signed(offset - ranges[tag].start));
        ChainPosition::new(tag, index)
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    pub(crate) fn replace_branch(&mut self, position: usize, branch: B) -> B {
        let previous = mem::replace(&mut self.branches[position], branch);
        self.invalidate();
        previous
    }

    pub(crate) fn update_branch<R, F>(&mut self, position: usize, function: F) -> R
    where
        F: FnOnce(&mut B) -> R,
    {
        let result = function(&mut self.branches[position]);
        self.invalidate();
        result
    }

    pub(crate) fn push_branch(&mut self, branch: B) {
        self.branches.push(branch);
        self.invalidate();
    }

    /// Clears every memoized field. Nothing is recomputed until read.
    fn invalidate(&mut self) {
        self.is_empty.take();
        self.count.take();
        self.first_position.take();
        self.final_position.take();
        self.ranges.take();
    }

    #[cfg(test)]
    pub(crate) fn cached_field_count(&self) -> usize {
        [
            self.is_empty.get().is_some(),
            self.count.get().is_some(),
            self.first_position.get().is_some(),
            self.final_position.get().is_some(),
            self.ranges.get().is_some(),
        ]
        .into_iter()
        .filter(|cached| *cached)
        .count()
    }
}

impl<B: Collection + Clone> Clone for ChainStorage<B> {
    fn clone(&self) -> Self {
        Self {
            branches: self.branches.clone(),
            is_empty: self.is_empty.clone(),
            count: self.count.clone(),
            first_position: self.first_position.clone(),
            final_position: self.final_position.clone(),
            ranges: self.ranges.clone(),
        }
    }
}

/// Returns the index of the last element of a non-empty branch.
fn last_index<B: Collection>(branch: &B) -> B::Index {
    branch.index_offset_by(&branch.start_index(), to_signed(branch.count() - 1))
}

/// Returns the tag of the branch whose range contains `offset`.
///
/// Empty ranges never contain an offset, so empty branches are skipped.
fn branch_containing(ranges: &[Range<usize>], offset: usize) -> usize {
    if ranges.len() <= LINEAR_SCAN_LIMIT {
        ranges
            .iter()
            .position(|range| range.contains(&offset))
            .unwrap_or(ranges.len())
    } else {
        ranges.partition_point(|range| range.end <= offset)
    }
}

// =============================================================================
// Tests
// =============================================================================
