//! Integration tests for Chain.
//!
//! These tests exercise the public chain surface over branches of every
//! tier: traversal across empty branches, linearization, copy-on-write
//! updates, and heterogeneous branches through `BoxedBranch`.

use chainweave::prelude::*;
use rstest::rstest;
use std::collections::VecDeque;

// =============================================================================
// Weaker Branch Tiers
// =============================================================================

/// A branch that can only step forward.
#[derive(Debug, Clone, PartialEq)]
struct ForwardOnly {
    values: Vec<i32>,
}

impl Collection for ForwardOnly {
    type Element = i32;
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

    fn element(&self, index: &usize) -> &i32 {
        &self.values[*index]
    }
}

/// A branch that steps both ways but offers no constant-time offsets.
#[derive(Debug, Clone, PartialEq)]
struct TwoWay {
    values: Vec<i32>,
}

impl Collection for TwoWay {
    type Element = i32;
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

    fn element(&self, index: &usize) -> &i32 {
        &self.values[*index]
    }
}

impl BidirectionalCollection for TwoWay {
    fn index_before(&self, index: &usize) -> usize {
        assert!(*index > 0, "cannot retreat before the start index");
        index - 1
    }
}

fn forward(values: &[i32]) -> ForwardOnly {
    ForwardOnly {
        values: values.to_vec(),
    }
}

fn two_way(values: &[i32]) -> TwoWay {
    TwoWay {
        values: values.to_vec(),
    }
}

// A chain offers exactly the tier of its branches
static_assertions::assert_not_impl_any!(Chain<ForwardOnly>: BidirectionalCollection);
static_assertions::assert_impl_all!(Chain<TwoWay>: BidirectionalCollection);
static_assertions::assert_not_impl_any!(Chain<TwoWay>: RandomAccessCollection);
static_assertions::assert_impl_all!(Chain<Vec<i32>>: RandomAccessCollection);

#[rstest]
fn test_forward_only_branches_traverse_in_order() {
    let chain = chain![forward(&[1, 2]), forward(&[]), forward(&[3])];
    assert_eq!(chain.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
    assert_eq!(chain.len(), 3);
    assert_eq!(chain.first(), Some(&1));
}

#[rstest]
fn test_forward_only_branches_resolve_negative_offsets() {
    let chain = chain![forward(&[1, 2]), forward(&[]), forward(&[3, 4])];
    let end = chain.end_index();

    let last = chain.index_offset_by(&end, -1);
    assert_eq!(last, SentinelIndex::Position(ChainPosition::new(2, 1)));
    assert_eq!(chain[last], 4);

    let second = chain.index_offset_by(&end, -3);
    assert_eq!(second, SentinelIndex::Position(ChainPosition::new(0, 1)));
    assert_eq!(chain[second.clone()], 2);

    assert_eq!(chain.index_offset_by(&end, -4), chain.start_index());
    assert_eq!(chain.index_offset_by_limited(&end, -3, &second), Some(second.clone()));
    assert_eq!(chain.index_offset_by_limited(&end, -4, &second), None);
}

#[rstest]
fn test_forward_only_branches_measure_backward_distance() {
    let chain = chain![forward(&[1, 2]), forward(&[]), forward(&[3])];
    let start = chain.start_index();
    let end = chain.end_index();
    assert_eq!(chain.distance(&end, &start), -3);
    let third = chain.index_offset_by(&start, 2);
    assert_eq!(chain.distance(&third, &start), -2);
}

#[rstest]
fn test_forward_only_branches_find_last_element() {
    let chain = chain![forward(&[]), forward(&[5, 6, 7]), forward(&[])];
    assert_eq!(chain.last(), Some(&7));
    assert_eq!(chain.position_for_linear(2), ChainPosition::new(1, 2));

    let updated = chain.with_branch(2, forward(&[8]));
    assert_eq!(updated.last(), Some(&8));
    assert_eq!(chain.last(), Some(&7));
}

#[rstest]
fn test_two_way_branches_traverse_backward() {
    let chain = chain![two_way(&[1]), two_way(&[]), two_way(&[2, 3])];
    let reversed: Vec<_> = chain.iter().rev().copied().collect();
    assert_eq!(reversed, vec![3, 2, 1]);

    let last = chain.index_before(&chain.end_index());
    assert_eq!(last, SentinelIndex::Position(ChainPosition::new(2, 1)));
    let first = chain.index_before(&chain.index_before(&last));
    assert_eq!(first, chain.start_index());
    assert_eq!(chain.index_offset_by(&last, -2), first);
}

// =============================================================================
// Traversal
// =============================================================================

#[rstest]
fn test_traversal_skips_empty_middle_branch() {
    let chain = chain![vec![1, 2], vec![], vec![3]];
    assert_eq!(chain.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
    assert_eq!(chain.len(), 3);

    let two = chain.index_offset_by(&chain.start_index(), 1);
    assert_eq!(chain[two.clone()], 2);
    let three = chain.index_after(&two);
    assert_eq!(chain[three], 3);
}

#[rstest]
fn test_all_empty_branches() {
    let chain: Chain<Vec<i32>> = chain![vec![], vec![], vec![]];
    assert!(chain.is_empty());
    assert_eq!(chain.start_index(), chain.end_index());
    assert_eq!(chain.first(), None);
    assert_eq!(chain.last(), None);
    assert_eq!(chain.min(), None);
    assert_eq!(chain.iter().next(), None);
}

#[rstest]
fn test_no_branches() {
    let chain: Chain<Vec<i32>> = Chain::default();
    assert_eq!(chain.branch_count(), 0);
    assert!(chain.is_empty());
    assert_eq!(chain.start_index(), SentinelIndex::End);
}

#[rstest]
fn test_reverse_traversal_skips_empty_branches() {
    let chain = chain![vec![], vec![1, 2], vec![], vec![3], vec![]];
    let reversed: Vec<_> = chain.iter().rev().copied().collect();
    assert_eq!(reversed, vec![3, 2, 1]);
    assert_eq!(chain.last(), Some(&3));
    assert_eq!(chain.first(), Some(&1));
}

#[rstest]
fn test_iterator_meets_in_the_middle() {
    let chain = chain![vec![1, 2], vec![3], vec![4, 5]];
    let mut iterator = chain.iter();
    assert_eq!(iterator.len(), 5);
    assert_eq!(iterator.next(), Some(&1));
    assert_eq!(iterator.next_back(), Some(&5));
    assert_eq!(iterator.next(), Some(&2));
    assert_eq!(iterator.next_back(), Some(&4));
    assert_eq!(iterator.next(), Some(&3));
    assert_eq!(iterator.next(), None);
    assert_eq!(iterator.next_back(), None);
}

#[rstest]
fn test_mixed_contiguous_branch_types_through_slices() {
    let first = [1, 2];
    let second: VecDeque<i32> = VecDeque::from(vec![3, 4]);
    let chain = chain![
        BoxedBranch::new(first),
        BoxedBranch::new(Vec::<i32>::new()),
        BoxedBranch::new(second),
    ];
    assert_eq!(chain.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3, 4]);
    assert_eq!(chain.max(), Some(&4));
}

// =============================================================================
// Linearization
// =============================================================================

#[rstest]
fn test_position_for_linear_lands_in_later_branch() {
    let chain = chain![vec![10, 20], vec![30]];
    let position = chain.position_for_linear(2);
    assert_eq!(position, ChainPosition::new(1, 0));
    assert_eq!(chain[SentinelIndex::Position(position.clone())], 30);
    assert_eq!(chain.linear_position(&position), 2);
}

#[rstest]
#[case(0, Ok(ChainPosition::new(0, 0)))]
#[case(2, Ok(ChainPosition::new(2, 0)))]
#[case(3, Err(ChainError::OffsetOutOfRange { offset: 3, count: 3 }))]
fn test_try_position_for_linear(
    #[case] offset: usize,
    #[case] expected: Result<ChainPosition<usize>, ChainError>,
) {
    let chain = chain![vec![1, 2], vec![], vec![3]];
    assert_eq!(chain.try_position_for_linear(offset), expected);
}

#[rstest]
fn test_distance_and_offset_agree() {
    let chain = chain![vec![1], vec![], vec![2, 3], vec![4]];
    let start = chain.start_index();
    for distance in 0..=4 {
        let index = chain.index_offset_by(&start, distance);
        assert_eq!(chain.distance(&start, &index), distance);
        assert_eq!(chain.index_offset_by(&index, -distance), start);
    }
}

#[rstest]
#[should_panic(expected = "leaves the valid range")]
fn test_offset_past_end_panics() {
    let chain = chain![vec![1, 2]];
    chain.index_offset_by(&chain.start_index(), 3);
}

// =============================================================================
// Checked Access
// =============================================================================

#[rstest]
fn test_try_get_reports_end_index() {
    let chain = chain![vec![1]];
    assert_eq!(chain.try_get(&chain.start_index()), Ok(&1));
    assert_eq!(chain.try_get(&chain.end_index()), Err(ChainError::EndIndex));
    assert_eq!(chain.get(&chain.end_index()), None);
}

#[rstest]
fn test_try_get_reports_bad_branch() {
    let chain = chain![vec![1]];
    let index = SentinelIndex::Position(ChainPosition::new(5, 0));
    assert_eq!(
        chain.try_get(&index),
        Err(ChainError::BranchOutOfRange {
            position: 5,
            branch_count: 1
        })
    );
}

#[rstest]
fn test_try_get_reports_branch_end() {
    let chain = chain![vec![1], vec![2]];
    let index = SentinelIndex::Position(ChainPosition::new(0, 1));
    assert_eq!(chain.try_get(&index), Err(ChainError::BranchEnd { branch: 0 }));
}

#[rstest]
#[case(ChainPosition::new(0, 5))]
#[case(ChainPosition::new(1, usize::MAX))]
fn test_try_get_rejects_index_past_branch_end(#[case] position: ChainPosition<usize>) {
    let chain = chain![vec![1], vec![2]];
    let index = SentinelIndex::Position(position.clone());
    assert_eq!(
        chain.try_get(&index),
        Err(ChainError::BranchEnd {
            branch: position.branch()
        })
    );
    assert_eq!(chain.get(&index), None);
}

// =============================================================================
// Copy-on-Write
// =============================================================================

#[rstest]
fn test_with_branch_leaves_original_untouched() {
    let original = chain![vec![1, 2], vec![3]];
    let updated = original.with_branch(1, vec![4, 5]);
    assert_eq!(original.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
    assert_eq!(updated.iter().copied().collect::<Vec<_>>(), vec![1, 2, 4, 5]);
    assert_eq!(updated.len(), 4);
    assert!(!original.shares_storage_with(&updated));
}

#[rstest]
fn test_clone_shares_until_mutation() {
    let original = chain![vec![1], vec![2]];
    let mut copy = original.clone();
    assert!(copy.shares_storage_with(&original));
    assert_eq!(copy, original);

    let previous = copy.set_branch(0, vec![]);
    assert_eq!(previous, vec![1]);
    assert!(!copy.shares_storage_with(&original));
    assert_eq!(copy.len(), 1);
    assert_eq!(original.len(), 2);
}

#[rstest]
fn test_mutation_refreshes_every_derived_value() {
    let mut chain = chain![vec![1, 2], vec![3]];
    assert_eq!(chain.len(), 3);
    assert_eq!(chain.last(), Some(&3));
    assert_eq!(chain.position_for_linear(2), ChainPosition::new(1, 0));

    chain.update_branch(0, |branch| branch.clear());
    assert_eq!(chain.len(), 1);
    assert_eq!(chain.first(), Some(&3));
    assert_eq!(chain.start_index(), SentinelIndex::Position(ChainPosition::new(1, 0)));
    assert_eq!(chain.position_for_linear(0), ChainPosition::new(1, 0));

    chain.push_branch(vec![9]);
    assert_eq!(chain.len(), 2);
    assert_eq!(chain.last(), Some(&9));
}

#[rstest]
fn test_try_set_branch_rejects_bad_position() {
    let mut chain = chain![vec![1]];
    assert_eq!(
        chain.try_set_branch(1, vec![2]),
        Err(ChainError::BranchOutOfRange {
            position: 1,
            branch_count: 1
        })
    );
    assert_eq!(chain.len(), 1);
}

#[rstest]
fn test_into_branches_returns_current_branches() {
    let chain = chain![vec![1], vec![2, 3]];
    let shared = chain.clone();
    assert_eq!(chain.into_branches(), vec![vec![1], vec![2, 3]]);
    assert_eq!(shared.into_branches(), vec![vec![1], vec![2, 3]]);
}

// =============================================================================
// Queries
// =============================================================================

#[rstest]
fn test_queries_skip_empty_branches() {
    let chain = chain![vec![5, 9], vec![], vec![-3, 7]];
    assert_eq!(chain.min(), Some(&-3));
    assert_eq!(chain.max(), Some(&9));
    assert!(chain.contains(&7));
    assert!(!chain.contains(&0));
    assert!(chain.contains_where(|element| *element < 0));
}

#[rstest]
fn test_try_contains_where_propagates_error() {
    let chain = chain![vec![1], vec![2]];
    let result: Result<bool, &str> =
        chain.try_contains_where(|element| if *element == 2 { Err("boom") } else { Ok(false) });
    assert_eq!(result, Err("boom"));
}

#[rstest]
fn test_display_and_equality() {
    let left = chain![vec![1, 2], vec![3]];
    let right: Chain<Vec<i32>> = vec![vec![1, 2], vec![3]].into_iter().collect();
    assert_eq!(left, right);
    assert_eq!(left.to_string(), "[1, 2, 3]");

    // Structural equality compares branches, not just elements
    let regrouped = chain![vec![1], vec![2, 3]];
    assert_ne!(left, regrouped);
}

#[rstest]
fn test_chain_of_chains() {
    let inner = chain![vec![1], vec![], vec![2]];
    let outer = chain![inner.clone(), Chain::default(), inner];
    assert_eq!(outer.len(), 4);
    assert_eq!(outer.iter().copied().collect::<Vec<_>>(), vec![1, 2, 1, 2]);
    let reversed: Vec<_> = outer.iter().rev().copied().collect();
    assert_eq!(reversed, vec![2, 1, 2, 1]);
}
