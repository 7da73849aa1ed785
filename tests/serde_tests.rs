#![cfg(feature = "serde")]

//! Integration tests for serde support in chainweave.
//!
//! A chain serializes as the sequence of its branches, so the branch
//! structure (empty branches included) survives a round trip.

use chainweave::prelude::*;
use rstest::rstest;

// =============================================================================
// Chain Integration Tests
// =============================================================================

#[rstest]
fn test_chain_serializes_as_branches() {
    let chain = chain![vec![1, 2], vec![], vec![3]];
    let json = serde_json::to_string(&chain).unwrap();
    assert_eq!(json, "[[1,2],[],[3]]");
}

#[rstest]
fn test_chain_json_roundtrip() {
    let chain = chain![vec!["a".to_string()], vec![], vec!["b".to_string()]];
    let json = serde_json::to_string(&chain).unwrap();
    let restored: Chain<Vec<String>> = serde_json::from_str(&json).unwrap();
    assert_eq!(chain, restored);
    assert_eq!(restored.len(), 2);
    assert_eq!(restored.last(), Some(&"b".to_string()));
}

#[rstest]
fn test_empty_chain_roundtrip() {
    let chain: Chain<Vec<i32>> = Chain::default();
    let json = serde_json::to_string(&chain).unwrap();
    assert_eq!(json, "[]");
    let restored: Chain<Vec<i32>> = serde_json::from_str(&json).unwrap();
    assert!(restored.is_empty());
    assert_eq!(restored.branch_count(), 0);
}

#[rstest]
fn test_nested_chain_roundtrip() {
    let inner = chain![vec![1], vec![2]];
    let outer = chain![inner.clone(), inner];
    let json = serde_json::to_string(&outer).unwrap();
    assert_eq!(json, "[[[1],[2]],[[1],[2]]]");
    let restored: Chain<Chain<Vec<i32>>> = serde_json::from_str(&json).unwrap();
    assert_eq!(outer, restored);
}

// =============================================================================
// Index Integration Tests
// =============================================================================

#[rstest]
fn test_chain_index_roundtrip() {
    let chain = chain![vec![1, 2], vec![], vec![3]];
    let index = chain.index_offset_by(&chain.start_index(), 2);
    let json = serde_json::to_string(&index).unwrap();
    let restored: ChainIndex<usize> = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, index);
    assert_eq!(chain[restored], 3);

    let end: ChainIndex<usize> = serde_json::from_str(&serde_json::to_string(&chain.end_index()).unwrap()).unwrap();
    assert!(end.is_end());
}

#[rstest]
fn test_interpose_position_roundtrip() {
    let position: InterposeIndex<usize> = SentinelIndex::Position(InterposePosition::Interposition(0, 1));
    let json = serde_json::to_string(&position).unwrap();
    let restored: InterposeIndex<usize> = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, position);

    let endcap: EndcapIndex<usize> = SentinelIndex::Position(EndcapPosition::Outro);
    let json = serde_json::to_string(&endcap).unwrap();
    let restored: EndcapIndex<usize> = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, endcap);
}
