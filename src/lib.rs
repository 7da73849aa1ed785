//! # chainweave
//!
//! Chained collections for Rust: present many independently stored branches
//! sharing one element type as a single ordered collection, and splice
//! synthetic gap elements between (and around) the elements of a sequence.
//!
//! ## Overview
//!
//! - **Collection contract**: [`Collection`], [`BidirectionalCollection`] and
//!   [`RandomAccessCollection`] describe ordered containers with comparable
//!   indices. Slices, `Vec`, `VecDeque`, arrays and [`BoxedBranch`] implement
//!   them out of the box.
//! - **Chain**: [`Chain`] concatenates any number of branches. Counts, branch
//!   ranges and boundary positions are memoized and invalidated wholesale
//!   whenever a branch is replaced. Copies share storage until one of them
//!   is mutated (copy-on-write).
//! - **Interpose**: [`InterposeSequence`] yields
//!   `element, interposition, element, ...` and [`EndcapInterposeSequence`]
//!   additionally brackets the result with an intro and an outro.
//!
//! ## Feature Flags
//!
//! - `arc`: share storage through `Arc` and memoize with `OnceLock`, making
//!   chains `Send + Sync`
//! - `serde`: `Serialize`/`Deserialize` for chains and their indices
//! - `full`: Enable all features
//!
//! ## Example
//!
//! ```rust
//! use chainweave::prelude::*;
//!
//! let chain = chain![vec![1, 2], vec![], vec![3]];
//! assert_eq!(chain.len(), 3);
//! assert_eq!(chain.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
//!
//! let updated = chain.with_branch(1, vec![10]);
//! assert_eq!(updated.iter().copied().collect::<Vec<_>>(), vec![1, 2, 10, 3]);
//! assert_eq!(chain.len(), 3); // Original unchanged
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// Re-exports the collection traits and every public collection type.
///
/// # Usage
///
/// ```rust
/// use chainweave::prelude::*;
/// ```
pub mod prelude {
    pub use crate::chain;
    pub use crate::chain::{Chain, ChainIndex, ChainIter, ChainPosition};
    pub use crate::collection::{
        BidirectionalCollection, BoxedBranch, Collection, Elements, RandomAccessCollection,
    };
    pub use crate::error::ChainError;
    pub use crate::index::SentinelIndex;
    pub use crate::interpose::{
        EndcapIndex, EndcapInterposeIter, EndcapInterposeSequence, EndcapPosition, Endcapped,
        InterposeIndex, InterposeIter, InterposePosition, InterposeSequence, Interposed,
    };
    pub use crate::linear::Linearization;
}

pub mod chain;
pub mod collection;
pub mod error;
pub mod index;
pub mod interpose;
pub mod linear;

pub use chain::{Chain, ChainIndex, ChainPosition};
pub use collection::{BidirectionalCollection, BoxedBranch, Collection, RandomAccessCollection};
pub use error::ChainError;
pub use index::SentinelIndex;
pub use interpose::{EndcapInterposeSequence, InterposeSequence};
pub use linear::Linearization;

// =============================================================================
// Reference Counter and Cache Cell Type Aliases
// =============================================================================

/// Reference-counted smart pointer type.
///
/// When the `arc` feature is enabled, this is `std::sync::Arc`,
/// which is thread-safe but has slightly higher overhead.
///
/// When the `arc` feature is disabled (default), this is `std::rc::Rc`,
/// which is faster but not thread-safe.
#[cfg(feature = "arc")]
pub(crate) type ReferenceCounter<T> = std::sync::Arc<T>;

#[cfg(not(feature = "arc"))]
pub(crate) type ReferenceCounter<T> = std::rc::Rc<T>;

/// Write-once memoization cell.
///
/// With the `arc` feature this is `std::sync::OnceLock`, so concurrent first
/// reads of shared storage initialize each cell exactly once. Without it,
/// `std::cell::OnceCell` keeps the storage `!Sync` and the compiler rejects
/// cross-thread sharing altogether.
#[cfg(feature = "arc")]
pub(crate) type CacheCell<T> = std::sync::OnceLock<T>;

#[cfg(not(feature = "arc"))]
pub(crate) type CacheCell<T> = std::cell::OnceCell<T>;

// =============================================================================
// Tests
// =============================================================================
