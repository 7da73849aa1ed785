//! Errors reported by the checked chain operations.
//!
//! The unchecked operations treat these conditions as caller bugs and
//! panic. The `try_` variants on [`Chain`](crate::Chain) report them as a
//! [`ChainError`] instead.

use thiserror::Error;

/// Errors from the checked operations of [`Chain`](crate::Chain).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ChainError {
    /// A branch position did not name an existing branch.
    #[error("branch position {position} is out of range for a chain of {branch_count} branches")]
    BranchOutOfRange {
        /// The requested branch position.
        position: usize,
        /// The number of branches in the chain.
        branch_count: usize,
    },
    /// A linear offset did not name an element.
    #[error("linear offset {offset} is out of range for a chain of {count} elements")]
    OffsetOutOfRange {
        /// The requested offset.
        offset: usize,
        /// The number of elements in the chain.
        count: usize,
    },
    /// The end sentinel was used where an element was required.
    #[error("the end index does not refer to an element")]
    EndIndex,
    /// A position pointed at or past the end of its own branch.
    #[error("position lies at or past the end of branch {branch}")]
    BranchEnd {
        /// The branch whose end index was used.
        branch: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_display_messages() {
        assert_eq!(
            ChainError::BranchOutOfRange {
                position: 4,
                branch_count: 2
            }
            .to_string(),
            "branch position 4 is out of range for a chain of 2 branches"
        );
        assert_eq!(
            ChainError::OffsetOutOfRange { offset: 9, count: 3 }.to_string(),
            "linear offset 9 is out of range for a chain of 3 elements"
        );
        assert_eq!(
            ChainError::EndIndex.to_string(),
            "the end index does not refer to an element"
        );
        assert_eq!(
            ChainError::BranchEnd { branch: 1 }.to_string(),
            "position lies at or past the end of branch 1"
        );
    }

    #[rstest]
    fn test_is_std_error() {
        let error: Box<dyn std::error::Error> = Box::new(ChainError::EndIndex);
        assert!(error.source().is_none());
    }
}
