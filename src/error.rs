//! Error types for `degree_btree`.

use alloc::string::String;

/// Convenient result alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;

/// Errors reported by [`BTree`](crate::BTree) and [`Degree`](crate::Degree).
///
/// A missing key is never an error: lookups return [`Option`] and removals return `bool`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The requested minimum degree is below [`Degree::MIN`](crate::Degree::MIN) or above
    /// [`Degree::MAX`](crate::Degree::MAX).
    #[error("invalid B-tree degree {degree}: expected 2 <= t <= usize::MAX / 2")]
    InvalidDegree {
        /// The rejected degree.
        degree: usize,
    },

    /// [`BTree::check_invariants`](crate::BTree::check_invariants) found a structural defect.
    ///
    /// The report lists every violation found, one per line.
    #[error("B-tree invariant violation:\n{report}")]
    InvariantViolation {
        /// Human readable description of each violation.
        report: String,
    },
}
