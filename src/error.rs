//! Error and Result types of the crate

use thiserror::Error;

/// Errors reported by [`ProbingTable`](crate::ProbingTable) operations.
///
/// A missing key is not an error: lookups and removals report it as `None`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbingError {
    /// An argument was rejected before any slot was touched.
    #[error("{0}")]
    InvalidArgument(&'static str),
    /// The slot array could not grow to the requested number of slots.
    #[error("cannot allocate a table of {requested} slots")]
    CapacityExhausted {
        /// The slot count that could not be allocated
        requested: usize,
    },
}

/// Result type of the fallible table operations
pub type Result<T> = std::result::Result<T, ProbingError>;
