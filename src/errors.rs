//! Submodule defining the errors used across the crate.
//!
//! Differences in the *data* being compared are never errors: missing
//! columns, missing rows and failed sources all end up in the diff verdicts.
//! The variants here only cover misuse of the drivers.

/// Errors that can occur while setting up or driving a diff pass.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A scan was configured with a chunk size of zero rows.
    #[error("Chunk size must be at least one row")]
    InvalidChunkSize,
    /// A batch of results did not carry the expected number of sources.
    #[error("Expected {expected} result sources, got {actual}")]
    SourceCountMismatch {
        /// Number of sources seen in the first batch.
        expected: usize,
        /// Number of sources in the offending batch.
        actual: usize,
    },
}
