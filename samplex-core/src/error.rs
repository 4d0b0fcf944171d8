//! Error types for the pivoting kernel.
//!
//! Algorithmic outcomes (optimal, unbounded, ...) are reported through
//! [`PivotStatus`](crate::PivotStatus), never through these errors. The errors
//! below are raised only at the marshaling boundary, when a host hands the
//! kernel buffers that do not satisfy its data contract.

use thiserror::Error;

/// Errors raised when building or validating kernel inputs.
#[derive(Error, Debug)]
pub enum SamplexError {
    /// A buffer does not have the size implied by the tableau shape.
    #[error("Dimension mismatch in {what}: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Which buffer was malformed
        what: &'static str,
        /// Expected length
        expected: usize,
        /// Actual length
        actual: usize,
    },

    /// The same variable id appears more than once in `left ∪ right`.
    #[error("Variable id {0} appears more than once in the basis labels")]
    DuplicateLabel(i32),

    /// The artificial counter does not match the negative labels present.
    #[error("Artificial count mismatch: Z={expected} but {actual} negative labels present")]
    ArtificialCount {
        /// Declared number of artificial variables
        expected: usize,
        /// Number of negative labels actually present
        actual: usize,
    },

    /// More artificial variables than tableau columns.
    #[error("Too many artificial variables: Z={z} exceeds column count R={n_right}")]
    TooManyArtificial {
        /// Declared number of artificial variables
        z: usize,
        /// Number of tableau columns (excluding the RHS column)
        n_right: usize,
    },

    /// A tableau entry is NaN or infinite.
    #[error("Non-finite tableau entry at column {col}, row {row}")]
    NonFinite {
        /// Column index
        col: usize,
        /// Row index
        row: usize,
    },

    /// Settings failed validation.
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    /// The progress monitor thread could not be started.
    #[error("Progress monitor failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for kernel input validation.
pub type SamplexResult<T> = Result<T, SamplexError>;
