//! Error taxonomy for the LRPT receive pipeline
//!
//! All fallible core operations return [`LrptResult`]. DSP `apply()` calls
//! that are total given a well-formed state return bare values, never a
//! `Result`.

use thiserror::Error;

/// Errors raised at allocation, caller-contract, or file-I/O boundaries.
#[derive(Debug, Error)]
pub enum LrptError {
    /// Memory allocation failed.
    #[error("allocation failed")]
    Alloc,

    /// Caller passed a null/zero-length/out-of-range/mismatched argument.
    #[error("invalid parameter: {0}")]
    InvalidParam(String),

    /// The container passed in is structurally corrupt.
    #[error("invalid object: {0}")]
    InvalidObject(String),

    /// Source is empty, or the requested slice is zero-length.
    #[error("no data available")]
    NoData,

    /// A ring `push` would overflow its capacity.
    #[error("ring buffer has no space for {requested} samples ({available} available)")]
    NoSpace { requested: usize, available: usize },

    /// File format version or mode not recognised.
    #[error("unsupported format version {0}")]
    Unsupported(u8),

    /// Boundary I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Boundary data is not bit-valid for its declared format.
    #[error("data corrupt: {0}")]
    DataCorrupt(String),
}

/// Result alias used throughout the crate.
pub type LrptResult<T> = Result<T, LrptError>;
