//! Error types for record creation and input.

use ringlet_list::ListError;
use ringlet_mm::AllocError;

/// Result type for registry and input operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading or storing records.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("record allocation failed: {0}")]
    Allocation(#[from] AllocError),

    #[error("cannot link record: {0}")]
    Link(#[from] ListError),

    #[error("input is {len} bytes, at most {capacity} allowed")]
    InputTooLong { len: usize, capacity: usize },

    #[error("invalid company id '{0}'")]
    InvalidId(String),

    #[error("input ended before the {0} was read")]
    UnexpectedEof(&'static str),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
