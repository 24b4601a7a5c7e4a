use thiserror::Error;

use crate::domain::DomainError;

/// Why a client-supplied cursor was rejected.
///
/// Messages are deliberately generic: they never echo position data back.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CursorError {
    #[error("Invalid cursor.")]
    Invalid,

    #[error("Cursor does not match request filters.")]
    ContextMismatch,
}

/// Failure of a single page fetch
#[derive(Debug, Error)]
pub enum PaginationError {
    #[error(transparent)]
    Cursor(#[from] CursorError),

    #[error("Page size {requested} is out of range (1..={max})")]
    InvalidPageSize { requested: usize, max: usize },

    #[error(transparent)]
    Storage(#[from] DomainError),
}
