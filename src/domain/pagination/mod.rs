//! Cursor pagination
//!
//! Pages are ordered by the composite key `(created_at, id)` and resumed
//! from an HMAC-signed cursor bound to the sort order and filters it was
//! minted under. A cursor replayed against a different query is rejected
//! rather than silently reinterpreted.

mod codec;
mod context;
mod error;
mod paginator;
mod query;

pub use codec::CursorCodec;
pub use context::{ContextFilters, PaginationContext, DEFAULT_SORT};
pub use error::{CursorError, PaginationError};
pub use paginator::{CursorPaginator, CursorPayload, Page, PageSizeLimits, CURSOR_VERSION};
pub use query::{PageQuery, PageRow, PageSource, Position};
