//! Domain layer - Core business logic and entities

pub mod error;
pub mod pagination;
pub mod user;

pub use error::DomainError;
pub use pagination::{CursorCodec, CursorError, CursorPaginator, Page, PaginationError};
pub use user::{NewUser, User, UserFilters, UserId, UserRepository};
