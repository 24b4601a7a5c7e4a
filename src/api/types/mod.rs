//! Request and response types shared by the HTTP handlers

pub mod error;
pub mod extract;
pub mod pagination;
pub mod user;

pub use error::{ApiError, ApiErrorResponse};
pub use extract::{Json, Path, Query};
pub use pagination::{CursorPage, CursorPageMeta};
pub use user::{
    DeleteResponse, LoginRequest, LoginResponse, RegisterBody, UpdateUserBody, UserResponse,
};
