//! Keyset query descriptor handed to the data store

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::context::ContextFilters;
use crate::domain::DomainError;

/// Composite sort key `(created_at, id)`; ordering is lexicographic
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub created_at: DateTime<Utc>,
    pub id: i64,
}

impl Position {
    pub fn new(created_at: DateTime<Utc>, id: i64) -> Self {
        Self { created_at, id }
    }
}

/// A row that can be placed on the keyset order
pub trait PageRow {
    fn position(&self) -> Position;
}

/// One page request as the store sees it.
///
/// Stores must return rows strictly after `after` (or from the start when it
/// is `None`), matching `filters`, excluding soft-deleted rows, ordered by
/// `(created_at, id)` ascending and capped at `limit`.
#[derive(Debug, Clone, PartialEq)]
pub struct PageQuery<F> {
    pub after: Option<Position>,
    pub filters: F,
    pub limit: usize,
}

impl<F> PageQuery<F> {
    /// Whether a row at `position` lies past the resume point
    pub fn is_after(&self, position: &Position) -> bool {
        match &self.after {
            Some(after) => position > after,
            None => true,
        }
    }
}

/// Query-executing collaborator for the paginator
#[async_trait]
pub trait PageSource: Send + Sync {
    type Row: PageRow + Send;
    type Filters: ContextFilters + Clone + Send + Sync;

    async fn fetch_page_rows(
        &self,
        query: &PageQuery<Self::Filters>,
    ) -> Result<Vec<Self::Row>, DomainError>;
}
