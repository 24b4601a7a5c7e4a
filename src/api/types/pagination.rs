//! Cursor page envelope

use serde::{Deserialize, Serialize};

use crate::domain::pagination::Page;

/// Page metadata; `has_next` is true exactly when `next_cursor` is set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorPageMeta {
    pub next_cursor: Option<String>,
    pub limit: usize,
    pub has_next: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CursorPage<T> {
    pub items: Vec<T>,
    pub page: CursorPageMeta,
}

impl<T> CursorPage<T> {
    /// Build the response envelope from a fetched page
    pub fn from_page<R>(page: Page<R>, limit: usize, f: impl FnMut(R) -> T) -> Self {
        let page = page.map(f);
        let has_next = page.has_next();

        Self {
            items: page.items,
            page: CursorPageMeta {
                next_cursor: page.next_cursor,
                limit,
                has_next,
            },
        }
    }
}
