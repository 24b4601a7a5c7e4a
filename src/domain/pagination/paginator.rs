//! Forward-only keyset pagination over a concurrently written store

use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};
use tracing::debug;

use super::codec::{CursorCodec, CONTEXT_HASH_KEY};
use super::context::{PaginationContext, DEFAULT_SORT};
use super::error::{CursorError, PaginationError};
use super::query::{PageQuery, PageRow, PageSource, Position};

/// Version tag written into every cursor
pub const CURSOR_VERSION: u64 = 1;

const VERSION_KEY: &str = "v";
const LAST_ID_KEY: &str = "last_id";
const LAST_CREATED_AT_KEY: &str = "last_created_at";

/// Page size bounds applied by the paginator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSizeLimits {
    pub default_page_size: usize,
    pub max_page_size: usize,
}

impl Default for PageSizeLimits {
    fn default() -> Self {
        Self {
            default_page_size: 20,
            max_page_size: 100,
        }
    }
}

/// Typed contents of a cursor
#[derive(Debug, Clone, PartialEq)]
pub struct CursorPayload {
    pub version: u64,
    pub context_hash: String,
    pub position: Position,
}

impl CursorPayload {
    pub fn new(context: &PaginationContext, position: Position) -> Self {
        Self {
            version: CURSOR_VERSION,
            context_hash: context.digest().to_string(),
            position,
        }
    }

    pub fn to_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert(VERSION_KEY.to_string(), Value::from(self.version));
        map.insert(CONTEXT_HASH_KEY.to_string(), Value::from(self.context_hash.clone()));
        map.insert(LAST_ID_KEY.to_string(), Value::from(self.position.id));
        map.insert(
            LAST_CREATED_AT_KEY.to_string(),
            Value::from(
                self.position
                    .created_at
                    .to_rfc3339_opts(SecondsFormat::AutoSi, true),
            ),
        );
        map
    }

    /// Extract typed fields from a verified payload
    ///
    /// `last_created_at` must be an RFC 3339 timestamp with an explicit
    /// offset, which is what `to_map` writes; other ISO-8601 forms are invalid.
    pub fn from_map(map: &Map<String, Value>) -> Result<Self, CursorError> {
        let version = map
            .get(VERSION_KEY)
            .and_then(Value::as_u64)
            .filter(|v| *v == CURSOR_VERSION)
            .ok_or(CursorError::Invalid)?;

        let context_hash = map
            .get(CONTEXT_HASH_KEY)
            .and_then(Value::as_str)
            .ok_or(CursorError::Invalid)?
            .to_string();

        let id = map
            .get(LAST_ID_KEY)
            .and_then(Value::as_i64)
            .filter(|id| *id >= 0)
            .ok_or(CursorError::Invalid)?;

        let created_at = map
            .get(LAST_CREATED_AT_KEY)
            .and_then(Value::as_str)
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|ts| ts.with_timezone(&Utc))
            .ok_or(CursorError::Invalid)?;

        Ok(Self {
            version,
            context_hash,
            position: Position::new(created_at, id),
        })
    }
}

/// One page of rows plus the cursor for the next one
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_cursor: Option<String>,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.next_cursor.is_some()
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            next_cursor: self.next_cursor,
        }
    }
}

/// Stateless cursor paginator; all resume state lives in the cursor
pub struct CursorPaginator<S: PageSource + ?Sized> {
    source: Arc<S>,
    codec: CursorCodec,
    limits: PageSizeLimits,
}

impl<S: PageSource + ?Sized> std::fmt::Debug for CursorPaginator<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CursorPaginator")
            .field("codec", &self.codec)
            .field("limits", &self.limits)
            .finish()
    }
}

impl<S: PageSource + ?Sized> CursorPaginator<S> {
    pub fn new(source: Arc<S>, codec: CursorCodec) -> Self {
        Self {
            source,
            codec,
            limits: PageSizeLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: PageSizeLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn limits(&self) -> PageSizeLimits {
        self.limits
    }

    /// Apply the default to a missing page size and reject out-of-range ones
    pub fn resolve_page_size(&self, requested: Option<usize>) -> Result<usize, PaginationError> {
        let page_size = requested.unwrap_or(self.limits.default_page_size);

        if page_size == 0 || page_size > self.limits.max_page_size {
            return Err(PaginationError::InvalidPageSize {
                requested: page_size,
                max: self.limits.max_page_size,
            });
        }

        Ok(page_size)
    }

    /// Fetch the page following `cursor` (or the first page)
    pub async fn fetch_page(
        &self,
        cursor: Option<&str>,
        page_size: usize,
        filters: S::Filters,
    ) -> Result<Page<S::Row>, PaginationError> {
        let page_size = self.resolve_page_size(Some(page_size))?;
        let context = PaginationContext::new(DEFAULT_SORT, &filters);

        let after = match cursor {
            Some(cursor) => {
                let map = self.codec.decode(cursor, context.digest())?;
                Some(CursorPayload::from_map(&map)?.position)
            }
            None => None,
        };

        let query = PageQuery {
            after,
            filters,
            limit: page_size + 1,
        };
        let mut rows = self.source.fetch_page_rows(&query).await?;

        let has_next = rows.len() > page_size;
        rows.truncate(page_size);

        let next_cursor = match rows.last() {
            Some(last) if has_next => {
                let payload = CursorPayload::new(&context, last.position());
                Some(self.codec.encode(&payload.to_map()))
            }
            _ => None,
        };

        debug!(
            page_size,
            returned = rows.len(),
            has_next,
            resumed = query.after.is_some(),
            "Fetched page"
        );

        Ok(Page {
            items: rows,
            next_cursor,
        })
    }
}
