//! Fingerprint of the query a cursor was minted for

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

/// Sort order used by every keyset page
pub const DEFAULT_SORT: &str = "created_at asc, id asc";

/// Filters that take part in a page's context digest.
///
/// Implementors list every filter field, including unset ones as `null`, so
/// that "not filtering" and "filtering" never share a digest.
pub trait ContextFilters {
    fn context_entries(&self) -> BTreeMap<&'static str, Value>;
}

/// SHA-256 digest over the canonical JSON of `{filters, sort}`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PaginationContext {
    digest: String,
}

impl PaginationContext {
    pub fn new<F: ContextFilters + ?Sized>(sort: &str, filters: &F) -> Self {
        let canonical = canonical_json(sort, filters.context_entries());

        Self {
            digest: hex::encode(Sha256::digest(canonical.as_bytes())),
        }
    }

    /// Lowercase hex digest
    pub fn digest(&self) -> &str {
        &self.digest
    }
}

impl std::fmt::Display for PaginationContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.digest)
    }
}

/// Compact JSON of `{filters, sort}` with keys inserted in sorted order
fn canonical_json(sort: &str, filters: BTreeMap<&'static str, Value>) -> String {
    let filters: Map<String, Value> = filters
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect();

    let mut fingerprint = Map::new();
    fingerprint.insert("filters".to_string(), Value::Object(filters));
    fingerprint.insert("sort".to_string(), Value::from(sort));

    Value::Object(fingerprint).to_string()
}
