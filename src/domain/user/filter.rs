//! Search filters for user listings

use std::collections::BTreeMap;

use serde_json::Value;

use super::entity::User;
use crate::domain::pagination::ContextFilters;

/// Substring search on the email column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserFilters {
    search_string: Option<String>,
    search_ignore_case: bool,
}

impl Default for UserFilters {
    fn default() -> Self {
        Self {
            search_string: None,
            search_ignore_case: true,
        }
    }
}

impl UserFilters {
    /// An empty search string means "no search"
    pub fn new(search_string: Option<String>, search_ignore_case: bool) -> Self {
        Self {
            search_string: search_string.filter(|s| !s.is_empty()),
            search_ignore_case,
        }
    }

    pub fn search_string(&self) -> Option<&str> {
        self.search_string.as_deref()
    }

    pub fn search_ignore_case(&self) -> bool {
        self.search_ignore_case
    }

    /// In-process evaluation; stores with a query language translate this to LIKE/ILIKE
    pub fn matches(&self, user: &User) -> bool {
        let Some(needle) = self.search_string.as_deref() else {
            return true;
        };

        if self.search_ignore_case {
            user.email().to_lowercase().contains(&needle.to_lowercase())
        } else {
            user.email().contains(needle)
        }
    }
}

impl ContextFilters for UserFilters {
    fn context_entries(&self) -> BTreeMap<&'static str, Value> {
        BTreeMap::from([
            (
                "search_string",
                self.search_string
                    .as_deref()
                    .map(Value::from)
                    .unwrap_or(Value::Null),
            ),
            ("search_ignore_case", Value::Bool(self.search_ignore_case)),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::pagination::{PaginationContext, DEFAULT_SORT};
    use crate::domain::user::{NewUser, UserId};
    use chrono::Utc;

    fn user(email: &str) -> User {
        User::from_new(
            UserId::new(1).unwrap(),
            NewUser {
                email: email.to_string(),
                password_hash: "hash".to_string(),
                first_name: String::new(),
                last_name: String::new(),
                is_admin: false,
                is_active: true,
            },
            Utc::now(),
        )
    }

    #[test]
    fn test_no_search_matches_everything() {
        assert!(UserFilters::default().matches(&user("a@example.com")));
        assert!(UserFilters::new(Some(String::new()), false).matches(&user("a@example.com")));
    }

    #[test]
    fn test_case_insensitive_search() {
        let filters = UserFilters::new(Some("ALICE".to_string()), true);
        assert!(filters.matches(&user("alice@example.com")));
        assert!(!filters.matches(&user("bob@example.com")));
    }

    #[test]
    fn test_case_sensitive_search() {
        let filters = UserFilters::new(Some("ALICE".to_string()), false);
        assert!(!filters.matches(&user("alice@example.com")));
        assert!(filters.matches(&user("ALICE@example.com")));
    }

    #[test]
    fn test_empty_search_shares_context_with_no_search() {
        let a = PaginationContext::new(DEFAULT_SORT, &UserFilters::new(Some(String::new()), true));
        let b = PaginationContext::new(DEFAULT_SORT, &UserFilters::default());
        assert_eq!(a, b);
    }

    #[test]
    fn test_default_context_digest() {
        let context = PaginationContext::new(DEFAULT_SORT, &UserFilters::default());
        assert_eq!(
            context.digest(),
            "2998514b80d057e4c3471e257c095a110e20ddd9b985c11b7055cbb8eef51a8b"
        );
    }
}
