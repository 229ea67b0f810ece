//! Value-typed query cache keys.
//!
//! A [`QueryKey`] addresses exactly one cached result set. Keys compare and
//! hash structurally, so two semantically equal requests always share a cache
//! entry, and any differing field yields a distinct entry.

use serde::{Deserialize, Serialize};

use crate::models::NotesQuery;

/// Key prefix used for invalidation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryScope {
    Notes,
}

impl std::fmt::Display for QueryScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Notes => write!(f, "notes"),
        }
    }
}

/// Structured identifier of one cached query result.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryKey {
    Notes(NotesQuery),
}

impl QueryKey {
    pub fn notes(query: NotesQuery) -> Self {
        QueryKey::Notes(query)
    }

    /// The invalidation prefix this key belongs to.
    pub fn scope(&self) -> QueryScope {
        match self {
            QueryKey::Notes(_) => QueryScope::Notes,
        }
    }
}

impl std::fmt::Display for QueryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryKey::Notes(q) => write!(
                f,
                "notes[page={},perPage={},search={:?},tag={}]",
                q.page,
                q.per_page,
                q.search,
                q.tag.map(|t| t.as_str()).unwrap_or("-")
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NoteTag;
    use std::collections::HashSet;

    #[test]
    fn test_equal_parameters_share_a_key() {
        let a = QueryKey::notes(NotesQuery::first_page(Some(NoteTag::Work)));
        let b = QueryKey::notes(NotesQuery {
            page: 1,
            per_page: 12,
            search: String::new(),
            tag: Some(NoteTag::Work),
        });
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(!set.insert(b));
    }

    #[test]
    fn test_any_field_difference_is_a_distinct_key() {
        let base = NotesQuery::first_page(Some(NoteTag::Work));
        let variants = [
            NotesQuery { page: 2, ..base.clone() },
            NotesQuery { per_page: 24, ..base.clone() },
            NotesQuery { search: "plan".into(), ..base.clone() },
            NotesQuery { tag: None, ..base.clone() },
            NotesQuery { tag: Some(NoteTag::Todo), ..base.clone() },
        ];

        let mut set = HashSet::new();
        set.insert(QueryKey::notes(base));
        for v in variants {
            assert!(set.insert(QueryKey::notes(v)));
        }
        assert_eq!(set.len(), 6);
    }

    #[test]
    fn test_scope() {
        let key = QueryKey::notes(NotesQuery::default());
        assert_eq!(key.scope(), QueryScope::Notes);
        assert_eq!(QueryScope::Notes.to_string(), "notes");
    }

    #[test]
    fn test_serialized_shape() {
        let key = QueryKey::notes(NotesQuery::first_page(Some(NoteTag::Work)));
        let value = serde_json::to_value(&key).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"notes": {"page": 1, "perPage": 12, "search": "", "tag": "Work"}})
        );
        let back: QueryKey = serde_json::from_value(value).unwrap();
        assert_eq!(back, key);
    }

    #[test]
    fn test_display() {
        let key = QueryKey::notes(NotesQuery::first_page(None));
        assert_eq!(key.to_string(), "notes[page=1,perPage=12,search=\"\",tag=-]");
    }
}
