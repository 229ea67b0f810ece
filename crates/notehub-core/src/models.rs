//! Data models for NoteHub.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::defaults;

// =============================================================================
// TAGS
// =============================================================================

/// Fixed category assigned to a note.
///
/// Serialized and parsed with exactly the spelling used in routes and by the
/// NoteHub API (`"Todo"`, `"Work"`, ...).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum NoteTag {
    #[default]
    Todo,
    Work,
    Personal,
    Meeting,
    Shopping,
}

impl NoteTag {
    /// Every tag, in display order.
    pub const ALL: [NoteTag; 5] = [
        NoteTag::Todo,
        NoteTag::Work,
        NoteTag::Personal,
        NoteTag::Meeting,
        NoteTag::Shopping,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Todo => "Todo",
            Self::Work => "Work",
            Self::Personal => "Personal",
            Self::Meeting => "Meeting",
            Self::Shopping => "Shopping",
        }
    }
}

impl std::fmt::Display for NoteTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for NoteTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NoteTag::ALL
            .into_iter()
            .find(|tag| tag.as_str() == s)
            .ok_or_else(|| format!("Invalid note tag: {}", s))
    }
}

// =============================================================================
// NOTES
// =============================================================================

/// A note as returned by the NoteHub API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub tag: NoteTag,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload of the create-note operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateNoteRequest {
    pub title: String,
    pub content: String,
    pub tag: NoteTag,
}

/// Parameters of a notes list read.
///
/// Doubles as the payload of [`crate::QueryKey::Notes`], so two reads with
/// the same parameters share one cache entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotesQuery {
    pub page: u32,
    pub per_page: u32,
    #[serde(default)]
    pub search: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<NoteTag>,
}

impl NotesQuery {
    /// First page of the filter page listing for the given tag.
    pub fn first_page(tag: Option<NoteTag>) -> Self {
        Self {
            page: defaults::FIRST_PAGE,
            per_page: defaults::NOTES_PER_PAGE,
            search: String::new(),
            tag,
        }
    }
}

impl Default for NotesQuery {
    fn default() -> Self {
        Self::first_page(None)
    }
}

/// One page of notes plus pagination metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotesPage {
    pub notes: Vec<Note>,
    pub total_pages: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_tag_roundtrips_through_str() {
        for tag in NoteTag::ALL {
            assert_eq!(tag.as_str().parse::<NoteTag>(), Ok(tag));
            assert_eq!(tag.to_string(), tag.as_str());
        }
    }

    #[test]
    fn test_note_tag_parse_is_case_sensitive() {
        assert!("work".parse::<NoteTag>().is_err());
        assert!("WORK".parse::<NoteTag>().is_err());
        assert!("".parse::<NoteTag>().is_err());
    }

    #[test]
    fn test_note_tag_default_is_todo() {
        assert_eq!(NoteTag::default(), NoteTag::Todo);
    }

    #[test]
    fn test_note_deserializes_from_api_shape() {
        let json = r#"{
            "id": "65ca67e7ae7f10c88b598384",
            "title": "Sprint planning",
            "content": "Agenda for Monday",
            "tag": "Meeting",
            "createdAt": "2024-02-12T18:46:31.000Z",
            "updatedAt": "2024-02-12T18:46:31.000Z"
        }"#;
        let note: Note = serde_json::from_str(json).unwrap();
        assert_eq!(note.id, "65ca67e7ae7f10c88b598384");
        assert_eq!(note.tag, NoteTag::Meeting);
        assert_eq!(note.content, "Agenda for Monday");
    }

    #[test]
    fn test_notes_page_uses_total_pages_field() {
        let page: NotesPage = serde_json::from_str(r#"{"notes":[],"totalPages":4}"#).unwrap();
        assert_eq!(page.total_pages, 4);
        assert!(page.notes.is_empty());
    }

    #[test]
    fn test_first_page_query() {
        let query = NotesQuery::first_page(Some(NoteTag::Work));
        assert_eq!(query.page, 1);
        assert_eq!(query.per_page, 12);
        assert_eq!(query.search, "");
        assert_eq!(query.tag, Some(NoteTag::Work));
    }

    #[test]
    fn test_notes_query_serializes_camel_case() {
        let value = serde_json::to_value(NotesQuery::first_page(None)).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"page": 1, "perPage": 12, "search": ""})
        );
    }
}
