//! Page metadata (title/description) for the notes filter page.

use serde::Serialize;

use crate::defaults::{ALL_SEGMENT, SITE_NAME};

/// Title and description of a rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageMetadata {
    pub title: String,
    pub description: String,
}

impl PageMetadata {
    /// Metadata for `/notes/filter/{segment}`.
    ///
    /// Computed from the raw first segment, not from the resolved tag filter:
    /// an unknown segment still produces category-shaped text even though the
    /// listing itself is unfiltered.
    pub fn for_filter_segment(raw: Option<&str>) -> Self {
        match raw {
            None | Some("") | Some(ALL_SEGMENT) => Self {
                title: format!("All Notes — {}", SITE_NAME),
                description: format!("Browse all notes in {}.", SITE_NAME),
            },
            Some(segment) => Self {
                title: format!("{} Notes — {}", segment, SITE_NAME),
                description: format!(
                    "Browse notes from the \"{}\" category in {}.",
                    segment, SITE_NAME
                ),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_metadata() {
        let meta = PageMetadata::for_filter_segment(Some("All"));
        assert_eq!(meta.title, "All Notes — NoteHub");
        assert_eq!(meta.description, "Browse all notes in NoteHub.");
        assert_eq!(PageMetadata::for_filter_segment(None), meta);
    }

    #[test]
    fn test_tag_metadata() {
        let meta = PageMetadata::for_filter_segment(Some("Work"));
        assert_eq!(meta.title, "Work Notes — NoteHub");
        assert_eq!(
            meta.description,
            "Browse notes from the \"Work\" category in NoteHub."
        );
    }

    #[test]
    fn test_unknown_segment_still_produces_category_text() {
        let meta = PageMetadata::for_filter_segment(Some("Bogus"));
        assert_eq!(meta.title, "Bogus Notes — NoteHub");
    }
}
