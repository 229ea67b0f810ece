//! Route tag mapping for the notes filter page.
//!
//! `/notes/filter/{segment}` carries either a tag name or the literal `All`.
//! Parsing is total: anything that is not a known tag means "no filter".

use serde::{Deserialize, Serialize};

use crate::defaults::ALL_SEGMENT;
use crate::models::NoteTag;

/// Tag filter resolved from the filter route.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TagFilter {
    #[default]
    NoFilter,
    Tag(NoteTag),
}

impl TagFilter {
    /// Resolve the filter from the route's path segments.
    ///
    /// Only the first segment is considered. Absent, empty or `All` yields
    /// [`TagFilter::NoFilter`], as does an unrecognized segment.
    pub fn from_segments<S: AsRef<str>>(segments: Option<&[S]>) -> Self {
        let raw = segments.and_then(|s| s.first()).map(AsRef::as_ref);
        Self::from_segment(raw)
    }

    /// Resolve the filter from a single optional segment.
    pub fn from_segment(raw: Option<&str>) -> Self {
        match raw {
            None | Some("") | Some(ALL_SEGMENT) => TagFilter::NoFilter,
            Some(raw) => raw.parse().map(TagFilter::Tag).unwrap_or(TagFilter::NoFilter),
        }
    }

    /// The tag to send with a notes read, if any.
    pub fn as_tag(&self) -> Option<NoteTag> {
        match self {
            TagFilter::NoFilter => None,
            TagFilter::Tag(tag) => Some(*tag),
        }
    }
}

impl From<Option<NoteTag>> for TagFilter {
    fn from(tag: Option<NoteTag>) -> Self {
        tag.map(TagFilter::Tag).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segs(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_every_known_tag_maps_to_itself() {
        for tag in NoteTag::ALL {
            let segments = segs(&[tag.as_str()]);
            assert_eq!(
                TagFilter::from_segments(Some(segments.as_slice())),
                TagFilter::Tag(tag)
            );
        }
    }

    #[test]
    fn test_all_segment_means_no_filter() {
        let segments = segs(&["All"]);
        assert_eq!(
            TagFilter::from_segments(Some(segments.as_slice())),
            TagFilter::NoFilter
        );
    }

    #[test]
    fn test_absent_or_empty_means_no_filter() {
        assert_eq!(TagFilter::from_segments::<String>(None), TagFilter::NoFilter);
        let empty: Vec<String> = Vec::new();
        assert_eq!(
            TagFilter::from_segments(Some(empty.as_slice())),
            TagFilter::NoFilter
        );
        assert_eq!(TagFilter::from_segment(Some("")), TagFilter::NoFilter);
    }

    #[test]
    fn test_unknown_segment_silently_means_no_filter() {
        for raw in ["Bogus", "work", "ALL", "Todo ", "%20"] {
            assert_eq!(TagFilter::from_segment(Some(raw)), TagFilter::NoFilter, "{raw}");
        }
    }

    #[test]
    fn test_only_first_segment_counts() {
        let segments = segs(&["Work", "Personal"]);
        assert_eq!(
            TagFilter::from_segments(Some(segments.as_slice())),
            TagFilter::Tag(NoteTag::Work)
        );

        let segments = segs(&["Bogus", "Work"]);
        assert_eq!(
            TagFilter::from_segments(Some(segments.as_slice())),
            TagFilter::NoFilter
        );
    }

    #[test]
    fn test_as_tag() {
        assert_eq!(TagFilter::NoFilter.as_tag(), None);
        assert_eq!(TagFilter::Tag(NoteTag::Shopping).as_tag(), Some(NoteTag::Shopping));
        assert_eq!(TagFilter::from(Some(NoteTag::Todo)), TagFilter::Tag(NoteTag::Todo));
        assert_eq!(TagFilter::from(None), TagFilter::NoFilter);
    }
}
