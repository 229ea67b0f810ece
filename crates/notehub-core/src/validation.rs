//! Note form validation schema.
//!
//! Form values arrive as raw strings (the tag included, so an unknown tag can
//! be reported instead of failing deserialization). [`NoteSchema`] checks them
//! and produces either a [`CreateNoteRequest`] or per-field error messages.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::defaults::{CONTENT_MAX_CHARS, TITLE_MAX_CHARS, TITLE_MIN_CHARS};
use crate::models::{CreateNoteRequest, NoteTag};

/// Raw values of the note form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteFormValues {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub tag: String,
}

impl Default for NoteFormValues {
    fn default() -> Self {
        Self {
            title: String::new(),
            content: String::new(),
            tag: NoteTag::default().to_string(),
        }
    }
}

/// A field of the note form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormField {
    Title,
    Content,
    Tag,
}

impl FormField {
    pub const ALL: [FormField; 3] = [FormField::Title, FormField::Content, FormField::Tag];
}

/// Validation messages keyed by field. Empty means valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors(BTreeMap<FormField, String>);

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: FormField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn insert(&mut self, field: FormField, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn remove(&mut self, field: FormField) {
        self.0.remove(&field);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// The note creation schema.
///
/// - title: required, 3 to 50 characters
/// - content: optional, at most 500 characters
/// - tag: required, one of [`NoteTag::ALL`]
pub struct NoteSchema;

impl NoteSchema {
    /// Validate one field, returning its error message if any.
    pub fn validate_field(field: FormField, values: &NoteFormValues) -> Option<String> {
        match field {
            FormField::Title => {
                let len = values.title.chars().count();
                if len == 0 {
                    Some("Title is a required field".to_string())
                } else if len < TITLE_MIN_CHARS {
                    Some(format!(
                        "The title must be at least {} characters long.",
                        TITLE_MIN_CHARS
                    ))
                } else if len > TITLE_MAX_CHARS {
                    Some(format!(
                        "The title should be no longer than {} characters.",
                        TITLE_MAX_CHARS
                    ))
                } else {
                    None
                }
            }
            FormField::Content => (values.content.chars().count() > CONTENT_MAX_CHARS).then(|| {
                format!(
                    "Content must be no more than {} characters.",
                    CONTENT_MAX_CHARS
                )
            }),
            FormField::Tag => {
                if values.tag.is_empty() {
                    Some("Tag is a required field.".to_string())
                } else if values.tag.parse::<NoteTag>().is_err() {
                    Some("Invalid tag".to_string())
                } else {
                    None
                }
            }
        }
    }

    /// Validate every field.
    pub fn errors(values: &NoteFormValues) -> FieldErrors {
        let mut errors = FieldErrors::default();
        for field in FormField::ALL {
            if let Some(message) = Self::validate_field(field, values) {
                errors.insert(field, message);
            }
        }
        errors
    }

    /// Validate and convert into a create payload.
    pub fn validate(values: &NoteFormValues) -> Result<CreateNoteRequest, FieldErrors> {
        let errors = Self::errors(values);
        if !errors.is_empty() {
            return Err(errors);
        }
        let tag = values.tag.parse::<NoteTag>().map_err(|e| {
            let mut errors = FieldErrors::default();
            errors.insert(FormField::Tag, e);
            errors
        })?;
        Ok(CreateNoteRequest {
            title: values.title.clone(),
            content: values.content.clone(),
            tag,
        })
    }
}
