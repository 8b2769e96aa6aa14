//! Note domain model.
//!
//! # Responsibility
//! - Define the persisted `Note` record and its JSON shape.
//! - Define `NoteDraft`, the caller-supplied part of a note.
//!
//! # Invariants
//! - `id` is assigned by the store and never reused for another note.
//! - `title` and `content` are non-empty for every persisted note.
//! - `updated_at >= created_at`.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned note identifier.
pub type NoteId = i64;

/// Persisted note as returned by the store and the HTTP API.
///
/// Timestamps are Unix epoch milliseconds assigned by SQLite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub content: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Note {
    /// Checks the invariants every persisted note must hold.
    pub fn validate(&self) -> Result<(), NoteValidationError> {
        validate_fields(&self.title, &self.content)?;
        if self.updated_at < self.created_at {
            return Err(NoteValidationError::UpdatedBeforeCreated {
                created_at: self.created_at,
                updated_at: self.updated_at,
            });
        }
        Ok(())
    }
}

/// Caller-supplied fields for create and full-replacement update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
}

impl NoteDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }

    /// Rejects drafts with an empty title or content.
    ///
    /// Whitespace counts as content; only the empty string is rejected.
    pub fn validate(&self) -> Result<(), NoteValidationError> {
        validate_fields(&self.title, &self.content)
    }
}

/// Invariant violation for note fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteValidationError {
    EmptyTitle,
    EmptyContent,
    UpdatedBeforeCreated { created_at: i64, updated_at: i64 },
}

impl Display for NoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "note title must not be empty"),
            Self::EmptyContent => write!(f, "note content must not be empty"),
            Self::UpdatedBeforeCreated {
                created_at,
                updated_at,
            } => write!(
                f,
                "note updated_at {updated_at} is earlier than created_at {created_at}"
            ),
        }
    }
}

impl Error for NoteValidationError {}

fn validate_fields(title: &str, content: &str) -> Result<(), NoteValidationError> {
    if title.is_empty() {
        return Err(NoteValidationError::EmptyTitle);
    }
    if content.is_empty() {
        return Err(NoteValidationError::EmptyContent);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{Note, NoteDraft, NoteValidationError};

    #[test]
    fn draft_requires_title_and_content() {
        assert_eq!(
            NoteDraft::new("", "body").validate(),
            Err(NoteValidationError::EmptyTitle)
        );
        assert_eq!(
            NoteDraft::new("title", "").validate(),
            Err(NoteValidationError::EmptyContent)
        );
        assert!(NoteDraft::new(" ", " ").validate().is_ok());
    }

    #[test]
    fn note_rejects_update_before_create() {
        let note = Note {
            id: 1,
            title: "t".to_string(),
            content: "c".to_string(),
            created_at: 2_000,
            updated_at: 1_000,
        };
        assert!(matches!(
            note.validate(),
            Err(NoteValidationError::UpdatedBeforeCreated { .. })
        ));
    }

    #[test]
    fn note_serializes_with_snake_case_timestamps() {
        let note = Note {
            id: 7,
            title: "title".to_string(),
            content: "content".to_string(),
            created_at: 1_000,
            updated_at: 1_000,
        };
        let value = serde_json::to_value(&note).expect("note should serialize");
        assert_eq!(value["id"], 7);
        assert_eq!(value["created_at"], 1_000);
        assert_eq!(value["updated_at"], 1_000);
    }
}
