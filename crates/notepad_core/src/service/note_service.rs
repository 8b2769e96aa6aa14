//! Note use-case service.
//!
//! # Responsibility
//! - Provide create/get/list/update/delete APIs for transport layers.
//! - Validate drafts before any store call.
//! - Read back written rows so callers receive store-assigned fields.
//!
//! # Invariants
//! - Validation failures never reach the store.
//! - `update_note` uses full title/content replacement semantics.
//! - Unknown ids surface as `NoteServiceError::NoteNotFound`.

use crate::model::note::{Note, NoteDraft, NoteId, NoteValidationError};
use crate::repo::note_repo::{NoteRepository, RepoError};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for note use-cases.
#[derive(Debug)]
pub enum NoteServiceError {
    /// Draft is missing a required field.
    Validation(NoteValidationError),
    /// Target note does not exist.
    NoteNotFound(NoteId),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for NoteServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NoteNotFound(id) => write!(f, "note not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent note state: {details}"),
        }
    }
}

impl Error for NoteServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for NoteServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NoteNotFound(id),
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

impl From<NoteValidationError> for NoteServiceError {
    fn from(value: NoteValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Note service facade over repository implementations.
pub struct NoteService<R: NoteRepository> {
    repo: R,
}

impl<R: NoteRepository> NoteService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists all notes, most recently updated first.
    pub fn list_notes(&self) -> Result<Vec<Note>, NoteServiceError> {
        Ok(self.repo.list_notes()?)
    }

    /// Gets one note by id.
    pub fn get_note(&self, id: NoteId) -> Result<Note, NoteServiceError> {
        self.repo
            .get_note(id)?
            .ok_or(NoteServiceError::NoteNotFound(id))
    }

    /// Creates one note and returns it with assigned id and timestamps.
    pub fn create_note(&self, draft: &NoteDraft) -> Result<Note, NoteServiceError> {
        draft.validate()?;
        let id = self.repo.insert_note(draft)?;
        self.repo
            .get_note(id)?
            .ok_or(NoteServiceError::InconsistentState(
                "created note not found in read-back",
            ))
    }

    /// Replaces title and content of an existing note.
    ///
    /// Validation is checked before existence, so an invalid draft for an
    /// unknown id reports a validation error.
    pub fn update_note(&self, id: NoteId, draft: &NoteDraft) -> Result<Note, NoteServiceError> {
        draft.validate()?;
        self.repo.update_note(id, draft)?;
        // A concurrent delete between write and read-back is reported as
        // not-found rather than an inconsistency.
        self.repo
            .get_note(id)?
            .ok_or(NoteServiceError::NoteNotFound(id))
    }

    /// Hard-deletes one note.
    pub fn delete_note(&self, id: NoteId) -> Result<(), NoteServiceError> {
        Ok(self.repo.delete_note(id)?)
    }
}

#[cfg(test)]
mod tests {
    use super::{NoteService, NoteServiceError};
    use crate::model::note::{Note, NoteDraft, NoteId, NoteValidationError};
    use crate::repo::note_repo::{NoteRepository, RepoError, RepoResult};
    use std::cell::RefCell;

    /// Store that records calls and never persists, for validation paths.
    #[derive(Default)]
    struct RecordingRepo {
        calls: RefCell<Vec<&'static str>>,
    }

    impl NoteRepository for RecordingRepo {
        fn insert_note(&self, _draft: &NoteDraft) -> RepoResult<NoteId> {
            self.calls.borrow_mut().push("insert");
            Ok(1)
        }

        fn get_note(&self, _id: NoteId) -> RepoResult<Option<Note>> {
            self.calls.borrow_mut().push("get");
            Ok(None)
        }

        fn list_notes(&self) -> RepoResult<Vec<Note>> {
            self.calls.borrow_mut().push("list");
            Ok(Vec::new())
        }

        fn update_note(&self, id: NoteId, _draft: &NoteDraft) -> RepoResult<()> {
            self.calls.borrow_mut().push("update");
            Err(RepoError::NotFound(id))
        }

        fn delete_note(&self, id: NoteId) -> RepoResult<()> {
            self.calls.borrow_mut().push("delete");
            Err(RepoError::NotFound(id))
        }
    }

    #[test]
    fn invalid_draft_never_reaches_store() {
        let service = NoteService::new(RecordingRepo::default());

        let create_err = service.create_note(&NoteDraft::new("", "body")).unwrap_err();
        assert!(matches!(
            create_err,
            NoteServiceError::Validation(NoteValidationError::EmptyTitle)
        ));

        let update_err = service
            .update_note(42, &NoteDraft::new("title", ""))
            .unwrap_err();
        assert!(matches!(
            update_err,
            NoteServiceError::Validation(NoteValidationError::EmptyContent)
        ));

        assert!(service.repo.calls.borrow().is_empty());
    }

    #[test]
    fn missing_read_back_after_create_is_inconsistent_state() {
        let service = NoteService::new(RecordingRepo::default());
        let err = service
            .create_note(&NoteDraft::new("title", "body"))
            .unwrap_err();
        assert!(matches!(err, NoteServiceError::InconsistentState(_)));
    }

    #[test]
    fn repo_not_found_maps_to_note_not_found() {
        let service = NoteService::new(RecordingRepo::default());
        assert!(matches!(
            service.delete_note(9),
            Err(NoteServiceError::NoteNotFound(9))
        ));
        assert!(matches!(
            service.get_note(9),
            Err(NoteServiceError::NoteNotFound(9))
        ));
    }
}
