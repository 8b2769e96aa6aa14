//! Core domain logic for the notepad service.
//! This crate owns note invariants, persistence and use-case orchestration.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, normalize_level, LogTarget};
pub use model::note::{Note, NoteDraft, NoteId, NoteValidationError};
pub use repo::note_repo::{NoteRepository, RepoError, RepoResult, SqliteNoteRepository};
pub use service::note_service::{NoteService, NoteServiceError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
