//! Client side of the notepad service.
//!
//! # Responsibility
//! - Talk to the notes REST API with typed requests (`NotesClient`).
//! - Hold form and list state for a notes UI (`NoteBoard`).

pub mod board;
pub mod client;

pub use board::NoteBoard;
pub use client::{ClientError, ClientResult, NotesClient};
