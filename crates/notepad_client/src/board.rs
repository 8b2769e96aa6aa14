//! Form and list state for a notes UI.
//!
//! # Responsibility
//! - Keep the displayed note list in sync with the server.
//! - Drive create-or-update from one title/content form.
//!
//! # Invariants
//! - `notes` is only ever replaced by a full list fetch.
//! - A failed operation changes `last_error` and nothing else.
//! - A successful operation clears `last_error`.

use crate::client::{ClientError, NotesClient};
use log::{error, info};
use notepad_core::{Note, NoteDraft, NoteId};

#[derive(Debug, Clone)]
pub struct NoteBoard {
    client: NotesClient,
    notes: Vec<Note>,
    title: String,
    content: String,
    editing_id: Option<NoteId>,
    last_error: Option<String>,
}

impl NoteBoard {
    pub fn new(client: NotesClient) -> Self {
        Self {
            client,
            notes: Vec::new(),
            title: String::new(),
            content: String::new(),
            editing_id: None,
            last_error: None,
        }
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn editing_id(&self) -> Option<NoteId> {
        self.editing_id
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    /// Loads `note` into the form; the next submit updates it.
    pub fn begin_edit(&mut self, note: &Note) {
        self.editing_id = Some(note.id);
        self.title = note.title.clone();
        self.content = note.content.clone();
    }

    pub fn cancel_edit(&mut self) {
        self.clear_form();
    }

    /// Replaces the list with the server's current notes.
    pub async fn refresh(&mut self) {
        match self.client.list_notes().await {
            Ok(notes) => {
                self.notes = notes;
                self.last_error = None;
            }
            Err(err) => self.record_failure("board_refresh", err),
        }
    }

    /// Updates the note being edited, or creates a new one.
    ///
    /// On success the form is cleared and the list refreshed.
    pub async fn submit(&mut self) {
        let draft = NoteDraft::new(self.title.clone(), self.content.clone());
        let result = match self.editing_id {
            Some(id) => self.client.update_note(id, &draft).await,
            None => self.client.create_note(&draft).await,
        };

        match result {
            Ok(note) => {
                info!(
                    "event=board_submit module=client status=ok note_id={}",
                    note.id
                );
                self.clear_form();
                self.refresh().await;
            }
            Err(err) => self.record_failure("board_submit", err),
        }
    }

    /// Deletes `id`, then refreshes the list.
    pub async fn delete(&mut self, id: NoteId) {
        match self.client.delete_note(id).await {
            Ok(()) => {
                info!("event=board_delete module=client status=ok note_id={id}");
                self.refresh().await;
            }
            Err(err) => self.record_failure("board_delete", err),
        }
    }

    fn clear_form(&mut self) {
        self.editing_id = None;
        self.title.clear();
        self.content.clear();
    }

    fn record_failure(&mut self, event: &str, err: ClientError) {
        error!("event={event} module=client status=error error={err}");
        self.last_error = Some(err.to_string());
    }
}
