//! Typed HTTP client for the notes API.
//!
//! # Responsibility
//! - Map each REST operation to one async method.
//! - Surface server error bodies as `ClientError::Api`.
//!
//! # Invariants
//! - Non-success statuses never decode as a note payload.

use log::debug;
use notepad_core::{Note, NoteDraft, NoteId};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug)]
pub enum ClientError {
    /// Transport or decoding failure.
    Http(reqwest::Error),
    /// The server answered with a non-success status.
    Api { status: StatusCode, message: String },
}

impl Display for ClientError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http(err) => write!(f, "request failed: {err}"),
            Self::Api { status, message } => write!(f, "server returned {status}: {message}"),
        }
    }
}

impl Error for ClientError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Http(err) => Some(err),
            Self::Api { .. } => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(value: reqwest::Error) -> Self {
        Self::Http(value)
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Clone)]
pub struct NotesClient {
    http: Client,
    base_url: String,
}

impl NotesClient {
    /// Creates a client for a server root such as `http://localhost:3001`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn list_notes(&self) -> ClientResult<Vec<Note>> {
        let response = self.http.get(self.notes_url()).send().await?;
        Ok(check(response).await?.json().await?)
    }

    pub async fn get_note(&self, id: NoteId) -> ClientResult<Note> {
        let response = self.http.get(self.note_url(id)).send().await?;
        Ok(check(response).await?.json().await?)
    }

    pub async fn create_note(&self, draft: &NoteDraft) -> ClientResult<Note> {
        let response = self
            .http
            .post(self.notes_url())
            .json(draft)
            .send()
            .await?;
        let note: Note = check(response).await?.json().await?;
        debug!("event=client_create module=client status=ok note_id={}", note.id);
        Ok(note)
    }

    pub async fn update_note(&self, id: NoteId, draft: &NoteDraft) -> ClientResult<Note> {
        let response = self.http.put(self.note_url(id)).json(draft).send().await?;
        Ok(check(response).await?.json().await?)
    }

    pub async fn delete_note(&self, id: NoteId) -> ClientResult<()> {
        let response = self.http.delete(self.note_url(id)).send().await?;
        check(response).await?;
        Ok(())
    }

    fn notes_url(&self) -> String {
        format!("{}/api/notes", self.base_url)
    }

    fn note_url(&self, id: NoteId) -> String {
        format!("{}/api/notes/{id}", self.base_url)
    }
}

/// Passes success responses through and turns the rest into `ClientError::Api`.
async fn check(response: Response) -> ClientResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .map(|body| body.error)
        .unwrap_or(text);
    Err(ClientError::Api { status, message })
}

#[cfg(test)]
mod tests {
    use super::{ClientError, NotesClient};
    use reqwest::StatusCode;

    #[test]
    fn base_url_drops_trailing_slash() {
        let client = NotesClient::new("http://localhost:3001/");
        assert_eq!(client.base_url(), "http://localhost:3001");
        assert_eq!(client.note_url(7), "http://localhost:3001/api/notes/7");
    }

    #[test]
    fn api_error_display_includes_status_and_message() {
        let err = ClientError::Api {
            status: StatusCode::NOT_FOUND,
            message: "Note not found".to_string(),
        };
        assert_eq!(err.to_string(), "server returned 404 Not Found: Note not found");
    }
}
