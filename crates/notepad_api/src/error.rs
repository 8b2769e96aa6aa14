//! HTTP error mapping for note handlers.
//!
//! # Responsibility
//! - Convert store/service failures into status codes and JSON bodies.
//! - Log internal causes without returning them to callers.
//!
//! # Invariants
//! - Every error body has the shape `{"error": "<message>"}`.
//! - 500 responses carry only the per-operation generic message.

use crate::hosting::StoreCallError;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::{error, warn};
use notepad_core::{NoteServiceError, NoteValidationError};
use std::any::Any;

pub const REQUIRED_FIELDS_MESSAGE: &str = "Title and content are required";
pub const NOT_FOUND_MESSAGE: &str = "Note not found";
pub const PANIC_MESSAGE: &str = "Something went wrong!";

/// The REST operation a failure happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteOperation {
    List,
    Get,
    Create,
    Update,
    Delete,
}

impl NoteOperation {
    /// Log event name for this operation.
    pub fn event(self) -> &'static str {
        match self {
            Self::List => "note_list",
            Self::Get => "note_get",
            Self::Create => "note_create",
            Self::Update => "note_update",
            Self::Delete => "note_delete",
        }
    }

    fn failure_message(self) -> &'static str {
        match self {
            Self::List => "Failed to fetch notes",
            Self::Get => "Failed to fetch note",
            Self::Create => "Failed to create note",
            Self::Update => "Failed to update note",
            Self::Delete => "Failed to delete note",
        }
    }
}

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound,
    Internal {
        operation: NoteOperation,
        cause: String,
    },
}

impl ApiError {
    /// Maps a failed store call in `operation` to its HTTP error.
    pub fn from_store(operation: NoteOperation, err: StoreCallError) -> Self {
        match err {
            StoreCallError::Service(NoteServiceError::Validation(_)) => {
                Self::BadRequest(REQUIRED_FIELDS_MESSAGE.to_string())
            }
            StoreCallError::Service(NoteServiceError::NoteNotFound(_)) => Self::NotFound,
            other => Self::Internal {
                operation,
                cause: other.to_string(),
            },
        }
    }

    /// Maps a body that could not be read as note JSON.
    pub fn from_json_rejection(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<NoteValidationError> for ApiError {
    fn from(_: NoteValidationError) -> Self {
        Self::BadRequest(REQUIRED_FIELDS_MESSAGE.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(message) => {
                warn!("event=request_rejected module=api status=error http_status=400 reason={message}");
                (StatusCode::BAD_REQUEST, message)
            }
            Self::NotFound => (StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE.to_string()),
            Self::Internal { operation, cause } => {
                error!(
                    "event={} module=api status=error http_status=500 error={}",
                    operation.event(),
                    cause
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    operation.failure_message().to_string(),
                )
            }
        };

        error_response(status, message)
    }
}

/// Builds the JSON error response used for every failure.
pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    let body = Json(serde_json::json!({
        "error": message.into(),
    }));
    (status, body).into_response()
}

/// Converts a caught handler panic into a generic 500.
pub fn panic_response(_payload: Box<dyn Any + Send + 'static>) -> Response {
    // The panic hook installed by logging has already recorded the payload.
    error!("event=handler_panic module=api status=error http_status=500");
    error_response(StatusCode::INTERNAL_SERVER_ERROR, PANIC_MESSAGE)
}
