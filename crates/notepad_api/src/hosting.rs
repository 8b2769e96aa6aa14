//! Connection hosting styles for the note handlers.
//!
//! # Responsibility
//! - Give every handler a ready `NoteService` regardless of how the
//!   underlying SQLite connection is obtained.
//! - Run blocking store calls off the async executor.
//!
//! # Invariants
//! - `Shared` serializes all store calls through one connection.
//! - `PerRequest` opens and migrates a fresh connection per call and drops
//!   it when the call returns.
//! - A panic inside a store call is resumed on the request task and never
//!   poisons later calls on the shared connection.

use log::warn;
use notepad_core::db::{open_db, DbError, DbResult};
use notepad_core::{NoteService, NoteServiceError, SqliteNoteRepository};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Arc, Mutex};

/// How request handlers obtain a database connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hosting {
    /// One connection opened at startup and shared by all requests.
    Shared,
    /// A new connection per request, closed when the request ends.
    PerRequest,
}

impl Hosting {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Shared => "shared",
            Self::PerRequest => "per_request",
        }
    }
}

impl FromStr for Hosting {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "shared" => Ok(Self::Shared),
            "per_request" | "per-request" => Ok(Self::PerRequest),
            other => Err(format!(
                "unsupported hosting style `{other}`; expected shared|per_request"
            )),
        }
    }
}

/// Failure to run a store call, before any HTTP mapping.
#[derive(Debug)]
pub enum StoreCallError {
    /// The use-case itself failed.
    Service(NoteServiceError),
    /// A per-request connection could not be opened.
    Open(DbError),
    /// The blocking task was cancelled before completion.
    Cancelled,
}

impl Display for StoreCallError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Service(err) => write!(f, "{err}"),
            Self::Open(err) => write!(f, "failed to open note store: {err}"),
            Self::Cancelled => write!(f, "note store call was cancelled"),
        }
    }
}

impl Error for StoreCallError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Service(err) => Some(err),
            Self::Open(err) => Some(err),
            Self::Cancelled => None,
        }
    }
}

impl From<NoteServiceError> for StoreCallError {
    fn from(value: NoteServiceError) -> Self {
        Self::Service(value)
    }
}

/// Cloneable handle to the note store in one of the hosting styles.
#[derive(Clone)]
pub enum NoteStoreHandle {
    Shared(Arc<Mutex<Connection>>),
    PerRequest(Arc<PathBuf>),
}

impl NoteStoreHandle {
    /// Wraps an already migrated connection for shared hosting.
    pub fn shared(conn: Connection) -> Self {
        Self::Shared(Arc::new(Mutex::new(conn)))
    }

    /// Opens (and migrates) the database file once for shared hosting.
    pub fn open_shared(path: impl AsRef<Path>) -> DbResult<Self> {
        open_db(path).map(Self::shared)
    }

    /// Opens the database file anew for every request.
    pub fn per_request(path: impl Into<PathBuf>) -> Self {
        Self::PerRequest(Arc::new(path.into()))
    }

    /// Builds a handle for the given hosting style over one database file.
    pub fn open(hosting: Hosting, path: impl AsRef<Path>) -> DbResult<Self> {
        match hosting {
            Hosting::Shared => Self::open_shared(path),
            Hosting::PerRequest => {
                // Fail fast on an unusable file instead of on the first request.
                open_db(path.as_ref())?;
                Ok(Self::per_request(path.as_ref()))
            }
        }
    }

    pub fn hosting(&self) -> Hosting {
        match self {
            Self::Shared(_) => Hosting::Shared,
            Self::PerRequest(_) => Hosting::PerRequest,
        }
    }

    /// Runs one use-case against the store on the blocking thread pool.
    pub async fn call<T, F>(&self, f: F) -> Result<T, StoreCallError>
    where
        T: Send + 'static,
        F: FnOnce(&NoteService<SqliteNoteRepository<'_>>) -> Result<T, NoteServiceError>
            + Send
            + 'static,
    {
        let handle = self.clone();
        match tokio::task::spawn_blocking(move || handle.call_blocking(f)).await {
            Ok(result) => result,
            Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
            Err(_) => Err(StoreCallError::Cancelled),
        }
    }

    fn call_blocking<T, F>(&self, f: F) -> Result<T, StoreCallError>
    where
        F: FnOnce(&NoteService<SqliteNoteRepository<'_>>) -> Result<T, NoteServiceError>,
    {
        match self {
            Self::Shared(conn) => {
                let guard = conn.lock().unwrap_or_else(|poisoned| {
                    // SQLite rolls back the unfinished statement of a panicked call.
                    warn!("event=store_lock module=api status=recovered reason=poisoned");
                    poisoned.into_inner()
                });
                run_with_service(&guard, f)
            }
            Self::PerRequest(path) => {
                let conn = open_db(path.as_path()).map_err(StoreCallError::Open)?;
                run_with_service(&conn, f)
            }
        }
    }
}

fn run_with_service<T, F>(conn: &Connection, f: F) -> Result<T, StoreCallError>
where
    F: FnOnce(&NoteService<SqliteNoteRepository<'_>>) -> Result<T, NoteServiceError>,
{
    let repo = SqliteNoteRepository::try_new(conn).map_err(NoteServiceError::from)?;
    Ok(f(&NoteService::new(repo))?)
}

#[cfg(test)]
mod tests {
    use super::{Hosting, NoteStoreHandle, StoreCallError};
    use notepad_core::db::open_db_in_memory;
    use notepad_core::{NoteDraft, NoteServiceError};

    #[test]
    fn hosting_parses_known_styles() {
        assert_eq!("shared".parse::<Hosting>().unwrap(), Hosting::Shared);
        assert_eq!(" Per_Request ".parse::<Hosting>().unwrap(), Hosting::PerRequest);
        assert!("pooled".parse::<Hosting>().is_err());
    }

    #[tokio::test]
    async fn shared_handle_runs_service_calls() {
        let handle = NoteStoreHandle::shared(open_db_in_memory().unwrap());
        let created = handle
            .call(|service| service.create_note(&NoteDraft::new("t", "c")))
            .await
            .unwrap();
        let listed = handle.call(|service| service.list_notes()).await.unwrap();
        assert_eq!(listed, vec![created]);
    }

    #[tokio::test]
    async fn per_request_handle_sees_writes_from_earlier_requests() {
        let dir = tempfile::tempdir().unwrap();
        let handle = NoteStoreHandle::open(Hosting::PerRequest, dir.path().join("notes.db")).unwrap();
        assert_eq!(handle.hosting(), Hosting::PerRequest);

        let created = handle
            .call(|service| service.create_note(&NoteDraft::new("t", "c")))
            .await
            .unwrap();
        let fetched = handle
            .call(move |service| service.get_note(created.id))
            .await
            .unwrap();
        assert_eq!(fetched.title, "t");
    }

    #[tokio::test]
    async fn per_request_handle_reports_open_failure() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be opened as a database file.
        let handle = NoteStoreHandle::per_request(dir.path());
        let err = handle.call(|service| service.list_notes()).await.unwrap_err();
        assert!(matches!(err, StoreCallError::Open(_)));
    }

    #[tokio::test]
    async fn shared_handle_survives_a_panicking_call() {
        let handle = NoteStoreHandle::shared(open_db_in_memory().unwrap());
        let panicking = handle.clone();
        let outcome = tokio::spawn(async move {
            panicking
                .call(|_| -> Result<(), NoteServiceError> { panic!("store call exploded") })
                .await
        })
        .await;
        assert!(outcome.unwrap_err().is_panic());

        let listed = handle.call(|service| service.list_notes()).await.unwrap();
        assert!(listed.is_empty());
    }

    #[tokio::test]
    async fn service_errors_pass_through() {
        let handle = NoteStoreHandle::shared(open_db_in_memory().unwrap());
        let err = handle.call(|service| service.get_note(5)).await.unwrap_err();
        assert!(matches!(
            err,
            StoreCallError::Service(NoteServiceError::NoteNotFound(5))
        ));
    }
}
