//! Note repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide insert/get/list/update/delete over the `notes` table.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Write paths validate the draft before SQL mutations.
//! - Read paths reject rows that break note invariants instead of masking them.
//! - List order is `updated_at DESC, id DESC`.
//! - `updated_at` never moves below `created_at`.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::note::{Note, NoteDraft, NoteId, NoteValidationError};
use log::debug;
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

const NOTE_SELECT_SQL: &str = "SELECT
    id,
    title,
    content,
    created_at,
    updated_at
FROM notes";

const REQUIRED_NOTE_COLUMNS: [&str; 5] = ["id", "title", "content", "created_at", "updated_at"];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for note persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(NoteValidationError),
    Db(DbError),
    NotFound(NoteId),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "note not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted note data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; open it with open_db first"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<NoteValidationError> for RepoError {
    fn from(value: NoteValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for note persistence.
///
/// Implementations own identity assignment and timestamps.
pub trait NoteRepository {
    /// Inserts a new note and returns its assigned id.
    fn insert_note(&self, draft: &NoteDraft) -> RepoResult<NoteId>;
    /// Gets one note by id.
    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>>;
    /// Lists all notes, most recently updated first.
    fn list_notes(&self) -> RepoResult<Vec<Note>>;
    /// Replaces title and content and refreshes `updated_at`.
    ///
    /// Returns `RepoError::NotFound` without writing when `id` is absent.
    fn update_note(&self, id: NoteId, draft: &NoteDraft) -> RepoResult<()>;
    /// Hard-deletes one note.
    ///
    /// Returns `RepoError::NotFound` when `id` is absent.
    fn delete_note(&self, id: NoteId) -> RepoResult<()>;
}

/// SQLite-backed note repository.
pub struct SqliteNoteRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNoteRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when the schema version is not current.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the `notes`
    ///   table does not have the expected shape.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl NoteRepository for SqliteNoteRepository<'_> {
    fn insert_note(&self, draft: &NoteDraft) -> RepoResult<NoteId> {
        draft.validate()?;
        let started_at = Instant::now();

        self.conn.execute(
            "INSERT INTO notes (title, content) VALUES (?1, ?2);",
            params![draft.title.as_str(), draft.content.as_str()],
        )?;
        let id = self.conn.last_insert_rowid();

        debug!(
            "event=note_insert module=repo status=ok note_id={} duration_ms={}",
            id,
            started_at.elapsed().as_millis()
        );
        Ok(id)
    }

    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>> {
        let mut stmt = self
            .conn
            .prepare_cached(&format!("{NOTE_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_note_row(row)?));
        }

        Ok(None)
    }

    fn list_notes(&self) -> RepoResult<Vec<Note>> {
        let mut stmt = self.conn.prepare_cached(&format!(
            "{NOTE_SELECT_SQL} ORDER BY updated_at DESC, id DESC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            notes.push(parse_note_row(row)?);
        }

        Ok(notes)
    }

    fn update_note(&self, id: NoteId, draft: &NoteDraft) -> RepoResult<()> {
        draft.validate()?;

        let changed = self.conn.execute(
            "UPDATE notes
             SET
                title = ?2,
                content = ?3,
                updated_at = MAX(created_at, CAST(unixepoch('subsec') * 1000 AS INTEGER))
             WHERE id = ?1;",
            params![id, draft.title.as_str(), draft.content.as_str()],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn delete_note(&self, id: NoteId) -> RepoResult<()> {
        let changed = self.conn.execute("DELETE FROM notes WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}

fn parse_note_row(row: &Row<'_>) -> RepoResult<Note> {
    let note = Note {
        id: row.get("id")?,
        title: row.get("title")?,
        content: row.get("content")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    };
    note.validate()
        .map_err(|err| RepoError::InvalidData(format!("note {}: {err}", note.id)))?;
    Ok(note)
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, "notes")? {
        return Err(RepoError::MissingRequiredTable("notes"));
    }

    for column in REQUIRED_NOTE_COLUMNS {
        if !table_has_column(conn, "notes", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "notes",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
