use notepad_core::db::migrations::latest_version;
use notepad_core::db::open_db_in_memory;
use notepad_core::{NoteDraft, NoteRepository, RepoError, SqliteNoteRepository};
use rusqlite::Connection;

#[test]
fn insert_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();

    let id = repo
        .insert_note(&NoteDraft::new("first", "first body"))
        .unwrap();

    let loaded = repo.get_note(id).unwrap().unwrap();
    assert_eq!(loaded.id, id);
    assert_eq!(loaded.title, "first");
    assert_eq!(loaded.content, "first body");
    assert_eq!(loaded.created_at, loaded.updated_at);
}

#[test]
fn get_unknown_id_returns_none() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();

    assert!(repo.get_note(404).unwrap().is_none());
}

#[test]
fn insert_assigns_fresh_ids_and_never_reuses_deleted_ones() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();

    let first = repo.insert_note(&NoteDraft::new("a", "a")).unwrap();
    let second = repo.insert_note(&NoteDraft::new("b", "b")).unwrap();
    assert_ne!(first, second);

    repo.delete_note(second).unwrap();
    let third = repo.insert_note(&NoteDraft::new("c", "c")).unwrap();
    assert!(third > second);
}

#[test]
fn list_orders_by_updated_at_desc() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();

    let older = repo.insert_note(&NoteDraft::new("older", "o")).unwrap();
    let newer = repo.insert_note(&NoteDraft::new("newer", "n")).unwrap();
    conn.execute(
        "UPDATE notes SET created_at = 1000, updated_at = 3000 WHERE id = ?1;",
        [older],
    )
    .unwrap();
    conn.execute(
        "UPDATE notes SET created_at = 1000, updated_at = 2000 WHERE id = ?1;",
        [newer],
    )
    .unwrap();

    let ids: Vec<_> = repo.list_notes().unwrap().into_iter().map(|n| n.id).collect();
    assert_eq!(ids, vec![older, newer]);
}

#[test]
fn list_breaks_timestamp_ties_by_newest_id() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();

    let a = repo.insert_note(&NoteDraft::new("a", "a")).unwrap();
    let b = repo.insert_note(&NoteDraft::new("b", "b")).unwrap();
    conn.execute("UPDATE notes SET created_at = 5000, updated_at = 5000;", [])
        .unwrap();

    let ids: Vec<_> = repo.list_notes().unwrap().into_iter().map(|n| n.id).collect();
    assert_eq!(ids, vec![b, a]);
}

#[test]
fn update_replaces_fields_and_refreshes_updated_at() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();

    let id = repo.insert_note(&NoteDraft::new("draft", "v1")).unwrap();
    conn.execute(
        "UPDATE notes SET created_at = 1000, updated_at = 1000 WHERE id = ?1;",
        [id],
    )
    .unwrap();

    repo.update_note(id, &NoteDraft::new("final", "v2")).unwrap();

    let loaded = repo.get_note(id).unwrap().unwrap();
    assert_eq!(loaded.title, "final");
    assert_eq!(loaded.content, "v2");
    assert_eq!(loaded.created_at, 1000);
    assert!(loaded.updated_at > 1000);
}

#[test]
fn update_never_moves_updated_at_below_created_at() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();

    let id = repo.insert_note(&NoteDraft::new("t", "c")).unwrap();
    let future = i64::MAX / 2;
    conn.execute(
        "UPDATE notes SET created_at = ?1, updated_at = ?1 WHERE id = ?2;",
        [future, id],
    )
    .unwrap();

    repo.update_note(id, &NoteDraft::new("t2", "c2")).unwrap();
    let loaded = repo.get_note(id).unwrap().unwrap();
    assert_eq!(loaded.updated_at, future);
}

#[test]
fn update_unknown_id_returns_not_found_and_creates_nothing() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();

    let err = repo
        .update_note(77, &NoteDraft::new("ghost", "ghost"))
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound(77)));
    assert!(repo.list_notes().unwrap().is_empty());
}

#[test]
fn delete_twice_returns_not_found_second_time() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();

    let id = repo.insert_note(&NoteDraft::new("bye", "bye")).unwrap();
    repo.delete_note(id).unwrap();

    let err = repo.delete_note(id).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(found) if found == id));
    assert!(repo.get_note(id).unwrap().is_none());
}

#[test]
fn validation_failure_blocks_insert_and_update() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();

    let insert_err = repo.insert_note(&NoteDraft::new("", "body")).unwrap_err();
    assert!(matches!(insert_err, RepoError::Validation(_)));
    assert!(repo.list_notes().unwrap().is_empty());

    let id = repo.insert_note(&NoteDraft::new("ok", "ok")).unwrap();
    let update_err = repo.update_note(id, &NoteDraft::new("ok", "")).unwrap_err();
    assert!(matches!(update_err, RepoError::Validation(_)));
    assert_eq!(repo.get_note(id).unwrap().unwrap().content, "ok");
}

#[test]
fn read_rejects_rows_with_broken_timestamps() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch(
        "DROP TABLE notes;
         CREATE TABLE notes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            content TEXT NOT NULL,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
         );
         INSERT INTO notes (title, content, created_at, updated_at)
         VALUES ('t', 'c', 2000, 1000);",
    )
    .unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();

    let err = repo.list_notes().unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteNoteRepository::try_new(&conn) {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert_eq!(expected_version, latest_version()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_notes_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteNoteRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredTable("notes"))
    ));
}

#[test]
fn repository_rejects_connection_missing_timestamp_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE notes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            content TEXT NOT NULL,
            created_at INTEGER NOT NULL
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteNoteRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredColumn {
            table: "notes",
            column: "updated_at"
        })
    ));
}
