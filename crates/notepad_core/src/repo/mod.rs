//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the narrow note store contract (insert/get/list/update/delete).
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.

pub mod note_repo;
