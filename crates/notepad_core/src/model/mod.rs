//! Domain model for notes.
//!
//! # Invariants
//! - Every note is identified by a store-assigned integer id.
//! - Deletion is a hard delete; there are no tombstones.

pub mod note;
