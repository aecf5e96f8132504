//! SQL schema for the EKMS SQLite store.
//!
//! Executed once at connection startup. `PRAGMA user_version` records the
//! layout revision.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// Every collection table has the same shape: the document id, the JSON
/// document itself (which repeats the id), and the insertion timestamp.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS people (
    id          TEXT PRIMARY KEY,
    doc         TEXT NOT NULL,
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS services (
    id          TEXT PRIMARY KEY,
    doc         TEXT NOT NULL,   -- attendance records are embedded here
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS assignments (
    id          TEXT PRIMARY KEY,
    doc         TEXT NOT NULL,   -- submissions are embedded here
    created_at  TEXT NOT NULL
);

PRAGMA user_version = 1;
";
