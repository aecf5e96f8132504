//! SQLite backend for the EKMS document store.
//!
//! Each collection is a table of JSON documents keyed by id. All database
//! access runs through [`tokio_rusqlite`] on a dedicated thread so the async
//! runtime never blocks.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
