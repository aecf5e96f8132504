//! Core types and trait definitions for the EKMS record service.
//!
//! This crate is free of HTTP and database dependencies. The API and store
//! crates depend on it; it depends on nothing proprietary.

// Native `async fn` / `impl Future` in traits; the returned futures carry
// explicit `Send` bounds where they cross task boundaries.
#![allow(async_fn_in_trait)]

pub mod assignment;
pub mod document;
pub mod error;
pub mod manager;
pub mod person;
pub mod service;
pub mod store;

pub use document::{Collection, Document};
pub use error::{Error, ErrorKind, Result};
