//! Error type for `ekms-store-sqlite`.

use ekms_core::Collection;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  /// A row's key disagrees with the id inside its document.
  #[error("{collection} row {row_id} holds document {doc_id}")]
  IdMismatch {
    collection: Collection,
    row_id:     Uuid,
    doc_id:     Uuid,
  },
}

impl Error {
  /// Wrap for return from inside a `tokio_rusqlite` call closure.
  pub(crate) fn into_call_error(self) -> tokio_rusqlite::Error {
    match self {
      Error::Database(e) => e,
      other => tokio_rusqlite::Error::Other(Box::new(other)),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
