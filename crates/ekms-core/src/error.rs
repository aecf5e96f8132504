//! Error types for `ekms-core`.
//!
//! Every error names the collection it came from. [`Error::kind`] collapses
//! the variants into the two outcomes the HTTP boundary distinguishes.

use std::time::Duration;

use thiserror::Error;
use uuid::Uuid;

use crate::document::Collection;

/// Boundary classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  /// The identifier is malformed or names nothing. Maps to 404.
  InvalidId,
  /// Store failure, timeout, or anything else. Maps to 500.
  Internal,
}

#[derive(Debug, Error)]
pub enum Error {
  #[error("{collection}: malformed id {raw:?}")]
  MalformedId {
    collection: Collection,
    raw:        String,
    #[source]
    source:     uuid::Error,
  },

  #[error("{collection}: no document with id {id}")]
  NotFound { collection: Collection, id: Uuid },

  #[error("service {service_id} has no attendance record for person {person_id}")]
  AttendanceNotFound { service_id: Uuid, person_id: Uuid },

  #[error("{collection} {op}: store call exceeded {after:?}")]
  Timeout {
    collection: Collection,
    op:         &'static str,
    after:      Duration,
  },

  #[error("{collection} {op}: {source}")]
  Store {
    collection: Collection,
    op:         &'static str,
    #[source]
    source:     Box<dyn std::error::Error + Send + Sync>,
  },
}

impl Error {
  pub fn kind(&self) -> ErrorKind {
    match self {
      Self::MalformedId { .. }
      | Self::NotFound { .. }
      | Self::AttendanceNotFound { .. } => ErrorKind::InvalidId,
      Self::Timeout { .. } | Self::Store { .. } => ErrorKind::Internal,
    }
  }

  pub(crate) fn store<E>(collection: Collection, op: &'static str, source: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store { collection, op, source: Box::new(source) }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn id_failures_are_invalid_id() {
    let malformed = Error::MalformedId {
      collection: Collection::People,
      raw:        "nope".into(),
      source:     Uuid::parse_str("nope").unwrap_err(),
    };
    let missing = Error::NotFound { collection: Collection::Services, id: Uuid::new_v4() };
    assert_eq!(malformed.kind(), ErrorKind::InvalidId);
    assert_eq!(missing.kind(), ErrorKind::InvalidId);
  }

  #[test]
  fn timeouts_are_internal() {
    let err = Error::Timeout {
      collection: Collection::Assignments,
      op:         "list",
      after:      Duration::from_millis(10),
    };
    assert_eq!(err.kind(), ErrorKind::Internal);
    assert_eq!(err.to_string(), "assignments list: store call exceeded 10ms");
  }
}
