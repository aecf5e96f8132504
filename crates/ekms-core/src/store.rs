//! The repository traits implemented by document-store backends.
//!
//! A backend implements [`Repository<T>`] once for every [`Document`] type.
//! Higher layers (`ekms-api`) depend on this abstraction, not on any concrete
//! backend.

use std::future::Future;

use uuid::Uuid;

use crate::{assignment::Assignment, document::Document, person::Person, service::Service};

/// Anything that can hold documents. Carries the backend's error type so
/// every [`Repository`] impl on one store shares it.
pub trait DocumentStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;
}

/// CRUD over one collection.
///
/// All methods return `Send` futures so the trait can be used from axum
/// handlers on a multi-threaded runtime.
pub trait Repository<T: Document>: DocumentStore {
  /// Every document in the collection, in insertion order.
  fn list(&self) -> impl Future<Output = Result<Vec<T>, Self::Error>> + Send + '_;

  /// Returns `None` if no document has this id.
  fn get(&self, id: Uuid) -> impl Future<Output = Result<Option<T>, Self::Error>> + Send + '_;

  /// Mint an id, build the document from `draft`, and persist it.
  fn create(&self, draft: T::Draft) -> impl Future<Output = Result<T, Self::Error>> + Send + '_;

  /// Apply `changes` to the stored document. Returns `None` if absent.
  fn update(
    &self,
    id: Uuid,
    changes: T::Changes,
  ) -> impl Future<Output = Result<Option<T>, Self::Error>> + Send + '_;

  /// Read the document, run `f` on it, and write the result back as one
  /// atomic step. Returns the stored document and `f`'s output, or `None` if
  /// absent.
  fn modify<F, R>(
    &self,
    id: Uuid,
    f: F,
  ) -> impl Future<Output = Result<Option<(T, R)>, Self::Error>> + Send + '_
  where
    F: FnOnce(&mut T) -> R + Send + 'static,
    R: Send + 'static;

  /// Returns `false` if no document had this id.
  fn delete(&self, id: Uuid) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}

/// A store holding every EKMS collection.
pub trait RecordStore:
  Repository<Person> + Repository<Service> + Repository<Assignment> + 'static
{
}

impl<S> RecordStore for S where
  S: Repository<Person> + Repository<Service> + Repository<Assignment> + 'static
{
}
