//! The [`Document`] trait shared by every stored entity, and the
//! [`Collection`] each one lives in.

use serde::{Serialize, de::DeserializeOwned};
use strum::{AsRefStr, Display, EnumIter, IntoStaticStr};
use uuid::Uuid;

use crate::{Error, Result};

/// A named collection in the document store.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumIter, IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum Collection {
  People,
  Services,
  Assignments,
}

impl Collection {
  pub fn as_str(self) -> &'static str { self.into() }

  /// Parse a raw path segment into a document id for this collection.
  pub fn parse_id(self, raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|source| Error::MalformedId {
      collection: self,
      raw: raw.to_owned(),
      source,
    })
  }
}

/// An entity stored as a JSON document under a store-assigned id.
///
/// `Draft` is the create input (everything but the id); `Changes` is the
/// update input. Neither carries an id, so an update can never reassign one.
pub trait Document:
  Serialize + DeserializeOwned + Clone + Send + Sync + 'static
{
  const COLLECTION: Collection;

  type Draft: Send + 'static;
  type Changes: Send + 'static;

  fn id(&self) -> Uuid;

  /// Build the stored document from a freshly minted id.
  fn from_draft(id: Uuid, draft: Self::Draft) -> Self;

  /// Overwrite the fields covered by `changes`.
  fn apply(&mut self, changes: Self::Changes);
}
