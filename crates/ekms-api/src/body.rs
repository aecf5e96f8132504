//! Request-body wrappers shared by the update handlers.

use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;

/// An update body that may echo the document's `id` back, as clients do when
/// they PUT a previously fetched object.
#[derive(Debug, Deserialize)]
pub struct WithId<B> {
  #[serde(default)]
  pub id:   Option<Uuid>,
  #[serde(flatten)]
  pub body: B,
}

impl<B> WithId<B> {
  /// Strip the echoed id, rejecting it if it names a different document than
  /// the path. A malformed path id is left for the manager to report.
  pub fn checked(self, path_id: &str) -> Result<B, ApiError> {
    match (self.id, Uuid::parse_str(path_id)) {
      (Some(body_id), Ok(path_id)) if body_id != path_id => Err(ApiError::BadRequest(format!(
        "body id {body_id} does not match path id {path_id}"
      ))),
      _ => Ok(self.body),
    }
  }
}
