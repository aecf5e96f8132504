//! Encoding and decoding between documents and the text stored in SQLite.
//!
//! Ids are hyphenated lowercase UUID strings, timestamps RFC 3339, and
//! documents compact JSON.

use chrono::{DateTime, Utc};
use ekms_core::Document;
use uuid::Uuid;

use crate::{Error, Result};

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn encode_doc<T: Document>(doc: &T) -> Result<String> { Ok(serde_json::to_string(doc)?) }

/// Raw strings read directly from a collection row.
pub struct RawDocument {
  pub id:  String,
  pub doc: String,
}

impl RawDocument {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self { id: row.get(0)?, doc: row.get(1)? })
  }

  pub fn into_document<T: Document>(self) -> Result<T> {
    let row_id = decode_uuid(&self.id)?;
    let doc: T = serde_json::from_str(&self.doc)?;
    if doc.id() != row_id {
      return Err(Error::IdMismatch { collection: T::COLLECTION, row_id, doc_id: doc.id() });
    }
    Ok(doc)
  }
}
