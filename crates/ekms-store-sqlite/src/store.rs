//! [`SqliteStore`], the SQLite implementation of the EKMS repositories.

use std::path::Path;

use chrono::Utc;
use ekms_core::{
  Document,
  store::{DocumentStore, Repository},
};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use crate::{
  Error, Result,
  encode::{RawDocument, encode_doc, encode_dt, encode_uuid},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// An EKMS document store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted. Statements
/// are serialised on the connection thread, so no extra locking is needed.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    tracing::debug!("sqlite schema ready");
    Ok(())
  }
}

/// The table backing `T`'s collection.
fn table<T: Document>() -> &'static str { T::COLLECTION.as_str() }

// ─── Repository impl ─────────────────────────────────────────────────────────

impl DocumentStore for SqliteStore {
  type Error = Error;
}

impl<T: Document> Repository<T> for SqliteStore {
  async fn list(&self) -> Result<Vec<T>> {
    let sql = format!("SELECT id, doc FROM {} ORDER BY rowid", table::<T>());

    let raws: Vec<RawDocument> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map([], RawDocument::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawDocument::into_document).collect()
  }

  async fn get(&self, id: Uuid) -> Result<Option<T>> {
    let sql = format!("SELECT id, doc FROM {} WHERE id = ?1", table::<T>());
    let id_str = encode_uuid(id);

    let raw: Option<RawDocument> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(&sql, rusqlite::params![id_str], RawDocument::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawDocument::into_document).transpose()
  }

  async fn create(&self, draft: T::Draft) -> Result<T> {
    let doc = T::from_draft(Uuid::new_v4(), draft);

    let sql = format!("INSERT INTO {} (id, doc, created_at) VALUES (?1, ?2, ?3)", table::<T>());
    let id_str = encode_uuid(doc.id());
    let doc_str = encode_doc(&doc)?;
    let at_str = encode_dt(Utc::now());

    self
      .conn
      .call(move |conn| {
        conn.execute(&sql, rusqlite::params![id_str, doc_str, at_str])?;
        Ok(())
      })
      .await?;

    Ok(doc)
  }

  async fn update(&self, id: Uuid, changes: T::Changes) -> Result<Option<T>> {
    let updated = <Self as Repository<T>>::modify(self, id, move |doc| doc.apply(changes)).await?;
    Ok(updated.map(|(doc, ())| doc))
  }

  async fn modify<F, R>(&self, id: Uuid, f: F) -> Result<Option<(T, R)>>
  where
    F: FnOnce(&mut T) -> R + Send + 'static,
    R: Send + 'static,
  {
    let select = format!("SELECT id, doc FROM {} WHERE id = ?1", table::<T>());
    let update = format!("UPDATE {} SET doc = ?2 WHERE id = ?1", table::<T>());
    let id_str = encode_uuid(id);

    let modified = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let raw = tx
          .query_row(&select, rusqlite::params![id_str], RawDocument::from_row)
          .optional()?;
        let Some(raw) = raw else {
          return Ok(None);
        };

        let before = raw.doc.clone();
        let mut doc: T = raw.into_document().map_err(Error::into_call_error)?;
        let out = f(&mut doc);

        // Skip the write when `f` left the document as it was.
        let after = encode_doc(&doc).map_err(Error::into_call_error)?;
        if after != before {
          tx.execute(&update, rusqlite::params![id_str, after])?;
        }
        tx.commit()?;

        Ok(Some((doc, out)))
      })
      .await?;

    Ok(modified)
  }

  async fn delete(&self, id: Uuid) -> Result<bool> {
    let sql = format!("DELETE FROM {} WHERE id = ?1", table::<T>());
    let id_str = encode_uuid(id);

    let removed = self
      .conn
      .call(move |conn| Ok(conn.execute(&sql, rusqlite::params![id_str])?))
      .await?;

    Ok(removed > 0)
  }
}
