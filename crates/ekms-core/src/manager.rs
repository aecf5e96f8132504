//! Managers: the service layer between HTTP handlers and repositories.
//!
//! A [`Manager`] parses raw identifiers, forwards the call to its
//! [`Repository`], bounds every store call by a deadline, and turns store
//! outcomes into [`Error`]s. It adds no business rules of its own beyond the
//! attendance and submission helpers on [`ServiceManager`] and
//! [`AssignmentManager`].

use std::{future::Future, marker::PhantomData, sync::Arc, time::Duration};

use uuid::Uuid;

use crate::{
  Error, Result,
  assignment::{Assignment, Submission},
  document::Document,
  person::Person,
  service::{AttendanceRecord, Service},
  store::Repository,
};

/// Deadline applied to each store call unless overridden.
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(5);

pub type PersonManager<S> = Manager<Person, S>;
pub type ServiceManager<S> = Manager<Service, S>;
pub type AssignmentManager<S> = Manager<Assignment, S>;

/// Service-layer handle for one document type over a shared store.
///
/// Cloning is cheap; the store is reference-counted.
pub struct Manager<T, S> {
  store:    Arc<S>,
  deadline: Duration,
  _doc:     PhantomData<fn() -> T>,
}

impl<T, S> Clone for Manager<T, S> {
  fn clone(&self) -> Self {
    Self { store: Arc::clone(&self.store), deadline: self.deadline, _doc: PhantomData }
  }
}

impl<T: Document, S: Repository<T>> Manager<T, S> {
  pub fn new(store: Arc<S>) -> Self {
    Self { store, deadline: DEFAULT_STORE_TIMEOUT, _doc: PhantomData }
  }

  /// Override the per-call store deadline.
  pub fn with_deadline(mut self, deadline: Duration) -> Self {
    self.deadline = deadline;
    self
  }

  pub async fn list(&self) -> Result<Vec<T>> { self.call("list", self.store.list()).await }

  pub async fn get(&self, id: &str) -> Result<T> {
    let id = T::COLLECTION.parse_id(id)?;
    self.call("get", self.store.get(id)).await?.ok_or_else(|| not_found::<T>(id))
  }

  pub async fn create(&self, draft: T::Draft) -> Result<T> {
    let doc = self.call("create", self.store.create(draft)).await?;
    tracing::debug!(collection = %T::COLLECTION, id = %doc.id(), "document created");
    Ok(doc)
  }

  pub async fn update(&self, id: &str, changes: T::Changes) -> Result<T> {
    let id = T::COLLECTION.parse_id(id)?;
    self
      .call("update", self.store.update(id, changes))
      .await?
      .ok_or_else(|| not_found::<T>(id))
  }

  pub async fn delete(&self, id: &str) -> Result<()> {
    let id = T::COLLECTION.parse_id(id)?;
    if self.call("delete", self.store.delete(id)).await? {
      Ok(())
    } else {
      Err(not_found::<T>(id))
    }
  }

  async fn modify<F, R>(&self, op: &'static str, id: &str, f: F) -> Result<(T, R)>
  where
    F: FnOnce(&mut T) -> R + Send + 'static,
    R: Send + 'static,
  {
    let id = T::COLLECTION.parse_id(id)?;
    self.call(op, self.store.modify(id, f)).await?.ok_or_else(|| not_found::<T>(id))
  }

  /// Await a store call under the deadline, tagging any failure with the
  /// collection and operation.
  async fn call<V, E, Fut>(&self, op: &'static str, fut: Fut) -> Result<V>
  where
    Fut: Future<Output = Result<V, E>>,
    E: std::error::Error + Send + Sync + 'static,
  {
    match tokio::time::timeout(self.deadline, fut).await {
      Ok(res) => res.map_err(|e| Error::store(T::COLLECTION, op, e)),
      Err(_) => {
        tracing::warn!(collection = %T::COLLECTION, op, deadline = ?self.deadline, "store call timed out");
        Err(Error::Timeout { collection: T::COLLECTION, op, after: self.deadline })
      }
    }
  }
}

fn not_found<T: Document>(id: Uuid) -> Error {
  Error::NotFound { collection: T::COLLECTION, id }
}

// ─── Services ────────────────────────────────────────────────────────────────

impl<S: Repository<Service>> Manager<Service, S> {
  pub async fn add_attendance(&self, service_id: &str, record: AttendanceRecord) -> Result<Service> {
    let (service, ()) =
      self.modify("add_attendance", service_id, move |s| s.add_attendance(record)).await?;
    Ok(service)
  }

  /// Replace the first attendance record for `record.person_id`.
  pub async fn edit_attendance(&self, service_id: &str, record: AttendanceRecord) -> Result<Service> {
    let person_id = record.person_id;
    let (service, matched) =
      self.modify("edit_attendance", service_id, move |s| s.edit_attendance(record)).await?;
    attendance_outcome(service, matched, person_id)
  }

  /// Remove the first attendance record for `record.person_id`.
  pub async fn delete_attendance(
    &self,
    service_id: &str,
    record: AttendanceRecord,
  ) -> Result<Service> {
    let person_id = record.person_id;
    let (service, matched) = self
      .modify("delete_attendance", service_id, move |s| s.remove_attendance(person_id))
      .await?;
    attendance_outcome(service, matched, person_id)
  }
}

fn attendance_outcome(service: Service, matched: bool, person_id: Uuid) -> Result<Service> {
  if matched {
    Ok(service)
  } else {
    Err(Error::AttendanceNotFound { service_id: service.id, person_id })
  }
}

// ─── Assignments ─────────────────────────────────────────────────────────────

impl<S: Repository<Assignment>> Manager<Assignment, S> {
  pub async fn add_submission(&self, assignment_id: &str, submission: Submission) -> Result<Assignment> {
    let (assignment, ()) = self
      .modify("add_submission", assignment_id, move |a| a.add_submission(submission))
      .await?;
    Ok(assignment)
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use std::{collections::HashMap, sync::Mutex};

  use chrono::Utc;

  use super::*;
  use crate::{
    Collection, ErrorKind,
    person::NewPerson,
    service::ServiceChanges,
    store::DocumentStore,
  };

  #[derive(Debug, thiserror::Error)]
  #[error("memory store unavailable")]
  struct Unavailable;

  /// Documents kept as JSON per collection, with optional failure injection.
  #[derive(Default)]
  struct MemoryStore {
    docs:  Mutex<HashMap<Collection, Vec<serde_json::Value>>>,
    fail:  bool,
    delay: Option<Duration>,
  }

  impl MemoryStore {
    async fn gate(&self) -> Result<(), Unavailable> {
      if let Some(delay) = self.delay {
        tokio::time::sleep(delay).await;
      }
      if self.fail { Err(Unavailable) } else { Ok(()) }
    }

    fn with_docs<T: Document, R>(&self, f: impl FnOnce(&mut Vec<T>) -> R) -> R {
      let mut all = self.docs.lock().unwrap();
      let raw = all.entry(T::COLLECTION).or_default();
      let mut docs: Vec<T> =
        raw.iter().map(|v| serde_json::from_value(v.clone()).unwrap()).collect();
      let out = f(&mut docs);
      *raw = docs.iter().map(|d| serde_json::to_value(d).unwrap()).collect();
      out
    }
  }

  impl DocumentStore for MemoryStore {
    type Error = Unavailable;
  }

  impl<T: Document> Repository<T> for MemoryStore {
    async fn list(&self) -> Result<Vec<T>, Unavailable> {
      self.gate().await?;
      Ok(self.with_docs(|docs: &mut Vec<T>| docs.clone()))
    }

    async fn get(&self, id: Uuid) -> Result<Option<T>, Unavailable> {
      self.gate().await?;
      Ok(self.with_docs(|docs: &mut Vec<T>| docs.iter().find(|d| d.id() == id).cloned()))
    }

    async fn create(&self, draft: T::Draft) -> Result<T, Unavailable> {
      self.gate().await?;
      let doc = T::from_draft(Uuid::new_v4(), draft);
      self.with_docs(|docs: &mut Vec<T>| docs.push(doc.clone()));
      Ok(doc)
    }

    async fn update(&self, id: Uuid, changes: T::Changes) -> Result<Option<T>, Unavailable> {
      Ok(<Self as Repository<T>>::modify(self, id, move |d| d.apply(changes)).await?.map(|(d, ())| d))
    }

    async fn modify<F, R>(&self, id: Uuid, f: F) -> Result<Option<(T, R)>, Unavailable>
    where
      F: FnOnce(&mut T) -> R + Send + 'static,
      R: Send + 'static,
    {
      self.gate().await?;
      Ok(self.with_docs(|docs: &mut Vec<T>| {
        docs.iter_mut().find(|d| d.id() == id).map(|d| {
          let out = f(d);
          (d.clone(), out)
        })
      }))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, Unavailable> {
      self.gate().await?;
      Ok(self.with_docs(|docs: &mut Vec<T>| {
        let before = docs.len();
        docs.retain(|d| d.id() != id);
        docs.len() != before
      }))
    }
  }

  fn people(store: MemoryStore) -> PersonManager<MemoryStore> { Manager::new(Arc::new(store)) }

  fn services(store: MemoryStore) -> ServiceManager<MemoryStore> { Manager::new(Arc::new(store)) }

  #[tokio::test]
  async fn malformed_id_is_invalid_id_for_every_by_id_call() {
    let m = people(MemoryStore::default());
    let bad = "6546075376a3e3d86900bdc7";

    assert_eq!(m.get(bad).await.unwrap_err().kind(), ErrorKind::InvalidId);
    assert_eq!(
      m.update(bad, NewPerson::named("x")).await.unwrap_err().kind(),
      ErrorKind::InvalidId,
    );
    assert_eq!(m.delete(bad).await.unwrap_err().kind(), ErrorKind::InvalidId);
  }

  #[tokio::test]
  async fn absent_id_is_not_found() {
    let m = people(MemoryStore::default());
    let id = Uuid::new_v4().to_string();
    assert!(matches!(m.get(&id).await, Err(Error::NotFound { collection: Collection::People, .. })));
    assert!(matches!(m.delete(&id).await, Err(Error::NotFound { .. })));
  }

  #[tokio::test]
  async fn store_failures_are_internal() {
    let m = people(MemoryStore { fail: true, ..MemoryStore::default() });
    let err = m.list().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Internal);
    assert!(matches!(err, Error::Store { op: "list", .. }));

    // A well-formed id reaches the store, so the failure is internal too.
    let err = m.get(&Uuid::new_v4().to_string()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Internal);
  }

  #[tokio::test]
  async fn slow_store_hits_the_deadline() {
    let store = MemoryStore { delay: Some(Duration::from_millis(200)), ..MemoryStore::default() };
    let m = people(store).with_deadline(Duration::from_millis(10));
    let err = m.list().await.unwrap_err();
    assert!(matches!(err, Error::Timeout { op: "list", .. }));
    assert_eq!(err.kind(), ErrorKind::Internal);
  }

  #[tokio::test]
  async fn update_keeps_id() {
    let m = people(MemoryStore::default());
    let created = m.create(NewPerson::named("Mario Kamel")).await.unwrap();
    let id = created.id.to_string();

    let updated = m.update(&id, NewPerson::named("Mario Medhat")).await.unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(m.get(&id).await.unwrap().name, "Mario Medhat");
  }

  #[tokio::test]
  async fn attendance_round_trip() {
    let m = services(MemoryStore::default());
    let service = m.create(ServiceChanges::new(Utc::now(), "Test").into()).await.unwrap();
    let id = service.id.to_string();
    let person = Uuid::new_v4();

    let s = m.add_attendance(&id, AttendanceRecord::new(person, "Present")).await.unwrap();
    assert_eq!(s.attendance_record.len(), 1);

    let s = m.edit_attendance(&id, AttendanceRecord::new(person, "Late")).await.unwrap();
    assert_eq!(s.attendance_record.len(), 1);
    assert_eq!(s.attendance_record[0].status, "Late");

    let s = m.delete_attendance(&id, AttendanceRecord::new(person, "")).await.unwrap();
    assert!(s.attendance_record.is_empty());
  }

  #[tokio::test]
  async fn editing_unknown_attendee_is_invalid_id() {
    let m = services(MemoryStore::default());
    let service = m.create(ServiceChanges::new(Utc::now(), "Test").into()).await.unwrap();

    let err = m
      .edit_attendance(&service.id.to_string(), AttendanceRecord::new(Uuid::new_v4(), "Late"))
      .await
      .unwrap_err();
    assert!(matches!(err, Error::AttendanceNotFound { .. }));
    assert_eq!(err.kind(), ErrorKind::InvalidId);
  }
}
