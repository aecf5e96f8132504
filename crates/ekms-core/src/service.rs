//! Services: scheduled gatherings and the attendance taken at them.
//!
//! Attendance is embedded in the service document as a list of
//! [`AttendanceRecord`]s keyed by person id. Edits and removals act on the
//! first record whose `person_id` matches.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::document::{Collection, Document};

// ─── Attendance ──────────────────────────────────────────────────────────────

/// One person's presence at one service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
  /// The owning service; stamped by the server when the record is stored.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub service_id: Option<Uuid>,
  pub person_id:  Uuid,
  #[serde(default = "Utc::now")]
  pub time:       DateTime<Utc>,
  /// Free text, e.g. `"Present"`.
  #[serde(default)]
  pub status:     String,
}

impl AttendanceRecord {
  pub fn new(person_id: Uuid, status: impl Into<String>) -> Self {
    Self { service_id: None, person_id, time: Utc::now(), status: status.into() }
  }
}

// ─── Service ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
  pub id:                Uuid,
  pub date:              DateTime<Utc>,
  pub subject:           String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub speaker:           Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub bible_chapter:     Option<String>,
  #[serde(default)]
  pub attendance_record: Vec<AttendanceRecord>,
}

/// Input to create. Initial attendance is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewService {
  #[serde(flatten)]
  pub details:           ServiceChanges,
  #[serde(default)]
  pub attendance_record: Vec<AttendanceRecord>,
}

/// Input to update. Attendance is deliberately absent: the generic update
/// path never touches it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceChanges {
  pub date:          DateTime<Utc>,
  pub subject:       String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub speaker:       Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub bible_chapter: Option<String>,
}

impl ServiceChanges {
  pub fn new(date: DateTime<Utc>, subject: impl Into<String>) -> Self {
    Self { date, subject: subject.into(), speaker: None, bible_chapter: None }
  }
}

impl From<ServiceChanges> for NewService {
  fn from(details: ServiceChanges) -> Self {
    Self { details, attendance_record: Vec::new() }
  }
}

impl Service {
  /// Append `record`, stamping it with this service's id.
  pub fn add_attendance(&mut self, mut record: AttendanceRecord) {
    record.service_id = Some(self.id);
    self.attendance_record.push(record);
  }

  /// Replace the first record for `record.person_id`. Returns `false` and
  /// leaves the list alone if the person has no record.
  pub fn edit_attendance(&mut self, mut record: AttendanceRecord) -> bool {
    record.service_id = Some(self.id);
    match self.attendance_record.iter_mut().find(|r| r.person_id == record.person_id) {
      Some(slot) => {
        *slot = record;
        true
      }
      None => false,
    }
  }

  /// Remove the first record for `person_id`. Returns `false` if none exists.
  pub fn remove_attendance(&mut self, person_id: Uuid) -> bool {
    match self.attendance_record.iter().position(|r| r.person_id == person_id) {
      Some(idx) => {
        self.attendance_record.remove(idx);
        true
      }
      None => false,
    }
  }
}

impl Document for Service {
  const COLLECTION: Collection = Collection::Services;

  type Draft = NewService;
  type Changes = ServiceChanges;

  fn id(&self) -> Uuid { self.id }

  fn from_draft(id: Uuid, draft: NewService) -> Self {
    let ServiceChanges { date, subject, speaker, bible_chapter } = draft.details;
    let mut service = Self {
      id,
      date,
      subject,
      speaker,
      bible_chapter,
      attendance_record: Vec::with_capacity(draft.attendance_record.len()),
    };
    for record in draft.attendance_record {
      service.add_attendance(record);
    }
    service
  }

  fn apply(&mut self, changes: ServiceChanges) {
    self.date = changes.date;
    self.subject = changes.subject;
    self.speaker = changes.speaker;
    self.bible_chapter = changes.bible_chapter;
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone as _;
  use serde_json::json;

  use super::*;

  fn service() -> Service {
    let date = Utc.with_ymd_and_hms(2023, 11, 3, 18, 0, 0).unwrap();
    Service::from_draft(Uuid::new_v4(), ServiceChanges::new(date, "Test").into())
  }

  #[test]
  fn add_stamps_service_id() {
    let mut s = service();
    s.add_attendance(AttendanceRecord::new(Uuid::new_v4(), "Present"));
    assert_eq!(s.attendance_record.len(), 1);
    assert_eq!(s.attendance_record[0].service_id, Some(s.id));
  }

  #[test]
  fn edit_replaces_first_match_in_place() {
    let mut s = service();
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();
    s.add_attendance(AttendanceRecord::new(alice, "Present"));
    s.add_attendance(AttendanceRecord::new(bob, "Present"));
    s.add_attendance(AttendanceRecord::new(alice, "Late"));

    assert!(s.edit_attendance(AttendanceRecord::new(alice, "Excused")));
    let statuses: Vec<_> = s.attendance_record.iter().map(|r| r.status.as_str()).collect();
    assert_eq!(statuses, ["Excused", "Present", "Late"]);
  }

  #[test]
  fn edit_without_match_is_reported() {
    let mut s = service();
    s.add_attendance(AttendanceRecord::new(Uuid::new_v4(), "Present"));
    let before = s.clone();
    assert!(!s.edit_attendance(AttendanceRecord::new(Uuid::new_v4(), "Absent")));
    assert_eq!(s, before);
  }

  #[test]
  fn remove_drops_exactly_one() {
    let mut s = service();
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();
    s.add_attendance(AttendanceRecord::new(alice, "Present"));
    s.add_attendance(AttendanceRecord::new(bob, "Present"));

    assert!(s.remove_attendance(alice));
    assert_eq!(s.attendance_record.len(), 1);
    assert_eq!(s.attendance_record[0].person_id, bob);
    assert!(!s.remove_attendance(alice));
  }

  #[test]
  fn apply_leaves_attendance_alone() {
    let mut s = service();
    s.add_attendance(AttendanceRecord::new(Uuid::new_v4(), "Present"));
    let mut changes = ServiceChanges::new(s.date, "Updated");
    changes.speaker = Some("Mona Mounir".into());
    s.apply(changes);

    assert_eq!(s.subject, "Updated");
    assert_eq!(s.attendance_record.len(), 1);
  }

  #[test]
  fn wire_names_are_camel_case() {
    let draft: NewService = serde_json::from_value(json!({
      "date": "2020-10-11T00:00:00Z",
      "subject": "Test",
      "bibleChapter": "John 3:16",
      "attendanceRecord": [{ "personId": Uuid::nil(), "status": "Present" }],
    }))
    .unwrap();
    let s = Service::from_draft(Uuid::new_v4(), draft);
    let value = serde_json::to_value(&s).unwrap();

    assert_eq!(value["bibleChapter"], "John 3:16");
    assert_eq!(value["attendanceRecord"][0]["serviceId"], json!(s.id));
    assert!(value.get("speaker").is_none());
  }
}
