//! Assignments: tasks tied to a service, with a deadline and the
//! submissions people have made against it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::document::{Collection, Document};

/// A person's hand-in for an assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
  pub person_id: Uuid,
  #[serde(default = "Utc::now")]
  pub time:      DateTime<Utc>,
}

impl Submission {
  pub fn now(person_id: Uuid) -> Self { Self { person_id, time: Utc::now() } }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
  pub id:          Uuid,
  pub service_id:  Uuid,
  pub title:       String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub deadline:    Option<DateTime<Utc>>,
  #[serde(default)]
  pub submissions: Vec<Submission>,
}

/// Input to create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAssignment {
  #[serde(flatten)]
  pub details:     AssignmentChanges,
  #[serde(default)]
  pub submissions: Vec<Submission>,
}

/// Input to update; submissions are only ever appended through
/// [`Assignment::add_submission`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentChanges {
  pub service_id: Uuid,
  pub title:      String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub deadline:   Option<DateTime<Utc>>,
}

impl From<AssignmentChanges> for NewAssignment {
  fn from(details: AssignmentChanges) -> Self {
    Self { details, submissions: Vec::new() }
  }
}

impl Assignment {
  pub fn add_submission(&mut self, submission: Submission) {
    self.submissions.push(submission);
  }
}

impl Document for Assignment {
  const COLLECTION: Collection = Collection::Assignments;

  type Draft = NewAssignment;
  type Changes = AssignmentChanges;

  fn id(&self) -> Uuid { self.id }

  fn from_draft(id: Uuid, draft: NewAssignment) -> Self {
    let AssignmentChanges { service_id, title, deadline } = draft.details;
    Self { id, service_id, title, deadline, submissions: draft.submissions }
  }

  fn apply(&mut self, changes: AssignmentChanges) {
    self.service_id = changes.service_id;
    self.title = changes.title;
    self.deadline = changes.deadline;
  }
}
