//! People: members of the organization.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, de};
use uuid::Uuid;

use crate::document::{Collection, Document};

/// A stored person. Services and assignments refer to people by `id` only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
  pub id:       Uuid,
  pub name:     String,
  #[serde(default, deserialize_with = "lenient_date", skip_serializing_if = "Option::is_none")]
  pub birthday: Option<NaiveDate>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub phone:    Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub address:  Option<String>,
  /// Affiliation; older clients send this as `foc`.
  #[serde(default, alias = "foc", skip_serializing_if = "Option::is_none")]
  pub fr:       Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub degree:   Option<String>,
}

/// Input to create and update. An update replaces every field, so an omitted
/// optional field is cleared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPerson {
  pub name:     String,
  #[serde(default, deserialize_with = "lenient_date", skip_serializing_if = "Option::is_none")]
  pub birthday: Option<NaiveDate>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub phone:    Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub address:  Option<String>,
  #[serde(default, alias = "foc", skip_serializing_if = "Option::is_none")]
  pub fr:       Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub degree:   Option<String>,
}

impl NewPerson {
  pub fn named(name: impl Into<String>) -> Self {
    Self { name: name.into(), ..Self::default() }
  }
}

/// Parse a birthday given either as a calendar date (`1999-10-11`) or as an
/// RFC 3339 timestamp, which keeps the date in the timestamp's own offset.
pub fn parse_birthday(raw: &str) -> Result<NaiveDate, chrono::ParseError> {
  NaiveDate::parse_from_str(raw, "%Y-%m-%d")
    .or_else(|e| DateTime::parse_from_rfc3339(raw).map(|dt| dt.date_naive()).map_err(|_| e))
}

fn lenient_date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDate>, D::Error> {
  let Some(raw) = Option::<String>::deserialize(deserializer)? else {
    return Ok(None);
  };
  parse_birthday(&raw).map(Some).map_err(de::Error::custom)
}

impl Document for Person {
  const COLLECTION: Collection = Collection::People;

  type Draft = NewPerson;
  type Changes = NewPerson;

  fn id(&self) -> Uuid { self.id }

  fn from_draft(id: Uuid, draft: NewPerson) -> Self {
    let mut person = Self {
      id,
      name: String::new(),
      birthday: None,
      phone: None,
      address: None,
      fr: None,
      degree: None,
    };
    person.apply(draft);
    person
  }

  fn apply(&mut self, changes: NewPerson) {
    let NewPerson { name, birthday, phone, address, fr, degree } = changes;
    self.name = name;
    self.birthday = birthday;
    self.phone = phone;
    self.address = address;
    self.fr = fr;
    self.degree = degree;
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn absent_fields_are_omitted_on_the_wire() {
    let draft: NewPerson =
      serde_json::from_value(json!({ "name": "Jane Doe", "phone": "555-0100" })).unwrap();
    let id = Uuid::new_v4();
    let person = Person::from_draft(id, draft);

    assert_eq!(
      serde_json::to_value(&person).unwrap(),
      json!({ "id": id, "name": "Jane Doe", "phone": "555-0100" }),
    );
  }

  #[test]
  fn foc_is_read_as_fr() {
    let draft: NewPerson =
      serde_json::from_value(json!({ "name": "Mario", "foc": "Timo", "birthday": "1999-10-11" }))
        .unwrap();
    assert_eq!(draft.fr.as_deref(), Some("Timo"));
    assert_eq!(draft.birthday, NaiveDate::from_ymd_opt(1999, 10, 11));
  }

  #[test]
  fn birthday_accepts_timestamps() {
    let draft: NewPerson =
      serde_json::from_value(json!({ "name": "M", "birthday": "1999-10-11T00:00:00Z" })).unwrap();
    assert_eq!(draft.birthday, NaiveDate::from_ymd_opt(1999, 10, 11));

    // The date is taken in the timestamp's offset, not converted to UTC.
    assert_eq!(parse_birthday("1999-10-11T23:30:00-05:00").ok(), NaiveDate::from_ymd_opt(1999, 10, 11));

    let person = Person::from_draft(Uuid::new_v4(), draft);
    assert_eq!(serde_json::to_value(&person).unwrap()["birthday"], "1999-10-11");
  }

  #[test]
  fn birthday_rejects_garbage() {
    let result = serde_json::from_value::<NewPerson>(json!({ "name": "M", "birthday": "soon" }));
    assert!(result.is_err());

    let draft: NewPerson =
      serde_json::from_value(json!({ "name": "M", "birthday": null })).unwrap();
    assert_eq!(draft.birthday, None);
  }

  #[test]
  fn apply_replaces_and_clears() {
    let mut person = Person::from_draft(Uuid::new_v4(), NewPerson {
      phone: Some("01206032004".into()),
      address: Some("Cairo, Egypt".into()),
      ..NewPerson::named("Mario Kamel")
    });
    let id = person.id;

    person.apply(NewPerson {
      address: Some("Alex, Arm".into()),
      ..NewPerson::named("Mario Medhat")
    });

    assert_eq!(person.id, id);
    assert_eq!(person.name, "Mario Medhat");
    assert_eq!(person.address.as_deref(), Some("Alex, Arm"));
    assert_eq!(person.phone, None);
  }
}
