//! Handlers for `/persons` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/persons` | All people |
//! | `GET`    | `/persons/:id` | 404 if malformed or absent |
//! | `POST`   | `/persons` | Body: [`NewPerson`]; returns 201 + stored person |
//! | `PUT`    | `/persons/:id` | Body: [`NewPerson`], optionally with a matching `id` |
//! | `DELETE` | `/persons/:id` | 200, empty body |

use axum::{
  Json,
  extract::{Path, State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use ekms_core::{
  person::{NewPerson, Person},
  store::RecordStore,
};

use crate::{AppState, body::WithId, error::ApiError};

/// `GET /persons`
pub async fn list<S: RecordStore>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<Person>>, ApiError> {
  Ok(Json(state.persons.list().await?))
}

/// `GET /persons/:id`
pub async fn get_one<S: RecordStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<String>,
) -> Result<Json<Person>, ApiError> {
  Ok(Json(state.persons.get(&id).await?))
}

/// `POST /persons`
pub async fn create<S: RecordStore>(
  State(state): State<AppState<S>>,
  body: Result<Json<NewPerson>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
  let Json(body) = body?;
  let person = state.persons.create(body).await?;
  Ok((StatusCode::CREATED, Json(person)))
}

/// `PUT /persons/:id`
pub async fn update<S: RecordStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<String>,
  body: Result<Json<WithId<NewPerson>>, JsonRejection>,
) -> Result<Json<Person>, ApiError> {
  let Json(body) = body?;
  let changes = body.checked(&id)?;
  Ok(Json(state.persons.update(&id, changes).await?))
}

/// `DELETE /persons/:id`
pub async fn delete_one<S: RecordStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
  state.persons.delete(&id).await?;
  Ok(StatusCode::OK)
}
