//! Handlers for `/assignments` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/assignments` | All assignments |
//! | `GET`    | `/assignments/:id` | 404 if malformed or absent |
//! | `POST`   | `/assignments` | Body: [`NewAssignment`]; returns 201 |
//! | `PUT`    | `/assignments/:id` | Body: [`AssignmentChanges`]; submissions untouched |
//! | `DELETE` | `/assignments/:id` | 200, empty body |
//! | `POST`   | `/assignments/:id/submissions` | Body: [`Submission`]; returns the assignment |

use axum::{
  Json,
  extract::{Path, State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use ekms_core::{
  assignment::{Assignment, AssignmentChanges, NewAssignment, Submission},
  store::RecordStore,
};

use crate::{AppState, body::WithId, error::ApiError};

/// `GET /assignments`
pub async fn list<S: RecordStore>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<Assignment>>, ApiError> {
  Ok(Json(state.assignments.list().await?))
}

/// `GET /assignments/:id`
pub async fn get_one<S: RecordStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<String>,
) -> Result<Json<Assignment>, ApiError> {
  Ok(Json(state.assignments.get(&id).await?))
}

/// `POST /assignments`
pub async fn create<S: RecordStore>(
  State(state): State<AppState<S>>,
  body: Result<Json<NewAssignment>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
  let Json(body) = body?;
  let assignment = state.assignments.create(body).await?;
  Ok((StatusCode::CREATED, Json(assignment)))
}

/// `PUT /assignments/:id`
pub async fn update<S: RecordStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<String>,
  body: Result<Json<WithId<AssignmentChanges>>, JsonRejection>,
) -> Result<Json<Assignment>, ApiError> {
  let Json(body) = body?;
  let changes = body.checked(&id)?;
  Ok(Json(state.assignments.update(&id, changes).await?))
}

/// `DELETE /assignments/:id`
pub async fn delete_one<S: RecordStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
  state.assignments.delete(&id).await?;
  Ok(StatusCode::OK)
}

/// `POST /assignments/:id/submissions`
pub async fn add_submission<S: RecordStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<String>,
  body: Result<Json<Submission>, JsonRejection>,
) -> Result<Json<Assignment>, ApiError> {
  let Json(submission) = body?;
  Ok(Json(state.assignments.add_submission(&id, submission).await?))
}
