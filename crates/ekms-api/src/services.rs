//! Handlers for `/services` endpoints, including attendance.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/services` | All services |
//! | `GET`    | `/services/:id` | 404 if malformed or absent |
//! | `POST`   | `/services` | Body: [`NewService`]; returns 201 |
//! | `PUT`    | `/services/:id` | Body: [`ServiceChanges`]; attendance is untouched |
//! | `DELETE` | `/services/:id` | 200, empty body |
//! | `POST`   | `/services/:id/attendance` | Body: [`AttendanceRecord`]; appended |
//! | `PUT`    | `/services/:id/attendance` | Replaces the record with the same `personId` |
//! | `DELETE` | `/services/:id/attendance` | Removes the record with the same `personId` |
//!
//! The attendance endpoints return the updated service.

use axum::{
  Json,
  extract::{Path, State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use ekms_core::{
  service::{AttendanceRecord, NewService, Service, ServiceChanges},
  store::RecordStore,
};

use crate::{AppState, body::WithId, error::ApiError};

// ─── CRUD ─────────────────────────────────────────────────────────────────────

/// `GET /services`
pub async fn list<S: RecordStore>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<Service>>, ApiError> {
  Ok(Json(state.services.list().await?))
}

/// `GET /services/:id`
pub async fn get_one<S: RecordStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<String>,
) -> Result<Json<Service>, ApiError> {
  Ok(Json(state.services.get(&id).await?))
}

/// `POST /services`
pub async fn create<S: RecordStore>(
  State(state): State<AppState<S>>,
  body: Result<Json<NewService>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
  let Json(body) = body?;
  let service = state.services.create(body).await?;
  Ok((StatusCode::CREATED, Json(service)))
}

/// `PUT /services/:id`
pub async fn update<S: RecordStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<String>,
  body: Result<Json<WithId<ServiceChanges>>, JsonRejection>,
) -> Result<Json<Service>, ApiError> {
  let Json(body) = body?;
  let changes = body.checked(&id)?;
  Ok(Json(state.services.update(&id, changes).await?))
}

/// `DELETE /services/:id`
pub async fn delete_one<S: RecordStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
  state.services.delete(&id).await?;
  Ok(StatusCode::OK)
}

// ─── Attendance ───────────────────────────────────────────────────────────────

/// `POST /services/:id/attendance`
pub async fn add_attendance<S: RecordStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<String>,
  body: Result<Json<AttendanceRecord>, JsonRejection>,
) -> Result<Json<Service>, ApiError> {
  let Json(record) = body?;
  Ok(Json(state.services.add_attendance(&id, record).await?))
}

/// `PUT /services/:id/attendance`
pub async fn edit_attendance<S: RecordStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<String>,
  body: Result<Json<AttendanceRecord>, JsonRejection>,
) -> Result<Json<Service>, ApiError> {
  let Json(record) = body?;
  Ok(Json(state.services.edit_attendance(&id, record).await?))
}

/// `DELETE /services/:id/attendance`
pub async fn delete_attendance<S: RecordStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<String>,
  body: Result<Json<AttendanceRecord>, JsonRejection>,
) -> Result<Json<Service>, ApiError> {
  let Json(record) = body?;
  Ok(Json(state.services.delete_attendance(&id, record).await?))
}
