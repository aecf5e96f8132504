//! JSON REST API for EKMS.
//!
//! Exposes an axum [`Router`] backed by any [`RecordStore`]. TLS, timeouts,
//! and request tracing are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = ekms_api::api_router(AppState::new(Arc::new(store)));
//! ```

pub mod assignments;
pub mod body;
pub mod error;
pub mod persons;
pub mod services;

use std::{sync::Arc, time::Duration};

use axum::{
  Router,
  routing::{get, post},
};
use ekms_core::{
  manager::{AssignmentManager, Manager, PersonManager, ServiceManager},
  store::RecordStore,
};

pub use error::ApiError;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all handlers: one manager per collection,
/// all over the same store.
pub struct AppState<S> {
  pub persons:     PersonManager<S>,
  pub services:    ServiceManager<S>,
  pub assignments: AssignmentManager<S>,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      persons:     self.persons.clone(),
      services:    self.services.clone(),
      assignments: self.assignments.clone(),
    }
  }
}

impl<S: RecordStore> AppState<S> {
  pub fn new(store: Arc<S>) -> Self {
    Self {
      persons:     Manager::new(Arc::clone(&store)),
      services:    Manager::new(Arc::clone(&store)),
      assignments: Manager::new(store),
    }
  }

  /// Bound every store call made by the managers.
  pub fn with_store_timeout(self, deadline: Duration) -> Self {
    Self {
      persons:     self.persons.with_deadline(deadline),
      services:    self.services.with_deadline(deadline),
      assignments: self.assignments.with_deadline(deadline),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S: RecordStore>(state: AppState<S>) -> Router<()> {
  Router::new()
    // People
    .route("/persons", get(persons::list::<S>).post(persons::create::<S>))
    .route(
      "/persons/{id}",
      get(persons::get_one::<S>)
        .put(persons::update::<S>)
        .delete(persons::delete_one::<S>),
    )
    // Services
    .route("/services", get(services::list::<S>).post(services::create::<S>))
    .route(
      "/services/{id}",
      get(services::get_one::<S>)
        .put(services::update::<S>)
        .delete(services::delete_one::<S>),
    )
    .route(
      "/services/{id}/attendance",
      post(services::add_attendance::<S>)
        .put(services::edit_attendance::<S>)
        .delete(services::delete_attendance::<S>),
    )
    // Assignments
    .route("/assignments", get(assignments::list::<S>).post(assignments::create::<S>))
    .route(
      "/assignments/{id}",
      get(assignments::get_one::<S>)
        .put(assignments::update::<S>)
        .delete(assignments::delete_one::<S>),
    )
    .route("/assignments/{id}/submissions", post(assignments::add_submission::<S>))
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────
