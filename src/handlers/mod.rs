pub mod grids;
pub mod progress;
pub mod training;

use axum::{
  http::StatusCode,
  response::{IntoResponse, Response},
  routing::{delete, get, post},
  Json, Router,
};
use tower_http::trace::TraceLayer;

use crate::db::DbPool;

pub use grids::{get_grid, put_grid};
pub use progress::{due_grids, grid_progress, grid_sessions};
pub use training::{discard_training, start_training, submit_attempt};

/// All API routes, sharing one database pool
pub fn router(pool: DbPool) -> Router {
  Router::new()
    .route("/api/grids/{id}", get(get_grid).put(put_grid))
    .route("/api/grids/{id}/training", post(start_training))
    .route("/api/grids/{id}/progress", get(grid_progress))
    .route("/api/grids/{id}/sessions", get(grid_sessions))
    .route("/api/training/{session_id}", delete(discard_training))
    .route("/api/training/{session_id}/submit", post(submit_attempt))
    .route("/api/review/due", get(due_grids))
    .layer(TraceLayer::new_for_http())
    .with_state(pool)
}

/// JSON error body with the given status
pub(crate) fn error_response(status: StatusCode, message: &str) -> Response {
  (status, Json(serde_json::json!({ "error": message }))).into_response()
}

pub(crate) fn db_unavailable() -> Response {
  error_response(StatusCode::SERVICE_UNAVAILABLE, "Database unavailable")
}

pub(crate) fn db_failure(context: &str, e: rusqlite::Error) -> Response {
  tracing::error!("{}: {}", context, e);
  error_response(StatusCode::INTERNAL_SERVER_ERROR, context)
}
