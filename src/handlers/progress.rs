use axum::{
  extract::{Path, Query, State},
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::config;
use crate::db::{self, try_lock, DbPool};
use crate::srs::ProgressRecord;

use super::{db_failure, db_unavailable, error_response};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressView {
  #[serde(flatten)]
  pub progress: ProgressRecord,
  pub next_review: String,
}

impl ProgressView {
  fn new(mut progress: ProgressRecord) -> Self {
    let today = Utc::now().date_naive();
    progress.refresh_due(today);
    let next_review = progress.next_review_description(today);
    Self {
      progress,
      next_review,
    }
  }
}

/// Progress of one grid; a grid never practiced reports fresh defaults.
///
/// GET /api/grids/{id}/progress
pub async fn grid_progress(State(pool): State<DbPool>, Path(id): Path<String>) -> Response {
  let Ok(conn) = try_lock(&pool) else {
    return db_unavailable();
  };

  let grid = match db::get_grid(&conn, &id) {
    Ok(Some(grid)) => grid,
    Ok(None) => return error_response(StatusCode::NOT_FOUND, "Grid not found"),
    Err(e) => return db_failure("Failed to load grid", e),
  };

  match db::get_progress(&conn, &id) {
    Ok(progress) => {
      let progress =
        progress.unwrap_or_else(|| ProgressRecord::new(&grid.id, &grid.name, Utc::now()));
      Json(ProgressView::new(progress)).into_response()
    }
    Err(e) => db_failure("Failed to load progress", e),
  }
}

#[derive(Debug, Deserialize)]
pub struct SessionsQuery {
  pub limit: Option<u32>,
}

/// GET /api/grids/{id}/sessions?limit=N
pub async fn grid_sessions(
  State(pool): State<DbPool>,
  Path(id): Path<String>,
  Query(query): Query<SessionsQuery>,
) -> Response {
  let Ok(conn) = try_lock(&pool) else {
    return db_unavailable();
  };

  let limit = query.limit.unwrap_or(config::RECENT_SESSIONS_LIMIT);
  match db::get_recent_sessions(&conn, &id, limit) {
    Ok(sessions) => Json(sessions).into_response(),
    Err(e) => db_failure("Failed to load sessions", e),
  }
}

/// Grids whose review day has arrived, most overdue first.
///
/// GET /api/review/due
pub async fn due_grids(State(pool): State<DbPool>) -> Response {
  let Ok(conn) = try_lock(&pool) else {
    return db_unavailable();
  };

  let records = match db::get_all_progress(&conn) {
    Ok(records) => records,
    Err(e) => return db_failure("Failed to load progress", e),
  };

  let today = Utc::now().date_naive();
  let due: Vec<ProgressView> = records
    .into_iter()
    .filter(|p| p.is_due(today))
    .map(ProgressView::new)
    .collect();

  Json(due).into_response()
}
