//! Training handlers: start a timed recall, submit it, or abort it.
//!
//! Submission runs the whole pipeline under one database lock: score the
//! attempt against the grid, update the schedule and statistics, then write
//! the progress record and the session log in a single transaction.

use axum::{
  extract::{Path, State},
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::db::{self, try_lock, DbPool, TrainingSessionLog};
use crate::domain::{CellStateMap, GRID_SIZE};
use crate::scoring::{comparison_grid, score_attempt, CellOutcome, PerformanceRating, ScoringResult};
use crate::session;
use crate::srs::{format_duration, record_attempt, ProgressRecord};

use super::{db_failure, db_unavailable, error_response};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartTrainingResponse {
  pub session_id: String,
  pub grid_id: String,
  pub started_at: String,
}

/// Start a timed recall of a grid.
///
/// POST /api/grids/{id}/training
pub async fn start_training(State(pool): State<DbPool>, Path(grid_id): Path<String>) -> Response {
  {
    let Ok(conn) = try_lock(&pool) else {
      return db_unavailable();
    };
    match db::get_grid(&conn, &grid_id) {
      Ok(Some(_)) => {}
      Ok(None) => return error_response(StatusCode::NOT_FOUND, "Grid not found"),
      Err(e) => return db_failure("Failed to load grid", e),
    }
  }

  let now = Utc::now();
  let session_id = session::start_session(&grid_id, now);

  Json(StartTrainingResponse {
    session_id,
    grid_id,
    started_at: now.to_rfc3339(),
  })
  .into_response()
}

/// Abort a session; nothing is recorded.
///
/// DELETE /api/training/{session_id}
pub async fn discard_training(Path(session_id): Path<String>) -> Response {
  if session::discard_session(&session_id, Utc::now()) {
    StatusCode::NO_CONTENT.into_response()
  } else {
    error_response(StatusCode::NOT_FOUND, "Training session not found")
  }
}

#[derive(Debug, Deserialize)]
pub struct SubmitAttemptRequest {
  #[serde(default)]
  pub attempt: BTreeMap<String, String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingView {
  pub level: PerformanceRating,
  pub label: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAttemptResponse {
  /// Row id of the stored session log
  pub log_id: i64,
  pub result: ScoringResult,
  pub rating: RatingView,
  pub duration_secs: i64,
  pub duration: String,
  pub comparison: [[CellOutcome; GRID_SIZE]; GRID_SIZE],
  pub progress: ProgressRecord,
  pub next_review: String,
  pub ignored_keys: Vec<String>,
}

/// Score an attempt and update the grid's progress.
///
/// POST /api/training/{session_id}/submit
pub async fn submit_attempt(
  State(pool): State<DbPool>,
  Path(session_id): Path<String>,
  Json(request): Json<SubmitAttemptRequest>,
) -> Response {
  let Ok(mut conn) = try_lock(&pool) else {
    return db_unavailable();
  };

  let now = Utc::now();

  // Looked up under the database lock so one session is recorded at most once
  let Some(training) = session::get_session(&session_id, now) else {
    return error_response(StatusCode::NOT_FOUND, "Training session not found");
  };

  let (attempt, ignored_keys) = CellStateMap::from_raw(request.attempt);

  let grid = match db::get_grid(&conn, &training.grid_id) {
    Ok(Some(grid)) => grid,
    Ok(None) => {
      session::discard_session(&session_id, now);
      return error_response(StatusCode::NOT_FOUND, "Grid not found");
    }
    Err(e) => return db_failure("Failed to load grid", e),
  };

  let prior = match db::get_progress(&conn, &grid.id) {
    Ok(prior) => prior,
    Err(e) => return db_failure("Failed to load progress", e),
  };

  let result = score_attempt(&grid.cell_states, &attempt);
  let duration_secs = training.elapsed_secs(now);
  let progress = record_attempt(prior, &grid.id, &grid.name, &result, duration_secs, now);
  let log = TrainingSessionLog::new(&grid.id, &grid.name, training.started_at, now, result.clone());

  let saved = conn.transaction().and_then(|tx| {
    db::save_progress(&tx, &progress)?;
    let log_id = db::insert_training_session(&tx, &log)?;
    tx.commit()?;
    Ok(log_id)
  });
  let log_id = match saved {
    Ok(id) => id,
    Err(e) => return db_failure("Failed to save training results", e),
  };

  // Only a recorded attempt ends the session, so a failed write can be retried
  session::finish_session(&session_id, now);

  tracing::info!(
    "Grid {} scored {:.1}% ({}/{}), next review in {} day(s)",
    grid.id,
    result.accuracy,
    result.correct_count(),
    result.total_hands_in_range,
    progress.review.interval_days
  );

  let rating = PerformanceRating::from_accuracy(result.accuracy);
  let comparison = comparison_grid(&grid.cell_states, &attempt);
  let next_review = progress.next_review_description(now.date_naive());

  Json(SubmitAttemptResponse {
    log_id,
    result,
    rating: RatingView {
      level: rating,
      label: rating.label(),
    },
    duration_secs,
    duration: format_duration(duration_secs),
    comparison,
    progress,
    next_review,
    ignored_keys,
  })
  .into_response()
}
