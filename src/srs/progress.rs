//! Per-grid training progress: scheduling state plus attempt statistics.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::config::SESSION_HISTORY_LIMIT;
use crate::scoring::{round_to_tenth, ScoringResult};

use super::problem_hands::{update_problem_hands, ProblemHandEntry};
use super::sm2::{self, Quality, ReviewState};

/// One line of the session history kept on a progress record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
  pub date: DateTime<Utc>,
  pub accuracy: f64,
  #[serde(rename = "duration", alias = "durationSecs")]
  pub duration_secs: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
  pub grid_id: String,
  pub grid_name: String,
  #[serde(flatten)]
  pub review: ReviewState,
  pub total_attempts: u32,
  pub last_attempt_date: Option<DateTime<Utc>>,
  pub last_accuracy: f64,
  pub average_accuracy: f64,
  pub best_accuracy: f64,
  /// Newest first
  pub session_history: VecDeque<SessionSummary>,
  pub problem_hands: Vec<ProblemHandEntry>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl ProgressRecord {
  /// Progress of a grid that has not been practiced yet
  pub fn new(grid_id: &str, grid_name: &str, now: DateTime<Utc>) -> Self {
    Self {
      grid_id: grid_id.to_string(),
      grid_name: grid_name.to_string(),
      review: ReviewState::initial(now),
      total_attempts: 0,
      last_attempt_date: None,
      last_accuracy: 0.0,
      average_accuracy: 0.0,
      best_accuracy: 0.0,
      session_history: VecDeque::new(),
      problem_hands: Vec::new(),
      created_at: now,
      updated_at: now,
    }
  }

  /// Re-derive the due flag for the given day; the stored flag is only
  /// accurate at the moment the record was written
  pub fn is_due(&self, today: NaiveDate) -> bool {
    sm2::is_due(self.review.next_review_date, today)
  }

  pub fn refresh_due(&mut self, today: NaiveDate) {
    self.review.due_for_review = self.is_due(today);
  }

  pub fn next_review_description(&self, today: NaiveDate) -> String {
    let next = self.last_attempt_date.map(|_| self.review.next_review_date);
    sm2::describe_next_review(next, today)
  }

  fn push_session(&mut self, summary: SessionSummary) {
    self.session_history.push_front(summary);
    while self.session_history.len() > SESSION_HISTORY_LIMIT {
      self.session_history.pop_back();
    }
  }
}

/// Fold a scored attempt into a grid's progress.
///
/// `prior` is None on the first attempt. Scheduling, statistics, session
/// history and problem hands are all updated together; the caller persists
/// the returned record as one unit.
pub fn record_attempt(
  prior: Option<ProgressRecord>,
  grid_id: &str,
  grid_name: &str,
  result: &ScoringResult,
  duration_secs: i64,
  now: DateTime<Utc>,
) -> ProgressRecord {
  let mut progress = prior.unwrap_or_else(|| ProgressRecord::new(grid_id, grid_name, now));
  let accuracy = result.accuracy;

  let quality = Quality::from_accuracy(accuracy);
  progress.review = progress.review.review(quality, now);

  let previous_total = progress.average_accuracy * progress.total_attempts as f64;
  progress.total_attempts += 1;
  progress.average_accuracy =
    round_to_tenth((previous_total + accuracy) / progress.total_attempts as f64);
  progress.best_accuracy = progress.best_accuracy.max(accuracy);
  progress.last_accuracy = accuracy;
  progress.last_attempt_date = Some(now);

  progress.push_session(SessionSummary {
    date: now,
    accuracy,
    duration_secs,
  });

  progress.problem_hands = update_problem_hands(
    &progress.problem_hands,
    &result.missed_hands,
    &result.incorrect_color_hands,
  );

  progress.grid_id = grid_id.to_string();
  progress.grid_name = grid_name.to_string();
  progress.updated_at = now;

  tracing::debug!(
    grid_id,
    accuracy,
    quality = quality.value(),
    interval_days = progress.review.interval_days,
    "Recorded training attempt"
  );

  progress
}

/// Format seconds as M:SS
pub fn format_duration(seconds: i64) -> String {
  let seconds = seconds.max(0);
  format!("{}:{:02}", seconds / 60, seconds % 60)
}
