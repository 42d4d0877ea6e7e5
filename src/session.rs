//! In-memory store of active training sessions.
//!
//! A session remembers which grid is being recalled and when the attempt
//! started, so the elapsed time can be derived at submission. Sessions
//! expire after a configurable duration of inactivity.

use crate::config;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{LazyLock, Mutex, MutexGuard};

#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSession {
  pub grid_id: String,
  pub started_at: DateTime<Utc>,
}

impl TrainingSession {
  /// Whole seconds elapsed since the session started
  pub fn elapsed_secs(&self, now: DateTime<Utc>) -> i64 {
    (now - self.started_at).num_seconds().max(0)
  }

  pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
    self.started_at <= expiry_cutoff(now)
  }
}

fn expiry_cutoff(now: DateTime<Utc>) -> DateTime<Utc> {
  now - Duration::hours(config::SESSION_EXPIRY_HOURS)
}

/// Global session store
static SESSIONS: LazyLock<Mutex<HashMap<String, TrainingSession>>> =
  LazyLock::new(|| Mutex::new(HashMap::new()));

fn sessions() -> MutexGuard<'static, HashMap<String, TrainingSession>> {
  // The map holds plain data, so a poisoned lock is still usable
  SESSIONS.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Start timing a new attempt on a grid, returning its session ID
pub fn start_session(grid_id: &str, now: DateTime<Utc>) -> String {
  let mut sessions = sessions();

  // Clean up expired sessions occasionally (~10% chance)
  if rand::random::<u8>() < config::SESSION_CLEANUP_THRESHOLD {
    cleanup_expired(&mut sessions, now);
  }

  let session_id = generate_session_id();
  sessions.insert(
    session_id.clone(),
    TrainingSession {
      grid_id: grid_id.to_string(),
      started_at: now,
    },
  );
  tracing::debug!("Started training session {} for grid {}", session_id, grid_id);
  session_id
}

/// Look up an active session without ending it.
/// An expired session is dropped and reported as absent.
pub fn get_session(session_id: &str, now: DateTime<Utc>) -> Option<TrainingSession> {
  let mut sessions = sessions();
  let session = sessions.get(session_id)?.clone();
  if session.is_expired(now) {
    tracing::debug!("Training session {} expired", session_id);
    sessions.remove(session_id);
    return None;
  }
  Some(session)
}

/// End a session, returning it if it was active
pub fn finish_session(session_id: &str, now: DateTime<Utc>) -> Option<TrainingSession> {
  sessions()
    .remove(session_id)
    .filter(|session| !session.is_expired(now))
}

/// Abort a session without recording anything
pub fn discard_session(session_id: &str, now: DateTime<Utc>) -> bool {
  finish_session(session_id, now).is_some()
}

/// Clean up expired sessions
fn cleanup_expired(sessions: &mut HashMap<String, TrainingSession>, now: DateTime<Utc>) {
  sessions.retain(|_, session| !session.is_expired(now));
}

/// Generate a new session ID
pub fn generate_session_id() -> String {
  use rand::Rng;
  let mut rng = rand::rng();
  (0..32)
    .map(|_| {
      let idx = rng.random_range(0..36);
      if idx < 10 {
        (b'0' + idx) as char
      } else {
        (b'a' + idx - 10) as char
      }
    })
    .collect()
}
