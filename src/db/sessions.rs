//! Log of completed training sessions

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Result};
use serde::Serialize;

use crate::scoring::ScoringResult;

use super::{from_json, parse_timestamp, to_json};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingSessionLog {
    pub id: i64,
    pub grid_id: String,
    pub grid_name: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub duration_secs: i64,
    pub result: ScoringResult,
}

impl TrainingSessionLog {
    pub fn new(
        grid_id: &str,
        grid_name: &str,
        started_at: DateTime<Utc>,
        ended_at: DateTime<Utc>,
        result: ScoringResult,
    ) -> Self {
        Self {
            id: 0,
            grid_id: grid_id.to_string(),
            grid_name: grid_name.to_string(),
            started_at,
            ended_at,
            duration_secs: (ended_at - started_at).num_seconds().max(0),
            result,
        }
    }
}

pub fn insert_training_session(conn: &Connection, log: &TrainingSessionLog) -> Result<i64> {
    conn.execute(
        r#"
    INSERT INTO training_sessions
      (grid_id, grid_name, started_at, ended_at, duration_secs, accuracy,
       correct_count, missed_count, extra_count, incorrect_color_count,
       total_hands_in_range, result)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
    "#,
        params![
            log.grid_id,
            log.grid_name,
            log.started_at.to_rfc3339(),
            log.ended_at.to_rfc3339(),
            log.duration_secs,
            log.result.accuracy,
            log.result.correct_count() as i64,
            log.result.missed_count() as i64,
            log.result.extra_count() as i64,
            log.result.incorrect_color_count() as i64,
            log.result.total_hands_in_range as i64,
            to_json(&log.result)?,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Most recent sessions for a grid, newest first
pub fn get_recent_sessions(
    conn: &Connection,
    grid_id: &str,
    limit: u32,
) -> Result<Vec<TrainingSessionLog>> {
    let mut stmt = conn.prepare(
        r#"
    SELECT id, grid_id, grid_name, started_at, ended_at, duration_secs, result
    FROM training_sessions
    WHERE grid_id = ?1
    ORDER BY ended_at DESC, id DESC
    LIMIT ?2
    "#,
    )?;

    let sessions = stmt
        .query_map(params![grid_id, limit], |row| {
            let started_at: String = row.get(3)?;
            let ended_at: String = row.get(4)?;
            let result: String = row.get(6)?;
            Ok(TrainingSessionLog {
                id: row.get(0)?,
                grid_id: row.get(1)?,
                grid_name: row.get(2)?,
                started_at: parse_timestamp(3, &started_at)?,
                ended_at: parse_timestamp(4, &ended_at)?,
                duration_secs: row.get(5)?,
                result: from_json(6, &result)?,
            })
        })?
        .collect::<Result<Vec<_>>>()?;

    Ok(sessions)
}
