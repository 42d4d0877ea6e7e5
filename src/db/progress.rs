//! Persisted training progress, one row per grid

use rusqlite::{params, Connection, OptionalExtension, Result};

use crate::srs::{ProgressRecord, ReviewState};

use super::{from_json, parse_timestamp, to_json};

const PROGRESS_COLUMNS: &str = r#"
    grid_id, grid_name, easiness_factor, repetitions, interval_days, next_review_date,
    total_attempts, last_attempt_date, last_accuracy, average_accuracy, best_accuracy,
    session_history, problem_hands, created_at, updated_at
"#;

pub fn get_progress(conn: &Connection, grid_id: &str) -> Result<Option<ProgressRecord>> {
    conn.query_row(
        &format!("SELECT {} FROM training_progress WHERE grid_id = ?1", PROGRESS_COLUMNS),
        params![grid_id],
        row_to_progress,
    )
    .optional()
}

/// All progress records, soonest review first
pub fn get_all_progress(conn: &Connection) -> Result<Vec<ProgressRecord>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM training_progress ORDER BY next_review_date ASC, grid_id ASC",
        PROGRESS_COLUMNS
    ))?;

    let records = stmt
        .query_map([], row_to_progress)?
        .collect::<Result<Vec<_>>>()?;

    Ok(records)
}

/// Write the whole record in one statement
pub fn save_progress(conn: &Connection, progress: &ProgressRecord) -> Result<()> {
    conn.execute(
        &format!(
            r#"
    INSERT OR REPLACE INTO training_progress ({})
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)
    "#,
            PROGRESS_COLUMNS
        ),
        params![
            progress.grid_id,
            progress.grid_name,
            progress.review.easiness_factor,
            progress.review.repetitions,
            progress.review.interval_days,
            progress.review.next_review_date.to_rfc3339(),
            progress.total_attempts,
            progress.last_attempt_date.map(|d| d.to_rfc3339()),
            progress.last_accuracy,
            progress.average_accuracy,
            progress.best_accuracy,
            to_json(&progress.session_history)?,
            to_json(&progress.problem_hands)?,
            progress.created_at.to_rfc3339(),
            progress.updated_at.to_rfc3339(),
        ],
    )?;
    Ok(())
}

fn row_to_progress(row: &rusqlite::Row) -> Result<ProgressRecord> {
    let next_review_date: String = row.get(5)?;
    let last_attempt_date: Option<String> = row.get(7)?;
    let session_history: String = row.get(11)?;
    let problem_hands: String = row.get(12)?;
    let created_at: String = row.get(13)?;
    let updated_at: String = row.get(14)?;

    let next_review_date = parse_timestamp(5, &next_review_date)?;

    Ok(ProgressRecord {
        grid_id: row.get(0)?,
        grid_name: row.get(1)?,
        review: ReviewState {
            easiness_factor: row.get(2)?,
            repetitions: row.get(3)?,
            interval_days: row.get(4)?,
            next_review_date,
            // Re-derived by readers against their own "today"
            due_for_review: false,
        },
        total_attempts: row.get(6)?,
        last_attempt_date: last_attempt_date
            .map(|s| parse_timestamp(7, &s))
            .transpose()?,
        last_accuracy: row.get(8)?,
        average_accuracy: row.get(9)?,
        best_accuracy: row.get(10)?,
        session_history: from_json(11, &session_history)?,
        problem_hands: from_json(12, &problem_hands)?,
        created_at: parse_timestamp(13, &created_at)?,
        updated_at: parse_timestamp(14, &updated_at)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MAX_INTERVAL_DAYS;
    use crate::db::test_support::test_db;
    use crate::db::{upsert_grid, Grid};
    use crate::domain::CellStateMap;
    use crate::scoring::score_attempt;
    use crate::srs::record_attempt;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap()
    }

    fn insert_grid(conn: &Connection, id: &str) {
        upsert_grid(
            conn,
            &Grid {
                id: id.to_string(),
                name: id.to_uppercase(),
                cell_states: CellStateMap::from([("AA", "raise"), ("KK", "raise")]),
                updated_at: now(),
            },
        )
        .unwrap();
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let db = test_db();
        insert_grid(&db.conn, "g1");

        let reference = CellStateMap::from([("AA", "raise"), ("KK", "raise")]);
        let attempt = CellStateMap::from([("AA", "raise")]);
        let result = score_attempt(&reference, &attempt);
        let progress = record_attempt(None, "g1", "G1", &result, 30, now());

        save_progress(&db.conn, &progress).unwrap();
        let loaded = get_progress(&db.conn, "g1").unwrap().unwrap();

        assert_eq!(loaded.total_attempts, 1);
        assert_eq!(loaded.review.interval_days, progress.review.interval_days);
        assert_eq!(loaded.review.next_review_date, progress.review.next_review_date);
        assert_eq!(loaded.session_history, progress.session_history);
        assert_eq!(loaded.problem_hands, progress.problem_hands);
        assert_eq!(loaded.last_attempt_date, Some(now()));
    }

    #[test]
    fn test_longest_interval_roundtrips() {
        let db = test_db();
        insert_grid(&db.conn, "g1");

        let reference = CellStateMap::from([("AA", "raise")]);
        let result = score_attempt(&reference, &reference);
        let mut progress = None;
        for _ in 0..30 {
            let updated = record_attempt(progress, "g1", "G1", &result, 10, now());
            save_progress(&db.conn, &updated).unwrap();
            progress = get_progress(&db.conn, "g1").unwrap();
        }

        let loaded = progress.unwrap();
        assert_eq!(loaded.review.interval_days, MAX_INTERVAL_DAYS);
        assert_eq!(
            loaded.review.next_review_date,
            now() + Duration::days(MAX_INTERVAL_DAYS)
        );
        assert_eq!(get_all_progress(&db.conn).unwrap().len(), 1);
    }

    #[test]
    fn test_missing_progress() {
        let db = test_db();
        assert!(get_progress(&db.conn, "nope").unwrap().is_none());
    }

    #[test]
    fn test_save_overwrites() {
        let db = test_db();
        insert_grid(&db.conn, "g1");

        let mut progress = ProgressRecord::new("g1", "G1", now());
        save_progress(&db.conn, &progress).unwrap();
        progress.total_attempts = 9;
        save_progress(&db.conn, &progress).unwrap();

        let all = get_all_progress(&db.conn).unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].total_attempts, 9);
    }

    #[test]
    fn test_all_progress_ordered_by_next_review() {
        let db = test_db();
        for (id, offset) in [("late", 9), ("soon", 1), ("mid", 4)] {
            insert_grid(&db.conn, id);
            let mut progress = ProgressRecord::new(id, id, now());
            progress.review.next_review_date = now() + Duration::days(offset);
            save_progress(&db.conn, &progress).unwrap();
        }

        let ids: Vec<String> = get_all_progress(&db.conn)
            .unwrap()
            .into_iter()
            .map(|p| p.grid_id)
            .collect();
        assert_eq!(ids, vec!["soon", "mid", "late"]);
    }
}
