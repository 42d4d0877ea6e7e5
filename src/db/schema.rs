use rusqlite::{Connection, Result};

pub fn run_migrations(conn: &Connection) -> Result<()> {
  conn.execute_batch(
    r#"
    CREATE TABLE IF NOT EXISTS grids (
      id TEXT PRIMARY KEY,
      name TEXT NOT NULL,
      cell_states TEXT NOT NULL DEFAULT '{}',
      updated_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS training_progress (
      grid_id TEXT PRIMARY KEY,
      grid_name TEXT NOT NULL,
      easiness_factor REAL NOT NULL DEFAULT 2.5,
      repetitions INTEGER NOT NULL DEFAULT 0,
      interval_days INTEGER NOT NULL DEFAULT 0,
      next_review_date TEXT NOT NULL,
      total_attempts INTEGER NOT NULL DEFAULT 0,
      last_attempt_date TEXT,
      last_accuracy REAL NOT NULL DEFAULT 0,
      average_accuracy REAL NOT NULL DEFAULT 0,
      best_accuracy REAL NOT NULL DEFAULT 0,
      -- Newest-first list of {date, accuracy, duration}
      session_history TEXT NOT NULL DEFAULT '[]',
      -- Ranked list of {hand, missCount, totalSeen}
      problem_hands TEXT NOT NULL DEFAULT '[]',
      created_at TEXT NOT NULL,
      updated_at TEXT NOT NULL,
      FOREIGN KEY (grid_id) REFERENCES grids(id) ON DELETE CASCADE
    );

    CREATE TABLE IF NOT EXISTS training_sessions (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      grid_id TEXT NOT NULL,
      grid_name TEXT NOT NULL,
      started_at TEXT NOT NULL,
      ended_at TEXT NOT NULL,
      duration_secs INTEGER NOT NULL,
      accuracy REAL NOT NULL,
      correct_count INTEGER NOT NULL,
      missed_count INTEGER NOT NULL,
      extra_count INTEGER NOT NULL,
      incorrect_color_count INTEGER NOT NULL,
      total_hands_in_range INTEGER NOT NULL,
      -- Full scoring result
      result TEXT NOT NULL,
      FOREIGN KEY (grid_id) REFERENCES grids(id) ON DELETE CASCADE
    );

    CREATE INDEX IF NOT EXISTS idx_progress_next_review ON training_progress(next_review_date);
    CREATE INDEX IF NOT EXISTS idx_sessions_grid_id ON training_sessions(grid_id);
    CREATE INDEX IF NOT EXISTS idx_sessions_ended_at ON training_sessions(ended_at);
    "#,
  )?;

  conn.execute_batch("PRAGMA foreign_keys = ON;")?;

  Ok(())
}
