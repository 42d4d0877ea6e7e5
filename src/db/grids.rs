//! Reference ranges (the answer key of each grid)

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Result};
use serde::Serialize;

use crate::domain::CellStateMap;

use super::{from_json, parse_timestamp, to_json};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Grid {
    pub id: String,
    pub name: String,
    pub cell_states: CellStateMap,
    pub updated_at: DateTime<Utc>,
}

/// Create or replace a grid's reference range
pub fn upsert_grid(conn: &Connection, grid: &Grid) -> Result<()> {
    conn.execute(
        r#"
    INSERT INTO grids (id, name, cell_states, updated_at)
    VALUES (?1, ?2, ?3, ?4)
    ON CONFLICT(id) DO UPDATE SET
        name = excluded.name,
        cell_states = excluded.cell_states,
        updated_at = excluded.updated_at
    "#,
        params![
            grid.id,
            grid.name,
            to_json(&grid.cell_states)?,
            grid.updated_at.to_rfc3339(),
        ],
    )?;
    Ok(())
}

pub fn get_grid(conn: &Connection, id: &str) -> Result<Option<Grid>> {
    conn.query_row(
        "SELECT id, name, cell_states, updated_at FROM grids WHERE id = ?1",
        params![id],
        row_to_grid,
    )
    .optional()
}

fn row_to_grid(row: &rusqlite::Row) -> Result<Grid> {
    let cell_states: String = row.get(2)?;
    let updated_at: String = row.get(3)?;

    Ok(Grid {
        id: row.get(0)?,
        name: row.get(1)?,
        cell_states: from_json(2, &cell_states)?,
        updated_at: parse_timestamp(3, &updated_at)?,
    })
}
