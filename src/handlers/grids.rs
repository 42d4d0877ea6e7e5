use axum::{
  extract::{Path, State},
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use chrono::Utc;
use serde::Deserialize;
use std::collections::BTreeMap;

use crate::db::{self, try_lock, DbPool, Grid};
use crate::domain::CellStateMap;

use super::{db_failure, db_unavailable, error_response};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PutGridRequest {
  pub name: String,
  #[serde(default)]
  pub cell_states: BTreeMap<String, String>,
}

/// Store the reference range of a grid.
///
/// PUT /api/grids/{id}
pub async fn put_grid(
  State(pool): State<DbPool>,
  Path(id): Path<String>,
  Json(request): Json<PutGridRequest>,
) -> Response {
  if id.trim().is_empty() || request.name.trim().is_empty() {
    return error_response(StatusCode::BAD_REQUEST, "Grid id and name are required");
  }

  let (cell_states, ignored_keys) = CellStateMap::from_raw(request.cell_states);
  let grid = Grid {
    id,
    name: request.name,
    cell_states,
    updated_at: Utc::now(),
  };

  let Ok(conn) = try_lock(&pool) else {
    return db_unavailable();
  };
  if let Err(e) = db::upsert_grid(&conn, &grid) {
    return db_failure("Failed to save grid", e);
  }

  let combos = grid.cell_states.combo_count();
  tracing::info!(
    "Saved grid {} ({} painted cells, {} combos, {} ignored keys)",
    grid.id,
    grid.cell_states.len(),
    combos,
    ignored_keys.len()
  );

  Json(serde_json::json!({
    "grid": grid,
    "combos": combos,
    "ignoredKeys": ignored_keys,
  }))
  .into_response()
}

/// GET /api/grids/{id}
pub async fn get_grid(State(pool): State<DbPool>, Path(id): Path<String>) -> Response {
  let Ok(conn) = try_lock(&pool) else {
    return db_unavailable();
  };

  match db::get_grid(&conn, &id) {
    Ok(Some(grid)) => Json(grid).into_response(),
    Ok(None) => error_response(StatusCode::NOT_FOUND, "Grid not found"),
    Err(e) => db_failure("Failed to load grid", e),
  }
}
