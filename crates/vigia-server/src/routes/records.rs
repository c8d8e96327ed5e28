//! Record listing, CSV export, and locate-by-uid edit/delete.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use vigia_core::record::split_factors;
use vigia_core::{when, FormKind, Table};

use crate::error::ApiError;
use crate::routes::resolve_form;
use crate::state::AppState;

/// Filters shared by the listing and export endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct RecordFilters {
    /// Keep rows carrying this factor.
    pub factor: Option<String>,
    /// Keep rows dated on or after this date (`dd-mm-YYYY`).
    pub from: Option<String>,
    /// Keep rows dated on or before this date (`dd-mm-YYYY`).
    pub to: Option<String>,
}

/// Apply the filters to a table.
///
/// Rows with unparseable dates drop out only when a date bound is set;
/// coordinate or date problems never abort the view.
fn apply_filters(table: &Table, filters: &RecordFilters) -> Table {
    let from = filters.from.as_deref().and_then(when::parse_date);
    let to = filters.to.as_deref().and_then(when::parse_date);

    table.filtered(|get| {
        if let Some(wanted) = filters.factor.as_deref() {
            let cell = get("factores");
            let matches = cell == wanted || split_factors(&cell).iter().any(|f| f == wanted);
            if !matches {
                return false;
            }
        }
        if from.is_some() || to.is_some() {
            let Some(date) = when::parse_date(&get("date")) else {
                return false;
            };
            if from.is_some_and(|bound| date < bound) {
                return false;
            }
            if to.is_some_and(|bound| date > bound) {
                return false;
            }
        }
        true
    })
}

/// `GET /api/records/{form}` — the filtered table.
pub async fn list(
    State(state): State<Arc<AppState>>,
    Path(form): Path<String>,
    Query(filters): Query<RecordFilters>,
) -> Result<Json<Table>, ApiError> {
    let form = resolve_form(&form)?;
    let table = state.store.read(form).await?;
    Ok(Json(apply_filters(&table, &filters)))
}

/// `GET /api/records/{form}/export.csv` — the filtered rows as CSV.
pub async fn export_csv(
    State(state): State<Arc<AppState>>,
    Path(form): Path<String>,
    Query(filters): Query<RecordFilters>,
) -> Result<Response, ApiError> {
    let form = resolve_form(&form)?;
    let table = state.store.read(form).await?;
    let csv = apply_filters(&table, &filters)
        .to_csv()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let disposition = format!("attachment; filename=\"{}.csv\"", form.worksheet());
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    )
        .into_response())
}

/// `PUT /api/records/{form}/{uid}` — rewrite a row's cells.
///
/// The body is a partial column → value map; unmentioned columns keep
/// their current cell and the uid itself cannot be changed.
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path((form, uid)): Path<(String, String)>,
    Json(changes): Json<HashMap<String, String>>,
) -> Result<StatusCode, ApiError> {
    let form = resolve_form(&form)?;

    state.store.invalidate(form);
    let table = state.store.read(form).await?;
    let uid_col = table
        .column_index("uid")
        .ok_or_else(|| ApiError::BadRequest("worksheet has no uid column".into()))?;
    let row = table
        .rows
        .iter()
        .find(|row| row.get(uid_col).map(String::as_str) == Some(uid.as_str()))
        .ok_or_else(|| ApiError::NotFound(format!("no row with uid {uid}")))?;

    let fields: Vec<(&'static str, String)> = form
        .headers()
        .iter()
        .map(|column| {
            let value = if *column == "uid" {
                uid.clone()
            } else if let Some(changed) = changes.get(*column) {
                changed.clone()
            } else {
                table
                    .column_index(column)
                    .and_then(|i| row.get(i))
                    .cloned()
                    .unwrap_or_default()
            };
            (*column, value)
        })
        .collect();

    state.store.update_by_uid(form, &uid, fields).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /api/records/{form}/{uid}` — remove a row.
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path((form, uid)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    let form = resolve_form(&form)?;
    state.store.delete_by_uid(form, &uid).await?;
    Ok(StatusCode::NO_CONTENT)
}
