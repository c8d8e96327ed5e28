//! Boundary dataset endpoints.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use vigia_geo::BoundaryDataset;

use crate::error::ApiError;
use crate::state::AppState;

/// `GET /api/geo/provinces` — the cached province polygons with labels.
pub async fn provinces(
    State(state): State<Arc<AppState>>,
) -> Result<Json<BoundaryDataset>, ApiError> {
    let dataset = state.geo.provinces().await?;
    Ok(Json((*dataset).clone()))
}

/// `GET /api/geo/cantons` — the cached canton polygons with labels.
pub async fn cantons(
    State(state): State<Arc<AppState>>,
) -> Result<Json<BoundaryDataset>, ApiError> {
    let dataset = state.geo.cantons().await?;
    Ok(Json((*dataset).clone()))
}
