//! Route table and handlers.

use std::sync::Arc;

use axum::routing::{get, post, put};
use axum::Router;

use crate::state::AppState;

pub mod catalog;
pub mod geo;
pub mod pareto;
pub mod records;
pub mod submit;
pub mod viewer;

use vigia_core::FormKind;

use crate::error::ApiError;

/// Assemble the full route table.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/catalog", get(catalog::catalog))
        .route("/api/surveys/{form}", post(submit::survey))
        .route("/api/structures", post(submit::structures))
        .route("/api/cpc", post(submit::cpc))
        .route("/api/employability", post(submit::employability))
        .route("/api/bands", post(submit::band))
        .route("/api/records/{form}", get(records::list))
        .route("/api/records/{form}/export.csv", get(records::export_csv))
        .route(
            "/api/records/{form}/{uid}",
            put(records::update).delete(records::delete),
        )
        .route("/api/map/points", get(viewer::map_points))
        .route("/api/charts/summary", get(viewer::charts_summary))
        .route("/api/pareto/report", post(pareto::report))
        .route("/api/pareto/workbook", post(pareto::workbook))
        .route("/api/geo/provinces", get(geo::provinces))
        .route("/api/geo/cantons", get(geo::cantons))
        .with_state(state)
}

async fn health() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({ "status": "ok" }))
}

/// Resolve a path segment into a form, 404ing unknown slugs.
pub(crate) fn resolve_form(slug: &str) -> Result<FormKind, ApiError> {
    slug.parse::<FormKind>()
        .map_err(|_| ApiError::UnknownForm(slug.to_string()))
}
