//! Compiled-in catalogs for form rendering.

use axum::Json;
use serde_json::{json, Value};

use vigia_core::catalog::{factor_color, PROVINCES, RISK_FACTORS};
use vigia_pareto::DESCRIPTORS;

/// `GET /api/catalog` — factors, provinces/cantons, and descriptors.
pub async fn catalog() -> Json<Value> {
    let factors: Vec<Value> = RISK_FACTORS
        .iter()
        .map(|factor| json!({ "label": factor, "color": factor_color(factor) }))
        .collect();

    let provinces: Vec<Value> = PROVINCES
        .iter()
        .map(|(provincia, cantones)| json!({ "provincia": provincia, "cantones": cantones }))
        .collect();

    let descriptors: Vec<Value> = DESCRIPTORS
        .iter()
        .map(|(label, category)| json!({ "label": label, "category": category.to_string() }))
        .collect();

    Json(json!({
        "factors": factors,
        "provinces": provinces,
        "descriptors": descriptors,
    }))
}
