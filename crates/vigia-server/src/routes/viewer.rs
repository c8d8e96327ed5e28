//! Viewer data: jittered map points and chart summaries.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use vigia_core::catalog::factor_color;
use vigia_core::record::{expand_survey_rows, SurveyRecord};
use vigia_core::{when, FormKind};

use crate::error::ApiError;
use crate::routes::resolve_form;
use crate::state::AppState;

/// Filters shared by the viewer endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct ViewerFilters {
    /// Restrict to one survey form; all five when absent.
    pub form: Option<String>,
    /// Restrict to one factor.
    pub factor: Option<String>,
    /// Keep records dated on or after this date.
    pub from: Option<String>,
    /// Keep records dated on or before this date.
    pub to: Option<String>,
    /// Top-N cutoff for the factor ranking (default 10).
    pub top: Option<usize>,
}

/// One renderable map marker.
#[derive(Debug, Serialize)]
pub struct MapPoint {
    /// Jittered latitude.
    pub lat: f64,
    /// Jittered longitude.
    pub lng: f64,
    /// The record's factor.
    pub factor: String,
    /// Marker color for the factor.
    pub color: &'static str,
    /// Source form label.
    pub form: &'static str,
    /// Capture date as stored.
    pub date: String,
    /// Neighborhood.
    pub barrio: String,
    /// The stored map link.
    pub maps_link: String,
}

/// `GET /api/map/points` response.
#[derive(Debug, Serialize)]
pub struct MapPoints {
    /// Markers ready to render.
    pub points: Vec<MapPoint>,
    /// Records excluded for missing/unparseable coordinates.
    pub omitted: usize,
}

/// Summary counters and rankings for the charts tab.
#[derive(Debug, Serialize)]
pub struct ChartSummary {
    /// Rows in view after filters.
    pub records: usize,
    /// Distinct non-empty factors in view.
    pub unique_factors: usize,
    /// Distinct source forms in view.
    pub forms_in_view: usize,
    /// Factor ranking, descending, top-N.
    pub top_factors: Vec<FactorCount>,
    /// Records per structure-linkage answer.
    pub by_structure_tie: Vec<TieCount>,
}

/// One ranked factor.
#[derive(Debug, Serialize)]
pub struct FactorCount {
    /// Factor label.
    pub factor: String,
    /// Records carrying it.
    pub count: usize,
}

/// One structure-linkage bucket.
#[derive(Debug, Serialize)]
pub struct TieCount {
    /// The stored answer ("Sí" / "No").
    pub respuesta: String,
    /// Records carrying it.
    pub count: usize,
}

/// Which survey forms a filter selects.
fn selected_forms(filter: Option<&str>) -> Result<Vec<FormKind>, ApiError> {
    match filter {
        None => Ok(FormKind::SURVEYS.to_vec()),
        Some(slug) => {
            let form = resolve_form(slug)?;
            if !form.is_survey() {
                return Err(ApiError::BadRequest(format!(
                    "{slug} is not a survey form"
                )));
            }
            Ok(vec![form])
        }
    }
}

/// Load the survey records in view, tagged with their source form.
async fn records_in_view(
    state: &AppState,
    filters: &ViewerFilters,
) -> Result<Vec<(FormKind, SurveyRecord)>, ApiError> {
    let from = filters.from.as_deref().and_then(when::parse_date);
    let to = filters.to.as_deref().and_then(when::parse_date);

    let mut records = Vec::new();
    for form in selected_forms(filters.form.as_deref())? {
        let table = state.store.read(form).await?;
        for record in expand_survey_rows(&table) {
            if let Some(wanted) = filters.factor.as_deref() {
                if record.factor != wanted {
                    continue;
                }
            }
            if from.is_some() || to.is_some() {
                let Some(date) = record.parsed_date() else {
                    continue;
                };
                if from.is_some_and(|bound| date < bound) || to.is_some_and(|bound| date > bound) {
                    continue;
                }
            }
            records.push((form, record));
        }
    }
    Ok(records)
}

/// `GET /api/map/points` — jittered markers plus the omitted count.
pub async fn map_points(
    State(state): State<Arc<AppState>>,
    Query(filters): Query<ViewerFilters>,
) -> Result<Json<MapPoints>, ApiError> {
    let records = records_in_view(&state, &filters).await?;

    let mut points = Vec::new();
    let mut omitted = 0usize;
    for (index, (form, record)) in records.iter().enumerate() {
        let Some(point) = record.coords() else {
            // Still present in tabular exports; just not on the map.
            omitted += 1;
            continue;
        };
        let jittered = point.jittered(index as u64);
        points.push(MapPoint {
            lat: jittered.lat,
            lng: jittered.lng,
            color: factor_color(&record.factor),
            factor: record.factor.clone(),
            form: form.label(),
            date: record.date.clone(),
            barrio: record.barrio.clone(),
            maps_link: record.maps_link.clone(),
        });
    }

    Ok(Json(MapPoints { points, omitted }))
}

/// `GET /api/charts/summary` — counters and rankings for the charts tab.
pub async fn charts_summary(
    State(state): State<Arc<AppState>>,
    Query(filters): Query<ViewerFilters>,
) -> Result<Json<ChartSummary>, ApiError> {
    let records = records_in_view(&state, &filters).await?;
    let top = filters.top.unwrap_or(10).max(1);

    let mut factor_counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut tie_counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut forms: HashSet<&'static str> = HashSet::new();

    for (form, record) in &records {
        forms.insert(form.label());
        if !record.factor.trim().is_empty() {
            *factor_counts.entry(record.factor.clone()).or_default() += 1;
        }
        let respuesta = match record.ligado_estructura {
            vigia_core::record::StructureTie::Yes => "Sí",
            vigia_core::record::StructureTie::No => "No",
        };
        *tie_counts.entry(respuesta.to_string()).or_default() += 1;
    }

    let unique_factors = factor_counts.len();
    let mut top_factors: Vec<FactorCount> = factor_counts
        .into_iter()
        .map(|(factor, count)| FactorCount { factor, count })
        .collect();
    top_factors.sort_by(|a, b| b.count.cmp(&a.count));
    top_factors.truncate(top);

    let by_structure_tie = tie_counts
        .into_iter()
        .map(|(respuesta, count)| TieCount { respuesta, count })
        .collect();

    Ok(Json(ChartSummary {
        records: records.len(),
        unique_factors,
        forms_in_view: forms.len(),
        top_factors,
        by_structure_tie,
    }))
}
