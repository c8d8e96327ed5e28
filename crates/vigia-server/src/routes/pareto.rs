//! Pareto artifact endpoints.

use axum::extract::Json;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use vigia_pareto::{compute, render_html_report, render_workbook, FrequencyEntry, ReportMeta};

use crate::error::ApiError;

/// Request body for both artifact endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct ParetoRequest {
    /// Report title (cover page).
    pub title: Option<String>,
    /// Report subtitle (territory, period...).
    #[serde(default)]
    pub subtitle: String,
    /// Issuing unit.
    pub issued_by: Option<String>,
    /// The frequency table to analyze.
    #[serde(default)]
    pub entries: Vec<FrequencyEntry>,
}

impl ParetoRequest {
    fn meta(&self) -> ReportMeta {
        let defaults = ReportMeta::default();
        ReportMeta {
            title: self.title.clone().unwrap_or(defaults.title),
            subtitle: self.subtitle.clone(),
            issued_by: self.issued_by.clone().unwrap_or(defaults.issued_by),
        }
    }
}

/// `POST /api/pareto/report` — the multi-section HTML report.
pub async fn report(Json(request): Json<ParetoRequest>) -> Result<Response, ApiError> {
    let table = compute(&request.entries);
    let bytes = render_html_report(&request.meta(), &table)?;
    Ok(download(bytes, "text/html; charset=utf-8", "informe_pareto.html"))
}

/// `POST /api/pareto/workbook` — the XLSX with the embedded chart.
pub async fn workbook(Json(request): Json<ParetoRequest>) -> Result<Response, ApiError> {
    let table = compute(&request.entries);
    let bytes = render_workbook(&table)?;
    Ok(download(
        bytes,
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "pareto.xlsx",
    ))
}

fn download(bytes: Vec<u8>, content_type: &str, filename: &str) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response()
}
