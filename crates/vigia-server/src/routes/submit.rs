//! Submission handlers, one per collection form.
//!
//! Every handler validates first (collecting all problems) and only
//! then writes; a failing submission commits nothing.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use vigia_core::record::{new_uid, BandMemberRecord, CpcRecord, EmploymentRecord};
use vigia_core::{validate, when, FormKind, StructureSubmission, SurveySubmission};

use crate::error::ApiError;
use crate::routes::resolve_form;
use crate::state::AppState;

/// `POST /api/surveys/{form}` — expand one row per factor, append once.
pub async fn survey(
    State(state): State<Arc<AppState>>,
    Path(form): Path<String>,
    Json(submission): Json<SurveySubmission>,
) -> Result<Json<Value>, ApiError> {
    let form = resolve_form(&form)?;
    if !form.is_survey() {
        return Err(ApiError::UnknownForm(form.slug().to_string()));
    }
    let saved = state.store.submit_survey(form, &submission).await?;
    tracing::info!(form = form.slug(), saved, "survey stored");
    Ok(Json(json!({ "saved": saved, "worksheet": form.worksheet() })))
}

/// `POST /api/structures` — the gang/structure census.
pub async fn structures(
    State(state): State<Arc<AppState>>,
    Json(submission): Json<StructureSubmission>,
) -> Result<Json<Value>, ApiError> {
    let uid = state.store.submit_structures(submission).await?;
    Ok(Json(json!({ "uid": uid })))
}

/// `POST /api/cpc` request body.
#[derive(Debug, Default, Deserialize)]
pub struct CpcSubmission {
    /// Province from the catalog.
    #[serde(default)]
    pub provincia: String,
    /// Canton from the catalog.
    #[serde(default)]
    pub canton: String,
    /// Committee name.
    #[serde(default)]
    pub comite: String,
    /// Beneficiary name.
    #[serde(default)]
    pub nombre: String,
    /// Age, optional.
    pub edad: Option<u32>,
    /// Program attended.
    #[serde(default)]
    pub programa: String,
    /// Observations.
    #[serde(default)]
    pub observaciones: String,
}

/// `POST /api/cpc` — one beneficiary row.
pub async fn cpc(
    State(state): State<Arc<AppState>>,
    Json(submission): Json<CpcSubmission>,
) -> Result<Json<Value>, ApiError> {
    let mut issues = Vec::new();
    validate::push_location_issues(&mut issues, &submission.provincia, &submission.canton);
    validate::require_text(&mut issues, "comite", &submission.comite);
    validate::require_text(&mut issues, "nombre", &submission.nombre);
    validate::finish(issues)?;

    let record = CpcRecord {
        uid: new_uid(),
        date: when::today_stamp(),
        provincia: submission.provincia.trim().to_string(),
        canton: submission.canton.trim().to_string(),
        comite: submission.comite.trim().to_string(),
        nombre: submission.nombre.trim().to_string(),
        edad: submission.edad,
        programa: submission.programa.trim().to_string(),
        observaciones: submission.observaciones.trim().to_string(),
    };
    let uid = record.uid.clone();
    state
        .store
        .append_fields(FormKind::Cpc, vec![record.fields()])
        .await?;
    Ok(Json(json!({ "uid": uid })))
}

/// `POST /api/employability` request body.
#[derive(Debug, Default, Deserialize)]
pub struct EmploymentSubmission {
    /// Province from the catalog.
    #[serde(default)]
    pub provincia: String,
    /// Canton from the catalog.
    #[serde(default)]
    pub canton: String,
    /// Program name.
    #[serde(default)]
    pub programa: String,
    /// Enrolled count.
    #[serde(default)]
    pub inscritos: u32,
    /// Graduated count.
    #[serde(default)]
    pub egresados: u32,
    /// Observations.
    #[serde(default)]
    pub observaciones: String,
}

/// `POST /api/employability` — one program-count row.
pub async fn employability(
    State(state): State<Arc<AppState>>,
    Json(submission): Json<EmploymentSubmission>,
) -> Result<Json<Value>, ApiError> {
    let mut issues = Vec::new();
    validate::push_location_issues(&mut issues, &submission.provincia, &submission.canton);
    validate::require_text(&mut issues, "programa", &submission.programa);
    if submission.egresados > submission.inscritos {
        issues.push(vigia_core::Issue::field(
            "egresados",
            "no puede superar a inscritos",
        ));
    }
    validate::finish(issues)?;

    let record = EmploymentRecord {
        uid: new_uid(),
        date: when::today_stamp(),
        provincia: submission.provincia.trim().to_string(),
        canton: submission.canton.trim().to_string(),
        programa: submission.programa.trim().to_string(),
        inscritos: submission.inscritos,
        egresados: submission.egresados,
        observaciones: submission.observaciones.trim().to_string(),
    };
    let uid = record.uid.clone();
    state
        .store
        .append_fields(FormKind::Employment, vec![record.fields()])
        .await?;
    Ok(Json(json!({ "uid": uid })))
}

/// `POST /api/bands` request body.
#[derive(Debug, Default, Deserialize)]
pub struct BandSubmission {
    /// Province from the catalog.
    #[serde(default)]
    pub provincia: String,
    /// Canton from the catalog.
    #[serde(default)]
    pub canton: String,
    /// Band name.
    #[serde(default)]
    pub banda: String,
    /// Member name.
    #[serde(default)]
    pub nombre: String,
    /// Instrument.
    #[serde(default)]
    pub instrumento: String,
    /// Observations.
    #[serde(default)]
    pub observaciones: String,
}

/// `POST /api/bands` — one roster row.
pub async fn band(
    State(state): State<Arc<AppState>>,
    Json(submission): Json<BandSubmission>,
) -> Result<Json<Value>, ApiError> {
    let mut issues = Vec::new();
    validate::push_location_issues(&mut issues, &submission.provincia, &submission.canton);
    validate::require_text(&mut issues, "banda", &submission.banda);
    validate::require_text(&mut issues, "nombre", &submission.nombre);
    validate::finish(issues)?;

    let record = BandMemberRecord {
        uid: new_uid(),
        date: when::today_stamp(),
        provincia: submission.provincia.trim().to_string(),
        canton: submission.canton.trim().to_string(),
        banda: submission.banda.trim().to_string(),
        nombre: submission.nombre.trim().to_string(),
        instrumento: submission.instrumento.trim().to_string(),
        observaciones: submission.observaciones.trim().to_string(),
    };
    let uid = record.uid.clone();
    state
        .store
        .append_fields(FormKind::Band, vec![record.fields()])
        .await?;
    Ok(Json(json!({ "uid": uid })))
}
