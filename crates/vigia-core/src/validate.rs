//! Submission validation.
//!
//! Checks run before any write and collect every problem into one list,
//! so the user sees the complete picture at once and a failing
//! submission never commits a partial row set.

use crate::catalog;
use crate::error::{Error, Issue, Result};
use crate::record::{StructureSubmission, SurveySubmission, STRUCTURE_SLOTS};

/// Check a survey submission.
///
/// Required: a clicked map point and at least one risk factor. Factors
/// outside the catalog are allowed (the catalog carries an explicit
/// "Otro" entry) but logged.
pub fn survey(submission: &SurveySubmission) -> Result<()> {
    let mut issues = Vec::new();
    if submission.point.is_none() {
        issues.push(Issue::field("point", "selecciona un punto en el mapa"));
    }
    if submission.factores.iter().all(|f| f.trim().is_empty()) {
        issues.push(Issue::field(
            "factores",
            "selecciona al menos un factor de riesgo",
        ));
    }
    for factor in &submission.factores {
        if !factor.trim().is_empty() && !catalog::is_known_factor(factor.trim()) {
            log::debug!("factor outside catalog: {factor:?}");
        }
    }
    finish(issues)
}

/// Check a structure-census submission.
///
/// Required: a map point, province and canton from the catalog, and at
/// least one structure name; at most [`STRUCTURE_SLOTS`] names fit.
pub fn structures(submission: &StructureSubmission) -> Result<()> {
    let mut issues = Vec::new();
    if submission.point.is_none() {
        issues.push(Issue::field("point", "selecciona un punto en el mapa"));
    }
    push_location_issues(&mut issues, &submission.provincia, &submission.canton);
    let named: Vec<_> = submission
        .estructuras
        .iter()
        .filter(|s| !s.trim().is_empty())
        .collect();
    if named.is_empty() {
        issues.push(Issue::field(
            "estructuras",
            "indica al menos una estructura",
        ));
    } else if named.len() > STRUCTURE_SLOTS {
        issues.push(Issue::field(
            "estructuras",
            format!("máximo {STRUCTURE_SLOTS} estructuras por registro"),
        ));
    }
    finish(issues)
}

/// Check the shared location fields of the roster forms.
pub fn location(provincia: &str, canton: &str) -> Result<()> {
    let mut issues = Vec::new();
    push_location_issues(&mut issues, provincia, canton);
    finish(issues)
}

/// Check a required free-text field, collecting into `issues`.
pub fn require_text(issues: &mut Vec<Issue>, field: &'static str, value: &str) {
    if value.trim().is_empty() {
        issues.push(Issue::field(field, "campo obligatorio"));
    }
}

/// Location checks shared by the roster forms, collecting into `issues`.
pub fn push_location_issues(issues: &mut Vec<Issue>, provincia: &str, canton: &str) {
    let provincia = provincia.trim();
    let canton = canton.trim();
    if provincia.is_empty() {
        issues.push(Issue::field("provincia", "indica la provincia"));
    } else if catalog::cantons_of(provincia).is_none() {
        issues.push(Issue::field("provincia", "provincia fuera del catálogo"));
    }
    if canton.is_empty() {
        issues.push(Issue::field("canton", "indica el cantón"));
    } else if catalog::cantons_of(provincia).is_some() && !catalog::is_canton_of(provincia, canton)
    {
        issues.push(Issue::field("canton", "cantón fuera del catálogo de la provincia"));
    }
}

/// Turn collected issues into the final verdict.
pub fn finish(issues: Vec<Issue>) -> Result<()> {
    if issues.is_empty() {
        Ok(())
    } else {
        Err(Error::validation(issues))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::coords::GeoPoint;

    fn valid_survey() -> SurveySubmission {
        SurveySubmission {
            factores: vec![crate::catalog::RISK_FACTORS[0].to_string()],
            point: Some(GeoPoint::new(9.93, -84.08)),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_survey_passes() {
        assert!(survey(&valid_survey()).is_ok());
    }

    #[test]
    fn test_survey_collects_all_problems_at_once() {
        let sub = SurveySubmission::default();
        let err = survey(&sub).unwrap_err();
        let issues = err.issues().unwrap();
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().any(|i| i.field.as_deref() == Some("point")));
        assert!(issues.iter().any(|i| i.field.as_deref() == Some("factores")));
    }

    #[test]
    fn test_survey_blank_factors_do_not_count() {
        let mut sub = valid_survey();
        sub.factores = vec!["   ".into()];
        assert!(survey(&sub).is_err());
    }

    #[test]
    fn test_structures_requires_names_and_location() {
        let sub = StructureSubmission {
            point: Some(GeoPoint::new(9.9, -84.0)),
            ..Default::default()
        };
        let err = structures(&sub).unwrap_err();
        let issues = err.issues().unwrap();
        assert!(issues.iter().any(|i| i.field.as_deref() == Some("provincia")));
        assert!(issues.iter().any(|i| i.field.as_deref() == Some("canton")));
        assert!(issues.iter().any(|i| i.field.as_deref() == Some("estructuras")));
    }

    #[test]
    fn test_structures_checks_catalog_membership() {
        let sub = StructureSubmission {
            provincia: "Limón".into(),
            canton: "Escazú".into(),
            estructuras: vec!["Los Plumas".into()],
            point: Some(GeoPoint::new(9.9, -83.0)),
            ..Default::default()
        };
        let err = structures(&sub).unwrap_err();
        let issues = err.issues().unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field.as_deref(), Some("canton"));
    }

    #[test]
    fn test_structures_valid() {
        let sub = StructureSubmission {
            provincia: "Limón".into(),
            canton: "Pococí".into(),
            estructuras: vec!["Los Plumas".into()],
            point: Some(GeoPoint::new(10.2, -83.7)),
            ..Default::default()
        };
        assert!(structures(&sub).is_ok());
    }

    #[test]
    fn test_location_helper() {
        assert!(location("Cartago", "Paraíso").is_ok());
        assert!(location("", "").is_err());
        assert!(location("Cartago", "Nicoya").is_err());
    }

    #[test]
    fn test_require_text() {
        let mut issues = Vec::new();
        require_text(&mut issues, "nombre", "  ");
        require_text(&mut issues, "programa", "Soldadura");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field.as_deref(), Some("nombre"));
    }
}
