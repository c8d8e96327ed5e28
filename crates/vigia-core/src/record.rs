//! Typed records for every collection form.
//!
//! The original sheets were driven by loose row dictionaries keyed by
//! header text; here each form has an explicit record struct and an
//! explicit mapping to its worksheet columns. Shaping a record against a
//! *live* header row (which may carry extra legacy columns) goes through
//! [`project_row`], so column order in the sheet never has to match the
//! schema order.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::coords::{extract_coords, GeoPoint};
use crate::table::Table;

/// Number of named-structure columns on the census worksheet.
pub const STRUCTURE_SLOTS: usize = 11;

/// A named field value, ready to be shaped against a header row.
pub type Field = (&'static str, String);

/// Shape named fields into a cell row following `headers` order.
///
/// Headers with no matching field produce empty cells; fields with no
/// matching header are dropped. Mirrors how rows were always appended:
/// `[row.get(h, "") for h in headers]`.
pub fn project_row(fields: &[Field], headers: &[String]) -> Vec<String> {
    headers
        .iter()
        .map(|header| {
            fields
                .iter()
                .find(|(name, _)| name == header)
                .map(|(_, value)| value.clone())
                .unwrap_or_default()
        })
        .collect()
}

/// Generate a record identifier.
///
/// Later revisions of the sheets carry a `uid` column so single rows can
/// be located for edit/delete; this is that identifier.
pub fn new_uid() -> String {
    Uuid::new_v4().to_string()
}

/// Split a stored factor cell into its individual factors.
///
/// Current writes put one factor per row, but legacy rows may hold a
/// pipe-delimited list; both shapes pass through here on read.
pub fn split_factors(raw: &str) -> Vec<String> {
    raw.split('|')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

// ============================================================================
// Survey
// ============================================================================

/// Whether a survey record is tied to a known criminal structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StructureTie {
    /// Not tied to a structure (the default answer).
    #[default]
    No,
    /// Tied to a structure; `nombre_estructura` names it.
    Yes,
}

impl StructureTie {
    /// Parse a stored cell, tolerating the Spanish spellings.
    pub fn from_cell(cell: &str) -> Self {
        match cell.trim().to_lowercase().as_str() {
            "sí" | "si" | "yes" => StructureTie::Yes,
            _ => StructureTie::No,
        }
    }
}

impl fmt::Display for StructureTie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StructureTie::No => f.write_str("No"),
            StructureTie::Yes => f.write_str("Sí"),
        }
    }
}

/// One persisted survey row: a single factor observed at a location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyRecord {
    /// Row identifier for locate-by-id edit/delete.
    pub uid: String,
    /// Capture date, `dd-mm-YYYY`.
    pub date: String,
    /// Neighborhood, free text, may be empty.
    pub barrio: String,
    /// The selected risk factor for this row.
    pub factor: String,
    /// Related crimes, free text.
    pub delitos_relacionados: String,
    /// Structure linkage answer.
    pub ligado_estructura: StructureTie,
    /// Structure name when linked.
    pub nombre_estructura: String,
    /// Free-text observations.
    pub observaciones: String,
    /// Stored map link encoding the location.
    pub maps_link: String,
}

impl SurveyRecord {
    /// Named fields in schema order, for shaping against live headers.
    pub fn fields(&self) -> Vec<Field> {
        vec![
            ("uid", self.uid.clone()),
            ("date", self.date.clone()),
            ("barrio", self.barrio.clone()),
            ("factores", self.factor.clone()),
            ("delitos_relacionados", self.delitos_relacionados.clone()),
            ("ligado_estructura", self.ligado_estructura.to_string()),
            ("nombre_estructura", self.nombre_estructura.clone()),
            ("observaciones", self.observaciones.clone()),
            ("maps_link", self.maps_link.clone()),
        ]
    }

    /// Coordinates recovered from the stored map link, if parseable.
    pub fn coords(&self) -> Option<GeoPoint> {
        extract_coords(&self.maps_link).map(|(lat, lng)| GeoPoint::new(lat, lng))
    }

    /// Capture date, if the stored cell parses.
    pub fn parsed_date(&self) -> Option<chrono::NaiveDate> {
        crate::when::parse_date(&self.date)
    }
}

/// A survey submission as received from a field user.
///
/// One submission expands to one persisted row per selected factor; all
/// expanded rows share every column except the factor and the uid.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SurveySubmission {
    /// Neighborhood (optional).
    #[serde(default)]
    pub barrio: String,
    /// Selected risk factors; at least one is required.
    #[serde(default)]
    pub factores: Vec<String>,
    /// Related crimes (optional).
    #[serde(default)]
    pub delitos_relacionados: String,
    /// Structure linkage answer (optional, defaults to No).
    #[serde(default)]
    pub ligado_estructura: StructureTie,
    /// Structure name (optional).
    #[serde(default)]
    pub nombre_estructura: String,
    /// Observations (optional).
    #[serde(default)]
    pub observaciones: String,
    /// The clicked map point; required.
    pub point: Option<GeoPoint>,
}

impl SurveySubmission {
    /// Expand into the rows to persist, one per selected factor.
    ///
    /// Callers validate first (see [`crate::validate`]); expansion on an
    /// unvalidated submission still refuses a missing map point.
    pub fn expand(&self, date: &str) -> crate::Result<Vec<SurveyRecord>> {
        let Some(point) = self.point else {
            return Err(crate::Error::validation(vec![crate::Issue::general(
                "selecciona un punto en el mapa",
            )]));
        };
        let maps_link = point.maps_link();
        Ok(self
            .factores
            .iter()
            .map(|factor| SurveyRecord {
                uid: new_uid(),
                date: date.to_string(),
                barrio: self.barrio.trim().to_string(),
                factor: factor.trim().to_string(),
                delitos_relacionados: self.delitos_relacionados.trim().to_string(),
                ligado_estructura: self.ligado_estructura,
                nombre_estructura: self.nombre_estructura.trim().to_string(),
                observaciones: self.observaciones.trim().to_string(),
                maps_link: maps_link.clone(),
            })
            .collect())
    }
}

/// Read a survey table back into records, one logical record per factor.
///
/// Legacy rows holding pipe-delimited factor lists are expanded the same
/// way the write path expands submissions; rows with no factor at all
/// come back once with an empty factor.
pub fn expand_survey_rows(table: &Table) -> Vec<SurveyRecord> {
    let mut records = Vec::new();
    for row in &table.rows {
        let cell = |column: &str| -> String {
            table
                .column_index(column)
                .and_then(|i| row.get(i))
                .cloned()
                .unwrap_or_default()
        };
        let mut factors = split_factors(&cell("factores"));
        if factors.is_empty() {
            factors.push(String::new());
        }
        for factor in factors {
            records.push(SurveyRecord {
                uid: cell("uid"),
                date: cell("date"),
                barrio: cell("barrio"),
                factor,
                delitos_relacionados: cell("delitos_relacionados"),
                ligado_estructura: StructureTie::from_cell(&cell("ligado_estructura")),
                nombre_estructura: cell("nombre_estructura"),
                observaciones: cell("observaciones"),
                maps_link: cell("maps_link"),
            });
        }
    }
    records
}

// ============================================================================
// Structure census
// ============================================================================

/// One persisted structure-census row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureRecord {
    /// Row identifier.
    pub uid: String,
    /// Capture date, `dd-mm-YYYY`.
    pub date: String,
    /// Province from the catalog.
    pub provincia: String,
    /// Canton from the catalog.
    pub canton: String,
    /// District, optional free text.
    pub distrito: String,
    /// Named structures, up to [`STRUCTURE_SLOTS`].
    pub estructuras: Vec<String>,
    /// Stored map link encoding the location.
    pub maps_link: String,
}

impl StructureRecord {
    /// Named fields in schema order; empty slots become empty cells.
    pub fn fields(&self) -> Vec<Field> {
        const SLOT_NAMES: [&str; STRUCTURE_SLOTS] = [
            "estructura_1",
            "estructura_2",
            "estructura_3",
            "estructura_4",
            "estructura_5",
            "estructura_6",
            "estructura_7",
            "estructura_8",
            "estructura_9",
            "estructura_10",
            "estructura_11",
        ];
        let mut fields = vec![
            ("uid", self.uid.clone()),
            ("date", self.date.clone()),
            ("provincia", self.provincia.clone()),
            ("canton", self.canton.clone()),
            ("distrito", self.distrito.clone()),
        ];
        for (slot, name) in SLOT_NAMES.iter().enumerate() {
            fields.push((*name, self.estructuras.get(slot).cloned().unwrap_or_default()));
        }
        fields.push(("maps_link", self.maps_link.clone()));
        fields
    }

    /// Coordinates recovered from the stored map link, if parseable.
    pub fn coords(&self) -> Option<GeoPoint> {
        extract_coords(&self.maps_link).map(|(lat, lng)| GeoPoint::new(lat, lng))
    }
}

/// A structure-census submission as received from a field user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StructureSubmission {
    /// Province; required, from the catalog.
    #[serde(default)]
    pub provincia: String,
    /// Canton; required, from the catalog.
    #[serde(default)]
    pub canton: String,
    /// District (optional).
    #[serde(default)]
    pub distrito: String,
    /// Named structures; at least one, at most [`STRUCTURE_SLOTS`].
    #[serde(default)]
    pub estructuras: Vec<String>,
    /// The clicked map point; required.
    pub point: Option<GeoPoint>,
}

impl StructureSubmission {
    /// Build the single row to persist.
    pub fn into_record(self, date: &str) -> crate::Result<StructureRecord> {
        let Some(point) = self.point else {
            return Err(crate::Error::validation(vec![crate::Issue::general(
                "selecciona un punto en el mapa",
            )]));
        };
        Ok(StructureRecord {
            uid: new_uid(),
            date: date.to_string(),
            provincia: self.provincia.trim().to_string(),
            canton: self.canton.trim().to_string(),
            distrito: self.distrito.trim().to_string(),
            estructuras: self
                .estructuras
                .iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .take(STRUCTURE_SLOTS)
                .collect(),
            maps_link: point.maps_link(),
        })
    }
}

/// Read a structure-census table back into records.
pub fn structure_rows(table: &Table) -> Vec<StructureRecord> {
    table
        .rows
        .iter()
        .map(|row| {
            let cell = |column: &str| -> String {
                table
                    .column_index(column)
                    .and_then(|i| row.get(i))
                    .cloned()
                    .unwrap_or_default()
            };
            let estructuras = (1..=STRUCTURE_SLOTS)
                .map(|slot| cell(&format!("estructura_{slot}")))
                .filter(|s| !s.trim().is_empty())
                .collect();
            StructureRecord {
                uid: cell("uid"),
                date: cell("date"),
                provincia: cell("provincia"),
                canton: cell("canton"),
                distrito: cell("distrito"),
                estructuras,
                maps_link: cell("maps_link"),
            }
        })
        .collect()
}

// ============================================================================
// Roster forms (CPC, employability, municipal band)
// ============================================================================

/// One persisted CPC-beneficiary row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CpcRecord {
    /// Row identifier.
    pub uid: String,
    /// Capture date, `dd-mm-YYYY`.
    pub date: String,
    /// Province from the catalog.
    pub provincia: String,
    /// Canton from the catalog.
    pub canton: String,
    /// Committee the beneficiary belongs to.
    pub comite: String,
    /// Beneficiary name.
    pub nombre: String,
    /// Age, when given.
    pub edad: Option<u32>,
    /// Program the beneficiary attends.
    pub programa: String,
    /// Free-text observations.
    pub observaciones: String,
}

impl CpcRecord {
    /// Named fields in schema order.
    pub fn fields(&self) -> Vec<Field> {
        vec![
            ("uid", self.uid.clone()),
            ("date", self.date.clone()),
            ("provincia", self.provincia.clone()),
            ("canton", self.canton.clone()),
            ("comite", self.comite.clone()),
            ("nombre", self.nombre.clone()),
            ("edad", self.edad.map(|e| e.to_string()).unwrap_or_default()),
            ("programa", self.programa.clone()),
            ("observaciones", self.observaciones.clone()),
        ]
    }
}

/// One persisted employability-program row (aggregate counts).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmploymentRecord {
    /// Row identifier.
    pub uid: String,
    /// Capture date, `dd-mm-YYYY`.
    pub date: String,
    /// Province from the catalog.
    pub provincia: String,
    /// Canton from the catalog.
    pub canton: String,
    /// Program name.
    pub programa: String,
    /// Enrolled count.
    pub inscritos: u32,
    /// Graduated count.
    pub egresados: u32,
    /// Free-text observations.
    pub observaciones: String,
}

impl EmploymentRecord {
    /// Named fields in schema order.
    pub fn fields(&self) -> Vec<Field> {
        vec![
            ("uid", self.uid.clone()),
            ("date", self.date.clone()),
            ("provincia", self.provincia.clone()),
            ("canton", self.canton.clone()),
            ("programa", self.programa.clone()),
            ("inscritos", self.inscritos.to_string()),
            ("egresados", self.egresados.to_string()),
            ("observaciones", self.observaciones.clone()),
        ]
    }
}

/// One persisted municipal-band roster row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandMemberRecord {
    /// Row identifier.
    pub uid: String,
    /// Capture date, `dd-mm-YYYY`.
    pub date: String,
    /// Province from the catalog.
    pub provincia: String,
    /// Canton from the catalog.
    pub canton: String,
    /// Band name.
    pub banda: String,
    /// Member name.
    pub nombre: String,
    /// Instrument played.
    pub instrumento: String,
    /// Free-text observations.
    pub observaciones: String,
}

impl BandMemberRecord {
    /// Named fields in schema order.
    pub fn fields(&self) -> Vec<Field> {
        vec![
            ("uid", self.uid.clone()),
            ("date", self.date.clone()),
            ("provincia", self.provincia.clone()),
            ("canton", self.canton.clone()),
            ("banda", self.banda.clone()),
            ("nombre", self.nombre.clone()),
            ("instrumento", self.instrumento.clone()),
            ("observaciones", self.observaciones.clone()),
        ]
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::form::SURVEY_HEADERS;

    fn survey_submission() -> SurveySubmission {
        SurveySubmission {
            barrio: "La Carpio".into(),
            factores: vec![
                "Calles sin iluminación adecuada por la noche.".into(),
                "Falta de cámaras o videovigilancia comunitaria.".into(),
                "Percepción de inseguridad y acoso callejero.".into(),
            ],
            delitos_relacionados: "robos".into(),
            ligado_estructura: StructureTie::Yes,
            nombre_estructura: "Los Sureños".into(),
            observaciones: "reportado por vecinos".into(),
            point: Some(GeoPoint::new(9.93, -84.08)),
        }
    }

    // ------------------------------------------------------------------------
    // project_row
    // ------------------------------------------------------------------------

    #[test]
    fn test_project_row_follows_header_order() {
        let fields = vec![("a", "1".to_string()), ("b", "2".to_string())];
        let headers: Vec<String> = ["b", "a"].iter().map(|s| s.to_string()).collect();
        assert_eq!(project_row(&fields, &headers), vec!["2", "1"]);
    }

    #[test]
    fn test_project_row_fills_unknown_headers_with_empty() {
        let fields = vec![("a", "1".to_string())];
        let headers: Vec<String> = ["a", "legacy"].iter().map(|s| s.to_string()).collect();
        assert_eq!(project_row(&fields, &headers), vec!["1", ""]);
    }

    // ------------------------------------------------------------------------
    // Survey expansion
    // ------------------------------------------------------------------------

    #[test]
    fn test_expand_one_row_per_factor() {
        let rows = survey_submission().expand("05-08-2026").unwrap();
        assert_eq!(rows.len(), 3);
        for row in &rows {
            assert_eq!(row.date, "05-08-2026");
            assert_eq!(row.barrio, "La Carpio");
            assert_eq!(row.maps_link, "https://www.google.com/maps?q=9.93,-84.08");
            assert_eq!(row.ligado_estructura, StructureTie::Yes);
        }
        let factors: Vec<_> = rows.iter().map(|r| r.factor.as_str()).collect();
        assert!(factors.contains(&"Percepción de inseguridad y acoso callejero."));
    }

    #[test]
    fn test_expanded_rows_have_distinct_uids() {
        let rows = survey_submission().expand("05-08-2026").unwrap();
        assert_ne!(rows[0].uid, rows[1].uid);
        assert_ne!(rows[1].uid, rows[2].uid);
    }

    #[test]
    fn test_expand_without_point_fails() {
        let mut sub = survey_submission();
        sub.point = None;
        assert!(sub.expand("05-08-2026").is_err());
    }

    #[test]
    fn test_record_shapes_against_live_headers() {
        let rows = survey_submission().expand("05-08-2026").unwrap();
        let headers: Vec<String> = SURVEY_HEADERS.iter().map(|s| s.to_string()).collect();
        let cells = project_row(&rows[0].fields(), &headers);
        assert_eq!(cells.len(), SURVEY_HEADERS.len());
        assert_eq!(cells[1], "05-08-2026");
        assert_eq!(cells[5], "Sí");
    }

    // ------------------------------------------------------------------------
    // Survey read-back
    // ------------------------------------------------------------------------

    #[test]
    fn test_expand_survey_rows_splits_legacy_pipe_lists() {
        let mut table = Table::with_headers(&["date", "factores", "maps_link"]);
        table.rows.push(vec![
            "01-01-2026".into(),
            "a | b".into(),
            "https://www.google.com/maps?q=9.9,-84.1".into(),
        ]);
        let records = expand_survey_rows(&table);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].factor, "a");
        assert_eq!(records[1].factor, "b");
        assert!(records[0].coords().is_some());
    }

    #[test]
    fn test_expand_survey_rows_keeps_factorless_rows() {
        let mut table = Table::with_headers(&["date", "factores"]);
        table.rows.push(vec!["01-01-2026".into(), "".into()]);
        let records = expand_survey_rows(&table);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].factor, "");
        assert!(records[0].coords().is_none());
    }

    // ------------------------------------------------------------------------
    // Structure census
    // ------------------------------------------------------------------------

    #[test]
    fn test_structure_record_pads_slots() {
        let record = StructureSubmission {
            provincia: "Limón".into(),
            canton: "Pococí".into(),
            distrito: String::new(),
            estructuras: vec!["Los Teletubbies".into(), "La Banda del Sur".into()],
            point: Some(GeoPoint::new(10.1, -83.5)),
        }
        .into_record("05-08-2026")
        .unwrap();

        let fields = record.fields();
        assert_eq!(fields.len(), 5 + STRUCTURE_SLOTS + 1);
        assert_eq!(fields[5], ("estructura_1", "Los Teletubbies".to_string()));
        assert_eq!(fields[7], ("estructura_3", String::new()));
    }

    #[test]
    fn test_structure_submission_caps_slots() {
        let record = StructureSubmission {
            provincia: "Limón".into(),
            canton: "Pococí".into(),
            distrito: String::new(),
            estructuras: (0..15).map(|i| format!("s{i}")).collect(),
            point: Some(GeoPoint::new(10.1, -83.5)),
        }
        .into_record("05-08-2026")
        .unwrap();
        assert_eq!(record.estructuras.len(), STRUCTURE_SLOTS);
    }

    #[test]
    fn test_structure_rows_roundtrip() {
        let record = StructureSubmission {
            provincia: "Heredia".into(),
            canton: "Sarapiquí".into(),
            distrito: "Horquetas".into(),
            estructuras: vec!["Los Zopilotes".into()],
            point: Some(GeoPoint::new(10.3, -84.0)),
        }
        .into_record("05-08-2026")
        .unwrap();

        let headers: Vec<String> = crate::form::STRUCTURE_HEADERS
            .iter()
            .map(|s| s.to_string())
            .collect();
        let mut table = Table {
            headers: headers.clone(),
            rows: vec![project_row(&record.fields(), &headers)],
        };
        table.rows.push(vec![String::new(); headers.len()]);

        let back = structure_rows(&table);
        assert_eq!(back[0].provincia, "Heredia");
        assert_eq!(back[0].estructuras, vec!["Los Zopilotes".to_string()]);
        assert!(back[1].estructuras.is_empty());
    }

    // ------------------------------------------------------------------------
    // Misc
    // ------------------------------------------------------------------------

    #[test]
    fn test_split_factors() {
        assert_eq!(split_factors("a | b|c "), vec!["a", "b", "c"]);
        assert!(split_factors("  ").is_empty());
        assert_eq!(split_factors("solo"), vec!["solo"]);
    }

    #[test]
    fn test_structure_tie_parsing() {
        assert_eq!(StructureTie::from_cell("Sí"), StructureTie::Yes);
        assert_eq!(StructureTie::from_cell("si"), StructureTie::Yes);
        assert_eq!(StructureTie::from_cell("No"), StructureTie::No);
        assert_eq!(StructureTie::from_cell(""), StructureTie::No);
    }

    #[test]
    fn test_new_uid_is_unique_enough() {
        assert_ne!(new_uid(), new_uid());
    }

    #[test]
    fn test_employment_record_fields_stringify_counts() {
        let record = EmploymentRecord {
            uid: new_uid(),
            date: "05-08-2026".into(),
            provincia: "Cartago".into(),
            canton: "Turrialba".into(),
            programa: "Soldadura".into(),
            inscritos: 25,
            egresados: 18,
            observaciones: String::new(),
        };
        let fields = record.fields();
        assert!(fields.contains(&("inscritos", "25".to_string())));
        assert!(fields.contains(&("egresados", "18".to_string())));
    }
}
