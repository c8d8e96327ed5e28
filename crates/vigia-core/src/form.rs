//! The collection forms and their worksheet schemas.
//!
//! Every form persists to its own worksheet. The schema here is the
//! contract for that worksheet's header row; the store reconciles live
//! headers against it on first access (see `vigia-sheets`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Header row for the five survey worksheets.
pub const SURVEY_HEADERS: &[&str] = &[
    "uid",
    "date",
    "barrio",
    "factores",
    "delitos_relacionados",
    "ligado_estructura",
    "nombre_estructura",
    "observaciones",
    "maps_link",
];

/// Header row for the structure-census worksheet.
pub const STRUCTURE_HEADERS: &[&str] = &[
    "uid",
    "date",
    "provincia",
    "canton",
    "distrito",
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
    "maps_link",
];

/// Header row for the CPC beneficiaries worksheet.
pub const CPC_HEADERS: &[&str] = &[
    "uid",
    "date",
    "provincia",
    "canton",
    "comite",
    "nombre",
    "edad",
    "programa",
    "observaciones",
];

/// Header row for the employability-program worksheet.
pub const EMPLOYMENT_HEADERS: &[&str] = &[
    "uid",
    "date",
    "provincia",
    "canton",
    "programa",
    "inscritos",
    "egresados",
    "observaciones",
];

/// Header row for the municipal-band roster worksheet.
pub const BAND_HEADERS: &[&str] = &[
    "uid",
    "date",
    "provincia",
    "canton",
    "banda",
    "nombre",
    "instrumento",
    "observaciones",
];

/// One logical collection form, bound to one worksheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormKind {
    /// Risk-factor survey, sheet 1.
    #[serde(rename = "survey-1")]
    Survey1,
    /// Risk-factor survey, sheet 2.
    #[serde(rename = "survey-2")]
    Survey2,
    /// Risk-factor survey, sheet 3.
    #[serde(rename = "survey-3")]
    Survey3,
    /// Risk-factor survey, sheet 4.
    #[serde(rename = "survey-4")]
    Survey4,
    /// Risk-factor survey, sheet 5.
    #[serde(rename = "survey-5")]
    Survey5,
    /// Gang/structure census.
    #[serde(rename = "structures")]
    Structures,
    /// CPC beneficiaries roster.
    #[serde(rename = "cpc")]
    Cpc,
    /// Employability program counts.
    #[serde(rename = "employability")]
    Employment,
    /// Municipal band roster.
    #[serde(rename = "band")]
    Band,
}

impl FormKind {
    /// Every form, in tab order.
    pub const ALL: [FormKind; 9] = [
        FormKind::Survey1,
        FormKind::Survey2,
        FormKind::Survey3,
        FormKind::Survey4,
        FormKind::Survey5,
        FormKind::Structures,
        FormKind::Cpc,
        FormKind::Employment,
        FormKind::Band,
    ];

    /// The five survey forms.
    pub const SURVEYS: [FormKind; 5] = [
        FormKind::Survey1,
        FormKind::Survey2,
        FormKind::Survey3,
        FormKind::Survey4,
        FormKind::Survey5,
    ];

    /// The worksheet this form persists to.
    pub fn worksheet(self) -> &'static str {
        match self {
            FormKind::Survey1 => "Prueba_1",
            FormKind::Survey2 => "Prueba_2",
            FormKind::Survey3 => "Prueba_3",
            FormKind::Survey4 => "Prueba_4",
            FormKind::Survey5 => "Prueba_5",
            FormKind::Structures => "Estructuras",
            FormKind::Cpc => "CPC_Beneficiarios",
            FormKind::Employment => "Empleabilidad",
            FormKind::Band => "Banda_Municipal",
        }
    }

    /// User-facing label, as shown on the form tabs.
    pub fn label(self) -> &'static str {
        match self {
            FormKind::Survey1 => "Formulario 1",
            FormKind::Survey2 => "Formulario 2",
            FormKind::Survey3 => "Formulario 3",
            FormKind::Survey4 => "Formulario 4",
            FormKind::Survey5 => "Formulario 5",
            FormKind::Structures => "Censo de estructuras",
            FormKind::Cpc => "Beneficiarios CPC",
            FormKind::Employment => "Empleabilidad",
            FormKind::Band => "Banda municipal",
        }
    }

    /// URL slug identifying the form.
    pub fn slug(self) -> &'static str {
        match self {
            FormKind::Survey1 => "survey-1",
            FormKind::Survey2 => "survey-2",
            FormKind::Survey3 => "survey-3",
            FormKind::Survey4 => "survey-4",
            FormKind::Survey5 => "survey-5",
            FormKind::Structures => "structures",
            FormKind::Cpc => "cpc",
            FormKind::Employment => "employability",
            FormKind::Band => "band",
        }
    }

    /// The worksheet schema (required header row) for this form.
    pub fn headers(self) -> &'static [&'static str] {
        match self {
            FormKind::Survey1
            | FormKind::Survey2
            | FormKind::Survey3
            | FormKind::Survey4
            | FormKind::Survey5 => SURVEY_HEADERS,
            FormKind::Structures => STRUCTURE_HEADERS,
            FormKind::Cpc => CPC_HEADERS,
            FormKind::Employment => EMPLOYMENT_HEADERS,
            FormKind::Band => BAND_HEADERS,
        }
    }

    /// Whether this is one of the risk-factor survey forms.
    pub fn is_survey(self) -> bool {
        matches!(
            self,
            FormKind::Survey1
                | FormKind::Survey2
                | FormKind::Survey3
                | FormKind::Survey4
                | FormKind::Survey5
        )
    }
}

impl fmt::Display for FormKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for FormKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FormKind::ALL
            .into_iter()
            .find(|form| form.slug() == s)
            .ok_or_else(|| Error::UnknownForm(s.to_string()))
    }
}
