//! # vigia-core
//!
//! Core domain model for the Vigía community public-safety platform:
//! - Typed records for every collection form, with explicit worksheet
//!   schemas replacing loose row dictionaries
//! - Compiled-in catalogs (risk factors, provinces and their cantons)
//! - Coordinate extraction from stored map links and deterministic
//!   marker jitter
//! - Submission validation that collects every problem before any write

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod catalog;
pub mod coords;
pub mod error;
pub mod form;
pub mod record;
pub mod table;
pub mod validate;
pub mod when;

pub use coords::{extract_coords, jitter_pair, GeoPoint, JITTER_MAGNITUDE};
pub use error::{Error, Issue, Result};
pub use form::FormKind;
pub use record::{
    BandMemberRecord, CpcRecord, EmploymentRecord, StructureRecord, StructureSubmission,
    SurveyRecord, SurveySubmission, STRUCTURE_SLOTS,
};
pub use table::Table;
