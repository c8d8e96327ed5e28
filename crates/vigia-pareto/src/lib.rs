//! # vigia-pareto
//!
//! Pareto (80/20) analysis over descriptor frequency tables, and the
//! two downloadable artifacts built from it:
//!
//! - a multi-section HTML report (cover, charts, summary table,
//!   narrative paragraphs)
//! - an XLSX workbook holding the computed table with an embedded
//!   native bar+line Pareto chart
//!
//! Descriptors come from a fixed catalog, each tagged as "Delito",
//! "Riesgo social", or "Otros factores"; labels outside the catalog
//! fall into "Otros factores".

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod catalog;
pub mod error;
pub mod report;
pub mod table;
pub mod workbook;

pub use catalog::{category_of, Category, DESCRIPTORS};
pub use error::{Error, Result};
pub use report::{render_html_report, ReportMeta};
pub use table::{compute, FrequencyEntry, ParetoRow, ParetoTable, Segment};
pub use workbook::render_workbook;
