//! Capture dates in Costa Rica local time.
//!
//! Rows store their capture date as `dd-mm-YYYY` text. Parsing back is
//! tolerant of the handful of formats that show up in older sheets and
//! degrades to `None` instead of failing the whole table read.

use chrono::{NaiveDate, Utc};
use chrono_tz::America::Costa_Rica;

/// Wire format for capture dates.
pub const DATE_FORMAT: &str = "%d-%m-%Y";

/// Today's date stamp in Costa Rica local time, `dd-mm-YYYY`.
pub fn today_stamp() -> String {
    Utc::now()
        .with_timezone(&Costa_Rica)
        .format(DATE_FORMAT)
        .to_string()
}

/// Parse a stored date cell, tolerating legacy separators and ordering.
///
/// Unparseable input yields `None`; the record keeps rendering without a
/// date rather than aborting the read.
pub fn parse_date(cell: &str) -> Option<NaiveDate> {
    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }
    for format in [DATE_FORMAT, "%d/%m/%Y", "%Y-%m-%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(cell, format) {
            return Some(date);
        }
    }
    log::debug!("unparseable date cell: {cell:?}");
    None
}
