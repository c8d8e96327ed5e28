//! Generic tabular data, as read back from a worksheet.
//!
//! Reads come back as a header row plus string cells; this type carries
//! that shape, tolerates ragged rows, and renders the CSV downloads
//! every tabular view offers.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A header row plus data rows, all cells as text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// Column names, in sheet order.
    pub headers: Vec<String>,
    /// Data rows; rows may be shorter than the header row.
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// An empty table with the given header row.
    pub fn with_headers(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Index of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Cell value at `(row, column-name)`; ragged rows read as empty.
    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let col = self.column_index(column)?;
        self.rows
            .get(row)
            .map(|cells| cells.get(col).map(String::as_str).unwrap_or(""))
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// A new table keeping only rows the predicate accepts.
    ///
    /// The predicate receives a cell accessor so filters can be written
    /// against column names rather than positions.
    pub fn filtered<F>(&self, mut keep: F) -> Table
    where
        F: FnMut(&dyn Fn(&str) -> String) -> bool,
    {
        let rows = self
            .rows
            .iter()
            .filter(|row| {
                let get = |column: &str| -> String {
                    self.column_index(column)
                        .and_then(|i| row.get(i))
                        .cloned()
                        .unwrap_or_default()
                };
                keep(&get)
            })
            .cloned()
            .collect();
        Table {
            headers: self.headers.clone(),
            rows,
        }
    }

    /// Render the table as CSV bytes (header row included).
    pub fn to_csv(&self) -> Result<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            // Pad ragged rows so every CSV record has the full width.
            let mut cells = row.clone();
            cells.resize(self.headers.len(), String::new());
            writer.write_record(&cells)?;
        }
        writer
            .into_inner()
            .map_err(|e| Error::Export(e.to_string()))
    }
}

// ============================================================================
// Tests
// ============================================================================
