//! Backend seam for the spreadsheet API.
//!
//! [`SheetsBackend`] is the narrow surface the store needs from a
//! spreadsheet: list/create worksheets, read all values, write a header
//! span, append rows, delete a row. Production uses [`HttpBackend`]
//! against the Sheets v4 REST API; tests use
//! [`crate::memory::InMemoryBackend`].

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tokio::sync::Mutex;

use crate::auth::Authenticator;
use crate::error::{Error, Result};

/// Operations the store needs from a spreadsheet.
///
/// Row and column indices are 1-based, matching A1 notation.
#[async_trait]
pub trait SheetsBackend: Send + Sync {
    /// Titles of the worksheets currently in the spreadsheet.
    async fn worksheet_titles(&self) -> Result<Vec<String>>;

    /// Create a worksheet with the given grid size.
    async fn add_worksheet(&self, title: &str, rows: u32, cols: u32) -> Result<()>;

    /// All values of a worksheet, first row included.
    async fn read_values(&self, title: &str) -> Result<Vec<Vec<String>>>;

    /// Values of a single row (for header inspection without a full read).
    async fn read_row(&self, title: &str, row: usize) -> Result<Vec<String>>;

    /// Overwrite a horizontal span of cells starting at `(row, col)`.
    async fn write_row_span(
        &self,
        title: &str,
        row: usize,
        col: usize,
        values: Vec<String>,
    ) -> Result<()>;

    /// Append rows after the last data row, in a single call.
    async fn append_rows(&self, title: &str, rows: Vec<Vec<String>>) -> Result<()>;

    /// Delete one data row by its 1-based sheet row index.
    async fn delete_row(&self, title: &str, row: usize) -> Result<()>;
}

/// Column number (1-based) to A1 letters: 1 → A, 27 → AA.
pub fn a1_column(mut col: usize) -> String {
    let mut label = String::new();
    while col > 0 {
        let rem = (col - 1) % 26;
        label.insert(0, (b'A' + rem as u8) as char);
        col = (col - 1) / 26;
    }
    label
}

// ============================================================================
// HTTP backend (Sheets v4)
// ============================================================================

const API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

#[derive(Debug, Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetMeta>,
}

#[derive(Debug, Deserialize)]
struct SheetMeta {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SheetProperties {
    #[serde(rename = "sheetId")]
    sheet_id: i64,
    title: String,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

/// [`SheetsBackend`] over the Sheets v4 REST API.
pub struct HttpBackend {
    http: reqwest::Client,
    auth: Arc<Authenticator>,
    spreadsheet_id: String,
    // title → sheetId, needed for row deletion; refreshed on miss.
    sheet_ids: Mutex<HashMap<String, i64>>,
}

impl HttpBackend {
    /// Create a backend for one spreadsheet.
    pub fn new(auth: Arc<Authenticator>, spreadsheet_id: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            auth,
            spreadsheet_id: spreadsheet_id.into(),
            sheet_ids: Mutex::new(HashMap::new()),
        }
    }

    fn url(&self, suffix: &str) -> String {
        format!("{API_BASE}/{}{suffix}", self.spreadsheet_id)
    }

    async fn bearer(&self) -> Result<String> {
        self.auth.token().await
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(Error::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn fetch_sheet_ids(&self) -> Result<HashMap<String, i64>> {
        let token = self.bearer().await?;
        let response = self
            .http
            .get(self.url("?fields=sheets.properties(sheetId,title)"))
            .bearer_auth(&token)
            .send()
            .await?;
        let meta: SpreadsheetMeta = Self::check(response).await?.json().await?;
        Ok(meta
            .sheets
            .into_iter()
            .map(|s| (s.properties.title, s.properties.sheet_id))
            .collect())
    }

    async fn sheet_id(&self, title: &str) -> Result<i64> {
        {
            let ids = self.sheet_ids.lock().await;
            if let Some(id) = ids.get(title) {
                return Ok(*id);
            }
        }
        let fresh = self.fetch_sheet_ids().await?;
        let mut ids = self.sheet_ids.lock().await;
        *ids = fresh;
        ids.get(title).copied().ok_or_else(|| Error::Api {
            status: 404,
            message: format!("worksheet {title} not found"),
        })
    }
}

#[async_trait]
impl SheetsBackend for HttpBackend {
    async fn worksheet_titles(&self) -> Result<Vec<String>> {
        let fresh = self.fetch_sheet_ids().await?;
        let titles = fresh.keys().cloned().collect();
        *self.sheet_ids.lock().await = fresh;
        Ok(titles)
    }

    async fn add_worksheet(&self, title: &str, rows: u32, cols: u32) -> Result<()> {
        let token = self.bearer().await?;
        let body = json!({
            "requests": [{
                "addSheet": {
                    "properties": {
                        "title": title,
                        "gridProperties": { "rowCount": rows, "columnCount": cols }
                    }
                }
            }]
        });
        let response = self
            .http
            .post(self.url(":batchUpdate"))
            .bearer_auth(&token)
            .json(&body)
            .send()
            .await?;
        Self::check(response).await?;
        // The id cache is stale now; drop it so the next lookup refreshes.
        self.sheet_ids.lock().await.clear();
        log::info!("created worksheet {title}");
        Ok(())
    }

    async fn read_values(&self, title: &str) -> Result<Vec<Vec<String>>> {
        let token = self.bearer().await?;
        let response = self
            .http
            .get(format!(
                "{API_BASE}/{}/values/{title}",
                self.spreadsheet_id
            ))
            .bearer_auth(&token)
            .send()
            .await?;
        let range: ValueRange = Self::check(response).await?.json().await?;
        Ok(range
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_text).collect())
            .collect())
    }

    async fn read_row(&self, title: &str, row: usize) -> Result<Vec<String>> {
        let token = self.bearer().await?;
        let response = self
            .http
            .get(format!(
                "{API_BASE}/{}/values/{title}!{row}:{row}",
                self.spreadsheet_id
            ))
            .bearer_auth(&token)
            .send()
            .await?;
        let range: ValueRange = Self::check(response).await?.json().await?;
        Ok(range
            .values
            .into_iter()
            .next()
            .map(|row| row.into_iter().map(cell_text).collect())
            .unwrap_or_default())
    }

    async fn write_row_span(
        &self,
        title: &str,
        row: usize,
        col: usize,
        values: Vec<String>,
    ) -> Result<()> {
        let token = self.bearer().await?;
        let range = format!("{title}!{}{row}", a1_column(col));
        let body = json!({ "values": [values] });
        let response = self
            .http
            .put(format!(
                "{API_BASE}/{}/values/{range}?valueInputOption=USER_ENTERED",
                self.spreadsheet_id
            ))
            .bearer_auth(&token)
            .json(&body)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn append_rows(&self, title: &str, rows: Vec<Vec<String>>) -> Result<()> {
        let token = self.bearer().await?;
        let body = json!({ "values": rows });
        let response = self
            .http
            .post(format!(
                "{API_BASE}/{}/values/{title}:append?valueInputOption=USER_ENTERED&insertDataOption=INSERT_ROWS",
                self.spreadsheet_id
            ))
            .bearer_auth(&token)
            .json(&body)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn delete_row(&self, title: &str, row: usize) -> Result<()> {
        let sheet_id = self.sheet_id(title).await?;
        let token = self.bearer().await?;
        let body = json!({
            "requests": [{
                "deleteDimension": {
                    "range": {
                        "sheetId": sheet_id,
                        "dimension": "ROWS",
                        "startIndex": row - 1,
                        "endIndex": row
                    }
                }
            }]
        });
        let response = self
            .http
            .post(self.url(":batchUpdate"))
            .bearer_auth(&token)
            .json(&body)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}

/// A cell value as text; the API returns strings, numbers, and booleans.
fn cell_text(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_a1_column_single_letters() {
        assert_eq!(a1_column(1), "A");
        assert_eq!(a1_column(2), "B");
        assert_eq!(a1_column(26), "Z");
    }

    #[test]
    fn test_a1_column_double_letters() {
        assert_eq!(a1_column(27), "AA");
        assert_eq!(a1_column(28), "AB");
        assert_eq!(a1_column(52), "AZ");
        assert_eq!(a1_column(53), "BA");
        assert_eq!(a1_column(702), "ZZ");
        assert_eq!(a1_column(703), "AAA");
    }

    #[test]
    fn test_cell_text_shapes() {
        assert_eq!(cell_text(serde_json::json!("texto")), "texto");
        assert_eq!(cell_text(serde_json::json!(42)), "42");
        assert_eq!(cell_text(serde_json::json!(true)), "true");
        assert_eq!(cell_text(serde_json::Value::Null), "");
    }

    #[test]
    fn test_value_range_tolerates_missing_values() {
        let range: ValueRange = serde_json::from_str(r#"{"range": "A1:B2"}"#).unwrap();
        assert!(range.values.is_empty());
    }

    #[test]
    fn test_spreadsheet_meta_decodes() {
        let raw = r#"{"sheets": [{"properties": {"sheetId": 7, "title": "Prueba_1"}}]}"#;
        let meta: SpreadsheetMeta = serde_json::from_str(raw).unwrap();
        assert_eq!(meta.sheets.len(), 1);
        assert_eq!(meta.sheets[0].properties.sheet_id, 7);
        assert_eq!(meta.sheets[0].properties.title, "Prueba_1");
    }
}
