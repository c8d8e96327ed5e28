//! In-memory spreadsheet backend.
//!
//! Backs the store in tests and local development: the same worksheet
//! semantics as the remote API (grids of text cells, 1-based indices)
//! without the network. Can also inject a one-shot failure to exercise
//! error propagation.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::backend::SheetsBackend;
use crate::error::{Error, Result};

/// A [`SheetsBackend`] holding all worksheets in process memory.
#[derive(Default)]
pub struct InMemoryBackend {
    sheets: Mutex<BTreeMap<String, Vec<Vec<String>>>>,
    fail_next: Mutex<Option<String>>,
}

impl InMemoryBackend {
    /// An empty spreadsheet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next backend call fail with the given message.
    pub fn fail_next_call<S: Into<String>>(&self, message: S) {
        if let Ok(mut fail) = self.fail_next.lock() {
            *fail = Some(message.into());
        }
    }

    /// Direct snapshot of a worksheet's cells (test assertions).
    pub fn snapshot(&self, title: &str) -> Option<Vec<Vec<String>>> {
        self.sheets
            .lock()
            .ok()
            .and_then(|sheets| sheets.get(title).cloned())
    }

    fn take_failure(&self) -> Result<()> {
        let injected = self.fail_next.lock().ok().and_then(|mut f| f.take());
        match injected {
            Some(message) => Err(Error::Api {
                status: 503,
                message,
            }),
            None => Ok(()),
        }
    }

    fn with_sheets<T>(
        &self,
        f: impl FnOnce(&mut BTreeMap<String, Vec<Vec<String>>>) -> Result<T>,
    ) -> Result<T> {
        let mut sheets = self
            .sheets
            .lock()
            .map_err(|_| Error::auth("in-memory backend poisoned"))?;
        f(&mut sheets)
    }
}

#[async_trait]
impl SheetsBackend for InMemoryBackend {
    async fn worksheet_titles(&self) -> Result<Vec<String>> {
        self.take_failure()?;
        self.with_sheets(|sheets| Ok(sheets.keys().cloned().collect()))
    }

    async fn add_worksheet(&self, title: &str, _rows: u32, _cols: u32) -> Result<()> {
        self.take_failure()?;
        self.with_sheets(|sheets| {
            sheets.entry(title.to_string()).or_default();
            Ok(())
        })
    }

    async fn read_values(&self, title: &str) -> Result<Vec<Vec<String>>> {
        self.take_failure()?;
        self.with_sheets(|sheets| Ok(sheets.get(title).cloned().unwrap_or_default()))
    }

    async fn read_row(&self, title: &str, row: usize) -> Result<Vec<String>> {
        self.take_failure()?;
        self.with_sheets(|sheets| {
            Ok(sheets
                .get(title)
                .and_then(|grid| grid.get(row - 1))
                .cloned()
                .unwrap_or_default())
        })
    }

    async fn write_row_span(
        &self,
        title: &str,
        row: usize,
        col: usize,
        values: Vec<String>,
    ) -> Result<()> {
        self.take_failure()?;
        self.with_sheets(|sheets| {
            let grid = sheets.entry(title.to_string()).or_default();
            while grid.len() < row {
                grid.push(Vec::new());
            }
            let cells = &mut grid[row - 1];
            let needed = col - 1 + values.len();
            if cells.len() < needed {
                cells.resize(needed, String::new());
            }
            for (offset, value) in values.into_iter().enumerate() {
                cells[col - 1 + offset] = value;
            }
            Ok(())
        })
    }

    async fn append_rows(&self, title: &str, rows: Vec<Vec<String>>) -> Result<()> {
        self.take_failure()?;
        self.with_sheets(|sheets| {
            sheets.entry(title.to_string()).or_default().extend(rows);
            Ok(())
        })
    }

    async fn delete_row(&self, title: &str, row: usize) -> Result<()> {
        self.take_failure()?;
        self.with_sheets(|sheets| {
            let grid = sheets.entry(title.to_string()).or_default();
            if row == 0 || row > grid.len() {
                return Err(Error::Api {
                    status: 400,
                    message: format!("row {row} out of range"),
                });
            }
            grid.remove(row - 1);
            Ok(())
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_roundtrip() {
        let backend = InMemoryBackend::new();
        backend.add_worksheet("Prueba_1", 100, 10).await.unwrap();
        backend
            .append_rows("Prueba_1", vec![vec!["a".into(), "b".into()]])
            .await
            .unwrap();
        let values = backend.read_values("Prueba_1").await.unwrap();
        assert_eq!(values, vec![vec!["a".to_string(), "b".to_string()]]);
    }

    #[tokio::test]
    async fn test_write_row_span_grows_grid() {
        let backend = InMemoryBackend::new();
        backend
            .write_row_span("Hoja", 1, 3, vec!["c".into(), "d".into()])
            .await
            .unwrap();
        let values = backend.read_values("Hoja").await.unwrap();
        assert_eq!(values[0], vec!["", "", "c", "d"]);
    }

    #[tokio::test]
    async fn test_delete_row_shifts_rows_up() {
        let backend = InMemoryBackend::new();
        backend
            .append_rows("Hoja", vec![vec!["1".into()], vec!["2".into()], vec!["3".into()]])
            .await
            .unwrap();
        backend.delete_row("Hoja", 2).await.unwrap();
        let values = backend.read_values("Hoja").await.unwrap();
        assert_eq!(values, vec![vec!["1".to_string()], vec!["3".to_string()]]);
    }

    #[tokio::test]
    async fn test_delete_out_of_range() {
        let backend = InMemoryBackend::new();
        assert!(backend.delete_row("Hoja", 1).await.is_err());
    }

    #[tokio::test]
    async fn test_injected_failure_fires_once() {
        let backend = InMemoryBackend::new();
        backend.fail_next_call("quota exceeded");
        assert!(backend.worksheet_titles().await.is_err());
        assert!(backend.worksheet_titles().await.is_ok());
    }
}
