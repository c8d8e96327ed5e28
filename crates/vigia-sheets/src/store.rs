//! The worksheet store.
//!
//! One worksheet per collection form. Worksheets are created lazily on
//! first access and their header row is reconciled against the form
//! schema: an empty sheet gets the full header row, an existing sheet
//! gets exactly its missing columns appended after the current ones —
//! never reordered, never duplicated.
//!
//! Reads are memoized per worksheet with a short TTL and invalidated
//! explicitly after every write. A submission that expands to several
//! rows (one per selected factor) is committed in a single batched
//! append, so it lands entirely or not at all.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use vigia_core::record::{project_row, Field};
use vigia_core::{validate, when, FormKind, StructureSubmission, SurveySubmission, Table};

use crate::backend::SheetsBackend;
use crate::error::{Error, Result};

/// Grid size for newly created worksheets.
const NEW_SHEET_ROWS: u32 = 5000;
const NEW_SHEET_MIN_COLS: u32 = 26;

/// Tuning knobs for the store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// How long a memoized read stays fresh.
    pub read_ttl: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            read_ttl: Duration::from_secs(25),
        }
    }
}

struct CachedTable {
    fetched_at: Instant,
    table: Table,
}

/// Compute which schema columns are missing from a live header row.
///
/// Returns the missing names in schema order. Existing columns are left
/// untouched wherever they are; a column is only "missing" when no
/// header matches it exactly after trimming.
pub fn reconcile_headers(current: &[String], required: &[&str]) -> Vec<String> {
    required
        .iter()
        .filter(|name| !current.iter().any(|h| h.trim() == **name))
        .map(|name| name.to_string())
        .collect()
}

/// The spreadsheet-backed store, generic over the backend seam.
pub struct SheetsStore {
    backend: Arc<dyn SheetsBackend>,
    config: StoreConfig,
    cache: Mutex<HashMap<&'static str, CachedTable>>,
    ensured: Mutex<HashSet<&'static str>>,
}

impl SheetsStore {
    /// Create a store over a backend.
    pub fn new(backend: Arc<dyn SheetsBackend>, config: StoreConfig) -> Self {
        Self {
            backend,
            config,
            cache: Mutex::new(HashMap::new()),
            ensured: Mutex::new(HashSet::new()),
        }
    }

    // ------------------------------------------------------------------------
    // Submissions
    // ------------------------------------------------------------------------

    /// Validate and persist a survey submission.
    ///
    /// Expands to one row per selected factor and commits them in one
    /// batched append. Returns the number of rows written.
    pub async fn submit_survey(
        &self,
        form: FormKind,
        submission: &SurveySubmission,
    ) -> Result<usize> {
        validate::survey(submission)?;
        let records = submission.expand(&when::today_stamp())?;
        let fields: Vec<Vec<Field>> = records.iter().map(|r| r.fields()).collect();
        self.append_fields(form, fields).await
    }

    /// Validate and persist a structure-census submission.
    ///
    /// Returns the uid of the stored row.
    pub async fn submit_structures(&self, submission: StructureSubmission) -> Result<String> {
        validate::structures(&submission)?;
        let record = submission.into_record(&when::today_stamp())?;
        let uid = record.uid.clone();
        self.append_fields(FormKind::Structures, vec![record.fields()])
            .await?;
        Ok(uid)
    }

    /// Persist pre-shaped rows for a form, in a single batched append.
    ///
    /// The rows are projected against the worksheet's *live* header
    /// order, so legacy sheets with extra or reordered columns still
    /// receive every value under the right header.
    pub async fn append_fields(&self, form: FormKind, rows: Vec<Vec<Field>>) -> Result<usize> {
        if rows.is_empty() {
            return Ok(0);
        }
        let headers = self.ensure_worksheet(form).await?;
        let cells: Vec<Vec<String>> = rows
            .iter()
            .map(|fields| project_row(fields, &headers))
            .collect();
        let count = cells.len();
        self.backend.append_rows(form.worksheet(), cells).await?;
        self.invalidate(form);
        log::info!("appended {count} row(s) to {}", form.worksheet());
        Ok(count)
    }

    // ------------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------------

    /// All rows of a form's worksheet, memoized for the configured TTL.
    pub async fn read(&self, form: FormKind) -> Result<Table> {
        if let Some(table) = self.cached(form.worksheet()) {
            return Ok(table);
        }
        let table = self.read_fresh(form).await?;
        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(
                form.worksheet(),
                CachedTable {
                    fetched_at: Instant::now(),
                    table: table.clone(),
                },
            );
        }
        Ok(table)
    }

    /// Drop the memoized read for one form.
    pub fn invalidate(&self, form: FormKind) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.remove(form.worksheet());
        }
    }

    /// Drop every memoized read.
    pub fn invalidate_all(&self) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.clear();
        }
    }

    fn cached(&self, worksheet: &str) -> Option<Table> {
        let cache = self.cache.lock().ok()?;
        let entry = cache.get(worksheet)?;
        if entry.fetched_at.elapsed() < self.config.read_ttl {
            Some(entry.table.clone())
        } else {
            None
        }
    }

    async fn read_fresh(&self, form: FormKind) -> Result<Table> {
        let schema_headers = self.ensure_worksheet(form).await?;
        let mut values = self.backend.read_values(form.worksheet()).await?;
        if values.is_empty() {
            return Ok(Table {
                headers: schema_headers,
                rows: Vec::new(),
            });
        }
        let headers = values.remove(0).iter().map(|h| h.trim().to_string()).collect();
        Ok(Table {
            headers,
            rows: values,
        })
    }

    // ------------------------------------------------------------------------
    // Locate-by-uid
    // ------------------------------------------------------------------------

    /// Rewrite the row carrying `uid` with the given fields.
    pub async fn update_by_uid(
        &self,
        form: FormKind,
        uid: &str,
        fields: Vec<Field>,
    ) -> Result<()> {
        let (headers, sheet_row) = self.locate(form, uid).await?;
        let cells = project_row(&fields, &headers);
        self.backend
            .write_row_span(form.worksheet(), sheet_row, 1, cells)
            .await?;
        self.invalidate(form);
        log::info!("updated row {sheet_row} ({uid}) in {}", form.worksheet());
        Ok(())
    }

    /// Delete the row carrying `uid`.
    pub async fn delete_by_uid(&self, form: FormKind, uid: &str) -> Result<()> {
        let (_, sheet_row) = self.locate(form, uid).await?;
        self.backend.delete_row(form.worksheet(), sheet_row).await?;
        self.invalidate(form);
        log::info!("deleted row {sheet_row} ({uid}) from {}", form.worksheet());
        Ok(())
    }

    /// Find the 1-based sheet row carrying `uid`, bypassing the cache.
    ///
    /// Row positions shift under concurrent edits, so the lookup always
    /// reads fresh; last write still wins at the API.
    async fn locate(&self, form: FormKind, uid: &str) -> Result<(Vec<String>, usize)> {
        let mut values = self.backend.read_values(form.worksheet()).await?;
        if values.is_empty() {
            return Err(Error::UidNotFound {
                worksheet: form.worksheet().to_string(),
                uid: uid.to_string(),
            });
        }
        let headers: Vec<String> = values.remove(0).iter().map(|h| h.trim().to_string()).collect();
        let uid_col = headers
            .iter()
            .position(|h| h == "uid")
            .ok_or_else(|| Error::NoUidColumn {
                worksheet: form.worksheet().to_string(),
            })?;
        for (index, row) in values.iter().enumerate() {
            if row.get(uid_col).map(String::as_str) == Some(uid) {
                // +1 for the header row, +1 to make it 1-based.
                return Ok((headers, index + 2));
            }
        }
        Err(Error::UidNotFound {
            worksheet: form.worksheet().to_string(),
            uid: uid.to_string(),
        })
    }

    // ------------------------------------------------------------------------
    // Worksheet lifecycle
    // ------------------------------------------------------------------------

    /// Get-or-create the worksheet and reconcile its header row.
    ///
    /// Returns the live header order after reconciliation.
    async fn ensure_worksheet(&self, form: FormKind) -> Result<Vec<String>> {
        let title = form.worksheet();
        let schema = form.headers();

        let already_ensured = self
            .ensured
            .lock()
            .map(|ensured| ensured.contains(title))
            .unwrap_or(false);
        if !already_ensured {
            let titles = self.backend.worksheet_titles().await?;
            if !titles.iter().any(|t| t == title) {
                let cols = NEW_SHEET_MIN_COLS.max(schema.len() as u32 + 5);
                self.backend.add_worksheet(title, NEW_SHEET_ROWS, cols).await?;
            }
            if let Ok(mut ensured) = self.ensured.lock() {
                ensured.insert(title);
            }
        }

        let current: Vec<String> = self
            .backend
            .read_row(title, 1)
            .await?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        if current.iter().all(|h| h.is_empty()) {
            let headers: Vec<String> = schema.iter().map(|h| h.to_string()).collect();
            self.backend
                .write_row_span(title, 1, 1, headers.clone())
                .await?;
            return Ok(headers);
        }

        let missing = reconcile_headers(&current, schema);
        if missing.is_empty() {
            return Ok(current);
        }
        log::info!("appending missing column(s) to {title}: {missing:?}");
        self.backend
            .write_row_span(title, 1, current.len() + 1, missing.clone())
            .await?;
        let mut headers = current;
        headers.extend(missing);
        Ok(headers)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::memory::InMemoryBackend;
    use vigia_core::coords::GeoPoint;
    use vigia_core::form::SURVEY_HEADERS;

    fn store_with_ttl(ttl: Duration) -> (Arc<InMemoryBackend>, SheetsStore) {
        let backend = Arc::new(InMemoryBackend::new());
        let store = SheetsStore::new(backend.clone(), StoreConfig { read_ttl: ttl });
        (backend, store)
    }

    fn survey_submission(factors: &[&str]) -> SurveySubmission {
        SurveySubmission {
            barrio: "Pavas".into(),
            factores: factors.iter().map(|f| f.to_string()).collect(),
            point: Some(GeoPoint::new(9.93, -84.08)),
            ..Default::default()
        }
    }

    // ------------------------------------------------------------------------
    // reconcile_headers (pure)
    // ------------------------------------------------------------------------

    #[test]
    fn test_reconcile_appends_exactly_the_missing_column() {
        let current: Vec<String> = vec!["date".into(), "barrio".into()];
        let missing = reconcile_headers(&current, &["date", "barrio", "factores"]);
        assert_eq!(missing, vec!["factores"]);
    }

    #[test]
    fn test_reconcile_nothing_missing() {
        let current: Vec<String> = vec!["date".into(), "barrio".into()];
        assert!(reconcile_headers(&current, &["date", "barrio"]).is_empty());
    }

    #[test]
    fn test_reconcile_ignores_extra_live_columns() {
        let current: Vec<String> = vec!["legacy".into(), "date".into()];
        let missing = reconcile_headers(&current, &["date", "barrio"]);
        assert_eq!(missing, vec!["barrio"]);
    }

    #[test]
    fn test_reconcile_trims_live_headers() {
        let current: Vec<String> = vec![" date ".into()];
        assert!(reconcile_headers(&current, &["date"]).is_empty());
    }

    // ------------------------------------------------------------------------
    // Worksheet lifecycle
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_first_access_creates_sheet_with_schema_header() {
        let (backend, store) = store_with_ttl(Duration::ZERO);
        let table = store.read(FormKind::Survey1).await.unwrap();
        assert_eq!(
            table.headers,
            SURVEY_HEADERS.iter().map(|h| h.to_string()).collect::<Vec<_>>()
        );
        let grid = backend.snapshot("Prueba_1").unwrap();
        assert_eq!(grid.len(), 1);
        assert_eq!(grid[0][0], "uid");
    }

    #[tokio::test]
    async fn test_reconciliation_extends_legacy_sheet_in_place() {
        let (backend, store) = store_with_ttl(Duration::ZERO);
        backend
            .append_rows("Prueba_1", vec![vec!["date".into(), "barrio".into()]])
            .await
            .unwrap();

        store.read(FormKind::Survey1).await.unwrap();

        let header = backend.snapshot("Prueba_1").unwrap()[0].clone();
        assert_eq!(&header[..2], &["date", "barrio"]);
        assert_eq!(header.len(), 2 + SURVEY_HEADERS.len() - 2);
        assert!(header.contains(&"factores".to_string()));
        assert!(header.contains(&"uid".to_string()));
        // No duplicates introduced.
        let mut seen = std::collections::HashSet::new();
        assert!(header.iter().all(|h| seen.insert(h.clone())));
    }

    // ------------------------------------------------------------------------
    // Survey submission
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_survey_writes_one_row_per_factor() {
        let (backend, store) = store_with_ttl(Duration::ZERO);
        let saved = store
            .submit_survey(
                FormKind::Survey1,
                &survey_submission(&["factor a", "factor b", "factor c"]),
            )
            .await
            .unwrap();
        assert_eq!(saved, 3);

        let grid = backend.snapshot("Prueba_1").unwrap();
        assert_eq!(grid.len(), 4); // header + 3 rows

        let table = store.read(FormKind::Survey1).await.unwrap();
        let factor_col = table.column_index("factores").unwrap();
        let barrio_col = table.column_index("barrio").unwrap();
        let link_col = table.column_index("maps_link").unwrap();
        let factors: Vec<_> = table.rows.iter().map(|r| r[factor_col].clone()).collect();
        assert_eq!(factors, vec!["factor a", "factor b", "factor c"]);
        // Shared fields identical across the expanded rows.
        assert!(table.rows.iter().all(|r| r[barrio_col] == "Pavas"));
        assert!(table
            .rows
            .iter()
            .all(|r| r[link_col] == "https://www.google.com/maps?q=9.93,-84.08"));
    }

    #[tokio::test]
    async fn test_invalid_survey_writes_nothing() {
        let (backend, store) = store_with_ttl(Duration::ZERO);
        let err = store
            .submit_survey(FormKind::Survey1, &SurveySubmission::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Core(_)));
        assert!(backend.snapshot("Prueba_1").is_none());
    }

    #[tokio::test]
    async fn test_failed_submission_commits_no_partial_rows() {
        let (backend, store) = store_with_ttl(Duration::ZERO);
        store.read(FormKind::Survey1).await.unwrap();
        backend.fail_next_call("quota exceeded");
        let result = store
            .submit_survey(FormKind::Survey1, &survey_submission(&["a", "b", "c"]))
            .await;
        assert!(result.is_err());
        let grid = backend.snapshot("Prueba_1").unwrap();
        assert_eq!(grid.len(), 1, "only the header row should exist");
    }

    // ------------------------------------------------------------------------
    // Structures submission
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_structures_submission_roundtrip() {
        let (_, store) = store_with_ttl(Duration::ZERO);
        let uid = store
            .submit_structures(StructureSubmission {
                provincia: "Limón".into(),
                canton: "Pococí".into(),
                distrito: "Guápiles".into(),
                estructuras: vec!["Los Plumas".into(), "La 15".into()],
                point: Some(GeoPoint::new(10.2, -83.77)),
            })
            .await
            .unwrap();

        let table = store.read(FormKind::Structures).await.unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.cell(0, "uid"), Some(uid.as_str()));
        assert_eq!(table.cell(0, "estructura_1"), Some("Los Plumas"));
        assert_eq!(table.cell(0, "estructura_2"), Some("La 15"));
        assert_eq!(table.cell(0, "estructura_3"), Some(""));
    }

    // ------------------------------------------------------------------------
    // Read cache
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_read_is_memoized_within_ttl() {
        let (backend, store) = store_with_ttl(Duration::from_secs(3600));
        store.read(FormKind::Survey1).await.unwrap();
        // A write behind the store's back is invisible while cached.
        backend
            .append_rows("Prueba_1", vec![vec!["sneaky".into()]])
            .await
            .unwrap();
        let table = store.read(FormKind::Survey1).await.unwrap();
        assert!(table.is_empty());
    }

    #[tokio::test]
    async fn test_write_invalidates_cache() {
        let (_, store) = store_with_ttl(Duration::from_secs(3600));
        assert!(store.read(FormKind::Survey1).await.unwrap().is_empty());
        store
            .submit_survey(FormKind::Survey1, &survey_submission(&["factor a"]))
            .await
            .unwrap();
        let table = store.read(FormKind::Survey1).await.unwrap();
        assert_eq!(table.len(), 1);
    }

    #[tokio::test]
    async fn test_zero_ttl_always_reads_fresh() {
        let (backend, store) = store_with_ttl(Duration::ZERO);
        store.read(FormKind::Survey1).await.unwrap();
        backend
            .append_rows("Prueba_1", vec![vec!["visible".into()]])
            .await
            .unwrap();
        let table = store.read(FormKind::Survey1).await.unwrap();
        assert_eq!(table.len(), 1);
    }

    // ------------------------------------------------------------------------
    // Locate-by-uid
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_update_by_uid_rewrites_row() {
        let (_, store) = store_with_ttl(Duration::ZERO);
        store
            .submit_survey(FormKind::Survey1, &survey_submission(&["factor a"]))
            .await
            .unwrap();
        let table = store.read(FormKind::Survey1).await.unwrap();
        let uid = table.cell(0, "uid").unwrap().to_string();

        let mut record = vigia_core::record::expand_survey_rows(&table)
            .into_iter()
            .next()
            .unwrap();
        record.barrio = "Hatillo".into();
        store
            .update_by_uid(FormKind::Survey1, &uid, record.fields())
            .await
            .unwrap();

        let table = store.read(FormKind::Survey1).await.unwrap();
        assert_eq!(table.cell(0, "barrio"), Some("Hatillo"));
        assert_eq!(table.cell(0, "uid"), Some(uid.as_str()));
    }

    #[tokio::test]
    async fn test_delete_by_uid_removes_only_that_row() {
        let (_, store) = store_with_ttl(Duration::ZERO);
        store
            .submit_survey(FormKind::Survey1, &survey_submission(&["a", "b"]))
            .await
            .unwrap();
        let table = store.read(FormKind::Survey1).await.unwrap();
        let uid = table.cell(0, "uid").unwrap().to_string();

        store.delete_by_uid(FormKind::Survey1, &uid).await.unwrap();

        let table = store.read(FormKind::Survey1).await.unwrap();
        assert_eq!(table.len(), 1);
        assert_ne!(table.cell(0, "uid"), Some(uid.as_str()));
    }

    #[tokio::test]
    async fn test_unknown_uid_is_typed_not_found() {
        let (_, store) = store_with_ttl(Duration::ZERO);
        store.read(FormKind::Survey1).await.unwrap();
        let err = store
            .delete_by_uid(FormKind::Survey1, "missing-uid")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::UidNotFound { .. }));
    }

    #[tokio::test]
    async fn test_transient_error_propagates_raw() {
        let (backend, store) = store_with_ttl(Duration::ZERO);
        backend.fail_next_call("backend unavailable");
        let err = store.read(FormKind::Survey1).await.unwrap_err();
        assert!(err.to_string().contains("backend unavailable"));
    }
}
