//! # vigia-geo
//!
//! The two externally hosted boundary datasets (province and canton
//! polygons) used for hover labels on the map viewer.
//!
//! Each dataset is fetched over HTTP once per process and cached in
//! memory. The property carrying the display label is a **fixed,
//! versioned contract** per dataset, validated at load time: a feature
//! missing the key, or carrying a non-string value, is a typed error
//! rather than a silent fallback to some other property.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod contract;
pub mod error;

use std::sync::Arc;

use tokio::sync::Mutex;

pub use contract::{BoundaryDataset, DatasetSpec, LabeledFeature};
pub use error::{Error, Result};

/// Contract for the hosted province polygons.
pub const PROVINCES_DATASET: DatasetSpec = DatasetSpec {
    name: "provincias",
    url: "https://raw.githubusercontent.com/schweini/CR_distritos_geojson/master/provincias.geojson",
    label_key: "NPROVINCIA",
    version: 1,
};

/// Contract for the hosted canton polygons.
pub const CANTONS_DATASET: DatasetSpec = DatasetSpec {
    name: "cantones",
    url: "https://raw.githubusercontent.com/schweini/CR_distritos_geojson/master/cantones.geojson",
    label_key: "NCANTON",
    version: 1,
};

/// Process-lifetime cache over the two hosted datasets.
///
/// Fetch failures are not cached; the next call retries. There is no
/// backoff: a failing geodata host surfaces directly to the caller.
pub struct BoundaryCache {
    http: reqwest::Client,
    provinces_spec: DatasetSpec,
    cantons_spec: DatasetSpec,
    provinces: Mutex<Option<Arc<BoundaryDataset>>>,
    cantons: Mutex<Option<Arc<BoundaryDataset>>>,
}

impl BoundaryCache {
    /// A cache over the default hosted datasets.
    pub fn new() -> Self {
        Self::with_specs(PROVINCES_DATASET, CANTONS_DATASET)
    }

    /// A cache over custom dataset locations (mirrors, tests).
    pub fn with_specs(provinces_spec: DatasetSpec, cantons_spec: DatasetSpec) -> Self {
        Self {
            http: reqwest::Client::new(),
            provinces_spec,
            cantons_spec,
            provinces: Mutex::new(None),
            cantons: Mutex::new(None),
        }
    }

    /// The province dataset, fetching on first use.
    pub async fn provinces(&self) -> Result<Arc<BoundaryDataset>> {
        Self::get_or_fetch(&self.http, &self.provinces_spec, &self.provinces).await
    }

    /// The canton dataset, fetching on first use.
    pub async fn cantons(&self) -> Result<Arc<BoundaryDataset>> {
        Self::get_or_fetch(&self.http, &self.cantons_spec, &self.cantons).await
    }

    async fn get_or_fetch(
        http: &reqwest::Client,
        spec: &DatasetSpec,
        slot: &Mutex<Option<Arc<BoundaryDataset>>>,
    ) -> Result<Arc<BoundaryDataset>> {
        let mut guard = slot.lock().await;
        if let Some(dataset) = guard.as_ref() {
            return Ok(dataset.clone());
        }
        log::info!("fetching boundary dataset {} from {}", spec.name, spec.url);
        let response = http.get(spec.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Http {
                dataset: spec.name,
                status: status.as_u16(),
            });
        }
        let raw = response.text().await?;
        let dataset = Arc::new(BoundaryDataset::from_geojson(spec, &raw)?);
        *guard = Some(dataset.clone());
        Ok(dataset)
    }
}

impl Default for BoundaryCache {
    fn default() -> Self {
        Self::new()
    }
}
