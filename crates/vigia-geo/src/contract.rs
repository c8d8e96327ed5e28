//! The fixed label contract and dataset parsing.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// Where a dataset lives and what its label contract is.
#[derive(Debug, Clone, Copy)]
pub struct DatasetSpec {
    /// Short dataset name, used in errors and logs.
    pub name: &'static str,
    /// Where the GeoJSON is hosted.
    pub url: &'static str,
    /// The single property key that must carry the display label.
    pub label_key: &'static str,
    /// Contract version; bumped when the provider changes schema.
    pub version: u32,
}

/// One boundary feature with its validated display label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabeledFeature {
    /// Display label extracted under the contract key.
    pub label: String,
    /// The feature's geometry, passed through untouched.
    pub geometry: Value,
}

/// A parsed, contract-validated boundary dataset.
#[derive(Debug, Clone, Serialize)]
pub struct BoundaryDataset {
    /// Dataset name, from the spec.
    pub name: &'static str,
    /// Contract version the payload satisfied.
    pub version: u32,
    /// Every feature, with its label.
    pub features: Vec<LabeledFeature>,
}

#[derive(Debug, Deserialize)]
struct RawCollection {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    features: Vec<RawFeature>,
}

#[derive(Debug, Deserialize)]
struct RawFeature {
    #[serde(default)]
    properties: serde_json::Map<String, Value>,
    #[serde(default)]
    geometry: Value,
}

impl BoundaryDataset {
    /// Parse a GeoJSON payload and validate it against the contract.
    ///
    /// Every feature must carry a string under the contracted label
    /// key. A missing key or a non-string value (a numeric code, say)
    /// fails the whole load with a typed violation.
    pub fn from_geojson(spec: &DatasetSpec, raw: &str) -> Result<Self> {
        let collection: RawCollection =
            serde_json::from_str(raw).map_err(|e| Error::Malformed {
                dataset: spec.name,
                detail: e.to_string(),
            })?;
        if collection.kind != "FeatureCollection" {
            return Err(Error::Malformed {
                dataset: spec.name,
                detail: format!("type is {:?}", collection.kind),
            });
        }

        let mut features = Vec::with_capacity(collection.features.len());
        for (index, feature) in collection.features.into_iter().enumerate() {
            let label = match feature.properties.get(spec.label_key) {
                Some(Value::String(label)) if !label.trim().is_empty() => {
                    label.trim().to_string()
                }
                Some(Value::String(_)) => {
                    return Err(violation(spec, index, "is empty"));
                }
                Some(other) => {
                    return Err(violation(
                        spec,
                        index,
                        &format!("is not a string (found {})", type_name(other)),
                    ));
                }
                None => return Err(violation(spec, index, "is missing")),
            };
            features.push(LabeledFeature {
                label,
                geometry: feature.geometry,
            });
        }

        log::debug!(
            "dataset {} validated: {} feature(s), contract v{}",
            spec.name,
            features.len(),
            spec.version
        );
        Ok(Self {
            name: spec.name,
            version: spec.version,
            features,
        })
    }

    /// All labels, in feature order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.features.iter().map(|f| f.label.as_str())
    }
}

fn violation(spec: &DatasetSpec, feature: usize, problem: &str) -> Error {
    Error::ContractViolation {
        dataset: spec.name,
        version: spec.version,
        feature,
        key: spec.label_key,
        problem: problem.to_string(),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ============================================================================
// Tests
// ============================================================================
