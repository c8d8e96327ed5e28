//! Error types for boundary dataset loading.

use thiserror::Error;

/// Result type alias for geodata operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur loading a boundary dataset.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The HTTP transport failed.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The host answered with a non-success status.
    #[error("dataset {dataset} fetch failed (HTTP {status})")]
    Http {
        /// Dataset being fetched.
        dataset: &'static str,
        /// Status returned by the host.
        status: u16,
    },

    /// The payload was not valid GeoJSON of the expected shape.
    #[error("dataset {dataset} is not a feature collection: {detail}")]
    Malformed {
        /// Dataset being parsed.
        dataset: &'static str,
        /// Parse failure detail.
        detail: String,
    },

    /// A feature violated the fixed label contract.
    ///
    /// The contract names the exact property key that must carry a
    /// string label; anything else is rejected at load rather than
    /// guessed around.
    #[error(
        "dataset {dataset} (contract v{version}) feature {feature}: \
         property {key:?} {problem}"
    )]
    ContractViolation {
        /// Dataset being validated.
        dataset: &'static str,
        /// Contract version that was applied.
        version: u32,
        /// Index of the offending feature.
        feature: usize,
        /// The contracted label key.
        key: &'static str,
        /// What was wrong with the value under the key.
        problem: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contract_violation_display_names_everything() {
        let err = Error::ContractViolation {
            dataset: "cantones",
            version: 1,
            feature: 12,
            key: "NCANTON",
            problem: "is missing".into(),
        };
        let text = err.to_string();
        assert!(text.contains("cantones"));
        assert!(text.contains("v1"));
        assert!(text.contains("12"));
        assert!(text.contains("NCANTON"));
    }
}
