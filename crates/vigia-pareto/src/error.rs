//! Error types for artifact generation.

use thiserror::Error;

/// Result type alias for Pareto operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur producing an artifact.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Rendering a chart failed.
    #[error("chart rendering error: {0}")]
    Chart(String),

    /// Writing the workbook archive failed.
    #[error("workbook error: {0}")]
    Workbook(#[from] zip::result::ZipError),

    /// An artifact buffer could not be assembled.
    #[error("artifact I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chart_error_display() {
        assert_eq!(
            Error::Chart("empty drawing area".into()).to_string(),
            "chart rendering error: empty drawing area"
        );
    }
}
