//! Error types for the core domain model.

use std::fmt;

/// A single field-level problem found while checking a submission.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Issue {
    /// Field the problem refers to, when it maps to one.
    pub field: Option<String>,
    /// What is wrong, in user-facing terms.
    pub message: String,
}

impl Issue {
    /// Create an issue tied to a specific field.
    pub fn field<F, M>(field: F, message: M) -> Self
    where
        F: Into<String>,
        M: Into<String>,
    {
        Self {
            field: Some(field.into()),
            message: message.into(),
        }
    }

    /// Create an issue that is not tied to a single field.
    pub fn general<M: Into<String>>(message: M) -> Self {
        Self {
            field: None,
            message: message.into(),
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.field {
            Some(field) => write!(f, "{field}: {}", self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

/// Errors that can occur in the core domain model.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// One or more submission checks failed.
    ///
    /// All problems are collected before the error is raised, so a user
    /// sees the complete list at once and no partial write happens.
    #[error("validation failed: {}", join_issues(.issues))]
    Validation {
        /// Every problem found, in check order.
        issues: Vec<Issue>,
    },

    /// A form slug did not name any known form.
    #[error("unknown form: {0}")]
    UnknownForm(String),

    /// A row did not carry a value for a required column.
    #[error("row is missing column '{column}'")]
    MissingColumn {
        /// Schema column that was absent.
        column: String,
    },

    /// CSV rendering failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A delimited export could not be produced.
    #[error("export error: {0}")]
    Export(String),
}

/// Convenience `Result` alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Build a validation error from collected issues.
    pub fn validation(issues: Vec<Issue>) -> Self {
        Error::Validation { issues }
    }

    /// The collected issues, when this is a validation error.
    pub fn issues(&self) -> Option<&[Issue]> {
        match self {
            Error::Validation { issues } => Some(issues),
            _ => None,
        }
    }
}

fn join_issues(issues: &[Issue]) -> String {
    issues
        .iter()
        .map(Issue::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
