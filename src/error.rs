//! Error types for classification and batch processing.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by rule loading and batch classification.
///
/// Per-row classification never fails; these only describe structurally
/// broken inputs.
#[derive(Error, Debug)]
pub enum ClassifyError {
    /// The input table has no column with the requested name.
    #[error("Input table has no '{column}' column")]
    MissingColumn {
        /// Name of the column that was requested.
        column: String,
    },

    /// The input table could not be read or written as CSV.
    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// A data row has more fields than the header.
    #[error("Line {line} has {fields} fields, but the header has {expected}")]
    RowTooLong {
        /// 1-based line number in the input.
        line: u64,
        /// Fields found on that line.
        fields: usize,
        /// Number of header columns.
        expected: usize,
    },

    /// A file could not be read or written.
    #[error("Failed to access {}", path.display())]
    Io {
        /// File that was being accessed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A rule set failed validation.
    #[error("Invalid rule set: {0}")]
    InvalidRules(String),

    /// A rule file is not valid YAML for the rule schema.
    #[error("Failed to parse rule set: {0}")]
    RulesParse(#[from] serde_yaml::Error),
}
