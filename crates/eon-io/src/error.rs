//! Format-level errors.
//!
//! These fail an entire import or export. Per-row problems are not errors;
//! they surface as [`crate::ingest::Warning`]s so one bad row never sinks the
//! batch.

use thiserror::Error;

/// A whole-file failure: the input (or output) is unusable as its format.
///
/// Callers must keep their previously-loaded dataset unchanged when they
/// receive one of these.
#[derive(Debug, Error)]
pub enum FormatError {
    /// The input contained no data at all.
    #[error("empty input")]
    Empty,

    /// Malformed CSV, typically unbalanced quoting.
    #[error("malformed CSV at line {line}: {message}")]
    Csv { line: usize, message: String },

    /// The YAML document could not be decoded.
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
