//! Serialization pipeline for the eon timeline.
//!
//! Converts between the strict event model and two textual formats:
//! - CSV with custom, narrow quoting rules, header-driven
//! - YAML documents with `events`, `categories`, and timeline sections
//!
//! Parsing yields untyped [`RawRecord`]s; [`ingest::ingest`] is the single
//! normalization boundary into [`eon_core::Event`]s, collecting per-row
//! warnings instead of failing batches. [`check`] validates the round-trip
//! contract mechanically.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

pub mod check;
pub mod csv;
mod error;
pub mod ingest;
mod record;
pub mod yaml;

pub use check::{EventCheck, FieldMismatch, RoundTripReport, SampleDataset};
pub use error::FormatError;
pub use ingest::{
    DuplicatePolicy, ImportOutcome, IngestOptions, Warning, WarningKind, categories_from_events,
    ingest,
};
pub use record::{RawRecord, fields};
pub use yaml::{TimelineConfig, YamlDocument};

/// The supported file formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Comma-separated values, one row per event.
    Csv,
    /// Nested YAML document.
    #[default]
    Yaml,
}

impl ExportFormat {
    /// Infers the format from a file extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "csv" => Some(Self::Csv),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Csv => write!(f, "csv"),
            Self::Yaml => write!(f, "yaml"),
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => Err(format!("unknown format: {s}")),
        }
    }
}
