//! CLI subcommand implementations.

pub mod axis;
pub mod check;
pub mod convert;
pub mod import;
pub mod list;
pub mod rows;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use eon_core::Session;
use eon_io::{ExportFormat, TimelineConfig, Warning, categories_from_events, csv, ingest, yaml};

use crate::Config;

/// A file loaded into a staged session.
pub struct LoadedDataset {
    /// The session holding the fully-ingested batch, rows assigned.
    pub session: Session,
    /// Per-row ingestion warnings.
    pub warnings: Vec<Warning>,
    /// Number of rows that produced no event.
    pub rejected: usize,
    /// Visible-window configuration, when the file carried one.
    pub timeline: Option<TimelineConfig>,
    /// The detected input format.
    pub format: ExportFormat,
}

/// Reads a file, parses it by extension, and stages the batch into a fresh
/// session.
///
/// The whole batch is ingested before anything touches the session, so a
/// format error leaves the caller with nothing half-loaded. CSV files carry
/// no category table; the referenced ids are synthesized into definitions.
pub fn load_dataset(path: &Path, config: &Config) -> Result<LoadedDataset> {
    let Some(format) = ExportFormat::from_path(path) else {
        bail!(
            "cannot infer format of {} (expected .csv, .yaml, or .yml)",
            path.display()
        );
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    let options = config.ingest_options();
    let (outcome, categories, timeline) = match format {
        ExportFormat::Csv => {
            let records = csv::parse_csv(&text)
                .with_context(|| format!("failed to parse {}", path.display()))?;
            let outcome = ingest::ingest(&records, 0, &options);
            let categories = categories_from_events(&outcome.events, config.color_seed);
            (outcome, categories, None)
        }
        ExportFormat::Yaml => {
            let doc = yaml::parse_yaml(&text)
                .with_context(|| format!("failed to parse {}", path.display()))?;
            let outcome = ingest::ingest(&doc.records, 0, &options);
            (outcome, doc.categories, doc.timeline)
        }
    };

    let mut session = Session::new();
    let rejected = outcome.rejected.len();
    session.replace_all(outcome.events, categories);
    session.assign_rows();

    Ok(LoadedDataset {
        session,
        warnings: outcome.warnings,
        rejected,
        timeline,
        format,
    })
}

/// Prints warnings to stderr, one per line.
pub fn print_warnings(warnings: &[Warning]) {
    for warning in warnings {
        eprintln!("warning: {warning}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.txt");
        std::fs::write(&path, "eventId,title\n").unwrap();
        assert!(load_dataset(&path, &Config::default()).is_err());
    }

    #[test]
    fn load_csv_synthesizes_categories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        std::fs::write(
            &path,
            "eventId,title,start,category\nE1,First,2023-01-01,work\n",
        )
        .unwrap();

        let loaded = load_dataset(&path, &Config::default()).unwrap();
        assert_eq!(loaded.session.events().len(), 1);
        assert_eq!(loaded.session.categories().len(), 1);
        assert_eq!(loaded.session.categories()[0].id.as_str(), "work");
        assert_eq!(loaded.format, ExportFormat::Csv);
    }

    #[test]
    fn load_failure_stages_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.csv");
        std::fs::write(&path, "eventId,title\nE1,\"unclosed\n").unwrap();
        let result = load_dataset(&path, &Config::default());
        assert!(result.is_err());
    }
}
