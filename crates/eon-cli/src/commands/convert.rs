//! Implementation of the `eon convert` command.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use eon_io::{ExportFormat, csv, yaml};

use crate::Config;
use crate::commands::{load_dataset, print_warnings};

/// Converts a dataset between CSV and YAML, via the full pipeline.
///
/// The output is written only after the input batch has fully ingested, so a
/// bad input never truncates an existing output file.
pub fn run(input: &Path, output: &Path, config: &Config) -> Result<()> {
    let Some(out_format) = ExportFormat::from_path(output) else {
        bail!(
            "cannot infer format of {} (expected .csv, .yaml, or .yml)",
            output.display()
        );
    };

    let loaded = load_dataset(input, config)?;
    print_warnings(&loaded.warnings);

    let text = match out_format {
        ExportFormat::Csv => csv::events_to_csv(loaded.session.events()),
        ExportFormat::Yaml => yaml::document_to_yaml(
            loaded.session.events(),
            loaded.session.categories(),
            loaded.timeline.as_ref(),
        )?,
    };
    fs::write(output, text).with_context(|| format!("failed to write {}", output.display()))?;

    println!(
        "wrote {} event(s) to {} ({out_format})",
        loaded.session.events().len(),
        output.display(),
    );
    Ok(())
}
