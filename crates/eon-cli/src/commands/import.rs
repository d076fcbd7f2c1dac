//! Implementation of the `eon import` command.

use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use crate::Config;
use crate::commands::{load_dataset, print_warnings};

/// Machine-readable import summary.
#[derive(Debug, Serialize)]
struct Summary<'a> {
    file: String,
    format: String,
    events: usize,
    categories: usize,
    rejected: usize,
    warnings: &'a [eon_io::Warning],
}

/// Loads a file and reports what was ingested.
pub fn run(path: &Path, json: bool, config: &Config) -> Result<()> {
    let loaded = load_dataset(path, config)?;

    if json {
        let summary = Summary {
            file: path.display().to_string(),
            format: loaded.format.to_string(),
            events: loaded.session.events().len(),
            categories: loaded.session.categories().len(),
            rejected: loaded.rejected,
            warnings: &loaded.warnings,
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    print_warnings(&loaded.warnings);
    println!(
        "imported {} event(s), {} categor(ies) from {} ({})",
        loaded.session.events().len(),
        loaded.session.categories().len(),
        path.display(),
        loaded.format,
    );
    if loaded.rejected > 0 {
        println!("{} row(s) rejected", loaded.rejected);
    }
    Ok(())
}
