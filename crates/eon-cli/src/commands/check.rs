//! Implementation of the `eon check` command.

use std::path::Path;

use anyhow::{Result, bail};
use eon_io::{ExportFormat, RoundTripReport, check};

use crate::Config;
use crate::commands::load_dataset;

/// Verifies the round-trip contract.
///
/// With a file, the file's dataset is pushed through export → re-ingest in
/// the requested (or configured) format. Without one, the built-in sample
/// datasets run through both formats. Exits nonzero on any failure.
pub fn run(file: Option<&Path>, format: Option<&str>, json: bool, config: &Config) -> Result<()> {
    let mut reports: Vec<(String, RoundTripReport)> = Vec::new();

    if let Some(path) = file {
        let format = match format {
            Some(raw) => raw.parse::<ExportFormat>().map_err(anyhow::Error::msg)?,
            None => config.default_format,
        };
        let loaded = load_dataset(path, config)?;
        let report = check::verify_roundtrip(
            loaded.session.events(),
            loaded.session.categories(),
            format,
        )?;
        reports.push((path.display().to_string(), report));
    } else {
        for sample in check::sample_datasets() {
            for format in [ExportFormat::Csv, ExportFormat::Yaml] {
                let report = check::verify_roundtrip(&sample.events, &sample.categories, format)?;
                reports.push((format!("{} ({format})", sample.name), report));
            }
        }
    }

    let all_passed = reports.iter().all(|(_, report)| report.passed());

    if json {
        let payload: Vec<_> = reports
            .iter()
            .map(|(name, report)| serde_json::json!({ "name": name, "report": report }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        for (name, report) in &reports {
            print_report(name, report);
        }
    }

    if !all_passed {
        bail!("round-trip check failed");
    }
    Ok(())
}

fn print_report(name: &str, report: &RoundTripReport) {
    let verdict = if report.passed() { "ok" } else { "FAILED" };
    println!(
        "{name}: {verdict} ({} -> {} events)",
        report.count_before, report.count_after
    );
    for id in &report.missing {
        println!("  missing after round trip: {id}");
    }
    for id in &report.unexpected {
        println!("  unexpected after round trip: {id}");
    }
    for event in &report.events {
        for mismatch in &event.mismatches {
            println!(
                "  {}: {} changed {:?} -> {:?}",
                event.event_id, mismatch.field, mismatch.before, mismatch.after
            );
        }
    }
    if !report.categories_preserved {
        println!("  categories not preserved");
    }
}
