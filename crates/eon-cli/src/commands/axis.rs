//! Implementation of the `eon axis` command.

use std::path::Path;

use anyhow::{Result, bail};
use chrono::NaiveDate;
use eon_core::axis;

use crate::Config;
use crate::commands::{load_dataset, print_warnings};

/// Prints the axis layout for a dataset's span.
///
/// The visible window is the file's `timeline` block when present, otherwise
/// the min/max of the event dates.
pub fn run(path: &Path, config: &Config) -> Result<()> {
    let loaded = load_dataset(path, config)?;
    print_warnings(&loaded.warnings);

    let (start, end) = window(&loaded)?;
    let scale = axis::scale_for(start, end);
    let ticks = axis::ticks(start, end);
    let stride = axis::label_stride(ticks.len(), scale);

    println!("window: {start} .. {end}");
    println!("scale: {scale:?}, {} tick(s), label every {stride}", ticks.len());
    for (index, tick) in ticks.iter().enumerate() {
        let label = if index % stride == 0 { "*" } else { " " };
        println!("  {label} {tick}  {:6.2}%", axis::position(*tick, start, end));
    }
    Ok(())
}

fn window(loaded: &crate::commands::LoadedDataset) -> Result<(NaiveDate, NaiveDate)> {
    if let Some(timeline) = &loaded.timeline {
        if let (Some(start), Some(end)) = (timeline.start, timeline.end) {
            return Ok((start, end));
        }
    }
    let events = loaded.session.events();
    let start = events.iter().map(|e| e.start).min();
    let end = events.iter().map(|e| e.end).max();
    match (start, end) {
        (Some(start), Some(end)) => Ok((start, end)),
        _ => bail!("dataset has no events and no timeline window"),
    }
}
