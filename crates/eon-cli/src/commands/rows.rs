//! Implementation of the `eon rows` command.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Result;

use crate::Config;
use crate::commands::{load_dataset, print_warnings};

/// Prints lane assignments grouped by category.
pub fn run(path: &Path, config: &Config) -> Result<()> {
    let loaded = load_dataset(path, config)?;
    print_warnings(&loaded.warnings);

    // Category id -> (row, external id, title), sorted for stable output.
    let mut groups: BTreeMap<String, Vec<(u32, String, String)>> = BTreeMap::new();
    for event in loaded.session.events() {
        let bucket = event
            .category
            .as_ref()
            .map_or_else(|| "(uncategorized)".to_string(), ToString::to_string);
        groups.entry(bucket).or_default().push((
            event.row,
            event.event_id.to_string(),
            event.title.clone(),
        ));
    }

    for (category, mut entries) in groups {
        println!("{category}:");
        entries.sort();
        for (row, event_id, title) in entries {
            println!("  row {row}: {event_id} ({title})");
        }
    }
    Ok(())
}
