//! Implementation of the `eon list` command.

use std::path::Path;

use anyhow::Result;

use crate::Config;
use crate::commands::{load_dataset, print_warnings};

/// Lists events with their kinds, dates, and resolved parents.
pub fn run(path: &Path, config: &Config) -> Result<()> {
    let loaded = load_dataset(path, config)?;
    print_warnings(&loaded.warnings);

    for event in loaded.session.events() {
        let category = event
            .category
            .as_ref()
            .map_or_else(|| "-".to_string(), ToString::to_string);
        let parent = event
            .parent
            .and_then(|pid| loaded.session.find_event(pid))
            .map_or_else(String::new, |p| format!("  parent: {}", p.event_id));
        println!(
            "{}  {:9}  {} .. {}  [{}]  {}{}",
            event.event_id, event.kind, event.start, event.end, category, event.title, parent,
        );
    }
    Ok(())
}
