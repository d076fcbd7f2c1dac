//! Round-trip validation.
//!
//! Drives a dataset through export and re-ingest and reports field-level
//! differences. The report is structured (pass/fail per event with named
//! mismatches) so a failure is debuggable from the output alone.

use std::collections::HashMap;

use eon_core::{Category, Event, EventId, EventKind, Session};
use serde::Serialize;

use crate::error::FormatError;
use crate::ingest::{IngestOptions, ingest};
use crate::{ExportFormat, csv, yaml};

/// A synthesized dataset for validation runs.
#[derive(Debug)]
pub struct SampleDataset {
    /// Short name used in reports.
    pub name: &'static str,
    /// Events with parent links resolved.
    pub events: Vec<Event>,
    /// Category definitions.
    pub categories: Vec<Category>,
}

/// One divergent field on one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldMismatch {
    /// Wire name of the field.
    pub field: &'static str,
    /// Value before the round trip.
    pub before: String,
    /// Value after the round trip.
    pub after: String,
}

/// Verdict for a single event, matched by `eventId`.
#[derive(Debug, Clone, Serialize)]
pub struct EventCheck {
    /// External id of the checked event.
    pub event_id: String,
    /// Every field that changed across the round trip. Empty means pass.
    pub mismatches: Vec<FieldMismatch>,
}

impl EventCheck {
    /// Whether the event survived unchanged.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.mismatches.is_empty()
    }
}

/// Full result of one round-trip verification.
#[derive(Debug, Serialize)]
pub struct RoundTripReport {
    /// Format the dataset was pushed through.
    pub format: ExportFormat,
    /// Event count before export.
    pub count_before: usize,
    /// Event count after re-ingestion.
    pub count_after: usize,
    /// External ids present before but absent after.
    pub missing: Vec<String>,
    /// External ids that appeared from nowhere.
    pub unexpected: Vec<String>,
    /// Per-event verdicts.
    pub events: Vec<EventCheck>,
    /// Whether category definitions survived (always true for CSV, which
    /// does not carry them).
    pub categories_preserved: bool,
}

impl RoundTripReport {
    /// Overall verdict.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.count_before == self.count_after
            && self.missing.is_empty()
            && self.unexpected.is_empty()
            && self.categories_preserved
            && self.events.iter().all(EventCheck::passed)
    }
}

/// Exports a dataset, re-ingests it, and compares field by field.
///
/// Input events must have their `parent` caches resolved; the parent check
/// verifies that a child's resolved parent maps to the same external id on
/// both sides of the trip.
pub fn verify_roundtrip(
    events: &[Event],
    categories: &[Category],
    format: ExportFormat,
) -> Result<RoundTripReport, FormatError> {
    let options = IngestOptions::default();
    let (after_events, after_categories) = match format {
        ExportFormat::Csv => {
            let text = csv::events_to_csv(events);
            let records = csv::parse_csv(&text)?;
            let outcome = ingest(&records, 0, &options);
            (outcome.events, categories.to_vec())
        }
        ExportFormat::Yaml => {
            let text = yaml::document_to_yaml(events, categories, None)?;
            let doc = yaml::parse_yaml(&text)?;
            let outcome = ingest(&doc.records, 0, &options);
            (outcome.events, doc.categories)
        }
    };

    let before_by_id: HashMap<&EventId, &Event> =
        events.iter().map(|e| (&e.event_id, e)).collect();
    let after_by_id: HashMap<&EventId, &Event> =
        after_events.iter().map(|e| (&e.event_id, e)).collect();

    let missing = events
        .iter()
        .filter(|e| !after_by_id.contains_key(&e.event_id))
        .map(|e| e.event_id.to_string())
        .collect();
    let unexpected = after_events
        .iter()
        .filter(|e| !before_by_id.contains_key(&e.event_id))
        .map(|e| e.event_id.to_string())
        .collect();

    let mut checks = Vec::with_capacity(events.len());
    for before in events {
        let Some(after) = after_by_id.get(&before.event_id) else {
            continue;
        };
        checks.push(EventCheck {
            event_id: before.event_id.to_string(),
            mismatches: diff_events(before, after, events, &after_events),
        });
    }

    let mut categories_sorted = categories.to_vec();
    categories_sorted.sort_by(|a, b| a.id.cmp(&b.id));
    let mut after_categories = after_categories;
    after_categories.sort_by(|a, b| a.id.cmp(&b.id));

    Ok(RoundTripReport {
        format,
        count_before: events.len(),
        count_after: after_events.len(),
        missing,
        unexpected,
        events: checks,
        categories_preserved: categories_sorted == after_categories,
    })
}

/// Compares every round-tripping field of one event pair.
fn diff_events(
    before: &Event,
    after: &Event,
    before_all: &[Event],
    after_all: &[Event],
) -> Vec<FieldMismatch> {
    let mut mismatches = Vec::new();
    let mut check = |field: &'static str, a: String, b: String| {
        if a != b {
            mismatches.push(FieldMismatch {
                field,
                before: a,
                after: b,
            });
        }
    };

    check("title", before.title.clone(), after.title.clone());
    check(
        "type",
        before.kind.as_str().into(),
        after.kind.as_str().into(),
    );
    check("start", before.start.to_string(), after.start.to_string());
    check("end", before.end.to_string(), after.end.to_string());
    check(
        "category",
        opt_string(before.category.as_ref()),
        opt_string(after.category.as_ref()),
    );
    check(
        "color",
        before.color.as_str().into(),
        after.color.as_str().into(),
    );
    check(
        "isImportant",
        before.is_important.to_string(),
        after.is_important.to_string(),
    );
    check(
        "isParent",
        before.is_parent.to_string(),
        after.is_parent.to_string(),
    );
    check(
        "parentId",
        opt_string(before.parent_id.as_ref()),
        opt_string(after.parent_id.as_ref()),
    );
    check(
        "metadata",
        opt_string(before.metadata.as_ref()),
        opt_string(after.metadata.as_ref()),
    );
    check(
        "emoji",
        opt_string(before.emoji.as_ref()),
        opt_string(after.emoji.as_ref()),
    );
    check("city", opt_string(before.city.as_ref()), opt_string(after.city.as_ref()));
    check(
        "country",
        opt_string(before.country.as_ref()),
        opt_string(after.country.as_ref()),
    );

    // Resolved parent must survive: map each side's internal parent id back
    // to the external id it points at.
    check(
        "parent",
        resolved_parent_external(before, before_all),
        resolved_parent_external(after, after_all),
    );

    mismatches
}

fn resolved_parent_external(event: &Event, all: &[Event]) -> String {
    event
        .parent
        .and_then(|pid| all.iter().find(|e| e.id == pid))
        .map(|parent| parent.event_id.to_string())
        .unwrap_or_default()
}

fn opt_string<T: ToString>(value: Option<&T>) -> String {
    value.map(ToString::to_string).unwrap_or_default()
}

/// Fixed datasets exercising the tricky corners: mixed kinds, parent chains,
/// and geographic metadata.
#[must_use]
pub fn sample_datasets() -> Vec<SampleDataset> {
    vec![mixed_kinds(), parent_chain(), geographic()]
}

fn build(
    name: &'static str,
    categories: Vec<Category>,
    build_events: impl FnOnce(&mut Session),
) -> SampleDataset {
    let mut session = Session::new();
    for category in categories {
        // Sample ids are distinct by construction.
        let _ = session.add_category(category);
    }
    build_events(&mut session);
    SampleDataset {
        name,
        events: session.events().to_vec(),
        categories: session.categories().to_vec(),
    }
}

fn date(y: i32, m: u32, d: u32) -> chrono::NaiveDate {
    chrono::NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn category(id: &str, name: &str, color: &str) -> Category {
    Category {
        id: eon_core::CategoryId::new(id).unwrap_or_else(|_| unreachable!("fixed sample id")),
        name: name.into(),
        color: eon_core::Color::new(color).unwrap_or_else(|_| unreachable!("fixed sample color")),
    }
}

#[allow(clippy::too_many_arguments)]
fn push_event(
    session: &mut Session,
    external: &str,
    title: &str,
    kind: EventKind,
    start: chrono::NaiveDate,
    end: chrono::NaiveDate,
    color: &str,
    configure: impl FnOnce(&mut Event),
) {
    let Ok(event_id) = EventId::new(external) else {
        return;
    };
    let Ok(color) = eon_core::Color::new(color) else {
        return;
    };
    let Ok(mut event) = Event::new(0, event_id, title, kind, start, end, color) else {
        return;
    };
    configure(&mut event);
    // Sample data is fixed; collisions cannot occur.
    let _ = session.add_event(event, None);
}

fn mixed_kinds() -> SampleDataset {
    build(
        "mixed-kinds",
        vec![
            category("work", "Work", "#336699"),
            category("personal", "Personal", "#996633"),
        ],
        |session| {
            push_event(
                session,
                "job-1",
                "First job",
                EventKind::Range,
                date(2019, 4, 1),
                date(2021, 8, 31),
                "#112233",
                |e| {
                    e.category = eon_core::CategoryId::new("work").ok();
                    e.is_important = true;
                },
            );
            push_event(
                session,
                "grad",
                "Graduation",
                EventKind::Milestone,
                date(2019, 3, 15),
                date(2019, 3, 15),
                "#445566",
                |e| {
                    e.category = eon_core::CategoryId::new("personal").ok();
                    e.emoji = Some("🎓".into());
                },
            );
            push_event(
                session,
                "birth",
                "Born",
                EventKind::Life,
                date(1995, 6, 2),
                date(1995, 6, 2),
                "#778899",
                |e| {
                    e.metadata = Some("a comma, \"quotes\"\nand a second line".into());
                },
            );
        },
    )
}

fn parent_chain() -> SampleDataset {
    build(
        "parent-chain",
        vec![category("studies", "Studies", "#224488")],
        |session| {
            push_event(
                session,
                "degree",
                "Degree",
                EventKind::Range,
                date(2015, 9, 1),
                date(2019, 6, 30),
                "#101010",
                |e| {
                    e.category = eon_core::CategoryId::new("studies").ok();
                    e.is_parent = true;
                },
            );
            push_event(
                session,
                "thesis",
                "Thesis",
                EventKind::Range,
                date(2018, 9, 1),
                date(2019, 5, 31),
                "#202020",
                |e| {
                    e.category = eon_core::CategoryId::new("studies").ok();
                    e.is_parent = true;
                    e.parent_id = EventId::new("degree").ok();
                },
            );
            push_event(
                session,
                "defense",
                "Defense",
                EventKind::Milestone,
                date(2019, 5, 20),
                date(2019, 5, 20),
                "#303030",
                |e| {
                    e.parent_id = EventId::new("thesis").ok();
                },
            );
        },
    )
}

fn geographic() -> SampleDataset {
    build("geographic", Vec::new(), |session| {
        push_event(
            session,
            "lisbon",
            "Lisbon years",
            EventKind::Range,
            date(2020, 1, 1),
            date(2022, 12, 31),
            "#404040",
            |e| {
                e.city = Some("Lisbon".into());
                e.country = Some("Portugal".into());
            },
        );
        push_event(
            session,
            "move",
            "Moved to Tokyo",
            EventKind::Milestone,
            date(2023, 1, 15),
            date(2023, 1, 15),
            "#505050",
            |e| {
                e.city = Some("Tokyo".into());
                e.country = Some("Japan".into());
            },
        );
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_pass_csv_roundtrip() {
        for sample in sample_datasets() {
            let report =
                verify_roundtrip(&sample.events, &sample.categories, ExportFormat::Csv).unwrap();
            assert!(report.passed(), "{}: {report:?}", sample.name);
        }
    }

    #[test]
    fn samples_pass_yaml_roundtrip() {
        for sample in sample_datasets() {
            let report =
                verify_roundtrip(&sample.events, &sample.categories, ExportFormat::Yaml).unwrap();
            assert!(report.passed(), "{}: {report:?}", sample.name);
        }
    }

    #[test]
    fn parent_resolution_survives() {
        let sample = sample_datasets()
            .into_iter()
            .find(|s| s.name == "parent-chain")
            .unwrap();
        let report =
            verify_roundtrip(&sample.events, &sample.categories, ExportFormat::Csv).unwrap();
        let defense = report
            .events
            .iter()
            .find(|c| c.event_id == "defense")
            .unwrap();
        assert!(defense.passed());
    }

    #[test]
    fn report_names_the_divergent_field() {
        let sample = sample_datasets()
            .into_iter()
            .find(|s| s.name == "mixed-kinds")
            .unwrap();
        let mut tampered = sample.events.clone();
        // Simulate a lossy pipeline by checking tampered input against the
        // export of the original.
        tampered[0].title = "Renamed".into();

        let text = csv::events_to_csv(&sample.events);
        let records = csv::parse_csv(&text).unwrap();
        let outcome = ingest(&records, 0, &IngestOptions::default());

        let mismatches = diff_events(&tampered[0], &outcome.events[0], &tampered, &outcome.events);
        assert_eq!(mismatches.len(), 1);
        assert_eq!(mismatches[0].field, "title");
        assert_eq!(mismatches[0].before, "Renamed");
    }
}
