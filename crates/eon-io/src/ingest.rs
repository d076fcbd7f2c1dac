//! The normalization boundary: raw records in, strict events out.
//!
//! Every row is coerced independently and failures are collected as
//! structured warnings; one bad row never aborts the batch. Rows that cannot
//! become events are returned in `rejected` so a caller (typically an edit
//! form) can offer them up for correction.

use std::collections::HashMap;
use std::fmt;

use chrono::NaiveDate;
use eon_core::{Category, CategoryId, Color, Event, EventId, EventKind};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

use crate::record::{RawRecord, fields};

/// What to do when a batch contains the same `eventId` twice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicatePolicy {
    /// Skip the later row, keeping the first occurrence. The default:
    /// parent links stay unambiguous and nothing silently disappears.
    #[default]
    Skip,
    /// Last write wins: the later row replaces the earlier event in place.
    Overwrite,
}

/// Knobs for one ingestion pass.
#[derive(Debug, Clone)]
pub struct IngestOptions {
    /// Seed for defaulted colors, so re-importing the same file yields the
    /// same colors.
    pub color_seed: u64,
    /// Duplicate `eventId` handling.
    pub duplicate_policy: DuplicatePolicy,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            color_seed: 0x0e07,
            duplicate_policy: DuplicatePolicy::default(),
        }
    }
}

/// Classification of a per-row problem, mirroring the error taxonomy:
/// structural and referential problems are warnings, never errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WarningKind {
    /// Missing required field, duplicate id, or an uncoercible value.
    Structural,
    /// A `parentId` that resolves to nothing in the batch.
    Referential,
    /// A date that failed to parse; the row is excluded from the positional
    /// set.
    Positional,
}

/// One per-row problem encountered during ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Warning {
    /// 1-based row the problem belongs to.
    pub row: usize,
    /// Offending field, when one can be named.
    pub field: Option<&'static str>,
    /// Problem class.
    pub kind: WarningKind,
    /// Human-readable description.
    pub message: String,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.field {
            Some(field) => write!(f, "row {}: {} ({field})", self.row, self.message),
            None => write!(f, "row {}: {}", self.row, self.message),
        }
    }
}

/// The result of one ingestion pass.
///
/// `events` have parents already linked. `rejected` holds the raw records
/// that produced no event, for correction and re-submission.
#[derive(Debug, Default)]
pub struct ImportOutcome {
    /// Successfully ingested events, parent links resolved.
    pub events: Vec<Event>,
    /// Structured per-row problems.
    pub warnings: Vec<Warning>,
    /// Rows that could not become events.
    pub rejected: Vec<RawRecord>,
}

/// Converts raw records into strict events.
///
/// Internal ids are assigned sequentially from `id_offset`; callers ingesting
/// several batches into one session pass the session's next free id so
/// batches never collide. After coercion, parent references are resolved
/// against an `eventId` index built over this batch alone.
pub fn ingest(records: &[RawRecord], id_offset: u64, options: &IngestOptions) -> ImportOutcome {
    let mut rng = SmallRng::seed_from_u64(options.color_seed);
    let mut outcome = ImportOutcome::default();
    // eventId -> position in outcome.events, for duplicate detection.
    let mut seen: HashMap<EventId, usize> = HashMap::new();
    // Source row per ingested event, for warning attribution during linking.
    let mut source_rows: Vec<usize> = Vec::new();
    let mut next_id = id_offset;

    for record in records {
        match coerce_row(record, next_id, &mut rng, &mut outcome.warnings) {
            Some(event) => {
                if let Some(&existing) = seen.get(&event.event_id) {
                    match options.duplicate_policy {
                        DuplicatePolicy::Skip => {
                            outcome.warnings.push(Warning {
                                row: record.index,
                                field: Some(fields::EVENT_ID),
                                kind: WarningKind::Structural,
                                message: format!(
                                    "duplicate event ID {}, row skipped",
                                    event.event_id
                                ),
                            });
                            outcome.rejected.push(record.clone());
                        }
                        DuplicatePolicy::Overwrite => {
                            outcome.warnings.push(Warning {
                                row: record.index,
                                field: Some(fields::EVENT_ID),
                                kind: WarningKind::Structural,
                                message: format!(
                                    "duplicate event ID {}, replacing earlier row",
                                    event.event_id
                                ),
                            });
                            // Keep the original slot and internal id so links
                            // made against the first occurrence stay valid.
                            let id = outcome.events[existing].id;
                            outcome.events[existing] = Event { id, ..event };
                            source_rows[existing] = record.index;
                        }
                    }
                    continue;
                }
                seen.insert(event.event_id.clone(), outcome.events.len());
                source_rows.push(record.index);
                outcome.events.push(event);
                next_id += 1;
            }
            None => outcome.rejected.push(record.clone()),
        }
    }

    link_parents(&mut outcome, &source_rows);
    tracing::debug!(
        events = outcome.events.len(),
        warnings = outcome.warnings.len(),
        rejected = outcome.rejected.len(),
        "ingestion pass complete"
    );
    outcome
}

/// Coerces one record, pushing warnings and returning `None` when the row
/// cannot become an event.
fn coerce_row(
    record: &RawRecord,
    id: u64,
    rng: &mut SmallRng,
    warnings: &mut Vec<Warning>,
) -> Option<Event> {
    let row = record.index;

    let event_id = match record.get(fields::EVENT_ID).map(EventId::new) {
        Some(Ok(id)) => id,
        _ => {
            warnings.push(structural(row, fields::EVENT_ID, "missing event ID"));
            return None;
        }
    };
    let Some(title) = record.get(fields::TITLE) else {
        warnings.push(structural(row, fields::TITLE, "missing title"));
        return None;
    };

    let kind = match record.get(fields::KIND) {
        None => EventKind::Range,
        Some(raw) => raw.parse::<EventKind>().unwrap_or_else(|_| {
            warnings.push(structural(
                row,
                fields::KIND,
                format!("unknown event kind {raw:?}, defaulting to range"),
            ));
            EventKind::Range
        }),
    };

    let start = match record.get(fields::START).map(parse_date) {
        Some(Some(date)) => date,
        Some(None) => {
            warnings.push(Warning {
                row,
                field: Some(fields::START),
                kind: WarningKind::Positional,
                message: "unparsable start date, row excluded".into(),
            });
            return None;
        }
        None => {
            warnings.push(structural(row, fields::START, "missing start date"));
            return None;
        }
    };

    let mut end = start;
    if !kind.is_point() {
        match record.get(fields::END) {
            None => {}
            Some(raw) => match parse_date(raw) {
                Some(date) if date < start => {
                    warnings.push(Warning {
                        row,
                        field: Some(fields::END),
                        kind: WarningKind::Positional,
                        message: "end precedes start, clamped to start".into(),
                    });
                }
                Some(date) => end = date,
                None => {
                    warnings.push(Warning {
                        row,
                        field: Some(fields::END),
                        kind: WarningKind::Positional,
                        message: "unparsable end date, using start".into(),
                    });
                }
            },
        }
    }

    let color = match record.get(fields::COLOR) {
        None => Color::random(rng),
        Some(raw) => Color::new(raw).unwrap_or_else(|_| {
            warnings.push(structural(
                row,
                fields::COLOR,
                format!("invalid color {raw:?}, randomized"),
            ));
            Color::random(rng)
        }),
    };

    // Construction cannot fail past this point: title is non-empty and the
    // date invariant was normalized above.
    let mut event = Event::new(id, event_id, title, kind, start, end, color).ok()?;

    event.category = record
        .get(fields::CATEGORY)
        .and_then(|raw| CategoryId::new(raw).ok());
    event.is_important = parse_bool(record, fields::IS_IMPORTANT, warnings);
    event.is_parent = parse_bool(record, fields::IS_PARENT, warnings);
    event.parent_id = record
        .get(fields::PARENT_ID)
        .and_then(|raw| EventId::new(raw).ok());
    event.metadata = record.get(fields::METADATA).map(str::to_string);
    event.emoji = record.get(fields::EMOJI).map(str::to_string);
    event.city = record.get(fields::CITY).map(str::to_string);
    event.country = record.get(fields::COUNTRY).map(str::to_string);
    Some(event)
}

/// Resolves `parent_id` into the `parent` cache over the ingested batch.
fn link_parents(outcome: &mut ImportOutcome, source_rows: &[usize]) {
    let index: HashMap<EventId, u64> = outcome
        .events
        .iter()
        .map(|e| (e.event_id.clone(), e.id))
        .collect();
    for (position, event) in outcome.events.iter_mut().enumerate() {
        let Some(parent_id) = event.parent_id.as_ref() else {
            continue;
        };
        event.parent = index.get(parent_id).copied();
        if event.parent.is_none() {
            outcome.warnings.push(Warning {
                row: source_rows.get(position).copied().unwrap_or(position + 1),
                field: Some(fields::PARENT_ID),
                kind: WarningKind::Referential,
                message: format!("parent {parent_id} not found, event kept as root"),
            });
        }
    }
}

/// Synthesizes category definitions for ids referenced by a batch.
///
/// CSV files carry no category table, so a conversion to YAML needs one;
/// names default to the id and colors come from the seeded generator.
#[must_use]
pub fn categories_from_events(events: &[Event], color_seed: u64) -> Vec<Category> {
    let mut rng = SmallRng::seed_from_u64(color_seed);
    let mut seen = Vec::new();
    for event in events {
        let Some(id) = event.category.as_ref() else {
            continue;
        };
        if seen.iter().any(|c: &Category| &c.id == id) {
            continue;
        }
        seen.push(Category {
            id: id.clone(),
            name: id.as_str().to_string(),
            color: Color::random(&mut rng),
        });
    }
    seen
}

fn structural(row: usize, field: &'static str, message: impl Into<String>) -> Warning {
    Warning {
        row,
        field: Some(field),
        kind: WarningKind::Structural,
        message: message.into(),
    }
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp (time of day ignored).
fn parse_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(date) = raw.parse::<NaiveDate>() {
        return Some(date);
    }
    raw.parse::<chrono::DateTime<chrono::FixedOffset>>()
        .map(|dt| dt.date_naive())
        .ok()
}

/// Booleans arrive as the literal strings `true`/`false`; anything else is a
/// warning and coerces to `false`.
fn parse_bool(record: &RawRecord, field: &'static str, warnings: &mut Vec<Warning>) -> bool {
    match record.get(field) {
        None => false,
        Some(raw) => match raw.to_ascii_lowercase().as_str() {
            "true" => true,
            "false" => false,
            _ => {
                warnings.push(structural(
                    record.index,
                    field,
                    format!("invalid boolean {raw:?}, treated as false"),
                ));
                false
            }
        },
    }
}
