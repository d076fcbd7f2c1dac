//! YAML reading and writing.
//!
//! The document is a mapping with top-level `events`, `categories`, and an
//! optional `timeline` window. Categories and the timeline block decode
//! strictly; individual events decode leniently into raw records so that one
//! malformed entry becomes an ingestion warning instead of failing the whole
//! file. An undecodable document is a format error.

use chrono::NaiveDate;
use eon_core::{Category, Event};
use serde::{Deserialize, Serialize};

use crate::error::FormatError;
use crate::record::RawRecord;

/// Optional visible-window configuration carried in YAML files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineConfig {
    /// Display title for the timeline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Start of the visible window.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<NaiveDate>,
    /// End of the visible window.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<NaiveDate>,
}

/// A parsed YAML file: raw event records plus the strictly-typed sections.
#[derive(Debug, Clone, Default)]
pub struct YamlDocument {
    /// Event rows, untyped. Fed to [`crate::ingest::ingest`].
    pub records: Vec<RawRecord>,
    /// Category definitions.
    pub categories: Vec<Category>,
    /// Visible-window configuration, if present.
    pub timeline: Option<TimelineConfig>,
}

#[derive(Debug, Deserialize)]
struct WireDocument {
    #[serde(default)]
    timeline: Option<TimelineConfig>,
    #[serde(default)]
    categories: Vec<Category>,
    #[serde(default)]
    events: Vec<serde_yaml::Value>,
}

/// Parses YAML text into a [`YamlDocument`].
pub fn parse_yaml(text: &str) -> Result<YamlDocument, FormatError> {
    if text.trim().is_empty() {
        return Err(FormatError::Empty);
    }
    let doc: WireDocument = serde_yaml::from_str(text)?;

    let mut records = Vec::with_capacity(doc.events.len());
    for (position, value) in doc.events.into_iter().enumerate() {
        records.push(record_from_value(value, position + 1));
    }

    Ok(YamlDocument {
        records,
        categories: doc.categories,
        timeline: doc.timeline,
    })
}

/// Converts one YAML event entry into a raw record.
///
/// Scalars are stringified (booleans as `true`/`false`); nested values and
/// non-mapping entries are dropped, which leaves the record short and lets
/// ingestion attach the missing-field warning to the right row.
fn record_from_value(value: serde_yaml::Value, index: usize) -> RawRecord {
    let mut record = RawRecord::new(index);
    let serde_yaml::Value::Mapping(mapping) = value else {
        tracing::debug!(index, "YAML event entry is not a mapping");
        return record;
    };
    for (key, value) in mapping {
        let serde_yaml::Value::String(name) = key else {
            continue;
        };
        match value {
            serde_yaml::Value::String(s) => record.set(name, s),
            serde_yaml::Value::Bool(b) => record.set(name, b.to_string()),
            serde_yaml::Value::Number(n) => record.set(name, n.to_string()),
            serde_yaml::Value::Null => {}
            _ => {
                tracing::debug!(index, field = %name, "dropping non-scalar YAML value");
            }
        }
    }
    record
}

/// Wire shape of one exported event.
#[derive(Debug, Serialize)]
struct WireEvent<'a> {
    #[serde(rename = "eventId")]
    event_id: &'a str,
    title: &'a str,
    #[serde(rename = "type")]
    kind: &'a str,
    start: NaiveDate,
    end: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<&'a str>,
    color: &'a str,
    #[serde(rename = "isImportant")]
    is_important: bool,
    #[serde(rename = "isParent")]
    is_parent: bool,
    #[serde(rename = "parentId", skip_serializing_if = "Option::is_none")]
    parent_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    metadata: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    emoji: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    city: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    country: Option<&'a str>,
}

impl<'a> From<&'a Event> for WireEvent<'a> {
    fn from(event: &'a Event) -> Self {
        Self {
            event_id: event.event_id.as_str(),
            title: &event.title,
            kind: event.kind.as_str(),
            start: event.start,
            end: event.end,
            category: event.category.as_ref().map(AsRef::as_ref),
            color: event.color.as_str(),
            is_important: event.is_important,
            is_parent: event.is_parent,
            parent_id: event.parent_id.as_ref().map(AsRef::as_ref),
            metadata: event.metadata.as_deref(),
            emoji: event.emoji.as_deref(),
            city: event.city.as_deref(),
            country: event.country.as_deref(),
        }
    }
}

#[derive(Debug, Serialize)]
struct WireExport<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    timeline: Option<&'a TimelineConfig>,
    categories: &'a [Category],
    events: Vec<WireEvent<'a>>,
}

/// Serializes a dataset to YAML text.
///
/// Dates are ISO strings, booleans native, and the external `parentId` is
/// emitted in place of any internal id.
pub fn document_to_yaml(
    events: &[Event],
    categories: &[Category],
    timeline: Option<&TimelineConfig>,
) -> Result<String, FormatError> {
    let doc = WireExport {
        timeline,
        categories,
        events: events.iter().map(WireEvent::from).collect(),
    };
    Ok(serde_yaml::to_string(&doc)?)
}
