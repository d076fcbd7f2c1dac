//! Timeline events and their construction invariants.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::{CategoryId, Color, EventId, ValidationError};

/// The kind of a timeline event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// A span with distinct start and end dates.
    Range,
    /// A single-day marker.
    Milestone,
    /// A single-day "life" marker (birth, death, and similar).
    Life,
}

impl EventKind {
    /// String representation used in CSV and YAML files.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Range => "range",
            Self::Milestone => "milestone",
            Self::Life => "life",
        }
    }

    /// Whether this kind occupies a single day (`end` mirrors `start`).
    #[must_use]
    pub const fn is_point(&self) -> bool {
        matches!(self, Self::Milestone | Self::Life)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl std::str::FromStr for EventKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "range" => Ok(Self::Range),
            "milestone" => Ok(Self::Milestone),
            "life" => Ok(Self::Life),
            _ => Err(ValidationError::InvalidKind {
                value: s.to_string(),
            }),
        }
    }
}

/// A single timeline entry.
///
/// # Identity
///
/// Events carry two identifiers with different lifetimes:
/// - `id` is a process-local surrogate assigned on creation or import. It is
///   never written to files and is not stable across sessions.
/// - `event_id` is the stable external key. It is unique within a dataset,
///   preserved verbatim across export/import, and is what `parent_id` refers
///   to.
///
/// # Derived fields
///
/// `parent` and `row` are caches computed from the owning collection. They are
/// skipped on serialization and must be recomputed after any structural
/// mutation (see [`crate::Session::relink_parents`] and
/// [`crate::Session::assign_rows`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Process-local surrogate key.
    #[serde(skip)]
    pub id: u64,
    /// Stable external identifier.
    pub event_id: EventId,
    /// Display title. Non-empty.
    pub title: String,
    /// Event kind.
    pub kind: EventKind,
    /// Start date.
    pub start: NaiveDate,
    /// End date. Equals `start` for point kinds.
    pub end: NaiveDate,
    /// Owning category, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<CategoryId>,
    /// Render color.
    pub color: Color,
    /// Highlight flag. Rendering-only, but round-trips.
    #[serde(default)]
    pub is_important: bool,
    /// Whether this event is a structural parent of other events.
    #[serde(default)]
    pub is_parent: bool,
    /// External key of the structural parent, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<EventId>,
    /// Internal id of the resolved parent. Derived, never serialized.
    #[serde(skip)]
    pub parent: Option<u64>,
    /// Free-text notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<String>,
    /// Override glyph for milestone rendering.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
    /// Geographic metadata: city.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// Geographic metadata: country.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// Assigned lane within the category. Derived, never serialized.
    #[serde(skip)]
    pub row: u32,
}

impl Event {
    /// Creates an event, enforcing the kind/date invariants.
    ///
    /// Point kinds (`milestone`, `life`) have `end` forced to `start`
    /// regardless of the passed value; a `range` with `end < start` is
    /// rejected.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: u64,
        event_id: EventId,
        title: impl Into<String>,
        kind: EventKind,
        start: NaiveDate,
        end: NaiveDate,
        color: Color,
    ) -> Result<Self, ValidationError> {
        let title = title.into();
        if title.is_empty() {
            return Err(ValidationError::Empty { field: "title" });
        }
        let end = if kind.is_point() {
            start
        } else if end < start {
            return Err(ValidationError::InvertedRange { start, end });
        } else {
            end
        };
        Ok(Self {
            id,
            event_id,
            title,
            kind,
            start,
            end,
            category: None,
            color,
            is_important: false,
            is_parent: false,
            parent_id: None,
            parent: None,
            metadata: None,
            emoji: None,
            city: None,
            country: None,
            row: 0,
        })
    }

    /// Re-applies the kind/date invariant after a field edit.
    ///
    /// Point kinds mirror `start` into `end`; a now-inverted range is
    /// rejected without modifying the event.
    pub fn normalize(&mut self) -> Result<(), ValidationError> {
        if self.kind.is_point() {
            self.end = self.start;
        } else if self.end < self.start {
            return Err(ValidationError::InvertedRange {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }
}
