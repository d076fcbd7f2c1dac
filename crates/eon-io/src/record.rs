//! Untyped intermediate records.
//!
//! Parsing produces loosely-typed field maps; the single normalization
//! boundary in [`crate::ingest`] converts them into strict
//! [`eon_core::Event`]s. Raw records never flow past ingestion.

use std::collections::BTreeMap;

/// Wire field names shared by the CSV and YAML surfaces.
pub mod fields {
    pub const EVENT_ID: &str = "eventId";
    pub const TITLE: &str = "title";
    pub const KIND: &str = "type";
    pub const START: &str = "start";
    pub const END: &str = "end";
    pub const CATEGORY: &str = "category";
    pub const COLOR: &str = "color";
    pub const IS_IMPORTANT: &str = "isImportant";
    pub const IS_PARENT: &str = "isParent";
    pub const PARENT_ID: &str = "parentId";
    pub const METADATA: &str = "metadata";
    pub const EMOJI: &str = "emoji";
    pub const CITY: &str = "city";
    pub const COUNTRY: &str = "country";
}

/// One parsed row: a mapping from field name to raw string value.
///
/// `index` is the 1-based data-row number (CSV) or sequence position (YAML),
/// used to attach warnings to the offending row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    /// 1-based position of this record in its source.
    pub index: usize,
    fields: BTreeMap<String, String>,
}

impl RawRecord {
    /// Creates an empty record at the given source position.
    #[must_use]
    pub fn new(index: usize) -> Self {
        Self {
            index,
            fields: BTreeMap::new(),
        }
    }

    /// Sets a field. Empty values are treated as absent and dropped.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let value = value.into();
        if value.is_empty() {
            return;
        }
        self.fields.insert(name.into(), value);
    }

    /// Returns a field value, if present and non-empty.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Iterates over the populated fields in name order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Whether the record has no populated fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_values_are_absent() {
        let mut record = RawRecord::new(1);
        record.set("title", "");
        record.set("eventId", "E1");
        assert_eq!(record.get("title"), None);
        assert_eq!(record.get("eventId"), Some("E1"));
    }

    #[test]
    fn fields_iterate_in_name_order() {
        let mut record = RawRecord::new(1);
        record.set("title", "T");
        record.set("eventId", "E1");
        let names: Vec<&str> = record.fields().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["eventId", "title"]);
    }
}
