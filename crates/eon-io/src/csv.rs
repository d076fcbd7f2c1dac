//! CSV reading and writing.
//!
//! The quoting rules here are narrower than full RFC 4180 and are implemented
//! directly rather than through a CSV grammar library: fields may be wrapped
//! in double quotes, a doubled quote inside a quoted field emits one literal
//! quote, and a backslash-escaped quote (`\"`) emits a literal quote without
//! toggling quote state. Parsing is header-driven; column order carries no
//! meaning.

use eon_core::Event;

use crate::error::FormatError;
use crate::record::{RawRecord, fields};

/// Export column order. Parsing does not rely on it.
pub const HEADER: [&str; 14] = [
    fields::EVENT_ID,
    fields::TITLE,
    fields::KIND,
    fields::START,
    fields::END,
    fields::CATEGORY,
    fields::COLOR,
    fields::IS_IMPORTANT,
    fields::IS_PARENT,
    fields::PARENT_ID,
    fields::METADATA,
    fields::EMOJI,
    fields::CITY,
    fields::COUNTRY,
];

/// Splits one CSV line into fields, honoring the quoting rules above.
///
/// Errors on an unterminated quoted field. `line_number` is only used for the
/// error message.
pub fn split_line(line: &str, line_number: usize) -> Result<Vec<String>, FormatError> {
    let mut out = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'"') => {
                // Escaped quote: literal, does not toggle quote state.
                chars.next();
                field.push('"');
            }
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    // Doubled quote inside a quoted field.
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => {
                out.push(std::mem::take(&mut field));
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(FormatError::Csv {
            line: line_number,
            message: "unterminated quoted field".into(),
        });
    }
    out.push(field);
    Ok(out)
}

/// Parses CSV text into raw records, mapping columns by header name.
///
/// The header row is mandatory. Rows shorter than the header simply leave the
/// trailing fields absent; extra trailing values are dropped. Blank lines are
/// skipped. A newline inside a quoted field belongs to the field, so a record
/// may span several physical lines. Record indices are 1-based over data rows.
pub fn parse_csv(text: &str) -> Result<Vec<RawRecord>, FormatError> {
    let mut lines = logical_records(text).into_iter();

    let header = loop {
        match lines.next() {
            Some((number, line)) if line.trim().is_empty() => {
                tracing::debug!(line = number, "skipping blank line before header");
            }
            Some((number, line)) => break split_line(&line, number)?,
            None => return Err(FormatError::Empty),
        }
    };

    let mut records = Vec::new();
    for (number, line) in lines {
        if line.trim().is_empty() {
            continue;
        }
        let values = split_line(&line, number)?;
        if values.len() > header.len() {
            tracing::debug!(
                line = number,
                expected = header.len(),
                got = values.len(),
                "dropping extra trailing fields"
            );
        }
        let mut record = RawRecord::new(records.len() + 1);
        for (name, value) in header.iter().zip(values) {
            record.set(name.trim(), value);
        }
        records.push(record);
    }
    Ok(records)
}

/// Splits text into logical records, each paired with the 1-based physical
/// line it starts on.
///
/// A newline inside a quoted field stays part of the field instead of ending
/// the record; quote tracking follows the same rules as [`split_line`], which
/// sees each record's raw text unchanged and rejects any unbalanced one with
/// the right line number. A `\r` before a record-ending newline is stripped.
fn logical_records(text: &str) -> Vec<(usize, String)> {
    let mut records = Vec::new();
    let mut current = String::new();
    let mut start_line = 1;
    let mut line = 1;
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'"') => {
                chars.next();
                current.push('\\');
                current.push('"');
            }
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                chars.next();
                current.push_str("\"\"");
            }
            '"' => {
                in_quotes = !in_quotes;
                current.push('"');
            }
            '\n' if !in_quotes => {
                line += 1;
                if current.ends_with('\r') {
                    current.pop();
                }
                records.push((start_line, std::mem::take(&mut current)));
                start_line = line;
            }
            '\n' => {
                line += 1;
                current.push('\n');
            }
            _ => current.push(c),
        }
    }
    if !current.is_empty() {
        records.push((start_line, current));
    }
    records
}

/// Serializes events to CSV text with the fixed [`HEADER`].
///
/// Booleans are the literal strings `true`/`false`, dates are ISO
/// `YYYY-MM-DD`, and point events mirror `start` into `end` so the column is
/// always populated. The external `parentId` is emitted; internal ids never
/// are.
#[must_use]
pub fn events_to_csv(events: &[Event]) -> String {
    let mut out = String::new();
    out.push_str(&HEADER.join(","));
    out.push('\n');
    for event in events {
        let values = [
            event.event_id.as_str().to_string(),
            event.title.clone(),
            event.kind.as_str().to_string(),
            event.start.format("%Y-%m-%d").to_string(),
            event.end.format("%Y-%m-%d").to_string(),
            event
                .category
                .as_ref()
                .map(|c| c.as_str().to_string())
                .unwrap_or_default(),
            event.color.as_str().to_string(),
            event.is_important.to_string(),
            event.is_parent.to_string(),
            event
                .parent_id
                .as_ref()
                .map(|p| p.as_str().to_string())
                .unwrap_or_default(),
            event.metadata.clone().unwrap_or_default(),
            event.emoji.clone().unwrap_or_default(),
            event.city.clone().unwrap_or_default(),
            event.country.clone().unwrap_or_default(),
        ];
        let row: Vec<String> = values.iter().map(|v| quote_field(v)).collect();
        out.push_str(&row.join(","));
        out.push('\n');
    }
    out
}

/// Quotes a field when it contains a delimiter, quote, or line break.
fn quote_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
