//! Core type definitions with validation.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for core types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// The color string was not a `#rrggbb` hex value.
    #[error("invalid color: {value}")]
    InvalidColor { value: String },

    /// Unknown event kind string.
    #[error("invalid event kind: {value}")]
    InvalidKind { value: String },

    /// A range event had its dates inverted.
    #[error("event end {end} precedes start {start}")]
    InvertedRange {
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },
}

/// Generates a validated string ID newtype with common trait implementations.
macro_rules! define_string_id {
    (
        $(#[$meta:meta])*
        $name:ident, $field_name:literal
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a new ID after validation.
            pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
                let id = id.into();
                if id.is_empty() {
                    return Err(ValidationError::Empty { field: $field_name });
                }
                Ok(Self(id))
            }

            /// Returns the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_string_id!(
    /// A stable external event identifier.
    ///
    /// Event IDs must be non-empty strings. They are unique within a dataset,
    /// are the key used for parent/child cross-references, and are preserved
    /// verbatim across export and import.
    EventId, "event ID"
);

define_string_id!(
    /// A validated category identifier.
    CategoryId, "category ID"
);

/// An RGB color in `#rrggbb` hex notation.
///
/// Parsing is case-insensitive; the stored form is normalized to lowercase so
/// color equality across a round trip is plain string equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(String);

impl Color {
    /// Creates a color after validating the `#rrggbb` shape.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let hex = value.strip_prefix('#').unwrap_or(&value);
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ValidationError::InvalidColor { value });
        }
        Ok(Self(format!("#{}", hex.to_ascii_lowercase())))
    }

    /// Draws a random color from the given generator.
    ///
    /// Used to default event colors on creation and import. Callers seed the
    /// generator so repeated imports of the same file produce the same colors.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        let rgb: u32 = rng.gen_range(0..=0x00ff_ffff);
        Self(format!("#{rgb:06x}"))
    }

    /// Returns the color as a `#rrggbb` string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Color {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Color {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    #[test]
    fn event_id_rejects_empty() {
        assert!(EventId::new("").is_err());
        assert!(EventId::new("ev-1").is_ok());
    }

    #[test]
    fn category_id_rejects_empty() {
        assert!(CategoryId::new("").is_err());
        assert!(CategoryId::new("work").is_ok());
    }

    #[test]
    fn event_id_serde_roundtrip() {
        let id = EventId::new("P1").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"P1\"");
        let parsed: EventId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn event_id_serde_rejects_empty() {
        let result: Result<EventId, _> = serde_json::from_str("\"\"");
        assert!(result.is_err());
    }

    #[test]
    fn color_normalizes_to_lowercase() {
        let color = Color::new("#A1B2C3").unwrap();
        assert_eq!(color.as_str(), "#a1b2c3");
    }

    #[test]
    fn color_accepts_missing_hash() {
        let color = Color::new("ff0000").unwrap();
        assert_eq!(color.as_str(), "#ff0000");
    }

    #[test]
    fn color_rejects_malformed() {
        assert!(Color::new("#fff").is_err());
        assert!(Color::new("#gggggg").is_err());
        assert!(Color::new("").is_err());
        assert!(Color::new("#ff00001").is_err());
    }

    #[test]
    fn color_random_is_deterministic_per_seed() {
        let mut a = SmallRng::seed_from_u64(7);
        let mut b = SmallRng::seed_from_u64(7);
        assert_eq!(Color::random(&mut a), Color::random(&mut b));
    }

    #[test]
    fn color_random_is_valid() {
        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..100 {
            let color = Color::random(&mut rng);
            assert!(Color::new(color.as_str()).is_ok());
        }
    }
}
