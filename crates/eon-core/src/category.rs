//! Category groupings for timeline events.

use serde::{Deserialize, Serialize};

use crate::types::{CategoryId, Color};

/// A named, colored bucket that groups events into a horizontal lane group.
///
/// Events referencing no category fall into a synthetic "uncategorized"
/// bucket at render time; that bucket is not represented here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier, referenced by [`crate::Event::category`].
    pub id: CategoryId,
    /// Display name.
    pub name: String,
    /// Lane group color.
    pub color: Color,
}
