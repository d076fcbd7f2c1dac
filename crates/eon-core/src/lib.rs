//! Core domain logic for the eon timeline.
//!
//! This crate contains the fundamental types and logic for:
//! - The event/category data model with validated identifiers
//! - Lane assignment: resolving temporal overlap into non-colliding rows
//! - Axis math: mapping calendar dates onto a bounded percentage axis

pub mod axis;
mod category;
mod event;
mod rows;
mod session;
pub mod types;

pub use category::Category;
pub use event::{Event, EventKind};
pub use rows::{RowAssignment, compute_rows, overlap};
pub use session::{Session, SessionError};
pub use types::{CategoryId, Color, EventId, ValidationError};
