//! The owning session for a timeline dataset.
//!
//! All events and categories live in one [`Session`]; there is no global
//! state. Callers pass the session by reference into every operation, and the
//! session is responsible for keeping the derived caches (`parent`, `row`)
//! consistent after each structural mutation.

use std::collections::HashMap;

use thiserror::Error;
use uuid::Uuid;

use crate::category::Category;
use crate::event::Event;
use crate::rows::compute_rows;
use crate::types::{CategoryId, EventId, ValidationError};

/// Errors from session mutations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// An event with this external id already exists.
    #[error("duplicate event ID: {0}")]
    DuplicateEventId(EventId),

    /// No event with this internal id exists.
    #[error("no event with internal id {0}")]
    UnknownEvent(u64),

    /// A category with this id already exists.
    #[error("duplicate category ID: {0}")]
    DuplicateCategory(CategoryId),

    /// The category is still referenced by at least one event.
    #[error("category {0} is referenced by {1} event(s)")]
    CategoryInUse(CategoryId, usize),

    /// No category with this id exists.
    #[error("no category with id {0}")]
    UnknownCategory(CategoryId),

    /// A field-level validation failure.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Owns the full event and category collections for one editing session.
#[derive(Debug, Default)]
pub struct Session {
    events: Vec<Event>,
    categories: Vec<Category>,
    next_id: u64,
}

impl Session {
    /// Creates an empty session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The events, in insertion order.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// The categories, in insertion order.
    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// The next internal id this session would assign.
    ///
    /// Passed as the id offset to a subsequent import so two batches ingested
    /// into one session never collide on internal ids.
    #[must_use]
    pub const fn next_id(&self) -> u64 {
        self.next_id
    }

    /// Adds an event, assigning its internal id.
    ///
    /// `Some` replaces the event's external id before insertion; `None` keeps
    /// the one the event already carries. Either way the external id must be
    /// unique within the session; [`Self::generate_event_id`] mints a fresh
    /// unused one for callers creating events without a chosen id. Returns
    /// the internal id.
    pub fn add_event(
        &mut self,
        mut event: Event,
        event_id: Option<EventId>,
    ) -> Result<u64, SessionError> {
        if let Some(external) = event_id {
            event.event_id = external;
        }
        if self.find_by_event_id(&event.event_id).is_some() {
            return Err(SessionError::DuplicateEventId(event.event_id));
        }
        event.normalize()?;
        event.id = self.next_id;
        self.next_id += 1;
        self.events.push(event);
        self.relink_parents();
        Ok(self.next_id - 1)
    }

    /// Generates a fresh external event id, guaranteed unused in this session.
    #[must_use]
    pub fn generate_event_id(&self) -> EventId {
        loop {
            let candidate = EventId::new(Uuid::new_v4().to_string())
                .unwrap_or_else(|_| unreachable!("uuid strings are non-empty"));
            if self.find_by_event_id(&candidate).is_none() {
                return candidate;
            }
        }
    }

    /// Replaces the event with the same internal id.
    ///
    /// The replacement is normalized and its `event_id` checked for
    /// uniqueness against the rest of the collection before anything is
    /// touched, so a failed update leaves the session unchanged.
    pub fn update_event(&mut self, mut event: Event) -> Result<(), SessionError> {
        let Some(index) = self.events.iter().position(|e| e.id == event.id) else {
            return Err(SessionError::UnknownEvent(event.id));
        };
        let clash = self
            .events
            .iter()
            .any(|e| e.id != event.id && e.event_id == event.event_id);
        if clash {
            return Err(SessionError::DuplicateEventId(event.event_id));
        }
        event.normalize()?;
        self.events[index] = event;
        self.relink_parents();
        Ok(())
    }

    /// Removes an event by internal id.
    ///
    /// Children referencing the removed event keep their `parent_id` string
    /// but their `parent` cache resolves to `None` afterwards.
    pub fn remove_event(&mut self, id: u64) -> Result<Event, SessionError> {
        let Some(index) = self.events.iter().position(|e| e.id == id) else {
            return Err(SessionError::UnknownEvent(id));
        };
        let removed = self.events.remove(index);
        self.relink_parents();
        Ok(removed)
    }

    /// Looks up an event by internal id.
    #[must_use]
    pub fn find_event(&self, id: u64) -> Option<&Event> {
        self.events.iter().find(|e| e.id == id)
    }

    /// Looks up an event by external id.
    #[must_use]
    pub fn find_by_event_id(&self, event_id: &EventId) -> Option<&Event> {
        self.events.iter().find(|e| &e.event_id == event_id)
    }

    /// Adds a category.
    pub fn add_category(&mut self, category: Category) -> Result<(), SessionError> {
        if self.categories.iter().any(|c| c.id == category.id) {
            return Err(SessionError::DuplicateCategory(category.id));
        }
        self.categories.push(category);
        Ok(())
    }

    /// Removes a category, refusing while any event still references it.
    pub fn remove_category(&mut self, id: &CategoryId) -> Result<Category, SessionError> {
        let references = self
            .events
            .iter()
            .filter(|e| e.category.as_ref() == Some(id))
            .count();
        if references > 0 {
            return Err(SessionError::CategoryInUse(id.clone(), references));
        }
        let Some(index) = self.categories.iter().position(|c| &c.id == id) else {
            return Err(SessionError::UnknownCategory(id.clone()));
        };
        Ok(self.categories.remove(index))
    }

    /// Atomically replaces the whole dataset.
    ///
    /// Import callers stage a fully parsed batch and swap it in with one call,
    /// so a render pass can never observe a half-ingested collection and a
    /// failed parse leaves the previous dataset untouched.
    pub fn replace_all(&mut self, events: Vec<Event>, categories: Vec<Category>) {
        self.next_id = events.iter().map(|e| e.id + 1).max().unwrap_or(0);
        self.events = events;
        self.categories = categories;
        self.relink_parents();
        tracing::debug!(
            events = self.events.len(),
            categories = self.categories.len(),
            "dataset replaced"
        );
    }

    /// Recomputes every `parent` cache from `parent_id`.
    ///
    /// Parents are weak references: a lookup by external key, never a stored
    /// pointer, so a deletion can only ever produce an unresolved link, not a
    /// dangling one. Unresolved references leave `parent` unset.
    pub fn relink_parents(&mut self) {
        let index: HashMap<EventId, u64> = self
            .events
            .iter()
            .map(|e| (e.event_id.clone(), e.id))
            .collect();
        for event in &mut self.events {
            event.parent = event
                .parent_id
                .as_ref()
                .and_then(|pid| index.get(pid))
                .copied();
        }
    }

    /// Recomputes and applies lane assignments for every event.
    pub fn assign_rows(&mut self) {
        let assignments = compute_rows(&self.events);
        let by_id: HashMap<u64, u32> = assignments.iter().map(|a| (a.id, a.row)).collect();
        for event in &mut self.events {
            event.row = by_id.get(&event.id).copied().unwrap_or(0);
        }
    }
}
