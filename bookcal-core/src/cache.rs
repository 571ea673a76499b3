//! The events currently materialized for the visible range and filter.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::warn;

use crate::appointment::{AppointmentEvent, Id};

/// An immutable set of events in server order.
#[derive(Debug, Default)]
pub struct CacheSnapshot {
    events: Vec<AppointmentEvent>,
    index: HashMap<Id, usize>,
}

impl CacheSnapshot {
    fn build(events: Vec<AppointmentEvent>) -> Self {
        let mut kept = Vec::with_capacity(events.len());
        let mut index = HashMap::with_capacity(events.len());

        for event in events {
            if index.contains_key(&event.id) {
                warn!(id = %event.id, "duplicate appointment in response, keeping first");
                continue;
            }
            index.insert(event.id.clone(), kept.len());
            kept.push(event);
        }

        CacheSnapshot { events: kept, index }
    }

    pub fn events(&self) -> &[AppointmentEvent] {
        &self.events
    }

    pub fn get(&self, id: &Id) -> Option<&AppointmentEvent> {
        self.index.get(id).map(|&i| &self.events[i])
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Event store that is only ever replaced wholesale.
///
/// Readers get an `Arc` to a complete snapshot, so a reader never sees a mix
/// of two reconciliations.
#[derive(Debug, Default)]
pub struct EventCache {
    current: RwLock<Arc<CacheSnapshot>>,
}

impl EventCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace_all(&self, events: Vec<AppointmentEvent>) {
        let snapshot = Arc::new(CacheSnapshot::build(events));
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = snapshot;
    }

    pub fn all(&self) -> Arc<CacheSnapshot> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn lookup(&self, id: &Id) -> Option<AppointmentEvent> {
        self.all().get(id).cloned()
    }
}
