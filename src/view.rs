//! Terminal stand-in for the calendar widget.

use std::sync::{Mutex, PoisonError};

use bookcal_core::AppointmentEvent;
use bookcal_core::date_range::DateRange;
use bookcal_core::view::CalendarView;

/// Keeps whatever the core installs so commands can print it afterwards.
pub struct TerminalView {
    range: Mutex<DateRange>,
    events: Mutex<Vec<AppointmentEvent>>,
}

impl TerminalView {
    pub fn new(range: DateRange) -> Self {
        TerminalView {
            range: Mutex::new(range),
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn events(&self) -> Vec<AppointmentEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl CalendarView for TerminalView {
    fn clear_events(&self) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn set_event_source(&self, events: &[AppointmentEvent]) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(events);
    }

    fn visible_range(&self) -> DateRange {
        *self.range.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
