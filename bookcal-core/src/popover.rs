//! The detail popover shown when an appointment is clicked.

use std::fmt;

use crate::appointment::{AppointmentEvent, Id};
use crate::cache::EventCache;
use crate::error::{CalendarError, CalendarResult};

/// Popover timestamps, `dd-MM-yyyy HH:mm`.
pub const POPOVER_TIME_FORMAT: &str = "%d-%m-%Y %H:%M";

/// The on-screen element a popover is attached to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor(String);

impl Anchor {
    pub fn new(anchor: impl Into<String>) -> Self {
        Anchor(anchor.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Read-only summary rendered inside the popover.
#[derive(Debug, Clone, PartialEq)]
pub struct PopoverSummary {
    pub title: String,
    pub start: String,
    pub end: String,
    pub service: String,
    pub provider: String,
    pub customer: String,
}

impl PopoverSummary {
    fn of(event: &AppointmentEvent) -> Self {
        PopoverSummary {
            title: event.title.clone(),
            start: event.start.format(POPOVER_TIME_FORMAT).to_string(),
            end: event.end.format(POPOVER_TIME_FORMAT).to_string(),
            service: event.title.clone(),
            provider: event.provider_name(),
            customer: event.customer_name(),
        }
    }

    /// Label/value rows in display order.
    pub fn rows(&self) -> [(&'static str, &str); 5] {
        [
            ("Start", self.start.as_str()),
            ("End", self.end.as_str()),
            ("Service", self.service.as_str()),
            ("Provider", self.provider.as_str()),
            ("Customer", self.customer.as_str()),
        ]
    }
}

impl fmt::Display for PopoverSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        for (label, value) in self.rows() {
            writeln!(f, "{:<10}{}", label, value)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct OpenPopover {
    pub event: AppointmentEvent,
    pub anchor: Anchor,
}

/// At most one popover is open at a time.
#[derive(Debug, Default)]
pub struct PopoverController {
    open: Option<OpenPopover>,
}

impl PopoverController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show `event` at `anchor`, replacing any open popover.
    pub fn open(&mut self, event: AppointmentEvent, anchor: Anchor) -> PopoverSummary {
        let summary = PopoverSummary::of(&event);
        self.open = Some(OpenPopover { event, anchor });
        summary
    }

    /// Open the popover for a clicked event, taking its data from the cache.
    pub fn open_from_cache(
        &mut self,
        cache: &EventCache,
        id: &Id,
        anchor: Anchor,
    ) -> CalendarResult<PopoverSummary> {
        let event = cache
            .lookup(id)
            .ok_or_else(|| CalendarError::EventNotFound(id.clone()))?;
        Ok(self.open(event, anchor))
    }

    /// Returns whether a popover was open.
    pub fn close(&mut self) -> bool {
        self.open.take().is_some()
    }

    /// Close the popover and hand its event over for editing.
    pub fn request_edit(&mut self) -> CalendarResult<AppointmentEvent> {
        self.open
            .take()
            .map(|open| open.event)
            .ok_or(CalendarError::NoFocusedEvent)
    }

    pub fn current(&self) -> Option<&OpenPopover> {
        self.open.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::event;

    #[test]
    fn summary_formats_times_and_names() {
        let mut popover = PopoverController::new();
        let summary = popover.open(event(1, "Consultation"), Anchor::new("evt-1"));

        assert_eq!(summary.start, "02-01-2024 10:00");
        assert_eq!(summary.end, "02-01-2024 11:00");
        assert_eq!(summary.service, "Consultation");
        assert_eq!(summary.provider, "Bob Ray");
        assert_eq!(summary.customer, "John Smith");
        assert!(summary.to_string().contains("Provider  Bob Ray"));
    }

    #[test]
    fn opening_again_replaces_the_open_popover() {
        let mut popover = PopoverController::new();
        popover.open(event(1, "Consultation"), Anchor::new("evt-1"));
        popover.open(event(2, "Checkup"), Anchor::new("evt-2"));

        let open = popover.current().unwrap();
        assert_eq!(open.event.id, Id::from(2));
        assert_eq!(open.anchor, Anchor::new("evt-2"));

        assert!(popover.close());
        assert!(popover.current().is_none());
        assert!(!popover.close());
    }

    #[test]
    fn request_edit_hands_over_event_and_closes() {
        let mut popover = PopoverController::new();
        popover.open(event(4, "Checkup"), Anchor::new("evt-4"));

        let event = popover.request_edit().unwrap();

        assert_eq!(event.id, Id::from(4));
        assert!(popover.current().is_none());
    }

    #[test]
    fn request_edit_without_popover_fails() {
        let mut popover = PopoverController::new();
        assert!(matches!(popover.request_edit(), Err(CalendarError::NoFocusedEvent)));
    }

    #[test]
    fn open_from_cache_requires_a_cached_event() {
        let cache = EventCache::new();
        cache.replace_all(vec![event(8, "Checkup")]);
        let mut popover = PopoverController::new();

        assert!(popover.open_from_cache(&cache, &Id::from(8), Anchor::new("a")).is_ok());
        let err = popover
            .open_from_cache(&cache, &Id::from(9), Anchor::new("b"))
            .unwrap_err();
        assert!(matches!(err, CalendarError::EventNotFound(_)));
        // the failed click leaves the previous popover open
        assert_eq!(popover.current().unwrap().event.id, Id::from(8));
    }
}
