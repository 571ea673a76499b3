//! The rendering widget the core drives.

use crate::appointment::AppointmentEvent;
use crate::date_range::DateRange;

/// A calendar widget that displays events.
///
/// The core never patches a rendered source: every reconciliation calls
/// `clear_events` and then `set_event_source` with the full new set.
pub trait CalendarView: Send + Sync {
    fn clear_events(&self);

    fn set_event_source(&self, events: &[AppointmentEvent]);

    /// Days currently shown by the widget.
    fn visible_range(&self) -> DateRange;
}
