//! Calendar synchronization core for the booking backend.
//!
//! This crate keeps a client-side set of appointments consistent with the
//! active provider/service filter, the visible date range and edits made in
//! the appointment dialog:
//! - `filter` holds the active selection
//! - `cache` holds the events on display, replaced wholesale
//! - `sync` loads appointments and drops stale responses
//! - `popover` and `edit` model the detail popover and the edit dialog
//! - `controller` routes UI events to the above
//! - `remote` defines the backend collaborators and an HTTP implementation

pub mod appointment;
pub mod cache;
pub mod config;
pub mod controller;
pub mod date_range;
pub mod directory;
pub mod edit;
pub mod error;
pub mod filter;
pub mod popover;
pub mod remote;
pub mod sync;
pub mod view;

#[cfg(test)]
mod testing;

pub use appointment::{AppointmentEvent, AppointmentPayload, Id};
pub use controller::{BackendCalendar, Reaction, UiEvent};
pub use error::{CalendarError, CalendarResult};
