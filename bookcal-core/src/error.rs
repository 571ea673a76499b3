//! Error types for the booking calendar core.

use chrono::NaiveDate;
use thiserror::Error;

use crate::appointment::Id;

/// Errors that can occur in calendar operations.
///
/// Every variant leaves the calendar in its last consistent state: a failed
/// refresh keeps the previous events on display, a failed update keeps the
/// edit session open.
#[derive(Error, Debug)]
pub enum CalendarError {
    #[error("Invalid date range: {start} is after {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    #[error("Failed to load appointments: {0}")]
    SyncFailed(String),

    #[error("Failed to save appointment: {0}")]
    UpdateFailed(String),

    #[error("No event is focused")]
    NoFocusedEvent,

    #[error("Appointment not found: {0}")]
    EventNotFound(Id),

    #[error("No appointment is being edited")]
    NoActiveSession,

    #[error("Invalid value '{value}' for field '{field}'")]
    InvalidField { field: String, value: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for calendar operations.
pub type CalendarResult<T> = Result<T, CalendarError>;
