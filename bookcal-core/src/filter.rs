//! The provider/service filter applied to the calendar.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::appointment::Id;
use crate::directory::Directory;
use crate::error::{CalendarError, CalendarResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    Provider,
    Service,
}

impl FilterKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterKind::Provider => "provider",
            FilterKind::Service => "service",
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterKind {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "provider" => Ok(FilterKind::Provider),
            "service" => Ok(FilterKind::Service),
            other => Err(CalendarError::InvalidFilter(format!(
                "unknown filter type '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterSelection {
    pub record_id: Id,
    pub kind: FilterKind,
}

impl FilterSelection {
    pub fn provider(record_id: impl Into<Id>) -> Self {
        FilterSelection {
            record_id: record_id.into(),
            kind: FilterKind::Provider,
        }
    }

    pub fn service(record_id: impl Into<Id>) -> Self {
        FilterSelection {
            record_id: record_id.into(),
            kind: FilterKind::Service,
        }
    }
}

impl fmt::Display for FilterSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.record_id)
    }
}

/// Holds the active filter and notifies subscribers when it changes.
///
/// `None` means no filter has been chosen yet.
pub struct FilterModel {
    directory: Arc<Directory>,
    current: watch::Sender<Option<FilterSelection>>,
}

impl FilterModel {
    pub fn new(directory: Arc<Directory>) -> Self {
        let (current, _) = watch::channel(None);
        FilterModel { directory, current }
    }

    /// Replace the active filter. The record must exist in the directory.
    pub fn set(&self, selection: FilterSelection) -> CalendarResult<()> {
        if selection.record_id.is_empty() {
            return Err(CalendarError::InvalidFilter("empty record id".into()));
        }
        if !self.directory.contains(selection.kind, &selection.record_id) {
            return Err(CalendarError::InvalidFilter(format!(
                "no {} with id {}",
                selection.kind, selection.record_id
            )));
        }

        self.current.send_replace(Some(selection));
        Ok(())
    }

    pub fn get(&self) -> Option<FilterSelection> {
        self.current.borrow().clone()
    }

    /// Receiver that wakes on every accepted `set`.
    pub fn subscribe(&self) -> watch::Receiver<Option<FilterSelection>> {
        self.current.subscribe()
    }
}
