//! Routes UI events to the calendar components.
//!
//! Each `UiEvent` maps onto exactly one component operation, so the whole
//! page can be driven (and tested) without a rendered widget.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::appointment::Id;
use crate::cache::EventCache;
use crate::date_range::DateRange;
use crate::directory::{Directory, FilterOption};
use crate::edit::{Committed, EditField, EditForm, EditSession};
use crate::error::CalendarResult;
use crate::filter::{FilterModel, FilterSelection};
use crate::popover::{Anchor, PopoverController, PopoverSummary};
use crate::remote::{DataSource, Persister};
use crate::sync::{SyncEngine, SyncOutcome};
use crate::view::CalendarView;

#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    FilterChanged(FilterSelection),
    /// The widget navigated; carries the newly visible range.
    RangeChanged(DateRange),
    EventClicked { event_id: Id, anchor: Anchor },
    PopoverClosed,
    EditRequested,
    FieldEdited { field: EditField, value: String },
    EditCommitted,
    EditCancelled,
    /// An appointment was dragged or resized.
    EventMoved { event_id: Id },
}

/// What the page should do after an event was handled.
#[derive(Debug)]
pub enum Reaction {
    /// A refresh is running; its result also reaches the view directly.
    Refreshing(JoinHandle<CalendarResult<SyncOutcome>>),
    PopoverShown(PopoverSummary),
    PopoverHidden,
    EditorShown(EditForm),
    FieldStaged,
    Committed(Committed),
    EditorClosed,
    Ignored,
}

pub struct BackendCalendar {
    directory: Arc<Directory>,
    filter: FilterModel,
    filter_changes: watch::Receiver<Option<FilterSelection>>,
    sync: Arc<SyncEngine>,
    popover: PopoverController,
    edit: EditSession,
    persister: Arc<dyn Persister>,
}

impl BackendCalendar {
    pub fn new(
        directory: Directory,
        source: Arc<dyn DataSource>,
        persister: Arc<dyn Persister>,
        view: Arc<dyn CalendarView>,
    ) -> Self {
        let directory = Arc::new(directory);
        let sync = SyncEngine::new(source, Arc::new(EventCache::new()), view);
        let filter = FilterModel::new(Arc::clone(&directory));

        BackendCalendar {
            filter_changes: filter.subscribe(),
            filter,
            sync: Arc::new(sync),
            popover: PopoverController::new(),
            edit: EditSession::new(Arc::clone(&directory)),
            persister,
            directory,
        }
    }

    /// Select the first filter option and load it, as the page does on load.
    pub fn initialize(&mut self) -> CalendarResult<Reaction> {
        match self.directory.filter_options().into_iter().next() {
            Some(option) => self.apply_filter(option.selection),
            None => Ok(Reaction::Ignored),
        }
    }

    pub async fn handle(&mut self, event: UiEvent) -> CalendarResult<Reaction> {
        match event {
            UiEvent::FilterChanged(selection) => self.apply_filter(selection),
            UiEvent::RangeChanged(range) => {
                range.validate()?;
                match self.filter.get() {
                    Some(selection) => Ok(Reaction::Refreshing(self.spawn_refresh(&selection, range)?)),
                    None => Ok(Reaction::Ignored),
                }
            }
            UiEvent::EventClicked { event_id, anchor } => {
                let summary = self
                    .popover
                    .open_from_cache(self.sync.cache(), &event_id, anchor)?;
                Ok(Reaction::PopoverShown(summary))
            }
            UiEvent::PopoverClosed => {
                self.popover.close();
                Ok(Reaction::PopoverHidden)
            }
            UiEvent::EditRequested => {
                let event = self.popover.request_edit()?;
                Ok(Reaction::EditorShown(self.edit.open(event).clone()))
            }
            UiEvent::FieldEdited { field, value } => {
                self.edit.stage_field(field, value)?;
                Ok(Reaction::FieldStaged)
            }
            UiEvent::EditCommitted => {
                let committed = self
                    .edit
                    .commit(self.persister.as_ref(), &self.sync, &self.filter)
                    .await?;
                Ok(Reaction::Committed(committed))
            }
            UiEvent::EditCancelled => {
                self.edit.cancel();
                Ok(Reaction::EditorClosed)
            }
            UiEvent::EventMoved { event_id } => {
                debug!(id = %event_id, "moving appointments from the calendar is not supported");
                Ok(Reaction::Ignored)
            }
        }
    }

    fn apply_filter(&mut self, selection: FilterSelection) -> CalendarResult<Reaction> {
        self.filter.set(selection)?;
        self.on_filter_change()
    }

    /// Refresh for the selection announced on the filter channel.
    fn on_filter_change(&mut self) -> CalendarResult<Reaction> {
        if !self.filter_changes.has_changed().unwrap_or(false) {
            return Ok(Reaction::Ignored);
        }
        let Some(selection) = self.filter_changes.borrow_and_update().clone() else {
            return Ok(Reaction::Ignored);
        };
        let range = self.sync.view().visible_range();
        Ok(Reaction::Refreshing(self.spawn_refresh(&selection, range)?))
    }

    /// Filter and range refreshes both go through here.
    ///
    /// The query is issued before the task is spawned, so refreshes are
    /// sequenced in dispatch order however the runtime schedules them.
    fn spawn_refresh(
        &self,
        selection: &FilterSelection,
        range: DateRange,
    ) -> CalendarResult<JoinHandle<CalendarResult<SyncOutcome>>> {
        let pending = self.sync.issue(selection, &range)?;
        let sync = Arc::clone(&self.sync);
        Ok(tokio::spawn(async move { sync.complete(pending).await }))
    }

    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    pub fn filter_options(&self) -> Vec<FilterOption> {
        self.directory.filter_options()
    }

    pub fn filter(&self) -> &FilterModel {
        &self.filter
    }

    pub fn cache(&self) -> &Arc<EventCache> {
        self.sync.cache()
    }

    pub fn sync(&self) -> &Arc<SyncEngine> {
        &self.sync
    }

    pub fn popover(&self) -> &PopoverController {
        &self.popover
    }

    pub fn edit_session(&self) -> &EditSession {
        &self.edit
    }
}
