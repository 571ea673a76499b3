//! Editing a single appointment through the modal form.
//!
//! A session is a copy of the appointment taken when the form opens. Edits are
//! staged on that copy only; nothing reaches the cache until the backend has
//! accepted the update and the calendar has been re-fetched.

mod field;

pub use field::EditField;

use std::sync::Arc;

use tracing::{debug, warn};

use crate::appointment::{AppointmentEvent, Id};
use crate::directory::{Directory, ProviderEntry, ServiceEntry};
use crate::error::{CalendarError, CalendarResult};
use crate::filter::FilterModel;
use crate::remote::{AppointmentUpdate, CustomerFields, Persister};
use crate::sync::{SyncEngine, SyncOutcome};

/// Values currently entered in the form.
#[derive(Debug, Clone, PartialEq)]
pub struct StagedAppointment {
    pub service: Option<Id>,
    pub provider: Option<Id>,
    pub customer: CustomerFields,
}

/// Choices offered by the form together with the staged values.
#[derive(Debug, Clone, PartialEq)]
pub struct EditForm {
    pub services: Vec<ServiceEntry>,
    /// Only providers able to perform the staged service.
    pub providers: Vec<ProviderEntry>,
    pub staged: StagedAppointment,
}

impl EditForm {
    /// Current text of `field`, empty when nothing is selected.
    pub fn value(&self, field: EditField) -> &str {
        let customer = &self.staged.customer;
        match field {
            EditField::Service => self.staged.service.as_ref().map_or("", Id::as_str),
            EditField::Provider => self.staged.provider.as_ref().map_or("", Id::as_str),
            EditField::FirstName => customer.first_name.as_str(),
            EditField::LastName => customer.last_name.as_str(),
            EditField::Email => customer.email.as_str(),
            EditField::PhoneNumber => customer.phone_number.as_str(),
            EditField::Address => customer.address.as_str(),
            EditField::City => customer.city.as_str(),
            EditField::ZipCode => customer.zip_code.as_str(),
            EditField::Notes => customer.notes.as_str(),
        }
    }
}

#[derive(Debug, Clone)]
struct OpenEdit {
    source: AppointmentEvent,
    form: EditForm,
}

/// Result of a successful commit.
#[derive(Debug)]
pub struct Committed {
    pub update: AppointmentUpdate,
    /// The follow-up refresh, `None` when no filter is active.
    pub refresh: Option<CalendarResult<SyncOutcome>>,
}

/// The appointment edit dialog: closed, or open on one appointment.
pub struct EditSession {
    directory: Arc<Directory>,
    open: Option<OpenEdit>,
}

impl EditSession {
    pub fn new(directory: Arc<Directory>) -> Self {
        EditSession {
            directory,
            open: None,
        }
    }

    /// Open the form on `event`, discarding any session already open.
    pub fn open(&mut self, event: AppointmentEvent) -> &EditForm {
        if let Some(previous) = &self.open {
            debug!(previous = %previous.source.id, next = %event.id, "replacing open edit session");
        }

        let payload = &event.payload;
        let service = payload.id_services.clone();
        let providers = self.directory.providers_for(&service);
        let provider = providers
            .iter()
            .any(|p| p.id == payload.id_users_provider)
            .then(|| payload.id_users_provider.clone());

        let form = EditForm {
            services: self.directory.services.clone(),
            providers,
            staged: StagedAppointment {
                service: Some(service),
                provider,
                customer: CustomerFields::from(&payload.customer),
            },
        };

        &self.open.insert(OpenEdit { source: event, form }).form
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    /// The appointment as it was when the session opened.
    pub fn source(&self) -> Option<&AppointmentEvent> {
        self.open.as_ref().map(|open| &open.source)
    }

    pub fn form(&self) -> Option<&EditForm> {
        self.open.as_ref().map(|open| &open.form)
    }

    /// Change one staged value.
    ///
    /// Services must exist in the directory and providers must be among the
    /// current provider choices. Changing the service narrows the provider
    /// choices; if the staged provider cannot perform the new service the
    /// first eligible provider is selected instead.
    pub fn stage_field(&mut self, field: EditField, value: impl Into<String>) -> CalendarResult<()> {
        let value = value.into();
        let open = self.open.as_mut().ok_or(CalendarError::NoActiveSession)?;
        let form = &mut open.form;
        let invalid = || CalendarError::InvalidField {
            field: field.name().to_string(),
            value: value.clone(),
        };

        match field {
            EditField::Service => {
                let id = Id::new(value.clone());
                if self.directory.service(&id).is_none() {
                    return Err(invalid());
                }
                form.providers = self.directory.providers_for(&id);
                let still_eligible = form
                    .staged
                    .provider
                    .as_ref()
                    .is_some_and(|current| form.providers.iter().any(|p| &p.id == current));
                if !still_eligible {
                    form.staged.provider = form.providers.first().map(|p| p.id.clone());
                }
                form.staged.service = Some(id);
            }
            EditField::Provider => {
                let id = Id::new(value.clone());
                if !form.providers.iter().any(|p| p.id == id) {
                    return Err(invalid());
                }
                form.staged.provider = Some(id);
            }
            EditField::FirstName => form.staged.customer.first_name = value,
            EditField::LastName => form.staged.customer.last_name = value,
            EditField::Email => form.staged.customer.email = value,
            EditField::PhoneNumber => form.staged.customer.phone_number = value,
            EditField::Address => form.staged.customer.address = value,
            EditField::City => form.staged.customer.city = value,
            EditField::ZipCode => form.staged.customer.zip_code = value,
            EditField::Notes => form.staged.customer.notes = value,
        }

        Ok(())
    }

    /// The update that `commit` would send.
    pub fn build_update(&self) -> CalendarResult<AppointmentUpdate> {
        let open = self.open.as_ref().ok_or(CalendarError::NoActiveSession)?;
        let staged = &open.form.staged;

        Ok(AppointmentUpdate {
            id: open.source.id.clone(),
            id_services: staged.service.clone(),
            id_users_provider: staged.provider.clone(),
            customer: staged.customer.clone(),
        })
    }

    /// Send the staged changes, then re-fetch the visible calendar.
    ///
    /// On failure the session stays open with its staged values so the user
    /// can retry. The cache is never patched locally.
    pub async fn commit(
        &mut self,
        persister: &dyn Persister,
        sync: &SyncEngine,
        filter: &FilterModel,
    ) -> CalendarResult<Committed> {
        let update = self.build_update()?;

        if let Err(e) = persister.update(&update).await {
            let message = format!("{e:#}");
            warn!(id = %update.id, error = %message, "appointment update failed");
            return Err(CalendarError::UpdateFailed(message));
        }

        self.open = None;
        debug!(id = %update.id, "appointment saved");

        let refresh = match filter.get() {
            Some(selection) => Some(sync.refresh_visible(&selection).await),
            None => None,
        };
        if let Some(Err(e)) = &refresh {
            warn!(error = %e, "refresh after save failed");
        }

        Ok(Committed { update, refresh })
    }

    /// Close the form without saving. Returns whether a session was open.
    pub fn cancel(&mut self) -> bool {
        self.open.take().is_some()
    }
}
