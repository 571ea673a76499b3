//! Static provider and service lists supplied once at start-up.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::appointment::Id;
use crate::error::{CalendarError, CalendarResult};
use crate::filter::{FilterKind, FilterSelection};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderEntry {
    pub id: Id,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub services: Vec<Id>,
}

impl ProviderEntry {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn can_provide(&self, service_id: &Id) -> bool {
        self.services.contains(service_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceEntry {
    pub id: Id,
    pub name: String,
}

/// One entry of the filter select box.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterOption {
    pub label: String,
    pub selection: FilterSelection,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Directory {
    #[serde(default)]
    pub providers: Vec<ProviderEntry>,
    #[serde(default)]
    pub services: Vec<ServiceEntry>,
}

impl Directory {
    /// Load the directory from a JSON file.
    pub fn load(path: &Path) -> CalendarResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CalendarError::Config(format!("Could not read directory file {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&content).map_err(|e| {
            CalendarError::Config(format!("Could not parse directory file {}: {}", path.display(), e))
        })
    }

    pub fn provider(&self, id: &Id) -> Option<&ProviderEntry> {
        self.providers.iter().find(|p| &p.id == id)
    }

    pub fn service(&self, id: &Id) -> Option<&ServiceEntry> {
        self.services.iter().find(|s| &s.id == id)
    }

    /// Whether `id` names a record of the given kind.
    pub fn contains(&self, kind: FilterKind, id: &Id) -> bool {
        match kind {
            FilterKind::Provider => self.provider(id).is_some(),
            FilterKind::Service => self.service(id).is_some(),
        }
    }

    /// Providers able to perform `service_id`, in directory order.
    pub fn providers_for(&self, service_id: &Id) -> Vec<ProviderEntry> {
        self.providers
            .iter()
            .filter(|p| p.can_provide(service_id))
            .cloned()
            .collect()
    }

    /// Filter choices: all providers, then all services.
    pub fn filter_options(&self) -> Vec<FilterOption> {
        let providers = self.providers.iter().map(|p| FilterOption {
            label: p.display_name(),
            selection: FilterSelection::provider(p.id.clone()),
        });
        let services = self.services.iter().map(|s| FilterOption {
            label: s.name.clone(),
            selection: FilterSelection::service(s.id.clone()),
        });
        providers.chain(services).collect()
    }
}
