//! Appointment records as the backend sends them, and the calendar events
//! built from them.
//!
//! The payload is carried opaquely: the core only reads the ids it needs to
//! pre-select the edit form, and the names shown in the popover. Unknown
//! fields are kept in `extra` so nothing the backend sends is lost.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};

/// Identifier of a backend record.
///
/// The backend emits ids as JSON numbers in some places and as strings in
/// others, so both deserialize to the same textual id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Id(String);

impl Id {
    pub fn new(id: impl Into<String>) -> Self {
        Id(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Id {
    fn from(s: &str) -> Self {
        Id::new(s)
    }
}

impl From<u64> for Id {
    fn from(n: u64) -> Self {
        Id(n.to_string())
    }
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Number(serde_json::Number),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Number(n) => Id(n.to_string()),
            RawId::Text(s) => Id(s),
        })
    }
}

/// Service summary embedded in an appointment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceRecord {
    pub id: Id,
    pub name: String,
}

/// Provider embedded in an appointment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderRecord {
    pub id: Id,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub services: Vec<Id>,
}

/// Customer embedded in an appointment. Every field is nullable server-side.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerRecord {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub zip_code: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// The full appointment record returned by the appointments endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentPayload {
    pub id: Id,
    #[serde(with = "server_datetime")]
    pub start_datetime: NaiveDateTime,
    #[serde(with = "server_datetime")]
    pub end_datetime: NaiveDateTime,
    pub service: ServiceRecord,
    pub provider: ProviderRecord,
    #[serde(default)]
    pub customer: CustomerRecord,
    pub id_services: Id,
    pub id_users_provider: Id,

    /// Fields this crate does not interpret, preserved verbatim.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// An appointment as shown on the calendar.
#[derive(Debug, Clone, PartialEq)]
pub struct AppointmentEvent {
    pub id: Id,
    pub title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub all_day: bool,
    pub payload: AppointmentPayload,
}

impl From<AppointmentPayload> for AppointmentEvent {
    /// Appointments are always timed; this calendar never produces all-day events.
    fn from(payload: AppointmentPayload) -> Self {
        AppointmentEvent {
            id: payload.id.clone(),
            title: payload.service.name.clone(),
            start: payload.start_datetime,
            end: payload.end_datetime,
            all_day: false,
            payload,
        }
    }
}

impl AppointmentEvent {
    pub fn provider_name(&self) -> String {
        full_name(
            Some(&self.payload.provider.first_name),
            Some(&self.payload.provider.last_name),
        )
    }

    pub fn customer_name(&self) -> String {
        let customer = &self.payload.customer;
        full_name(customer.first_name.as_ref(), customer.last_name.as_ref())
    }
}

fn full_name(first: Option<&String>, last: Option<&String>) -> String {
    [first, last]
        .into_iter()
        .flatten()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// `YYYY-MM-DD HH:MM:SS` timestamps as stored by the backend database.
pub mod server_datetime {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";
    const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

    pub fn serialize<S: Serializer>(dt: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&dt.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let s = String::deserialize(deserializer)?;
        parse(&s).map_err(serde::de::Error::custom)
    }

    pub fn parse(s: &str) -> Result<NaiveDateTime, String> {
        NaiveDateTime::parse_from_str(s, FORMAT)
            .or_else(|_| NaiveDateTime::parse_from_str(s, ISO_FORMAT))
            .map_err(|_| format!("Invalid datetime '{}'. Expected YYYY-MM-DD HH:MM:SS", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ids_from_numbers_and_strings_compare_equal() {
        let a: Id = serde_json::from_value(json!(5)).unwrap();
        let b: Id = serde_json::from_value(json!("5")).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "5");
    }

    #[test]
    fn event_from_payload_uses_service_name_and_is_never_all_day() {
        let payload: AppointmentPayload = serde_json::from_value(json!({
            "id": "12",
            "start_datetime": "2024-01-02 10:00:00",
            "end_datetime": "2024-01-02 10:30:00",
            "service": { "id": "9", "name": "Haircut" },
            "provider": { "id": "1", "first_name": "Jane", "last_name": "Doe", "services": ["9"] },
            "customer": { "first_name": "John", "last_name": "Smith", "notes": null },
            "id_services": "9",
            "id_users_provider": "1",
            "book_datetime": "2023-12-20 08:00:00"
        }))
        .unwrap();

        let event = AppointmentEvent::from(payload);

        assert_eq!(event.id, Id::from(12));
        assert_eq!(event.title, "Haircut");
        assert!(!event.all_day);
        assert_eq!(event.start.format("%H:%M").to_string(), "10:00");
        assert_eq!(event.provider_name(), "Jane Doe");
        assert_eq!(event.customer_name(), "John Smith");
        assert_eq!(
            event.payload.extra.get("book_datetime"),
            Some(&json!("2023-12-20 08:00:00"))
        );
    }

    #[test]
    fn malformed_datetime_is_rejected() {
        let result = serde_json::from_value::<AppointmentPayload>(json!({
            "id": 1,
            "start_datetime": "tomorrow",
            "end_datetime": "2024-01-02 10:30:00",
            "service": { "id": 9, "name": "Haircut" },
            "provider": { "id": 1, "first_name": "Jane", "last_name": "Doe" },
            "id_services": 9,
            "id_users_provider": 1
        }));

        assert!(result.is_err());
    }
}
