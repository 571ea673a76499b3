//! Request bodies sent to the backend.

use serde::{Deserialize, Serialize};

use crate::appointment::{CustomerRecord, Id};
use crate::date_range::DateRange;
use crate::filter::{FilterKind, FilterSelection};

/// Appointments of one provider or service within a date range.
///
/// Sent as form fields, dates as `yyyy-MM-dd`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentQuery {
    pub record_id: Id,
    pub start_date: String,
    pub end_date: String,
    pub filter_type: FilterKind,
}

impl AppointmentQuery {
    pub fn new(filter: &FilterSelection, range: &DateRange) -> Self {
        AppointmentQuery {
            record_id: filter.record_id.clone(),
            start_date: range.start_param(),
            end_date: range.end_param(),
            filter_type: filter.kind,
        }
    }
}

/// Editable customer details, as plain text fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerFields {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub address: String,
    pub city: String,
    pub zip_code: String,
    pub notes: String,
}

impl From<&CustomerRecord> for CustomerFields {
    fn from(customer: &CustomerRecord) -> Self {
        let text = |field: &Option<String>| field.clone().unwrap_or_default();
        CustomerFields {
            first_name: text(&customer.first_name),
            last_name: text(&customer.last_name),
            email: text(&customer.email),
            phone_number: text(&customer.phone_number),
            address: text(&customer.address),
            city: text(&customer.city),
            zip_code: text(&customer.zip_code),
            notes: text(&customer.notes),
        }
    }
}

/// Changes to an existing appointment. `id` is mandatory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentUpdate {
    pub id: Id,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_services: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_users_provider: Option<Id>,
    pub customer: CustomerFields,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::range;

    #[test]
    fn query_uses_wire_names_and_date_format() {
        let query = AppointmentQuery::new(
            &FilterSelection::service(9),
            &range("2024-01-01", "2024-01-08"),
        );

        let value = serde_json::to_value(&query).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "record_id": "9",
                "start_date": "2024-01-01",
                "end_date": "2024-01-08",
                "filter_type": "service"
            })
        );
    }

    #[test]
    fn null_customer_fields_become_empty_text() {
        let fields = CustomerFields::from(&CustomerRecord {
            first_name: Some("John".into()),
            ..CustomerRecord::default()
        });
        assert_eq!(fields.first_name, "John");
        assert_eq!(fields.notes, "");
    }
}
