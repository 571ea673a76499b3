//! Fields of the appointment edit form.

use std::fmt;
use std::str::FromStr;

use crate::error::CalendarError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditField {
    Service,
    Provider,
    FirstName,
    LastName,
    Email,
    PhoneNumber,
    Address,
    City,
    ZipCode,
    Notes,
}

impl EditField {
    pub const ALL: [EditField; 10] = [
        EditField::Service,
        EditField::Provider,
        EditField::FirstName,
        EditField::LastName,
        EditField::Email,
        EditField::PhoneNumber,
        EditField::Address,
        EditField::City,
        EditField::ZipCode,
        EditField::Notes,
    ];

    /// Name of the field in the appointment record.
    pub fn name(&self) -> &'static str {
        match self {
            EditField::Service => "id_services",
            EditField::Provider => "id_users_provider",
            EditField::FirstName => "first_name",
            EditField::LastName => "last_name",
            EditField::Email => "email",
            EditField::PhoneNumber => "phone_number",
            EditField::Address => "address",
            EditField::City => "city",
            EditField::ZipCode => "zip_code",
            EditField::Notes => "notes",
        }
    }
}

impl fmt::Display for EditField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EditField {
    type Err = CalendarError;

    /// Accepts record names plus `service` and `provider` as shorthands.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "service" => return Ok(EditField::Service),
            "provider" => return Ok(EditField::Provider),
            _ => {}
        }
        EditField::ALL
            .into_iter()
            .find(|field| field.name() == s)
            .ok_or_else(|| CalendarError::InvalidField {
                field: s.to_string(),
                value: String::new(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_record_names_and_shorthands() {
        assert_eq!("zip_code".parse::<EditField>().unwrap(), EditField::ZipCode);
        assert_eq!("id_services".parse::<EditField>().unwrap(), EditField::Service);
        assert_eq!("provider".parse::<EditField>().unwrap(), EditField::Provider);
        assert!("password".parse::<EditField>().is_err());
    }
}
