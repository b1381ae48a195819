//! The patient model and validated command types.
//!
//! [`Patient`] is the stored record. Commands enter as raw strings and are
//! parsed into [`NewPatient`] / [`PatientUpdate`] at the boundary; every
//! field a command type carries has already passed validation, so the
//! coordinator and store never re-check.

use crate::error::{PatientError, PatientResult};
use chrono::NaiveDate;
use pm_types::{EmailAddress, NonEmptyText};
use uuid::Uuid;

/// A stored patient record.
///
/// `id` is assigned by the store at creation; `id` and `registered_date` are
/// immutable thereafter. `email` is globally unique across all patients.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Patient {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub address: String,
    pub date_of_birth: NaiveDate,
    pub registered_date: NaiveDate,
}

/// A validated create command. The store assigns the identifier.
#[derive(Clone, Debug)]
pub struct NewPatient {
    pub name: NonEmptyText,
    pub email: EmailAddress,
    pub address: NonEmptyText,
    pub date_of_birth: NaiveDate,
    pub registered_date: NaiveDate,
}

impl NewPatient {
    /// Parses raw command fields into a validated create command.
    ///
    /// # Errors
    ///
    /// Returns [`PatientError::Validation`] if any text field is blank, the
    /// email is not a valid address, or either date is not an ISO-8601
    /// calendar date.
    pub fn parse(
        name: &str,
        email: &str,
        address: &str,
        date_of_birth: &str,
        registered_date: &str,
    ) -> PatientResult<Self> {
        Ok(Self {
            name: parse_text("name", name)?,
            email: parse_email(email)?,
            address: parse_text("address", address)?,
            date_of_birth: parse_date("date_of_birth", date_of_birth)?,
            registered_date: parse_date("registered_date", registered_date)?,
        })
    }
}

/// A validated update command.
///
/// Updates are a full replacement of name/email/address/date of birth; the
/// identifier and registration date cannot be changed.
#[derive(Clone, Debug)]
pub struct PatientUpdate {
    pub name: NonEmptyText,
    pub email: EmailAddress,
    pub address: NonEmptyText,
    pub date_of_birth: NaiveDate,
}

impl PatientUpdate {
    /// Parses raw command fields into a validated update command.
    ///
    /// # Errors
    ///
    /// Returns [`PatientError::Validation`] under the same rules as
    /// [`NewPatient::parse`].
    pub fn parse(
        name: &str,
        email: &str,
        address: &str,
        date_of_birth: &str,
    ) -> PatientResult<Self> {
        Ok(Self {
            name: parse_text("name", name)?,
            email: parse_email(email)?,
            address: parse_text("address", address)?,
            date_of_birth: parse_date("date_of_birth", date_of_birth)?,
        })
    }
}

fn parse_text(field: &str, value: &str) -> PatientResult<NonEmptyText> {
    NonEmptyText::new(value).map_err(|err| PatientError::Validation(format!("{field}: {err}")))
}

fn parse_email(value: &str) -> PatientResult<EmailAddress> {
    EmailAddress::parse(value).map_err(|err| PatientError::Validation(format!("email: {err}")))
}

fn parse_date(field: &str, value: &str) -> PatientResult<NaiveDate> {
    value.parse::<NaiveDate>().map_err(|_| {
        PatientError::Validation(format!("{field} must be an ISO-8601 date, got: {value}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_create_command() {
        let new_patient =
            NewPatient::parse("Ada", "Ada@X.com", "1 Main St", "1990-01-01", "2024-01-01").unwrap();
        assert_eq!(new_patient.name.as_str(), "Ada");
        assert_eq!(new_patient.email.as_str(), "ada@x.com");
        assert_eq!(new_patient.date_of_birth.to_string(), "1990-01-01");
        assert_eq!(new_patient.registered_date.to_string(), "2024-01-01");
    }

    #[test]
    fn rejects_blank_name() {
        let err = NewPatient::parse("  ", "ada@x.com", "1 Main St", "1990-01-01", "2024-01-01")
            .unwrap_err();
        assert!(matches!(err, PatientError::Validation(msg) if msg.starts_with("name")));
    }

    #[test]
    fn rejects_invalid_email() {
        let err = NewPatient::parse("Ada", "not-an-email", "1 Main St", "1990-01-01", "2024-01-01")
            .unwrap_err();
        assert!(matches!(err, PatientError::Validation(msg) if msg.starts_with("email")));
    }

    #[test]
    fn rejects_malformed_date() {
        let err =
            NewPatient::parse("Ada", "ada@x.com", "1 Main St", "01/01/1990", "2024-01-01")
                .unwrap_err();
        assert!(matches!(err, PatientError::Validation(msg) if msg.contains("date_of_birth")));
    }

    #[test]
    fn update_command_has_no_registered_date() {
        let update = PatientUpdate::parse("Ada", "ada@x.com", "2 Side St", "1990-01-01").unwrap();
        assert_eq!(update.address.as_str(), "2 Side St");
    }
}
