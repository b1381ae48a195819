//! Error taxonomy for patient operations.
//!
//! Only failures that happen *before* the durable write appear here; they
//! abort the operation and surface to the caller. Billing and publish
//! failures happen after the write has committed and are logged inside the
//! coordinator instead (see `coordinator`).

use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum PatientError {
    /// A required field was missing or malformed; rejected before any store
    /// interaction.
    #[error("invalid input: {0}")]
    Validation(String),
    /// The email is already registered to another patient.
    #[error("email already registered to a patient: {0}")]
    DuplicateEmail(String),
    /// No patient exists with the given identifier.
    #[error("patient not found with id: {0}")]
    NotFound(Uuid),
    /// The durable-write layer failed; nothing downstream was attempted.
    #[error("patient store failure: {0}")]
    Store(String),
}

pub type PatientResult<T> = std::result::Result<T, PatientError>;

impl From<pm_types::TextError> for PatientError {
    fn from(err: pm_types::TextError) -> Self {
        PatientError::Validation(err.to_string())
    }
}
