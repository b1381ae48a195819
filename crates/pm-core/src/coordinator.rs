//! The patient write-path coordinator.
//!
//! On every create/update/delete, [`PatientService`] sequences a local
//! durable write, a synchronous billing call and an asynchronous event
//! publish. There is no distributed transaction across the three systems;
//! the ordering and failure policy here is the contract:
//!
//! - Failures before the durable write abort the operation and surface to
//!   the caller.
//! - The billing call and the event publish happen *after* the write has
//!   committed; their failures are logged and swallowed, so create/delete
//!   success never implies billing-side success.
//! - No locks are held across either remote call; a wedged billing
//!   collaborator degrades the latency of one request, not of its peers.
//!
//! The billing call and the change event are emitted on create and delete
//! only. Updates touch the store and nothing else; a test pins that
//! behaviour so it cannot change silently.

use crate::billing::BillingClient;
use crate::error::{PatientError, PatientResult};
use crate::patient::{NewPatient, Patient, PatientUpdate};
use crate::publish::EventPublisher;
use crate::store::PatientStore;
use pm_proto::events::{EventType, PatientEvent};
use std::sync::Arc;
use uuid::Uuid;

/// Coordinates patient commands across store, billing and event log.
///
/// Holds interface-typed references supplied at construction; none of the
/// three collaborators is looked up through ambient state.
#[derive(Clone)]
pub struct PatientService {
    store: Arc<dyn PatientStore>,
    billing: Arc<dyn BillingClient>,
    publisher: Arc<dyn EventPublisher>,
    topic: String,
}

impl PatientService {
    /// Creates a coordinator over the given collaborators.
    ///
    /// `topic` names the event-log topic creation events are published to;
    /// production wiring passes [`pm_proto::PATIENT_TOPIC`].
    pub fn new(
        store: Arc<dyn PatientStore>,
        billing: Arc<dyn BillingClient>,
        publisher: Arc<dyn EventPublisher>,
        topic: impl Into<String>,
    ) -> Self {
        Self {
            store,
            billing,
            publisher,
            topic: topic.into(),
        }
    }

    /// Returns all stored patients.
    ///
    /// # Errors
    ///
    /// Returns [`PatientError::Store`] if the store read fails.
    pub async fn get_all_patients(&self) -> PatientResult<Vec<Patient>> {
        self.store.find_all().await
    }

    /// Creates a patient: store write, then billing account creation, then
    /// a `PATIENT_CREATED` event keyed by the new identifier.
    ///
    /// # Errors
    ///
    /// Returns [`PatientError::DuplicateEmail`] if the email is already
    /// registered, or [`PatientError::Store`] if the write fails. Billing
    /// and publish failures are logged, not returned: the patient row is
    /// already durable by the time either remote call is attempted.
    pub async fn create_patient(&self, new_patient: NewPatient) -> PatientResult<Patient> {
        if self.store.exists_by_email(new_patient.email.as_str()).await? {
            return Err(PatientError::DuplicateEmail(
                new_patient.email.as_str().to_owned(),
            ));
        }

        let patient = self.store.create(new_patient).await?;
        tracing::info!(patient_id = %patient.id, "patient saved to store");

        match self
            .billing
            .create_account(patient.id, &patient.name, &patient.email)
            .await
        {
            Ok(account) => tracing::info!(
                patient_id = %patient.id,
                account_id = %account.account_id,
                status = %account.status,
                "billing account created"
            ),
            Err(err) => tracing::error!(
                patient_id = %patient.id,
                error = %err,
                "billing account creation failed; patient exists without a billing account"
            ),
        }

        let payload = pm_proto::encode_event(&creation_event(&patient));
        if let Err(err) = self
            .publisher
            .publish(&self.topic, &patient.id.to_string(), payload)
            .await
        {
            tracing::error!(
                patient_id = %patient.id,
                error = %err,
                "patient-created event publish failed"
            );
        }

        Ok(patient)
    }

    /// Replaces a patient's name/email/address/date of birth. The
    /// identifier and registration date are immutable.
    ///
    /// # Errors
    ///
    /// Returns [`PatientError::NotFound`] for an unknown identifier,
    /// [`PatientError::DuplicateEmail`] if the new email belongs to a
    /// different patient, or [`PatientError::Store`] on write failure.
    pub async fn update_patient(
        &self,
        id: Uuid,
        update: PatientUpdate,
    ) -> PatientResult<Patient> {
        let existing = self.store.find_by_id(id).await?;

        let changed = Patient {
            id: existing.id,
            name: update.name.into_inner(),
            email: update.email.into_inner(),
            address: update.address.into_inner(),
            date_of_birth: update.date_of_birth,
            registered_date: existing.registered_date,
        };

        if self
            .store
            .exists_by_email_excluding_id(&changed.email, id)
            .await?
        {
            return Err(PatientError::DuplicateEmail(changed.email));
        }

        self.store.update(changed).await
    }

    /// Deletes a patient, then notifies billing best-effort.
    ///
    /// The store delete happens before the billing notification; a crash
    /// between the two leaves the billing account ACTIVE for a patient that
    /// no longer exists locally, with no reconciliation in scope.
    ///
    /// # Errors
    ///
    /// Returns [`PatientError::NotFound`] for an unknown identifier, or
    /// [`PatientError::Store`] on delete failure. A billing notification
    /// failure is logged, not returned.
    pub async fn delete_patient(&self, id: Uuid) -> PatientResult<()> {
        let patient = self.store.find_by_id(id).await?;
        self.store.delete(patient.id).await?;
        tracing::info!(patient_id = %patient.id, "patient deleted from store");

        match self.billing.notify_deletion(patient.id).await {
            Ok(account) => tracing::info!(
                patient_id = %patient.id,
                account_id = %account.account_id,
                status = %account.status,
                "billing notified of patient deletion"
            ),
            Err(err) => tracing::error!(
                patient_id = %patient.id,
                error = %err,
                "billing deletion notification failed; account remains active remotely"
            ),
        }

        Ok(())
    }
}

fn creation_event(patient: &Patient) -> PatientEvent {
    PatientEvent {
        event_type: EventType::PatientCreated as i32,
        patient_id: patient.id.to_string(),
        name: patient.name.clone(),
        email: patient.email.clone(),
        address: patient.address.clone(),
        date_of_birth: patient.date_of_birth.to_string(),
    }
}
