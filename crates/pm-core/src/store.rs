//! The durable patient store seam.
//!
//! The coordinator treats the store as an abstract durable record store keyed
//! by patient identifier. The email-uniqueness pre-check in the coordinator
//! is a read-then-write pattern with a race window under concurrent creates,
//! so every implementation must *also* enforce uniqueness at the storage
//! layer; the coordinator's check alone is insufficient.

use crate::error::{PatientError, PatientResult};
use crate::patient::{NewPatient, Patient};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

/// Abstract durable record store for patients.
///
/// Implementations must enforce email uniqueness on `create` and `update` as
/// a storage-level constraint, independent of any caller-side check.
#[async_trait]
pub trait PatientStore: Send + Sync {
    /// Persists a new patient, assigning its identifier.
    async fn create(&self, new_patient: NewPatient) -> PatientResult<Patient>;

    /// Returns all stored patients.
    async fn find_all(&self) -> PatientResult<Vec<Patient>>;

    /// Looks a patient up by identifier.
    async fn find_by_id(&self, id: Uuid) -> PatientResult<Patient>;

    /// True if any patient has this email.
    async fn exists_by_email(&self, email: &str) -> PatientResult<bool>;

    /// True if a patient *other than* `id` has this email.
    async fn exists_by_email_excluding_id(&self, email: &str, id: Uuid) -> PatientResult<bool>;

    /// Replaces a stored patient record.
    async fn update(&self, patient: Patient) -> PatientResult<Patient>;

    /// Removes a patient record. Terminal: no tombstone is retained.
    async fn delete(&self, id: Uuid) -> PatientResult<()>;
}

/// In-memory [`PatientStore`].
///
/// Backed by a `RwLock<HashMap>`; the lock is never held across an await
/// point. The uniqueness check and the insert happen under one write lock,
/// which is the storage-level uniqueness constraint for this implementation.
#[derive(Debug, Default)]
pub struct InMemoryPatientStore {
    patients: RwLock<HashMap<Uuid, Patient>>,
}

impl InMemoryPatientStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> PatientResult<RwLockReadGuard<'_, HashMap<Uuid, Patient>>> {
        self.patients
            .read()
            .map_err(|_| PatientError::Store("patient store lock poisoned".into()))
    }

    fn write(&self) -> PatientResult<RwLockWriteGuard<'_, HashMap<Uuid, Patient>>> {
        self.patients
            .write()
            .map_err(|_| PatientError::Store("patient store lock poisoned".into()))
    }
}

#[async_trait]
impl PatientStore for InMemoryPatientStore {
    async fn create(&self, new_patient: NewPatient) -> PatientResult<Patient> {
        let mut patients = self.write()?;
        let email = new_patient.email.as_str();
        if patients.values().any(|p| p.email == email) {
            return Err(PatientError::DuplicateEmail(email.to_owned()));
        }

        let patient = Patient {
            id: Uuid::new_v4(),
            name: new_patient.name.into_inner(),
            email: new_patient.email.into_inner(),
            address: new_patient.address.into_inner(),
            date_of_birth: new_patient.date_of_birth,
            registered_date: new_patient.registered_date,
        };
        patients.insert(patient.id, patient.clone());
        Ok(patient)
    }

    async fn find_all(&self) -> PatientResult<Vec<Patient>> {
        Ok(self.read()?.values().cloned().collect())
    }

    async fn find_by_id(&self, id: Uuid) -> PatientResult<Patient> {
        self.read()?
            .get(&id)
            .cloned()
            .ok_or(PatientError::NotFound(id))
    }

    async fn exists_by_email(&self, email: &str) -> PatientResult<bool> {
        Ok(self.read()?.values().any(|p| p.email == email))
    }

    async fn exists_by_email_excluding_id(&self, email: &str, id: Uuid) -> PatientResult<bool> {
        Ok(self
            .read()?
            .values()
            .any(|p| p.email == email && p.id != id))
    }

    async fn update(&self, patient: Patient) -> PatientResult<Patient> {
        let mut patients = self.write()?;
        if !patients.contains_key(&patient.id) {
            return Err(PatientError::NotFound(patient.id));
        }
        if patients
            .values()
            .any(|p| p.email == patient.email && p.id != patient.id)
        {
            return Err(PatientError::DuplicateEmail(patient.email.clone()));
        }
        patients.insert(patient.id, patient.clone());
        Ok(patient)
    }

    async fn delete(&self, id: Uuid) -> PatientResult<()> {
        self.write()?
            .remove(&id)
            .map(|_| ())
            .ok_or(PatientError::NotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ada() -> NewPatient {
        NewPatient::parse("Ada", "ada@x.com", "1 Main St", "1990-01-01", "2024-01-01").unwrap()
    }

    #[tokio::test]
    async fn create_assigns_fresh_identifier() {
        let store = InMemoryPatientStore::new();
        let patient = store.create(ada()).await.unwrap();
        assert!(!patient.id.is_nil());
        assert_eq!(store.find_by_id(patient.id).await.unwrap().email, "ada@x.com");
    }

    #[tokio::test]
    async fn duplicate_email_rejected_at_storage_layer() {
        // Bypasses any caller-side pre-check: the store itself must refuse.
        let store = InMemoryPatientStore::new();
        store.create(ada()).await.unwrap();
        let err = store.create(ada()).await.unwrap_err();
        assert!(matches!(err, PatientError::DuplicateEmail(email) if email == "ada@x.com"));
        assert_eq!(store.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn exclusion_check_ignores_own_record() {
        let store = InMemoryPatientStore::new();
        let patient = store.create(ada()).await.unwrap();
        assert!(!store
            .exists_by_email_excluding_id("ada@x.com", patient.id)
            .await
            .unwrap());
        assert!(store
            .exists_by_email_excluding_id("ada@x.com", Uuid::new_v4())
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn update_refuses_email_taken_by_other_patient() {
        let store = InMemoryPatientStore::new();
        store.create(ada()).await.unwrap();
        let grace = store
            .create(
                NewPatient::parse("Grace", "grace@x.com", "2 Side St", "1985-12-09", "2024-01-02")
                    .unwrap(),
            )
            .await
            .unwrap();

        let mut changed = grace.clone();
        changed.email = "ada@x.com".into();
        let err = store.update(changed).await.unwrap_err();
        assert!(matches!(err, PatientError::DuplicateEmail(_)));
        assert_eq!(store.find_by_id(grace.id).await.unwrap().email, "grace@x.com");
    }

    #[tokio::test]
    async fn delete_is_terminal() {
        let store = InMemoryPatientStore::new();
        let patient = store.create(ada()).await.unwrap();
        store.delete(patient.id).await.unwrap();
        assert!(matches!(
            store.find_by_id(patient.id).await.unwrap_err(),
            PatientError::NotFound(_)
        ));
        assert!(matches!(
            store.delete(patient.id).await.unwrap_err(),
            PatientError::NotFound(_)
        ));
    }
}
