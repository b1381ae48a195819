//! The billing collaborator: a tonic service over an in-memory ledger.
//!
//! Accounts are keyed by patient identifier. `CreateBillingAccount` opens an
//! ACTIVE account; `ProcessPatientDeletion` flips it to INACTIVE. The ledger
//! is this process's own state; the patient coordinator only ever sees the
//! `(account_id, status)` pair in the response.

use pm_core::AccountStatus;
use pm_proto::billing::billing_service_server::BillingService;
use pm_proto::billing::{BillingRequest, BillingResponse, PatientDeletionRequest};
use std::collections::HashMap;
use std::sync::RwLock;
use tonic::{Request, Response, Status};
use uuid::Uuid;

#[derive(Clone, Debug)]
struct AccountRecord {
    account_id: Uuid,
    name: String,
    email: String,
    status: AccountStatus,
}

/// In-memory billing account ledger, keyed by patient identifier.
#[derive(Debug, Default)]
pub struct BillingAccountService {
    accounts: RwLock<HashMap<String, AccountRecord>>,
}

impl BillingAccountService {
    pub fn new() -> Self {
        Self::default()
    }
}

#[tonic::async_trait]
impl BillingService for BillingAccountService {
    async fn create_billing_account(
        &self,
        request: Request<BillingRequest>,
    ) -> Result<Response<BillingResponse>, Status> {
        let request = request.into_inner();
        if request.patient_id.is_empty() {
            return Err(Status::invalid_argument("patient_id is required"));
        }

        let record = AccountRecord {
            account_id: Uuid::new_v4(),
            name: request.name,
            email: request.email,
            status: AccountStatus::Active,
        };
        tracing::info!(
            patient_id = %request.patient_id,
            account_id = %record.account_id,
            name = %record.name,
            email = %record.email,
            "billing account created"
        );

        let response = BillingResponse {
            account_id: record.account_id.to_string(),
            status: record.status.as_str().to_owned(),
        };
        self.accounts
            .write()
            .map_err(|_| Status::internal("account ledger lock poisoned"))?
            .insert(request.patient_id, record);

        Ok(Response::new(response))
    }

    async fn process_patient_deletion(
        &self,
        request: Request<PatientDeletionRequest>,
    ) -> Result<Response<BillingResponse>, Status> {
        let request = request.into_inner();
        tracing::info!(patient_id = %request.patient_id, "processing patient deletion");

        let mut accounts = self
            .accounts
            .write()
            .map_err(|_| Status::internal("account ledger lock poisoned"))?;

        let record = accounts.get_mut(&request.patient_id).ok_or_else(|| {
            Status::not_found(format!(
                "no billing account for patient: {}",
                request.patient_id
            ))
        })?;
        record.status = AccountStatus::Inactive;

        Ok(Response::new(BillingResponse {
            account_id: record.account_id.to_string(),
            status: record.status.as_str().to_owned(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_request(patient_id: &str) -> Request<BillingRequest> {
        Request::new(BillingRequest {
            patient_id: patient_id.into(),
            name: "Ada".into(),
            email: "ada@x.com".into(),
        })
    }

    #[tokio::test]
    async fn creates_active_account() {
        let service = BillingAccountService::new();
        let response = service
            .create_billing_account(create_request("patient-1"))
            .await
            .unwrap()
            .into_inner();
        assert!(!response.account_id.is_empty());
        assert_eq!(response.status, "ACTIVE");
    }

    #[tokio::test]
    async fn deletion_flips_account_to_inactive() {
        let service = BillingAccountService::new();
        let created = service
            .create_billing_account(create_request("patient-1"))
            .await
            .unwrap()
            .into_inner();

        let response = service
            .process_patient_deletion(Request::new(PatientDeletionRequest {
                patient_id: "patient-1".into(),
            }))
            .await
            .unwrap()
            .into_inner();

        assert_eq!(response.account_id, created.account_id);
        assert_eq!(response.status, "INACTIVE");
    }

    #[tokio::test]
    async fn deletion_for_unknown_patient_is_not_found() {
        let service = BillingAccountService::new();
        let status = service
            .process_patient_deletion(Request::new(PatientDeletionRequest {
                patient_id: "ghost".into(),
            }))
            .await
            .unwrap_err();
        assert_eq!(status.code(), tonic::Code::NotFound);
    }

    #[tokio::test]
    async fn create_requires_patient_id() {
        let service = BillingAccountService::new();
        let status = service
            .create_billing_account(create_request(""))
            .await
            .unwrap_err();
        assert_eq!(status.code(), tonic::Code::InvalidArgument);
    }
}
