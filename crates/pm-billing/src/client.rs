//! Coordinator-side gRPC client for the billing collaborator.
//!
//! The channel is built once and reused for every call; tonic reconnects it
//! under the hood as needed. Every call is bounded by the endpoint timeout,
//! after which it surfaces as [`BillingError`] like any other failure. This
//! client is a transport, not a policy layer: it validates nothing and never
//! retries — retry policy, if any, belongs to the caller.

use async_trait::async_trait;
use pm_core::{AccountStatus, BillingAccount, BillingClient, BillingError};
use pm_proto::billing::billing_service_client::BillingServiceClient;
use pm_proto::billing::{BillingRequest, BillingResponse, PatientDeletionRequest};
use std::time::Duration;
use tonic::transport::{Channel, Endpoint};
use uuid::Uuid;

/// gRPC implementation of [`BillingClient`].
///
/// Cloning is cheap and clones share the underlying channel, so one instance
/// can serve concurrent callers.
#[derive(Clone, Debug)]
pub struct BillingServiceGrpcClient {
    stub: BillingServiceClient<Channel>,
}

impl BillingServiceGrpcClient {
    /// Builds a client for the billing collaborator at `addr`
    /// (e.g. `http://localhost:9091`).
    ///
    /// The connection is established lazily on first use; `timeout` bounds
    /// every individual call.
    ///
    /// # Errors
    ///
    /// Returns [`BillingError`] if `addr` is not a valid endpoint URI.
    pub fn connect(addr: impl Into<String>, timeout: Duration) -> Result<Self, BillingError> {
        let addr = addr.into();
        tracing::info!(addr = %addr, "connecting to billing collaborator");
        let endpoint = Endpoint::from_shared(addr)
            .map_err(|err| BillingError(err.to_string()))?
            .timeout(timeout)
            .connect_timeout(timeout);
        Ok(Self {
            stub: BillingServiceClient::new(endpoint.connect_lazy()),
        })
    }

    fn into_account(response: BillingResponse) -> Result<BillingAccount, BillingError> {
        Ok(BillingAccount {
            account_id: response.account_id,
            status: AccountStatus::parse(&response.status)?,
        })
    }
}

#[async_trait]
impl BillingClient for BillingServiceGrpcClient {
    async fn create_account(
        &self,
        patient_id: Uuid,
        name: &str,
        email: &str,
    ) -> Result<BillingAccount, BillingError> {
        let request = BillingRequest {
            patient_id: patient_id.to_string(),
            name: name.to_owned(),
            email: email.to_owned(),
        };
        let response = self
            .stub
            .clone()
            .create_billing_account(request)
            .await
            .map_err(|status| BillingError(status.to_string()))?
            .into_inner();
        Self::into_account(response)
    }

    async fn notify_deletion(&self, patient_id: Uuid) -> Result<BillingAccount, BillingError> {
        tracing::info!(patient_id = %patient_id, "notifying billing of patient deletion");
        let request = PatientDeletionRequest {
            patient_id: patient_id.to_string(),
        };
        let response = self
            .stub
            .clone()
            .process_patient_deletion(request)
            .await
            .map_err(|status| BillingError(status.to_string()))?
            .into_inner();
        Self::into_account(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_invalid_endpoint_uri() {
        let err =
            BillingServiceGrpcClient::connect("not a uri", Duration::from_secs(2)).unwrap_err();
        assert!(err.to_string().contains("billing collaborator unavailable"));
    }

    #[test]
    fn maps_wire_status_to_account() {
        let account = BillingServiceGrpcClient::into_account(BillingResponse {
            account_id: "acct-7".into(),
            status: "INACTIVE".into(),
        })
        .unwrap();
        assert_eq!(account.account_id, "acct-7");
        assert_eq!(account.status, AccountStatus::Inactive);
    }

    #[test]
    fn unknown_wire_status_is_an_error() {
        assert!(BillingServiceGrpcClient::into_account(BillingResponse {
            account_id: "acct-7".into(),
            status: "FROZEN".into(),
        })
        .is_err());
    }
}
