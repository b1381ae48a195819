//! The billing collaborator seam.
//!
//! The billing collaborator is the system of record for account status; the
//! coordinator only observes the `(account_id, status)` pair a call returns
//! and never persists it. The client is a transport, not a policy layer: it
//! performs no validation and no internal retries.

use async_trait::async_trait;
use uuid::Uuid;

/// Failure of a synchronous billing call.
///
/// Connection failure, remote error response and timeout all collapse into
/// this single category; the coordinator does not distinguish them.
#[derive(Debug, thiserror::Error)]
#[error("billing collaborator unavailable: {0}")]
pub struct BillingError(pub String);

/// Billing account status as reported by the collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccountStatus {
    Active,
    Inactive,
}

impl AccountStatus {
    /// Wire representation used by the billing RPC contract.
    pub fn as_str(self) -> &'static str {
        match self {
            AccountStatus::Active => "ACTIVE",
            AccountStatus::Inactive => "INACTIVE",
        }
    }

    /// Parses the wire representation.
    ///
    /// # Errors
    ///
    /// Returns [`BillingError`] for any unknown status string; a collaborator
    /// speaking an unknown dialect is treated as unavailable.
    pub fn parse(value: &str) -> Result<Self, BillingError> {
        match value {
            "ACTIVE" => Ok(AccountStatus::Active),
            "INACTIVE" => Ok(AccountStatus::Inactive),
            other => Err(BillingError(format!("unknown account status: {other}"))),
        }
    }
}

impl std::fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `(account_id, status)` pair a billing call returns.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BillingAccount {
    pub account_id: String,
    pub status: AccountStatus,
}

/// Synchronous request/response caller against the billing collaborator.
///
/// Both calls block the calling unit of work until response or timeout.
/// Implementations hold a connection established once and reused, carry no
/// local state beyond it, and are safe to share across concurrent callers.
#[async_trait]
pub trait BillingClient: Send + Sync {
    /// Asks the collaborator to open a billing account for a new patient.
    async fn create_account(
        &self,
        patient_id: Uuid,
        name: &str,
        email: &str,
    ) -> Result<BillingAccount, BillingError>;

    /// Notifies the collaborator that a patient was deleted.
    async fn notify_deletion(&self, patient_id: Uuid) -> Result<BillingAccount, BillingError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_wire_form() {
        assert_eq!(AccountStatus::parse("ACTIVE").unwrap(), AccountStatus::Active);
        assert_eq!(
            AccountStatus::parse("INACTIVE").unwrap(),
            AccountStatus::Inactive
        );
        assert_eq!(AccountStatus::Active.as_str(), "ACTIVE");
    }

    #[test]
    fn unknown_status_is_unavailable() {
        assert!(AccountStatus::parse("SUSPENDED").is_err());
    }
}
