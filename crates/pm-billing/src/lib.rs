//! # PM Billing
//!
//! gRPC transport for the billing boundary.
//!
//! Handles:
//! - The coordinator-side client ([`BillingServiceGrpcClient`]), a thin
//!   transport over one reused channel implementing `pm_core::BillingClient`
//! - The billing collaborator itself ([`BillingAccountService`]), a tonic
//!   service over an in-memory account ledger, run by the
//!   `pm-billing-server` binary
//!
//! Uses `pm-proto` for the shared RPC contract.

pub mod client;
pub mod service;

pub use client::BillingServiceGrpcClient;
pub use service::BillingAccountService;
