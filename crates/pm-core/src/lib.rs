//! # PM Core
//!
//! Core business logic for the patient management system.
//!
//! This crate contains the patient write-path coordinator and the seams it
//! orchestrates:
//! - The patient model and validated command types
//! - The [`PatientStore`] trait with an in-memory implementation
//! - The [`BillingClient`] and [`EventPublisher`] traits
//! - [`PatientService`], which sequences store write, synchronous billing
//!   call and asynchronous event publish for every patient command
//!
//! **No transport concerns**: gRPC and Kafka implementations of the seams
//! live in `pm-billing` and `pm-events`.

pub mod billing;
pub mod coordinator;
pub mod error;
pub mod patient;
pub mod publish;
pub mod store;

pub use billing::{AccountStatus, BillingAccount, BillingClient, BillingError};
pub use coordinator::PatientService;
pub use error::{PatientError, PatientResult};
pub use patient::{NewPatient, Patient, PatientUpdate};
pub use publish::{EventPublisher, PublishError};
pub use store::{InMemoryPatientStore, PatientStore};
