//! # PM Proto
//!
//! Wire contracts for the patient management system.
//!
//! Contains:
//! - Protobuf-generated types for the billing RPC (`billing` module)
//! - Protobuf-generated types for patient-change events (`events` module)
//! - The event codec (`codec` module)
//!
//! Used by the coordinator, the billing client/server and the analytics
//! consumer so that every process shares one schema definition.

/// Generated types for the billing collaborator RPC contract.
pub mod billing {
    tonic::include_proto!("billing.v1");
}

/// Generated types for the patient-change event schema.
pub mod events {
    tonic::include_proto!("patient.events.v1");
}

pub mod codec;

/// Topic patient-change events are published to.
pub const PATIENT_TOPIC: &str = "patient";

pub const FILE_DESCRIPTOR_SET: &[u8] = tonic::include_file_descriptor_set!("proto_descriptor");

pub use codec::{decode_event, encode_event, MalformedEvent};
