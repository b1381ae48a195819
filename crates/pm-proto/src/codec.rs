//! Binary codec for patient-change events.
//!
//! Encoding is plain protobuf. Two properties matter at this boundary:
//!
//! - **Determinism**: encoding the same logical event twice yields
//!   byte-identical output. prost writes fields in ascending tag order with a
//!   fixed varint encoding, so this holds without extra work.
//! - **Version skew**: decoders skip unknown tags, so a producer may append
//!   new optional fields without breaking older consumers.
//!
//! Decoding never panics; truncated or structurally invalid input surfaces as
//! [`MalformedEvent`].

use crate::events::PatientEvent;
use prost::Message;

/// Decode-time failure for a patient-change event.
///
/// Raised by subscribers on truncated or structurally invalid payloads. The
/// subscriber loop logs and skips such messages rather than crashing.
#[derive(Debug, thiserror::Error)]
#[error("malformed patient event: {0}")]
pub struct MalformedEvent(#[from] prost::DecodeError);

/// Encodes a patient-change event to its wire representation.
pub fn encode_event(event: &PatientEvent) -> Vec<u8> {
    event.encode_to_vec()
}

/// Decodes a patient-change event from its wire representation.
///
/// # Errors
///
/// Returns [`MalformedEvent`] if the bytes are not a valid `PatientEvent`
/// message (truncation, bad wire types, invalid varints).
pub fn decode_event(bytes: &[u8]) -> Result<PatientEvent, MalformedEvent> {
    Ok(PatientEvent::decode(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventType;

    fn sample_event() -> PatientEvent {
        PatientEvent {
            event_type: EventType::PatientCreated as i32,
            patient_id: "550e8400-e29b-41d4-a716-446655440000".into(),
            name: "Ada Lovelace".into(),
            email: "ada@x.com".into(),
            address: "1 Main St".into(),
            date_of_birth: "1990-01-01".into(),
        }
    }

    #[test]
    fn round_trips_losslessly() {
        let event = sample_event();
        let bytes = encode_event(&event);
        let decoded = decode_event(&bytes).unwrap();
        assert_eq!(decoded, event);
    }

    #[test]
    fn encoding_is_deterministic() {
        let event = sample_event();
        assert_eq!(encode_event(&event), encode_event(&event));
    }

    #[test]
    fn rejects_truncated_input() {
        let bytes = encode_event(&sample_event());
        let err = decode_event(&bytes[..bytes.len() - 3]).unwrap_err();
        assert!(err.to_string().contains("malformed patient event"));
    }

    #[test]
    fn rejects_garbage_input() {
        assert!(decode_event(&[0xff, 0xff, 0xff, 0xff]).is_err());
    }

    #[test]
    fn ignores_unknown_trailing_fields() {
        // A future producer appends field 15 (varint, value 1). Older
        // decoders must skip it and still yield the known fields.
        let mut bytes = encode_event(&sample_event());
        bytes.extend_from_slice(&[0x78, 0x01]);
        let decoded = decode_event(&bytes).unwrap();
        assert_eq!(decoded, sample_event());
    }

    #[test]
    fn empty_payload_decodes_to_default() {
        // proto3: an empty message is a valid encoding of the default event.
        let decoded = decode_event(&[]).unwrap();
        assert_eq!(decoded, PatientEvent::default());
    }
}
