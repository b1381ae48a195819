//! # PM Events
//!
//! Kafka transport for patient-change events.
//!
//! Handles:
//! - [`KafkaEventPublisher`], the `pm_core::EventPublisher` implementation
//!   used by the coordinator (fire-and-forget, keyed by patient id)
//! - [`EventSubscriber`], the long-running consumer loop that decodes events
//!   and hands them to an [`EventHandler`]
//!
//! Delivery is at-least-once: the subscriber commits its read position only
//! after the handler returns, so a crash between decode and commit causes
//! redelivery and handlers must tolerate duplicate events. Ordering is
//! guaranteed per key (the patient identifier), not across keys.

pub mod publisher;
pub mod subscriber;

pub use publisher::{KafkaEventPublisher, ProducerBuildError};
pub use subscriber::{EventHandler, EventSubscriber, HandlerError, SubscribeError};
