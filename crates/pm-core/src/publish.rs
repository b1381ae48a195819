//! The asynchronous event publication seam.
//!
//! Events published with the same key are delivered to consumers in publish
//! order; the coordinator keys every event by patient identifier so any
//! single consumer observes one patient's events in causal order. A publish
//! failure is reported to the caller but must never roll back the
//! already-committed durable write.

use async_trait::async_trait;

/// Failure to hand an event to the log transport.
#[derive(Debug, thiserror::Error)]
#[error("event publish to topic {topic} failed: {reason}")]
pub struct PublishError {
    pub topic: String,
    pub reason: String,
}

/// Fire-and-forget dispatch of an encoded event to a partitioned event log.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publishes `payload` under `key` to `topic`.
    ///
    /// Completion means the transport accepted the record; no consumer
    /// acknowledgement ever flows back. Delivery is at-least-once.
    async fn publish(&self, topic: &str, key: &str, payload: Vec<u8>)
        -> Result<(), PublishError>;
}
