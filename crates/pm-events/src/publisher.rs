//! Kafka producer for patient-change events.

use async_trait::async_trait;
use pm_core::{EventPublisher, PublishError};
use rdkafka::config::ClientConfig;
use rdkafka::producer::{FutureProducer, FutureRecord};
use rdkafka::util::Timeout;
use std::time::Duration;

/// Failure to build the underlying Kafka producer.
#[derive(Debug, thiserror::Error)]
#[error("failed to create event producer: {0}")]
pub struct ProducerBuildError(String);

/// Kafka-backed [`EventPublisher`].
///
/// The producer is created once and shared; records are partitioned by key,
/// which gives publish-order delivery for events with the same key. The
/// send awaits broker acknowledgement (bounded by the timeout) but a failure
/// is only ever reported to the caller, never retried here.
pub struct KafkaEventPublisher {
    producer: FutureProducer,
    timeout: Duration,
}

impl KafkaEventPublisher {
    /// Creates a publisher against the given brokers with a 5 second
    /// delivery timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ProducerBuildError`] if the producer configuration is
    /// rejected.
    pub fn new(brokers: &str) -> Result<Self, ProducerBuildError> {
        Self::with_timeout(brokers, Duration::from_secs(5))
    }

    /// Creates a publisher with an explicit delivery timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ProducerBuildError`] if the producer configuration is
    /// rejected.
    pub fn with_timeout(brokers: &str, timeout: Duration) -> Result<Self, ProducerBuildError> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .set("message.timeout.ms", "5000")
            .set("acks", "1")
            .create()
            .map_err(|err| ProducerBuildError(err.to_string()))?;

        tracing::info!(brokers = %brokers, "event publisher created");
        Ok(Self { producer, timeout })
    }
}

#[async_trait]
impl EventPublisher for KafkaEventPublisher {
    async fn publish(
        &self,
        topic: &str,
        key: &str,
        payload: Vec<u8>,
    ) -> Result<(), PublishError> {
        let record = FutureRecord::to(topic).payload(&payload).key(key);

        match self.producer.send(record, Timeout::After(self.timeout)).await {
            Ok((partition, offset)) => {
                tracing::debug!(
                    topic = %topic,
                    key = %key,
                    partition = partition,
                    offset = offset,
                    "event published"
                );
                Ok(())
            }
            Err((kafka_error, _)) => Err(PublishError {
                topic: topic.to_owned(),
                reason: kafka_error.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publisher_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<KafkaEventPublisher>();
        assert_sync::<KafkaEventPublisher>();
    }
}
