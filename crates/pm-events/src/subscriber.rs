//! Long-running consumer loop for patient-change events.
//!
//! The subscriber attaches to one topic under a consumer-group id, decodes
//! each message via the event codec and invokes a downstream handler. The
//! loop never dies on bad input: an empty payload, a malformed event or a
//! handler error is logged and the loop moves to the next message. There is
//! no automatic retry and no dead-letter redirection.
//!
//! Offsets are committed manually, only after the handler has returned.
//! A crash between decode and commit therefore redelivers the message:
//! at-least-once, and handlers must tolerate duplicates.

use async_trait::async_trait;
use futures::StreamExt;
use pm_proto::codec::decode_event;
use pm_proto::events::PatientEvent;
use rdkafka::config::ClientConfig;
use rdkafka::consumer::{CommitMode, Consumer, StreamConsumer};
use rdkafka::message::Message;

/// Error type handlers may fail with; the subscriber only logs it.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Downstream consumer of decoded patient-change events.
///
/// Delivery is at-least-once, so implementations must be idempotent with
/// respect to duplicate events.
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, event: PatientEvent) -> Result<(), HandlerError>;
}

/// Failure to attach to the event log.
#[derive(Debug, thiserror::Error)]
pub enum SubscribeError {
    #[error("failed to create consumer for group {group}: {reason}")]
    Consumer { group: String, reason: String },
    #[error("failed to subscribe to topic {topic}: {reason}")]
    Subscribe { topic: String, reason: String },
}

/// A consumer-group member attached to one topic.
pub struct EventSubscriber {
    consumer: StreamConsumer,
    topic: String,
    group: String,
}

impl EventSubscriber {
    /// Attaches to `topic` as a member of consumer group `group`.
    ///
    /// Auto-commit is disabled; `run` commits each offset itself after the
    /// handler returns. New groups start from the earliest retained message
    /// so a freshly deployed consumer does not miss events published before
    /// its first start.
    ///
    /// # Errors
    ///
    /// Returns [`SubscribeError`] if the consumer cannot be created or the
    /// topic subscription is rejected.
    pub fn new(brokers: &str, topic: &str, group: &str) -> Result<Self, SubscribeError> {
        let consumer: StreamConsumer = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .set("group.id", group)
            .set("enable.auto.commit", "false")
            .set("auto.offset.reset", "earliest")
            .set("session.timeout.ms", "6000")
            .set("enable.partition.eof", "false")
            .create()
            .map_err(|err| SubscribeError::Consumer {
                group: group.to_owned(),
                reason: err.to_string(),
            })?;

        consumer
            .subscribe(&[topic])
            .map_err(|err| SubscribeError::Subscribe {
                topic: topic.to_owned(),
                reason: err.to_string(),
            })?;

        tracing::info!(
            topic = %topic,
            consumer_group = %group,
            manual_commit = true,
            "subscribed to event log"
        );

        Ok(Self {
            consumer,
            topic: topic.to_owned(),
            group: group.to_owned(),
        })
    }

    /// Runs the receive loop until the underlying stream ends.
    ///
    /// Each message goes through decode and the handler before its offset is
    /// committed; per-message failures are logged and skipped.
    pub async fn run<H: EventHandler>(self, handler: H) {
        let mut stream = self.consumer.stream();

        while let Some(msg_result) = stream.next().await {
            match msg_result {
                Err(err) => {
                    tracing::error!(
                        topic = %self.topic,
                        error = %err,
                        "event log receive failed"
                    );
                }
                Ok(message) => {
                    deliver(&handler, message.payload()).await;

                    // At-least-once: commit strictly after the handler has
                    // returned, even when decode or the handler failed, so
                    // one poison message cannot block the partition.
                    if let Err(err) = self.consumer.commit_message(&message, CommitMode::Async) {
                        tracing::warn!(
                            topic = message.topic(),
                            partition = message.partition(),
                            offset = message.offset(),
                            error = %err,
                            "offset commit failed; message may be redelivered"
                        );
                    }
                }
            }
        }

        tracing::info!(topic = %self.topic, consumer_group = %self.group, "subscriber loop ended");
    }
}

/// Decodes one payload and hands the event to the handler.
///
/// Never fails the caller: every per-message problem is logged and the loop
/// is expected to continue.
async fn deliver<H: EventHandler>(handler: &H, payload: Option<&[u8]>) {
    let Some(bytes) = payload else {
        tracing::warn!("skipping message with no payload");
        return;
    };

    match decode_event(bytes) {
        Err(err) => {
            tracing::error!(error = %err, "skipping malformed event");
        }
        Ok(event) => {
            let patient_id = event.patient_id.clone();
            if let Err(err) = handler.handle(event).await {
                tracing::error!(
                    patient_id = %patient_id,
                    error = %err,
                    "event handler failed; continuing with next message"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pm_proto::encode_event;
    use pm_proto::events::EventType;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingHandler {
        seen: Mutex<Vec<PatientEvent>>,
        fail: bool,
    }

    #[async_trait]
    impl EventHandler for RecordingHandler {
        async fn handle(&self, event: PatientEvent) -> Result<(), HandlerError> {
            self.seen.lock().unwrap().push(event);
            if self.fail {
                return Err("analytics sink offline".into());
            }
            Ok(())
        }
    }

    fn sample_event() -> PatientEvent {
        PatientEvent {
            event_type: EventType::PatientCreated as i32,
            patient_id: "550e8400-e29b-41d4-a716-446655440000".into(),
            name: "Ada".into(),
            email: "ada@x.com".into(),
            address: "1 Main St".into(),
            date_of_birth: "1990-01-01".into(),
        }
    }

    #[tokio::test]
    async fn delivers_decoded_event_to_handler() {
        let handler = RecordingHandler::default();
        let bytes = encode_event(&sample_event());

        deliver(&handler, Some(&bytes)).await;

        let seen = handler.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0], sample_event());
    }

    #[tokio::test]
    async fn malformed_payload_is_skipped_without_reaching_handler() {
        let handler = RecordingHandler::default();
        deliver(&handler, Some(&[0xff, 0xff, 0xff])).await;
        assert!(handler.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_payload_is_skipped() {
        let handler = RecordingHandler::default();
        deliver(&handler, None).await;
        assert!(handler.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn handler_failure_does_not_propagate() {
        let handler = RecordingHandler {
            fail: true,
            ..RecordingHandler::default()
        };
        let bytes = encode_event(&sample_event());
        // Must return normally; the loop carries on to the next message.
        deliver(&handler, Some(&bytes)).await;
        assert_eq!(handler.seen.lock().unwrap().len(), 1);
    }
}
