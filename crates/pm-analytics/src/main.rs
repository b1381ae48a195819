//! Analytics consumer binary.
//!
//! ## Purpose
//! Joins the patient event topic as the analytics consumer group and records
//! every decoded patient-change event.
//!
//! ## Intended use
//! Runs as its own process with a deployment lifetime independent of the
//! patient coordinator; its only coupling to the rest of the system is the
//! event log. Delivery is at-least-once, and logging the same event twice
//! is harmless, so redelivery needs no special handling here.

use async_trait::async_trait;
use pm_events::{EventHandler, EventSubscriber, HandlerError};
use pm_proto::events::PatientEvent;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Records each patient-change event to the observability sink.
struct LoggingHandler;

#[async_trait]
impl EventHandler for LoggingHandler {
    async fn handle(&self, event: PatientEvent) -> Result<(), HandlerError> {
        tracing::info!(
            event_type = event.event_type,
            patient_id = %event.patient_id,
            name = %event.name,
            email = %event.email,
            address = %event.address,
            date_of_birth = %event.date_of_birth,
            "patient event consumed"
        );
        Ok(())
    }
}

/// Main entry point for the analytics consumer.
///
/// # Environment Variables
/// - `KAFKA_BROKERS`: bootstrap servers (default: "localhost:9092")
/// - `PATIENT_TOPIC`: topic to consume (default: "patient")
/// - `ANALYTICS_GROUP`: consumer group id (default: "analytics_group")
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("pm=info".parse()?))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let brokers = std::env::var("KAFKA_BROKERS").unwrap_or_else(|_| "localhost:9092".into());
    let topic =
        std::env::var("PATIENT_TOPIC").unwrap_or_else(|_| pm_proto::PATIENT_TOPIC.into());
    let group = std::env::var("ANALYTICS_GROUP").unwrap_or_else(|_| "analytics_group".into());

    tracing::info!(
        "-- Starting analytics consumer on {} (topic: {}, group: {})",
        brokers,
        topic,
        group
    );

    let subscriber = EventSubscriber::new(&brokers, &topic, &group)?;
    subscriber.run(LoggingHandler).await;

    Ok(())
}
