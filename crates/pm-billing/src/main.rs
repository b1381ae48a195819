//! Billing collaborator server binary.
//!
//! ## Purpose
//! Runs the billing gRPC service on its own, backed by the in-memory
//! account ledger.
//!
//! ## Intended use
//! Local runs and end-to-end exercises of the patient write path. The
//! patient coordinator connects to this process via
//! `pm_billing::BillingServiceGrpcClient`.

use std::net::SocketAddr;
use tonic::transport::Server;
use tonic_reflection::server::Builder;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pm_billing::BillingAccountService;
use pm_proto::billing::billing_service_server::BillingServiceServer;
use pm_proto::FILE_DESCRIPTOR_SET;

/// Main entry point for the billing collaborator server.
///
/// # Environment Variables
/// - `BILLING_ADDR`: listen address (default: "0.0.0.0:9091")
/// - `BILLING_ENABLE_REFLECTION`: "true" to enable gRPC reflection
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("pm=info".parse()?))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr: SocketAddr = std::env::var("BILLING_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:9091".into())
        .parse()?;

    tracing::info!("-- Starting billing collaborator gRPC on {}", addr);

    let service = BillingAccountService::new();
    let mut server_builder =
        Server::builder().add_service(BillingServiceServer::new(service));

    if std::env::var("BILLING_ENABLE_REFLECTION").unwrap_or_else(|_| "false".to_string()) == "true"
    {
        let reflection_service = Builder::configure()
            .register_encoded_file_descriptor_set(FILE_DESCRIPTOR_SET)
            .build_v1()?;
        server_builder = server_builder.add_service(reflection_service);
        tracing::info!("gRPC server reflection enabled");
    } else {
        tracing::info!("gRPC server reflection disabled");
    }

    server_builder.serve(addr).await?;

    Ok(())
}
