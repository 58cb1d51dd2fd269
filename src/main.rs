use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use mongodb::bson::doc;
use mongodb::Client;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;
mod db;
mod domain;
mod http;
mod metrics;

use config::Config;
use domain::export::ExportService;
use metrics::Metrics;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured logging with environment-based filtering
    // Default to INFO level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(true))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,export_service=debug")),
        )
        .init();

    tracing::info!("🚀 Starting export service");

    let config = Config::from_env();

    // === 1. Connect to MongoDB ===
    tracing::info!("Connecting to MongoDB at {}", config.mongodb_uri);
    let client = Client::with_uri_str(&config.mongodb_uri).await?;
    let database = client.database(&config.database);

    // Fail fast if the store is unreachable
    database.run_command(doc! {"ping": 1}).await?;
    tracing::info!("Connected to database '{}'", config.database);

    // === 2. Initialize Prometheus metrics ===
    let metrics = Arc::new(Metrics::new()?);
    tracing::info!(
        "📊 Metrics registry created with {} metrics",
        metrics.registry().gather().len()
    );

    // === 3. Build the export service ===
    let service = web::Data::new(ExportService::new(&database, metrics.clone()));

    // === 4. Start the HTTP server ===
    tracing::info!("Listening on http://{}", config.bind_addr);
    HttpServer::new(move || {
        App::new()
            .app_data(service.clone())
            .app_data(web::Data::from(metrics.clone()))
            .configure(http::configure)
    })
    .bind(&config.bind_addr)?
    .run()
    .await?;

    Ok(())
}
