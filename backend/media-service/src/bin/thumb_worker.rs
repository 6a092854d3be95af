//! Thumbnail Worker - AMQP consumer for resize jobs
//!
//! Pulls resize jobs from the durable queue one at a time, generates the
//! thumbnail, and stores it back. Horizontal scale-out is simply more
//! instances of this binary competing on the same queue.
//!
//! Environment variables:
//! - DATABASE_URL: PostgreSQL URL for the images table
//! - RABBITMQ_HOST / RABBITMQ_PORT / RABBITMQ_USER / RABBITMQ_PASS
//! - THUMBNAIL_MAX_WIDTH: Max thumbnail width in pixels (default: 400)
//! - THUMBNAIL_QUALITY: JPEG quality 0-100 (default: 85)
//! - RESIZE_MAX_RETRIES: Transient-failure requeue budget (default: 5)
//! - BROKER_CONNECT_ATTEMPTS: Startup connect attempts (default: 30)
//! - BROKER_CONNECT_DELAY_SECS: Delay between attempts (default: 2)

use media_service::services::thumbnail::{
    ResizeConsumer, ResizeConsumerConfig, ThumbnailConfig, ThumbnailProcessor,
};
use media_service::Config;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{error, info};

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("thumb_worker=info".parse().expect("valid directive"))
                .add_directive("media_service=info".parse().expect("valid directive")),
        )
        .init();

    info!("Starting Thumbnail Worker");

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env().map_err(|e| format!("{e}"))?;
    info!(
        broker_host = %config.rabbitmq.host,
        broker_port = config.rabbitmq.port,
        max_width = config.thumbnail.max_width,
        quality = config.thumbnail.quality,
        "Configuration loaded"
    );

    // Initialize database pool (a worker holds few connections; jobs are
    // processed one at a time)
    let db_config = db_pool::DbConfig::new("thumb-worker", &config.database.url, 2);
    let pool = db_pool::create_pool(db_config).await?;
    info!("Database pool initialized");

    let processor = Arc::new(ThumbnailProcessor::new(ThumbnailConfig {
        max_width: config.thumbnail.max_width,
        quality: config.thumbnail.quality,
    }));

    // Setup shutdown signal
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // Handle SIGTERM/SIGINT for graceful shutdown
    tokio::spawn(async move {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to listen for ctrl+c");
        info!("Shutdown signal received");
        let _ = shutdown_tx.send(true);
    });

    let consumer_config = ResizeConsumerConfig {
        amqp_uri: config.rabbitmq.amqp_uri(),
        max_retries: config.thumbnail.max_retries,
        connect_attempts: std::env::var("BROKER_CONNECT_ATTEMPTS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30),
        connect_delay: Duration::from_secs(
            std::env::var("BROKER_CONNECT_DELAY_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(2),
        ),
        ..Default::default()
    };

    // Connect (bounded retries) and run until shutdown
    let mut consumer = ResizeConsumer::connect(consumer_config, pool, processor, shutdown_rx)
        .await
        .map_err(|e| format!("{e}"))?;

    if let Err(e) = consumer.run().await {
        error!(error = %e, "Consumer error");
    }

    info!("Thumbnail Worker stopped");
    Ok(())
}
