use crate::error::Result;
use crate::models::ResizeJob;
use crate::queue::{declare_queues, QUEUE_NAME};
use lapin::options::BasicPublishOptions;
use lapin::{BasicProperties, Connection, ConnectionProperties};
use tracing::debug;
use uuid::Uuid;

/// AMQP publisher for resize jobs.
///
/// Holds only the broker URI; every publish opens and releases its own
/// scoped connection, so the HTTP service keeps no long-lived broker state.
#[derive(Clone)]
pub struct ResizeJobPublisher {
    uri: String,
}

impl ResizeJobPublisher {
    pub fn new(uri: String) -> Self {
        Self { uri }
    }

    /// Publish a resize job for a stored image.
    ///
    /// Best-effort by contract: the caller logs a failure and moves on, so
    /// a broker outage never fails the enclosing upload. The message is
    /// marked persistent and the queue declared durable first, so jobs
    /// survive a broker restart even when no consumer has ever run.
    pub async fn publish(&self, image_id: Uuid) -> Result<()> {
        let job = ResizeJob::new(image_id);
        let payload = serde_json::to_vec(&job)?;

        let connection = Connection::connect(&self.uri, ConnectionProperties::default()).await?;
        let channel = connection.create_channel().await?;
        declare_queues(&channel).await?;

        channel
            .basic_publish(
                "",
                QUEUE_NAME,
                BasicPublishOptions::default(),
                &payload,
                BasicProperties::default()
                    .with_content_type("application/json".into())
                    // delivery_mode 2: persist the message to disk
                    .with_delivery_mode(2),
            )
            .await?
            .await?;

        debug!(image_id = %image_id, queue = QUEUE_NAME, "Resize job published");

        connection.close(200, "").await.ok();
        Ok(())
    }
}
