//! Message queue plumbing for resize jobs.
//!
//! Both the publisher (HTTP service) and the consumer (`thumb-worker`)
//! declare the queues durable and idempotently before use, so either side
//! can start first and a broker restart loses nothing.

pub mod publisher;

pub use publisher::ResizeJobPublisher;

use crate::error::Result;
use lapin::options::QueueDeclareOptions;
use lapin::types::FieldTable;
use lapin::Channel;

/// Well-known queue carrying resize jobs.
pub const QUEUE_NAME: &str = "image_resize_queue";

/// Parking queue for jobs that can never succeed (poison payloads,
/// undecodable images) and for jobs that exhausted their retry budget.
pub const DEAD_LETTER_QUEUE: &str = "image_resize_queue.dead";

/// Message header carrying the number of retries already attempted.
pub const RETRY_COUNT_HEADER: &str = "x-retry-count";

fn durable() -> QueueDeclareOptions {
    QueueDeclareOptions {
        durable: true,
        ..Default::default()
    }
}

/// Declare the job queue and its dead-letter companion, durably.
pub async fn declare_queues(channel: &Channel) -> Result<()> {
    channel
        .queue_declare(QUEUE_NAME, durable(), FieldTable::default())
        .await?;
    channel
        .queue_declare(DEAD_LETTER_QUEUE, durable(), FieldTable::default())
        .await?;

    Ok(())
}
