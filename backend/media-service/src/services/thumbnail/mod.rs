//! Thumbnail generation service
//!
//! This module provides thumbnail generation capabilities:
//! - Image processor for resizing and encoding
//! - AMQP consumer driving the resize worker

pub mod consumer;
pub mod processor;

pub use consumer::{ResizeConsumer, ResizeConsumerConfig};
pub use processor::{ThumbnailConfig, ThumbnailProcessor, ThumbnailResult};
