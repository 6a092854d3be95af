//! Media Service
//!
//! Microservice for image storage and asynchronous thumbnail generation.
//! Uploads persist the original bytes and enqueue a resize job; a separate
//! worker process (`thumb-worker`) consumes the queue and writes thumbnails
//! back; the read path serves the thumbnail or an uncacheable fallback.

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod queue;
pub mod services;

// Public re-exports
pub use config::Config;
pub use error::{AppError, Result};
