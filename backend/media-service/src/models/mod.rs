/// Data models for media-service
///
/// This module defines structures for:
/// - Image rows as read by the HTTP endpoints and the resize worker
/// - ResizeJob: the queue message that triggers thumbnail generation
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ========================================
// Image Models
// ========================================

/// Original image payload, as fetched by the resize worker
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OriginalImage {
    pub data: Vec<u8>,
    pub mime_type: Option<String>,
    pub filename: Option<String>,
}

/// Image payload selected for the thumbnail read path.
///
/// `is_thumbnail` reports whether `data` holds the generated thumbnail or
/// the full-size original served as a fallback; the cache directives on the
/// HTTP response depend on it.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ServedImage {
    pub data: Vec<u8>,
    pub mime_type: Option<String>,
    pub filename: Option<String>,
    pub is_thumbnail: bool,
}

/// Upload response DTO
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageUploadResponse {
    pub image_id: Uuid,
}

// ========================================
// Queue Messages
// ========================================

/// The only recognized job action.
pub const RESIZE_ACTION: &str = "resize";

/// Resize job as carried on the message queue.
///
/// `image_id` stays a string on the wire; the worker parses it and treats
/// an unparseable id as a poison message rather than a crash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResizeJob {
    pub image_id: String,
    pub action: String,
}

impl ResizeJob {
    pub fn new(image_id: Uuid) -> Self {
        Self {
            image_id: image_id.to_string(),
            action: RESIZE_ACTION.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resize_job_wire_format() {
        let id = Uuid::new_v4();
        let json = serde_json::to_value(ResizeJob::new(id)).unwrap();
        assert_eq!(json["image_id"], id.to_string());
        assert_eq!(json["action"], "resize");
    }
}
