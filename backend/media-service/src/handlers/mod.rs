/// HTTP handlers for media endpoints
///
/// Image upload and the two read paths (full-size and thumbnail-with-fallback).
pub mod images;

pub use images::{get_image, get_thumbnail, upload_image};
