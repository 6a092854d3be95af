/// Image handlers - upload entry point and read paths
use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use futures_util::StreamExt;
use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

use crate::db::image_repo;
use crate::error::{AppError, Result};
use crate::models::ImageUploadResponse;
use crate::queue::ResizeJobPublisher;

const FALLBACK_MIME: &str = "application/octet-stream";

/// Cache directive for the thumbnail read path.
///
/// A finished thumbnail is immutable for its id, so aggressive caching is
/// safe. While the fallback original is served the same URL must not be
/// cached at all, or the client would be stuck with the oversized original
/// even after the real thumbnail exists.
fn cache_control(is_thumbnail: bool) -> &'static str {
    if is_thumbnail {
        "public, max-age=31536000, immutable"
    } else {
        "no-store"
    }
}

fn inline_disposition(prefix: &str, filename: Option<&str>) -> String {
    format!(
        "inline; filename=\"{}{}\"",
        prefix,
        filename.unwrap_or("image")
    )
}

/// Store an uploaded image and enqueue its resize job
/// POST /api/v1/images
pub async fn upload_image(
    pool: web::Data<PgPool>,
    publisher: web::Data<ResizeJobPublisher>,
    mut payload: Multipart,
) -> Result<HttpResponse> {
    let mut data = Vec::new();
    let mut mime_type: Option<String> = None;
    let mut filename: Option<String> = None;

    while let Some(field) = payload.next().await {
        let mut field =
            field.map_err(|e| AppError::BadRequest(format!("Multipart error: {e}")))?;

        match field.name() {
            "image" => {
                mime_type = field.content_type().map(|m| m.to_string());
                filename = field
                    .content_disposition()
                    .get_filename()
                    .map(str::to_string);

                while let Some(chunk) = field.next().await {
                    let bytes =
                        chunk.map_err(|e| AppError::BadRequest(format!("Image read error: {e}")))?;
                    data.extend_from_slice(&bytes);
                }
            }
            _ => {
                // Ignore unknown fields
            }
        }
    }

    if data.is_empty() {
        return Err(AppError::BadRequest("No image data provided".to_string()));
    }

    let image_id =
        image_repo::insert_image(pool.get_ref(), &data, mime_type.as_deref(), filename.as_deref())
            .await?;

    // Best-effort: a broker outage must never fail the upload. Until a
    // backfill republishes the job, the image simply stays without a
    // thumbnail and the read path keeps serving the fallback.
    if let Err(err) = publisher.publish(image_id).await {
        warn!(image_id = %image_id, error = %err, "Failed to enqueue resize job");
    }

    Ok(HttpResponse::Created().json(ImageUploadResponse { image_id }))
}

/// Serve the full-size original
/// GET /api/v1/images/{image_id}
pub async fn get_image(
    pool: web::Data<PgPool>,
    image_id: web::Path<String>,
) -> Result<HttpResponse> {
    let image_uuid = Uuid::parse_str(&image_id)
        .map_err(|_| AppError::BadRequest("Invalid image ID".to_string()))?;

    let image = image_repo::get_original(pool.get_ref(), image_uuid)
        .await?
        .ok_or(AppError::NotFound("Image not found".to_string()))?;

    Ok(HttpResponse::Ok()
        .content_type(image.mime_type.as_deref().unwrap_or(FALLBACK_MIME))
        .insert_header((
            "Content-Disposition",
            inline_disposition("", image.filename.as_deref()),
        ))
        .body(image.data))
}

/// Serve the thumbnail, or the original as an uncacheable fallback
/// GET /api/v1/images/{image_id}/thumbnail
pub async fn get_thumbnail(
    pool: web::Data<PgPool>,
    image_id: web::Path<String>,
) -> Result<HttpResponse> {
    let image_uuid = Uuid::parse_str(&image_id)
        .map_err(|_| AppError::BadRequest("Invalid image ID".to_string()))?;

    let image = image_repo::get_thumbnail_or_fallback(pool.get_ref(), image_uuid)
        .await?
        .ok_or(AppError::NotFound("Image not found".to_string()))?;

    Ok(HttpResponse::Ok()
        .content_type(image.mime_type.as_deref().unwrap_or(FALLBACK_MIME))
        .insert_header(("Cache-Control", cache_control(image.is_thumbnail)))
        .insert_header((
            "X-Is-Thumbnail",
            if image.is_thumbnail { "true" } else { "false" },
        ))
        .insert_header((
            "Content-Disposition",
            inline_disposition("thumb_", image.filename.as_deref()),
        ))
        .body(image.data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finished_thumbnail_is_cached_aggressively() {
        assert_eq!(cache_control(true), "public, max-age=31536000, immutable");
    }

    #[test]
    fn fallback_must_not_be_cached() {
        assert_eq!(cache_control(false), "no-store");
    }

    #[test]
    fn thumbnail_disposition_carries_prefix() {
        assert_eq!(
            inline_disposition("thumb_", Some("cat.png")),
            "inline; filename=\"thumb_cat.png\""
        );
    }

    #[test]
    fn disposition_defaults_missing_filename() {
        assert_eq!(
            inline_disposition("thumb_", None),
            "inline; filename=\"thumb_image\""
        );
    }
}
