/// Image repository - database operations for originals and thumbnails
use crate::error::Result;
use crate::models::{OriginalImage, ServedImage};
use sqlx::PgPool;
use uuid::Uuid;

/// Persist an uploaded original and return its generated id.
pub async fn insert_image(
    pool: &PgPool,
    data: &[u8],
    mime_type: Option<&str>,
    filename: Option<&str>,
) -> Result<Uuid> {
    let image_id = Uuid::new_v4();

    sqlx::query(
        r#"
        INSERT INTO images (id, data, mime_type, filename)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(image_id)
    .bind(data)
    .bind(mime_type)
    .bind(filename)
    .execute(pool)
    .await?;

    Ok(image_id)
}

/// Fetch the original bytes and MIME type for an image.
pub async fn get_original(pool: &PgPool, image_id: Uuid) -> Result<Option<OriginalImage>> {
    let image = sqlx::query_as::<_, OriginalImage>(
        r#"
        SELECT data, mime_type, filename
        FROM images
        WHERE id = $1
        "#,
    )
    .bind(image_id)
    .fetch_optional(pool)
    .await?;

    Ok(image)
}

/// Fetch the thumbnail for an image, falling back to the original.
///
/// The fallback policy lives in this one query so callers never compose it
/// themselves: when the thumbnail is ready its bytes are returned with
/// `is_thumbnail = true`, otherwise the full-size original comes back with
/// `is_thumbnail = false`. The readiness check guards both the flag and the
/// bytes, so a row can never present the flag without a payload.
pub async fn get_thumbnail_or_fallback(
    pool: &PgPool,
    image_id: Uuid,
) -> Result<Option<ServedImage>> {
    let image = sqlx::query_as::<_, ServedImage>(
        r#"
        SELECT
            CASE WHEN thumbnail_generated AND thumbnail_data IS NOT NULL
                 THEN thumbnail_data
                 ELSE data
            END AS data,
            mime_type,
            filename,
            (thumbnail_generated AND thumbnail_data IS NOT NULL) AS is_thumbnail
        FROM images
        WHERE id = $1
        "#,
    )
    .bind(image_id)
    .fetch_optional(pool)
    .await?;

    Ok(image)
}

/// Store a generated thumbnail and mark it ready.
///
/// The only mutation entry point for thumbnail state: bytes and flag are
/// set in one UPDATE so readers never observe one without the other.
/// Returns false when the image row no longer exists.
pub async fn set_thumbnail(pool: &PgPool, image_id: Uuid, thumbnail: &[u8]) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE images
        SET thumbnail_data = $2, thumbnail_generated = TRUE
        WHERE id = $1
        "#,
    )
    .bind(image_id)
    .bind(thumbnail)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
