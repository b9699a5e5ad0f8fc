//! Photo endpoints — site photograph upload and gallery listing.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::{local_now, ApiContext, TenantContext};
use crate::db;
use crate::models::{Photo, PhotoFilter};
use crate::photos;

#[derive(Deserialize)]
pub struct PhotoListQuery {
    pub job_id: Option<Uuid>,
    pub ticket_id: Option<Uuid>,
}

#[derive(Serialize)]
pub struct PhotoView {
    #[serde(flatten)]
    pub photo: Photo,
    /// Content type the gallery should use (HEIC needs special handling).
    pub content_type: String,
}

#[derive(Serialize)]
pub struct PhotosResponse {
    pub photos: Vec<PhotoView>,
}

/// `GET /api/photos?job_id=&ticket_id=` — gallery listing.
pub async fn list(
    State(ctx): State<ApiContext>,
    Extension(tenant): Extension<TenantContext>,
    Query(query): Query<PhotoListQuery>,
) -> Result<Json<PhotosResponse>, ApiError> {
    let conn = ctx.core.open_db()?;
    let filter = PhotoFilter { job_id: query.job_id, ticket_id: query.ticket_id };
    let photos = db::list_photos(&conn, &tenant.company_id, &filter)?;

    let views = photos
        .into_iter()
        .map(|photo| {
            let content_type = mime_guess::from_path(&photo.url)
                .first_or_octet_stream()
                .to_string();
            PhotoView { photo, content_type }
        })
        .collect();
    Ok(Json(PhotosResponse { photos: views }))
}

#[derive(Serialize)]
pub struct UploadResponse {
    #[serde(flatten)]
    pub photo: Photo,
    pub duplicate: bool,
}

/// `POST /api/photos` — multipart photo upload.
///
/// Text fields `job_id` and `ticket_id` attach the photo; the `file` field
/// carries the image. Re-sending the same bytes answers with the existing
/// row and `duplicate: true`.
pub async fn upload(
    State(ctx): State<ApiContext>,
    Extension(tenant): Extension<TenantContext>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut job_id: Option<Uuid> = None;
    let mut ticket_id: Option<Uuid> = None;
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Malformed multipart body: {e}")))?
    {
        match field.name() {
            Some("job_id") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(e.to_string()))?;
                job_id = Some(
                    Uuid::parse_str(&text)
                        .map_err(|_| ApiError::BadRequest(format!("Invalid job_id: {text}")))?,
                );
            }
            Some("ticket_id") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(e.to_string()))?;
                ticket_id = Some(
                    Uuid::parse_str(&text)
                        .map_err(|_| ApiError::BadRequest(format!("Invalid ticket_id: {text}")))?,
                );
            }
            Some("file") => {
                let file_name = field.file_name().unwrap_or("photo").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Failed to read upload: {e}")))?;
                upload = Some((file_name, bytes.to_vec()));
            }
            _ => {}
        }
    }

    let (file_name, bytes) =
        upload.ok_or_else(|| ApiError::BadRequest("Missing 'file' field".into()))?;

    let conn = ctx.core.open_db()?;
    let outcome = photos::upload_photo(
        &conn,
        ctx.core.files(),
        &tenant.company_id,
        job_id,
        ticket_id,
        &file_name,
        &bytes,
        local_now(),
    )?;

    let duplicate = outcome.is_duplicate();
    Ok(Json(UploadResponse { photo: outcome.photo().clone(), duplicate }))
}

/// `DELETE /api/photos/:id` — remove a photo row (the blob stays content-
/// addressed; another row may share it).
pub async fn remove(
    State(ctx): State<ApiContext>,
    Extension(tenant): Extension<TenantContext>,
    Path(photo_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let conn = ctx.core.open_db()?;
    db::delete_photo(&conn, &tenant.company_id, &photo_id)?;
    Ok(StatusCode::NO_CONTENT)
}
