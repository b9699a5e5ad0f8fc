//! Print endpoints — blueprint upload, pinning, and page rendering.

use std::str::FromStr;

use axum::extract::{Multipart, Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::{local_now, ApiContext, TenantContext};
use crate::db;
use crate::models::enums::PrintKind;
use crate::models::Print;
use crate::prints;
use crate::render::{DeviceClass, RenderOptions};

#[derive(Serialize)]
pub struct PrintsResponse {
    pub prints: Vec<Print>,
}

/// `GET /api/jobs/:id/prints` — all prints uploaded for a job.
pub async fn list(
    State(ctx): State<ApiContext>,
    Extension(tenant): Extension<TenantContext>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<PrintsResponse>, ApiError> {
    let conn = ctx.core.open_db()?;
    if db::get_job(&conn, &tenant.company_id, &job_id)?.is_none() {
        return Err(ApiError::NotFound("Job not found".into()));
    }
    let prints = db::list_prints_for_job(&conn, &tenant.company_id, &job_id)?;
    Ok(Json(PrintsResponse { prints }))
}

/// `POST /api/jobs/:id/prints` — multipart blueprint upload.
///
/// PDF parsing for the page count runs on the blocking pool; the row is only
/// written after the blob landed in the store.
pub async fn upload(
    State(ctx): State<ApiContext>,
    Extension(tenant): Extension<TenantContext>,
    Path(job_id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<Print>, ApiError> {
    let mut upload: Option<(String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Malformed multipart body: {e}")))?
    {
        if field.name() == Some("file") {
            let file_name = field.file_name().unwrap_or("print").to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(format!("Failed to read upload: {e}")))?;
            upload = Some((file_name, bytes.to_vec()));
        }
    }
    let (file_name, bytes) =
        upload.ok_or_else(|| ApiError::BadRequest("Missing 'file' field".into()))?;

    let ctx2 = ctx.clone();
    let company_id = tenant.company_id;
    let print = tokio::task::spawn_blocking(move || {
        let conn = ctx2.core.open_db()?;
        prints::upload_print(
            &conn,
            ctx2.core.files(),
            ctx2.renderer.as_ref(),
            &company_id,
            &job_id,
            &file_name,
            &bytes,
            local_now(),
        )
        .map_err(ApiError::from)
    })
    .await
    .map_err(|e| ApiError::Internal(e.to_string()))??;

    Ok(Json(print))
}

/// `POST /api/prints/:id/pin` — make this the job's markup surface.
pub async fn pin(
    State(ctx): State<ApiContext>,
    Extension(tenant): Extension<TenantContext>,
    Path(print_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let conn = ctx.core.open_db()?;
    db::pin_print(&conn, &tenant.company_id, &print_id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /api/prints/:id` — remove a print and its markers.
pub async fn remove(
    State(ctx): State<ApiContext>,
    Extension(tenant): Extension<TenantContext>,
    Path(print_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let conn = ctx.core.open_db()?;
    db::delete_print(&conn, &tenant.company_id, &print_id)?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
pub struct RenderQuery {
    /// "desktop" (default) or "mobile"; picks the bitmap dimension cap.
    pub device: Option<String>,
}

/// `GET /api/prints/:id/pages/:page` — rasterize one PDF page to PNG.
///
/// `page` is 1-based to match marker `page_number`s.
pub async fn render_page(
    State(ctx): State<ApiContext>,
    Extension(tenant): Extension<TenantContext>,
    Path((print_id, page_number)): Path<(Uuid, i64)>,
    Query(query): Query<RenderQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let device = match query.device.as_deref() {
        None => DeviceClass::Desktop,
        Some(s) => DeviceClass::from_str(s)
            .map_err(|_| ApiError::BadRequest(format!("Unknown device class: {s}")))?,
    };

    let print = {
        let conn = ctx.core.open_db()?;
        db::get_print(&conn, &tenant.company_id, &print_id)?
            .ok_or_else(|| ApiError::NotFound("Print not found".into()))?
    };
    if print.kind != PrintKind::Pdf {
        return Err(ApiError::BadRequest(
            "Only PDF prints are rendered; image prints are served as uploaded".into(),
        ));
    }
    if page_number < 1 || page_number > print.page_count {
        return Err(ApiError::BadRequest(format!(
            "Page {page_number} out of range (print has {} pages)",
            print.page_count
        )));
    }

    let blob_name = print.url.trim_start_matches("/files/").to_string();
    let bytes = ctx.core.files().read(&blob_name).map_err(ApiError::from)?;

    let renderer = ctx.renderer.clone();
    let options = RenderOptions::for_device(device);
    let page_index = (page_number - 1) as usize;
    let png = tokio::task::spawn_blocking(move || {
        renderer.render_page(&bytes, page_index, &options)
    })
    .await
    .map_err(|e| ApiError::Internal(e.to_string()))?
    .map_err(ApiError::from)?;

    Ok(([(header::CONTENT_TYPE, "image/png")], png))
}
