//! Marker endpoints — pins on a print, and the replace-expired flow.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::{local_now, ApiContext, TenantContext};
use crate::db;
use crate::models::PrintMarker;
use crate::prints;
use crate::viewer::MarkerDraft;

#[derive(Deserialize)]
pub struct MarkerListQuery {
    /// 1-based page currently shown; omitted returns every page's markers.
    pub page: Option<i64>,
}

#[derive(Serialize)]
pub struct MarkersResponse {
    pub markers: Vec<PrintMarker>,
}

/// `GET /api/prints/:id/markers?page=` — markers for the viewed page.
pub async fn list(
    State(ctx): State<ApiContext>,
    Extension(tenant): Extension<TenantContext>,
    Path(print_id): Path<Uuid>,
    Query(query): Query<MarkerListQuery>,
) -> Result<Json<MarkersResponse>, ApiError> {
    let conn = ctx.core.open_db()?;
    let markers = prints::markers_for_page(&conn, &tenant.company_id, &print_id, query.page)?;
    Ok(Json(MarkersResponse { markers }))
}

#[derive(Deserialize)]
pub struct NewMarkerBody {
    pub ticket_id: Uuid,
    pub x_percent: f64,
    pub y_percent: f64,
    pub page_number: i64,
    pub label: Option<String>,
}

/// `POST /api/prints/:id/markers` — persist a confirmed pin.
pub async fn create(
    State(ctx): State<ApiContext>,
    Extension(tenant): Extension<TenantContext>,
    Path(print_id): Path<Uuid>,
    Json(body): Json<NewMarkerBody>,
) -> Result<Json<PrintMarker>, ApiError> {
    let draft = MarkerDraft {
        ticket_id: body.ticket_id,
        label: body.label.unwrap_or_default(),
        x_percent: body.x_percent,
        y_percent: body.y_percent,
        page_number: body.page_number,
    };

    let conn = ctx.core.open_db()?;
    let marker =
        prints::place_marker(&conn, &tenant.company_id, &print_id, &draft, local_now())?;
    Ok(Json(marker))
}

/// `DELETE /api/markers/:id` — pull a pin.
pub async fn remove(
    State(ctx): State<ApiContext>,
    Extension(tenant): Extension<TenantContext>,
    Path(marker_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let conn = ctx.core.open_db()?;
    db::delete_marker(&conn, &tenant.company_id, &marker_id)?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
pub struct ReplaceBody {
    pub ticket_id: Uuid,
}

/// `POST /api/markers/:id/replace` — swap an expired ticket's pin for a live
/// ticket in one transaction.
pub async fn replace(
    State(ctx): State<ApiContext>,
    Extension(tenant): Extension<TenantContext>,
    Path(marker_id): Path<Uuid>,
    Json(body): Json<ReplaceBody>,
) -> Result<Json<PrintMarker>, ApiError> {
    let conn = ctx.core.open_db()?;
    let marker = prints::replace_expired(
        &conn,
        &tenant.company_id,
        &marker_id,
        &body.ticket_id,
        local_now(),
    )?;
    Ok(Json(marker))
}
