//! Ticket endpoints — CRUD plus the derived-status views (list, summary,
//! calendar) and the manual flags.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::{local_now, ApiContext, TenantContext};
use crate::db;
use crate::models::TicketFilter;
use crate::status::{derive_status, parse_ticket_date};
use crate::tickets::{self, CalendarDay, NewTicket, StatusSummary, TicketCard};

#[derive(Deserialize)]
pub struct TicketListQuery {
    pub job_number: Option<String>,
    pub city: Option<String>,
    pub search: Option<String>,
    pub include_archived: Option<bool>,
}

#[derive(Serialize)]
pub struct TicketsResponse {
    pub tickets: Vec<TicketCard>,
}

/// `GET /api/tickets` — filtered list with derived statuses.
pub async fn list(
    State(ctx): State<ApiContext>,
    Extension(tenant): Extension<TenantContext>,
    Query(query): Query<TicketListQuery>,
) -> Result<Json<TicketsResponse>, ApiError> {
    let conn = ctx.core.open_db()?;

    let filter = TicketFilter {
        job_number: query.job_number,
        city: query.city,
        search: query.search,
        include_archived: query.include_archived.unwrap_or(false),
    };

    let cards = tickets::fetch_ticket_cards(&conn, &tenant.company_id, &filter, local_now())?;
    Ok(Json(TicketsResponse { tickets: cards }))
}

/// `POST /api/tickets` — create a ticket after field validation.
pub async fn create(
    State(ctx): State<ApiContext>,
    Extension(tenant): Extension<TenantContext>,
    Json(new): Json<NewTicket>,
) -> Result<Json<TicketCard>, ApiError> {
    tickets::validate_new_ticket(&new).map_err(ApiError::BadRequest)?;

    let conn = ctx.core.open_db()?;
    let now = local_now();
    let ticket = tickets::create_ticket(&conn, &tenant.company_id, new, now)?;
    let status = derive_status(&ticket, now);
    Ok(Json(TicketCard { ticket, status }))
}

/// `GET /api/tickets/summary` — dashboard status counts.
pub async fn summary(
    State(ctx): State<ApiContext>,
    Extension(tenant): Extension<TenantContext>,
) -> Result<Json<StatusSummary>, ApiError> {
    let conn = ctx.core.open_db()?;
    let summary = tickets::fetch_status_summary(&conn, &tenant.company_id, local_now())?;
    Ok(Json(summary))
}

#[derive(Deserialize)]
pub struct CalendarQuery {
    pub from: String,
    pub to: String,
}

#[derive(Serialize)]
pub struct CalendarResponse {
    pub days: Vec<CalendarDay>,
}

/// `GET /api/tickets/calendar?from=&to=` — tickets bucketed by work date.
pub async fn calendar(
    State(ctx): State<ApiContext>,
    Extension(tenant): Extension<TenantContext>,
    Query(query): Query<CalendarQuery>,
) -> Result<Json<CalendarResponse>, ApiError> {
    for date in [&query.from, &query.to] {
        if parse_ticket_date(date).is_none() {
            return Err(ApiError::BadRequest(format!(
                "Invalid date (expected YYYY-MM-DD): {date}"
            )));
        }
    }

    let conn = ctx.core.open_db()?;
    let days = tickets::fetch_calendar_days(
        &conn,
        &tenant.company_id,
        &query.from,
        &query.to,
        local_now(),
    )?;
    Ok(Json(CalendarResponse { days }))
}

/// `GET /api/tickets/:id` — one ticket with its derived status.
pub async fn detail(
    State(ctx): State<ApiContext>,
    Extension(tenant): Extension<TenantContext>,
    Path(ticket_id): Path<Uuid>,
) -> Result<Json<TicketCard>, ApiError> {
    let conn = ctx.core.open_db()?;
    let ticket = db::get_ticket(&conn, &tenant.company_id, &ticket_id)?
        .ok_or_else(|| ApiError::NotFound("Ticket not found".into()))?;
    let status = derive_status(&ticket, local_now());
    Ok(Json(TicketCard { ticket, status }))
}

/// `PUT /api/tickets/:id` — rewrite the editable fields.
pub async fn update(
    State(ctx): State<ApiContext>,
    Extension(tenant): Extension<TenantContext>,
    Path(ticket_id): Path<Uuid>,
    Json(new): Json<NewTicket>,
) -> Result<Json<TicketCard>, ApiError> {
    tickets::validate_new_ticket(&new).map_err(ApiError::BadRequest)?;

    let conn = ctx.core.open_db()?;
    let mut ticket = db::get_ticket(&conn, &tenant.company_id, &ticket_id)?
        .ok_or_else(|| ApiError::NotFound("Ticket not found".into()))?;

    ticket.job_number = new.job_number;
    ticket.ticket_no = new.ticket_no;
    ticket.street = new.street;
    ticket.cross_street = new.cross_street;
    ticket.county = new.county;
    ticket.city = new.city;
    ticket.state = new.state;
    ticket.call_in_date = new.call_in_date;
    ticket.work_date = new.work_date;
    ticket.expires = new.expires;
    ticket.site_contact = new.site_contact;
    ticket.document_url = new.document_url;
    db::update_ticket(&conn, &ticket)?;

    let status = derive_status(&ticket, local_now());
    Ok(Json(TicketCard { ticket, status }))
}

#[derive(Deserialize)]
pub struct FlagBody {
    /// Omitted means "set", matching the one-tap UI action.
    pub value: Option<bool>,
}

/// `POST /api/tickets/:id/archive` — archive (or restore) a ticket.
pub async fn archive(
    State(ctx): State<ApiContext>,
    Extension(tenant): Extension<TenantContext>,
    Path(ticket_id): Path<Uuid>,
    Json(body): Json<FlagBody>,
) -> Result<StatusCode, ApiError> {
    let conn = ctx.core.open_db()?;
    db::set_ticket_archived(&conn, &tenant.company_id, &ticket_id, body.value.unwrap_or(true))?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/tickets/:id/refresh-request` — the manual status override.
pub async fn refresh_request(
    State(ctx): State<ApiContext>,
    Extension(tenant): Extension<TenantContext>,
    Path(ticket_id): Path<Uuid>,
    Json(body): Json<FlagBody>,
) -> Result<Json<TicketCard>, ApiError> {
    let conn = ctx.core.open_db()?;
    db::set_refresh_requested(&conn, &tenant.company_id, &ticket_id, body.value.unwrap_or(true))?;

    let ticket = db::get_ticket(&conn, &tenant.company_id, &ticket_id)?
        .ok_or_else(|| ApiError::NotFound("Ticket not found".into()))?;
    let status = derive_status(&ticket, local_now());
    Ok(Json(TicketCard { ticket, status }))
}

/// `POST /api/tickets/:id/no-show` — flag a locator no-show.
pub async fn no_show(
    State(ctx): State<ApiContext>,
    Extension(tenant): Extension<TenantContext>,
    Path(ticket_id): Path<Uuid>,
    Json(body): Json<FlagBody>,
) -> Result<StatusCode, ApiError> {
    let conn = ctx.core.open_db()?;
    db::set_no_show_requested(&conn, &tenant.company_id, &ticket_id, body.value.unwrap_or(true))?;
    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /api/tickets/:id` — hard delete. Owners/admins only; archiving is
/// the everyday path.
pub async fn remove(
    State(ctx): State<ApiContext>,
    Extension(tenant): Extension<TenantContext>,
    Path(ticket_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if !tenant.role.can_manage() {
        return Err(ApiError::Forbidden);
    }
    let conn = ctx.core.open_db()?;
    db::delete_ticket(&conn, &tenant.company_id, &ticket_id)?;
    Ok(StatusCode::NO_CONTENT)
}
