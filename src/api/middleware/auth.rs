//! Identity middleware.
//!
//! Requests arrive from the identity proxy with `X-Member-Id` and
//! `X-Company-Id` headers already resolved. This middleware verifies the
//! pair against the members table and injects `TenantContext` for the
//! handlers; a member id from another company is as unauthorized as no
//! header at all. Every data query downstream is additionally scoped by the
//! company id.

use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, TenantContext};
use crate::db;

pub async fn require_identity(req: Request<axum::body::Body>, next: Next) -> Response {
    match require_identity_inner(req, next).await {
        Ok(resp) => resp,
        Err(err) => err.into_response(),
    }
}

async fn require_identity_inner(
    mut req: Request<axum::body::Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let ctx: ApiContext = req
        .extensions()
        .get::<ApiContext>()
        .cloned()
        .ok_or(ApiError::Internal("missing API context".into()))?;

    let member_id = header_uuid(&req, "X-Member-Id")?;
    let company_id = header_uuid(&req, "X-Company-Id")?;

    ctx.core.ensure_ready().await?;

    let member = {
        let conn = ctx.core.open_db()?;
        db::get_member(&conn, &company_id, &member_id)?
    }
    .ok_or(ApiError::Unauthorized)?;

    req.extensions_mut().insert(TenantContext {
        company_id,
        member_id,
        member_name: member.display_name,
        role: member.role,
    });

    Ok(next.run(req).await)
}

fn header_uuid(req: &Request<axum::body::Body>, name: &str) -> Result<Uuid, ApiError> {
    let value = req
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .ok_or(ApiError::Unauthorized)?;
    Uuid::parse_str(value).map_err(|_| ApiError::Unauthorized)
}
