//! Company registration and crew roster endpoints.

use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde::Serialize;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::{local_now, ApiContext, TenantContext};
use crate::db;
use crate::models::{Company, Member};
use crate::team;

#[derive(Serialize)]
pub struct RegisterResponse {
    pub company: Company,
    pub owner: Member,
}

/// `POST /api/companies` — tenant bootstrap; deliberately unauthenticated,
/// there is no tenant to authenticate against yet.
pub async fn register(
    State(ctx): State<ApiContext>,
    Json(new): Json<team::NewCompany>,
) -> Result<Json<RegisterResponse>, ApiError> {
    team::validate_new_company(&new).map_err(ApiError::BadRequest)?;

    ctx.core.ensure_ready().await?;
    let conn = ctx.core.open_db()?;
    let (company, owner) = team::register_company(&conn, new, local_now())?;

    Ok(Json(RegisterResponse { company, owner }))
}

#[derive(Serialize)]
pub struct MembersResponse {
    pub members: Vec<Member>,
}

/// `GET /api/team` — the company roster.
pub async fn list(
    State(ctx): State<ApiContext>,
    Extension(tenant): Extension<TenantContext>,
) -> Result<Json<MembersResponse>, ApiError> {
    let conn = ctx.core.open_db()?;
    let members = db::list_members(&conn, &tenant.company_id)?;
    Ok(Json(MembersResponse { members }))
}

/// `POST /api/team` — add a crew account. Owners/admins only.
pub async fn add(
    State(ctx): State<ApiContext>,
    Extension(tenant): Extension<TenantContext>,
    Json(new): Json<team::NewMember>,
) -> Result<Json<Member>, ApiError> {
    if !tenant.role.can_manage() {
        return Err(ApiError::Forbidden);
    }
    team::validate_new_member(&new).map_err(ApiError::BadRequest)?;

    let conn = ctx.core.open_db()?;
    let member = team::add_member(&conn, &tenant.company_id, new, local_now())?;
    Ok(Json(member))
}

/// `DELETE /api/team/:id` — remove a crew account. Owners/admins only, and
/// never yourself.
pub async fn remove(
    State(ctx): State<ApiContext>,
    Extension(tenant): Extension<TenantContext>,
    Path(member_id): Path<Uuid>,
) -> Result<axum::http::StatusCode, ApiError> {
    if !tenant.role.can_manage() {
        return Err(ApiError::Forbidden);
    }
    if member_id == tenant.member_id {
        return Err(ApiError::BadRequest("You cannot remove your own account".into()));
    }

    let conn = ctx.core.open_db()?;
    db::delete_member(&conn, &tenant.company_id, &member_id)?;
    Ok(axum::http::StatusCode::NO_CONTENT)
}
