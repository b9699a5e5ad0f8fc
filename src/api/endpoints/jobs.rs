//! Job endpoints.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::{local_now, ApiContext, TenantContext};
use crate::db;
use crate::jobs::{self, JobOverview, NewJob};
use crate::models::{Job, JobFilter};

#[derive(Deserialize)]
pub struct JobListQuery {
    pub include_complete: Option<bool>,
    pub job_number: Option<String>,
}

#[derive(Serialize)]
pub struct JobsResponse {
    pub jobs: Vec<JobOverview>,
}

/// `GET /api/jobs` — the job grid with ticket counts and pinned prints.
pub async fn list(
    State(ctx): State<ApiContext>,
    Extension(tenant): Extension<TenantContext>,
    Query(query): Query<JobListQuery>,
) -> Result<Json<JobsResponse>, ApiError> {
    let conn = ctx.core.open_db()?;
    let filter = JobFilter {
        include_complete: query.include_complete.unwrap_or(false),
        job_number: query.job_number,
    };
    let overviews = jobs::fetch_job_overviews(&conn, &tenant.company_id, &filter)?;
    Ok(Json(JobsResponse { jobs: overviews }))
}

/// `POST /api/jobs` — create a job.
pub async fn create(
    State(ctx): State<ApiContext>,
    Extension(tenant): Extension<TenantContext>,
    Json(new): Json<NewJob>,
) -> Result<Json<Job>, ApiError> {
    jobs::validate_new_job(&new).map_err(ApiError::BadRequest)?;

    let conn = ctx.core.open_db()?;
    let job = jobs::create_job(&conn, &tenant.company_id, new, local_now())?;
    Ok(Json(job))
}

/// `GET /api/jobs/:id` — one job with its counts.
pub async fn detail(
    State(ctx): State<ApiContext>,
    Extension(tenant): Extension<TenantContext>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<JobOverview>, ApiError> {
    let conn = ctx.core.open_db()?;
    let job = db::get_job(&conn, &tenant.company_id, &job_id)?
        .ok_or_else(|| ApiError::NotFound("Job not found".into()))?;

    let overviews = jobs::fetch_job_overviews(
        &conn,
        &tenant.company_id,
        &JobFilter { include_complete: true, job_number: Some(job.job_number.clone()) },
    )?;
    overviews
        .into_iter()
        .next()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Job not found".into()))
}

/// `PUT /api/jobs/:id` — rename/renumber a job.
pub async fn update(
    State(ctx): State<ApiContext>,
    Extension(tenant): Extension<TenantContext>,
    Path(job_id): Path<Uuid>,
    Json(new): Json<NewJob>,
) -> Result<Json<Job>, ApiError> {
    jobs::validate_new_job(&new).map_err(ApiError::BadRequest)?;

    let conn = ctx.core.open_db()?;
    let mut job = db::get_job(&conn, &tenant.company_id, &job_id)?
        .ok_or_else(|| ApiError::NotFound("Job not found".into()))?;
    job.job_number = new.job_number;
    job.name = new.name;
    db::update_job(&conn, &job)?;
    Ok(Json(job))
}

#[derive(Deserialize)]
pub struct CompleteBody {
    pub value: Option<bool>,
}

/// `POST /api/jobs/:id/complete` — mark a job complete (or reopen it).
pub async fn complete(
    State(ctx): State<ApiContext>,
    Extension(tenant): Extension<TenantContext>,
    Path(job_id): Path<Uuid>,
    Json(body): Json<CompleteBody>,
) -> Result<StatusCode, ApiError> {
    let conn = ctx.core.open_db()?;
    db::set_job_complete(&conn, &tenant.company_id, &job_id, body.value.unwrap_or(true))?;
    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /api/jobs/:id` — owners/admins only; prints and markers cascade.
pub async fn remove(
    State(ctx): State<ApiContext>,
    Extension(tenant): Extension<TenantContext>,
    Path(job_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if !tenant.role.can_manage() {
        return Err(ApiError::Forbidden);
    }
    let conn = ctx.core.open_db()?;
    db::delete_job(&conn, &tenant.company_id, &job_id)?;
    Ok(StatusCode::NO_CONTENT)
}
