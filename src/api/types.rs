//! Shared types for the API layer.

use std::sync::Arc;

use chrono::NaiveDateTime;
use uuid::Uuid;

use crate::core_state::CoreState;
use crate::models::enums::MemberRole;
use crate::render::PdfPageRenderer;

/// Shared context for all API routes and middleware.
///
/// Wraps `CoreState` plus the page renderer; handlers receive it as axum
/// `State`, middleware reads it from request extensions.
#[derive(Clone)]
pub struct ApiContext {
    pub core: Arc<CoreState>,
    pub renderer: Arc<dyn PdfPageRenderer>,
}

impl ApiContext {
    pub fn new(core: Arc<CoreState>, renderer: Arc<dyn PdfPageRenderer>) -> Self {
        Self { core, renderer }
    }
}

/// Resolved caller identity, injected into request extensions by the
/// identity middleware after the roster check.
///
/// The upstream identity provider authenticates users; by the time a request
/// reaches this service the headers carry a resolved member id and company
/// id, and the middleware verifies the pair against the members table.
#[derive(Debug, Clone)]
pub struct TenantContext {
    pub company_id: Uuid,
    pub member_id: Uuid,
    pub member_name: String,
    pub role: MemberRole,
}

/// The caller's local wall clock, as the status engine expects it.
pub fn local_now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}
