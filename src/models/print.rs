use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::PrintKind;

/// An uploaded site blueprint (raster image or PDF) attached to a job.
///
/// At most one print per job is pinned; the pinned print is the markup
/// surface the viewer opens by default.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Print {
    pub id: Uuid,
    pub company_id: Uuid,
    pub job_id: Uuid,
    pub file_name: String,
    pub kind: PrintKind,
    /// Opaque URL into the file store; clients resolve it as-is.
    pub url: String,
    pub page_count: i64,
    pub is_pinned: bool,
    pub uploaded_at: NaiveDateTime,
}
