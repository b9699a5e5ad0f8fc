use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A site photograph, optionally tied to a job and/or a ticket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Photo {
    pub id: Uuid,
    pub company_id: Uuid,
    pub job_id: Option<Uuid>,
    pub ticket_id: Option<Uuid>,
    pub file_name: String,
    pub url: String,
    /// SHA-256 of the file contents; duplicate uploads are rejected per company.
    pub content_hash: String,
    /// EXIF DateTimeOriginal when present.
    pub taken_at: Option<NaiveDateTime>,
    pub uploaded_at: NaiveDateTime,
}
