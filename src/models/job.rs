use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A job/project grouping tickets under a shared job number.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: Uuid,
    pub company_id: Uuid,
    pub job_number: String,
    pub name: String,
    pub is_complete: bool,
    pub created_at: NaiveDateTime,
}
