use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single utility-locate ticket (811-style dig permit).
///
/// `call_in_date`, `work_date` and `expires` are kept as `YYYY-MM-DD`
/// strings: that is the wire format crews enter and what the status engine
/// parses in local time. Converting through a UTC datetime here would shift
/// the date by a timezone offset at midnight boundaries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    pub id: Uuid,
    pub company_id: Uuid,
    pub job_number: String,
    pub ticket_no: String,
    pub street: String,
    pub cross_street: Option<String>,
    pub county: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub call_in_date: Option<String>,
    /// Dig-start date, `YYYY-MM-DD`.
    pub work_date: String,
    /// Expiration date, `YYYY-MM-DD`, valid through end of that day.
    pub expires: String,
    pub site_contact: Option<String>,
    pub refresh_requested: bool,
    pub no_show_requested: bool,
    pub is_archived: bool,
    pub document_url: Option<String>,
    pub created_at: NaiveDateTime,
}
