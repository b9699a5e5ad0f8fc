use uuid::Uuid;

#[derive(Debug, Default)]
pub struct TicketFilter {
    pub job_number: Option<String>,
    pub city: Option<String>,
    pub include_archived: bool,
    /// Substring match against ticket_no and street.
    pub search: Option<String>,
}

#[derive(Debug, Default)]
pub struct JobFilter {
    pub include_complete: bool,
    pub job_number: Option<String>,
}

#[derive(Debug, Default)]
pub struct MarkerFilter {
    /// 1-based page to display; `None` returns markers for every page.
    pub page_number: Option<i64>,
}

#[derive(Debug, Default)]
pub struct PhotoFilter {
    pub job_id: Option<Uuid>,
    pub ticket_id: Option<Uuid>,
}
