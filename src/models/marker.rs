use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A percentage-anchored pin on a print, linking a position to a ticket.
///
/// `x_percent`/`y_percent` are relative to the print's *displayed* bounding
/// box (0–100), never to bitmap pixels: rasterization resolution differs
/// between devices, the displayed box does not. `page_number` is 1-based.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrintMarker {
    pub id: Uuid,
    pub company_id: Uuid,
    pub print_id: Uuid,
    pub ticket_id: Uuid,
    pub x_percent: f64,
    pub y_percent: f64,
    pub page_number: i64,
    pub label: String,
    pub created_at: NaiveDateTime,
}

impl PrintMarker {
    /// Both coordinates inside [0, 100] and a positive page number.
    pub fn coordinates_valid(&self) -> bool {
        (0.0..=100.0).contains(&self.x_percent)
            && (0.0..=100.0).contains(&self.y_percent)
            && self.page_number >= 1
    }
}
