//! Ticket domain — validation, cards, dashboard summary, calendar buckets.
//!
//! Everything a list/badge/calendar view needs, with the derived status
//! attached at fetch time. Statuses are never written back.

use std::sync::OnceLock;

use chrono::NaiveDateTime;
use regex::Regex;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::{self, DatabaseError};
use crate::models::{Ticket, TicketFilter};
use crate::status::{derive_status, TicketStatus};

// ═══════════════════════════════════════════════════════════
// Types
// ═══════════════════════════════════════════════════════════

/// Fields a crew member fills in when entering a ticket.
#[derive(Debug, Clone, Deserialize)]
pub struct NewTicket {
    pub job_number: String,
    pub ticket_no: String,
    pub street: String,
    pub cross_street: Option<String>,
    pub county: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub call_in_date: Option<String>,
    pub work_date: String,
    pub expires: String,
    pub site_contact: Option<String>,
    pub document_url: Option<String>,
}

/// A ticket plus its derived status, as every list view renders it.
#[derive(Debug, Clone, Serialize)]
pub struct TicketCard {
    #[serde(flatten)]
    pub ticket: Ticket,
    pub status: TicketStatus,
}

/// Dashboard counts per derived status, active tickets only.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StatusSummary {
    pub pending: u32,
    pub valid: u32,
    pub extendable: u32,
    pub refresh_needed: u32,
    pub expired: u32,
    pub unknown: u32,
    pub total: u32,
}

/// One day's worth of tickets for the calendar view.
#[derive(Debug, Clone, Serialize)]
pub struct CalendarDay {
    pub date: String,
    pub tickets: Vec<TicketCard>,
}

// ═══════════════════════════════════════════════════════════
// Validation
// ═══════════════════════════════════════════════════════════

fn state_code_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Z]{2}$").expect("static regex"))
}

/// Client-side-equivalent validation, run before any row is written.
pub fn validate_new_ticket(new: &NewTicket) -> Result<(), String> {
    if new.job_number.trim().is_empty() {
        return Err("Job number is required".into());
    }
    if new.ticket_no.trim().is_empty() {
        return Err("Ticket number is required".into());
    }
    if new.street.trim().is_empty() {
        return Err("Street is required".into());
    }
    if new.job_number.len() > 50 || new.ticket_no.len() > 50 {
        return Err("Job/ticket number too long".into());
    }
    if new.street.len() > 200 {
        return Err("Street too long".into());
    }
    if let Some(ref state) = new.state {
        if !state_code_re().is_match(state) {
            return Err(format!("Invalid state code: {state}"));
        }
    }

    let work = crate::status::parse_ticket_date(&new.work_date)
        .ok_or_else(|| format!("Invalid work date (expected YYYY-MM-DD): {}", new.work_date))?;
    let expires = crate::status::parse_ticket_date(&new.expires)
        .ok_or_else(|| format!("Invalid expiration date (expected YYYY-MM-DD): {}", new.expires))?;
    if let Some(ref call_in) = new.call_in_date {
        crate::status::parse_ticket_date(call_in)
            .ok_or_else(|| format!("Invalid call-in date (expected YYYY-MM-DD): {call_in}"))?;
    }
    if expires < work {
        return Err("Expiration date is before the work date".into());
    }

    Ok(())
}

// ═══════════════════════════════════════════════════════════
// Operations
// ═══════════════════════════════════════════════════════════

/// Persist a validated new ticket.
pub fn create_ticket(
    conn: &Connection,
    company_id: &Uuid,
    new: NewTicket,
    now: NaiveDateTime,
) -> Result<Ticket, DatabaseError> {
    let ticket = Ticket {
        id: Uuid::new_v4(),
        company_id: *company_id,
        job_number: new.job_number,
        ticket_no: new.ticket_no,
        street: new.street,
        cross_street: new.cross_street,
        county: new.county,
        city: new.city,
        state: new.state,
        call_in_date: new.call_in_date,
        work_date: new.work_date,
        expires: new.expires,
        site_contact: new.site_contact,
        refresh_requested: false,
        no_show_requested: false,
        is_archived: false,
        document_url: new.document_url,
        created_at: now,
    };
    db::insert_ticket(conn, &ticket)?;
    tracing::info!(ticket_id = %ticket.id, ticket_no = %ticket.ticket_no, "Ticket created");
    Ok(ticket)
}

/// Fetch tickets with their derived status attached.
pub fn fetch_ticket_cards(
    conn: &Connection,
    company_id: &Uuid,
    filter: &TicketFilter,
    now: NaiveDateTime,
) -> Result<Vec<TicketCard>, DatabaseError> {
    let tickets = db::list_tickets(conn, company_id, filter)?;
    Ok(tickets.into_iter().map(|t| card(t, now)).collect())
}

/// Status counts over the active (non-archived) tickets.
pub fn fetch_status_summary(
    conn: &Connection,
    company_id: &Uuid,
    now: NaiveDateTime,
) -> Result<StatusSummary, DatabaseError> {
    let tickets = db::list_tickets(conn, company_id, &TicketFilter::default())?;

    let mut summary = StatusSummary::default();
    for ticket in &tickets {
        match derive_status(ticket, now) {
            TicketStatus::Pending => summary.pending += 1,
            TicketStatus::Valid => summary.valid += 1,
            TicketStatus::Extendable => summary.extendable += 1,
            TicketStatus::RefreshNeeded => summary.refresh_needed += 1,
            TicketStatus::Expired => summary.expired += 1,
            TicketStatus::Unknown => summary.unknown += 1,
        }
    }
    summary.total = tickets.len() as u32;
    Ok(summary)
}

/// Tickets bucketed by work date for a calendar range. Days with no tickets
/// are omitted; the client draws the empty cells.
pub fn fetch_calendar_days(
    conn: &Connection,
    company_id: &Uuid,
    from: &str,
    to: &str,
    now: NaiveDateTime,
) -> Result<Vec<CalendarDay>, DatabaseError> {
    let tickets = db::list_tickets_in_work_range(conn, company_id, from, to)?;

    let mut days: Vec<CalendarDay> = Vec::new();
    for ticket in tickets {
        let date = ticket.work_date.clone();
        let entry = card(ticket, now);
        match days.last_mut() {
            Some(day) if day.date == date => day.tickets.push(entry),
            _ => days.push(CalendarDay { date, tickets: vec![entry] }),
        }
    }
    Ok(days)
}

fn card(ticket: Ticket, now: NaiveDateTime) -> TicketCard {
    let status = derive_status(&ticket, now);
    TicketCard { ticket, status }
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_memory_database;
    use crate::db::repository::insert_company;
    use crate::models::Company;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 8)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn seed_company(conn: &Connection) -> Uuid {
        let company = Company {
            id: Uuid::new_v4(),
            name: "Acme Underground".into(),
            created_at: now(),
        };
        insert_company(conn, &company).unwrap();
        company.id
    }

    fn new_ticket(no: &str, work: &str, expires: &str) -> NewTicket {
        NewTicket {
            job_number: "J-100".into(),
            ticket_no: no.into(),
            street: "12 Main St".into(),
            cross_street: None,
            county: None,
            city: Some("Austin".into()),
            state: Some("TX".into()),
            call_in_date: None,
            work_date: work.into(),
            expires: expires.into(),
            site_contact: None,
            document_url: None,
        }
    }

    // ── Validation ──────────────────────────────────────

    #[test]
    fn valid_ticket_passes() {
        assert!(validate_new_ticket(&new_ticket("TKT-1", "2024-01-05", "2024-01-20")).is_ok());
    }

    #[test]
    fn required_fields_enforced() {
        let mut t = new_ticket("TKT-1", "2024-01-05", "2024-01-20");
        t.ticket_no = "  ".into();
        assert!(validate_new_ticket(&t).is_err());

        let mut t = new_ticket("TKT-1", "2024-01-05", "2024-01-20");
        t.job_number = String::new();
        assert!(validate_new_ticket(&t).is_err());

        let mut t = new_ticket("TKT-1", "2024-01-05", "2024-01-20");
        t.street = String::new();
        assert!(validate_new_ticket(&t).is_err());
    }

    #[test]
    fn bad_dates_rejected() {
        assert!(validate_new_ticket(&new_ticket("T", "01/05/2024", "2024-01-20")).is_err());
        assert!(validate_new_ticket(&new_ticket("T", "2024-01-05", "soon")).is_err());
        // Expires before work date
        assert!(validate_new_ticket(&new_ticket("T", "2024-01-20", "2024-01-05")).is_err());
    }

    #[test]
    fn state_code_shape_enforced() {
        let mut t = new_ticket("TKT-1", "2024-01-05", "2024-01-20");
        t.state = Some("Texas".into());
        assert!(validate_new_ticket(&t).is_err());
        t.state = Some("tx".into());
        assert!(validate_new_ticket(&t).is_err());
        t.state = Some("TX".into());
        assert!(validate_new_ticket(&t).is_ok());
    }

    // ── Cards & summary ─────────────────────────────────

    #[test]
    fn cards_carry_derived_status() {
        let conn = open_memory_database().unwrap();
        let company_id = seed_company(&conn);

        // now = 2024-01-08: expires 01-10 → extendable; expires 02-01 → valid.
        create_ticket(&conn, &company_id, new_ticket("TKT-1", "2024-01-01", "2024-01-10"), now())
            .unwrap();
        create_ticket(&conn, &company_id, new_ticket("TKT-2", "2024-01-01", "2024-02-01"), now())
            .unwrap();

        let cards =
            fetch_ticket_cards(&conn, &company_id, &TicketFilter::default(), now()).unwrap();
        assert_eq!(cards.len(), 2);
        let by_no = |no: &str| cards.iter().find(|c| c.ticket.ticket_no == no).unwrap();
        assert_eq!(by_no("TKT-1").status, TicketStatus::Extendable);
        assert_eq!(by_no("TKT-2").status, TicketStatus::Valid);
    }

    #[test]
    fn summary_counts_by_status() {
        let conn = open_memory_database().unwrap();
        let company_id = seed_company(&conn);

        create_ticket(&conn, &company_id, new_ticket("TKT-1", "2024-01-01", "2024-01-10"), now())
            .unwrap(); // extendable
        create_ticket(&conn, &company_id, new_ticket("TKT-2", "2024-01-01", "2024-02-01"), now())
            .unwrap(); // valid
        create_ticket(&conn, &company_id, new_ticket("TKT-3", "2024-02-01", "2024-02-20"), now())
            .unwrap(); // pending
        let flagged =
            create_ticket(&conn, &company_id, new_ticket("TKT-4", "2024-01-01", "2024-02-01"), now())
                .unwrap();
        db::set_refresh_requested(&conn, &company_id, &flagged.id, true).unwrap();

        let summary = fetch_status_summary(&conn, &company_id, now()).unwrap();
        assert_eq!(summary.extendable, 1);
        assert_eq!(summary.valid, 1);
        assert_eq!(summary.pending, 1);
        assert_eq!(summary.refresh_needed, 1);
        assert_eq!(summary.expired, 0);
        assert_eq!(summary.total, 4);
    }

    #[test]
    fn summary_ignores_archived() {
        let conn = open_memory_database().unwrap();
        let company_id = seed_company(&conn);
        let t =
            create_ticket(&conn, &company_id, new_ticket("TKT-1", "2024-01-01", "2024-02-01"), now())
                .unwrap();
        db::set_ticket_archived(&conn, &company_id, &t.id, true).unwrap();

        let summary = fetch_status_summary(&conn, &company_id, now()).unwrap();
        assert_eq!(summary.total, 0);
    }

    // ── Calendar ────────────────────────────────────────

    #[test]
    fn calendar_buckets_by_work_date() {
        let conn = open_memory_database().unwrap();
        let company_id = seed_company(&conn);
        for (no, work) in [
            ("TKT-1", "2024-01-05"),
            ("TKT-2", "2024-01-05"),
            ("TKT-3", "2024-01-09"),
        ] {
            create_ticket(&conn, &company_id, new_ticket(no, work, "2024-02-01"), now()).unwrap();
        }

        let days =
            fetch_calendar_days(&conn, &company_id, "2024-01-01", "2024-01-31", now()).unwrap();
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, "2024-01-05");
        assert_eq!(days[0].tickets.len(), 2);
        assert_eq!(days[1].date, "2024-01-09");
        assert_eq!(days[1].tickets.len(), 1);
    }

    #[test]
    fn card_serializes_flat_with_status() {
        let conn = open_memory_database().unwrap();
        let company_id = seed_company(&conn);
        create_ticket(&conn, &company_id, new_ticket("TKT-1", "2024-01-01", "2024-02-01"), now())
            .unwrap();

        let cards =
            fetch_ticket_cards(&conn, &company_id, &TicketFilter::default(), now()).unwrap();
        let json = serde_json::to_value(&cards[0]).unwrap();
        assert_eq!(json["ticket_no"], "TKT-1");
        assert_eq!(json["status"], "valid");
    }
}
