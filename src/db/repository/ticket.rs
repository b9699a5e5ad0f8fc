use rusqlite::{params, Connection, Row};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::{Ticket, TicketFilter};

use super::{fmt_datetime, parse_datetime, parse_uuid};

const TICKET_COLUMNS: &str = "id, company_id, job_number, ticket_no, street, cross_street, \
     county, city, state, call_in_date, work_date, expires, site_contact, \
     refresh_requested, no_show_requested, is_archived, document_url, created_at";

pub fn insert_ticket(conn: &Connection, ticket: &Ticket) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO tickets (id, company_id, job_number, ticket_no, street, cross_street,
         county, city, state, call_in_date, work_date, expires, site_contact,
         refresh_requested, no_show_requested, is_archived, document_url, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)",
        params![
            ticket.id.to_string(),
            ticket.company_id.to_string(),
            ticket.job_number,
            ticket.ticket_no,
            ticket.street,
            ticket.cross_street,
            ticket.county,
            ticket.city,
            ticket.state,
            ticket.call_in_date,
            ticket.work_date,
            ticket.expires,
            ticket.site_contact,
            ticket.refresh_requested as i32,
            ticket.no_show_requested as i32,
            ticket.is_archived as i32,
            ticket.document_url,
            fmt_datetime(&ticket.created_at),
        ],
    )?;
    Ok(())
}

pub fn get_ticket(
    conn: &Connection,
    company_id: &Uuid,
    id: &Uuid,
) -> Result<Option<Ticket>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {TICKET_COLUMNS} FROM tickets WHERE company_id = ?1 AND id = ?2"
    ))?;

    let result = stmt.query_row(params![company_id.to_string(), id.to_string()], map_ticket_row);

    match result {
        Ok(row) => Ok(Some(ticket_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn update_ticket(conn: &Connection, ticket: &Ticket) -> Result<(), DatabaseError> {
    let rows = conn.execute(
        "UPDATE tickets SET job_number = ?3, ticket_no = ?4, street = ?5, cross_street = ?6,
         county = ?7, city = ?8, state = ?9, call_in_date = ?10, work_date = ?11,
         expires = ?12, site_contact = ?13, document_url = ?14
         WHERE company_id = ?1 AND id = ?2",
        params![
            ticket.company_id.to_string(),
            ticket.id.to_string(),
            ticket.job_number,
            ticket.ticket_no,
            ticket.street,
            ticket.cross_street,
            ticket.county,
            ticket.city,
            ticket.state,
            ticket.call_in_date,
            ticket.work_date,
            ticket.expires,
            ticket.site_contact,
            ticket.document_url,
        ],
    )?;
    if rows == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Ticket".into(),
            id: ticket.id.to_string(),
        });
    }
    Ok(())
}

pub fn set_ticket_archived(
    conn: &Connection,
    company_id: &Uuid,
    id: &Uuid,
    archived: bool,
) -> Result<(), DatabaseError> {
    set_ticket_flag(conn, company_id, id, "is_archived", archived)
}

pub fn set_refresh_requested(
    conn: &Connection,
    company_id: &Uuid,
    id: &Uuid,
    requested: bool,
) -> Result<(), DatabaseError> {
    set_ticket_flag(conn, company_id, id, "refresh_requested", requested)
}

pub fn set_no_show_requested(
    conn: &Connection,
    company_id: &Uuid,
    id: &Uuid,
    requested: bool,
) -> Result<(), DatabaseError> {
    set_ticket_flag(conn, company_id, id, "no_show_requested", requested)
}

fn set_ticket_flag(
    conn: &Connection,
    company_id: &Uuid,
    id: &Uuid,
    column: &str,
    value: bool,
) -> Result<(), DatabaseError> {
    // column comes from the three callers above, never from input
    let rows = conn.execute(
        &format!("UPDATE tickets SET {column} = ?3 WHERE company_id = ?1 AND id = ?2"),
        params![company_id.to_string(), id.to_string(), value as i32],
    )?;
    if rows == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Ticket".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

/// Hard-delete a ticket. Markers pointing at it go with it via CASCADE;
/// archiving is the non-destructive path that keeps markers alive.
pub fn delete_ticket(
    conn: &Connection,
    company_id: &Uuid,
    id: &Uuid,
) -> Result<(), DatabaseError> {
    let rows = conn.execute(
        "DELETE FROM tickets WHERE company_id = ?1 AND id = ?2",
        params![company_id.to_string(), id.to_string()],
    )?;
    if rows == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Ticket".into(),
            id: id.to_string(),
        });
    }
    tracing::info!(ticket_id = %id, "Ticket hard-deleted with its markers");
    Ok(())
}

pub fn list_tickets(
    conn: &Connection,
    company_id: &Uuid,
    filter: &TicketFilter,
) -> Result<Vec<Ticket>, DatabaseError> {
    let mut sql = format!("SELECT {TICKET_COLUMNS} FROM tickets WHERE company_id = ?1");
    let mut args: Vec<Box<dyn rusqlite::types::ToSql>> =
        vec![Box::new(company_id.to_string())];

    if !filter.include_archived {
        sql.push_str(" AND is_archived = 0");
    }
    if let Some(ref job_number) = filter.job_number {
        args.push(Box::new(job_number.clone()));
        sql.push_str(&format!(" AND job_number = ?{}", args.len()));
    }
    if let Some(ref city) = filter.city {
        args.push(Box::new(city.clone()));
        sql.push_str(&format!(" AND city = ?{}", args.len()));
    }
    if let Some(ref search) = filter.search {
        args.push(Box::new(format!("%{search}%")));
        let n = args.len();
        sql.push_str(&format!(" AND (ticket_no LIKE ?{n} OR street LIKE ?{n})"));
    }
    sql.push_str(" ORDER BY expires ASC, ticket_no ASC");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(
        rusqlite::params_from_iter(args.iter().map(|a| a.as_ref())),
        map_ticket_row,
    )?;

    let mut tickets = Vec::new();
    for row in rows {
        tickets.push(ticket_from_row(row?)?);
    }
    Ok(tickets)
}

/// Active tickets whose work date falls inside [from, to] inclusive.
///
/// `YYYY-MM-DD` strings compare correctly as text, so the range check stays
/// in SQL.
pub fn list_tickets_in_work_range(
    conn: &Connection,
    company_id: &Uuid,
    from: &str,
    to: &str,
) -> Result<Vec<Ticket>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {TICKET_COLUMNS} FROM tickets
         WHERE company_id = ?1 AND is_archived = 0 AND work_date >= ?2 AND work_date <= ?3
         ORDER BY work_date ASC, ticket_no ASC"
    ))?;

    let rows = stmt.query_map(
        params![company_id.to_string(), from, to],
        map_ticket_row,
    )?;

    let mut tickets = Vec::new();
    for row in rows {
        tickets.push(ticket_from_row(row?)?);
    }
    Ok(tickets)
}

// Internal row type for Ticket mapping
struct TicketRow {
    id: String,
    company_id: String,
    job_number: String,
    ticket_no: String,
    street: String,
    cross_street: Option<String>,
    county: Option<String>,
    city: Option<String>,
    state: Option<String>,
    call_in_date: Option<String>,
    work_date: String,
    expires: String,
    site_contact: Option<String>,
    refresh_requested: i32,
    no_show_requested: i32,
    is_archived: i32,
    document_url: Option<String>,
    created_at: String,
}

fn map_ticket_row(row: &Row<'_>) -> rusqlite::Result<TicketRow> {
    Ok(TicketRow {
        id: row.get::<_, String>(0)?,
        company_id: row.get::<_, String>(1)?,
        job_number: row.get::<_, String>(2)?,
        ticket_no: row.get::<_, String>(3)?,
        street: row.get::<_, String>(4)?,
        cross_street: row.get::<_, Option<String>>(5)?,
        county: row.get::<_, Option<String>>(6)?,
        city: row.get::<_, Option<String>>(7)?,
        state: row.get::<_, Option<String>>(8)?,
        call_in_date: row.get::<_, Option<String>>(9)?,
        work_date: row.get::<_, String>(10)?,
        expires: row.get::<_, String>(11)?,
        site_contact: row.get::<_, Option<String>>(12)?,
        refresh_requested: row.get::<_, i32>(13)?,
        no_show_requested: row.get::<_, i32>(14)?,
        is_archived: row.get::<_, i32>(15)?,
        document_url: row.get::<_, Option<String>>(16)?,
        created_at: row.get::<_, String>(17)?,
    })
}

fn ticket_from_row(row: TicketRow) -> Result<Ticket, DatabaseError> {
    Ok(Ticket {
        id: parse_uuid(&row.id)?,
        company_id: parse_uuid(&row.company_id)?,
        job_number: row.job_number,
        ticket_no: row.ticket_no,
        street: row.street,
        cross_street: row.cross_street,
        county: row.county,
        city: row.city,
        state: row.state,
        call_in_date: row.call_in_date,
        work_date: row.work_date,
        expires: row.expires,
        site_contact: row.site_contact,
        refresh_requested: row.refresh_requested != 0,
        no_show_requested: row.no_show_requested != 0,
        is_archived: row.is_archived != 0,
        document_url: row.document_url,
        created_at: parse_datetime(&row.created_at),
    })
}
