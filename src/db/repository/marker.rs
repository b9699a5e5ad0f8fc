use chrono::NaiveDateTime;
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::{MarkerFilter, PrintMarker};
use crate::status::{derive_status, TicketStatus};

use super::{fmt_datetime, parse_datetime, parse_uuid};

const MARKER_COLUMNS: &str =
    "id, company_id, print_id, ticket_id, x_percent, y_percent, page_number, label, created_at";

pub fn insert_marker(conn: &Connection, marker: &PrintMarker) -> Result<(), DatabaseError> {
    // Belt and braces with the schema CHECK: reject before touching SQLite so
    // the error names the field instead of a bare constraint failure.
    if !marker.coordinates_valid() {
        return Err(DatabaseError::ConstraintViolation(format!(
            "marker coordinates out of range: ({}, {}) page {}",
            marker.x_percent, marker.y_percent, marker.page_number
        )));
    }

    conn.execute(
        "INSERT INTO print_markers (id, company_id, print_id, ticket_id, x_percent, y_percent, page_number, label, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            marker.id.to_string(),
            marker.company_id.to_string(),
            marker.print_id.to_string(),
            marker.ticket_id.to_string(),
            marker.x_percent,
            marker.y_percent,
            marker.page_number,
            marker.label,
            fmt_datetime(&marker.created_at),
        ],
    )?;
    Ok(())
}

pub fn get_marker(
    conn: &Connection,
    company_id: &Uuid,
    id: &Uuid,
) -> Result<Option<PrintMarker>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {MARKER_COLUMNS} FROM print_markers WHERE company_id = ?1 AND id = ?2"
    ))?;

    let result = stmt.query_row(params![company_id.to_string(), id.to_string()], map_marker_row);

    match result {
        Ok(row) => Ok(Some(marker_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Markers for a print, optionally narrowed to the page being viewed.
pub fn list_markers_for_print(
    conn: &Connection,
    company_id: &Uuid,
    print_id: &Uuid,
    filter: &MarkerFilter,
) -> Result<Vec<PrintMarker>, DatabaseError> {
    let mut sql = format!(
        "SELECT {MARKER_COLUMNS} FROM print_markers WHERE company_id = ?1 AND print_id = ?2"
    );
    let mut args: Vec<Box<dyn rusqlite::types::ToSql>> = vec![
        Box::new(company_id.to_string()),
        Box::new(print_id.to_string()),
    ];

    if let Some(page) = filter.page_number {
        args.push(Box::new(page));
        sql.push_str(&format!(" AND page_number = ?{}", args.len()));
    }
    sql.push_str(" ORDER BY created_at ASC");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(
        rusqlite::params_from_iter(args.iter().map(|a| a.as_ref())),
        map_marker_row,
    )?;

    let mut markers = Vec::new();
    for row in rows {
        markers.push(marker_from_row(row?)?);
    }
    Ok(markers)
}

pub fn delete_marker(
    conn: &Connection,
    company_id: &Uuid,
    id: &Uuid,
) -> Result<(), DatabaseError> {
    let rows = conn.execute(
        "DELETE FROM print_markers WHERE company_id = ?1 AND id = ?2",
        params![company_id.to_string(), id.to_string()],
    )?;
    if rows == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "PrintMarker".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

/// Swap an expired ticket's pin for a replacement ticket, atomically.
///
/// One transaction: verify the marker's ticket actually derives `Expired`
/// and the replacement is live, archive the old ticket, delete the old
/// marker, insert a new marker at the same coordinates and page. Either all
/// of it lands or none of it does; there is no window where the pin is gone
/// but the old ticket still looks active.
pub fn replace_expired_marker(
    conn: &Connection,
    company_id: &Uuid,
    marker_id: &Uuid,
    replacement_ticket_id: &Uuid,
    now: NaiveDateTime,
) -> Result<PrintMarker, DatabaseError> {
    let tx = conn.unchecked_transaction()?;

    let old_marker =
        get_marker(&tx, company_id, marker_id)?.ok_or_else(|| DatabaseError::NotFound {
            entity_type: "PrintMarker".into(),
            id: marker_id.to_string(),
        })?;

    let old_ticket = super::get_ticket(&tx, company_id, &old_marker.ticket_id)?.ok_or_else(|| {
        DatabaseError::NotFound {
            entity_type: "Ticket".into(),
            id: old_marker.ticket_id.to_string(),
        }
    })?;

    if derive_status(&old_ticket, now) != TicketStatus::Expired {
        return Err(DatabaseError::ConstraintViolation(
            "marker's ticket has not expired; nothing to replace".into(),
        ));
    }

    let replacement = super::get_ticket(&tx, company_id, replacement_ticket_id)?.ok_or_else(
        || DatabaseError::NotFound {
            entity_type: "Ticket".into(),
            id: replacement_ticket_id.to_string(),
        },
    )?;

    if replacement.is_archived {
        return Err(DatabaseError::ConstraintViolation(
            "replacement ticket is archived".into(),
        ));
    }
    if derive_status(&replacement, now) == TicketStatus::Expired {
        return Err(DatabaseError::ConstraintViolation(
            "replacement ticket is itself expired".into(),
        ));
    }

    super::set_ticket_archived(&tx, company_id, &old_ticket.id, true)?;
    delete_marker(&tx, company_id, marker_id)?;

    let new_marker = PrintMarker {
        id: Uuid::new_v4(),
        company_id: *company_id,
        print_id: old_marker.print_id,
        ticket_id: replacement.id,
        x_percent: old_marker.x_percent,
        y_percent: old_marker.y_percent,
        page_number: old_marker.page_number,
        label: replacement.ticket_no.clone(),
        created_at: now,
    };
    insert_marker(&tx, &new_marker)?;

    tx.commit()?;

    tracing::info!(
        old_ticket = %old_ticket.id,
        new_ticket = %replacement.id,
        marker = %new_marker.id,
        "Expired ticket replaced on print marker"
    );

    Ok(new_marker)
}

// Internal row type for PrintMarker mapping
struct MarkerRow {
    id: String,
    company_id: String,
    print_id: String,
    ticket_id: String,
    x_percent: f64,
    y_percent: f64,
    page_number: i64,
    label: String,
    created_at: String,
}

fn map_marker_row(row: &Row<'_>) -> rusqlite::Result<MarkerRow> {
    Ok(MarkerRow {
        id: row.get::<_, String>(0)?,
        company_id: row.get::<_, String>(1)?,
        print_id: row.get::<_, String>(2)?,
        ticket_id: row.get::<_, String>(3)?,
        x_percent: row.get::<_, f64>(4)?,
        y_percent: row.get::<_, f64>(5)?,
        page_number: row.get::<_, i64>(6)?,
        label: row.get::<_, String>(7)?,
        created_at: row.get::<_, String>(8)?,
    })
}

fn marker_from_row(row: MarkerRow) -> Result<PrintMarker, DatabaseError> {
    Ok(PrintMarker {
        id: parse_uuid(&row.id)?,
        company_id: parse_uuid(&row.company_id)?,
        print_id: parse_uuid(&row.print_id)?,
        ticket_id: parse_uuid(&row.ticket_id)?,
        x_percent: row.x_percent,
        y_percent: row.y_percent,
        page_number: row.page_number,
        label: row.label,
        created_at: parse_datetime(&row.created_at),
    })
}
