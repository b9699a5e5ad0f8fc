use std::str::FromStr;

use rusqlite::{params, Connection, Row};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::enums::PrintKind;
use crate::models::Print;

use super::{fmt_datetime, parse_datetime, parse_uuid};

const PRINT_COLUMNS: &str =
    "id, company_id, job_id, file_name, kind, url, page_count, is_pinned, uploaded_at";

pub fn insert_print(conn: &Connection, print: &Print) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO prints (id, company_id, job_id, file_name, kind, url, page_count, is_pinned, uploaded_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            print.id.to_string(),
            print.company_id.to_string(),
            print.job_id.to_string(),
            print.file_name,
            print.kind.as_str(),
            print.url,
            print.page_count,
            print.is_pinned as i32,
            fmt_datetime(&print.uploaded_at),
        ],
    )?;
    Ok(())
}

pub fn get_print(
    conn: &Connection,
    company_id: &Uuid,
    id: &Uuid,
) -> Result<Option<Print>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PRINT_COLUMNS} FROM prints WHERE company_id = ?1 AND id = ?2"
    ))?;

    let result = stmt.query_row(params![company_id.to_string(), id.to_string()], map_print_row);

    match result {
        Ok(row) => Ok(Some(print_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn list_prints_for_job(
    conn: &Connection,
    company_id: &Uuid,
    job_id: &Uuid,
) -> Result<Vec<Print>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PRINT_COLUMNS} FROM prints
         WHERE company_id = ?1 AND job_id = ?2 ORDER BY uploaded_at DESC"
    ))?;

    let rows = stmt.query_map(
        params![company_id.to_string(), job_id.to_string()],
        map_print_row,
    )?;

    let mut prints = Vec::new();
    for row in rows {
        prints.push(print_from_row(row?)?);
    }
    Ok(prints)
}

/// The pinned print is the markup surface the viewer opens for a job.
pub fn pinned_print_for_job(
    conn: &Connection,
    company_id: &Uuid,
    job_id: &Uuid,
) -> Result<Option<Print>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PRINT_COLUMNS} FROM prints
         WHERE company_id = ?1 AND job_id = ?2 AND is_pinned = 1"
    ))?;

    let result = stmt.query_row(
        params![company_id.to_string(), job_id.to_string()],
        map_print_row,
    );

    match result {
        Ok(row) => Ok(Some(print_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Pin one print for its job, unpinning any sibling first.
///
/// Runs in a transaction so the partial unique index on pinned prints never
/// sees two pins, and a failure leaves the previous pin in place.
pub fn pin_print(conn: &Connection, company_id: &Uuid, id: &Uuid) -> Result<(), DatabaseError> {
    let tx = conn.unchecked_transaction()?;

    let job_id: String = tx
        .query_row(
            "SELECT job_id FROM prints WHERE company_id = ?1 AND id = ?2",
            params![company_id.to_string(), id.to_string()],
            |row| row.get(0),
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => DatabaseError::NotFound {
                entity_type: "Print".into(),
                id: id.to_string(),
            },
            other => other.into(),
        })?;

    tx.execute(
        "UPDATE prints SET is_pinned = 0 WHERE company_id = ?1 AND job_id = ?2",
        params![company_id.to_string(), job_id],
    )?;
    tx.execute(
        "UPDATE prints SET is_pinned = 1 WHERE company_id = ?1 AND id = ?2",
        params![company_id.to_string(), id.to_string()],
    )?;

    tx.commit()?;
    Ok(())
}

/// Delete a print; its markers go with it via CASCADE.
pub fn delete_print(conn: &Connection, company_id: &Uuid, id: &Uuid) -> Result<(), DatabaseError> {
    let rows = conn.execute(
        "DELETE FROM prints WHERE company_id = ?1 AND id = ?2",
        params![company_id.to_string(), id.to_string()],
    )?;
    if rows == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Print".into(),
            id: id.to_string(),
        });
    }
    tracing::info!(print_id = %id, "Print deleted with its markers");
    Ok(())
}

// Internal row type for Print mapping
struct PrintRow {
    id: String,
    company_id: String,
    job_id: String,
    file_name: String,
    kind: String,
    url: String,
    page_count: i64,
    is_pinned: i32,
    uploaded_at: String,
}

fn map_print_row(row: &Row<'_>) -> rusqlite::Result<PrintRow> {
    Ok(PrintRow {
        id: row.get::<_, String>(0)?,
        company_id: row.get::<_, String>(1)?,
        job_id: row.get::<_, String>(2)?,
        file_name: row.get::<_, String>(3)?,
        kind: row.get::<_, String>(4)?,
        url: row.get::<_, String>(5)?,
        page_count: row.get::<_, i64>(6)?,
        is_pinned: row.get::<_, i32>(7)?,
        uploaded_at: row.get::<_, String>(8)?,
    })
}

fn print_from_row(row: PrintRow) -> Result<Print, DatabaseError> {
    Ok(Print {
        id: parse_uuid(&row.id)?,
        company_id: parse_uuid(&row.company_id)?,
        job_id: parse_uuid(&row.job_id)?,
        file_name: row.file_name,
        kind: PrintKind::from_str(&row.kind)?,
        url: row.url,
        page_count: row.page_count,
        is_pinned: row.is_pinned != 0,
        uploaded_at: parse_datetime(&row.uploaded_at),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_memory_database;
    use crate::db::repository::{insert_company, insert_job};
    use crate::models::{Company, Job};
    use chrono::NaiveDate;

    fn now() -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
    }

    fn seed_job(conn: &Connection) -> (Uuid, Uuid) {
        let company = Company {
            id: Uuid::new_v4(),
            name: "Acme Underground".into(),
            created_at: now(),
        };
        insert_company(conn, &company).unwrap();
        let job = Job {
            id: Uuid::new_v4(),
            company_id: company.id,
            job_number: "J-100".into(),
            name: "Main St relocation".into(),
            is_complete: false,
            created_at: now(),
        };
        insert_job(conn, &job).unwrap();
        (company.id, job.id)
    }

    fn print(company_id: Uuid, job_id: Uuid, file_name: &str) -> Print {
        Print {
            id: Uuid::new_v4(),
            company_id,
            job_id,
            file_name: file_name.into(),
            kind: PrintKind::Pdf,
            url: format!("/files/{file_name}"),
            page_count: 3,
            is_pinned: false,
            uploaded_at: now(),
        }
    }

    #[test]
    fn insert_and_get_round_trip() {
        let conn = open_memory_database().unwrap();
        let (company_id, job_id) = seed_job(&conn);
        let p = print(company_id, job_id, "site.pdf");
        insert_print(&conn, &p).unwrap();

        let fetched = get_print(&conn, &company_id, &p.id).unwrap().unwrap();
        assert_eq!(fetched.file_name, "site.pdf");
        assert_eq!(fetched.kind, PrintKind::Pdf);
        assert_eq!(fetched.page_count, 3);
        assert!(!fetched.is_pinned);
    }

    #[test]
    fn pin_swaps_within_job() {
        let conn = open_memory_database().unwrap();
        let (company_id, job_id) = seed_job(&conn);
        let first = print(company_id, job_id, "rev-a.pdf");
        let second = print(company_id, job_id, "rev-b.pdf");
        insert_print(&conn, &first).unwrap();
        insert_print(&conn, &second).unwrap();

        pin_print(&conn, &company_id, &first.id).unwrap();
        assert_eq!(
            pinned_print_for_job(&conn, &company_id, &job_id).unwrap().unwrap().id,
            first.id
        );

        // Pinning the second unpins the first in the same transaction.
        pin_print(&conn, &company_id, &second.id).unwrap();
        let pinned = pinned_print_for_job(&conn, &company_id, &job_id).unwrap().unwrap();
        assert_eq!(pinned.id, second.id);
        assert!(!get_print(&conn, &company_id, &first.id).unwrap().unwrap().is_pinned);
    }

    #[test]
    fn pin_missing_print_errors() {
        let conn = open_memory_database().unwrap();
        let (company_id, _) = seed_job(&conn);
        let err = pin_print(&conn, &company_id, &Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound { .. }));
    }

    #[test]
    fn list_is_job_scoped() {
        let conn = open_memory_database().unwrap();
        let (company_id, job_id) = seed_job(&conn);
        insert_print(&conn, &print(company_id, job_id, "site.pdf")).unwrap();

        let listed = list_prints_for_job(&conn, &company_id, &job_id).unwrap();
        assert_eq!(listed.len(), 1);
        assert!(list_prints_for_job(&conn, &company_id, &Uuid::new_v4())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn no_pinned_print_returns_none() {
        let conn = open_memory_database().unwrap();
        let (company_id, job_id) = seed_job(&conn);
        insert_print(&conn, &print(company_id, job_id, "site.pdf")).unwrap();
        assert!(pinned_print_for_job(&conn, &company_id, &job_id).unwrap().is_none());
    }
}
