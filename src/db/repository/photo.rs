use rusqlite::{params, Connection, Row};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::{Photo, PhotoFilter};

use super::{fmt_datetime, parse_datetime, parse_uuid};

const PHOTO_COLUMNS: &str =
    "id, company_id, job_id, ticket_id, file_name, url, content_hash, taken_at, uploaded_at";

pub fn insert_photo(conn: &Connection, photo: &Photo) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO photos (id, company_id, job_id, ticket_id, file_name, url, content_hash, taken_at, uploaded_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            photo.id.to_string(),
            photo.company_id.to_string(),
            photo.job_id.map(|id| id.to_string()),
            photo.ticket_id.map(|id| id.to_string()),
            photo.file_name,
            photo.url,
            photo.content_hash,
            photo.taken_at.as_ref().map(fmt_datetime),
            fmt_datetime(&photo.uploaded_at),
        ],
    )?;
    Ok(())
}

pub fn get_photo(
    conn: &Connection,
    company_id: &Uuid,
    id: &Uuid,
) -> Result<Option<Photo>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PHOTO_COLUMNS} FROM photos WHERE company_id = ?1 AND id = ?2"
    ))?;

    let result = stmt.query_row(params![company_id.to_string(), id.to_string()], map_photo_row);

    match result {
        Ok(row) => Ok(Some(photo_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Duplicate-upload check: same bytes for the same company come back here.
pub fn get_photo_by_hash(
    conn: &Connection,
    company_id: &Uuid,
    content_hash: &str,
) -> Result<Option<Photo>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PHOTO_COLUMNS} FROM photos WHERE company_id = ?1 AND content_hash = ?2 LIMIT 1"
    ))?;

    let result = stmt.query_row(params![company_id.to_string(), content_hash], map_photo_row);

    match result {
        Ok(row) => Ok(Some(photo_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn list_photos(
    conn: &Connection,
    company_id: &Uuid,
    filter: &PhotoFilter,
) -> Result<Vec<Photo>, DatabaseError> {
    let mut sql = format!("SELECT {PHOTO_COLUMNS} FROM photos WHERE company_id = ?1");
    let mut args: Vec<Box<dyn rusqlite::types::ToSql>> =
        vec![Box::new(company_id.to_string())];

    if let Some(job_id) = filter.job_id {
        args.push(Box::new(job_id.to_string()));
        sql.push_str(&format!(" AND job_id = ?{}", args.len()));
    }
    if let Some(ticket_id) = filter.ticket_id {
        args.push(Box::new(ticket_id.to_string()));
        sql.push_str(&format!(" AND ticket_id = ?{}", args.len()));
    }
    sql.push_str(" ORDER BY COALESCE(taken_at, uploaded_at) DESC");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(
        rusqlite::params_from_iter(args.iter().map(|a| a.as_ref())),
        map_photo_row,
    )?;

    let mut photos = Vec::new();
    for row in rows {
        photos.push(photo_from_row(row?)?);
    }
    Ok(photos)
}

pub fn delete_photo(
    conn: &Connection,
    company_id: &Uuid,
    id: &Uuid,
) -> Result<(), DatabaseError> {
    let rows = conn.execute(
        "DELETE FROM photos WHERE company_id = ?1 AND id = ?2",
        params![company_id.to_string(), id.to_string()],
    )?;
    if rows == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Photo".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

// Internal row type for Photo mapping
struct PhotoRow {
    id: String,
    company_id: String,
    job_id: Option<String>,
    ticket_id: Option<String>,
    file_name: String,
    url: String,
    content_hash: String,
    taken_at: Option<String>,
    uploaded_at: String,
}

fn map_photo_row(row: &Row<'_>) -> rusqlite::Result<PhotoRow> {
    Ok(PhotoRow {
        id: row.get::<_, String>(0)?,
        company_id: row.get::<_, String>(1)?,
        job_id: row.get::<_, Option<String>>(2)?,
        ticket_id: row.get::<_, Option<String>>(3)?,
        file_name: row.get::<_, String>(4)?,
        url: row.get::<_, String>(5)?,
        content_hash: row.get::<_, String>(6)?,
        taken_at: row.get::<_, Option<String>>(7)?,
        uploaded_at: row.get::<_, String>(8)?,
    })
}

fn photo_from_row(row: PhotoRow) -> Result<Photo, DatabaseError> {
    Ok(Photo {
        id: parse_uuid(&row.id)?,
        company_id: parse_uuid(&row.company_id)?,
        job_id: row.job_id.as_deref().map(parse_uuid).transpose()?,
        ticket_id: row.ticket_id.as_deref().map(parse_uuid).transpose()?,
        file_name: row.file_name,
        url: row.url,
        content_hash: row.content_hash,
        taken_at: row.taken_at.as_deref().map(parse_datetime),
        uploaded_at: parse_datetime(&row.uploaded_at),
    })
}
