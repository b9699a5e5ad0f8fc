use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::Company;

use super::{fmt_datetime, parse_datetime, parse_uuid};

pub fn insert_company(conn: &Connection, company: &Company) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO companies (id, name, created_at) VALUES (?1, ?2, ?3)",
        params![
            company.id.to_string(),
            company.name,
            fmt_datetime(&company.created_at),
        ],
    )?;
    Ok(())
}

pub fn get_company(conn: &Connection, id: &Uuid) -> Result<Option<Company>, DatabaseError> {
    let result = conn.query_row(
        "SELECT id, name, created_at FROM companies WHERE id = ?1",
        params![id.to_string()],
        |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        },
    );

    match result {
        Ok((id, name, created_at)) => Ok(Some(Company {
            id: parse_uuid(&id)?,
            name,
            created_at: parse_datetime(&created_at),
        })),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn rename_company(conn: &Connection, id: &Uuid, name: &str) -> Result<(), DatabaseError> {
    let rows = conn.execute(
        "UPDATE companies SET name = ?2 WHERE id = ?1",
        params![id.to_string(), name],
    )?;
    if rows == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Company".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}
