use std::str::FromStr;

use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::enums::MemberRole;
use crate::models::Member;

use super::{fmt_datetime, parse_datetime, parse_uuid};

pub fn insert_member(conn: &Connection, member: &Member) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO members (id, company_id, display_name, email, role, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            member.id.to_string(),
            member.company_id.to_string(),
            member.display_name,
            member.email,
            member.role.as_str(),
            fmt_datetime(&member.created_at),
        ],
    )?;
    Ok(())
}

/// Fetch a member only if it belongs to the given company.
///
/// This is the tenant check the identity middleware runs on every request:
/// a valid member id from another company must come back `None`.
pub fn get_member(
    conn: &Connection,
    company_id: &Uuid,
    id: &Uuid,
) -> Result<Option<Member>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, company_id, display_name, email, role, created_at
         FROM members WHERE company_id = ?1 AND id = ?2",
    )?;

    let result = stmt.query_row(params![company_id.to_string(), id.to_string()], |row| {
        Ok(MemberRow {
            id: row.get::<_, String>(0)?,
            company_id: row.get::<_, String>(1)?,
            display_name: row.get::<_, String>(2)?,
            email: row.get::<_, String>(3)?,
            role: row.get::<_, String>(4)?,
            created_at: row.get::<_, String>(5)?,
        })
    });

    match result {
        Ok(row) => Ok(Some(member_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn list_members(conn: &Connection, company_id: &Uuid) -> Result<Vec<Member>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, company_id, display_name, email, role, created_at
         FROM members WHERE company_id = ?1 ORDER BY display_name",
    )?;

    let rows = stmt.query_map(params![company_id.to_string()], |row| {
        Ok(MemberRow {
            id: row.get::<_, String>(0)?,
            company_id: row.get::<_, String>(1)?,
            display_name: row.get::<_, String>(2)?,
            email: row.get::<_, String>(3)?,
            role: row.get::<_, String>(4)?,
            created_at: row.get::<_, String>(5)?,
        })
    })?;

    let mut members = Vec::new();
    for row in rows {
        members.push(member_from_row(row?)?);
    }
    Ok(members)
}

pub fn update_member(conn: &Connection, member: &Member) -> Result<(), DatabaseError> {
    let rows = conn.execute(
        "UPDATE members SET display_name = ?3, email = ?4, role = ?5
         WHERE company_id = ?1 AND id = ?2",
        params![
            member.company_id.to_string(),
            member.id.to_string(),
            member.display_name,
            member.email,
            member.role.as_str(),
        ],
    )?;
    if rows == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Member".into(),
            id: member.id.to_string(),
        });
    }
    Ok(())
}

pub fn delete_member(
    conn: &Connection,
    company_id: &Uuid,
    id: &Uuid,
) -> Result<(), DatabaseError> {
    let rows = conn.execute(
        "DELETE FROM members WHERE company_id = ?1 AND id = ?2",
        params![company_id.to_string(), id.to_string()],
    )?;
    if rows == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Member".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

// Internal row type for Member mapping
struct MemberRow {
    id: String,
    company_id: String,
    display_name: String,
    email: String,
    role: String,
    created_at: String,
}

fn member_from_row(row: MemberRow) -> Result<Member, DatabaseError> {
    Ok(Member {
        id: parse_uuid(&row.id)?,
        company_id: parse_uuid(&row.company_id)?,
        display_name: row.display_name,
        email: row.email,
        role: MemberRole::from_str(&row.role)?,
        created_at: parse_datetime(&row.created_at),
    })
}
