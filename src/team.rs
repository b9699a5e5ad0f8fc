//! Team domain — company registration (tenant bootstrap) and crew accounts.

use chrono::NaiveDateTime;
use rusqlite::Connection;
use serde::Deserialize;
use uuid::Uuid;

use crate::db::{self, DatabaseError};
use crate::models::enums::MemberRole;
use crate::models::{Company, Member};

#[derive(Debug, Clone, Deserialize)]
pub struct NewCompany {
    pub name: String,
    pub owner_name: String,
    pub owner_email: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewMember {
    pub display_name: String,
    pub email: String,
    pub role: MemberRole,
}

pub fn validate_new_company(new: &NewCompany) -> Result<(), String> {
    if new.name.trim().is_empty() {
        return Err("Company name is required".into());
    }
    if new.name.len() > 200 {
        return Err("Company name too long".into());
    }
    validate_member_fields(&new.owner_name, &new.owner_email)
}

pub fn validate_new_member(new: &NewMember) -> Result<(), String> {
    validate_member_fields(&new.display_name, &new.email)
}

fn validate_member_fields(display_name: &str, email: &str) -> Result<(), String> {
    if display_name.trim().is_empty() {
        return Err("Display name is required".into());
    }
    if display_name.len() > 100 {
        return Err("Display name too long".into());
    }
    // The identity provider owns real address verification; this only keeps
    // obvious garbage out of the roster.
    if !email.contains('@') || email.len() > 254 {
        return Err(format!("Invalid email: {email}"));
    }
    Ok(())
}

/// Register a company together with its first (owner) account.
///
/// One transaction: a company without an owner is unreachable, so neither
/// row lands without the other.
pub fn register_company(
    conn: &Connection,
    new: NewCompany,
    now: NaiveDateTime,
) -> Result<(Company, Member), DatabaseError> {
    let tx = conn.unchecked_transaction()?;

    let company = Company {
        id: Uuid::new_v4(),
        name: new.name,
        created_at: now,
    };
    db::insert_company(&tx, &company)?;

    let owner = Member {
        id: Uuid::new_v4(),
        company_id: company.id,
        display_name: new.owner_name,
        email: new.owner_email,
        role: MemberRole::Owner,
        created_at: now,
    };
    db::insert_member(&tx, &owner)?;

    tx.commit()?;
    tracing::info!(company_id = %company.id, "Company registered");
    Ok((company, owner))
}

pub fn add_member(
    conn: &Connection,
    company_id: &Uuid,
    new: NewMember,
    now: NaiveDateTime,
) -> Result<Member, DatabaseError> {
    let member = Member {
        id: Uuid::new_v4(),
        company_id: *company_id,
        display_name: new.display_name,
        email: new.email,
        role: new.role,
        created_at: now,
    };
    db::insert_member(conn, &member)?;
    tracing::info!(member_id = %member.id, role = member.role.as_str(), "Member added");
    Ok(member)
}
