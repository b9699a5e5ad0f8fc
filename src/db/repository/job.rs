use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::{Job, JobFilter};

use super::{fmt_datetime, parse_datetime, parse_uuid};

pub fn insert_job(conn: &Connection, job: &Job) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO jobs (id, company_id, job_number, name, is_complete, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            job.id.to_string(),
            job.company_id.to_string(),
            job.job_number,
            job.name,
            job.is_complete as i32,
            fmt_datetime(&job.created_at),
        ],
    )?;
    Ok(())
}

pub fn get_job(
    conn: &Connection,
    company_id: &Uuid,
    id: &Uuid,
) -> Result<Option<Job>, DatabaseError> {
    query_single_job(
        conn,
        "SELECT id, company_id, job_number, name, is_complete, created_at
         FROM jobs WHERE company_id = ?1 AND id = ?2",
        params![company_id.to_string(), id.to_string()],
    )
}

pub fn get_job_by_number(
    conn: &Connection,
    company_id: &Uuid,
    job_number: &str,
) -> Result<Option<Job>, DatabaseError> {
    query_single_job(
        conn,
        "SELECT id, company_id, job_number, name, is_complete, created_at
         FROM jobs WHERE company_id = ?1 AND job_number = ?2",
        params![company_id.to_string(), job_number],
    )
}

pub fn list_jobs(
    conn: &Connection,
    company_id: &Uuid,
    filter: &JobFilter,
) -> Result<Vec<Job>, DatabaseError> {
    let mut sql = String::from(
        "SELECT id, company_id, job_number, name, is_complete, created_at
         FROM jobs WHERE company_id = ?1",
    );
    let mut args: Vec<Box<dyn rusqlite::types::ToSql>> =
        vec![Box::new(company_id.to_string())];

    if !filter.include_complete {
        sql.push_str(" AND is_complete = 0");
    }
    if let Some(ref number) = filter.job_number {
        args.push(Box::new(number.clone()));
        sql.push_str(&format!(" AND job_number = ?{}", args.len()));
    }
    sql.push_str(" ORDER BY created_at DESC");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(
        rusqlite::params_from_iter(args.iter().map(|a| a.as_ref())),
        |row| {
            Ok(JobRow {
                id: row.get::<_, String>(0)?,
                company_id: row.get::<_, String>(1)?,
                job_number: row.get::<_, String>(2)?,
                name: row.get::<_, String>(3)?,
                is_complete: row.get::<_, i32>(4)?,
                created_at: row.get::<_, String>(5)?,
            })
        },
    )?;

    let mut jobs = Vec::new();
    for row in rows {
        jobs.push(job_from_row(row?)?);
    }
    Ok(jobs)
}

pub fn update_job(conn: &Connection, job: &Job) -> Result<(), DatabaseError> {
    let rows = conn.execute(
        "UPDATE jobs SET job_number = ?3, name = ?4 WHERE company_id = ?1 AND id = ?2",
        params![
            job.company_id.to_string(),
            job.id.to_string(),
            job.job_number,
            job.name,
        ],
    )?;
    if rows == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Job".into(),
            id: job.id.to_string(),
        });
    }
    Ok(())
}

pub fn set_job_complete(
    conn: &Connection,
    company_id: &Uuid,
    id: &Uuid,
    complete: bool,
) -> Result<(), DatabaseError> {
    let rows = conn.execute(
        "UPDATE jobs SET is_complete = ?3 WHERE company_id = ?1 AND id = ?2",
        params![company_id.to_string(), id.to_string(), complete as i32],
    )?;
    if rows == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Job".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

/// Delete a job. Prints (and their markers) go with it via CASCADE; photos
/// keep their rows with job_id set NULL.
pub fn delete_job(conn: &Connection, company_id: &Uuid, id: &Uuid) -> Result<(), DatabaseError> {
    let rows = conn.execute(
        "DELETE FROM jobs WHERE company_id = ?1 AND id = ?2",
        params![company_id.to_string(), id.to_string()],
    )?;
    if rows == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Job".into(),
            id: id.to_string(),
        });
    }
    tracing::info!(job_id = %id, "Job deleted");
    Ok(())
}

fn query_single_job(
    conn: &Connection,
    sql: &str,
    args: impl rusqlite::Params,
) -> Result<Option<Job>, DatabaseError> {
    let mut stmt = conn.prepare(sql)?;
    let result = stmt.query_row(args, |row| {
        Ok(JobRow {
            id: row.get::<_, String>(0)?,
            company_id: row.get::<_, String>(1)?,
            job_number: row.get::<_, String>(2)?,
            name: row.get::<_, String>(3)?,
            is_complete: row.get::<_, i32>(4)?,
            created_at: row.get::<_, String>(5)?,
        })
    });

    match result {
        Ok(row) => Ok(Some(job_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

// Internal row type for Job mapping
struct JobRow {
    id: String,
    company_id: String,
    job_number: String,
    name: String,
    is_complete: i32,
    created_at: String,
}

fn job_from_row(row: JobRow) -> Result<Job, DatabaseError> {
    Ok(Job {
        id: parse_uuid(&row.id)?,
        company_id: parse_uuid(&row.company_id)?,
        job_number: row.job_number,
        name: row.name,
        is_complete: row.is_complete != 0,
        created_at: parse_datetime(&row.created_at),
    })
}
