//! Job domain — grouping tickets under a job number, completion, and the
//! pinned print the markup viewer opens.

use chrono::NaiveDateTime;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::{self, DatabaseError};
use crate::models::{Job, JobFilter, Print, TicketFilter};

#[derive(Debug, Clone, Deserialize)]
pub struct NewJob {
    pub job_number: String,
    pub name: String,
}

/// A job with the counts the job grid shows.
#[derive(Debug, Clone, Serialize)]
pub struct JobOverview {
    #[serde(flatten)]
    pub job: Job,
    pub ticket_count: usize,
    pub pinned_print: Option<Print>,
}

pub fn validate_new_job(new: &NewJob) -> Result<(), String> {
    if new.job_number.trim().is_empty() {
        return Err("Job number is required".into());
    }
    if new.name.trim().is_empty() {
        return Err("Job name is required".into());
    }
    if new.job_number.len() > 50 {
        return Err("Job number too long".into());
    }
    if new.name.len() > 200 {
        return Err("Job name too long".into());
    }
    Ok(())
}

pub fn create_job(
    conn: &Connection,
    company_id: &Uuid,
    new: NewJob,
    now: NaiveDateTime,
) -> Result<Job, DatabaseError> {
    let job = Job {
        id: Uuid::new_v4(),
        company_id: *company_id,
        job_number: new.job_number,
        name: new.name,
        is_complete: false,
        created_at: now,
    };
    db::insert_job(conn, &job)?;
    tracing::info!(job_id = %job.id, job_number = %job.job_number, "Job created");
    Ok(job)
}

/// Jobs with ticket counts and the pinned print, for the job grid.
pub fn fetch_job_overviews(
    conn: &Connection,
    company_id: &Uuid,
    filter: &JobFilter,
) -> Result<Vec<JobOverview>, DatabaseError> {
    let jobs = db::list_jobs(conn, company_id, filter)?;

    let mut overviews = Vec::with_capacity(jobs.len());
    for job in jobs {
        let tickets = db::list_tickets(
            conn,
            company_id,
            &TicketFilter { job_number: Some(job.job_number.clone()), ..Default::default() },
        )?;
        let pinned_print = db::pinned_print_for_job(conn, company_id, &job.id)?;
        overviews.push(JobOverview { job, ticket_count: tickets.len(), pinned_print });
    }
    Ok(overviews)
}
