//! Photo domain — site photograph upload with content-hash de-duplication
//! and EXIF capture dates.

use chrono::NaiveDateTime;
use rusqlite::Connection;
use thiserror::Error;
use uuid::Uuid;

use crate::db::{self, DatabaseError};
use crate::ingest::{self, detect_format, FileStore, ImportError, MAX_UPLOAD_SIZE};
use crate::models::Photo;

#[derive(Error, Debug)]
pub enum PhotoError {
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Outcome of a photo upload: a fresh row, or the existing row when the
/// exact same bytes were already uploaded for this company.
#[derive(Debug)]
pub enum UploadOutcome {
    Created(Photo),
    Duplicate(Photo),
}

impl UploadOutcome {
    pub fn photo(&self) -> &Photo {
        match self {
            Self::Created(p) | Self::Duplicate(p) => p,
        }
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate(_))
    }
}

/// Store a site photo, de-duplicated by content hash.
///
/// Uploading the same bytes twice is routine in the field (spotty coverage,
/// retried syncs), so a duplicate is answered with the existing row instead
/// of an error. The capture date comes from EXIF when the camera stamped it.
pub fn upload_photo(
    conn: &Connection,
    store: &FileStore,
    company_id: &Uuid,
    job_id: Option<Uuid>,
    ticket_id: Option<Uuid>,
    original_name: &str,
    bytes: &[u8],
    now: NaiveDateTime,
) -> Result<UploadOutcome, PhotoError> {
    if bytes.is_empty() {
        return Err(PhotoError::Validation("Uploaded file is empty".into()));
    }
    if bytes.len() as u64 > MAX_UPLOAD_SIZE {
        return Err(ImportError::FileTooLarge {
            size: bytes.len() as u64,
            max: MAX_UPLOAD_SIZE,
        }
        .into());
    }

    let format = detect_format(bytes);
    if !format.is_image() {
        return Err(ImportError::UnsupportedFormat(format!(
            "{original_name}: photos must be an image, got {}",
            format.mime_type()
        ))
        .into());
    }

    if let Some(job_id) = job_id {
        if db::get_job(conn, company_id, &job_id)?.is_none() {
            return Err(PhotoError::Validation(format!("Unknown job: {job_id}")));
        }
    }
    if let Some(ticket_id) = ticket_id {
        if db::get_ticket(conn, company_id, &ticket_id)?.is_none() {
            return Err(PhotoError::Validation(format!("Unknown ticket: {ticket_id}")));
        }
    }

    let hash = ingest::content_hash(bytes);
    if let Some(existing) = db::get_photo_by_hash(conn, company_id, &hash)? {
        tracing::debug!(photo_id = %existing.id, "Duplicate photo upload answered with existing row");
        return Ok(UploadOutcome::Duplicate(existing));
    }

    let taken_at = ingest::exif::read_taken_at(bytes);
    let stored = store.store(bytes, format.extension())?;

    let photo = Photo {
        id: Uuid::new_v4(),
        company_id: *company_id,
        job_id,
        ticket_id,
        file_name: original_name.to_string(),
        url: stored.url,
        content_hash: stored.content_hash,
        taken_at,
        uploaded_at: now,
    };
    db::insert_photo(conn, &photo)?;

    tracing::info!(photo_id = %photo.id, "Photo uploaded");
    Ok(UploadOutcome::Created(photo))
}
