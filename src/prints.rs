//! Print domain — blueprint upload, pinning, markers, and the atomic
//! replace-expired flow.

use chrono::NaiveDateTime;
use rusqlite::Connection;
use thiserror::Error;
use uuid::Uuid;

use crate::db::{self, DatabaseError};
use crate::ingest::{detect_format, FileStore, ImportError, MAX_UPLOAD_SIZE};
use crate::models::{MarkerFilter, Print, PrintMarker};
use crate::render::{PdfPageRenderer, RenderError};
use crate::viewer::MarkerDraft;

#[derive(Error, Debug)]
pub enum PrintError {
    #[error("{0}")]
    Validation(String),

    #[error("Print not found: {0}")]
    NotFound(Uuid),

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Store an uploaded blueprint and register it on the job.
///
/// The file is sniffed by magic bytes; PDFs get their page count from the
/// renderer so the viewer can paginate, raster images are a single page.
/// Nothing is written to the database until the blob write succeeded.
pub fn upload_print(
    conn: &Connection,
    store: &FileStore,
    renderer: &dyn PdfPageRenderer,
    company_id: &Uuid,
    job_id: &Uuid,
    original_name: &str,
    bytes: &[u8],
    now: NaiveDateTime,
) -> Result<Print, PrintError> {
    if bytes.is_empty() {
        return Err(PrintError::Validation("Uploaded file is empty".into()));
    }
    if bytes.len() as u64 > MAX_UPLOAD_SIZE {
        return Err(ImportError::FileTooLarge {
            size: bytes.len() as u64,
            max: MAX_UPLOAD_SIZE,
        }
        .into());
    }

    let job = db::get_job(conn, company_id, job_id)?
        .ok_or_else(|| PrintError::Validation(format!("Unknown job: {job_id}")))?;

    let format = detect_format(bytes);
    let kind = format.print_kind().ok_or_else(|| {
        ImportError::UnsupportedFormat(format!(
            "{original_name}: prints must be a PDF or an image, got {}",
            format.mime_type()
        ))
    })?;

    let page_count = match kind {
        crate::models::enums::PrintKind::Pdf => renderer.page_count(bytes)? as i64,
        crate::models::enums::PrintKind::Image => 1,
    };

    let stored = store.store(bytes, format.extension())?;

    let print = Print {
        id: Uuid::new_v4(),
        company_id: *company_id,
        job_id: job.id,
        file_name: original_name.to_string(),
        kind,
        url: stored.url,
        page_count,
        is_pinned: false,
        uploaded_at: now,
    };
    db::insert_print(conn, &print)?;

    tracing::info!(
        print_id = %print.id,
        job_id = %job.id,
        kind = kind.as_str(),
        pages = page_count,
        "Print uploaded"
    );
    Ok(print)
}

/// Markers for the page the viewer is showing.
pub fn markers_for_page(
    conn: &Connection,
    company_id: &Uuid,
    print_id: &Uuid,
    page_number: Option<i64>,
) -> Result<Vec<PrintMarker>, PrintError> {
    let print = db::get_print(conn, company_id, print_id)?
        .ok_or(PrintError::NotFound(*print_id))?;

    if let Some(page) = page_number {
        if page < 1 || page > print.page_count {
            return Err(PrintError::Validation(format!(
                "Page {page} out of range (print has {} pages)",
                print.page_count
            )));
        }
    }

    Ok(db::list_markers_for_print(
        conn,
        company_id,
        print_id,
        &MarkerFilter { page_number },
    )?)
}

/// Persist a confirmed marker draft from the viewer.
///
/// The draft's percentages were computed against the displayed bounding box;
/// here they are only range-checked, the ticket is verified to exist in the
/// tenant and to be active, and the page must exist on the print.
pub fn place_marker(
    conn: &Connection,
    company_id: &Uuid,
    print_id: &Uuid,
    draft: &MarkerDraft,
    now: NaiveDateTime,
) -> Result<PrintMarker, PrintError> {
    let print = db::get_print(conn, company_id, print_id)?
        .ok_or(PrintError::NotFound(*print_id))?;

    if draft.page_number < 1 || draft.page_number > print.page_count {
        return Err(PrintError::Validation(format!(
            "Page {} out of range (print has {} pages)",
            draft.page_number, print.page_count
        )));
    }

    let ticket = db::get_ticket(conn, company_id, &draft.ticket_id)?
        .ok_or_else(|| PrintError::Validation(format!("Unknown ticket: {}", draft.ticket_id)))?;
    if ticket.is_archived {
        return Err(PrintError::Validation(format!(
            "Ticket {} is archived and cannot be pinned",
            ticket.ticket_no
        )));
    }

    let label = if draft.label.trim().is_empty() {
        ticket.ticket_no.clone()
    } else {
        draft.label.clone()
    };

    let marker = PrintMarker {
        id: Uuid::new_v4(),
        company_id: *company_id,
        print_id: print.id,
        ticket_id: ticket.id,
        x_percent: draft.x_percent,
        y_percent: draft.y_percent,
        page_number: draft.page_number,
        label,
        created_at: now,
    };
    db::insert_marker(conn, &marker)?;
    Ok(marker)
}

/// Atomic replace of an expired ticket's pin; see
/// `db::repository::replace_expired_marker` for the transaction.
pub fn replace_expired(
    conn: &Connection,
    company_id: &Uuid,
    marker_id: &Uuid,
    replacement_ticket_id: &Uuid,
    now: NaiveDateTime,
) -> Result<PrintMarker, PrintError> {
    Ok(db::replace_expired_marker(
        conn,
        company_id,
        marker_id,
        replacement_ticket_id,
        now,
    )?)
}
