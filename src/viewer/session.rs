//! Per-view viewer state.
//!
//! One `ViewerSession` per opened print, owned by the view that shows it.
//! It replaces any notion of a shared "current document" cache: page number,
//! transform, placement machine and render generation all live here, and
//! `close()` tears the session down, cancelling whatever render is still in
//! flight.

use thiserror::Error;
use uuid::Uuid;

use crate::models::Print;
use crate::render::{RenderQueue, RenderTicket};

use super::placement::MarkerPlacement;
use super::viewport::Viewport;

#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("Page {page} out of range (print has {count} pages)")]
    PageOutOfRange { page: i64, count: i64 },

    #[error("Viewer session is closed")]
    SessionClosed,
}

pub struct ViewerSession {
    print_id: Uuid,
    page_count: i64,
    page_number: i64,
    pub viewport: Viewport,
    pub placement: MarkerPlacement,
    render_queue: RenderQueue,
    closed: bool,
}

impl ViewerSession {
    /// Open a viewer on a print, starting at page 1.
    pub fn open(print: &Print) -> Self {
        Self {
            print_id: print.id,
            page_count: print.page_count,
            page_number: 1,
            viewport: Viewport::new(),
            placement: MarkerPlacement::new(),
            render_queue: RenderQueue::new(),
            closed: false,
        }
    }

    pub fn print_id(&self) -> Uuid {
        self.print_id
    }

    pub fn page_number(&self) -> i64 {
        self.page_number
    }

    pub fn page_count(&self) -> i64 {
        self.page_count
    }

    /// 0-based index of the current page, for the renderer.
    pub fn page_index(&self) -> usize {
        (self.page_number - 1) as usize
    }

    pub fn render_queue(&self) -> &RenderQueue {
        &self.render_queue
    }

    /// Flip to a 1-based page. Supersedes any in-flight render and returns
    /// the ticket for the new page's render.
    pub fn set_page(&mut self, page_number: i64) -> Result<RenderTicket, ViewerError> {
        if self.closed {
            return Err(ViewerError::SessionClosed);
        }
        if page_number < 1 || page_number > self.page_count {
            return Err(ViewerError::PageOutOfRange {
                page: page_number,
                count: self.page_count,
            });
        }
        self.page_number = page_number;
        Ok(self.render_queue.begin())
    }

    /// Tear the session down: cancel pending renders and refuse further work.
    pub fn close(&mut self) {
        if !self.closed {
            self.render_queue.cancel_all();
            self.closed = true;
            tracing::debug!(print_id = %self.print_id, "Viewer session closed");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl Drop for ViewerSession {
    fn drop(&mut self) {
        self.close();
    }
}
