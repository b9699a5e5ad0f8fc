//! Stale-render cancellation.
//!
//! Rapid page flipping must never queue renders that finish out of order and
//! overwrite a newer page. Every render request takes a generation ticket;
//! bumping the generation (new request, document swap, viewer teardown)
//! invalidates every older ticket, and a stale ticket's result is dropped
//! instead of delivered.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::{PdfPageRenderer, RenderError, RenderOptions};

/// Shared generation counter for one viewer's render requests.
#[derive(Clone, Default)]
pub struct RenderQueue {
    generation: Arc<AtomicU64>,
}

impl RenderQueue {
    pub fn new() -> Self {
        Self { generation: Arc::new(AtomicU64::new(0)) }
    }

    /// Start a new render request, superseding every outstanding one.
    pub fn begin(&self) -> RenderTicket {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        RenderTicket { generation, counter: Arc::clone(&self.generation) }
    }

    /// Invalidate all outstanding tickets without starting a new request.
    /// Called on viewer teardown.
    pub fn cancel_all(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    /// Render one page on the blocking pool, honoring cancellation.
    ///
    /// Returns `Ok(None)` when the ticket was superseded, whether before the
    /// render started or while it ran. The caller treats `None` as "ignore,
    /// a newer request owns the surface".
    pub async fn render_page(
        &self,
        ticket: &RenderTicket,
        renderer: Arc<dyn PdfPageRenderer>,
        pdf_bytes: Vec<u8>,
        page_index: usize,
        options: RenderOptions,
    ) -> Result<Option<Vec<u8>>, RenderError> {
        if !ticket.is_current() {
            return Ok(None);
        }

        let rendered = tokio::task::spawn_blocking(move || {
            renderer.render_page(&pdf_bytes, page_index, &options)
        })
        .await
        .map_err(|e| RenderError::TaskJoin(e.to_string()))??;

        if !ticket.is_current() {
            tracing::debug!(page = page_index, "Discarding superseded page render");
            return Ok(None);
        }

        Ok(Some(rendered))
    }
}

/// Generation token for one render request.
pub struct RenderTicket {
    generation: u64,
    counter: Arc<AtomicU64>,
}

impl RenderTicket {
    /// Still the newest request?
    pub fn is_current(&self) -> bool {
        self.counter.load(Ordering::SeqCst) == self.generation
    }
}
