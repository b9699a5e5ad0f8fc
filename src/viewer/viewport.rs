//! Pan/zoom transform for the markup surface.
//!
//! The viewport maps content coordinates (the rendered page at natural size)
//! to screen coordinates: `screen = content * scale + offset`. All math is
//! pure; the UI feeds pointer events in and applies the resulting transform.

// ═══════════════════════════════════════════════════════════
// Constants
// ═══════════════════════════════════════════════════════════

/// Scale clamp: 0.5% to 4000%. Outside this range renders degenerate or the
/// math starts losing precision.
pub const MIN_SCALE: f64 = 0.005;
pub const MAX_SCALE: f64 = 40.0;

/// Wheel delta → exponential zoom factor mapping.
pub const WHEEL_ZOOM_RATE: f64 = 0.002;

/// Pointer travel below this is a click, not a drag. Keeps pin placement and
/// panning from fighting over the same gesture.
pub const DRAG_THRESHOLD_PX: f64 = 3.0;

/// Padding around the document for auto-fit.
pub const FIT_PADDING_PX: f64 = 24.0;

// ═══════════════════════════════════════════════════════════
// Geometry primitives
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// The rendered surface's bounding box in screen coordinates, as reported by
/// the client at click time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl SurfaceRect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    /// Percentage position of a screen point inside this box.
    ///
    /// Returns `None` for points outside the box (no marker may be created
    /// there) or for a degenerate box. Edges are inclusive.
    pub fn percent_at(&self, point: Point) -> Option<(f64, f64)> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return None;
        }
        let x = (point.x - self.left) / self.width * 100.0;
        let y = (point.y - self.top) / self.height * 100.0;
        if (0.0..=100.0).contains(&x) && (0.0..=100.0).contains(&y) {
            Some((x, y))
        } else {
            None
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Viewport transform
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { scale: 1.0, offset_x: 0.0, offset_y: 0.0 }
    }
}

impl Viewport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn screen_to_content(&self, p: Point) -> Point {
        Point::new((p.x - self.offset_x) / self.scale, (p.y - self.offset_y) / self.scale)
    }

    pub fn content_to_screen(&self, p: Point) -> Point {
        Point::new(p.x * self.scale + self.offset_x, p.y * self.scale + self.offset_y)
    }

    /// Accumulate a drag delta into the translation.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.offset_x += dx;
        self.offset_y += dy;
    }

    /// Zoom by a wheel delta, anchored at the cursor.
    ///
    /// Negative delta (wheel up) zooms in. The content point under the
    /// cursor before the zoom stays under the cursor after it.
    pub fn zoom_at(&mut self, cursor: Point, wheel_delta: f64) {
        let factor = (-wheel_delta * WHEEL_ZOOM_RATE).exp();
        self.set_scale_about(cursor, self.scale * factor);
    }

    /// Set an absolute scale, keeping `anchor`'s content point fixed.
    pub fn set_scale_about(&mut self, anchor: Point, new_scale: f64) {
        let new_scale = new_scale.clamp(MIN_SCALE, MAX_SCALE);
        // Content point currently under the anchor, from the pre-zoom
        // transform; then solve the new translation that keeps it there.
        let content = self.screen_to_content(anchor);
        self.offset_x = anchor.x - content.x * new_scale;
        self.offset_y = anchor.y - content.y * new_scale;
        self.scale = new_scale;
    }

    /// Fit the full document inside the viewport minus padding, centered.
    /// Used on initial load and explicit reset.
    pub fn fit(&mut self, content: Size, viewport: Size, padding: f64) {
        let usable_w = (viewport.width - 2.0 * padding).max(1.0);
        let usable_h = (viewport.height - 2.0 * padding).max(1.0);
        let scale = (usable_w / content.width)
            .min(usable_h / content.height)
            .clamp(MIN_SCALE, MAX_SCALE);

        self.scale = scale;
        self.offset_x = (viewport.width - content.width * scale) / 2.0;
        self.offset_y = (viewport.height - content.height * scale) / 2.0;
    }

    /// Counter-scale for pin glyphs so they hold a near constant screen size
    /// across zoom levels.
    pub fn pin_scale(&self) -> f64 {
        1.0 / self.scale.sqrt()
    }

    /// The surface bounding box a page of the given natural size occupies on
    /// screen under this transform.
    pub fn surface_rect(&self, content: Size) -> SurfaceRect {
        SurfaceRect::new(
            self.offset_x,
            self.offset_y,
            content.width * self.scale,
            content.height * self.scale,
        )
    }
}

// ═══════════════════════════════════════════════════════════
// Drag vs click disambiguation
// ═══════════════════════════════════════════════════════════

/// What a completed pointer gesture was.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    Click(Point),
    Drag,
}

/// Tracks one pointer gesture from press to release.
///
/// Movement below `DRAG_THRESHOLD_PX` total displacement is still a click;
/// beyond it the gesture becomes a drag and `update` starts yielding pan
/// deltas.
#[derive(Debug)]
pub struct DragTracker {
    origin: Point,
    last: Point,
    dragging: bool,
}

impl DragTracker {
    pub fn press(at: Point) -> Self {
        Self { origin: at, last: at, dragging: false }
    }

    /// Feed a pointer-move. Returns the pan delta to apply, or `None` while
    /// the gesture is still within click tolerance.
    pub fn update(&mut self, at: Point) -> Option<(f64, f64)> {
        if !self.dragging {
            let dx = at.x - self.origin.x;
            let dy = at.y - self.origin.y;
            if (dx * dx + dy * dy).sqrt() <= DRAG_THRESHOLD_PX {
                self.last = at;
                return None;
            }
            self.dragging = true;
            // First delta covers the full travel so no movement is lost.
            self.last = at;
            return Some((dx, dy));
        }
        let delta = (at.x - self.last.x, at.y - self.last.y);
        self.last = at;
        Some(delta)
    }

    pub fn release(self, at: Point) -> Gesture {
        if self.dragging {
            Gesture::Drag
        } else {
            Gesture::Click(at)
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════
