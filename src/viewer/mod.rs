//! Blueprint markup viewer core.
//!
//! Client-independent math and state for the pan/zoom/pin-drop surface: the
//! viewport transform, the placement state machine, and the per-view session
//! that owns them. The UI layer feeds pointer events in and renders whatever
//! comes back; nothing here touches the network or the database.

pub mod placement;
pub mod session;
pub mod viewport;

pub use placement::{ClickOutcome, MarkerDraft, MarkerPlacement, PendingPin, PlacementState};
pub use session::{ViewerError, ViewerSession};
pub use viewport::{
    DragTracker, Gesture, Point, Size, SurfaceRect, Viewport, DRAG_THRESHOLD_PX, FIT_PADDING_PX,
    MAX_SCALE, MIN_SCALE,
};
