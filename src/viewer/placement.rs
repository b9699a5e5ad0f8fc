//! Pin-drop state machine.
//!
//! `Idle` — drags pan, clicks do nothing.
//! `PinPlacement` — the next click inside the surface captures a percentage
//! position and moves to `PendingMarker`.
//! `PendingMarker` — a ticket must be chosen before anything is persisted;
//! cancel falls back to `Idle` with no side effect.

use serde::Serialize;
use uuid::Uuid;

use super::viewport::{Point, SurfaceRect};

/// Captured click position awaiting a ticket choice.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PendingPin {
    pub x_percent: f64,
    pub y_percent: f64,
    pub page_number: i64,
}

/// Everything needed to persist a confirmed marker.
#[derive(Debug, Clone, Serialize)]
pub struct MarkerDraft {
    pub ticket_id: Uuid,
    pub label: String,
    pub x_percent: f64,
    pub y_percent: f64,
    pub page_number: i64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlacementState {
    Idle,
    PinPlacement,
    PendingMarker(PendingPin),
}

/// What a click did to the placement machine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClickOutcome {
    /// Not in pin mode; the click belongs to the viewport (pan/inspect).
    PassedThrough,
    /// In pin mode but outside the rendered surface; nothing captured.
    OutsideSurface,
    /// Position captured, now awaiting a ticket choice.
    Captured(PendingPin),
}

#[derive(Debug)]
pub struct MarkerPlacement {
    state: PlacementState,
}

impl Default for MarkerPlacement {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkerPlacement {
    pub fn new() -> Self {
        Self { state: PlacementState::Idle }
    }

    pub fn state(&self) -> PlacementState {
        self.state
    }

    /// Toggle pin mode. Leaving pin mode discards a pending capture.
    pub fn toggle_pin_mode(&mut self) {
        self.state = match self.state {
            PlacementState::Idle => PlacementState::PinPlacement,
            PlacementState::PinPlacement | PlacementState::PendingMarker(_) => {
                PlacementState::Idle
            }
        };
    }

    /// Feed a click that survived the drag-threshold check.
    pub fn handle_click(
        &mut self,
        surface: SurfaceRect,
        at: Point,
        page_number: i64,
    ) -> ClickOutcome {
        match self.state {
            PlacementState::Idle | PlacementState::PendingMarker(_) => ClickOutcome::PassedThrough,
            PlacementState::PinPlacement => match surface.percent_at(at) {
                None => ClickOutcome::OutsideSurface,
                Some((x_percent, y_percent)) => {
                    let pin = PendingPin { x_percent, y_percent, page_number };
                    self.state = PlacementState::PendingMarker(pin);
                    ClickOutcome::Captured(pin)
                }
            },
        }
    }

    /// Abandon the pending capture; nothing was persisted.
    pub fn cancel(&mut self) {
        if matches!(self.state, PlacementState::PendingMarker(_)) {
            self.state = PlacementState::Idle;
        }
    }

    /// Attach the chosen ticket to the pending capture.
    ///
    /// Returns the draft to persist and returns the machine to `Idle`; the
    /// caller only mutates its marker cache after the backend write lands.
    pub fn confirm(&mut self, ticket_id: Uuid, label: String) -> Option<MarkerDraft> {
        match self.state {
            PlacementState::PendingMarker(pin) => {
                self.state = PlacementState::Idle;
                Some(MarkerDraft {
                    ticket_id,
                    label,
                    x_percent: pin.x_percent,
                    y_percent: pin.y_percent,
                    page_number: pin.page_number,
                })
            }
            _ => None,
        }
    }
}
