//! Input model: sticky mode toggles, corner handles, and the gesture
//! state machine.
//!
//! `Gesture` is the single tagged-union interaction state owned by the
//! controller. Exactly one variant is live at a time, which makes
//! "drawing while dragging" unrepresentable. Each active variant
//! carries the context needed to compute deltas during pointer-move and
//! the pre-interaction snapshot needed for rollback at settle time.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::geometry::{EdgeRect, PercentGeometry, PixelRect, Point};
use crate::region::RegionId;

/// Sticky UI toggles for the three interactive modes, so touch users do
/// not need a modifier key. Escape clears all of them.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
pub struct ModeToggles {
    /// Existing regions can be repositioned by dragging.
    pub drag: bool,
    /// Corner handles are shown and resizing is allowed.
    pub resize: bool,
    /// Drag-to-draw on empty canvas creates a new region.
    pub create: bool,
}

/// The four corner resize handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handle {
    Nw,
    Ne,
    Sw,
    Se,
}

impl Handle {
    /// Pixel position of this corner on a centered rectangle.
    #[must_use]
    pub fn corner_of(self, rect: &PixelRect) -> Point {
        let hw = rect.width / 2.0;
        let hh = rect.height / 2.0;
        match self {
            Self::Nw => Point::new(rect.x - hw, rect.y - hh),
            Self::Ne => Point::new(rect.x + hw, rect.y - hh),
            Self::Sw => Point::new(rect.x - hw, rect.y + hh),
            Self::Se => Point::new(rect.x + hw, rect.y + hh),
        }
    }

    /// CSS cursor name shown while this handle is active.
    #[must_use]
    pub fn cursor(self) -> &'static str {
        match self {
            Self::Nw | Self::Se => "nwse-resize",
            Self::Ne | Self::Sw => "nesw-resize",
        }
    }

    /// All handles in a fixed order, for rendering and hit-testing.
    #[must_use]
    pub fn all() -> [Self; 4] {
        [Self::Nw, Self::Ne, Self::Sw, Self::Se]
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button.
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

/// A keyboard key, named as reported by the host (e.g. `"Escape"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

/// The mode-exclusive interaction state.
///
/// Each active variant exists only for one pointer-down → pointer-up
/// cycle and is destroyed on settle or cancel.
#[derive(Debug, Clone, Copy, Default)]
pub enum Gesture {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// Drag-to-draw of a new region on empty canvas.
    Drawing {
        /// Where the drag started, container pixels.
        anchor: Point,
        /// The pointer's latest position.
        current: Point,
    },
    /// Repositioning an existing region.
    Dragging {
        /// Region being dragged.
        id: RegionId,
        /// Pointer offset from the region's rendered center at grab time.
        grab_offset: Point,
        /// Pre-drag geometry, the rollback snapshot.
        prior: PercentGeometry,
    },
    /// Resizing an existing region from one corner handle.
    Resizing {
        /// Region being resized.
        id: RegionId,
        /// Which corner is active; only its two edges move.
        handle: Handle,
        /// Current pixel edges, updated on every pointer-move.
        edges: EdgeRect,
        /// Pre-resize geometry, the rollback snapshot.
        prior: PercentGeometry,
    },
}
