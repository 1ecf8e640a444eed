//! Interaction controller: turns raw pointer events into geometry
//! mutations and host actions.
//!
//! The controller owns the region store, the viewport tracker, the
//! sticky mode toggles, and the single gesture slot. Pointer handlers
//! are synchronous and infallible; everything that can reject (the
//! persistence collaborator) is pushed out through [`Action`] values
//! for the async session driver to settle. During a drag the persisted
//! percent geometry is untouched — rendering consumes a temporary pixel
//! override instead — so there is nothing to unwind if the gesture
//! never commits.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use std::time::{Duration, Instant};

use crate::consts::{
    DRAW_MIN_HEIGHT_PX, DRAW_MIN_WIDTH_PX, HANDLE_RADIUS_PX, POPOVER_COOLDOWN_MS,
    RESIZE_MIN_EDGE_PX,
};
use crate::geometry::{
    self, EdgeRect, PercentGeometry, PixelRect, Point, clamp_for_drag, clamp_for_placement,
    clamp_for_resize, percent_to_pixel, pixel_to_percent,
};
use crate::input::{Gesture, Handle, Key, ModeToggles, PointerButton};
use crate::region::{Region, RegionId, RegionStore};
use crate::viewport::ViewportTracker;

/// Which kind of geometry commit a settled gesture produced. Only used
/// for notification wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitKind {
    Move,
    Resize,
}

impl CommitKind {
    #[must_use]
    pub fn verb(self) -> &'static str {
        match self {
            Self::Move => "move",
            Self::Resize => "resize",
        }
    }
}

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone)]
pub enum Action {
    /// The scene changed; re-derive and redraw.
    RenderNeeded,
    /// Change the pointer cursor.
    SetCursor(String),
    /// A draw gesture passed the size threshold; open the creation
    /// modal with this clamped geometry.
    DraftReady { geometry: PercentGeometry },
    /// A drag or resize settled and was applied optimistically; persist
    /// it, and restore `prior` if the collaborator rejects.
    GeometryCommitted {
        id: RegionId,
        kind: CommitKind,
        geometry: PercentGeometry,
        prior: PercentGeometry,
    },
}

/// The interaction controller for one image's annotation canvas.
pub struct Controller {
    pub store: RegionStore,
    pub tracker: ViewportTracker,
    pub toggles: ModeToggles,
    pub gesture: Gesture,
    /// Drag-time pixel rectangle consumed only by rendering; the store's
    /// percent geometry stays untouched until pointer-up.
    drag_override: Option<(RegionId, PixelRect)>,
    /// Popovers stay suppressed until this deadline after a settle.
    suppress_until: Option<Instant>,
}

impl Default for Controller {
    fn default() -> Self {
        Self {
            store: RegionStore::new(),
            tracker: ViewportTracker::new(),
            toggles: ModeToggles::default(),
            gesture: Gesture::Idle,
            drag_override: None,
            suppress_until: None,
        }
    }
}

impl Controller {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Data inputs ---

    /// Hydrate the store from a server snapshot.
    pub fn load_snapshot(&mut self, regions: Vec<Region>) {
        self.store.load_snapshot(regions);
    }

    /// The image asset finished loading.
    pub fn image_loaded(&mut self, intrinsic_w: f64, intrinsic_h: f64) {
        self.tracker.image_loaded(intrinsic_w, intrinsic_h);
    }

    /// The container's rendered box changed.
    pub fn container_resized(&mut self, width: f64, height: f64) {
        self.tracker.container_resized(width, height);
    }

    // --- Queries ---

    /// The drag-time pixel override, if a drag is in progress.
    #[must_use]
    pub fn drag_override(&self) -> Option<(RegionId, PixelRect)> {
        self.drag_override
    }

    /// Whether popovers/context menus may open right now. False for a
    /// short cooldown after a drag/resize settles, so the pointer-up's
    /// implicit click cannot reopen a menu.
    #[must_use]
    pub fn popover_allowed(&self) -> bool {
        self.popover_allowed_at(Instant::now())
    }

    fn popover_allowed_at(&self, now: Instant) -> bool {
        self.suppress_until.is_none_or(|deadline| now >= deadline)
    }

    /// Restore a region's geometry from a pre-interaction snapshot.
    /// Rollback entry point for the session driver; infallible by
    /// construction since the snapshot was taken before the mutation.
    pub fn restore_geometry(&mut self, id: &RegionId, prior: PercentGeometry) {
        self.store.set_geometry(id, prior);
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, pt: Point, button: PointerButton) -> Vec<Action> {
        if button != PointerButton::Primary || !matches!(self.gesture, Gesture::Idle) {
            return Vec::new();
        }
        let Some(rect) = self.tracker.rect() else {
            return Vec::new();
        };
        let Some((cw, ch)) = self.tracker.container() else {
            return Vec::new();
        };

        // Handles win over bodies so a corner grab on a small region
        // does not start a drag instead.
        if self.toggles.resize {
            if let Some((id, handle, pixel)) = self.handle_at(pt) {
                if let Some(region) = self.store.get(&id) {
                    self.gesture = Gesture::Resizing {
                        id,
                        handle,
                        edges: EdgeRect::from_pixel(&pixel),
                        prior: region.geometry,
                    };
                    return vec![Action::SetCursor(handle.cursor().to_owned())];
                }
            }
        }

        if self.toggles.drag {
            if let Some((id, pixel)) = self.region_at(pt) {
                if let Some(region) = self.store.get(&id) {
                    self.gesture = Gesture::Dragging {
                        id,
                        grab_offset: Point::new(pt.x - pixel.x, pt.y - pixel.y),
                        prior: region.geometry,
                    };
                    return vec![Action::SetCursor("grabbing".to_owned())];
                }
            }
        }

        if self.toggles.create
            && geometry::display_contains(&rect, cw, ch, pt)
            && self.region_at(pt).is_none()
        {
            self.gesture = Gesture::Drawing { anchor: pt, current: pt };
            return vec![Action::RenderNeeded];
        }

        Vec::new()
    }

    pub fn on_pointer_move(&mut self, pt: Point) -> Vec<Action> {
        let rect = self.tracker.rect();
        let container = self.tracker.container();
        match &mut self.gesture {
            Gesture::Idle => Vec::new(),
            Gesture::Drawing { current, .. } => {
                *current = pt;
                vec![Action::RenderNeeded]
            }
            Gesture::Dragging { id, grab_offset, prior } => {
                let (Some(rect), Some((cw, ch))) = (rect, container) else {
                    return Vec::new();
                };
                let pixel = percent_to_pixel(prior, &rect, cw, ch);
                self.drag_override = Some((
                    *id,
                    PixelRect::new(
                        pt.x - grab_offset.x,
                        pt.y - grab_offset.y,
                        pixel.width,
                        pixel.height,
                    ),
                ));
                vec![Action::RenderNeeded]
            }
            Gesture::Resizing { handle, edges, .. } => {
                apply_handle(edges, *handle, pt);
                vec![Action::RenderNeeded]
            }
        }
    }

    pub fn on_pointer_up(&mut self, pt: Point, button: PointerButton) -> Vec<Action> {
        if button != PointerButton::Primary {
            return Vec::new();
        }
        let gesture = std::mem::take(&mut self.gesture);
        match gesture {
            Gesture::Idle => Vec::new(),
            Gesture::Drawing { anchor, .. } => self.settle_draw(anchor, pt),
            Gesture::Dragging { id, grab_offset, prior } => {
                self.drag_override = None;
                self.settle_drag(id, grab_offset, prior, pt)
            }
            Gesture::Resizing { id, handle, mut edges, prior } => {
                apply_handle(&mut edges, handle, pt);
                self.settle_resize(id, edges, prior)
            }
        }
    }

    pub fn on_key_down(&mut self, key: &Key) -> Vec<Action> {
        if key.0 != "Escape" {
            return Vec::new();
        }
        // Escape clears the sticky toggles and discards an in-progress
        // draft. An active drag/resize is NOT rolled back; those only
        // resolve at pointer-up.
        self.toggles = ModeToggles::default();
        if matches!(self.gesture, Gesture::Drawing { .. }) {
            self.gesture = Gesture::Idle;
        }
        vec![Action::RenderNeeded]
    }

    /// Cancel the drawing draft when the create toggle is switched off
    /// mid-gesture.
    pub fn set_create_enabled(&mut self, enabled: bool) -> Vec<Action> {
        self.toggles.create = enabled;
        if !enabled && matches!(self.gesture, Gesture::Drawing { .. }) {
            self.gesture = Gesture::Idle;
            return vec![Action::RenderNeeded];
        }
        Vec::new()
    }

    // --- Gesture settlement ---

    fn settle_draw(&mut self, anchor: Point, pt: Point) -> Vec<Action> {
        let width = (pt.x - anchor.x).abs();
        let height = (pt.y - anchor.y).abs();
        if width < DRAW_MIN_WIDTH_PX || height < DRAW_MIN_HEIGHT_PX {
            // Too small to be intentional; discard silently.
            return vec![Action::RenderNeeded];
        }
        let (Some(rect), Some((cw, ch))) = (self.tracker.rect(), self.tracker.container()) else {
            return vec![Action::RenderNeeded];
        };
        let pixel =
            PixelRect::new((anchor.x + pt.x) / 2.0, (anchor.y + pt.y) / 2.0, width, height);
        let geometry = clamp_for_placement(&pixel_to_percent(&pixel, &rect, cw, ch));
        vec![Action::DraftReady { geometry }, Action::RenderNeeded]
    }

    fn settle_drag(
        &mut self,
        id: RegionId,
        grab_offset: Point,
        prior: PercentGeometry,
        pt: Point,
    ) -> Vec<Action> {
        let (Some(rect), Some((cw, ch))) = (self.tracker.rect(), self.tracker.container()) else {
            return vec![Action::RenderNeeded];
        };
        let pixel = percent_to_pixel(&prior, &rect, cw, ch);
        let ended = PixelRect::new(
            pt.x - grab_offset.x,
            pt.y - grab_offset.y,
            pixel.width,
            pixel.height,
        );
        let moved = clamp_for_drag(&pixel_to_percent(&ended, &rect, cw, ch));
        // Drags never change size; carry the prior extents exactly.
        let geometry = PercentGeometry { width: prior.width, height: prior.height, ..moved };
        self.commit(id, CommitKind::Move, geometry, prior)
    }

    fn settle_resize(
        &mut self,
        id: RegionId,
        edges: EdgeRect,
        prior: PercentGeometry,
    ) -> Vec<Action> {
        let (Some(rect), Some((cw, ch))) = (self.tracker.rect(), self.tracker.container()) else {
            return vec![Action::RenderNeeded];
        };
        let geometry = clamp_for_resize(&pixel_to_percent(&edges.to_pixel(), &rect, cw, ch));
        self.commit(id, CommitKind::Resize, geometry, prior)
    }

    fn commit(
        &mut self,
        id: RegionId,
        kind: CommitKind,
        geometry: PercentGeometry,
        prior: PercentGeometry,
    ) -> Vec<Action> {
        if !self.store.set_geometry(&id, geometry) {
            // Region vanished mid-gesture (e.g. deleted remotely).
            return vec![Action::RenderNeeded];
        }
        self.suppress_until =
            Some(Instant::now() + Duration::from_millis(POPOVER_COOLDOWN_MS));
        vec![
            Action::GeometryCommitted { id, kind, geometry, prior },
            Action::SetCursor("default".to_owned()),
            Action::RenderNeeded,
        ]
    }

    // --- Hit-testing ---

    /// Pixel rectangles for all visible regions, skipped entirely when
    /// the viewport is not measurable yet.
    fn pixel_rects(&self) -> Vec<(RegionId, PixelRect)> {
        let (Some(rect), Some((cw, ch))) = (self.tracker.rect(), self.tracker.container()) else {
            return Vec::new();
        };
        self.store
            .visible_regions()
            .iter()
            .map(|r| (r.id, percent_to_pixel(&r.geometry, &rect, cw, ch)))
            .collect()
    }

    /// The visible region under `pt`, smallest area first so overlapped
    /// small regions stay reachable.
    fn region_at(&self, pt: Point) -> Option<(RegionId, PixelRect)> {
        self.pixel_rects()
            .into_iter()
            .filter(|(_, rect)| rect.contains(pt))
            .min_by(|(_, a), (_, b)| a.area().total_cmp(&b.area()))
    }

    /// The corner handle under `pt`, if any, with its region's rect.
    fn handle_at(&self, pt: Point) -> Option<(RegionId, Handle, PixelRect)> {
        for (id, rect) in self.pixel_rects() {
            for handle in Handle::all() {
                let corner = handle.corner_of(&rect);
                if (pt.x - corner.x).abs() <= HANDLE_RADIUS_PX
                    && (pt.y - corner.y).abs() <= HANDLE_RADIUS_PX
                {
                    return Some((id, handle, rect));
                }
            }
        }
        None
    }
}

/// Move only the edges belonging to `handle`, flooring each span so
/// width/height never drop below the pixel minimum.
fn apply_handle(edges: &mut EdgeRect, handle: Handle, pt: Point) {
    match handle {
        Handle::Nw => {
            edges.left = pt.x.min(edges.right - RESIZE_MIN_EDGE_PX);
            edges.top = pt.y.min(edges.bottom - RESIZE_MIN_EDGE_PX);
        }
        Handle::Ne => {
            edges.right = pt.x.max(edges.left + RESIZE_MIN_EDGE_PX);
            edges.top = pt.y.min(edges.bottom - RESIZE_MIN_EDGE_PX);
        }
        Handle::Sw => {
            edges.left = pt.x.min(edges.right - RESIZE_MIN_EDGE_PX);
            edges.bottom = pt.y.max(edges.top + RESIZE_MIN_EDGE_PX);
        }
        Handle::Se => {
            edges.right = pt.x.max(edges.left + RESIZE_MIN_EDGE_PX);
            edges.bottom = pt.y.max(edges.top + RESIZE_MIN_EDGE_PX);
        }
    }
}
