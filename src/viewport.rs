//! Viewport tracker: derives the effective display rectangle of an
//! aspect-fit image inside its container.
//!
//! The tracker is the only writer of the rectangle; everything else
//! (rendering, drag, resize, draw) reads a `Copy` snapshot and must
//! treat it as immutable for the duration of one event-handler
//! invocation. Hosts drive it with two notifications: the image
//! finished loading (intrinsic dimensions known) and the container was
//! resized. Hosts whose platform lacks a reliable layout-settled signal
//! may additionally re-notify on the [`crate::consts::REMEASURE_DELAYS_MS`]
//! schedule; that schedule is a documented fallback, not the design.

#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use crate::consts::REMEASURE_DELAYS_MS;

/// The pixel area the image actually occupies inside its container once
/// aspect-ratio-preserving containment (letterboxing) is applied.
///
/// `scale_x` / `scale_y` map intrinsic image pixels to display pixels;
/// with aspect-fit they are equal, but both are carried so callers that
/// need intrinsic-pixel mapping never have to guess.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayRect {
    pub display_width: f64,
    pub display_height: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    /// The image's intrinsic width/height ratio.
    pub aspect_ratio: f64,
}

/// Tracks intrinsic image dimensions and container dimensions, and
/// recomputes the effective display rectangle whenever either changes.
#[derive(Debug, Default)]
pub struct ViewportTracker {
    intrinsic: Option<(f64, f64)>,
    container: Option<(f64, f64)>,
    rect: Option<DisplayRect>,
}

impl ViewportTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The image asset finished loading; record its intrinsic pixel size.
    /// Non-positive dimensions are ignored.
    pub fn image_loaded(&mut self, intrinsic_w: f64, intrinsic_h: f64) {
        if intrinsic_w > 0.0 && intrinsic_h > 0.0 {
            self.intrinsic = Some((intrinsic_w, intrinsic_h));
        }
        self.recompute();
    }

    /// The container's rendered box changed; record its new pixel size.
    /// Non-positive dimensions invalidate the rectangle.
    pub fn container_resized(&mut self, width: f64, height: f64) {
        if width > 0.0 && height > 0.0 {
            self.container = Some((width, height));
        } else {
            self.container = None;
        }
        self.recompute();
    }

    /// Snapshot of the current effective display rectangle, if one can
    /// be derived yet.
    #[must_use]
    pub fn rect(&self) -> Option<DisplayRect> {
        self.rect
    }

    /// Current container dimensions, if known.
    #[must_use]
    pub fn container(&self) -> Option<(f64, f64)> {
        self.container
    }

    /// The advisory delayed re-measurement schedule for hosts that miss
    /// late layout shifts (font loads, etc.) with a single resize tick.
    #[must_use]
    pub fn remeasure_schedule() -> &'static [u64] {
        &REMEASURE_DELAYS_MS
    }

    fn recompute(&mut self) {
        let (Some((iw, ih)), Some((cw, ch))) = (self.intrinsic, self.container) else {
            self.rect = None;
            return;
        };
        let intrinsic_ratio = iw / ih;
        let container_ratio = cw / ch;
        // A container wider than the image's ratio letterboxes left/right
        // (height-constrained); otherwise top/bottom (width-constrained).
        let (display_width, display_height) = if container_ratio > intrinsic_ratio {
            (ch * intrinsic_ratio, ch)
        } else {
            (cw, cw / intrinsic_ratio)
        };
        self.rect = Some(DisplayRect {
            display_width,
            display_height,
            scale_x: iw / display_width,
            scale_y: ih / display_height,
            aspect_ratio: intrinsic_ratio,
        });
    }
}
