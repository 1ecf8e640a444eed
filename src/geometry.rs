//! Geometry model: percent-space records, pixel rectangles, and the
//! invariant-preserving conversions between them.
//!
//! Regions persist their geometry in percent-space (percentages of the
//! image's intrinsic dimensions) so it survives any viewport resize
//! without recomputation. Rendering and gesture math happen in
//! container-local pixels. The two conversions here are exact inverses
//! of each other, letterbox offsets included. Everything in this module
//! is a pure function over `Copy` data.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use serde::{Deserialize, Serialize};

use crate::consts::{
    CREATE_MAX_HEIGHT_PCT, CREATE_MAX_WIDTH_PCT, CREATE_MIN_HEIGHT_PCT, CREATE_MIN_WIDTH_PCT,
    MAX_CENTER_PCT, MAX_HEIGHT_PCT, MAX_WIDTH_PCT, MIN_CENTER_PCT, MIN_HEIGHT_PCT, MIN_WIDTH_PCT,
};
use crate::viewport::DisplayRect;

/// A point in container-local CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Persisted region geometry in percent-space.
///
/// `center_x` / `center_y` are the region's reference point; storing the
/// center plus extents means drag and rendering share a single anchor
/// while resize pivots around edges without a bounding-box recompute.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentGeometry {
    /// Horizontal center, percent of the image width.
    pub center_x: f64,
    /// Vertical center, percent of the image height.
    pub center_y: f64,
    /// Width, percent of the image width.
    pub width: f64,
    /// Height, percent of the image height.
    pub height: f64,
}

impl PercentGeometry {
    #[must_use]
    pub fn new(center_x: f64, center_y: f64, width: f64, height: f64) -> Self {
        Self { center_x, center_y, width, height }
    }
}

/// A rectangle in container-local pixels. `x` / `y` are the **center**.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PixelRect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Whether `pt` falls inside this rectangle (edges inclusive).
    #[must_use]
    pub fn contains(&self, pt: Point) -> bool {
        (pt.x - self.x).abs() <= self.width / 2.0 && (pt.y - self.y).abs() <= self.height / 2.0
    }

    #[must_use]
    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

/// A rectangle expressed as its four pixel edges. Resize math moves
/// individual edges, so it works on this form rather than center+extent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeRect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl EdgeRect {
    #[must_use]
    pub fn from_pixel(rect: &PixelRect) -> Self {
        Self {
            left: rect.x - rect.width / 2.0,
            top: rect.y - rect.height / 2.0,
            right: rect.x + rect.width / 2.0,
            bottom: rect.y + rect.height / 2.0,
        }
    }

    /// Recompute the center+extent form from the four edges.
    #[must_use]
    pub fn to_pixel(&self) -> PixelRect {
        PixelRect {
            x: (self.left + self.right) / 2.0,
            y: (self.top + self.bottom) / 2.0,
            width: self.right - self.left,
            height: self.bottom - self.top,
        }
    }
}

/// Convert percent-space geometry to a centered pixel rectangle inside
/// the container, honoring the letterbox offset left by aspect-fit.
#[must_use]
pub fn percent_to_pixel(
    geom: &PercentGeometry,
    rect: &DisplayRect,
    container_w: f64,
    container_h: f64,
) -> PixelRect {
    let offset_x = (container_w - rect.display_width) / 2.0;
    let offset_y = (container_h - rect.display_height) / 2.0;
    PixelRect {
        x: geom.center_x / 100.0 * rect.display_width + offset_x,
        y: geom.center_y / 100.0 * rect.display_height + offset_y,
        width: geom.width / 100.0 * rect.display_width,
        height: geom.height / 100.0 * rect.display_height,
    }
}

/// Inverse of [`percent_to_pixel`]: subtracts the same letterbox offsets
/// before dividing by the effective display size.
#[must_use]
pub fn pixel_to_percent(
    pixel: &PixelRect,
    rect: &DisplayRect,
    container_w: f64,
    container_h: f64,
) -> PercentGeometry {
    let offset_x = (container_w - rect.display_width) / 2.0;
    let offset_y = (container_h - rect.display_height) / 2.0;
    PercentGeometry {
        center_x: (pixel.x - offset_x) / rect.display_width * 100.0,
        center_y: (pixel.y - offset_y) / rect.display_height * 100.0,
        width: pixel.width / rect.display_width * 100.0,
        height: pixel.height / rect.display_height * 100.0,
    }
}

/// Whether `pt` falls inside the effective display rectangle (the area
/// the image actually covers once letterboxing is accounted for).
#[must_use]
pub fn display_contains(rect: &DisplayRect, container_w: f64, container_h: f64, pt: Point) -> bool {
    let offset_x = (container_w - rect.display_width) / 2.0;
    let offset_y = (container_h - rect.display_height) / 2.0;
    pt.x >= offset_x
        && pt.x <= offset_x + rect.display_width
        && pt.y >= offset_y
        && pt.y <= offset_y + rect.display_height
}

/// Clamp geometry handed to the creation modal after a draw gesture.
/// Tighter than the persisted bounds so freshly drawn regions start sane.
#[must_use]
pub fn clamp_for_placement(geom: &PercentGeometry) -> PercentGeometry {
    PercentGeometry {
        center_x: geom.center_x.clamp(MIN_CENTER_PCT, MAX_CENTER_PCT),
        center_y: geom.center_y.clamp(MIN_CENTER_PCT, MAX_CENTER_PCT),
        width: geom.width.clamp(CREATE_MIN_WIDTH_PCT, CREATE_MAX_WIDTH_PCT),
        height: geom.height.clamp(CREATE_MIN_HEIGHT_PCT, CREATE_MAX_HEIGHT_PCT),
    }
}

/// Clamp a drag result. Drags never change size; only the center moves,
/// and it may legally reach the [0,100] boundary.
#[must_use]
pub fn clamp_for_drag(geom: &PercentGeometry) -> PercentGeometry {
    PercentGeometry {
        center_x: geom.center_x.clamp(0.0, 100.0),
        center_y: geom.center_y.clamp(0.0, 100.0),
        width: geom.width,
        height: geom.height,
    }
}

/// Clamp a resize result to the persisted size bounds and the interactive
/// center band.
#[must_use]
pub fn clamp_for_resize(geom: &PercentGeometry) -> PercentGeometry {
    PercentGeometry {
        center_x: geom.center_x.clamp(MIN_CENTER_PCT, MAX_CENTER_PCT),
        center_y: geom.center_y.clamp(MIN_CENTER_PCT, MAX_CENTER_PCT),
        width: geom.width.clamp(MIN_WIDTH_PCT, MAX_WIDTH_PCT),
        height: geom.height.clamp(MIN_HEIGHT_PCT, MAX_HEIGHT_PCT),
    }
}
