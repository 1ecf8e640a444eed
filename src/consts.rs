//! Shared numeric constants for the annotation engine.

// ── Persisted geometry bounds (percent-space) ───────────────────

/// Smallest width a region may persist with, in percent of the image.
pub const MIN_WIDTH_PCT: f64 = 1.0;

/// Largest width a region may persist with. Anything above is "lost".
pub const MAX_WIDTH_PCT: f64 = 80.0;

/// Smallest height a region may persist with.
pub const MIN_HEIGHT_PCT: f64 = 1.0;

/// Largest height a region may persist with. Anything above is "lost".
pub const MAX_HEIGHT_PCT: f64 = 60.0;

/// Lower bound for a region center during interactive placement.
pub const MIN_CENTER_PCT: f64 = 5.0;

/// Upper bound for a region center during interactive placement.
pub const MAX_CENTER_PCT: f64 = 95.0;

// ── Creation bounds (draw gesture) ──────────────────────────────

/// Narrowest width handed to the creation modal.
pub const CREATE_MIN_WIDTH_PCT: f64 = 5.0;

/// Widest width handed to the creation modal.
pub const CREATE_MAX_WIDTH_PCT: f64 = 50.0;

/// Shortest height handed to the creation modal.
pub const CREATE_MIN_HEIGHT_PCT: f64 = 3.0;

/// Tallest height handed to the creation modal.
pub const CREATE_MAX_HEIGHT_PCT: f64 = 30.0;

// ── Pixel thresholds ────────────────────────────────────────────

/// Minimum drawn width for a draw gesture to open the creation modal.
pub const DRAW_MIN_WIDTH_PX: f64 = 15.0;

/// Minimum drawn height for a draw gesture to open the creation modal.
pub const DRAW_MIN_HEIGHT_PX: f64 = 10.0;

/// Floor for an edge span during resize; edges never cross closer than this.
pub const RESIZE_MIN_EDGE_PX: f64 = 5.0;

/// Screen-space hit slop in pixels for corner resize handles.
pub const HANDLE_RADIUS_PX: f64 = 8.0;

// ── Timing ──────────────────────────────────────────────────────

/// Popovers and context menus stay suppressed for this long after a
/// drag or resize settles, so the implicit click at pointer-up cannot
/// reopen a menu the user did not intend to trigger.
pub const POPOVER_COOLDOWN_MS: u64 = 1500;

/// Fallback re-measurement schedule after mount, in milliseconds.
/// Only for hosts without a reliable layout-settled signal.
pub const REMEASURE_DELAYS_MS: [u64; 3] = [50, 250, 1000];
