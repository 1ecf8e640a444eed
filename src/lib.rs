//! Interactive spatial-annotation engine for rectangular regions over a
//! responsive image (floor plans, site photos).
//!
//! The engine keeps region geometry correct across arbitrary viewport
//! and image resizes by persisting it in percent-space, turns raw
//! pointer events into drag/resize/draw mutations through a
//! mode-exclusive gesture state machine, applies every mutation
//! optimistically, and reconciles with a remote store that may reject
//! it. The host wires pointer/keyboard events in (document-level for
//! move/up, so fast pointers are not lost), draws what [`scene::build`]
//! returns, and provides the two collaborators in [`backend`].
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Interaction controller and host [`engine::Action`]s |
//! | [`session`] | Optimistic-update driver over the async collaborators |
//! | [`region`] | Region records, in-memory store, lost/recovery logic |
//! | [`geometry`] | Percent⇄pixel conversions and invariant clamps |
//! | [`viewport`] | Effective display rectangle of the letterboxed image |
//! | [`input`] | Mode toggles, handles, and the gesture state machine |
//! | [`scene`] | Derived render-ready view (presentation contract) |
//! | [`backend`] | Persistence and notification collaborator traits |
//! | [`consts`] | Shared numeric constants (bounds, thresholds, cooldowns) |

pub mod backend;
pub mod consts;
pub mod engine;
pub mod geometry;
pub mod input;
pub mod region;
pub mod scene;
pub mod session;
pub mod viewport;
