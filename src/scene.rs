//! Presentation adapter contract: the derived, render-ready view of the
//! controller's state.
//!
//! The presentation layer (whatever widget/DOM technology hosts the
//! engine) draws exactly what [`build`] returns and feeds pointer
//! events back into the controller. No rendering technology appears
//! here; this module only derives pixel rectangles.

#[cfg(test)]
#[path = "scene_test.rs"]
mod scene_test;

use crate::engine::Controller;
use crate::geometry::{PixelRect, Point, percent_to_pixel};
use crate::input::{Gesture, Handle};
use crate::region::RegionId;

/// One visible region, positioned in container pixels.
#[derive(Debug, Clone)]
pub struct Sprite {
    pub id: RegionId,
    pub title: String,
    pub rect: PixelRect,
}

/// One corner handle to draw while the resize toggle is on.
#[derive(Debug, Clone)]
pub struct HandleSprite {
    pub region: RegionId,
    pub handle: Handle,
    pub at: Point,
}

/// A lost region surfaced in the recovery list instead of the canvas.
#[derive(Debug, Clone)]
pub struct LostEntry {
    pub id: RegionId,
    pub title: String,
}

/// Everything the presentation layer draws for one frame.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub sprites: Vec<Sprite>,
    pub handles: Vec<HandleSprite>,
    /// The in-progress draw rectangle, if a draw gesture is active.
    pub draft: Option<PixelRect>,
    pub lost: Vec<LostEntry>,
}

/// Derive the scene for the controller's current state. Lost regions
/// never produce sprites (a marker that visually escapes the image is
/// worse than none) but always appear in the recovery list.
#[must_use]
pub fn build(controller: &Controller) -> Scene {
    let mut scene = Scene {
        lost: controller
            .store
            .lost_regions()
            .iter()
            .map(|r| LostEntry { id: r.id, title: r.title.clone() })
            .collect(),
        ..Scene::default()
    };

    let (Some(rect), Some((cw, ch))) = (controller.tracker.rect(), controller.tracker.container())
    else {
        return scene;
    };

    let drag_override = controller.drag_override();
    for region in controller.store.visible_regions() {
        let pixel = match drag_override {
            Some((id, overridden)) if id == region.id => overridden,
            _ => percent_to_pixel(&region.geometry, &rect, cw, ch),
        };
        if controller.toggles.resize {
            for handle in Handle::all() {
                scene.handles.push(HandleSprite {
                    region: region.id,
                    handle,
                    at: handle.corner_of(&pixel),
                });
            }
        }
        scene.sprites.push(Sprite { id: region.id, title: region.title.clone(), rect: pixel });
    }

    if let Gesture::Drawing { anchor, current } = controller.gesture {
        scene.draft = Some(PixelRect::new(
            (anchor.x + current.x) / 2.0,
            (anchor.y + current.y) / 2.0,
            (current.x - anchor.x).abs(),
            (current.y - anchor.y).abs(),
        ));
    }

    scene
}
