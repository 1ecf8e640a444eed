//! Region records and the in-memory store for the current image.
//!
//! A region (the persisted "article") carries identity, text, and
//! percent-space geometry. The store is the authoritative local list;
//! all mutations are synchronous, and the optimistic-update driver in
//! [`crate::session`] is the only place that pairs them with async
//! persistence. Boundary classification lives here too: geometry that
//! violates containment marks a region "lost" rather than deleting it,
//! and recovery resets it to a safe centered default.

#[cfg(test)]
#[path = "region_test.rs"]
mod region_test;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::consts::{MAX_HEIGHT_PCT, MAX_WIDTH_PCT};
use crate::geometry::PercentGeometry;

/// Unique identifier for a region.
pub type RegionId = Uuid;

/// Identifier of the image (or plan) the regions belong to.
pub type OwnerId = Uuid;

/// Geometry a recovered region is reset to: centered, modest size.
pub const RECOVERY_GEOMETRY: PercentGeometry =
    PercentGeometry { center_x: 50.0, center_y: 50.0, width: 20.0, height: 15.0 };

/// A persisted annotation region as stored locally and on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Region {
    /// Identity assigned by the persistence collaborator at first save.
    pub id: RegionId,
    /// Display title; required for persistence.
    pub title: String,
    /// Optional longer description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Percent-space geometry.
    #[serde(flatten)]
    pub geometry: PercentGeometry,
}

impl Region {
    /// Whether the stored geometry violates the containment/size
    /// invariants. Lost regions are excluded from normal rendering and
    /// surfaced through the recovery list instead of being deleted.
    #[must_use]
    pub fn is_lost(&self) -> bool {
        let g = &self.geometry;
        !(0.0..=100.0).contains(&g.center_x)
            || !(0.0..=100.0).contains(&g.center_y)
            || g.width > MAX_WIDTH_PCT
            || g.height > MAX_HEIGHT_PCT
    }
}

/// A region that has not been persisted yet: everything but identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionDraft {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub geometry: PercentGeometry,
}

/// In-memory store of regions for the currently displayed image.
#[derive(Debug, Default)]
pub struct RegionStore {
    regions: HashMap<RegionId, Region>,
}

impl RegionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a region. An existing region with the same id
    /// is overwritten; used both for fresh inserts and for the wholesale
    /// replace after a successful create/edit.
    pub fn insert(&mut self, region: Region) {
        self.regions.insert(region.id, region);
    }

    /// Remove a region by id, returning it if it was present.
    pub fn remove(&mut self, id: &RegionId) -> Option<Region> {
        self.regions.remove(id)
    }

    #[must_use]
    pub fn get(&self, id: &RegionId) -> Option<&Region> {
        self.regions.get(id)
    }

    /// Apply an optimistic geometry patch. Returns false if the region
    /// is not present.
    pub fn set_geometry(&mut self, id: &RegionId, geometry: PercentGeometry) -> bool {
        let Some(region) = self.regions.get_mut(id) else {
            return false;
        };
        region.geometry = geometry;
        true
    }

    /// Apply an optimistic text patch. Returns false if the region is
    /// not present.
    pub fn set_text(&mut self, id: &RegionId, title: String, description: Option<String>) -> bool {
        let Some(region) = self.regions.get_mut(id) else {
            return false;
        };
        region.title = title;
        region.description = description;
        true
    }

    /// Replace all regions with a full snapshot (image switch / reload).
    pub fn load_snapshot(&mut self, regions: Vec<Region>) {
        self.regions.clear();
        for region in regions {
            self.regions.insert(region.id, region);
        }
    }

    /// All regions sorted by `(title, id)` for stable list rendering.
    #[must_use]
    pub fn sorted_regions(&self) -> Vec<&Region> {
        let mut regions: Vec<&Region> = self.regions.values().collect();
        regions.sort_by(|a, b| a.title.cmp(&b.title).then_with(|| a.id.cmp(&b.id)));
        regions
    }

    /// Regions whose geometry is inside bounds, in render order.
    #[must_use]
    pub fn visible_regions(&self) -> Vec<&Region> {
        self.sorted_regions().into_iter().filter(|r| !r.is_lost()).collect()
    }

    /// Regions flagged lost, for the recovery list.
    #[must_use]
    pub fn lost_regions(&self) -> Vec<&Region> {
        self.sorted_regions().into_iter().filter(|r| r.is_lost()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}
