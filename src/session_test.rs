#![allow(clippy::float_cmp)]

use std::collections::HashSet;

use uuid::Uuid;

use super::*;
use crate::backend::{BackendError, NoticeId};
use crate::geometry::Point;
use crate::input::PointerButton;

// =============================================================
// Test doubles
// =============================================================

/// Backend that records calls and either accepts or rejects everything.
#[derive(Default)]
struct FakeBackend {
    fail: bool,
    calls: Vec<String>,
    last_geometry: Option<PercentGeometry>,
}

impl FakeBackend {
    fn rejecting() -> Self {
        Self { fail: true, ..Self::default() }
    }

    fn rejection(&self) -> BackendError {
        BackendError::Rejected("stale version".to_owned())
    }
}

impl RegionBackend for FakeBackend {
    async fn create_region(
        &mut self,
        _owner: OwnerId,
        draft: &RegionDraft,
    ) -> Result<Region, BackendError> {
        self.calls.push("create".to_owned());
        if self.fail {
            return Err(self.rejection());
        }
        Ok(Region {
            id: Uuid::new_v4(),
            title: draft.title.clone(),
            description: draft.description.clone(),
            geometry: draft.geometry,
        })
    }

    async fn update_geometry(
        &mut self,
        _id: RegionId,
        geometry: &PercentGeometry,
    ) -> Result<(), BackendError> {
        self.calls.push("update_geometry".to_owned());
        self.last_geometry = Some(*geometry);
        if self.fail { Err(self.rejection()) } else { Ok(()) }
    }

    async fn update_text(
        &mut self,
        _id: RegionId,
        _title: &str,
        _description: Option<&str>,
    ) -> Result<(), BackendError> {
        self.calls.push("update_text".to_owned());
        if self.fail { Err(self.rejection()) } else { Ok(()) }
    }

    async fn delete_region(&mut self, _id: RegionId) -> Result<(), BackendError> {
        self.calls.push("delete".to_owned());
        if self.fail { Err(self.rejection()) } else { Ok(()) }
    }
}

/// Notifier that records events and tracks unresolved loading notices.
#[derive(Default)]
struct RecordingNotifier {
    next_id: NoticeId,
    open: HashSet<NoticeId>,
    events: Vec<String>,
}

impl RecordingNotifier {
    fn open_count(&self) -> usize {
        self.open.len()
    }
}

impl Notifier for RecordingNotifier {
    fn loading(&mut self, message: &str, _options: &serde_json::Value) -> NoticeId {
        self.next_id += 1;
        self.open.insert(self.next_id);
        self.events.push(format!("loading: {message}"));
        self.next_id
    }

    fn success(&mut self, notice: NoticeId, message: &str) {
        self.open.remove(&notice);
        self.events.push(format!("success: {message}"));
    }

    fn error(&mut self, notice: NoticeId, message: &str) {
        self.open.remove(&notice);
        self.events.push(format!("error: {message}"));
    }
}

type TestSession = Session<FakeBackend, RecordingNotifier>;

fn session(backend: FakeBackend) -> TestSession {
    let mut s = Session::new(Uuid::new_v4(), backend, RecordingNotifier::default());
    s.controller.image_loaded(1000.0, 600.0);
    s.controller.container_resized(1000.0, 600.0);
    s
}

fn add_region(s: &mut TestSession, title: &str, geometry: PercentGeometry) -> RegionId {
    let region = Region {
        id: Uuid::new_v4(),
        title: title.to_owned(),
        description: None,
        geometry,
    };
    let id = region.id;
    s.controller.store.insert(region);
    id
}

fn geometry_of(s: &TestSession, id: &RegionId) -> PercentGeometry {
    s.controller.store.get(id).expect("region").geometry
}

/// Drive a full drag gesture from the region's center to `to`.
fn drag_to(s: &mut TestSession, to: Point) -> Vec<Action> {
    s.controller.toggles.drag = true;
    s.controller.on_pointer_down(Point::new(500.0, 300.0), PointerButton::Primary);
    s.controller.on_pointer_move(to);
    s.controller.on_pointer_up(to, PointerButton::Primary)
}

// =============================================================
// Drag/resize settlement
// =============================================================

#[tokio::test]
async fn drag_settles_committed_on_success() {
    let mut s = session(FakeBackend::default());
    let id = add_region(&mut s, "unit", PercentGeometry::new(50.0, 50.0, 20.0, 15.0));
    let actions = drag_to(&mut s, Point::new(700.0, 420.0));
    let outcome = s.settle(&actions).await;
    assert_eq!(outcome, Settlement::Committed);
    let geom = geometry_of(&s, &id);
    assert_eq!(geom.center_x, 70.0);
    assert_eq!(geom.center_y, 70.0);
    assert_eq!(s.backend().calls, ["update_geometry"]);
    assert_eq!(s.backend().last_geometry.map(|g| g.center_x), Some(70.0));
    assert_eq!(s.notifier().open_count(), 0);
}

#[tokio::test]
async fn drag_rolls_back_on_rejection() {
    // A rejected move must leave the store at the pre-drag geometry,
    // not the dragged one.
    let mut s = session(FakeBackend::rejecting());
    let id = add_region(&mut s, "unit", PercentGeometry::new(50.0, 50.0, 20.0, 15.0));
    let actions = drag_to(&mut s, Point::new(700.0, 420.0));
    // Optimistic state reflects the drag before settlement...
    assert_eq!(geometry_of(&s, &id).center_x, 70.0);
    let outcome = s.settle(&actions).await;
    // ...and the rejection restores the snapshot.
    assert_eq!(outcome, Settlement::RolledBack);
    assert_eq!(geometry_of(&s, &id), PercentGeometry::new(50.0, 50.0, 20.0, 15.0));
    assert!(s.notifier().events.iter().any(|e| e == "error: Could not move region"));
    assert_eq!(s.notifier().open_count(), 0);
}

#[tokio::test]
async fn resize_rejection_names_the_resize_action() {
    let mut s = session(FakeBackend::rejecting());
    add_region(&mut s, "unit", PercentGeometry::new(50.0, 50.0, 20.0, 15.0));
    s.controller.toggles.resize = true;
    s.controller.on_pointer_down(Point::new(600.0, 345.0), PointerButton::Primary);
    let actions = s.controller.on_pointer_up(Point::new(700.0, 400.0), PointerButton::Primary);
    let outcome = s.settle(&actions).await;
    assert_eq!(outcome, Settlement::RolledBack);
    assert!(s.notifier().events.iter().any(|e| e == "error: Could not resize region"));
}

#[tokio::test]
async fn settle_without_commit_touches_nothing() {
    let mut s = session(FakeBackend::default());
    let actions = vec![Action::RenderNeeded, Action::SetCursor("default".to_owned())];
    let outcome = s.settle(&actions).await;
    assert_eq!(outcome, Settlement::Committed);
    assert!(s.backend().calls.is_empty());
    assert!(s.notifier().events.is_empty());
}

// =============================================================
// Create
// =============================================================

#[tokio::test]
async fn create_replaces_provisional_with_backend_record() {
    let mut s = session(FakeBackend::default());
    let geometry = PercentGeometry::new(20.0, 29.17, 20.0, 25.0);
    let outcome = s.create_from_modal("Kitchen", Some("north wing"), geometry).await;
    assert_eq!(outcome, Settlement::Committed);
    assert_eq!(s.controller.store.len(), 1);
    let region = s.controller.store.sorted_regions()[0];
    assert_eq!(region.title, "Kitchen");
    assert_eq!(region.description.as_deref(), Some("north wing"));
    assert_eq!(region.geometry, geometry);
    assert_eq!(s.backend().calls, ["create"]);
    assert_eq!(s.notifier().open_count(), 0);
}

#[tokio::test]
async fn create_trims_title() {
    let mut s = session(FakeBackend::default());
    s.create_from_modal("  Lobby  ", None, PercentGeometry::new(50.0, 50.0, 20.0, 15.0)).await;
    assert_eq!(s.controller.store.sorted_regions()[0].title, "Lobby");
}

#[tokio::test]
async fn create_with_empty_title_is_blocked() {
    let mut s = session(FakeBackend::default());
    let outcome =
        s.create_from_modal("   ", None, PercentGeometry::new(50.0, 50.0, 20.0, 15.0)).await;
    assert_eq!(outcome, Settlement::Blocked);
    assert!(s.controller.store.is_empty());
    assert!(s.backend().calls.is_empty());
    assert!(s.notifier().events.is_empty());
}

#[tokio::test]
async fn create_rejection_removes_provisional_region() {
    let mut s = session(FakeBackend::rejecting());
    let outcome =
        s.create_from_modal("Kitchen", None, PercentGeometry::new(50.0, 50.0, 20.0, 15.0)).await;
    assert_eq!(outcome, Settlement::RolledBack);
    assert!(s.controller.store.is_empty());
    assert!(s.notifier().events.iter().any(|e| e == "error: Could not create region"));
    assert_eq!(s.notifier().open_count(), 0);
}

// =============================================================
// Edit text
// =============================================================

#[tokio::test]
async fn update_text_commits_new_title() {
    let mut s = session(FakeBackend::default());
    let id = add_region(&mut s, "old", PercentGeometry::new(50.0, 50.0, 20.0, 15.0));
    let outcome = s.update_text(id, "new", Some("details")).await;
    assert_eq!(outcome, Settlement::Committed);
    let region = s.controller.store.get(&id).expect("region");
    assert_eq!(region.title, "new");
    assert_eq!(region.description.as_deref(), Some("details"));
}

#[tokio::test]
async fn update_text_rejection_restores_prior_text() {
    let mut s = session(FakeBackend::rejecting());
    let id = add_region(&mut s, "old", PercentGeometry::new(50.0, 50.0, 20.0, 15.0));
    let outcome = s.update_text(id, "new", None).await;
    assert_eq!(outcome, Settlement::RolledBack);
    assert_eq!(s.controller.store.get(&id).expect("region").title, "old");
    assert!(s.notifier().events.iter().any(|e| e == "error: Could not edit region"));
}

#[tokio::test]
async fn update_text_with_empty_title_is_blocked() {
    let mut s = session(FakeBackend::default());
    let id = add_region(&mut s, "old", PercentGeometry::new(50.0, 50.0, 20.0, 15.0));
    assert_eq!(s.update_text(id, "", None).await, Settlement::Blocked);
    assert_eq!(s.controller.store.get(&id).expect("region").title, "old");
    assert!(s.backend().calls.is_empty());
}

// =============================================================
// Delete
// =============================================================

#[tokio::test]
async fn delete_requires_exact_retyped_title() {
    let mut s = session(FakeBackend::default());
    let id = add_region(&mut s, "Boiler Room", PercentGeometry::new(50.0, 50.0, 20.0, 15.0));
    assert_eq!(s.delete(id, "boiler room").await, Settlement::Blocked);
    assert_eq!(s.delete(id, "Boiler Roo").await, Settlement::Blocked);
    assert_eq!(s.controller.store.len(), 1);
    assert!(s.backend().calls.is_empty());
    assert!(s.notifier().events.is_empty());
}

#[tokio::test]
async fn delete_with_matching_title_commits() {
    let mut s = session(FakeBackend::default());
    let id = add_region(&mut s, "Boiler Room", PercentGeometry::new(50.0, 50.0, 20.0, 15.0));
    assert_eq!(s.delete(id, "Boiler Room").await, Settlement::Committed);
    assert!(s.controller.store.is_empty());
    assert_eq!(s.backend().calls, ["delete"]);
}

#[tokio::test]
async fn delete_rejection_reinserts_region() {
    let mut s = session(FakeBackend::rejecting());
    let id = add_region(&mut s, "Boiler Room", PercentGeometry::new(50.0, 50.0, 20.0, 15.0));
    assert_eq!(s.delete(id, "Boiler Room").await, Settlement::RolledBack);
    assert_eq!(s.controller.store.get(&id).expect("region").title, "Boiler Room");
    assert!(s.notifier().events.iter().any(|e| e == "error: Could not delete region"));
}

#[tokio::test]
async fn delete_of_missing_region_is_blocked() {
    let mut s = session(FakeBackend::default());
    assert_eq!(s.delete(Uuid::new_v4(), "anything").await, Settlement::Blocked);
}

// =============================================================
// Recover
// =============================================================

#[tokio::test]
async fn recover_resets_lost_region_to_default() {
    let mut s = session(FakeBackend::default());
    let id = add_region(&mut s, "runaway", PercentGeometry::new(50.0, 50.0, 85.0, 15.0));
    assert!(s.controller.store.get(&id).expect("region").is_lost());
    let outcome = s.recover(id).await;
    assert_eq!(outcome, Settlement::Committed);
    assert_eq!(geometry_of(&s, &id), RECOVERY_GEOMETRY);
    assert!(!s.controller.store.get(&id).expect("region").is_lost());
    assert_eq!(s.backend().last_geometry, Some(RECOVERY_GEOMETRY));
}

#[tokio::test]
async fn recover_rejection_restores_lost_geometry() {
    let mut s = session(FakeBackend::rejecting());
    let lost_geometry = PercentGeometry::new(50.0, 50.0, 85.0, 15.0);
    let id = add_region(&mut s, "runaway", lost_geometry);
    let outcome = s.recover(id).await;
    assert_eq!(outcome, Settlement::RolledBack);
    assert_eq!(geometry_of(&s, &id), lost_geometry);
    assert!(s.notifier().events.iter().any(|e| e == "error: Could not recover region"));
}

#[tokio::test]
async fn recover_missing_region_is_blocked() {
    let mut s = session(FakeBackend::default());
    assert_eq!(s.recover(Uuid::new_v4()).await, Settlement::Blocked);
}

// =============================================================
// Full flow: draw → modal → create
// =============================================================

#[tokio::test]
async fn draw_then_confirm_creates_region_with_expected_geometry() {
    let mut s = session(FakeBackend::default());
    s.controller.toggles.create = true;
    s.controller.on_pointer_down(Point::new(100.0, 100.0), PointerButton::Primary);
    s.controller.on_pointer_move(Point::new(300.0, 250.0));
    let actions = s.controller.on_pointer_up(Point::new(300.0, 250.0), PointerButton::Primary);
    let geometry = actions
        .iter()
        .find_map(|a| match a {
            Action::DraftReady { geometry } => Some(*geometry),
            _ => None,
        })
        .expect("draft");
    let outcome = s.create_from_modal("Roof Access", None, geometry).await;
    assert_eq!(outcome, Settlement::Committed);
    let region = s.controller.store.sorted_regions()[0];
    assert_eq!(region.geometry.center_x, 20.0);
    assert!((region.geometry.center_y - 29.17).abs() < 0.01);
    assert_eq!(region.geometry.width, 20.0);
    assert_eq!(region.geometry.height, 25.0);
}
