//! Session driver: pairs the controller's synchronous, optimistic
//! mutations with the async persistence collaborator.
//!
//! DESIGN
//! ======
//! Every flow is the same shape: snapshot → apply locally → loading
//! notice → await one persistence call → resolve the notice and either
//! keep the mutation or revert to the snapshot. The snapshot is taken
//! before the mutation, so rollback is never itself fallible. Failures
//! are logged and surfaced through the notifier; they never propagate
//! further up — callers get a [`Settlement`], not an error.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use serde_json::json;
use tracing::{debug, error};
use uuid::Uuid;

use crate::backend::{Notifier, RegionBackend};
use crate::engine::{Action, CommitKind, Controller};
use crate::geometry::PercentGeometry;
use crate::region::{OwnerId, RECOVERY_GEOMETRY, Region, RegionDraft, RegionId};

/// How a flow ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    /// The local state now matches what the collaborator accepted
    /// (or there was nothing to persist).
    Committed,
    /// The collaborator rejected the call; local state was reverted to
    /// the pre-interaction snapshot.
    RolledBack,
    /// A client-side gate (empty title, retype mismatch) blocked the
    /// call before it was issued. Not an error; nothing changed.
    Blocked,
}

/// One image's annotation session: the controller plus its two
/// collaborators.
pub struct Session<B, N> {
    pub controller: Controller,
    backend: B,
    notifier: N,
    owner: OwnerId,
}

impl<B: RegionBackend, N: Notifier> Session<B, N> {
    #[must_use]
    pub fn new(owner: OwnerId, backend: B, notifier: N) -> Self {
        Self { controller: Controller::new(), backend, notifier, owner }
    }

    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    #[must_use]
    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Settle the actions returned by a pointer-up: persist the
    /// geometry commit, if one is present. Render/cursor actions are
    /// the host's concern and are ignored here.
    pub async fn settle(&mut self, actions: &[Action]) -> Settlement {
        for action in actions {
            if let Action::GeometryCommitted { id, kind, geometry, prior } = action {
                return self.persist_geometry(*id, *kind, *geometry, *prior).await;
            }
        }
        Settlement::Committed
    }

    /// Create a region from the modal that follows a draw gesture (or
    /// from direct form entry). The region appears immediately under a
    /// provisional id and is replaced wholesale by the collaborator's
    /// record on success.
    pub async fn create_from_modal(
        &mut self,
        title: &str,
        description: Option<&str>,
        geometry: PercentGeometry,
    ) -> Settlement {
        let title = title.trim();
        if title.is_empty() {
            return Settlement::Blocked;
        }
        let provisional_id: RegionId = Uuid::new_v4();
        self.controller.store.insert(Region {
            id: provisional_id,
            title: title.to_owned(),
            description: description.map(str::to_owned),
            geometry,
        });
        let draft = RegionDraft {
            title: title.to_owned(),
            description: description.map(str::to_owned),
            geometry,
        };

        let notice = self.notifier.loading("Creating region…", &json!({}));
        match self.backend.create_region(self.owner, &draft).await {
            Ok(region) => {
                debug!(region = %region.id, "region created");
                self.controller.store.remove(&provisional_id);
                self.controller.store.insert(region);
                self.notifier.success(notice, "Region created");
                Settlement::Committed
            }
            Err(e) => {
                error!(error = %e, "create rejected");
                self.controller.store.remove(&provisional_id);
                self.notifier.error(notice, "Could not create region");
                Settlement::RolledBack
            }
        }
    }

    /// Save new title/description from the edit modal.
    pub async fn update_text(
        &mut self,
        id: RegionId,
        title: &str,
        description: Option<&str>,
    ) -> Settlement {
        let title = title.trim();
        if title.is_empty() {
            return Settlement::Blocked;
        }
        let Some(prior) = self.controller.store.get(&id).cloned() else {
            return Settlement::Blocked;
        };
        self.controller.store.set_text(&id, title.to_owned(), description.map(str::to_owned));

        let notice = self.notifier.loading("Saving changes…", &json!({}));
        match self.backend.update_text(id, title, description).await {
            Ok(()) => {
                self.notifier.success(notice, "Region updated");
                Settlement::Committed
            }
            Err(e) => {
                error!(error = %e, region = %id, "edit rejected");
                self.controller.store.set_text(&id, prior.title, prior.description);
                self.notifier.error(notice, "Could not edit region");
                Settlement::RolledBack
            }
        }
    }

    /// Delete a region. The caller passes the title the user retyped;
    /// anything but an exact match blocks the destructive call.
    pub async fn delete(&mut self, id: RegionId, typed_title: &str) -> Settlement {
        let Some(region) = self.controller.store.get(&id).cloned() else {
            return Settlement::Blocked;
        };
        if typed_title != region.title {
            return Settlement::Blocked;
        }
        self.controller.store.remove(&id);

        let notice = self.notifier.loading("Deleting region…", &json!({}));
        match self.backend.delete_region(id).await {
            Ok(()) => {
                debug!(region = %id, "region deleted");
                self.notifier.success(notice, "Region deleted");
                Settlement::Committed
            }
            Err(e) => {
                error!(error = %e, region = %id, "delete rejected");
                self.controller.store.insert(region);
                self.notifier.error(notice, "Could not delete region");
                Settlement::RolledBack
            }
        }
    }

    /// Reset a lost region to the safe centered default and persist it.
    pub async fn recover(&mut self, id: RegionId) -> Settlement {
        let Some(prior) = self.controller.store.get(&id).map(|r| r.geometry) else {
            return Settlement::Blocked;
        };
        self.controller.store.set_geometry(&id, RECOVERY_GEOMETRY);

        let notice = self.notifier.loading("Recovering region…", &json!({}));
        match self.backend.update_geometry(id, &RECOVERY_GEOMETRY).await {
            Ok(()) => {
                self.notifier.success(notice, "Region recovered");
                Settlement::Committed
            }
            Err(e) => {
                error!(error = %e, region = %id, "recover rejected");
                self.controller.restore_geometry(&id, prior);
                self.notifier.error(notice, "Could not recover region");
                Settlement::RolledBack
            }
        }
    }

    async fn persist_geometry(
        &mut self,
        id: RegionId,
        kind: CommitKind,
        geometry: PercentGeometry,
        prior: PercentGeometry,
    ) -> Settlement {
        let verb = kind.verb();
        let notice = self.notifier.loading(&format!("Saving {verb}…"), &json!({}));
        match self.backend.update_geometry(id, &geometry).await {
            Ok(()) => {
                debug!(region = %id, verb, "geometry persisted");
                self.notifier.success(notice, "Region saved");
                Settlement::Committed
            }
            Err(e) => {
                error!(error = %e, region = %id, verb, "geometry update rejected");
                self.controller.restore_geometry(&id, prior);
                self.notifier.error(notice, &format!("Could not {verb} region"));
                Settlement::RolledBack
            }
        }
    }
}
