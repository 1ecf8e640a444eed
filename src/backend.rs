//! Collaborator interfaces: persistence and notifications.
//!
//! Both are consumed, never implemented here (beyond test doubles).
//! Persistence is four async operations over plain geometry+text
//! records, each a single attempt that may reject; transport is the
//! collaborator's concern. Notifications follow the loading → resolved
//! discipline: a loading notice issued before an await must be resolved
//! success/error by the caller, never left dangling.

use thiserror::Error;

use crate::geometry::PercentGeometry;
use crate::region::{OwnerId, Region, RegionDraft, RegionId};

/// Why a persistence call failed. The engine does not distinguish
/// further; every failure triggers the same rollback.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The collaborator rejected the record (invalid/stale state).
    #[error("rejected: {0}")]
    Rejected(String),
    /// The collaborator could not be reached.
    #[error("transport: {0}")]
    Transport(String),
}

/// The persistence collaborator. No retry policy here: one attempt,
/// and the session driver rolls back on rejection.
///
/// Futures are awaited on the single-threaded UI event loop, so no
/// `Send` bound is imposed.
#[allow(async_fn_in_trait)]
pub trait RegionBackend {
    /// Persist a new region; the collaborator assigns identity.
    async fn create_region(
        &mut self,
        owner: OwnerId,
        draft: &RegionDraft,
    ) -> Result<Region, BackendError>;

    /// Persist new geometry for an existing region.
    async fn update_geometry(
        &mut self,
        id: RegionId,
        geometry: &PercentGeometry,
    ) -> Result<(), BackendError>;

    /// Persist new title/description for an existing region.
    async fn update_text(
        &mut self,
        id: RegionId,
        title: &str,
        description: Option<&str>,
    ) -> Result<(), BackendError>;

    /// Delete a region. The retype-the-title gate is client-side and
    /// has already passed when this is called.
    async fn delete_region(&mut self, id: RegionId) -> Result<(), BackendError>;
}

/// Handle for one in-flight loading notice.
pub type NoticeId = u64;

/// The notification collaborator (toast presentation is out of scope;
/// this is the capability only).
pub trait Notifier {
    /// Show a loading notice. The returned id MUST be resolved with
    /// exactly one of [`success`](Notifier::success) or
    /// [`error`](Notifier::error). `options` is an open-ended bag the
    /// presentation layer may interpret (duration, position, ...).
    fn loading(&mut self, message: &str, options: &serde_json::Value) -> NoticeId;

    /// Resolve a loading notice with an auto-dismissing confirmation.
    fn success(&mut self, notice: NoticeId, message: &str);

    /// Resolve a loading notice with a longer-lived error message.
    fn error(&mut self, notice: NoticeId, message: &str);
}
