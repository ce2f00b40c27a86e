use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::state::snapshot::DashboardSnapshot;

/// Result of offering a snapshot to the cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied,
    /// A snapshot from the same or a later cycle is already held.
    Stale { held: u64 },
    /// The writer was closed before the snapshot got in.
    Closed,
}

#[derive(Debug, Default)]
struct Slot {
    latest: Option<Arc<DashboardSnapshot>>,
}

/// The single "latest snapshot" slot shared between the refresh worker
/// (only writer) and the renderer. Cheap to clone, just an Arc bump.
///
/// Writes go through [`SnapshotCell::apply`], which only accepts snapshots
/// from a strictly newer cycle, so a slow cycle finishing late cannot
/// overwrite a newer one.
#[derive(Clone, Debug, Default)]
pub struct SnapshotCell {
    slot: Arc<RwLock<Slot>>,
}

impl SnapshotCell {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn apply(&self, snapshot: DashboardSnapshot) -> ApplyOutcome {
        self.apply_while_open(snapshot, || true).await
    }

    /// Like [`apply`](Self::apply), but `is_open` is checked while the write
    /// lock is held. Paired with [`fence`](Self::fence) this lets a writer
    /// be shut off so that nothing lands once the fence returns.
    pub async fn apply_while_open(
        &self,
        snapshot: DashboardSnapshot,
        is_open: impl FnOnce() -> bool,
    ) -> ApplyOutcome {
        let mut slot = self.slot.write().await;

        if !is_open() {
            debug!(offered = snapshot.sequence, "writer closed, dropping snapshot");
            return ApplyOutcome::Closed;
        }

        if let Some(held) = slot.latest.as_ref().map(|s| s.sequence) {
            if snapshot.sequence <= held {
                debug!(held, offered = snapshot.sequence, "dropping stale snapshot");
                return ApplyOutcome::Stale { held };
            }
        }

        slot.latest = Some(Arc::new(snapshot));
        ApplyOutcome::Applied
    }

    /// Waits until no `apply` is in progress.
    pub async fn fence(&self) {
        drop(self.slot.write().await);
    }

    pub async fn latest(&self) -> Option<Arc<DashboardSnapshot>> {
        self.slot.read().await.latest.clone()
    }
}
