use chrono::Utc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::market_data::traits::MarketDataSource;
use crate::state::snapshot::DashboardSnapshot;
use crate::state::snapshot_cell::{ApplyOutcome, SnapshotCell};
use crate::telemetry;

pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

/// Runs a fetch cycle at start and then once per `period`, writing accepted
/// snapshots into the cell and announcing their sequence on `notify_tx`.
pub struct RefreshWorker {
    source: Arc<dyn MarketDataSource>,
    cell: SnapshotCell,
    notify_tx: mpsc::Sender<u64>,
    period: Duration,
}

/// Owner of a running worker. Dropping it also ends the tick loop, but only
/// [`stop`] guarantees in-flight results are discarded.
///
/// [`stop`]: RefreshHandle::stop
pub struct RefreshHandle {
    stop_tx: watch::Sender<bool>,
    cell: SnapshotCell,
    join: JoinHandle<()>,
}

impl RefreshHandle {
    /// Cancels the interval. A cycle already in flight is allowed to finish
    /// but its result is discarded. Once this returns the cell no longer
    /// changes.
    pub async fn stop(self) {
        let _ = self.stop_tx.send(true);
        // A cycle that passed its stop check under the lock finishes its
        // apply before this returns; later ones see the flag.
        self.cell.fence().await;
        if let Err(err) = self.join.await {
            warn!(error = %err, "refresh worker task panicked");
        }
    }
}

/// Clears the in-flight flag when a cycle ends, however it ends.
struct InFlight(Arc<AtomicBool>);

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl RefreshWorker {
    pub fn new(
        source: Arc<dyn MarketDataSource>,
        cell: SnapshotCell,
        notify_tx: mpsc::Sender<u64>,
        period: Duration,
    ) -> Self {
        Self { source, cell, notify_tx, period }
    }

    pub fn spawn(self) -> RefreshHandle {
        let (stop_tx, stop_rx) = watch::channel(false);
        let cell = self.cell.clone();
        let join = tokio::spawn(self.run(stop_rx));
        RefreshHandle { stop_tx, cell, join }
    }

    async fn run(self, mut stop_rx: watch::Receiver<bool>) {
        info!(period_secs = self.period.as_secs(), "refresh worker started");

        let mut ticker = tokio::time::interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let in_flight = Arc::new(AtomicBool::new(false));
        let mut next_sequence: u64 = 1;

        loop {
            tokio::select! {
                biased;

                changed = stop_rx.changed() => {
                    if changed.is_err() || *stop_rx.borrow() {
                        break;
                    }
                }
                _ = ticker.tick() => {
                    if in_flight.swap(true, Ordering::AcqRel) {
                        debug!(next_sequence, "previous cycle still running, skipping tick");
                        telemetry::record_tick_skipped();
                        continue;
                    }

                    let sequence = next_sequence;
                    next_sequence += 1;

                    tokio::spawn(run_cycle(
                        self.source.clone(),
                        self.cell.clone(),
                        self.notify_tx.clone(),
                        sequence,
                        stop_rx.clone(),
                        InFlight(in_flight.clone()),
                    ));
                }
            }
        }

        info!("refresh worker stopped");
    }
}

async fn run_cycle(
    source: Arc<dyn MarketDataSource>,
    cell: SnapshotCell,
    notify_tx: mpsc::Sender<u64>,
    sequence: u64,
    stop_rx: watch::Receiver<bool>,
    _in_flight: InFlight,
) {
    let start = Instant::now();

    let (prices, trending) = match source.fetch_cycle().await {
        Ok(data) => data,
        Err(err) => {
            // Swallowed here: the view keeps showing the last good snapshot.
            warn!(sequence, error = %err, "fetch cycle failed");
            telemetry::record_cycle_failure(err.kind(), err.endpoint());
            return;
        }
    };

    let stopped = *stop_rx.borrow();
    if stopped {
        debug!(sequence, "worker stopped while cycle was in flight, discarding");
        telemetry::record_snapshot_discarded("stopped");
        return;
    }

    let snapshot = DashboardSnapshot {
        sequence,
        fetched_at: Utc::now(),
        prices,
        trending,
    };

    match cell.apply_while_open(snapshot, || !*stop_rx.borrow()).await {
        ApplyOutcome::Applied => {
            let elapsed = start.elapsed();
            telemetry::record_cycle_success(elapsed.as_secs_f64() * 1_000.0);
            info!(sequence, duration_ms = elapsed.as_millis(), "snapshot updated");

            if notify_tx.send(sequence).await.is_err() {
                debug!(sequence, "no renderer attached");
            }
        }
        ApplyOutcome::Stale { held } => {
            telemetry::record_snapshot_discarded("stale");
            debug!(sequence, held, "newer snapshot already applied");
        }
        ApplyOutcome::Closed => {
            telemetry::record_snapshot_discarded("stopped");
            debug!(sequence, "worker stopped before the snapshot was applied");
        }
    }
}
