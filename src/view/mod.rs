pub mod chart;
pub mod panels;
pub mod renderer;
pub mod tab;

use std::io::BufRead;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::state::snapshot_cell::SnapshotCell;
use crate::telemetry;
use renderer::DashboardView;
use tab::Tab;

/// Clear screen and home the cursor before each frame.
pub const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Redraws on every applied snapshot and every tab change.
/// Returns once both channels are closed.
pub async fn run_render_loop<W>(
    cell: SnapshotCell,
    mut notify_rx: mpsc::Receiver<u64>,
    mut tab_rx: mpsc::Receiver<Tab>,
    view: DashboardView,
    initial_tab: Tab,
    mut out: W,
) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
{
    info!(tab = initial_tab.key(), "render loop started");

    let mut tab = initial_tab;
    let mut snapshots_open = true;
    let mut tabs_open = true;

    draw(&cell, &view, tab, &mut out).await?;

    while snapshots_open || tabs_open {
        tokio::select! {
            next = notify_rx.recv(), if snapshots_open => match next {
                Some(sequence) => debug!(sequence, "redrawing for new snapshot"),
                None => {
                    snapshots_open = false;
                    continue;
                }
            },
            next = tab_rx.recv(), if tabs_open => match next {
                Some(next) => {
                    debug!(tab = next.key(), "switching tab");
                    tab = next;
                }
                None => {
                    tabs_open = false;
                    continue;
                }
            },
        }

        draw(&cell, &view, tab, &mut out).await?;
    }

    info!("render loop finished");
    Ok(())
}

async fn draw<W>(cell: &SnapshotCell, view: &DashboardView, tab: Tab, out: &mut W) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let snapshot = cell.latest().await;
    let frame = view.render(snapshot.as_deref(), tab);

    out.write_all(CLEAR_SCREEN.as_bytes()).await?;
    out.write_all(frame.as_bytes()).await?;
    out.flush().await?;

    telemetry::record_frame_rendered();
    Ok(())
}

/// Reads tab names line by line and forwards them. Blocking: run it on its
/// own thread. Returns when input ends or the render loop is gone.
pub fn forward_tab_input<R: BufRead>(input: R, tab_tx: mpsc::Sender<Tab>) {
    for line in input.lines() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                warn!(error = %err, "stopped reading tab input");
                return;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        match line.parse::<Tab>() {
            Ok(tab) => {
                if tab_tx.blocking_send(tab).is_err() {
                    return;
                }
            }
            Err(err) => warn!(error = %err, "ignoring input"),
        }
    }
}
