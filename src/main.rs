use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use btc_dashboard::config::Config;
use btc_dashboard::market_data::adapters::coingecko::CoinGeckoClient;
use btc_dashboard::market_data::refresh_worker::RefreshWorker;
use btc_dashboard::state::snapshot_cell::SnapshotCell;
use btc_dashboard::telemetry;
use btc_dashboard::view::chart::ChartRegistry;
use btc_dashboard::view::renderer::DashboardView;
use btc_dashboard::view::{forward_tab_input, run_render_loop};

/// Worker→renderer notification buffer. Cycles arrive at most once a
/// minute, so a handful of slots is plenty.
const NOTIFY_CHANNEL_BUFFER: usize = 8;
const TAB_CHANNEL_BUFFER: usize = 16;

fn init_tracing(default_level: &str) {
    // stdout belongs to the dashboard frame, logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;
    init_tracing(&config.log_level);

    if let Some(port) = config.metrics_port {
        telemetry::init_metrics_server(port)?;
        info!(port, "prometheus exporter listening");
    }

    info!(
        api = %config.api_base_url,
        refresh_secs = config.refresh_interval.as_secs(),
        "btc-dashboard starting"
    );

    let source = Arc::new(CoinGeckoClient::new(config.api_base_url.clone(), config.http_timeout)?);
    let cell = SnapshotCell::new();

    let (notify_tx, notify_rx) = mpsc::channel(NOTIFY_CHANNEL_BUFFER);
    let (tab_tx, tab_rx) = mpsc::channel(TAB_CHANNEL_BUFFER);

    // Plain thread: a blocked stdin read must not hold up runtime shutdown.
    std::thread::spawn(move || forward_tab_input(std::io::stdin().lock(), tab_tx));

    let registry = ChartRegistry::new();
    let view = DashboardView::mount(&registry, &config.chart_symbol);

    let refresh = RefreshWorker::new(source, cell.clone(), notify_tx, config.refresh_interval).spawn();
    let mut render_handle = tokio::spawn(run_render_loop(
        cell,
        notify_rx,
        tab_rx,
        view,
        config.initial_tab,
        tokio::io::stdout(),
    ));

    tokio::select! {
        res = &mut render_handle => {
            match res {
                Ok(Ok(())) => warn!("render loop exited"),
                Ok(Err(err)) => warn!(error = %err, "render loop returned error"),
                Err(err) => warn!(error = %err, "render loop task panicked"),
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("received Ctrl-C, shutting down");
            // Dropping the render future unmounts the view and its chart.
            render_handle.abort();
            let _ = render_handle.await;
        }
    }

    refresh.stop().await;
    info!(charts_mounted = registry.mounted(), "btc-dashboard stopped");

    Ok(())
}
