use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::api::Client;
use crate::monitor::{Monitor, POLL_INTERVAL};
use crate::surface::Surface;

/// Out-of-band work for the poll task, queued by the command dispatcher.
#[derive(Debug, PartialEq, Eq)]
pub enum ControlMsg {
    /// Reconcile now instead of waiting for the next tick.
    Refresh,
    /// Drop a row after the server confirmed a delete.
    RemoveRow(i64),
}

/// Fixed-cadence poll driver. Owns the monitor, which makes it the only
/// task that ever touches the snapshot store or the surface.
///
/// The first tick fires immediately, then every poll interval. Control
/// messages interleave between cycles; two reconciliation passes may run
/// back to back when a forced refresh races a tick, which is wasted work
/// but harmless since each pass is self-contained.
pub async fn run_poll_loop<S: Surface>(
    client: Client,
    mut monitor: Monitor<S>,
    mut ctrl: mpsc::Receiver<ControlMsg>,
    shutdown: CancellationToken,
) {
    let mut interval = tokio::time::interval(POLL_INTERVAL);
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                info!("poll loop stopped");
                break;
            }
            _ = interval.tick() => {
                poll_once(&client, &mut monitor).await;
            }
            msg = ctrl.recv() => match msg {
                Some(ControlMsg::Refresh) => poll_once(&client, &mut monitor).await,
                Some(ControlMsg::RemoveRow(id)) => monitor.remove_row(id),
                None => break,
            },
        }
    }
}

/// One poll cycle. A failed fetch is logged and skipped; the snapshot
/// store keeps the last successful snapshot, so the next good cycle
/// computes its deltas against real data.
async fn poll_once<S: Surface>(client: &Client, monitor: &mut Monitor<S>) {
    match client.list_downloads().await {
        Ok(snapshot) => monitor.reconcile(snapshot),
        Err(e) => error!("failed to fetch downloads: {e}"),
    }
}
