use tokio::sync::mpsc;
use tracing::{error, warn};

use crate::api::{ApiError, Client};
use crate::model::AddRequest;
use crate::tasks::ControlMsg;

/// What the add command leaves in the status area. A transport failure
/// carries no text; it has already been logged.
#[derive(Debug, PartialEq, Eq)]
pub enum AddOutcome {
    Started(String),
    Rejected(String),
    Failed,
}

/// Fire-and-forget issuance of control commands. Each command is a single
/// request-response exchange with no retry; transport failures go to the
/// log and nowhere else.
pub struct Dispatcher {
    client: Client,
    ctrl: mpsc::Sender<ControlMsg>,
}

impl Dispatcher {
    pub fn new(client: Client, ctrl: mpsc::Sender<ControlMsg>) -> Self {
        Self { client, ctrl }
    }

    /// Flip a download between active and paused, then force an immediate
    /// reconciliation so the table reflects the change before the next tick.
    pub async fn toggle(&self, id: i64) {
        match self.client.toggle(id).await {
            Ok(()) => {
                let _ = self.ctrl.send(ControlMsg::Refresh).await;
            }
            Err(e) => error!("toggle {id} failed: {e}"),
        }
    }

    /// Remove a download from the server and, on confirmation, its row.
    /// This is the only path that removes a row.
    pub async fn delete(&self, id: i64) {
        match self.client.delete(id).await {
            Ok(()) => {
                let _ = self.ctrl.send(ControlMsg::RemoveRow(id)).await;
            }
            Err(e) => error!("delete {id} failed: {e}"),
        }
    }

    /// Submit a new download. The url is mandatory and checked before any
    /// request goes out; dir and filename are optional. Only the server's
    /// own words reach the status area: the assigned filename on success,
    /// the error string verbatim on rejection. Transport failures go to
    /// the log and nowhere else.
    pub async fn add(&self, url: &str, dir: &str, filename: &str) -> AddOutcome {
        let url = url.trim();
        if url.is_empty() {
            return AddOutcome::Rejected("url is required".to_string());
        }

        let req = AddRequest {
            url: url.to_string(),
            dir: dir.trim().to_string(),
            filename: filename.trim().to_string(),
        };
        match self.client.add(&req).await {
            Ok(added) => AddOutcome::Started(added.filename),
            Err(ApiError::Rejected { message, .. }) => {
                warn!("add rejected: {message}");
                AddOutcome::Rejected(message)
            }
            Err(e) => {
                error!("add failed: {e}");
                AddOutcome::Failed
            }
        }
    }
}
