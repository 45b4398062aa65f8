use std::time::Duration;

use crate::format::format_bytes;
use crate::model::DownloadRecord;
use crate::surface::{Column, Surface};

/// Cadence of the automatic poll. Also the denominator of the rate
/// computation: consecutive snapshots are assumed to be exactly one
/// interval apart rather than timestamped per pair.
pub const POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Reconciles download snapshots against the rendering surface.
///
/// Owns the previous poll's snapshot for delta computation. The snapshot
/// is replaced wholesale at the end of each pass, never partially mutated,
/// so a pass that never runs (failed fetch) leaves rate computation intact.
pub struct Monitor<S: Surface> {
    surface: S,
    prev: Vec<DownloadRecord>,
}

impl<S: Surface> Monitor<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            prev: Vec::new(),
        }
    }

    /// Apply one snapshot to the surface, in snapshot order.
    ///
    /// Rows are created on first observation of an identifier and mutated
    /// in place afterwards. Absence of an identifier from the snapshot
    /// never removes its row; only `remove_row` does.
    pub fn reconcile(&mut self, snapshot: Vec<DownloadRecord>) {
        self.surface.set_visible(!snapshot.is_empty());

        for record in &snapshot {
            if !self.surface.has_row(record.id) {
                self.surface.create_row(record.id, &record.filename);
                // Placeholders until a second sample exists. The downloaded
                // cell is overwritten below within the same pass.
                self.surface.set_cell(record.id, Column::Rate, "0 MB/s");
                self.surface.set_cell(record.id, Column::Downloaded, "0.0 GB");
            } else if let Some(prev) = self.prev.iter().find(|p| p.id == record.id) {
                let rate = transfer_rate(record, prev);
                self.surface.set_cell(record.id, Column::Rate, &rate);
            }
            // A pre-existing row with no previous record keeps its last rate.

            let status = record.status().to_string();
            self.surface.set_cell(record.id, Column::Status, &status);
            let downloaded = format_bytes(record.downloaded as f64);
            self.surface.set_cell(record.id, Column::Downloaded, &downloaded);
            let size = format_bytes(record.size as f64);
            self.surface.set_cell(record.id, Column::Size, &size);
        }

        self.surface.flush();
        self.prev = snapshot;
    }

    #[cfg(test)]
    pub(crate) fn surface(&self) -> &S {
        &self.surface
    }

    /// Drop a row from the surface. Only the delete command path calls
    /// this; the identifier comes back as a fresh first observation if
    /// the server still reports it.
    pub fn remove_row(&mut self, id: i64) {
        self.surface.remove_row(id);
        self.surface.flush();
    }
}

/// Instantaneous transfer rate from two consecutive samples of the same
/// download. Negative deltas (a restarted download) are not clamped.
fn transfer_rate(current: &DownloadRecord, previous: &DownloadRecord) -> String {
    let delta = (current.downloaded - previous.downloaded) as f64;
    format!("{}/s", format_bytes(delta / POLL_INTERVAL.as_secs() as f64))
}
