// ── Maintenance reaper ──
//
// Deletes every window whose active interval has elapsed. One delete per
// expired window, no retries. A window that disappears between the listing
// and its delete is recorded and skipped; any other failure stops the run.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::backend::Backend;
use crate::error::CoreError;

/// An expired window the reaper acted on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReapedWindow {
    pub id: String,
    pub name: String,
    pub active_till: i64,
}

/// Result of one reaper run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReapReport {
    /// Windows deleted by this run.
    pub removed: Vec<ReapedWindow>,
    /// Windows already gone when their delete was issued.
    pub skipped: Vec<ReapedWindow>,
    pub total_expired: usize,
}

impl ReapReport {
    /// Nothing had expired.
    pub fn is_empty(&self) -> bool {
        self.total_expired == 0
    }
}

/// Remove every window with `active_till < now`.
pub async fn reap<B: Backend>(backend: &B, now: i64) -> Result<ReapReport, CoreError> {
    let windows = backend.list_maintenances().await?;
    let expired: Vec<ReapedWindow> = windows
        .into_iter()
        .filter(|m| m.active_till < now)
        .map(|m| ReapedWindow {
            id: m.maintenanceid,
            name: m.name,
            active_till: m.active_till,
        })
        .collect();

    let mut report = ReapReport {
        total_expired: expired.len(),
        ..ReapReport::default()
    };
    if report.is_empty() {
        debug!("no expired maintenance");
        return Ok(report);
    }

    for window in expired {
        match backend.delete_maintenance(&window.id).await? {
            Some(_) => {
                info!(id = %window.id, name = %window.name, "expired maintenance removed");
                report.removed.push(window);
            }
            None => {
                warn!(id = %window.id, name = %window.name, "maintenance already gone, skipping");
                report.skipped.push(window);
            }
        }
    }

    Ok(report)
}
