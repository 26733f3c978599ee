// ── Maintenance reconciliation ──
//
// Brings a host's scripted maintenance window in line with a requested
// suppression duration: create it when absent, extend it when the request
// ends later, leave it alone otherwise. Windows on the host that carry any
// other name belong to someone else and are only ever reported.

use serde::Serialize;
use tracing::{debug, info};
use zbx_api::models::{
    MAINTENANCE_WITH_DATA, Maintenance, MaintenanceCreate, MaintenanceUpdate, TimePeriod,
};

use crate::backend::Backend;
use crate::config::Policy;
use crate::error::CoreError;
use crate::resolver::require_host;

/// Name prefix of every window this tool owns.
pub const SCRIPTED_PREFIX: &str = "Scripted Maintenance: ";

/// Description set on scripted windows.
pub const SCRIPTED_DESCRIPTION: &str = "zbx scripted";

/// Margin applied on both sides of a requested window, absorbing clock
/// skew and propagation lag so an extension never leaves a gap.
pub const SKEW_MARGIN_SECS: i64 = 300;

/// Shortest maintenance period the backend accepts.
pub const MIN_DURATION_SECS: u32 = 300;

/// The deterministic name of a host's scripted window.
pub fn scripted_name(fqdn: &str) -> String {
    format!("{SCRIPTED_PREFIX}{fqdn}")
}

/// The maintenance situation of one host.
#[derive(Debug, Clone)]
pub enum HostWindow {
    /// The host's scripted window.
    Scripted(Maintenance),
    /// Only windows owned by someone else cover the host.
    Foreign(Vec<String>),
    Absent,
}

impl HostWindow {
    /// Classify the windows bound to `fqdn`. A scripted window wins over
    /// any foreign windows that coexist with it.
    pub fn classify(fqdn: &str, windows: Vec<Maintenance>) -> Self {
        let name = scripted_name(fqdn);
        let (mut scripted, foreign): (Vec<_>, Vec<_>) =
            windows.into_iter().partition(|m| m.name == name);

        if let Some(window) = scripted.pop() {
            if !foreign.is_empty() {
                debug!(fqdn, foreign = foreign.len(), "foreign windows alongside scripted one");
            }
            return Self::Scripted(window);
        }
        if foreign.is_empty() {
            Self::Absent
        } else {
            Self::Foreign(foreign.into_iter().map(|m| m.name).collect())
        }
    }
}

/// The active interval a request for `duration_secs` maps to at `now`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RequestedWindow {
    pub active_since: i64,
    pub active_till: i64,
}

impl RequestedWindow {
    pub fn at(now: i64, duration_secs: u32) -> Self {
        Self {
            active_since: now - SKEW_MARGIN_SECS,
            active_till: now + i64::from(duration_secs) + SKEW_MARGIN_SECS,
        }
    }
}

/// The one-off period filling `[since, till]` minus both margins.
fn one_off_period(since: i64, till: i64) -> TimePeriod {
    TimePeriod::one_time(since, till - since - 2 * SKEW_MARGIN_SECS)
}

/// What `reconcile` did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ReconcileOutcome {
    Created {
        id: String,
        active_since: i64,
        active_till: i64,
    },
    Foreign {
        names: Vec<String>,
    },
    Current {
        id: String,
        active_till: i64,
    },
    Extended {
        id: String,
        previous_till: i64,
        active_till: i64,
    },
}

/// Look up the host and classify its windows.
pub async fn host_window<B: Backend>(
    backend: &B,
    fqdn: &str,
) -> Result<(String, HostWindow), CoreError> {
    let hostid = require_host(backend, fqdn).await?;
    let windows = backend.maintenances_for_host(&hostid).await?;
    Ok((hostid, HostWindow::classify(fqdn, windows)))
}

/// Ensure `fqdn` is suppressed for at least `duration_secs` from `now`.
pub async fn reconcile<B: Backend>(
    backend: &B,
    policy: &Policy,
    fqdn: &str,
    duration_secs: u32,
    now: i64,
) -> Result<ReconcileOutcome, CoreError> {
    if duration_secs < MIN_DURATION_SECS {
        return Err(CoreError::ValidationFailed {
            message: format!(
                "duration must be at least {MIN_DURATION_SECS}s, got {duration_secs}s"
            ),
        });
    }

    let (hostid, current) = host_window(backend, fqdn).await?;
    let requested = RequestedWindow::at(now, duration_secs);

    match current {
        HostWindow::Absent => {
            let spec = MaintenanceCreate {
                name: scripted_name(fqdn),
                description: SCRIPTED_DESCRIPTION.into(),
                maintenance_type: MAINTENANCE_WITH_DATA,
                active_since: requested.active_since,
                active_till: requested.active_till,
                hostids: vec![hostid],
                groupids: vec![policy.suppression_group_id.clone()],
                timeperiods: vec![one_off_period(requested.active_since, requested.active_till)],
            };
            let id = backend.create_maintenance(&spec).await?;
            info!(fqdn, %id, till = requested.active_till, "maintenance created");
            Ok(ReconcileOutcome::Created {
                id,
                active_since: requested.active_since,
                active_till: requested.active_till,
            })
        }
        HostWindow::Foreign(names) => {
            info!(fqdn, ?names, "host already in foreign maintenance");
            Ok(ReconcileOutcome::Foreign { names })
        }
        HostWindow::Scripted(window) if requested.active_till > window.active_till => {
            let previous_till = window.active_till;
            let mut hostids: Vec<String> = window.hosts.into_iter().map(|h| h.hostid).collect();
            if !hostids.contains(&hostid) {
                hostids.push(hostid);
            }
            let spec = MaintenanceUpdate {
                maintenanceid: window.maintenanceid,
                active_since: window.active_since,
                active_till: requested.active_till,
                hostids,
                groupids: window.groups.into_iter().map(|g| g.groupid).collect(),
                timeperiods: vec![one_off_period(window.active_since, requested.active_till)],
            };
            let id = backend.update_maintenance(&spec).await?;
            info!(fqdn, %id, previous_till, till = requested.active_till, "maintenance extended");
            Ok(ReconcileOutcome::Extended {
                id,
                previous_till,
                active_till: requested.active_till,
            })
        }
        HostWindow::Scripted(window) => {
            debug!(fqdn, id = %window.maintenanceid, "maintenance already covers request");
            Ok(ReconcileOutcome::Current {
                id: window.maintenanceid,
                active_till: window.active_till,
            })
        }
    }
}

/// Delete the scripted window of `fqdn`; returns the deleted id.
pub async fn delete<B: Backend>(backend: &B, fqdn: &str) -> Result<String, CoreError> {
    let (_, current) = host_window(backend, fqdn).await?;
    let not_found = || CoreError::MaintenanceNotFound { host: fqdn.to_owned() };

    match current {
        HostWindow::Absent => Err(not_found()),
        HostWindow::Foreign(names) => Err(CoreError::ForeignWindowConflict {
            host: fqdn.to_owned(),
            names,
        }),
        HostWindow::Scripted(window) => {
            let deleted = backend
                .delete_maintenance(&window.maintenanceid)
                .await?
                .ok_or_else(not_found)?;
            info!(fqdn, id = %deleted, "maintenance removed");
            Ok(deleted)
        }
    }
}
