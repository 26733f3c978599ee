// zbx-core: Maintenance reconciliation and alert triage over a Zabbix backend.

pub mod backend;
pub mod config;
pub mod error;
pub mod history;
pub mod inventory;
pub mod maintenance;
pub mod reaper;
pub mod resolver;
pub mod session;
pub mod severity;
pub mod triage;

#[cfg(test)]
mod testing;

// ── Primary re-exports ──────────────────────────────────────────────
pub use backend::Backend;
pub use config::{AuthCredentials, ConnectionConfig, HistoryOrder, Policy, TlsVerification};
pub use error::CoreError;
pub use session::Session;
pub use severity::Severity;

// Operation results
pub use history::HistoryRow;
pub use maintenance::{HostWindow, ReconcileOutcome, scripted_name};
pub use reaper::{ReapReport, ReapedWindow};
pub use resolver::IdentifierKind;
pub use triage::{AckSummary, TriageRow};

// Backend models the CLI renders directly.
pub use zbx_api::models::{Host, Maintenance};
