// ── Runtime connection configuration ──
//
// These types describe *how* to reach the Zabbix frontend and the site
// policy the operations apply. They carry credential data but never touch
// disk; the CLI builds them from its profiles and hands them in.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use url::Url;

use crate::severity::Severity;

/// How to authenticate with the API.
#[derive(Debug, Clone)]
pub enum AuthCredentials {
    /// Pre-issued API token (5.4+).
    ApiToken(SecretString),
    /// `user.login` session.
    Credentials {
        username: String,
        password: SecretString,
    },
}

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed frontends).
    DangerAcceptInvalid,
}

/// Configuration for connecting to one Zabbix frontend.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Frontend URL (e.g., `https://zabbix.example.com/zabbix`).
    pub url: Url,
    pub auth: AuthCredentials,
    pub tls: TlsVerification,
    /// Request timeout.
    pub timeout: Duration,
}

/// Order applied to the deduplicated alert history.
///
/// `Lexicographic` compares event ids as text ("9" ranks above "10" in a
/// descending listing), which is how the history has always been shown.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum HistoryOrder {
    #[default]
    Lexicographic,
    Numeric,
}

/// Site policy shared by the operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    /// Host group every scripted maintenance is bound to.
    pub suppression_group_id: String,
    /// User whose notifications make up the alert history.
    pub notification_user_id: String,
    /// Lowest severity shown in the triage feed.
    pub min_severity: Severity,
    /// Lowest severity that can need attention.
    pub highlight_severity: Severity,
    pub history_order: HistoryOrder,
    /// Template linked to hosts created with `host add`.
    pub host_template: String,
    /// Group hosts created with `host add` are placed in.
    pub host_group_id: String,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            suppression_group_id: "5".into(),
            notification_user_id: "9".into(),
            min_severity: Severity::Warning,
            highlight_severity: Severity::Average,
            history_order: HistoryOrder::default(),
            host_template: "Template OS Linux".into(),
            host_group_id: "5".into(),
        }
    }
}
