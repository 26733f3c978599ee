// ── Session ──
//
// The handle the CLI drives. Owns an authenticated backend and the site
// policy; every operation reads the clock once and delegates to the
// component module that implements it.

use chrono::Utc;
use tracing::{debug, warn};
use zbx_api::models::{Host, Maintenance};
use zbx_api::{TlsMode, TransportConfig, ZabbixClient};

use crate::backend::Backend;
use crate::config::{AuthCredentials, ConnectionConfig, Policy, TlsVerification};
use crate::error::CoreError;
use crate::history::{self, HistoryOptions, HistoryRow};
use crate::inventory;
use crate::maintenance::{self, ReconcileOutcome};
use crate::reaper::{self, ReapReport};
use crate::triage::{self, TriageOptions, TriageRow};

/// An authenticated connection plus the policy operations apply.
pub struct Session<B = ZabbixClient> {
    backend: B,
    policy: Policy,
    logout_on_close: bool,
}

impl Session<ZabbixClient> {
    /// Build the client and authenticate.
    ///
    /// A password login opens a server-side session that `close` ends; an
    /// API token is used as-is and left alone.
    pub async fn connect(config: &ConnectionConfig, policy: Policy) -> Result<Self, CoreError> {
        let transport = TransportConfig {
            tls: match &config.tls {
                TlsVerification::SystemDefaults => TlsMode::System,
                TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
                TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
            },
            timeout: config.timeout,
        };
        let client = ZabbixClient::new(&config.url, &transport)?;
        debug!(endpoint = %client.endpoint(), "connecting");

        let logout_on_close = match &config.auth {
            AuthCredentials::ApiToken(token) => {
                client.authenticate_with_token(token.clone()).await?;
                false
            }
            AuthCredentials::Credentials { username, password } => {
                client.login(username, password).await?;
                true
            }
        };

        Ok(Self {
            backend: client,
            policy,
            logout_on_close,
        })
    }

    /// End the server-side session, if this session opened one.
    pub async fn close(self) {
        if self.logout_on_close {
            if let Err(e) = self.backend.logout().await {
                warn!(error = %e, "logout failed");
            }
        }
    }
}

impl<B: Backend> Session<B> {
    /// Wrap an already authenticated backend.
    pub fn with_backend(backend: B, policy: Policy) -> Self {
        Self {
            backend,
            policy,
            logout_on_close: false,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    // ── Maintenance ──────────────────────────────────────────────────

    pub async fn reconcile(
        &self,
        fqdn: &str,
        duration_secs: u32,
    ) -> Result<ReconcileOutcome, CoreError> {
        maintenance::reconcile(&self.backend, &self.policy, fqdn, duration_secs, now()).await
    }

    pub async fn delete_maintenance(&self, fqdn: &str) -> Result<String, CoreError> {
        maintenance::delete(&self.backend, fqdn).await
    }

    pub async fn reap(&self) -> Result<ReapReport, CoreError> {
        reaper::reap(&self.backend, now()).await
    }

    pub async fn list_maintenances(&self) -> Result<Vec<Maintenance>, CoreError> {
        Ok(self.backend.list_maintenances().await?)
    }

    // ── Alerts ───────────────────────────────────────────────────────

    pub async fn triage(&self, limit: u32) -> Result<Vec<TriageRow>, CoreError> {
        let opts = TriageOptions {
            limit,
            min_severity: self.policy.min_severity,
            highlight_severity: self.policy.highlight_severity,
        };
        triage::triage(&self.backend, &opts).await
    }

    pub async fn history(&self, days: u32) -> Result<Vec<HistoryRow>, CoreError> {
        let opts = HistoryOptions {
            days,
            recipient_user_id: self.policy.notification_user_id.clone(),
            order: self.policy.history_order,
        };
        history::history(&self.backend, &opts, now()).await
    }

    /// Acknowledge an event with a message; returns the acknowledged ids.
    pub async fn acknowledge(
        &self,
        eventid: &str,
        message: &str,
    ) -> Result<Vec<String>, CoreError> {
        let ids = self.backend.acknowledge_event(eventid, message).await?;
        debug!(eventid, "event acknowledged");
        Ok(ids)
    }

    // ── Hosts ────────────────────────────────────────────────────────

    /// Resolve `fqdn` in DNS and create it.
    pub async fn add_host(&self, fqdn: &str) -> Result<String, CoreError> {
        let ip = inventory::resolve_ipv4(fqdn).await?;
        inventory::add_host(&self.backend, &self.policy, fqdn, &ip).await
    }

    pub async fn delete_host(&self, fqdn: &str) -> Result<String, CoreError> {
        inventory::delete_host(&self.backend, fqdn).await
    }

    pub async fn set_monitoring(&self, fqdn: &str, enabled: bool) -> Result<String, CoreError> {
        inventory::set_monitoring(&self.backend, fqdn, enabled).await
    }

    pub async fn group_members(&self, name: &str) -> Result<Vec<Host>, CoreError> {
        inventory::group_members(&self.backend, name).await
    }

    pub async fn hosts_without_templates(&self) -> Result<Vec<Host>, CoreError> {
        inventory::hosts_without_templates(&self.backend).await
    }

    pub async fn unmonitored_hosts(&self) -> Result<Vec<Host>, CoreError> {
        inventory::unmonitored_hosts(&self.backend).await
    }
}

fn now() -> i64 {
    Utc::now().timestamp()
}
