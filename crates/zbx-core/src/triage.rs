// ── Alert triage feed ──
//
// Currently firing triggers, one row each in fetch order, annotated with
// suppression and acknowledgement state. A row needs attention when it is
// severe enough and nobody has dealt with it yet.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;
use zbx_api::TriggerQuery;
use zbx_api::models::{Event, Trigger};

use crate::backend::Backend;
use crate::error::CoreError;
use crate::severity::Severity;

/// Marker the frontend prepends to messages of bulk acknowledgements.
pub const BULK_ACK_MARKER: &str = "----[BULK ACKNOWLEDGE]----";

/// Remove the bulk-acknowledge marker and surrounding whitespace.
pub fn strip_bulk_marker(message: &str) -> String {
    message.replace(BULK_ACK_MARKER, "").trim().to_owned()
}

/// Triage parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriageOptions {
    pub limit: u32,
    pub min_severity: Severity,
    pub highlight_severity: Severity,
}

impl Default for TriageOptions {
    fn default() -> Self {
        Self {
            limit: 200,
            min_severity: Severity::Warning,
            highlight_severity: Severity::Average,
        }
    }
}

/// First acknowledgement of a trigger's latest event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AckSummary {
    pub author: String,
    pub message: String,
}

/// One firing trigger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TriageRow {
    pub host: String,
    /// Epoch seconds.
    pub last_change: i64,
    pub event_id: Option<String>,
    pub description: String,
    pub severity: Severity,
    pub suppressed: bool,
    pub acknowledgement: Option<AckSummary>,
    pub needs_attention: bool,
}

impl TriageRow {
    pub fn acknowledged(&self) -> bool {
        self.acknowledgement.is_some()
    }
}

/// Severe enough, not in maintenance, not acknowledged.
pub fn needs_attention(
    severity: Severity,
    suppressed: bool,
    acknowledged: bool,
    threshold: Severity,
) -> bool {
    severity >= threshold && !suppressed && !acknowledged
}

/// Build the triage feed.
pub async fn triage<B: Backend>(
    backend: &B,
    opts: &TriageOptions,
) -> Result<Vec<TriageRow>, CoreError> {
    let triggers = backend
        .firing_triggers(TriggerQuery {
            limit: opts.limit,
            min_priority: opts.min_severity.priority(),
        })
        .await?;

    let eventids: Vec<String> = triggers
        .iter()
        .filter_map(|t| t.last_event.as_ref().map(|e| e.eventid.clone()))
        .collect();
    let events: HashMap<String, Event> = backend
        .events(&eventids)
        .await?
        .into_iter()
        .map(|e| (e.eventid.clone(), e))
        .collect();
    debug!(triggers = triggers.len(), events = events.len(), "building triage feed");

    Ok(triggers
        .into_iter()
        .map(|t| row(t, &events, opts.highlight_severity))
        .collect())
}

fn row(trigger: Trigger, events: &HashMap<String, Event>, threshold: Severity) -> TriageRow {
    let (host, suppressed) = trigger
        .hosts
        .first()
        .map(|h| (h.display_name().to_owned(), h.maintenance_status == 1))
        .unwrap_or_default();
    let event_id = trigger.last_event.map(|e| e.eventid);
    let acknowledgement = event_id
        .as_ref()
        .and_then(|id| events.get(id))
        .and_then(|e| e.acknowledges.first())
        .map(|ack| AckSummary {
            author: ack.alias.clone(),
            message: strip_bulk_marker(&ack.message),
        });
    let severity = Severity::from_priority(trigger.priority);

    TriageRow {
        needs_attention: needs_attention(
            severity,
            suppressed,
            acknowledgement.is_some(),
            threshold,
        ),
        host,
        last_change: trigger.lastchange,
        event_id,
        description: trigger.description,
        severity,
        suppressed,
        acknowledgement,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::testing::{event, trigger, FakeBackend};

    #[test]
    fn highlight_requires_all_three_conditions() {
        let t = Severity::Average;
        assert!(needs_attention(Severity::High, false, false, t));
        assert!(!needs_attention(Severity::Warning, false, false, t));
        assert!(!needs_attention(Severity::High, true, false, t));
        assert!(!needs_attention(Severity::High, false, true, t));
        assert!(needs_attention(Severity::Average, false, false, t));
    }

    #[test]
    fn marker_is_stripped() {
        assert_eq!(
            strip_bulk_marker("----[BULK ACKNOWLEDGE]----\n  rebooting  "),
            "rebooting"
        );
        assert_eq!(strip_bulk_marker("plain"), "plain");
    }

    #[tokio::test]
    async fn rows_follow_fetch_order_and_annotations() {
        let backend = FakeBackend::default();
        backend.add_trigger(trigger("1", "db1", 4, 300, false, Some("e1")));
        backend.add_trigger(trigger("2", "web1", 5, 200, true, Some("e2")));
        backend.add_trigger(trigger("3", "web2", 4, 100, false, Some("e3")));
        backend.add_event(event("e1", &[]));
        backend.add_event(event("e2", &[]));
        backend.add_event(event("e3", &[("alice", "----[BULK ACKNOWLEDGE]---- on it")]));

        let rows = triage(&backend, &TriageOptions::default()).await.unwrap();

        assert_eq!(
            rows.iter().map(|r| r.host.as_str()).collect::<Vec<_>>(),
            vec!["db1", "web1", "web2"]
        );
        assert!(rows[0].needs_attention);
        assert!(rows[1].suppressed);
        assert!(!rows[1].needs_attention);
        assert_eq!(
            rows[2].acknowledgement,
            Some(AckSummary { author: "alice".into(), message: "on it".into() })
        );
        assert!(!rows[2].needs_attention);
        assert_eq!(rows[0].severity, Severity::High);
        assert_eq!(rows[0].event_id.as_deref(), Some("e1"));
    }

    #[tokio::test]
    async fn rows_show_visible_host_name() {
        let backend = FakeBackend::default();
        let mut named = trigger("1", "db1.example.com", 4, 300, false, None);
        named.hosts[0].name = "Primary DB".into();
        let mut unnamed = trigger("2", "web1.example.com", 4, 200, false, None);
        unnamed.hosts[0].name = String::new();
        backend.add_trigger(named);
        backend.add_trigger(unnamed);

        let rows = triage(&backend, &TriageOptions::default()).await.unwrap();

        assert_eq!(
            rows.iter().map(|r| r.host.as_str()).collect::<Vec<_>>(),
            vec!["Primary DB", "web1.example.com"]
        );
    }

    #[tokio::test]
    async fn trigger_without_event_is_unacknowledged() {
        let backend = FakeBackend::default();
        backend.add_trigger(trigger("1", "db1", 3, 300, false, None));

        let rows = triage(&backend, &TriageOptions::default()).await.unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].event_id, None);
        assert!(!rows[0].acknowledged());
        assert!(rows[0].needs_attention);
    }

    #[tokio::test]
    async fn query_carries_limit_and_floor() {
        let backend = FakeBackend::default();
        backend.add_trigger(trigger("1", "a", 1, 300, false, None));
        backend.add_trigger(trigger("2", "b", 2, 200, false, None));
        backend.add_trigger(trigger("3", "c", 4, 100, false, None));
        let opts = TriageOptions {
            limit: 1,
            ..TriageOptions::default()
        };

        let rows = triage(&backend, &opts).await.unwrap();

        assert_eq!(
            backend.trigger_queries(),
            vec![TriggerQuery { limit: 1, min_priority: 2 }]
        );
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].host, "b");
        assert!(!rows[0].needs_attention, "warning is below the highlight threshold");
    }
}
