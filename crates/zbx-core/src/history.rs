// ── Alert history ──
//
// Notifications sent to one recipient over a trailing range, collapsed to
// one row per underlying event.

use std::cmp::Ordering;
use std::collections::HashMap;

use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;
use zbx_api::AlertQuery;
use zbx_api::models::{Alert, Event};

use crate::backend::Backend;
use crate::config::HistoryOrder;
use crate::error::CoreError;

const SECS_PER_DAY: i64 = 86_400;

/// History parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryOptions {
    pub days: u32,
    pub recipient_user_id: String,
    pub order: HistoryOrder,
}

/// One event's notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryRow {
    pub event_id: String,
    /// Epoch seconds of the retained notification.
    pub clock: i64,
    pub host: String,
    pub subject: String,
    pub acknowledged: bool,
    pub acked_by: Option<String>,
    pub alert_id: String,
}

/// Collapse a feed sorted by alert id descending to one alert per event.
/// A later alert of the same event replaces the earlier one, so the
/// oldest notification of each event survives.
pub fn dedup_by_event(alerts: Vec<Alert>) -> Vec<Alert> {
    let mut by_event: IndexMap<String, Alert> = IndexMap::with_capacity(alerts.len());
    for alert in alerts {
        by_event.insert(alert.eventid.clone(), alert);
    }
    by_event.into_values().collect()
}

/// Split `"host:description"` at the first colon.
pub fn split_subject(subject: &str) -> (String, String) {
    match subject.split_once(':') {
        Some((host, rest)) => (host.to_owned(), rest.to_owned()),
        None => (String::new(), subject.to_owned()),
    }
}

fn compare_ids(a: &str, b: &str, order: HistoryOrder) -> Ordering {
    match order {
        HistoryOrder::Lexicographic => a.cmp(b),
        HistoryOrder::Numeric => match (a.parse::<u64>(), b.parse::<u64>()) {
            (Ok(x), Ok(y)) => x.cmp(&y),
            _ => a.len().cmp(&b.len()).then_with(|| a.cmp(b)),
        },
    }
}

fn compare_rows(a: &HistoryRow, b: &HistoryRow, order: HistoryOrder) -> Ordering {
    compare_ids(&a.event_id, &b.event_id, order)
        .then_with(|| a.clock.cmp(&b.clock))
        .then_with(|| a.host.cmp(&b.host))
        .then_with(|| a.subject.cmp(&b.subject))
        .then_with(|| a.acknowledged.cmp(&b.acknowledged))
        .then_with(|| a.acked_by.cmp(&b.acked_by))
}

/// Sort rows descending, event id first.
pub fn sort_rows(rows: &mut [HistoryRow], order: HistoryOrder) {
    rows.sort_by(|a, b| compare_rows(b, a, order));
}

/// Build the deduplicated history ending at `now`.
pub async fn history<B: Backend>(
    backend: &B,
    opts: &HistoryOptions,
    now: i64,
) -> Result<Vec<HistoryRow>, CoreError> {
    let query = AlertQuery {
        userids: vec![opts.recipient_user_id.clone()],
        time_from: now - i64::from(opts.days) * SECS_PER_DAY,
    };
    let alerts = backend.alerts(&query).await?;
    let fetched = alerts.len();
    let alerts = dedup_by_event(alerts);
    debug!(fetched, events = alerts.len(), "deduplicated alert history");

    let eventids: Vec<String> = alerts.iter().map(|a| a.eventid.clone()).collect();
    let events: HashMap<String, Event> = backend
        .events(&eventids)
        .await?
        .into_iter()
        .map(|e| (e.eventid.clone(), e))
        .collect();

    let mut rows: Vec<HistoryRow> = alerts
        .into_iter()
        .map(|alert| {
            let (host, subject) = split_subject(&alert.subject);
            let event = events.get(&alert.eventid);
            HistoryRow {
                acknowledged: event.is_some_and(|e| e.acknowledged),
                acked_by: event
                    .and_then(|e| e.acknowledges.first())
                    .map(|ack| ack.alias.clone()),
                event_id: alert.eventid,
                clock: alert.clock,
                host,
                subject,
                alert_id: alert.alertid,
            }
        })
        .collect();
    sort_rows(&mut rows, opts.order);
    Ok(rows)
}
