// Trigger, event and alert endpoints
//
// The read side of alerting: firing triggers with their last event,
// events with acknowledgements, and dispatched notification records.

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};

use crate::client::ZabbixClient;
use crate::error::Error;
use crate::models::{de, Alert, Event, Trigger};

/// Highest trigger priority (disaster).
pub const MAX_PRIORITY: u8 = 5;

/// `event.acknowledge` action bits: close=1, acknowledge=2, add message=4.
const ACTION_ACK_WITH_MESSAGE: u8 = 2 | 4;

/// Filter for currently firing triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerQuery {
    /// Maximum number of triggers returned.
    pub limit: u32,
    /// Lowest priority included.
    pub min_priority: u8,
}

/// Filter for dispatched notifications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlertQuery {
    /// Recipient user ids.
    pub userids: Vec<String>,
    /// Epoch seconds; alerts older than this are excluded.
    pub time_from: i64,
}

#[derive(Deserialize)]
struct EventIds {
    #[serde(deserialize_with = "de::id_list")]
    eventids: Vec<String>,
}

impl ZabbixClient {
    /// Firing triggers on monitored hosts, newest state change first.
    /// Triggers depending on another firing trigger are skipped.
    ///
    /// `trigger.get`
    pub async fn firing_triggers(&self, query: TriggerQuery) -> Result<Vec<Trigger>, Error> {
        debug!(?query, "listing firing triggers");
        let priorities: Vec<u8> = (query.min_priority..=MAX_PRIORITY).collect();
        self.call(
            "trigger.get",
            &json!({
                "output": "extend",
                "limit": query.limit,
                "selectLastEvent": "extend",
                "selectHosts": "extend",
                "monitored": true,
                "skipDependent": true,
                "expandDescription": true,
                "sortfield": "lastchange",
                "sortorder": "DESC",
                "filter": { "priority": priorities, "value": 1 },
            }),
        )
        .await
    }

    /// Events with their acknowledgements.
    ///
    /// `event.get` with `select_acknowledges`
    pub async fn events(&self, eventids: &[String]) -> Result<Vec<Event>, Error> {
        if eventids.is_empty() {
            return Ok(Vec::new());
        }
        debug!(count = eventids.len(), "fetching events");
        self.call(
            "event.get",
            &json!({
                "output": "extend",
                "eventids": eventids,
                "select_acknowledges": "extend",
            }),
        )
        .await
    }

    /// Acknowledge an event with a message; returns the acknowledged ids.
    ///
    /// `event.acknowledge`
    pub async fn acknowledge_event(
        &self,
        eventid: &str,
        message: &str,
    ) -> Result<Vec<String>, Error> {
        info!(eventid, "acknowledging event");
        let ids: EventIds = self
            .call(
                "event.acknowledge",
                &json!({
                    "eventids": [eventid],
                    "action": ACTION_ACK_WITH_MESSAGE,
                    "message": message,
                }),
            )
            .await?;
        Ok(ids.eventids)
    }

    /// Notifications matching the query, highest alert id first.
    ///
    /// `alert.get`
    pub async fn alerts(&self, query: &AlertQuery) -> Result<Vec<Alert>, Error> {
        debug!(?query, "listing alerts");
        self.call(
            "alert.get",
            &json!({
                "output": "extend",
                "userids": query.userids,
                "time_from": query.time_from,
                "sortfield": "alertid",
                "sortorder": "DESC",
            }),
        )
        .await
    }
}
