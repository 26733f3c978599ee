// Host, host group and template endpoints
//
// Lookups use exact-match `filter` parameters; `search` would do
// substring matching.

use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use crate::client::ZabbixClient;
use crate::error::Error;
use crate::models::{de, Host, HostCreate, HostGroup, Template};

#[derive(Deserialize)]
struct HostIds {
    #[serde(deserialize_with = "de::id_list")]
    hostids: Vec<String>,
}

impl ZabbixClient {
    /// Hosts whose technical name is exactly `name`.
    ///
    /// `host.get` with `filter.host`
    pub async fn hosts_by_name(&self, name: &str) -> Result<Vec<Host>, Error> {
        debug!(name, "looking up host");
        self.call(
            "host.get",
            &json!({ "output": "extend", "filter": { "host": [name] } }),
        )
        .await
    }

    /// Hosts belonging to the given group.
    ///
    /// `host.get` with `groupids`
    pub async fn hosts_in_group(&self, groupid: &str) -> Result<Vec<Host>, Error> {
        self.call(
            "host.get",
            &json!({ "output": "extend", "groupids": [groupid] }),
        )
        .await
    }

    /// Hosts with the given status (0 monitored, 1 unmonitored).
    ///
    /// `host.get` with `filter.status`
    pub async fn hosts_by_status(&self, status: u8) -> Result<Vec<Host>, Error> {
        self.call(
            "host.get",
            &json!({ "output": "extend", "filter": { "status": status } }),
        )
        .await
    }

    /// All hosts with their linked templates.
    ///
    /// `host.get` with `selectParentTemplates`
    pub async fn hosts_with_templates(&self) -> Result<Vec<Host>, Error> {
        self.call(
            "host.get",
            &json!({
                "output": "extend",
                "selectParentTemplates": ["templateid", "name"],
            }),
        )
        .await
    }

    /// Create a host and return its id.
    ///
    /// `host.create`
    pub async fn create_host(&self, spec: &HostCreate) -> Result<String, Error> {
        info!(host = %spec.host, "creating host");
        let ids: HostIds = self.call("host.create", spec).await?;
        first_id(ids.hostids, "host.create")
    }

    /// Set a host's monitoring status and return its id.
    ///
    /// `host.update`
    pub async fn set_host_status(&self, hostid: &str, status: u8) -> Result<String, Error> {
        info!(hostid, status, "updating host status");
        let ids: HostIds = self
            .call("host.update", &json!({ "hostid": hostid, "status": status }))
            .await?;
        first_id(ids.hostids, "host.update")
    }

    /// Delete a host and return its id.
    ///
    /// `host.delete`
    pub async fn delete_host(&self, hostid: &str) -> Result<String, Error> {
        info!(hostid, "deleting host");
        let ids: HostIds = self.call("host.delete", &json!([hostid])).await?;
        first_id(ids.hostids, "host.delete")
    }

    /// Host groups whose name is exactly `name`.
    ///
    /// `hostgroup.get` with `filter.name`
    pub async fn host_groups_by_name(&self, name: &str) -> Result<Vec<HostGroup>, Error> {
        debug!(name, "looking up host group");
        self.call(
            "hostgroup.get",
            &json!({ "output": "extend", "filter": { "name": [name] } }),
        )
        .await
    }

    /// Templates whose technical name is exactly `name`.
    ///
    /// `template.get` with `filter.host`
    pub async fn templates_by_name(&self, name: &str) -> Result<Vec<Template>, Error> {
        debug!(name, "looking up template");
        self.call(
            "template.get",
            &json!({ "output": "extend", "filter": { "host": [name] } }),
        )
        .await
    }
}

/// The first id of a mutation reply; an empty list is malformed.
pub(crate) fn first_id(ids: Vec<String>, method: &str) -> Result<String, Error> {
    ids.into_iter()
        .next()
        .ok_or_else(|| Error::MalformedResponse {
            method: method.to_owned(),
        })
}
