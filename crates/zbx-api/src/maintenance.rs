// Maintenance endpoints

use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use crate::client::ZabbixClient;
use crate::error::Error;
use crate::hosts::first_id;
use crate::models::{de, Maintenance, MaintenanceCreate, MaintenanceUpdate};

#[derive(Deserialize)]
struct MaintenanceIds {
    #[serde(deserialize_with = "de::id_list")]
    maintenanceids: Vec<String>,
}

impl ZabbixClient {
    /// All maintenance windows, with time periods.
    ///
    /// `maintenance.get`
    pub async fn list_maintenances(&self) -> Result<Vec<Maintenance>, Error> {
        debug!("listing maintenances");
        self.call(
            "maintenance.get",
            &json!({
                "output": "extend",
                "selectGroups": "refer",
                "selectTimeperiods": "extend",
            }),
        )
        .await
    }

    /// Maintenance windows that include the given host.
    ///
    /// `maintenance.get` with `hostids`
    pub async fn maintenances_for_host(&self, hostid: &str) -> Result<Vec<Maintenance>, Error> {
        debug!(hostid, "listing maintenances for host");
        self.call(
            "maintenance.get",
            &json!({
                "output": "extend",
                "selectHosts": "refer",
                "selectGroups": "refer",
                "selectTimeperiods": "extend",
                "hostids": [hostid],
            }),
        )
        .await
    }

    /// Create a maintenance window and return its id.
    ///
    /// `maintenance.create`
    pub async fn create_maintenance(&self, spec: &MaintenanceCreate) -> Result<String, Error> {
        info!(
            name = %spec.name,
            since = spec.active_since,
            till = spec.active_till,
            "creating maintenance"
        );
        let ids: MaintenanceIds = self.call("maintenance.create", spec).await?;
        first_id(ids.maintenanceids, "maintenance.create")
    }

    /// Update a maintenance window and return its id.
    ///
    /// `maintenance.update`
    pub async fn update_maintenance(&self, spec: &MaintenanceUpdate) -> Result<String, Error> {
        info!(id = %spec.maintenanceid, till = spec.active_till, "updating maintenance");
        let ids: MaintenanceIds = self.call("maintenance.update", spec).await?;
        first_id(ids.maintenanceids, "maintenance.update")
    }

    /// Delete a maintenance window.
    ///
    /// Returns `Ok(None)` when the window no longer exists, so callers can
    /// treat a delete race as an outcome rather than a failure.
    ///
    /// `maintenance.delete`
    pub async fn delete_maintenance(&self, id: &str) -> Result<Option<String>, Error> {
        info!(id, "deleting maintenance");
        match self
            .call::<_, MaintenanceIds>("maintenance.delete", &json!([id]))
            .await
        {
            Ok(ids) => Ok(ids.maintenanceids.into_iter().next()),
            Err(e) if e.is_not_found() => {
                debug!(id, "maintenance already gone");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}
