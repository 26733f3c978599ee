// ── Backend seam ──
//
// Every operation in this crate talks to Zabbix through `Backend`, never
// through a global session. `ZabbixClient` is the production
// implementation; tests substitute an in-memory fake.

use std::future::Future;

use zbx_api::models::{
    Alert, Event, Host, HostCreate, HostGroup, Maintenance, MaintenanceCreate, MaintenanceUpdate,
    Template, Trigger,
};
use zbx_api::{AlertQuery, Error, TriggerQuery, ZabbixClient};

/// The backend operations the core consumes.
pub trait Backend: Sync {
    // ── Lookups ──────────────────────────────────────────────────────
    fn hosts_by_name(&self, name: &str) -> impl Future<Output = Result<Vec<Host>, Error>> + Send;

    fn host_groups_by_name(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Vec<HostGroup>, Error>> + Send;

    fn templates_by_name(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Vec<Template>, Error>> + Send;

    // ── Hosts ────────────────────────────────────────────────────────
    fn hosts_in_group(
        &self,
        groupid: &str,
    ) -> impl Future<Output = Result<Vec<Host>, Error>> + Send;

    fn hosts_by_status(&self, status: u8) -> impl Future<Output = Result<Vec<Host>, Error>> + Send;

    fn hosts_with_templates(&self) -> impl Future<Output = Result<Vec<Host>, Error>> + Send;

    fn create_host(&self, spec: &HostCreate) -> impl Future<Output = Result<String, Error>> + Send;

    fn set_host_status(
        &self,
        hostid: &str,
        status: u8,
    ) -> impl Future<Output = Result<String, Error>> + Send;

    fn delete_host(&self, hostid: &str) -> impl Future<Output = Result<String, Error>> + Send;

    // ── Maintenance ──────────────────────────────────────────────────
    fn list_maintenances(&self) -> impl Future<Output = Result<Vec<Maintenance>, Error>> + Send;

    fn maintenances_for_host(
        &self,
        hostid: &str,
    ) -> impl Future<Output = Result<Vec<Maintenance>, Error>> + Send;

    fn create_maintenance(
        &self,
        spec: &MaintenanceCreate,
    ) -> impl Future<Output = Result<String, Error>> + Send;

    fn update_maintenance(
        &self,
        spec: &MaintenanceUpdate,
    ) -> impl Future<Output = Result<String, Error>> + Send;

    /// `Ok(None)` when the window is already gone.
    fn delete_maintenance(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<Option<String>, Error>> + Send;

    // ── Problems ─────────────────────────────────────────────────────
    fn firing_triggers(
        &self,
        query: TriggerQuery,
    ) -> impl Future<Output = Result<Vec<Trigger>, Error>> + Send;

    fn events(&self, eventids: &[String])
    -> impl Future<Output = Result<Vec<Event>, Error>> + Send;

    fn acknowledge_event(
        &self,
        eventid: &str,
        message: &str,
    ) -> impl Future<Output = Result<Vec<String>, Error>> + Send;

    fn alerts(&self, query: &AlertQuery) -> impl Future<Output = Result<Vec<Alert>, Error>> + Send;
}

impl Backend for ZabbixClient {
    fn hosts_by_name(&self, name: &str) -> impl Future<Output = Result<Vec<Host>, Error>> + Send {
        ZabbixClient::hosts_by_name(self, name)
    }

    fn host_groups_by_name(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Vec<HostGroup>, Error>> + Send {
        ZabbixClient::host_groups_by_name(self, name)
    }

    fn templates_by_name(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Vec<Template>, Error>> + Send {
        ZabbixClient::templates_by_name(self, name)
    }

    fn hosts_in_group(
        &self,
        groupid: &str,
    ) -> impl Future<Output = Result<Vec<Host>, Error>> + Send {
        ZabbixClient::hosts_in_group(self, groupid)
    }

    fn hosts_by_status(&self, status: u8) -> impl Future<Output = Result<Vec<Host>, Error>> + Send {
        ZabbixClient::hosts_by_status(self, status)
    }

    fn hosts_with_templates(&self) -> impl Future<Output = Result<Vec<Host>, Error>> + Send {
        ZabbixClient::hosts_with_templates(self)
    }

    fn create_host(&self, spec: &HostCreate) -> impl Future<Output = Result<String, Error>> + Send {
        ZabbixClient::create_host(self, spec)
    }

    fn set_host_status(
        &self,
        hostid: &str,
        status: u8,
    ) -> impl Future<Output = Result<String, Error>> + Send {
        ZabbixClient::set_host_status(self, hostid, status)
    }

    fn delete_host(&self, hostid: &str) -> impl Future<Output = Result<String, Error>> + Send {
        ZabbixClient::delete_host(self, hostid)
    }

    fn list_maintenances(&self) -> impl Future<Output = Result<Vec<Maintenance>, Error>> + Send {
        ZabbixClient::list_maintenances(self)
    }

    fn maintenances_for_host(
        &self,
        hostid: &str,
    ) -> impl Future<Output = Result<Vec<Maintenance>, Error>> + Send {
        ZabbixClient::maintenances_for_host(self, hostid)
    }

    fn create_maintenance(
        &self,
        spec: &MaintenanceCreate,
    ) -> impl Future<Output = Result<String, Error>> + Send {
        ZabbixClient::create_maintenance(self, spec)
    }

    fn update_maintenance(
        &self,
        spec: &MaintenanceUpdate,
    ) -> impl Future<Output = Result<String, Error>> + Send {
        ZabbixClient::update_maintenance(self, spec)
    }

    fn delete_maintenance(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<Option<String>, Error>> + Send {
        ZabbixClient::delete_maintenance(self, id)
    }

    fn firing_triggers(
        &self,
        query: TriggerQuery,
    ) -> impl Future<Output = Result<Vec<Trigger>, Error>> + Send {
        ZabbixClient::firing_triggers(self, query)
    }

    fn events(
        &self,
        eventids: &[String],
    ) -> impl Future<Output = Result<Vec<Event>, Error>> + Send {
        ZabbixClient::events(self, eventids)
    }

    fn acknowledge_event(
        &self,
        eventid: &str,
        message: &str,
    ) -> impl Future<Output = Result<Vec<String>, Error>> + Send {
        ZabbixClient::acknowledge_event(self, eventid, message)
    }

    fn alerts(&self, query: &AlertQuery) -> impl Future<Output = Result<Vec<Alert>, Error>> + Send {
        ZabbixClient::alerts(self, query)
    }
}
