// In-memory `Backend` for unit tests. Records every mutation so tests can
// assert on exactly which calls were issued.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

use zbx_api::models::{
    Acknowledgement, Alert, Event, GroupId, Host, HostCreate, HostGroup, HostId, LastEvent,
    Maintenance, MaintenanceCreate, MaintenanceUpdate, Template, Trigger, TriggerHost,
};
use zbx_api::{AlertQuery, Error, TriggerQuery};

use crate::backend::Backend;

/// A mutation issued against the fake.
#[derive(Debug, Clone)]
pub(crate) enum Call {
    CreateMaintenance(MaintenanceCreate),
    UpdateMaintenance(MaintenanceUpdate),
    DeleteMaintenance(String),
    CreateHost(HostCreate),
    SetHostStatus(String, u8),
    DeleteHost(String),
    Acknowledge(String, String),
}

#[derive(Default)]
struct State {
    hosts: Vec<Host>,
    groups: Vec<HostGroup>,
    memberships: Vec<(String, String)>,
    templates: Vec<Template>,
    maintenances: Vec<Maintenance>,
    triggers: Vec<Trigger>,
    events: Vec<Event>,
    alerts: Vec<Alert>,
    vanished: HashSet<String>,
    failing: HashSet<String>,
    calls: Vec<Call>,
    trigger_queries: Vec<TriggerQuery>,
    alert_queries: Vec<AlertQuery>,
    next_id: u64,
}

#[derive(Default)]
pub(crate) struct FakeBackend {
    state: Mutex<State>,
}

impl FakeBackend {
    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    pub fn add_host(&self, host: Host) {
        self.state().hosts.push(host);
    }

    pub fn add_group(&self, id: &str, name: &str, members: &[&str]) {
        let mut s = self.state();
        s.groups.push(HostGroup { groupid: id.into(), name: name.into() });
        for hostid in members {
            s.memberships.push((id.into(), (*hostid).into()));
        }
    }

    pub fn add_template(&self, id: &str, name: &str) {
        self.state().templates.push(Template {
            templateid: id.into(),
            host: name.into(),
            name: name.into(),
        });
    }

    pub fn add_window(&self, window: Maintenance) {
        self.state().maintenances.push(window);
    }

    pub fn add_trigger(&self, trigger: Trigger) {
        self.state().triggers.push(trigger);
    }

    pub fn add_event(&self, event: Event) {
        self.state().events.push(event);
    }

    pub fn add_alert(&self, alert: Alert) {
        self.state().alerts.push(alert);
    }

    /// The window stays listed but deleting it reports "not found".
    pub fn vanish(&self, id: &str) {
        self.state().vanished.insert(id.into());
    }

    /// Deleting the window fails with a backend error.
    pub fn fail_delete(&self, id: &str) {
        self.state().failing.insert(id.into());
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state().calls.clone()
    }

    pub fn window(&self, id: &str) -> Option<Maintenance> {
        self.state().maintenances.iter().find(|m| m.maintenanceid == id).cloned()
    }

    pub fn trigger_queries(&self) -> Vec<TriggerQuery> {
        self.state().trigger_queries.clone()
    }

    pub fn alert_queries(&self) -> Vec<AlertQuery> {
        self.state().alert_queries.clone()
    }

    fn next_id(&self) -> String {
        let mut s = self.state();
        s.next_id += 1;
        format!("{}", 900 + s.next_id)
    }
}

impl Backend for FakeBackend {
    async fn hosts_by_name(&self, name: &str) -> Result<Vec<Host>, Error> {
        Ok(self.state().hosts.iter().filter(|h| h.host == name).cloned().collect())
    }

    async fn host_groups_by_name(&self, name: &str) -> Result<Vec<HostGroup>, Error> {
        Ok(self.state().groups.iter().filter(|g| g.name == name).cloned().collect())
    }

    async fn templates_by_name(&self, name: &str) -> Result<Vec<Template>, Error> {
        Ok(self.state().templates.iter().filter(|t| t.host == name).cloned().collect())
    }

    async fn hosts_in_group(&self, groupid: &str) -> Result<Vec<Host>, Error> {
        let s = self.state();
        Ok(s.hosts
            .iter()
            .filter(|h| s.memberships.iter().any(|(g, m)| g == groupid && *m == h.hostid))
            .cloned()
            .collect())
    }

    async fn hosts_by_status(&self, status: u8) -> Result<Vec<Host>, Error> {
        Ok(self.state().hosts.iter().filter(|h| h.status == status).cloned().collect())
    }

    async fn hosts_with_templates(&self) -> Result<Vec<Host>, Error> {
        Ok(self.state().hosts.clone())
    }

    async fn create_host(&self, spec: &HostCreate) -> Result<String, Error> {
        let id = self.next_id();
        let mut s = self.state();
        s.calls.push(Call::CreateHost(spec.clone()));
        s.hosts.push(host(&id, &spec.host));
        Ok(id)
    }

    async fn set_host_status(&self, hostid: &str, status: u8) -> Result<String, Error> {
        let mut s = self.state();
        s.calls.push(Call::SetHostStatus(hostid.into(), status));
        if let Some(h) = s.hosts.iter_mut().find(|h| h.hostid == hostid) {
            h.status = status;
        }
        Ok(hostid.into())
    }

    async fn delete_host(&self, hostid: &str) -> Result<String, Error> {
        let mut s = self.state();
        s.calls.push(Call::DeleteHost(hostid.into()));
        s.hosts.retain(|h| h.hostid != hostid);
        Ok(hostid.into())
    }

    async fn list_maintenances(&self) -> Result<Vec<Maintenance>, Error> {
        Ok(self.state().maintenances.clone())
    }

    async fn maintenances_for_host(&self, hostid: &str) -> Result<Vec<Maintenance>, Error> {
        Ok(self
            .state()
            .maintenances
            .iter()
            .filter(|m| m.hosts.iter().any(|h| h.hostid == hostid))
            .cloned()
            .collect())
    }

    async fn create_maintenance(&self, spec: &MaintenanceCreate) -> Result<String, Error> {
        let id = self.next_id();
        let mut s = self.state();
        s.calls.push(Call::CreateMaintenance(spec.clone()));
        s.maintenances.push(Maintenance {
            maintenanceid: id.clone(),
            name: spec.name.clone(),
            description: spec.description.clone(),
            active_since: spec.active_since,
            active_till: spec.active_till,
            maintenance_type: spec.maintenance_type,
            timeperiods: spec.timeperiods.clone(),
            hosts: spec.hostids.iter().map(|id| HostId { hostid: id.clone() }).collect(),
            groups: spec.groupids.iter().map(|id| GroupId { groupid: id.clone() }).collect(),
        });
        Ok(id)
    }

    async fn update_maintenance(&self, spec: &MaintenanceUpdate) -> Result<String, Error> {
        let mut s = self.state();
        s.calls.push(Call::UpdateMaintenance(spec.clone()));
        if let Some(m) = s.maintenances.iter_mut().find(|m| m.maintenanceid == spec.maintenanceid) {
            m.active_since = spec.active_since;
            m.active_till = spec.active_till;
            m.timeperiods.clone_from(&spec.timeperiods);
        }
        Ok(spec.maintenanceid.clone())
    }

    async fn delete_maintenance(&self, id: &str) -> Result<Option<String>, Error> {
        let mut s = self.state();
        s.calls.push(Call::DeleteMaintenance(id.into()));
        if s.failing.contains(id) {
            return Err(Error::Rpc {
                method: "maintenance.delete".into(),
                code: -32500,
                message: "Application error.".into(),
                data: "SQL statement execution has failed.".into(),
            });
        }
        if s.vanished.contains(id) {
            return Ok(None);
        }
        let before = s.maintenances.len();
        s.maintenances.retain(|m| m.maintenanceid != id);
        Ok((s.maintenances.len() < before).then(|| id.to_owned()))
    }

    async fn firing_triggers(&self, query: TriggerQuery) -> Result<Vec<Trigger>, Error> {
        let mut s = self.state();
        s.trigger_queries.push(query);
        let limit = usize::try_from(query.limit).unwrap_or(usize::MAX);
        Ok(s.triggers
            .iter()
            .filter(|t| t.priority >= query.min_priority)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn events(&self, eventids: &[String]) -> Result<Vec<Event>, Error> {
        Ok(self
            .state()
            .events
            .iter()
            .filter(|e| eventids.contains(&e.eventid))
            .cloned()
            .collect())
    }

    async fn acknowledge_event(&self, eventid: &str, message: &str) -> Result<Vec<String>, Error> {
        self.state()
            .calls
            .push(Call::Acknowledge(eventid.into(), message.into()));
        Ok(vec![eventid.into()])
    }

    async fn alerts(&self, query: &AlertQuery) -> Result<Vec<Alert>, Error> {
        let mut s = self.state();
        s.alert_queries.push(query.clone());
        Ok(s.alerts
            .iter()
            .filter(|a| a.clock >= query.time_from)
            .cloned()
            .collect())
    }
}

// ── Fixtures ─────────────────────────────────────────────────────────

pub(crate) fn host(id: &str, name: &str) -> Host {
    Host {
        hostid: id.into(),
        host: name.into(),
        name: name.into(),
        status: 0,
        maintenance_status: 0,
        parent_templates: None,
    }
}

pub(crate) fn window(id: &str, name: &str, hostid: &str, since: i64, till: i64) -> Maintenance {
    Maintenance {
        maintenanceid: id.into(),
        name: name.into(),
        description: String::new(),
        active_since: since,
        active_till: till,
        maintenance_type: 0,
        timeperiods: Vec::new(),
        hosts: vec![HostId { hostid: hostid.into() }],
        groups: vec![GroupId { groupid: "5".into() }],
    }
}

pub(crate) fn trigger(
    id: &str,
    host_name: &str,
    priority: u8,
    lastchange: i64,
    suppressed: bool,
    eventid: Option<&str>,
) -> Trigger {
    Trigger {
        triggerid: id.into(),
        description: format!("Problem {id} on {host_name}"),
        priority,
        lastchange,
        value: 1,
        hosts: vec![TriggerHost {
            hostid: format!("h-{host_name}"),
            host: host_name.into(),
            name: host_name.into(),
            maintenance_status: u8::from(suppressed),
        }],
        last_event: eventid.map(|e| LastEvent { eventid: e.into(), clock: lastchange }),
    }
}

pub(crate) fn event(id: &str, acks: &[(&str, &str)]) -> Event {
    Event {
        eventid: id.into(),
        clock: 0,
        acknowledged: !acks.is_empty(),
        acknowledges: acks
            .iter()
            .map(|(alias, message)| Acknowledgement {
                alias: (*alias).into(),
                message: (*message).into(),
                clock: 0,
            })
            .collect(),
    }
}

pub(crate) fn alert(alertid: &str, eventid: &str, clock: i64, subject: &str) -> Alert {
    Alert {
        alertid: alertid.into(),
        eventid: eventid.into(),
        clock,
        subject: subject.into(),
        sendto: String::new(),
    }
}
