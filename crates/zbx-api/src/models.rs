// Zabbix API object models
//
// The API encodes nearly every number as a JSON string ("hostid": "10084",
// "active_till": "1700000000") and returns `[]` instead of `null` for
// absent sub-objects, so the lenient helpers in `de` are used liberally.

use serde::{Deserialize, Serialize};

// ── Lenient deserializers ────────────────────────────────────────────

pub(crate) mod de {
    use std::fmt::Display;
    use std::str::FromStr;

    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumOrStr<T> {
        Num(T),
        Str(String),
    }

    /// A number sent either as a JSON number or as a numeric string.
    pub fn num<'de, D, T>(d: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: FromStr + Deserialize<'de>,
        T::Err: Display,
    {
        match NumOrStr::<T>::deserialize(d)? {
            NumOrStr::Num(n) => Ok(n),
            NumOrStr::Str(s) => s.trim().parse().map_err(D::Error::custom),
        }
    }

    /// An object id sent either as a string or as a number.
    pub fn id<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        match NumOrStr::<u64>::deserialize(d)? {
            NumOrStr::Num(n) => Ok(n.to_string()),
            NumOrStr::Str(s) => Ok(s),
        }
    }

    /// A list of object ids, mixed strings and numbers allowed.
    pub fn id_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
        let raw = Vec::<NumOrStr<u64>>::deserialize(d)?;
        Ok(raw
            .into_iter()
            .map(|v| match v {
                NumOrStr::Num(n) => n.to_string(),
                NumOrStr::Str(s) => s,
            })
            .collect())
    }

    /// A `0`/`1` flag, as number, string or boolean.
    pub fn flag<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Bool(bool),
            Num(i64),
            Str(String),
        }
        Ok(match Raw::deserialize(d)? {
            Raw::Bool(b) => b,
            Raw::Num(n) => n != 0,
            Raw::Str(s) => s.trim() != "0" && !s.trim().is_empty(),
        })
    }

    /// A sub-object that is `[]` or `null` when absent.
    pub fn object_or_empty<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw<T> {
            Object(T),
            Empty(Vec<serde_json::Value>),
        }
        match Option::<Raw<T>>::deserialize(d)? {
            Some(Raw::Object(obj)) => Ok(Some(obj)),
            Some(Raw::Empty(v)) if v.is_empty() => Ok(None),
            Some(Raw::Empty(_)) => Err(D::Error::custom("expected an object or an empty array")),
            None => Ok(None),
        }
    }
}

// ── Host ─────────────────────────────────────────────────────────────

/// Host status value for a monitored host.
pub const HOST_STATUS_MONITORED: u8 = 0;
/// Host status value for an unmonitored (disabled) host.
pub const HOST_STATUS_UNMONITORED: u8 = 1;

/// Host object from `host.get`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Host {
    #[serde(deserialize_with = "de::id")]
    pub hostid: String,
    /// Technical name (the FQDN for hosts created by this tool).
    pub host: String,
    /// Visible name.
    #[serde(default)]
    pub name: String,
    /// 0 = monitored, 1 = unmonitored.
    #[serde(default, deserialize_with = "de::num")]
    pub status: u8,
    /// 1 while an active maintenance covers the host.
    #[serde(default, deserialize_with = "de::num")]
    pub maintenance_status: u8,
    #[serde(default, rename = "parentTemplates", skip_serializing_if = "Option::is_none")]
    pub parent_templates: Option<Vec<TemplateRef>>,
}

impl Host {
    pub fn is_monitored(&self) -> bool {
        self.status == HOST_STATUS_MONITORED
    }

    pub fn in_maintenance(&self) -> bool {
        self.maintenance_status == 1
    }

    /// Visible name, falling back to the technical name.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.host
        } else {
            &self.name
        }
    }
}

/// Linked template as returned by `selectParentTemplates`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateRef {
    #[serde(deserialize_with = "de::id")]
    pub templateid: String,
    #[serde(default)]
    pub name: String,
}

/// Host group object from `hostgroup.get`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostGroup {
    #[serde(deserialize_with = "de::id")]
    pub groupid: String,
    pub name: String,
}

/// Template object from `template.get`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Template {
    #[serde(deserialize_with = "de::id")]
    pub templateid: String,
    pub host: String,
    #[serde(default)]
    pub name: String,
}

/// Agent interface for `host.create`.
#[derive(Debug, Clone, Serialize)]
pub struct HostInterface {
    /// 1 = Zabbix agent.
    #[serde(rename = "type")]
    pub interface_type: u8,
    pub main: u8,
    /// 0 = connect by DNS name, 1 = by IP.
    pub useip: u8,
    pub ip: String,
    pub dns: String,
    pub port: String,
}

impl HostInterface {
    /// Default agent interface connecting by DNS name on port 10050.
    pub fn agent(fqdn: &str, ip: &str) -> Self {
        Self {
            interface_type: 1,
            main: 1,
            useip: 0,
            ip: ip.to_owned(),
            dns: fqdn.to_owned(),
            port: "10050".into(),
        }
    }
}

/// Parameters for `host.create`.
#[derive(Debug, Clone, Serialize)]
pub struct HostCreate {
    pub host: String,
    pub interfaces: Vec<HostInterface>,
    pub groups: Vec<GroupId>,
    pub templates: Vec<TemplateId>,
}

/// `{ "groupid": ... }` reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupId {
    #[serde(deserialize_with = "de::id")]
    pub groupid: String,
}

/// `{ "templateid": ... }` reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateId {
    #[serde(deserialize_with = "de::id")]
    pub templateid: String,
}

/// `{ "hostid": ... }` reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostId {
    #[serde(deserialize_with = "de::id")]
    pub hostid: String,
}

// ── Maintenance ──────────────────────────────────────────────────────

/// Maintenance type "with data collection".
pub const MAINTENANCE_WITH_DATA: u8 = 0;
/// Time period type "one time only".
pub const TIMEPERIOD_ONE_TIME: u8 = 0;

/// Maintenance object from `maintenance.get`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Maintenance {
    #[serde(deserialize_with = "de::id")]
    pub maintenanceid: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Epoch seconds.
    #[serde(deserialize_with = "de::num")]
    pub active_since: i64,
    /// Epoch seconds.
    #[serde(deserialize_with = "de::num")]
    pub active_till: i64,
    #[serde(default, deserialize_with = "de::num")]
    pub maintenance_type: u8,
    #[serde(default)]
    pub timeperiods: Vec<TimePeriod>,
    #[serde(default)]
    pub hosts: Vec<HostId>,
    #[serde(default)]
    pub groups: Vec<GroupId>,
}

/// A maintenance time period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimePeriod {
    #[serde(default, deserialize_with = "de::num")]
    pub timeperiod_type: u8,
    #[serde(default, deserialize_with = "de::num")]
    pub start_date: i64,
    /// Seconds.
    #[serde(default, deserialize_with = "de::num")]
    pub period: i64,
}

impl TimePeriod {
    /// A one-off period starting at `start_date` lasting `period` seconds.
    pub fn one_time(start_date: i64, period: i64) -> Self {
        Self {
            timeperiod_type: TIMEPERIOD_ONE_TIME,
            start_date,
            period,
        }
    }
}

/// Parameters for `maintenance.create`.
#[derive(Debug, Clone, Serialize)]
pub struct MaintenanceCreate {
    pub name: String,
    pub description: String,
    pub maintenance_type: u8,
    pub active_since: i64,
    pub active_till: i64,
    pub hostids: Vec<String>,
    pub groupids: Vec<String>,
    pub timeperiods: Vec<TimePeriod>,
}

/// Parameters for `maintenance.update`.
#[derive(Debug, Clone, Serialize)]
pub struct MaintenanceUpdate {
    pub maintenanceid: String,
    pub active_since: i64,
    pub active_till: i64,
    /// Older servers reject an update that omits the host/group binding.
    pub hostids: Vec<String>,
    pub groupids: Vec<String>,
    pub timeperiods: Vec<TimePeriod>,
}

// ── Trigger ──────────────────────────────────────────────────────────

/// Trigger object from `trigger.get`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trigger {
    #[serde(deserialize_with = "de::id")]
    pub triggerid: String,
    pub description: String,
    /// 0 (not classified) .. 5 (disaster).
    #[serde(deserialize_with = "de::num")]
    pub priority: u8,
    /// Epoch seconds of the last state change.
    #[serde(default, deserialize_with = "de::num")]
    pub lastchange: i64,
    /// 1 while firing.
    #[serde(default, deserialize_with = "de::num")]
    pub value: u8,
    #[serde(default)]
    pub hosts: Vec<TriggerHost>,
    #[serde(
        default,
        rename = "lastEvent",
        deserialize_with = "de::object_or_empty"
    )]
    pub last_event: Option<LastEvent>,
}

/// Host embedded in a trigger via `selectHosts`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerHost {
    #[serde(deserialize_with = "de::id")]
    pub hostid: String,
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "de::num")]
    pub maintenance_status: u8,
}

impl TriggerHost {
    /// Visible name, falling back to the technical name.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.host
        } else {
            &self.name
        }
    }
}

/// Event embedded in a trigger via `selectLastEvent`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LastEvent {
    #[serde(deserialize_with = "de::id")]
    pub eventid: String,
    #[serde(default, deserialize_with = "de::num")]
    pub clock: i64,
}

// ── Event ────────────────────────────────────────────────────────────

/// Event object from `event.get`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    #[serde(deserialize_with = "de::id")]
    pub eventid: String,
    #[serde(default, deserialize_with = "de::num")]
    pub clock: i64,
    #[serde(default, deserialize_with = "de::flag")]
    pub acknowledged: bool,
    #[serde(default)]
    pub acknowledges: Vec<Acknowledgement>,
}

/// Acknowledgement attached to an event (`select_acknowledges`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Acknowledgement {
    /// Author login. Called `username` from 5.4 on.
    #[serde(default, alias = "username")]
    pub alias: String,
    #[serde(default)]
    pub message: String,
    #[serde(default, deserialize_with = "de::num")]
    pub clock: i64,
}

// ── Alert ────────────────────────────────────────────────────────────

/// Notification record from `alert.get`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    #[serde(deserialize_with = "de::id")]
    pub alertid: String,
    #[serde(deserialize_with = "de::id")]
    pub eventid: String,
    #[serde(default, deserialize_with = "de::num")]
    pub clock: i64,
    /// `"<host>:<description>"` for the default action templates.
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub sendto: String,
}
