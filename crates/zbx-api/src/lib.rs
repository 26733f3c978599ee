// zbx-api: Async Rust client for the Zabbix JSON-RPC API

pub mod auth;
pub mod client;
pub mod error;
pub mod hosts;
pub mod maintenance;
pub mod models;
pub mod problems;
pub mod transport;

pub use auth::ApiVersion;
pub use client::ZabbixClient;
pub use error::Error;
pub use problems::{AlertQuery, TriggerQuery, MAX_PRIORITY};
pub use transport::{TlsMode, TransportConfig};
