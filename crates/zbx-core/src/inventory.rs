// ── Host inventory ──
//
// Pass-through host operations: create, delete, toggle monitoring and the
// read-only listings. Every name is resolved before anything is mutated.

use std::net::IpAddr;

use tracing::{debug, info};
use zbx_api::models::{
    GroupId, HOST_STATUS_MONITORED, HOST_STATUS_UNMONITORED, Host, HostCreate, HostInterface,
    TemplateId,
};

use crate::backend::Backend;
use crate::config::Policy;
use crate::error::CoreError;
use crate::resolver::{require_host, resolve_group, resolve_template};

/// First IPv4 address `fqdn` resolves to.
pub async fn resolve_ipv4(fqdn: &str) -> Result<String, CoreError> {
    let not_found = || CoreError::AddressNotFound { name: fqdn.to_owned() };
    let addrs = tokio::net::lookup_host((fqdn, 0)).await.map_err(|e| {
        debug!(fqdn, error = %e, "dns lookup failed");
        not_found()
    })?;
    addrs
        .map(|a| a.ip())
        .find(IpAddr::is_ipv4)
        .map(|ip| ip.to_string())
        .ok_or_else(not_found)
}

/// Create `fqdn` with one agent interface at `ip`, linked to the policy's
/// template and placed in its default group.
pub async fn add_host<B: Backend>(
    backend: &B,
    policy: &Policy,
    fqdn: &str,
    ip: &str,
) -> Result<String, CoreError> {
    let templateid = resolve_template(backend, &policy.host_template)
        .await?
        .ok_or_else(|| CoreError::TemplateNotFound {
            name: policy.host_template.clone(),
        })?;

    let spec = HostCreate {
        host: fqdn.to_owned(),
        interfaces: vec![HostInterface::agent(fqdn, ip)],
        groups: vec![GroupId {
            groupid: policy.host_group_id.clone(),
        }],
        templates: vec![TemplateId { templateid }],
    };
    let id = backend.create_host(&spec).await?;
    info!(fqdn, ip, %id, "host created");
    Ok(id)
}

/// Delete `fqdn`; returns the deleted id.
pub async fn delete_host<B: Backend>(backend: &B, fqdn: &str) -> Result<String, CoreError> {
    let hostid = require_host(backend, fqdn).await?;
    let id = backend.delete_host(&hostid).await?;
    info!(fqdn, %id, "host deleted");
    Ok(id)
}

/// Enable or disable monitoring of `fqdn`.
pub async fn set_monitoring<B: Backend>(
    backend: &B,
    fqdn: &str,
    enabled: bool,
) -> Result<String, CoreError> {
    let hostid = require_host(backend, fqdn).await?;
    let status = if enabled {
        HOST_STATUS_MONITORED
    } else {
        HOST_STATUS_UNMONITORED
    };
    let id = backend.set_host_status(&hostid, status).await?;
    info!(fqdn, enabled, "monitoring status changed");
    Ok(id)
}

/// Hosts in the group called `name`.
pub async fn group_members<B: Backend>(backend: &B, name: &str) -> Result<Vec<Host>, CoreError> {
    let groupid = resolve_group(backend, name)
        .await?
        .ok_or_else(|| CoreError::GroupNotFound { name: name.to_owned() })?;
    Ok(backend.hosts_in_group(&groupid).await?)
}

/// Hosts with no linked template.
pub async fn hosts_without_templates<B: Backend>(backend: &B) -> Result<Vec<Host>, CoreError> {
    let hosts = backend.hosts_with_templates().await?;
    Ok(hosts
        .into_iter()
        .filter(|h| h.parent_templates.as_ref().is_none_or(Vec::is_empty))
        .collect())
}

/// Hosts with monitoring disabled.
pub async fn unmonitored_hosts<B: Backend>(backend: &B) -> Result<Vec<Host>, CoreError> {
    Ok(backend.hosts_by_status(HOST_STATUS_UNMONITORED).await?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use zbx_api::models::TemplateRef;

    use super::*;
    use crate::testing::{host, Call, FakeBackend};

    #[tokio::test]
    async fn ip_literal_resolves_without_dns() {
        assert_eq!(resolve_ipv4("192.0.2.10").await.unwrap(), "192.0.2.10");
    }

    #[tokio::test]
    async fn add_host_links_template_and_group() {
        let backend = FakeBackend::default();
        backend.add_template("10001", "Template OS Linux");
        let policy = Policy::default();

        let id = add_host(&backend, &policy, "new.example.com", "192.0.2.10").await.unwrap();

        let calls = backend.calls();
        let Some(Call::CreateHost(spec)) = calls.first() else {
            panic!("expected host.create, got {calls:?}");
        };
        assert_eq!(spec.host, "new.example.com");
        assert_eq!(spec.templates[0].templateid, "10001");
        assert_eq!(spec.groups[0].groupid, policy.host_group_id);
        assert_eq!(spec.interfaces[0].ip, "192.0.2.10");
        assert_eq!(spec.interfaces[0].dns, "new.example.com");
        assert_eq!(spec.interfaces[0].port, "10050");
        assert!(!id.is_empty());
    }

    #[tokio::test]
    async fn add_host_needs_template() {
        let backend = FakeBackend::default();
        let err = add_host(&backend, &Policy::default(), "new.example.com", "192.0.2.10")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::TemplateNotFound { ref name } if name == "Template OS Linux"
        ));
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn disable_unknown_host_is_not_found() {
        let backend = FakeBackend::default();
        let err = set_monitoring(&backend, "ghost.example.com", false).await.unwrap_err();
        assert!(matches!(err, CoreError::HostNotFound { .. }));
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn toggles_monitoring() {
        let backend = FakeBackend::default();
        backend.add_host(host("10084", "web1.example.com"));

        set_monitoring(&backend, "web1.example.com", false).await.unwrap();
        let unmonitored = unmonitored_hosts(&backend).await.unwrap();
        assert_eq!(unmonitored.len(), 1);

        set_monitoring(&backend, "web1.example.com", true).await.unwrap();
        assert!(unmonitored_hosts(&backend).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_host_resolves_first() {
        let backend = FakeBackend::default();
        backend.add_host(host("10084", "web1.example.com"));

        assert_eq!(delete_host(&backend, "web1.example.com").await.unwrap(), "10084");
        let err = delete_host(&backend, "web1.example.com").await.unwrap_err();
        assert!(matches!(err, CoreError::HostNotFound { .. }));
    }

    #[tokio::test]
    async fn group_members_by_name() {
        let backend = FakeBackend::default();
        backend.add_host(host("1", "a.example.com"));
        backend.add_host(host("2", "b.example.com"));
        backend.add_group("7", "Linux servers", &["2"]);

        let members = group_members(&backend, "Linux servers").await.unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].host, "b.example.com");

        let err = group_members(&backend, "Nope").await.unwrap_err();
        assert!(matches!(err, CoreError::GroupNotFound { .. }));
    }

    #[tokio::test]
    async fn lists_hosts_without_templates() {
        let backend = FakeBackend::default();
        let mut linked = host("1", "linked.example.com");
        linked.parent_templates = Some(vec![TemplateRef {
            templateid: "10001".into(),
            name: "Template OS Linux".into(),
        }]);
        let mut empty = host("2", "empty.example.com");
        empty.parent_templates = Some(Vec::new());
        backend.add_host(linked);
        backend.add_host(empty);
        backend.add_host(host("3", "bare.example.com"));

        let hosts = hosts_without_templates(&backend).await.unwrap();
        assert_eq!(
            hosts.iter().map(|h| h.hostid.as_str()).collect::<Vec<_>>(),
            vec!["2", "3"]
        );
    }
}
