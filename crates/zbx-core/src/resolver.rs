// ── Identifier resolution ──
//
// Human keys (host name, group name, template name) to backend ids by
// exact-match filter. A miss is `Ok(None)`; only transport/auth failures
// are errors. More than one match is reported instead of picking one,
// since the backend does not promise a stable result order.

use std::fmt;

use tracing::{debug, warn};

use crate::backend::Backend;
use crate::error::CoreError;

/// The kind of object an identifier names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierKind {
    Host,
    Group,
    Template,
}

impl fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Host => "host",
            Self::Group => "host group",
            Self::Template => "template",
        })
    }
}

/// Resolve a host's technical name to its id.
pub async fn resolve_host<B: Backend>(
    backend: &B,
    name: &str,
) -> Result<Option<String>, CoreError> {
    let hosts = backend.hosts_by_name(name).await?;
    single(IdentifierKind::Host, name, hosts.into_iter().map(|h| h.hostid).collect())
}

/// Resolve a host group name to its id.
pub async fn resolve_group<B: Backend>(
    backend: &B,
    name: &str,
) -> Result<Option<String>, CoreError> {
    let groups = backend.host_groups_by_name(name).await?;
    single(IdentifierKind::Group, name, groups.into_iter().map(|g| g.groupid).collect())
}

/// Resolve a template's technical name to its id.
pub async fn resolve_template<B: Backend>(
    backend: &B,
    name: &str,
) -> Result<Option<String>, CoreError> {
    let templates = backend.templates_by_name(name).await?;
    single(
        IdentifierKind::Template,
        name,
        templates.into_iter().map(|t| t.templateid).collect(),
    )
}

/// Resolve a host, turning a miss into `HostNotFound`.
pub async fn require_host<B: Backend>(backend: &B, name: &str) -> Result<String, CoreError> {
    resolve_host(backend, name)
        .await?
        .ok_or_else(|| CoreError::HostNotFound { name: name.to_owned() })
}

fn single(
    kind: IdentifierKind,
    name: &str,
    mut ids: Vec<String>,
) -> Result<Option<String>, CoreError> {
    match ids.len() {
        0 => {
            debug!(%kind, name, "no match");
            Ok(None)
        }
        1 => Ok(ids.pop()),
        count => {
            warn!(%kind, name, count, "ambiguous identifier");
            Err(CoreError::AmbiguousIdentifier {
                kind,
                name: name.to_owned(),
                count,
            })
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::testing::{host, FakeBackend};

    #[tokio::test]
    async fn resolves_single_match() {
        let backend = FakeBackend::default();
        backend.add_host(host("10084", "web1.example.com"));

        let id = resolve_host(&backend, "web1.example.com").await.unwrap();
        assert_eq!(id.as_deref(), Some("10084"));
    }

    #[tokio::test]
    async fn miss_is_none_not_error() {
        let backend = FakeBackend::default();
        assert_eq!(resolve_host(&backend, "nope").await.unwrap(), None);
        assert_eq!(resolve_group(&backend, "nope").await.unwrap(), None);
        assert_eq!(resolve_template(&backend, "nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn require_host_maps_miss() {
        let backend = FakeBackend::default();
        let err = require_host(&backend, "ghost.example.com").await.unwrap_err();
        assert!(matches!(err, CoreError::HostNotFound { ref name } if name == "ghost.example.com"));
    }

    #[tokio::test]
    async fn multiple_matches_are_ambiguous() {
        let backend = FakeBackend::default();
        backend.add_host(host("1", "dup.example.com"));
        backend.add_host(host("2", "dup.example.com"));

        let err = resolve_host(&backend, "dup.example.com").await.unwrap_err();
        assert!(matches!(
            err,
            CoreError::AmbiguousIdentifier { kind: IdentifierKind::Host, count: 2, .. }
        ));
    }
}
