// ── Core error types ──
//
// Typed outcomes of the core operations. Lookup misses and the foreign
// window conflict are expected results the caller branches on; backend
// failures are wrapped unmodified and never retried here.

use thiserror::Error;

use crate::resolver::IdentifierKind;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Lookup misses ────────────────────────────────────────────────
    #[error("Host not found: {name}")]
    HostNotFound { name: String },

    #[error("Template not found: {name}")]
    TemplateNotFound { name: String },

    #[error("Host group not found: {name}")]
    GroupNotFound { name: String },

    #[error("No scripted maintenance found for {host}")]
    MaintenanceNotFound { host: String },

    #[error("No IPv4 address found for {name}")]
    AddressNotFound { name: String },

    #[error("{count} {kind}s match '{name}'")]
    AmbiguousIdentifier {
        kind: IdentifierKind,
        name: String,
        count: usize,
    },

    // ── Conflicts ────────────────────────────────────────────────────
    #[error("{host} is covered by foreign maintenance: {}", .names.join(", "))]
    ForeignWindowConflict { host: String, names: Vec<String> },

    // ── Input ────────────────────────────────────────────────────────
    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Backend (wrapped, not reinterpreted) ─────────────────────────
    #[error(transparent)]
    Backend(#[from] zbx_api::Error),
}

impl CoreError {
    /// Returns `true` for the lookup-miss class.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::HostNotFound { .. }
                | Self::TemplateNotFound { .. }
                | Self::GroupNotFound { .. }
                | Self::MaintenanceNotFound { .. }
                | Self::AddressNotFound { .. }
        )
    }

    /// The wrapped backend error, if any.
    pub fn backend(&self) -> Option<&zbx_api::Error> {
        match self {
            Self::Backend(e) => Some(e),
            _ => None,
        }
    }
}
