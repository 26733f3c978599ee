//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants into user-facing errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use zbx_core::CoreError;

/// Process exit codes, one per error class.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to the Zabbix frontend")]
    #[diagnostic(
        code(zbx::connection_failed),
        help(
            "Check that the frontend is running and the server URL points at it\n\
             (the directory that contains api_jsonrpc.php)."
        )
    )]
    ConnectionFailed {
        #[source]
        source: zbx_api::Error,
    },

    #[error("TLS setup failed: {reason}")]
    #[diagnostic(
        code(zbx::tls_error),
        help(
            "For a self-signed frontend use --insecure (-k),\n\
             or configure ca_cert in your profile."
        )
    )]
    TlsError { reason: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(zbx::auth_failed),
        help("Verify the user and password, or the API token, of the active profile.")
    )]
    AuthFailed { message: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(zbx::no_credentials),
        help(
            "Configure credentials with: zbx config init\n\
             Or set ZBX_API_TOKEN, or ZBX_USER and ZBX_PASSWORD."
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(code(zbx::not_found), help("{hint}"))]
    NotFound {
        resource_type: String,
        identifier: String,
        hint: String,
    },

    #[error("{count} {resource_type}s are named '{identifier}'")]
    #[diagnostic(
        code(zbx::ambiguous),
        help("Names are expected to be unique; rename the duplicates in the frontend.")
    )]
    Ambiguous {
        resource_type: String,
        identifier: String,
        count: usize,
    },

    #[error("{host} is covered by maintenance not managed by zbx: {names}")]
    #[diagnostic(
        code(zbx::foreign_maintenance),
        help("Foreign windows are left alone; edit them in the frontend.")
    )]
    ForeignMaintenance { host: String, names: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error ({code}): {message}")]
    #[diagnostic(code(zbx::api_error))]
    ApiError { code: String, message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(zbx::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(zbx::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: zbx config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration file not found")]
    #[diagnostic(
        code(zbx::no_config),
        help(
            "Create one with: zbx config init\n\
             Expected at: {path}\n\
             Or pass --server with --api-token or --user."
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(zbx::config))]
    Config(Box<figment::Error>),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(zbx::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Timeout ──────────────────────────────────────────────────────
    #[error("Request timed out")]
    #[diagnostic(
        code(zbx::timeout),
        help("Increase timeout with --timeout or check frontend responsiveness.")
    )]
    Timeout,

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::TlsError { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::ForeignMaintenance { .. } | Self::Ambiguous { .. } => exit_code::CONFLICT,
            Self::Timeout => exit_code::TIMEOUT,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

fn not_found(resource_type: &str, identifier: String, hint: &str) -> CliError {
    CliError::NotFound {
        resource_type: resource_type.into(),
        identifier,
        hint: hint.into(),
    }
}

// ── Backend error → CliError mapping ─────────────────────────────────

impl From<zbx_api::Error> for CliError {
    fn from(err: zbx_api::Error) -> Self {
        use zbx_api::Error as Api;

        if err.is_timeout() {
            return Self::Timeout;
        }
        if err.is_connect() {
            return Self::ConnectionFailed { source: err };
        }
        if err.is_auth_expired() {
            return Self::AuthFailed {
                message: err.to_string(),
            };
        }
        match err {
            Api::Tls(reason) => Self::TlsError { reason },
            Api::InvalidUrl(e) => Self::Validation {
                field: "server".into(),
                reason: e.to_string(),
            },
            Api::Rpc {
                method,
                code,
                message,
                data,
            } => Self::ApiError {
                code: code.to_string(),
                message: format!("{method}: {message} {data}").trim_end().to_owned(),
            },
            Api::Http { status, url } => Self::ApiError {
                code: status.to_string(),
                message: format!("unexpected HTTP status from {url}"),
            },
            other => Self::ApiError {
                code: "client".into(),
                message: other.to_string(),
            },
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::HostNotFound { name } => {
                not_found("host", name, "Check the technical host name (usually the FQDN).")
            }
            CoreError::TemplateNotFound { name } => not_found(
                "template",
                name,
                "Set host_template in your profile to an existing template.",
            ),
            CoreError::GroupNotFound { name } => {
                not_found("host group", name, "Host group names are case sensitive.")
            }
            CoreError::MaintenanceNotFound { host } => not_found(
                "scripted maintenance for",
                host,
                "Run: zbx maintenance list",
            ),
            CoreError::AddressNotFound { name } => {
                not_found("DNS address for", name, "The host must resolve to an IPv4 address.")
            }
            CoreError::AmbiguousIdentifier { kind, name, count } => Self::Ambiguous {
                resource_type: kind.to_string(),
                identifier: name,
                count,
            },
            CoreError::ForeignWindowConflict { host, names } => Self::ForeignMaintenance {
                host,
                names: names.join(", "),
            },
            CoreError::ValidationFailed { message } => Self::Validation {
                field: "input".into(),
                reason: message,
            },
            CoreError::Config { message } => Self::Validation {
                field: "config".into(),
                reason: message,
            },
            CoreError::Backend(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classes_map_to_exit_codes() {
        let host = CliError::from(CoreError::HostNotFound { name: "web1".into() });
        assert_eq!(host.exit_code(), exit_code::NOT_FOUND);

        let missing = CliError::from(CoreError::MaintenanceNotFound { host: "web1".into() });
        assert_eq!(missing.exit_code(), exit_code::NOT_FOUND);

        let foreign = CliError::from(CoreError::ForeignWindowConflict {
            host: "web1".into(),
            names: vec!["Patch Tuesday".into()],
        });
        assert_eq!(foreign.exit_code(), exit_code::CONFLICT);
        assert!(foreign.to_string().contains("Patch Tuesday"));

        let invalid = CliError::from(CoreError::ValidationFailed { message: "too short".into() });
        assert_eq!(invalid.exit_code(), exit_code::USAGE);
    }

    #[test]
    fn backend_errors_are_classified() {
        let auth = CliError::from(CoreError::Backend(zbx_api::Error::Authentication {
            message: "Incorrect user name or password".into(),
        }));
        assert_eq!(auth.exit_code(), exit_code::AUTH);

        let rpc = CliError::from(zbx_api::Error::Rpc {
            method: "host.create".into(),
            code: -32602,
            message: "Invalid params.".into(),
            data: "Host with the same name already exists.".into(),
        });
        assert_eq!(rpc.exit_code(), exit_code::GENERAL);
        assert!(rpc.to_string().contains("-32602"));
    }
}
