//! CLI-owned configuration: TOML profiles, credential resolution, and
//! translation to `zbx_core::ConnectionConfig` plus the site `Policy`.
//!
//! Core never sees these types -- it receives a pre-built `ConnectionConfig`.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use zbx_core::{
    AuthCredentials, ConnectionConfig, HistoryOrder, Policy, Severity, TlsVerification,
};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Environment variable read for the password when a profile names none.
pub const DEFAULT_PASSWORD_ENV: &str = "ZBX_PASSWORD";

// ── TOML config structs ──────────────────────────────────────────────

/// CLI-owned TOML configuration. Core never touches this type.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name (used when --profile is not specified).
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named server profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            insecure: false,
            timeout: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

/// One Zabbix frontend and the policy applied to it.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Frontend base URL (e.g., "https://zabbix.example.com/zabbix").
    #[serde(default)]
    pub server: String,

    /// Login name for `user.login`.
    pub user: Option<String>,

    /// Password (plaintext -- prefer password_env).
    pub password: Option<String>,

    /// Environment variable name containing the password.
    pub password_env: Option<String>,

    /// API token (plaintext -- prefer api_token_env).
    pub api_token: Option<String>,

    /// Environment variable name containing the API token.
    pub api_token_env: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout.
    pub timeout: Option<u64>,

    // ── Policy overrides ─────────────────────────────────────────────
    pub suppression_group_id: Option<String>,
    pub notification_user_id: Option<String>,
    pub min_severity: Option<Severity>,
    pub highlight_severity: Option<Severity>,
    pub history_order: Option<HistoryOrder>,
    pub host_template: Option<String>,
    pub host_group_id: Option<String>,
}

impl Profile {
    /// The site policy with this profile's overrides applied.
    pub fn policy(&self) -> Policy {
        let mut policy = Policy::default();
        if let Some(ref id) = self.suppression_group_id {
            policy.suppression_group_id.clone_from(id);
        }
        if let Some(ref id) = self.notification_user_id {
            policy.notification_user_id.clone_from(id);
        }
        if let Some(severity) = self.min_severity {
            policy.min_severity = severity;
        }
        if let Some(severity) = self.highlight_severity {
            policy.highlight_severity = severity;
        }
        if let Some(order) = self.history_order {
            policy.history_order = order;
        }
        if let Some(ref name) = self.host_template {
            policy.host_template.clone_from(name);
        }
        if let Some(ref id) = self.host_group_id {
            policy.host_group_id.clone_from(id);
        }
        policy
    }
}

// ── Config file path ─────────────────────────────────────────────────

/// Resolve the config file path: `ZBX_CONFIG`, else the platform config dir.
pub fn config_path() -> PathBuf {
    if let Some(path) = std::env::var_os("ZBX_CONFIG") {
        return PathBuf::from(path);
    }
    ProjectDirs::from("com", "zbx", "zbx")
        .map(|dirs| dirs.config_dir().join("config.toml"))
        .unwrap_or_else(|| {
            let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
            p.push(".config");
            p.push("zbx");
            p.push("config.toml");
            p
        })
}

// ── Config loading ───────────────────────────────────────────────────

/// Load the full Config from defaults, file and environment.
///
/// Environment keys nest on `__`: `ZBX_PROFILES__PROD__SERVER`.
pub fn load_config() -> Result<Config, CliError> {
    let path = config_path();

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed("ZBX_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if it cannot be read.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

/// Serialize config to TOML and write it to the config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, CliError> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg).map_err(|e| CliError::Validation {
        field: "config".into(),
        reason: format!("failed to serialize config: {e}"),
    })?;
    std::fs::write(&path, toml_str)?;
    Ok(path)
}

// ── Profile resolution ───────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Build the connection and policy for the active profile.
///
/// Without a matching profile, `--server` plus credential flags suffice.
pub fn build_session_config(global: &GlobalOpts) -> Result<(ConnectionConfig, Policy), CliError> {
    let cfg = load_config()?;
    let name = active_profile_name(global, &cfg);

    if let Some(profile) = cfg.profiles.get(&name) {
        return Ok((resolve_profile(profile, &name, &cfg.defaults, global)?, profile.policy()));
    }
    if global.server.is_some() {
        let profile = Profile::default();
        return Ok((resolve_profile(&profile, &name, &cfg.defaults, global)?, profile.policy()));
    }
    if global.profile.is_some() || !cfg.profiles.is_empty() {
        return Err(CliError::ProfileNotFound {
            name,
            available: available_profiles(&cfg),
        });
    }
    Err(CliError::NoConfig {
        path: config_path().display().to_string(),
    })
}

fn available_profiles(cfg: &Config) -> String {
    if cfg.profiles.is_empty() {
        "(none)".into()
    } else {
        cfg.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
    }
}

/// Translate a `Profile` + global flags into a `ConnectionConfig`.
///
/// This is the single boundary where CLI config types cross into core types.
pub fn resolve_profile(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
    global: &GlobalOpts,
) -> Result<ConnectionConfig, CliError> {
    // 1. Server URL (flag > env > profile)
    let url_str = global.server.as_deref().unwrap_or(&profile.server);
    if url_str.is_empty() {
        return Err(CliError::Validation {
            field: "server".into(),
            reason: format!("profile '{profile_name}' has no server URL"),
        });
    }
    let url: url::Url = url_str.parse().map_err(|_| CliError::Validation {
        field: "server".into(),
        reason: format!("invalid URL: {url_str}"),
    })?;

    // 2. Auth credentials
    let auth = resolve_auth(profile, profile_name, global)?;

    // 3. TLS verification
    let tls = if global.insecure || profile.insecure.unwrap_or(defaults.insecure) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    // 4. Timeout (flag > profile > defaults)
    let timeout = Duration::from_secs(
        global
            .timeout
            .or(profile.timeout)
            .unwrap_or(defaults.timeout),
    );

    Ok(ConnectionConfig {
        url,
        auth,
        tls,
        timeout,
    })
}

// ── Credential helpers ───────────────────────────────────────────────

/// An API token wins over a login; either must resolve.
fn resolve_auth(
    profile: &Profile,
    profile_name: &str,
    global: &GlobalOpts,
) -> Result<AuthCredentials, CliError> {
    if let Some(token) = resolve_api_token(profile, global) {
        return Ok(AuthCredentials::ApiToken(token));
    }

    let username = global
        .user
        .clone()
        .or_else(|| profile.user.clone())
        .ok_or_else(|| CliError::NoCredentials {
            profile: profile_name.into(),
        })?;
    let password = resolve_password(profile).ok_or_else(|| CliError::NoCredentials {
        profile: profile_name.into(),
    })?;
    Ok(AuthCredentials::Credentials { username, password })
}

/// Flag (or `ZBX_API_TOKEN`) > profile's api_token_env > plaintext.
fn resolve_api_token(profile: &Profile, global: &GlobalOpts) -> Option<SecretString> {
    if let Some(ref token) = global.api_token {
        return Some(SecretString::from(token.clone()));
    }
    if let Some(ref env_name) = profile.api_token_env {
        if let Ok(val) = std::env::var(env_name) {
            return Some(SecretString::from(val));
        }
    }
    profile.api_token.clone().map(SecretString::from)
}

/// Env var named by the profile (default `ZBX_PASSWORD`) > plaintext.
fn resolve_password(profile: &Profile) -> Option<SecretString> {
    let env_name = profile.password_env.as_deref().unwrap_or(DEFAULT_PASSWORD_ENV);
    if let Ok(pw) = std::env::var(env_name) {
        return Some(SecretString::from(pw));
    }
    profile.password.clone().map(SecretString::from)
}
