//! Config subcommand handlers.

use dialoguer::{Input, Password, Select};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, DEFAULT_PASSWORD_ENV, Profile};
use crate::error::CliError;
use crate::output;

const REDACTED: &str = "********";

// ── Helpers ─────────────────────────────────────────────────────────

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Blank out inline secrets before display.
fn redact(cfg: &mut Config) {
    for profile in cfg.profiles.values_mut() {
        if profile.password.is_some() {
            profile.password = Some(REDACTED.into());
        }
        if profile.api_token.is_some() {
            profile.api_token = Some(REDACTED.into());
        }
    }
}

/// Where a secret entered during `init` ends up.
enum SecretStorage {
    Plaintext(String),
    Env(String),
}

fn prompt_secret(label: &str, default_env: &str) -> Result<SecretStorage, CliError> {
    let choices = &[
        "Read from an environment variable (recommended)",
        "Save to config file (plaintext)",
    ];
    let selection = Select::new()
        .with_prompt(format!("Where should the {label} come from?"))
        .items(choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    if selection == 0 {
        let env_name: String = Input::new()
            .with_prompt("Environment variable")
            .default(default_env.into())
            .interact_text()
            .map_err(prompt_err)?;
        return Ok(SecretStorage::Env(env_name));
    }

    let secret = Password::new()
        .with_prompt(label)
        .interact()
        .map_err(prompt_err)?;
    if secret.is_empty() {
        return Err(CliError::Validation {
            field: label.into(),
            reason: "cannot be empty".into(),
        });
    }
    Ok(SecretStorage::Plaintext(secret))
}

fn init() -> Result<(), CliError> {
    let config_path = config::config_path();
    eprintln!("zbx configuration wizard");
    eprintln!("   Config path: {}\n", config_path.display());

    // 1. Profile name
    let profile_name: String = Input::new()
        .with_prompt("Profile name")
        .default("default".into())
        .interact_text()
        .map_err(prompt_err)?;

    // 2. Frontend URL
    let server: String = Input::new()
        .with_prompt("Frontend URL")
        .default("https://zabbix.example.com/zabbix".into())
        .interact_text()
        .map_err(prompt_err)?;
    if server.parse::<url::Url>().is_err() {
        return Err(CliError::Validation {
            field: "server".into(),
            reason: format!("invalid URL: {server}"),
        });
    }

    // 3. Authentication
    let auth_choices = &["Username/Password", "API token (5.4+)"];
    let auth_selection = Select::new()
        .with_prompt("Authentication method")
        .items(auth_choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    let mut profile = Profile {
        server,
        ..Profile::default()
    };
    if auth_selection == 0 {
        let user: String = Input::new()
            .with_prompt("Username")
            .interact_text()
            .map_err(prompt_err)?;
        profile.user = Some(user);
        match prompt_secret("password", DEFAULT_PASSWORD_ENV)? {
            SecretStorage::Plaintext(pw) => profile.password = Some(pw),
            SecretStorage::Env(name) => profile.password_env = Some(name),
        }
    } else {
        match prompt_secret("API token", "ZBX_API_TOKEN")? {
            SecretStorage::Plaintext(token) => profile.api_token = Some(token),
            SecretStorage::Env(name) => profile.api_token_env = Some(name),
        }
    }

    // 4. Merge into the existing config and write
    let mut cfg = config::load_config_or_default();
    cfg.profiles.insert(profile_name.clone(), profile);
    if cfg.default_profile.is_none() || cfg.profiles.len() == 1 {
        cfg.default_profile = Some(profile_name.clone());
    }
    let path = config::save_config(&cfg)?;

    eprintln!("\nConfiguration written to {}", path.display());
    eprintln!("  Profile: {profile_name}");
    eprintln!("\n  Test it: zbx alert list");
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Show => {
            let mut cfg = config::load_config_or_default();
            redact(&mut cfg);
            let out = output::render_single(
                global.output,
                &cfg,
                |c| toml::to_string_pretty(c).unwrap_or_else(|_| format!("{c:#?}")),
                |c| c.profiles.keys().cloned().collect::<Vec<_>>().join("\n"),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Init => init(),
    }
}
