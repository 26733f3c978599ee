//! Clap derive structures for the `zbx` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.
//! Only depends on clap and clap_complete so the build script can render
//! man pages from it.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// zbx -- operator control surface for Zabbix
#[derive(Debug, Parser)]
#[command(
    name = "zbx",
    version,
    about = "Suppress, reap and triage Zabbix alerts from the command line",
    long_about = "Operator tooling for a Zabbix frontend.\n\n\
        Schedules and extends per-host maintenance windows, removes expired\n\
        ones, and shows firing triggers and recent notifications ranked by\n\
        what still needs a human.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Server profile to use
    #[arg(long, short = 'p', env = "ZBX_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Frontend URL, e.g. https://zabbix.example.com/zabbix (overrides profile)
    #[arg(long, short = 's', env = "ZBX_SERVER", global = true)]
    pub server: Option<String>,

    /// Login name (overrides profile)
    #[arg(long, short = 'u', env = "ZBX_USER", global = true)]
    pub user: Option<String>,

    /// API token (5.4+)
    #[arg(long, env = "ZBX_API_TOKEN", global = true, hide_env_values = true)]
    pub api_token: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "ZBX_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "ZBX_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (default 30)
    #[arg(long, env = "ZBX_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Schedule, remove and reap maintenance windows
    #[command(alias = "m")]
    Maintenance(MaintenanceArgs),

    /// Create and delete hosts
    Host(HostArgs),

    /// Inspect host groups
    Group(GroupArgs),

    /// Enable or disable monitoring of a host
    Monitor(MonitorArgs),

    /// Triage firing triggers and notification history
    #[command(alias = "a")]
    Alert(AlertArgs),

    /// List hosts with monitoring disabled
    Unmonitored,

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  MAINTENANCE
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct MaintenanceArgs {
    #[command(subcommand)]
    pub command: MaintenanceCommand,
}

#[derive(Debug, Subcommand)]
pub enum MaintenanceCommand {
    /// List all maintenance windows
    #[command(alias = "ls")]
    List,

    /// Suppress alerts for a host, creating or extending its window
    Add {
        /// Host FQDN
        fqdn: String,

        /// Suppression duration in seconds (minimum 300)
        #[arg(default_value = "3600")]
        duration: u32,
    },

    /// Remove a host's scripted window
    #[command(alias = "rm")]
    Del {
        /// Host FQDN
        fqdn: String,
    },

    /// Delete every window whose end has passed
    Gc,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  HOSTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct HostArgs {
    #[command(subcommand)]
    pub command: HostCommand,
}

#[derive(Debug, Subcommand)]
pub enum HostCommand {
    /// Create a host with an agent interface, resolving its address in DNS
    Add {
        /// Host FQDN
        fqdn: String,
    },

    /// Delete a host
    #[command(alias = "rm")]
    Del {
        /// Host FQDN
        fqdn: String,
    },

    /// List hosts without any linked template
    Notemplate,
}

#[derive(Debug, Args)]
pub struct GroupArgs {
    #[command(subcommand)]
    pub command: GroupCommand,
}

#[derive(Debug, Subcommand)]
pub enum GroupCommand {
    /// List the hosts of a group
    #[command(alias = "ls")]
    List {
        /// Host group name
        name: String,
    },
}

#[derive(Debug, Args)]
pub struct MonitorArgs {
    #[command(subcommand)]
    pub command: MonitorCommand,
}

#[derive(Debug, Subcommand)]
pub enum MonitorCommand {
    /// Turn monitoring on
    Enable {
        /// Host FQDN
        fqdn: String,
    },

    /// Turn monitoring off
    Disable {
        /// Host FQDN
        fqdn: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  ALERTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct AlertArgs {
    #[command(subcommand)]
    pub command: AlertCommand,
}

#[derive(Debug, Subcommand)]
pub enum AlertCommand {
    /// Currently firing triggers, newest first
    #[command(alias = "ls")]
    List {
        /// Maximum number of triggers
        #[arg(default_value = "200")]
        limit: u32,
    },

    /// Notifications sent over the trailing days, one row per event
    History {
        /// Number of days to look back
        #[arg(default_value = "1")]
        days: u32,
    },

    /// Acknowledge an event with a message
    Ack {
        /// Event id
        event: String,

        /// Acknowledgement message
        message: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the configuration file path
    Path,

    /// Display current resolved configuration
    Show,

    /// Create initial config file with guided setup
    Init,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
