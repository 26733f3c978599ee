//! Host, group and monitoring command handlers.

use tabled::Tabled;
use zbx_core::{Host, Session};

use crate::cli::{
    GlobalOpts, GroupArgs, GroupCommand, HostArgs, HostCommand, MonitorArgs, MonitorCommand,
};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct HostRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Host")]
    host: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Monitored")]
    monitored: String,
    #[tabled(rename = "Maintenance")]
    maintenance: String,
}

impl From<&Host> for HostRow {
    fn from(h: &Host) -> Self {
        Self {
            id: h.hostid.clone(),
            host: h.host.clone(),
            name: h.display_name().to_owned(),
            monitored: output::yes_no(h.is_monitored()),
            maintenance: output::yes_no(h.in_maintenance()),
        }
    }
}

fn print_hosts(hosts: &[Host], global: &GlobalOpts) {
    let out = output::render_list(
        global.output,
        hosts,
        |h| HostRow::from(h),
        |h| h.host.clone(),
    );
    output::print_output(&out, global.quiet);
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn handle_host(
    session: &Session,
    args: HostArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        HostCommand::Add { fqdn } => {
            let id = session.add_host(&fqdn).await?;
            output::print_output(&id, global.quiet);
            output::print_status(&format!("Host {fqdn} created"), global.quiet);
            Ok(())
        }

        HostCommand::Del { fqdn } => {
            if !util::confirm("host del", &format!("Delete host {fqdn}?"), global.yes)? {
                return Ok(());
            }
            let id = session.delete_host(&fqdn).await?;
            output::print_output(&id, global.quiet);
            output::print_status(&format!("Host {fqdn} deleted"), global.quiet);
            Ok(())
        }

        HostCommand::Notemplate => {
            let hosts = session.hosts_without_templates().await?;
            print_hosts(&hosts, global);
            Ok(())
        }
    }
}

pub async fn handle_group(
    session: &Session,
    args: GroupArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        GroupCommand::List { name } => {
            let hosts = session.group_members(&name).await?;
            print_hosts(&hosts, global);
            Ok(())
        }
    }
}

pub async fn handle_monitor(
    session: &Session,
    args: MonitorArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let (fqdn, enabled) = match args.command {
        MonitorCommand::Enable { fqdn } => (fqdn, true),
        MonitorCommand::Disable { fqdn } => (fqdn, false),
    };
    session.set_monitoring(&fqdn, enabled).await?;
    let state = if enabled { "enabled" } else { "disabled" };
    output::print_status(&format!("Monitoring of {fqdn} {state}"), global.quiet);
    Ok(())
}

pub async fn handle_unmonitored(session: &Session, global: &GlobalOpts) -> Result<(), CliError> {
    let hosts = session.unmonitored_hosts().await?;
    print_hosts(&hosts, global);
    Ok(())
}
