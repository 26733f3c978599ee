//! Maintenance command handlers.

use tabled::Tabled;
use zbx_core::{Maintenance, ReapReport, ReconcileOutcome, Session};

use crate::cli::{GlobalOpts, MaintenanceArgs, MaintenanceCommand};
use crate::error::CliError;
use crate::output::{self, format_epoch};

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct MaintenanceRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Since")]
    since: String,
    #[tabled(rename = "Until")]
    till: String,
}

impl From<&Maintenance> for MaintenanceRow {
    fn from(m: &Maintenance) -> Self {
        Self {
            id: m.maintenanceid.clone(),
            name: m.name.clone(),
            description: m.description.clone(),
            since: format_epoch(m.active_since),
            till: format_epoch(m.active_till),
        }
    }
}

fn describe_outcome(fqdn: &str, outcome: &ReconcileOutcome) -> String {
    match outcome {
        ReconcileOutcome::Created { id, active_till, .. } => format!(
            "Created maintenance {id} for {fqdn} until {}",
            format_epoch(*active_till)
        ),
        ReconcileOutcome::Extended {
            id,
            previous_till,
            active_till,
        } => format!(
            "Extended maintenance {id} for {fqdn} from {} to {}",
            format_epoch(*previous_till),
            format_epoch(*active_till)
        ),
        ReconcileOutcome::Current { id, active_till } => format!(
            "Maintenance {id} for {fqdn} already runs until {}",
            format_epoch(*active_till)
        ),
        ReconcileOutcome::Foreign { names } => format!(
            "{fqdn} is already in maintenance: {}",
            names.join(", ")
        ),
    }
}

fn outcome_id(outcome: &ReconcileOutcome) -> String {
    match outcome {
        ReconcileOutcome::Created { id, .. }
        | ReconcileOutcome::Extended { id, .. }
        | ReconcileOutcome::Current { id, .. } => id.clone(),
        ReconcileOutcome::Foreign { names } => names.join("\n"),
    }
}

fn describe_report(report: &ReapReport) -> String {
    if report.is_empty() {
        return "No expired maintenance".into();
    }
    let mut lines: Vec<String> = report
        .removed
        .iter()
        .map(|w| format!("Removed {} ({}), ended {}", w.name, w.id, format_epoch(w.active_till)))
        .collect();
    lines.extend(
        report
            .skipped
            .iter()
            .map(|w| format!("Skipped {} ({}), already gone", w.name, w.id)),
    );
    lines.push(format!(
        "{} of {} expired windows removed",
        report.removed.len(),
        report.total_expired
    ));
    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    session: &Session,
    args: MaintenanceArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        MaintenanceCommand::List => {
            let windows = session.list_maintenances().await?;
            let out = output::render_list(
                global.output,
                &windows,
                |m| MaintenanceRow::from(m),
                |m| m.maintenanceid.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        MaintenanceCommand::Add { fqdn, duration } => {
            let outcome = session.reconcile(&fqdn, duration).await?;
            let out = output::render_single(
                global.output,
                &outcome,
                |o| describe_outcome(&fqdn, o),
                outcome_id,
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        MaintenanceCommand::Del { fqdn } => {
            let id = session.delete_maintenance(&fqdn).await?;
            output::print_output(&id, global.quiet);
            output::print_status(&format!("Maintenance for {fqdn} removed"), global.quiet);
            Ok(())
        }

        MaintenanceCommand::Gc => {
            if !util::confirm(
                "maintenance gc",
                "Delete every expired maintenance window?",
                global.yes,
            )? {
                return Ok(());
            }
            let report = session.reap().await?;
            let out = output::render_single(global.output, &report, describe_report, |r| {
                r.removed
                    .iter()
                    .map(|w| w.id.clone())
                    .collect::<Vec<_>>()
                    .join("\n")
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
