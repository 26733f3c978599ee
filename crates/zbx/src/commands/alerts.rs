//! Alert triage, history and acknowledgement handlers.

use tabled::Tabled;
use zbx_core::{HistoryRow, Session, TriageRow};

use crate::cli::{AlertArgs, AlertCommand, GlobalOpts};
use crate::error::CliError;
use crate::output::{self, alarm, format_epoch, yes_no};

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct TriageTableRow {
    #[tabled(rename = "Host")]
    host: String,
    #[tabled(rename = "Changed")]
    changed: String,
    #[tabled(rename = "Event")]
    event: String,
    #[tabled(rename = "Severity")]
    severity: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Maint")]
    suppressed: String,
    #[tabled(rename = "Ack")]
    ack: String,
}

impl TriageTableRow {
    fn new(r: &TriageRow, color: bool) -> Self {
        let hot = color && r.needs_attention;
        Self {
            host: alarm(&r.host, hot),
            changed: format_epoch(r.last_change),
            event: r.event_id.clone().unwrap_or_default(),
            severity: alarm(&r.severity.to_string(), hot),
            description: alarm(&r.description, hot),
            suppressed: yes_no(r.suppressed),
            ack: r
                .acknowledgement
                .as_ref()
                .map(|a| format!("{}: {}", a.author, a.message))
                .unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct HistoryTableRow {
    #[tabled(rename = "Event")]
    event: String,
    #[tabled(rename = "Sent")]
    sent: String,
    #[tabled(rename = "Host")]
    host: String,
    #[tabled(rename = "Subject")]
    subject: String,
    #[tabled(rename = "Ack")]
    acknowledged: String,
    #[tabled(rename = "By")]
    acked_by: String,
}

impl From<&HistoryRow> for HistoryTableRow {
    fn from(r: &HistoryRow) -> Self {
        Self {
            event: r.event_id.clone(),
            sent: format_epoch(r.clock),
            host: r.host.clone(),
            subject: r.subject.clone(),
            acknowledged: yes_no(r.acknowledged),
            acked_by: r.acked_by.clone().unwrap_or_default(),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    session: &Session,
    args: AlertArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        AlertCommand::List { limit } => {
            let rows = session.triage(limit).await?;
            let color = output::should_color(global.color);
            let out = output::render_list(
                global.output,
                &rows,
                |r| TriageTableRow::new(r, color),
                |r| r.event_id.clone().unwrap_or_default(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        AlertCommand::History { days } => {
            let rows = session.history(days).await?;
            let out = output::render_list(
                global.output,
                &rows,
                |r| HistoryTableRow::from(r),
                |r| r.event_id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        AlertCommand::Ack { event, message } => {
            let ids = session.acknowledge(&event, &message).await?;
            output::print_output(&ids.join("\n"), global.quiet);
            output::print_status(&format!("Event {event} acknowledged"), global.quiet);
            Ok(())
        }
    }
}
