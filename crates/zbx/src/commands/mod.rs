//! Command dispatch: bridges CLI args -> core session calls -> output formatting.

pub mod alerts;
pub mod config_cmd;
pub mod hosts;
pub mod maintenance;
pub mod util;

use zbx_core::Session;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a server-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    session: &Session,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Maintenance(args) => maintenance::handle(session, args, global).await,
        Command::Host(args) => hosts::handle_host(session, args, global).await,
        Command::Group(args) => hosts::handle_group(session, args, global).await,
        Command::Monitor(args) => hosts::handle_monitor(session, args, global).await,
        Command::Unmonitored => hosts::handle_unmonitored(session, global).await,
        Command::Alert(args) => alerts::handle(session, args, global).await,
        // Config and Completions are handled before a session is opened
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
