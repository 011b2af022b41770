//! Command dispatch: bridges CLI args -> core workflow -> output formatting.

pub mod apply;
pub mod compare;
pub mod config_cmd;
pub mod get;
pub mod post;
pub mod util;

use restsync_core::Session;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a device-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, session: &Session, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Get(args) => get::handle(session, args, global).await,
        Command::Apply(args) => apply::handle(session, args, global).await,
        Command::Post(args) => post::handle(session, args, global).await,
        // Offline commands are handled before a session is opened
        Command::Compare(_) | Command::Config(_) | Command::Completions(_) => {
            Err(CliError::Internal("command does not need a device session".into()))
        }
    }
}
