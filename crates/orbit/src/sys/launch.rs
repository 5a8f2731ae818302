use crate::menu::item::Action;
use log::{debug, warn};
use std::process::{Command, Stdio};
use thiserror::Error;
use tokio::runtime::Handle;

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("empty command")]
    EmptyCommand,
    #[error("malformed command: {0}")]
    Quoting(#[from] shell_words::ParseError),
    #[error("{0} cannot be run by the daemon")]
    Unsupported(&'static str),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// The process that carries out `action`, not yet spawned.
pub fn command_for(action: &Action) -> Result<Command, LaunchError> {
    match action {
        Action::Command(line) => {
            if shell_words::split(line)?.is_empty() {
                return Err(LaunchError::EmptyCommand);
            }
            let mut command = Command::new("sh");
            command.arg("-c").arg(line);
            Ok(command)
        }
        Action::LaunchPath(path) => {
            if path.as_os_str().is_empty() {
                return Err(LaunchError::EmptyCommand);
            }
            let mut command = Command::new("xdg-open");
            command.arg(path);
            Ok(command)
        }
        Action::Shortcut(_) => Err(LaunchError::Unsupported("keyboard shortcuts")),
        Action::Callback(_) => Err(LaunchError::Unsupported("callbacks")),
    }
}

/// Spawns the process for `action` and waits on it in the background. Must be called from
/// within a tokio runtime.
pub fn execute(action: &Action) -> Result<(), LaunchError> {
    let mut command = tokio::process::Command::from(command_for(action)?);
    let runtime = Handle::try_current().map_err(std::io::Error::other)?;
    let mut child = command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    let pid = child.id();
    runtime.spawn(async move {
        match child.wait().await {
            Ok(status) if !status.success() => debug!("Child {pid:?} exited with {status}"),
            Ok(_) => {}
            Err(e) => warn!("Failed to wait on child {pid:?}: {e}"),
        }
    });
    Ok(())
}
