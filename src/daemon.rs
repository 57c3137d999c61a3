/// Asks the device daemon to pick up changes in the actions directory
use crate::config::DaemonConfig;
use log::{debug, error, info};
use std::process::{Command, Stdio};
use thiserror::Error;

/// Environment variable that overrides `[daemon] reload_command`.
pub const RELOAD_COMMAND_ENV: &str = "DECKCONF_RELOAD_COMMAND";

#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("Failed to run reload command '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Reload command '{command}' exited with {status}: {stderr}")]
    Failed {
        command: String,
        status: String,
        stderr: String,
    },
}

/// What a reload attempt did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReloadOutcome {
    Reloaded,
    /// No reload command configured
    Disabled,
}

/// Effective reload command: the environment override if set, else the config value.
pub fn reload_command(config: &DaemonConfig) -> String {
    std::env::var(RELOAD_COMMAND_ENV).unwrap_or_else(|_| config.reload_command.clone())
}

/// Runs the configured reload command and waits for it.
pub fn reload(config: &DaemonConfig) -> Result<ReloadOutcome, DaemonError> {
    run_reload_command(&reload_command(config))
}

/// Runs `command` with `sh -c`, so quoting and pipes work as in a terminal.
/// An empty command is a no-op.
pub fn run_reload_command(command: &str) -> Result<ReloadOutcome, DaemonError> {
    let command = command.trim();
    if command.is_empty() {
        debug!("Daemon reload disabled (no reload command)");
        return Ok(ReloadOutcome::Disabled);
    }

    let output = Command::new("sh")
        .arg("-c")
        .arg(command)
        .stdin(Stdio::null())
        .output()
        .map_err(|source| {
            error!("Failed to launch reload command '{}': {}", command, source);
            DaemonError::Spawn {
                command: command.to_string(),
                source,
            }
        })?;

    if output.status.success() {
        info!("Daemon reloaded ({})", command);
        Ok(ReloadOutcome::Reloaded)
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        error!("Reload command '{}' failed: {}", command, output.status);
        Err(DaemonError::Failed {
            command: command.to_string(),
            status: output.status.to_string(),
            stderr,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_command_disables_reload() {
        assert_eq!(run_reload_command("").unwrap(), ReloadOutcome::Disabled);
        assert_eq!(run_reload_command("   ").unwrap(), ReloadOutcome::Disabled);
    }

    #[cfg(unix)]
    #[test]
    fn successful_command_reloads() {
        assert_eq!(run_reload_command("true").unwrap(), ReloadOutcome::Reloaded);
    }

    #[cfg(unix)]
    #[test]
    fn failing_command_reports_stderr() {
        let err = run_reload_command("echo restart refused >&2; exit 7").unwrap_err();
        match err {
            DaemonError::Failed { command, stderr, status } => {
                assert_eq!(command, "echo restart refused >&2; exit 7");
                assert_eq!(stderr, "restart refused");
                assert!(status.contains('7'), "status was {status:?}");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn quoted_arguments_reach_the_program() {
        assert_eq!(
            run_reload_command(r#"test "a b" = 'a b'"#).unwrap(),
            ReloadOutcome::Reloaded
        );
        assert!(run_reload_command(r#"test "a b" = a"#).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn missing_program_fails_with_shell_message() {
        let err = run_reload_command("deckconf-no-such-reload-binary --now").unwrap_err();
        match err {
            DaemonError::Failed { stderr, .. } => {
                assert!(stderr.contains("deckconf-no-such-reload-binary"), "stderr was {stderr:?}")
            }
            other => panic!("unexpected error {other:?}"),
        }
    }
}
