use crate::process::shell_command;
use async_trait::async_trait;
use std::process::Stdio;
use tracing::debug;

/// Read-only check that an external tool can be launched.
#[async_trait]
pub trait ToolProbe: Send + Sync {
    /// Run `command`; its stdout when it exits with status 0, otherwise `None`.
    async fn probe(&self, command: &str) -> Option<String>;
}

/// Probes tools through the platform shell in the current directory.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellToolProbe;

#[async_trait]
impl ToolProbe for ShellToolProbe {
    async fn probe(&self, command: &str) -> Option<String> {
        let output = shell_command(command)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await;

        match output {
            Ok(output) if output.status.success() => {
                Some(String::from_utf8_lossy(&output.stdout).into_owned())
            }
            Ok(output) => {
                debug!(command = %command, status = ?output.status.code(), "Probe failed");
                None
            }
            Err(e) => {
                debug!(command = %command, "Probe could not launch: {}", e);
                None
            }
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_probe_returns_stdout_on_success() {
        let out = ShellToolProbe.probe("echo 'tool 1.2.3'").await;
        assert_eq!(out.as_deref(), Some("tool 1.2.3\n"));
    }

    #[tokio::test]
    async fn test_probe_fails_for_missing_tool() {
        assert!(ShellToolProbe.probe("definitely-not-a-real-tool-xyz --version").await.is_none());
        assert!(ShellToolProbe.probe("exit 1").await.is_none());
    }
}
