//! External process plumbing shared by the step runner and the tool probes

pub mod sink;
pub mod stream;

pub use sink::{CapturedOutput, ConsoleSink, NullSink, OutputSink, RecordingSink, StderrSink, StreamKind};
pub use stream::{EXIT_DRAIN_GRACE, ProcessStream, StreamEvent};

use tokio::process::Command;

/// Wrap a command line in the platform shell.
pub fn shell_command(command_line: &str) -> Command {
    #[cfg(windows)]
    {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", command_line]);
        cmd
    }

    #[cfg(not(windows))]
    {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", command_line]);
        cmd
    }
}
