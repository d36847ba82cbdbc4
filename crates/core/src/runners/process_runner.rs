use super::traits::StepRunner;
use crate::process::{CapturedOutput, OutputSink, ProcessStream, StreamEvent};
use crate::types::StepOutcome;
use crate::types::outcome::rounded_seconds;
use async_trait::async_trait;
use chrono::Local;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Runs steps through the platform shell, one process at a time.
pub struct ProcessStepRunner {
    sink: Arc<dyn OutputSink>,
    timeout: Option<Duration>,
}

impl ProcessStepRunner {
    pub fn new(sink: Arc<dyn OutputSink>) -> Self {
        Self {
            sink,
            timeout: None,
        }
    }

    /// Kill any step still running after `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Pump events into the sink and the buffers until the process exits.
    async fn drain(
        &self,
        stream: &mut ProcessStream,
        captured: &mut CapturedOutput,
    ) -> std::io::Result<Option<i32>> {
        while let Some(event) = stream.next_event().await? {
            match event {
                StreamEvent::Output { stream: kind, chunk } => {
                    self.sink.write_chunk(kind, &chunk);
                    captured.record(kind, &chunk);
                }
                StreamEvent::Exited { code } => return Ok(code),
            }
        }
        Ok(None)
    }
}

#[async_trait]
impl StepRunner for ProcessStepRunner {
    async fn run(&self, command: &str, working_dir: &Path, description: &str) -> StepOutcome {
        let start_time = Local::now();

        let mut stream = match ProcessStream::spawn(command, working_dir) {
            Ok(stream) => stream,
            Err(e) => {
                warn!(command = %command, "Failed to launch step: {}", e);
                return StepOutcome::launch_failure(command, description, start_time, e.to_string());
            }
        };

        let mut captured = CapturedOutput::default();
        let exit = match self.timeout {
            Some(limit) => {
                let drained =
                    tokio::time::timeout(limit, self.drain(&mut stream, &mut captured)).await;
                match drained {
                    Ok(result) => result.map_err(|e| e.to_string()),
                    Err(_) => {
                        if let Err(e) = stream.kill().await {
                            warn!(command = %command, "Failed to kill timed out step: {}", e);
                        }
                        Err(format!("timed out after {limit:?}"))
                    }
                }
            }
            None => self
                .drain(&mut stream, &mut captured)
                .await
                .map_err(|e| e.to_string()),
        };

        let error_message = match exit {
            Ok(Some(0)) => None,
            Ok(Some(code)) => Some(format!("exit code {code}")),
            Ok(None) => Some("terminated by signal".to_string()),
            Err(message) => Some(message),
        };

        let end_time = Local::now();
        debug!(command = %command, success = error_message.is_none(), "Step finished");

        StepOutcome {
            command: command.to_string(),
            description: description.to_string(),
            success: error_message.is_none(),
            error_message,
            output: captured.stdout,
            error_output: captured.stderr,
            start_time,
            end_time,
            duration_seconds: rounded_seconds(start_time, end_time),
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::process::{NullSink, RecordingSink, StreamKind};
    use std::sync::Mutex;
    use std::time::Instant;

    /// Records when each chunk reached the sink.
    struct TimedSink {
        started: Instant,
        chunks: Mutex<Vec<(Duration, String)>>,
    }

    impl OutputSink for TimedSink {
        fn write_chunk(&self, _stream: StreamKind, chunk: &str) {
            self.chunks
                .lock()
                .unwrap()
                .push((self.started.elapsed(), chunk.to_string()));
        }
    }

    #[tokio::test]
    async fn test_successful_step_captures_output() {
        let sink = Arc::new(RecordingSink::new());
        let runner = ProcessStepRunner::new(sink.clone());
        let dir = tempfile::TempDir::new().unwrap();

        let outcome = runner
            .run("echo built; echo note 1>&2", dir.path(), "Build")
            .await;

        assert!(outcome.success);
        assert!(outcome.error_message.is_none());
        assert_eq!(outcome.output, "built\n");
        assert_eq!(outcome.error_output, "note\n");
        assert_eq!(outcome.description, "Build");
        assert!(sink.chunks().contains(&(StreamKind::Stdout, "built\n".to_string())));
    }

    #[tokio::test]
    async fn test_nonzero_exit_reports_code() {
        let runner = ProcessStepRunner::new(Arc::new(NullSink));
        let dir = tempfile::TempDir::new().unwrap();

        let outcome = runner.run("exit 2", dir.path(), "Fail").await;

        assert!(!outcome.success);
        assert_eq!(outcome.error_message.as_deref(), Some("exit code 2"));
    }

    #[tokio::test]
    async fn test_runs_in_working_dir() {
        let runner = ProcessStepRunner::new(Arc::new(NullSink));
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("marker.txt"), "here").unwrap();

        let outcome = runner.run("cat marker.txt", dir.path(), "Read").await;

        assert!(outcome.success);
        assert_eq!(outcome.output, "here");
    }

    #[tokio::test]
    async fn test_launch_failure() {
        let runner = ProcessStepRunner::new(Arc::new(NullSink));
        let outcome = runner
            .run("true", Path::new("/no/such/working/dir"), "Nothing")
            .await;

        assert!(!outcome.success);
        assert!(outcome.error_message.is_some());
    }

    #[tokio::test]
    async fn test_timeout_kills_step() {
        let runner =
            ProcessStepRunner::new(Arc::new(NullSink)).with_timeout(Some(Duration::from_millis(200)));
        let dir = tempfile::TempDir::new().unwrap();

        let outcome = runner.run("sleep 5", dir.path(), "Hang").await;

        assert!(!outcome.success);
        assert_eq!(outcome.error_message.as_deref(), Some("timed out after 200ms"));
        assert!(outcome.duration_seconds < 5);
    }

    #[tokio::test]
    async fn test_progress_without_newline_streams_live() {
        let sink = Arc::new(TimedSink {
            started: Instant::now(),
            chunks: Mutex::new(Vec::new()),
        });
        let runner = ProcessStepRunner::new(sink.clone());
        let dir = tempfile::TempDir::new().unwrap();

        let outcome = runner
            .run("printf 'Installing...'; sleep 1; printf 'done'", dir.path(), "Install")
            .await;

        assert!(outcome.success);
        assert_eq!(outcome.output, "Installing...done");
        let chunks = sink.chunks.lock().unwrap().clone();
        assert_eq!(chunks[0].1, "Installing...");
        assert!(chunks[0].0 < Duration::from_millis(800));
    }

    #[tokio::test]
    async fn test_step_ends_when_shell_exits() {
        let runner = ProcessStepRunner::new(Arc::new(NullSink));
        let dir = tempfile::TempDir::new().unwrap();
        let started = Instant::now();

        let outcome = runner.run("sleep 3 & echo started", dir.path(), "Detach").await;

        assert!(outcome.success);
        assert_eq!(outcome.output, "started\n");
        assert!(started.elapsed() < Duration::from_secs(2));
    }
}
