//! A running child process seen as one ordered sequence of events

use super::shell_command;
use super::sink::StreamKind;
use std::io;
use std::path::Path;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Child;
use tokio::time::Instant;
use tracing::{debug, warn};

/// How long output already in the pipes is still read after the child exits.
pub const EXIT_DRAIN_GRACE: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// Whatever text was available on one stream, split on UTF-8 boundaries.
    Output { stream: StreamKind, chunk: String },
    /// Terminal event. `code` is `None` when the process died from a signal.
    Exited { code: Option<i32> },
}

/// Length of the prefix of `bytes` that does not end inside a UTF-8 sequence.
fn complete_utf8_len(bytes: &[u8]) -> usize {
    match std::str::from_utf8(bytes) {
        Ok(_) => bytes.len(),
        Err(e) if e.error_len().is_none() => e.valid_up_to(),
        // Invalid bytes are replaced lossily anyway.
        Err(_) => bytes.len(),
    }
}

/// One pipe of the child. `pending` only ever holds an incomplete UTF-8 tail.
struct Pipe<R> {
    reader: BufReader<R>,
    pending: Vec<u8>,
}

impl<R: AsyncRead + Unpin> Pipe<R> {
    fn new(inner: R) -> Self {
        Self {
            reader: BufReader::new(inner),
            pending: Vec::new(),
        }
    }

    /// Next chunk of available output, `None` at end of stream.
    ///
    /// Cancel safe: bytes are moved out of the reader only after `fill_buf`
    /// has completed.
    async fn next_chunk(&mut self) -> io::Result<Option<String>> {
        loop {
            let available = self.reader.fill_buf().await?;
            if available.is_empty() {
                if self.pending.is_empty() {
                    return Ok(None);
                }
                let chunk = String::from_utf8_lossy(&self.pending).into_owned();
                self.pending.clear();
                return Ok(Some(chunk));
            }

            let read = available.len();
            self.pending.extend_from_slice(available);
            self.reader.consume(read);

            let complete = complete_utf8_len(&self.pending);
            if complete > 0 {
                let tail = self.pending.split_off(complete);
                let chunk = String::from_utf8_lossy(&self.pending).into_owned();
                self.pending = tail;
                return Ok(Some(chunk));
            }
        }
    }
}

async fn next_chunk<R: AsyncRead + Unpin>(pipe: &mut Option<Pipe<R>>) -> io::Result<Option<String>> {
    match pipe {
        Some(pipe) => pipe.next_chunk().await,
        None => std::future::pending().await,
    }
}

/// Fold a read result back into the pipe slot; `Some` when there is text to emit.
fn settle<R>(pipe: &mut Option<Pipe<R>>, result: io::Result<Option<String>>, name: &str) -> Option<String> {
    match result {
        Ok(Some(chunk)) => Some(chunk),
        Ok(None) => {
            *pipe = None;
            None
        }
        Err(e) => {
            warn!("Stopped reading {}: {}", name, e);
            *pipe = None;
            None
        }
    }
}

/// Spawned shell command whose stdout and stderr are read concurrently.
///
/// Events come out in arrival order and `Exited` is always last. Completion
/// follows the child's own exit: output still buffered is read for at most
/// `EXIT_DRAIN_GRACE`, so a background grandchild holding the pipes open
/// does not keep the step running. The child is killed if the stream is
/// dropped before it exits.
pub struct ProcessStream {
    child: Child,
    stdout: Option<Pipe<tokio::process::ChildStdout>>,
    stderr: Option<Pipe<tokio::process::ChildStderr>>,
    status: Option<ExitStatus>,
    drain_deadline: Option<Instant>,
    exited: bool,
}

impl ProcessStream {
    pub fn spawn(command_line: &str, working_dir: &Path) -> io::Result<Self> {
        debug!(command = %command_line, dir = %working_dir.display(), "Spawning step process");

        let mut cmd = shell_command(command_line);
        cmd.current_dir(working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = cmd.spawn()?;
        let stdout = child.stdout.take().map(Pipe::new);
        let stderr = child.stderr.take().map(Pipe::new);

        Ok(Self {
            child,
            stdout,
            stderr,
            status: None,
            drain_deadline: None,
            exited: false,
        })
    }

    /// Next event, or `None` after `Exited` has been returned.
    pub async fn next_event(&mut self) -> io::Result<Option<StreamEvent>> {
        if self.exited {
            return Ok(None);
        }

        while self.stdout.is_some() || self.stderr.is_some() {
            let deadline = self.drain_deadline.unwrap_or_else(Instant::now);
            tokio::select! {
                chunk = next_chunk(&mut self.stdout), if self.stdout.is_some() => {
                    if let Some(chunk) = settle(&mut self.stdout, chunk, "stdout") {
                        return Ok(Some(StreamEvent::Output { stream: StreamKind::Stdout, chunk }));
                    }
                }
                chunk = next_chunk(&mut self.stderr), if self.stderr.is_some() => {
                    if let Some(chunk) = settle(&mut self.stderr, chunk, "stderr") {
                        return Ok(Some(StreamEvent::Output { stream: StreamKind::Stderr, chunk }));
                    }
                }
                status = self.child.wait(), if self.status.is_none() => {
                    self.status = Some(status?);
                    self.drain_deadline = Some(Instant::now() + EXIT_DRAIN_GRACE);
                }
                _ = tokio::time::sleep_until(deadline), if self.drain_deadline.is_some() => {
                    debug!("Output pipes still open after exit, closing them");
                    self.stdout = None;
                    self.stderr = None;
                }
            }
        }

        let status = match self.status {
            Some(status) => status,
            None => self.child.wait().await?,
        };
        self.status = Some(status);
        self.exited = true;
        Ok(Some(StreamEvent::Exited {
            code: status.code(),
        }))
    }

    /// Kill the child and reap it.
    pub async fn kill(&mut self) -> io::Result<()> {
        if self.exited || self.status.is_some() {
            return Ok(());
        }
        self.child.kill().await?;
        self.exited = true;
        Ok(())
    }
}
