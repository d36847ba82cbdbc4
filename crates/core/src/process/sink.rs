use serde::{Deserialize, Serialize};
use std::io::Write;
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamKind {
    Stdout,
    Stderr,
}

/// Receives process output as it arrives.
pub trait OutputSink: Send + Sync {
    fn write_chunk(&self, stream: StreamKind, chunk: &str);
}

/// Mirrors child output onto this process's stdout/stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl OutputSink for ConsoleSink {
    fn write_chunk(&self, stream: StreamKind, chunk: &str) {
        // A closed terminal must not fail the build.
        let _ = match stream {
            StreamKind::Stdout => {
                let mut out = std::io::stdout().lock();
                out.write_all(chunk.as_bytes()).and_then(|_| out.flush())
            }
            StreamKind::Stderr => {
                let mut err = std::io::stderr().lock();
                err.write_all(chunk.as_bytes()).and_then(|_| err.flush())
            }
        };
    }
}

/// Mirrors both child streams onto this process's stderr, leaving stdout
/// free for machine-readable output.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrSink;

impl OutputSink for StderrSink {
    fn write_chunk(&self, _stream: StreamKind, chunk: &str) {
        let mut err = std::io::stderr().lock();
        let _ = err.write_all(chunk.as_bytes()).and_then(|_| err.flush());
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl OutputSink for NullSink {
    fn write_chunk(&self, _stream: StreamKind, _chunk: &str) {}
}

/// Keeps every chunk it sees, in order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    chunks: Mutex<Vec<(StreamKind, String)>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chunks(&self) -> Vec<(StreamKind, String)> {
        self.chunks
            .lock()
            .map(|chunks| chunks.clone())
            .unwrap_or_default()
    }
}

impl OutputSink for RecordingSink {
    fn write_chunk(&self, stream: StreamKind, chunk: &str) {
        if let Ok(mut chunks) = self.chunks.lock() {
            chunks.push((stream, chunk.to_string()));
        }
    }
}

/// Buffers both streams in full for the step outcome.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CapturedOutput {
    pub stdout: String,
    pub stderr: String,
}

impl CapturedOutput {
    pub fn record(&mut self, stream: StreamKind, chunk: &str) {
        match stream {
            StreamKind::Stdout => self.stdout.push_str(chunk),
            StreamKind::Stderr => self.stderr.push_str(chunk),
        }
    }
}
