use crate::sink_trait::TranscriptSink;
use async_trait::async_trait;
use std::io::Write;
use voxbridge_core::{protocol, SinkError, TranscriptEvent};

/// The default sink: one protocol line per event on stdout, flushed
/// immediately so a consuming process sees events as they happen.
///
/// Diagnostics go to stderr via `tracing`; stdout carries nothing but the
/// protocol.
pub struct StdoutSink;

impl StdoutSink {
    pub fn new() -> Self {
        Self
    }

    fn write_line(&self, line: &str) -> Result<(), SinkError> {
        let mut out = std::io::stdout().lock();
        writeln!(out, "{line}")
            .and_then(|_| out.flush())
            .map_err(|e| SinkError::EmitFailed(e.to_string()))
    }
}

impl Default for StdoutSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TranscriptSink for StdoutSink {
    fn name(&self) -> &str {
        "stdout"
    }

    async fn initialize(&mut self, _config: toml::Value) -> Result<(), SinkError> {
        Ok(())
    }

    async fn ready(&self) -> Result<(), SinkError> {
        self.write_line(protocol::READY)
    }

    async fn emit(&self, event: &TranscriptEvent) -> Result<(), SinkError> {
        self.write_line(&protocol::render_event(event))
    }

    async fn terminate(&self) -> Result<(), SinkError> {
        self.write_line(protocol::TERMINATE)
    }

    fn is_healthy(&self) -> bool {
        true
    }

    async fn shutdown(&self) -> Result<(), SinkError> {
        Ok(())
    }
}
