use crate::sink_trait::TranscriptSink;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use voxbridge_core::{protocol, SinkError, TranscriptEvent};

/// Collects protocol lines in memory.
///
/// Clones share the same buffer, so a test (or embedding host) keeps one
/// clone and hands the other to the session, then inspects [`lines`]
/// afterwards.
///
/// [`lines`]: MemorySink::lines
#[derive(Clone, Default)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }

    fn push_line(&self, line: String) -> Result<(), SinkError> {
        self.lines.lock().unwrap().push(line);
        Ok(())
    }
}

#[async_trait]
impl TranscriptSink for MemorySink {
    fn name(&self) -> &str {
        "memory"
    }

    async fn initialize(&mut self, _config: toml::Value) -> Result<(), SinkError> {
        Ok(())
    }

    async fn ready(&self) -> Result<(), SinkError> {
        self.push_line(protocol::READY.to_string())
    }

    async fn emit(&self, event: &TranscriptEvent) -> Result<(), SinkError> {
        self.push_line(protocol::render_event(event))
    }

    async fn terminate(&self) -> Result<(), SinkError> {
        self.push_line(protocol::TERMINATE.to_string())
    }

    fn is_healthy(&self) -> bool {
        true
    }

    async fn shutdown(&self) -> Result<(), SinkError> {
        Ok(())
    }
}
