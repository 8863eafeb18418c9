use crate::sink_trait::TranscriptSink;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use voxbridge_core::{protocol, SinkError, TranscriptEvent};

/// Appends protocol lines to a file, one line per message.
pub struct FileSink {
    output_path: Mutex<Option<PathBuf>>,
    emit_count: AtomicUsize,
}

impl FileSink {
    pub fn new() -> Self {
        Self {
            output_path: Mutex::new(None),
            emit_count: AtomicUsize::new(0),
        }
    }

    pub fn emit_count(&self) -> usize {
        self.emit_count.load(Ordering::Relaxed)
    }

    fn write_line(&self, line: &str) -> Result<(), SinkError> {
        let guard = self.output_path.lock().unwrap();
        let path = guard
            .as_ref()
            .ok_or_else(|| SinkError::EmitFailed("not initialized".to_string()))?;

        use std::io::Write;
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| SinkError::EmitFailed(e.to_string()))?;

        writeln!(file, "{line}").map_err(|e| SinkError::EmitFailed(e.to_string()))
    }
}

impl Default for FileSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TranscriptSink for FileSink {
    fn name(&self) -> &str {
        "file"
    }

    async fn initialize(&mut self, config: toml::Value) -> Result<(), SinkError> {
        let path = config
            .get("path")
            .and_then(|v| v.as_str())
            .ok_or_else(|| {
                SinkError::InitializationFailed("missing 'path' in config".to_string())
            })?;
        *self.output_path.lock().unwrap() = Some(PathBuf::from(path));
        Ok(())
    }

    async fn ready(&self) -> Result<(), SinkError> {
        self.write_line(protocol::READY)
    }

    async fn emit(&self, event: &TranscriptEvent) -> Result<(), SinkError> {
        self.write_line(&protocol::render_event(event))?;
        self.emit_count.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    async fn terminate(&self) -> Result<(), SinkError> {
        self.write_line(protocol::TERMINATE)
    }

    fn is_healthy(&self) -> bool {
        self.output_path.lock().unwrap().is_some()
    }

    async fn shutdown(&self) -> Result<(), SinkError> {
        Ok(())
    }
}
