use async_trait::async_trait;
use voxbridge_core::{SinkError, TranscriptEvent};

/// A consumer of the transcript line protocol.
///
/// Implementations are registered via [`SinkRegistry`](crate::SinkRegistry).
/// The session drives the lifecycle: [`ready`](Self::ready) once after the
/// capture stream opens, [`emit`](Self::emit) per transcript event in frame
/// order, [`terminate`](Self::terminate) once after resources are released.
/// The channel is append-only: no line is ever retracted or rewritten.
#[async_trait]
pub trait TranscriptSink: Send + Sync {
    /// Returns the sink's plugin name (e.g. `"stdout"`, `"file"`).
    fn name(&self) -> &str;

    /// One-time initialisation with sink-specific TOML configuration.
    async fn initialize(&mut self, config: toml::Value) -> Result<(), SinkError>;

    /// Emit the readiness marker.
    async fn ready(&self) -> Result<(), SinkError>;

    /// Emit one transcript event.
    async fn emit(&self, event: &TranscriptEvent) -> Result<(), SinkError>;

    /// Emit the termination marker.
    async fn terminate(&self) -> Result<(), SinkError>;

    /// Returns `true` if the sink is currently able to accept events.
    fn is_healthy(&self) -> bool;

    /// Gracefully shut down the sink, releasing resources.
    async fn shutdown(&self) -> Result<(), SinkError>;
}
