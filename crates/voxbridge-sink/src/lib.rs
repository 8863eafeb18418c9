pub mod file_sink;
pub mod memory_sink;
pub mod registry;
pub mod sink_trait;
pub mod stdout_sink;

pub use file_sink::FileSink;
pub use memory_sink::MemorySink;
pub use registry::SinkRegistry;
pub use sink_trait::TranscriptSink;
pub use stdout_sink::StdoutSink;
