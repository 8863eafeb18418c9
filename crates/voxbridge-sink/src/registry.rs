use crate::sink_trait::TranscriptSink;
use std::collections::HashMap;
use voxbridge_core::SinkError;

pub struct SinkRegistry {
    factories: HashMap<String, fn() -> Box<dyn TranscriptSink>>,
}

impl SinkRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            factories: HashMap::new(),
        };
        registry.register("stdout", || Box::new(crate::stdout_sink::StdoutSink::new()));
        registry.register("file", || Box::new(crate::file_sink::FileSink::new()));
        registry.register("memory", || Box::new(crate::memory_sink::MemorySink::new()));
        registry
    }

    pub fn register(&mut self, name: &str, factory: fn() -> Box<dyn TranscriptSink>) {
        self.factories.insert(name.to_string(), factory);
    }

    pub fn create(&self, name: &str) -> Result<Box<dyn TranscriptSink>, SinkError> {
        self.factories
            .get(name)
            .map(|f| f())
            .ok_or_else(|| SinkError::NotFound(name.to_string()))
    }

    pub fn list_sinks(&self) -> Vec<&str> {
        self.factories.keys().map(|s| s.as_str()).collect()
    }
}

impl Default for SinkRegistry {
    fn default() -> Self {
        Self::new()
    }
}
