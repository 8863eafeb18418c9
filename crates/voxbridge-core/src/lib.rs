pub mod config;
pub mod error;
pub mod protocol;
pub mod types;

pub use config::AppConfig;
pub use error::{AudioError, ConfigError, EngineError, SinkError};
pub use types::{AudioFrame, TranscriptEvent};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_frame_creation() {
        let frame = AudioFrame::new(vec![0i16; 2000], 16000);
        assert_eq!(frame.samples.len(), 2000);
        assert_eq!(frame.sample_rate, 16000);
    }

    #[test]
    fn test_transcript_event_round_trip_through_protocol() {
        let event = TranscriptEvent::finalized("hello world").unwrap();
        let line = protocol::render_event(&event);
        assert!(line.starts_with(protocol::FINAL_PREFIX));
        assert!(line.ends_with("hello world"));
    }
}
