use std::path::Path;
use thiserror::Error;
use tokio::sync::{mpsc, watch};
use voxbridge_audio::{CaptureHandle, CaptureNode, DeviceManager, FRAME_QUEUE_DEPTH};
use voxbridge_core::{
    AppConfig, AudioError, AudioFrame, EngineError, SinkError, TranscriptEvent,
};
use voxbridge_engine::{DecodingState, EngineRegistry, SpeechEngine};
use voxbridge_sink::{SinkRegistry, TranscriptSink};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("audio error: {0}")]
    Audio(#[from] AudioError),

    #[error("engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("sink error: {0}")]
    Sink(#[from] SinkError),
}

// ── Shutdown ──────────────────────────────────────────────────

/// Requests cooperative cancellation of a running session.
///
/// The request is observed at the top of the next loop iteration; the
/// in-flight frame read is abandoned and no further reads occur.
pub struct ShutdownHandle {
    tx: watch::Sender<bool>,
}

impl ShutdownHandle {
    pub fn request(&self) {
        let _ = self.tx.send(true);
    }
}

pub fn shutdown_channel() -> (ShutdownHandle, watch::Receiver<bool>) {
    let (tx, rx) = watch::channel(false);
    (ShutdownHandle { tx }, rx)
}

// ── Session ───────────────────────────────────────────────────

/// One transcription session: the open capture stream, the recognizer state
/// and the sink, owned together and released together.
pub struct Session {
    engine: Box<dyn SpeechEngine>,
    sink: Box<dyn TranscriptSink>,
    frames: mpsc::Receiver<AudioFrame>,
    shutdown: watch::Receiver<bool>,
    capture: Option<(CaptureNode, CaptureHandle)>,
    released: bool,
}

impl Session {
    /// Build a session around an injected frame source. Used by tests and
    /// embedding hosts; [`start`](Self::start) is the microphone path.
    pub fn new(
        engine: Box<dyn SpeechEngine>,
        sink: Box<dyn TranscriptSink>,
        frames: mpsc::Receiver<AudioFrame>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            engine,
            sink,
            frames,
            shutdown,
            capture: None,
            released: false,
        }
    }

    /// Open the configured device, initialize engine and sink, and begin
    /// capturing. No protocol output is produced before this succeeds.
    pub async fn start(
        config: &AppConfig,
        engines: &EngineRegistry,
        sinks: &SinkRegistry,
        shutdown: watch::Receiver<bool>,
    ) -> Result<Self, SessionError> {
        let mut sink = sinks.create(&config.sink.name)?;
        sink.initialize(config.sink.extra.clone()).await?;

        let mut engine = engines.create(&config.engine.name)?;
        engine.initialize(engine_init_config(config)?)?;

        let manager = DeviceManager::new();
        let device = manager.get_input_device(&config.audio.device_name)?;

        let (frame_tx, frame_rx) = mpsc::channel(FRAME_QUEUE_DEPTH);
        let (capture, capture_handle) = CaptureNode::start(&device, &config.audio, frame_tx)?;

        tracing::info!(
            device = %config.audio.device_name,
            sample_rate = config.audio.sample_rate,
            frame_size = config.audio.frame_size,
            engine = %engine.name(),
            "capture stream open"
        );

        Ok(Self {
            engine,
            sink,
            frames: frame_rx,
            shutdown,
            capture: Some((capture, capture_handle)),
            released: false,
        })
    }

    /// Drive the session until cancellation, source exhaustion or a fatal
    /// error. Emits the readiness marker before the first read; emits one
    /// event per frame that yields non-empty text, in frame order.
    pub async fn run(&mut self) -> Result<(), SessionError> {
        self.sink.ready().await?;

        loop {
            tokio::select! {
                biased;

                changed = self.shutdown.changed() => {
                    match changed {
                        Ok(()) if !*self.shutdown.borrow() => continue,
                        // Stop requested, or the requester is gone.
                        _ => {
                            tracing::debug!("shutdown requested, leaving run loop");
                            break;
                        }
                    }
                }
                frame = self.frames.recv() => {
                    let Some(frame) = frame else {
                        tracing::debug!("frame source closed, leaving run loop");
                        break;
                    };
                    self.process_frame(&frame).await?;
                }
            }
        }

        Ok(())
    }

    async fn process_frame(&mut self, frame: &AudioFrame) -> Result<(), SessionError> {
        match self.engine.accept_frame(frame)? {
            DecodingState::Finalized => {
                let text = self.engine.final_result()?;
                if let Some(event) = TranscriptEvent::finalized(&text) {
                    self.sink.emit(&event).await?;
                }
            }
            DecodingState::Running => {
                let text = self.engine.partial_result()?;
                if let Some(event) = TranscriptEvent::partial(&text) {
                    self.sink.emit(&event).await?;
                }
            }
        }
        Ok(())
    }

    /// Release everything the session owns: stop and close the capture
    /// stream, shut the engine down, emit the termination marker, shut the
    /// sink down. Runs once; later calls are no-ops. Runs on every exit
    /// path, including fatal errors, so failures here are logged rather
    /// than propagated.
    pub async fn stop(&mut self) {
        if self.released {
            return;
        }
        self.released = true;

        if let Some((capture, handle)) = self.capture.take() {
            let dropped = handle.overflow_count();
            if dropped > 0 {
                tracing::warn!("capture dropped {dropped} frame(s) during the session");
            }
            // Dropping the node stops the stream and releases the device.
            drop(capture);
        }

        if let Err(e) = self.engine.shutdown() {
            tracing::warn!("engine shutdown failed: {e}");
        }
        if let Err(e) = self.sink.terminate().await {
            tracing::warn!("failed to emit termination marker: {e}");
        }
        if let Err(e) = self.sink.shutdown().await {
            tracing::warn!("sink shutdown failed: {e}");
        }

        tracing::info!("session released");
    }
}

/// Engine-specific TOML handed to `SpeechEngine::initialize`, including the
/// resolved model directory. Resolution happens here, once, before the
/// session exists.
fn engine_init_config(config: &AppConfig) -> Result<toml::Value, SessionError> {
    let mut table = toml::map::Map::new();

    if config.engine.name == "vosk" {
        let vosk = config.engine.vosk.clone().unwrap_or_default();
        let explicit = vosk.model_path.as_deref().map(Path::new);
        let model_dir = voxbridge_engine::resolve_model_dir(explicit, &vosk.model_name)?;
        table.insert(
            "model_path".to_string(),
            toml::Value::String(model_dir.to_string_lossy().into_owned()),
        );
        table.insert(
            "sample_rate".to_string(),
            toml::Value::Integer(config.audio.sample_rate as i64),
        );
    }

    Ok(toml::Value::Table(table))
}
