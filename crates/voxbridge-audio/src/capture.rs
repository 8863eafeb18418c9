use crate::framer::FrameAssembler;
use cpal::traits::{DeviceTrait, StreamTrait};
use cpal::{Device, SampleRate, Stream, StreamConfig};
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use voxbridge_core::config::AudioConfig;
use voxbridge_core::{AudioError, AudioFrame};

/// Frames the queue holds before capture starts dropping. At the default
/// frame size this is several seconds of backlog.
pub const FRAME_QUEUE_DEPTH: usize = 32;

const STATUS_OK: u8 = 0;
const STATUS_ERROR: u8 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureStatus {
    Ok,
    Error,
}

// ── CaptureHandle ─────────────────────────────────────────────

/// Observes a running capture stream: device health and dropped-frame count.
#[derive(Clone)]
pub struct CaptureHandle {
    status: Arc<AtomicU8>,
    overflow: Arc<AtomicU64>,
}

impl CaptureHandle {
    pub fn status(&self) -> CaptureStatus {
        match self.status.load(Ordering::Relaxed) {
            STATUS_ERROR => CaptureStatus::Error,
            _ => CaptureStatus::Ok,
        }
    }

    /// Frames dropped because the session could not keep up with capture.
    pub fn overflow_count(&self) -> u64 {
        self.overflow.load(Ordering::Relaxed)
    }
}

// ── CaptureNode ───────────────────────────────────────────────

/// An open input stream delivering fixed-size frames to a bounded channel.
///
/// Dropping the node stops and closes the stream, releasing the device.
pub struct CaptureNode {
    _stream: Stream,
}

impl CaptureNode {
    pub fn start(
        device: &Device,
        config: &AudioConfig,
        frames: mpsc::Sender<AudioFrame>,
    ) -> Result<(Self, CaptureHandle), AudioError> {
        let stream_config = StreamConfig {
            channels: 1,
            sample_rate: SampleRate(config.sample_rate),
            buffer_size: cpal::BufferSize::Fixed(config.buffer_size),
        };

        let mut assembler = FrameAssembler::new(config.frame_size as usize, config.sample_rate);
        let status = Arc::new(AtomicU8::new(STATUS_OK));
        let status_flag = Arc::clone(&status);
        let overflow = Arc::new(AtomicU64::new(0));
        let overflow_count = Arc::clone(&overflow);

        let err_callback = move |err: cpal::StreamError| {
            tracing::error!("capture stream error: {}", err);
            status_flag.store(STATUS_ERROR, Ordering::Relaxed);
        };

        let stream = device
            .build_input_stream(
                &stream_config,
                move |data: &[i16], _: &cpal::InputCallbackInfo| {
                    for frame in assembler.push(data) {
                        match frames.try_send(frame) {
                            Ok(()) => {}
                            Err(TrySendError::Full(_)) => {
                                // Session is behind real time; drop and count.
                                let dropped =
                                    overflow_count.fetch_add(1, Ordering::Relaxed) + 1;
                                tracing::trace!("frame queue full, {dropped} frame(s) dropped");
                            }
                            Err(TrySendError::Closed(_)) => {
                                // Session ended; the stream is about to be dropped.
                            }
                        }
                    }
                },
                err_callback,
                None,
            )
            .map_err(|e| AudioError::StreamBuild(e.to_string()))?;

        stream
            .play()
            .map_err(|e| AudioError::StreamError(e.to_string()))?;

        let handle = CaptureHandle { status, overflow };
        Ok((Self { _stream: stream }, handle))
    }
}
